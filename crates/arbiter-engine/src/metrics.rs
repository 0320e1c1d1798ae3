use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

pub const SUCCESS_RATE: &str = "success_rate";
pub const CONFIDENCE_SCORE: &str = "confidence_score";
pub const OPTIONS_CONSIDERED: &str = "options_considered";
pub const DECISION_TIME_MS: &str = "decision_time_ms";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub current: f64,
    pub average: f64,
    pub trend: Trend,
}

/// One sample per metric, taken after a decision completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionSample {
    pub success_rate: f64,
    pub confidence_score: f64,
    pub options_considered: usize,
    pub decision_time_ms: f64,
}

/// Bounded per-metric sample series.
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    capacity: usize,
    series: BTreeMap<String, VecDeque<f64>>,
}

impl PerformanceMetrics {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            series: BTreeMap::new(),
        }
    }

    /// Rebuild from persisted series, keeping only the newest `capacity` samples.
    pub fn from_document(document: &BTreeMap<String, Vec<f64>>, capacity: usize) -> Self {
        let mut metrics = Self::new(capacity);
        for (name, samples) in document {
            for value in samples {
                metrics.push(name, *value);
            }
        }
        metrics
    }

    pub fn push(&mut self, name: &str, value: f64) {
        let series = self.series.entry(name.to_string()).or_default();
        series.push_back(value);
        while series.len() > self.capacity {
            series.pop_front();
        }
    }

    pub fn record(&mut self, sample: DecisionSample) {
        self.push(SUCCESS_RATE, sample.success_rate);
        self.push(CONFIDENCE_SCORE, sample.confidence_score);
        self.push(OPTIONS_CONSIDERED, sample.options_considered as f64);
        self.push(DECISION_TIME_MS, sample.decision_time_ms);
    }

    pub fn samples(&self, name: &str) -> Vec<f64> {
        self.series
            .get(name)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn to_document(&self) -> BTreeMap<String, Vec<f64>> {
        self.series
            .iter()
            .map(|(name, samples)| (name.clone(), samples.iter().copied().collect()))
            .collect()
    }

    /// `{current, average, trend}` for every metric with at least one sample.
    ///
    /// A metric is "improving" when its latest sample exceeds the one before.
    pub fn summary(&self) -> BTreeMap<String, MetricSummary> {
        self.series
            .iter()
            .filter_map(|(name, samples)| {
                let current = *samples.back()?;
                let average = samples.iter().sum::<f64>() / samples.len() as f64;
                let trend = match samples.len().checked_sub(2).and_then(|i| samples.get(i)) {
                    Some(prior) if current > *prior => Trend::Improving,
                    _ => Trend::Stable,
                };
                Some((
                    name.clone(),
                    MetricSummary {
                        current,
                        average,
                        trend,
                    },
                ))
            })
            .collect()
    }
}
