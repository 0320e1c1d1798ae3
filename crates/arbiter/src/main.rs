#![forbid(unsafe_code)]

mod telemetry;

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arbiter_core::config::EngineConfig;
use arbiter_core::context::RawContext;
use arbiter_core::traits::ConfigStore;
use arbiter_core::types::DecisionType;
use arbiter_engine::store::{DecisionJournal, FileConfigStore};
use arbiter_engine::engine::HISTORY_CAPACITY;
use arbiter_engine::DecisionEngine;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "arbiter",
    version,
    about = "Multi-criteria decisions with ethical boundaries and an audit trail. JSON in, JSON out."
)]
struct Cli {
    /// Engine configuration document.
    #[arg(long, global = true, default_value = ".arbiter/config.json")]
    config: PathBuf,

    /// Hash-chained decision journal.
    #[arg(long, global = true, default_value = ".arbiter/decisions.jsonl")]
    journal: PathBuf,

    /// Log filter when RUST_LOG is unset (logs go to stderr).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Write the default configuration document.
    Init {
        /// Overwrite an existing configuration.
        #[arg(long)]
        force: bool,
    },

    /// Evaluate a JSON array of options. Exits 1 when the decision is rejected.
    Decide {
        /// Path to options .json (or "-" for stdin).
        options: String,

        /// Decision type, e.g. code_change, security_action.
        #[arg(long = "type", default_value = "code_change")]
        decision_type: DecisionType,

        /// Path to a context .json.
        #[arg(long)]
        context: Option<String>,
    },

    /// Show journaled outcomes, most recent first.
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Summarize performance metrics.
    Metrics,

    /// Show or update criteria weights.
    Weights {
        /// name=value, repeatable.
        #[arg(long = "set", value_parser = parse_weight)]
        set: Vec<(String, f64)>,
    },

    /// Show or extend ethical boundaries.
    Boundaries {
        /// Boundary text to append.
        #[arg(long)]
        add: Option<String>,
    },

    /// Verify the decision journal hash chain.
    Audit {
        /// Verify the hash chain.
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    match cli.cmd {
        Cmd::Init { force } => cmd_init(&cli.config, force),

        Cmd::Decide {
            options,
            decision_type,
            context,
        } => cmd_decide(
            &cli.config,
            &cli.journal,
            &options,
            decision_type,
            context.as_deref(),
        ),

        Cmd::History { limit } => cmd_history(&cli.journal, limit),

        Cmd::Metrics => cmd_metrics(&cli.config),

        Cmd::Weights { set } => cmd_weights(&cli.config, set),

        Cmd::Boundaries { add } => cmd_boundaries(&cli.config, add.as_deref()),

        Cmd::Audit { verify } => cmd_audit(&cli.journal, verify),
    }
}

fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid weight '{value}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn read_json(file: &str) -> Result<serde_json::Value> {
    let content = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("cannot read {file}"))?
    };
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {file}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn engine(config: &Path) -> DecisionEngine {
    DecisionEngine::new(Box::new(FileConfigStore::new(config)))
}

fn cmd_init(config: &Path, force: bool) -> Result<()> {
    if config.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", config.display());
    }
    let defaults = EngineConfig::default();
    FileConfigStore::new(config).save(&defaults)?;
    eprintln!("created {}", config.display());
    print_json(&defaults)
}

fn cmd_decide(
    config: &Path,
    journal: &Path,
    options_file: &str,
    decision_type: DecisionType,
    context_file: Option<&str>,
) -> Result<()> {
    let options = match read_json(options_file)? {
        serde_json::Value::Array(options) => options,
        _ => bail!("{options_file}: expected a JSON array of options"),
    };
    let context: RawContext = match context_file {
        Some(file) => serde_json::from_value(read_json(file)?)
            .with_context(|| format!("invalid decision context in {file}"))?,
        None => RawContext::default(),
    };
    tracing::debug!(options = options.len(), %decision_type, "running decision");

    let journal = DecisionJournal::new(journal);
    let earlier = journal.history(HISTORY_CAPACITY).unwrap_or_else(|e| {
        tracing::warn!(error = %format!("{e:#}"), "cannot read journal, starting with empty history");
        Vec::new()
    });
    let engine = engine(config)
        .with_history(earlier)
        .with_audit_sink(Box::new(journal));
    let outcome = engine.make_decision(decision_type, &options, context);
    print_json(&outcome)?;

    if !outcome.is_approved() {
        bail!(
            "decision {} rejected: {}",
            outcome.decision_id,
            outcome.rationale
        );
    }
    Ok(())
}

fn cmd_history(journal: &Path, limit: usize) -> Result<()> {
    let outcomes = DecisionJournal::new(journal).history(limit)?;
    print_json(&outcomes)
}

fn cmd_metrics(config: &Path) -> Result<()> {
    print_json(&engine(config).get_performance_metrics())
}

fn cmd_weights(config: &Path, set: Vec<(String, f64)>) -> Result<()> {
    let engine = engine(config);
    if !set.is_empty() {
        let weights: BTreeMap<String, f64> = set.into_iter().collect();
        engine.update_criteria_weights(&weights)?;
    }
    print_json(&engine.config().criteria_weights)
}

fn cmd_boundaries(config: &Path, add: Option<&str>) -> Result<()> {
    let engine = engine(config);
    if let Some(text) = add {
        if !engine.add_ethical_boundary(text)? {
            eprintln!("boundary already present");
        }
    }
    print_json(&engine.config().ethical_boundaries)
}

#[derive(Serialize)]
struct AuditReport<'a> {
    journal: &'a Path,
    valid: bool,
    entries: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_audit(journal: &Path, verify: bool) -> Result<()> {
    if !verify {
        bail!("specify --verify");
    }
    if !journal.exists() {
        eprintln!("no journal found at {}", journal.display());
        return print_json(&AuditReport {
            journal,
            valid: true,
            entries: 0,
            error: None,
        });
    }

    match DecisionJournal::new(journal).verify() {
        Ok(entries) => print_json(&AuditReport {
            journal,
            valid: true,
            entries,
            error: None,
        }),
        Err(e) => {
            print_json(&AuditReport {
                journal,
                valid: false,
                entries: 0,
                error: Some(format!("{e:#}")),
            })?;
            bail!("journal {} failed verification", journal.display())
        }
    }
}
