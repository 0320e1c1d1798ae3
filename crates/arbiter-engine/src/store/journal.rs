use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use arbiter_core::errors::AuditError;
use arbiter_core::outcome::DecisionOutcome;
use arbiter_core::traits::AuditSink;
use sha2::{Digest, Sha256};

const GENESIS: &str = "genesis";

fn line_hash(line: &str) -> String {
    format!("sha256:{:x}", Sha256::digest(line.as_bytes()))
}

/// Append an entry to a JSONL log, chaining it to the previous line.
///
/// The entry gets `prev_hash` (SHA-256 of the previous line, or "genesis")
/// and `recorded_at`. Returns the hash of the new line.
pub fn append_entry(path: &Path, entry: &serde_json::Value) -> Result<String> {
    let content = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("cannot read journal {}", path.display()))?
    } else {
        String::new()
    };

    let prev_hash = content
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(line_hash)
        .unwrap_or_else(|| GENESIS.to_string());

    let mut entry = entry.clone();
    let obj = entry
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("journal entry must be a JSON object"))?;
    obj.insert("prev_hash".into(), serde_json::Value::String(prev_hash));
    obj.insert(
        "recorded_at".into(),
        serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
    );

    let line = serde_json::to_string(&entry)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open journal {}", path.display()))?;
    if !content.is_empty() && !content.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    writeln!(file, "{line}").with_context(|| format!("cannot write journal {}", path.display()))?;

    Ok(line_hash(&line))
}

/// Verify the hash chain. Returns the number of entries.
///
/// Every entry must carry `prev_hash`; the first one links to "genesis".
pub fn verify_chain(path: &Path) -> Result<u64, AuditError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AuditError::Read(format!("{}: {e}", path.display())))?;

    let mut count = 0u64;
    let mut prev_hash = GENESIS.to_string();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let corrupt = |detail: String| AuditError::ChainCorruption {
            entry: count,
            detail,
        };
        let entry: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| corrupt(format!("invalid JSON at line {}: {e}", i + 1)))?;
        let entry_prev = entry
            .get("prev_hash")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| corrupt("missing prev_hash".to_string()))?;

        if entry_prev != prev_hash {
            return Err(corrupt(format!(
                "expected prev_hash '{prev_hash}', got '{entry_prev}'"
            )));
        }

        prev_hash = line_hash(line);
        count += 1;
    }

    Ok(count)
}

/// Read journaled outcomes, most recent first. A missing journal is empty.
pub fn read_outcomes(path: &Path, limit: usize) -> Result<Vec<DecisionOutcome>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read journal {}", path.display()))?;

    let lines: Vec<&str> = content.lines().collect();
    let mut outcomes = Vec::new();
    for (i, line) in lines.iter().enumerate().rev() {
        if outcomes.len() >= limit {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let mut entry: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("invalid JSON at line {}", i + 1))?;
        let outcome = entry
            .get_mut("outcome")
            .map(serde_json::Value::take)
            .ok_or_else(|| anyhow::anyhow!("line {} has no outcome", i + 1))?;
        outcomes.push(
            serde_json::from_value(outcome)
                .with_context(|| format!("invalid outcome at line {}", i + 1))?,
        );
    }
    Ok(outcomes)
}

/// Hash-chained, append-only record of decision outcomes.
#[derive(Debug)]
pub struct DecisionJournal {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DecisionJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn verify(&self) -> Result<u64, AuditError> {
        verify_chain(&self.path)
    }

    pub fn history(&self, limit: usize) -> Result<Vec<DecisionOutcome>> {
        read_outcomes(&self.path, limit)
    }
}

impl AuditSink for DecisionJournal {
    fn record(&self, outcome: &DecisionOutcome) -> Result<(), AuditError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| AuditError::WriteFailure(e.to_string()))?;
        }
        let entry = serde_json::json!({
            "decision_id": outcome.decision_id,
            "status": outcome.status,
            "outcome": outcome,
        });
        append_entry(&self.path, &entry)
            .map(|_| ())
            .map_err(|e| AuditError::WriteFailure(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_and_verify_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");

        append_entry(&path, &json!({"event": "first"})).unwrap();
        append_entry(&path, &json!({"event": "second"})).unwrap();
        let head = append_entry(&path, &json!({"event": "third"})).unwrap();

        assert_eq!(verify_chain(&path).unwrap(), 3);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(line_hash(content.lines().last().unwrap()), head);
        assert!(content.lines().next().unwrap().contains("\"prev_hash\":\"genesis\""));
    }

    #[test]
    fn verify_detects_tampering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");

        append_entry(&path, &json!({"event": "first"})).unwrap();
        append_entry(&path, &json!({"event": "second"})).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, content.replacen("first", "TAMPERED", 1)).unwrap();

        let err = verify_chain(&path).unwrap_err();
        assert!(matches!(err, AuditError::ChainCorruption { entry: 1, .. }));
        assert!(err.to_string().contains("hash chain broken at entry 1"));
    }

    #[test]
    fn entry_without_prev_hash_breaks_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");

        append_entry(&path, &json!({"event": "first"})).unwrap();
        append_entry(&path, &json!({"event": "second"})).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let stripped: Vec<String> = content
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    let mut entry: serde_json::Value = serde_json::from_str(line).unwrap();
                    entry.as_object_mut().unwrap().remove("prev_hash");
                    serde_json::to_string(&entry).unwrap()
                } else {
                    line.to_string()
                }
            })
            .collect();
        std::fs::write(&path, stripped.join("\n") + "\n").unwrap();

        let err = verify_chain(&path).unwrap_err();
        assert!(matches!(err, AuditError::ChainCorruption { entry: 0, .. }));
        assert!(err.to_string().contains("missing prev_hash"));
    }

    #[test]
    fn unreadable_journal_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_chain(&dir.path().join("none.jsonl")).unwrap_err();
        assert!(matches!(err, AuditError::Read(_)));
    }

    #[test]
    fn empty_journal_has_zero_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        std::fs::write(&path, "").unwrap();
        assert_eq!(verify_chain(&path).unwrap(), 0);
    }

    #[test]
    fn non_object_entry_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        assert!(append_entry(&path, &json!([1, 2])).is_err());
    }

    #[test]
    fn missing_journal_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let outcomes = read_outcomes(&dir.path().join("none.jsonl"), 10).unwrap();
        assert!(outcomes.is_empty());
    }
}
