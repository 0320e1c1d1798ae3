use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Seconds after which an abandoned lock file is reclaimed.
const STALE_LOCK_SECS: i64 = 60;

/// Write content atomically: temp file in the same directory, fsync, rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let temp_path = dir.join(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));

    let mut file = std::fs::File::create(&temp_path)
        .with_context(|| format!("cannot create temp file for {}", path.display()))?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("cannot rename temp to {}", path.display()))?;

    Ok(())
}

/// Age of a lock file from its timestamp line, else from its mtime.
/// `None` when neither can be read.
fn lock_age_secs(lock_path: &Path) -> Option<i64> {
    let now = chrono::Utc::now();
    let stamped = std::fs::read_to_string(lock_path)
        .ok()
        .and_then(|content| content.lines().nth(1)?.trim().parse::<i64>().ok());
    if let Some(ts) = stamped {
        return Some(now.timestamp() - ts);
    }
    let modified = std::fs::metadata(lock_path).and_then(|m| m.modified()).ok()?;
    Some(now.timestamp() - chrono::DateTime::<chrono::Utc>::from(modified).timestamp())
}

/// Advisory lock guarding a file against writers in other processes.
///
/// Creates `<path>.lock` holding the PID and a timestamp. Released on drop.
#[derive(Debug)]
pub struct AdvisoryLock {
    lock_path: PathBuf,
}

impl AdvisoryLock {
    /// Acquire the lock. Fails if a fresh lock is already held.
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".lock");
        let lock_path = PathBuf::from(lock_name);

        if lock_path.exists() {
            match lock_age_secs(&lock_path) {
                Some(age) if age > STALE_LOCK_SECS => {
                    tracing::warn!(lock = %lock_path.display(), age, "reclaiming stale lock");
                    let _ = std::fs::remove_file(&lock_path);
                }
                _ => bail!("{} is locked by another writer", path.display()),
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .with_context(|| format!("cannot acquire lock {}", lock_path.display()))?;
        let pid = std::process::id();
        let ts = chrono::Utc::now().timestamp();
        write!(file, "{pid}\n{ts}\n")
            .with_context(|| format!("cannot write lock {}", lock_path.display()))?;

        Ok(Self { lock_path })
    }

    pub fn release(self) -> Result<()> {
        if self.lock_path.exists() {
            std::fs::remove_file(&self.lock_path)
                .with_context(|| format!("cannot release lock {}", self.lock_path.display()))?;
        }
        Ok(())
    }
}

impl Drop for AdvisoryLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.lock_path);
    }
}
