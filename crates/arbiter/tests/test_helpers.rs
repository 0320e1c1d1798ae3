use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Scratch state directory: each test gets its own config and journal.
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn journal(&self) -> PathBuf {
        self.dir.path().join("decisions.jsonl")
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn run(&self, args: &[&str]) -> Output {
        arbiter_bin()
            .arg("--config")
            .arg(self.config())
            .arg("--journal")
            .arg(self.journal())
            .args(args)
            .output()
            .expect("failed to run arbiter")
    }

    /// Run arbiter, assert exit code, return parsed JSON stdout.
    pub fn json(&self, args: &[&str], expected_exit: i32) -> Value {
        let out = self.run(args);
        let code = out.status.code().unwrap_or(-1);
        assert_eq!(
            code,
            expected_exit,
            "exit mismatch for: arbiter {}\nstdout: {}\nstderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
        serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
            panic!(
                "invalid JSON from: arbiter {}\n{e}\nstdout: {}",
                args.join(" "),
                String::from_utf8_lossy(&out.stdout)
            )
        })
    }
}

pub fn arbiter_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_arbiter"));
    cmd.current_dir(workspace_root());
    cmd.env_remove("RUST_LOG");
    cmd
}
