//! Common test utilities for CLI integration tests.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated data directory.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the frontdesk data directory (created on first use)
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("frontdesk-data");
        Self { temp_dir, data_dir }
    }

    /// A bare command with no flags, for tests of global flag handling.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("frontdesk").expect("Failed to find frontdesk binary");
        for var in [
            "FRONTDESK_DATA_DIR",
            "FRONTDESK_BUSY_TIMEOUT",
            "FRONTDESK_DISABLE_AUTOINIT",
            "FRONTDESK_OUTPUT_FORMAT",
            "FRONTDESK_SAVINGS_MINIMUM",
            "FRONTDESK_OVERDRAFT_LIMIT",
            "FRONTDESK_LOW_STOCK_THRESHOLD",
            "FRONTDESK_MAXIMUM_LOCK_WAIT_SECONDS",
            "FRONTDESK_LOG_MODE",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// A command with `--data-dir` pointing at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Runs an interactive program with `script` on stdin and returns stdout.
    ///
    /// # Panics
    /// Panics if the program exits unsuccessfully.
    pub fn run_menu(&self, program: &str, script: &str) -> String {
        let output = self
            .command()
            .arg(program)
            .write_stdin(script)
            .output()
            .expect("Failed to run menu");
        assert!(
            output.status.success(),
            "{program} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Runs `list <entity> --format json` and parses the output.
    pub fn list_json(&self, entity: &str) -> serde_json::Value {
        let output = self
            .command()
            .args(["list", entity, "--format", "json"])
            .output()
            .expect("Failed to run list");
        assert!(
            output.status.success(),
            "list failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("list output is not JSON")
    }
}
