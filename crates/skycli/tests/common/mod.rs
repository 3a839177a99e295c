use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;
use tokio::process::Command;

/// API key every test invocation is configured with.
pub const TEST_API_KEY: &str = "test-api-key";

/// An isolated environment for running the CLI binary.
pub struct TestEnv {
    home: TempDir,
    endpoint: Option<String>,
    editor: Option<String>,
}

impl TestEnv {
    /// Environment pointing the CLI at `endpoint` through `SKYCLI_*`.
    pub fn new(endpoint: &str) -> Self {
        Self {
            home: TempDir::new().unwrap(),
            endpoint: Some(endpoint.to_string()),
            editor: None,
        }
    }

    /// Environment with no endpoint or API key in the environment.
    pub fn unconfigured() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            endpoint: None,
            editor: None,
        }
    }

    pub fn with_editor(mut self, editor: &str) -> Self {
        self.editor = Some(editor.to_string());
        self
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn config_home(&self) -> PathBuf {
        self.home.path().join("config")
    }

    /// Run the CLI binary with arguments.
    pub async fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_skycli"));
        cmd.args(args)
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("NO_COLOR", "1")
            .env_remove("SKYCLI_ENDPOINT")
            .env_remove("SKYCLI_API_KEY")
            .env_remove("SKYCLI_ACCESS_TOKEN")
            .env_remove("RUST_LOG");

        if let Some(endpoint) = &self.endpoint {
            cmd.env("SKYCLI_ENDPOINT", endpoint)
                .env("SKYCLI_API_KEY", TEST_API_KEY);
        }

        match &self.editor {
            Some(editor) => cmd.env("EDITOR", editor),
            None => cmd.env_remove("EDITOR"),
        };

        cmd.output().await.expect("Failed to execute CLI")
    }

    /// Run the CLI and expect success, returning stdout.
    pub async fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if !output.status.success() {
            panic!(
                "CLI command failed: {:?}\nstderr: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure, returning stderr.
    pub async fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}
