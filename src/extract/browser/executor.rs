//! Browser executor - wraps agent-browser CLI
//!
//! Provides async interface to agent-browser commands.

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::core::{Result, VidscoutError};
use crate::extract::browser::snapshot::Snapshot;

/// Executor for browser automation via agent-browser CLI
pub struct BrowserExecutor {
    /// agent-browser binary
    program: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Upper bound for a single command
    timeout: Duration,
}

impl BrowserExecutor {
    /// Create a new browser executor
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            program: "agent-browser".to_string(),
            session_name: session_name.into(),
            headed: false,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set headed mode
    pub fn set_headed(&mut self, headed: bool) {
        self.headed = headed;
    }

    /// Use a different agent-browser binary
    pub fn set_program(&mut self, program: impl Into<String>) {
        self.program = program.into();
    }

    /// Set the default command timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Session this executor drives
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Check if agent-browser is installed
    pub async fn is_available() -> bool {
        Command::new("agent-browser")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn command_args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = vec!["--session", self.session_name.as_str()];
        if self.headed {
            full.push("--headed");
        }
        full.extend_from_slice(args);
        full
    }

    /// Run an agent-browser command with an explicit deadline
    async fn run_command_with_timeout(&self, args: &[&str], timeout: Duration) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.command_args(args));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| {
                VidscoutError::timeout(
                    format!("agent-browser {}", args.first().unwrap_or(&"")),
                    timeout.as_secs(),
                )
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VidscoutError::BrowserNotFound
                } else {
                    VidscoutError::browser(format!("Failed to run agent-browser: {}", e))
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(VidscoutError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        self.run_command_with_timeout(args, self.timeout).await
    }

    /// Navigate to a URL
    pub async fn open(&self, url: &str) -> Result<()> {
        self.run_command(&["open", url]).await?;
        Ok(())
    }

    /// Click an element by ref
    pub async fn click(&self, ref_id: &str, timeout: Duration) -> Result<()> {
        let target = format!("@{}", ref_id.trim_start_matches('@'));
        self.run_command_with_timeout(&["click", target.as_str()], timeout)
            .await?;
        Ok(())
    }

    /// Get the interactive elements of the current page
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let output = self.run_command(&["snapshot", "-i", "--json"]).await?;
        Ok(serde_json::from_str(&output)?)
    }

    /// Evaluate JavaScript and return its printed result
    pub async fn eval(&self, script: &str) -> Result<String> {
        self.run_command(&["eval", script]).await
    }

    /// Close the browser
    pub async fn close(&self) -> Result<()> {
        self.run_command(&["close"]).await?;
        Ok(())
    }

    /// Close the browser from a background task.
    ///
    /// Used where the caller cannot await, such as a drop handler. Does
    /// nothing outside a tokio runtime.
    pub fn close_detached(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(self.command_args(&["close"]));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let session = self.session_name.clone();
        let timeout = self.timeout;
        handle.spawn(async move {
            match tokio::time::timeout(timeout, cmd.status()).await {
                Ok(Ok(_)) => tracing::debug!(session = %session, "closed in background"),
                Ok(Err(e)) => {
                    tracing::debug!(session = %session, error = %e, "background close failed")
                }
                Err(_) => tracing::debug!(session = %session, "background close timed out"),
            }
        });
    }
}

impl Default for BrowserExecutor {
    fn default() -> Self {
        Self::new("vidscout")
    }
}
