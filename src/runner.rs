use anyhow::{Context, Result};
use std::process::Command;

/// Captured result of one external invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short failure detail for user-facing messages.
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Capability over subprocess execution. Injected so the rclone wrapper can
/// be unit tested without spawning a real process.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput>;
}

/// Production runner: blocking `std::process::Command`, with any configured
/// environment variables (e.g. RCLONE_CONFIG) applied per invocation.
pub struct SystemRunner {
    envs: Vec<(String, String)>,
}

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner { envs: Vec::new() }
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute {}", program))?;

        Ok(RunOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
