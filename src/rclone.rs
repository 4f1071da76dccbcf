use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

use crate::models::{AccountRecord, AccountStatus, CreateSummary};
use crate::runner::{CommandRunner, SystemRunner};

/// Wrapper around the rclone binary. All invocations go through the injected
/// runner so tests never spawn a real process.
pub struct Rclone<R: CommandRunner> {
    runner: R,
}

impl Rclone<SystemRunner> {
    pub fn new() -> Result<Self> {
        let config_path = Self::config_path()?;
        let runner =
            SystemRunner::new().with_env("RCLONE_CONFIG", &config_path.to_string_lossy());
        Ok(Rclone { runner })
    }

    /// Managed rclone config file, kept separate from the user's own.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine the user config directory")?
            .join("mega-remotes")
            .join("rclone");

        std::fs::create_dir_all(&config_dir)
            .context("Failed to create the rclone config directory")?;

        Ok(config_dir.join("rclone.conf"))
    }

    pub fn ensure_installed() -> Result<()> {
        if which::which("rclone").is_ok() {
            return Ok(());
        }

        println!("Installing rclone...");
        let installer = Rclone::with_runner(SystemRunner::new());
        installer.install()?;

        if which::which("rclone").is_err() {
            return Err(anyhow::anyhow!(
                "rclone is still not on PATH after installation"
            ));
        }
        Ok(())
    }
}

impl<R: CommandRunner> Rclone<R> {
    pub fn with_runner(runner: R) -> Self {
        Rclone { runner }
    }

    /// Run the platform installer for rclone. A non-zero installer exit is
    /// an error, not a silent continue.
    fn install(&self) -> Result<()> {
        let install_cmd = if cfg!(target_os = "macos") {
            "brew install rclone"
        } else if cfg!(target_os = "linux") {
            "curl https://rclone.org/install.sh | sudo bash"
        } else {
            return Err(anyhow::anyhow!(
                "Unsupported operating system, please install rclone manually"
            ));
        };

        let output = self
            .runner
            .run("sh", &["-c".to_string(), install_cmd.to_string()])
            .context("Failed to install rclone")?;

        if !output.success() {
            return Err(anyhow::anyhow!(
                "rclone installer failed: {}",
                output.detail()
            ));
        }
        Ok(())
    }

    /// Configure one MEGA remote. Returns the raw invocation result; a
    /// non-zero exit is reported there, not as an Err. Err means the process
    /// could not be run at all.
    pub fn create_remote(&self, account: &AccountRecord) -> Result<crate::runner::RunOutput> {
        let args = vec![
            "config".to_string(),
            "create".to_string(),
            account.remote_name(),
            "mega".to_string(),
            "user".to_string(),
            account.email.clone(),
            "pass".to_string(),
            account.password.clone(),
        ];
        self.runner.run("rclone", &args)
    }

    /// Configure a remote for every account, one invocation per record.
    /// A failing record is reported and counted, never fatal to the batch.
    pub fn create_remotes(&self, accounts: &[AccountRecord]) -> Result<CreateSummary> {
        let mut summary = CreateSummary::default();

        for account in accounts {
            let remote_name = account.remote_name();
            let output = self.create_remote(account)?;

            if output.success() {
                println!(
                    "Remote '{}' created successfully.",
                    remote_name.green()
                );
                summary.created += 1;
            } else {
                log::warn!("config create failed for {}: {}", remote_name, output.detail());
                println!(
                    "{}",
                    format!(
                        "Error creating remote '{}': {}",
                        remote_name,
                        output.detail()
                    )
                    .red()
                );
                summary.failed += 1;
            }
        }

        println!("All remotes have been processed.");
        Ok(summary)
    }

    /// Names of the remotes currently present in the config.
    pub fn list_remotes(&self) -> Result<Vec<String>> {
        let output = self
            .runner
            .run("rclone", &["listremotes".to_string()])?;

        if !output.success() {
            return Err(anyhow::anyhow!(
                "rclone listremotes failed: {}",
                output.detail()
            ));
        }

        Ok(output
            .stdout
            .lines()
            .map(|line| line.trim().trim_end_matches(':').to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// Probe a configured remote by asking rclone for its quota.
    pub fn account_status(&self, remote: &str) -> AccountStatus {
        let args = vec!["about".to_string(), format!("{}:", remote)];
        match self.runner.run("rclone", &args) {
            Ok(output) if output.success() => AccountStatus::Active,
            Ok(_) => AccountStatus::Inactive,
            Err(err) => {
                log::warn!("verification of {} failed to run: {:#}", remote, err);
                AccountStatus::Error
            }
        }
    }

    /// Passthrough for arbitrary rclone arguments against the managed config.
    pub fn run_raw(&self, args: &[String]) -> Result<String> {
        let output = self.runner.run("rclone", args)?;
        if !output.success() {
            return Err(anyhow::anyhow!(
                "rclone {} failed: {}",
                args.join(" "),
                output.detail()
            ));
        }
        Ok(output.stdout)
    }
}
