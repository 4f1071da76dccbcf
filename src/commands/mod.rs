use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::accounts::{self, DEFAULT_ACCOUNTS_FILE};
use crate::models::{AccountStatus, CreateSummary};
use crate::rclone::Rclone;
use crate::runner::CommandRunner;

#[derive(Parser)]
#[command(name = "mega-remotes")]
#[command(version = "0.1.0")]
#[command(about = "Bulk rclone remote management for MEGA accounts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an rclone remote for every account in a CSV credentials file
    Create {
        /// CSV file with email, password and username columns
        #[arg(short, long, default_value = DEFAULT_ACCOUNTS_FILE)]
        file: String,

        /// Also recreate remotes that already exist in the config
        #[arg(long)]
        force: bool,
    },

    /// List the configured MEGA remotes
    List {
        /// Print the remote names as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Verify the status of configured remotes
    Verify {
        /// Remote names to check (defaults to every MEGA remote)
        #[arg(index = 1)]
        remotes: Vec<String>,
    },

    /// (Advanced) run a custom rclone command against the managed config
    Run {
        /// Arguments passed straight to rclone
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    Rclone::ensure_installed()?;
    let rclone = Rclone::new()?;

    match cli.command {
        Commands::Create { file, force } => create(&rclone, &file, force).map(|_| ()),
        Commands::List { json } => list(&rclone, json),
        Commands::Verify { remotes } => verify(&rclone, remotes),
        Commands::Run { args } => passthrough(&rclone, &args),
    }
}

fn create<R: CommandRunner>(rclone: &Rclone<R>, file: &str, force: bool) -> Result<CreateSummary> {
    let path = PathBuf::from(accounts::expand_path(file));
    let records = accounts::load_accounts(&path)?;

    if records.is_empty() {
        println!("No accounts found in {}", path.display());
        return Ok(CreateSummary::default());
    }

    let mut skipped = 0;
    let records = if force {
        records
    } else {
        let existing: HashSet<String> = rclone.list_remotes()?.into_iter().collect();
        records
            .into_iter()
            .filter(|record| {
                let remote_name = record.remote_name();
                if existing.contains(&remote_name) {
                    println!("Remote '{}' already exists, skipping.", remote_name.yellow());
                    skipped += 1;
                    false
                } else {
                    true
                }
            })
            .collect()
    };

    let mut summary = rclone.create_remotes(&records)?;
    summary.skipped = skipped;

    println!(
        "{}",
        format!(
            "{} created, {} failed, {} skipped.",
            summary.created, summary.failed, summary.skipped
        )
        .bold()
    );
    Ok(summary)
}

fn list<R: CommandRunner>(rclone: &Rclone<R>, json: bool) -> Result<()> {
    let remotes = mega_remotes(rclone)?;

    if remotes.is_empty() {
        println!("No MEGA remotes configured.");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&remotes)?);
    } else {
        println!("MEGA remotes: {}", remotes.len());
        for remote in &remotes {
            println!("  {}", remote);
        }
    }
    Ok(())
}

fn verify<R: CommandRunner>(rclone: &Rclone<R>, remotes: Vec<String>) -> Result<()> {
    let targets = if remotes.is_empty() {
        mega_remotes(rclone)?
    } else {
        remotes
    };

    if targets.is_empty() {
        println!("No remotes to verify.");
        return Ok(());
    }

    println!("Verifying {} remote(s)...", targets.len());
    for remote in &targets {
        match rclone.account_status(remote) {
            AccountStatus::Active => {
                println!("{} {} is active and working properly", "✓".green(), remote)
            }
            AccountStatus::Inactive => {
                println!("{} {} is inactive or has issues", "!".yellow(), remote)
            }
            AccountStatus::Error => println!(
                "{} {} encountered an error during verification",
                "✗".red(),
                remote
            ),
        }
    }
    println!("Verification complete!");
    Ok(())
}

fn passthrough<R: CommandRunner>(rclone: &Rclone<R>, args: &[String]) -> Result<()> {
    println!("{}", format!("Running command: rclone {}", args.join(" ")).dimmed());
    let output = rclone.run_raw(args)?;
    if !output.is_empty() {
        print!("{}", output);
    }
    Ok(())
}

fn mega_remotes<R: CommandRunner>(rclone: &Rclone<R>) -> Result<Vec<String>> {
    Ok(rclone
        .list_remotes()?
        .into_iter()
        .filter(|name| name.starts_with("mega_"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunOutput;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;
    use tempfile::NamedTempFile;

    /// Recording runner with a shared call log, so tests keep a handle on
    /// the invocations after handing the runner to `Rclone`.
    struct RecordingRunner {
        calls: Rc<RefCell<Vec<Vec<String>>>>,
        listremotes_output: String,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<RunOutput> {
            assert_eq!(program, "rclone");
            self.calls.borrow_mut().push(args.to_vec());

            let stdout = if args.first().map(String::as_str) == Some("listremotes") {
                self.listremotes_output.clone()
            } else {
                String::new()
            };

            Ok(RunOutput {
                code: Some(0),
                stdout,
                stderr: String::new(),
            })
        }
    }

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write temp csv");
        file
    }

    fn config_creates(calls: &Rc<RefCell<Vec<Vec<String>>>>) -> Vec<Vec<String>> {
        calls
            .borrow()
            .iter()
            .filter(|args| args.first().map(String::as_str) == Some("config"))
            .cloned()
            .collect()
    }

    #[test]
    fn test_create_leaves_existing_remotes_untouched() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let rclone = Rclone::with_runner(RecordingRunner {
            calls: Rc::clone(&calls),
            listremotes_output: "mega_u1:\n".to_string(),
        });
        let file = write_csv("a@x.com,p1,u1\nb@x.com,p2,u2\n");

        let summary = create(&rclone, &file.path().to_string_lossy(), false).unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 0);

        let creates = config_creates(&calls);
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0][2], "mega_u2");
    }

    #[test]
    fn test_create_force_recreates_existing_remotes() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let rclone = Rclone::with_runner(RecordingRunner {
            calls: Rc::clone(&calls),
            listremotes_output: "mega_u1:\n".to_string(),
        });
        let file = write_csv("a@x.com,p1,u1\nb@x.com,p2,u2\n");

        let summary = create(&rclone, &file.path().to_string_lossy(), true).unwrap();

        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.created, 2);

        let creates = config_creates(&calls);
        assert_eq!(creates.len(), 2);
        assert_eq!(creates[0][2], "mega_u1");
        assert_eq!(creates[1][2], "mega_u2");
        // --force never consults the existing remote list.
        assert_eq!(calls.borrow().len(), 2);
    }
}
