use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

use crate::models::AccountRecord;

/// Default credentials file, next to wherever the tool is run.
pub const DEFAULT_ACCOUNTS_FILE: &str = "accounts.csv";

/// Load account records from a CSV file.
///
/// Columns are positional: email, password, username. Extra columns are
/// ignored. Rows with fewer than three columns are skipped with a warning.
/// A missing or unreadable file is a hard error.
pub fn load_accounts(path: &Path) -> Result<Vec<AccountRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open accounts file: {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut accounts = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let record = result.with_context(|| {
            format!(
                "Failed to parse CSV line {} in {}",
                line_num + 1,
                path.display()
            )
        })?;

        if record.len() < 3 {
            let row: Vec<&str> = record.iter().collect();
            log::warn!("Skipping invalid row {}: {:?}", line_num + 1, row);
            println!("Skipping invalid row: {:?}", row);
            continue;
        }

        // Only the first three columns matter.
        let email = record.get(0).unwrap_or("").to_string();
        let password = record.get(1).unwrap_or("").to_string();
        let username = record.get(2).unwrap_or("").to_string();

        accounts.push(AccountRecord::new(email, password, username));
    }

    log::debug!("Loaded {} accounts from {}", accounts.len(), path.display());
    Ok(accounts)
}

/// Expand a user-supplied path (tilde included) into something openable.
pub fn expand_path(raw: &str) -> String {
    shellexpand::tilde(raw).to_string()
}
