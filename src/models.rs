/// One MEGA account parsed from a CSV row: email, password, username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl AccountRecord {
    pub fn new(email: String, password: String, username: String) -> Self {
        AccountRecord {
            email,
            password,
            username,
        }
    }

    /// Name of the rclone remote configured for this account.
    pub fn remote_name(&self) -> String {
        format!("mega_{}", self.username)
    }
}

/// Result of checking a configured remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// rclone reached the account.
    Active,
    /// rclone ran but the account did not respond properly.
    Inactive,
    /// rclone itself could not be executed.
    Error,
}

impl AccountStatus {
    pub fn label(&self) -> &str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Error => "error",
        }
    }
}

/// Per-batch counters reported after `create` finishes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CreateSummary {
    pub created: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl CreateSummary {
    pub fn total(&self) -> usize {
        self.created + self.failed + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_name_prefix() {
        let record = AccountRecord::new(
            "a@x.com".to_string(),
            "p1".to_string(),
            "u1".to_string(),
        );
        assert_eq!(record.remote_name(), "mega_u1");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(AccountStatus::Active.label(), "active");
        assert_eq!(AccountStatus::Inactive.label(), "inactive");
        assert_eq!(AccountStatus::Error.label(), "error");
    }

    #[test]
    fn test_summary_total() {
        let summary = CreateSummary {
            created: 2,
            failed: 1,
            skipped: 3,
        };
        assert_eq!(summary.total(), 6);
    }
}
