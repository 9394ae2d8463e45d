use std::env;
use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::error::AllowListError;

pub const ALLOWED_EMAILS_VAR: &str = "ALLOWED_EMAILS";
pub const DEFAULT_ALLOWLIST_FILE: &str = "allowed_emails.txt";

/// Lower-cased email addresses permitted to use the tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    emails: Vec<String>,
}

impl AllowList {
    /// `ALLOWED_EMAILS` wins over the file. An unreadable file gives an empty list.
    pub fn load(path: &Path) -> Self {
        Self::from_sources(env::var(ALLOWED_EMAILS_VAR).ok(), path)
    }

    pub fn from_sources(env_value: Option<String>, path: &Path) -> Self {
        if let Some(value) = env_value.filter(|value| !value.is_empty()) {
            let list = Self::from_comma_separated(&value);
            info!("Loaded {} allowed emails from environment", list.len());
            return list;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let list = Self::from_file_contents(&contents);
                info!("Loaded {} allowed emails from {}", list.len(), path.display());
                list
            }
            Err(e) => {
                error!("❌ Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_comma_separated(value: &str) -> Self {
        Self::collect(value.split(','))
    }

    /// One address per line; blank lines and `#` comments are skipped.
    pub fn from_file_contents(contents: &str) -> Self {
        Self::collect(contents.lines().filter(|line| !line.trim().starts_with('#')))
    }

    fn collect<'a>(entries: impl Iterator<Item = &'a str>) -> Self {
        let emails = entries
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { emails }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn is_allowed(&self, email: &str) -> Result<bool, AllowListError> {
        if email.is_empty() {
            return Err(AllowListError::MissingEmail);
        }
        let email = email.to_lowercase();
        Ok(self.emails.iter().any(|allowed| *allowed == email))
    }
}
