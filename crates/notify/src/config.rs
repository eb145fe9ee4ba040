use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::NotifyError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Everything a run needs. An empty TOML document yields the defaults, which
/// reproduce the fixed batch job: inputs and artifact in the working
/// directory, mail through the corporate relay on port 25.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    pub structured_input: PathBuf,
    pub tabular_input: PathBuf,
    pub output_artifact: PathBuf,
    pub mail_relay_host: String,
    pub mail_relay_port: u16,
    pub sender_address: String,
    /// Domain used when an owner address has to be derived from a name.
    pub owner_domain: String,
    pub stale_days_threshold: i64,
    /// Date staleness is measured against. `None` means today (local).
    pub reference_date: Option<NaiveDate>,
    pub user_column: String,
    pub hostname_column: String,
    pub delivery: DeliveryConfig,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            structured_input: PathBuf::from("ldd_vdi_data.json"),
            tabular_input: PathBuf::from("1000158532.jpg.csv"),
            output_artifact: PathBuf::from("ldd_cleanup_emails.txt"),
            mail_relay_host: "mailrelay.troweprice.com".into(),
            mail_relay_port: 25,
            sender_address: "no-reply@troweprice.com".into(),
            owner_domain: "troweprice.com".into(),
            stale_days_threshold: 14,
            reference_date: None,
            user_column: "User".into(),
            hostname_column: "Hostname List".into(),
            delivery: DeliveryConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Delivery selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliveryConfig {
    pub structured: StructuredDelivery,
    pub tabular: TabularDelivery,
}

/// Where host reminders from the structured export go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuredDelivery {
    #[default]
    Mail,
    Print,
}

/// Where assignment reminders from the tabular export go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabularDelivery {
    #[default]
    Artifact,
    Print,
}

impl std::fmt::Display for StructuredDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mail => write!(f, "mail"),
            Self::Print => write!(f, "print"),
        }
    }
}

impl std::fmt::Display for TabularDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Artifact => write!(f, "artifact"),
            Self::Print => write!(f, "print"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl NotifyConfig {
    pub fn from_toml(input: &str) -> Result<Self, NotifyError> {
        let config: NotifyConfig =
            toml::from_str(input).map_err(|e| NotifyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file. Relative paths inside it are
    /// taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, NotifyError> {
        let input = std::fs::read_to_string(path).map_err(|e| NotifyError::io(path, e))?;
        let mut config = Self::from_toml(&input)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base_dir);
        Ok(config)
    }

    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for path in [
            &mut self.structured_input,
            &mut self.tabular_input,
            &mut self.output_artifact,
        ] {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }

    pub fn validate(&self) -> Result<(), NotifyError> {
        if self.mail_relay_host.trim().is_empty() {
            return Err(NotifyError::ConfigValidation(
                "mail_relay_host must not be empty".into(),
            ));
        }
        if self.mail_relay_port == 0 {
            return Err(NotifyError::ConfigValidation(
                "mail_relay_port must be non-zero".into(),
            ));
        }
        if !self.sender_address.contains('@') {
            return Err(NotifyError::ConfigValidation(format!(
                "sender_address '{}' is not an email address",
                self.sender_address
            )));
        }
        if self.owner_domain.trim().is_empty() {
            return Err(NotifyError::ConfigValidation(
                "owner_domain must not be empty".into(),
            ));
        }
        if self.stale_days_threshold < 0 {
            return Err(NotifyError::ConfigValidation(format!(
                "stale_days_threshold must be >= 0, got {}",
                self.stale_days_threshold
            )));
        }
        for (key, value) in [
            ("user_column", &self.user_column),
            ("hostname_column", &self.hostname_column),
        ] {
            if value.trim().is_empty() {
                return Err(NotifyError::ConfigValidation(format!(
                    "{key} must not be empty"
                )));
            }
        }
        Ok(())
    }

    pub fn relay(&self) -> String {
        format!("{}:{}", self.mail_relay_host, self.mail_relay_port)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
