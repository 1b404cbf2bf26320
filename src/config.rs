//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Collection the finished employee record is written to.
pub const DEFAULT_COLLECTION: &str = "employees";

/// Onboarding flow configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Document-store collection for employee records.
    pub collection: String,
    /// Validate every step on submit instead of only the current one.
    pub validate_all_steps_on_submit: bool,
    /// Buffer size of the snapshot broadcast channel.
    pub snapshot_capacity: usize,
    /// Path of the libSQL database used by the binary.
    pub db_path: PathBuf,
    /// Fixed identity used by the binary. `None` means not logged in.
    pub user_id: Option<String>,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            validate_all_steps_on_submit: false,
            snapshot_capacity: 64,
            db_path: PathBuf::from("./data/hrms.db"),
            user_id: None,
        }
    }
}

impl OnboardingConfig {
    /// Build a config from `HRMS_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(collection) = lookup("HRMS_COLLECTION").filter(|v| !v.trim().is_empty()) {
            config.collection = collection.trim().to_string();
        }

        if let Some(raw) = lookup("HRMS_VALIDATE_ALL_ON_SUBMIT") {
            config.validate_all_steps_on_submit = parse_bool("HRMS_VALIDATE_ALL_ON_SUBMIT", &raw)?;
        }

        if let Some(raw) = lookup("HRMS_SNAPSHOT_CAPACITY") {
            let capacity: usize = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "HRMS_SNAPSHOT_CAPACITY".to_string(),
                message: format!("{e}"),
            })?;
            if capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "HRMS_SNAPSHOT_CAPACITY".to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
            config.snapshot_capacity = capacity;
        }

        if let Some(path) = lookup("HRMS_DB_PATH").filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        config.user_id = lookup("HRMS_USER_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(config)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
