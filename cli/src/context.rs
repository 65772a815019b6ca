//! Persisted CLI defaults and the balance config they point at.

use std::path::{Path, PathBuf};

use bossfight_core::config::{load_balance_dir, validate_balance_config};
use bossfight_types::{BalanceConfig, DifficultyProfile};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "bossfight";
const CONFIG_NAME: &str = "settings";

/// Defaults used when a command-line flag is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    pub seed: u64,
    pub threat_level: u32,
    pub tick_rate: f64,
    /// Directory of balance TOML files; built-in defaults when unset
    pub balance_dir: Option<PathBuf>,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            seed: 1,
            threat_level: 0,
            tick_rate: 60.0,
            balance_dir: None,
        }
    }
}

impl CliSettings {
    pub fn load() -> Self {
        confy::load(APP_NAME, CONFIG_NAME).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load settings, using defaults");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), String> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(|e| format!("failed to save settings: {e}"))
    }

    pub fn path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }
}

/// Everything a command needs: persisted defaults plus the loaded balance.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub settings: CliSettings,
    pub balance: BalanceConfig,
}

impl CliContext {
    /// Load settings, then the balance directory (`override_dir` wins over the
    /// persisted one). Validation warnings are logged, not fatal.
    pub fn load(override_dir: Option<&Path>) -> Result<Self, String> {
        let settings = CliSettings::load();
        let balance = match override_dir.or(settings.balance_dir.as_deref()) {
            Some(dir) => load_balance_dir(dir).map_err(|e| error_chain(&e))?,
            None => BalanceConfig::default(),
        };
        for warning in validate_balance_config(&balance) {
            tracing::warn!(%warning, "Suspicious balance value");
        }
        Ok(Self { settings, balance })
    }

    /// Difficulty profile for a threat level; level 0 runs unscaled.
    pub fn difficulty(&self, threat_level: u32) -> Option<DifficultyProfile> {
        (threat_level > 0).then(|| DifficultyProfile::from_threat_level(threat_level, &self.balance.threat))
    }
}

/// Render an error with its source chain on one line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_zero_is_unscaled() {
        let ctx = CliContext {
            settings: CliSettings::default(),
            balance: BalanceConfig::default(),
        };
        assert_eq!(ctx.difficulty(0), None);
        let profile = ctx.difficulty(2).expect("scaled profile");
        assert!(profile.health_multiplier > 1.0);
    }

    #[test]
    fn settings_fill_missing_fields() {
        let settings: CliSettings = toml::from_str("seed = 9\n").expect("valid toml");
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.tick_rate, 60.0);
        assert_eq!(settings.balance_dir, None);
    }
}
