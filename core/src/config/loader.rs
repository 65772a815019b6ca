//! Balance config loading, export and validation
//!
//! A balance directory holds any number of TOML files. Files are merged in
//! name order over the built-in defaults, key by key: a file only overrides
//! the keys it names, and tables (tuning blocks, boss entries, boss stats)
//! merge recursively. Arrays such as phase trigger lists replace as a whole.

use std::fs;
use std::path::{Path, PathBuf};

use bossfight_types::{BalanceConfig, PhaseTrigger};
use hashbrown::HashMap;

use super::ConfigError;

/// Load a single balance file. Missing fields take their defaults.
pub fn load_balance_config(path: &Path) -> Result<BalanceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let config: BalanceConfig = toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    check_definitions(&config, path)?;
    Ok(config)
}

/// Load and merge every `*.toml` file in `dir` (non-recursive).
///
/// A missing directory yields the built-in defaults.
pub fn load_balance_dir(dir: &Path) -> Result<BalanceConfig, ConfigError> {
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "Balance directory not found, using defaults");
        return Ok(BalanceConfig::default());
    }

    let entries = fs::read_dir(dir).map_err(|source| ConfigError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();

    let mut merged = toml::Table::try_from(BalanceConfig::default())?;
    let mut sources: HashMap<String, PathBuf> = HashMap::new();
    for path in files {
        let table = read_table(&path)?;
        if let Some(toml::Value::Table(bosses)) = table.get("bosses") {
            for id in bosses.keys() {
                if let Some(previous) = sources.insert(id.clone(), path.clone()) {
                    tracing::warn!(
                        boss_id = %id,
                        previous = %previous.display(),
                        file = %path.display(),
                        "Boss definition overridden"
                    );
                }
            }
        }
        merge_tables(&mut merged, table);
        tracing::debug!(file = %path.display(), "Loaded balance file");
    }

    let config: BalanceConfig = merged.try_into().map_err(|source| ConfigError::ParseToml {
        path: dir.to_path_buf(),
        source,
    })?;
    check_definitions(&config, dir)?;
    Ok(config)
}

/// Parse one file as a raw table, rejecting it early if it would not load on
/// its own.
fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    };
    let table: toml::Table = toml::from_str(&content).map_err(parse_err)?;
    let config: BalanceConfig = table.clone().try_into().map_err(parse_err)?;
    check_definitions(&config, path)?;
    Ok(table)
}

/// Recursive table merge; `overlay` wins on every key it holds.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Render a config as TOML, for keeping external simulators in sync.
pub fn export_balance_config(config: &BalanceConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Write a config to `path` as TOML.
pub fn save_balance_config(config: &BalanceConfig, path: &Path) -> Result<(), ConfigError> {
    let content = export_balance_config(config)?;
    fs::write(path, content).map_err(|source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Hard errors: definitions the simulation cannot run at all.
fn check_definitions(config: &BalanceConfig, path: &Path) -> Result<(), ConfigError> {
    for (id, def) in &config.bosses {
        if !(def.stats.base_health > 0.0) {
            return Err(ConfigError::InvalidDefinition {
                path: path.to_path_buf(),
                reason: format!("boss '{id}' has non-positive base_health"),
            });
        }
        for trigger in &def.phases {
            if let PhaseTrigger::HpBelow { fraction } = trigger
                && !(0.0..=1.0).contains(fraction)
            {
                return Err(ConfigError::InvalidDefinition {
                    path: path.to_path_buf(),
                    reason: format!("boss '{id}' has hp_below fraction {fraction} outside 0..=1"),
                });
            }
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════════════

/// A tuning value the simulation will run with, but probably not as intended.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    /// Dotted key, e.g. `cyberboss.laser_interval`
    pub key: String,
    pub message: String,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Report intervals and durations that would stall or disable a mechanic.
/// These are guarded at runtime; the report exists so balance edits fail loudly.
pub fn validate_balance_config(config: &BalanceConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let mut positive = |key: &str, value: f64| {
        if !(value > 0.0) {
            warnings.push(ConfigWarning {
                key: key.to_string(),
                message: format!("must be positive, got {value}"),
            });
        }
    };

    let c = &config.cyberboss;
    positive("cyberboss.mode_switch_interval", c.mode_switch_interval);
    positive("cyberboss.puddle_interval_min", c.puddle_interval_min);
    positive("cyberboss.puddle_max_lifetime", c.puddle_max_lifetime);
    positive("cyberboss.laser_interval", c.laser_interval);
    positive("cyberboss.laser_active_duration", c.laser_active_duration);

    let v = &config.void_harbinger;
    positive("void_harbinger.zone_interval", v.zone_interval);
    positive("void_harbinger.zone_max_lifetime", v.zone_max_lifetime);
    positive("void_harbinger.pylon_health", v.pylon_health);
    positive("void_harbinger.well_min_distance", v.well_min_distance);

    let o = &config.overclocker;
    positive("overclocker.tile_normal_duration", o.tile_normal_duration);
    positive("overclocker.tile_warning_duration", o.tile_warning_duration);
    positive("overclocker.tile_lava_duration", o.tile_lava_duration);
    positive("overclocker.tile_safe_duration", o.tile_safe_duration);
    positive("overclocker.steam_interval", o.steam_interval);
    positive("overclocker.wind_softening", o.wind_softening);
    positive("overclocker.vacuum_softening", o.vacuum_softening);
    positive("overclocker.suction_interval", o.suction_interval);

    let w = &config.trojan_wyrm;
    positive("trojan_wyrm.segment_spacing", w.segment_spacing);
    positive("trojan_wyrm.ghost_toggle_interval", w.ghost_toggle_interval);
    positive("trojan_wyrm.aim_duration", w.aim_duration);
    positive("trojan_wyrm.dash_duration", w.dash_duration);

    if c.puddle_interval_max < c.puddle_interval_min {
        warnings.push(ConfigWarning {
            key: "cyberboss.puddle_interval_max".to_string(),
            message: "smaller than puddle_interval_min".to_string(),
        });
    }
    if o.suction_duration > o.suction_interval {
        warnings.push(ConfigWarning {
            key: "overclocker.suction_duration".to_string(),
            message: "longer than suction_interval; suction never pauses".to_string(),
        });
    }

    for (id, def) in &config.bosses {
        let mut last = f64::INFINITY;
        for trigger in &def.phases {
            if let PhaseTrigger::HpBelow { fraction } = *trigger {
                if fraction >= last {
                    warnings.push(ConfigWarning {
                        key: format!("bosses.{id}.phases"),
                        message: "hp_below thresholds should be strictly decreasing".to_string(),
                    });
                }
                last = fraction;
            }
        }
    }

    warnings
}
