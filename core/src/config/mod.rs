//! Balance configuration
//!
//! The config types themselves live in `bossfight-types`; this module loads,
//! merges, exports and validates them, and maps boss ids to phase machines.

mod classify;
mod error;
mod loader;

pub use classify::classify_boss_id;
pub use error::ConfigError;
pub use loader::{
    ConfigWarning, export_balance_config, load_balance_config, load_balance_dir, save_balance_config,
    validate_balance_config,
};

use bossfight_types::{BalanceConfig, BossDefinition};

use crate::bosses::BossArchetype;

/// Resolve the definition for `boss_id`: exact id first, then the archetype's
/// default entry, then the hardcoded fallback.
pub fn resolve_definition(
    config: &BalanceConfig,
    boss_id: &str,
    archetype: Option<BossArchetype>,
) -> BossDefinition {
    if let Some(def) = config.boss(boss_id) {
        return def.clone();
    }
    if let Some(def) = archetype.and_then(|a| config.boss(a.config_key())) {
        tracing::debug!(boss_id, archetype = ?archetype, "Using archetype default definition");
        return def.clone();
    }
    tracing::warn!(boss_id, "No balance entry for boss, using fallback stats");
    BossDefinition::fallback()
}
