pub mod bosses;
pub mod config;
pub mod difficulty;
pub mod encounter;
pub mod geometry;
pub mod hazard;
pub mod phase;
pub mod signal;
pub mod snapshot;
pub mod world;

// Re-exports for convenience
pub use bosses::{
    ActiveBoss, BossArchetype, CombatMode, ForceField, Phase4SubState, check_mechanics_damage, vacuum_force,
    wind_force,
};
pub use config::{
    ConfigError, ConfigWarning, classify_boss_id, export_balance_config, load_balance_config, load_balance_dir,
    resolve_definition, save_balance_config, validate_balance_config,
};
pub use encounter::EncounterController;
pub use hazard::{Hazard, HazardId, HazardRegistry};
pub use phase::{PhaseChange, PhaseTracker};
pub use signal::{EncounterSignal, SignalHandler};
pub use snapshot::{BossVitals, EncounterSnapshot, HazardView};
pub use world::{ArenaBounds, Entity, EntityId, Player, Projectile, WorldState};
