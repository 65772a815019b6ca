//! Timed hazards ("mechanics") owned by the phase machines
//!
//! This module provides:
//! - **Hazard**: the lifecycle contract every hazard kind implements
//! - **HazardRegistry**: dense, id-stable storage with a tick/sweep cycle
//! - One record type per hazard kind
//!
//! # Lifecycle
//!
//! 1. A phase machine spawns a record → registry assigns a stable id
//! 2. Each tick: `tick(dt)` advances lifetimes, the machine applies effects,
//!    then `sweep()` drops expired records
//! 3. Sub-phases (warning → active → expiring) are computed from `lifetime`
//!    on demand; no record stores its sub-phase

mod beam;
mod puddle;
mod pylon;
mod registry;
mod steam;
mod tile;
mod void;
mod worm;

pub use beam::{BeamPhase, LaserBeam};
pub use puddle::{Puddle, PuddlePhase};
pub use pylon::{Pylon, PylonPhase};
pub use registry::HazardRegistry;
pub use steam::SteamSample;
pub use tile::{FloorTile, TileDurations, TileGrid, TileState, TILE_GRID_SIZE};
pub use void::{GravityWell, VoidRift, VoidZone, ZonePhase};
pub use worm::WormChain;

/// Stable identifier for a hazard record, unique within its registry.
pub type HazardId = u64;

/// Lifecycle contract shared by every hazard kind.
pub trait Hazard {
    fn id(&self) -> HazardId;

    /// Seconds since spawn
    fn lifetime(&self) -> f64;

    /// Advance the record's clock (and any continuous motion) by `dt`.
    fn advance(&mut self, dt: f64);

    /// Whether the next sweep should drop this record.
    fn is_expired(&self) -> bool;
}
