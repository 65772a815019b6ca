//! Cycling floor tiles
//!
//! The arena floor is split into a fixed `TILE_GRID_SIZE` x `TILE_GRID_SIZE`
//! grid. Each tile runs its own `Normal → Warning → Lava → Safe → Normal`
//! cycle, staggered by a per-tile offset. A tile's state is always a pure
//! function of `lifetime + offset`; `advance` caps the step so a single tick
//! can cross at most one state boundary.

use glam::DVec2;
use serde::Serialize;

use super::{Hazard, HazardId, HazardRegistry};

pub const TILE_GRID_SIZE: usize = 4;

/// Shortest span any tile state may have, in seconds.
pub const MIN_STATE_DURATION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Normal,
    Warning,
    Lava,
    Safe,
}

impl TileState {
    /// The only legal successor.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Warning,
            Self::Warning => Self::Lava,
            Self::Lava => Self::Safe,
            Self::Safe => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDurations {
    pub normal: f64,
    pub warning: f64,
    pub lava: f64,
    pub safe: f64,
}

impl TileDurations {
    /// Every span raised to at least `MIN_STATE_DURATION`, so no state can
    /// be stepped over.
    pub fn clamped(self) -> Self {
        let floor = |v: f64| if v >= MIN_STATE_DURATION { v } else { MIN_STATE_DURATION };
        Self {
            normal: floor(self.normal),
            warning: floor(self.warning),
            lava: floor(self.lava),
            safe: floor(self.safe),
        }
    }

    pub fn cycle(&self) -> f64 {
        self.normal + self.warning + self.lava + self.safe
    }

    fn duration_of(&self, state: TileState) -> f64 {
        match state {
            TileState::Normal => self.normal,
            TileState::Warning => self.warning,
            TileState::Lava => self.lava,
            TileState::Safe => self.safe,
        }
    }

    /// State at cycle clock `t`, plus seconds until the next boundary.
    pub fn state_at(&self, t: f64) -> (TileState, f64) {
        let cycle = self.cycle();
        if !(cycle > 0.0) {
            return (TileState::Normal, f64::INFINITY);
        }
        let mut local = t.rem_euclid(cycle);
        let mut state = TileState::Normal;
        for _ in 0..4 {
            let span = self.duration_of(state);
            if local < span {
                return (state, span - local);
            }
            local -= span;
            state = state.next();
        }
        // Float residue at the very end of the cycle
        (TileState::Normal, self.normal)
    }
}

#[derive(Debug, Clone)]
pub struct FloorTile {
    pub id: HazardId,
    /// Row-major grid index
    pub index: usize,
    pub min: DVec2,
    pub max: DVec2,
    pub lifetime: f64,
    /// Stagger added to `lifetime` before sampling the cycle
    pub offset: f64,
    pub durations: TileDurations,
    pub lava_dps: f64,
}

impl FloorTile {
    pub fn state(&self) -> TileState {
        self.durations.state_at(self.lifetime + self.offset).0
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

impl Hazard for FloorTile {
    fn id(&self) -> HazardId {
        self.id
    }

    fn lifetime(&self) -> f64 {
        self.lifetime
    }

    fn advance(&mut self, dt: f64) {
        if !(dt > 0.0) {
            return;
        }
        let (state, remaining) = self.durations.state_at(self.lifetime + self.offset);
        // Land no further than just inside the following state
        let next_span = self.durations.duration_of(state.next());
        let cap = remaining + next_span * 0.999;
        self.lifetime += dt.min(cap);
    }

    fn is_expired(&self) -> bool {
        false
    }
}

/// The full floor grid for one arena.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tiles: HazardRegistry<FloorTile>,
    origin: DVec2,
    cell: DVec2,
}

impl TileGrid {
    /// Lay out the grid over `min..max`. `offset` is called once per tile.
    pub fn new(
        min: DVec2,
        max: DVec2,
        durations: TileDurations,
        lava_dps: f64,
        mut offset: impl FnMut(usize) -> f64,
    ) -> Self {
        let clamped = durations.clamped();
        if clamped != durations {
            tracing::warn!(?durations, "Tile state durations below minimum, clamping");
        }
        let durations = clamped;
        let cell = (max - min) / TILE_GRID_SIZE as f64;
        let mut tiles = HazardRegistry::new();
        for index in 0..TILE_GRID_SIZE * TILE_GRID_SIZE {
            let col = index % TILE_GRID_SIZE;
            let row = index / TILE_GRID_SIZE;
            let tile_min = min + DVec2::new(col as f64 * cell.x, row as f64 * cell.y);
            let tile_offset = offset(index);
            tiles.spawn(|id| FloorTile {
                id,
                index,
                min: tile_min,
                max: tile_min + cell,
                lifetime: 0.0,
                offset: tile_offset,
                durations,
                lava_dps,
            });
        }
        Self {
            tiles,
            origin: min,
            cell,
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.tiles.tick(dt);
    }

    /// Grid index under `point`, or `None` outside the grid.
    pub fn tile_at(&self, point: DVec2) -> Option<usize> {
        if !(self.cell.x > 0.0 && self.cell.y > 0.0) || !point.is_finite() {
            return None;
        }
        let local = (point - self.origin) / self.cell;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (col, row) = (local.x as usize, local.y as usize);
        if col >= TILE_GRID_SIZE || row >= TILE_GRID_SIZE {
            return None;
        }
        Some(row * TILE_GRID_SIZE + col)
    }

    pub fn tile(&self, index: usize) -> Option<&FloorTile> {
        self.tiles.at(index)
    }

    pub fn state_of(&self, index: usize) -> Option<TileState> {
        self.tile(index).map(FloorTile::state)
    }

    pub fn tiles(&self) -> &[FloorTile] {
        self.tiles.as_slice()
    }

    /// Lava damage over `dt` for a point standing on the grid.
    pub fn damage_at(&self, point: DVec2, dt: f64) -> f64 {
        match self.tile_at(point).and_then(|i| self.tile(i)) {
            Some(tile) if tile.state() == TileState::Lava => tile.lava_dps * dt,
            _ => 0.0,
        }
    }
}
