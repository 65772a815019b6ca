//! Shared world state the encounter reads and writes each tick
//!
//! The world is owned by the host game loop and passed by `&mut` into the
//! encounter controller, which in turn hands it to exactly one phase machine.
//! Coordinates are y-up: `max.y` is the top edge of the arena.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bosses::BossArchetype;

pub type EntityId = u64;

/// The player avatar.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: DVec2,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
}

impl Player {
    pub fn new(position: DVec2, max_health: f64) -> Self {
        Self {
            position,
            radius: 16.0,
            health: max_health,
            max_health,
        }
    }

    /// Subtract damage, saturating at zero. Non-finite or non-positive
    /// amounts are ignored.
    pub fn apply_damage(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.health = (self.health - amount).max(0.0);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Axis-aligned arena rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl ArenaBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            min: DVec2::ZERO,
            max: DVec2::new(width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the largest circle centered in the arena.
    pub fn inscribed_radius(&self) -> f64 {
        self.width().min(self.height()) * 0.5
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Clamp a circle of `radius` so it lies fully inside the arena.
    pub fn clamp(&self, point: DVec2, radius: f64) -> DVec2 {
        let lo = self.min + DVec2::splat(radius);
        let hi = self.max - DVec2::splat(radius);
        // An arena smaller than the circle collapses to its center
        if lo.x > hi.x || lo.y > hi.y {
            return self.center();
        }
        point.clamp(lo, hi)
    }

    /// Boss spawn point: horizontally centered, in the top quarter.
    pub fn boss_spawn_point(&self) -> DVec2 {
        DVec2::new(self.center().x, self.max.y - self.height() * 0.25)
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self::new(1200.0, 1200.0)
    }
}

/// A world entity. Only the boss is simulated by this crate; other entities
/// are carried through untouched.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub position: DVec2,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
    pub speed: f64,
    /// Body contact damage per second, already scaled by difficulty. Read by
    /// the host's world collision; phase machine hazards use `damage_scale`.
    pub damage: f64,
    /// Difficulty damage multiplier, applied to every hazard this boss owns
    pub damage_scale: f64,
    pub is_boss: bool,
    /// Phase machine that owns this boss (`None` = no special AI)
    pub archetype: Option<BossArchetype>,
    pub is_invulnerable: bool,
    pub is_dead: bool,
}

impl Entity {
    pub fn hp_fraction(&self) -> f64 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Apply damage unless invulnerable. Returns the amount actually dealt.
    pub fn apply_damage(&mut self, amount: f64) -> f64 {
        if self.is_dead || self.is_invulnerable || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let dealt = amount.min(self.health);
        self.health -= dealt;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.is_dead = true;
        }
        dealt
    }

    pub fn is_living_boss(&self) -> bool {
        self.is_boss && !self.is_dead
    }
}

/// A projectile simulated by the host's weapon system. The encounter only
/// tests projectiles against hazards it owns (pylons, body segments).
#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: DVec2,
    pub radius: f64,
    pub damage: f64,
    pub piercing: bool,
    pub alive: bool,
}

impl Projectile {
    pub fn new(position: DVec2, radius: f64, damage: f64) -> Self {
        Self {
            position,
            radius,
            damage,
            piercing: false,
            alive: true,
        }
    }

    /// Consume the projectile after a hit (piercing projectiles survive).
    pub fn on_hit(&mut self) {
        if !self.piercing {
            self.alive = false;
        }
    }
}

/// World state shared between the host loop and the encounter.
#[derive(Debug)]
pub struct WorldState {
    pub player: Player,
    pub arena: ArenaBounds,
    pub entities: Vec<Entity>,
    pub projectiles: Vec<Projectile>,
    pub rng: StdRng,
    /// Safe radius around the arena center published by an arena-shrink
    /// mechanic; world collision damages a player outside it
    pub safe_radius: Option<f64>,
    pub game_over: bool,
    pub victory: bool,
    /// Simulation ticks completed
    pub tick: u64,
    /// Simulated seconds elapsed
    pub elapsed: f64,
    next_entity_id: EntityId,
}

impl WorldState {
    pub fn new(arena: ArenaBounds) -> Self {
        Self::with_seed(arena, 0x5EED)
    }

    /// Deterministic world: all hazard placement randomness comes from `seed`.
    pub fn with_seed(arena: ArenaBounds, seed: u64) -> Self {
        let player_start = DVec2::new(arena.center().x, arena.min.y + arena.height() * 0.25);
        Self {
            player: Player::new(player_start, 100.0),
            arena,
            entities: Vec::new(),
            projectiles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            safe_radius: None,
            game_over: false,
            victory: false,
            tick: 0,
            elapsed: 0.0,
            next_entity_id: 1,
        }
    }

    /// Insert an entity, assigning it a fresh id.
    pub fn spawn_entity(&mut self, mut entity: Entity) -> EntityId {
        entity.id = self.next_entity_id;
        self.next_entity_id += 1;
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Index of the living boss entity, if any.
    pub fn living_boss_index(&self) -> Option<usize> {
        self.entities.iter().position(Entity::is_living_boss)
    }

    pub fn living_boss(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_living_boss())
    }

    pub fn living_boss_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.is_living_boss())
    }

    /// Drop dead boss entities from the collection.
    pub fn remove_dead_bosses(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !(e.is_boss && e.is_dead));
        before - self.entities.len()
    }

    /// Drop consumed projectiles.
    pub fn prune_projectiles(&mut self) {
        self.projectiles.retain(|p| p.alive);
    }

    /// Uniform sample in `[min, max)`; returns `min` for an empty or invalid range.
    pub fn random_range(&mut self, min: f64, max: f64) -> f64 {
        if !(max > min) || !min.is_finite() || !max.is_finite() {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Random unit-disc offset scaled by `radius`.
    pub fn random_offset(&mut self, radius: f64) -> DVec2 {
        if !(radius > 0.0) {
            return DVec2::ZERO;
        }
        let angle = self.random_range(0.0, std::f64::consts::TAU);
        let dist = radius * self.random_range(0.0, 1.0).sqrt();
        DVec2::new(angle.cos(), angle.sin()) * dist
    }

    /// Move the player by `velocity * dt` and keep them inside the arena.
    pub fn push_player(&mut self, velocity: DVec2, dt: f64) {
        if !velocity.is_finite() || !dt.is_finite() {
            return;
        }
        let moved = self.player.position + velocity * dt;
        self.player.position = self.arena.clamp(moved, self.player.radius);
    }
}
