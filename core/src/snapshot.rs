//! Read-only view of an encounter for renderers.
//!
//! A snapshot is built after the tick completes and owns all of its data, so
//! a renderer can hold it across frames without borrowing the simulation.

use glam::DVec2;

use crate::bosses::{ActiveBoss, BossArchetype, CombatMode, ForceField, Phase4SubState};
use crate::hazard::{BeamPhase, PuddlePhase, PylonPhase, TileState, ZonePhase};
use crate::world::{Entity, WorldState};

#[derive(Debug, Clone, PartialEq)]
pub struct BossVitals {
    pub position: DVec2,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
    pub is_invulnerable: bool,
}

impl From<&Entity> for BossVitals {
    fn from(boss: &Entity) -> Self {
        Self {
            position: boss.position,
            radius: boss.radius,
            health: boss.health,
            max_health: boss.max_health,
            is_invulnerable: boss.is_invulnerable,
        }
    }
}

/// One drawable hazard with its derived sub-phase.
#[derive(Debug, Clone, PartialEq)]
pub enum HazardView {
    Puddle {
        id: u64,
        center: DVec2,
        radius: f64,
        phase: PuddlePhase,
    },
    Laser {
        id: u64,
        start: DVec2,
        end: DVec2,
        width: f64,
        phase: BeamPhase,
    },
    Zone {
        id: u64,
        center: DVec2,
        radius: f64,
        phase: ZonePhase,
    },
    Pylon {
        id: u64,
        position: DVec2,
        radius: f64,
        health_fraction: f64,
        phase: PylonPhase,
    },
    Rift {
        id: u64,
        start: DVec2,
        end: DVec2,
        width: f64,
    },
    Well {
        id: u64,
        center: DVec2,
        pull_radius: f64,
    },
    Blade {
        index: usize,
        start: DVec2,
        end: DVec2,
    },
    Tile {
        index: usize,
        min: DVec2,
        max: DVec2,
        state: TileState,
    },
    Steam {
        id: u64,
        position: DVec2,
        opacity: f64,
    },
    WormHead {
        worm_id: u64,
        position: DVec2,
        heading: f64,
    },
    Segment {
        worm_id: u64,
        index: usize,
        position: DVec2,
        radius: f64,
        ghost: bool,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EncounterSnapshot {
    pub tick: u64,
    pub elapsed: f64,
    pub archetype: Option<BossArchetype>,
    pub phase: u8,
    pub boss: Option<BossVitals>,
    pub player_position: DVec2,
    pub player_health: f64,
    pub hazards: Vec<HazardView>,

    pub is_invulnerable: bool,
    pub is_chainsaw_active: bool,
    pub combat_mode: Option<CombatMode>,
    pub is_suction_active: bool,
    pub phase4_sub_state: Option<Phase4SubState>,
    pub aim_line: Option<(DVec2, DVec2)>,
    pub energy_links: Vec<(DVec2, DVec2)>,
    /// Safe radius published by an arena-shrink mechanic
    pub arena_radius: Option<f64>,
    /// Wind/vacuum parameters, callable with any position pair
    pub forces: Option<ForceField>,

    pub game_over: bool,
    pub victory: bool,
}

impl EncounterSnapshot {
    pub fn capture(active: &ActiveBoss, world: &WorldState) -> Self {
        let boss = world.living_boss();
        let boss_position = boss.map_or(DVec2::ZERO, |b| b.position);
        let mut snapshot = Self {
            tick: world.tick,
            elapsed: world.elapsed,
            archetype: active.archetype(),
            phase: active.phase(),
            boss: boss.map(BossVitals::from),
            player_position: world.player.position,
            player_health: world.player.health,
            is_invulnerable: boss.is_some_and(|b| b.is_invulnerable),
            arena_radius: world.safe_radius,
            game_over: world.game_over,
            victory: world.victory,
            ..Self::default()
        };

        match active {
            ActiveBoss::None => {}
            ActiveBoss::Cyberboss(state) => {
                snapshot.is_chainsaw_active = state.is_chainsaw_active();
                snapshot.combat_mode = Some(state.mode);
                for p in state.puddles.iter() {
                    snapshot.hazards.push(HazardView::Puddle {
                        id: p.id,
                        center: p.center,
                        radius: p.radius,
                        phase: p.sub_phase(),
                    });
                }
                for l in state.lasers.iter() {
                    let (start, end) = l.endpoints(boss_position);
                    snapshot.hazards.push(HazardView::Laser {
                        id: l.id,
                        start,
                        end,
                        width: l.width(),
                        phase: l.sub_phase(),
                    });
                }
            }
            ActiveBoss::VoidHarbinger(state) => {
                snapshot.energy_links = state.energy_links(boss_position);
                for z in state.zones.iter() {
                    snapshot.hazards.push(HazardView::Zone {
                        id: z.id,
                        center: z.center,
                        radius: z.radius,
                        phase: z.sub_phase(),
                    });
                }
                for p in state.pylons.iter() {
                    snapshot.hazards.push(HazardView::Pylon {
                        id: p.id,
                        position: p.position,
                        radius: p.radius,
                        health_fraction: p.health_fraction(),
                        phase: p.sub_phase(),
                    });
                }
                for r in state.rifts.iter() {
                    let (start, end) = r.endpoints();
                    snapshot.hazards.push(HazardView::Rift {
                        id: r.id,
                        start,
                        end,
                        width: r.width,
                    });
                }
                for w in state.wells.iter() {
                    snapshot.hazards.push(HazardView::Well {
                        id: w.id,
                        center: w.center,
                        pull_radius: w.pull_radius,
                    });
                }
            }
            ActiveBoss::Overclocker(state) => {
                snapshot.is_suction_active = state.is_suction_active();
                snapshot.forces = Some(state.force_field());
                for (index, (start, end)) in state.blade_segments(boss_position).into_iter().enumerate() {
                    snapshot.hazards.push(HazardView::Blade { index, start, end });
                }
                if let Some(tiles) = &state.tiles {
                    for t in tiles.tiles() {
                        snapshot.hazards.push(HazardView::Tile {
                            index: t.index,
                            min: t.min,
                            max: t.max,
                            state: t.state(),
                        });
                    }
                }
                for s in state.steam.iter() {
                    snapshot.hazards.push(HazardView::Steam {
                        id: s.id,
                        position: s.position,
                        opacity: s.opacity(),
                    });
                }
            }
            ActiveBoss::TrojanWyrm(state) => {
                snapshot.phase4_sub_state = state.phase4_sub_state();
                snapshot.aim_line = state.aim_line();
                for worm in state.worms.iter() {
                    snapshot.hazards.push(HazardView::WormHead {
                        worm_id: worm.id,
                        position: worm.head,
                        heading: worm.heading,
                    });
                    for (index, position) in worm.segments.iter().copied().enumerate() {
                        snapshot.hazards.push(HazardView::Segment {
                            worm_id: worm.id,
                            index,
                            position,
                            radius: worm.segment_radius,
                            ghost: worm.is_ghost(index),
                        });
                    }
                }
            }
        }
        snapshot
    }

    /// Wind at an arbitrary position pair; zero when no force field is active.
    pub fn preview_wind(&self, player: DVec2, boss: DVec2) -> DVec2 {
        self.forces.map_or(DVec2::ZERO, |f| f.wind(player, boss))
    }

    /// Vacuum at an arbitrary position pair; zero when no force field is active.
    pub fn preview_vacuum(&self, player: DVec2, boss: DVec2) -> DVec2 {
        self.forces.map_or(DVec2::ZERO, |f| f.vacuum(player, boss))
    }

    pub fn count_hazards(&self, pred: impl Fn(&HazardView) -> bool) -> usize {
        self.hazards.iter().filter(|h| pred(h)).count()
    }
}
