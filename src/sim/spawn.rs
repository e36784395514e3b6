//! Spawn director: when and what to spawn
//!
//! Each spawn kind carries a probability weight that grows every tick and a
//! minimum horizontal spacing that shrinks toward a floor. Once every kind
//! has room at the right screen edge, exactly one instance is spawned.

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_pcg::Pcg32;

use super::hazard::{Hazard, HazardKind, PowerUp};
use crate::consts::SCREEN_WIDTH;

/// Spacing shrink per tick
pub const SPACING_DECAY: f32 = 0.005;
/// Shields only appear once the run has lasted this long
pub const POWER_UP_SCORE_GATE: u64 = 150;
/// The boss only appears after this score
pub const BOSS_SCORE_GATE: u64 = 800;

/// Everything the director can spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    Ground,
    Flying,
    Boss,
    Shield,
}

/// Per-kind tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRule {
    pub initial_weight: f32,
    pub weight_increment: f32,
    pub initial_spacing: f32,
    pub spacing_floor: f32,
}

impl SpawnKind {
    pub const ALL: [SpawnKind; 4] = [
        SpawnKind::Ground,
        SpawnKind::Flying,
        SpawnKind::Boss,
        SpawnKind::Shield,
    ];

    fn index(self) -> usize {
        match self {
            SpawnKind::Ground => 0,
            SpawnKind::Flying => 1,
            SpawnKind::Boss => 2,
            SpawnKind::Shield => 3,
        }
    }

    pub fn rule(self) -> SpawnRule {
        match self {
            SpawnKind::Ground => SpawnRule {
                initial_weight: 2.0,
                weight_increment: 0.0001,
                initial_spacing: 750.0,
                spacing_floor: 250.0,
            },
            SpawnKind::Flying => SpawnRule {
                initial_weight: 1.0,
                weight_increment: 0.0001,
                initial_spacing: 750.0,
                spacing_floor: 250.0,
            },
            SpawnKind::Boss => SpawnRule {
                initial_weight: 0.25,
                weight_increment: 0.00005,
                initial_spacing: 750.0,
                spacing_floor: 250.0,
            },
            SpawnKind::Shield => SpawnRule {
                initial_weight: 0.5,
                weight_increment: 0.00005,
                initial_spacing: 750.0,
                spacing_floor: 250.0,
            },
        }
    }

    /// Hazard kind backing this spawn kind (`None` for power-ups)
    pub fn hazard_kind(self) -> Option<HazardKind> {
        match self {
            SpawnKind::Ground => Some(HazardKind::GroundObstacle),
            SpawnKind::Flying => Some(HazardKind::FlyingObstacle),
            SpawnKind::Boss => Some(HazardKind::BossSwoop),
            SpawnKind::Shield => None,
        }
    }
}

/// Session facts the gates depend on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnContext {
    pub score: u64,
    pub player_has_shield: bool,
    pub boss_active: bool,
}

/// Escalating spawn weights and spacing
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDirector {
    weights: [f32; 4],
    spacing: [f32; 4],
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnDirector {
    pub fn new() -> Self {
        let mut weights = [0.0; 4];
        let mut spacing = [0.0; 4];
        for kind in SpawnKind::ALL {
            let rule = kind.rule();
            debug_assert!(rule.initial_weight > 0.0);
            debug_assert!(rule.spacing_floor > 0.0 && rule.spacing_floor <= rule.initial_spacing);
            weights[kind.index()] = rule.initial_weight;
            spacing[kind.index()] = rule.initial_spacing;
        }
        Self { weights, spacing }
    }

    pub fn weight(&self, kind: SpawnKind) -> f32 {
        self.weights[kind.index()]
    }

    pub fn min_spacing(&self, kind: SpawnKind) -> f32 {
        self.spacing[kind.index()]
    }

    /// Grow every weight and shrink every spacing by one tick's worth
    pub fn escalate(&mut self) {
        for kind in SpawnKind::ALL {
            let rule = kind.rule();
            let i = kind.index();
            self.weights[i] += rule.weight_increment;
            if self.spacing[i] > rule.spacing_floor {
                self.spacing[i] = (self.spacing[i] - SPACING_DECAY).max(rule.spacing_floor);
            }
        }
    }

    /// No live instance of `kind` is within its minimum spacing of the spawn edge
    pub fn space_available(&self, kind: SpawnKind, hazards: &[Hazard], power_ups: &[PowerUp]) -> bool {
        let spacing = self.min_spacing(kind);
        let has_room = |right_edge: f32| SCREEN_WIDTH - right_edge >= spacing;
        match kind.hazard_kind() {
            Some(hazard_kind) => hazards
                .iter()
                .filter(|h| h.kind == hazard_kind)
                .all(|h| has_room(h.right_edge())),
            None => power_ups.iter().all(|p| has_room(p.right_edge())),
        }
    }

    /// Whether the gates allow `kind` right now
    pub fn is_allowed(kind: SpawnKind, ctx: &SpawnContext) -> bool {
        match kind {
            SpawnKind::Ground | SpawnKind::Flying => true,
            SpawnKind::Boss => ctx.score >= BOSS_SCORE_GATE && !ctx.boss_active,
            SpawnKind::Shield => ctx.score >= POWER_UP_SCORE_GATE && !ctx.player_has_shield,
        }
    }

    /// Weighted pick over all kinds; a gated pick becomes `Ground`
    pub fn choose(&self, ctx: &SpawnContext, rng: &mut Pcg32) -> SpawnKind {
        let picked = match WeightedIndex::new(self.weights) {
            Ok(dist) => SpawnKind::ALL[dist.sample(rng)],
            Err(err) => {
                debug_assert!(false, "invalid spawn weights {:?}: {err}", self.weights);
                SpawnKind::Ground
            }
        };
        if Self::is_allowed(picked, ctx) {
            picked
        } else {
            SpawnKind::Ground
        }
    }

    /// One director tick: escalate, then pick a kind if every kind has room
    pub fn step(
        &mut self,
        ctx: &SpawnContext,
        hazards: &[Hazard],
        power_ups: &[PowerUp],
        rng: &mut Pcg32,
    ) -> Option<SpawnKind> {
        self.escalate();
        let all_clear = SpawnKind::ALL
            .iter()
            .all(|&kind| self.space_available(kind, hazards, power_ups));
        all_clear.then(|| self.choose(ctx, rng))
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
