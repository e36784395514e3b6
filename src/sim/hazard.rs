//! Scrolling obstacles and collectible shields
//!
//! Hazard kinds form a closed set; per-kind sizes, hitbox insets and
//! scripted motion are selected with a `match` on the kind.

use glam::Vec2;
use serde::Serialize;

use super::collision::{Inset, Rect};
use crate::consts::*;
use crate::lerp;

/// Single cactus sprite
pub const CACTUS_WIDTH: f32 = 34.0;
pub const CACTUS_HEIGHT: f32 = 70.0;
/// Largest cactus cluster
pub const MAX_CACTUS_CLUSTER: u32 = 3;

/// Flying obstacle sprite
pub const FLYER_WIDTH: f32 = 46.0;
pub const FLYER_HEIGHT: f32 = 40.0;

/// Boss is a flyer drawn at three times the size
pub const BOSS_SCALE: f32 = 3.0;
/// Cruising altitude of the boss (top of sprite)
pub const BOSS_CRUISE_Y: f32 = 10.0;
/// Lowest point of the swoop; low enough to hit a standing dino
pub const BOSS_SWOOP_Y: f32 = GROUND_Y - 175.0;
/// Left edge of the boss at the bottom of the swoop, just ahead of the dino
pub const SWOOP_TARGET_X: f32 = PLAYER_X - 20.0;
/// Ticks for the full down-and-up swoop
pub const SWOOP_DURATION: u32 = 60;

/// Collectible shield sprite
pub const POWER_UP_SIZE: f32 = 40.0;
/// Hover height above the ground
pub const POWER_UP_HOVER: f32 = 0.0;
/// Bob amplitude in pixels
pub const BOB_RANGE: f32 = 5.0;
/// Bob angular speed in radians per tick
pub const BOB_SPEED: f32 = 0.03;

const POWER_UP_INSET: Inset = Inset::new(5.0, 5.0, -10.0, -10.0);

/// Hazard kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HazardKind {
    /// Cactus cluster on the ground: jump over it
    GroundObstacle,
    /// Bird at one of a few altitudes
    FlyingObstacle,
    /// Oversized bird that swoops down once
    BossSwoop,
}

impl HazardKind {
    /// Fixed hitbox deltas for this kind
    pub fn hitbox_inset(self) -> Inset {
        match self {
            HazardKind::GroundObstacle => Inset::new(4.0, 4.0, -8.0, -8.0),
            HazardKind::FlyingObstacle => Inset::new(6.0, 10.0, -12.0, -20.0),
            HazardKind::BossSwoop => Inset::NONE,
        }
    }
}

/// Altitudes a flying obstacle can spawn at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyerAltitude {
    /// Must be jumped
    Low,
    /// Must be ducked under
    Mid,
    /// Only dangerous mid-jump
    High,
}

impl FlyerAltitude {
    pub const ALL: [FlyerAltitude; 3] = [FlyerAltitude::Low, FlyerAltitude::Mid, FlyerAltitude::High];

    pub fn y(self) -> f32 {
        match self {
            FlyerAltitude::Low => GROUND_Y - 50.0,
            FlyerAltitude::Mid => GROUND_Y - 90.0,
            FlyerAltitude::High => GROUND_Y - 180.0,
        }
    }
}

/// One-shot swoop script of the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwoopState {
    /// Cruising, waiting to cross the trigger line
    NotTriggered,
    /// Mid-swoop, `progress` ticks in
    Swooping { progress: u32 },
    /// Swoop finished; holds cruise altitude until off-screen
    Settled,
}

/// A scrolling obstacle
#[derive(Debug, Clone)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    /// Top-left of the sprite
    pub pos: Vec2,
    pub size: Vec2,
    pub spawn_tick: u64,
    /// Only meaningful for `BossSwoop`
    pub swoop: SwoopState,
}

impl Hazard {
    /// Cactus cluster of `count` (1..=3) cacti at the right screen edge
    pub fn ground(id: u32, count: u32, spawn_tick: u64) -> Self {
        let count = count.clamp(1, MAX_CACTUS_CLUSTER);
        let size = Vec2::new(CACTUS_WIDTH * count as f32, CACTUS_HEIGHT);
        Self {
            id,
            kind: HazardKind::GroundObstacle,
            pos: Vec2::new(SCREEN_WIDTH, GROUND_Y - size.y),
            size,
            spawn_tick,
            swoop: SwoopState::Settled,
        }
    }

    pub fn flying(id: u32, altitude: FlyerAltitude, spawn_tick: u64) -> Self {
        Self {
            id,
            kind: HazardKind::FlyingObstacle,
            pos: Vec2::new(SCREEN_WIDTH, altitude.y()),
            size: Vec2::new(FLYER_WIDTH, FLYER_HEIGHT),
            spawn_tick,
            swoop: SwoopState::Settled,
        }
    }

    pub fn boss(id: u32, spawn_tick: u64) -> Self {
        Self {
            id,
            kind: HazardKind::BossSwoop,
            pos: Vec2::new(SCREEN_WIDTH, BOSS_CRUISE_Y),
            size: Vec2::new(FLYER_WIDTH * BOSS_SCALE, FLYER_HEIGHT * BOSS_SCALE),
            spawn_tick,
            swoop: SwoopState::NotTriggered,
        }
    }

    /// Scroll left by `speed` and run any scripted motion
    pub fn advance(&mut self, speed: f32) {
        self.pos.x -= speed;
        if self.kind == HazardKind::BossSwoop {
            self.advance_swoop(speed);
        }
    }

    /// Trigger line for the swoop at `speed`, placing the low point on the dino
    pub fn swoop_trigger_x(speed: f32) -> f32 {
        SWOOP_TARGET_X + speed * (SWOOP_DURATION / 2) as f32
    }

    fn advance_swoop(&mut self, speed: f32) {
        if self.swoop == SwoopState::NotTriggered && self.pos.x <= Self::swoop_trigger_x(speed) {
            self.swoop = SwoopState::Swooping { progress: 0 };
        }

        if let SwoopState::Swooping { progress } = self.swoop {
            let progress = progress + 1;
            let half = SWOOP_DURATION / 2;
            if progress < half {
                let t = progress as f32 / half as f32;
                self.pos.y = lerp(BOSS_CRUISE_Y, BOSS_SWOOP_Y, t);
                self.swoop = SwoopState::Swooping { progress };
            } else if progress < SWOOP_DURATION {
                let t = (progress - half) as f32 / half as f32;
                self.pos.y = lerp(BOSS_SWOOP_Y, BOSS_CRUISE_Y, t);
                self.swoop = SwoopState::Swooping { progress };
            } else {
                self.pos.y = BOSS_CRUISE_Y;
                self.swoop = SwoopState::Settled;
            }
        }
    }

    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Fully scrolled past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.right_edge() < 0.0
    }

    pub fn hitbox(&self) -> Rect {
        self.kind.hitbox_inset().apply(self.pos, self.size)
    }
}

/// A collectible shield floating toward the player
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    /// Top-left of the sprite, without bob
    pub pos: Vec2,
    pub spawn_tick: u64,
    pub collected: bool,
}

impl PowerUp {
    pub fn new(id: u32, spawn_tick: u64) -> Self {
        Self {
            id,
            pos: Vec2::new(SCREEN_WIDTH, GROUND_Y - POWER_UP_HOVER - POWER_UP_SIZE),
            spawn_tick,
            collected: false,
        }
    }

    pub fn size() -> Vec2 {
        Vec2::splat(POWER_UP_SIZE)
    }

    pub fn advance(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    /// Whole-pixel vertical bob for the tick `now`
    pub fn bob_offset(&self, now: u64) -> f32 {
        let elapsed = now.saturating_sub(self.spawn_tick) as f32;
        ((elapsed * BOB_SPEED).sin() * BOB_RANGE).trunc()
    }

    /// Draw position including bob
    pub fn render_pos(&self, now: u64) -> Vec2 {
        self.pos + Vec2::new(0.0, self.bob_offset(now))
    }

    pub fn right_edge(&self) -> f32 {
        self.pos.x + POWER_UP_SIZE
    }

    pub fn is_off_screen(&self) -> bool {
        self.right_edge() < 0.0
    }

    pub fn hitbox(&self, now: u64) -> Rect {
        POWER_UP_INSET
            .apply(self.pos, Self::size())
            .offset_y(self.bob_offset(now))
    }
}
