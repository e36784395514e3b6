//! Background scroll layers and the rain effect

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::wrap;

const RAIN_MIN_SPEED: f32 = 18.0;
const RAIN_MAX_SPEED: f32 = 28.0;
const RAIN_MIN_WIDTH: u32 = 3;
const RAIN_MAX_WIDTH: u32 = 6;
const RAIN_MIN_HEIGHT: u32 = 15;
const RAIN_MAX_HEIGHT: u32 = 25;
/// Drops drifting past this x re-enter on the right
const RAIN_WRAP_MARGIN: f32 = 10.0;

/// Scroll offsets of the ground strip and the cloud layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub ground_offset: f32,
    pub cloud_offset: f32,
}

impl Environment {
    pub fn advance_ground(&mut self, speed: f32) {
        self.ground_offset = wrap(self.ground_offset + speed, GROUND_TILE_WIDTH);
    }

    pub fn advance_clouds(&mut self, speed: f32) {
        self.cloud_offset = wrap(self.cloud_offset + speed * CLOUD_PARALLAX, SCREEN_WIDTH);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A single falling rain particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainDrop {
    pub pos: Vec2,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl RainDrop {
    fn random(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * SCREEN_WIDTH,
                rng.random::<f32>() * SCREEN_HEIGHT,
            ),
            speed: rng.random_range(RAIN_MIN_SPEED..RAIN_MAX_SPEED),
            width: rng.random_range(RAIN_MIN_WIDTH..RAIN_MAX_WIDTH) as f32,
            height: rng.random_range(RAIN_MIN_HEIGHT..RAIN_MAX_HEIGHT) as f32,
        }
    }
}

/// Change of the rain phase reported by [`Rain::update_timer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainTransition {
    Started,
    Stopped,
}

/// Timed rain shower, triggered once per session by the score
#[derive(Debug, Clone, Default)]
pub struct Rain {
    pub active: bool,
    /// Single-shot latch: the shower has happened this session
    pub triggered: bool,
    pub ticks_remaining: u32,
    pub drops: Vec<RainDrop>,
}

impl Rain {
    /// Latch on when the score crosses the threshold and count the shower down
    pub fn update_timer(&mut self, score: u64, rng: &mut Pcg32) -> Option<RainTransition> {
        if !self.triggered && score >= RAIN_START_SCORE {
            self.triggered = true;
            self.ticks_remaining = RAIN_DURATION_TICKS;
            self.start(rng);
            return Some(RainTransition::Started);
        }

        if self.triggered && self.ticks_remaining > 0 {
            self.ticks_remaining -= 1;
            if self.ticks_remaining == 0 {
                self.active = false;
                return Some(RainTransition::Stopped);
            }
        }
        None
    }

    fn start(&mut self, rng: &mut Pcg32) {
        self.active = true;
        if self.drops.is_empty() {
            self.drops = (0..RAIN_DROP_COUNT).map(|_| RainDrop::random(rng)).collect();
        }
    }

    /// Let the drops fall and drift with the scroll
    pub fn update_drops(&mut self, scroll_speed: f32, rng: &mut Pcg32) {
        if !self.active {
            return;
        }
        for drop in &mut self.drops {
            drop.pos.y += drop.speed;
            drop.pos.x -= scroll_speed / 2.0;

            if drop.pos.y > SCREEN_HEIGHT {
                drop.pos.y = -drop.height;
                drop.pos.x = rng.random::<f32>() * SCREEN_WIDTH;
            }
            if drop.pos.x < -RAIN_WRAP_MARGIN {
                drop.pos.x = SCREEN_WIDTH + RAIN_WRAP_MARGIN;
            }
        }
    }

    /// Seconds of rain left, while raining
    pub fn seconds_left(&self) -> Option<f32> {
        self.active
            .then(|| self.ticks_remaining as f32 / TICK_RATE as f32)
    }

    /// Stop and clear the latch; drops are kept for the next shower
    pub fn reset(&mut self) {
        self.active = false;
        self.triggered = false;
        self.ticks_remaining = 0;
    }
}
