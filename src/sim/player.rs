//! The player-controlled dino: jump physics, ducking and the shield timer

use glam::Vec2;
use serde::Serialize;

use super::collision::{Inset, Rect};
use crate::consts::*;

/// Hitbox inset while running, jumping or dead (standing sprite)
const HITBOX_RUN: Inset = Inset::new(12.0, 26.0, -32.0, -42.0);
/// Hitbox inset while ducking (ducking sprite)
const HITBOX_DUCK: Inset = Inset::new(24.0, 8.0, -60.0, -24.0);

/// Movement state of the dino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Running,
    Ducking,
    Jumping,
    Dead,
}

/// Buttons currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldInput {
    pub jump: bool,
    pub duck: bool,
}

/// Timed shield granted by a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shield {
    pub active: bool,
    /// Simulation tick of activation
    pub activated_at: u64,
    /// Cleared on alternate blink intervals near expiry
    pub visible: bool,
}

impl Default for Shield {
    fn default() -> Self {
        Self {
            active: false,
            activated_at: 0,
            visible: true,
        }
    }
}

/// Things that happened during a player update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    /// Touched down this tick
    pub landed: bool,
    /// Shield ran out this tick
    pub shield_expired: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Top of the sprite
    pub y: f32,
    pub vel_y: f32,
    pub run_state: RunState,
    pub shield: Shield,
    /// Highest point (smallest y) reached in the current jump
    max_y: f32,
    /// Apex of a jump held to the end (full gravity)
    high_jump_apex: f32,
    /// Apex of a jump under one-and-a-half gravity
    low_jump_apex: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Create the dino standing on the ground in its jump pose (title screen)
    pub fn new() -> Self {
        let ground = Self::ground_y();
        Self {
            y: ground,
            vel_y: 0.0,
            run_state: RunState::Jumping,
            shield: Shield::default(),
            max_y: ground,
            high_jump_apex: Self::jump_apex(GRAVITY),
            low_jump_apex: Self::jump_apex(GRAVITY * 1.5),
        }
    }

    /// Resting y for the standing sprite
    pub fn ground_y() -> f32 {
        GROUND_Y - PLAYER_HEIGHT
    }

    /// Resting y for the ducking sprite
    pub fn duck_ground_y() -> f32 {
        GROUND_Y - PLAYER_DUCK_HEIGHT
    }

    /// Hitbox of a dino on the ground, standing or ducking
    pub fn grounded_hitbox(ducking: bool) -> Rect {
        if ducking {
            HITBOX_DUCK.apply(
                Vec2::new(PLAYER_X, Self::duck_ground_y()),
                Vec2::new(PLAYER_DUCK_WIDTH, PLAYER_DUCK_HEIGHT),
            )
        } else {
            HITBOX_RUN.apply(
                Vec2::new(PLAYER_X, Self::ground_y()),
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            )
        }
    }

    /// Integrate a jump from the ground under constant `gravity` and return
    /// the smallest y reached. Uses the same operation order as the runtime
    /// update so a fully held jump peaks exactly here.
    pub fn jump_apex(gravity: f32) -> f32 {
        debug_assert!(gravity > 0.0);
        let ground = Self::ground_y();
        let mut vel = JUMP_IMPULSE;
        let mut y = ground + vel;
        let mut apex = y;
        while y + vel < ground {
            vel += gravity;
            y += vel;
            apex = apex.min(y);
        }
        apex
    }

    pub fn high_jump_apex(&self) -> f32 {
        self.high_jump_apex
    }

    pub fn low_jump_apex(&self) -> f32 {
        self.low_jump_apex
    }

    pub fn is_grounded(&self) -> bool {
        self.run_state == RunState::Running && self.y == Self::ground_y()
    }

    /// Start a jump if standing on the ground. Returns whether it launched.
    pub fn jump(&mut self) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.vel_y = JUMP_IMPULSE;
        self.y += self.vel_y;
        self.run_state = RunState::Jumping;
        true
    }

    /// Switch between running and ducking; ignored mid-air or when dead
    pub fn set_ducking(&mut self, ducking: bool) {
        match (self.run_state, ducking) {
            (RunState::Running, true) => {
                self.run_state = RunState::Ducking;
                self.y = Self::duck_ground_y();
            }
            (RunState::Ducking, false) => {
                self.run_state = RunState::Running;
                self.y = Self::ground_y();
            }
            _ => {}
        }
    }

    /// Advance one tick of physics and shield decay
    pub fn update(&mut self, held: HeldInput, now: u64) -> PlayerUpdate {
        let mut result = PlayerUpdate::default();
        if self.y < self.max_y {
            self.max_y = self.y;
        }
        result.shield_expired = self.update_shield(now);

        match self.run_state {
            RunState::Running => {
                self.y = Self::ground_y();
                self.max_y = self.y;
            }
            RunState::Ducking => {
                self.y = Self::duck_ground_y();
            }
            RunState::Jumping => {
                let ground = Self::ground_y();
                if self.y + self.vel_y >= ground {
                    self.vel_y = 0.0;
                    self.y = ground;
                    self.run_state = RunState::Running;
                    result.landed = true;
                } else if held.jump {
                    self.vel_y += GRAVITY;
                    self.y += self.vel_y;
                } else {
                    // Releasing early cuts the jump short unless it already
                    // climbed past the midpoint between the two apexes
                    let midpoint = self.low_jump_apex - (self.low_jump_apex - self.high_jump_apex) / 2.0;
                    if self.max_y <= midpoint {
                        self.vel_y += GRAVITY;
                    } else {
                        self.vel_y += GRAVITY * 1.5;
                    }
                    if held.duck {
                        self.vel_y += GRAVITY;
                    }
                    self.y += self.vel_y;
                }
            }
            RunState::Dead => {}
        }
        result
    }

    /// Returns true if the shield expired (and popped) this tick
    fn update_shield(&mut self, now: u64) -> bool {
        if !self.shield.active {
            return false;
        }
        let elapsed = now.saturating_sub(self.shield.activated_at);
        if elapsed >= SHIELD_DURATION_TICKS {
            self.pop_shield();
            true
        } else if elapsed >= SHIELD_BLINK_START_TICKS {
            self.shield.visible = (elapsed / SHIELD_BLINK_INTERVAL_TICKS) % 2 == 0;
            false
        } else {
            self.shield.visible = true;
            false
        }
    }

    pub fn has_shield(&self) -> bool {
        self.shield.active
    }

    pub fn activate_shield(&mut self, now: u64) {
        self.shield = Shield {
            active: true,
            activated_at: now,
            visible: true,
        };
    }

    /// Clear the shield. Returns false (and does nothing) if none was active.
    pub fn pop_shield(&mut self) -> bool {
        if !self.shield.active {
            return false;
        }
        self.deactivate_shield();
        true
    }

    /// Clear the shield without counting it as a pop
    pub fn deactivate_shield(&mut self) {
        self.shield.active = false;
        self.shield.visible = true;
    }

    /// Ticks until the shield expires, if one is active
    pub fn shield_ticks_left(&self, now: u64) -> Option<u64> {
        self.shield.active.then(|| {
            SHIELD_DURATION_TICKS.saturating_sub(now.saturating_sub(self.shield.activated_at))
        })
    }

    /// Freeze in the dead pose, never below the ground line
    pub fn die(&mut self) {
        let ground = Self::ground_y();
        if self.y > ground {
            self.y = ground;
        }
        self.vel_y = 0.0;
        self.run_state = RunState::Dead;
        self.deactivate_shield();
    }

    /// Back to a fresh running dino
    pub fn reset(&mut self) {
        self.y = Self::ground_y();
        self.vel_y = 0.0;
        self.max_y = self.y;
        self.run_state = RunState::Running;
        self.deactivate_shield();
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(PLAYER_X, self.y)
    }

    /// Sprite size for the current state
    pub fn sprite_size(&self) -> Vec2 {
        match self.run_state {
            RunState::Ducking => Vec2::new(PLAYER_DUCK_WIDTH, PLAYER_DUCK_HEIGHT),
            _ => Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    pub fn hitbox(&self) -> Rect {
        let inset = match self.run_state {
            RunState::Ducking => HITBOX_DUCK,
            RunState::Running | RunState::Jumping | RunState::Dead => HITBOX_RUN,
        };
        inset.apply(self.pos(), self.sprite_size())
    }
}
