//! Dino Dash - an endless-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `game_loop`: Fixed-tick scheduler and the renderer/input collaborator traits
//! - `headless`: Log renderer and autopilot input used by the binary
//! - `audio`: Single-worker audio dispatch queue and music playlist
//! - `persistence`: JSON storage helpers for the data directory
//! - `highscores`: Best-score leaderboard
//! - `settings`: Player preferences and run configuration

pub mod audio;
pub mod game_loop;
pub mod headless;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 100;
    /// Milliseconds per tick
    pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 300.0;
    /// Ground line (y grows downward)
    pub const GROUND_Y: f32 = 280.0;

    /// Scroll speed at session start (pixels per tick, leftward)
    pub const STARTING_SPEED: f32 = 5.0;
    /// Scroll speed growth per running tick
    pub const SPEED_INCREMENT: f32 = 0.0002;

    /// Downward acceleration (pixels per tick²)
    pub const GRAVITY: f32 = 0.4;
    /// Upward velocity applied on jump
    pub const JUMP_IMPULSE: f32 = -12.0;

    /// Player horizontal position (fixed, the world scrolls)
    pub const PLAYER_X: f32 = 120.0;
    pub const PLAYER_WIDTH: f32 = 88.0;
    pub const PLAYER_HEIGHT: f32 = 94.0;
    pub const PLAYER_DUCK_WIDTH: f32 = 118.0;
    pub const PLAYER_DUCK_HEIGHT: f32 = 60.0;

    /// Shield lasts 10 seconds
    pub const SHIELD_DURATION_TICKS: u64 = 1000;
    /// Blinking starts 2 seconds before expiry
    pub const SHIELD_BLINK_START_TICKS: u64 = 800;
    /// Visibility toggles every 100 ms while blinking
    pub const SHIELD_BLINK_INTERVAL_TICKS: u64 = 10;

    /// Collision grace after a shield pops (0.3 s)
    pub const INVINCIBILITY_TICKS: u32 = 30;

    /// One point per 10 ticks
    pub const TICKS_PER_POINT: u64 = 10;

    /// Intro countdown, consumed at scroll speed
    pub const INTRO_COUNTDOWN: f32 = 1000.0;
    /// Ticks spent in Over before a restart is accepted
    pub const RESTART_LOCKOUT_TICKS: u32 = 50;

    /// Rain effect
    pub const RAIN_START_SCORE: u64 = 500;
    pub const RAIN_DURATION_TICKS: u32 = 3000;
    pub const RAIN_DROP_COUNT: usize = 100;

    /// Background layers
    pub const GROUND_TILE_WIDTH: f32 = 2400.0;
    pub const CLOUD_PARALLAX: f32 = 0.25;
}

/// Wrap `value` into `[0, period)`
#[inline]
pub fn wrap(value: f32, period: f32) -> f32 {
    debug_assert!(period > 0.0);
    value.rem_euclid(period)
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
