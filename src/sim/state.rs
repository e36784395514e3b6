//! Game state and core session types
//!
//! Everything the simulation mutates lives in [`GameState`]; a tick is a pure
//! function of the previous state, the tick's input and the seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::environment::{Environment, Rain};
use super::hazard::{Hazard, HazardKind, PowerUp};
use super::player::{HeldInput, Player};
use super::spawn::SpawnDirector;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first jump release
    Start,
    /// Automatic intro jump and countdown
    Intro,
    /// Active gameplay
    Running,
    /// Frozen, resumable
    Paused,
    /// Run ended, waiting for a restart
    Over,
}

/// Side effects for collaborators, drained by the game loop after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    IntroStarted,
    Jumped,
    ShieldEquipped,
    ShieldPopped,
    BossArrived,
    RainStarted,
    RainStopped,
    Paused,
    Resumed,
    GameOver { score: u64 },
    Restarted,
}

/// Debug overlay and collision switch, toggled together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugFlags {
    pub show_hitboxes: bool,
    pub collisions: bool,
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self {
            show_hitboxes: false,
            collisions: true,
        }
    }
}

impl DebugFlags {
    pub fn toggle(&mut self) {
        self.show_hitboxes = !self.show_hitboxes;
        self.collisions = !self.collisions;
    }
}

/// Monotonic score driven by elapsed running ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    ticks: u64,
}

impl ScoreTracker {
    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn value(&self) -> u64 {
        self.ticks / TICKS_PER_POINT
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

/// Intro sequence bookkeeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroState {
    pub countdown: f32,
    /// The automatic jump has been launched
    pub jumped: bool,
}

impl Default for IntroState {
    fn default() -> Self {
        Self {
            countdown: INTRO_COUNTDOWN,
            jumped: false,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulated ticks (Intro and Running only)
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Scroll speed magnitude (pixels per tick, leftward)
    pub scroll_speed: f32,
    pub score: ScoreTracker,
    /// Best score seen, seeded from persistence by the loop
    pub best_score: u64,
    pub player: Player,
    pub held: HeldInput,
    /// Live hazards (spawn order)
    pub hazards: Vec<Hazard>,
    /// Live power-ups (spawn order)
    pub power_ups: Vec<PowerUp>,
    pub spawner: SpawnDirector,
    pub environment: Environment,
    pub rain: Rain,
    pub invincibility_ticks: u32,
    pub intro: IntroState,
    /// Ticks spent in Over (restart lockout)
    pub over_ticks: u32,
    pub debug: DebugFlags,
    /// Pending events for collaborators
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session on the title screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Start,
            scroll_speed: STARTING_SPEED,
            score: ScoreTracker::default(),
            best_score: 0,
            player: Player::new(),
            held: HeldInput::default(),
            hazards: Vec::new(),
            power_ups: Vec::new(),
            spawner: SpawnDirector::new(),
            environment: Environment::default(),
            rain: Rain::default(),
            invincibility_ticks: 0,
            intro: IntroState::default(),
            over_ticks: 0,
            debug: DebugFlags::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn score(&self) -> u64 {
        self.score.value()
    }

    pub fn boss_active(&self) -> bool {
        self.hazards.iter().any(|h| h.kind == HazardKind::BossSwoop)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clear everything a new run must not inherit
    ///
    /// Idempotent: calling it twice in a row leaves the same state as once.
    /// The RNG stream, seed, best score, debug flags and held buttons carry
    /// over.
    pub fn reset_session(&mut self) {
        self.scroll_speed = STARTING_SPEED;
        self.score.reset();
        self.hazards.clear();
        self.power_ups.clear();
        self.spawner.reset();
        self.player.reset();
        self.environment.reset();
        self.rain.reset();
        self.invincibility_ticks = 0;
        self.over_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::RunState;

    #[test]
    fn test_new_state_on_title_screen() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score(), 0);
        assert_eq!(state.scroll_speed, STARTING_SPEED);
        assert!(state.hazards.is_empty());
        assert!(state.debug.collisions);
    }

    #[test]
    fn test_score_tracker_counts_points() {
        let mut score = ScoreTracker::default();
        for _ in 0..TICKS_PER_POINT - 1 {
            score.tick();
        }
        assert_eq!(score.value(), 0);
        score.tick();
        assert_eq!(score.value(), 1);
        score.reset();
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn test_debug_toggle_flips_both() {
        let mut flags = DebugFlags::default();
        flags.toggle();
        assert!(flags.show_hitboxes);
        assert!(!flags.collisions);
        flags.toggle();
        assert_eq!(flags, DebugFlags::default());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_reset_session_clears_run() {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Over;
        state.scroll_speed = 9.0;
        for _ in 0..5000 {
            state.score.tick();
        }
        state.hazards.push(Hazard::ground(1, 1, 0));
        state.power_ups.push(PowerUp::new(2, 0));
        state.player.die();
        state.invincibility_ticks = 12;
        state.rain.triggered = true;
        state.environment.ground_offset = 33.0;

        state.reset_session();

        assert_eq!(state.scroll_speed, STARTING_SPEED);
        assert_eq!(state.score(), 0);
        assert!(state.hazards.is_empty());
        assert!(state.power_ups.is_empty());
        assert_eq!(state.player.run_state, RunState::Running);
        assert_eq!(state.invincibility_ticks, 0);
        assert!(!state.rain.triggered);
        assert_eq!(state.environment, Environment::default());
    }

    #[test]
    fn test_reset_session_is_idempotent() {
        let mut state = GameState::new(11);
        state.hazards.push(Hazard::ground(1, 2, 0));
        state.player.activate_shield(3);
        state.invincibility_ticks = 4;

        state.reset_session();
        let once = format!("{state:?}");
        state.reset_session();
        let twice = format!("{state:?}");
        assert_eq!(once, twice);
    }
}
