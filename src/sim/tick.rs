//! Fixed timestep simulation tick
//!
//! Routes input events through the phase state machine and advances the
//! session by exactly one tick.

use rand::Rng;

use super::collision::{HazardContact, resolve_collisions};
use super::environment::RainTransition;
use super::hazard::{FlyerAltitude, Hazard, MAX_CACTUS_CLUSTER, PowerUp};
use super::player::RunState;
use super::spawn::{SpawnContext, SpawnKind};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Discrete semantic input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    JumpPressed,
    JumpReleased,
    DuckPressed,
    DuckReleased,
    /// Toggles the hitbox overlay and collision enforcement together
    DebugToggle,
    PauseToggle,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Events in arrival order
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    for &event in &input.events {
        handle_input(state, event);
    }

    match state.phase {
        GamePhase::Intro => tick_intro(state),
        GamePhase::Running => tick_running(state),
        GamePhase::Over => state.over_ticks = state.over_ticks.saturating_add(1),
        GamePhase::Start | GamePhase::Paused => {}
    }
}

fn set_phase(state: &mut GameState, phase: GamePhase) {
    if state.phase != phase {
        log::info!("phase {:?} -> {:?}", state.phase, phase);
        state.phase = phase;
    }
}

/// Apply one input event
pub fn handle_input(state: &mut GameState, event: InputEvent) {
    match event {
        InputEvent::JumpPressed => {
            state.held.jump = true;
            if state.phase == GamePhase::Running {
                if state.player.run_state == RunState::Ducking {
                    state.player.set_ducking(false);
                } else if state.player.jump() {
                    state.emit(GameEvent::Jumped);
                }
            }
        }
        InputEvent::JumpReleased => {
            state.held.jump = false;
            match state.phase {
                GamePhase::Start => {
                    set_phase(state, GamePhase::Intro);
                    state.emit(GameEvent::IntroStarted);
                }
                GamePhase::Over if state.over_ticks >= RESTART_LOCKOUT_TICKS => restart(state),
                _ => {}
            }
        }
        InputEvent::DuckPressed => {
            state.held.duck = true;
            if state.phase == GamePhase::Running {
                state.player.set_ducking(true);
            }
        }
        InputEvent::DuckReleased => {
            state.held.duck = false;
            if state.phase == GamePhase::Running {
                state.player.set_ducking(false);
            }
        }
        InputEvent::DebugToggle => {
            state.debug.toggle();
            log::info!(
                "debug overlay {}, collisions {}",
                on_off(state.debug.show_hitboxes),
                on_off(state.debug.collisions)
            );
        }
        InputEvent::PauseToggle => match state.phase {
            GamePhase::Running => {
                set_phase(state, GamePhase::Paused);
                state.emit(GameEvent::Paused);
            }
            GamePhase::Paused => {
                set_phase(state, GamePhase::Running);
                state.emit(GameEvent::Resumed);
            }
            _ => {}
        },
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Over -> Running with a fresh session
fn restart(state: &mut GameState) {
    if state.rain.active {
        state.emit(GameEvent::RainStopped);
    }
    state.reset_session();
    set_phase(state, GamePhase::Running);
    state.emit(GameEvent::Restarted);
}

fn tick_intro(state: &mut GameState) {
    state.time_ticks += 1;
    let now = state.time_ticks;
    state.player.update(state.held, now);

    if state.intro.jumped && state.player.run_state == RunState::Running {
        state.environment.advance_ground(state.scroll_speed);
    }
    state.environment.advance_clouds(state.scroll_speed);

    state.intro.countdown -= state.scroll_speed;
    if state.intro.countdown <= 0.0 {
        set_phase(state, GamePhase::Running);
    }

    if !state.intro.jumped {
        if state.player.jump() {
            state.emit(GameEvent::Jumped);
        }
        state.intro.jumped = true;
    }
}

fn tick_running(state: &mut GameState) {
    state.time_ticks += 1;
    let now = state.time_ticks;
    state.scroll_speed += SPEED_INCREMENT;
    let speed = state.scroll_speed;

    let update = state.player.update(state.held, now);
    if update.shield_expired {
        state.emit(GameEvent::ShieldPopped);
    }

    state.environment.advance_ground(speed);
    state.environment.advance_clouds(speed);
    state.rain.update_drops(speed, &mut state.rng);

    for hazard in &mut state.hazards {
        hazard.advance(speed);
    }
    state.hazards.retain(|h| !h.is_off_screen());
    for power_up in &mut state.power_ups {
        power_up.advance(speed);
    }
    state.power_ups.retain(|p| !p.is_off_screen());

    let ctx = SpawnContext {
        score: state.score(),
        player_has_shield: state.player.has_shield(),
        boss_active: state.boss_active(),
    };
    if let Some(kind) = state
        .spawner
        .step(&ctx, &state.hazards, &state.power_ups, &mut state.rng)
    {
        spawn(state, kind);
    }

    state.invincibility_ticks = state.invincibility_ticks.saturating_sub(1);

    let score = state.score();
    match state.rain.update_timer(score, &mut state.rng) {
        Some(RainTransition::Started) => state.emit(GameEvent::RainStarted),
        Some(RainTransition::Stopped) => state.emit(GameEvent::RainStopped),
        None => {}
    }

    let report = resolve_collisions(state);
    if report.collected {
        state.emit(GameEvent::ShieldEquipped);
    }
    match report.contact {
        HazardContact::None => {}
        HazardContact::ShieldPopped => state.emit(GameEvent::ShieldPopped),
        HazardContact::Fatal => {
            game_over(state);
            return;
        }
    }

    state.score.tick();
}

fn game_over(state: &mut GameState) {
    let score = state.score();
    state.player.die();
    state.best_score = state.best_score.max(score);
    state.over_ticks = 0;
    set_phase(state, GamePhase::Over);
    log::info!("game over at tick {} with score {}", state.time_ticks, score);
    state.emit(GameEvent::GameOver { score });
}

/// Create one instance of `kind` at the right screen edge
fn spawn(state: &mut GameState, kind: SpawnKind) {
    let id = state.next_entity_id();
    let now = state.time_ticks;
    match kind {
        SpawnKind::Ground => {
            let count = state.rng.random_range(1..=MAX_CACTUS_CLUSTER);
            state.hazards.push(Hazard::ground(id, count, now));
        }
        SpawnKind::Flying => {
            let altitude = FlyerAltitude::ALL[state.rng.random_range(0..FlyerAltitude::ALL.len())];
            state.hazards.push(Hazard::flying(id, altitude, now));
        }
        SpawnKind::Boss => {
            state.hazards.push(Hazard::boss(id, now));
            state.emit(GameEvent::BossArrived);
        }
        SpawnKind::Shield => state.power_ups.push(PowerUp::new(id, now)),
    }
    log::debug!("spawned {:?} #{} at tick {}", kind, id, now);
}
