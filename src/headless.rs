//! Headless collaborators for the binary: a renderer that writes to the log
//! and an input source that plays the game by itself.

use crate::consts::RESTART_LOCKOUT_TICKS;
use crate::game_loop::{InputSource, LoopControl, Renderer};
use crate::sim::{GamePhase, InputEvent, Player, Rect, RenderSnapshot, RunState};

/// Logs phase changes, a periodic status line and (at trace level) every frame as JSON
pub struct LogRenderer {
    interval: u64,
    last_phase: Option<GamePhase>,
    frames: u64,
}

impl LogRenderer {
    /// `interval` ticks between status lines; 0 disables them
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            last_phase: None,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self.frames += 1;

        if self.last_phase != Some(snapshot.phase) {
            log::info!(
                "[tick {}] {:?} - score {} (best {})",
                snapshot.tick,
                snapshot.phase,
                snapshot.score,
                snapshot.best_score
            );
            self.last_phase = Some(snapshot.phase);
        }

        if self.interval > 0 && snapshot.phase == GamePhase::Running && snapshot.tick % self.interval == 0 {
            log::info!(
                "[tick {}] score {:05} | {} hazards | {} power-ups | shield {} | rain {}",
                snapshot.tick,
                snapshot.score,
                snapshot.hazards.len(),
                snapshot.power_ups.len(),
                if snapshot.player.shield_active { "up" } else { "down" },
                if snapshot.rain.is_empty() { "no" } else { "yes" },
            );
        }

        if log::log_enabled!(log::Level::Trace) {
            match serde_json::to_string(snapshot) {
                Ok(json) => log::trace!("{json}"),
                Err(err) => log::warn!("Failed to serialize frame {}: {err}", snapshot.tick),
            }
        }
    }
}

/// How close (pixels) a hazard gets before the autopilot reacts
const REACTION_DISTANCE: f32 = 90.0;
/// Extra ticks to linger on the game-over screen before restarting
const RESTART_DELAY_TICKS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dodge {
    None,
    Jump,
    Duck,
}

/// Scripted player
///
/// Starts the game, dodges the nearest hazard when `dodge` is set and
/// restarts a while after game over. Without `dodge` it just runs.
pub struct Autopilot {
    dodge: bool,
    jump_held: bool,
    duck_held: bool,
    over_polls: u32,
}

impl Autopilot {
    pub fn new(dodge: bool) -> Self {
        Self {
            dodge,
            jump_held: false,
            duck_held: false,
            over_polls: 0,
        }
    }

    fn threat(snapshot: &RenderSnapshot) -> Dodge {
        let standing = Player::grounded_hitbox(false);
        let ducking = Player::grounded_hitbox(true);
        let overlaps_band = |hb: &Rect, band: &Rect| hb.y < band.bottom() && band.y < hb.bottom();

        snapshot
            .hazards
            .iter()
            .map(|h| h.kind.hitbox_inset().apply(h.pos, h.size))
            .filter(|hb| hb.right() > standing.x && hb.x - standing.right() < REACTION_DISTANCE)
            .filter(|hb| overlaps_band(hb, &standing))
            .min_by(|a, b| a.x.total_cmp(&b.x))
            .map(|hb| {
                if overlaps_band(&hb, &ducking) {
                    Dodge::Jump
                } else {
                    Dodge::Duck
                }
            })
            .unwrap_or(Dodge::None)
    }

    fn release_all(&mut self, events: &mut Vec<InputEvent>) {
        if self.jump_held {
            events.push(InputEvent::JumpReleased);
            self.jump_held = false;
        }
        if self.duck_held {
            events.push(InputEvent::DuckReleased);
            self.duck_held = false;
        }
    }

    fn drive(&mut self, snapshot: &RenderSnapshot, events: &mut Vec<InputEvent>) {
        let dodge = if self.dodge {
            Self::threat(snapshot)
        } else {
            Dodge::None
        };

        let want_duck = dodge == Dodge::Duck;
        if want_duck != self.duck_held {
            events.push(if want_duck {
                InputEvent::DuckPressed
            } else {
                InputEvent::DuckReleased
            });
            self.duck_held = want_duck;
        }

        let want_jump = dodge == Dodge::Jump;
        if want_jump && !self.jump_held && snapshot.player.state == RunState::Running {
            events.push(InputEvent::JumpPressed);
            self.jump_held = true;
        } else if !want_jump && self.jump_held {
            events.push(InputEvent::JumpReleased);
            self.jump_held = false;
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, snapshot: &RenderSnapshot, events: &mut Vec<InputEvent>) -> LoopControl {
        match snapshot.phase {
            GamePhase::Start => {
                events.push(InputEvent::JumpPressed);
                events.push(InputEvent::JumpReleased);
            }
            GamePhase::Running => {
                self.over_polls = 0;
                self.drive(snapshot, events);
            }
            GamePhase::Over => {
                self.release_all(events);
                self.over_polls += 1;
                if self.over_polls > RESTART_LOCKOUT_TICKS + RESTART_DELAY_TICKS {
                    log::debug!("Autopilot restarting");
                    events.push(InputEvent::JumpPressed);
                    events.push(InputEvent::JumpReleased);
                    self.over_polls = 0;
                }
            }
            GamePhase::Intro | GamePhase::Paused => {}
        }
        LoopControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioDispatcher;
    use crate::game_loop::{GameLoop, LoopConfig};
    use crate::highscores::HighScores;
    use crate::persistence;
    use crate::sim::{FlyerAltitude, GameState, Hazard};

    fn running_with(hazard: Option<Hazard>) -> RenderSnapshot {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Running;
        state.player.reset();
        if let Some(mut hazard) = hazard {
            hazard.pos.x = Player::grounded_hitbox(false).right() + 40.0;
            state.hazards.push(hazard);
        }
        RenderSnapshot::capture(&state)
    }

    fn poll(pilot: &mut Autopilot, snapshot: &RenderSnapshot) -> Vec<InputEvent> {
        let mut events = Vec::new();
        assert_eq!(pilot.poll(snapshot, &mut events), LoopControl::Continue);
        events
    }

    #[test]
    fn test_starts_game_from_title() {
        let mut pilot = Autopilot::new(true);
        let snapshot = RenderSnapshot::capture(&GameState::new(1));
        assert_eq!(
            poll(&mut pilot, &snapshot),
            vec![InputEvent::JumpPressed, InputEvent::JumpReleased]
        );
    }

    #[test]
    fn test_jumps_over_cactus() {
        let mut pilot = Autopilot::new(true);
        let snapshot = running_with(Some(Hazard::ground(1, 2, 0)));
        assert_eq!(poll(&mut pilot, &snapshot), vec![InputEvent::JumpPressed]);
        // Keeps holding while the cactus is still there
        assert!(poll(&mut pilot, &snapshot).is_empty());
        let clear = running_with(None);
        assert_eq!(poll(&mut pilot, &clear), vec![InputEvent::JumpReleased]);
    }

    #[test]
    fn test_ducks_under_mid_flyer() {
        let mut pilot = Autopilot::new(true);
        let snapshot = running_with(Some(Hazard::flying(1, FlyerAltitude::Mid, 0)));
        assert_eq!(poll(&mut pilot, &snapshot), vec![InputEvent::DuckPressed]);
        let clear = running_with(None);
        assert_eq!(poll(&mut pilot, &clear), vec![InputEvent::DuckReleased]);
    }

    #[test]
    fn test_ignores_high_flyer_and_distant_hazards() {
        let mut pilot = Autopilot::new(true);
        let high = running_with(Some(Hazard::flying(1, FlyerAltitude::High, 0)));
        assert!(poll(&mut pilot, &high).is_empty());

        let mut state = GameState::new(1);
        state.phase = GamePhase::Running;
        state.player.reset();
        state.hazards.push(Hazard::ground(1, 1, 0));
        assert!(poll(&mut pilot, &RenderSnapshot::capture(&state)).is_empty());
    }

    #[test]
    fn test_passive_pilot_never_dodges() {
        let mut pilot = Autopilot::new(false);
        let snapshot = running_with(Some(Hazard::ground(1, 1, 0)));
        assert!(poll(&mut pilot, &snapshot).is_empty());
    }

    #[test]
    fn test_restarts_only_after_lockout() {
        let mut pilot = Autopilot::new(true);
        let mut state = GameState::new(1);
        state.phase = GamePhase::Over;
        let snapshot = RenderSnapshot::capture(&state);

        let mut polls = 0;
        loop {
            polls += 1;
            let events = poll(&mut pilot, &snapshot);
            if events.contains(&InputEvent::JumpReleased) {
                break;
            }
            assert!(polls < 1000);
        }
        assert!(polls > RESTART_LOCKOUT_TICKS);
    }

    #[test]
    fn test_headless_session_plays_and_restarts() {
        let dir = persistence::test_dir("headless");
        let config = LoopConfig {
            max_ticks: Some(20_000),
            ..LoopConfig::new(dir.clone())
        };
        let mut game = GameLoop::new(
            GameState::new(2024),
            LogRenderer::new(500),
            Autopilot::new(false),
            AudioDispatcher::disabled(),
            HighScores::new(),
            config,
        );
        while game.step() == LoopControl::Continue {}

        assert_eq!(game.renderer().frames(), 20_000);
        let summary = game.summary();
        assert!(summary.games_over >= 2, "passive runner should die and restart");
        assert_eq!(summary.best_score, game.highscores().best());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
