//! Read-only view of a tick, handed to the renderer

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use super::environment::RainDrop;
use super::hazard::{HazardKind, PowerUp, SwoopState};
use super::player::RunState;
use super::state::{GamePhase, GameState};
use crate::consts::{INTRO_COUNTDOWN, TICK_RATE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub state: RunState,
    pub shield_active: bool,
    pub shield_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardView {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub swoop: SwoopState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    /// Includes the bob offset
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

/// What a hitbox belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HitboxOwner {
    Player,
    Hazard,
    PowerUp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugOverlay {
    pub hitboxes: Vec<(HitboxOwner, Rect)>,
    pub scroll_speed: f32,
    pub invincibility_ticks: u32,
    pub rain_seconds_left: Option<f32>,
    pub shield_seconds_left: Option<f32>,
    pub collisions: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub player: PlayerView,
    pub hazards: Vec<HazardView>,
    pub power_ups: Vec<PowerUpView>,
    pub ground_offset: f32,
    pub cloud_offset: f32,
    /// Empty unless it is raining
    pub rain: Vec<RainDrop>,
    pub score: u64,
    pub best_score: u64,
    /// Title text fade (1.0 opaque, fades out during the intro)
    pub intro_alpha: f32,
    pub debug: Option<DebugOverlay>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.time_ticks;
        let player = &state.player;

        let hazards = state
            .hazards
            .iter()
            .map(|h| HazardView {
                id: h.id,
                kind: h.kind,
                pos: h.pos,
                size: h.size,
                swoop: h.swoop,
            })
            .collect();

        let power_ups = state
            .power_ups
            .iter()
            .map(|p| PowerUpView {
                id: p.id,
                pos: p.render_pos(now),
                size: PowerUp::size(),
                collected: p.collected,
            })
            .collect();

        let debug = state.debug.show_hitboxes.then(|| {
            let mut hitboxes = vec![(HitboxOwner::Player, player.hitbox())];
            hitboxes.extend(state.hazards.iter().map(|h| (HitboxOwner::Hazard, h.hitbox())));
            hitboxes.extend(
                state
                    .power_ups
                    .iter()
                    .map(|p| (HitboxOwner::PowerUp, p.hitbox(now))),
            );
            DebugOverlay {
                hitboxes,
                scroll_speed: state.scroll_speed,
                invincibility_ticks: state.invincibility_ticks,
                rain_seconds_left: state.rain.seconds_left(),
                shield_seconds_left: player
                    .shield_ticks_left(now)
                    .map(|t| t as f32 / TICK_RATE as f32),
                collisions: state.debug.collisions,
            }
        });

        Self {
            tick: now,
            phase: state.phase,
            player: PlayerView {
                pos: player.pos(),
                size: player.sprite_size(),
                state: player.run_state,
                shield_active: player.shield.active,
                shield_visible: player.shield.visible,
            },
            hazards,
            power_ups,
            ground_offset: state.environment.ground_offset,
            cloud_offset: state.environment.cloud_offset,
            rain: if state.rain.active {
                state.rain.drops.clone()
            } else {
                Vec::new()
            },
            score: state.score(),
            best_score: state.best_score.max(state.score()),
            intro_alpha: match state.phase {
                GamePhase::Start => 1.0,
                GamePhase::Intro => (state.intro.countdown / INTRO_COUNTDOWN).clamp(0.0, 1.0),
                _ => 0.0,
            },
            debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hazard::Hazard;

    #[test]
    fn test_snapshot_without_debug() {
        let mut state = GameState::new(1);
        state.hazards.push(Hazard::ground(7, 2, 0));
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Start);
        assert_eq!(snap.hazards.len(), 1);
        assert_eq!(snap.hazards[0].id, 7);
        assert_eq!(snap.intro_alpha, 1.0);
        assert!(snap.debug.is_none());
        assert!(snap.rain.is_empty());
    }

    #[test]
    fn test_snapshot_debug_overlay_lists_hitboxes() {
        let mut state = GameState::new(1);
        state.debug.toggle();
        state.hazards.push(Hazard::ground(1, 1, 0));
        state.power_ups.push(PowerUp::new(2, 0));
        let snap = RenderSnapshot::capture(&state);
        let overlay = snap.debug.expect("overlay enabled");
        assert_eq!(overlay.hitboxes.len(), 3);
        assert_eq!(overlay.hitboxes[0].0, HitboxOwner::Player);
        assert!(!overlay.collisions);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(1);
        let json = serde_json::to_string(&RenderSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Start\""));
    }
}
