//! Property tests over whole simulated sessions

use proptest::prelude::*;

use super::*;
use crate::consts::SCREEN_WIDTH;

fn event_for(code: u8) -> Option<InputEvent> {
    match code {
        0 => Some(InputEvent::JumpPressed),
        1 => Some(InputEvent::JumpReleased),
        2 => Some(InputEvent::DuckPressed),
        3 => Some(InputEvent::DuckReleased),
        _ => None,
    }
}

fn step(state: &mut GameState, code: u8) {
    tick(state, &TickInput::new(event_for(code)));
}

fn running_state(seed: u64, collisions: bool) -> GameState {
    let mut state = GameState::new(seed);
    state.debug.collisions = collisions;
    tick(&mut state, &TickInput::new([InputEvent::JumpReleased]));
    while state.phase != GamePhase::Running {
        tick(&mut state, &TickInput::default());
    }
    state.drain_events();
    state
}

fn spawn_kind_of(kind: HazardKind) -> SpawnKind {
    SpawnKind::ALL
        .into_iter()
        .find(|k| k.hazard_kind() == Some(kind))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn score_never_decreases_while_running(seed in any::<u64>(), inputs in prop::collection::vec(0u8..8, 0..1500)) {
        let mut state = running_state(seed, true);
        for code in inputs {
            let before = (state.phase, state.score());
            step(&mut state, code);
            if before.0 == GamePhase::Running && state.phase == GamePhase::Running {
                prop_assert!(state.score() >= before.1);
            }
        }
    }

    #[test]
    fn jump_trajectory_depends_only_on_inputs(
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        inputs in prop::collection::vec(0u8..8, 1..600),
    ) {
        let mut a = running_state(seed_a, false);
        let mut b = running_state(seed_b, false);
        for code in inputs {
            step(&mut a, code);
            step(&mut b, code);
            prop_assert_eq!(a.player.y.to_bits(), b.player.y.to_bits());
            prop_assert_eq!(a.player.vel_y.to_bits(), b.player.vel_y.to_bits());
            prop_assert_eq!(a.player.run_state, b.player.run_state);
        }
    }

    #[test]
    fn spawns_respect_minimum_spacing(seed in any::<u64>()) {
        let mut state = running_state(seed, false);
        let mut last_id = 0;
        for _ in 0..4000 {
            tick(&mut state, &TickInput::default());
            for h in state.hazards.iter().filter(|h| h.id > last_id) {
                let spacing = state.spawner.min_spacing(spawn_kind_of(h.kind));
                for other in state.hazards.iter().filter(|o| o.kind == h.kind && o.id != h.id) {
                    prop_assert!(SCREEN_WIDTH - other.right_edge() >= spacing);
                }
            }
            for p in state.power_ups.iter().filter(|p| p.id > last_id) {
                let spacing = state.spawner.min_spacing(SpawnKind::Shield);
                for other in state.power_ups.iter().filter(|o| o.id != p.id) {
                    prop_assert!(SCREEN_WIDTH - other.right_edge() >= spacing);
                }
            }
            let newest = state.hazards.iter().map(|h| h.id)
                .chain(state.power_ups.iter().map(|p| p.id))
                .max()
                .unwrap_or(0);
            last_id = last_id.max(newest);
        }
    }

    #[test]
    fn invincible_contact_is_harmless(
        seed in any::<u64>(),
        ticks_left in 1u32..=crate::consts::INVINCIBILITY_TICKS,
        dx in -20.0f32..20.0,
    ) {
        let mut state = running_state(seed, true);
        state.hazards.clear();
        let id = state.next_entity_id();
        let mut cactus = Hazard::ground(id, 1, state.time_ticks);
        cactus.pos.x = state.player.pos().x + 20.0 + dx;
        state.hazards.push(cactus);
        state.invincibility_ticks = ticks_left;

        let report = resolve_collisions(&mut state);
        prop_assert_eq!(report.contact, HazardContact::None);
        prop_assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn reset_session_is_idempotent(seed in any::<u64>(), inputs in prop::collection::vec(0u8..8, 0..800)) {
        let mut state = running_state(seed, true);
        for code in inputs {
            step(&mut state, code);
        }
        state.reset_session();
        let once = format!("{state:?}");
        state.reset_session();
        prop_assert_eq!(once, format!("{state:?}"));
    }
}
