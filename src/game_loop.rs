//! Fixed-tick game loop
//!
//! Each tick: poll input, advance the simulation, forward its events to audio
//! and the leaderboard, snapshot, render, then sleep out the rest of the tick
//! budget. A slow tick is followed straight away by the next one; there is no
//! catch-up.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use crate::audio::{AudioCommand, AudioDispatcher, SoundId};
use crate::consts::TICK_RATE;
use crate::highscores::{self, HighScores};
use crate::sim::{GameEvent, GameState, InputEvent, RenderSnapshot, TickInput, tick};

/// Draws a snapshot; called once per tick
pub trait Renderer {
    fn render(&mut self, snapshot: &RenderSnapshot);
}

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Supplies the input events for the next tick
pub trait InputSource {
    /// Push this tick's events into `events`. `snapshot` is the last frame rendered.
    fn poll(&mut self, snapshot: &RenderSnapshot, events: &mut Vec<InputEvent>) -> LoopControl;
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub tick_rate: u32,
    /// Quit after this many ticks
    pub max_ticks: Option<u64>,
    /// Where the leaderboard is saved
    pub data_dir: PathBuf,
}

impl LoopConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            tick_rate: TICK_RATE,
            max_ticks: None,
            data_dir,
        }
    }

    pub fn tick_budget(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

/// What a finished run looked like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub games_over: u32,
    pub best_score: u64,
}

/// Time left in the tick budget
pub fn pace(budget: Duration, elapsed: Duration) -> Duration {
    budget.saturating_sub(elapsed)
}

/// Audio commands a simulation event turns into
pub fn sound_for(event: GameEvent) -> &'static [AudioCommand] {
    match event {
        GameEvent::IntroStarted => &[AudioCommand::StartMusic],
        GameEvent::Jumped => &[AudioCommand::Play(SoundId::Jump)],
        GameEvent::ShieldEquipped => &[AudioCommand::Play(SoundId::ShieldEquip)],
        GameEvent::ShieldPopped => &[AudioCommand::Play(SoundId::ShieldPop)],
        GameEvent::BossArrived => &[AudioCommand::Play(SoundId::BossWings)],
        GameEvent::RainStarted => &[AudioCommand::Play(SoundId::Rain)],
        GameEvent::RainStopped => &[AudioCommand::Stop(SoundId::Rain)],
        GameEvent::Paused => &[AudioCommand::PauseAll],
        GameEvent::Resumed | GameEvent::Restarted => &[AudioCommand::ResumeAll],
        GameEvent::GameOver { .. } => &[
            AudioCommand::PauseAll,
            AudioCommand::Play(SoundId::GameOver),
        ],
    }
}

pub struct GameLoop<R: Renderer, I: InputSource> {
    state: GameState,
    renderer: R,
    input: I,
    audio: AudioDispatcher,
    highscores: HighScores,
    config: LoopConfig,
    last_frame: RenderSnapshot,
    events: Vec<InputEvent>,
    ticks: u64,
    games_over: u32,
}

impl<R: Renderer, I: InputSource> GameLoop<R, I> {
    pub fn new(
        mut state: GameState,
        renderer: R,
        input: I,
        audio: AudioDispatcher,
        highscores: HighScores,
        config: LoopConfig,
    ) -> Self {
        state.best_score = state.best_score.max(highscores.best());
        let last_frame = RenderSnapshot::capture(&state);
        Self {
            state,
            renderer,
            input,
            audio,
            highscores,
            config,
            last_frame,
            events: Vec::new(),
            ticks: 0,
            games_over: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run one tick without pacing
    pub fn step(&mut self) -> LoopControl {
        self.events.clear();
        if self.input.poll(&self.last_frame, &mut self.events) == LoopControl::Quit {
            return LoopControl::Quit;
        }

        tick(&mut self.state, &TickInput::new(self.events.drain(..)));
        for event in self.state.drain_events() {
            self.dispatch(event);
        }

        self.last_frame = RenderSnapshot::capture(&self.state);
        self.renderer.render(&self.last_frame);
        self.ticks += 1;

        match self.config.max_ticks {
            Some(max) if self.ticks >= max => LoopControl::Quit,
            _ => LoopControl::Continue,
        }
    }

    /// Run until the input source or tick limit says stop
    pub fn run(mut self) -> RunSummary {
        let budget = self.config.tick_budget();
        log::info!(
            "Game loop started: {} ticks/s, seed {}",
            self.config.tick_rate,
            self.state.seed
        );

        loop {
            let started = Instant::now();
            let control = self.step();
            let remaining = pace(budget, started.elapsed());
            self.audio.timing(remaining);
            if control == LoopControl::Quit {
                break;
            }
            if remaining.is_zero() {
                log::trace!("Tick {} over budget", self.ticks);
            } else {
                thread::sleep(remaining);
            }
        }

        let summary = self.summary();
        log::info!(
            "Game loop stopped after {} ticks ({} games, best {})",
            summary.ticks,
            summary.games_over,
            summary.best_score
        );
        summary
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            games_over: self.games_over,
            best_score: self.state.best_score,
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        for &cmd in sound_for(event) {
            self.audio.send(cmd);
        }
        if let GameEvent::GameOver { score } = event {
            self.games_over += 1;
            self.record_score(score);
        }
    }

    fn record_score(&mut self, score: u64) {
        let Some(rank) = self
            .highscores
            .add_score(score, self.state.time_ticks, highscores::unix_now())
        else {
            return;
        };
        log::info!("High score #{rank}: {score}");
        if let Err(err) = self.highscores.save(&self.config.data_dir) {
            log::warn!("Failed to save high scores: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence;
    use crate::sim::{GamePhase, Hazard, Player};

    #[derive(Default)]
    struct Frames {
        phases: Vec<GamePhase>,
    }

    impl Renderer for Frames {
        fn render(&mut self, snapshot: &RenderSnapshot) {
            self.phases.push(snapshot.phase);
        }
    }

    /// Plays back one batch of events per tick, then idles
    struct Script {
        ticks: std::vec::IntoIter<Vec<InputEvent>>,
        quit_when_done: bool,
    }

    impl Script {
        fn new(ticks: Vec<Vec<InputEvent>>, quit_when_done: bool) -> Self {
            Self {
                ticks: ticks.into_iter(),
                quit_when_done,
            }
        }
    }

    impl InputSource for Script {
        fn poll(&mut self, _: &RenderSnapshot, events: &mut Vec<InputEvent>) -> LoopControl {
            match self.ticks.next() {
                Some(batch) => {
                    events.extend(batch);
                    LoopControl::Continue
                }
                None if self.quit_when_done => LoopControl::Quit,
                None => LoopControl::Continue,
            }
        }
    }

    fn game_loop(name: &str, script: Script, max_ticks: Option<u64>) -> GameLoop<Frames, Script> {
        let config = LoopConfig {
            max_ticks,
            ..LoopConfig::new(persistence::test_dir(name))
        };
        GameLoop::new(
            GameState::new(17),
            Frames::default(),
            script,
            AudioDispatcher::disabled(),
            HighScores::new(),
            config,
        )
    }

    fn run_until_running(game: &mut GameLoop<Frames, Script>) {
        for _ in 0..2000 {
            if game.state().phase == GamePhase::Running {
                return;
            }
            game.step();
        }
        panic!("never reached Running");
    }

    #[test]
    fn test_pace_sleeps_remainder_only() {
        let budget = Duration::from_millis(10);
        assert_eq!(pace(budget, Duration::from_millis(3)), Duration::from_millis(7));
        assert_eq!(pace(budget, Duration::from_millis(25)), Duration::ZERO);
    }

    #[test]
    fn test_tick_budget_matches_rate() {
        let config = LoopConfig::new(PathBuf::from("unused"));
        assert_eq!(config.tick_budget(), Duration::from_millis(10));
    }

    #[test]
    fn test_game_over_pauses_loops_and_plays_sting() {
        let cmds = sound_for(GameEvent::GameOver { score: 3 });
        assert_eq!(
            cmds,
            &[AudioCommand::PauseAll, AudioCommand::Play(SoundId::GameOver)]
        );
        assert_eq!(sound_for(GameEvent::RainStopped), &[AudioCommand::Stop(SoundId::Rain)]);
    }

    #[test]
    fn test_max_ticks_stops_loop() {
        let mut game = game_loop("loop-max", Script::new(vec![], false), Some(3));
        assert_eq!(game.step(), LoopControl::Continue);
        assert_eq!(game.step(), LoopControl::Continue);
        assert_eq!(game.step(), LoopControl::Quit);
        assert_eq!(game.renderer().phases.len(), 3);
    }

    #[test]
    fn test_quit_from_input_skips_tick() {
        let mut game = game_loop("loop-quit", Script::new(vec![vec![]], true), None);
        assert_eq!(game.step(), LoopControl::Continue);
        assert_eq!(game.step(), LoopControl::Quit);
        assert_eq!(game.renderer().phases.len(), 1);
    }

    #[test]
    fn test_run_returns_summary() {
        let script = Script::new(vec![vec![InputEvent::JumpReleased]], false);
        let summary = game_loop("loop-run", script, Some(5)).run();
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.games_over, 0);
    }

    #[test]
    fn test_game_over_records_high_score() {
        let script = Script::new(vec![vec![InputEvent::JumpReleased]], false);
        let mut game = game_loop("loop-score", script, None);
        run_until_running(&mut game);
        for _ in 0..50 {
            game.step();
        }
        let state = game.state_mut();
        state.hazards.clear();
        state.debug.collisions = true;
        let id = state.next_entity_id();
        let mut cactus = Hazard::ground(id, 1, state.time_ticks);
        cactus.pos.x = Player::new().pos().x + 20.0;
        state.hazards.push(cactus);
        game.step();

        assert_eq!(game.state().phase, GamePhase::Over);
        let score = game.state().score();
        assert!(score > 0);
        assert_eq!(game.highscores().best(), score);
        assert_eq!(game.summary().games_over, 1);

        let saved = HighScores::load(&game.config.data_dir);
        assert_eq!(saved.best(), score);
        let _ = std::fs::remove_dir_all(&game.config.data_dir);
    }

    #[test]
    fn test_loaded_best_score_shown() {
        let mut scores = HighScores::new();
        scores.add_score(321, 3210, 0);
        let game = GameLoop::new(
            GameState::new(1),
            Frames::default(),
            Script::new(vec![], false),
            AudioDispatcher::disabled(),
            scores,
            LoopConfig::new(PathBuf::from("unused")),
        );
        assert_eq!(game.state().best_score, 321);
        assert_eq!(game.last_frame.best_score, 321);
    }
}
