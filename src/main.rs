//! Dino Dash entry point
//!
//! Loads settings and the leaderboard from the data directory, then runs the
//! game headless: frames go to the log, the autopilot plays and sounds are
//! logged instead of played.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use dino_dash::audio::{AudioDispatcher, LogSoundPlayer, MUSIC_TRACKS};
    use dino_dash::consts::TICK_RATE;
    use dino_dash::game_loop::{GameLoop, LoopConfig};
    use dino_dash::headless::{Autopilot, LogRenderer};
    use dino_dash::persistence;
    use dino_dash::sim::GameState;
    use dino_dash::{HighScores, Settings};

    /// Length of a logged "track" before the playlist moves on
    const TRACK_LENGTH: Duration = Duration::from_secs(90);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dino Dash starting...");

    let bootstrap_dir = persistence::data_dir(None);
    let settings = Settings::load(&bootstrap_dir);
    let data_dir = persistence::data_dir(settings.data_dir.as_deref());
    log::info!("Data directory: {}", data_dir.display());

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Game initialized with seed: {}", seed);

    let highscores = HighScores::load(&data_dir);
    let mut state = GameState::new(seed);
    state.best_score = highscores.best();
    if settings.start_with_debug {
        state.debug.toggle();
    }

    let audio = if settings.audio_enabled() {
        let player = LogSoundPlayer::new(
            settings.effective_sfx_volume(),
            settings.effective_music_volume(),
            TRACK_LENGTH,
        );
        AudioDispatcher::spawn(player, MUSIC_TRACKS.len(), seed)
    } else {
        log::info!("Audio muted");
        AudioDispatcher::disabled()
    };

    let config = LoopConfig {
        max_ticks: settings.max_ticks,
        ..LoopConfig::new(data_dir)
    };
    let game = GameLoop::new(
        state,
        LogRenderer::new(5 * TICK_RATE as u64),
        Autopilot::new(settings.autopilot),
        audio,
        highscores,
        config,
    );
    let summary = game.run();
    log::info!(
        "Dino Dash finished: {} ticks, {} games, best score {}",
        summary.ticks,
        summary.games_over,
        summary.best_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is usable from a host page
}
