//! Audio dispatch
//!
//! The simulation never plays sounds itself. The game loop turns
//! [`GameEvent`](crate::sim::GameEvent)s into [`AudioCommand`]s and pushes them
//! down a channel to a single worker thread that owns the [`SoundPlayer`]
//! backend. Backend failures are logged and dropped.

use std::collections::HashMap;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use crate::consts::TICK_MS;

/// Background music, in asset order
pub const MUSIC_TRACKS: [&str; 3] = [
    "resources/Subwoofer Lullaby.wav",
    "resources/Biome Fest.wav",
    "resources/Watcher.wav",
];

/// Sound identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Jump,
    ShieldEquip,
    ShieldPop,
    GameOver,
    /// Loops while it rains
    Rain,
    BossWings,
    /// Index into [`MUSIC_TRACKS`]
    Music(usize),
}

impl SoundId {
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundId::Jump => "resources/jump.wav",
            SoundId::ShieldEquip => "resources/BubbleEquip.wav",
            SoundId::ShieldPop => "resources/BubblePop.wav",
            SoundId::GameOver => "resources/dead.wav",
            SoundId::Rain => "resources/Rain.wav",
            SoundId::BossWings => "resources/boss-wings.wav",
            SoundId::Music(i) => MUSIC_TRACKS[i % MUSIC_TRACKS.len()],
        }
    }

    /// Long-running sounds that follow pause/resume of the whole game
    pub fn is_looping(self) -> bool {
        matches!(self, SoundId::Rain | SoundId::Music(_))
    }

    pub fn is_music(self) -> bool {
        matches!(self, SoundId::Music(_))
    }
}

/// Requests sent to the audio worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play(SoundId),
    Pause(SoundId),
    Resume(SoundId),
    Stop(SoundId),
    /// Pause every looping sound (game paused or over)
    PauseAll,
    ResumeAll,
    /// Begin the shuffled playlist if it isn't already going
    StartMusic,
    /// Time left in the current tick budget; becomes the worker's poll interval
    Timing(Duration),
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no sound asset for {0:?}")]
    Unavailable(SoundId),
    #[error("audio backend failure: {0}")]
    Backend(String),
}

/// Sound output backend, owned by the audio worker thread
pub trait SoundPlayer: Send + 'static {
    fn play(&mut self, id: SoundId) -> Result<(), AudioError>;
    fn pause(&mut self, id: SoundId) -> Result<(), AudioError>;
    fn resume(&mut self, id: SoundId) -> Result<(), AudioError>;
    fn stop(&mut self, id: SoundId) -> Result<(), AudioError>;
    /// Whether `id` played to its end; drives music auto-advance
    fn is_finished(&mut self, id: SoundId) -> bool;
}

/// Shuffled background music order
///
/// Every track plays once per pass; the order is reshuffled when a pass ends.
#[derive(Debug, Clone)]
pub struct MusicPlaylist {
    order: Vec<usize>,
    cursor: usize,
    rng: Pcg32,
}

impl MusicPlaylist {
    pub fn new(track_count: usize, seed: u64) -> Self {
        let mut playlist = Self {
            order: (0..track_count).collect(),
            cursor: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        playlist.order.shuffle(&mut playlist.rng);
        playlist
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Next track, reshuffling after the last one
    pub fn next_track(&mut self) -> Option<SoundId> {
        if self.order.is_empty() {
            return None;
        }
        if self.cursor >= self.order.len() {
            self.order.shuffle(&mut self.rng);
            self.cursor = 0;
        }
        let track = self.order[self.cursor];
        self.cursor += 1;
        Some(SoundId::Music(track))
    }
}

/// State owned by the worker thread
pub struct AudioWorker<P: SoundPlayer> {
    player: P,
    playlist: MusicPlaylist,
    /// Looping sounds currently started (paused or not)
    looping: Vec<SoundId>,
    current_track: Option<SoundId>,
    paused: bool,
    poll: Duration,
}

impl<P: SoundPlayer> AudioWorker<P> {
    pub fn new(player: P, playlist: MusicPlaylist) -> Self {
        Self {
            player,
            playlist,
            looping: Vec::new(),
            current_track: None,
            paused: false,
            poll: Duration::from_millis(TICK_MS),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll
    }

    pub fn current_track(&self) -> Option<SoundId> {
        self.current_track
    }

    /// Apply one command; returns false on shutdown
    pub fn handle(&mut self, cmd: AudioCommand) -> bool {
        match cmd {
            AudioCommand::Play(id) => {
                self.report(id, "play", |p| p.play(id));
                if id.is_looping() && !self.looping.contains(&id) {
                    self.looping.push(id);
                }
            }
            AudioCommand::Pause(id) => self.report(id, "pause", |p| p.pause(id)),
            AudioCommand::Resume(id) => self.report(id, "resume", |p| p.resume(id)),
            AudioCommand::Stop(id) => {
                self.report(id, "stop", |p| p.stop(id));
                self.looping.retain(|&s| s != id);
                if self.current_track == Some(id) {
                    self.current_track = None;
                }
            }
            AudioCommand::PauseAll => {
                if !self.paused {
                    self.paused = true;
                    for id in self.looping.clone() {
                        self.report(id, "pause", |p| p.pause(id));
                    }
                }
            }
            AudioCommand::ResumeAll => {
                if self.paused {
                    self.paused = false;
                    for id in self.looping.clone() {
                        self.report(id, "resume", |p| p.resume(id));
                    }
                }
            }
            AudioCommand::StartMusic => {
                if self.current_track.is_none() {
                    self.advance_track();
                }
            }
            AudioCommand::Timing(remaining) => {
                self.poll = remaining.max(Duration::from_millis(1));
            }
            AudioCommand::Shutdown => return false,
        }
        true
    }

    /// Move to the next track when the current one has ended
    pub fn update_music(&mut self) {
        if self.paused {
            return;
        }
        if let Some(track) = self.current_track {
            if self.player.is_finished(track) {
                log::debug!("Track finished: {}", track.asset_path());
                self.looping.retain(|&s| s != track);
                self.advance_track();
            }
        }
    }

    fn advance_track(&mut self) {
        self.current_track = self.playlist.next_track();
        if let Some(track) = self.current_track {
            log::info!("Now playing {}", track.asset_path());
            self.report(track, "play", |p| p.play(track));
            self.looping.push(track);
        }
    }

    fn stop_all(&mut self) {
        for id in std::mem::take(&mut self.looping) {
            self.report(id, "stop", |p| p.stop(id));
        }
        self.current_track = None;
    }

    fn report(
        &mut self,
        id: SoundId,
        action: &str,
        f: impl FnOnce(&mut P) -> Result<(), AudioError>,
    ) {
        if let Err(err) = f(&mut self.player) {
            log::warn!("Failed to {action} {:?}: {err}", id);
        }
    }

    /// Worker thread body
    pub fn run(mut self, rx: Receiver<AudioCommand>) {
        loop {
            match rx.recv_timeout(self.poll) {
                Ok(cmd) => {
                    if !self.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.update_music();
        }
        self.stop_all();
        log::debug!("Audio worker stopped");
    }
}

/// Game-side handle to the audio worker
///
/// Sends never block. Dropping the dispatcher shuts the worker down and joins it.
pub struct AudioDispatcher {
    tx: Option<Sender<AudioCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl AudioDispatcher {
    /// Start the worker thread with `player` as backend
    pub fn spawn<P: SoundPlayer>(player: P, track_count: usize, seed: u64) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let worker = AudioWorker::new(player, MusicPlaylist::new(track_count, seed));
        match thread::Builder::new()
            .name("audio".into())
            .spawn(move || worker.run(rx))
        {
            Ok(handle) => Self {
                tx: Some(tx),
                worker: Some(handle),
            },
            Err(err) => {
                log::warn!("Failed to start audio worker: {err} - audio disabled");
                Self::disabled()
            }
        }
    }

    /// A dispatcher that drops every command
    pub fn disabled() -> Self {
        Self {
            tx: None,
            worker: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn send(&self, cmd: AudioCommand) {
        if let Some(tx) = &self.tx {
            if tx.send(cmd).is_err() {
                log::trace!("Audio worker gone, dropped {:?}", cmd);
            }
        }
    }

    /// Forward the time left in this tick
    pub fn timing(&self, remaining: Duration) {
        self.send(AudioCommand::Timing(remaining));
    }
}

impl Drop for AudioDispatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(AudioCommand::Shutdown);
        }
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::warn!("Audio worker panicked");
            }
        }
    }
}

/// Backend that logs instead of making noise
///
/// Music tracks "finish" after `track_length` of wall time.
pub struct LogSoundPlayer {
    sfx_volume: f32,
    music_volume: f32,
    track_length: Duration,
    started: HashMap<SoundId, Instant>,
}

impl LogSoundPlayer {
    pub fn new(sfx_volume: f32, music_volume: f32, track_length: Duration) -> Self {
        Self {
            sfx_volume,
            music_volume,
            track_length,
            started: HashMap::new(),
        }
    }

    fn volume(&self, id: SoundId) -> f32 {
        if id.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        }
    }
}

impl SoundPlayer for LogSoundPlayer {
    fn play(&mut self, id: SoundId) -> Result<(), AudioError> {
        if let SoundId::Music(i) = id {
            if i >= MUSIC_TRACKS.len() {
                return Err(AudioError::Unavailable(id));
            }
        }
        log::debug!("[audio] play {} at {:.2}", id.asset_path(), self.volume(id));
        if id.is_music() {
            self.started.insert(id, Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self, id: SoundId) -> Result<(), AudioError> {
        log::debug!("[audio] pause {}", id.asset_path());
        Ok(())
    }

    fn resume(&mut self, id: SoundId) -> Result<(), AudioError> {
        log::debug!("[audio] resume {}", id.asset_path());
        Ok(())
    }

    fn stop(&mut self, id: SoundId) -> Result<(), AudioError> {
        log::debug!("[audio] stop {}", id.asset_path());
        self.started.remove(&id);
        Ok(())
    }

    fn is_finished(&mut self, id: SoundId) -> bool {
        self.started
            .get(&id)
            .is_some_and(|t| t.elapsed() >= self.track_length)
    }
}
