//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies; side effects leave as
//!   [`GameEvent`]s

pub mod collision;
pub mod environment;
pub mod hazard;
pub mod player;
#[cfg(test)]
mod properties;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, HazardContact, Rect, resolve_collisions};
pub use environment::{Environment, Rain, RainDrop};
pub use hazard::{FlyerAltitude, Hazard, HazardKind, PowerUp, SwoopState};
pub use player::{HeldInput, Player, RunState};
pub use snapshot::{DebugOverlay, HitboxOwner, RenderSnapshot};
pub use spawn::{SpawnContext, SpawnDirector, SpawnKind};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{InputEvent, TickInput, handle_input, tick};
