//! Hitboxes and collision resolution
//!
//! Everything collides as an axis-aligned rectangle. Sprites carry a per-kind
//! inset so the hitbox hugs the visible shape instead of the image bounds.

use glam::Vec2;
use serde::Serialize;

use super::state::GameState;
use crate::consts::INVINCIBILITY_TICKS;

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test: touching edges do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shift vertically by `dy`
    pub fn offset_y(mut self, dy: f32) -> Self {
        self.y += dy;
        self
    }
}

/// Deltas added to a sprite rectangle to get its hitbox
///
/// `dx`/`dy` move the origin, `dw`/`dh` grow the size (negative shrinks).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inset {
    pub dx: f32,
    pub dy: f32,
    pub dw: f32,
    pub dh: f32,
}

impl Inset {
    pub const NONE: Inset = Inset::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(dx: f32, dy: f32, dw: f32, dh: f32) -> Self {
        Self { dx, dy, dw, dh }
    }

    pub fn apply(&self, pos: Vec2, size: Vec2) -> Rect {
        Rect::new(
            pos.x + self.dx,
            pos.y + self.dy,
            size.x + self.dw,
            size.y + self.dh,
        )
    }
}

/// What a hazard contact did to the session this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardContact {
    /// No contact, or contact ignored (invincible / collisions disabled)
    None,
    /// Shield absorbed the hit; invincibility window started
    ShieldPopped,
    /// Unshielded hit: the run is over
    Fatal,
}

/// Result of one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    /// A power-up was collected (shield activated)
    pub collected: bool,
    pub contact: HazardContact,
}

/// Resolve player contacts against power-ups, then hazards
///
/// Applies the shield and invincibility rules in place. Ending the run on a
/// fatal contact is left to the state machine.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let now = state.time_ticks;
    let player_box = state.player.hitbox();

    // (a) power-ups: first intersecting one is collected
    let mut collected = false;
    if let Some(idx) = state
        .power_ups
        .iter()
        .position(|p| !p.collected && p.hitbox(now).intersects(&player_box))
    {
        let mut power_up = state.power_ups.remove(idx);
        power_up.collected = true;
        log::debug!("power-up {} collected at tick {}", power_up.id, now);
        state.player.activate_shield(now);
        collected = true;
    }

    // (b) hazards
    let mut contact = HazardContact::None;
    if state.debug.collisions
        && state.invincibility_ticks == 0
        && state
            .hazards
            .iter()
            .any(|h| h.hitbox().intersects(&player_box))
    {
        if state.player.pop_shield() {
            state.invincibility_ticks = INVINCIBILITY_TICKS;
            log::debug!("shield absorbed hit at tick {}", now);
            contact = HazardContact::ShieldPopped;
        } else {
            contact = HazardContact::Fatal;
        }
    }

    CollisionReport { collected, contact }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_degenerate_never_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let flat = Rect::new(2.0, 2.0, 5.0, 0.0);
        assert!(!a.intersects(&flat));
    }

    #[test]
    fn test_inset_apply() {
        let inset = Inset::new(12.0, 26.0, -32.0, -42.0);
        let r = inset.apply(Vec2::new(120.0, 186.0), Vec2::new(88.0, 94.0));
        assert_eq!(r, Rect::new(132.0, 212.0, 56.0, 52.0));
    }
}
