//! Pointer → zone resolution.

use crate::domain::layout::LayoutSnapshot;
use crate::domain::zone::Zone;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, phase: PointerPhase) -> Self {
        Self { x, y, phase }
    }
}

/// Tracks one gesture at a time and maps each pointer event to a zone.
#[derive(Debug, Default)]
pub struct ZoneResolver {
    dragging: bool,
}

impl ZoneResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `event` against the layout measured for it.
    ///
    /// A release always yields [`Zone::None`] and ends the gesture without
    /// hit-testing.
    pub fn resolve(&mut self, event: &PointerEvent, layout: &LayoutSnapshot) -> Zone {
        match event.phase {
            PointerPhase::Up => {
                self.dragging = false;
                debug!("Gesture ended at ({:.1}, {:.1})", event.x, event.y);
                Zone::None
            }
            PointerPhase::Down | PointerPhase::Move => {
                if event.phase == PointerPhase::Down {
                    self.dragging = true;
                }
                let zone = hit_test(event.x, event.y, layout);
                trace!(
                    "{:?} at ({:.1}, {:.1}) -> {}",
                    event.phase,
                    event.x,
                    event.y,
                    zone
                );
                zone
            }
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// Strict-inequality hit test over every zone in evaluation order.
/// The last passing zone wins.
pub fn hit_test(x: f32, y: f32, layout: &LayoutSnapshot) -> Zone {
    let mut hit = Zone::None;
    for zone in Zone::EVALUATION_ORDER {
        let rect = layout.hit_rect(zone);
        if rect.left < x && rect.right > x && rect.bottom > y && rect.top < y {
            hit = zone;
        }
    }
    hit
}
