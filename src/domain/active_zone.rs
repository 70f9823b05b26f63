use crate::domain::zone::Zone;
use std::sync::atomic::{AtomicU8, Ordering};

/// Single-slot cell holding the zone the pointer currently occupies.
///
/// Written from the input thread, read by the dispatcher task.
#[derive(Debug, Default)]
pub struct ActiveZone(AtomicU8);

impl ActiveZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Zone {
        Zone::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Store `zone` and return the previous value.
    pub fn replace(&self, zone: Zone) -> Zone {
        Zone::from_u8(self.0.swap(zone as u8, Ordering::AcqRel))
    }

    pub fn clear(&self) {
        self.0.store(Zone::None as u8, Ordering::Release);
    }
}
