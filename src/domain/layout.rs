//! Control panel geometry.
//!
//! A [`LayoutSnapshot`] is measured by the host right before each pointer
//! event is resolved. Coordinates nest the same way the widgets do:
//!
//! ```text
//! main container (main_top)
//! └── pad container (pad_top, relative to main)
//!     └── row (row top, relative to pad)
//!         └── button rect (top/bottom relative to row, left/right absolute)
//! ```

use crate::domain::zone::{PanelRow, Zone};
use std::collections::HashMap;

/// Axis-aligned rectangle in layout-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A widget that has not been laid out yet reports empty bounds.
    pub fn is_degenerate(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    pub main_top: f32,
    pub pad_top: f32,
    row_tops: HashMap<PanelRow, f32>,
    buttons: HashMap<Zone, Rect>,
}

impl LayoutSnapshot {
    pub fn new(main_top: f32, pad_top: f32) -> Self {
        Self {
            main_top,
            pad_top,
            ..Default::default()
        }
    }

    pub fn with_row(mut self, row: PanelRow, top: f32) -> Self {
        self.set_row_top(row, top);
        self
    }

    pub fn with_button(mut self, zone: Zone, rect: Rect) -> Self {
        self.set_button(zone, rect);
        self
    }

    pub fn set_row_top(&mut self, row: PanelRow, top: f32) {
        self.row_tops.insert(row, top);
    }

    pub fn set_button(&mut self, zone: Zone, rect: Rect) {
        if zone != Zone::None {
            self.buttons.insert(zone, rect);
        }
    }

    /// Top of `row` relative to the pad. Unmeasured rows sit at zero.
    pub fn row_top(&self, row: PanelRow) -> f32 {
        self.row_tops.get(&row).copied().unwrap_or_default()
    }

    /// Button bounds as measured, or all-zero when the button is not laid out.
    pub fn button(&self, zone: Zone) -> Rect {
        self.buttons.get(&zone).copied().unwrap_or_default()
    }

    /// Vertical offset shared by every row.
    pub fn offset(&self) -> f32 {
        self.main_top + self.pad_top
    }

    /// Bounds of `zone` in pointer coordinates.
    pub fn hit_rect(&self, zone: Zone) -> Rect {
        let rect = self.button(zone);
        let base = match zone.row() {
            Some(row) => self.offset() + self.row_top(row),
            None => return Rect::default(),
        };
        Rect::new(rect.left, base + rect.top, rect.right, base + rect.bottom)
    }
}
