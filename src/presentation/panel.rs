//! Directional control pad.
//!
//! Draws the rows of drive buttons and measures them into a
//! [`LayoutSnapshot`] on every frame, so a row that is hidden or moved is
//! reflected in the next hit test.

use crate::domain::layout::{LayoutSnapshot, Rect};
use crate::domain::zone::{PanelRow, Zone};
use crate::presentation::theme::RemotePalette;
use eframe::egui;

pub const BUTTON_SIZE: f32 = 76.0;

pub struct PanelResponse {
    /// Screen area covered by the pad. Gestures start only inside it.
    pub rect: egui::Rect,
    pub layout: LayoutSnapshot,
}

pub fn show(
    ui: &mut egui::Ui,
    main_top: f32,
    show_turbo_row: bool,
    active: Zone,
    palette: &RemotePalette,
) -> PanelResponse {
    let pad = ui.vertical(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);
        let mut rows = Vec::new();
        for row in PanelRow::ALL {
            if row == PanelRow::Turbo && !show_turbo_row {
                continue;
            }
            let measured = ui.horizontal(|ui| {
                let mut buttons = Vec::new();
                for slot in row.slots() {
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(BUTTON_SIZE, BUTTON_SIZE),
                        egui::Sense::hover(),
                    );
                    if let Some(zone) = slot {
                        paint_button(ui, rect, zone, zone == active, palette);
                        buttons.push((zone, rect));
                    }
                }
                buttons
            });
            rows.push((row, measured.response.rect, measured.inner));
        }
        rows
    });

    let pad_rect = pad.response.rect;
    let mut layout = LayoutSnapshot::new(main_top, pad_rect.top() - main_top);
    for (row, row_rect, buttons) in pad.inner {
        layout.set_row_top(row, row_rect.top() - pad_rect.top());
        for (zone, rect) in buttons {
            layout.set_button(
                zone,
                Rect::new(
                    rect.left(),
                    rect.top() - row_rect.top(),
                    rect.right(),
                    rect.bottom() - row_rect.top(),
                ),
            );
        }
    }

    PanelResponse {
        rect: pad_rect,
        layout,
    }
}

fn paint_button(
    ui: &egui::Ui,
    rect: egui::Rect,
    zone: Zone,
    active: bool,
    palette: &RemotePalette,
) {
    let painter = ui.painter();
    let stroke_width = if active { 4.0 } else { 2.0 };
    painter.rect(
        rect,
        0.0,
        palette.zone_fill(zone, active),
        egui::Stroke::new(stroke_width, palette.stroke),
    );
    let text_color = if active {
        egui::Color32::BLACK
    } else {
        palette.fg
    };
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        zone.glyph(),
        egui::FontId::proportional(26.0),
        text_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolver::hit_test;

    fn measure(show_turbo_row: bool) -> PanelResponse {
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(600.0, 900.0),
            )),
            ..Default::default()
        };
        let mut measured = None;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let main_top = ui.max_rect().top();
                ui.add_space(40.0);
                let palette = RemotePalette::new(false);
                measured = Some(show(ui, main_top, show_turbo_row, Zone::None, &palette));
            });
        });
        measured.unwrap()
    }

    #[test]
    fn test_button_centres_hit_their_zone() {
        let panel = measure(true);
        for zone in Zone::EVALUATION_ORDER {
            let rect = panel.layout.hit_rect(zone);
            let x = (rect.left + rect.right) / 2.0;
            let y = (rect.top + rect.bottom) / 2.0;
            assert_eq!(hit_test(x, y, &panel.layout), zone, "{}", zone);
            assert!(panel.rect.contains(egui::pos2(x, y)));
        }
    }

    #[test]
    fn test_hidden_turbo_row_never_matches() {
        let panel = measure(false);
        for zone in [Zone::TurboUp, Zone::TurboUpLeft, Zone::TurboUpRight] {
            assert!(panel.layout.button(zone).is_degenerate());
        }
        // The up row now sits at the top of the pad.
        let up = panel.layout.hit_rect(Zone::Up);
        assert!((up.top - panel.rect.top()).abs() < 0.5);
    }

    #[test]
    fn test_centre_slot_is_dead() {
        let panel = measure(true);
        let left = panel.layout.hit_rect(Zone::Left);
        let right = panel.layout.hit_rect(Zone::Right);
        let x = (left.right + right.left) / 2.0;
        let y = (left.top + left.bottom) / 2.0;
        assert_eq!(hit_test(x, y, &panel.layout), Zone::None);
    }
}
