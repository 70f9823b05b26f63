use crate::domain::zone::Zone;
use eframe::egui;

pub struct RemotePalette {
    pub bg: egui::Color32,
    pub fg: egui::Color32,
    pub stroke: egui::Color32,
    pub pad_idle: egui::Color32,
    pub pad_turbo: egui::Color32,
    pub pad_active: egui::Color32,
    pub accent_yellow: egui::Color32,
    pub accent_cyan: egui::Color32,
}

impl RemotePalette {
    pub fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                bg: egui::Color32::from_rgb(25, 25, 25),
                fg: egui::Color32::WHITE,
                stroke: egui::Color32::WHITE,
                pad_idle: egui::Color32::from_gray(45),
                pad_turbo: egui::Color32::from_rgb(90, 40, 40),
                pad_active: egui::Color32::from_rgb(0, 255, 127),
                accent_yellow: egui::Color32::from_rgb(255, 200, 0),
                accent_cyan: egui::Color32::from_rgb(0, 255, 255),
            }
        } else {
            Self {
                bg: egui::Color32::from_rgb(245, 245, 245),
                fg: egui::Color32::BLACK,
                stroke: egui::Color32::BLACK,
                pad_idle: egui::Color32::WHITE,
                pad_turbo: egui::Color32::from_rgb(255, 210, 200),
                pad_active: egui::Color32::from_rgb(0, 255, 100),
                accent_yellow: egui::Color32::from_rgb(255, 220, 0),
                accent_cyan: egui::Color32::from_rgb(0, 200, 255),
            }
        }
    }

    /// Fill for a pad button.
    pub fn zone_fill(&self, zone: Zone, active: bool) -> egui::Color32 {
        if active {
            self.pad_active
        } else if matches!(
            zone,
            Zone::TurboUp | Zone::TurboUpLeft | Zone::TurboUpRight
        ) {
            self.pad_turbo
        } else {
            self.pad_idle
        }
    }
}

/// Flat, square-cornered style built around the pad palette.
pub fn apply_style(ctx: &egui::Context, is_dark: bool) {
    let palette = RemotePalette::new(is_dark);

    ctx.style_mut(|style| {
        for (text_style, size) in [
            (egui::TextStyle::Heading, 26.0),
            (egui::TextStyle::Body, 15.0),
            (egui::TextStyle::Button, 15.0),
            (egui::TextStyle::Monospace, 13.0),
        ] {
            if let Some(font) = style.text_styles.get_mut(&text_style) {
                font.size = size;
            }
        }
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 8.0);

        let widgets = &mut style.visuals.widgets;
        let states = [
            (&mut widgets.noninteractive, palette.bg, palette.fg, 2.0_f32),
            (&mut widgets.inactive, palette.pad_idle, palette.fg, 2.0),
            (&mut widgets.hovered, palette.accent_yellow, egui::Color32::BLACK, 2.5),
            (&mut widgets.active, palette.pad_active, egui::Color32::BLACK, 3.0),
        ];
        for (state, fill, text, stroke_width) in states {
            state.bg_fill = fill;
            state.weak_bg_fill = fill;
            state.fg_stroke = egui::Stroke::new(1.0, text);
            state.bg_stroke = egui::Stroke::new(stroke_width, palette.stroke);
            state.rounding = egui::Rounding::ZERO;
        }

        let visuals = &mut style.visuals;
        visuals.selection.bg_fill = palette.accent_cyan;
        visuals.selection.stroke = egui::Stroke::new(1.0, palette.stroke);
        visuals.window_rounding = egui::Rounding::ZERO;
        visuals.window_stroke = egui::Stroke::new(2.0, palette.stroke);
        visuals.window_fill = palette.bg;
        visuals.panel_fill = palette.bg;
        visuals.override_text_color = Some(palette.fg);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_fill_marks_active_and_turbo() {
        let palette = RemotePalette::new(false);
        assert_eq!(palette.zone_fill(Zone::Up, false), palette.pad_idle);
        assert_eq!(palette.zone_fill(Zone::TurboUpLeft, false), palette.pad_turbo);
        assert_eq!(palette.zone_fill(Zone::TurboUpLeft, true), palette.pad_active);
    }
}
