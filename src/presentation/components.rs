use crate::domain::link::LinkState;
use crate::domain::models::MessageSeverity;
use eframe::egui;

pub struct Components;

impl Components {
    pub fn heading(ui: &mut egui::Ui, text: &str) {
        ui.label(egui::RichText::new(text).heading().strong());
    }

    pub fn brutalist_card<R>(
        ui: &mut egui::Ui,
        title: &str,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> R {
        let stroke = ui.style().visuals.widgets.noninteractive.bg_stroke;
        let bg = ui.style().visuals.widgets.noninteractive.bg_fill;

        egui::Frame::none()
            .inner_margin(egui::Margin::same(12.0))
            .stroke(stroke)
            .fill(bg)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(title).strong().size(18.0));
                    ui.add_space(6.0);
                    add_contents(ui)
                })
                .inner
            })
            .inner
    }

    pub fn status_banner(
        ui: &mut egui::Ui,
        text: &str,
        bg_color: egui::Color32,
        text_color: egui::Color32,
    ) {
        ui.add_sized(
            [ui.available_width(), 32.0],
            egui::Label::new(
                egui::RichText::new(text)
                    .color(text_color)
                    .background_color(bg_color)
                    .size(16.0)
                    .strong(),
            )
            .wrap_mode(egui::TextWrapMode::Extend),
        );
    }

    pub fn link_banner(ui: &mut egui::Ui, state: LinkState, device_name: Option<&str>) {
        let (text, bg_color, text_color) = match state {
            LinkState::Connected => (
                format!("CONNECTED · {}", device_name.unwrap_or("device")),
                egui::Color32::from_rgb(0, 200, 0),
                egui::Color32::BLACK,
            ),
            LinkState::Connecting => (
                "CONNECTING...".to_string(),
                egui::Color32::from_rgb(255, 200, 0),
                egui::Color32::BLACK,
            ),
            LinkState::Disconnected => (
                "NOT CONNECTED".to_string(),
                egui::Color32::from_gray(100),
                egui::Color32::WHITE,
            ),
        };
        Self::status_banner(ui, &text, bg_color, text_color);
    }

    pub fn severity_color(severity: MessageSeverity) -> egui::Color32 {
        match severity {
            MessageSeverity::Info => egui::Color32::from_rgb(50, 50, 255),
            MessageSeverity::Success => egui::Color32::from_rgb(0, 150, 0),
            MessageSeverity::Warning => egui::Color32::from_rgb(200, 150, 0),
            MessageSeverity::Error => egui::Color32::RED,
        }
    }
}
