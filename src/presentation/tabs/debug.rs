use crate::domain::link::LinkState;
use crate::presentation::app::RemoteApp;
use crate::presentation::components::Components;
use eframe::egui;

pub fn render(app: &mut RemoteApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Debug & Internal State");
    ui.add_space(20.0);

    Components::brutalist_card(ui, "Link", |ui| {
        ui.horizontal(|ui| {
            ui.label("State:");
            let color = match app.link_state {
                LinkState::Connected => egui::Color32::from_rgb(0, 255, 100),
                LinkState::Connecting => egui::Color32::from_rgb(255, 200, 0),
                LinkState::Disconnected => egui::Color32::from_gray(150),
            };
            ui.label(
                egui::RichText::new(app.link_state.to_string())
                    .color(color)
                    .strong(),
            );
        });
        if let Some(name) = &app.device_name {
            ui.label(format!("Device: {}", name));
        }
        if let Some(msg) = &app.status_message {
            ui.label(
                egui::RichText::new(&msg.message)
                    .color(Components::severity_color(msg.severity)),
            );
        }
    });

    ui.add_space(10.0);

    Components::brutalist_card(ui, "Dispatcher", |ui| {
        egui::Grid::new("dispatch_grid")
            .spacing([20.0, 5.0])
            .show(ui, |ui| {
                ui.label("Running:");
                ui.label(app.session.is_running().to_string());
                ui.end_row();
                ui.label("Active zone:");
                let zone = app.session.active_zone();
                let byte = zone
                    .command_byte()
                    .map(|b| format!("'{}'", b as char))
                    .unwrap_or_else(|| "-".to_string());
                ui.label(format!("{} {}", zone, byte));
                ui.end_row();
                if let Some(stats) = app.session.stats() {
                    ui.label("Ticks:");
                    ui.label(stats.ticks().to_string());
                    ui.end_row();
                    ui.label("Sent:");
                    ui.label(stats.sent().to_string());
                    ui.end_row();
                    ui.label("Skipped:");
                    ui.label(stats.skipped().to_string());
                    ui.end_row();
                }
            });
    });

    ui.add_space(10.0);

    Components::brutalist_card(ui, "Event Log", |ui| {
        ui.label(format!("{} entries", app.session.log().len()));
        egui::ScrollArea::vertical()
            .id_salt("event_log")
            .max_height(240.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in app.session.log().iter() {
                    ui.label(egui::RichText::new(line).monospace());
                }
            });
    });
}
