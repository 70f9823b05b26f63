use crate::domain::link::LinkState;
use crate::presentation::app::RemoteApp;
use crate::presentation::components::Components;
use crate::presentation::panel::{self, PanelResponse};
use crate::presentation::theme::RemotePalette;
use eframe::egui;

pub fn render(app: &mut RemoteApp, ui: &mut egui::Ui) -> PanelResponse {
    let main_top = ui.max_rect().top();

    Components::heading(ui, "Nikko RC Remote");
    ui.add_space(10.0);

    ui_connection_panel(app, ui);
    ui.add_space(10.0);

    let response = ui_control_pad(app, ui, main_top);
    ui.add_space(10.0);

    ui_message_panel(app, ui);
    response
}

fn ui_connection_panel(app: &mut RemoteApp, ui: &mut egui::Ui) {
    Components::brutalist_card(ui, "Connection", |ui| {
        Components::link_banner(ui, app.link_state, app.device_name.as_deref());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Device:");
            ui.text_edit_singleline(&mut app.device_path_input);
        });

        let known = app
            .settings
            .lock()
            .map(|s| s.get().known_device_paths.clone())
            .unwrap_or_default();
        if !known.is_empty() {
            ui.horizontal_wrapped(|ui| {
                ui.label("Recent:");
                for path in known {
                    if ui.small_button(&path).clicked() {
                        app.device_path_input = path;
                    }
                }
            });
        }

        ui.horizontal(|ui| match app.link_state {
            LinkState::Connected => {
                if ui.button("Disconnect").clicked() {
                    app.disconnect();
                }
            }
            LinkState::Connecting => {
                ui.add_enabled(false, egui::Button::new("Connecting..."));
            }
            LinkState::Disconnected => {
                if ui.button("Connect").clicked() {
                    app.connect();
                }
            }
        });
    });
}

fn ui_control_pad(app: &mut RemoteApp, ui: &mut egui::Ui, main_top: f32) -> PanelResponse {
    Components::brutalist_card(ui, "Drive", |ui| {
        ui.checkbox(&mut app.show_turbo_row, "Show turbo row");
        ui.label(
            egui::RichText::new(format!("Active: {}", app.session.active_zone()))
                .monospace(),
        );
        ui.add_space(6.0);

        let palette = RemotePalette::new(app.is_dark_mode);
        panel::show(
            ui,
            main_top,
            app.show_turbo_row,
            app.session.active_zone(),
            &palette,
        )
    })
}

fn ui_message_panel(app: &mut RemoteApp, ui: &mut egui::Ui) {
    Components::brutalist_card(ui, "Message", |ui| {
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut app.outgoing);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Send").clicked() || submitted {
                app.send_outgoing();
            }
        });

        if let Some(last) = app.session.log().last() {
            ui.label(egui::RichText::new(last).weak().monospace());
        }
    });
}
