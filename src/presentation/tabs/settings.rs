use crate::domain::models::{MessageSeverity, StatusMessage};
use crate::presentation::app::RemoteApp;
use crate::presentation::components::Components;
use eframe::egui;
use tracing::error;

pub fn render(app: &mut RemoteApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Settings");
    ui.add_space(20.0);

    let mut saved = None;

    if let Ok(mut settings) = app.settings.lock() {
        let settings_mut = settings.get_mut();

        Components::brutalist_card(ui, "Drive", |ui| {
            ui.horizontal(|ui| {
                ui.label("Command period (ms):");
                ui.add(egui::Slider::new(&mut settings_mut.tick_period_ms, 20..=500));
            });
            ui.checkbox(&mut settings_mut.show_turbo_row, "Show turbo row at startup");
            ui.horizontal(|ui| {
                ui.label("Event log size:");
                ui.add(egui::Slider::new(
                    &mut settings_mut.event_log_capacity,
                    10..=2000,
                ));
            });
            ui.label(
                egui::RichText::new("Period and log size take effect on next launch.")
                    .weak()
                    .small(),
            );
        });

        ui.add_space(10.0);

        Components::brutalist_card(ui, "Serial Link", |ui| {
            ui.horizontal(|ui| {
                ui.label("Default device:");
                ui.text_edit_singleline(&mut settings_mut.device_path);
            });
            ui.checkbox(
                &mut settings_mut.listen_for_replies,
                "Read replies from the car",
            );
            if !settings_mut.known_device_paths.is_empty()
                && ui.button("Forget recent devices").clicked()
            {
                settings_mut.known_device_paths.clear();
                settings_mut.last_device_path = None;
            }
        });

        ui.add_space(10.0);

        Components::brutalist_card(ui, "Logging", |ui| {
            let log = &mut settings_mut.log_settings;
            egui::ComboBox::from_label("Level")
                .selected_text(log.level.clone())
                .show_ui(ui, |ui| {
                    for level in ["trace", "debug", "info", "warn", "error"] {
                        ui.selectable_value(&mut log.level, level.to_string(), level);
                    }
                });
            ui.checkbox(&mut log.console_logging_enabled, "Console output");
            ui.checkbox(&mut log.file_logging_enabled, "Write log files");
            if log.file_logging_enabled {
                ui.indent("log_file_indent", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Directory:");
                        ui.text_edit_singleline(&mut log.log_dir);
                    });
                    egui::ComboBox::from_label("Rotation")
                        .selected_text(log.rotation.clone())
                        .show_ui(ui, |ui| {
                            for rotation in ["minutely", "hourly", "daily", "never"] {
                                ui.selectable_value(
                                    &mut log.rotation,
                                    rotation.to_string(),
                                    rotation,
                                );
                            }
                        });
                });
            }
            ui.label(
                egui::RichText::new("Logging changes take effect on next launch.")
                    .weak()
                    .small(),
            );
        });

        ui.add_space(20.0);

        if ui.button("Save Settings").clicked() {
            saved = Some(match settings.save() {
                Ok(()) => StatusMessage::new("Settings saved", MessageSeverity::Success),
                Err(e) => {
                    error!("Failed to save settings: {}", e);
                    StatusMessage::new(
                        format!("Failed to save settings: {}", e),
                        MessageSeverity::Error,
                    )
                }
            });
        }
    }

    if let Some(msg) = saved {
        app.show_toast(msg.message.clone(), msg.severity);
        app.status_message = Some(msg);
    }
}
