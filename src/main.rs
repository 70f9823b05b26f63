use eframe::egui;
use nikko_rc_remote::presentation::app::RemoteApp;

fn main() -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 860.0])
            .with_title("Nikko RC Remote"),
        ..Default::default()
    };

    eframe::run_native(
        "Nikko RC Remote",
        options,
        Box::new(|cc| {
            let app: Box<dyn eframe::App> = Box::new(RemoteApp::new(cc)?);
            Ok(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
