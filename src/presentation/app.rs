use crate::domain::layout::LayoutSnapshot;
use crate::domain::link::{Link, LinkState};
use crate::domain::models::{AppEvent, LinkCommand, MessageSeverity, StatusMessage, Tab};
use crate::domain::resolver::{PointerEvent, PointerPhase};
use crate::domain::session::ControlSession;
use crate::domain::settings::SettingsService;
use crate::infrastructure::link::{service, SerialLink};
use crate::presentation::panel::PanelResponse;
use anyhow::Context;
use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::error;

pub const TOAST_DURATION: Duration = Duration::from_secs(2);

pub(crate) struct Toast {
    pub(crate) message: StatusMessage,
    pub(crate) shown_at: Instant,
}

pub struct RemoteApp {
    // Services
    pub(crate) settings: Arc<Mutex<SettingsService>>,
    pub(crate) runtime: Option<tokio::runtime::Runtime>,
    pub(crate) link: Arc<SerialLink>,
    pub(crate) link_tx: mpsc::UnboundedSender<LinkCommand>,
    pub(crate) events_rx: mpsc::UnboundedReceiver<AppEvent>,
    pub(crate) session: ControlSession,

    // State
    pub(crate) link_state: LinkState,
    pub(crate) device_name: Option<String>,
    pub(crate) status_message: Option<StatusMessage>,
    pub(crate) toast: Option<Toast>,

    // UI State
    pub(crate) selected_tab: Tab,
    pub(crate) device_path_input: String,
    pub(crate) outgoing: String,
    pub(crate) show_turbo_row: bool,
    pub(crate) is_dark_mode: bool,

    // Logging guard
    pub(crate) _logging_guard: Option<crate::infrastructure::logging::LoggingGuard>,
}

impl RemoteApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        crate::presentation::theme::apply_style(&cc.egui_ctx, false);

        let settings_service = SettingsService::new()?;

        let logging_guard =
            crate::infrastructure::logging::init_logger(&settings_service.get().log_settings)
                .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
                .ok();

        tracing::info!("Starting Nikko RC Remote");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("rc-remote")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        let (tick_period, log_capacity, show_turbo_row, device_path) = {
            let settings = settings_service.get();
            (
                settings.tick_period(),
                settings.event_log_capacity,
                settings.show_turbo_row,
                settings
                    .last_device_path
                    .clone()
                    .unwrap_or_else(|| settings.device_path.clone()),
            )
        };

        let settings = Arc::new(Mutex::new(settings_service));
        let (event_tx, events_rx) = mpsc::unbounded_channel();
        let link = Arc::new(SerialLink::new(event_tx));
        let link_tx = service::spawn(runtime.handle(), link.clone(), settings.clone());
        let session_link: Arc<dyn Link> = link.clone();
        let session = ControlSession::start(session_link, tick_period, log_capacity, runtime.handle());

        Ok(Self {
            settings,
            runtime: Some(runtime),
            link,
            link_tx,
            events_rx,
            session,
            link_state: LinkState::Disconnected,
            device_name: None,
            status_message: None,
            toast: None,
            selected_tab: Tab::Drive,
            device_path_input: device_path,
            outgoing: String::new(),
            show_turbo_row,
            is_dark_mode: false,
            _logging_guard: logging_guard,
        })
    }

    pub(crate) fn show_toast(&mut self, message: impl Into<String>, severity: MessageSeverity) {
        self.toast = Some(Toast {
            message: StatusMessage::new(message, severity),
            shown_at: Instant::now(),
        });
    }

    pub(crate) fn connect(&mut self) {
        let path = self.device_path_input.trim();
        if path.is_empty() {
            self.show_toast("Enter a device path first", MessageSeverity::Warning);
            return;
        }
        let command = LinkCommand::Connect(path.into());
        self.send_link_command(command);
    }

    pub(crate) fn disconnect(&mut self) {
        self.send_link_command(LinkCommand::Disconnect);
    }

    fn send_link_command(&mut self, command: LinkCommand) {
        if let Some(failure) = forward_link_command(&self.link_tx, command) {
            self.show_toast(failure.message.clone(), failure.severity);
            self.status_message = Some(failure);
        }
    }

    pub(crate) fn send_outgoing(&mut self) {
        match self.session.send_message(&self.outgoing) {
            Ok(true) => self.outgoing.clear(),
            Ok(false) => {}
            Err(e) => self.show_toast(e.to_string(), MessageSeverity::Warning),
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::LinkState(state) => {
                    self.link_state = state;
                    self.session.on_link_state(state);
                    if state == LinkState::Disconnected {
                        self.device_name = None;
                    }
                }
                AppEvent::DeviceName(name) => {
                    self.show_toast(format!("Connected to {}", name), MessageSeverity::Success);
                    self.device_name = Some(name);
                }
                AppEvent::Received(bytes) => self.session.on_received(&bytes),
                AppEvent::LogMessage(msg) => {
                    if matches!(msg.severity, MessageSeverity::Warning | MessageSeverity::Error) {
                        self.show_toast(msg.message.clone(), msg.severity);
                    }
                    self.status_message = Some(msg);
                }
            }
        }
    }

    /// Feed this frame's pointer input to the session, hit-testing against
    /// the pad as it was laid out this frame.
    fn handle_pointer(&mut self, ctx: &egui::Context, panel: &PanelResponse) {
        let events = ctx.input(|i| i.events.clone());
        for event in &events {
            let dragging = self.session.is_gesture_active();
            if let Some(pointer) = pointer_event(event, panel.rect, dragging) {
                self.session.on_pointer_event(pointer, &panel.layout);
            }
        }
    }
}

/// Hand `command` to the link service, or describe why it could not be.
pub(crate) fn forward_link_command(
    link_tx: &mpsc::UnboundedSender<LinkCommand>,
    command: LinkCommand,
) -> Option<StatusMessage> {
    match link_tx.send(command) {
        Ok(()) => None,
        Err(mpsc::error::SendError(command)) => {
            error!("Link service is not running, dropped {:?}", command);
            Some(StatusMessage::new(
                "Link service is not running",
                MessageSeverity::Error,
            ))
        }
    }
}

/// Map one egui input event onto the pad. A gesture starts only with a
/// primary press inside `pad`; after that, moves and the release count
/// wherever they land.
pub(crate) fn pointer_event(
    event: &egui::Event,
    pad: egui::Rect,
    dragging: bool,
) -> Option<PointerEvent> {
    match *event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: true,
            ..
        } if !dragging && pad.contains(pos) => Some(PointerEvent::new(pos.x, pos.y, PointerPhase::Down)),
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: false,
            ..
        } if dragging => Some(PointerEvent::new(pos.x, pos.y, PointerPhase::Up)),
        egui::Event::PointerMoved(pos) if dragging => {
            Some(PointerEvent::new(pos.x, pos.y, PointerPhase::Move))
        }
        egui::Event::PointerGone if dragging => Some(PointerEvent::new(0.0, 0.0, PointerPhase::Up)),
        _ => None,
    }
}

/// A gesture can't outlive the pad it started on.
pub(crate) fn end_gesture(session: &mut ControlSession) {
    if session.is_gesture_active() {
        session.on_pointer_event(
            PointerEvent::new(0.0, 0.0, PointerPhase::Up),
            &LayoutSnapshot::default(),
        );
    }
}

impl eframe::App for RemoteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() >= TOAST_DURATION)
        {
            self.toast = None;
        }

        ctx.request_repaint_after(Duration::from_millis(50));

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.selected_tab, Tab::Drive, "Drive");
                ui.selectable_value(&mut self.selected_tab, Tab::Settings, "Settings");
                ui.selectable_value(&mut self.selected_tab, Tab::Debug, "Debug");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let switch_icon = if self.is_dark_mode {
                        "☀ Light"
                    } else {
                        "🌙 Dark"
                    };
                    if ui.button(switch_icon).clicked() {
                        self.is_dark_mode = !self.is_dark_mode;
                        crate::presentation::theme::apply_style(ctx, self.is_dark_mode);
                    }
                });
            });
        });

        if let Some(toast) = &self.toast {
            let color = crate::presentation::components::Components::severity_color(
                toast.message.severity,
            );
            let text = toast.message.message.clone();
            egui::TopBottomPanel::bottom("toast_panel").show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(text).color(color).strong());
                });
            });
        }

        let panel = egui::CentralPanel::default()
            .show(ctx, |ui| {
                use crate::presentation::tabs;
                match self.selected_tab {
                    Tab::Drive => Some(tabs::drive::render(self, ui)),
                    Tab::Settings => {
                        egui::ScrollArea::vertical().show(ui, |ui| tabs::settings::render(self, ui));
                        None
                    }
                    Tab::Debug => {
                        egui::ScrollArea::vertical().show(ui, |ui| tabs::debug::render(self, ui));
                        None
                    }
                }
            })
            .inner;

        match panel {
            Some(panel) => self.handle_pointer(ctx, &panel),
            None => end_gesture(&mut self.session),
        }
    }
}

impl Drop for RemoteApp {
    fn drop(&mut self) {
        self.session.teardown();
        self.link.close();
        if let Some(runtime) = self.runtime.take() {
            // A pending RFCOMM open may block for a while; don't wait on it.
            runtime.shutdown_background();
        }
        tracing::info!("Nikko RC Remote stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layout::Rect;
    use crate::domain::zone::{PanelRow, Zone};
    use crate::infrastructure::link::recording::RecordingLink;

    fn pad() -> egui::Rect {
        egui::Rect::from_min_max(egui::pos2(100.0, 100.0), egui::pos2(300.0, 300.0))
    }

    fn press(x: f32, y: f32, button: egui::PointerButton, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn phase(event: Option<PointerEvent>) -> Option<PointerPhase> {
        event.map(|e| e.phase)
    }

    #[test]
    fn test_primary_press_inside_pad_starts_gesture() {
        let event = pointer_event(
            &press(150.0, 160.0, egui::PointerButton::Primary, true),
            pad(),
            false,
        );
        assert_eq!(event, Some(PointerEvent::new(150.0, 160.0, PointerPhase::Down)));
    }

    #[test]
    fn test_other_presses_are_ignored() {
        let outside = press(20.0, 20.0, egui::PointerButton::Primary, true);
        assert_eq!(pointer_event(&outside, pad(), false), None);

        let secondary = press(150.0, 150.0, egui::PointerButton::Secondary, true);
        assert_eq!(pointer_event(&secondary, pad(), false), None);
    }

    #[test]
    fn test_press_outside_then_move_into_pad_is_ignored() {
        let mut dragging = false;
        for event in [
            press(20.0, 20.0, egui::PointerButton::Primary, true),
            egui::Event::PointerMoved(egui::pos2(150.0, 150.0)),
            press(150.0, 150.0, egui::PointerButton::Primary, false),
        ] {
            let mapped = pointer_event(&event, pad(), dragging);
            assert_eq!(mapped, None);
            dragging = phase(mapped) == Some(PointerPhase::Down);
        }
    }

    #[test]
    fn test_moves_and_release_count_only_while_dragging() {
        let moved = egui::Event::PointerMoved(egui::pos2(500.0, 40.0));
        assert_eq!(pointer_event(&moved, pad(), false), None);
        assert_eq!(
            pointer_event(&moved, pad(), true),
            Some(PointerEvent::new(500.0, 40.0, PointerPhase::Move))
        );

        let release = press(500.0, 40.0, egui::PointerButton::Primary, false);
        assert_eq!(pointer_event(&release, pad(), false), None);
        assert_eq!(phase(pointer_event(&release, pad(), true)), Some(PointerPhase::Up));
    }

    #[test]
    fn test_pointer_gone_ends_gesture() {
        assert_eq!(pointer_event(&egui::Event::PointerGone, pad(), false), None);
        assert_eq!(
            phase(pointer_event(&egui::Event::PointerGone, pad(), true)),
            Some(PointerPhase::Up)
        );
    }

    #[tokio::test]
    async fn test_leaving_the_pad_clears_the_zone() {
        let link: Arc<dyn Link> = Arc::new(RecordingLink::connected());
        let mut session =
            ControlSession::start(link, Duration::from_secs(60), 10, &tokio::runtime::Handle::current());
        let layout = LayoutSnapshot::new(0.0, 0.0)
            .with_row(PanelRow::Up, 0.0)
            .with_button(Zone::Up, Rect::new(0.0, 0.0, 50.0, 50.0));

        session.on_pointer_event(PointerEvent::new(25.0, 25.0, PointerPhase::Down), &layout);
        assert_eq!(session.active_zone(), Zone::Up);

        end_gesture(&mut session);
        assert_eq!(session.active_zone(), Zone::None);
        assert!(!session.is_gesture_active());
    }

    #[test]
    fn test_dead_link_service_is_reported() {
        let (tx, rx) = mpsc::unbounded_channel();
        assert!(forward_link_command(&tx, LinkCommand::Disconnect).is_none());

        drop(rx);
        let failure = forward_link_command(&tx, LinkCommand::Disconnect).unwrap();
        assert_eq!(failure.severity, MessageSeverity::Error);
    }
}
