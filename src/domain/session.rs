//! One remote-control session: input resolution, dispatch timer and the
//! user message path, all tied to a single link.

use crate::domain::active_zone::ActiveZone;
use crate::domain::dispatcher::{CommandDispatcher, DispatchStats, DispatcherHandle};
use crate::domain::event_log::EventLog;
use crate::domain::layout::LayoutSnapshot;
use crate::domain::link::{Link, LinkError, LinkState};
use crate::domain::resolver::{PointerEvent, PointerPhase, ZoneResolver};
use crate::domain::zone::Zone;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SendError {
    #[error("You are not connected to a device")]
    NotConnected,
    #[error(transparent)]
    Link(#[from] LinkError),
}

pub struct ControlSession {
    link: Arc<dyn Link>,
    resolver: ZoneResolver,
    active_zone: Arc<ActiveZone>,
    dispatcher: Option<DispatcherHandle>,
    log: EventLog,
}

impl ControlSession {
    /// Start a session on `link`. The dispatcher begins ticking right away.
    pub fn start(
        link: Arc<dyn Link>,
        tick_period: Duration,
        log_capacity: usize,
        runtime: &Handle,
    ) -> Self {
        let active_zone = Arc::new(ActiveZone::new());
        let dispatcher =
            CommandDispatcher::new(active_zone.clone(), link.clone()).spawn(tick_period, runtime);
        info!("Control session started (tick every {:?})", tick_period);

        Self {
            link,
            resolver: ZoneResolver::new(),
            active_zone,
            dispatcher: Some(dispatcher),
            log: EventLog::new(log_capacity),
        }
    }

    /// Resolve a pointer event and publish the result to the dispatcher.
    pub fn on_pointer_event(&mut self, event: PointerEvent, layout: &LayoutSnapshot) -> Zone {
        let zone = self.resolver.resolve(&event, layout);
        let previous = self.active_zone.replace(zone);
        if previous != zone {
            debug!("Active zone {} -> {}", previous, zone);
        }

        if event.phase == PointerPhase::Up {
            self.log.push("pointer up");
        }
        self.log.push(zone.to_string());
        zone
    }

    /// Send a user-typed message. Empty messages are ignored and return
    /// `Ok(false)`.
    pub fn send_message(&mut self, message: &str) -> Result<bool, SendError> {
        if self.link.connection_state() != LinkState::Connected {
            return Err(SendError::NotConnected);
        }
        if message.is_empty() {
            return Ok(false);
        }

        self.link.write(message.as_bytes())?;
        self.log.push(format!("Me:  {}", message));
        Ok(true)
    }

    /// Record bytes received from the vehicle.
    pub fn on_received(&mut self, bytes: &[u8]) {
        self.log
            .push(format!("Read: {}", String::from_utf8_lossy(bytes)));
    }

    /// A fresh connection starts a fresh conversation.
    pub fn on_link_state(&mut self, state: LinkState) {
        if state == LinkState::Connected {
            self.log.clear();
        }
    }

    pub fn active_zone(&self) -> Zone {
        self.active_zone.get()
    }

    pub fn is_gesture_active(&self) -> bool {
        self.resolver.is_dragging()
    }

    pub fn link(&self) -> &Arc<dyn Link> {
        &self.link
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn stats(&self) -> Option<&DispatchStats> {
        self.dispatcher.as_ref().map(|d| d.stats())
    }

    pub fn is_running(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Cancel the timer and forget the active zone. The link stays open; its
    /// owner closes it.
    pub fn teardown(&mut self) {
        if let Some(dispatcher) = self.dispatcher.take() {
            dispatcher.cancel();
            info!("Control session stopped");
        }
        self.active_zone.clear();
    }
}

impl Drop for ControlSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
