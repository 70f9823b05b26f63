//! Link Service Module
//!
//! Runs connect/disconnect requests from the UI off the UI thread. Opening
//! an RFCOMM device node blocks until the remote side answers, so the open
//! goes through `spawn_blocking`.

use crate::domain::models::LinkCommand;
use crate::domain::settings::SettingsService;
use crate::infrastructure::link::serial::SerialLink;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{error, info};

pub struct LinkService {
    link: Arc<SerialLink>,
    settings: Arc<Mutex<SettingsService>>,
}

impl LinkService {
    pub fn new(link: Arc<SerialLink>, settings: Arc<Mutex<SettingsService>>) -> Self {
        Self { link, settings }
    }

    /// Connect to the device node at `path`.
    pub async fn connect(&self, path: PathBuf) -> Result<()> {
        let listen_for_replies = {
            let settings = self
                .settings
                .lock()
                .map_err(|_| anyhow::anyhow!("Lock error"))?;
            settings.get().listen_for_replies
        };

        let link = self.link.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || link.connect(&target, listen_for_replies)).await??;

        if let Ok(mut settings) = self.settings.lock() {
            if let Err(e) = settings.record_connected_device(&path.to_string_lossy()) {
                error!("Failed to save settings: {}", e);
            }
        }
        Ok(())
    }

    pub fn disconnect(&self) {
        self.link.disconnect();
    }

    /// Serve commands until every sender is gone, then close the link.
    pub async fn run(self, mut commands: mpsc::UnboundedReceiver<LinkCommand>) {
        info!("Link service started");
        while let Some(command) = commands.recv().await {
            match command {
                LinkCommand::Connect(path) => {
                    if let Err(e) = self.connect(path).await {
                        error!("Connection failed: {:#}", e);
                    }
                }
                LinkCommand::Disconnect => self.disconnect(),
            }
        }
        self.disconnect();
        info!("Link service stopped");
    }
}

/// Spawn a [`LinkService`] on `runtime` and return the command sender.
pub fn spawn(
    runtime: &tokio::runtime::Handle,
    link: Arc<SerialLink>,
    settings: Arc<Mutex<SettingsService>>,
) -> mpsc::UnboundedSender<LinkCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    runtime.spawn(LinkService::new(link, settings).run(rx));
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::link::{Link, LinkState};
    use std::fs;

    #[tokio::test]
    async fn test_commands_drive_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let device = dir.path().join("rfcomm0");
        fs::write(&device, b"").unwrap();

        let mut service_settings = SettingsService::with_path(dir.path().join("settings.json"));
        service_settings.get_mut().listen_for_replies = false;
        let settings = Arc::new(Mutex::new(service_settings));

        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let link = Arc::new(SerialLink::new(event_tx));
        let service = LinkService::new(link.clone(), settings.clone());

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(LinkCommand::Connect(device.clone())).unwrap();
        drop(tx);
        service.run(rx).await;

        // The service closes the link once its command channel is gone.
        assert_eq!(link.connection_state(), LinkState::Disconnected);
        let settings = settings.lock().unwrap();
        assert_eq!(
            settings.get().last_device_path.as_deref(),
            Some(device.to_string_lossy().as_ref())
        );
    }

    #[tokio::test]
    async fn test_failed_connect_is_not_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let device = dir.path().join("rfcomm0");
        fs::write(&device, b"").unwrap();

        let settings = Arc::new(Mutex::new(SettingsService::with_path(
            dir.path().join("settings.json"),
        )));
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let link = Arc::new(SerialLink::new(event_tx));
        let service = LinkService::new(link.clone(), settings.clone());

        assert!(service.connect(dir.path().join("missing")).await.is_err());
        assert!(settings.lock().unwrap().get().last_device_path.is_none());

        settings.lock().unwrap().get_mut().listen_for_replies = false;
        service.connect(device).await.unwrap();
        assert_eq!(link.connection_state(), LinkState::Connected);
        link.write(b"b").unwrap();
    }
}
