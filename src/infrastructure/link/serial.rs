//! Serial device link.
//!
//! Talks to the vehicle through a device node that the OS has already bound
//! to the paired RFCOMM channel (`/dev/rfcommN` on Linux, a virtual COM port
//! on Windows). Opening the node establishes the connection.

use crate::domain::link::{Link, LinkError, LinkState};
use crate::domain::models::{AppEvent, MessageSeverity, StatusMessage};
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const READ_BUFFER_SIZE: usize = 1024;

pub struct SerialLink {
    state: AtomicU8,
    port: Mutex<Option<File>>,
    device_name: Mutex<Option<String>>,
    /// Bumped on every connect and disconnect so that a reader thread from an
    /// older connection cannot tear down a newer one.
    generation: AtomicU64,
    event_sender: mpsc::UnboundedSender<AppEvent>,
}

impl SerialLink {
    pub fn new(event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            state: AtomicU8::new(LinkState::Disconnected as u8),
            port: Mutex::new(None),
            device_name: Mutex::new(None),
            generation: AtomicU64::new(0),
            event_sender,
        }
    }

    /// Open `path` and mark the link connected. Blocks until the device
    /// answers or the open fails.
    pub fn connect(self: &Arc<Self>, path: &Path, listen_for_replies: bool) -> Result<()> {
        if self.connection_state() != LinkState::Disconnected {
            self.disconnect();
        }

        info!("Connecting to {}", path.display());
        self.set_state(LinkState::Connecting);

        let result = open_device(path)
            .with_context(|| format!("Failed to open {}", path.display()))
            .and_then(|file| self.attach(file, path, listen_for_replies));
        if let Err(e) = &result {
            error!("Unable to connect to {}: {:#}", path.display(), e);
            self.abandon_connect();
        }
        result
    }

    fn attach(self: &Arc<Self>, file: File, path: &Path, listen_for_replies: bool) -> Result<()> {
        let reader = if listen_for_replies {
            Some(file.try_clone().context("Failed to clone device handle")?)
        } else {
            None
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let generation = {
            let mut port = self
                .port
                .lock()
                .map_err(|_| anyhow::anyhow!("Lock error"))?;
            *port = Some(file);
            if let Ok(mut device_name) = self.device_name.lock() {
                *device_name = Some(name.clone());
            }
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };

        // Connected before the reader starts, so an immediate EOF is reported
        // as a loss rather than overwritten.
        self.set_state(LinkState::Connected);
        let _ = self.event_sender.send(AppEvent::DeviceName(name.clone()));
        info!("Connected to {}", name);

        if let Some(reader) = reader {
            self.spawn_reader(reader, generation)?;
        }
        Ok(())
    }

    /// Release whatever a failed connect left behind and report it.
    fn abandon_connect(&self) {
        if let Ok(mut port) = self.port.lock() {
            self.generation.fetch_add(1, Ordering::AcqRel);
            port.take();
        }
        if let Ok(mut device_name) = self.device_name.lock() {
            *device_name = None;
        }
        self.set_state(LinkState::Disconnected);
        self.send_log("Unable to connect device", MessageSeverity::Error);
    }

    /// Close the device node. No-op when already disconnected.
    pub fn disconnect(&self) {
        let had_port = match self.port.lock() {
            Ok(mut port) => {
                self.generation.fetch_add(1, Ordering::AcqRel);
                port.take().is_some()
            }
            Err(_) => false,
        };

        if had_port || self.connection_state() != LinkState::Disconnected {
            self.set_state(LinkState::Disconnected);
            info!("Disconnected from device");
            self.send_log("Disconnected from device", MessageSeverity::Info);
        }
    }

    fn spawn_reader(self: &Arc<Self>, mut file: File, generation: u64) -> Result<()> {
        let link: Weak<SerialLink> = Arc::downgrade(self);
        let sender = self.event_sender.clone();

        std::thread::Builder::new()
            .name("link-reader".to_string())
            .spawn(move || {
                let mut buffer = [0u8; READ_BUFFER_SIZE];
                loop {
                    match file.read(&mut buffer) {
                        Ok(0) => {
                            debug!("Device closed the stream");
                            break;
                        }
                        Ok(n) => {
                            let _ = sender.send(AppEvent::Received(buffer[..n].to_vec()));
                        }
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!("Read failed: {}", e);
                            break;
                        }
                    }
                }
                if let Some(link) = link.upgrade() {
                    link.connection_lost(generation);
                }
            })
            .context("Failed to start reader thread")?;
        Ok(())
    }

    /// Drop the connection identified by `generation`, if it is still current.
    fn connection_lost(&self, generation: u64) {
        {
            let Ok(mut port) = self.port.lock() else {
                return;
            };
            if self.generation.load(Ordering::Acquire) != generation {
                return;
            }
            self.generation.fetch_add(1, Ordering::AcqRel);
            port.take();
        }

        warn!("Device connection was lost");
        self.set_state(LinkState::Disconnected);
        self.send_log("Device connection was lost", MessageSeverity::Warning);
    }

    fn set_state(&self, state: LinkState) {
        let previous = LinkState::from_u8(self.state.swap(state as u8, Ordering::AcqRel));
        if previous != state {
            debug!("Link state {} -> {}", previous, state);
            let _ = self.event_sender.send(AppEvent::LinkState(state));
        }
    }

    fn send_log(&self, message: &str, severity: MessageSeverity) {
        let _ = self
            .event_sender
            .send(AppEvent::LogMessage(StatusMessage::new(message, severity)));
    }
}

impl Link for SerialLink {
    fn connection_state(&self) -> LinkState {
        LinkState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn write(&self, bytes: &[u8]) -> Result<(), LinkError> {
        if self.connection_state() != LinkState::Connected {
            return Err(LinkError::NotConnected);
        }

        let (result, generation) = {
            let mut port = self.port.lock().map_err(|_| LinkError::NotConnected)?;
            let generation = self.generation.load(Ordering::Acquire);
            match port.as_mut() {
                Some(file) => (file.write_all(bytes).and_then(|()| file.flush()), generation),
                None => return Err(LinkError::NotConnected),
            }
        };

        if let Err(e) = result {
            warn!("Write failed: {}", e);
            self.connection_lost(generation);
            return Err(LinkError::Io(e));
        }
        Ok(())
    }

    fn device_name(&self) -> Option<String> {
        self.device_name.lock().ok().and_then(|name| name.clone())
    }

    fn close(&self) {
        self.disconnect();
    }
}

/// Open the device node for reading and writing. A terminal is switched to
/// raw mode: no line buffering, no echo of the vehicle's bytes back onto the
/// link, and no output translation.
#[cfg(unix)]
fn open_device(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(nix::fcntl::OFlag::O_NOCTTY.bits())
        .open(path)?;
    make_raw(&file)?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_device(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().read(true).write(true).open(path)
}

#[cfg(unix)]
fn make_raw(file: &File) -> std::io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::termios::{self, SetArg};

    let mut attrs = match termios::tcgetattr(file) {
        Ok(attrs) => attrs,
        Err(Errno::ENOTTY) => {
            debug!("Device is not a terminal, leaving it as is");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    termios::cfmakeraw(&mut attrs);
    termios::tcsetattr(file, SetArg::TCSANOW, &attrs)?;
    Ok(())
}
