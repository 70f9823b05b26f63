//! The byte link to the vehicle, as seen by the control core.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LinkState {
    #[default]
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

impl LinkState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => LinkState::Connecting,
            2 => LinkState::Connected,
            _ => LinkState::Disconnected,
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Disconnected => f.write_str("disconnected"),
            LinkState::Connecting => f.write_str("connecting"),
            LinkState::Connected => f.write_str("connected"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link is not connected")]
    NotConnected,
    #[error("link I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A connected (or connectable) serial byte stream.
pub trait Link: Send + Sync {
    fn connection_state(&self) -> LinkState;

    /// Write `bytes` verbatim. Fails with [`LinkError::NotConnected`] unless
    /// the link is [`LinkState::Connected`].
    fn write(&self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Name of the remote device, once connected.
    fn device_name(&self) -> Option<String>;

    /// Release the transport. Calling it twice is harmless.
    fn close(&self);
}
