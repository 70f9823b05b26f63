//! In-memory link that records every write call.

use crate::domain::link::{Link, LinkError, LinkState};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct RecordingLink {
    state: Mutex<LinkState>,
    writes: Mutex<Vec<Vec<u8>>>,
    attempts: Mutex<usize>,
    name: Option<String>,
}

impl RecordingLink {
    pub fn connected() -> Self {
        Self {
            state: Mutex::new(LinkState::Connected),
            name: Some("NIKKO-TEST".to_string()),
            ..Default::default()
        }
    }

    pub fn set_state(&self, state: LinkState) {
        *self.state.lock().unwrap() = state;
    }

    /// Accepted writes, one entry per call.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.writes.lock().unwrap().concat()
    }

    /// Write calls, accepted or not.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl Link for RecordingLink {
    fn connection_state(&self) -> LinkState {
        *self.state.lock().unwrap()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), LinkError> {
        *self.attempts.lock().unwrap() += 1;
        if self.connection_state() != LinkState::Connected {
            return Err(LinkError::NotConnected);
        }
        self.writes.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }

    fn device_name(&self) -> Option<String> {
        self.name.clone()
    }

    fn close(&self) {
        self.set_state(LinkState::Disconnected);
    }
}
