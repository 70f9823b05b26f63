use crate::domain::link::LinkState;
use std::path::PathBuf;

/// Events flowing from the link side to the UI.
#[derive(Debug, Clone)]
pub enum AppEvent {
    LinkState(LinkState),
    DeviceName(String),
    Received(Vec<u8>),
    LogMessage(StatusMessage),
}

/// Requests from the UI to the link service.
#[derive(Debug, Clone)]
pub enum LinkCommand {
    Connect(PathBuf),
    Disconnect,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>, severity: MessageSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Drive,
    Settings,
    Debug,
}
