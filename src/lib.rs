//! Nikko RC Remote: drive an RC car over a Bluetooth serial link.
//!
//! `domain` holds the gesture resolver, the command dispatcher and the
//! session tying them to a link. `infrastructure` provides the serial link
//! and logging, and `presentation` is the egui desktop host.

pub mod domain;
pub mod infrastructure;
pub mod presentation;
