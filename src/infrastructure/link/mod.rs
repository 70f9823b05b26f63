//! Link Module
//!
//! Serial transport to the vehicle.
//!
//! ## Modules
//!
//! - [`serial`] - Device-node backed [`Link`](crate::domain::link::Link)
//! - [`service`] - Async worker serving connect/disconnect requests

pub mod serial;
pub mod service;

#[cfg(test)]
pub mod recording;

pub use serial::SerialLink;
pub use service::LinkService;
