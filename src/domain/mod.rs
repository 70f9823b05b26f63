//! Control core: zones, hit-testing, the dispatch timer and the session
//! that ties them to a link.

pub mod active_zone;
pub mod dispatcher;
pub mod event_log;
pub mod layout;
pub mod link;
pub mod models;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod zone;
