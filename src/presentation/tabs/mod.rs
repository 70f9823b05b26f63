pub mod debug;
pub mod drive;
pub mod settings;
