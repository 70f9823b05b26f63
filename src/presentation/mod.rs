pub mod app;
pub mod components;
pub mod panel;
pub mod tabs;
pub mod theme;
