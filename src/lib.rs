pub mod api;
pub mod app;
pub mod format;
pub mod state;
pub mod types;
pub mod ui;
