pub mod app;
pub mod batch;
pub mod config;
pub mod format;
pub mod logging;
pub mod state;
pub mod utils;
