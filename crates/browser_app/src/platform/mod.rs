mod app;
mod commands;
mod config;
mod effects;
mod error;
mod logging;
mod persistence;
mod render;

pub use app::run_app;
