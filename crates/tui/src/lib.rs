pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use courier_core as core;
pub use courier_core::controller;
pub use courier_core::database as db;
pub use courier_core::fixtures;
pub use courier_core::model;

pub use courier_core::AppConfig;
