pub use courier_tui::cli;
pub use courier_tui::commands;
pub use courier_tui::config;
pub use courier_tui::logging;
pub use courier_tui::tui;
pub use courier_tui::AppConfig;

pub use courier_core as core;
pub use courier_core::controller;
pub use courier_core::database as db;
pub use courier_core::fixtures;
pub use courier_core::model;

pub use courier_mcp as mcp;
