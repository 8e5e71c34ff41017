pub mod commands;
pub mod config;
pub mod controller;
pub mod database;
pub mod fixtures;
pub mod input;
pub mod model;
pub mod services;

pub use commands::seed_store;
pub use config::AppConfig;
pub use controller::ViewController;
pub use database::Database;
pub use fixtures::{Fixture, FixtureError};
pub use input::{DeliveryInput, InputError, MessageInput};
pub use model::*;
pub use services::DispatchService;
