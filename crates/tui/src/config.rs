pub use courier_core::config::*;

use crate::cli::Cli;

pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    Ok(AppConfig::discover(cli.data_dir.clone())?
        .with_fixture_path(cli.fixtures.clone())
        .with_driver_id(cli.driver_id.clone()))
}
