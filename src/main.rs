use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = courier::cli::Cli::parse();

    match cli.command.clone() {
        Some(courier::cli::CliCommand::Tui) | None => {
            let config = courier::config::from_cli(&cli)?;
            courier::logging::init_file(&config)?;
            courier::tui::run(config)?;
        }
        Some(courier::cli::CliCommand::Mcp(args)) => {
            let config = courier::mcp::ServerConfig {
                data_dir: cli.data_dir.clone(),
                log_filter: args.log_filter,
                driver_id: cli.driver_id.clone(),
                fixtures: cli.fixtures.clone(),
                seed: args.seed,
            };
            courier::mcp::run_server_blocking(config)?;
        }
        Some(command) => {
            courier::logging::init_stderr()?;
            let config = courier::config::from_cli(&cli)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            courier::commands::execute(&config, command, cli.json, &mut handle)?;
        }
    }

    Ok(())
}
