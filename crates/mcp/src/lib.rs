//! Model Context Protocol server over the courier store.
//!
//! Tools read and write the same SQLite database as the `courier` CLI, so an
//! assistant can list a driver's deliveries, move them through their statuses
//! and carry the customer conversation.

mod tools;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use courier_core::config::AppConfig;
use courier_core::fixtures::Fixture;
use courier_core::services::DispatchService;
use pmcp::types::capabilities::ServerCapabilities;
use pmcp::Server;
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Runtime configuration for the courier MCP server.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub data_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
    /// Driver used when a tool call does not name one.
    pub driver_id: Option<String>,
    /// Fixture document used by `seed`.
    pub fixtures: Option<PathBuf>,
    /// Copy the fixture into the store on startup when the driver has no
    /// deliveries yet.
    pub seed: bool,
}

impl ServerConfig {
    pub fn app_config(&self) -> Result<AppConfig> {
        let config = AppConfig::discover(self.data_dir.clone())
            .context("failed to resolve data directory")?
            .with_driver_id(self.driver_id.clone())
            .with_fixture_path(self.fixtures.clone());
        Ok(config)
    }
}

/// Launch the MCP server on stdio.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    init_tracing(config.log_filter.as_deref())?;

    let (app_config, service) = open_service(&config)?;
    let server = build_server(service).context("failed to build MCP server")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %app_config.data_dir().display(),
        driver = app_config.driver_id(),
        tools = %tools::TOOL_NAMES.join(", "),
        "starting courier-mcp"
    );

    server
        .run_stdio()
        .await
        .map_err(|err| anyhow!("MCP server error: {}", err))
}

/// [`run_server`] on a runtime of its own, for callers without one.
pub fn run_server_blocking(config: ServerConfig) -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(run_server(config))
}

fn open_service(config: &ServerConfig) -> Result<(AppConfig, Arc<DispatchService>)> {
    let app_config = config.app_config()?;
    let service = DispatchService::new(app_config.clone())
        .context("failed to initialize dispatch store")?;

    if config.seed {
        let fixture = Fixture::resolve(&app_config)?;
        let seeded = service
            .seed_from_fixture(app_config.driver_id(), &fixture)
            .context("failed to seed store from fixture")?;
        info!(driver = app_config.driver_id(), seeded, "startup seeding");
    }

    Ok((app_config, Arc::new(service)))
}

fn env_filter(directive: Option<&str>) -> Result<EnvFilter> {
    let raw = directive.unwrap_or(DEFAULT_LOG_DIRECTIVE);
    let directive: Directive = raw
        .parse()
        .with_context(|| format!("invalid log directive '{}'", raw))?;
    Ok(EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    // stdout carries the protocol.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}

fn build_server(service: Arc<DispatchService>) -> Result<Server> {
    tools::register(Server::builder(), service)
        .name("courier-mcp")
        .version(env!("CARGO_PKG_VERSION"))
        .capabilities(ServerCapabilities::tools_only())
        .build()
        .map_err(|err| anyhow!(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ServerConfig {
        ServerConfig {
            data_dir: Some(dir.path().to_path_buf()),
            driver_id: Some("driver_009".into()),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn startup_seeding_fills_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            seed: true,
            ..config_in(&dir)
        };

        let (app_config, service) = open_service(&config).unwrap();
        assert_eq!(app_config.driver_id(), "driver_009");
        assert_eq!(service.driver_deliveries("driver_009").unwrap().len(), 3);
        assert_eq!(service.driver_messages("driver_009").unwrap().len(), 3);

        let (_, again) = open_service(&config).unwrap();
        assert_eq!(again.driver_deliveries("driver_009").unwrap().len(), 3);
        assert!(build_server(again).is_ok());
    }

    #[test]
    fn store_starts_empty_without_seed() {
        let dir = TempDir::new().unwrap();
        let (_, service) = open_service(&config_in(&dir)).unwrap();
        assert!(service.driver_deliveries("driver_009").unwrap().is_empty());
    }

    #[test]
    fn missing_fixture_file_fails_startup_seeding() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            seed: true,
            fixtures: Some(dir.path().join("absent.json")),
            ..config_in(&dir)
        };
        let err = open_service(&config).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn log_directive_must_parse() {
        assert!(env_filter(None).is_ok());
        assert!(env_filter(Some("courier_mcp=debug")).is_ok());
        let err = env_filter(Some("courier_mcp=loud")).unwrap_err();
        assert!(err.to_string().contains("courier_mcp=loud"));
    }
}
