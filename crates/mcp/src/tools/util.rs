use std::sync::Arc;

use anyhow::{anyhow, Result};
use courier_core::input::InputError;
use courier_core::services::DispatchService;

pub async fn with_service<T, F>(service: Arc<DispatchService>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&DispatchService) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(service.as_ref()))
        .await
        .map_err(|err| anyhow!("blocking task failed: {}", err))?
}

/// Driver from the arguments, else the one the server was started for.
pub fn resolve_driver(service: &DispatchService, driver_id: Option<String>) -> String {
    driver_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| service.config().driver_id().to_string())
}

pub fn validation_error(err: impl std::fmt::Display) -> pmcp::Error {
    pmcp::Error::validation(err.to_string())
}

pub fn internal_error(err: impl Into<anyhow::Error>) -> pmcp::Error {
    pmcp::Error::internal(err.into().to_string())
}

/// Rejected input is the caller's fault; anything else is ours.
pub fn service_error(err: anyhow::Error) -> pmcp::Error {
    if err.downcast_ref::<InputError>().is_some() {
        validation_error(err)
    } else {
        internal_error(err)
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> (Arc<DispatchService>, tempfile::TempDir) {
    use courier_core::config::AppConfig;

    let dir = tempfile::TempDir::new().expect("temp dir");
    let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
    let service = DispatchService::new(config).expect("service");
    (Arc::new(service), dir)
}

#[cfg(test)]
pub(crate) fn test_extra() -> pmcp::RequestHandlerExtra {
    pmcp::RequestHandlerExtra::new(
        "test-request".to_string(),
        tokio_util::sync::CancellationToken::new(),
    )
}
