use anyhow::Result;

use crate::config::AppConfig;
use crate::fixtures::Fixture;
use crate::services::DispatchService;

/// Load the configured fixture and copy it into the store for the configured
/// driver. Returns whether anything was written.
pub fn seed_store(config: &AppConfig) -> Result<bool> {
    let fixture = Fixture::resolve(config)?;
    let service = DispatchService::new(config.clone())?;
    service.seed_from_fixture(config.driver_id(), &fixture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn seed_store_uses_configured_driver() {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf())
            .expect("config")
            .with_driver_id(Some("driver_007".into()));

        assert!(seed_store(&config).expect("seed"));
        assert!(!seed_store(&config).expect("second seed"));

        let service = DispatchService::new(config).expect("service");
        assert_eq!(service.driver_deliveries("driver_007").unwrap().len(), 3);
        assert!(service.driver_deliveries("driver_001").unwrap().is_empty());
    }
}
