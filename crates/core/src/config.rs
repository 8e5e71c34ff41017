use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;

use crate::model::DEFAULT_DRIVER_ID;

static DEFAULT_DB_NAME: &str = "courier.sqlite3";
static DEFAULT_LOG_NAME: &str = "courier.log";
static DEFAULT_FIXTURE_NAME: &str = "fixtures.json";
static ENV_DATA_DIR: &str = "COURIER_DATA_DIR";
static ENV_BACKEND_URL: &str = "COURIER_BACKEND_URL";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "courier", "courier"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    data_dir: PathBuf,
    db_path: PathBuf,
    fixture_override: Option<PathBuf>,
    backend_url: Option<String>,
    driver_id: String,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the data directory using the provided override,
    /// environment variables, and platform defaults.
    pub fn discover(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir_override)?;
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory at {}", data_dir.display())
            })?;
        }
        let mut config = Self::from_data_dir(data_dir)?;
        config.backend_url = env::var(ENV_BACKEND_URL)
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        Ok(config)
    }

    /// Construct [`AppConfig`] directly from a resolved data directory.
    pub fn from_data_dir(data_dir: PathBuf) -> Result<Self> {
        let db_path = data_dir.join(DEFAULT_DB_NAME);
        Ok(Self {
            data_dir,
            db_path,
            fixture_override: None,
            backend_url: None,
            driver_id: DEFAULT_DRIVER_ID.to_string(),
        })
    }

    pub fn with_fixture_path(mut self, path: Option<PathBuf>) -> Self {
        self.fixture_override = path;
        self
    }

    pub fn with_driver_id(mut self, driver_id: Option<String>) -> Self {
        if let Some(id) = driver_id.map(|id| id.trim().to_string()) {
            if !id.is_empty() {
                self.driver_id = id;
            }
        }
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_LOG_NAME)
    }

    /// Explicit fixture path, or `fixtures.json` in the data dir when present.
    pub fn fixture_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.fixture_override {
            return Some(path.clone());
        }
        let default = self.data_dir.join(DEFAULT_FIXTURE_NAME);
        default.exists().then_some(default)
    }

    /// Backend base URL. Shown to the driver; no requests are made to it.
    pub fn backend_url(&self) -> Option<&str> {
        self.backend_url.as_deref()
    }

    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }
}

fn resolve_data_dir(data_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if cfg!(debug_assertions) {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let dev_dir = manifest_dir.join("..").join("tmp").join("dev-courier");
        return Ok(dev_dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(base) = BaseDirs::new() {
            return Ok(base.home_dir().join(".courier"));
        }
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".courier"));
    }

    Ok(env::current_dir()?.join(".courier"))
}
