//! Configuration for store access and schema generation.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (BIBLIOTECHKA_DB, BIBLIOTECHKA_STORE_URL,
//!    BIBLIOTECHKA_API_KEY, BIBLIOTECHKA_PUBLIC_URL)
//! 2. Config file (.bibliotechka/config.yaml)
//! 3. Defaults (SQLite snapshot at ~/.bibliotechka/catalog.db)
//!
//! Config file discovery:
//! - Searches current directory and parents for .bibliotechka/config.yaml
//! - `store.database` is relative to the .bibliotechka/ directory
//!
//! ```yaml
//! store:
//!   backend: rest
//!   url: https://project.supabase.co
//!   api_key: public-anon-key
//! schema:
//!   group_scheme: legacy
//!   trailing_id: numeric
//! storage:
//!   public_url: https://project.supabase.co
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::GroupScheme;
use crate::identifier::TrailingIdScheme;
use crate::resolver::ResolverSettings;
use crate::store::{ResourceStore, RestStore, RestStoreConfig, SqliteStore};

/// Directory holding the config file and the default snapshot
pub const CONFIG_DIR: &str = ".bibliotechka";

pub const ENV_DB: &str = "BIBLIOTECHKA_DB";
pub const ENV_STORE_URL: &str = "BIBLIOTECHKA_STORE_URL";
pub const ENV_API_KEY: &str = "BIBLIOTECHKA_API_KEY";
pub const ENV_PUBLIC_URL: &str = "BIBLIOTECHKA_PUBLIC_URL";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Which store implementation to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Rest,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Rest => write!(f, "rest"),
        }
    }
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub schema: SchemaSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSection {
    pub backend: Option<StoreBackend>,
    /// SQLite snapshot (relative to the config directory)
    pub database: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaSection {
    pub group_scheme: Option<GroupScheme>,
    pub trailing_id: Option<TrailingIdScheme>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSection {
    /// Base URL of the public file storage (screenshots)
    pub public_url: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: StoreBackend,
    /// Absolute path of the SQLite snapshot
    pub database: PathBuf,
    /// Hosted store URL
    pub store_url: Option<String>,
    pub api_key: Option<String>,
    pub resolver: ResolverSettings,
    pub public_url: Option<String>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Hosted store settings, if both URL and key are known
    pub fn rest_config(&self) -> Option<RestStoreConfig> {
        Some(RestStoreConfig {
            url: self.store_url.clone()?,
            api_key: self.api_key.clone()?,
        })
    }

    /// Open the configured store
    pub fn open_store(&self) -> Result<Box<dyn ResourceStore>> {
        match self.backend {
            StoreBackend::Sqlite => {
                let store = SqliteStore::open(&self.database).with_context(|| {
                    format!("Failed to open catalog database: {}", self.database.display())
                })?;
                Ok(Box::new(store))
            }
            StoreBackend::Rest => {
                let rest = self.rest_config().with_context(|| {
                    format!(
                        "REST backend needs both store.url and store.api_key (or {} and {})",
                        ENV_STORE_URL, ENV_API_KEY
                    )
                })?;
                Ok(Box::new(RestStore::from_config(rest)))
            }
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine file, environment and defaults
fn build_config(
    config_file: Option<PathBuf>,
    default_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let file = match config_file {
        Some(ref path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let database = if let Some(db) = env(ENV_DB) {
        PathBuf::from(db)
    } else if let (Some(db), Some(path)) = (&file.store.database, &config_file) {
        let config_dir = path.parent().unwrap_or(Path::new("."));
        resolve_path(config_dir, db)
    } else {
        default_dir.join("catalog.db")
    };

    let store_url = env(ENV_STORE_URL).or(file.store.url);
    let api_key = env(ENV_API_KEY).or(file.store.api_key);

    // a URL without an explicit backend means the hosted store
    let backend = file.store.backend.unwrap_or(if store_url.is_some() {
        StoreBackend::Rest
    } else {
        StoreBackend::Sqlite
    });

    let resolver = ResolverSettings {
        group_scheme: file.schema.group_scheme.unwrap_or_default(),
        trailing_id: file.schema.trailing_id.unwrap_or_default(),
    };

    let public_url = env(ENV_PUBLIC_URL)
        .or(file.storage.public_url)
        .or_else(|| match backend {
            StoreBackend::Rest => store_url.clone(),
            StoreBackend::Sqlite => None,
        });

    Ok(ResolvedConfig {
        backend,
        database,
        store_url,
        api_key,
        resolver,
        public_url,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_dir = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let config_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file_from(&cwd));

    build_config(config_file, &default_dir, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
