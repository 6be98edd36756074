//! Configuration and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use uknow_core::analytics::AnalyticsConfig;
use uknow_core::annotate::{Annotator, GazetteerAnnotator};
use uknow_core::builder::BuilderConfig;
use uknow_core::service::StudyServiceConfig;
use uknow_core::traits::{CardStore, RecordStore};

use crate::json::JsonFileStore;
use crate::memory::MemoryStore;

/// Where cards and records are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Files under a directory, kept across runs.
    Json {
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
    /// Process-local; lost on exit.
    Memory,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./uknow-data")
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            path: default_store_path(),
        }
    }
}

/// Annotator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Gazetteer TOML file. Without one, pattern extraction is used.
    #[serde(default)]
    pub gazetteer: Option<PathBuf>,
    /// Fixed seed for question template choice.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Top-level uknow configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UknowConfig {
    #[serde(default)]
    pub pipeline: BuilderConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub annotator: AnnotatorConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl UknowConfig {
    /// The part of the configuration the study service consumes.
    pub fn service_config(&self) -> StudyServiceConfig {
        StudyServiceConfig {
            builder: self.pipeline.clone(),
            analytics: self.analytics.clone(),
            seed: self.annotator.seed,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Apply `UKNOW_STORE_PATH` and `UKNOW_GAZETTEER`, then expand `${VAR}` in paths.
fn apply_overrides(config: &mut UknowConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(path) = lookup("UKNOW_STORE_PATH") {
        config.store = StoreConfig::Json {
            path: PathBuf::from(path),
        };
    }
    if let Some(path) = lookup("UKNOW_GAZETTEER") {
        config.annotator.gazetteer = Some(PathBuf::from(path));
    }

    if let StoreConfig::Json { path } = &mut config.store {
        *path = resolve_path(path);
    }
    if let Some(gazetteer) = &mut config.annotator.gazetteer {
        *gazetteer = resolve_path(gazetteer);
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `uknow.toml` in the current directory
/// 2. `~/.config/uknow/config.toml`
///
/// Environment variable overrides: `UKNOW_STORE_PATH`, `UKNOW_GAZETTEER`.
pub fn load_config() -> Result<UknowConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<UknowConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("uknow.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<UknowConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => UknowConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("uknow"))
}

/// A store opened for both cards and records.
#[derive(Clone)]
pub struct SharedStore {
    pub cards: Arc<dyn CardStore>,
    pub records: Arc<dyn RecordStore>,
}

/// Open the configured store.
pub fn open_store(config: &StoreConfig) -> Result<SharedStore> {
    match config {
        StoreConfig::Json { path } => {
            let store = Arc::new(
                JsonFileStore::open(path)
                    .with_context(|| format!("failed to open store at {}", path.display()))?,
            );
            Ok(SharedStore {
                cards: store.clone(),
                records: store,
            })
        }
        StoreConfig::Memory => {
            let store = Arc::new(MemoryStore::new());
            Ok(SharedStore {
                cards: store.clone(),
                records: store,
            })
        }
    }
}

/// Load the configured gazetteer, if any.
///
/// A gazetteer that fails to load is logged and ignored; extraction then
/// falls back to the pattern strategy.
pub fn probe_annotator(config: &AnnotatorConfig) -> Option<Arc<dyn Annotator>> {
    let path = config.gazetteer.as_ref()?;
    match GazetteerAnnotator::load(path) {
        Ok(annotator) => {
            tracing::debug!("using gazetteer {}", path.display());
            Some(Arc::new(annotator))
        }
        Err(e) => {
            tracing::warn!("gazetteer unavailable, using pattern extraction: {e}");
            None
        }
    }
}
