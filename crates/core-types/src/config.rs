//! Application configuration loaded from TOML.
//!
//! Every section has defaults so a partial (or empty) file is valid. The
//! catalog credential normally comes from the environment rather than the
//! file; see [`apply_env_overrides`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/moviehub.toml";
pub const CONFIG_PATH_ENV: &str = "MOVIEHUB_CONFIG";
pub const API_KEY_ENVS: [&str; 2] = ["MOVIEHUB_API_KEY", "TMDB_API_KEY"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub typeahead: TypeaheadConfig,
    pub preload: PreloadConfig,
    pub logging: LoggingConfig,
    pub screens: ScreensConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Usually left empty in the file and supplied through the environment.
    pub api_key: Option<String>,
    pub language: String,
    pub image_base_url: String,
    pub request_timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".into(),
            api_key: None,
            language: "en-US".into(),
            image_base_url: "https://image.tmdb.org/t/p/w92".into(),
            request_timeout_ms: 5_000,
            retries: 0,
            backoff_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeaheadConfig {
    pub debounce_ms: u64,
    pub max_suggestions: usize,
    pub include_adult: bool,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            max_suggestions: 5,
            include_adult: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    pub concurrency: usize,
    pub retries: u32,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            retries: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Optional log file; rolled daily.
    pub file: Option<String>,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
            json: false,
        }
    }
}

/// Where a clicked or Enter-selected suggestion leads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionTarget {
    /// Free-text search for the suggestion's title.
    #[default]
    Search,
    /// Straight to the movie's detail view.
    Details,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub clear_query_on_raw_commit: bool,
    pub suggestion_target: SuggestionTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreensConfig {
    pub home: ScreenConfig,
    pub search_results: ScreenConfig,
    pub movie_details: ScreenConfig,
    pub cast_details: ScreenConfig,
}

impl Default for ScreensConfig {
    fn default() -> Self {
        // Detail pages are left behind on commit, so their field starts empty
        // when the user comes back; list pages keep what was typed.
        let clearing = ScreenConfig {
            clear_query_on_raw_commit: true,
            ..ScreenConfig::default()
        };
        Self {
            home: ScreenConfig::default(),
            search_results: ScreenConfig::default(),
            movie_details: clearing,
            cast_details: clearing,
        }
    }
}

/// Resolve the config path: explicit argument, then `MOVIEHUB_CONFIG`, then the default.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read the config at `path` (see [`config_path`]); write defaults there if it does not exist.
///
/// `.env` is loaded first and credential variables override the file.
pub fn load_or_create_config(path: Option<&Path>) -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    let path = config_path(path);

    let mut cfg = if path.exists() {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        parse_config(&raw).with_context(|| format!("parse config {}", path.display()))?
    } else {
        let cfg = AppConfig::default();
        write_config(&path, &cfg)?;
        cfg
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

pub fn parse_config(raw: &str) -> Result<AppConfig> {
    Ok(toml::from_str(raw)?)
}

pub fn write_config(path: &Path, cfg: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let body = toml::to_string_pretty(cfg)?;
    std::fs::write(path, body).with_context(|| format!("write config {}", path.display()))?;
    Ok(())
}

/// Apply credential overrides; `lookup` is `std::env::var` outside tests.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = API_KEY_ENVS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|v| !v.trim().is_empty())
    {
        cfg.catalog.api_key = Some(key);
    }
}
