//! Planner configuration
//!
//! Built in three layers: compiled defaults, then an optional YAML file named
//! by `FP_CONFIG_PATH`, then single-value environment overrides.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::export::{ExportCanvas, MAX_EXPORT_SCALE};

pub const CONFIG_PATH_ENV: &str = "FP_CONFIG_PATH";
pub const API_URL_ENV: &str = "FP_API_URL";
pub const RANDOM_PLAYERS_URL_ENV: &str = "FP_RANDOM_PLAYERS_URL";
pub const STORE_PATH_ENV: &str = "FP_STORE_PATH";
pub const EXPORT_CANVAS_ENV: &str = "FP_EXPORT_CANVAS";
pub const EXPORT_SCALE_ENV: &str = "FP_EXPORT_SCALE";
pub const EXPORT_DIR_ENV: &str = "FP_EXPORT_DIR";
pub const REQUEST_TIMEOUT_ENV: &str = "FP_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Base URL of the card service, without trailing slash
    pub api_url: String,
    pub random_players_url: String,
    /// Players fetched on initialize/reset
    pub random_player_count: usize,
    pub request_timeout_secs: u64,
    /// Key/value store file backing the saved formation
    pub store_path: PathBuf,
    pub export_canvas: ExportCanvas,
    /// Raster scale factor for exports, `1..=MAX_EXPORT_SCALE`
    pub export_scale: u32,
    /// Where exported images are written
    pub export_dir: PathBuf,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            random_players_url: "http://localhost:5000/api/random-players".to_string(),
            random_player_count: 6,
            request_timeout_secs: 10,
            store_path: PathBuf::from("formation_store.json"),
            export_canvas: ExportCanvas::Standard,
            export_scale: 2,
            export_dir: PathBuf::from("."),
        }
    }
}

impl PlannerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(CONFIG_PATH_ENV).map(|p| p.trim().to_string()) {
            Some(path) if !path.is_empty() => Self::from_yaml_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PlannerError::Config(format!(
                "Failed to read config file from {CONFIG_PATH_ENV}='{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content).map_err(|e| {
            PlannerError::Config(format!("Failed to parse config file '{}': {e}", path.display()))
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get(API_URL_ENV) {
            self.api_url = url;
        }
        if let Some(url) = get(RANDOM_PLAYERS_URL_ENV) {
            self.random_players_url = url;
        }
        if let Some(path) = get(STORE_PATH_ENV) {
            self.store_path = PathBuf::from(path);
        }
        if let Some(dir) = get(EXPORT_DIR_ENV) {
            self.export_dir = PathBuf::from(dir);
        }
        if let Some(canvas) = get(EXPORT_CANVAS_ENV) {
            self.export_canvas = canvas.parse()?;
        }
        if let Some(secs) = get(REQUEST_TIMEOUT_ENV) {
            self.request_timeout_secs = secs.parse().map_err(|e| {
                PlannerError::Config(format!("{REQUEST_TIMEOUT_ENV}='{secs}' is not a number: {e}"))
            })?;
        }
        if let Some(scale) = get(EXPORT_SCALE_ENV) {
            self.export_scale = scale.parse().map_err(|e| {
                PlannerError::Config(format!("{EXPORT_SCALE_ENV}='{scale}' is not a number: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(PlannerError::Config("api_url must not be empty".into()));
        }
        if self.random_players_url.trim().is_empty() {
            return Err(PlannerError::Config("random_players_url must not be empty".into()));
        }
        if self.random_player_count == 0 {
            return Err(PlannerError::Config("random_player_count must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(PlannerError::Config("request_timeout_secs must be at least 1".into()));
        }
        if !(1..=MAX_EXPORT_SCALE).contains(&self.export_scale) {
            return Err(PlannerError::Config(format!(
                "export_scale must be between 1 and {MAX_EXPORT_SCALE}, got {}",
                self.export_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.random_player_count, 6);
        assert_eq!(config.export_scale, 2);
    }

    #[test]
    fn test_yaml_file_then_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.yaml");
        fs::write(
            &path,
            "api_url: http://cards.local/api\nexport_canvas: compact\nexport_scale: 3\n",
        )
        .unwrap();

        let config = PlannerConfig::from_lookup(lookup_from(&[
            (CONFIG_PATH_ENV, path.to_str().unwrap()),
            (EXPORT_SCALE_ENV, "1"),
            (STORE_PATH_ENV, "/tmp/store.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://cards.local/api");
        assert_eq!(config.export_canvas, ExportCanvas::Compact);
        assert_eq!(config.export_scale, 1);
        assert_eq!(config.store_path, PathBuf::from("/tmp/store.json"));
        // Untouched keys keep their defaults.
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = PlannerConfig::from_lookup(lookup_from(&[(
            CONFIG_PATH_ENV,
            "/definitely/not/here.yaml",
        )]))
        .unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }

    #[test]
    fn test_bad_overrides_rejected() {
        assert!(PlannerConfig::from_lookup(lookup_from(&[(EXPORT_SCALE_ENV, "big")])).is_err());
        assert!(PlannerConfig::from_lookup(lookup_from(&[(EXPORT_SCALE_ENV, "0")])).is_err());
        assert!(PlannerConfig::from_lookup(lookup_from(&[(EXPORT_CANVAS_ENV, "poster")])).is_err());
        assert!(PlannerConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, "soon")])).is_err());
    }

    #[test]
    fn test_timeout_override_and_zero() {
        let config = PlannerConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, "30")])).unwrap();
        assert_eq!(config.request_timeout_secs, 30);

        let err = PlannerConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, "0")])).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"), "{err}");
    }

    #[test]
    fn test_export_scale_upper_bound() {
        let config = PlannerConfig::from_lookup(lookup_from(&[(EXPORT_SCALE_ENV, "4")])).unwrap();
        assert_eq!(config.export_scale, MAX_EXPORT_SCALE);

        for scale in ["5", "4000000"] {
            let err = PlannerConfig::from_lookup(lookup_from(&[(EXPORT_SCALE_ENV, scale)])).unwrap_err();
            assert!(err.to_string().contains("export_scale"), "{err}");
        }
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = PlannerConfig { api_url: " ".into(), ..Default::default() };
        assert!(config.validate().is_err());
    }
}
