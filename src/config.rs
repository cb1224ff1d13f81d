//! Shiplog configuration.
//!
//! Loaded from `~/.shiplog/config.toml`. Every key is optional; a missing
//! file means defaults.
//!
//! ```toml
//! skipper = "Ane Madsen"
//! vessel = "Tern"
//! sensor-snapshot = "/run/nmea/snapshot.json"
//!
//! [[sails]]
//! name = "main"
//! reefs = 2
//!
//! [[sails]]
//! name = "genoa"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::Sail;

/// Overrides the data directory, ahead of the config file.
pub const DATA_DIR_ENV: &str = "SHIPLOG_DATA_DIR";

/// Shiplog configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Shown in trip listings.
    pub skipper: String,

    /// Vessel name, shown in trip listings.
    pub vessel: String,

    /// JSON file the instrument bridge keeps refreshed.
    /// Without it there is no sensor feed.
    pub sensor_snapshot: Option<PathBuf>,

    /// Where `shiplog.sqlite` lives. Defaults to `~/.shiplog`.
    pub data_dir: Option<PathBuf>,

    /// Sail wardrobe, used to seed a vessel that has none yet.
    pub sails: Vec<SailConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SailConfig {
    pub name: String,

    /// Reef points. Zero means a furling sail.
    #[serde(default)]
    pub reefs: u8,
}

impl Config {
    /// Load config from `~/.shiplog/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::parse(&contents, &path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, String> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if let Some(sail) = config.sails.iter().find(|s| s.name.trim().is_empty()) {
            return Err(format!(
                "sail with an empty name in {} (reefs = {})",
                path.display(),
                sail.reefs
            ));
        }
        Ok(config)
    }

    /// The config file path: `~/.shiplog/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".shiplog").join("config.toml"))
    }

    /// The data directory: `$SHIPLOG_DATA_DIR`, then `data-dir`, then `~/.shiplog`.
    pub fn data_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        self.data_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join(".shiplog")))
    }

    pub fn wardrobe(&self) -> Vec<Sail> {
        self.sails
            .iter()
            .map(|s| Sail::new(s.name.trim(), s.reefs))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = Config::parse("", Path::new("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn full_file() {
        let config = Config::parse(
            r#"
            skipper = "Ane Madsen"
            vessel = "Tern"
            sensor-snapshot = "/run/nmea/snapshot.json"
            data-dir = "/var/lib/shiplog"

            [[sails]]
            name = "main"
            reefs = 2

            [[sails]]
            name = "genoa"
            "#,
            Path::new("config.toml"),
        )
        .unwrap();

        assert_eq!(config.vessel, "Tern");
        assert_eq!(
            config.sensor_snapshot.as_deref(),
            Some(Path::new("/run/nmea/snapshot.json"))
        );
        let wardrobe = config.wardrobe();
        assert_eq!(wardrobe.len(), 2);
        assert_eq!(wardrobe[0].max_reefs, 2);
        assert_eq!(wardrobe[1].max_reefs, 0);
    }

    #[test]
    fn unnamed_sail_is_rejected() {
        let err = Config::parse("[[sails]]\nname = \" \"\n", Path::new("config.toml")).unwrap_err();
        assert!(err.contains("empty name"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Config::parse("skipper = 3", Path::new("config.toml")).is_err());
    }
}
