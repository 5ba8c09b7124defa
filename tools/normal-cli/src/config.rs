//! lnormal.toml parsing
//!
//! ```toml
//! [bake]
//! resolution = 1024
//! padding = 8
//! flip_green = true
//!
//! [bake.smoothing]
//! radius = 3
//! edge_mode = "clamp"
//!
//! [edit]
//! mirror_axis = "x"
//! snap_step_degrees = 5.0
//! ```

use anyhow::{Context, Result};
use normal_bake::BakeSettings;
use normal_core::EditSettings;
use serde::Deserialize;
use std::path::Path;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "lnormal.toml";

/// Whole configuration file; every table is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bake: BakeSettings,
    pub edit: EditSettings,
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse config from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse lnormal.toml")
    }

    /// Load `path` if given, else `lnormal.toml` in the working directory if
    /// present, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).is_file() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Check both tables against their accepted ranges
    pub fn validate(&self) -> Result<()> {
        self.bake.validate().context("Invalid [bake] settings")?;
        self.edit.validate().context("Invalid [edit] settings")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normal_bake::EdgeMode;
    use normal_core::MirrorAxis;

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_file() {
        let config = Config::parse(
            r#"
            [bake]
            resolution = 1024
            padding = 8
            flip_green = true

            [bake.smoothing]
            radius = 3
            edge_mode = "clamp"

            [edit]
            mirror_axis = "x"
            snap_step_degrees = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.bake.resolution, 1024);
        assert_eq!(config.bake.padding, 8);
        assert!(config.bake.flip_green);
        let smoothing = config.bake.smoothing.unwrap();
        assert_eq!(smoothing.radius, 3);
        assert_eq!(smoothing.iterations, 1);
        assert_eq!(smoothing.edge_mode, EdgeMode::Clamp);
        assert_eq!(config.edit.mirror_axis, MirrorAxis::X);
        assert_eq!(config.edit.snap_step_degrees, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_and_out_of_range() {
        assert!(Config::parse("[bake]\nresolutoin = 512\n").is_err());

        let config = Config::parse("[bake]\nresolution = 333\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{err:#}").contains("resolution"));
    }
}
