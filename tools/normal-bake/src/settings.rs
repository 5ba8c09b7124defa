use crate::raster::ChannelFlip;
use crate::smooth::{EdgeMode, SmoothNormals};
use crate::BakeError;
use serde::Deserialize;

/// Output resolutions offered for a bake
pub const RESOLUTIONS: [u32; 4] = [512, 1024, 2048, 4096];

/// Largest accepted padding in pixels
pub const MAX_PADDING: u32 = 64;

/// Bake options, usually read from the `[bake]` config table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BakeSettings {
    /// Square output size in pixels
    pub resolution: u32,
    /// Edge padding in pixels to prevent seam artifacts
    pub padding: u32,
    /// Invert the red channel (X)
    pub flip_red: bool,
    /// Invert the green channel (Y), e.g. for DirectX-style maps
    pub flip_green: bool,
    /// Invert the blue channel (Z)
    pub flip_blue: bool,
    /// Smoothing pass, off when absent
    pub smoothing: Option<SmoothingSettings>,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            resolution: 2048,
            padding: 16,
            flip_red: false,
            flip_green: false,
            flip_blue: false,
            smoothing: None,
        }
    }
}

/// The `[bake.smoothing]` table
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingSettings {
    pub radius: u32,
    pub iterations: u32,
    pub edge_mode: EdgeMode,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        let smooth = SmoothNormals::default();
        Self {
            radius: smooth.radius,
            iterations: smooth.iterations,
            edge_mode: smooth.edge_mode,
        }
    }
}

impl From<SmoothingSettings> for SmoothNormals {
    fn from(s: SmoothingSettings) -> Self {
        SmoothNormals {
            radius: s.radius,
            iterations: s.iterations,
            edge_mode: s.edge_mode,
        }
    }
}

fn invalid(name: &'static str, value: impl ToString, expected: &'static str) -> BakeError {
    BakeError::InvalidSetting {
        name,
        value: value.to_string(),
        expected,
    }
}

impl BakeSettings {
    /// Channel flips as used by the rasterizer
    pub fn flip(&self) -> ChannelFlip {
        ChannelFlip {
            red: self.flip_red,
            green: self.flip_green,
            blue: self.flip_blue,
        }
    }

    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<(), BakeError> {
        if !RESOLUTIONS.contains(&self.resolution) {
            return Err(invalid(
                "resolution",
                self.resolution,
                "one of 512, 1024, 2048, 4096",
            ));
        }
        if self.padding > MAX_PADDING {
            return Err(invalid("padding", self.padding, "0..=64"));
        }
        if let Some(smoothing) = &self.smoothing {
            if !(1..=20).contains(&smoothing.radius) {
                return Err(invalid("smoothing.radius", smoothing.radius, "1..=20"));
            }
            if !(1..=10).contains(&smoothing.iterations) {
                return Err(invalid(
                    "smoothing.iterations",
                    smoothing.iterations,
                    "1..=10",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BakeSettings::default();
        assert_eq!(settings.resolution, 2048);
        assert_eq!(settings.padding, 16);
        assert_eq!(settings.flip(), ChannelFlip::default());
        assert!(settings.smoothing.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_resolution_set() {
        let settings = BakeSettings {
            resolution: 300,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(BakeError::InvalidSetting {
                name: "resolution",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_padding_and_smoothing() {
        let settings = BakeSettings {
            padding: 65,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = BakeSettings {
            smoothing: Some(SmoothingSettings {
                radius: 21,
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("smoothing.radius"));

        let settings = BakeSettings {
            smoothing: Some(SmoothingSettings {
                iterations: 0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_smoothing_defaults() {
        let s = SmoothingSettings::default();
        assert_eq!((s.radius, s.iterations, s.edge_mode), (2, 1, EdgeMode::Wrap));
    }
}
