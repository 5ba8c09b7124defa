use crate::direction::{AnglePicker, MirrorAxis};
use crate::mirror::{DEFAULT_MIRROR_THRESHOLD, MirrorMatcher};
use crate::preview::DEFAULT_LIGHT_DIRECTION;
use crate::relax::RelaxNormals;
use crate::{Direction, EditError};
use serde::Deserialize;

/// Edit-time options, usually read from the `[edit]` table of the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditSettings {
    /// Mirror edits across this axis
    pub mirror_axis: MirrorAxis,
    /// Mirror matching distance in mesh units
    pub mirror_threshold: f32,
    /// Snap picker angles
    pub use_snap: bool,
    /// Snap step in degrees
    pub snap_step_degrees: f32,
    /// Toon preview light direction
    pub light_direction: [f32; 3],
    /// Relaxation blend towards the neighbour average (0..=1)
    pub relax_factor: f32,
    /// Relaxation passes (1..=20)
    pub relax_iterations: u32,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            mirror_axis: MirrorAxis::None,
            mirror_threshold: DEFAULT_MIRROR_THRESHOLD,
            use_snap: true,
            snap_step_degrees: 15.0,
            light_direction: DEFAULT_LIGHT_DIRECTION,
            relax_factor: 0.5,
            relax_iterations: 3,
        }
    }
}

impl EditSettings {
    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<(), EditError> {
        if !(self.mirror_threshold > 0.0 && self.mirror_threshold.is_finite()) {
            return Err(EditError::InvalidSetting {
                name: "mirror_threshold",
                value: self.mirror_threshold.to_string(),
                expected: "a positive distance",
            });
        }
        if !(self.snap_step_degrees > 0.0 && self.snap_step_degrees <= 90.0) {
            return Err(EditError::InvalidSetting {
                name: "snap_step_degrees",
                value: self.snap_step_degrees.to_string(),
                expected: "0 < step <= 90",
            });
        }
        if !(0.0..=1.0).contains(&self.relax_factor) {
            return Err(EditError::InvalidSetting {
                name: "relax_factor",
                value: self.relax_factor.to_string(),
                expected: "0.0..=1.0",
            });
        }
        if !(1..=20).contains(&self.relax_iterations) {
            return Err(EditError::InvalidSetting {
                name: "relax_iterations",
                value: self.relax_iterations.to_string(),
                expected: "1..=20",
            });
        }
        Ok(())
    }

    /// Matcher for the configured mirror axis, `None` when mirroring is off
    pub fn mirror_matcher(&self) -> Option<MirrorMatcher> {
        self.mirror_axis.axis().map(|axis| MirrorMatcher {
            axis,
            threshold: self.mirror_threshold,
        })
    }

    /// Picker honouring the snap settings
    pub fn picker(&self) -> AnglePicker {
        AnglePicker {
            snap_step: self.use_snap.then_some(self.snap_step_degrees),
            ..Default::default()
        }
    }

    /// Relaxation pass configured by these settings
    pub fn relax(&self) -> RelaxNormals {
        RelaxNormals {
            factor: self.relax_factor,
            iterations: self.relax_iterations,
        }
    }

    /// Preview light direction
    pub fn light(&self) -> Direction {
        Direction::from(self.light_direction)
    }
}
