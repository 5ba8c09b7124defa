//! Unit directions and axis reflection
//!
//! A [`Direction`] is the local-space normal the editor assigns to corners and
//! polygons. Construction always normalizes, so a `Direction` is unit length
//! within [`DIRECTION_EPSILON`]; zero or non-finite input falls back to
//! [`Direction::UP`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

/// Tolerance on the unit length of a normalized direction
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Coordinate axis used for mirroring and per-axis operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis (left/right)
    X,
    /// Y axis (front/back)
    Y,
    /// Z axis (up/down)
    Z,
}

impl Axis {
    /// Component index of this axis (0, 1 or 2)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Reflect a point across the plane orthogonal to this axis through the origin
    #[inline]
    pub fn reflect(self, mut v: Vec3) -> Vec3 {
        v[self.index()] = -v[self.index()];
        v
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        })
    }
}

/// Mirror setting as exposed to the user: no mirroring or one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorAxis {
    /// Edits apply to the selection only
    #[default]
    None,
    /// Mirror across X
    X,
    /// Mirror across Y
    Y,
    /// Mirror across Z
    Z,
}

impl MirrorAxis {
    /// The mirrored axis, or `None` when mirroring is off
    pub fn axis(self) -> Option<Axis> {
        match self {
            MirrorAxis::None => None,
            MirrorAxis::X => Some(Axis::X),
            MirrorAxis::Y => Some(Axis::Y),
            MirrorAxis::Z => Some(Axis::Z),
        }
    }
}

impl FromStr for MirrorAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(MirrorAxis::None),
            "x" => Ok(MirrorAxis::X),
            "y" => Ok(MirrorAxis::Y),
            "z" => Ok(MirrorAxis::Z),
            other => Err(format!("unknown mirror axis '{other}' (expected none, x, y or z)")),
        }
    }
}

/// Unit-length local-space direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Direction(Vec3);

impl Direction {
    /// Canonical fallback direction (+Z)
    pub const UP: Direction = Direction(Vec3::Z);

    /// Normalize `v`, falling back to [`Direction::UP`] for zero or non-finite input
    pub fn new(v: Vec3) -> Self {
        Self(v.try_normalize().unwrap_or(Vec3::Z))
    }

    /// Build from components
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z))
    }

    /// Convert yaw/pitch angles (radians) to a direction.
    ///
    /// Yaw rotates around +Z with yaw 0 facing -Y; pitch tilts towards +Z.
    pub fn from_spherical(yaw: f32, pitch: f32) -> Self {
        let cos_pitch = pitch.cos();
        Self::new(Vec3::new(
            yaw.sin() * cos_pitch,
            -yaw.cos() * cos_pitch,
            pitch.sin(),
        ))
    }

    /// Inverse of [`Direction::from_spherical`], returns `(yaw, pitch)`
    pub fn to_spherical(self) -> (f32, f32) {
        let pitch = self.0.z.clamp(-1.0, 1.0).asin();
        let yaw = self.0.x.atan2(-self.0.y);
        (yaw, pitch)
    }

    /// Negate the component on `axis`
    #[inline]
    pub fn reflect(self, axis: Axis) -> Self {
        Self(axis.reflect(self.0))
    }

    /// Underlying vector
    #[inline]
    pub fn vec(self) -> Vec3 {
        self.0
    }

    /// Components as an array
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }

    /// Components rounded to three decimals, for reports
    pub fn rounded(self) -> [f32; 3] {
        self.0.to_array().map(|c| (c * 1000.0).round() / 1000.0)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::UP
    }
}

impl From<[f32; 3]> for Direction {
    fn from(v: [f32; 3]) -> Self {
        Self::new(Vec3::from(v))
    }
}

impl From<Direction> for [f32; 3] {
    fn from(d: Direction) -> Self {
        d.to_array()
    }
}

impl From<Vec3> for Direction {
    fn from(v: Vec3) -> Self {
        Self::new(v)
    }
}

/// Round an angle (radians) to the nearest multiple of `step_degrees`
pub fn snap_angle(angle: f32, step_degrees: f32) -> f32 {
    let step = step_degrees.to_radians();
    if step <= 0.0 {
        return angle;
    }
    (angle / step).round() * step
}

/// Angle picker mapping a 2D pointer offset to yaw/pitch.
///
/// The picker is a `width` x `height` rectangle centred on the press point:
/// the horizontal extent covers yaw -180°..180°, the vertical extent covers
/// pitch -90°..90°. [`AnglePicker::pick`] is a pure function of the pointer
/// offset so the host can call it on every drag event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnglePicker {
    /// Rectangle width in pixels
    pub width: u32,
    /// Rectangle height in pixels
    pub height: u32,
    /// Snap step in degrees, `None` disables snapping
    pub snap_step: Option<f32>,
}

impl Default for AnglePicker {
    fn default() -> Self {
        Self {
            width: 240,
            height: 120,
            snap_step: Some(15.0),
        }
    }
}

/// Result of a picker query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickedAngle {
    /// Yaw in radians
    pub yaw: f32,
    /// Pitch in radians
    pub pitch: f32,
    /// Direction for `(yaw, pitch)`
    pub direction: Direction,
}

impl AnglePicker {
    fn half_extents(&self) -> (f32, f32) {
        ((self.width / 2).max(1) as f32, (self.height / 2).max(1) as f32)
    }

    /// Whether a pointer offset lies inside the picker rectangle
    pub fn contains(&self, dx: f32, dy: f32) -> bool {
        let (half_w, half_h) = self.half_extents();
        dx.abs() <= half_w && dy.abs() <= half_h
    }

    /// Map a pointer offset from the picker centre to a direction
    pub fn pick(&self, dx: f32, dy: f32) -> PickedAngle {
        let (half_w, half_h) = self.half_extents();
        let dx = dx.clamp(-half_w, half_w);
        let dy = dy.clamp(-half_h, half_h);

        let mut yaw = dx / half_w * PI;
        let mut pitch = dy / half_h * FRAC_PI_2;
        if let Some(step) = self.snap_step {
            yaw = snap_angle(yaw, step);
            pitch = snap_angle(pitch, step);
        }

        PickedAngle {
            yaw,
            pitch,
            direction: Direction::from_spherical(yaw, pitch),
        }
    }
}
