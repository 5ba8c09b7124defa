//! Normal-preserving box blur for baked normal maps
//!
//! Each pass averages the RGB of the square neighbourhood of half-width
//! `radius`, decodes the mean back to a vector, renormalizes it and encodes
//! it again. Alpha is left as it was. The blur is separable, so each pass is
//! a horizontal then a vertical sliding-window sum over a snapshot of the
//! previous pass.

use crate::modifiers::BufferModifier;
use crate::raster::decode_normal;
use crate::PixelBuffer;
use glam::Vec3;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How neighbourhoods are sampled past the buffer edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Toroidal: positions wrap to the opposite edge (tiling textures)
    #[default]
    Wrap,
    /// Positions clamp to the nearest edge pixel
    Clamp,
}

impl EdgeMode {
    #[inline]
    fn resolve(self, i: i64, len: i64) -> usize {
        match self {
            EdgeMode::Wrap => i.rem_euclid(len) as usize,
            EdgeMode::Clamp => i.clamp(0, len - 1) as usize,
        }
    }
}

impl FromStr for EdgeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" => Ok(EdgeMode::Wrap),
            "clamp" => Ok(EdgeMode::Clamp),
            other => Err(format!("unknown edge mode '{other}' (expected wrap or clamp)")),
        }
    }
}

impl fmt::Display for EdgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EdgeMode::Wrap => "wrap",
            EdgeMode::Clamp => "clamp",
        })
    }
}

/// Iterated box blur with per-pixel renormalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothNormals {
    /// Neighbourhood half-width in pixels
    pub radius: u32,
    pub iterations: u32,
    pub edge_mode: EdgeMode,
}

impl Default for SmoothNormals {
    fn default() -> Self {
        Self {
            radius: 2,
            iterations: 1,
            edge_mode: EdgeMode::Wrap,
        }
    }
}

impl BufferModifier for SmoothNormals {
    fn apply(&self, buffer: &mut PixelBuffer) {
        if buffer.width == 0 || buffer.height == 0 {
            return;
        }
        let width = buffer.width as usize;
        let height = buffer.height as usize;

        for _ in 0..self.iterations {
            let rgb: Vec<Vec3> = buffer
                .pixels
                .iter()
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect();

            let mut horizontal = vec![Vec3::ZERO; rgb.len()];
            for y in 0..height {
                let row = &rgb[y * width..(y + 1) * width];
                let out = &mut horizontal[y * width..(y + 1) * width];
                box_mean(|i| row[i], out.iter_mut(), width, self.radius, self.edge_mode);
            }

            let mut blurred = vec![Vec3::ZERO; rgb.len()];
            for x in 0..width {
                let column = blurred.iter_mut().skip(x).step_by(width);
                box_mean(
                    |i| horizontal[i * width + x],
                    column,
                    height,
                    self.radius,
                    self.edge_mode,
                );
            }

            for (pixel, mean) in buffer.pixels.iter_mut().zip(blurred) {
                let n = decode_normal([mean.x, mean.y, mean.z, 1.0]);
                let n = n.try_normalize().unwrap_or(Vec3::ZERO);
                let encoded = n * 0.5 + Vec3::splat(0.5);
                *pixel = [encoded.x, encoded.y, encoded.z, pixel[3]];
            }
        }
    }
}

/// Sliding-window mean of `2 * radius + 1` samples along one line
fn box_mean<'a>(
    sample: impl Fn(usize) -> Vec3,
    out: impl Iterator<Item = &'a mut Vec3>,
    len: usize,
    radius: u32,
    edge_mode: EdgeMode,
) {
    let len_i = len as i64;
    let r = radius as i64;
    let at = |i: i64| sample(edge_mode.resolve(i, len_i));
    let inv = 1.0 / (2 * r + 1) as f32;

    let mut sum = (-r..=r).map(at).fold(Vec3::ZERO, |acc, v| acc + v);
    for (i, slot) in out.enumerate() {
        *slot = sum * inv;
        let i = i as i64;
        sum += at(i + r + 1) - at(i - r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::BufferApply;
    use crate::raster::{encode_normal, ChannelFlip};
    use normal_core::Direction;

    /// Naive O(radius²) reference of one pass, without renormalization
    fn naive_mean(buf: &PixelBuffer, x: u32, y: u32, radius: u32, mode: EdgeMode) -> Vec3 {
        let (w, h, r) = (buf.width as i64, buf.height as i64, radius as i64);
        let mut sum = Vec3::ZERO;
        for dy in -r..=r {
            for dx in -r..=r {
                let sx = mode.resolve(x as i64 + dx, w) as u32;
                let sy = mode.resolve(y as i64 + dy, h) as u32;
                let p = buf.get_pixel(sx, sy);
                sum += Vec3::new(p[0], p[1], p[2]);
            }
        }
        sum / ((2 * r + 1) * (2 * r + 1)) as f32
    }

    fn patterned(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let d = Direction::from_xyz(x as f32 - 2.0, y as f32 * 0.5 - 1.0, 1.5);
                buf.write_pixel(x, y, encode_normal(d, ChannelFlip::default()));
            }
        }
        buf
    }

    #[test]
    fn test_edge_mode_parse() {
        assert_eq!("wrap".parse::<EdgeMode>(), Ok(EdgeMode::Wrap));
        assert_eq!("CLAMP".parse::<EdgeMode>(), Ok(EdgeMode::Clamp));
        assert!("mirror".parse::<EdgeMode>().is_err());
    }

    #[test]
    fn test_matches_naive_mean_direction() {
        for mode in [EdgeMode::Wrap, EdgeMode::Clamp] {
            let buf = patterned(6, 5);
            let mut smoothed = buf.clone();
            smoothed.apply(SmoothNormals {
                radius: 2,
                iterations: 1,
                edge_mode: mode,
            });

            for y in 0..5 {
                for x in 0..6 {
                    let expected = decode_normal({
                        let m = naive_mean(&buf, x, y, 2, mode);
                        [m.x, m.y, m.z, 1.0]
                    })
                    .normalize();
                    let got = decode_normal(smoothed.get_pixel(x, y));
                    assert!(got.distance(expected) < 1e-4, "{mode} ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_uniform_buffer_is_fixed_point() {
        let mut buf = PixelBuffer::new(4, 4);
        let color = encode_normal(Direction::from_xyz(0.0, 0.6, 0.8), ChannelFlip::default());
        for y in 0..4 {
            for x in 0..4 {
                buf.write_pixel(x, y, color);
            }
        }
        buf.apply(SmoothNormals {
            radius: 1,
            iterations: 3,
            edge_mode: EdgeMode::Wrap,
        });
        for p in &buf.pixels {
            for c in 0..3 {
                assert!((p[c] - color[c]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_zero_mean_encodes_as_zero_vector() {
        // With wrap, every radius-1 window of a 3x1 row covers the whole row
        let mut buf = PixelBuffer::new(3, 1);
        buf.write_pixel(0, 0, [1.0, 0.5, 0.5, 1.0]);
        buf.write_pixel(1, 0, [0.0, 0.5, 0.5, 0.25]);
        buf.write_pixel(2, 0, [0.5, 0.5, 0.5, 1.0]);
        buf.apply(SmoothNormals {
            radius: 1,
            iterations: 1,
            edge_mode: EdgeMode::Wrap,
        });
        assert_eq!(buf.get_pixel(0, 0), [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(buf.get_pixel(1, 0), [0.5, 0.5, 0.5, 0.25]);
    }

    #[test]
    fn test_keeps_alpha() {
        let mut buf = patterned(4, 4);
        buf.pixels[5][3] = 0.25;
        buf.apply(SmoothNormals::default());
        assert_eq!(buf.pixels[5][3], 0.25);
        assert_eq!(buf.pixels[0][3], 1.0);
    }
}
