//! Flat-shaded rasterization of polygon normals into UV space

use crate::{BakeError, PixelBuffer};
use glam::{DVec2, Vec2, Vec3};
use normal_core::{Direction, GeometryPort, NormalStore};

/// Below this the barycentric system is treated as singular
const DEGENERATE_EPSILON: f64 = 1e-10;

/// Per-channel sign flip applied when encoding normals to colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelFlip {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

/// Map a direction to RGBA: `n * 0.5 + 0.5`, or `-n * 0.5 + 0.5` on flipped channels
pub fn encode_normal(normal: Direction, flip: ChannelFlip) -> [f32; 4] {
    let n = normal.vec();
    let channel = |c: f32, flipped: bool| if flipped { -c * 0.5 + 0.5 } else { c * 0.5 + 0.5 };
    [
        channel(n.x, flip.red),
        channel(n.y, flip.green),
        channel(n.z, flip.blue),
        1.0,
    ]
}

/// Inverse of the unflipped encoding, `rgb * 2 - 1` (not normalized)
#[inline]
pub fn decode_normal(pixel: [f32; 4]) -> Vec3 {
    Vec3::new(pixel[0], pixel[1], pixel[2]) * 2.0 - Vec3::ONE
}

/// Rasterizes stored polygon normals into a square buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    /// Buffer width and height in pixels
    pub resolution: u32,
    pub flip: ChannelFlip,
}

impl Rasterizer {
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            flip: ChannelFlip::default(),
        }
    }

    /// Rasterize the selected polygons, or every polygon when nothing is
    /// selected. Each polygon is fan-triangulated and filled with the colour
    /// of its stored direction (`+Z` when unstored). Later polygons overwrite
    /// earlier ones where UVs overlap.
    pub fn rasterize<G: GeometryPort + ?Sized>(
        &self,
        geometry: &G,
        store: &NormalStore,
    ) -> Result<PixelBuffer, BakeError> {
        if self.resolution == 0 {
            return Err(BakeError::ZeroResolution);
        }
        if !geometry.has_uv_layer() {
            return Err(BakeError::NoUvLayer);
        }

        let mut polygons = geometry.selected_polygons();
        if polygons.is_empty() {
            polygons = (0..geometry.polygon_count()).collect();
        }

        let mut buffer = PixelBuffer::new(self.resolution, self.resolution);
        let scale = self.resolution as f32;
        let mut uvs: Vec<Vec2> = Vec::new();

        for polygon in polygons {
            let corners = geometry.polygon_corners(polygon);
            uvs.clear();
            for &corner in corners {
                // Layer exists, so a missing coordinate is a host inconsistency; skip the polygon
                let Some(uv) = geometry.corner_uv(corner) else {
                    tracing::debug!("polygon {} has a corner without UV, skipped", polygon);
                    uvs.clear();
                    break;
                };
                uvs.push(uv * scale);
            }
            if uvs.len() < 3 {
                continue;
            }

            let color = encode_normal(store.get(polygon).unwrap_or(Direction::UP), self.flip);
            for i in 1..uvs.len() - 1 {
                fill_triangle(&mut buffer, [uvs[0], uvs[i], uvs[i + 1]], color);
            }
        }

        Ok(buffer)
    }
}

/// Barycentric weights of `p` for triangle `(p0, p1, p2)`, `None` when degenerate.
///
/// Evaluated in f64 so large pixel-space coordinates do not overflow.
fn barycentric(p0: Vec2, p1: Vec2, p2: Vec2, p: Vec2) -> Option<[f64; 3]> {
    let p0 = p0.as_dvec2();
    let v0: DVec2 = p1.as_dvec2() - p0;
    let v1: DVec2 = p2.as_dvec2() - p0;
    let v2: DVec2 = p.as_dvec2() - p0;

    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d02 = v0.dot(v2);
    let d11 = v1.dot(v1);
    let d12 = v1.dot(v2);

    let denom = d00 * d11 - d01 * d01;
    if !denom.is_finite() || denom.abs() < DEGENERATE_EPSILON {
        return None;
    }

    let inv = 1.0 / denom;
    let u = (d11 * d02 - d01 * d12) * inv;
    let v = (d00 * d12 - d01 * d02) * inv;
    Some([1.0 - u - v, u, v])
}

/// Fill every pixel whose centre lies inside the triangle (pixel-space coordinates)
fn fill_triangle(buffer: &mut PixelBuffer, tri: [Vec2; 3], color: [f32; 4]) {
    if !tri.iter().all(|p| p.is_finite()) {
        tracing::debug!("triangle with non-finite UV skipped");
        return;
    }

    let max_x = (buffer.width - 1) as f32;
    let max_y = (buffer.height - 1) as f32;
    let lo = tri[0].min(tri[1]).min(tri[2]);
    let hi = tri[0].max(tri[1]).max(tri[2]);

    // Clamp before casting so huge coordinates cannot overflow the range
    let x0 = lo.x.floor().max(0.0) as i64;
    let x1 = (hi.x.floor() + 1.0).min(max_x) as i64;
    let y0 = lo.y.floor().max(0.0) as i64;
    let y1 = (hi.y.floor() + 1.0).min(max_y) as i64;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            match barycentric(tri[0], tri[1], tri[2], center) {
                Some(w) if w.iter().all(|&c| c >= 0.0) => {
                    buffer.write_pixel(x as u32, y as u32, color);
                }
                Some(_) => {}
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normal_core::MeshSnapshot;

    fn uv_quad(positions_offset: f32, uv: [Vec2; 4]) -> MeshSnapshot {
        let mut mesh = MeshSnapshot::new(vec![
            Vec3::new(positions_offset, 0.0, 0.0),
            Vec3::new(positions_offset + 1.0, 0.0, 0.0),
            Vec3::new(positions_offset + 1.0, 1.0, 0.0),
            Vec3::new(positions_offset, 1.0, 0.0),
        ]);
        mesh.add_polygon(&[0, 1, 2, 3], Some(&uv)).unwrap();
        mesh
    }

    fn full_square() -> [Vec2; 4] {
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_encode_normal_flips() {
        let n = Direction::from_xyz(1.0, 0.0, 0.0);
        assert_eq!(encode_normal(n, ChannelFlip::default()), [1.0, 0.5, 0.5, 1.0]);
        let flip = ChannelFlip {
            red: true,
            green: false,
            blue: true,
        };
        assert_eq!(encode_normal(Direction::UP, flip), [0.5, 0.5, 0.0, 1.0]);
        assert_eq!(encode_normal(n, flip), [0.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_barycentric_degenerate() {
        let p = Vec2::new(1.0, 1.0);
        assert!(barycentric(Vec2::ZERO, Vec2::ONE, Vec2::splat(2.0), p).is_none());
        let w = barycentric(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0), p).unwrap();
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(w.iter().all(|&c| c > 0.0));
    }

    #[test]
    fn test_full_square_covers_every_pixel() {
        let mesh = uv_quad(0.0, full_square());
        let mut store = NormalStore::new();
        store.insert(0, Direction::from_xyz(0.0, 1.0, 0.0));

        let buffer = Rasterizer::new(4).rasterize(&mesh, &store).unwrap();
        assert_eq!(buffer.written_count(), 16);
        assert!(buffer.pixels.iter().all(|&p| p == [0.5, 1.0, 0.5, 1.0]));
    }

    #[test]
    fn test_half_square_leaves_background() {
        let uv = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.0),
            Vec2::new(0.5, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let mesh = uv_quad(0.0, uv);
        let mut store = NormalStore::new();
        store.insert(0, Direction::from_xyz(1.0, 0.0, 0.0));

        let buffer = Rasterizer::new(4).rasterize(&mesh, &store).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buffer.is_written(x, y), x < 2, "pixel ({x}, {y})");
            }
        }
        assert_eq!(buffer.get_pixel(3, 0), crate::NEUTRAL_NORMAL);
    }

    #[test]
    fn test_only_selected_polygons_are_baked() {
        let mut mesh = MeshSnapshot::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE]);
        let left = [Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0), Vec2::new(0.0, 1.0)];
        let right = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.5, 1.0)];
        mesh.add_polygon(&[0, 1, 2], Some(&left)).unwrap();
        mesh.add_polygon(&[1, 3, 2], Some(&right)).unwrap();
        mesh.set_selected(1, true).unwrap();

        let buffer = Rasterizer::new(8).rasterize(&mesh, &NormalStore::new()).unwrap();
        assert!(!buffer.is_written(0, 0));
        assert!(buffer.is_written(7, 4));
    }

    #[test]
    fn test_missing_uv_layer() {
        let mut mesh = MeshSnapshot::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        mesh.add_polygon(&[0, 1, 2], None).unwrap();
        let err = Rasterizer::new(4)
            .rasterize(&mesh, &NormalStore::new())
            .unwrap_err();
        assert!(matches!(err, BakeError::NoUvLayer));
    }

    #[test]
    fn test_huge_uv_clamps_to_buffer() {
        let mut mesh = MeshSnapshot::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        let uv = [Vec2::new(0.0, 0.0), Vec2::new(1e30, 0.0), Vec2::new(0.0, 1.0)];
        mesh.add_polygon(&[0, 1, 2], Some(&uv)).unwrap();

        let buffer = Rasterizer::new(8).rasterize(&mesh, &NormalStore::new()).unwrap();
        // The triangle spans the whole buffer
        assert_eq!(buffer.written_count(), 64);
    }

    #[test]
    fn test_non_finite_uv_is_skipped() {
        let mut mesh = MeshSnapshot::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE]);
        let bad = [
            Vec2::new(0.0, 0.0),
            Vec2::new(f32::INFINITY, 0.0),
            Vec2::new(0.0, f32::NAN),
        ];
        let good = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.5, 1.0)];
        mesh.add_polygon(&[0, 1, 2], Some(&bad)).unwrap();
        mesh.add_polygon(&[1, 3, 2], Some(&good)).unwrap();

        let buffer = Rasterizer::new(8).rasterize(&mesh, &NormalStore::new()).unwrap();
        assert!(!buffer.is_written(0, 0));
        assert!(buffer.is_written(7, 4));
    }

    #[test]
    fn test_uv_outside_buffer_writes_nothing() {
        let uv = [
            Vec2::new(-3.0, -3.0),
            Vec2::new(-2.0, -3.0),
            Vec2::new(-2.0, -2.0),
            Vec2::new(-3.0, -2.0),
        ];
        let mesh = uv_quad(0.0, uv);
        let buffer = Rasterizer::new(8).rasterize(&mesh, &NormalStore::new()).unwrap();
        assert_eq!(buffer.written_count(), 0);
    }

    #[test]
    fn test_zero_resolution() {
        let mesh = uv_quad(0.0, full_square());
        let err = Rasterizer::new(0)
            .rasterize(&mesh, &NormalStore::new())
            .unwrap_err();
        assert!(matches!(err, BakeError::ZeroResolution));
    }
}
