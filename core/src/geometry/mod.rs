//! Read-mostly view over host mesh data
//!
//! The host owns the mesh. Edit operations see it only through
//! [`GeometryPort`], which exposes polygons, corners ("loops"), vertex
//! positions, the active UV layer, selection flags and the per-corner normal
//! array. [`MeshSnapshot`] is the in-memory implementation used by the CLI
//! and by tests.

mod snapshot;

pub use snapshot::{MeshSnapshot, Polygon};

use crate::{Direction, EditError};
use glam::{Vec2, Vec3};
use std::collections::BTreeSet;

/// Capability interface over a host mesh.
///
/// Indices are stable for the lifetime of one snapshot. The core never
/// changes topology; the only mutation is replacing the full corner-normal
/// array through [`GeometryPort::set_corner_normals`].
pub trait GeometryPort {
    /// Number of polygons
    fn polygon_count(&self) -> usize;

    /// Ordered corner indices of `polygon` (at least three)
    fn polygon_corners(&self, polygon: usize) -> &[usize];

    /// Host selection flag of `polygon`
    fn is_polygon_selected(&self, polygon: usize) -> bool;

    /// Number of corners across all polygons
    fn corner_count(&self) -> usize;

    /// Vertex index referenced by `corner`
    fn corner_vertex(&self, corner: usize) -> usize;

    /// Position of the vertex referenced by `corner`
    fn corner_position(&self, corner: usize) -> Vec3;

    /// Whether an active UV layer exists
    fn has_uv_layer(&self) -> bool;

    /// UV coordinate of `corner` on the active layer, `None` without a layer
    fn corner_uv(&self, corner: usize) -> Option<Vec2>;

    /// Current per-corner normals, indexed by corner
    fn corner_normals(&self) -> Vec<Direction>;

    /// Replace the whole per-corner normal array at once
    fn set_corner_normals(&mut self, normals: &[Direction]) -> Result<(), EditError>;

    /// Mean of the polygon's vertex positions
    fn polygon_center(&self, polygon: usize) -> Vec3 {
        let corners = self.polygon_corners(polygon);
        if corners.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = corners.iter().map(|&c| self.corner_position(c)).sum();
        sum / corners.len() as f32
    }

    /// Geometric polygon normal (Newell's method), +Z for degenerate polygons
    fn polygon_normal(&self, polygon: usize) -> Direction {
        let corners = self.polygon_corners(polygon);
        let mut n = Vec3::ZERO;
        for (i, &c) in corners.iter().enumerate() {
            let a = self.corner_position(c);
            let b = self.corner_position(corners[(i + 1) % corners.len()]);
            n += Vec3::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            );
        }
        Direction::new(n)
    }

    /// Indices of polygons flagged as selected, ascending
    fn selected_polygons(&self) -> Vec<usize> {
        (0..self.polygon_count())
            .filter(|&p| self.is_polygon_selected(p))
            .collect()
    }

    /// Every corner of every selected polygon
    fn selected_corners(&self) -> BTreeSet<usize> {
        self.selected_polygons()
            .into_iter()
            .flat_map(|p| self.polygon_corners(p).to_vec())
            .collect()
    }

    /// Owning polygon of each corner, indexed by corner
    fn corner_owners(&self) -> Vec<usize> {
        let mut owners = vec![usize::MAX; self.corner_count()];
        for p in 0..self.polygon_count() {
            for &c in self.polygon_corners(p) {
                if let Some(slot) = owners.get_mut(c) {
                    *slot = p;
                }
            }
        }
        owners
    }
}
