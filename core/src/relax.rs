//! Relaxation of stored polygon normals
//!
//! Unlike the bake-time image smoothing, this operates on the
//! [`NormalStore`] itself: each stored polygon is pulled towards the average
//! of stored polygons that share a vertex with it.

use crate::geometry::GeometryPort;
use crate::store::NormalStore;
use crate::{Direction, EditError};
use glam::Vec3;
use hashbrown::{HashMap, HashSet};

/// Neighbour-average relaxation of the stored normals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxNormals {
    /// Blend towards the neighbour average (0 = unchanged, 1 = average)
    pub factor: f32,
    /// Number of passes
    pub iterations: u32,
}

impl Default for RelaxNormals {
    fn default() -> Self {
        Self {
            factor: 0.5,
            iterations: 3,
        }
    }
}

impl RelaxNormals {
    /// Relax `store` over the vertex adjacency of `geometry`.
    ///
    /// Each pass reads only the previous pass's values. Polygons with no
    /// stored neighbour keep their direction; stale entries (polygon indices
    /// outside the mesh) are carried through unchanged.
    pub fn apply<G: GeometryPort + ?Sized>(
        &self,
        geometry: &G,
        store: &NormalStore,
    ) -> Result<NormalStore, EditError> {
        if store.is_empty() {
            return Err(EditError::NoStoredNormals);
        }

        let neighbours = polygon_neighbours(geometry);
        tracing::info!(
            "Smoothing normals... (Factor: {}, Iterations: {})",
            self.factor,
            self.iterations
        );

        let mut current = store.clone();
        for _ in 0..self.iterations {
            let mut next = NormalStore::new();
            for (polygon, normal) in current.iter() {
                let mut sum = Vec3::ZERO;
                let mut count = 0usize;
                if let Some(adjacent) = neighbours.get(&polygon) {
                    for &other in adjacent {
                        if let Some(n) = current.get(other) {
                            sum += n.vec();
                            count += 1;
                        }
                    }
                }

                let relaxed = if count > 0 {
                    let average = Direction::new(sum / count as f32);
                    Direction::new(normal.vec().lerp(average.vec(), self.factor))
                } else {
                    normal
                };
                next.insert(polygon, relaxed);
            }
            current = next;
        }

        Ok(current)
    }
}

/// Polygons sharing at least one vertex, excluding the polygon itself
fn polygon_neighbours<G: GeometryPort + ?Sized>(geometry: &G) -> HashMap<usize, HashSet<usize>> {
    let mut vertex_faces: HashMap<usize, Vec<usize>> = HashMap::new();
    for polygon in 0..geometry.polygon_count() {
        for &corner in geometry.polygon_corners(polygon) {
            vertex_faces
                .entry(geometry.corner_vertex(corner))
                .or_default()
                .push(polygon);
        }
    }

    let mut neighbours: HashMap<usize, HashSet<usize>> = HashMap::new();
    for polygon in 0..geometry.polygon_count() {
        let set = neighbours.entry(polygon).or_default();
        for &corner in geometry.polygon_corners(polygon) {
            if let Some(faces) = vertex_faces.get(&geometry.corner_vertex(corner)) {
                set.extend(faces.iter().copied().filter(|&f| f != polygon));
            }
        }
    }
    neighbours
}
