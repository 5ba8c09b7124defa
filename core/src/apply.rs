//! Writing directions into corner normals and the normal store

use crate::direction::Axis;
use crate::geometry::GeometryPort;
use crate::mirror::MirrorMap;
use crate::preview::PreviewSession;
use crate::store::NormalStore;
use crate::{Direction, EditError};
use std::collections::BTreeSet;

/// Set one direction on a set of corners, optionally mirrored.
///
/// # Example
/// ```
/// use glam::Vec3;
/// use normal_core::{ApplyNormal, Direction, GeometryPort, MeshSnapshot, NormalStore};
///
/// let mut mesh = MeshSnapshot::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
/// mesh.add_polygon(&[0, 1, 2], None).unwrap();
/// mesh.set_selected(0, true).unwrap();
///
/// let mut store = NormalStore::new();
/// let corners = mesh.selected_corners();
/// let outcome = ApplyNormal::new(Direction::from_xyz(1.0, 0.0, 0.0), &corners)
///     .apply(&mut mesh, &mut store, None)
///     .unwrap();
/// assert_eq!(outcome.source_polygons.len(), 1);
/// assert_eq!(store.get(0), Some(Direction::from_xyz(1.0, 0.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ApplyNormal<'a> {
    /// Direction written to every selected corner
    pub direction: Direction,
    /// Selected corners
    pub corners: &'a BTreeSet<usize>,
    /// Mirror targets and the axis whose component is negated for them
    pub mirror: Option<(&'a MirrorMap, Axis)>,
}

/// What an [`ApplyNormal`] changed
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    /// Full corner-normal array as written to the mesh
    pub normals: Vec<Direction>,
    /// Polygons owning at least one selected corner
    pub source_polygons: BTreeSet<usize>,
    /// Polygons owning at least one mirror target
    pub mirrored_polygons: BTreeSet<usize>,
}

impl<'a> ApplyNormal<'a> {
    /// Apply `direction` to `corners` without mirroring
    pub fn new(direction: Direction, corners: &'a BTreeSet<usize>) -> Self {
        Self {
            direction,
            corners,
            mirror: None,
        }
    }

    /// Also write the mirrored direction to the targets of `map`
    pub fn mirrored(mut self, map: &'a MirrorMap, axis: Axis) -> Self {
        self.mirror = Some((map, axis));
        self
    }

    /// Update corner normals, the store and (if enabled) the preview.
    ///
    /// All indices are validated before anything is written; on error the
    /// mesh and the store are untouched.
    pub fn apply<G: GeometryPort + ?Sized>(
        &self,
        geometry: &mut G,
        store: &mut NormalStore,
        preview: Option<&mut PreviewSession>,
    ) -> Result<ApplyOutcome, EditError> {
        if self.corners.is_empty() {
            return Err(EditError::NoSelection);
        }

        let mut normals = geometry.corner_normals();
        let count = normals.len();
        let mirror_targets = self.mirror.into_iter().flat_map(|(map, _)| map.targets());
        if let Some(corner) = self
            .corners
            .iter()
            .copied()
            .chain(mirror_targets)
            .find(|&c| c >= count)
        {
            return Err(EditError::CornerOutOfRange { corner, count });
        }

        let owners = geometry.corner_owners();
        let owner = |corner: usize| owners.get(corner).copied().filter(|&p| p != usize::MAX);

        let mut source_polygons = BTreeSet::new();
        for &corner in self.corners {
            normals[corner] = self.direction;
            source_polygons.extend(owner(corner));
        }

        let mut mirrored_polygons = BTreeSet::new();
        let mut mirrored_direction = None;
        if let Some((map, axis)) = self.mirror {
            let mirrored = self.direction.reflect(axis);
            for target in map.targets() {
                normals[target] = mirrored;
                mirrored_polygons.extend(owner(target));
            }
            mirrored_direction = Some(mirrored);
        }

        geometry.set_corner_normals(&normals)?;

        for &polygon in &source_polygons {
            store.insert(polygon, self.direction);
        }
        if let Some(mirrored) = mirrored_direction {
            for &polygon in &mirrored_polygons {
                store.insert(polygon, mirrored);
            }
        }

        match self.mirror {
            Some((map, axis)) if !map.is_empty() => tracing::info!(
                "Normal set to {:?} (mirrored {})",
                self.direction.rounded(),
                axis
            ),
            _ => tracing::info!("Normal set to {:?}", self.direction.rounded()),
        }

        if let Some(preview) = preview {
            preview.refresh(&*geometry, store);
        }

        Ok(ApplyOutcome {
            normals,
            source_polygons,
            mirrored_polygons,
        })
    }
}

/// Assign every corner its polygon's stored direction.
///
/// Polygons without an entry get [`Direction::UP`]. The whole array is
/// written at once.
pub fn write_store_to_corners<G: GeometryPort + ?Sized>(
    geometry: &mut G,
    store: &NormalStore,
) -> Result<Vec<Direction>, EditError> {
    let mut normals = vec![Direction::UP; geometry.corner_count()];
    for polygon in 0..geometry.polygon_count() {
        let direction = store.get(polygon).unwrap_or(Direction::UP);
        for &corner in geometry.polygon_corners(polygon) {
            if let Some(slot) = normals.get_mut(corner) {
                *slot = direction;
            }
        }
    }
    geometry.set_corner_normals(&normals)?;
    Ok(normals)
}

/// Reset corner normals to geometric polygon normals and empty the store
pub fn clear_custom_normals<G: GeometryPort + ?Sized>(
    geometry: &mut G,
    store: &mut NormalStore,
) -> Result<(), EditError> {
    let mut normals = vec![Direction::UP; geometry.corner_count()];
    for polygon in 0..geometry.polygon_count() {
        let direction = geometry.polygon_normal(polygon);
        for &corner in geometry.polygon_corners(polygon) {
            if let Some(slot) = normals.get_mut(corner) {
                *slot = direction;
            }
        }
    }
    geometry.set_corner_normals(&normals)?;
    store.clear();
    tracing::info!("Custom normals cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshSnapshot;
    use crate::mirror::MirrorMatcher;
    use glam::Vec3;

    /// Quad at +X and its mirror at -X, both facing +Z
    fn mirrored_quads() -> MeshSnapshot {
        let mut mesh = MeshSnapshot::new(vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(-2.0, 1.0, 0.0),
            Vec3::new(-2.0, 0.0, 0.0),
        ]);
        mesh.add_polygon(&[0, 1, 2, 3], None).unwrap();
        mesh.add_polygon(&[4, 5, 6, 7], None).unwrap();
        mesh
    }

    #[test]
    fn test_apply_sets_selected_corners_and_store() {
        let mut mesh = mirrored_quads();
        mesh.set_selected(0, true).unwrap();
        let corners = mesh.selected_corners();
        let mut store = NormalStore::new();
        let dir = Direction::from_xyz(1.0, 0.0, 1.0);

        let outcome = ApplyNormal::new(dir, &corners)
            .apply(&mut mesh, &mut store, None)
            .unwrap();

        let normals = mesh.corner_normals();
        assert!(normals[..4].iter().all(|&n| n == dir));
        assert!(normals[4..].iter().all(|&n| n == Direction::UP));
        assert_eq!(outcome.normals, normals);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0), Some(dir));
    }

    #[test]
    fn test_apply_mirrored_negates_axis_component() {
        let mut mesh = mirrored_quads();
        mesh.set_selected(0, true).unwrap();
        let corners = mesh.selected_corners();
        let map = MirrorMatcher::new(Axis::X).find(&mesh, &corners);
        assert_eq!(map.len(), 4);

        let mut store = NormalStore::new();
        let dir = Direction::from_xyz(1.0, 0.0, 1.0);
        let outcome = ApplyNormal::new(dir, &corners)
            .mirrored(&map, Axis::X)
            .apply(&mut mesh, &mut store, None)
            .unwrap();

        let mirrored = dir.reflect(Axis::X);
        assert!(mesh.corner_normals()[4..].iter().all(|&n| n == mirrored));
        assert_eq!(store.get(1), Some(mirrored));
        assert_eq!(outcome.mirrored_polygons.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_empty_selection_changes_nothing() {
        let mut mesh = mirrored_quads();
        let mut store = NormalStore::new();
        let before = mesh.corner_normals();
        let err = ApplyNormal::new(Direction::UP, &BTreeSet::new())
            .apply(&mut mesh, &mut store, None)
            .unwrap_err();
        assert_eq!(err, EditError::NoSelection);
        assert_eq!(mesh.corner_normals(), before);
        assert!(store.is_empty());
    }

    #[test]
    fn test_out_of_range_corner_changes_nothing() {
        let mut mesh = mirrored_quads();
        let mut store = NormalStore::new();
        let corners: BTreeSet<usize> = [0, 1, 99].into_iter().collect();
        let before = mesh.corner_normals();
        let err = ApplyNormal::new(Direction::from_xyz(0.0, 1.0, 0.0), &corners)
            .apply(&mut mesh, &mut store, None)
            .unwrap_err();
        assert_eq!(err, EditError::CornerOutOfRange { corner: 99, count: 8 });
        assert_eq!(mesh.corner_normals(), before);
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_refreshes_enabled_preview() {
        let mut mesh = mirrored_quads();
        mesh.set_selected(0, true).unwrap();
        let corners = mesh.selected_corners();
        let mut store = NormalStore::new();
        let mut preview = PreviewSession::new(Direction::UP);
        preview.enable(&mesh, &store).unwrap();

        // Pointing away from the light turns the quad dark
        ApplyNormal::new(Direction::from_xyz(0.0, 0.0, -1.0), &corners)
            .apply(&mut mesh, &mut store, Some(&mut preview))
            .unwrap();

        let batch = preview.batch().unwrap();
        let quad_colors: Vec<_> = batch
            .triangles
            .iter()
            .filter(|t| t.polygon == 0)
            .map(|t| t.color)
            .collect();
        assert_eq!(quad_colors.len(), 2);
        assert!(quad_colors.iter().all(|c| c[0] < 0.5));
    }

    #[test]
    fn test_write_store_to_corners() {
        let mut mesh = mirrored_quads();
        let mut store = NormalStore::new();
        let dir = Direction::from_xyz(0.0, 1.0, 0.0);
        store.insert(1, dir);
        store.insert(42, dir);

        let normals = write_store_to_corners(&mut mesh, &store).unwrap();
        assert!(normals[..4].iter().all(|&n| n == Direction::UP));
        assert!(normals[4..].iter().all(|&n| n == dir));
    }

    #[test]
    fn test_clear_restores_geometric_normals() {
        let mut mesh = mirrored_quads();
        mesh.set_selected(0, true).unwrap();
        let corners = mesh.selected_corners();
        let mut store = NormalStore::new();
        ApplyNormal::new(Direction::from_xyz(1.0, 0.0, 0.0), &corners)
            .apply(&mut mesh, &mut store, None)
            .unwrap();

        clear_custom_normals(&mut mesh, &mut store).unwrap();
        assert!(store.is_empty());
        assert!(mesh.corner_normals().iter().all(|&n| n == Direction::UP));
    }
}
