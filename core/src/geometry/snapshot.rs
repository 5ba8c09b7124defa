use super::GeometryPort;
use crate::{Direction, EditError};
use glam::{Vec2, Vec3};

/// One polygon of a [`MeshSnapshot`]
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Ordered corner indices
    pub corners: Vec<usize>,
    /// Selection flag
    pub selected: bool,
}

/// In-memory polygon mesh implementing [`GeometryPort`]
///
/// Corners are allocated in polygon order, so corner indices of polygon `p`
/// are contiguous. New corners start with the polygon's geometric normal.
#[derive(Debug, Clone, Default)]
pub struct MeshSnapshot {
    positions: Vec<Vec3>,
    polygons: Vec<Polygon>,
    corner_vertices: Vec<usize>,
    uvs: Option<Vec<Vec2>>,
    normals: Vec<Direction>,
}

impl MeshSnapshot {
    /// Create a snapshot with vertex positions and no polygons
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            ..Default::default()
        }
    }

    /// Append a polygon over `vertices`, optionally with one UV per corner.
    ///
    /// The first polygon given UVs creates the UV layer; corners of polygons
    /// added without UVs while a layer exists get `(0, 0)`.
    pub fn add_polygon(
        &mut self,
        vertices: &[usize],
        uvs: Option<&[Vec2]>,
    ) -> Result<usize, EditError> {
        if vertices.len() < 3 {
            return Err(EditError::DegeneratePolygon(vertices.len()));
        }
        if let Some(&vertex) = vertices.iter().find(|&&v| v >= self.positions.len()) {
            return Err(EditError::VertexOutOfRange {
                vertex,
                count: self.positions.len(),
            });
        }
        if let Some(uvs) = uvs {
            if uvs.len() != vertices.len() {
                return Err(EditError::UvCountMismatch {
                    corners: vertices.len(),
                    uvs: uvs.len(),
                });
            }
        }

        let first = self.corner_vertices.len();
        let corners: Vec<usize> = (first..first + vertices.len()).collect();
        self.corner_vertices.extend_from_slice(vertices);

        match (uvs, self.uvs.as_mut()) {
            (Some(new), Some(layer)) => layer.extend_from_slice(new),
            (Some(new), None) => {
                let mut layer = vec![Vec2::ZERO; first];
                layer.extend_from_slice(new);
                self.uvs = Some(layer);
            }
            (None, Some(layer)) => layer.resize(first + vertices.len(), Vec2::ZERO),
            (None, None) => {}
        }

        let index = self.polygons.len();
        self.polygons.push(Polygon {
            corners,
            selected: false,
        });
        let normal = self.polygon_normal(index);
        self.normals.resize(first + vertices.len(), normal);
        Ok(index)
    }

    /// Set the selection flag of one polygon
    pub fn set_selected(&mut self, polygon: usize, selected: bool) -> Result<(), EditError> {
        let count = self.polygons.len();
        let poly = self
            .polygons
            .get_mut(polygon)
            .ok_or(EditError::PolygonOutOfRange { polygon, count })?;
        poly.selected = selected;
        Ok(())
    }

    /// Replace the selection with exactly `polygons`
    pub fn select_only(&mut self, polygons: &[usize]) -> Result<(), EditError> {
        let count = self.polygons.len();
        if let Some(&polygon) = polygons.iter().find(|&&p| p >= count) {
            return Err(EditError::PolygonOutOfRange { polygon, count });
        }
        for (i, poly) in self.polygons.iter_mut().enumerate() {
            poly.selected = polygons.contains(&i);
        }
        Ok(())
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// All polygons
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
}

impl GeometryPort for MeshSnapshot {
    fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    fn polygon_corners(&self, polygon: usize) -> &[usize] {
        &self.polygons[polygon].corners
    }

    fn is_polygon_selected(&self, polygon: usize) -> bool {
        self.polygons[polygon].selected
    }

    fn corner_count(&self) -> usize {
        self.corner_vertices.len()
    }

    fn corner_vertex(&self, corner: usize) -> usize {
        self.corner_vertices[corner]
    }

    fn corner_position(&self, corner: usize) -> Vec3 {
        self.positions[self.corner_vertices[corner]]
    }

    fn has_uv_layer(&self) -> bool {
        self.uvs.is_some()
    }

    fn corner_uv(&self, corner: usize) -> Option<Vec2> {
        self.uvs.as_ref().and_then(|layer| layer.get(corner).copied())
    }

    fn corner_normals(&self) -> Vec<Direction> {
        self.normals.clone()
    }

    fn set_corner_normals(&mut self, normals: &[Direction]) -> Result<(), EditError> {
        if normals.len() != self.normals.len() {
            return Err(EditError::NormalCountMismatch {
                expected: self.normals.len(),
                actual: normals.len(),
            });
        }
        self.normals.copy_from_slice(normals);
        Ok(())
    }
}
