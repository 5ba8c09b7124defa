/// Reasons an edit operation cannot proceed.
///
/// Every variant is returned before any mesh or store state is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// No polygons or corners are selected
    #[error("no faces selected")]
    NoSelection,

    /// The mesh has no active UV layer
    #[error("mesh has no active UV layer")]
    NoUvLayer,

    /// The mesh has no polygons
    #[error("mesh has no polygons")]
    EmptyMesh,

    /// A corner index does not exist in the mesh snapshot
    #[error("corner {corner} out of range (mesh has {count} corners)")]
    CornerOutOfRange { corner: usize, count: usize },

    /// A vertex index does not exist in the mesh snapshot
    #[error("vertex {vertex} out of range (mesh has {count} vertices)")]
    VertexOutOfRange { vertex: usize, count: usize },

    /// A polygon index does not exist in the mesh snapshot
    #[error("polygon {polygon} out of range (mesh has {count} polygons)")]
    PolygonOutOfRange { polygon: usize, count: usize },

    /// A polygon was declared with fewer than three corners
    #[error("polygon needs at least 3 corners, got {0}")]
    DegeneratePolygon(usize),

    /// The UV list for a polygon does not match its corner count
    #[error("polygon has {corners} corners but {uvs} UV coordinates")]
    UvCountMismatch { corners: usize, uvs: usize },

    /// A full corner-normal array had the wrong length
    #[error("expected {expected} corner normals, got {actual}")]
    NormalCountMismatch { expected: usize, actual: usize },

    /// Relaxation requested with an empty normal store
    #[error("no custom normals found to smooth")]
    NoStoredNormals,

    /// A setting is outside its accepted range
    #[error("invalid {name} {value} (expected {expected})")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}
