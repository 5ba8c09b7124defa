use thiserror::Error;

/// Reasons a bake cannot proceed
#[derive(Debug, Error)]
pub enum BakeError {
    #[error("no active UV layer")]
    NoUvLayer,

    #[error("mesh has no polygons to bake")]
    EmptyMesh,

    #[error("bake resolution must be non-zero")]
    ZeroResolution,

    #[error("invalid bake setting `{name}` = {value} (expected {expected})")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}
