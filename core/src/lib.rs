//! Normal Core - local-space custom normal editing
//!
//! This crate holds the editing side of the normal tools: picking a
//! direction, writing it to selected corners (optionally mirrored), keeping
//! the per-polygon normal store, and previewing the result with toon shading.
//!
//! # Architecture
//!
//! - [`GeometryPort`] - Trait the host mesh implements (see [`MeshSnapshot`])
//! - [`ApplyNormal`] - Writes a direction to corners, the store and the preview
//! - [`MirrorMatcher`] - Pairs selected corners with their mirrored counterparts
//! - [`NormalStore`] - Polygon-to-direction map persisted through [`PropertySlots`]
//! - [`PickerSession`] - Begin/drag/confirm/cancel flow for the angle picker
//! - [`PreviewSession`] - Explicit toon preview lifecycle

pub mod apply;
pub mod direction;
mod error;
pub mod geometry;
pub mod mirror;
pub mod preview;
pub mod relax;
pub mod session;
pub mod settings;
pub mod store;

pub use apply::{ApplyNormal, ApplyOutcome, clear_custom_normals, write_store_to_corners};
pub use direction::{
    AnglePicker, Axis, DIRECTION_EPSILON, Direction, MirrorAxis, PickedAngle, snap_angle,
};
pub use error::EditError;
pub use geometry::{GeometryPort, MeshSnapshot, Polygon};
pub use mirror::{DEFAULT_MIRROR_THRESHOLD, MirrorMap, MirrorMatcher};
pub use preview::{DEFAULT_LIGHT_DIRECTION, PreviewSession, ToonBatch, ToonTriangle};
pub use relax::RelaxNormals;
pub use session::PickerSession;
pub use settings::EditSettings;
pub use store::{MemorySlots, NORMAL_STORE_KEY, NormalStore, PropertySlots};
