//! Normal map baking for local-space custom normals
//!
//! Rasterizes the per-polygon directions of a [`NormalStore`] into UV space,
//! pads the result outward so mip-mapping does not bleed background into
//! seams, and optionally smooths it while keeping every pixel a unit normal.
//!
//! # Example
//! ```no_run
//! use normal_bake::*;
//! use normal_core::{MeshSnapshot, NormalStore};
//! use std::path::Path;
//!
//! # fn load() -> (MeshSnapshot, NormalStore) { unimplemented!() }
//! let (mesh, store) = load();
//! let settings = BakeSettings::default();
//! settings.validate()?;
//!
//! let buffer = bake(&mesh, &store, &settings)?;
//! write_png(&buffer, Path::new("normal.png"))?;
//! # Ok::<(), BakeError>(())
//! ```
//!
//! Filters can also be run on their own:
//! ```
//! use normal_bake::*;
//!
//! let mut buffer = PixelBuffer::new(16, 16);
//! buffer.write_pixel(8, 8, [1.0, 0.5, 0.5, 1.0]);
//! buffer
//!     .apply(Dilate { iterations: 4 })
//!     .apply(SmoothNormals::default());
//! assert!(buffer.is_written(8, 4));
//! ```
//!
//! [`NormalStore`]: normal_core::NormalStore

mod buffer;
mod dilate;
mod error;
mod export;
mod modifiers;
mod pipeline;
mod raster;
mod settings;
mod smooth;

// Core type
pub use buffer::{NEUTRAL_NORMAL, PixelBuffer};

pub use error::BakeError;

// Stages
pub use dilate::Dilate;
pub use modifiers::{BufferApply, BufferModifier};
pub use raster::{ChannelFlip, Rasterizer, decode_normal, encode_normal};
pub use smooth::{EdgeMode, SmoothNormals};

// Pipeline
pub use pipeline::bake;
pub use settings::{BakeSettings, MAX_PADDING, RESOLUTIONS, SmoothingSettings};

// Export
pub use export::{encode_png, write_png};
