//! Rasterize, pad, then optionally smooth

use crate::dilate::Dilate;
use crate::modifiers::BufferApply;
use crate::raster::Rasterizer;
use crate::smooth::SmoothNormals;
use crate::{BakeError, BakeSettings, PixelBuffer};
use normal_core::{GeometryPort, NormalStore};

/// Bake the stored normals of `geometry` into a buffer.
///
/// Only the resolution is checked here (non-zero); call
/// [`BakeSettings::validate`] first to enforce the offered ranges. No file
/// is written.
pub fn bake<G: GeometryPort + ?Sized>(
    geometry: &G,
    store: &NormalStore,
    settings: &BakeSettings,
) -> Result<PixelBuffer, BakeError> {
    if geometry.polygon_count() == 0 {
        return Err(BakeError::EmptyMesh);
    }
    if store.is_empty() {
        tracing::warn!("No custom normals set, baking the default +Z normal");
    }
    let stale = store.len() - store.iter_valid(geometry.polygon_count()).count();
    if stale > 0 {
        tracing::debug!("{} stored normals reference missing polygons", stale);
    }

    let rasterizer = Rasterizer {
        resolution: settings.resolution,
        flip: settings.flip(),
    };
    let mut buffer = rasterizer.rasterize(geometry, store)?;
    tracing::info!(
        "Rasterized {}x{} ({} pixels written)",
        buffer.width,
        buffer.height,
        buffer.written_count()
    );

    if settings.padding > 0 {
        buffer.apply(Dilate {
            iterations: settings.padding,
        });
        tracing::info!(
            "Padded {} px ({} pixels written)",
            settings.padding,
            buffer.written_count()
        );
    }

    if let Some(smoothing) = settings.smoothing {
        let smooth = SmoothNormals::from(smoothing);
        buffer.apply(smooth);
        tracing::info!(
            "Smoothed (radius {}, {} iterations, {})",
            smooth.radius,
            smooth.iterations,
            smooth.edge_mode
        );
    }

    Ok(buffer)
}
