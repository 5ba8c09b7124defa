//! Toon-shaded preview of custom normals
//!
//! A [`PreviewSession`] owns the triangle batch the host draws over the
//! viewport. The session is an explicit object created and destroyed by the
//! caller; several sessions can coexist without sharing state.

use crate::geometry::GeometryPort;
use crate::store::NormalStore;
use crate::{Direction, EditError};
use glam::Vec3;

/// Default preview light direction (before normalization)
pub const DEFAULT_LIGHT_DIRECTION: [f32; 3] = [0.5, 0.5, 1.0];

/// Intensity of lit triangles
const LIT: f32 = 1.0;
/// Intensity of triangles facing away from the light
const SHADOW: f32 = 0.1;

/// One flat-coloured preview triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToonTriangle {
    /// Source polygon
    pub polygon: usize,
    /// Object-space vertex positions
    pub positions: [Vec3; 3],
    /// RGBA colour
    pub color: [f32; 4],
}

/// Triangles ready for the host to upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToonBatch {
    /// Fan-triangulated polygons in polygon order
    pub triangles: Vec<ToonTriangle>,
}

impl ToonBatch {
    /// Shade every polygon with a two-tone step on `dot(normal, light)`.
    ///
    /// The shading normal is the stored direction of the polygon, or its
    /// geometric normal when nothing is stored.
    pub fn build<G: GeometryPort + ?Sized>(
        geometry: &G,
        store: &NormalStore,
        light: Direction,
    ) -> Self {
        let mut triangles = Vec::new();
        for polygon in 0..geometry.polygon_count() {
            let normal = store
                .get(polygon)
                .unwrap_or_else(|| geometry.polygon_normal(polygon));
            let intensity = if normal.vec().dot(light.vec()) > 0.0 {
                LIT
            } else {
                SHADOW
            };
            let color = [intensity, intensity, intensity, 1.0];

            let corners = geometry.polygon_corners(polygon);
            for i in 1..corners.len().saturating_sub(1) {
                triangles.push(ToonTriangle {
                    polygon,
                    positions: [
                        geometry.corner_position(corners[0]),
                        geometry.corner_position(corners[i]),
                        geometry.corner_position(corners[i + 1]),
                    ],
                    color,
                });
            }
        }
        Self { triangles }
    }

    /// Whether the batch has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Explicit preview lifecycle: create, enable, refresh, disable
#[derive(Debug, Clone)]
pub struct PreviewSession {
    light_direction: Direction,
    batch: Option<ToonBatch>,
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(Direction::from(DEFAULT_LIGHT_DIRECTION))
    }
}

impl PreviewSession {
    /// Create a disabled session
    pub fn new(light_direction: Direction) -> Self {
        Self {
            light_direction,
            batch: None,
        }
    }

    /// Build the batch and start previewing
    pub fn enable<G: GeometryPort + ?Sized>(
        &mut self,
        geometry: &G,
        store: &NormalStore,
    ) -> Result<(), EditError> {
        let batch = ToonBatch::build(geometry, store, self.light_direction);
        if batch.is_empty() {
            return Err(EditError::EmptyMesh);
        }
        self.batch = Some(batch);
        tracing::info!("Toon preview: ON");
        Ok(())
    }

    /// Stop previewing and drop the batch
    pub fn disable(&mut self) {
        if self.batch.take().is_some() {
            tracing::info!("Toon preview: OFF");
        }
    }

    /// Whether a batch is live
    pub fn is_enabled(&self) -> bool {
        self.batch.is_some()
    }

    /// Rebuild the batch after an edit; does nothing while disabled
    pub fn refresh<G: GeometryPort + ?Sized>(&mut self, geometry: &G, store: &NormalStore) {
        if self.batch.is_some() {
            self.batch = Some(ToonBatch::build(geometry, store, self.light_direction));
        }
    }

    /// Change the light and rebuild if enabled
    pub fn set_light_direction<G: GeometryPort + ?Sized>(
        &mut self,
        light_direction: Direction,
        geometry: &G,
        store: &NormalStore,
    ) {
        self.light_direction = light_direction;
        self.refresh(geometry, store);
    }

    /// Current light direction
    pub fn light_direction(&self) -> Direction {
        self.light_direction
    }

    /// Live batch, `None` while disabled
    pub fn batch(&self) -> Option<&ToonBatch> {
        self.batch.as_ref()
    }
}
