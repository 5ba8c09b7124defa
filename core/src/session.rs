//! Interactive picker session
//!
//! The host drives the picker from its own event loop: [`PickerSession::begin`]
//! on invoke, [`PickerSession::drag`] for every pointer move while the button
//! is held, then [`PickerSession::confirm`] or [`PickerSession::cancel`].
//! Nothing here polls or blocks.

use crate::apply::{ApplyNormal, ApplyOutcome};
use crate::direction::{Axis, PickedAngle};
use crate::geometry::GeometryPort;
use crate::mirror::MirrorMap;
use crate::preview::PreviewSession;
use crate::settings::EditSettings;
use crate::store::NormalStore;
use crate::{Direction, EditError};
use std::collections::BTreeSet;

/// State captured when the picker opens
#[derive(Debug, Clone)]
pub struct PickerSession {
    corners: BTreeSet<usize>,
    mirror: Option<(MirrorMap, Axis)>,
    original_normals: Vec<Direction>,
    original_store: NormalStore,
    last: Option<PickedAngle>,
}

impl PickerSession {
    /// Capture the selection, mirror map and current state of mesh and store
    pub fn begin<G: GeometryPort + ?Sized>(
        geometry: &G,
        store: &NormalStore,
        settings: &EditSettings,
    ) -> Result<Self, EditError> {
        let corners = geometry.selected_corners();
        if corners.is_empty() {
            return Err(EditError::NoSelection);
        }

        let mirror = settings
            .mirror_matcher()
            .map(|matcher| (matcher.find(geometry, &corners), matcher.axis));

        Ok(Self {
            corners,
            mirror,
            original_normals: geometry.corner_normals(),
            original_store: store.clone(),
            last: None,
        })
    }

    /// Apply a picked angle immediately
    pub fn drag<G: GeometryPort + ?Sized>(
        &mut self,
        geometry: &mut G,
        store: &mut NormalStore,
        picked: PickedAngle,
        preview: Option<&mut PreviewSession>,
    ) -> Result<ApplyOutcome, EditError> {
        let mut apply = ApplyNormal::new(picked.direction, &self.corners);
        if let Some((map, axis)) = &self.mirror {
            apply = apply.mirrored(map, *axis);
        }
        let outcome = apply.apply(geometry, store, preview)?;
        self.last = Some(picked);
        Ok(outcome)
    }

    /// Keep the edits; returns the last `(yaw, pitch)` applied, if any
    pub fn confirm(self) -> Option<(f32, f32)> {
        tracing::info!("Normal confirmed");
        self.last.map(|p| (p.yaw, p.pitch))
    }

    /// Undo every drag of this session
    pub fn cancel<G: GeometryPort + ?Sized>(
        self,
        geometry: &mut G,
        store: &mut NormalStore,
    ) -> Result<(), EditError> {
        geometry.set_corner_normals(&self.original_normals)?;
        *store = self.original_store;
        tracing::info!("Cancelled - normals restored");
        Ok(())
    }

    /// Corners the session edits
    pub fn corners(&self) -> &BTreeSet<usize> {
        &self.corners
    }

    /// Mirror map computed at `begin`, if mirroring is on
    pub fn mirror_map(&self) -> Option<&MirrorMap> {
        self.mirror.as_ref().map(|(map, _)| map)
    }
}
