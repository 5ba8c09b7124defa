//! Mirror-symmetry corner matching
//!
//! Pairs corners of selected polygons with corners of unselected polygons on
//! the opposite side of a symmetry plane, so an edit can be applied
//! bilaterally.
//!
//! Matching is brute force: every selected polygon scans every candidate
//! polygon, then every corner scans the matched polygon's corners. That is
//! O(S·C + S·L) and fine for edit-time selections of hundreds to a few
//! thousand faces, but does not scale to very dense meshes.

use crate::direction::Axis;
use crate::geometry::GeometryPort;
use std::collections::{BTreeMap, BTreeSet};

/// Default matching distance in mesh units
pub const DEFAULT_MIRROR_THRESHOLD: f32 = 0.001;

/// Source corner -> mirrored corner, built fresh for each edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorMap(BTreeMap<usize, usize>);

impl MirrorMap {
    /// Number of matched corners
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was matched
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mirrored corner for `source`
    pub fn get(&self, source: usize) -> Option<usize> {
        self.0.get(&source).copied()
    }

    /// `(source, target)` pairs in ascending source order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(&s, &t)| (s, t))
    }

    /// Matched target corners
    pub fn targets(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.values().copied()
    }
}

impl FromIterator<(usize, usize)> for MirrorMap {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|(s, t)| s != t).collect())
    }
}

/// Mirror matcher configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorMatcher {
    /// Axis whose coordinate is negated
    pub axis: Axis,
    /// Matches must be strictly closer than this
    pub threshold: f32,
}

impl Default for MirrorMatcher {
    fn default() -> Self {
        Self {
            axis: Axis::X,
            threshold: DEFAULT_MIRROR_THRESHOLD,
        }
    }
}

impl MirrorMatcher {
    /// Matcher for `axis` with the default threshold
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            ..Default::default()
        }
    }

    /// Match `selected` corners to their mirror images.
    ///
    /// Source polygons are selected polygons that own at least one corner of
    /// `selected`; candidates are all unselected polygons. Ties keep the
    /// first candidate in polygon order. Polygons and corners without a match
    /// closer than the threshold are left out.
    pub fn find<G: GeometryPort + ?Sized>(
        &self,
        geometry: &G,
        selected: &BTreeSet<usize>,
    ) -> MirrorMap {
        let polygon_count = geometry.polygon_count();
        let (sources, candidates): (Vec<usize>, Vec<usize>) =
            (0..polygon_count).partition(|&p| geometry.is_polygon_selected(p));
        let sources: Vec<usize> = sources
            .into_iter()
            .filter(|&p| {
                geometry
                    .polygon_corners(p)
                    .iter()
                    .any(|c| selected.contains(c))
            })
            .collect();

        let candidate_centers: Vec<_> = candidates
            .iter()
            .map(|&p| (p, geometry.polygon_center(p)))
            .collect();

        let mut pairs = Vec::new();
        let mut unmatched_polygons = 0usize;
        for &source in &sources {
            let mirrored_center = self.axis.reflect(geometry.polygon_center(source));

            let mut best = None;
            let mut best_dist = self.threshold;
            for &(candidate, center) in &candidate_centers {
                let dist = center.distance(mirrored_center);
                if dist < best_dist {
                    best_dist = dist;
                    best = Some(candidate);
                }
            }

            let Some(target) = best else {
                tracing::debug!("no mirror polygon for polygon {}", source);
                unmatched_polygons += 1;
                continue;
            };

            for &corner in geometry.polygon_corners(source) {
                let mirrored = self.axis.reflect(geometry.corner_position(corner));

                let mut best_corner = None;
                let mut best_corner_dist = self.threshold;
                for &other in geometry.polygon_corners(target) {
                    let dist = geometry.corner_position(other).distance(mirrored);
                    if dist < best_corner_dist {
                        best_corner_dist = dist;
                        best_corner = Some(other);
                    }
                }

                if let Some(other) = best_corner {
                    pairs.push((corner, other));
                }
            }
        }

        let map: MirrorMap = pairs.into_iter().collect();
        tracing::info!(
            "Mirror {}: matched {} corners from {} polygons ({} without a mirror)",
            self.axis,
            map.len(),
            sources.len(),
            unmatched_polygons
        );
        map
    }
}
