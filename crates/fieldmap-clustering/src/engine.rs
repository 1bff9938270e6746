//! Greedy screen-space clustering.
//!
//! Objects are visited in input order. Each unclaimed object claims every
//! later unclaimed object whose projected anchor lies closer than the zoom's
//! threshold, measured from the claiming object (not from a running group
//! center). Membership therefore depends on input order, and the same input
//! always yields the same partition.
//!
//! The pass is O(n²) over placed objects, which is fine for facility-scale
//! sets of a few hundred objects.

use fieldmap_core::{ClusterGroup, ClusterSet, Legend, MapObject, Vertex};
use serde::{Deserialize, Serialize};

use crate::anchor::anchor;
use crate::viewport::Projection;

/// Tuning for the distance threshold and cluster expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Threshold at zoom 0, in pixels.
    pub base_distance_px: f64,
    /// Threshold reduction per zoom level, in pixels.
    pub distance_per_zoom_px: f64,
    /// Lower bound of the threshold, in pixels.
    pub min_distance_px: f64,
    /// Clusters only expand below this zoom.
    pub expand_max_zoom: u8,
    /// Zoom levels added when a cluster expands.
    pub expand_zoom_step: u8,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            base_distance_px: 100.0,
            distance_per_zoom_px: 5.0,
            min_distance_px: 30.0,
            expand_max_zoom: 18,
            expand_zoom_step: 2,
        }
    }
}

/// Partitions objects into clusters and singles.
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    params: ClusterParams,
}

struct Placed<'a> {
    object: &'a MapObject,
    anchor: Vertex,
    pixel: (f64, f64),
}

impl ClusterEngine {
    pub fn new(params: ClusterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// Pixel distance below which two objects group at `zoom`.
    pub fn threshold(&self, zoom: u8) -> f64 {
        let p = &self.params;
        (p.base_distance_px - f64::from(zoom) * p.distance_per_zoom_px).max(p.min_distance_px)
    }

    /// Clusters `objects` at the projection's zoom.
    ///
    /// Objects without a usable anchor are counted in
    /// [`ClusterSet::skipped`] and otherwise ignored.
    pub fn cluster<P>(&self, objects: &[MapObject], projection: &P, legend: &Legend) -> ClusterSet
    where
        P: Projection + ?Sized,
    {
        let zoom = projection.zoom();
        let threshold = self.threshold(zoom);

        let mut skipped = 0;
        let placed: Vec<Placed<'_>> = objects
            .iter()
            .filter_map(|object| match anchor(object) {
                Some(anchor) => Some(Placed {
                    object,
                    anchor,
                    pixel: projection.to_pixel(anchor),
                }),
                None => {
                    tracing::warn!("Skipping {} without a usable anchor", object.key());
                    skipped += 1;
                    None
                }
            })
            .collect();

        let mut claimed = vec![false; placed.len()];
        let mut set = ClusterSet {
            zoom,
            skipped,
            ..ClusterSet::default()
        };

        for i in 0..placed.len() {
            if claimed[i] {
                continue;
            }
            claimed[i] = true;
            let (x, y) = placed[i].pixel;
            let mut members = vec![i];

            for j in (i + 1)..placed.len() {
                if claimed[j] {
                    continue;
                }
                let (ox, oy) = placed[j].pixel;
                if (x - ox).hypot(y - oy) < threshold {
                    claimed[j] = true;
                    members.push(j);
                }
            }

            if members.len() >= 2 {
                let members: Vec<&Placed<'_>> = members.iter().map(|&m| &placed[m]).collect();
                set.clusters.push(build_group(&members, legend));
            } else {
                set.singles.push(placed[i].object.clone());
            }
        }

        tracing::debug!(
            "Clustered {} objects at zoom {} (threshold {}px): {} groups, {} singles, {} skipped",
            objects.len(),
            zoom,
            threshold,
            set.clusters.len(),
            set.singles.len(),
            set.skipped
        );
        set
    }

    /// Where clicking a cluster marker at `zoom` should move the map.
    ///
    /// `None` once the zoom has reached the expansion ceiling.
    pub fn expansion_target(&self, group: &ClusterGroup, zoom: u8) -> Option<(Vertex, u8)> {
        (zoom < self.params.expand_max_zoom)
            .then(|| (group.center, zoom.saturating_add(self.params.expand_zoom_step)))
    }
}

fn build_group(members: &[&Placed<'_>], legend: &Legend) -> ClusterGroup {
    let n = members.len() as f64;
    let (lat, lng) = members
        .iter()
        .fold((0.0, 0.0), |(lat, lng), m| (lat + m.anchor.lat, lng + m.anchor.lng));
    let dominant_type = dominant_type(members.iter().map(|m| m.object.object_type.as_str()));

    ClusterGroup {
        members: members.iter().map(|m| m.object.clone()).collect(),
        center: Vertex::new(lat / n, lng / n),
        color: legend.color_for(&dominant_type).to_string(),
        dominant_type,
    }
}

/// Most frequent type; the first one seen wins ties.
fn dominant_type<'a>(types: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for object_type in types {
        match counts.iter_mut().find(|(t, _)| *t == object_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((object_type, 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (object_type, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((object_type, count));
        }
    }
    best.map(|(t, _)| t.to_string()).unwrap_or_default()
}
