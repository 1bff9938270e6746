//! Object layer: the current backend object set and its clusters.

use fieldmap_core::{ClusterSet, Legend, MapObject};

use crate::engine::ClusterEngine;
use crate::viewport::Projection;

/// Holds the most recently applied object set and its partition.
///
/// Each applied set replaces the previous one wholesale.
#[derive(Debug, Clone, Default)]
pub struct ObjectLayer {
    objects: Vec<MapObject>,
    clusters: ClusterSet,
    engine: ClusterEngine,
    legend: Legend,
    applied_sequence: Option<u64>,
}

impl ObjectLayer {
    pub fn new(engine: ClusterEngine, legend: Legend) -> Self {
        Self {
            engine,
            legend,
            ..Self::default()
        }
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    pub fn engine(&self) -> &ClusterEngine {
        &self.engine
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Sequence number of the fetch whose objects are held.
    pub fn applied_sequence(&self) -> Option<u64> {
        self.applied_sequence
    }

    /// Replaces the object set with the result of fetch `sequence`.
    pub fn replace_objects(&mut self, objects: Vec<MapObject>, sequence: u64) {
        tracing::debug!(
            "Replacing {} objects with {} from fetch #{}",
            self.objects.len(),
            objects.len(),
            sequence
        );
        self.objects = objects;
        self.applied_sequence = Some(sequence);
    }

    /// Recomputes clusters over the full object set.
    pub fn recluster<P>(&mut self, projection: &P) -> &ClusterSet
    where
        P: Projection + ?Sized,
    {
        self.clusters = self.engine.cluster(&self.objects, projection, &self.legend);
        &self.clusters
    }
}
