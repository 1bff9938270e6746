//! Backend map objects and the cluster groups built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Vertex;

/// Geometry of a backend object, as decoded.
///
/// Decoding is lenient: shapes with missing coordinates stay empty and
/// unknown geometry types are kept as [`ObjectGeometry::Unsupported`] so a
/// single bad object never aborts a fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectGeometry {
    /// Single position
    Point(Vertex),
    /// Path vertices
    LineString(Vec<Vertex>),
    /// Rings, exterior first
    Polygon(Vec<Vec<Vertex>>),
    /// Geometry type this console does not place markers for
    Unsupported(String),
}

/// Unique key of a backend object: ids are only unique per type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    /// Backend type key
    pub object_type: String,
    /// Backend id within the type
    pub id: i64,
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.object_type, self.id)
    }
}

/// An entity owned by the backend, read-only to the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Backend id, unique per type
    pub id: i64,
    /// Backend type key
    pub object_type: String,
    /// Name shown in popups
    pub display_name: String,
    /// Decoded geometry
    pub geometry: ObjectGeometry,
    /// Precomputed center supplied by the backend for polygons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Vertex>,
}

impl MapObject {
    /// The `(type, id)` key
    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            object_type: self.object_type.clone(),
            id: self.id,
        }
    }
}

/// Aggregate marker for objects that are close on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup {
    /// Members in claim order, at least two
    pub members: Vec<MapObject>,
    /// Mean of member anchors
    pub center: Vertex,
    /// Most frequent member type, first-seen on ties
    pub dominant_type: String,
    /// Marker color for the dominant type
    pub color: String,
}

impl ClusterGroup {
    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a well-formed group
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of one clustering pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSet {
    /// Zoom the pass ran at
    pub zoom: u8,
    /// Groups of two or more
    pub clusters: Vec<ClusterGroup>,
    /// Objects rendered on their own
    pub singles: Vec<MapObject>,
    /// Objects without a usable anchor
    pub skipped: usize,
}

impl ClusterSet {
    /// Objects placed on the map (grouped or single)
    pub fn placed_count(&self) -> usize {
        self.singles.len() + self.clusters.iter().map(ClusterGroup::len).sum::<usize>()
    }
}
