//! Key schema for the index namespace.
//!
//! The backend sees only strings. One index occupies one namespace with the
//! following keys:
//!
//! | Key | Value |
//! |---|---|
//! | `layers` | decimal string of the populated layer count |
//! | `ep` | decimal string of the entry point id (absent when empty) |
//! | `points` | decimal string of the point count (next free id) |
//! | `<id>` | encoded point record |
//! | `m:<id>` | metadata for the point (opaque, JSON by convention) |
//! | `<layer>__<id>` | encoded adjacency record |
//!
//! Two indices are compatible iff they share this schema, the record codec,
//! the distance function, and the vector dimension; none of those identifiers
//! are stored in the namespace itself.

use crate::types::PointId;

/// Key holding the populated layer count.
pub const NUM_LAYERS_KEY: &str = "layers";

/// Key holding the entry point id. Absent when the index is empty.
pub const ENTRY_POINT_KEY: &str = "ep";

/// Key holding the point count (the next id to assign).
pub const NUM_POINTS_KEY: &str = "points";

/// Key for a point record.
#[must_use]
pub fn point_key(id: PointId) -> String {
    id.to_string()
}

/// Key for a point's metadata.
#[must_use]
pub fn metadata_key(id: PointId) -> String {
    format!("m:{id}")
}

/// Key for a point's adjacency record in one layer.
#[must_use]
pub fn layer_node_key(layer: u32, id: PointId) -> String {
    format!("{layer}__{id}")
}
