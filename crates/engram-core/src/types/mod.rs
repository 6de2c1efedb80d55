//! Core data types for the Engram index.
//!
//! - [`PointId`] - Monotonically assigned point identifier
//! - [`Vector`] - Fixed-dimension embedding vector with validation
//! - [`LayerNode`] - Per-layer adjacency record of one point

mod id;
mod layer_node;
mod vector;

pub use id::PointId;
pub use layer_node::LayerNode;
pub use vector::{Vector, MAX_DIMENSION};
