//! Key schema and record serialization.
//!
//! The backing store is a string-valued key-value namespace, so this module
//! has two halves:
//!
//! - [`keys`] - the stable key schema of the index namespace
//! - [`record`] - the binary record codec, wrapped in base64 for the
//!   string-typed backend
//!
//! Index-global counters are stored as plain decimal strings; point and
//! adjacency records use a compact length-prefixed binary layout.

pub mod keys;
pub mod record;

pub use record::{
    decode_counter, decode_layer_node, decode_point, encode_counter, encode_layer_node,
    encode_point,
};

#[cfg(test)]
mod proptest_tests;
