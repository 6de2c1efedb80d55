//! Property-based tests for record round-trips.

#![allow(clippy::expect_used, clippy::float_cmp)]

use proptest::prelude::*;

use crate::encoding::record::{
    decode_counter, decode_layer_node, decode_point, encode_counter, encode_layer_node,
    encode_point,
};
use crate::types::{LayerNode, PointId, Vector};

/// Strategy for generating arbitrary `Vector` instances.
fn arb_vector() -> impl Strategy<Value = Vector> {
    prop::collection::vec(-1e6f32..1e6f32, 1..64)
        .prop_map(|data| Vector::new(data).expect("finite components within bounds"))
}

/// Strategy for generating arbitrary `LayerNode` instances.
fn arb_layer_node() -> impl Strategy<Value = LayerNode> {
    (
        any::<u32>(),
        0u32..16,
        prop::collection::hash_map(any::<u32>(), 0.0f32..2.0f32, 0..48),
    )
        .prop_map(|(id, layer, neighbors)| {
            let mut node = LayerNode::new(PointId::new(id), layer);
            for (neighbor, distance) in neighbors {
                node.connect(PointId::new(neighbor), distance);
            }
            node
        })
}

proptest! {
    #[test]
    fn counter_roundtrips(value in any::<u32>()) {
        prop_assert_eq!(decode_counter(&encode_counter(value)).expect("decode"), value);
    }

    #[test]
    fn point_roundtrips((id, vector) in (any::<u32>(), arb_vector())) {
        let encoded = encode_point(PointId::new(id), &vector);
        let (decoded_id, decoded) = decode_point(&encoded).expect("decode");
        prop_assert_eq!(decoded_id, PointId::new(id));
        prop_assert_eq!(decoded, vector);
    }

    #[test]
    fn layer_node_roundtrips(node in arb_layer_node()) {
        let decoded = decode_layer_node(&encode_layer_node(&node)).expect("decode");
        prop_assert_eq!(decoded, node);
    }

    #[test]
    fn decode_never_panics_on_arbitrary_text(value in ".*") {
        let _ = decode_point(&value);
        let _ = decode_layer_node(&value);
        let _ = decode_counter(&value);
    }
}
