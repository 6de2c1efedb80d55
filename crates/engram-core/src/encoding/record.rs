//! Binary record codec for points and adjacency records.
//!
//! The backend stores string values, so records are encoded as base64 of a
//! compact binary layout. Integers are big-endian, floats little-endian f32,
//! and every record starts with a version byte so decoding needs no external
//! schema.
//!
//! ## Point record
//!
//! `[version:u8][id:u32][dimension:u32][component:f32 x dimension]`
//!
//! ## Adjacency record
//!
//! `[version:u8][id:u32][layer:u32][count:u32][(neighbor:u32, distance:f32) x count]`
//!
//! Index-global counters (`layers`, `points`, `ep`) are plain decimal
//! strings, not binary records.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::CoreError;
use crate::types::{LayerNode, PointId, Vector};

/// Current version of the point record layout.
const POINT_VERSION: u8 = 1;

/// Current version of the adjacency record layout.
const LAYER_NODE_VERSION: u8 = 1;

/// Encode an index-global counter as its decimal string value.
#[must_use]
pub fn encode_counter(value: u32) -> String {
    value.to_string()
}

/// Decode an index-global counter from its decimal string value.
///
/// # Errors
///
/// Returns [`CoreError::Decode`] if the value is not a decimal u32.
pub fn decode_counter(value: &str) -> Result<u32, CoreError> {
    value
        .parse::<u32>()
        .map_err(|_| CoreError::Decode(format!("invalid counter value: {value:?}")))
}

/// Encode a point record.
#[must_use]
pub fn encode_point(id: PointId, vector: &Vector) -> String {
    let dimension = vector.dimension();
    let mut bytes = Vec::with_capacity(9 + dimension * 4);

    bytes.push(POINT_VERSION);
    bytes.extend_from_slice(&id.as_u32().to_be_bytes());
    bytes.extend_from_slice(&(dimension as u32).to_be_bytes());
    bytes.extend_from_slice(&vector.to_le_bytes());

    BASE64.encode(bytes)
}

/// Decode a point record.
///
/// # Errors
///
/// Returns [`CoreError::Decode`] if the input is not valid base64, is
/// truncated, or the declared dimension disagrees with the payload length.
pub fn decode_point(value: &str) -> Result<(PointId, Vector), CoreError> {
    let bytes = decode_base64(value)?;
    let mut pos = check_version(&bytes, POINT_VERSION, "point")?;

    let id = PointId::new(read_u32(&bytes, &mut pos)?);
    let dimension = read_u32(&bytes, &mut pos)? as usize;
    if dimension == 0 || dimension > crate::types::MAX_DIMENSION {
        return Err(CoreError::Decode(format!("point record declares dimension {dimension}")));
    }

    let payload = &bytes[pos..];
    if payload.len() != dimension * 4 {
        return Err(CoreError::Decode(format!(
            "point record declares dimension {dimension} but carries {} bytes",
            payload.len()
        )));
    }

    let vector = Vector::from_le_bytes(payload)?;
    Ok((id, vector))
}

/// Encode an adjacency record.
///
/// Neighbor order in the encoded form is unspecified; the map is unordered.
#[must_use]
pub fn encode_layer_node(node: &LayerNode) -> String {
    let mut bytes = Vec::with_capacity(13 + node.neighbors.len() * 8);

    bytes.push(LAYER_NODE_VERSION);
    bytes.extend_from_slice(&node.id.as_u32().to_be_bytes());
    bytes.extend_from_slice(&node.layer.to_be_bytes());
    bytes.extend_from_slice(&(node.neighbors.len() as u32).to_be_bytes());

    for (&neighbor, &distance) in &node.neighbors {
        bytes.extend_from_slice(&neighbor.as_u32().to_be_bytes());
        bytes.extend_from_slice(&distance.to_le_bytes());
    }

    BASE64.encode(bytes)
}

/// Decode an adjacency record.
///
/// # Errors
///
/// Returns [`CoreError::Decode`] if the input is not valid base64, is
/// truncated, or the declared neighbor count disagrees with the payload.
pub fn decode_layer_node(value: &str) -> Result<LayerNode, CoreError> {
    let bytes = decode_base64(value)?;
    let mut pos = check_version(&bytes, LAYER_NODE_VERSION, "adjacency")?;

    let id = PointId::new(read_u32(&bytes, &mut pos)?);
    let layer = read_u32(&bytes, &mut pos)?;
    let count = read_u32(&bytes, &mut pos)? as usize;

    if bytes.len() - pos != count * 8 {
        return Err(CoreError::Decode(format!(
            "adjacency record declares {count} neighbors but carries {} bytes",
            bytes.len() - pos
        )));
    }

    let mut node = LayerNode::new(id, layer);
    for _ in 0..count {
        let neighbor = PointId::new(read_u32(&bytes, &mut pos)?);
        let distance = read_f32(&bytes, &mut pos)?;
        node.connect(neighbor, distance);
    }

    Ok(node)
}

fn decode_base64(value: &str) -> Result<Vec<u8>, CoreError> {
    BASE64
        .decode(value)
        .map_err(|e| CoreError::Decode(format!("invalid base64 record: {e}")))
}

fn check_version(bytes: &[u8], expected: u8, kind: &str) -> Result<usize, CoreError> {
    match bytes.first() {
        Some(&v) if v == expected => Ok(1),
        Some(&v) => Err(CoreError::Decode(format!("unsupported {kind} record version: {v}"))),
        None => Err(CoreError::Decode(format!("empty {kind} record"))),
    }
}

fn read_u32(bytes: &[u8], pos: &mut usize) -> Result<u32, CoreError> {
    let end = pos.checked_add(4).filter(|&end| end <= bytes.len());
    let end = end.ok_or_else(|| CoreError::Decode("truncated record".to_string()))?;
    let array: [u8; 4] = bytes[*pos..end]
        .try_into()
        .map_err(|_| CoreError::Decode("truncated record".to_string()))?;
    *pos = end;
    Ok(u32::from_be_bytes(array))
}

fn read_f32(bytes: &[u8], pos: &mut usize) -> Result<f32, CoreError> {
    let end = pos.checked_add(4).filter(|&end| end <= bytes.len());
    let end = end.ok_or_else(|| CoreError::Decode("truncated record".to_string()))?;
    let array: [u8; 4] = bytes[*pos..end]
        .try_into()
        .map_err(|_| CoreError::Decode("truncated record".to_string()))?;
    *pos = end;
    Ok(f32::from_le_bytes(array))
}
