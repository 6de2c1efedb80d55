//! Embedding vector type with dimension validation.

use crate::error::CoreError;

/// Maximum supported vector dimension.
pub const MAX_DIMENSION: usize = 4096;

/// A fixed-dimension embedding vector.
///
/// Vectors are contiguous arrays of f32 values, validated at construction:
/// the dimension must be between 1 and [`MAX_DIMENSION`] and every component
/// must be finite. A point's vector is immutable after insert.
///
/// # Example
///
/// ```
/// use engram_core::Vector;
///
/// let v = Vector::new(vec![1.0, 0.0, 0.0, 0.0]).unwrap();
/// assert_eq!(v.dimension(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    /// Create a new vector from raw f32 components.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is empty, exceeds [`MAX_DIMENSION`],
    /// or contains NaN/Infinite values.
    pub fn new(data: Vec<f32>) -> Result<Self, CoreError> {
        if data.is_empty() || data.len() > MAX_DIMENSION {
            return Err(CoreError::InvalidDimension { actual: data.len(), max: MAX_DIMENSION });
        }

        for (i, &value) in data.iter().enumerate() {
            if !value.is_finite() {
                return Err(CoreError::InvalidValue {
                    index: i,
                    reason: if value.is_nan() {
                        "NaN values are not allowed"
                    } else {
                        "Infinite values are not allowed"
                    },
                });
            }
        }

        Ok(Self { data })
    }

    /// Create a vector from raw bytes (little-endian f32 values).
    ///
    /// This is used for deserialization from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the byte length is not a multiple of 4, is empty,
    /// or decodes to non-finite values.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() % 4 != 0 {
            return Err(CoreError::Decode(format!(
                "byte length {} is not a multiple of 4",
                bytes.len()
            )));
        }

        let mut data = Vec::with_capacity(bytes.len() / 4);
        for chunk in bytes.chunks_exact(4) {
            let array: [u8; 4] = chunk
                .try_into()
                .map_err(|_| CoreError::Decode("failed to read f32 bytes".to_string()))?;
            data.push(f32::from_le_bytes(array));
        }

        Self::new(data)
    }

    /// Get the dimension of the vector.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the components as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Convert the components to raw bytes (little-endian f32 values).
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for &value in &self.data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Consume the vector and return the underlying components.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
