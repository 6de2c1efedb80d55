//! SIMD cosine distance primitives using the `wide` crate.
//!
//! The `wide` crate selects the best available SIMD instruction set at
//! compile time (SSE/AVX on x86, NEON on ARM, SIMD128 on WebAssembly, scalar
//! fallback elsewhere). All functions process 8 floats at a time using
//! `f32x8` vectors.
//!
//! The index evaluates cosine distance, `1 − (a·b)/(‖a‖·‖b‖)`; the dot
//! product and L2 norm it is built from are exposed for reuse.

use wide::f32x8;

/// Number of f32 elements processed per SIMD iteration.
const SIMD_WIDTH: usize = 8;

/// Convert a slice to a fixed-size array for SIMD.
/// Returns zero array if conversion fails (cannot happen with correct loop bounds).
#[inline]
fn slice_to_simd_array(slice: &[f32]) -> [f32; SIMD_WIDTH] {
    slice.try_into().unwrap_or([0.0; SIMD_WIDTH])
}

#[inline]
fn horizontal_sum(v: f32x8) -> f32 {
    let arr: [f32; 8] = v.to_array();
    arr.iter().sum()
}

/// Calculate the dot product of two vectors.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let len = a.len();
    let simd_len = len - (len % SIMD_WIDTH);

    let mut sum = f32x8::ZERO;
    for i in (0..simd_len).step_by(SIMD_WIDTH) {
        let va = f32x8::new(slice_to_simd_array(&a[i..i + SIMD_WIDTH]));
        let vb = f32x8::new(slice_to_simd_array(&b[i..i + SIMD_WIDTH]));
        sum += va * vb;
    }

    let mut result = horizontal_sum(sum);
    for i in simd_len..len {
        result += a[i] * b[i];
    }
    result
}

/// Calculate the L2 norm of a vector.
#[inline]
#[must_use]
pub fn l2_norm(a: &[f32]) -> f32 {
    dot_product(a, a).sqrt()
}

/// Calculate the cosine distance between two vectors.
///
/// Range `[0, 2]`: 0 for identical direction, 1 for orthogonal, 2 for
/// opposite. Zero-norm inputs are treated as orthogonal to everything.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let len = a.len();
    let simd_len = len - (len % SIMD_WIDTH);

    let mut dot_sum = f32x8::ZERO;
    let mut norm_a_sum = f32x8::ZERO;
    let mut norm_b_sum = f32x8::ZERO;

    // Compute dot product and both norms in one pass
    for i in (0..simd_len).step_by(SIMD_WIDTH) {
        let va = f32x8::new(slice_to_simd_array(&a[i..i + SIMD_WIDTH]));
        let vb = f32x8::new(slice_to_simd_array(&b[i..i + SIMD_WIDTH]));

        dot_sum += va * vb;
        norm_a_sum += va * va;
        norm_b_sum += vb * vb;
    }

    let mut dot = horizontal_sum(dot_sum);
    let mut norm_a_sq = horizontal_sum(norm_a_sum);
    let mut norm_b_sq = horizontal_sum(norm_b_sum);

    for i in simd_len..len {
        dot += a[i] * b[i];
        norm_a_sq += a[i] * a[i];
        norm_b_sq += b[i] * b[i];
    }

    let norm_product = (norm_a_sq * norm_b_sq).sqrt();
    if norm_product == 0.0 {
        return 1.0;
    }

    1.0 - dot / norm_product
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product_basic() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert!((dot_product(&a, &b) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn dot_product_crosses_simd_boundary() {
        // 11 elements: one full SIMD lane plus a 3-element tail
        let a: Vec<f32> = (1..=11).map(|i| i as f32).collect();
        let b = vec![1.0; 11];
        assert!((dot_product(&a, &b) - 66.0).abs() < 1e-4);
    }

    #[test]
    fn l2_norm_basic() {
        assert!((l2_norm(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(l2_norm(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_identical_direction_is_zero() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!(cosine_distance(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_is_one() {
        let a = [1.0, 0.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0, 0.0];
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_is_two() {
        let a = [1.0, 1.0];
        let b = [-1.0, -1.0];
        assert!((cosine_distance(&a, &b) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_norm_is_one() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 2.0, 3.0];
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_matches_scalar_reference() {
        let a: Vec<f32> = (0..37).map(|i| (i as f32 * 0.37).sin()).collect();
        let b: Vec<f32> = (0..37).map(|i| (i as f32 * 0.73).cos()).collect();

        let dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let expected = 1.0 - dot / (na * nb);

        assert!((cosine_distance(&a, &b) - expected).abs() < 1e-5);
    }
}
