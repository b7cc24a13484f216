//! Schema-ordered numeric vectors

use serde::{Deserialize, Serialize};

/// FNV-1a hash
#[inline]
pub fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hash a slice of f32 values by their bit patterns
#[inline]
pub fn hash_features(features: &[f32]) -> u64 {
    let bytes: &[u8] = bytemuck::cast_slice(features);
    fnv1a_hash(bytes)
}

/// Reading after categorical substitution, index-aligned to the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedVector(Vec<f32>);

impl EncodedVector {
    pub(crate) fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Values in schema order
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of entries (N)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Encoded vector after the fitted scaler; the only classifier input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaledVector(Vec<f32>);

impl ScaledVector {
    /// Wrap already-scaled values
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Values in schema order
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of entries (N)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bit-pattern fingerprint, equal for bit-identical vectors
    pub fn fingerprint(&self) -> u64 {
        hash_features(&self.0)
    }
}
