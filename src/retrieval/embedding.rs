//! Feature-hashing text embeddings.

/// Default embedding width.
pub const DEFAULT_DIMENSION: usize = 512;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a. Stable across processes and platforms.
fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Embed `text` into a `dimension`-wide, L2-normalized vector.
///
/// Every whitespace-delimited lowercase token adds 1 to slot
/// `fnv1a(token) % dimension`. Text without tokens yields the zero vector.
pub fn embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut vec = vec![0f32; dimension];
    if dimension == 0 {
        return vec;
    }

    for token in text.to_lowercase().split_whitespace() {
        let slot = fnv1a(token.as_bytes()) as usize % dimension;
        vec[slot] += 1.0;
    }

    let norm = vec
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt();
    if norm > 0.0 {
        for v in &mut vec {
            *v = (f64::from(*v) / norm) as f32;
        }
    }
    vec
}

/// Cosine similarity; 0 for mismatched lengths or a zero-norm operand.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom) as f32
}
