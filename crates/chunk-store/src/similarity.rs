/// Cosine similarity between two vectors: `dot(a,b) / (‖a‖·‖b‖)`.
///
/// Returns zero when the lengths differ or either norm is zero, so callers
/// never divide by zero and wrong-dimension queries simply fail to match.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_one() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);

        let b = vec![0.3, -0.7, 0.2];
        assert!((cosine_similarity(&b, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn is_symmetric() {
        let a = vec![0.2, 0.5, 0.8];
        let b = vec![0.9, 0.1, 0.4];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn orthogonal_is_zero() {
        let a = vec![1.0, 0.0, 0.0];
        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_is_zero() {
        let a = vec![1.0, 0.0, 0.0];
        let d = vec![0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &d), 0.0);
        assert_eq!(cosine_similarity(&d, &d), 0.0);
    }

    #[test]
    fn mismatched_lengths_are_zero() {
        let a = vec![1.0, 0.0, 0.0];
        let short = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &short), 0.0);
    }
}
