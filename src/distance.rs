use crate::track::Feature;
use std::ops::{Mul, MulAssign};

/// Cosine similarity between two vectors
///
/// When the features lengths don't match, the longer feature vector is truncated to
/// shorter one when the similarity is calculated. A zero vector is not similar to anything,
/// so the similarity is `0.0` in that case.
///
pub fn cosine(f1: &Feature, f2: &Feature) -> f32 {
    let mut divided = 0.0;
    let len = f1.len().min(f2.len());
    for i in 0..len {
        let mut block1 = f1[i];
        let block2 = &f2[i];
        block1.mul_assign(block2);
        divided += block1.reduce_add();
    }

    let f1_divisor = f1
        .iter()
        .take(len)
        .fold(0.0_f32, |acc, a| acc + a.mul(a).reduce_add());

    let f2_divisor = f2
        .iter()
        .take(len)
        .fold(0.0_f32, |acc, a| acc + a.mul(a).reduce_add());

    if f1_divisor < f32::MIN_POSITIVE || f2_divisor < f32::MIN_POSITIVE {
        return 0.0;
    }
    divided / (f1_divisor.sqrt() * f2_divisor.sqrt())
}

/// Cosine distance `1 - cosine similarity`, within `[0; 2]`
///
pub fn cosine_distance(f1: &Feature, f2: &Feature) -> f32 {
    (1.0 - cosine(f1, f2)).clamp(0.0, 2.0)
}

#[cfg(test)]
mod tests {
    use crate::distance::{cosine, cosine_distance};
    use crate::track::utils::FromVec;
    use crate::track::Feature;
    use crate::EPS;

    #[test]
    fn cosine_similarities() {
        let v1 = dbg!(Feature::from_vec(vec![1f32, 0.0, 0.0]));
        let v2 = dbg!(Feature::from_vec(vec![0f32, 1.0f32, 0.0]));
        let v3 = dbg!(Feature::from_vec(vec![-1.0f32, 0.0, 0.0]));
        let d = cosine(&v1, &v1);
        assert!((d - 1.0).abs() < EPS);
        let d = cosine(&v1, &v3);
        assert!((d + 1.0).abs() < EPS);
        let d = cosine(&v1, &v2);
        assert!(d.abs() < EPS);
    }

    #[test]
    fn cosine_distances() {
        let v1 = Feature::from_vec(vec![1f32, 0.0, 0.0]);
        let v2 = Feature::from_vec(vec![0f32, 1.0f32, 0.0]);
        let v3 = Feature::from_vec(vec![-2.0f32, 0.0, 0.0]);
        let v4 = Feature::from_vec(vec![3.0f32, 0.0, 0.0]);
        assert!(cosine_distance(&v1, &v4).abs() < EPS);
        assert!((cosine_distance(&v1, &v2) - 1.0).abs() < EPS);
        assert!((cosine_distance(&v1, &v3) - 2.0).abs() < EPS);
    }

    #[test]
    fn zero_vector() {
        let v1 = Feature::from_vec(vec![1f32, 0.0, 0.0]);
        let zero = Feature::from_vec(vec![0f32, 0.0, 0.0]);
        assert!(cosine(&v1, &zero).abs() < EPS);
        assert!((cosine_distance(&zero, &zero) - 1.0).abs() < EPS);
    }

    #[test]
    fn small_norms_keep_scale_invariance() {
        let v = Feature::from_vec(vec![0.002f32, 0.001, 0.0, 0.0]);
        let w = Feature::from_vec(vec![0.0f32, 0.0, 0.001, 0.0]);
        assert!(cosine_distance(&v, &v).abs() < 1e-4);
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-4);
        assert!((cosine_distance(&v, &w) - 1.0).abs() < EPS);
    }

    #[test]
    fn long_vectors() {
        let a: Vec<f32> = (0..512).map(|i| (i % 7) as f32).collect();
        let b: Vec<f32> = a.iter().map(|x| x * 0.5).collect();
        let d = cosine_distance(&Feature::from_vec(a), &Feature::from_vec(b));
        assert!(d.abs() < 1e-4);
    }
}
