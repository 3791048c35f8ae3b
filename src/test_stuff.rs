use crate::track::{Detection, Frame, TrackId};
use crate::utils::bbox::BoundingBox;
use rand::distributions::Uniform;
use rand::Rng;

/// First `n` vectors of the standard basis of `dim`-dimensional space
///
pub fn orthonormal(n: usize, dim: usize) -> Vec<Vec<f32>> {
    assert!(n <= dim, "Cannot build {} orthonormal vectors in {} dims", n, dim);
    (0..n)
        .map(|i| {
            let mut v = vec![0.0; dim];
            v[i] = 1.0;
            v
        })
        .collect()
}

/// Random vector with unit norm
///
pub fn random_unit(dim: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let dist = Uniform::new(-1.0f32, 1.0);
    loop {
        let v: Vec<f32> = (0..dim).map(|_| rng.sample(dist)).collect();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.01 {
            return v.into_iter().map(|x| x / norm).collect();
        }
    }
}

/// Adds uniform noise within `[-amplitude; amplitude]` to every component
///
pub fn noisy(v: &[f32], amplitude: f32) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let dist = Uniform::new_inclusive(-amplitude, amplitude);
    v.iter().map(|x| x + rng.sample(dist)).collect()
}

/// Generates per-frame records of a video where each player is visible in every frame.
///
/// # Parameters
/// * `players` - `(track_id, appearance)` pairs
/// * `frames` - number of frames
/// * `amplitude` - noise added to the appearance in every frame
///
pub fn video(players: &[(TrackId, Vec<f32>)], frames: usize, amplitude: f32) -> Vec<Frame> {
    (0..frames)
        .map(|f| {
            players
                .iter()
                .enumerate()
                .map(|(i, (track_id, appearance))| {
                    let x = (i * 50) as f32 + f as f32;
                    Detection::new(
                        *track_id,
                        BoundingBox::new(x, 100.0, x + 30.0, 180.0),
                        noisy(appearance, amplitude),
                    )
                })
                .collect()
        })
        .collect()
}
