use crate::clusterer::{
    centroid::compute_centroid,
    distance::{nearest, squared_euclidean},
    types::{ClusterLabel, Partition, Point},
};
use crate::error::{ClusterError, Stage};
use std::collections::HashSet;

/// Default iteration cap for Lloyd's algorithm
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default seed for centroid initialization
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct KmeansConfig {
    pub k: usize,
    pub max_iterations: usize,
    pub seed: u64,
}

impl KmeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Points with duplicates removed, first occurrence wins
pub fn distinct_points(points: &[Point]) -> Vec<Point> {
    let mut seen = HashSet::new();
    points
        .iter()
        // `+ 0.0` folds -0.0 into 0.0 so both hash the same
        .filter(|p| seen.insert(((p.lat + 0.0).to_bits(), (p.lng + 0.0).to_bits())))
        .copied()
        .collect()
}

/// Partition `points` into `config.k` clusters with Lloyd's algorithm.
///
/// Centroids are seeded with k-means++ over the distinct points, so every
/// starting centroid is a different coordinate. Iteration stops once no
/// point changes cluster; hitting `max_iterations` first is reported through
/// `Partition::converged` rather than as an error.
pub fn kmeans(points: &[Point], config: &KmeansConfig) -> Result<Partition, ClusterError> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let k = config.k;
    if k < 1 {
        return Err(ClusterError::invalid(
            Stage::Partition,
            "clusters",
            k,
            "at least one cluster is required",
        ));
    }
    if config.max_iterations < 1 {
        return Err(ClusterError::invalid(
            Stage::Partition,
            "max_iterations",
            config.max_iterations,
            "at least one iteration is required",
        ));
    }

    let distinct = distinct_points(points);
    if k > distinct.len() {
        return Err(ClusterError::invalid(
            Stage::Partition,
            "clusters",
            k,
            format!("only {} distinct points available", distinct.len()),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // 1. k-means++ seeding
    let mut centroids = Vec::with_capacity(k);
    centroids.push(distinct[rng.gen_range(0..distinct.len())]);

    while centroids.len() < k {
        let distances: Vec<f64> = distinct
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_euclidean(p, c))
                    .fold(f64::MAX, f64::min)
            })
            .collect();

        let total: f64 = distances.iter().sum();
        let threshold = rng.gen::<f64>() * total;

        // Already chosen points sit at distance zero and are never picked.
        let mut cumsum = 0.0;
        let mut selected = None;
        for (j, &d) in distances.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            cumsum += d;
            selected = Some(j);
            if cumsum >= threshold {
                break;
            }
        }

        // k <= distinct.len() leaves at least one unchosen point
        match selected {
            Some(j) => centroids.push(distinct[j]),
            None => break,
        }
    }

    let n = points.len();
    let mut assignments: Vec<ClusterLabel> = vec![0; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;

        // 2. Assign each point to its nearest centroid
        let mut changed = iterations == 1;
        for (i, point) in points.iter().enumerate() {
            let best = nearest(point, &centroids).unwrap_or(0) as ClusterLabel;

            if assignments[i] != best {
                changed = true;
                assignments[i] = best;
            }
        }

        if !changed {
            converged = true;
            break;
        }

        // 3. Recompute centroids; an emptied cluster keeps its old position
        for (c, center) in centroids.iter_mut().enumerate() {
            let members: Vec<Point> = points
                .iter()
                .zip(assignments.iter())
                .filter(|&(_, &a)| a as usize == c)
                .map(|(p, _)| *p)
                .collect();

            if let Some(mean) = compute_centroid(&members) {
                *center = mean;
            }
        }
    }

    Ok(Partition {
        centroids,
        assignments,
        iterations,
        converged,
    })
}
