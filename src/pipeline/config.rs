use crate::clusterer::{DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, KmeansConfig};
use crate::error::{ClusterError, Stage};

/// Clusters holding less than this share of all points are pruned
pub const DEFAULT_MIN_SHARE: f64 = 0.1;

/// Default number of clusters requested from the partitioner
pub const DEFAULT_CLUSTERS: usize = 10;

/// What to do when k-means hits its iteration cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergencePolicy {
    /// Emit a warning and keep the last iterate
    #[default]
    Warn,
    /// Abort the run with `ConvergenceNotReached`
    Fail,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub clusters: usize,
    pub max_iterations: usize,
    pub seed: u64,
    pub min_share: f64,
    pub convergence: ConvergencePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTERS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: DEFAULT_SEED,
            min_share: DEFAULT_MIN_SHARE,
            convergence: ConvergencePolicy::Warn,
        }
    }
}

impl RunConfig {
    pub fn new(clusters: usize) -> Self {
        Self {
            clusters,
            ..Self::default()
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

    pub fn min_share(mut self, min_share: f64) -> Self {
        self.min_share = min_share;
        self
    }

    pub fn convergence(mut self, policy: ConvergencePolicy) -> Self {
        self.convergence = policy;
        self
    }

    /// Checks the pruning threshold; cluster count and iteration cap are
    /// validated by the partitioner against the actual input.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if !(0.0..=1.0).contains(&self.min_share) {
            return Err(ClusterError::invalid(
                Stage::Prune,
                "min_share",
                self.min_share,
                "must be a fraction between 0 and 1",
            ));
        }
        Ok(())
    }

    pub fn kmeans_config(&self) -> KmeansConfig {
        KmeansConfig::new(self.clusters)
            .max_iterations(self.max_iterations)
            .seed(self.seed)
    }
}
