//! The clustering run as a chain of one-way stages.
//!
//! `partition` produces a [`Partitioned`] value, which can only be turned
//! into [`Pruned`], then [`Reassigned`], then a final [`ClusterReport`].
//! Every step consumes its input, so no stage can be skipped or repeated.

mod config;
mod prune;
mod reassign;
mod registry;

#[cfg(test)]
mod tests;

pub use config::{ConvergencePolicy, DEFAULT_CLUSTERS, DEFAULT_MIN_SHARE, RunConfig};
pub use prune::Pruned;
pub use reassign::Reassigned;
pub use registry::{Cluster, ClusterRegistry};

use crate::clusterer::{ClusterLabel, Point, kmeans};
use crate::diagnostics::Diagnostics;
use crate::error::{ClusterError, Stage};

/// Freshly partitioned points with their initial registry
#[derive(Debug, Clone)]
pub struct Partitioned {
    registry: ClusterRegistry,
    assignments: Vec<ClusterLabel>,
    iterations: usize,
    converged: bool,
}

impl Partitioned {
    pub fn registry(&self) -> &ClusterRegistry {
        &self.registry
    }

    pub fn assignments(&self) -> &[ClusterLabel] {
        &self.assignments
    }
}

/// Final state of a run, ready to be written out
#[derive(Debug, Clone)]
pub struct ClusterReport {
    /// Surviving clusters in registry order
    pub clusters: Vec<Cluster>,
    /// Surviving label of every input point, in input order
    pub assignments: Vec<ClusterLabel>,
    pub total_points: usize,
    pub pruned_labels: Vec<ClusterLabel>,
    pub iterations: usize,
    pub converged: bool,
}

/// Runs k-means and builds the initial registry
pub fn partition(
    points: &[Point],
    config: &RunConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<Partitioned, ClusterError> {
    diagnostics.info(
        Stage::Partition,
        &format!(
            "Performing k-means clustering: {} points, k={}",
            points.len(),
            config.clusters
        ),
    );

    let result = kmeans(points, &config.kmeans_config())?;

    if result.converged {
        diagnostics.debug(
            Stage::Partition,
            &format!("converged in {} iterations", result.iterations),
        );
    } else {
        match config.convergence {
            ConvergencePolicy::Fail => {
                return Err(ClusterError::ConvergenceNotReached {
                    iterations: result.iterations,
                });
            }
            ConvergencePolicy::Warn => diagnostics.warn(
                Stage::Partition,
                &format!(
                    "no convergence after {} iterations, keeping last assignment",
                    result.iterations
                ),
            ),
        }
    }

    Ok(Partitioned {
        registry: ClusterRegistry::from_partition(&result),
        assignments: result.assignments,
        iterations: result.iterations,
        converged: result.converged,
    })
}

/// Partition, prune and reassign `points` in one go
pub fn run(
    points: &[Point],
    config: &RunConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<ClusterReport, ClusterError> {
    config.validate()?;

    let report = partition(points, config, diagnostics)?
        .prune(points, config.min_share, diagnostics)?
        .reassign(diagnostics)?
        .finalize();

    diagnostics.info(
        Stage::Reassign,
        &format!(
            "{} of {} clusters kept",
            report.clusters.len(),
            config.clusters
        ),
    );

    Ok(report)
}
