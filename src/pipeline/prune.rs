use crate::clusterer::{ClusterLabel, Point};
use crate::diagnostics::Diagnostics;
use crate::error::{ClusterError, Stage};
use crate::pipeline::{ClusterRegistry, Partitioned};

/// Registry after small clusters were dropped, plus the points they held
#[derive(Debug, Clone)]
pub struct Pruned {
    pub(crate) registry: ClusterRegistry,
    pub(crate) orphans: Vec<Point>,
    /// Input index of each orphan
    pub(crate) orphan_indices: Vec<usize>,
    /// Partition labels, still pointing at pruned clusters for orphans
    pub(crate) assignments: Vec<ClusterLabel>,
    pub(crate) pruned_labels: Vec<ClusterLabel>,
    pub(crate) threshold: f64,
    pub(crate) partition_iterations: usize,
    pub(crate) converged: bool,
}

impl Pruned {
    pub fn registry(&self) -> &ClusterRegistry {
        &self.registry
    }

    /// Points of pruned clusters, grouped by label then in input order
    pub fn orphans(&self) -> &[Point] {
        &self.orphans
    }

    pub fn pruned_labels(&self) -> &[ClusterLabel] {
        &self.pruned_labels
    }
}

impl Partitioned {
    /// Drops every cluster holding less than `threshold` of all points.
    ///
    /// `points` must be the same slice the partition was computed from.
    pub fn prune(
        self,
        points: &[Point],
        threshold: f64,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Pruned, ClusterError> {
        if points.len() != self.assignments.len() {
            return Err(ClusterError::invalid(
                Stage::Prune,
                "points",
                points.len(),
                format!("partition covers {} points", self.assignments.len()),
            ));
        }

        let mut registry = self.registry;

        diagnostics.info(Stage::Prune, "Counting points in each cluster");
        diagnostics.debug(
            Stage::Prune,
            &format!("points per cluster: {}", registry.describe_counts()),
        );
        diagnostics.debug(
            Stage::Prune,
            &format!("share per cluster: {}", registry.describe_percentages()),
        );

        diagnostics.info(
            Stage::Prune,
            &format!("Removing clusters below {threshold} of all points"),
        );
        let pruned_labels = registry.remove_below(threshold);

        let mut orphans = Vec::new();
        let mut orphan_indices = Vec::new();
        for &label in &pruned_labels {
            for (idx, (point, _)) in points
                .iter()
                .zip(self.assignments.iter())
                .enumerate()
                .filter(|&(_, (_, &a))| a == label)
            {
                orphans.push(*point);
                orphan_indices.push(idx);
            }
        }

        diagnostics.debug(
            Stage::Prune,
            &format!(
                "points per cluster after filtering: {}",
                registry.describe_counts()
            ),
        );
        diagnostics.debug(
            Stage::Prune,
            &format!(
                "share per cluster after filtering: {}",
                registry.describe_percentages()
            ),
        );
        diagnostics.debug(
            Stage::Prune,
            &format!(
                "pruned {} clusters, {} points orphaned",
                pruned_labels.len(),
                orphans.len()
            ),
        );

        Ok(Pruned {
            registry,
            orphans,
            orphan_indices,
            assignments: self.assignments,
            pruned_labels,
            threshold,
            partition_iterations: self.iterations,
            converged: self.converged,
        })
    }
}
