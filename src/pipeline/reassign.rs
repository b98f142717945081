use crate::clusterer::{ClusterLabel, Point, nearest};
use crate::diagnostics::Diagnostics;
use crate::error::{ClusterError, Stage};
use crate::pipeline::{ClusterRegistry, ClusterReport, Pruned};

/// Registry with every orphan placed in a surviving cluster
#[derive(Debug, Clone)]
pub struct Reassigned {
    registry: ClusterRegistry,
    orphans: Vec<Point>,
    placements: Vec<ClusterLabel>,
    assignments: Vec<ClusterLabel>,
    pruned_labels: Vec<ClusterLabel>,
    partition_iterations: usize,
    converged: bool,
}

impl Reassigned {
    pub fn registry(&self) -> &ClusterRegistry {
        &self.registry
    }

    /// Each orphan paired with the label it was moved to
    pub fn placements(&self) -> impl Iterator<Item = (&Point, ClusterLabel)> {
        self.orphans.iter().zip(self.placements.iter().copied())
    }

    /// Final label of every input point, in input order
    pub fn assignments(&self) -> &[ClusterLabel] {
        &self.assignments
    }

    pub fn finalize(self) -> ClusterReport {
        ClusterReport {
            total_points: self.registry.total_points(),
            clusters: self.registry.into_clusters(),
            assignments: self.assignments,
            pruned_labels: self.pruned_labels,
            iterations: self.partition_iterations,
            converged: self.converged,
        }
    }
}

impl Pruned {
    /// Moves each orphan to its nearest surviving centroid.
    ///
    /// Only counts and percentages change; centroids stay where the
    /// partitioner left them. Percentages are taken against the original
    /// point total, so they sum to one afterwards.
    pub fn reassign(self, diagnostics: &dyn Diagnostics) -> Result<Reassigned, ClusterError> {
        let mut registry = self.registry;

        if registry.is_empty() {
            return Err(ClusterError::NoSurvivingClusters {
                total_points: registry.total_points(),
                threshold: self.threshold,
                pruned: self.pruned_labels.len(),
            });
        }

        diagnostics.info(
            Stage::Reassign,
            &format!("Assigning {} orphaned points to surviving clusters", self.orphans.len()),
        );

        let mut assignments = self.assignments;
        let mut placements = Vec::with_capacity(self.orphans.len());
        for (orphan, &point_idx) in self.orphans.iter().zip(&self.orphan_indices) {
            // registry is non-empty, so a nearest centroid always exists
            let Some(idx) = nearest(orphan, registry.centroids()) else {
                continue;
            };
            let label = registry.increment_at(idx);
            assignments[point_idx] = label;
            placements.push(label);
        }
        registry.refresh_percentages();

        diagnostics.debug(
            Stage::Reassign,
            &format!("points per cluster after reassignment: {}", registry.describe_counts()),
        );
        diagnostics.debug(
            Stage::Reassign,
            &format!(
                "share per cluster after reassignment: {}",
                registry.describe_percentages()
            ),
        );

        Ok(Reassigned {
            registry,
            orphans: self.orphans,
            placements,
            assignments,
            pruned_labels: self.pruned_labels,
            partition_iterations: self.partition_iterations,
            converged: self.converged,
        })
    }
}
