use crate::clusterer::{ClusterLabel, Partition, Point};

/// A cluster that is still part of the run
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub label: ClusterLabel,
    pub centroid: Point,
    pub count: usize,
    /// `count` over the total number of input points
    pub percentage: f64,
}

/// Owner of cluster state for one run.
///
/// Iteration order is insertion order, which is ascending label order since
/// clusters are inserted straight from the partition. Nearest-centroid ties
/// during reassignment resolve by this order.
#[derive(Debug, Clone)]
pub struct ClusterRegistry {
    clusters: Vec<Cluster>,
    total_points: usize,
}

impl ClusterRegistry {
    pub fn from_partition(partition: &Partition) -> Self {
        let total_points = partition.assignments.len();
        let clusters = partition
            .centroids
            .iter()
            .zip(partition.counts())
            .enumerate()
            .map(|(label, (centroid, count))| Cluster {
                label: label as ClusterLabel,
                centroid: *centroid,
                count,
                percentage: share(count, total_points),
            })
            .collect();

        Self {
            clusters,
            total_points,
        }
    }

    pub fn get(&self, label: ClusterLabel) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    pub fn labels(&self) -> Vec<ClusterLabel> {
        self.clusters.iter().map(|c| c.label).collect()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of input points, fixed for the whole run
    pub fn total_points(&self) -> usize {
        self.total_points
    }

    /// Sum of counts over the clusters currently held
    pub fn total_count(&self) -> usize {
        self.clusters.iter().map(|c| c.count).sum()
    }

    /// Removes every cluster whose share is below `threshold`, returning the
    /// removed labels in registry order.
    pub(crate) fn remove_below(&mut self, threshold: f64) -> Vec<ClusterLabel> {
        let mut removed = Vec::new();
        self.clusters.retain(|c| {
            let keep = c.percentage >= threshold;
            if !keep {
                removed.push(c.label);
            }
            keep
        });
        removed
    }

    pub(crate) fn centroids(&self) -> impl Iterator<Item = &Point> {
        self.clusters.iter().map(|c| &c.centroid)
    }

    /// Adds one point to the cluster at registry position `idx`
    pub(crate) fn increment_at(&mut self, idx: usize) -> ClusterLabel {
        let cluster = &mut self.clusters[idx];
        cluster.count += 1;
        cluster.label
    }

    pub(crate) fn refresh_percentages(&mut self) {
        let total = self.total_points;
        for cluster in &mut self.clusters {
            cluster.percentage = share(cluster.count, total);
        }
    }

    pub(crate) fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    /// `label -> count` rendering used in debug diagnostics
    pub(crate) fn describe_counts(&self) -> String {
        describe(self.clusters.iter().map(|c| (c.label, c.count.to_string())))
    }

    /// `label -> percentage` rendering used in debug diagnostics
    pub(crate) fn describe_percentages(&self) -> String {
        describe(
            self.clusters
                .iter()
                .map(|c| (c.label, format!("{:.4}", c.percentage))),
        )
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn describe(entries: impl Iterator<Item = (ClusterLabel, String)>) -> String {
    let parts: Vec<String> = entries.map(|(l, v)| format!("{l}: {v}")).collect();
    format!("{{{}}}", parts.join(", "))
}
