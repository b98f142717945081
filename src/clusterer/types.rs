/// Stable identifier of a cluster produced by the partitioner
pub type ClusterLabel = u32;

/// A single incident coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Output of a k-means run
#[derive(Debug, Clone)]
pub struct Partition {
    /// One centroid per label, indexed by label
    pub centroids: Vec<Point>,
    /// Label of every input point, in input order
    pub assignments: Vec<ClusterLabel>,
    pub iterations: usize,
    /// False when the iteration cap was hit before assignments stabilized
    pub converged: bool,
}

impl Partition {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Number of points carrying each label
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &label in &self.assignments {
            counts[label as usize] += 1;
        }
        counts
    }
}
