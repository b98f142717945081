// Public API exports
pub mod clusterer;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod records;

// Re-export main types for convenience
pub use clusterer::{ClusterLabel, KmeansConfig, Partition, Point, kmeans};

pub use diagnostics::{Diagnostics, RecordingDiagnostics, TracingDiagnostics};

pub use error::{ClusterError, Stage};

pub use pipeline::{
    Cluster, ClusterRegistry, ClusterReport, ConvergencePolicy, DEFAULT_CLUSTERS,
    DEFAULT_MIN_SHARE, Partitioned, Pruned, Reassigned, RunConfig, partition, run,
};

pub use records::{InputError, OutputPaths, read_points, write_report};
