mod centroid;
mod distance;
mod kmeans;
mod types;


pub use centroid::compute_centroid;
pub use distance::{euclidean, nearest, squared_euclidean};
pub use kmeans::{DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, KmeansConfig, distinct_points, kmeans};
pub use types::{ClusterLabel, Partition, Point};
