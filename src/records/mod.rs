mod error;
mod input;
mod output;


pub use error::InputError;
pub use input::{parse_points, read_points};
pub use output::{OutputPaths, encode_clusters, encode_meta, write_report};
