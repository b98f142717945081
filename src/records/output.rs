use crate::error::ClusterError;
use crate::pipeline::ClusterReport;
use crate::records::InputError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const CLUSTER_SUFFIX: &str = "Cluster";
const META_SUFFIX: &str = "ClusterMeta";
const DEFAULT_EXTENSION: &str = "json";

#[derive(Debug, Serialize)]
struct CentroidRecord {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
struct MetaRecord {
    #[serde(rename = "Number of crimes")]
    count: usize,
    #[serde(rename = "Percentage of total crimes")]
    percentage: f64,
    #[serde(rename = "Coordinates")]
    coordinates: [f64; 2],
}

/// Where the two artifacts of a run are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub clusters: PathBuf,
    pub meta: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<stem>Cluster.<ext>` and `<dir>/<stem>ClusterMeta.<ext>`, with
    /// the extension taken from `input` (`json` when it has none).
    pub fn derive(input: &Path, out_dir: &Path) -> Result<Self, InputError> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InputError::NoFileName {
                path: input.display().to_string(),
            })?;
        let ext = input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_EXTENSION);

        Ok(Self {
            clusters: out_dir.join(format!("{stem}{CLUSTER_SUFFIX}.{ext}")),
            meta: out_dir.join(format!("{stem}{META_SUFFIX}.{ext}")),
        })
    }
}

/// Centroid records, one `{"lat", "lng"}` object per surviving cluster
pub fn encode_clusters(report: &ClusterReport) -> Result<Vec<u8>, serde_json::Error> {
    let records: Vec<CentroidRecord> = report
        .clusters
        .iter()
        .map(|c| CentroidRecord {
            lat: c.centroid.lat,
            lng: c.centroid.lng,
        })
        .collect();
    serde_json::to_vec(&records)
}

/// Per-cluster summary records
pub fn encode_meta(report: &ClusterReport) -> Result<Vec<u8>, serde_json::Error> {
    let records: Vec<MetaRecord> = report
        .clusters
        .iter()
        .map(|c| MetaRecord {
            count: c.count,
            percentage: c.percentage,
            coordinates: [c.centroid.lat, c.centroid.lng],
        })
        .collect();
    serde_json::to_vec(&records)
}

/// Write both artifacts, or neither.
///
/// Both files are encoded before anything touches the disk. Each file goes
/// through a temporary sibling and a rename; if the second write fails the
/// first artifact is removed again.
pub fn write_report(report: &ClusterReport, paths: &OutputPaths) -> Result<(), ClusterError> {
    let clusters = encode_clusters(report).map_err(|e| ClusterError::Encode {
        path: paths.clusters.display().to_string(),
        source: e,
    })?;
    let meta = encode_meta(report).map_err(|e| ClusterError::Encode {
        path: paths.meta.display().to_string(),
        source: e,
    })?;

    write_file(&paths.clusters, &clusters)?;
    if let Err(e) = write_file(&paths.meta, &meta) {
        let _ = fs::remove_file(&paths.clusters);
        return Err(e);
    }

    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ClusterError> {
    let output_err = |e: std::io::Error| ClusterError::Output {
        path: path.display().to_string(),
        source: e,
    };

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    fs::write(&temp, bytes).map_err(output_err)?;
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(output_err(e));
    }

    Ok(())
}
