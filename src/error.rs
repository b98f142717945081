use crate::records::InputError;
use std::fmt;
use thiserror::Error;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Partition,
    Prune,
    Reassign,
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Partition => "partition",
            Stage::Prune => "prune",
            Stage::Reassign => "reassign",
            Stage::Output => "output",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{stage}: invalid {name} = {value}: {reason}")]
    InvalidParameter {
        stage: Stage,
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(
        "reassign: all {pruned} clusters fell below the {threshold} share threshold \
         ({total_points} points), nothing left to reassign to"
    )]
    NoSurvivingClusters {
        total_points: usize,
        threshold: f64,
        pruned: usize,
    },

    #[error("partition: no convergence after {iterations} iterations")]
    ConvergenceNotReached { iterations: usize },

    #[error("output: failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("output: failed to encode {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClusterError {
    pub fn stage(&self) -> Stage {
        match self {
            ClusterError::Input(_) => Stage::Input,
            ClusterError::InvalidParameter { stage, .. } => *stage,
            ClusterError::NoSurvivingClusters { .. } => Stage::Reassign,
            ClusterError::ConvergenceNotReached { .. } => Stage::Partition,
            ClusterError::Output { .. } | ClusterError::Encode { .. } => Stage::Output,
        }
    }

    pub(crate) fn invalid(
        stage: Stage,
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ClusterError::InvalidParameter {
            stage,
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
