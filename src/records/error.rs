use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("input: failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input: {path} is not a JSON array of records: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("input: record {index} in {path} has no `{field}` field")]
    MissingField {
        path: String,
        index: usize,
        field: &'static str,
    },

    #[error("input: record {index} in {path}: `{field}` is not a finite number")]
    NotNumeric {
        path: String,
        index: usize,
        field: &'static str,
    },

    #[error("input: {path} contains no records")]
    Empty { path: String },

    #[error("input: cannot derive output names from {path}")]
    NoFileName { path: String },
}
