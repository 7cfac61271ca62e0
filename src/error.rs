use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Path does not exist: {path}"))]
    NotFound { path: String },

    #[snafu(display("File already exists and overwrite was not requested: {path}"))]
    AlreadyExists { path: String },

    #[snafu(display("Path is a directory: {path}"))]
    PathIsDirectory { path: String },

    #[snafu(display("Path is a file: {path}"))]
    PathIsFile { path: String },

    /// An intermediate segment of `path` is a plain file, so `path` cannot be
    /// created underneath it.
    #[snafu(display("Cannot traverse '{ancestor}' to reach '{path}': it is a file"))]
    PathTraversalConflict { path: String, ancestor: String },

    #[snafu(display("Transfer failed for '{path}': {source}"))]
    TransferFailed { path: String, source: Box<Error> },

    #[snafu(display("Invalid remote path: '{path}'"))]
    InvalidPath { path: String },

    #[snafu(display("Local path does not exist: {}", path.display()))]
    LocalPathNotFound { path: PathBuf },

    #[snafu(display("Local path is not a regular file: {}", path.display()))]
    LocalPathNotFile { path: PathBuf },

    #[snafu(display("Unsupported endpoint scheme: {scheme}"))]
    UnsupportedScheme { scheme: String },

    #[snafu(display("Invalid endpoint: '{endpoint}'"))]
    InvalidEndpoint { endpoint: String },

    #[snafu(display("Invalid configuration in '{}': {source}", path.display()))]
    InvalidConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Storage error: {source}"))]
    Storage { source: opendal::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::Storage { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}
