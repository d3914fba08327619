//! Error types for the thorpe-transect crate.
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A profile that is required for this analysis is missing.
    #[error("Missing profile required for the analysis.")]
    MissingProfile,
    /// Not enough data available for anlaysis
    #[error("Not enough data available for analysis.")]
    NotEnoughData,
    /// There is no data available that meets the requirements.
    #[error("Profile is full of missing values, cannot do analysis.")]
    NoDataProfile,
    /// Bad or invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Two tables that must share rows and columns do not.
    #[error("Tables are not aligned: {0}")]
    MisalignedTables(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// Forward an error from the csv crate.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        /// The table being read or written.
        path: PathBuf,
        /// The underlying error.
        source: csv::Error,
    },
    /// Forward an error from the npz writer.
    #[error("Failed writing npz archive {}: {source}", path.display())]
    Npz {
        /// The archive being written.
        path: PathBuf,
        /// The underlying error.
        source: ndarray_npy::WriteNpzError,
    },
    /// The configuration file could not be parsed.
    #[error("Invalid configuration {}: {source}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },
    /// The plotting backend failed.
    #[error("Failed drawing {}: {message}", path.display())]
    Figure {
        /// The figure being drawn.
        path: PathBuf,
        /// Description from the backend.
        message: String,
    },
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv<P: Into<PathBuf>>(path: P, source: csv::Error) -> Self {
        AnalysisError::Csv {
            path: path.into(),
            source,
        }
    }
}
