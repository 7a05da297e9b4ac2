use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("No input files provided")]
    NoInputFiles,

    #[error("File not found: {}", .0.display())]
    InputFileNotFound(PathBuf),

    #[error("Formatter unavailable: {0}")]
    FormatterUnavailable(String),

    #[error("{tool} failed: {diagnostics}")]
    FormatterFailed { tool: String, diagnostics: String },

    #[error("FAT writer unavailable: {0}")]
    WriterUnavailable(String),

    #[error("Failed to write {name}: {source}")]
    WriteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Verification failed for {name}: {reason}")]
    VerifyFailed { name: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
