use std::path::PathBuf;

/// Errors that can occur while reading instrument exports
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error reading a file or directory
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited text
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header row
    #[error("File has no header row")]
    MissingHeader,

    /// A path that is neither a readable file nor a directory
    #[error("Not a file or directory: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A path whose name cannot serve as a sample identifier
    #[error("Cannot derive a sample identifier from {}", .0.display())]
    NoIdentifier(PathBuf),

    /// In-memory sample data that cannot form a table
    #[error("Invalid sample data: {0}")]
    InvalidData(String),
}
