//! # Error Module
//!
//! Error types for the bird scrambler.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, counts, what went wrong
//! - **Fail the run** - every error is terminal for the daily run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ScramblerError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Image processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while discovering candidate images
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding, scrambling or encoding an image
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to write image {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tile resize failed: {0}")]
    Resize(String),

    #[error("Invalid tile count: {0} (must be at least 1)")]
    InvalidTileCount(u32),
}

/// Errors that occur while moving originals into the archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Name already taken: {path}")]
    Collision { path: PathBuf },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Unmet preconditions of a run
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Not enough images in the source folder and its subfolders: found {found}, need {required}")]
    InsufficientCandidates { found: usize, required: usize },

    #[error("Not enough borderless images available: accepted {accepted} of {required} ({rejected} bordered images rejected)")]
    InsufficientBorderless {
        accepted: usize,
        required: usize,
        rejected: usize,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ScramblerError>;
