//! Error types for `TexConverter`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `TexConverter` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Discovery Errors ====================
    /// The input folder does not exist or is not a directory.
    #[error("input folder not found or not a directory: {path}")]
    InputFolderNotFound {
        /// The folder that was requested.
        path: PathBuf,
    },

    /// The input folder could not be scanned.
    #[error("failed to scan input folder: {0}")]
    Discovery(String),

    /// The output folder could not be created.
    #[error("failed to create output folder {path}: {source}")]
    OutputFolder {
        /// The folder that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Image Errors ====================
    /// The byte stream is not a supported raster image or is corrupt.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The decoded image has a channel layout other than 1, 3 or 4 channels.
    #[error("unsupported channel layout: {channels} channel(s)")]
    UnsupportedChannelLayout {
        /// Number of channels in the decoded image.
        channels: u8,
    },

    /// A transform received a buffer with too few channels.
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelCountMismatch {
        /// Channels the transform requires.
        expected: u8,
        /// Channels the buffer has.
        actual: u8,
    },

    /// Raw pixel data does not match the declared dimensions.
    #[error("invalid pixel buffer: {0}")]
    InvalidPixelBuffer(String),

    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    Encode(String),

    // ==================== glTF Errors ====================
    /// A glTF document could not be read or parsed.
    #[error("failed to parse glTF {path}: {message}")]
    GltfParse {
        /// The document path.
        path: PathBuf,
        /// The parser or IO message.
        message: String,
    },

    /// A rewritten glTF document could not be written back.
    #[error("failed to write glTF {path}: {message}")]
    GltfWrite {
        /// The document path.
        path: PathBuf,
        /// The serializer or IO message.
        message: String,
    },

    // ==================== Runtime Errors ====================
    /// A worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Discovery(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::WorkerPool(err.to_string())
    }
}

/// A specialized Result type for `TexConverter` operations.
pub type Result<T> = std::result::Result<T, Error>;
