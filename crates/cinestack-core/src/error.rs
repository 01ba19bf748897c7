use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CinestackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Frame size mismatch: expected {expected_h}x{expected_w}, got {got_h}x{got_w}")]
    ShapeMismatch {
        expected_h: usize,
        expected_w: usize,
        got_h: usize,
        got_w: usize,
    },

    #[error(
        "Frame {frame} offset magnitude ({dy}, {dx}) pushes its crop window \
         outside the {height}x{width} frame bounds"
    )]
    OffsetOutOfBounds {
        frame: usize,
        dy: usize,
        dx: usize,
        height: usize,
        width: usize,
    },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, CinestackError>;
