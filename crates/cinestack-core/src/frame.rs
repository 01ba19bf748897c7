use ndarray::Array2;

use crate::error::{CinestackError, Result};

/// A single grayscale micrograph.
/// Pixel values are f32, nominally in [0.0, 1.0]; a background-subtracted
/// frame may carry negative values until it is clipped or rescaled.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub original_bit_depth: u8,
}

impl Frame {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            original_bit_depth: bit_depth,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// An ordered sequence of equally-sized frames.
///
/// The constructor enforces the stack invariants: at least one frame, and
/// every frame sharing the dimensions of the first.
#[derive(Clone, Debug)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        let first = frames.first().ok_or(CinestackError::EmptySequence)?;
        let (h, w) = (first.height(), first.width());
        for frame in &frames {
            if frame.height() != h || frame.width() != w {
                return Err(CinestackError::ShapeMismatch {
                    expected_h: h,
                    expected_w: w,
                    got_h: frame.height(),
                    got_w: frame.width(),
                });
            }
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Height shared by every frame.
    pub fn height(&self) -> usize {
        self.frames[0].height()
    }

    /// Width shared by every frame.
    pub fn width(&self) -> usize {
        self.frames[0].width()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Result<&Frame> {
        self.frames
            .get(index)
            .ok_or(CinestackError::FrameIndexOutOfRange {
                index,
                total: self.frames.len(),
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

/// Integer pixel shift that registers a frame onto a reference, estimated
/// by phase correlation. A frame whose content drifted down and right
/// carries a negative `dy` and `dx`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelOffset {
    pub dy: i64,
    pub dx: i64,
}

impl PixelOffset {
    /// Absolute row/column magnitudes, used for crop arithmetic.
    pub fn magnitudes(&self) -> (usize, usize) {
        (self.dy.unsigned_abs() as usize, self.dx.unsigned_abs() as usize)
    }
}
