use ndarray::Array2;
use tempfile::TempDir;

use cinestack_core::frame::{Frame, Stack};
use cinestack_core::io::image_io::save_image;

/// Frame filled with `background`, carrying a bright square of `value` at
/// (top, left) with the given side length.
pub fn square_frame(
    h: usize,
    w: usize,
    top: usize,
    left: usize,
    side: usize,
    value: f32,
    background: f32,
) -> Frame {
    let mut data = Array2::<f32>::from_elem((h, w), background);
    for row in top..(top + side).min(h) {
        for col in left..(left + side).min(w) {
            data[[row, col]] = value;
        }
    }
    Frame::new(data, 8)
}

/// Stack whose bright square starts at (top, left) and drifts by
/// (dy, dx) pixels per frame.
pub fn drifting_stack(
    n: usize,
    h: usize,
    w: usize,
    top: usize,
    left: usize,
    dy: usize,
    dx: usize,
) -> Stack {
    let frames: Vec<Frame> = (0..n)
        .map(|i| square_frame(h, w, top + i * dy, left + i * dx, 12, 1.0, 0.0))
        .collect();
    Stack::from_frames(frames).expect("valid stack")
}

/// Stack of frames sharing a static anchor square, plus a small blob whose
/// intensity grows linearly with the frame index. Offsets against the first
/// frame are zero; the blob is the only difference signal.
pub fn growing_blob_stack(n: usize, h: usize, w: usize) -> Stack {
    let frames: Vec<Frame> = (0..n)
        .map(|i| {
            let mut frame = square_frame(h, w, h / 2 - 6, w / 2 - 6, 12, 0.8, 0.0);
            let level = 0.1 * i as f32;
            for row in 5..8 {
                for col in 5..8 {
                    frame.data[[row, col]] = level;
                }
            }
            frame
        })
        .collect();
    Stack::from_frames(frames).expect("valid stack")
}

/// Write `n` sequentially numbered image files into a fresh temp directory.
///
/// Each frame is 8x8 and filled with `i / 255`, so a loaded frame identifies
/// its source index via `round(value * 255)`.
pub fn numbered_image_dir(n: usize, suffix: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for i in 0..n {
        let frame = flat_frame(8, 8, i as f32 / 255.0);
        let path = dir.path().join(format!("img_{i:03}.{suffix}"));
        save_image(&frame, &path).expect("write test image");
    }
    dir
}

pub fn flat_frame(h: usize, w: usize, value: f32) -> Frame {
    Frame::new(Array2::from_elem((h, w), value), 8)
}

/// Source index recovered from a frame written by [`numbered_image_dir`].
pub fn source_index(frame: &Frame) -> usize {
    (frame.data[[0, 0]] * 255.0).round() as usize
}
