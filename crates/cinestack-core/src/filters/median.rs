use ndarray::Array2;

use crate::frame::Frame;

/// Apply a square-window spatial median filter to a frame.
///
/// `size` is the window side length and must be odd; a size of 1 is the
/// identity. Borders clamp to the nearest edge pixel.
pub fn median_filter(frame: &Frame, size: usize) -> Frame {
    let filtered = median_filter_array(&frame.data, size);
    Frame::new(filtered, frame.original_bit_depth)
}

/// Apply a square-window spatial median filter to a raw array.
pub fn median_filter_array(data: &Array2<f32>, size: usize) -> Array2<f32> {
    if size <= 1 {
        return data.clone();
    }
    let (h, w) = data.dim();
    let radius = (size / 2) as isize;
    let n = size * size;

    let mut result = Array2::<f32>::zeros((h, w));
    let mut window = vec![0.0f32; n];

    for row in 0..h {
        for col in 0..w {
            let mut k = 0;
            for dy in -radius..=radius {
                let src_row = (row as isize + dy).clamp(0, h as isize - 1) as usize;
                for dx in -radius..=radius {
                    let src_col = (col as isize + dx).clamp(0, w as isize - 1) as usize;
                    window[k] = data[[src_row, src_col]];
                    k += 1;
                }
            }
            result[[row, col]] = window_median(&mut window);
        }
    }

    result
}

/// Median of an odd-length window via `select_nth_unstable`, avoiding a
/// full sort.
fn window_median(window: &mut [f32]) -> f32 {
    let mid = window.len() / 2;
    *window.select_nth_unstable_by(mid, |a, b| a.total_cmp(b)).1
}
