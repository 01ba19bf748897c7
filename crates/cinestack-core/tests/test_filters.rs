#[allow(dead_code)]
mod common;

use approx::assert_relative_eq;
use ndarray::Array2;

use cinestack_core::filters::clahe::{equalize_adaptive, ClaheConfig};
use cinestack_core::filters::histogram::{clip_stack, percentile, percentile_pair, rescale_stack};
use cinestack_core::filters::median::median_filter;
use cinestack_core::frame::Frame;

use common::flat_frame;

#[test]
fn test_median_removes_salt_noise() {
    let mut frame = flat_frame(16, 16, 0.5);
    frame.data[[7, 7]] = 1.0;
    frame.data[[2, 12]] = 0.0;

    let filtered = median_filter(&frame, 3);
    for &v in filtered.data.iter() {
        assert_relative_eq!(v, 0.5, epsilon = 1e-6);
    }
}

#[test]
fn test_median_size_one_is_identity() {
    let mut frame = flat_frame(8, 8, 0.2);
    frame.data[[3, 3]] = 0.9;

    let filtered = median_filter(&frame, 1);
    assert_eq!(filtered.data, frame.data);
}

#[test]
fn test_median_clamps_at_borders() {
    // A corner pixel sees a 2x2 neighborhood replicated to 3x3.
    let data = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as f32);
    let frame = Frame::new(data, 8);

    let filtered = median_filter(&frame, 3);
    // Neighborhood of (0, 0) with clamping: {0, 0, 1, 0, 0, 1, 4, 4, 5}.
    assert_relative_eq!(filtered.data[[0, 0]], 1.0, epsilon = 1e-6);
}

fn ramp_frame() -> Frame {
    // Ten values 0..9 in a single row.
    let data = Array2::from_shape_fn((1, 10), |(_, c)| c as f32);
    Frame::new(data, 8)
}

#[test]
fn test_percentile_interpolates_linearly() {
    let frames = [ramp_frame()];
    assert_relative_eq!(percentile(&frames, 0.0), 0.0, epsilon = 1e-6);
    assert_relative_eq!(percentile(&frames, 100.0), 9.0, epsilon = 1e-6);
    assert_relative_eq!(percentile(&frames, 50.0), 4.5, epsilon = 1e-6);
    assert_relative_eq!(percentile(&frames, 25.0), 2.25, epsilon = 1e-6);
}

#[test]
fn test_percentile_pair_pools_all_frames() {
    let frames = [flat_frame(2, 2, 1.0), flat_frame(2, 2, 3.0)];
    let (lo, hi) = percentile_pair(&frames, 0.0, 100.0);
    assert_relative_eq!(lo, 1.0, epsilon = 1e-6);
    assert_relative_eq!(hi, 3.0, epsilon = 1e-6);
}

#[test]
fn test_clip_stack_clamps_values() {
    let mut frames = [ramp_frame()];
    clip_stack(&mut frames, 2.0, 7.0);

    for &v in frames[0].data.iter() {
        assert!((2.0..=7.0).contains(&v), "value {v} escaped the clip range");
    }
    assert_relative_eq!(frames[0].data[[0, 0]], 2.0, epsilon = 1e-6);
    assert_relative_eq!(frames[0].data[[0, 9]], 7.0, epsilon = 1e-6);
    assert_relative_eq!(frames[0].data[[0, 5]], 5.0, epsilon = 1e-6);
}

#[test]
fn test_rescale_stack_maps_to_unit_range() {
    let mut frames = [flat_frame(2, 2, 2.0), flat_frame(2, 2, 6.0)];
    frames[0].data[[0, 0]] = 4.0;

    let (min, max) = rescale_stack(&mut frames);
    assert_relative_eq!(min, 2.0, epsilon = 1e-6);
    assert_relative_eq!(max, 6.0, epsilon = 1e-6);
    assert_relative_eq!(frames[0].data[[0, 0]], 0.5, epsilon = 1e-6);
    assert_relative_eq!(frames[0].data[[1, 1]], 0.0, epsilon = 1e-6);
    assert_relative_eq!(frames[1].data[[0, 0]], 1.0, epsilon = 1e-6);
}

#[test]
fn test_rescale_constant_stack_goes_flat() {
    let mut frames = [flat_frame(4, 4, 3.0)];
    let (min, max) = rescale_stack(&mut frames);

    assert_relative_eq!(min, 3.0, epsilon = 1e-6);
    assert_relative_eq!(max, 3.0, epsilon = 1e-6);
    for &v in frames[0].data.iter() {
        assert_relative_eq!(v, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_equalize_output_in_unit_range() {
    let data = Array2::from_shape_fn((64, 64), |(r, c)| ((r + c) as f32 / 254.0) * 0.4 + 0.3);
    let frame = Frame::new(data, 8);

    let equalized = equalize_adaptive(&frame, &ClaheConfig::default());
    for &v in equalized.data.iter() {
        assert!((0.0..=1.0).contains(&v), "value {v} escapes [0, 1]");
    }
}

#[test]
fn test_equalize_stretches_low_contrast() {
    // Gradient squeezed into [0.3, 0.5]; equalization should widen it.
    let data = Array2::from_shape_fn((64, 64), |(r, c)| ((r + c) as f32 / 254.0) * 0.4 + 0.3);
    let frame = Frame::new(data, 8);
    let in_range = 126.0 / 254.0 * 0.4;

    let equalized = equalize_adaptive(&frame, &ClaheConfig::default());
    let out_min = equalized.data.iter().cloned().fold(f32::INFINITY, f32::min);
    let out_max = equalized.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!(
        out_max - out_min > in_range * 1.1,
        "contrast not stretched: [{out_min}, {out_max}] from a range of {in_range}"
    );
}

#[test]
fn test_equalize_keeps_constant_image_flat() {
    let frame = flat_frame(64, 64, 0.5);

    let equalized = equalize_adaptive(&frame, &ClaheConfig::default());
    let first = equalized.data[[0, 0]];
    for &v in equalized.data.iter() {
        assert_relative_eq!(v, first, epsilon = 1e-6);
    }
    assert!((first - 0.5).abs() < 0.1, "flat image shifted to {first}");
}
