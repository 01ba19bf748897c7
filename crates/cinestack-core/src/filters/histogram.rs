use crate::consts::EPSILON;
use crate::frame::Frame;

/// Intensity percentile over the pooled pixels of a frame sequence.
///
/// `q` is in percent units (0..=100). Uses linear interpolation between
/// the two nearest ranks.
pub fn percentile(frames: &[Frame], q: f32) -> f32 {
    percentile_pair(frames, q, q).0
}

/// Two percentiles over the pooled pixels, sorting only once.
pub fn percentile_pair(frames: &[Frame], lo_q: f32, hi_q: f32) -> (f32, f32) {
    let mut values: Vec<f32> = frames
        .iter()
        .flat_map(|f| f.data.iter().copied())
        .collect();
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    (
        percentile_of_sorted(&values, lo_q),
        percentile_of_sorted(&values, hi_q),
    )
}

fn percentile_of_sorted(sorted: &[f32], q: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = q as f64 / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = (rank - lo as f64) as f32;
    sorted[lo] + (sorted[hi] - sorted[lo]) * t
}

/// Clip every pixel of every frame into `[lo, hi]`.
pub fn clip_stack(frames: &mut [Frame], lo: f32, hi: f32) {
    for frame in frames {
        frame.data.mapv_inplace(|v| v.clamp(lo, hi));
    }
}

/// Rescale a frame sequence into [0, 1] by its global min/max.
///
/// Returns the original `(min, max)`. A constant sequence maps to all
/// zeros.
pub fn rescale_stack(frames: &mut [Frame]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for frame in frames.iter() {
        for &v in frame.data.iter() {
            min = min.min(v);
            max = max.max(v);
        }
    }

    let range = max - min;
    if range.abs() < EPSILON {
        for frame in frames {
            frame.data.fill(0.0);
        }
    } else {
        for frame in frames {
            frame.data.mapv_inplace(|v| (v - min) / range);
        }
    }
    (min, max)
}
