use ndarray::s;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::align::correlate::compute_offset_array;
use crate::consts::{DEFAULT_CLIP_PERCENTILES, DEFAULT_MEDIAN_SIZE};
use crate::error::{CinestackError, Result};
use crate::filters::clahe::{equalize_adaptive_array, ClaheConfig};
use crate::filters::histogram::{clip_stack, percentile_pair, rescale_stack};
use crate::filters::median::median_filter_array;
use crate::frame::{Frame, PixelOffset, Stack};
use crate::progress::{ProgressReporter, Stage};

/// Parameters for drift correction and background subtraction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubtractConfig {
    /// Median prefilter window size in pixels. Must be odd.
    #[serde(default = "default_median_size")]
    pub median_size: usize,
    /// Percentile range the corrected stack is clipped to, in percent.
    /// `None` disables clipping.
    #[serde(default = "default_clip_percentiles")]
    pub clip_percentiles: Option<(f32, f32)>,
    /// Size the output window from every frame's offset instead of only the
    /// last frame's. The default trusts drift to accumulate monotonically.
    #[serde(default)]
    pub scan_all_offsets: bool,
    /// Optional adaptive histogram equalization of the corrected stack.
    #[serde(default)]
    pub equalize: Option<ClaheConfig>,
}

fn default_median_size() -> usize {
    DEFAULT_MEDIAN_SIZE
}

fn default_clip_percentiles() -> Option<(f32, f32)> {
    Some(DEFAULT_CLIP_PERCENTILES)
}

impl Default for SubtractConfig {
    fn default() -> Self {
        Self {
            median_size: default_median_size(),
            clip_percentiles: default_clip_percentiles(),
            scan_all_offsets: false,
            equalize: None,
        }
    }
}

impl SubtractConfig {
    fn validate(&self) -> Result<()> {
        if self.median_size == 0 || self.median_size % 2 == 0 {
            return Err(CinestackError::InvalidParameter(format!(
                "median_size must be odd, got {}",
                self.median_size
            )));
        }
        if let Some((lo, hi)) = self.clip_percentiles {
            if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) || lo >= hi {
                return Err(CinestackError::InvalidParameter(format!(
                    "clip percentiles must satisfy 0 <= lo < hi <= 100, got ({lo}, {hi})"
                )));
            }
        }
        Ok(())
    }
}

/// Align every frame of `stack` against the first one, crop all frames to a
/// common window and subtract the reference region from each.
///
/// Offsets are measured by phase correlation on median-filtered copies. The
/// output window is `(H - dr, W - dc)` where `(dr, dc)` are the absolute
/// offset magnitudes of the last frame (default) or the per-axis maxima over
/// all frames (`scan_all_offsets`). Frame i is cropped at `(|dy_i|, |dx_i|)`;
/// a frame whose crop falls outside its bounds yields [`CinestackError::OffsetOutOfBounds`].
/// The first output frame is all zeros by construction.
pub fn subtract_background(
    stack: &Stack,
    config: &SubtractConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Stack> {
    config.validate()?;

    let n = stack.len();
    let (h, w) = (stack.height(), stack.width());
    info!(
        frames = n,
        height = h,
        width = w,
        "correcting drift and subtracting background"
    );

    // Median prefilter keeps shot noise out of the correlation peaks.
    reporter.begin_stage(Stage::Denoising, Some(n));
    let mut filtered = Vec::with_capacity(n);
    for (i, frame) in stack.iter().enumerate() {
        filtered.push(median_filter_array(&frame.data, config.median_size));
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    let reference = &filtered[0];

    // Output window sizing. The default mode assumes the last frame carries
    // the maximal drift; strict mode measures every frame.
    let (offsets, window_dy, window_dx) = if config.scan_all_offsets {
        reporter.begin_stage(Stage::Aligning, Some(n));
        let mut all = Vec::with_capacity(n);
        all.push(PixelOffset::default());
        reporter.advance(1);
        for (i, data) in filtered.iter().enumerate().skip(1) {
            all.push(compute_offset_array(reference, data)?);
            reporter.advance(i + 1);
        }
        reporter.finish_stage();

        let (mut max_dy, mut max_dx) = (0, 0);
        for offset in &all {
            let (dy, dx) = offset.magnitudes();
            max_dy = max_dy.max(dy);
            max_dx = max_dx.max(dx);
        }
        (Some(all), max_dy, max_dx)
    } else {
        reporter.begin_stage(Stage::Aligning, Some(1));
        let last = compute_offset_array(reference, &filtered[n - 1])?;
        reporter.advance(1);
        reporter.finish_stage();
        let (dy, dx) = last.magnitudes();
        (None, dy, dx)
    };

    if window_dy >= h || window_dx >= w {
        return Err(CinestackError::InvalidParameter(format!(
            "measured drift ({window_dy}, {window_dx}) leaves no overlap for {h}x{w} frames"
        )));
    }
    let out_h = h - window_dy;
    let out_w = w - window_dx;
    info!(window_dy, window_dx, out_h, out_w, "sized output window");

    let ref_region = reference.slice(s![..out_h, ..out_w]);

    reporter.begin_stage(Stage::Subtracting, Some(n));
    let mut corrected = Vec::with_capacity(n);
    for (i, original) in stack.iter().enumerate() {
        let offset = match &offsets {
            Some(all) => all[i],
            None if i == 0 => PixelOffset::default(),
            None => compute_offset_array(reference, &filtered[i])?,
        };
        let (dy, dx) = offset.magnitudes();
        if dy + out_h > h || dx + out_w > w {
            return Err(CinestackError::OffsetOutOfBounds {
                frame: i,
                dy,
                dx,
                height: h,
                width: w,
            });
        }
        debug!(frame = i, dy, dx, "cropping and subtracting");
        let diff = &filtered[i].slice(s![dy..dy + out_h, dx..dx + out_w]) - &ref_region;
        corrected.push(Frame::new(diff, original.original_bit_depth));
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    if let Some((lo, hi)) = config.clip_percentiles {
        reporter.begin_stage(Stage::Clipping, Some(1));
        let (low, high) = percentile_pair(&corrected, lo, hi);
        clip_stack(&mut corrected, low, high);
        reporter.advance(1);
        reporter.finish_stage();
        info!(low, high, "clipped stack intensities");
    }

    if let Some(clahe) = &config.equalize {
        let (min, max) = rescale_stack(&mut corrected);
        debug!(min, max, "rescaled stack before equalization");
        reporter.begin_stage(Stage::Equalizing, Some(n));
        for (i, frame) in corrected.iter_mut().enumerate() {
            frame.data = equalize_adaptive_array(&frame.data, clahe);
            reporter.advance(i + 1);
        }
        reporter.finish_stage();
    }

    Stack::from_frames(corrected)
}
