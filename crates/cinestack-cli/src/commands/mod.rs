pub mod animate;
pub mod config;
pub mod export;
pub mod info;
pub mod pipeline;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;

use cinestack_core::align::background::SubtractConfig;
use cinestack_core::consts::DEFAULT_SUFFIX;
use cinestack_core::filters::clahe::ClaheConfig;
use cinestack_core::io::loader::LoadOptions;

/// Source directory and frame selection, shared by the loading commands.
#[derive(Args)]
pub struct SourceArgs {
    /// Source image directory
    pub dir: PathBuf,

    /// Source file suffix
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// First file index to load
    #[arg(long)]
    pub start: Option<usize>,

    /// File index to stop before
    #[arg(long)]
    pub stop: Option<usize>,

    /// Index step between loaded files
    #[arg(long, conflicts_with = "count")]
    pub step: Option<usize>,

    /// Approximate number of files to load (derives the step)
    #[arg(long)]
    pub count: Option<usize>,
}

impl SourceArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            start: self.start,
            stop: self.stop,
            step: self.step,
            count: self.count,
        }
    }
}

/// Drift correction flags, shared by the exporting commands.
#[derive(Args)]
pub struct CorrectionArgs {
    /// Align frames and subtract the drift-corrected background
    #[arg(long)]
    pub subtract: bool,

    /// Median prefilter window size (odd)
    #[arg(long, default_value = "3")]
    pub median_size: usize,

    /// Clip percentiles "lo,hi", or "none" to disable
    #[arg(long, default_value = "0.1,99.9")]
    pub clip: String,

    /// Equalize contrast adaptively, with an optional clip limit
    #[arg(long, num_args = 0..=1, default_missing_value = "0.01")]
    pub equalize: Option<f32>,

    /// Size the crop window from all frames instead of the last one
    #[arg(long)]
    pub strict_offsets: bool,
}

impl CorrectionArgs {
    pub fn subtract_config(&self) -> Result<Option<SubtractConfig>> {
        if !self.subtract {
            return Ok(None);
        }
        Ok(Some(SubtractConfig {
            median_size: self.median_size,
            clip_percentiles: parse_clip(&self.clip)?,
            scan_all_offsets: self.strict_offsets,
            equalize: self.equalize.map(|clip_limit| ClaheConfig {
                clip_limit,
                ..Default::default()
            }),
        }))
    }
}

fn parse_clip(spec: &str) -> Result<Option<(f32, f32)>> {
    if spec.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let (lo, hi) = spec
        .split_once(',')
        .ok_or_else(|| anyhow!("clip must be \"lo,hi\" or \"none\", got {spec:?}"))?;
    Ok(Some((lo.trim().parse()?, hi.trim().parse()?)))
}
