use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Args, ValueEnum};

use cinestack_core::align::background::subtract_background;
use cinestack_core::export::annotate::{Annotations, Location, ScaleBarConfig, TimestampConfig};
use cinestack_core::export::frames::{export_frames, FrameExportOptions, FrameFormat};
use cinestack_core::io::loader::load_stack;

use crate::progress::ConsoleReporter;

use super::{CorrectionArgs, SourceArgs};

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Png,
    Tif,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LocationArg {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl From<LocationArg> for Location {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::UpperLeft => Location::UpperLeft,
            LocationArg::UpperRight => Location::UpperRight,
            LocationArg::LowerLeft => Location::LowerLeft,
            LocationArg::LowerRight => Location::LowerRight,
        }
    }
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub correction: CorrectionArgs,

    /// Output image format
    #[arg(long, value_enum, default_value = "png")]
    pub format: FormatArg,

    /// Physical units per pixel; enables the scale bar overlay
    #[arg(long)]
    pub scale_bar_dx: Option<f64>,

    /// Scale bar units label
    #[arg(long, default_value = "nm")]
    pub units: String,

    /// Scale bar length as a fraction of the frame width
    #[arg(long, default_value = "0.25")]
    pub length_fraction: f32,

    /// Scale bar margin from the frame edges in pixels
    #[arg(long, default_value = "8")]
    pub border_pad: u32,

    /// Scale bar corner
    #[arg(long, value_enum, default_value = "lower-right")]
    pub location: LocationArg,

    /// Acquisition frame rate; enables the timestamp overlay
    #[arg(long)]
    pub timestamp_fps: Option<f64>,

    /// Timestamp x position in pixels
    #[arg(long, default_value = "8")]
    pub ts_x: u32,

    /// Timestamp y position in pixels
    #[arg(long, default_value = "8")]
    pub ts_y: u32,

    /// Timestamp digits "before,after" the decimal point
    #[arg(long, default_value = "3,1")]
    pub digits: String,

    /// Output directory (created, must not exist)
    #[arg(short, long, default_value = "frames")]
    pub output: PathBuf,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    if args.correction.equalize.is_some() && !args.correction.subtract {
        bail!("--equalize requires --subtract for frame export");
    }

    let reporter = ConsoleReporter::new()?;
    let stack = load_stack(
        &args.source.dir,
        &args.source.suffix,
        &args.source.load_options(),
        &reporter,
    )?;
    println!(
        "Loaded {} frames ({}x{})",
        stack.len(),
        stack.width(),
        stack.height()
    );

    let stack = match args.correction.subtract_config()? {
        Some(config) => subtract_background(&stack, &config, &reporter)?,
        None => stack,
    };

    let options = FrameExportOptions {
        format: match args.format {
            FormatArg::Png => FrameFormat::Png,
            FormatArg::Tif => FrameFormat::Tiff,
        },
        annotate: build_annotations(args)?,
    };
    let written = export_frames(&stack, &args.output, &options, &reporter)?;
    println!("Exported {} frames to {}", written.len(), args.output.display());
    Ok(())
}

fn build_annotations(args: &ExportArgs) -> Result<Option<Annotations>> {
    let scale_bar = args.scale_bar_dx.map(|dx| {
        let mut bar = ScaleBarConfig::new(dx, args.units.clone());
        bar.length_fraction = args.length_fraction;
        bar.border_pad = args.border_pad;
        bar.location = args.location.into();
        bar
    });

    let timestamp = match args.timestamp_fps {
        Some(fps) => {
            let (before, after) = args
                .digits
                .split_once(',')
                .ok_or_else(|| anyhow!("digits must be \"before,after\", got {:?}", args.digits))?;
            Some(TimestampConfig {
                x: args.ts_x,
                y: args.ts_y,
                fps,
                digits_before_dec: before.trim().parse()?,
                digits_after_dec: after.trim().parse()?,
                ..Default::default()
            })
        }
        None => None,
    };

    if scale_bar.is_none() && timestamp.is_none() {
        return Ok(None);
    }
    Ok(Some(Annotations {
        scale_bar,
        timestamp,
    }))
}
