use std::path::PathBuf;

use tracing::info;

use crate::align::background::subtract_background;
use crate::error::{CinestackError, Result};
use crate::export::annotate::Annotations;
use crate::export::frames::{export_frames, FrameExportOptions};
use crate::export::gif::{save_gif, GifOptions};
use crate::io::loader::load_stack;
use crate::progress::ProgressReporter;

use super::config::PipelineConfig;

/// What a pipeline run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub frames: usize,
    pub height: usize,
    pub width: usize,
    /// Path of the animation, when an animate job ran.
    pub animation: Option<PathBuf>,
    /// Paths of the exported frame images, when a frames job ran.
    pub frame_files: Vec<PathBuf>,
}

/// Run a configured load/correct/export sequence.
///
/// The stages execute in order: load, optional background subtraction,
/// then every configured export job. A config without any export job is
/// rejected up front, before any I/O.
pub fn run_pipeline(
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineReport> {
    if config.animate.is_none() && config.frames.is_none() {
        return Err(CinestackError::InvalidParameter(
            "pipeline has no export job; configure [animate] or [frames]".into(),
        ));
    }

    let stack = load_stack(&config.input, &config.suffix, &config.load, reporter)?;

    let stack = match &config.subtract {
        Some(subtract) => subtract_background(&stack, subtract, reporter)?,
        None => stack,
    };

    let mut report = PipelineReport {
        frames: stack.len(),
        height: stack.height(),
        width: stack.width(),
        animation: None,
        frame_files: Vec::new(),
    };

    if let Some(job) = &config.animate {
        let options = GifOptions {
            fps: job.fps,
            equalize: job.equalize.clone(),
        };
        report.animation = Some(save_gif(&stack, &job.output, &options, reporter)?);
    }

    if let Some(job) = &config.frames {
        let annotate = if job.scale_bar.is_some() || job.timestamp.is_some() {
            Some(Annotations {
                scale_bar: job.scale_bar.clone(),
                timestamp: job.timestamp.clone(),
            })
        } else {
            None
        };
        let options = FrameExportOptions {
            format: job.format,
            annotate,
        };
        report.frame_files = export_frames(&stack, &job.output, &options, reporter)?;
    }

    info!(
        frames = report.frames,
        height = report.height,
        width = report.width,
        "Pipeline complete"
    );
    Ok(report)
}
