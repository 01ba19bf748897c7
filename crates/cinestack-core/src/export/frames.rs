use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CinestackError, Result};
use crate::export::annotate::{draw_scale_bar, draw_timestamp, Annotations};
use crate::frame::Stack;
use crate::io::image_io::{save_png, save_tiff, to_gray_u8};
use crate::progress::{ProgressReporter, Stage};

/// Output encoding for individual frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// 8-bit grayscale PNG.
    #[default]
    Png,
    /// 16-bit grayscale TIFF.
    Tiff,
}

impl FrameFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FrameFormat::Png => "png",
            FrameFormat::Tiff => "tif",
        }
    }
}

/// Frame export parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameExportOptions {
    #[serde(default)]
    pub format: FrameFormat,
    /// Overlays burned into the frames. Annotated output is PNG only.
    #[serde(default)]
    pub annotate: Option<Annotations>,
}

/// Write every frame of a stack into a freshly created directory.
///
/// Files are named `<dir-basename>_<index>.<ext>` with the index zero-padded
/// to the digit width of the frame count. The directory must not exist yet.
/// A failure partway through leaves the already written frames in place.
pub fn export_frames(
    stack: &Stack,
    dir: &Path,
    options: &FrameExportOptions,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>> {
    if options.annotate.is_some() && options.format != FrameFormat::Png {
        return Err(CinestackError::InvalidParameter(
            "annotated output requires PNG format".into(),
        ));
    }
    if dir.exists() {
        return Err(CinestackError::AlreadyExists(dir.to_path_buf()));
    }
    fs::create_dir_all(dir)?;

    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let width = stack.len().to_string().len();

    reporter.begin_stage(Stage::Writing, Some(stack.len()));
    let mut written = Vec::with_capacity(stack.len());
    for (i, frame) in stack.iter().enumerate() {
        let name = format!("{base}_{i:0width$}.{ext}", ext = options.format.extension());
        let path = dir.join(name);
        match &options.annotate {
            Some(annotations) => {
                let mut gray = to_gray_u8(frame);
                if let Some(bar) = &annotations.scale_bar {
                    draw_scale_bar(&mut gray, bar)?;
                }
                if let Some(stamp) = &annotations.timestamp {
                    draw_timestamp(&mut gray, stamp, i)?;
                }
                gray.save_with_format(&path, image::ImageFormat::Png)?;
            }
            None => match options.format {
                FrameFormat::Png => save_png(frame, &path)?,
                FrameFormat::Tiff => save_tiff(frame, &path)?,
            },
        }
        written.push(path);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    info!(dir = %dir.display(), frames = written.len(), "exported frames");
    Ok(written)
}
