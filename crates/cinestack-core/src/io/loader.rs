use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CinestackError, Result};
use crate::frame::Stack;
use crate::io::image_io::load_image;
use crate::progress::{ProgressReporter, Stage};

/// Index selection over the sorted file list of a source directory.
///
/// `start` defaults to 0 and `stop` to the file count. When `count` is set,
/// the step is derived as `round((stop - start) / count)` with ties rounding
/// to even; otherwise `step` defaults to 1.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub stop: Option<usize>,
    #[serde(default)]
    pub step: Option<usize>,
    #[serde(default)]
    pub count: Option<usize>,
}

impl LoadOptions {
    /// Resolve the selected indices against a file list of `total` entries.
    pub fn selected_indices(&self, total: usize) -> Result<Vec<usize>> {
        let start = self.start.unwrap_or(0);
        let stop = self.stop.unwrap_or(total);
        let step = match (self.count, self.step) {
            (Some(count), _) => {
                if count == 0 {
                    return Err(CinestackError::InvalidParameter(
                        "count must be at least 1".into(),
                    ));
                }
                let span = stop.saturating_sub(start) as f64;
                (span / count as f64).round_ties_even() as usize
            }
            (None, Some(step)) => step,
            (None, None) => 1,
        };
        if step == 0 {
            return Err(CinestackError::InvalidParameter(
                "derived step is 0; fewer images requested than available".into(),
            ));
        }
        Ok((start..stop).step_by(step).collect())
    }
}

/// Enumerate the files in `dir` carrying the given suffix, sorted
/// lexicographically. A leading `.` on the suffix is ignored.
pub fn list_images(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CinestackError::DirectoryNotFound(dir.to_path_buf()));
    }
    let suffix = suffix.strip_prefix('.').unwrap_or(suffix);

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(suffix) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load a selection of images from a directory into a stack.
///
/// Files are matched by `suffix`, sorted by name, and subsampled per
/// `options`. Every selected file must decode and share the dimensions of
/// the first; any failure aborts the whole load with no partial stack.
pub fn load_stack(
    dir: &Path,
    suffix: &str,
    options: &LoadOptions,
    reporter: &dyn ProgressReporter,
) -> Result<Stack> {
    let paths = list_images(dir, suffix)?;
    let indices = options.selected_indices(paths.len())?;
    info!(
        dir = %dir.display(),
        available = paths.len(),
        selected = indices.len(),
        "Loading images"
    );

    reporter.begin_stage(Stage::Loading, Some(indices.len()));
    let mut frames = Vec::with_capacity(indices.len());
    for (i, &index) in indices.iter().enumerate() {
        let path = paths
            .get(index)
            .ok_or(CinestackError::FrameIndexOutOfRange {
                index,
                total: paths.len(),
            })?;
        debug!(frame = i, index, file = %path.display(), "Loading image");
        frames.push(load_image(path)?);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    Stack::from_frames(frames)
}
