use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::align::background::SubtractConfig;
use crate::consts::{DEFAULT_GIF_FPS, DEFAULT_SUFFIX};
use crate::export::annotate::{ScaleBarConfig, TimestampConfig};
use crate::export::frames::FrameFormat;
use crate::filters::clahe::ClaheConfig;
use crate::io::loader::LoadOptions;

/// Declarative description of a full load/correct/export run,
/// deserializable from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the numbered source images.
    pub input: PathBuf,
    /// File suffix the source images are matched by.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default)]
    pub load: LoadOptions,
    /// Drift correction and background subtraction. `None` exports the
    /// frames as loaded.
    pub subtract: Option<SubtractConfig>,
    pub animate: Option<AnimateJob>,
    pub frames: Option<FramesJob>,
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            suffix: default_suffix(),
            load: LoadOptions::default(),
            subtract: Some(SubtractConfig::default()),
            animate: Some(AnimateJob::default()),
            frames: None,
        }
    }
}

/// Animated GIF export job.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimateJob {
    pub output: PathBuf,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub equalize: Option<ClaheConfig>,
}

fn default_fps() -> u32 {
    DEFAULT_GIF_FPS
}

impl Default for AnimateJob {
    fn default() -> Self {
        Self {
            output: PathBuf::from("stack.gif"),
            fps: default_fps(),
            equalize: None,
        }
    }
}

/// Per-frame image export job.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FramesJob {
    pub output: PathBuf,
    #[serde(default)]
    pub format: FrameFormat,
    #[serde(default)]
    pub scale_bar: Option<ScaleBarConfig>,
    #[serde(default)]
    pub timestamp: Option<TimestampConfig>,
}
