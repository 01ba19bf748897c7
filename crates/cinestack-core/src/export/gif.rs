use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame as GifFrame, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::DEFAULT_GIF_FPS;
use crate::error::{CinestackError, Result};
use crate::filters::clahe::{equalize_adaptive, ClaheConfig};
use crate::frame::Stack;
use crate::io::image_io::to_gray_u8;
use crate::progress::{ProgressReporter, Stage};

/// Animation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GifOptions {
    /// Playback rate in frames per second. Must be positive.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Optional per-frame adaptive histogram equalization before encoding.
    #[serde(default)]
    pub equalize: Option<ClaheConfig>,
}

fn default_fps() -> u32 {
    DEFAULT_GIF_FPS
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            equalize: None,
        }
    }
}

/// Encode a stack as an infinitely looping animated GIF.
///
/// `.gif` is appended to the file name unless already present. Refuses to
/// replace an existing file. Returns the path actually written.
pub fn save_gif(
    stack: &Stack,
    path: &Path,
    options: &GifOptions,
    reporter: &dyn ProgressReporter,
) -> Result<PathBuf> {
    if options.fps == 0 {
        return Err(CinestackError::InvalidParameter(
            "fps must be positive".into(),
        ));
    }
    let path = ensure_gif_extension(path);
    if path.exists() {
        return Err(CinestackError::AlreadyExists(path));
    }

    let file = File::create(&path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;
    let delay = Delay::from_numer_denom_ms(1000, options.fps);

    reporter.begin_stage(Stage::Encoding, Some(stack.len()));
    for (i, frame) in stack.iter().enumerate() {
        let gray = match &options.equalize {
            Some(config) => to_gray_u8(&equalize_adaptive(frame, config)),
            None => to_gray_u8(frame),
        };
        let (w, h) = gray.dimensions();
        let mut rgba = RgbaImage::new(w, h);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let v = pixel.0[0];
            rgba.put_pixel(x, y, Rgba([v, v, v, u8::MAX]));
        }
        encoder.encode_frame(GifFrame::from_parts(rgba, 0, 0, delay))?;
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    info!(path = %path.display(), frames = stack.len(), fps = options.fps, "wrote animation");
    Ok(path)
}

/// Append `.gif` to the file name unless it already carries the extension.
/// A foreign extension is kept and `.gif` added after it.
fn ensure_gif_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("gif") => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".gif");
            PathBuf::from(name)
        }
    }
}
