use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_SCALEBAR_BORDER_PAD, DEFAULT_SCALEBAR_HEIGHT, DEFAULT_SCALEBAR_LENGTH_FRACTION,
    DEFAULT_TIMESTAMP_DIGITS,
};
use crate::error::{CinestackError, Result};
use crate::export::font;

const WHITE: u8 = u8::MAX;
const BLACK: u8 = 0;

/// Corner placement for overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    UpperLeft,
    UpperRight,
    LowerLeft,
    #[default]
    LowerRight,
}

/// Scale bar overlay parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScaleBarConfig {
    /// Physical length of one pixel, in `units`.
    pub dx: f64,
    /// Unit label appended to the bar length, e.g. "nm".
    pub units: String,
    /// Requested bar length as a fraction of the frame width. The physical
    /// length snaps down to the nearest 1-2-5 decade value.
    #[serde(default = "default_length_fraction")]
    pub length_fraction: f32,
    /// Margin between the backing box and the frame edges, in pixels.
    #[serde(default = "default_border_pad")]
    pub border_pad: u32,
    #[serde(default)]
    pub location: Location,
    /// Bar thickness in pixels.
    #[serde(default = "default_bar_height")]
    pub bar_height: u32,
}

fn default_length_fraction() -> f32 {
    DEFAULT_SCALEBAR_LENGTH_FRACTION
}

fn default_border_pad() -> u32 {
    DEFAULT_SCALEBAR_BORDER_PAD
}

fn default_bar_height() -> u32 {
    DEFAULT_SCALEBAR_HEIGHT
}

impl ScaleBarConfig {
    pub fn new(dx: f64, units: impl Into<String>) -> Self {
        Self {
            dx,
            units: units.into(),
            length_fraction: default_length_fraction(),
            border_pad: default_border_pad(),
            location: Location::default(),
            bar_height: default_bar_height(),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.dx.is_finite() || self.dx <= 0.0 {
            return Err(CinestackError::InvalidParameter(format!(
                "scale bar dx must be positive, got {}",
                self.dx
            )));
        }
        if !(self.length_fraction > 0.0 && self.length_fraction <= 1.0) {
            return Err(CinestackError::InvalidParameter(format!(
                "scale bar length fraction must be in (0, 1], got {}",
                self.length_fraction
            )));
        }
        Ok(())
    }
}

/// Timestamp overlay parameters. The rendered time of frame i is `i / fps`
/// with fixed digit counts, e.g. `003.2 s`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimestampConfig {
    #[serde(default = "default_margin")]
    pub x: u32,
    #[serde(default = "default_margin")]
    pub y: u32,
    /// Acquisition frame rate the timestamps are derived from.
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default = "default_digits_before")]
    pub digits_before_dec: usize,
    #[serde(default = "default_digits_after")]
    pub digits_after_dec: usize,
    #[serde(default = "default_unit_label")]
    pub unit_label: String,
}

fn default_margin() -> u32 {
    DEFAULT_SCALEBAR_BORDER_PAD
}

fn default_fps() -> f64 {
    crate::consts::DEFAULT_GIF_FPS as f64
}

fn default_digits_before() -> usize {
    DEFAULT_TIMESTAMP_DIGITS.0
}

fn default_digits_after() -> usize {
    DEFAULT_TIMESTAMP_DIGITS.1
}

fn default_unit_label() -> String {
    "s".to_string()
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            x: default_margin(),
            y: default_margin(),
            fps: default_fps(),
            digits_before_dec: default_digits_before(),
            digits_after_dec: default_digits_after(),
            unit_label: default_unit_label(),
        }
    }
}

impl TimestampConfig {
    fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(CinestackError::InvalidParameter(format!(
                "timestamp fps must be positive, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

/// Overlay selection for frame export.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub scale_bar: Option<ScaleBarConfig>,
    #[serde(default)]
    pub timestamp: Option<TimestampConfig>,
}

/// Draw a labeled scale bar into the corner given by `config.location`.
pub fn draw_scale_bar(image: &mut GrayImage, config: &ScaleBarConfig) -> Result<()> {
    config.validate()?;
    let (w, h) = image.dimensions();

    let target = w as f64 * config.dx * config.length_fraction as f64;
    let physical = snap_decade(target);
    let bar_px = ((physical / config.dx).round() as u32).max(1);
    let label = format!("{:.*} {}", label_decimals(physical), physical, config.units);

    let scale = glyph_scale(h);
    let pad = 2 * scale;
    let gap = scale;
    let text_w = font::text_width(&label, scale);
    let text_h = font::GLYPH_HEIGHT * scale;
    let content_w = bar_px.max(text_w);
    let box_w = content_w + 2 * pad;
    let box_h = text_h + gap + config.bar_height + 2 * pad;

    let bx = match config.location {
        Location::UpperLeft | Location::LowerLeft => config.border_pad,
        Location::UpperRight | Location::LowerRight => {
            w.saturating_sub(config.border_pad + box_w)
        }
    };
    let by = match config.location {
        Location::UpperLeft | Location::UpperRight => config.border_pad,
        Location::LowerLeft | Location::LowerRight => {
            h.saturating_sub(config.border_pad + box_h)
        }
    };

    fill_rect(image, bx, by, box_w, box_h, BLACK);
    draw_text(image, &label, bx + pad + (content_w - text_w) / 2, by + pad, scale);
    fill_rect(
        image,
        bx + pad + (content_w - bar_px) / 2,
        by + pad + text_h + gap,
        bar_px,
        config.bar_height,
        WHITE,
    );
    Ok(())
}

/// Draw the timestamp of frame `index` at the configured pixel position.
pub fn draw_timestamp(image: &mut GrayImage, config: &TimestampConfig, index: usize) -> Result<()> {
    config.validate()?;

    let seconds = index as f64 / config.fps;
    let width = config.digits_before_dec
        + if config.digits_after_dec > 0 {
            config.digits_after_dec + 1
        } else {
            0
        };
    let label = format!(
        "{seconds:0width$.prec$} {unit}",
        prec = config.digits_after_dec,
        unit = config.unit_label,
    );

    let scale = glyph_scale(image.height());
    let pad = 2 * scale;
    let text_w = font::text_width(&label, scale);
    let text_h = font::GLYPH_HEIGHT * scale;

    fill_rect(image, config.x, config.y, text_w + 2 * pad, text_h + 2 * pad, BLACK);
    draw_text(image, &label, config.x + pad, config.y + pad, scale);
    Ok(())
}

/// Integer glyph magnification so text stays legible on large frames.
fn glyph_scale(height: u32) -> u32 {
    (height / 128).max(1)
}

/// Largest 1-2-5 decade value not above `target`.
fn snap_decade(target: f64) -> f64 {
    let base = 10f64.powf(target.log10().floor());
    let mantissa = target / base;
    let nice = if mantissa >= 5.0 {
        5.0
    } else if mantissa >= 2.0 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Decimal places needed to print a snapped decade value exactly.
fn label_decimals(value: f64) -> usize {
    let exp = value.log10().floor() as i32;
    (-exp).max(0) as usize
}

fn draw_text(image: &mut GrayImage, text: &str, x: u32, y: u32, scale: u32) {
    let mut cursor = x;
    for c in text.chars() {
        let rows = font::glyph(c);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..font::GLYPH_WIDTH {
                if bits & (1 << (font::GLYPH_WIDTH - 1 - col)) != 0 {
                    fill_rect(
                        image,
                        cursor + col * scale,
                        y + row as u32 * scale,
                        scale,
                        scale,
                        WHITE,
                    );
                }
            }
        }
        cursor += (font::GLYPH_WIDTH + 1) * scale;
    }
}

/// Paint a rectangle, silently clipping anything outside the image.
fn fill_rect(image: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: u8) {
    for yy in y..y.saturating_add(h) {
        for xx in x..x.saturating_add(w) {
            if let Some(pixel) = image.get_pixel_mut_checked(xx, yy) {
                pixel.0[0] = value;
            }
        }
    }
}
