/// Default file extension for source micrographs.
pub const DEFAULT_SUFFIX: &str = "tif";

/// Default square window size for the median denoising pass.
pub const DEFAULT_MEDIAN_SIZE: usize = 3;

/// Default intensity clip percentiles applied to a corrected stack,
/// in percent units.
pub const DEFAULT_CLIP_PERCENTILES: (f32, f32) = (0.1, 99.9);

/// Default CLAHE clip limit as a fraction of a tile's pixel count.
pub const DEFAULT_CLAHE_CLIP_LIMIT: f32 = 0.01;

/// Default CLAHE tile grid (rows, columns).
pub const DEFAULT_CLAHE_TILES: (usize, usize) = (8, 8);

/// Default number of histogram bins for CLAHE.
pub const DEFAULT_CLAHE_BINS: usize = 256;

/// Default animation frame rate in frames per second.
pub const DEFAULT_GIF_FPS: u32 = 10;

/// Default scale bar length as a fraction of the frame width.
pub const DEFAULT_SCALEBAR_LENGTH_FRACTION: f32 = 0.25;

/// Default scale bar margin from the frame edges, in pixels.
pub const DEFAULT_SCALEBAR_BORDER_PAD: u32 = 8;

/// Default scale bar thickness in pixels.
pub const DEFAULT_SCALEBAR_HEIGHT: u32 = 4;

/// Default timestamp digit counts (before, after the decimal point).
pub const DEFAULT_TIMESTAMP_DIGITS: (usize, usize) = (3, 1);

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-10;
