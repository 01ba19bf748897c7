use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CLAHE_BINS, DEFAULT_CLAHE_CLIP_LIMIT, DEFAULT_CLAHE_TILES};
use crate::frame::Frame;

/// Parameters for contrast-limited adaptive histogram equalization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClaheConfig {
    /// Histogram clip limit as a fraction of a tile's pixel count.
    #[serde(default = "default_clip_limit")]
    pub clip_limit: f32,
    /// Tile grid as (rows, columns).
    #[serde(default = "default_tiles")]
    pub tiles: (usize, usize),
    /// Number of histogram bins.
    #[serde(default = "default_nbins")]
    pub nbins: usize,
}

fn default_clip_limit() -> f32 {
    DEFAULT_CLAHE_CLIP_LIMIT
}

fn default_tiles() -> (usize, usize) {
    DEFAULT_CLAHE_TILES
}

fn default_nbins() -> usize {
    DEFAULT_CLAHE_BINS
}

impl Default for ClaheConfig {
    fn default() -> Self {
        Self {
            clip_limit: default_clip_limit(),
            tiles: default_tiles(),
            nbins: default_nbins(),
        }
    }
}

/// Apply contrast-limited adaptive histogram equalization to a frame.
///
/// Input values are clamped to [0, 1]; output values stay in [0, 1].
/// The frame is tiled per `config.tiles`, each tile gets a clipped
/// histogram whose excess is redistributed uniformly, and every pixel is
/// remapped by bilinear interpolation between the four surrounding tile
/// mappings.
pub fn equalize_adaptive(frame: &Frame, config: &ClaheConfig) -> Frame {
    let data = equalize_adaptive_array(&frame.data, config);
    Frame::new(data, frame.original_bit_depth)
}

/// CLAHE over a raw array. See [`equalize_adaptive`].
pub fn equalize_adaptive_array(data: &Array2<f32>, config: &ClaheConfig) -> Array2<f32> {
    let (h, w) = data.dim();
    let nbins = config.nbins.max(2);
    let (tiles_y, tiles_x) = (config.tiles.0.max(1), config.tiles.1.max(1));

    let tile_h = h.div_ceil(tiles_y).max(1);
    let tile_w = w.div_ceil(tiles_x).max(1);
    // Edge tiles may be smaller; the grid dims follow from the tile size.
    let n_ty = h.div_ceil(tile_h);
    let n_tx = w.div_ceil(tile_w);

    // Per-tile lookup tables mapping bin index -> equalized value.
    let mut luts: Vec<Vec<f32>> = Vec::with_capacity(n_ty * n_tx);
    for ty in 0..n_ty {
        let row_range = ty * tile_h..((ty + 1) * tile_h).min(h);
        for tx in 0..n_tx {
            let col_range = tx * tile_w..((tx + 1) * tile_w).min(w);
            let tile = data.slice(ndarray::s![row_range.clone(), col_range]);
            luts.push(tile_lut(&tile, nbins, config.clip_limit));
        }
    }

    let mut result = Array2::<f32>::zeros((h, w));
    for row in 0..h {
        let (ty0, ty1, wy) = interp_coords(row, tile_h, n_ty);
        for col in 0..w {
            let (tx0, tx1, wx) = interp_coords(col, tile_w, n_tx);
            let bin = value_bin(data[[row, col]], nbins);

            let v00 = luts[ty0 * n_tx + tx0][bin];
            let v01 = luts[ty0 * n_tx + tx1][bin];
            let v10 = luts[ty1 * n_tx + tx0][bin];
            let v11 = luts[ty1 * n_tx + tx1][bin];

            let top = v00 * (1.0 - wx) + v01 * wx;
            let bottom = v10 * (1.0 - wx) + v11 * wx;
            result[[row, col]] = top * (1.0 - wy) + bottom * wy;
        }
    }

    result
}

/// Clipped-histogram CDF mapping for one tile.
fn tile_lut(tile: &ndarray::ArrayView2<f32>, nbins: usize, clip_limit: f32) -> Vec<f32> {
    let pixels = tile.len() as f32;
    let mut hist = vec![0.0f32; nbins];
    for &v in tile.iter() {
        hist[value_bin(v, nbins)] += 1.0;
    }

    // Clip and redistribute the excess uniformly.
    let limit = (clip_limit * pixels / nbins as f32).max(1.0);
    let mut excess = 0.0f32;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }
    let share = excess / nbins as f32;
    for count in hist.iter_mut() {
        *count += share;
    }

    // CDF, normalized so the first occupied bin maps to 0 and the last to 1.
    let mut lut = vec![0.0f32; nbins];
    let mut cdf = 0.0f32;
    let mut cdf_min = f32::NAN;
    for (bin, &count) in hist.iter().enumerate() {
        cdf += count;
        if cdf_min.is_nan() && count > 0.0 {
            cdf_min = cdf;
        }
        lut[bin] = cdf;
    }
    let denom = pixels - cdf_min;
    if denom <= 0.0 {
        // Degenerate tile (all mass in one bin, no redistribution):
        // fall back to the identity mapping.
        for (bin, v) in lut.iter_mut().enumerate() {
            *v = bin as f32 / (nbins - 1) as f32;
        }
    } else {
        for v in lut.iter_mut() {
            *v = ((*v - cdf_min) / denom).clamp(0.0, 1.0);
        }
    }
    lut
}

fn value_bin(v: f32, nbins: usize) -> usize {
    ((v.clamp(0.0, 1.0) * nbins as f32) as usize).min(nbins - 1)
}

/// Tile-space interpolation coordinates for a pixel position: the two
/// neighboring tile indices and the weight of the second one.
fn interp_coords(pos: usize, tile: usize, n: usize) -> (usize, usize, f32) {
    let f = (pos as f32 + 0.5) / tile as f32 - 0.5;
    if f <= 0.0 {
        return (0, 0, 0.0);
    }
    let i = f.floor() as usize;
    if i >= n - 1 {
        return (n - 1, n - 1, 0.0);
    }
    (i, i + 1, f - i as f32)
}
