//! crates/profile_pdf_core/src/viewer/watermark.rs
//!
//! Tiled watermark overlay for rendered page surfaces. The tile grid always
//! covers the full canvas; per-tile jitter varies the pattern between renders
//! so two renders of the same page never produce an identical overlay.

use image::{imageops, Rgba, RgbaImage};
use rand::Rng;

/// Tuning knobs for the overlay. Defaults match the production pattern:
/// tiles at 15% of the watermark's natural size, spaced 1.5 tile-widths
/// apart, drawn at 20% opacity with up to 10px of positional jitter.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    /// Tile size as a fraction of the watermark's natural dimensions.
    pub scale: f32,
    /// Grid spacing as a multiple of the tile dimensions, in both axes.
    pub spacing_factor: f32,
    /// Alpha applied to every tile.
    pub opacity: f32,
    /// Maximum absolute positional jitter per tile, in pixels.
    pub jitter: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            scale: 0.15,
            spacing_factor: 1.5,
            opacity: 0.2,
            jitter: 10.0,
        }
    }
}

/// The computed tile grid for one canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlan {
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Column/row counts include one extra line of tiles so jittered edge
    /// tiles cannot open a gap at the canvas border.
    pub cols: u32,
    pub rows: u32,
}

impl TilePlan {
    /// Lays out the grid for a canvas of `canvas_w` x `canvas_h` pixels and a
    /// watermark with the given natural dimensions.
    pub fn layout(
        canvas_w: u32,
        canvas_h: u32,
        natural_w: u32,
        natural_h: u32,
        options: &WatermarkOptions,
    ) -> Self {
        let tile_width = ((natural_w as f32 * options.scale).round() as u32).max(1);
        let tile_height = ((natural_h as f32 * options.scale).round() as u32).max(1);
        let spacing_x = tile_width as f32 * options.spacing_factor;
        let spacing_y = tile_height as f32 * options.spacing_factor;
        Self {
            tile_width,
            tile_height,
            spacing_x,
            spacing_y,
            cols: (canvas_w as f32 / spacing_x).ceil() as u32 + 1,
            rows: (canvas_h as f32 / spacing_y).ceil() as u32 + 1,
        }
    }

    /// The coverage floor: one tile per spacing-sized region of the canvas.
    pub fn minimum_tiles(&self, canvas_w: u32, canvas_h: u32) -> u32 {
        let cols = (canvas_w as f32 / self.spacing_x).ceil() as u32;
        let rows = (canvas_h as f32 / self.spacing_y).ceil() as u32;
        cols * rows
    }

    pub fn tile_count(&self) -> u32 {
        self.cols * self.rows
    }
}

/// Tiles `watermark` across `target` and returns the number of tiles drawn.
///
/// The watermark is downscaled once to the tile size, then stamped at every
/// grid position with independent random jitter. Tiles that fall partly
/// outside the canvas are clipped, not skipped.
pub fn overlay(target: &mut RgbaImage, watermark: &RgbaImage, options: &WatermarkOptions) -> u32 {
    let plan = TilePlan::layout(
        target.width(),
        target.height(),
        watermark.width(),
        watermark.height(),
        options,
    );
    let tile = imageops::resize(
        watermark,
        plan.tile_width,
        plan.tile_height,
        imageops::FilterType::Triangle,
    );

    let mut rng = rand::thread_rng();
    for row in 0..plan.rows {
        for col in 0..plan.cols {
            let mut x = col as f32 * plan.spacing_x - plan.tile_width as f32 / 2.0;
            let mut y = row as f32 * plan.spacing_y - plan.tile_height as f32 / 2.0;
            if options.jitter > 0.0 {
                x += rng.gen_range(-options.jitter..=options.jitter);
                y += rng.gen_range(-options.jitter..=options.jitter);
            }
            stamp(target, &tile, x.round() as i64, y.round() as i64, options.opacity);
        }
    }
    plan.tile_count()
}

/// Draws one tile at (x, y) with the given opacity, clipping at the canvas
/// edges. The page surface is opaque, so plain source-over blending against
/// an opaque background is sufficient.
fn stamp(target: &mut RgbaImage, tile: &RgbaImage, x: i64, y: i64, opacity: f32) {
    let target_w = target.width() as i64;
    let target_h = target.height() as i64;
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + tile.width() as i64).min(target_w);
    let y_end = (y + tile.height() as i64).min(target_h);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let src = tile.get_pixel((tx - x) as u32, (ty - y) as u32);
            let alpha = (src[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
            if alpha <= 0.0 {
                continue;
            }
            let dst = target.get_pixel_mut(tx as u32, ty as u32);
            for channel in 0..3 {
                let blended =
                    src[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
                dst[channel] = blended.clamp(0.0, 255.0) as u8;
            }
        }
    }
}
