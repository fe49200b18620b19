//! Raster assembly for sampled plots
//!
//! The thin boundary between the sampling pipeline and whatever encodes the
//! frames: a [`Plot`] becomes a flat RGB [`Raster`] (white background, heat
//! pixels, axis lines, y growing upward), and [`palette`] exposes the full
//! colour table so an encoder can reuse one global palette for every frame
//! of an animation.
mod heat;

pub use heat::{heat_colour, heat_palette, Colour, AXIS, BLACK, WHITE};

use crate::plot::Plot;

/// A flat RGB raster, row-major from the top-left corner
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Colour>,
}

impl Raster {
    fn filled(width: usize, height: usize, colour: Colour) -> Self {
        Self {
            width,
            height,
            pixels: vec![colour; width * height],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixels, top row first
    pub fn pixels(&self) -> &[Colour] {
        &self.pixels
    }

    /// Flattened RGB bytes, three per pixel
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    fn set(&mut self, col: usize, row: usize, colour: Colour) {
        self.pixels[row * self.width + col] = colour;
    }
}

/// Global colour table for an animation
///
/// Axis colour, white, black, then the complete heat scale for
/// `bucket_count`, stable across frames, which is what lets an encoder
/// reuse one global colour table.  Stays within 256 entries for
/// `bucket_count ≤ 126`.
pub fn palette(bucket_count: usize) -> Vec<Colour> {
    let mut colours = vec![AXIS, WHITE, BLACK];
    colours.extend(heat_palette(bucket_count));
    colours
}

/// Renders one plot as an RGB raster
///
/// White background, heat-coloured samples, axis lines through the origin
/// cells drawn over everything else, grid y growing upward, and integer
/// magnification by `scale`.
pub fn rasterise(plot: &Plot, bucket_count: usize, scale: usize) -> Raster {
    let rect = plot.rect();
    let mut raster = Raster::filled(rect.width() * scale, rect.height() * scale, WHITE);
    for x in rect.min_x..rect.max_x {
        for y in rect.min_y..rect.max_y {
            let colour = if x == 0 || y == 0 {
                AXIS
            } else {
                heat_colour(bucket_count, plot.get(x, y)).unwrap_or(WHITE)
            };
            let col = (x - rect.min_x) as usize;
            let row = (rect.max_y - 1 - y) as usize;
            for sx in 0..scale {
                for sy in 0..scale {
                    raster.set(col * scale + sx, row * scale + sy, colour);
                }
            }
        }
    }
    raster
}
