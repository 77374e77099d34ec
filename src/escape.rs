// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time renderer.
//!
//! Every pixel is mapped to a point on the complex plane, and that
//! point becomes the starting value `z` of the recurrence
//! `z = z*z + c`, where `c` is the configured seed constant.  The
//! number of steps taken before `|z|` reaches 2, capped at the
//! iteration bound, is the pixel's escape count.  With `c` held fixed
//! and the pixel seeding `z`, the picture is a member of the Julia
//! family rather than the Mandelbrot set proper.
//!
//! Escape counts are computed into an EscapeGrid first, optionally by
//! several workers that each own a contiguous band of rows, and are
//! then colored and written to the sink one pixel at a time.

use itertools::iproduct;
use log::{debug, info, warn};
use num::Complex;

use crate::config::{IterationParams, RenderConfig};
use crate::errors::{RenderError, Result};
use crate::palette::Palette;
use crate::planes::{Pixel, PlaneMapper};
use crate::sink::{Canvas, ImageSink};

/// The modulus at which a point is considered to have escaped.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// Run the recurrence from `z0` and return how many steps it took to
/// reach the escape radius, or `max_iterations` if it never did.  A
/// start already outside the radius escapes in zero steps.
pub fn escape_time(z0: Complex<f64>, c: Complex<f64>, max_iterations: u32) -> u32 {
    let mut z = z0;
    let mut iterations = 0;
    while z.norm() < ESCAPE_RADIUS && iterations < max_iterations {
        z = z * z + c;
        iterations += 1;
    }
    iterations
}

/// Escape counts for a whole raster, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct EscapeGrid {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl EscapeGrid {
    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The escape count of one pixel.
    pub fn get(&self, pixel: &Pixel) -> Option<u32> {
        if pixel.0 >= self.width || pixel.1 >= self.height {
            return None;
        }
        Some(self.counts[pixel.1 * self.width + pixel.0])
    }

    /// All counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Every pixel with its count, row by row.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (Pixel, u32)> + 'a {
        let width = self.width;
        self.counts
            .iter()
            .enumerate()
            .map(move |(offset, &count)| (Pixel(offset % width, offset / width), count))
    }
}

/// Computes escape counts over a plane.  Once built it holds only
/// read-only configuration, so it can be shared by worker threads.
#[derive(Debug)]
pub struct EscapeRenderer {
    plane: PlaneMapper,
    params: IterationParams,
    threads: usize,
}

impl EscapeRenderer {
    /// Validates the configuration and works out the plane mapping.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(EscapeRenderer {
            plane: PlaneMapper::new(config.region, config.resolution)?,
            params: config.params,
            threads: config.threads,
        })
    }

    /// The coordinate mapping used for this render.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Escape count for a single pixel.
    pub fn escape_at(&self, pixel: &Pixel) -> u32 {
        let start = self.plane.pixel_to_point(pixel);
        escape_time(start, self.params.seed, self.params.max_iterations)
    }

    /// Fills `band` with the counts of the rows starting at `first_row`.
    fn fill_band(&self, first_row: usize, band: &mut [u32]) {
        let width = self.plane.resolution.width;
        for (offset, count) in band.iter_mut().enumerate() {
            let pixel = Pixel(offset % width, first_row + offset / width);
            *count = self.escape_at(&pixel);
        }
    }

    /// The single-threaded grid computation.
    pub fn escape_grid_single(&self) -> EscapeGrid {
        let resolution = self.plane.resolution;
        let counts = iproduct!(0..resolution.height, 0..resolution.width)
            .map(|(row, column)| self.escape_at(&Pixel(column, row)))
            .collect();
        EscapeGrid {
            width: resolution.width,
            height: resolution.height,
            counts,
        }
    }

    /// Splits the rows into one contiguous band per thread and computes
    /// each band on its own scoped worker.  Each worker writes only
    /// into the slice it was handed.
    pub fn escape_grid_threaded(&self, threads: usize) -> Result<EscapeGrid> {
        if threads == 0 {
            return Err(RenderError::ZeroThreads);
        }
        let resolution = self.plane.resolution;
        let rows_per_band =
            resolution.height / threads + if resolution.height % threads == 0 { 0 } else { 1 };
        let mut counts = vec![0u32; resolution.len()];

        crossbeam::scope(|spawner| {
            for (band, region) in counts.chunks_mut(rows_per_band * resolution.width).enumerate() {
                let first_row = band * rows_per_band;
                spawner.spawn(move |_| {
                    debug!(
                        "worker {} rendering rows {}..{}",
                        band,
                        first_row,
                        first_row + region.len() / resolution.width
                    );
                    self.fill_band(first_row, region);
                });
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)?;

        Ok(EscapeGrid {
            width: resolution.width,
            height: resolution.height,
            counts,
        })
    }

    /// Computes the grid with the configured number of threads.
    pub fn escape_grid(&self) -> Result<EscapeGrid> {
        if self.threads > 1 {
            self.escape_grid_threaded(self.threads)
        } else {
            Ok(self.escape_grid_single())
        }
    }

    /// Colors every pixel of `grid` and writes it to `sink`, once per
    /// pixel.
    pub fn paint<S: ImageSink>(&self, grid: &EscapeGrid, palette: &Palette, sink: &mut S) {
        for (Pixel(x, y), count) in grid.iter() {
            sink.set_pixel(x, y, palette.color_for(count, self.params.max_iterations));
        }
    }
}

/// Render `config` into `sink`.  The configuration and the sink size
/// are checked before any pixel is computed; on success every pixel
/// of the sink has been written exactly once and the escape counts
/// are returned.
pub fn render<S: ImageSink>(
    config: &RenderConfig,
    palette: &Palette,
    sink: &mut S,
) -> Result<EscapeGrid> {
    let renderer = EscapeRenderer::new(config)?;
    let resolution = config.resolution;
    if sink.width() != resolution.width || sink.height() != resolution.height {
        return Err(RenderError::SinkMismatch {
            sink_width: sink.width(),
            sink_height: sink.height(),
            width: resolution.width,
            height: resolution.height,
        });
    }

    let (ex, ey) = renderer.plane().epsilon();
    info!(
        "Render: c={}, bounds re [{}, {}] im [{}, {}], {}x{} pixels, epsilon ({:e}, {:e}), {} iterations, {} thread(s)",
        config.params.seed,
        config.region.x_min,
        config.region.x_max,
        config.region.y_min,
        config.region.y_max,
        resolution.width,
        resolution.height,
        ex,
        ey,
        config.params.max_iterations,
        config.threads
    );

    let grid = renderer.escape_grid()?;
    let max = config.params.max_iterations;
    if grid.counts().iter().all(|&n| n == max) {
        warn!("Every pixel is inside the set; the image will be a single color");
    } else if grid.counts().iter().all(|&n| n == 0) {
        warn!("Every pixel escaped immediately; the image will be a single color");
    }

    renderer.paint(&grid, palette, sink);
    info!("Render finished");
    Ok(grid)
}

/// Render `config` into a fresh Canvas, painted with the palette's
/// background first.
pub fn render_image(config: &RenderConfig, palette: &Palette) -> Result<Canvas> {
    config.validate()?;
    let mut canvas = Canvas::new(
        config.resolution.width,
        config.resolution.height,
        palette.background(),
    )?;
    render(config, palette, &mut canvas)?;
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RenderRegion, Resolution};

    fn config(width: usize, height: usize, max_iterations: u32) -> RenderConfig {
        RenderConfig::new(
            RenderRegion::default(),
            Resolution::new(width, height),
            IterationParams::new(max_iterations, Complex::new(-1.0, -0.25)),
        )
    }

    #[test]
    fn start_outside_radius_escapes_in_zero_steps() {
        let c = Complex::new(0.0, 0.0);
        assert_eq!(escape_time(Complex::new(2.0, 0.0), c, 50), 0);
        assert_eq!(escape_time(Complex::new(-1.5, -1.5), c, 50), 0);
    }

    #[test]
    fn fixed_point_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), Complex::new(0.0, 0.0), 77), 77);
    }

    #[test]
    fn escape_counts_steps() {
        // 1.5 -> 2.25: one step.
        assert_eq!(escape_time(Complex::new(1.5, 0.0), Complex::new(0.0, 0.0), 10), 1);
        // 1.1 -> 1.21 -> 1.4641 -> 2.1436...: three steps.
        assert_eq!(escape_time(Complex::new(1.1, 0.0), Complex::new(0.0, 0.0), 10), 3);
    }

    #[test]
    fn origin_with_default_seed_is_interior() {
        let seed = IterationParams::default().seed;
        assert_eq!(escape_time(Complex::new(0.0, 0.0), seed, 10), 10);
    }

    #[test]
    fn renderer_rejects_bad_config() {
        let mut bad = config(10, 10, 5);
        bad.region.x_min = 2.0;
        bad.region.x_max = -2.0;
        assert!(EscapeRenderer::new(&bad).is_err());
    }

    #[test]
    fn threaded_grid_matches_single() {
        let renderer = EscapeRenderer::new(&config(37, 23, 25)).unwrap();
        let single = renderer.escape_grid_single();
        for threads in 1..6 {
            assert_eq!(renderer.escape_grid_threaded(threads).unwrap(), single);
        }
        // More workers than rows.
        assert_eq!(renderer.escape_grid_threaded(40).unwrap(), single);
        assert_eq!(renderer.escape_grid_threaded(std::usize::MAX).unwrap(), single);
    }

    #[test]
    fn oversized_config_is_rejected_before_rendering() {
        let huge = config(std::usize::MAX, std::usize::MAX, 10).with_threads(2);
        match EscapeRenderer::new(&huge) {
            Err(RenderError::OversizedResolution { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
        match render_image(&huge, &Palette::default()) {
            Err(err) => assert!(err.is_configuration()),
            Ok(_) => panic!("oversized render succeeded"),
        }
    }

    #[test]
    fn grid_is_row_major() {
        let renderer = EscapeRenderer::new(&config(5, 3, 20)).unwrap();
        let grid = renderer.escape_grid_single();
        assert_eq!(grid.counts().len(), 15);
        for (pixel, count) in grid.iter() {
            assert_eq!(grid.get(&pixel), Some(count));
            assert_eq!(renderer.escape_at(&pixel), count);
        }
        assert_eq!(grid.get(&Pixel(5, 0)), None);
    }

    #[test]
    fn render_image_paints_through_the_palette() {
        let palette = Palette::grayscale();
        let cfg = config(16, 16, 10);
        let canvas = render_image(&cfg, &palette).unwrap();
        let renderer = EscapeRenderer::new(&cfg).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                let count = renderer.escape_at(&Pixel(x, y));
                assert_eq!(canvas.get_pixel(x, y), palette.color_for(count, 10));
            }
        }
    }

    #[test]
    fn render_rejects_a_mismatched_sink() {
        let mut canvas = Canvas::new(4, 4, Palette::default().background()).unwrap();
        let result = render(&config(5, 4, 10), &Palette::default(), &mut canvas);
        assert_eq!(
            result,
            Err(RenderError::SinkMismatch {
                sink_width: 4,
                sink_height: 4,
                width: 5,
                height: 4
            })
        );
    }
}
