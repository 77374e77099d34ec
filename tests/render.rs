// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use escapetime::errors::Axis;
use escapetime::{
    render, render_image, EscapeRenderer, ImageSink, IterationParams, Palette, Pixel,
    PlaneMapper, RenderConfig, RenderError, RenderRegion, Resolution, Rgb,
};
use num::Complex;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::path::Path;

/// Remembers every write so tests can check coverage and bounds.
struct RecordingSink {
    width: usize,
    height: usize,
    writes: Vec<(usize, usize, Rgb)>,
}

impl RecordingSink {
    fn new(width: usize, height: usize) -> Self {
        RecordingSink {
            width,
            height,
            writes: vec![],
        }
    }
}

impl ImageSink for RecordingSink {
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        assert!(x < self.width && y < self.height, "write out of bounds at {},{}", x, y);
        self.writes.push((x, y, color));
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn save(&self, _path: &Path) -> escapetime::Result<()> {
        Ok(())
    }
}

fn config(width: usize, height: usize, max_iterations: u32) -> RenderConfig {
    RenderConfig::new(
        RenderRegion::default(),
        Resolution::new(width, height),
        IterationParams::new(max_iterations, Complex::new(-1.0, -0.25)),
    )
}

#[test]
fn every_pixel_is_written_exactly_once() {
    let mut sink = RecordingSink::new(31, 17);
    render(&config(31, 17, 12), &Palette::default(), &mut sink).unwrap();
    assert_eq!(sink.writes.len(), 31 * 17);
    let mut seen = vec![false; 31 * 17];
    for &(x, y, _) in &sink.writes {
        assert!(!seen[y * 31 + x], "pixel {},{} written twice", x, y);
        seen[y * 31 + x] = true;
    }
}

#[test]
fn escape_counts_stay_within_bounds() {
    let mut sink = RecordingSink::new(64, 48);
    let grid = render(&config(64, 48, 20), &Palette::default(), &mut sink).unwrap();
    assert!(grid.counts().iter().all(|&n| n <= 20));
    assert!(grid.counts().iter().any(|&n| n == 20));
    assert!(grid.counts().iter().any(|&n| n < 20));
}

#[test]
fn center_pixel_regression() {
    let cfg = config(100, 100, 10);
    let renderer = EscapeRenderer::new(&cfg).unwrap();
    assert_eq!(renderer.plane().pixel_to_point(&Pixel(50, 50)), Complex::new(0.0, 0.0));
    assert_eq!(renderer.escape_at(&Pixel(50, 50)), 10);

    let canvas = render_image(&cfg, &Palette::default()).unwrap();
    assert_eq!(canvas.get_pixel(50, 50), Palette::default().lookup(0));
}

#[test]
fn single_iteration_gives_zero_or_one() {
    let mut sink = RecordingSink::new(40, 40);
    let grid = render(&config(40, 40, 1), &Palette::default(), &mut sink).unwrap();
    assert!(grid.counts().iter().all(|&n| n == 0 || n == 1));
    assert!(grid.counts().contains(&0));
    assert!(grid.counts().contains(&1));
}

#[test]
fn reversed_bounds_never_touch_the_sink() {
    let mut cfg = config(10, 10, 10);
    cfg.region.x_min = 2.0;
    cfg.region.x_max = -2.0;
    let mut sink = RecordingSink::new(10, 10);
    let result = render(&cfg, &Palette::default(), &mut sink);
    assert_eq!(
        result,
        Err(RenderError::DegenerateRegion {
            axis: Axis::Real,
            min: 2.0,
            max: -2.0
        })
    );
    assert!(result.unwrap_err().is_configuration());
    assert!(sink.writes.is_empty());
}

#[test]
fn zero_resolution_is_rejected() {
    let mut sink = RecordingSink::new(0, 5);
    let result = render(&config(0, 5, 10), &Palette::default(), &mut sink);
    assert_eq!(result, Err(RenderError::EmptyResolution { width: 0, height: 5 }));
    assert!(sink.writes.is_empty());
}

#[test]
fn unallocatable_resolution_is_rejected() {
    let mut sink = RecordingSink::new(1, 1);
    let cfg = config(std::usize::MAX, std::usize::MAX, 10).with_threads(2);
    let result = render(&cfg, &Palette::default(), &mut sink);
    assert_eq!(
        result,
        Err(RenderError::OversizedResolution {
            width: std::usize::MAX,
            height: std::usize::MAX
        })
    );
    assert!(sink.writes.is_empty());

    let tiny_step = Resolution::from_epsilon(&RenderRegion::default(), 1e-300);
    assert!(tiny_step.unwrap_err().is_configuration());
}

#[test]
fn one_by_one_writes_only_the_origin() {
    let mut sink = RecordingSink::new(1, 1);
    let grid = render(&config(1, 1, 10), &Palette::default(), &mut sink).unwrap();
    assert_eq!(sink.writes.len(), 1);
    assert_eq!((sink.writes[0].0, sink.writes[0].1), (0, 0));
    assert_eq!(grid.counts().len(), 1);
}

#[test]
fn renders_are_deterministic() {
    let cfg = config(80, 60, 30);
    let first = render_image(&cfg, &Palette::plan9()).unwrap();
    let second = render_image(&cfg, &Palette::plan9()).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());

    let threaded = render_image(&cfg.with_threads(4), &Palette::plan9()).unwrap();
    assert_eq!(first.as_bytes(), threaded.as_bytes());
}

#[test]
fn corners_map_to_region_bounds() {
    let region = RenderRegion {
        x_min: -1.25,
        y_min: -0.5,
        x_max: 0.75,
        y_max: 1.5,
    };
    let pm = PlaneMapper::new(region, Resolution::new(333, 211)).unwrap();
    let (ex, ey) = pm.epsilon();
    assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-1.25, -0.5));
    let far = pm.pixel_to_point(&Pixel(333, 211));
    assert!((far.re - 0.75).abs() <= ex);
    assert!((far.im - 1.5).abs() <= ey);
}

#[test]
fn pixel_point_round_trip() {
    let region = RenderRegion {
        x_min: -0.7453,
        y_min: 0.1102,
        x_max: -0.7433,
        y_max: 0.1122,
    };
    let resolution = Resolution::new(1000, 750);
    let pm = PlaneMapper::new(region, resolution).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5000 {
        let pixel = Pixel(
            rng.gen_range(0, resolution.width),
            rng.gen_range(0, resolution.height),
        );
        assert_eq!(pm.point_to_pixel(&pm.pixel_to_point(&pixel)), Some(pixel));
    }
    for &pixel in &[Pixel(0, 0), Pixel(999, 0), Pixel(0, 749), Pixel(999, 749)] {
        assert_eq!(pm.point_to_pixel(&pm.pixel_to_point(&pixel)), Some(pixel));
    }
}

#[test]
fn custom_palette_is_used() {
    let colors: Vec<Rgb> = (0..256).map(|i| Rgb(i as u8, 0, 255 - i as u8)).collect();
    let palette = Palette::from_colors(colors).unwrap();
    let cfg = config(20, 20, 10);
    let canvas = render_image(&cfg, &palette).unwrap();
    let renderer = EscapeRenderer::new(&cfg).unwrap();
    let count = renderer.escape_at(&Pixel(0, 0));
    assert_eq!(canvas.get_pixel(0, 0), palette.color_for(count, 10));
}
