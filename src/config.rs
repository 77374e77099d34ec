// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The immutable description of a single render.  Nothing here is
//! mutated by rendering; a new render takes a new (or the same)
//! configuration value.

use num::Complex;

use crate::errors::{Axis, RenderError, Result};

/// The rectangle of the complex plane to rasterize.  The real part
/// runs along x, the imaginary part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderRegion {
    /// Left edge on the real axis.
    pub x_min: f64,
    /// Bottom edge on the imaginary axis.
    pub y_min: f64,
    /// Right edge on the real axis.
    pub x_max: f64,
    /// Top edge on the imaginary axis.
    pub y_max: f64,
}

impl RenderRegion {
    /// Build a region from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Self {
        RenderRegion {
            x_min: leftlower.re,
            y_min: leftlower.im,
            x_max: rightupper.re,
            y_max: rightupper.im,
        }
    }

    /// Width of the region on the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the region on the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Checks that all bounds are finite and that each maximum lies
    /// strictly above its minimum.
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.x_min, self.y_min, self.x_max, self.y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(RenderError::NonFiniteBound);
        }
        if self.x_max <= self.x_min {
            return Err(RenderError::DegenerateRegion {
                axis: Axis::Real,
                min: self.x_min,
                max: self.x_max,
            });
        }
        if self.y_max <= self.y_min {
            return Err(RenderError::DegenerateRegion {
                axis: Axis::Imaginary,
                min: self.y_min,
                max: self.y_max,
            });
        }
        Ok(())
    }
}

impl Default for RenderRegion {
    fn default() -> Self {
        RenderRegion {
            x_min: -2.0,
            y_min: -2.0,
            x_max: 2.0,
            y_max: 2.0,
        }
    }
}

/// Size of the raster in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Pixels along x.
    pub width: usize,
    /// Pixels along y.
    pub height: usize,
}

impl Resolution {
    /// Constructor.
    pub fn new(width: usize, height: usize) -> Self {
        Resolution { width, height }
    }

    /// Derives a resolution from the plane distance a single pixel
    /// should cover.  Partial pixels at the far edges are dropped.
    pub fn from_epsilon(region: &RenderRegion, epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(RenderError::BadEpsilon(epsilon));
        }
        region.validate()?;
        let width = (region.width() / epsilon).floor();
        let height = (region.height() / epsilon).floor();
        // Float to int casts saturate, so the limit is checked first.
        let limit = f64::from(std::u32::MAX);
        if !(width <= limit && height <= limit) {
            return Err(RenderError::OversizedResolution {
                width: width as usize,
                height: height as usize,
            });
        }
        let resolution = Resolution {
            width: width as usize,
            height: height as usize,
        };
        resolution.validate()?;
        Ok(resolution)
    }

    /// Total number of pixels.  Only meaningful for a validated
    /// resolution; saturates otherwise.
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// True if either axis has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rejects rasters with no pixels, axes that do not fit in a u32,
    /// and rasters whose RGB buffer size overflows a usize.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(RenderError::EmptyResolution {
                width: self.width,
                height: self.height,
            });
        }
        let limit = std::u32::MAX as u64;
        let buffer = self
            .width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(3));
        if self.width as u64 > limit || self.height as u64 > limit || buffer.is_none() {
            return Err(RenderError::OversizedResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::new(1024, 1024)
    }
}

/// The bound on the inner loop and the constant added on every step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationParams {
    /// Iteration cap; reaching it means the point did not escape.
    pub max_iterations: u32,
    /// The `c` in `z = z*z + c`.
    pub seed: Complex<f64>,
}

impl IterationParams {
    /// Constructor.
    pub fn new(max_iterations: u32, seed: Complex<f64>) -> Self {
        IterationParams {
            max_iterations,
            seed,
        }
    }

    /// Rejects a zero iteration cap.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(RenderError::ZeroIterations);
        }
        Ok(())
    }
}

impl Default for IterationParams {
    fn default() -> Self {
        IterationParams::new(10, Complex::new(-1.0, -0.25))
    }
}

/// Everything a render needs, bundled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// The plane rectangle.
    pub region: RenderRegion,
    /// The raster size.
    pub resolution: Resolution,
    /// Iteration bound and seed constant.
    pub params: IterationParams,
    /// Number of worker threads computing escape counts.
    pub threads: usize,
}

impl RenderConfig {
    /// Single-threaded configuration.
    pub fn new(region: RenderRegion, resolution: Resolution, params: IterationParams) -> Self {
        RenderConfig {
            region,
            resolution,
            params,
            threads: 1,
        }
    }

    /// Same configuration, different worker count.
    pub fn with_threads(self, threads: usize) -> Self {
        RenderConfig { threads, ..self }
    }

    /// Runs every configuration check.  Renders call this before doing
    /// any work.
    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        self.resolution.validate()?;
        self.params.validate()?;
        if self.threads == 0 {
            return Err(RenderError::ZeroThreads);
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig::new(
            RenderRegion::default(),
            Resolution::default(),
            IterationParams::default(),
        )
    }
}
