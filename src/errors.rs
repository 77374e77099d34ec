// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can fail.  Configuration problems are caught
//! before any pixel work starts; a save failure happens after the
//! render and leaves the rendered buffer untouched.

use failure::Fail;

/// The axis of the complex plane a bound belongs to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Axis {
    /// The real axis, x on the raster.
    Real,
    /// The imaginary axis, y on the raster.
    Imaginary,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Axis::Real => write!(f, "real"),
            Axis::Imaginary => write!(f, "imaginary"),
        }
    }
}

/// Errors raised while configuring, rendering or saving an image.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The minimum bound is not strictly below the maximum bound.
    #[fail(
        display = "Degenerate region on the {} axis: minimum {} is not below maximum {}",
        axis, min, max
    )]
    DegenerateRegion {
        /// The offending axis.
        axis: Axis,
        /// The lower bound supplied.
        min: f64,
        /// The upper bound supplied.
        max: f64,
    },

    /// One of the region bounds is NaN or infinite.
    #[fail(display = "Region bounds must be finite numbers")]
    NonFiniteBound,

    /// A raster with no pixels on one axis.
    #[fail(display = "Resolution must be positive, got {}x{}", width, height)]
    EmptyResolution {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// A raster too large to address or allocate.  Each axis must fit
    /// in a u32 and the RGB buffer in a usize.
    #[fail(display = "Resolution {}x{} is too large to render", width, height)]
    OversizedResolution {
        /// Requested width in pixels, saturated.
        width: usize,
        /// Requested height in pixels, saturated.
        height: usize,
    },

    /// The iteration bound must allow at least one step.
    #[fail(display = "Maximum iteration count must be positive")]
    ZeroIterations,

    /// The step size used to derive a resolution is unusable.
    #[fail(display = "Step size must be a positive finite number, got {}", _0)]
    BadEpsilon(f64),

    /// A render needs at least one worker.
    #[fail(display = "Thread count must be at least 1")]
    ZeroThreads,

    /// The sink handed to the renderer is not the configured size.
    #[fail(
        display = "Image sink is {}x{} but the render resolution is {}x{}",
        sink_width, sink_height, width, height
    )]
    SinkMismatch {
        /// Sink width.
        sink_width: usize,
        /// Sink height.
        sink_height: usize,
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },

    /// A palette that cannot be used.
    #[fail(display = "Bad palette: {}", _0)]
    BadPalette(String),

    /// The image could not be written.
    #[fail(display = "Could not save image to {}: {}", path, reason)]
    Save {
        /// Destination that failed.
        path: String,
        /// What the encoder or filesystem reported.
        reason: String,
    },

    /// A render worker died before finishing its band.
    #[fail(display = "A render worker thread panicked")]
    WorkerPanicked,
}

impl RenderError {
    /// True for errors that are raised before rendering starts because
    /// the supplied configuration is unusable.
    pub fn is_configuration(&self) -> bool {
        match self {
            RenderError::Save { .. } | RenderError::WorkerPanicked => false,
            _ => true,
        }
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, RenderError>;
