#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! Takes a rectangle of the complex plane and a raster size, maps each
//! pixel to a point in the rectangle, and iterates `z = z*z + c` from
//! that point with a fixed seed constant `c` until `|z|` reaches 2 or
//! an iteration cap runs out.  The number of steps taken picks a color
//! out of a 256-entry palette.
//!
//! Rendering is a function of its configuration: the same
//! RenderConfig and Palette always produce the same pixels.  The
//! raster itself is reached only through the ImageSink trait, so the
//! core does not care how, or whether, the picture is encoded.

pub mod config;
pub mod errors;
pub mod escape;
pub mod palette;
pub mod planes;
pub mod sink;

pub use config::{IterationParams, RenderConfig, RenderRegion, Resolution};
pub use errors::{RenderError, Result};
pub use escape::{escape_time, render, render_image, EscapeGrid, EscapeRenderer};
pub use palette::{palette_index, Palette, PaletteKind, Rgb};
pub use planes::{Pixel, PlaneMapper};
pub use sink::{Canvas, ImageSink};
