// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where rendered pixels go.  The renderer only knows the ImageSink
//! trait; Canvas is the implementation backed by the `image` crate,
//! which also knows how to encode itself to disk.

use std::convert::TryFrom;
use std::path::Path;

use image::{Rgb as ImageRgb, RgbImage};

use crate::errors::{RenderError, Result};
use crate::palette::Rgb;

/// A raster that accepts colors by pixel coordinate and can persist
/// itself.  The renderer never passes coordinates outside
/// `[0, width) x [0, height)`.
pub trait ImageSink {
    /// Store one pixel.
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb);
    /// Width in pixels.
    fn width(&self) -> usize;
    /// Height in pixels.
    fn height(&self) -> usize;
    /// Write the raster to `path`.  The raster stays usable whether or
    /// not this succeeds.
    fn save(&self, path: &Path) -> Result<()>;
}

/// An in-memory RGB raster.
pub struct Canvas {
    data: RgbImage,
}

impl Canvas {
    /// A canvas of the given size, every pixel set to `background`.
    /// Both sides must fit in a u32.
    pub fn new(width: usize, height: usize, background: Rgb) -> Result<Self> {
        let oversized = || RenderError::OversizedResolution { width, height };
        let w = u32::try_from(width).map_err(|_| oversized())?;
        let h = u32::try_from(height).map_err(|_| oversized())?;
        let Rgb(r, g, b) = background;
        Ok(Canvas {
            data: RgbImage::from_pixel(w, h, ImageRgb([r, g, b])),
        })
    }

    /// Read a pixel back.  Coordinates are below width and height,
    /// which fit in a u32.
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb {
        let ImageRgb([r, g, b]) = *self.data.get_pixel(x as u32, y as u32);
        Rgb(r, g, b)
    }

    /// The raw interleaved RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl ImageSink for Canvas {
    // x and y are below width() and height(), so the casts are lossless.
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let Rgb(r, g, b) = color;
        self.data.put_pixel(x as u32, y as u32, ImageRgb([r, g, b]));
    }

    fn width(&self) -> usize {
        self.data.width() as usize
    }

    fn height(&self) -> usize {
        self.data.height() as usize
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.data.save(path).map_err(|err| RenderError::Save {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }
}
