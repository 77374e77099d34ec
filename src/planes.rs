// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane given by a RenderRegion.
//! The step size along each axis is worked out once, when the mapper
//! is built, and every pixel of a render is mapped with those same
//! two numbers.
use num::Complex;

use crate::config::{RenderRegion, Resolution};
use crate::errors::Result;

/// Describes the x, y of a pixel on the raster.  x runs along the
/// real axis and y along the imaginary axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels to points on the complex plane and back.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The raster; its left-lower corner is pixel 0,0.
    pub resolution: Resolution,
    /// The complex rectangle covered by the raster.
    pub region: RenderRegion,
    // Plane distance covered by one pixel step, real then imaginary.
    epsilon: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Fails if the region or the resolution is not
    /// usable, so a mapper that exists always has positive steps.
    pub fn new(region: RenderRegion, resolution: Resolution) -> Result<PlaneMapper> {
        region.validate()?;
        resolution.validate()?;

        let epsilon = (
            region.width() / (resolution.width as f64),
            region.height() / (resolution.height as f64),
        );

        Ok(PlaneMapper {
            resolution,
            region,
            epsilon,
        })
    }

    /// The per-axis step size, real axis first.
    pub fn epsilon(&self) -> (f64, f64) {
        self.epsilon
    }

    /// The total number of pixels in the raster.
    pub fn len(&self) -> usize {
        self.resolution.len()
    }

    /// Never true for a constructed mapper; here for symmetry with len().
    pub fn is_empty(&self) -> bool {
        self.resolution.is_empty()
    }

    /// Given a pixel, return the point on the complex plane at its
    /// corner.  Pixel indices one past the raster are accepted and
    /// land on the far edge of the region.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.region.x_min + (pixel.0 as f64) * self.epsilon.0,
            self.region.y_min + (pixel.1 as f64) * self.epsilon.1,
        )
    }

    /// Given a point on the complex plane, return the nearest pixel,
    /// or None if that pixel is not on the raster.  Callers must not
    /// write anything for a None.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let left = ((point.re - self.region.x_min) / self.epsilon.0).round();
        let top = ((point.im - self.region.y_min) / self.epsilon.1).round();
        if !(left >= 0.0 && top >= 0.0) {
            return None;
        }
        let (left, top) = (left as usize, top as usize);
        if left >= self.resolution.width || top >= self.resolution.height {
            return None;
        }
        Some(Pixel(left, top))
    }

    /// The linear, row-major offset of a point's pixel in a buffer of
    /// len() entries.
    pub fn point_to_offset(&self, point: &Complex<f64>) -> Option<usize> {
        self.point_to_pixel(point)
            .map(|Pixel(left, top)| top * self.resolution.width + left)
    }
}
