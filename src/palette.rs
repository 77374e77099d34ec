// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Palettes and the policy that turns an escape count into a color.
//!
//! The policy is deliberately the old one: a point that escapes after
//! few iterations gets a *high* palette index (`255 / iterations`),
//! and both "escaped immediately" and "never escaped" get index 0.
//! Images made with it are compared pixel-for-pixel against older
//! renders, so it must not drift.

use std::str::FromStr;

use num::clamp;

use crate::errors::{RenderError, Result};

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

/// The palette index used for points inside the set.
pub const INTERIOR_INDEX: usize = 0;

/// An opaque RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Map an escape count to a palette index.
pub fn palette_index(iterations: u32, max_iterations: u32) -> usize {
    if iterations == 0 || iterations >= max_iterations {
        return INTERIOR_INDEX;
    }
    clamp((255 / iterations) as usize, 0, PALETTE_SIZE - 1)
}

/// The named palettes the renderer ships with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PaletteKind {
    /// The Plan 9 color map.
    Plan9,
    /// 256 grey levels from black to white.
    Grayscale,
}

impl FromStr for PaletteKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plan9" => Ok(PaletteKind::Plan9),
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(PaletteKind::Grayscale),
            other => Err(RenderError::BadPalette(format!("unknown palette '{}'", other))),
        }
    }
}

/// An immutable table of exactly 256 colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Takes ownership of a caller-supplied table, which must have
    /// exactly PALETTE_SIZE entries.
    pub fn from_colors(colors: Vec<Rgb>) -> Result<Self> {
        if colors.len() != PALETTE_SIZE {
            return Err(RenderError::BadPalette(format!(
                "expected {} colors, got {}",
                PALETTE_SIZE,
                colors.len()
            )));
        }
        Ok(Palette { colors })
    }

    /// One of the built-in palettes.
    pub fn named(kind: PaletteKind) -> Self {
        match kind {
            PaletteKind::Plan9 => Palette::plan9(),
            PaletteKind::Grayscale => Palette::grayscale(),
        }
    }

    /// The Plan 9 color map: a 4x4x4 RGB cube at four intensities,
    /// with grey ramps where the cube coordinate is black.
    pub fn plan9() -> Self {
        let mut colors = vec![Rgb(0, 0, 0); PALETTE_SIZE];
        let mut base = 0;
        for r in 0..4i32 {
            for v in 0..4i32 {
                let mut j = v - r;
                for g in 0..4i32 {
                    for b in 0..4i32 {
                        let den = r.max(g).max(b);
                        let color = if den == 0 {
                            let grey = (v * 17) as u8;
                            Rgb(grey, grey, grey)
                        } else {
                            let num = 17 * (4 * den + v);
                            Rgb(
                                (r * num / den) as u8,
                                (g * num / den) as u8,
                                (b * num / den) as u8,
                            )
                        };
                        colors[base + (j & 15) as usize] = color;
                        j += 1;
                    }
                }
                base += 16;
            }
        }
        Palette { colors }
    }

    /// Entry i is the grey (i, i, i).
    pub fn grayscale() -> Self {
        Palette {
            colors: (0..PALETTE_SIZE).map(|i| Rgb(i as u8, i as u8, i as u8)).collect(),
        }
    }

    /// Color at a palette index.  Indices past the end are clamped to
    /// the last entry.
    pub fn lookup(&self, index: usize) -> Rgb {
        self.colors[index.min(PALETTE_SIZE - 1)]
    }

    /// The color an escape count is drawn with.
    pub fn color_for(&self, iterations: u32, max_iterations: u32) -> Rgb {
        self.lookup(palette_index(iterations, max_iterations))
    }

    /// The color painted on a fresh canvas before rendering.
    pub fn background(&self) -> Rgb {
        self.lookup(INTERIOR_INDEX)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::plan9()
    }
}
