// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a raster of pixels with an origin at 0,0 and a rectangle
//! on the complex plane bounded by four edges.
//!
//! Row 0 of the raster samples the `bottom` edge and the rows walk
//! towards `top`.  With the default viewport (`top` = -1, `bottom` =
//! 1) that puts the positive imaginary axis at the top of the screen.
use num::Complex;

/// The four edges of a rectangle in the complex plane.  `left` and
/// `right` bound the real axis, `top` and `bottom` the imaginary axis.
/// Nothing here insists that `left < right`; a mirrored viewport
/// renders a mirrored image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real value at raster column 0.
    pub left: f64,
    /// Real value one pixel past the last raster column.
    pub right: f64,
    /// Imaginary value approached by the last raster row.
    pub top: f64,
    /// Imaginary value at raster row 0.
    pub bottom: f64,
}

impl Viewport {
    /// Build a viewport from its four edges.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Viewport {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Width of the viewport along the real axis.
    pub fn span_re(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the viewport along the imaginary axis, measured from
    /// `bottom` towards `top`.
    pub fn span_im(&self) -> f64 {
        self.top - self.bottom
    }

    /// True when every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.top.is_finite()
            && self.bottom.is_finite()
    }
}

impl Default for Viewport {
    /// The whole of the Mandelbrot set, as the shell first opens it.
    fn default() -> Self {
        Viewport::new(-2.0, 1.0, -1.0, 1.0)
    }
}

/// Describes the x, y of a pixel in the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of a width x height raster onto a viewport.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// The region of the complex plane the raster covers.
    pub viewport: Viewport,
    spans: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Any raster size is accepted; an empty raster
    /// simply has no pixels to map.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> PlaneMapper {
        PlaneMapper {
            width,
            height,
            viewport,
            spans: (viewport.span_re(), viewport.span_im()),
        }
    }

    /// The total number of pixels in the raster.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when the raster has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Given a pixel of the raster, return the point of the complex
    /// plane it samples.  The fractions x/width and y/height are taken
    /// in floating point before scaling, so every engine that goes
    /// through here sees bit-identical coordinates.  Must not be called
    /// on an empty raster.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.viewport.left + (pixel.0 as f64 / self.width as f64) * self.spans.0,
            self.viewport.bottom + (pixel.1 as f64 / self.height as f64) * self.spans.1,
        )
    }

    /// Byte offset of a pixel in a packed RGB buffer.
    #[inline]
    pub fn rgb_offset(&self, pixel: &Pixel) -> usize {
        (pixel.1 * self.width + pixel.0) * 3
    }
}
