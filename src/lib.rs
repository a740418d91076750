#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never carries `z` out past a radius of two.  Points outside
//! the set escape, some immediately and some only after many
//! iterations; the number of iterations it takes is the "escape time"
//! and it is what we paint.  Points that escape at once are white,
//! points that never escape within the iteration cap are black, and
//! the border of the set is every shade in between.
//!
//! A front end asks for a `width` x `height` view of a rectangle of
//! the complex plane and gets back a packed RGB buffer, three equal
//! bytes per pixel, row by row.  There are two engines behind that
//! request, one single-threaded and one that spreads stripes of rows
//! across a pool of worker threads, and they paint identical images.

pub mod engine;
pub mod errors;
pub mod escape;
pub mod navigation;
pub mod planes;

pub use engine::{render, Engine, MandelbrotRenderer, RenderConfig};
pub use errors::{MandelError, Result};
pub use navigation::Navigator;
pub use planes::{Pixel, PlaneMapper, Viewport};

/// The iteration cap used when nobody asks for another.
pub const MAX_ITER: usize = 100;

/// Generates a mandelbrot set image on the calling thread.
pub fn mandelbrot(width: u32, height: u32, left: f64, right: f64, top: f64, bottom: f64) -> Vec<u8> {
    let viewport = Viewport::new(left, right, top, bottom);
    MandelbrotRenderer::new(
        width as usize,
        height as usize,
        viewport,
        RenderConfig::default(),
    )
    .render_single()
}

/// Generates a mandelbrot set image using every available core.
pub fn mandelbrot_mt(
    width: u32,
    height: u32,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
) -> Result<Vec<u8>> {
    let viewport = Viewport::new(left, right, top, bottom);
    MandelbrotRenderer::new(
        width as usize,
        height as usize,
        viewport,
        RenderConfig::default(),
    )
    .render_threaded()
}
