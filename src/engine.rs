// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two escape-time engines.
//!
//! Both walk the same raster through the same PlaneMapper and shade
//! each pixel with the same ramp, so their output is byte-for-byte
//! the same.  The single-threaded engine does the whole raster on the
//! calling thread.  The threaded engine cuts the output buffer into
//! horizontal stripes of whole rows and lets a small crew of scoped
//! workers pull stripes off a shared queue until it runs dry.  Rows
//! that cross the boundary of the set cost far more than rows that
//! escape at once, so a worker that draws cheap stripes simply comes
//! back for more.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Instant;

use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use log::{debug, warn};

use crate::errors::{MandelError, Result};
use crate::escape::{escape_time, intensity};
use crate::planes::{Pixel, PlaneMapper, Viewport};
use crate::MAX_ITER;

/// Stripes handed out per worker when the stripe height is automatic.
const STRIPES_PER_WORKER: usize = 4;

type StripeQueue<'a> = Mutex<std::iter::Enumerate<std::slice::ChunksMut<'a, u8>>>;

/// Which engine computes the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Engine {
    /// Everything on the calling thread.
    SingleThreaded,
    /// Row stripes spread over a pool of scoped worker threads.
    MultiThreaded,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::MultiThreaded
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Engine::SingleThreaded => write!(f, "single"),
            Engine::MultiThreaded => write!(f, "multi"),
        }
    }
}

impl FromStr for Engine {
    type Err = MandelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Engine::SingleThreaded),
            "multi" => Ok(Engine::MultiThreaded),
            _ => Err(MandelError::BadArgument {
                name: "engine".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// The knobs of a render.  Once handed to a renderer these do not
/// change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Iteration cap per pixel.
    pub max_iter: usize,
    /// Worker threads for the threaded engine.  Zero is read as one.
    pub threads: usize,
    /// Rows per stripe for the threaded engine; `None` picks about
    /// four stripes per worker.
    pub stripe_rows: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_iter: MAX_ITER,
            threads: num_cpus::get(),
            stripe_rows: None,
        }
    }
}

impl RenderConfig {
    /// The default configuration with a different iteration cap.
    pub fn with_max_iter(max_iter: usize) -> Self {
        RenderConfig {
            max_iter,
            ..RenderConfig::default()
        }
    }

    fn workers(&self) -> usize {
        self.threads.max(1)
    }

    /// Height in rows of each stripe for a raster `height` rows tall.
    pub fn stripe_rows_for(&self, height: usize) -> usize {
        self.stripe_rows
            .unwrap_or_else(|| height / (self.workers() * STRIPES_PER_WORKER))
            .max(1)
    }
}

/// A raster, a viewport and a configuration: everything needed to
/// produce one grayscale image.
#[derive(Copy, Clone, Debug)]
pub struct MandelbrotRenderer {
    plane: PlaneMapper,
    config: RenderConfig,
}

impl MandelbrotRenderer {
    /// Requires the width and height of the image, the region of the
    /// complex plane to draw, and the render configuration.
    pub fn new(width: usize, height: usize, viewport: Viewport, config: RenderConfig) -> Self {
        MandelbrotRenderer {
            plane: PlaneMapper::new(width, height, viewport),
            config,
        }
    }

    #[inline]
    fn shade(&self, pixel: &Pixel) -> u8 {
        let c = self.plane.pixel_to_point(pixel);
        intensity(escape_time(c, self.config.max_iter), self.config.max_iter)
    }

    /// Fills `band`, a run of whole rows starting at raster row
    /// `first_row`, with RGB triples.
    fn render_band(&self, first_row: usize, band: &mut [u8]) {
        let width = self.plane.width;
        for (row, line) in band.chunks_mut(width * 3).enumerate() {
            for (column, rgb) in line.chunks_mut(3).enumerate() {
                let shade = self.shade(&Pixel(column, first_row + row));
                for channel in rgb.iter_mut() {
                    *channel = shade;
                }
            }
        }
    }

    /// The main function for single-threaded rendering.  Returns a
    /// row-major buffer of `width * height` RGB triples.
    pub fn render_single(&self) -> Vec<u8> {
        let mut buffer = vec![0 as u8; self.plane.len() * 3];
        if self.plane.is_empty() {
            return buffer;
        }
        for (row, column) in iproduct!(0..self.plane.height, 0..self.plane.width) {
            let pixel = Pixel(column, row);
            let shade = self.shade(&pixel);
            let offset = self.plane.rgb_offset(&pixel);
            buffer[offset] = shade;
            buffer[offset + 1] = shade;
            buffer[offset + 2] = shade;
        }
        buffer
    }

    /// The threaded version of the render.  Blocks until every stripe
    /// is drawn; if any worker panics the buffer is thrown away and
    /// the failure reported instead.
    pub fn render_threaded(&self) -> Result<Vec<u8>> {
        let mut buffer = vec![0 as u8; self.plane.len() * 3];
        if self.plane.is_empty() {
            return Ok(buffer);
        }
        let stripe_rows = self.config.stripe_rows_for(self.plane.height);
        let stripe_len = stripe_rows * self.plane.width * 3;
        let striping = fill_stripes(
            &mut buffer,
            stripe_len,
            self.config.workers(),
            |index, band| self.render_band(index * stripe_rows, band),
        )?;
        debug!(
            "{} stripe(s) of {} row(s) over {} worker(s)",
            striping.stripes, stripe_rows, striping.workers
        );
        Ok(buffer)
    }

    /// Render with the chosen engine.
    pub fn render(&self, engine: Engine) -> Result<Vec<u8>> {
        match engine {
            Engine::SingleThreaded => Ok(self.render_single()),
            Engine::MultiThreaded => self.render_threaded(),
        }
    }
}

/// How a buffer was carved up and how many workers drew it.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Striping {
    stripes: usize,
    workers: usize,
}

/// Splits `buffer` into stripes of `stripe_len` bytes and has up to
/// `threads` scoped workers call `fill(stripe_index, stripe)` until
/// every stripe has been taken.  No more workers are spawned than
/// there are stripes.  Stripes are disjoint, so the only lock guards
/// the queue, never the pixels.  Every worker is joined before this
/// returns.
fn fill_stripes<F>(buffer: &mut [u8], stripe_len: usize, threads: usize, fill: F) -> Result<Striping>
where
    F: Fn(usize, &mut [u8]) + Sync,
{
    let total = (buffer.len() + stripe_len - 1) / stripe_len;
    let threads = threads.min(total).max(1);
    let queue: StripeQueue = Mutex::new(buffer.chunks_mut(stripe_len).enumerate());
    let fill = &fill;

    let outcome = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<usize>> = (0..threads)
            .map(|worker| {
                let queue = &queue;
                spawner.spawn(move |_| {
                    let mut drawn = 0;
                    loop {
                        // A poisoned queue means a sibling died holding
                        // it; stop and let the join report the panic.
                        let stripe = match queue.lock() {
                            Ok(mut stripes) => stripes.next(),
                            Err(_) => None,
                        };
                        match stripe {
                            Some((index, band)) => {
                                fill(index, band);
                                drawn += 1;
                            }
                            None => {
                                break;
                            }
                        }
                    }
                    debug!("worker {} drew {} stripe(s)", worker, drawn);
                    drawn
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(|joined| joined.is_err())
            .count()
    });

    match outcome {
        Ok(0) => Ok(Striping {
            stripes: total,
            workers: threads,
        }),
        Ok(failed) => {
            warn!("{} of {} render worker(s) panicked", failed, threads);
            Err(MandelError::WorkerPanicked { failed })
        }
        Err(_) => {
            warn!("render scope panicked");
            Err(MandelError::WorkerPanicked { failed: threads })
        }
    }
}

/// Render a `width` x `height` view of `viewport` with the chosen
/// engine.  This is the one entry point a front end needs.
pub fn render(
    engine: Engine,
    width: u32,
    height: u32,
    viewport: Viewport,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    if !viewport.is_finite() {
        warn!("non-finite viewport {:?}; shading is arbitrary", viewport);
    }
    let started = Instant::now();
    let renderer = MandelbrotRenderer::new(width as usize, height as usize, viewport, *config);
    let pixels = renderer.render(engine)?;
    debug!(
        "{} engine drew {}x{} of {:?} at {} iterations in {:?}",
        engine,
        width,
        height,
        viewport,
        config.max_iter,
        started.elapsed()
    );
    Ok(pixels)
}
