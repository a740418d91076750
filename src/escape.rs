// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test and the grayscale ramp built on top of it.

use num::Complex;

/// The escape radius.
const ESCAPE_RADIUS: f64 = 2.0;

/// |z|^2 well clear of 4 on either side decides the radius test
/// without a square root.  Inside this band the rounding of |z|^2 and
/// of hypot(re, im) can disagree, so the band is settled by `norm()`.
const NEAR_RADIUS_SQR: (f64, f64) = (4.0 - 1e-9, 4.0 + 1e-9);

/// The radius test, |z| <= 2, exactly as `Complex::norm` rounds it.
#[inline]
fn within_radius(z: Complex<f64>) -> bool {
    let norm_sqr = z.norm_sqr();
    if norm_sqr < NEAR_RADIUS_SQR.0 {
        true
    } else if norm_sqr > NEAR_RADIUS_SQR.1 {
        false
    } else {
        z.norm() <= ESCAPE_RADIUS
    }
}

/// This is our classic iterator function.  Starting from z = 0 it
/// applies z <- z^2 + c until |z| leaves the circle of radius two or
/// `max_iter` steps have been taken, and returns the number of steps.
/// A point that never escapes returns `max_iter`.
///
/// Non-finite input fails the radius test after the first step, so a
/// NaN or infinite `c` returns 1 (0 when `max_iter` is 0).
pub fn escape_time(c: Complex<f64>, max_iter: usize) -> usize {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut n = 0;
    while n < max_iter && within_radius(z) {
        z = z * z + c;
        n += 1;
    }
    n
}

/// Turns an iteration count into a gray level: 255 for a point that
/// escaped at once, 0 for one that never escaped.  The scaling is
/// integer division, so the ramp is monotonically non-increasing in
/// `n`.  Counts above `max_iter` clamp to black, and a zero
/// `max_iter` paints everything white.
pub fn intensity(n: usize, max_iter: usize) -> u8 {
    if max_iter == 0 {
        return 255;
    }
    let n = n.min(max_iter);
    (255 - n * 255 / max_iter) as u8
}
