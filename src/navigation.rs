// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pan, zoom and undo over a viewport, the way the interactive shell
//! drives it: a click recentres on the clicked point and zooms in, a
//! right click steps back, and escape returns to where we started.
//! Points are given as fractions of the raster, (0, 0) being the
//! first pixel and (1, 1) the far corner, so none of this needs to
//! know the window size.

use crate::planes::Viewport;

/// Zoom factor applied by a plain click.
pub const CLICK_ZOOM: f64 = 2.0;

/// The current viewport plus the history needed to undo.
#[derive(Clone, Debug)]
pub struct Navigator {
    current: Viewport,
    history: Vec<Viewport>,
}

impl Navigator {
    /// Start at `initial` with an empty history.
    pub fn new(initial: Viewport) -> Self {
        Navigator {
            current: initial,
            history: vec![],
        }
    }

    /// The viewport to render now.
    pub fn current(&self) -> Viewport {
        self.current
    }

    /// How many steps `back` can undo.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Shift the viewport so the raster fraction (`fx`, `fy`) becomes
    /// its centre.  Does not touch the history.
    pub fn reposition(&mut self, fx: f64, fy: f64) {
        let v = &mut self.current;
        let dx = v.span_re() * (0.5 - fx);
        let dy = v.span_im() * (0.5 - fy);
        v.left -= dx;
        v.right -= dx;
        v.top -= dy;
        v.bottom -= dy;
    }

    /// Shrink both spans by `scale` around the centre.  Does not touch
    /// the history.
    pub fn zoom(&mut self, scale: f64) {
        let v = &mut self.current;
        let (half_re, half_im) = (v.span_re() / 2.0 / scale, v.span_im() / 2.0 / scale);
        let cx = (v.right + v.left) / 2.0;
        let cy = (v.top + v.bottom) / 2.0;
        v.left = cx - half_re;
        v.right = cx + half_re;
        v.top = cy + half_im;
        v.bottom = cy - half_im;
    }

    /// Remember where we are, then centre on (`fx`, `fy`) and zoom in
    /// by `scale`.
    pub fn click(&mut self, fx: f64, fy: f64, scale: f64) {
        self.history.push(self.current);
        self.reposition(fx, fy);
        self.zoom(scale);
    }

    /// Undo the last click.  Returns false if there was nothing to
    /// undo.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Return to the first viewport and forget the history.  Returns
    /// false if we were already there.
    pub fn reset(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        self.current = self.history[0];
        self.history.clear();
        true
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Navigator::new(Viewport::default())
    }
}
