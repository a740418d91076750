// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type shared by the engines and the command line front end.

use failure::Fail;

/// Everything that can go wrong while producing an image.
#[derive(Debug, Fail, PartialEq)]
pub enum MandelError {
    /// One or more partitions of the threaded engine panicked.  Every
    /// worker has been joined and the half-written buffer dropped.
    #[fail(display = "{} render worker(s) panicked; image discarded", failed)]
    WorkerPanicked {
        /// How many workers failed.
        failed: usize,
    },

    /// The two engines produced different images for the same request.
    #[fail(display = "single- and multi-threaded engines disagree")]
    EnginesDisagree,

    /// A command line value could not be understood.
    #[fail(display = "could not parse {} from {:?}", name, value)]
    BadArgument {
        /// The argument being parsed.
        name: String,
        /// The offending text.
        value: String,
    },

    /// The finished image could not be written out.
    #[fail(display = "could not write image: {}", _0)]
    Image(String),
}

impl From<image::ImageError> for MandelError {
    fn from(err: image::ImageError) -> Self {
        MandelError::Image(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MandelError>;
