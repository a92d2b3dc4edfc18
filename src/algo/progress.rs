//! Step callbacks for iterative modifiers.
//!
//! Subdivision and smoothing run a fixed number of passes. Their
//! `*_with_progress` variants call a [`Progress`] once before every pass and
//! once more when the last pass is done, always with the same `total`.
//!
//! # Example
//!
//! ```
//! use trellis::algo::progress::Progress;
//! use trellis::algo::subdivide::{subdivide_with_progress, SubdivideOptions};
//! use trellis::seed::{Cube, Generator};
//!
//! let progress = Progress::new(|pass, passes, label| {
//!     println!("{label}: pass {pass} of {passes}");
//! });
//!
//! let mut mesh = Cube::default().produce();
//! subdivide_with_progress(&mut mesh, &SubdivideOptions::new(2), &progress);
//! ```

use std::fmt;

/// Resolution of one outer step in [`Progress::report_sub`].
const SUB_STEPS: usize = 1000;

type Callback = dyn Fn(usize, usize, &str) + Send + Sync;

/// Receives `(done, total, label)` while a modifier runs.
///
/// `done` counts finished steps and reaches `total` exactly once, on the
/// final call.
pub struct Progress {
    callback: Box<Callback>,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A reporter that ignores every call.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }

    /// Forward one update to the callback.
    #[inline]
    pub fn report(&self, done: usize, total: usize, label: &str) {
        (self.callback)(done, total, label);
    }

    /// Report `inner_done / inner_total` of outer step `outer` out of
    /// `outer_total`.
    ///
    /// Each outer step is split into a fixed number of sub-steps, so the
    /// callback sees `outer_total * 1000` as its total. Calls with an empty
    /// range are dropped.
    ///
    /// ```
    /// # use trellis::algo::Progress;
    /// # let progress = Progress::none();
    /// // Halfway through the first of two weld passes.
    /// progress.report_sub(50, 100, 0, 2, "Welding");
    /// ```
    #[inline]
    pub fn report_sub(
        &self,
        inner_done: usize,
        inner_total: usize,
        outer: usize,
        outer_total: usize,
        label: &str,
    ) {
        if inner_total == 0 || outer_total == 0 {
            return;
        }
        let within = inner_done.min(inner_total) * SUB_STEPS / inner_total;
        self.report(outer * SUB_STEPS + within, outer_total * SUB_STEPS, label);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
