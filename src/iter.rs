//! Iterator adapters that drive a [`TimeLog`] automatically.
//!
//! [`TimeLogIteratorExt`] adds `time_log` methods to every [`Iterator`]. The
//! returned [`TimeLogIter`] restarts the clock and writes the start banner
//! when the first item is requested,
//! updates the handled count and status line on every item, and writes the
//! finish banner once the inner iterator is exhausted.
//!
//! # Heuristics
//!
//! The total is taken from [`Iterator::size_hint`] when it is exact (lower and
//! upper bounds agree). Otherwise the total is unknown.
//!
//! # Errors
//!
//! `Iterator::next` cannot return a write error, so the first one is kept and
//! output stops. Call [`TimeLogIter::finish`] to retrieve it.
//!
//! # Example
//!
//! ```
//! use time_log::{TimeLog, TimeLogIteratorExt as _};
//!
//! let log = TimeLog::with_writer(None, Vec::<u8>::new());
//! let mut iter = (1u32..=100).time_log_with(log, Some(25));
//! let sum: u32 = iter.by_ref().sum();
//! let log = iter.finish()?;
//!
//! assert_eq!(sum, 5050);
//! assert_eq!(log.handled(), 100);
//! # Ok::<(), time_log::TimeLogError>(())
//! ```

use std::io::{Stdout, Write};

use tracing::warn;
use web_time::Instant;

use crate::{
    error::{Result, TimeLogError},
    tracker::TimeLog,
};

/// An iterator adapter that reports progress of the wrapped iterator.
pub struct TimeLogIter<I, W = Stdout> {
    iter: I,
    log: TimeLog<W>,
    frequency: Option<u64>,
    started: bool,
    finished: bool,
    error: Option<TimeLogError>,
}

impl<I, W: Write> TimeLogIter<I, W> {
    /// Creates a new `TimeLogIter`.
    ///
    /// Note: This is usually constructed via [`TimeLogIteratorExt`] methods.
    pub const fn new(iter: I, log: TimeLog<W>, frequency: Option<u64>) -> Self {
        Self {
            iter,
            log,
            frequency,
            started: false,
            finished: false,
            error: None,
        }
    }

    /// Returns the underlying time log.
    pub const fn log(&self) -> &TimeLog<W> {
        &self.log
    }

    /// Stops iterating and returns the time log.
    ///
    /// # Errors
    ///
    /// Returns the first write error encountered while iterating.
    pub fn finish(self) -> Result<TimeLog<W>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.log),
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(err) = result {
            warn!(error = %err, "progress output disabled after write failure");
            self.error = Some(err);
        }
    }
}

impl<I: Iterator, W: Write> Iterator for TimeLogIter<I, W> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            // Time spent between wrapping and consuming is not part of the job.
            self.log.start = Instant::now();
            let result = self.log.show_start();
            self.report(result);
        }

        let item = self.iter.next();

        if self.error.is_none() {
            if item.is_some() {
                self.log.inc(1);
                let result = self.log.show_status(self.frequency).map(|_| ());
                self.report(result);
            } else if !self.finished {
                self.finished = true;
                let result = self.log.show_finish();
                self.report(result);
            }
        } else if item.is_some() {
            self.log.inc(1);
        }

        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait to attach a [`TimeLog`] to any Iterator.
pub trait TimeLogIteratorExt: Iterator + Sized {
    /// Wraps the iterator in a [`TimeLog`] that writes to standard output.
    ///
    /// A status line is written whenever the handled count is a multiple of
    /// `frequency`, or for every item when `frequency` is `None`.
    fn time_log(self, frequency: Option<u64>) -> TimeLogIter<Self> {
        let total = self.exact_len();
        TimeLogIter::new(self, TimeLog::new(total), frequency)
    }

    /// Wraps the iterator using an existing [`TimeLog`].
    ///
    /// The log keeps its own total; an unknown total is filled in from an
    /// exact `size_hint`.
    fn time_log_with<W: Write>(
        self,
        mut log: TimeLog<W>,
        frequency: Option<u64>,
    ) -> TimeLogIter<Self, W> {
        if log.total().is_none() {
            log.total = self.exact_len();
        }
        TimeLogIter::new(self, log, frequency)
    }

    /// Returns the item count when the `size_hint` is exact.
    fn exact_len(&self) -> Option<u64> {
        match self.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper as u64),
            _ => None,
        }
    }
}

impl<I: Iterator> TimeLogIteratorExt for I {}
