//! Fluent interface for constructing [`TimeLog`] instances.
//!
//! [`TimeLog::new`] and [`TimeLog::with_writer`] cover the common cases. The
//! [`TimeLogBuilder`] additionally allows:
//!
//! * **Custom sinks:** any [`Write`](std::io::Write) implementation, e.g. a
//!   `Vec<u8>` to capture output or a locked stderr handle.
//! * **Explicit start time:** resume a job that started earlier, or line up
//!   the clocks of several batches.
//! * **Color choice:** [`ColorChoice::Never`] writes plain text with no ANSI
//!   escapes.

use std::io::{self, Stdout};

use termcolor::ColorChoice;
use tracing::debug;
use web_time::Instant;

use crate::tracker::TimeLog;

/// A builder for [`TimeLog`].
///
/// # Examples
///
/// ```
/// use termcolor::ColorChoice;
/// use time_log::TimeLogBuilder;
///
/// let mut log = TimeLogBuilder::new()
///     .total(10)
///     .color_choice(ColorChoice::Never)
///     .writer(Vec::<u8>::new())
///     .build();
/// log.show_start()?;
///
/// assert_eq!(log.writer().as_slice(), b"\nStarting handling: 10 items\n");
/// # Ok::<(), time_log::TimeLogError>(())
/// ```
#[derive(Debug)]
pub struct TimeLogBuilder<W = Stdout> {
    total: Option<u64>,
    start: Option<Instant>,
    color: ColorChoice,
    writer: W,
}

impl TimeLogBuilder<Stdout> {
    /// Starts a builder that writes to standard output with colors enabled
    /// and no known total.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: None,
            start: None,
            color: ColorChoice::Always,
            writer: io::stdout(),
        }
    }
}

impl Default for TimeLogBuilder<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> TimeLogBuilder<W> {
    /// Sets the expected total item count.
    #[must_use]
    pub const fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Sets the expected total item count, or clears it with `None`.
    #[must_use]
    pub const fn total_opt(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }

    /// Sets the start time explicitly. Defaults to the moment of [`build`](Self::build).
    #[must_use]
    pub const fn start_time(mut self, start: Instant) -> Self {
        self.start = Some(start);
        self
    }

    /// Chooses whether messages are wrapped in ANSI color codes.
    ///
    /// Only [`ColorChoice::Never`] disables colors. No terminal detection is
    /// performed, so `Auto` behaves like `Always`.
    #[must_use]
    pub const fn color_choice(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Replaces the output sink.
    #[must_use]
    pub fn writer<W2>(self, writer: W2) -> TimeLogBuilder<W2> {
        TimeLogBuilder {
            total: self.total,
            start: self.start,
            color: self.color,
            writer,
        }
    }

    /// Consumes the builder and returns the constructed [`TimeLog`].
    #[must_use]
    pub fn build(self) -> TimeLog<W> {
        let start = self.start.unwrap_or_else(Instant::now);
        debug!(total = ?self.total, "time log started");

        TimeLog {
            start,
            total: self.total,
            handled: 0,
            out: self.writer,
            color: self.color,
        }
    }
}
