//! The batch-job time log and its derived metrics.
//!
//! [`TimeLog`] owns three pieces of state: the instant the job started, an
//! optional total item count, and the number of items handled so far. Every
//! other value (speed, remaining time, status line) is derived on demand.
//!
//! # Snapshots
//!
//! Derived metrics are computed on a [`TimeLogSnapshot`], which freezes the
//! elapsed time, handled count and total at a single instant. The convenience
//! getters on [`TimeLog`] take a fresh snapshot per call, so two getters called
//! back to back may observe slightly different elapsed times. Take one
//! snapshot when several values must agree with each other.

use std::{
    fmt,
    io::{self, Stdout, Write},
    time::Duration,
};

use termcolor::{Color, ColorChoice};
use tracing::{debug, trace};
use web_time::Instant;

use crate::{
    builder::TimeLogBuilder,
    error::{Result, TimeLogError},
    format::{PROGRESS, SUCCESS, ansi_format, fg, format_duration, format_speed},
};

/// Text printed in place of the total when it is unknown.
pub const UNKNOWN_TOTAL: &str = "unknown";

/// Placeholder shown in the remaining-time field when no total is known.
const UNKNOWN_REMAINING: &str = "--:--:--";

/// Tracks elapsed time and throughput of a batch job and writes status lines.
///
/// `W` is the output sink; it defaults to [`Stdout`]. Use
/// [`TimeLog::with_writer`] or the [`TimeLogBuilder`] to capture output
/// elsewhere.
///
/// A `TimeLog` is meant to have a single owner. Callers updating progress from
/// several threads must serialize access themselves.
///
/// # Examples
///
/// ```
/// use time_log::TimeLog;
///
/// let mut log = TimeLog::with_writer(Some(3), Vec::<u8>::new());
/// log.show_start()?;
/// for handled in 1..=3 {
///     log.set_handled(handled);
///     log.show_status(None)?;
/// }
/// log.show_finish()?;
///
/// let output = String::from_utf8(log.into_writer()).unwrap();
/// assert!(output.contains("Starting handling: 3 items"));
/// assert!(output.contains("Handled: 3/3"));
/// # Ok::<(), time_log::TimeLogError>(())
/// ```
pub struct TimeLog<W = Stdout> {
    pub(crate) start: Instant,
    pub(crate) total: Option<u64>,
    pub(crate) handled: u64,
    pub(crate) out: W,
    pub(crate) color: ColorChoice,
}

impl<W> fmt::Debug for TimeLog<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The sink is usually not Debug, so only the counters are printed.
        f.debug_struct("TimeLog")
            .field("start", &self.start)
            .field("total", &self.total)
            .field("handled", &self.handled)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl TimeLog<Stdout> {
    /// Starts a time log that writes to standard output.
    ///
    /// `total` is the expected number of items, or `None` when unknown.
    #[must_use]
    pub fn new(total: Option<u64>) -> Self {
        TimeLogBuilder::new().total_opt(total).build()
    }
}

impl<W> TimeLog<W> {
    /// Starts a time log that writes to `writer`.
    #[must_use]
    pub fn with_writer(total: Option<u64>, writer: W) -> Self {
        TimeLogBuilder::new()
            .total_opt(total)
            .writer(writer)
            .build()
    }

    // ========================================================================
    // Counters
    // ========================================================================

    /// Returns the expected total item count, if known.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns the number of items handled so far.
    #[must_use]
    pub const fn handled(&self) -> u64 {
        self.handled
    }

    /// Overwrites the handled count.
    ///
    /// The value is not checked against the total and may move backwards.
    pub fn set_handled(&mut self, count: u64) {
        self.handled = count;
    }

    /// Adds `amount` to the handled count, saturating at `u64::MAX`.
    pub fn inc(&mut self, amount: u64) {
        self.handled = self.handled.saturating_add(amount);
    }

    /// Returns the width the handled count is padded to in [`status`](Self::status).
    ///
    /// This is the length of the total's decimal form, or of [`UNKNOWN_TOTAL`].
    #[must_use]
    pub fn total_width(&self) -> usize {
        total_text(self.total).len()
    }

    /// Returns the instant the log was started or last reset.
    #[must_use]
    pub const fn start(&self) -> Instant {
        self.start
    }

    /// Restarts the clock and zeroes the handled count.
    ///
    /// When `new_total` is `Some`, it replaces the current total. `None`
    /// keeps the previous total.
    pub fn reset(&mut self, new_total: Option<u64>) {
        if new_total.is_some() {
            self.total = new_total;
        }
        self.start = Instant::now();
        self.handled = 0;

        debug!(total = ?self.total, "time log reset");
    }

    // ========================================================================
    // Derived metrics
    // ========================================================================

    /// Captures the current elapsed time, handled count and total.
    #[must_use]
    pub fn snapshot(&self) -> TimeLogSnapshot {
        TimeLogSnapshot::new(self.start.elapsed(), self.handled, self.total)
    }

    /// Returns the time elapsed since the log was started or reset.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the elapsed time in fractional seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Returns the average number of items handled per second.
    ///
    /// See [`TimeLogSnapshot::speed`].
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.snapshot().speed()
    }

    /// Returns the estimated number of seconds until all items are handled.
    ///
    /// See [`TimeLogSnapshot::remaining`].
    ///
    /// # Errors
    ///
    /// Returns [`TimeLogError::UnknownTotal`] if no total is known.
    pub fn remaining(&self) -> Result<i64> {
        self.snapshot().remaining()
    }

    /// Renders the tab-separated status line.
    ///
    /// See [`TimeLogSnapshot::status`].
    #[must_use]
    pub fn status(&self) -> String {
        self.snapshot().status()
    }

    // ========================================================================
    // Sink access
    // ========================================================================

    /// Returns a shared reference to the output sink.
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// Returns a mutable reference to the output sink.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consumes the log and returns the output sink.
    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> TimeLog<W> {
    /// Writes the start banner, e.g. `Starting handling: 100 items`, in the
    /// success color, surrounded by line breaks.
    ///
    /// # Errors
    ///
    /// Returns [`TimeLogError::Io`] if writing to the sink fails.
    pub fn show_start(&mut self) -> Result<()> {
        let message = self.snapshot().start_message();
        debug!(total = ?self.total, "starting batch");
        self.emit(&format!("\n{message}\n"), SUCCESS)
    }

    /// Writes the status line in the progress color.
    ///
    /// With `Some(frequency)`, the line is only written when the handled count
    /// is a multiple of `frequency`; a frequency of zero counts as one.
    /// Returns whether a line was written.
    ///
    /// # Errors
    ///
    /// Returns [`TimeLogError::Io`] if writing to the sink fails.
    pub fn show_status(&mut self, frequency: Option<u64>) -> Result<bool> {
        if let Some(frequency) = frequency {
            if self.handled % frequency.max(1) != 0 {
                trace!(handled = self.handled, frequency, "status suppressed");
                return Ok(false);
            }
        }

        let status = self.status();
        self.emit(&format!("{status}\n"), PROGRESS)?;
        Ok(true)
    }

    /// Writes the finish banner with the total elapsed time and handled count
    /// in the success color, surrounded by line breaks.
    ///
    /// # Errors
    ///
    /// Returns [`TimeLogError::Io`] if writing to the sink fails.
    pub fn show_finish(&mut self) -> Result<()> {
        let snapshot = self.snapshot();
        debug!(
            handled = snapshot.handled,
            elapsed = ?snapshot.elapsed,
            "batch finished"
        );
        self.emit(&format!("\n{}\n", snapshot.finish_message()), SUCCESS)
    }

    fn emit(&mut self, message: &str, color: Color) -> Result<()> {
        let text = if self.color == ColorChoice::Never {
            message.to_owned()
        } else {
            ansi_format(message, &fg(color))
        };

        if let Err(err) = write_flushed(&mut self.out, &text) {
            debug!(error = %err, "progress output failed");
            return Err(err.into());
        }
        Ok(())
    }
}

fn write_flushed<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// An immutable view of a [`TimeLog`] at one instant.
///
/// All metrics are pure functions of the captured fields, which also makes it
/// possible to evaluate them for a fixed elapsed time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeLogSnapshot {
    elapsed: Duration,
    handled: u64,
    total: Option<u64>,
}

impl TimeLogSnapshot {
    /// Creates a snapshot from explicit values.
    #[must_use]
    pub const fn new(elapsed: Duration, handled: u64, total: Option<u64>) -> Self {
        Self {
            elapsed,
            handled,
            total,
        }
    }

    /// Returns the elapsed duration.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the handled count.
    #[must_use]
    pub const fn handled(&self) -> u64 {
        self.handled
    }

    /// Returns the total item count, if known.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Average items per second since the start.
    ///
    /// Returns `0.0` when no time has elapsed, rather than infinity or NaN.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn speed(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.handled as f64 / secs
        } else {
            0.0
        }
    }

    /// Estimated seconds remaining, rounded half away from zero.
    ///
    /// This is a linear extrapolation of the average speed. While the speed is
    /// still zero, the raw count of unhandled items is returned instead. The
    /// result is negative when more items were handled than the total.
    ///
    /// # Errors
    ///
    /// Returns [`TimeLogError::UnknownTotal`] if no total is known.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn remaining(&self) -> Result<i64> {
        let total = self.total.ok_or(TimeLogError::UnknownTotal)?;
        let unhandled = total as f64 - self.handled as f64;

        let speed = self.speed();
        let secs = if speed == 0.0 {
            unhandled
        } else {
            unhandled / speed
        };

        Ok(secs.round() as i64)
    }

    /// Renders the status line:
    ///
    /// ```text
    /// Handled:  50/100	Remaining: 00:00:10	Speed: 5/sec
    /// ```
    ///
    /// The handled count is left-padded with spaces to the width of the total.
    /// With an unknown total, the total reads `unknown` and the remaining
    /// field reads `--:--:--`. Negative estimates are shown as zero.
    #[must_use]
    pub fn status(&self) -> String {
        let total = total_text(self.total);
        let remaining = match self.remaining() {
            Ok(secs) => format_duration(Duration::from_secs(secs.max(0).unsigned_abs())),
            Err(_) => UNKNOWN_REMAINING.to_owned(),
        };

        format!(
            "Handled: {handled:>width$}/{total}\tRemaining: {remaining}\tSpeed: {speed}/sec",
            handled = self.handled,
            width = total.len(),
            speed = format_speed(self.speed()),
        )
    }

    /// Renders the start banner text, without line breaks or color.
    #[must_use]
    pub fn start_message(&self) -> String {
        format!("Starting handling: {} items", total_text(self.total))
    }

    /// Renders the finish banner text, without line breaks or color.
    #[must_use]
    pub fn finish_message(&self) -> String {
        format!(
            "Finished after {}\tHandled: {} items",
            format_duration(self.elapsed),
            self.handled
        )
    }
}

impl<W> From<&TimeLog<W>> for TimeLogSnapshot {
    fn from(log: &TimeLog<W>) -> Self {
        log.snapshot()
    }
}

fn total_text(total: Option<u64>) -> String {
    total.map_or_else(|| UNKNOWN_TOTAL.to_owned(), |total| total.to_string())
}
