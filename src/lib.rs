//! # `time_log`
//!
//! Progress reporting for long-running batch jobs.
//!
//! A [`TimeLog`] remembers when a job started, how many items it expects (if
//! known) and how many have been handled. From that it derives throughput and
//! a linear estimate of the remaining time, and writes human-readable status
//! lines to a sink (standard output by default), optionally color-coded with
//! ANSI escapes:
//!
//! ```text
//! Starting handling: 1000 items
//! Handled:  250/1000	Remaining: 00:00:30	Speed: 25/sec
//! Finished after 00:00:40	Handled: 1000 items
//! ```
//!
//! ## Modules
//!
//! * [`tracker`]: The [`TimeLog`] itself and the [`TimeLogSnapshot`] metrics.
//! * [`builder`]: Fluent interface for sinks, start times and color choice.
//! * [`format`]: Duration, speed and ANSI formatting helpers.
//! * [`iter`]: Extension traits for tracking progress on Iterators.
//! * [`error`]: The [`TimeLogError`] type.
//!
//! ## Logging
//!
//! Lifecycle events are emitted through [`tracing`] at `debug` and `trace`
//! level. The crate never installs a subscriber.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod builder;
pub mod error;
pub mod format;
pub mod iter;
pub mod tracker;

pub use builder::TimeLogBuilder;
pub use error::{Result, TimeLogError};
pub use iter::{TimeLogIter, TimeLogIteratorExt};
pub use tracker::{TimeLog, TimeLogSnapshot};
