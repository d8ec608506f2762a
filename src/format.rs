//! Pure text helpers used to render status lines.
//!
//! Nothing in here touches the clock or an output stream, which keeps the
//! rendering rules testable in isolation:
//!
//! * [`format_duration`] renders `HH:MM:SS`, with hours growing past two digits.
//! * [`format_speed`] rounds a throughput to two decimals and prints it in
//!   shortest form (`5`, `2.5`, `3.14`).
//! * [`ansi_format`] wraps text in ANSI SGR escape sequences described by a
//!   [`ColorSpec`]; [`fg`] builds the single-color spec used for banners.

use std::{io, time::Duration};

use termcolor::{Ansi, Color, ColorSpec, WriteColor};

/// Color used for the start and finish messages (SGR 32).
pub const SUCCESS: Color = Color::Green;

/// Color used for periodic status lines (SGR 33).
pub const PROGRESS: Color = Color::Yellow;

/// Formats a duration as `HH:MM:SS`.
///
/// Sub-second precision is truncated. Hours are zero-padded to two digits but
/// never truncated, so 100 hours renders as `100:00:00`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use time_log::format::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01");
/// assert_eq!(format_duration(Duration::ZERO), "00:00:00");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Rounds `speed` half away from zero to two decimal places and renders it
/// without trailing zeros.
#[must_use]
pub fn format_speed(speed: f64) -> String {
    let rounded = (speed * 100.0).round() / 100.0;
    // Display of f64 already drops a trailing ".0"
    format!("{rounded}")
}

/// Returns a [`ColorSpec`] with `color` as the foreground and nothing else set.
#[must_use]
pub fn fg(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec
}

/// Wraps `text` in ANSI escape sequences.
///
/// The output is always `ESC[0m`, followed by one `ESC[{code}m` per attribute
/// set in `spec` (bold, underline, foreground color, ...), then `text`, then a
/// closing `ESC[0m`. An empty `ColorSpec::new()` only adds the resets.
///
/// # Examples
///
/// ```
/// use termcolor::ColorSpec;
/// use time_log::format::{SUCCESS, ansi_format, fg};
///
/// assert_eq!(ansi_format("x", &fg(SUCCESS)), "\x1b[0m\x1b[32mx\x1b[0m");
/// assert_eq!(ansi_format("x", &ColorSpec::new()), "\x1b[0mx\x1b[0m");
/// ```
#[must_use]
pub fn ansi_format(text: &str, spec: &ColorSpec) -> String {
    let mut out = Ansi::new(Vec::with_capacity(text.len() + 16));
    write_styled(&mut out, text, spec).expect("writing to a Vec cannot fail");

    String::from_utf8_lossy(&out.into_inner()).into_owned()
}

fn write_styled<W: WriteColor>(out: &mut W, text: &str, spec: &ColorSpec) -> io::Result<()> {
    out.set_color(spec)?;
    out.write_all(text.as_bytes())?;
    out.reset()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;
    use termcolor::{Color, ColorSpec};

    use super::{PROGRESS, SUCCESS, ansi_format, fg, format_duration, format_speed};

    #[test]
    fn test_format_duration_components() {
        assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_duration(Duration::from_secs(59)), "00:00:59");
        assert_eq!(format_duration(Duration::from_secs(3600)), "01:00:00");
    }

    /// Hours are padded, not truncated.
    #[test]
    fn test_format_duration_long_running() {
        assert_eq!(format_duration(Duration::from_secs(100 * 3600 + 5)), "100:00:05");
    }

    #[test]
    fn test_format_duration_truncates_fraction() {
        assert_eq!(format_duration(Duration::from_secs_f64(59.999)), "00:00:59");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(5.0), "5");
        assert_eq!(format_speed(2.5), "2.5");
        assert_eq!(format_speed(3.14159), "3.14");
        assert_eq!(format_speed(4.999), "5");
        assert_eq!(format_speed(0.0), "0");
    }

    /// The raw byte order is what terminals and log scrapers see.
    #[test]
    fn test_ansi_format_byte_order() {
        assert_eq!(ansi_format("x", &fg(SUCCESS)), "\x1b[0m\x1b[32mx\x1b[0m");
        assert_eq!(ansi_format("x", &fg(PROGRESS)), "\x1b[0m\x1b[33mx\x1b[0m");
        assert_eq!(ansi_format("x", &ColorSpec::new()), "\x1b[0mx\x1b[0m");
    }

    /// Several attributes are emitted in sequence, after the leading reset.
    #[test]
    fn test_ansi_format_combined_attributes() {
        let mut spec = ColorSpec::new();
        spec.set_bold(true).set_fg(Some(Color::Red));

        assert_eq!(ansi_format("x", &spec), "\x1b[0m\x1b[1m\x1b[31mx\x1b[0m");
    }

    proptest! {
        #[test]
        fn prop_format_duration_recomposes(secs in 0u64..1_000_000) {
            let text = format_duration(Duration::from_secs(secs));
            let parts: Vec<u64> = text.split(':').map(|p| p.parse().unwrap()).collect();

            prop_assert_eq!(parts.len(), 3);
            prop_assert!(parts[1] < 60 && parts[2] < 60);
            prop_assert_eq!(parts[0] * 3600 + parts[1] * 60 + parts[2], secs);
        }

        #[test]
        fn prop_ansi_format_keeps_text(text in "[a-zA-Z0-9 \t:/]{0,40}") {
            let wrapped = ansi_format(&text, &fg(PROGRESS));
            let expected_suffix = format!("{text}\x1b[0m");

            prop_assert!(wrapped.starts_with("\x1b[0m\x1b[33m"));
            prop_assert!(wrapped.ends_with(&expected_suffix));
        }
    }
}
