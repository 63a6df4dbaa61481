//! Human-readable latency formatting.
//!
//! Latencies are rounded to a tenth of the largest unit they exceed, then
//! rendered in compact unit notation:
//!
//! | Elapsed | Rounded to | Output |
//! |---------|-----------|--------|
//! | > 1s | 100ms | `1m3.2s` |
//! | > 1ms | 100µs | `1.5ms` |
//! | > 1µs | 100ns | `2.3µs` |
//! | otherwise | not rounded | `812ns` |
//!
//! Fractions drop trailing zeros, so an exact `2ms` prints as `2ms`.

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Formats an elapsed duration for access logs.
///
/// # Example
///
/// ```
/// use quiver_middleware::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(1_500_000)), "1.5ms");
/// assert_eq!(format_duration(Duration::from_millis(63_240)), "1m3.2s");
/// assert_eq!(format_duration(Duration::from_nanos(812)), "812ns");
/// ```
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    render(round(elapsed.as_nanos()))
}

fn round(nanos: u128) -> u128 {
    let multiple = if nanos > NANOS_PER_SEC {
        NANOS_PER_SEC / 10
    } else if nanos > NANOS_PER_MILLI {
        NANOS_PER_MILLI / 10
    } else if nanos > NANOS_PER_MICRO {
        NANOS_PER_MICRO / 10
    } else {
        return nanos;
    };

    // Halves round up.
    let remainder = nanos % multiple;
    if remainder * 2 < multiple {
        nanos - remainder
    } else {
        nanos + multiple - remainder
    }
}

fn render(nanos: u128) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SEC {
        let (unit, scale, precision) = if nanos < NANOS_PER_MICRO {
            ("ns", 1, 0)
        } else if nanos < NANOS_PER_MILLI {
            ("µs", NANOS_PER_MICRO, 3)
        } else {
            ("ms", NANOS_PER_MILLI, 6)
        };
        return format!(
            "{}{}{unit}",
            nanos / scale,
            fraction(nanos % scale, precision)
        );
    }

    let total_secs = nanos / NANOS_PER_SEC;
    let hours = total_secs / 3600;
    let minutes = total_secs / 60 % 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if total_secs >= 60 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&format!(
        "{seconds}{}s",
        fraction(nanos % NANOS_PER_SEC, 9)
    ));
    out
}

// `.ddd` with trailing zeros removed; empty when the fraction is zero.
fn fraction(value: u128, precision: usize) -> String {
    if value == 0 || precision == 0 {
        return String::new();
    }
    let digits = format!("{value:0precision$}");
    format!(".{}", digits.trim_end_matches('0'))
}
