//! Display formatting for traffic counters, elapsed times, and usage
//! bars.
//!
//! The formatting here mirrors the web dashboard this tool replaces:
//! binary (1024) divisors with two decimals, coarse two-unit elapsed
//! times, and usage percentages rounded *up* so any nonzero traffic
//! registers as at least 1%.

// ── Byte counts ───────────────────────────────────────────────────────

/// Format a raw byte count as `B`, `KB`, `MB`, or `GB`.
///
/// Values below 1024 print whole; everything above scales with two
/// decimals. The scale tops out at GB, so multi-terabyte counters
/// print as four-digit GB values rather than switching units.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    if value < 1024.0 {
        return format!("{value:.2} KB");
    }
    value /= 1024.0;
    if value < 1024.0 {
        return format!("{value:.2} MB");
    }
    value /= 1024.0;
    format!("{value:.2} GB")
}

// ── Elapsed time ──────────────────────────────────────────────────────

/// Format a duration in seconds as the two largest units, e.g. `45s`,
/// `2m 5s`, `1h 2m`, `1d 1h`.
pub fn fmt_elapsed(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    if minutes < 60 {
        return format!("{minutes}m {seconds}s");
    }
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours < 24 {
        return format!("{hours}h {minutes}m");
    }
    let days = hours / 24;
    let hours = hours % 24;
    format!("{days}d {hours}h")
}

// ── Usage percentage ──────────────────────────────────────────────────

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Percentage of the usage ceiling consumed, rounded up to a whole
/// percent. A ceiling of zero divides to infinity (or NaN at zero
/// bytes); callers treat those through [`is_over_limit`].
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn usage_pct(bytes: u64, ceiling_gb: f64) -> f64 {
    (bytes as f64 / (ceiling_gb * BYTES_PER_GB) * 100.0).ceil()
}

/// Whether a usage percentage crosses the alert threshold.
///
/// Written as NaN-or-gte rather than `>= 100.0` alone so that a
/// non-finite percentage (broken ceiling) reads as an alert, never as
/// headroom.
pub fn is_over_limit(pct: f64) -> bool {
    pct.is_nan() || pct >= 100.0
}

/// Split a usage percentage into filled and empty bar segments of
/// `width` cells total.
///
/// At or beyond the alert threshold the bar saturates: an over-quota
/// peer shows a completely filled bar, same as one at exactly 100%.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn usage_bar(pct: f64, width: u16) -> (String, String) {
    let clamped = if is_over_limit(pct) {
        100.0
    } else {
        pct.clamp(0.0, 100.0)
    };
    let filled = ((clamped / 100.0) * f64::from(width)).round() as u16;
    let empty = width.saturating_sub(filled);
    ("█".repeat(usize::from(filled)), "░".repeat(usize::from(empty)))
}
