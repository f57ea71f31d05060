//! Age formatting.
//!
//! Ages are rendered with the single largest unit that fits, the same way
//! `kubectl get` prints its short ages: `3d`, `5h`, `12m`, `40s`. Units are
//! never combined.

use chrono::Duration;

/// Rendered when the creation timestamp is unknown.
pub const UNKNOWN_AGE: &str = "unknown";

/// Format an elapsed duration using its largest whole unit.
///
/// Negative durations (clock skew between the cluster and this process) are
/// rendered as `0s`.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use kubeboard_core::age::format_age;
///
/// assert_eq!(format_age(Duration::minutes(90)), "1h");
/// assert_eq!(format_age(Duration::seconds(45)), "45s");
/// assert_eq!(format_age(Duration::hours(25)), "1d");
/// ```
#[must_use]
pub fn format_age(elapsed: Duration) -> String {
    let elapsed = elapsed.max(Duration::zero());

    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        format!("{}s", elapsed.num_seconds())
    }
}

/// Format an optional age, falling back to [`UNKNOWN_AGE`].
#[must_use]
pub fn format_optional_age(elapsed: Option<Duration>) -> String {
    elapsed.map_or_else(|| UNKNOWN_AGE.to_string(), format_age)
}
