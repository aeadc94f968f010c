use chrono::Duration;

/// Seconds-to-minutes, minutes-to-hours, hours-to-days
const UNITS: [(u64, &str); 3] = [(60, "m"), (60, "h"), (24, "d")];

fn div_round(n: u64, d: u64) -> u64 {
    n / d + u64::from(n % d * 2 >= d)
}

/// Magnitude of `span` in its largest whole unit, rounded to nearest at
/// each step ("5m", "2h", "3d"). `None` below half a minute.
fn compact(span: Duration) -> Option<String> {
    let mut value = span.num_seconds().unsigned_abs();
    let mut label = None;
    for (per, suffix) in UNITS {
        if label.is_some() && value < per {
            break;
        }
        value = div_round(value, per);
        if value == 0 {
            return None;
        }
        label = Some(suffix);
    }
    label.map(|suffix| format!("{}{}", value, suffix))
}

/// How long ago a credential was issued: "just now", "5m ago", "3d ago".
///
/// A negative age (issued in the future by a skewed clock) reads as "just now".
pub fn format_age(age: Duration) -> String {
    match compact(age).filter(|_| age > Duration::zero()) {
        Some(span) => format!("{} ago", span),
        None => "just now".to_string(),
    }
}

/// Time left on a credential, negative once it has lapsed.
pub fn format_expiry(left: Duration) -> String {
    match (left >= Duration::zero(), compact(left)) {
        (true, Some(span)) => format!("expires in {}", span),
        (true, None) => "expires in under a minute".to_string(),
        (false, Some(span)) => format!("expired {} ago", span),
        (false, None) => "expired just now".to_string(),
    }
}
