use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock in milliseconds, the unit every game tick takes.
pub fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
        * 1000.0
}
