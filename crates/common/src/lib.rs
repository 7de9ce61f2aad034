mod env;

pub use env::EnvVars;

use std::sync::atomic::{AtomicI64, Ordering};

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(0);

/// Unix epoch milliseconds, strictly increasing within this process.
/// Records created back to back always get distinct timestamps, so
/// creation order stays a total order.
pub fn get_current_timestamp() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_TIMESTAMP.compare_exchange(last, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_strictly_increasing() {
        let mut previous = get_current_timestamp();
        for _ in 0..1000 {
            let next = get_current_timestamp();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn timestamps_track_wall_clock() {
        let now = chrono::Utc::now().timestamp_millis();
        let ts = get_current_timestamp();
        // Within a generous second of the wall clock, unless the counter
        // was bumped ahead by earlier calls in this process.
        assert!(ts >= now - 1000);
    }
}
