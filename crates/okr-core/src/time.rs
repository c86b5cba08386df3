// time.rs — Timestamp helpers.

use chrono::{DateTime, Duration, Utc};

/// Current time, guaranteed strictly after `prev`.
///
/// Lifecycle transitions must strictly advance `updated_at`, and the history
/// recorder must issue strictly increasing `created_at` values. Wall-clock
/// reads can repeat at coarse resolution, so when `now` does not beat `prev`
/// we step one microsecond past it.
pub fn strictly_after(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_advances() {
        let t0 = Utc::now();
        let t1 = strictly_after(t0);
        let t2 = strictly_after(t1);
        assert!(t1 > t0);
        assert!(t2 > t1);
    }

    #[test]
    fn advances_past_a_future_timestamp() {
        let future = Utc::now() + Duration::seconds(60);
        let next = strictly_after(future);
        assert!(next > future);
    }
}
