// pacing.rs — Expected-progress calculator and on-track classifier.
//
// Pure and stateless. Expected progress interpolates linearly between start
// and due date; a goal with no start date gets no ramp and jumps straight to
// 100 once past due. The classifier compares actual to expected progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of actual vs. time-based expected progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressIndicator {
    OnTrack,
    AtRisk,
    Behind,
}

/// Time-based expected completion percentage at `now`, in 0–100.
///
/// 0 before `start`, 100 at or after `due`, linear in between. An absent
/// `start` defaults to `due`, collapsing the ramp.
pub fn expected_progress(
    start: Option<DateTime<Utc>>,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> u8 {
    let start = start.unwrap_or(due);
    if now < start {
        return 0;
    }
    if now >= due {
        return 100;
    }
    let total = (due - start).num_seconds();
    if total <= 0 {
        // Degenerate window (start at or past due) with now before due.
        return 0;
    }
    let elapsed = (now - start).num_seconds();
    let pct = (elapsed as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Classify actual progress against expected progress.
///
/// `ratio = actual / expected` (an expectation of 0 counts as on track);
/// ≥ 0.7 on_track, ≥ 0.4 at_risk, below that behind.
pub fn indicator(actual: u8, expected: u8) -> ProgressIndicator {
    if expected == 0 {
        return ProgressIndicator::OnTrack;
    }
    let ratio = f64::from(actual) / f64::from(expected);
    if ratio >= 0.7 {
        ProgressIndicator::OnTrack
    } else if ratio >= 0.4 {
        ProgressIndicator::AtRisk
    } else {
        ProgressIndicator::Behind
    }
}
