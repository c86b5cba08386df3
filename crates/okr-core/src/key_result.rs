// key_result.rs — KeyResult: a measurable sub-target of a goal.
//
// Each key result tracks a current/target numeric pair. Its progress is the
// clamped percentage current/target, and a goal's overall progress is the
// rounded mean of its key results' progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A goal holds at most this many key results.
pub const MAX_KEY_RESULTS: usize = 5;

/// Tracking state of a key result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyResultStatus {
    InProgress,
    /// Reached automatically once `current_value >= target_value`.
    Completed,
    Cancelled,
}

/// A measurable sub-target that rolls up into its goal's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResult {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_value: f64,
    pub current_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub status: KeyResultStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KeyResult {
    /// Completion percentage, clamped to 0–100.
    ///
    /// A zero target yields 0 — there is nothing meaningful to measure
    /// against.
    pub fn progress(&self) -> u8 {
        if self.target_value == 0.0 {
            return 0;
        }
        let pct = (self.current_value / self.target_value * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// A goal's overall progress: the rounded mean of its key results' clamped
/// progress. Zero key results means progress 0.
pub fn aggregate_progress(key_results: &[KeyResult]) -> u8 {
    if key_results.is_empty() {
        return 0;
    }
    let total: u32 = key_results.iter().map(|kr| u32::from(kr.progress())).sum();
    let mean = f64::from(total) / key_results.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}
