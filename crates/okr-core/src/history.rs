// history.rs — Immutable progress-history entries.
//
// One entry is appended for every numeric value change, at goal level
// (key_result_id absent) or key-result level. Entries are never updated or
// deleted; the ledger and lifecycle controller commit an entry in the same
// write batch as the value change it records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only audit record of one value change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressHistoryEntry {
    pub id: Uuid,
    pub goal_id: Uuid,
    /// Absent for goal-level progress edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_result_id: Option<Uuid>,
    pub old_value: f64,
    pub new_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// The owner who made the change.
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_level_entry_omits_key_result_id() {
        let entry = ProgressHistoryEntry {
            id: Uuid::new_v4(),
            goal_id: Uuid::new_v4(),
            key_result_id: None,
            old_value: 40.0,
            new_value: 60.0,
            comment: Some("Completed modules 1-3".into()),
            updated_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("key_result_id"));
        let restored: ProgressHistoryEntry = serde_json::from_str(&json).unwrap();
        assert!(restored.key_result_id.is_none());
        assert_eq!(restored.new_value, 60.0);
    }
}
