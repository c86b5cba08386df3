// request.rs — Mutation request DTOs consumed by the engine.
//
// Required fields arrive as Options and are validated by the controller so
// a missing field surfaces as a VALIDATION_ERROR envelope rather than a
// deserialization failure. Update requests distinguish "field absent" from
// "field set to null" where the distinction matters (clearing a parent).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::goal::{GoalKind, GoalPriority, GoalStatus, GoalVisibility};
use crate::key_result::KeyResultStatus;

/// Deserialize a nullable field so that absence and explicit null are
/// distinguishable: absent → `None`, null → `Some(None)`, value →
/// `Some(Some(v))`. Pair with `#[serde(default)]`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalCreateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<GoalKind>,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub parent_goal_id: Option<Uuid>,
    #[serde(default)]
    pub priority: Option<GoalPriority>,
    #[serde(default)]
    pub visibility: Option<GoalVisibility>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Copy this template's suggested key results into the new goal.
    #[serde(default)]
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub key_results: Vec<KeyResultCreateRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, rename = "type")]
    pub kind: Option<GoalKind>,
    /// Present in the wire format for compatibility, but status never
    /// changes through a field update — only through the lifecycle actions.
    #[serde(default)]
    pub status: Option<GoalStatus>,
    #[serde(default)]
    pub priority: Option<GoalPriority>,
    #[serde(default)]
    pub visibility: Option<GoalVisibility>,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    /// `Some(None)` clears the parent; `Some(Some(id))` re-parents (with
    /// cycle detection); absent leaves it untouched.
    #[serde(default, deserialize_with = "nullable")]
    pub parent_goal_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalProgressRequest {
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyResultCreateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyResultUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Ignored in favor of auto-completion when the new current value
    /// reaches the target.
    #[serde(default)]
    pub status: Option<KeyResultStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let absent: GoalUpdateRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.parent_goal_id.is_none());

        let null: GoalUpdateRequest =
            serde_json::from_str(r#"{"parent_goal_id": null}"#).unwrap();
        assert_eq!(null.parent_goal_id, Some(None));

        let id = Uuid::new_v4();
        let set: GoalUpdateRequest =
            serde_json::from_str(&format!(r#"{{"parent_goal_id": "{id}"}}"#)).unwrap();
        assert_eq!(set.parent_goal_id, Some(Some(id)));
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req: GoalCreateRequest = serde_json::from_str(r#"{"title": "Launch X"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("Launch X"));
        assert!(req.due_date.is_none());
        assert!(req.key_results.is_empty());
    }
}
