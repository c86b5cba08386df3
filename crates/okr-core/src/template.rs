// template.rs — Goal templates: reference archetypes for goal creation.
//
// A template's suggested key results are copied field-by-field into a new
// goal at creation time. No reference from the created goal back to the
// template survives, so templates may change independently afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::{GoalKind, GoalPriority};

/// A suggested key result carried by a template: title/target/unit only,
/// no numeric state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedKeyResult {
    pub title: String,
    pub target_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A reference archetype used to pre-populate a new goal's key results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalTemplate {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The goal kind this template applies to.
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_priority: Option<GoalPriority>,
    pub suggested_key_results: Vec<SuggestedKeyResult>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
