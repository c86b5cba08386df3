// goal.rs — Goal: the tracked objective and its lifecycle state machine.
//
// A Goal moves through a multi-stage approval lifecycle:
//   draft → pending → active → completed
//     (pending → draft on rejection; pending/active → cancelled on delete)
//
// Status never changes except through these enumerated transitions. Progress
// is derived from the goal's key results; the stored `progress` field is
// maintained by the key-result ledger (or by the direct progress action for
// goals tracked as a plain percentage).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::time;

/// Maximum title length accepted for goals and key results.
pub const MAX_TITLE_LEN: usize = 255;

/// The organizational level a goal belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Individual,
    Team,
    Department,
    Company,
}

/// The lifecycle state of a goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Being drafted by the owner — not yet submitted for approval.
    Draft,

    /// Submitted, awaiting manager approval.
    Pending,

    /// Approved and being tracked.
    Active,

    /// Reached 100% via the direct progress action. Immutable history.
    Completed,

    /// Soft-deleted while pending or active. Retained for history.
    Cancelled,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Draft => write!(f, "draft"),
            GoalStatus::Pending => write!(f, "pending"),
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl GoalStatus {
    /// Check whether transitioning from this status to `next` is valid.
    ///
    /// The valid transitions form a directed graph:
    ///   draft → pending (submit)
    ///   pending → active (approve) | draft (reject) | cancelled (delete)
    ///   active → completed (progress reaches 100) | cancelled (delete)
    pub fn can_transition_to(&self, next: GoalStatus) -> bool {
        matches!(
            (self, next),
            (GoalStatus::Draft, GoalStatus::Pending)
                | (GoalStatus::Pending, GoalStatus::Active)
                | (GoalStatus::Pending, GoalStatus::Draft)
                | (GoalStatus::Pending, GoalStatus::Cancelled)
                | (GoalStatus::Active, GoalStatus::Completed)
                | (GoalStatus::Active, GoalStatus::Cancelled)
        )
    }

    /// Completed and cancelled goals accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Cancelled)
    }
}

/// Importance ranking for display and sorting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

/// Who can see this goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalVisibility {
    Private,
    Team,
    Department,
    Company,
}

/// A tracked objective with an owner, due date, and lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,

    /// Human-readable title (1–255 chars).
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Organizational level.
    #[serde(rename = "type")]
    pub kind: GoalKind,

    /// Current lifecycle status. Mutated only via [`Goal::transition`].
    pub status: GoalStatus,

    /// Overall progress 0–100. Derived from key results by the ledger; 0
    /// for goals with none.
    pub progress: u8,

    pub priority: GoalPriority,
    pub visibility: GoalVisibility,

    /// The employee who owns this goal. Resolved through the owner
    /// directory at read time.
    pub owner_id: Uuid,

    /// Parent goal in the alignment forest, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_goal_id: Option<Uuid>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    pub due_date: DateTime<Utc>,

    /// Set if and only if status is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Transition to a new status. Returns an error if the state machine
    /// does not permit the move.
    ///
    /// Stamps `updated_at` (strictly increasing) and maintains the
    /// `completed_at ⇔ completed` invariant.
    pub fn transition(&mut self, next: GoalStatus) -> Result<(), EngineError> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::conflict(format!(
                "cannot transition goal {} from {} to {}",
                self.id, self.status, next
            )));
        }
        let now = time::strictly_after(self.updated_at);
        self.status = next;
        self.updated_at = now;
        self.completed_at = match next {
            GoalStatus::Completed => Some(now),
            _ => None,
        };
        Ok(())
    }

    /// Stamp `updated_at` after a field mutation. Strictly increasing.
    pub fn touch(&mut self) {
        self.updated_at = time::strictly_after(self.updated_at);
    }
}

/// Validate a goal or key-result title: non-empty after trimming, at most
/// 255 characters. Returns the trimmed title.
pub fn validate_title(raw: &str, field: &str) -> Result<String, EngineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::field(field, "Title is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(EngineError::field(
            field,
            "Title must be 255 characters or less",
        ));
    }
    Ok(trimmed.to_string())
}
