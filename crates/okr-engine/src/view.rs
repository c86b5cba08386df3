// view.rs — Read models served to callers.
//
// These are the shapes the engine exposes to dashboard and review
// consumers: goals with owners resolved and progress computed, alignment
// summaries, paginated history. Consumers never mutate engine state through
// these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use okr_core::{
    Goal, GoalKind, GoalPriority, GoalStatus, GoalVisibility, KeyResult, KeyResultStatus,
    OwnerSummary,
};

use crate::pacing::ProgressIndicator;

/// A key result with its computed progress percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResultView {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_value: f64,
    pub current_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub progress: u8,
    pub status: KeyResultStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<KeyResult> for KeyResultView {
    fn from(kr: KeyResult) -> Self {
        let progress = kr.progress();
        KeyResultView {
            id: kr.id,
            goal_id: kr.goal_id,
            title: kr.title,
            description: kr.description,
            target_value: kr.target_value,
            current_value: kr.current_value,
            unit: kr.unit,
            progress,
            status: kr.status,
            created_at: kr.created_at,
            updated_at: kr.updated_at,
        }
    }
}

/// Count summary for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResultsSummary {
    pub total: usize,
    pub completed: usize,
}

impl KeyResultsSummary {
    pub fn of(key_results: &[KeyResult]) -> Self {
        KeyResultsSummary {
            total: key_results.len(),
            completed: key_results
                .iter()
                .filter(|kr| kr.status == KeyResultStatus::Completed)
                .count(),
        }
    }
}

/// Lightweight reference to a goal's parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentGoalSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub status: GoalStatus,
}

impl From<&Goal> for ParentGoalSummary {
    fn from(goal: &Goal) -> Self {
        ParentGoalSummary {
            id: goal.id,
            title: goal.title.clone(),
            kind: goal.kind,
            status: goal.status,
        }
    }
}

/// Immediate child of a goal, for rollups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildGoalSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub status: GoalStatus,
    pub progress: u8,
}

/// Full goal detail with owner, alignment context, and pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDetail {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub status: GoalStatus,
    pub progress: u8,
    pub priority: GoalPriority,
    pub visibility: GoalVisibility,
    pub owner: OwnerSummary,
    pub owner_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_goal: Option<ParentGoalSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_goal_id: Option<Uuid>,
    pub child_goals: Vec<ChildGoalSummary>,
    pub key_results: Vec<KeyResultView>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub expected_progress: u8,
    pub pace: ProgressIndicator,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lighter goal shape for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalListItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub status: GoalStatus,
    pub progress: u8,
    pub priority: GoalPriority,
    pub owner: OwnerSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_goal: Option<ParentGoalSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    pub key_results: KeyResultsSummary,
    pub created_at: DateTime<Utc>,
}

/// A node in the alignment tree, nested depth-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentNode {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub status: GoalStatus,
    pub progress: u8,
    pub owner: OwnerSummary,
    pub children: Vec<AlignmentNode>,
}

/// A history entry with the acting owner resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntryView {
    pub id: Uuid,
    pub goal_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_result_id: Option<Uuid>,
    pub old_value: f64,
    pub new_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub updated_by: OwnerSummary,
    pub created_at: DateTime<Utc>,
}

/// Result of the direct progress action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub id: Uuid,
    pub progress: u8,
    pub status: GoalStatus,
    pub updated_at: DateTime<Utc>,
}

/// One page of results plus the pagination facts callers echo back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: usize,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice `all` into the requested page. `page` is 1-based; `per_page`
    /// is clamped to 1–100.
    pub fn slice(all: Vec<T>, page: u32, per_page: u32) -> Self {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let total_items = all.len();
        let total_pages = (total_items as u32).div_ceil(per_page);
        // Widen before multiplying; the query string can carry page numbers
        // up to u32::MAX.
        let start = (page as usize - 1) * per_page as usize;
        let items: Vec<T> = all
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();
        Page {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_slices_and_counts() {
        let all: Vec<u32> = (0..45).collect();
        let page = Page::slice(all, 2, 20);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0], 20);
        assert_eq!(page.total_items, 45);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::slice(vec![1, 2, 3], 5, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn per_page_is_clamped_to_100() {
        let all: Vec<u32> = (0..250).collect();
        let page = Page::slice(all, 1, 500);
        assert_eq!(page.per_page, 100);
        assert_eq!(page.items.len(), 100);
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        let page = Page::slice(vec![1, 2, 3], 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn maximum_page_number_is_empty_not_a_panic() {
        let page = Page::slice(vec![1, 2, 3], u32::MAX, 100);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
    }
}
