// query.rs — List filtering, sorting, and pagination for goals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use okr_core::{Goal, GoalKind, GoalPriority, GoalStatus};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalSortBy {
    Title,
    #[default]
    DueDate,
    Progress,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query parameters for the goal list operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalQuery {
    /// Matched against title, description, and tags; ignored under two
    /// characters.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<GoalKind>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub parent_goal_id: Option<Uuid>,
    #[serde(default)]
    pub priority: Option<GoalPriority>,
    #[serde(default)]
    pub due_before: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sort_by: Option<GoalSortBy>,
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl GoalQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }
}

/// Apply filters and sorting, leaving pagination to the caller.
pub fn filter_and_sort(mut goals: Vec<Goal>, query: &GoalQuery) -> Vec<Goal> {
    goals.retain(|g| {
        query.kind.is_none_or(|k| g.kind == k)
            && query.status.is_none_or(|s| g.status == s)
            && query.owner_id.is_none_or(|o| g.owner_id == o)
            && query.priority.is_none_or(|p| g.priority == p)
            && query
                .parent_goal_id
                .is_none_or(|p| g.parent_goal_id == Some(p))
            && query.due_before.is_none_or(|d| g.due_date <= d)
            && query.due_after.is_none_or(|d| g.due_date >= d)
            && matches_search(g, query.search.as_deref())
    });

    let sort_by = query.sort_by.unwrap_or_default();
    let order = query.sort_order.unwrap_or_default();
    goals.sort_by(|a, b| {
        let ordering = match sort_by {
            GoalSortBy::Title => a.title.cmp(&b.title),
            GoalSortBy::DueDate => a.due_date.cmp(&b.due_date),
            GoalSortBy::Progress => a.progress.cmp(&b.progress),
            GoalSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            GoalSortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    goals
}

fn matches_search(goal: &Goal, search: Option<&str>) -> bool {
    let Some(term) = search.map(str::trim).filter(|t| t.chars().count() >= 2) else {
        return true;
    };
    let term = term.to_lowercase();
    goal.title.to_lowercase().contains(&term)
        || goal
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&term))
        || goal.tags.iter().any(|t| t.to_lowercase().contains(&term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use okr_core::GoalVisibility;

    fn goal(title: &str, status: GoalStatus, due_in_days: i64, progress: u8) -> Goal {
        let now = Utc::now();
        Goal {
            id: Uuid::new_v4(),
            title: title.into(),
            description: Some("quarterly push".into()),
            kind: GoalKind::Team,
            status,
            progress,
            priority: GoalPriority::Medium,
            visibility: GoalVisibility::Team,
            owner_id: Uuid::new_v4(),
            parent_goal_id: None,
            tags: vec!["growth".into()],
            start_date: None,
            due_date: now + Duration::days(due_in_days),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_filter_applies() {
        let goals = vec![
            goal("a", GoalStatus::Draft, 10, 0),
            goal("b", GoalStatus::Active, 20, 40),
        ];
        let query = GoalQuery {
            status: Some(GoalStatus::Active),
            ..Default::default()
        };
        let result = filter_and_sort(goals, &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "b");
    }

    #[test]
    fn default_sort_is_due_date_ascending() {
        let goals = vec![
            goal("later", GoalStatus::Active, 30, 0),
            goal("sooner", GoalStatus::Active, 5, 0),
        ];
        let result = filter_and_sort(goals, &GoalQuery::default());
        assert_eq!(result[0].title, "sooner");
    }

    #[test]
    fn progress_sort_descending() {
        let goals = vec![
            goal("low", GoalStatus::Active, 10, 10),
            goal("high", GoalStatus::Active, 10, 90),
        ];
        let query = GoalQuery {
            sort_by: Some(GoalSortBy::Progress),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let result = filter_and_sort(goals, &query);
        assert_eq!(result[0].title, "high");
    }

    #[test]
    fn search_matches_title_description_and_tags() {
        let goals = vec![
            goal("Kubernetes migration", GoalStatus::Active, 10, 0),
            goal("Sales push", GoalStatus::Active, 10, 0),
        ];
        let query = GoalQuery {
            search: Some("kubernetes".into()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(goals.clone(), &query).len(), 1);

        // Tag match.
        let query = GoalQuery {
            search: Some("growth".into()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(goals.clone(), &query).len(), 2);

        // Single-character terms are ignored.
        let query = GoalQuery {
            search: Some("k".into()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(goals, &query).len(), 2);
    }

    #[test]
    fn due_window_filters() {
        let goals = vec![
            goal("near", GoalStatus::Active, 5, 0),
            goal("far", GoalStatus::Active, 50, 0),
        ];
        let query = GoalQuery {
            due_before: Some(Utc::now() + Duration::days(10)),
            ..Default::default()
        };
        let result = filter_and_sort(goals, &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "near");
    }

    #[test]
    fn page_defaults() {
        let query = GoalQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);

        let query = GoalQuery {
            per_page: Some(500),
            ..Default::default()
        };
        assert_eq!(query.per_page(), 100);
    }
}
