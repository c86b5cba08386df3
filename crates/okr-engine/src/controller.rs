// controller.rs — Goal Lifecycle Controller: the engine's public contract.
//
// GoalService validates preconditions, enforces the status state machine,
// delegates numeric work to the ledger, graph work to the alignment
// resolver, and audit work to the recorder, then persists through the store
// in atomic write batches.
//
// Authorization stays outside: callers pass a Capabilities value describing
// what they may do, and the engine checks those predicates without knowing
// anything about roles.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use okr_core::{
    aggregate_progress, goal::validate_title, EngineError, EngineResult, Goal, GoalCreateRequest,
    GoalPriority, GoalProgressRequest, GoalStatus, GoalStore, GoalTemplate, GoalUpdateRequest,
    GoalVisibility, KeyResult, KeyResultCreateRequest, KeyResultUpdateRequest, OwnerDirectory,
    WriteBatch, MAX_KEY_RESULTS,
};

use crate::alignment::AlignmentResolver;
use crate::ledger::{build_key_result, KeyResultLedger};
use crate::pacing;
use crate::query::{filter_and_sort, GoalQuery};
use crate::recorder::HistoryRecorder;
use crate::templates::TemplateCatalog;
use crate::view::{
    AlignmentNode, GoalDetail, GoalListItem, HistoryEntryView, KeyResultView, KeyResultsSummary,
    Page, ParentGoalSummary, ProgressUpdate,
};

/// What the calling principal is allowed to do. The engine checks these
/// predicates; deciding them (roles, tenancy) is the caller's concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    /// May approve or reject pending goals.
    pub can_approve: bool,
}

/// How a delete request was honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Draft goal, permanently removed.
    Removed,
    /// Pending/active goal, soft-cancelled and retained for history.
    Cancelled,
}

/// The goal lifecycle controller.
pub struct GoalService {
    store: Arc<dyn GoalStore>,
    owners: Arc<dyn OwnerDirectory>,
    templates: Arc<dyn TemplateCatalog>,
    recorder: HistoryRecorder,
}

impl GoalService {
    pub fn new(
        store: Arc<dyn GoalStore>,
        owners: Arc<dyn OwnerDirectory>,
        templates: Arc<dyn TemplateCatalog>,
    ) -> Self {
        GoalService {
            store,
            owners,
            templates,
            recorder: HistoryRecorder::new(),
        }
    }

    // --- lifecycle -------------------------------------------------------

    /// Create a goal in draft, optionally pre-populated from a template
    /// and/or explicit key results (at most five combined).
    pub fn create(&self, req: &GoalCreateRequest) -> EngineResult<GoalDetail> {
        let title = validate_title(req.title.as_deref().unwrap_or(""), "title")?;
        let kind = req
            .kind
            .ok_or_else(|| EngineError::field("type", "Goal type is required"))?;
        let due_date = req
            .due_date
            .ok_or_else(|| EngineError::field("due_date", "Due date is required"))?;
        let owner_id = req
            .owner_id
            .ok_or_else(|| EngineError::field("owner_id", "Owner is required"))?;
        self.owners.require_owner(owner_id)?;

        if let Some(parent_id) = req.parent_goal_id {
            if self.store.goal(parent_id)?.is_none() {
                return Err(EngineError::not_found("parent goal", parent_id));
            }
        }

        // Template key results come first; the snapshot copy keeps no
        // reference back to the template.
        let mut priority = req.priority;
        let mut kr_requests: Vec<KeyResultCreateRequest> = Vec::new();
        if let Some(template_id) = req.template_id {
            let template = self.templates.require(template_id)?;
            if priority.is_none() {
                priority = template.default_priority;
            }
            kr_requests.extend(template.suggested_key_results.iter().map(|s| {
                KeyResultCreateRequest {
                    title: Some(s.title.clone()),
                    description: None,
                    target_value: Some(s.target_value),
                    unit: s.unit.clone(),
                }
            }));
        }
        kr_requests.extend(req.key_results.iter().cloned());
        if kr_requests.len() > MAX_KEY_RESULTS {
            return Err(EngineError::field(
                "key_results",
                "Maximum 5 key results allowed",
            ));
        }

        let goal_id = Uuid::new_v4();
        let key_results: Vec<KeyResult> = kr_requests
            .iter()
            .map(|kr| build_key_result(goal_id, kr))
            .collect::<EngineResult<_>>()?;

        let now = Utc::now();
        let goal = Goal {
            id: goal_id,
            title,
            description: req.description.as_ref().map(|d| d.trim().to_string()),
            kind,
            status: GoalStatus::Draft,
            progress: aggregate_progress(&key_results),
            priority: priority.unwrap_or(GoalPriority::Medium),
            visibility: req.visibility.unwrap_or(GoalVisibility::Team),
            owner_id,
            parent_goal_id: req.parent_goal_id,
            tags: req.tags.clone().unwrap_or_default(),
            start_date: req.start_date,
            due_date,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut batch = WriteBatch::new();
        batch.put_goal(goal.clone());
        for kr in key_results {
            // Baseline entry per key result, same as a later add would log.
            batch.append_history(self.recorder.entry(
                goal.id,
                Some(kr.id),
                0.0,
                kr.current_value,
                None,
                owner_id,
            ));
            batch.put_key_result(kr);
        }
        self.store.apply(batch)?;

        tracing::info!(goal_id = %goal.id, owner_id = %owner_id, "goal created");
        self.detail(&goal)
    }

    pub fn get(&self, id: Uuid) -> EngineResult<GoalDetail> {
        let goal = self.store.require_goal(id)?;
        self.detail(&goal)
    }

    pub fn list(&self, query: &GoalQuery) -> EngineResult<Page<GoalListItem>> {
        let goals = filter_and_sort(self.store.goals()?, query);
        let page = Page::slice(goals, query.page(), query.per_page());
        let items = page
            .items
            .iter()
            .map(|g| self.list_item(g))
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Page {
            items,
            page: page.page,
            per_page: page.per_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
        })
    }

    /// Update goal fields. Terminal goals are immutable; status never
    /// changes through here — only through the lifecycle actions.
    pub fn update(&self, id: Uuid, req: &GoalUpdateRequest) -> EngineResult<GoalDetail> {
        let mut goal = self.store.require_goal(id)?;
        if goal.status.is_terminal() {
            return Err(EngineError::conflict(format!(
                "Cannot update a {} goal",
                goal.status
            )));
        }
        if req.status.is_some() {
            return Err(EngineError::conflict(
                "Status changes only through submit/approve/reject/progress/delete",
            ));
        }

        if let Some(title) = &req.title {
            goal.title = validate_title(title, "title")?;
        }
        if let Some(description) = &req.description {
            goal.description = description.as_ref().map(|d| d.trim().to_string());
        }
        if let Some(kind) = req.kind {
            goal.kind = kind;
        }
        if let Some(priority) = req.priority {
            goal.priority = priority;
        }
        if let Some(visibility) = req.visibility {
            goal.visibility = visibility;
        }
        if let Some(owner_id) = req.owner_id {
            self.owners.require_owner(owner_id)?;
            goal.owner_id = owner_id;
        }
        match req.parent_goal_id {
            // Re-parenting always re-runs existence and cycle checks.
            Some(Some(parent_id)) => {
                AlignmentResolver::new(self.store.as_ref()).validate_parent(&goal, parent_id)?;
                goal.parent_goal_id = Some(parent_id);
            }
            Some(None) => goal.parent_goal_id = None,
            None => {}
        }
        if let Some(start_date) = req.start_date {
            goal.start_date = Some(start_date);
        }
        if let Some(due_date) = req.due_date {
            goal.due_date = due_date;
        }
        if let Some(tags) = &req.tags {
            goal.tags = tags.clone();
        }
        goal.touch();

        let mut batch = WriteBatch::new();
        batch.put_goal(goal.clone());
        self.store.apply(batch)?;
        self.detail(&goal)
    }

    /// Delete a goal: drafts are removed outright, pending/active goals are
    /// soft-cancelled, completed goals are immutable history. A goal with
    /// children cannot be deleted at all.
    pub fn delete(&self, id: Uuid) -> EngineResult<DeleteOutcome> {
        let goal = self.store.require_goal(id)?;
        let resolver = AlignmentResolver::new(self.store.as_ref());
        if !resolver.children(id)?.is_empty() {
            return Err(EngineError::conflict(
                "Cannot delete goal with child goals. Delete child goals first.",
            ));
        }

        match goal.status {
            GoalStatus::Draft => {
                let mut batch = WriteBatch::new();
                batch.delete_goal(id);
                for kr in self.store.key_results_for(id)? {
                    batch.delete_key_result(kr.id);
                }
                self.store.apply(batch)?;
                tracing::info!(goal_id = %id, "draft goal removed");
                Ok(DeleteOutcome::Removed)
            }
            GoalStatus::Completed => Err(EngineError::conflict("Cannot delete completed goals")),
            GoalStatus::Cancelled => {
                Err(EngineError::conflict("Goal is already cancelled"))
            }
            GoalStatus::Pending | GoalStatus::Active => {
                let mut goal = goal;
                goal.transition(GoalStatus::Cancelled)?;
                let mut batch = WriteBatch::new();
                batch.put_goal(goal);
                self.store.apply(batch)?;
                tracing::info!(goal_id = %id, "goal cancelled");
                Ok(DeleteOutcome::Cancelled)
            }
        }
    }

    /// Submit a draft for approval. Requires at least one key result —
    /// a goal with nothing measurable cannot enter review.
    pub fn submit(&self, id: Uuid) -> EngineResult<GoalDetail> {
        let mut goal = self.store.require_goal(id)?;
        if goal.status != GoalStatus::Draft {
            return Err(EngineError::conflict(
                "Only draft goals can be submitted for approval",
            ));
        }
        if self.store.key_results_for(id)?.is_empty() {
            return Err(EngineError::conflict(
                "Goal must have at least one key result before submission",
            ));
        }
        goal.transition(GoalStatus::Pending)?;
        let mut batch = WriteBatch::new();
        batch.put_goal(goal.clone());
        self.store.apply(batch)?;
        tracing::info!(goal_id = %id, "goal submitted for approval");
        self.detail(&goal)
    }

    pub fn approve(&self, id: Uuid, caps: Capabilities) -> EngineResult<GoalDetail> {
        let mut goal = self.require_pending_for_review(id, caps)?;
        goal.transition(GoalStatus::Active)?;
        let mut batch = WriteBatch::new();
        batch.put_goal(goal.clone());
        self.store.apply(batch)?;
        tracing::info!(goal_id = %id, "goal approved");
        self.detail(&goal)
    }

    /// Send a pending goal back to draft. The rejection comment must carry
    /// enough substance for the owner to act on — at least 10 characters.
    pub fn reject(&self, id: Uuid, comment: &str, caps: Capabilities) -> EngineResult<GoalDetail> {
        let mut goal = self.require_pending_for_review(id, caps)?;
        if comment.trim().chars().count() < 10 {
            return Err(EngineError::field(
                "comment",
                "Rejection requires a comment of at least 10 characters",
            ));
        }
        goal.transition(GoalStatus::Draft)?;
        let mut batch = WriteBatch::new();
        batch.put_goal(goal.clone());
        self.store.apply(batch)?;
        tracing::info!(goal_id = %id, comment = %comment.trim(), "goal rejected");
        self.detail(&goal)
    }

    /// Direct progress update for active goals tracked as a plain
    /// percentage. Writes exactly one goal-level history entry; 100%
    /// completes the goal.
    pub fn update_progress(
        &self,
        id: Uuid,
        req: &GoalProgressRequest,
        actor: Option<Uuid>,
    ) -> EngineResult<ProgressUpdate> {
        let mut goal = self.store.require_goal(id)?;
        let progress = req
            .progress
            .ok_or_else(|| EngineError::field("progress", "Progress value is required"))?;
        if !(0.0..=100.0).contains(&progress) {
            return Err(EngineError::field(
                "progress",
                "Progress must be between 0 and 100",
            ));
        }
        if goal.status != GoalStatus::Active {
            return Err(EngineError::conflict(
                "Can only update progress on active goals",
            ));
        }

        let entry = self.recorder.entry(
            goal.id,
            None,
            f64::from(goal.progress),
            progress,
            req.note.clone(),
            actor.unwrap_or(goal.owner_id),
        );

        goal.progress = progress.round().clamp(0.0, 100.0) as u8;
        if progress >= 100.0 {
            goal.transition(GoalStatus::Completed)?;
        } else {
            goal.touch();
        }

        let mut batch = WriteBatch::new();
        batch.append_history(entry).put_goal(goal.clone());
        self.store.apply(batch)?;

        tracing::info!(goal_id = %id, progress = goal.progress, status = %goal.status, "progress updated");
        Ok(ProgressUpdate {
            id: goal.id,
            progress: goal.progress,
            status: goal.status,
            updated_at: goal.updated_at,
        })
    }

    // --- key results -----------------------------------------------------

    pub fn key_results(&self, goal_id: Uuid) -> EngineResult<Vec<KeyResultView>> {
        self.store.require_goal(goal_id)?;
        Ok(self
            .store
            .key_results_for(goal_id)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn add_key_result(
        &self,
        goal_id: Uuid,
        req: &KeyResultCreateRequest,
        actor: Option<Uuid>,
    ) -> EngineResult<KeyResultView> {
        let goal = self.store.require_goal(goal_id)?;
        let ledger = KeyResultLedger::new(self.store.as_ref(), &self.recorder);
        ledger
            .add(&goal, req, actor.unwrap_or(goal.owner_id))
            .map(Into::into)
    }

    pub fn update_key_result(
        &self,
        goal_id: Uuid,
        kr_id: Uuid,
        req: &KeyResultUpdateRequest,
        actor: Option<Uuid>,
    ) -> EngineResult<KeyResultView> {
        let goal = self.store.require_goal(goal_id)?;
        let ledger = KeyResultLedger::new(self.store.as_ref(), &self.recorder);
        ledger
            .update(&goal, kr_id, req, actor.unwrap_or(goal.owner_id))
            .map(Into::into)
    }

    pub fn delete_key_result(&self, goal_id: Uuid, kr_id: Uuid) -> EngineResult<()> {
        let goal = self.store.require_goal(goal_id)?;
        let ledger = KeyResultLedger::new(self.store.as_ref(), &self.recorder);
        ledger.delete(&goal, kr_id)
    }

    // --- history / alignment / templates ---------------------------------

    /// Paginated audit trail for a goal, newest first, covering both
    /// goal-level and key-result-level edits.
    pub fn history(
        &self,
        goal_id: Uuid,
        page: u32,
        per_page: u32,
    ) -> EngineResult<Page<HistoryEntryView>> {
        self.store.require_goal(goal_id)?;
        let entries = self.store.history_for(goal_id)?;
        let page = HistoryRecorder::paginate(entries, page, per_page)?;
        let items = page
            .items
            .into_iter()
            .map(|entry| {
                Ok(HistoryEntryView {
                    id: entry.id,
                    goal_id: entry.goal_id,
                    key_result_id: entry.key_result_id,
                    old_value: entry.old_value,
                    new_value: entry.new_value,
                    comment: entry.comment,
                    updated_by: self.owners.require_owner(entry.updated_by)?,
                    created_at: entry.created_at,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Page {
            items,
            page: page.page,
            per_page: page.per_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
        })
    }

    pub fn alignment_tree(&self, root: Option<Uuid>) -> EngineResult<Vec<AlignmentNode>> {
        AlignmentResolver::new(self.store.as_ref()).alignment_tree(root, self.owners.as_ref())
    }

    pub fn list_templates(
        &self,
        kind: Option<okr_core::GoalKind>,
        category: Option<&str>,
        active_only: bool,
    ) -> EngineResult<Vec<GoalTemplate>> {
        self.templates.list(kind, category, active_only)
    }

    pub fn template(&self, id: Uuid) -> EngineResult<GoalTemplate> {
        self.templates.require(id)
    }

    // --- helpers ---------------------------------------------------------

    fn require_pending_for_review(&self, id: Uuid, caps: Capabilities) -> EngineResult<Goal> {
        if !caps.can_approve {
            return Err(EngineError::conflict(
                "Caller is not permitted to approve or reject goals",
            ));
        }
        let goal = self.store.require_goal(id)?;
        if goal.status != GoalStatus::Pending {
            return Err(EngineError::conflict(
                "Only pending goals can be approved or rejected",
            ));
        }
        Ok(goal)
    }

    fn detail(&self, goal: &Goal) -> EngineResult<GoalDetail> {
        let owner = self.owners.require_owner(goal.owner_id)?;
        let key_results = self.store.key_results_for(goal.id)?;
        let resolver = AlignmentResolver::new(self.store.as_ref());
        let parent_goal = match goal.parent_goal_id {
            Some(parent_id) => self
                .store
                .goal(parent_id)?
                .map(|p| ParentGoalSummary::from(&p)),
            None => None,
        };
        let child_goals = resolver.children(goal.id)?;
        let expected_progress = pacing::expected_progress(goal.start_date, goal.due_date, Utc::now());
        let pace = pacing::indicator(goal.progress, expected_progress);
        Ok(GoalDetail {
            id: goal.id,
            title: goal.title.clone(),
            description: goal.description.clone(),
            kind: goal.kind,
            status: goal.status,
            progress: goal.progress,
            priority: goal.priority,
            visibility: goal.visibility,
            owner,
            owner_id: goal.owner_id,
            parent_goal,
            parent_goal_id: goal.parent_goal_id,
            child_goals,
            key_results: key_results.into_iter().map(Into::into).collect(),
            tags: goal.tags.clone(),
            start_date: goal.start_date,
            due_date: goal.due_date,
            completed_at: goal.completed_at,
            expected_progress,
            pace,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        })
    }

    fn list_item(&self, goal: &Goal) -> EngineResult<GoalListItem> {
        let owner = self.owners.require_owner(goal.owner_id)?;
        let key_results = self.store.key_results_for(goal.id)?;
        let parent_goal = match goal.parent_goal_id {
            Some(parent_id) => self
                .store
                .goal(parent_id)?
                .map(|p| ParentGoalSummary::from(&p)),
            None => None,
        };
        Ok(GoalListItem {
            id: goal.id,
            title: goal.title.clone(),
            description: goal.description.clone(),
            kind: goal.kind,
            status: goal.status,
            progress: goal.progress,
            priority: goal.priority,
            owner,
            parent_goal,
            start_date: goal.start_date,
            due_date: goal.due_date,
            key_results: KeyResultsSummary::of(&key_results),
            created_at: goal.created_at,
        })
    }
}
