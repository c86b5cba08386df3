// ledger.rs — Key Result Ledger: key-result CRUD and progress aggregation.
//
// The ledger is the sole authoritative path that turns key-result values
// into a goal's overall progress. Every mutation recomputes the owning
// goal's progress and stages it in the same write batch as the key-result
// change; a value change additionally stages its history entry first, so
// audit and value commit together.
//
// Note the deliberate asymmetry with the lifecycle controller: ledger
// recomputation never transitions a goal's status, even at 100%. Only the
// direct progress action completes a goal.

use uuid::Uuid;

use okr_core::{
    aggregate_progress, goal::validate_title, time, EngineError, EngineResult, Goal, GoalStatus,
    GoalStore, KeyResult, KeyResultCreateRequest, KeyResultStatus, KeyResultUpdateRequest,
    WriteBatch, MAX_KEY_RESULTS,
};

use crate::recorder::HistoryRecorder;

/// Build a new key result from a creation request.
///
/// New key results always start at `current_value = 0`, in progress,
/// regardless of what the request claims.
pub fn build_key_result(goal_id: Uuid, req: &KeyResultCreateRequest) -> EngineResult<KeyResult> {
    let title = validate_title(req.title.as_deref().unwrap_or(""), "title")?;
    let target_value = req
        .target_value
        .ok_or_else(|| EngineError::field("target_value", "Target value is required"))?;
    let now = chrono::Utc::now();
    Ok(KeyResult {
        id: Uuid::new_v4(),
        goal_id,
        title,
        description: req.description.as_ref().map(|d| d.trim().to_string()),
        target_value,
        current_value: 0.0,
        unit: req.unit.clone(),
        status: KeyResultStatus::InProgress,
        created_at: now,
        updated_at: now,
    })
}

/// Key-result operations over a goal, bound to a store and recorder.
pub struct KeyResultLedger<'a> {
    store: &'a dyn GoalStore,
    recorder: &'a HistoryRecorder,
}

impl<'a> KeyResultLedger<'a> {
    pub fn new(store: &'a dyn GoalStore, recorder: &'a HistoryRecorder) -> Self {
        KeyResultLedger { store, recorder }
    }

    /// Add a key result to a goal. Rejected once the goal already holds
    /// the maximum of five. Creation establishes the key result's baseline
    /// value, so it logs a history entry like any other value change.
    pub fn add(
        &self,
        goal: &Goal,
        req: &KeyResultCreateRequest,
        actor: Uuid,
    ) -> EngineResult<KeyResult> {
        let existing = self.store.key_results_for(goal.id)?;
        if existing.len() >= MAX_KEY_RESULTS {
            return Err(EngineError::validation(
                "Maximum 5 key results per goal allowed",
            ));
        }
        let kr = build_key_result(goal.id, req)?;

        let mut batch = WriteBatch::new();
        batch.append_history(self.recorder.entry(
            goal.id,
            Some(kr.id),
            0.0,
            kr.current_value,
            None,
            actor,
        ));
        batch.put_key_result(kr.clone());
        let mut all = existing;
        all.push(kr.clone());
        self.stage_progress(&mut batch, goal, &all);
        self.store.apply(batch)?;

        tracing::debug!(goal_id = %goal.id, key_result_id = %kr.id, "key result added");
        Ok(kr)
    }

    /// Update a key result's fields.
    ///
    /// A change to `current_value` logs the delta before the new value
    /// commits. Reaching the target (the request's if supplied, else the
    /// stored one) auto-completes the key result, overriding any supplied
    /// status.
    pub fn update(
        &self,
        goal: &Goal,
        kr_id: Uuid,
        req: &KeyResultUpdateRequest,
        actor: Uuid,
    ) -> EngineResult<KeyResult> {
        let mut kr = self
            .store
            .key_result(goal.id, kr_id)?
            .ok_or_else(|| EngineError::not_found("key result", kr_id))?;

        let mut batch = WriteBatch::new();

        // The audit entry is staged ahead of the value it records; the
        // batch commits both or neither.
        if let Some(new_current) = req.current_value {
            if new_current != kr.current_value {
                batch.append_history(self.recorder.entry(
                    goal.id,
                    Some(kr.id),
                    kr.current_value,
                    new_current,
                    None,
                    actor,
                ));
            }
        }

        if let Some(title) = &req.title {
            kr.title = validate_title(title, "title")?;
        }
        if let Some(description) = &req.description {
            kr.description = description.as_ref().map(|d| d.trim().to_string());
        }
        if let Some(target) = req.target_value {
            kr.target_value = target;
        }
        if let Some(status) = req.status {
            kr.status = status;
        }
        if let Some(current) = req.current_value {
            kr.current_value = current;
            if current >= kr.target_value {
                kr.status = KeyResultStatus::Completed;
            }
        }
        if let Some(unit) = &req.unit {
            kr.unit = Some(unit.clone());
        }
        kr.updated_at = time::strictly_after(kr.updated_at);

        batch.put_key_result(kr.clone());

        let mut all = self.store.key_results_for(goal.id)?;
        if let Some(slot) = all.iter_mut().find(|existing| existing.id == kr.id) {
            *slot = kr.clone();
        }
        self.stage_progress(&mut batch, goal, &all);
        self.store.apply(batch)?;

        Ok(kr)
    }

    /// Delete a key result. Removing the last key result of an active goal
    /// is rejected — active goals must stay measurable.
    pub fn delete(&self, goal: &Goal, kr_id: Uuid) -> EngineResult<()> {
        let existing = self.store.key_results_for(goal.id)?;
        if !existing.iter().any(|kr| kr.id == kr_id) {
            return Err(EngineError::not_found("key result", kr_id));
        }
        if existing.len() <= 1 && goal.status == GoalStatus::Active {
            return Err(EngineError::conflict(
                "Active goals must have at least one key result",
            ));
        }

        let mut batch = WriteBatch::new();
        batch.delete_key_result(kr_id);
        let remaining: Vec<KeyResult> =
            existing.into_iter().filter(|kr| kr.id != kr_id).collect();
        self.stage_progress(&mut batch, goal, &remaining);
        self.store.apply(batch)?;

        tracing::debug!(goal_id = %goal.id, key_result_id = %kr_id, "key result deleted");
        Ok(())
    }

    /// Stage a goal write when its aggregated progress changed.
    fn stage_progress(&self, batch: &mut WriteBatch, goal: &Goal, key_results: &[KeyResult]) {
        let progress = aggregate_progress(key_results);
        if progress != goal.progress {
            let mut updated = goal.clone();
            updated.progress = progress;
            updated.touch();
            batch.put_goal(updated);
        }
    }
}
