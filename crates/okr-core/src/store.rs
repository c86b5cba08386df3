// store.rs — GoalStore: persistence seam for goals, key results, and history.
//
// The engine treats storage as a transactional key-value store. All reads go
// through the trait methods; all writes are staged into a WriteBatch and
// committed atomically via `apply`. This is what upholds the one internal
// ordering guarantee: a value change and its history entry land together or
// not at all.
//
// MemoryStore is the reference implementation. Storage technology is an
// external concern — a real datastore substitutes here without touching the
// controller, ledger, or resolver.

use std::collections::BTreeMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::goal::Goal;
use crate::history::ProgressHistoryEntry;
use crate::key_result::KeyResult;

/// One staged write. Mutations are total: deleting an absent record is a
/// no-op, so a batch cannot fail halfway through its application.
#[derive(Debug, Clone)]
pub enum Mutation {
    PutGoal(Goal),
    DeleteGoal(Uuid),
    PutKeyResult(KeyResult),
    DeleteKeyResult(Uuid),
    AppendHistory(ProgressHistoryEntry),
}

/// An ordered set of mutations committed as a unit.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    mutations: Vec<Mutation>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_goal(&mut self, goal: Goal) -> &mut Self {
        self.mutations.push(Mutation::PutGoal(goal));
        self
    }

    pub fn delete_goal(&mut self, id: Uuid) -> &mut Self {
        self.mutations.push(Mutation::DeleteGoal(id));
        self
    }

    pub fn put_key_result(&mut self, kr: KeyResult) -> &mut Self {
        self.mutations.push(Mutation::PutKeyResult(kr));
        self
    }

    pub fn delete_key_result(&mut self, id: Uuid) -> &mut Self {
        self.mutations.push(Mutation::DeleteKeyResult(id));
        self
    }

    pub fn append_history(&mut self, entry: ProgressHistoryEntry) -> &mut Self {
        self.mutations.push(Mutation::AppendHistory(entry));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn into_mutations(self) -> Vec<Mutation> {
        self.mutations
    }
}

/// Durable storage for goals, key results, and the progress-history ledger.
pub trait GoalStore: Send + Sync {
    fn goal(&self, id: Uuid) -> EngineResult<Option<Goal>>;

    /// All goals, unordered. Callers filter and sort.
    fn goals(&self) -> EngineResult<Vec<Goal>>;

    /// Key results belonging to a goal, oldest first.
    fn key_results_for(&self, goal_id: Uuid) -> EngineResult<Vec<KeyResult>>;

    /// A key result, scoped to its owning goal.
    fn key_result(&self, goal_id: Uuid, kr_id: Uuid) -> EngineResult<Option<KeyResult>>;

    /// All history entries for a goal (goal-level and key-result-level),
    /// in append order.
    fn history_for(&self, goal_id: Uuid) -> EngineResult<Vec<ProgressHistoryEntry>>;

    /// Commit every mutation in the batch, or none.
    fn apply(&self, batch: WriteBatch) -> EngineResult<()>;

    /// Resolve a goal or fail with NotFound.
    fn require_goal(&self, id: Uuid) -> EngineResult<Goal> {
        self.goal(id)?
            .ok_or_else(|| EngineError::not_found("goal", id))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    goals: BTreeMap<Uuid, Goal>,
    // Each key result carries the sequence number of its first insertion, so
    // records sharing a created_at timestamp still come back in batch order.
    key_results: BTreeMap<Uuid, (u64, KeyResult)>,
    history: Vec<ProgressHistoryEntry>,
    next_seq: u64,
}

/// In-memory store. A single mutex guards all three collections, so a
/// WriteBatch applies atomically with respect to every reader and writer.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> EngineResult<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| EngineError::internal("store lock poisoned"))
    }
}

impl GoalStore for MemoryStore {
    fn goal(&self, id: Uuid) -> EngineResult<Option<Goal>> {
        Ok(self.lock()?.goals.get(&id).cloned())
    }

    fn goals(&self) -> EngineResult<Vec<Goal>> {
        Ok(self.lock()?.goals.values().cloned().collect())
    }

    fn key_results_for(&self, goal_id: Uuid) -> EngineResult<Vec<KeyResult>> {
        let state = self.lock()?;
        let mut krs: Vec<(u64, KeyResult)> = state
            .key_results
            .values()
            .filter(|(_, kr)| kr.goal_id == goal_id)
            .cloned()
            .collect();
        krs.sort_by(|(a_seq, a), (b_seq, b)| {
            a.created_at.cmp(&b.created_at).then(a_seq.cmp(b_seq))
        });
        Ok(krs.into_iter().map(|(_, kr)| kr).collect())
    }

    fn key_result(&self, goal_id: Uuid, kr_id: Uuid) -> EngineResult<Option<KeyResult>> {
        let state = self.lock()?;
        Ok(state
            .key_results
            .get(&kr_id)
            .map(|(_, kr)| kr)
            .filter(|kr| kr.goal_id == goal_id)
            .cloned())
    }

    fn history_for(&self, goal_id: Uuid) -> EngineResult<Vec<ProgressHistoryEntry>> {
        let state = self.lock()?;
        Ok(state
            .history
            .iter()
            .filter(|entry| entry.goal_id == goal_id)
            .cloned()
            .collect())
    }

    fn apply(&self, batch: WriteBatch) -> EngineResult<()> {
        let mut state = self.lock()?;
        for mutation in batch.into_mutations() {
            match mutation {
                Mutation::PutGoal(goal) => {
                    state.goals.insert(goal.id, goal);
                }
                Mutation::DeleteGoal(id) => {
                    state.goals.remove(&id);
                }
                Mutation::PutKeyResult(kr) => {
                    // An update keeps the record's original sequence number.
                    let seq = match state.key_results.get(&kr.id) {
                        Some((seq, _)) => *seq,
                        None => {
                            let seq = state.next_seq;
                            state.next_seq += 1;
                            seq
                        }
                    };
                    state.key_results.insert(kr.id, (seq, kr));
                }
                Mutation::DeleteKeyResult(id) => {
                    state.key_results.remove(&id);
                }
                Mutation::AppendHistory(entry) => {
                    state.history.push(entry);
                }
            }
        }
        Ok(())
    }
}
