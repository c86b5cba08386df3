// recorder.rs — Progress History Recorder: the append-only audit sink.
//
// The recorder builds immutable entries with strictly increasing creation
// timestamps and paginates a goal's history newest-first. It never
// interprets values, and it never writes on its own — entries it issues are
// committed by the caller in the same write batch as the value change they
// record, so the ledger can never show a change that did not happen (or
// miss one that did).

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use okr_core::{time, EngineResult, ProgressHistoryEntry};

use crate::view::Page;

/// Issues immutable history entries with monotonic timestamps.
pub struct HistoryRecorder {
    last_issued: Mutex<DateTime<Utc>>,
}

impl Default for HistoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRecorder {
    pub fn new() -> Self {
        HistoryRecorder {
            last_issued: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Build one entry. `key_result_id` is absent for goal-level edits.
    ///
    /// The creation timestamp is strictly greater than that of any entry
    /// this recorder issued before.
    pub fn entry(
        &self,
        goal_id: Uuid,
        key_result_id: Option<Uuid>,
        old_value: f64,
        new_value: f64,
        comment: Option<String>,
        updated_by: Uuid,
    ) -> ProgressHistoryEntry {
        let created_at = {
            // Fall back to plain wall clock if the mutex is poisoned; a
            // panicking sibling thread should not block audit writes.
            match self.last_issued.lock() {
                Ok(mut last) => {
                    let next = time::strictly_after(*last);
                    *last = next;
                    next
                }
                Err(_) => Utc::now(),
            }
        };
        ProgressHistoryEntry {
            id: Uuid::new_v4(),
            goal_id,
            key_result_id,
            old_value,
            new_value,
            comment,
            updated_by,
            created_at,
        }
    }

    /// Paginate a goal's entries newest-first.
    pub fn paginate(
        mut entries: Vec<ProgressHistoryEntry>,
        page: u32,
        per_page: u32,
    ) -> EngineResult<Page<ProgressHistoryEntry>> {
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::slice(entries, page, per_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_strictly_increase() {
        let recorder = HistoryRecorder::new();
        let goal_id = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let mut prev = None;
        for i in 0..50 {
            let entry = recorder.entry(goal_id, None, f64::from(i), f64::from(i + 1), None, actor);
            if let Some(prev) = prev {
                assert!(entry.created_at > prev, "entry {i} did not advance");
            }
            prev = Some(entry.created_at);
        }
    }

    #[test]
    fn pagination_is_newest_first() {
        let recorder = HistoryRecorder::new();
        let goal_id = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let entries: Vec<_> = (0..5)
            .map(|i| recorder.entry(goal_id, None, f64::from(i), f64::from(i + 1), None, actor))
            .collect();

        let page = HistoryRecorder::paginate(entries, 1, 2).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        // Newest (last issued) comes first.
        assert_eq!(page.items[0].new_value, 5.0);
        assert_eq!(page.items[1].new_value, 4.0);
    }

    #[test]
    fn entry_carries_the_delta() {
        let recorder = HistoryRecorder::new();
        let kr_id = Uuid::new_v4();
        let entry = recorder.entry(
            Uuid::new_v4(),
            Some(kr_id),
            60.0,
            85.0,
            Some("Completed modules 4-6".into()),
            Uuid::new_v4(),
        );
        assert_eq!(entry.key_result_id, Some(kr_id));
        assert_eq!(entry.old_value, 60.0);
        assert_eq!(entry.new_value, 85.0);
    }
}
