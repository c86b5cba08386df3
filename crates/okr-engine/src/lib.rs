//! # okr-engine
//!
//! The goal lifecycle and progress engine.
//!
//! [`GoalService`] is the public contract: it enforces the status state
//! machine, delegates numeric work to the key-result ledger, graph work to
//! the alignment resolver, and audit work to the history recorder, then
//! persists results through the store in atomic write batches.
//!
//! ## Key components
//!
//! - [`GoalService`] — lifecycle controller (create/submit/approve/reject/
//!   progress/delete plus key-result and read operations)
//! - [`ledger`] — key-result CRUD and goal-progress aggregation
//! - [`alignment`] — parent/child forest, cycle detection, rollup trees
//! - [`recorder`] — append-only progress history with monotonic timestamps
//! - [`pacing`] — expected-progress calculator and on-track classifier
//! - [`templates`] — read-only template catalog consumed at creation time

pub mod alignment;
pub mod controller;
pub mod ledger;
pub mod pacing;
pub mod query;
pub mod recorder;
pub mod templates;
pub mod view;

pub use controller::{Capabilities, DeleteOutcome, GoalService};
pub use pacing::{expected_progress, indicator, ProgressIndicator};
pub use query::{GoalQuery, GoalSortBy, SortOrder};
pub use recorder::HistoryRecorder;
pub use templates::{MemoryTemplateCatalog, TemplateCatalog};
pub use view::{
    AlignmentNode, ChildGoalSummary, GoalDetail, GoalListItem, HistoryEntryView, KeyResultView,
    KeyResultsSummary, Page, ParentGoalSummary, ProgressUpdate,
};
