//! # okr-core
//!
//! Domain model for the goal/key-result lifecycle engine.
//!
//! A [`Goal`] is a tracked objective moving through a draft → pending →
//! active → completed/cancelled lifecycle. Its numeric progress is derived
//! from up to five [`KeyResult`]s, and every value change is recorded as an
//! immutable [`ProgressHistoryEntry`].
//!
//! ## Key components
//!
//! - [`Goal`] / [`GoalStatus`] — the lifecycle state machine
//! - [`KeyResult`] — measurable sub-targets with clamped progress
//! - [`ProgressHistoryEntry`] — append-only audit record of value changes
//! - [`GoalStore`] — store abstraction with atomic [`WriteBatch`] commits
//! - [`OwnerDirectory`] — read-only lookup of goal owners (external
//!   collaborator)

pub mod error;
pub mod goal;
pub mod history;
pub mod key_result;
pub mod owner;
pub mod request;
pub mod store;
pub mod template;
pub mod time;

pub use error::{EngineError, EngineResult};
pub use goal::{Goal, GoalKind, GoalPriority, GoalStatus, GoalVisibility};
pub use history::ProgressHistoryEntry;
pub use key_result::{aggregate_progress, KeyResult, KeyResultStatus, MAX_KEY_RESULTS};
pub use owner::{MemoryOwnerDirectory, OwnerDirectory, OwnerSummary};
pub use request::{
    GoalCreateRequest, GoalProgressRequest, GoalUpdateRequest, KeyResultCreateRequest,
    KeyResultUpdateRequest,
};
pub use store::{GoalStore, MemoryStore, Mutation, WriteBatch};
pub use template::{GoalTemplate, SuggestedKeyResult};
