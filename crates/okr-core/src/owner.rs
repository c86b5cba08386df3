// owner.rs — Owner directory: read-only lookup of goal owners.
//
// The employee directory is an external collaborator. The engine only needs
// display attributes for embedding in goal views, so the seam is a small
// read-only trait. The in-memory implementation backs tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Display attributes of a goal owner, embedded in goal views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl OwnerSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Read-only owner lookup. The engine never mutates the directory.
pub trait OwnerDirectory: Send + Sync {
    fn owner(&self, id: Uuid) -> EngineResult<Option<OwnerSummary>>;

    /// Resolve an owner or fail with NotFound.
    fn require_owner(&self, id: Uuid) -> EngineResult<OwnerSummary> {
        self.owner(id)?
            .ok_or_else(|| EngineError::not_found("owner", id))
    }
}

/// In-memory owner directory for tests and local runs.
#[derive(Default)]
pub struct MemoryOwnerDirectory {
    owners: RwLock<HashMap<Uuid, OwnerSummary>>,
}

impl MemoryOwnerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, owner: OwnerSummary) -> EngineResult<()> {
        let mut owners = self
            .owners
            .write()
            .map_err(|_| EngineError::internal("owner directory lock poisoned"))?;
        owners.insert(owner.id, owner);
        Ok(())
    }
}

impl OwnerDirectory for MemoryOwnerDirectory {
    fn owner(&self, id: Uuid) -> EngineResult<Option<OwnerSummary>> {
        let owners = self
            .owners
            .read()
            .map_err(|_| EngineError::internal("owner directory lock poisoned"))?;
        Ok(owners.get(&id).cloned())
    }
}
