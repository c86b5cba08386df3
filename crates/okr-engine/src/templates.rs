// templates.rs — Template Catalog: read-only reference data.
//
// Templates are consumed once, at goal creation, when their suggested key
// results are copied into the new goal. The catalog itself is external,
// read-mostly reference data behind a small trait.

use std::collections::BTreeMap;
use std::sync::RwLock;

use uuid::Uuid;

use okr_core::{EngineError, EngineResult, GoalKind, GoalTemplate};

/// Read path into the template catalog.
pub trait TemplateCatalog: Send + Sync {
    /// List templates, optionally filtered by applicable goal kind and
    /// category (case-insensitive). `active_only` hides retired templates.
    fn list(
        &self,
        kind: Option<GoalKind>,
        category: Option<&str>,
        active_only: bool,
    ) -> EngineResult<Vec<GoalTemplate>>;

    fn get(&self, id: Uuid) -> EngineResult<Option<GoalTemplate>>;

    /// Resolve a template or fail with NotFound.
    fn require(&self, id: Uuid) -> EngineResult<GoalTemplate> {
        self.get(id)?
            .ok_or_else(|| EngineError::not_found("template", id))
    }
}

/// In-memory catalog for tests and local runs.
#[derive(Default)]
pub struct MemoryTemplateCatalog {
    templates: RwLock<BTreeMap<Uuid, GoalTemplate>>,
}

impl MemoryTemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, template: GoalTemplate) -> EngineResult<()> {
        let mut templates = self
            .templates
            .write()
            .map_err(|_| EngineError::internal("template catalog lock poisoned"))?;
        templates.insert(template.id, template);
        Ok(())
    }
}

impl TemplateCatalog for MemoryTemplateCatalog {
    fn list(
        &self,
        kind: Option<GoalKind>,
        category: Option<&str>,
        active_only: bool,
    ) -> EngineResult<Vec<GoalTemplate>> {
        let templates = self
            .templates
            .read()
            .map_err(|_| EngineError::internal("template catalog lock poisoned"))?;
        Ok(templates
            .values()
            .filter(|t| kind.is_none_or(|k| t.kind == k))
            .filter(|t| category.is_none_or(|c| t.category.eq_ignore_ascii_case(c)))
            .filter(|t| !active_only || t.is_active)
            .cloned()
            .collect())
    }

    fn get(&self, id: Uuid) -> EngineResult<Option<GoalTemplate>> {
        let templates = self
            .templates
            .read()
            .map_err(|_| EngineError::internal("template catalog lock poisoned"))?;
        Ok(templates.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use okr_core::SuggestedKeyResult;

    fn template(kind: GoalKind, category: &str, active: bool) -> GoalTemplate {
        let now = Utc::now();
        GoalTemplate {
            id: Uuid::new_v4(),
            title: format!("{category} template"),
            description: None,
            kind,
            category: category.into(),
            default_priority: None,
            suggested_key_results: vec![SuggestedKeyResult {
                title: "Generate qualified leads".into(),
                target_value: 1000.0,
                unit: Some("leads".into()),
            }],
            is_active: active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn list_filters_by_kind_and_category() {
        let catalog = MemoryTemplateCatalog::new();
        catalog.insert(template(GoalKind::Team, "Marketing", true)).unwrap();
        catalog.insert(template(GoalKind::Department, "Engineering", true)).unwrap();

        let teams = catalog.list(Some(GoalKind::Team), None, true).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].category, "Marketing");

        // Category match ignores case.
        let eng = catalog.list(None, Some("engineering"), true).unwrap();
        assert_eq!(eng.len(), 1);
    }

    #[test]
    fn active_only_hides_retired_templates() {
        let catalog = MemoryTemplateCatalog::new();
        catalog.insert(template(GoalKind::Team, "Sales", true)).unwrap();
        catalog.insert(template(GoalKind::Team, "Legacy", false)).unwrap();

        assert_eq!(catalog.list(None, None, true).unwrap().len(), 1);
        assert_eq!(catalog.list(None, None, false).unwrap().len(), 2);
    }

    #[test]
    fn insert_surfaces_a_poisoned_lock() {
        let catalog = std::sync::Arc::new(MemoryTemplateCatalog::new());
        let poisoner = std::sync::Arc::clone(&catalog);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.templates.write().unwrap();
            panic!("poison the catalog lock");
        })
        .join();

        let result = catalog.insert(template(GoalKind::Team, "Marketing", true));
        assert!(matches!(result, Err(EngineError::Internal(_))));
    }

    #[test]
    fn require_missing_template_is_not_found() {
        let catalog = MemoryTemplateCatalog::new();
        assert!(matches!(
            catalog.require(Uuid::new_v4()),
            Err(EngineError::NotFound { .. })
        ));
    }
}
