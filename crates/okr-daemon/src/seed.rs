// seed.rs — Demo owners and templates for local runs.
//
// The daemon serves an in-memory store, so a bare start has nothing to
// point a client at. These records give it a usable shape; the seeded ids
// are logged so goals can be created against them immediately.

use chrono::Utc;
use uuid::Uuid;

use okr_core::{
    EngineResult, GoalKind, GoalPriority, GoalTemplate, MemoryOwnerDirectory, OwnerSummary,
    SuggestedKeyResult,
};
use okr_engine::MemoryTemplateCatalog;

pub fn demo(
    owners: &MemoryOwnerDirectory,
    templates: &MemoryTemplateCatalog,
) -> EngineResult<()> {
    for (first, last, title) in [
        ("Maya", "Chen", "Engineering Manager"),
        ("Jonas", "Richter", "Head of Sales"),
        ("Priya", "Nair", "Product Lead"),
    ] {
        let owner = OwnerSummary {
            id: Uuid::new_v4(),
            first_name: first.into(),
            last_name: last.into(),
            email: Some(format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase())),
            job_title: Some(title.into()),
            avatar_url: None,
        };
        tracing::info!(owner_id = %owner.id, name = %owner.full_name(), "seeded owner");
        owners.insert(owner)?;
    }

    let now = Utc::now();
    let catalog = [
        GoalTemplate {
            id: Uuid::new_v4(),
            title: "Quarterly revenue push".into(),
            description: Some("Grow pipeline and close rate over one quarter".into()),
            kind: GoalKind::Team,
            category: "Sales".into(),
            default_priority: Some(GoalPriority::High),
            suggested_key_results: vec![
                SuggestedKeyResult {
                    title: "Generate qualified leads".into(),
                    target_value: 200.0,
                    unit: Some("leads".into()),
                },
                SuggestedKeyResult {
                    title: "Close new deals".into(),
                    target_value: 25.0,
                    unit: Some("deals".into()),
                },
            ],
            is_active: true,
            created_at: now,
            updated_at: now,
        },
        GoalTemplate {
            id: Uuid::new_v4(),
            title: "Engineering quality baseline".into(),
            description: None,
            kind: GoalKind::Department,
            category: "Engineering".into(),
            default_priority: Some(GoalPriority::Medium),
            suggested_key_results: vec![
                SuggestedKeyResult {
                    title: "Reduce open escaped defects".into(),
                    target_value: 10.0,
                    unit: Some("defects".into()),
                },
                SuggestedKeyResult {
                    title: "Raise test coverage".into(),
                    target_value: 85.0,
                    unit: Some("percent".into()),
                },
            ],
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    ];
    for template in catalog {
        tracing::info!(template_id = %template.id, title = %template.title, "seeded template");
        templates.insert(template)?;
    }
    Ok(())
}
