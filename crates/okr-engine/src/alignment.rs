// alignment.rs — Alignment Graph Resolver: the parent/child goal forest.
//
// Goals link upward via `parent_goal_id`, forming a forest that must stay
// acyclic. Re-parenting is validated with an explicit depth-first walk of
// the goal's descendants (visited set, no recursion) before any write.
//
// The type hierarchy (company → department → team → individual) is a
// convention only — this resolver does not enforce it.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use okr_core::{EngineError, EngineResult, Goal, GoalStatus, GoalStore, OwnerDirectory};

use crate::view::{AlignmentNode, ChildGoalSummary};

/// Graph operations over the alignment forest, bound to a store.
pub struct AlignmentResolver<'a> {
    store: &'a dyn GoalStore,
}

impl<'a> AlignmentResolver<'a> {
    pub fn new(store: &'a dyn GoalStore) -> Self {
        AlignmentResolver { store }
    }

    /// Validate a candidate parent for `goal` without writing anything.
    ///
    /// Rejects self-parenting, rejects any candidate among the goal's
    /// current descendants (the link would close a cycle), and requires
    /// the candidate to exist.
    pub fn validate_parent(&self, goal: &Goal, candidate: Uuid) -> EngineResult<()> {
        if candidate == goal.id {
            return Err(EngineError::field(
                "parent_goal_id",
                "Goal cannot be its own parent",
            ));
        }
        if self.descendants_of(goal.id)?.contains(&candidate) {
            return Err(EngineError::conflict(
                "Cannot align to a descendant goal — this would create a cycle",
            ));
        }
        if self.store.goal(candidate)?.is_none() {
            return Err(EngineError::not_found("parent goal", candidate));
        }
        Ok(())
    }

    /// Immediate children of a goal, as rollup summaries.
    pub fn children(&self, goal_id: Uuid) -> EngineResult<Vec<ChildGoalSummary>> {
        Ok(self
            .store
            .goals()?
            .into_iter()
            .filter(|g| g.parent_goal_id == Some(goal_id))
            .map(|g| ChildGoalSummary {
                id: g.id,
                title: g.title,
                kind: g.kind,
                status: g.status,
                progress: g.progress,
            })
            .collect())
    }

    /// Build the nested alignment tree.
    ///
    /// With a root, the tree grows from that goal; otherwise from every
    /// non-cancelled goal that has no parent. Depth-first, each node
    /// annotated with progress and owner.
    pub fn alignment_tree(
        &self,
        root: Option<Uuid>,
        owners: &dyn OwnerDirectory,
    ) -> EngineResult<Vec<AlignmentNode>> {
        let goals = self.store.goals()?;

        let mut by_parent: HashMap<Uuid, Vec<&Goal>> = HashMap::new();
        for goal in &goals {
            if let Some(parent) = goal.parent_goal_id {
                by_parent.entry(parent).or_default().push(goal);
            }
        }

        let roots: Vec<&Goal> = match root {
            Some(id) => goals.iter().filter(|g| g.id == id).collect(),
            None => goals
                .iter()
                .filter(|g| g.parent_goal_id.is_none() && g.status != GoalStatus::Cancelled)
                .collect(),
        };
        if let Some(id) = root {
            if roots.is_empty() {
                return Err(EngineError::not_found("goal", id));
            }
        }

        let mut visited = HashSet::new();
        roots
            .into_iter()
            .map(|goal| self.build_node(goal, &by_parent, owners, &mut visited))
            .collect()
    }

    fn build_node(
        &self,
        goal: &Goal,
        by_parent: &HashMap<Uuid, Vec<&Goal>>,
        owners: &dyn OwnerDirectory,
        visited: &mut HashSet<Uuid>,
    ) -> EngineResult<AlignmentNode> {
        visited.insert(goal.id);
        let owner = owners.require_owner(goal.owner_id)?;
        let mut children = Vec::new();
        if let Some(child_goals) = by_parent.get(&goal.id) {
            for child in child_goals {
                // The visited set bounds the walk even if stored data is
                // somehow cyclic.
                if visited.contains(&child.id) {
                    continue;
                }
                children.push(self.build_node(child, by_parent, owners, visited)?);
            }
        }
        Ok(AlignmentNode {
            id: goal.id,
            title: goal.title.clone(),
            kind: goal.kind,
            status: goal.status,
            progress: goal.progress,
            owner,
            children,
        })
    }

    /// Every transitive descendant of a goal. Iterative depth-first walk
    /// with a visited set, so cost is bounded even on malformed data.
    fn descendants_of(&self, goal_id: Uuid) -> EngineResult<HashSet<Uuid>> {
        let goals = self.store.goals()?;
        let mut by_parent: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for goal in &goals {
            if let Some(parent) = goal.parent_goal_id {
                by_parent.entry(parent).or_default().push(goal.id);
            }
        }

        let mut seen = HashSet::new();
        let mut stack = vec![goal_id];
        while let Some(current) = stack.pop() {
            if let Some(children) = by_parent.get(&current) {
                for &child in children {
                    if seen.insert(child) {
                        stack.push(child);
                    }
                }
            }
        }
        Ok(seen)
    }
}
