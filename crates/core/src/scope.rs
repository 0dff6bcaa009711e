//! Scope records and role resolution.

use serde::{Deserialize, Serialize};

use crate::types::{Plan, ProtocolId, ScopeId, Timestamp, WorkerId};

/// A running instance (cohort) of a protocol.
///
/// `participants` is kept in join order and never holds the same worker
/// twice. Its length never exceeds `capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub id: ScopeId,
    pub protocol_id: ProtocolId,
    pub participants: Vec<WorkerId>,
    pub capacity: usize,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Scope {
    /// A freshly created scope whose only participant is its creator.
    pub fn open(
        id: ScopeId,
        protocol_id: impl Into<ProtocolId>,
        creator: impl Into<WorkerId>,
        capacity: usize,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            protocol_id: protocol_id.into(),
            participants: vec![creator.into()],
            capacity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity
    }

    pub fn position_of(&self, worker_id: &str) -> Option<usize> {
        position_of(&self.participants, worker_id)
    }
}

/// A worker's role within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment<'a> {
    /// Zero-based join position.
    pub position: usize,
    /// The role-bundle the worker must execute.
    pub plan: &'a Plan,
}

fn position_of(participants: &[WorkerId], worker_id: &str) -> Option<usize> {
    participants.iter().position(|p| p == worker_id)
}

/// Resolve the role-bundle for `worker_id`: the plan at the index equal to
/// the worker's position in `participants`.
///
/// Returns `None` if the worker is not a participant or its position has
/// no matching plan.
pub fn resolve_role<'a>(
    participants: &[WorkerId],
    plans: &'a [Plan],
    worker_id: &str,
) -> Option<RoleAssignment<'a>> {
    let position = position_of(participants, worker_id)?;
    plans
        .get(position)
        .map(|plan| RoleAssignment { position, plan })
}
