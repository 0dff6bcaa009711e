//! Scope assignment: the create-or-join decision.
//!
//! A join request without a scope id opens a new scope with the caller as
//! its first participant. A request with a scope id appends the caller to
//! that scope through [`ScopeStore::append_participant`], which is the only
//! place same-scope calls are serialized. The coordinator itself keeps no
//! state between calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::ProtocolCatalog;
use crate::diagnostics::DiagnosticSink;
use crate::error::{CoreError, StoreError, MISSING_PROTOCOL_ID, MISSING_WORKER_ID};
use crate::protocol::Protocol;
use crate::scope::{resolve_role, RoleAssignment, Scope};
use crate::store::ScopeStore;
use crate::types::{new_scope_id, Plan, ProtocolId, ScopeId, WorkerId};

/// A worker's request to join a protocol.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub worker_id: Option<WorkerId>,
    pub protocol_id: Option<ProtocolId>,
    pub scope_id: Option<ScopeId>,
}

impl JoinRequest {
    /// Request that opens a new scope.
    pub fn create(worker_id: impl Into<WorkerId>, protocol_id: impl Into<ProtocolId>) -> Self {
        Self {
            worker_id: Some(worker_id.into()),
            protocol_id: Some(protocol_id.into()),
            scope_id: None,
        }
    }

    /// Request that attaches to an existing scope.
    pub fn join(
        worker_id: impl Into<WorkerId>,
        protocol_id: impl Into<ProtocolId>,
        scope_id: impl Into<ScopeId>,
    ) -> Self {
        Self {
            worker_id: Some(worker_id.into()),
            protocol_id: Some(protocol_id.into()),
            scope_id: Some(scope_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeHandle {
    pub scope_id: ScopeId,
}

/// What a joining worker gets back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JoinResponse {
    pub user: ScopeHandle,
    /// The protocol's full role-bundle list, identical for every participant.
    pub plans: Vec<Plan>,
    /// Participants in join order, as committed by this call.
    pub participants: Vec<WorkerId>,
}

impl JoinResponse {
    pub fn scope_id(&self) -> &str {
        &self.user.scope_id
    }

    /// The role `worker_id` plays in this scope, if any.
    pub fn role_of(&self, worker_id: &str) -> Option<RoleAssignment<'_>> {
        resolve_role(&self.participants, &self.plans, worker_id)
    }
}

/// Whether a join opened a new scope or attached to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Created,
    Joined,
}

/// Implements the create-or-join decision over injected collaborators.
pub struct ScopeCoordinator {
    catalog: Arc<dyn ProtocolCatalog>,
    store: Arc<dyn ScopeStore>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

/// Treat `None` and `Some("")` alike.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl ScopeCoordinator {
    pub fn new(
        catalog: Arc<dyn ProtocolCatalog>,
        store: Arc<dyn ScopeStore>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            catalog,
            store,
            diagnostics,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn ProtocolCatalog> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn ScopeStore> {
        &self.store
    }

    /// Join a protocol, creating a scope when no scope id is supplied.
    pub async fn join(&self, request: &JoinRequest) -> Result<JoinResponse, CoreError> {
        self.join_with_outcome(request)
            .await
            .map(|(response, _)| response)
    }

    /// Like [`join`](Self::join), also reporting which path was taken.
    pub async fn join_with_outcome(
        &self,
        request: &JoinRequest,
    ) -> Result<(JoinResponse, JoinOutcome), CoreError> {
        let result = self.try_join(request).await;
        match &result {
            Ok((response, outcome)) => {
                let event = match outcome {
                    JoinOutcome::Created => "scope.created",
                    JoinOutcome::Joined => "scope.joined",
                };
                self.diagnostics.log(
                    event,
                    &[
                        ("scope_id", response.user.scope_id.clone()),
                        ("worker_id", request.worker_id.clone().unwrap_or_default()),
                        ("participants", response.participants.len().to_string()),
                        ("cohort_size", response.plans.len().to_string()),
                    ],
                );
            }
            Err(err) => self.diagnostics.log(
                "scope.join_rejected",
                &[
                    ("protocol_id", request.protocol_id.clone().unwrap_or_default()),
                    ("scope_id", request.scope_id.clone().unwrap_or_default()),
                    ("reason", err.to_string()),
                ],
            ),
        }
        result
    }

    async fn try_join(
        &self,
        request: &JoinRequest,
    ) -> Result<(JoinResponse, JoinOutcome), CoreError> {
        let protocol_id = non_empty(&request.protocol_id)
            .ok_or_else(|| CoreError::InvalidRequest(MISSING_PROTOCOL_ID.into()))?;

        let protocol = self
            .catalog
            .lookup(protocol_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound { .. } => CoreError::UnknownProtocol(protocol_id.into()),
                other => CoreError::Storage(other),
            })?;

        let worker_id = non_empty(&request.worker_id)
            .ok_or_else(|| CoreError::InvalidRequest(MISSING_WORKER_ID.into()))?;

        match non_empty(&request.scope_id) {
            None => self.create(protocol, worker_id).await,
            Some(scope_id) => self.attach(protocol, scope_id, worker_id).await,
        }
    }

    async fn create(
        &self,
        protocol: Protocol,
        worker_id: &str,
    ) -> Result<(JoinResponse, JoinOutcome), CoreError> {
        let capacity = protocol.cohort_size();
        if capacity == 0 {
            return Err(CoreError::CohortFull {
                protocol_id: protocol.id,
                capacity,
            });
        }

        let scope = Scope::open(new_scope_id(), protocol.id.as_str(), worker_id, capacity);
        self.store
            .create(&scope)
            .await
            .map_err(CoreError::Storage)?;

        tracing::debug!(scope_id = %scope.id, protocol_id = %protocol.id, %worker_id, "Opened scope");

        let response = JoinResponse {
            user: ScopeHandle { scope_id: scope.id },
            plans: protocol.plans,
            participants: scope.participants,
        };
        Ok((response, JoinOutcome::Created))
    }

    async fn attach(
        &self,
        protocol: Protocol,
        scope_id: &str,
        worker_id: &str,
    ) -> Result<(JoinResponse, JoinOutcome), CoreError> {
        let scope = self
            .store
            .get(scope_id)
            .await
            .map_err(|err| scope_error(err, &protocol, scope_id))?;

        if scope.protocol_id != protocol.id {
            return Err(CoreError::ProtocolMismatch {
                scope_id: scope.id,
                requested: protocol.id,
                actual: scope.protocol_id,
            });
        }

        let participants = self
            .store
            .append_participant(scope_id, worker_id)
            .await
            .map_err(|err| scope_error(err, &protocol, scope_id))?;

        tracing::debug!(%scope_id, %worker_id, participants = participants.len(), "Attached to scope");

        let response = JoinResponse {
            user: ScopeHandle {
                scope_id: scope.id,
            },
            plans: protocol.plans,
            participants,
        };
        Ok((response, JoinOutcome::Joined))
    }
}

fn scope_error(err: StoreError, protocol: &Protocol, scope_id: &str) -> CoreError {
    match err {
        StoreError::NotFound { .. } => CoreError::UnknownScope(scope_id.into()),
        StoreError::CohortFull { capacity, .. } => CoreError::CohortFull {
            protocol_id: protocol.id.clone(),
            capacity,
        },
        other => CoreError::Storage(other),
    }
}
