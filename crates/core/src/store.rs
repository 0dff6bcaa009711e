//! Scope persistence and the atomic participant-append primitive.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::StoreError;
use crate::scope::Scope;
use crate::types::{ScopeId, WorkerId};

/// Persistence for scope records.
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// Persist a new scope. Fails with [`StoreError::Conflict`] if the id
    /// is already taken.
    async fn create(&self, scope: &Scope) -> Result<(), StoreError>;

    /// Fetch a scope. Fails with [`StoreError::NotFound`] when absent.
    async fn get(&self, scope_id: &str) -> Result<Scope, StoreError>;

    /// Append `worker_id` to the scope's participants as one indivisible
    /// step relative to every other caller on the same scope, and return
    /// the list as committed.
    ///
    /// - A worker already in the scope is not appended again; the current
    ///   list is returned unchanged.
    /// - A scope at capacity fails with [`StoreError::CohortFull`].
    /// - A missing scope fails with [`StoreError::NotFound`].
    async fn append_participant(
        &self,
        scope_id: &str,
        worker_id: &str,
    ) -> Result<Vec<WorkerId>, StoreError>;
}

/// Apply the append rules to an exclusively held scope.
///
/// Shared by in-process stores so the rules live in one place.
pub fn append_locked(scope: &mut Scope, worker_id: &str) -> Result<Vec<WorkerId>, StoreError> {
    if scope.position_of(worker_id).is_some() {
        return Ok(scope.participants.clone());
    }
    if scope.is_full() {
        return Err(StoreError::CohortFull {
            scope_id: scope.id.clone(),
            capacity: scope.capacity,
        });
    }
    scope.participants.push(worker_id.to_string());
    scope.updated_at = chrono::Utc::now();
    Ok(scope.participants.clone())
}

/// In-process scope store.
///
/// Each scope sits behind its own mutex; the index lock is only held long
/// enough to find or insert that mutex, so appends to different scopes
/// never wait on each other.
#[derive(Debug, Default)]
pub struct MemoryScopeStore {
    scopes: RwLock<HashMap<ScopeId, Arc<Mutex<Scope>>>>,
}

impl MemoryScopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scopes currently held.
    pub async fn scope_count(&self) -> usize {
        self.scopes.read().await.len()
    }

    async fn slot(&self, scope_id: &str) -> Result<Arc<Mutex<Scope>>, StoreError> {
        self.scopes
            .read()
            .await
            .get(scope_id)
            .cloned()
            .ok_or_else(|| StoreError::scope_not_found(scope_id))
    }
}

#[async_trait]
impl ScopeStore for MemoryScopeStore {
    async fn create(&self, scope: &Scope) -> Result<(), StoreError> {
        match self.scopes.write().await.entry(scope.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "Scope {} already exists",
                scope.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(scope.clone())));
                Ok(())
            }
        }
    }

    async fn get(&self, scope_id: &str) -> Result<Scope, StoreError> {
        let slot = self.slot(scope_id).await?;
        let scope = slot.lock().await;
        Ok(scope.clone())
    }

    async fn append_participant(
        &self,
        scope_id: &str,
        worker_id: &str,
    ) -> Result<Vec<WorkerId>, StoreError> {
        let slot = self.slot(scope_id).await?;
        let mut scope = slot.lock().await;
        append_locked(&mut scope, worker_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;

    async fn store_with(scope: Scope) -> MemoryScopeStore {
        let store = MemoryScopeStore::new();
        store.create(&scope).await.unwrap();
        store
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = store_with(Scope::open("s1".into(), "p", "W1", 3)).await;

        let scope = store.get("s1").await.unwrap();
        assert_eq!(scope.protocol_id, "p");
        assert_eq!(scope.participants, vec!["W1".to_string()]);
        assert_eq!(store.scope_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let store = store_with(Scope::open("s1".into(), "p", "W1", 3)).await;

        let again = Scope::open("s1".into(), "p", "W9", 3);
        assert_matches!(store.create(&again).await, Err(StoreError::Conflict(_)));
        assert_eq!(store.get("s1").await.unwrap().participants, vec!["W1".to_string()]);
    }

    #[tokio::test]
    async fn missing_scope_is_not_found() {
        let store = MemoryScopeStore::new();
        assert_matches!(store.get("nope").await, Err(StoreError::NotFound { .. }));
        assert_matches!(
            store.append_participant("nope", "W1").await,
            Err(StoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let store = store_with(Scope::open("s1".into(), "p", "W1", 3)).await;

        let after_w2 = store.append_participant("s1", "W2").await.unwrap();
        assert_eq!(after_w2, vec!["W1", "W2"]);

        let after_w3 = store.append_participant("s1", "W3").await.unwrap();
        assert_eq!(after_w3, vec!["W1", "W2", "W3"]);
    }

    #[tokio::test]
    async fn rejoin_is_a_no_op() {
        let store = store_with(Scope::open("s1".into(), "p", "W1", 2)).await;

        let participants = store.append_participant("s1", "W1").await.unwrap();
        assert_eq!(participants, vec!["W1"]);
    }

    #[tokio::test]
    async fn append_beyond_capacity_is_rejected() {
        let store = store_with(Scope::open("s1".into(), "p", "W1", 2)).await;
        store.append_participant("s1", "W2").await.unwrap();

        assert_matches!(
            store.append_participant("s1", "W3").await,
            Err(StoreError::CohortFull { capacity: 2, .. })
        );
        // Members of a full scope can still re-fetch their slot.
        assert_eq!(
            store.append_participant("s1", "W2").await.unwrap(),
            vec!["W1", "W2"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_lose_nothing() {
        let store = Arc::new(store_with(Scope::open("s1".into(), "p", "W0", 65)).await);

        let handles: Vec<_> = (1..=64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.append_participant("s1", &format!("W{i}")).await })
            })
            .collect();

        for handle in futures::future::join_all(handles).await {
            handle.unwrap().unwrap();
        }

        let participants = store.get("s1").await.unwrap().participants;
        assert_eq!(participants.len(), 65);
        let distinct: HashSet<_> = participants.iter().collect();
        assert_eq!(distinct.len(), 65);
        assert_eq!(participants[0], "W0");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_stop_at_capacity() {
        let store = Arc::new(store_with(Scope::open("s1".into(), "p", "W0", 5)).await);

        let handles: Vec<_> = (1..=20)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.append_participant("s1", &format!("W{i}")).await })
            })
            .collect();

        let results: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|h| h.unwrap())
            .collect();

        let admitted = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::CohortFull { .. })))
            .count();
        assert_eq!(admitted, 4);
        assert_eq!(rejected, 16);
        assert_eq!(store.get("s1").await.unwrap().participants.len(), 5);
    }
}
