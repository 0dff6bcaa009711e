//! Read-only protocol catalog.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::protocol::Protocol;

/// Lookup of protocol definitions by id.
#[async_trait]
pub trait ProtocolCatalog: Send + Sync {
    /// Fetch a protocol. Fails with [`StoreError::NotFound`] when absent.
    async fn lookup(&self, protocol_id: &str) -> Result<Protocol, StoreError>;
}

/// Catalog held in process memory.
///
/// Entries are inserted up front (fixtures, a JSON seed file) and are
/// never mutated afterwards by the coordinator.
#[derive(Debug, Default)]
pub struct MemoryProtocolCatalog {
    protocols: RwLock<HashMap<String, Protocol>>,
}

impl MemoryProtocolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_protocols(protocols: impl IntoIterator<Item = Protocol>) -> Self {
        let map = protocols
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        Self {
            protocols: RwLock::new(map),
        }
    }

    /// Load a catalog from a JSON file holding an array of
    /// `{ "id": ..., "plans": [[...], ...] }` documents.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::Backend(format!("reading {}: {e}", path.display())))?;
        let protocols: Vec<Protocol> = serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Backend(format!("parsing {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), count = protocols.len(), "Loaded protocol catalog");
        Ok(Self::from_protocols(protocols))
    }

    /// Insert or replace a protocol definition.
    pub async fn insert(&self, protocol: Protocol) {
        self.protocols
            .write()
            .await
            .insert(protocol.id.clone(), protocol);
    }

    pub async fn len(&self) -> usize {
        self.protocols.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.protocols.read().await.is_empty()
    }
}

#[async_trait]
impl ProtocolCatalog for MemoryProtocolCatalog {
    async fn lookup(&self, protocol_id: &str) -> Result<Protocol, StoreError> {
        self.protocols
            .read()
            .await
            .get(protocol_id)
            .cloned()
            .ok_or_else(|| StoreError::protocol_not_found(protocol_id))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::protocol::plan;

    #[tokio::test]
    async fn lookup_returns_inserted_protocol() {
        let catalog = MemoryProtocolCatalog::new();
        catalog
            .insert(Protocol::new("millionaire-problem", vec![plan(["a1"]), plan(["b1"])]))
            .await;

        let protocol = catalog.lookup("millionaire-problem").await.unwrap();
        assert_eq!(protocol.cohort_size(), 2);
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn lookup_of_unknown_id_is_not_found() {
        let catalog = MemoryProtocolCatalog::new();
        assert_matches!(
            catalog.lookup("billionaire-problem").await,
            Err(StoreError::NotFound { entity: "Protocol", ref id }) if id == "billionaire-problem"
        );
    }

    #[tokio::test]
    async fn loads_seed_file() {
        let path = std::env::temp_dir().join(format!("cohort-catalog-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, r#"[{"id":"p1","plans":[["a"],["b"],["c"]]}]"#)
            .await
            .unwrap();

        let catalog = MemoryProtocolCatalog::from_json_file(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(catalog.lookup("p1").await.unwrap().cohort_size(), 3);
    }

    #[tokio::test]
    async fn bundled_seed_catalog_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../db/seed/protocols.json");
        let catalog = MemoryProtocolCatalog::from_json_file(path).await.unwrap();

        assert_eq!(catalog.lookup("millionaire-problem").await.unwrap().cohort_size(), 2);
        assert_eq!(
            catalog.lookup("multiple-millionaire-problem").await.unwrap().cohort_size(),
            3
        );
    }

    #[tokio::test]
    async fn malformed_seed_file_is_a_backend_error() {
        let path = std::env::temp_dir().join(format!("cohort-catalog-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let result = MemoryProtocolCatalog::from_json_file(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_matches!(result, Err(StoreError::Backend(_)));
    }
}
