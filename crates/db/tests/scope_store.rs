//! Postgres-backed catalog and scope store.
//!
//! These need a live database (`DATABASE_URL`); run them with
//! `cargo test -p cohort-db -- --ignored`.

use std::collections::HashSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use cohort_core::catalog::ProtocolCatalog;
use cohort_core::error::StoreError;
use cohort_core::protocol::{plan, Protocol};
use cohort_core::scope::Scope;
use cohort_core::store::ScopeStore;
use cohort_db::repositories::{ProtocolRepo, ScopeRepo};
use cohort_db::{PgProtocolCatalog, PgScopeStore};
use sqlx::PgPool;

async fn seed(pool: &PgPool, id: &str, parties: usize) -> Protocol {
    let protocol = Protocol::new(id, (0..parties).map(|i| plan([format!("p{i}")])).collect());
    ProtocolRepo::insert(pool, &protocol).await.unwrap();
    protocol
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn catalog_lookup_round_trips_plans(pool: PgPool) {
    let seeded = seed(&pool, "millionaire-problem", 2).await;
    let catalog = PgProtocolCatalog::new(pool);

    assert_eq!(catalog.lookup("millionaire-problem").await.unwrap(), seeded);
    assert_matches!(
        catalog.lookup("billionaire-problem").await,
        Err(StoreError::NotFound { entity: "Protocol", .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_get_and_duplicate_create(pool: PgPool) {
    seed(&pool, "p", 3).await;
    let store = PgScopeStore::new(pool.clone());
    let scope = Scope::open("s1".into(), "p", "W1", 3);

    store.create(&scope).await.unwrap();
    let fetched = store.get("s1").await.unwrap();
    assert_eq!(fetched.participants, vec!["W1"]);
    assert_eq!(fetched.capacity, 3);
    assert_eq!(ScopeRepo::count_by_protocol(&pool, "p").await.unwrap(), 1);

    assert_matches!(store.create(&scope).await, Err(StoreError::Conflict(_)));
    assert_matches!(store.get("missing").await, Err(StoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn append_rules(pool: PgPool) {
    seed(&pool, "p", 2).await;
    let store = PgScopeStore::new(pool);
    store.create(&Scope::open("s1".into(), "p", "W1", 2)).await.unwrap();

    assert_eq!(store.append_participant("s1", "W2").await.unwrap(), vec!["W1", "W2"]);
    assert_eq!(store.append_participant("s1", "W1").await.unwrap(), vec!["W1", "W2"]);
    assert_matches!(
        store.append_participant("s1", "W3").await,
        Err(StoreError::CohortFull { capacity: 2, .. })
    );
    assert_matches!(
        store.append_participant("missing", "W3").await,
        Err(StoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_appends_are_serialized(pool: PgPool) {
    seed(&pool, "wide", 16).await;
    let store = Arc::new(PgScopeStore::new(pool));
    store.create(&Scope::open("s1".into(), "wide", "W0", 16)).await.unwrap();

    let handles: Vec<_> = (1..24)
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
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 15);

    let participants = store.get("s1").await.unwrap().participants;
    assert_eq!(participants.len(), 16);
    assert_eq!(participants.iter().collect::<HashSet<_>>().len(), 16);
}
