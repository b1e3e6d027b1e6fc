//! Integration tests against a live PostgreSQL instance.
//!
//! Ignored by default; run with `DATABASE_URL` pointing at a test database:
//! `DATABASE_URL=postgres://... cargo test -p reference-store -- --ignored`

use reference_store::{SeriesDocument, SeriesStore};

async fn connect() -> SeriesStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for store tests");
    let store = SeriesStore::connect(&url).await.unwrap();
    store.migrate().await.unwrap();
    store
}

#[tokio::test]
#[ignore]
async fn test_put_fetch_round_trip() {
    let store = connect().await;

    let doc = SeriesDocument {
        data: vec![vec![Some(0.1234), None, Some(-0.05)]],
    };
    store.put("-45.125_12.375", &doc).await.unwrap();

    let fetched = store.fetch("-45.125_12.375").await.unwrap().unwrap();
    let series = fetched.reference_series(0).unwrap();
    assert_eq!(series[0], 0.1234);
    assert!(series[1].is_nan());
    assert_eq!(series[2], -0.05);
}

#[tokio::test]
#[ignore]
async fn test_absent_key_is_not_an_error() {
    let store = connect().await;
    let fetched = store.fetch("999_999").await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
#[ignore]
async fn test_put_replaces_existing_document() {
    let store = connect().await;

    let first = SeriesDocument {
        data: vec![vec![Some(1.0)]],
    };
    let second = SeriesDocument {
        data: vec![vec![Some(2.0)]],
    };
    store.put("0.125_0.125", &first).await.unwrap();
    store.put("0.125_0.125", &second).await.unwrap();

    let fetched = store.fetch("0.125_0.125").await.unwrap().unwrap();
    assert_eq!(fetched.reference_series(0).unwrap(), vec![2.0]);
}
