use mintstore::{MarketStore, NewUser, SeedData, StoreError};
use serde_json::json;

#[tokio::test]
async fn seed_file_round_trips_a_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("market.json");

    let original = MarketStore::demo();
    original
        .create_user(NewUser {
            username: "collector".to_string(),
            ..Default::default()
        })
        .await
        .expect("valid user");
    let snapshot = original.snapshot().await;
    std::fs::write(&path, serde_json::to_string_pretty(&snapshot).expect("serialize")).expect("write seed");

    let seed = SeedData::load(&path).await.expect("load seed");
    let restored = MarketStore::from_seed(seed).expect("sequential ids");
    assert_eq!(restored.snapshot().await, snapshot);

    let next = restored
        .create_user(NewUser {
            username: "latecomer".to_string(),
            ..Default::default()
        })
        .await
        .expect("valid user");
    assert_eq!(next.id, 4);
}

#[tokio::test]
async fn gapped_ids_are_rejected() {
    let now = "2025-01-01T00:00:00Z";
    let document = json!({
        "users": [
            {"id": 1, "username": "first", "isVerified": false, "createdAt": now, "updatedAt": now},
            {"id": 3, "username": "third", "isVerified": false, "createdAt": now, "updatedAt": now}
        ]
    });
    let seed = SeedData::from_json(&document.to_string()).expect("well-formed seed");
    let err = MarketStore::from_seed(seed).err().expect("gap at position 1");
    assert!(matches!(err, StoreError::InvalidSeed { .. }));
}

#[tokio::test]
async fn missing_seed_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = SeedData::load(dir.path().join("absent.json")).await.expect_err("no file");
    assert!(matches!(err, StoreError::Io(_)));
}

#[tokio::test]
async fn malformed_seed_file_is_a_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"users\": [").expect("write seed");
    let err = SeedData::load(&path).await.expect_err("truncated json");
    assert!(matches!(err, StoreError::Json(_)));
}
