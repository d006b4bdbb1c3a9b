//! Create and update semantics: validation, id sequencing, shallow patches.

use std::sync::Arc;

use mintstore::{
    CollectionPatch, MarketStore, NewBid, NewCollection, NewNft, NewUser, NftPatch, RawPayload, StoreError,
    User, UserPatch,
};
use serde_json::json;

const IMAGE: &str = "https://images.example.com/art.png";

fn new_collection(name: &str, creator_id: i64) -> NewCollection {
    NewCollection {
        name: name.to_string(),
        image: IMAGE.to_string(),
        creator_id,
        ..Default::default()
    }
}

#[tokio::test]
async fn created_ids_exceed_every_previous_id() {
    let store = MarketStore::demo();
    let mut last = 2;
    for name in ["carol", "dave", "erin"] {
        let user = store
            .create_user(NewUser {
                username: name.to_string(),
                ..Default::default()
            })
            .await
            .expect("valid user");
        assert!(user.id > last);
        last = user.id;
    }
    assert_eq!(last, 5);
}

#[tokio::test]
async fn royalty_above_bound_is_rejected_not_clamped() {
    let store = MarketStore::demo();
    let err = store
        .create_collection(NewCollection {
            royalty_percentage: Some(30.0),
            ..new_collection("Too Greedy", 1)
        })
        .await
        .expect_err("royalty 30 exceeds 25");
    let StoreError::Validation(validation) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(validation.fields(), vec!["royaltyPercentage"]);
    assert_eq!(store.get_all_collections(Default::default()).await.len(), 2);
}

#[tokio::test]
async fn new_collection_gets_defaults_and_zero_items() {
    let store = MarketStore::demo();
    let collection = store
        .create_collection(new_collection("Fresh Mint", 2))
        .await
        .expect("valid collection");
    assert_eq!(collection.id, 3);
    assert_eq!(collection.items_count, 0);
    assert_eq!(collection.royalty_percentage, 10.0);
    assert!(!collection.verified);

    store
        .create_nft(NewNft {
            name: "First Drop".to_string(),
            image: IMAGE.to_string(),
            creator_id: 2,
            owner_id: 2,
            collection_id: Some(3),
            ..Default::default()
        })
        .await
        .expect("valid nft");
    let reread = store.get_collection(3).await.expect("collection exists");
    assert_eq!(reread.items_count, 0);
}

#[tokio::test]
async fn new_nft_starts_unpromoted() {
    let store = MarketStore::demo();
    let nft = store
        .create_nft(NewNft {
            name: "Quiet Piece".to_string(),
            image: IMAGE.to_string(),
            creator_id: 1,
            owner_id: 2,
            price: Some("0.25".to_string()),
            auction_end_time: Some("2031-01-01T00:00:00Z".to_string()),
            ..Default::default()
        })
        .await
        .expect("valid nft");
    assert_eq!(nft.id, 3);
    assert_eq!((nft.likes, nft.views, nft.featured), (0, 0, false));
    assert_eq!(nft.currency, "ETH");
    assert_eq!(nft.token_standard, "ERC-721");
    assert_eq!(nft.blockchain, "Base");
    assert!(nft.auction_end_time.is_some());
    assert_eq!(store.get_featured_nfts(None).await.len(), 1);
}

#[tokio::test]
async fn invalid_user_reports_every_field() {
    let store = MarketStore::empty();
    let err = store
        .create_user(NewUser {
            username: "ab".to_string(),
            email: Some("not-an-email".to_string()),
            avatar: Some("avatar.png".to_string()),
            password: Some("short".to_string()),
            ..Default::default()
        })
        .await
        .expect_err("invalid user");
    let issues = err.validation_issues().expect("validation issues");
    let fields: Vec<&str> = issues.iter().map(|issue| issue.field.as_str()).collect();
    assert_eq!(fields, vec!["username", "email", "avatar", "password"]);
    assert!(store.get_user(1).await.is_none());
}

#[tokio::test]
async fn raw_payload_type_errors_are_field_level() {
    let store = MarketStore::empty();
    let err = store
        .create_bid(RawPayload::new(json!({
            "nftId": "2",
            "bidderId": 1,
            "amount": 2.1,
            "expiresAt": "2030-01-01T00:00:00+01:00"
        })))
        .await
        .expect_err("invalid bid");
    let StoreError::Validation(validation) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(validation.has_issue("nftId", "validation.invalid_type"));
    assert!(validation.has_issue("amount", "validation.invalid_type"));
    assert!(validation.has_issue("expiresAt", "validation.datetime"));
}

#[tokio::test]
async fn ids_past_u64_are_range_errors_not_saturated() {
    let store = MarketStore::empty();
    let err = store
        .create_collection(RawPayload::new(json!({
            "name": "Overflow",
            "image": IMAGE,
            "creatorId": 1e20
        })))
        .await
        .expect_err("1e20 is not a representable id");
    let StoreError::Validation(validation) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(validation.has_issue("creatorId", "validation.range"));
    assert!(store.snapshot().await.collections.is_empty());

    let created = store
        .create_collection(RawPayload::new(json!({
            "name": "Wide",
            "image": IMAGE,
            "creatorId": 1e19
        })))
        .await
        .expect("1e19 fits an unsigned id");
    assert_eq!(created.creator_id, 10_000_000_000_000_000_000);
}

#[tokio::test]
async fn bids_are_accepted_without_reference_checks() {
    let store = MarketStore::demo();
    let bid = store
        .create_bid(NewBid {
            nft_id: 99,
            bidder_id: 77,
            amount: "-5".to_string(),
            ..Default::default()
        })
        .await
        .expect("bid is not cross-checked");
    assert_eq!(bid.id, 2);
    assert_eq!(bid.amount, "-5");
}

#[tokio::test]
async fn update_overlays_patch_and_refreshes_updated_at() {
    let store = MarketStore::demo();
    let before = store.get_user(2).await.expect("seeded user");
    let after = store
        .update_user(
            2,
            UserPatch {
                bio: Some("Generative artist".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("user exists");

    assert!(after.updated_at > before.updated_at);
    let expected = User {
        bio: Some("Generative artist".to_string()),
        updated_at: after.updated_at,
        ..before
    };
    assert_eq!(after, expected);
    assert_eq!(store.get_user(2).await, Some(after));
}

#[tokio::test]
async fn update_of_missing_id_mutates_nothing() {
    let store = MarketStore::demo();
    let before = store.snapshot().await;
    assert!(store.update_user(9, UserPatch::default()).await.is_none());
    assert!(
        store
            .update_collection(
                0,
                CollectionPatch {
                    name: Some("ghost".to_string()),
                    ..Default::default()
                }
            )
            .await
            .is_none()
    );
    assert!(store.update_nft(3, NftPatch::default()).await.is_none());
    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn nft_update_keeps_counters() {
    let store = MarketStore::demo();
    let updated = store
        .update_nft(
            1,
            NftPatch {
                price: Some("3.0".to_string()),
                owner_id: Some(2),
                ..Default::default()
            },
        )
        .await
        .expect("nft exists");
    assert_eq!(updated.price.as_deref(), Some("3.0"));
    assert_eq!(updated.owner_id, 2);
    assert_eq!((updated.likes, updated.views, updated.featured), (42, 156, true));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_never_reuse_an_id() {
    let store = Arc::new(MarketStore::empty());
    let mut handles = Vec::new();
    for index in 0..32 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create_collection(new_collection(&format!("Drop {index}"), 1))
                .await
                .map(|collection| collection.id)
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("task joins").expect("valid collection"));
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=32).collect::<Vec<u64>>());
}
