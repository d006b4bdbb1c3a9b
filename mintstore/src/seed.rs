//! Starting data for a store: the built-in demo marketplace or a JSON seed file.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::StoreError,
    models::{Bid, Collection, Nft, User},
};

/// Records loaded verbatim into a store, bypassing insert validation.
///
/// Each collection must list ids `1..=n` in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub nfts: Vec<Nft>,
    #[serde(default)]
    pub bids: Vec<Bid>,
}

const UNSPLASH_QUERY: &str = "ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop";

fn unsplash(photo: &str, width: u32) -> String {
    format!("https://images.unsplash.com/{photo}?{UNSPLASH_QUERY}&w={width}&q=80")
}

impl SeedData {
    /// The demo marketplace, timestamped at the current instant.
    pub fn demo() -> Self {
        Self::demo_at(Utc::now())
    }

    /// The demo marketplace with every timestamp at `now`; the auction closes three days later.
    pub fn demo_at(now: DateTime<Utc>) -> Self {
        let users = vec![
            User {
                id: 1,
                username: "johndoe".to_string(),
                email: Some("john@example.com".to_string()),
                bio: Some("Digital artist and NFT creator".to_string()),
                avatar: Some(unsplash("photo-1568602471122-7832951cc4c5", 200)),
                wallet_address: Some("0x1234...5678".to_string()),
                password: Some("password123".to_string()),
                is_verified: true,
                banner_image: Some(unsplash("photo-1579546929518-9e396f3cc809", 1200)),
                created_at: now,
                updated_at: now,
            },
            User {
                id: 2,
                username: "janesmith".to_string(),
                email: Some("jane@example.com".to_string()),
                bio: Some("Crypto artist specializing in abstract digital art".to_string()),
                avatar: Some(unsplash("photo-1544005313-94ddf0286df2", 200)),
                wallet_address: Some("0x9876...4321".to_string()),
                password: Some("password456".to_string()),
                is_verified: true,
                banner_image: Some(unsplash("photo-1614850523459-c2f4c699c52e", 1200)),
                created_at: now,
                updated_at: now,
            },
        ];

        let collections = vec![
            Collection {
                id: 1,
                name: "Abstract Dimensions".to_string(),
                description: Some("A collection of abstract 3D artworks exploring dimensions and space.".to_string()),
                image: unsplash("photo-1536924940846-227afb31e2a5", 500),
                banner_image: Some(unsplash("photo-1549490349-8643362247b5", 1200)),
                creator_id: 1,
                category: Some("Abstract".to_string()),
                floor_price: Some("0.5".to_string()),
                total_volume: Some("120.5".to_string()),
                royalty_percentage: 10.0,
                verified: true,
                items_count: 12,
                created_at: now,
                updated_at: now,
            },
            Collection {
                id: 2,
                name: "Neon Future".to_string(),
                description: Some("Cyberpunk-inspired digital art with neon aesthetics.".to_string()),
                image: unsplash("photo-1563089145-599997674d42", 500),
                banner_image: Some(unsplash("photo-1550745165-9bc0b252726f", 1200)),
                creator_id: 2,
                category: Some("Cyberpunk".to_string()),
                floor_price: Some("0.8".to_string()),
                total_volume: Some("65.2".to_string()),
                royalty_percentage: 7.5,
                verified: true,
                items_count: 8,
                created_at: now,
                updated_at: now,
            },
        ];

        let nfts = vec![
            Nft {
                id: 1,
                name: "Ethereal Landscape #1".to_string(),
                description: Some("A surreal digital landscape with floating islands and cosmic elements.".to_string()),
                image: unsplash("photo-1533158388470-9a56699990c6", 800),
                creator_id: 1,
                owner_id: 1,
                collection_id: Some(1),
                price: Some("1.5".to_string()),
                currency: "ETH".to_string(),
                royalty_percentage: 10.0,
                is_auction: false,
                auction_end_time: None,
                token_id: Some("1001".to_string()),
                token_standard: "ERC-721".to_string(),
                blockchain: "Base".to_string(),
                likes: 42,
                views: 156,
                featured: true,
                created_at: now,
                updated_at: now,
            },
            Nft {
                id: 2,
                name: "Neon City Dreams".to_string(),
                description: Some("A futuristic cityscape bathed in neon lights.".to_string()),
                image: unsplash("photo-1569172122301-bc5008bc09c5", 800),
                creator_id: 2,
                owner_id: 1,
                collection_id: Some(2),
                price: Some("2.3".to_string()),
                currency: "ETH".to_string(),
                royalty_percentage: 7.5,
                is_auction: true,
                auction_end_time: Some(now + Duration::days(3)),
                token_id: Some("2001".to_string()),
                token_standard: "ERC-721".to_string(),
                blockchain: "Base".to_string(),
                likes: 78,
                views: 213,
                // Only the first demo NFT is promoted on the landing page.
                featured: false,
                created_at: now,
                updated_at: now,
            },
        ];

        let bids = vec![Bid {
            id: 1,
            nft_id: 2,
            bidder_id: 1,
            amount: "2.1".to_string(),
            currency: "ETH".to_string(),
            expires_at: None,
            created_at: now,
        }];

        Self {
            users,
            collections,
            nfts,
            bids,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON seed file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_ids_are_sequential() {
        let seed = SeedData::demo();
        assert!(seed.users.iter().enumerate().all(|(i, u)| u.id == i as u64 + 1));
        assert!(seed.collections.iter().enumerate().all(|(i, c)| c.id == i as u64 + 1));
        assert!(seed.nfts.iter().enumerate().all(|(i, n)| n.id == i as u64 + 1));
        assert_eq!(seed.bids.len(), 1);
    }

    #[test]
    fn demo_auction_ends_three_days_out() {
        let now = Utc::now();
        let seed = SeedData::demo_at(now);
        assert_eq!(seed.nfts[1].auction_end_time, Some(now + Duration::days(3)));
        assert!(seed.nfts[1].is_auction);
    }

    #[test]
    fn seed_json_uses_record_wire_names() {
        let json = serde_json::to_string(&SeedData::demo()).expect("serialize seed");
        assert!(json.contains("\"walletAddress\""));
        let parsed = SeedData::from_json(&json).expect("parse seed");
        assert_eq!(parsed.users[0].username, "johndoe");
        assert_eq!(parsed.collections[1].royalty_percentage, 7.5);
    }

    #[test]
    fn partial_seed_documents_default_missing_collections() {
        let parsed = SeedData::from_json(r#"{"bids": []}"#).expect("parse seed");
        assert!(parsed.users.is_empty());
        assert!(parsed.nfts.is_empty());
    }
}
