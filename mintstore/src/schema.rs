//! Insert schemas for the four marketplace entities.
//!
//! Field names are the camelCase wire names used by records and payloads.

use std::sync::OnceLock;

use crate::types::{EntityDescriptor, FieldDescriptor};

pub const DEFAULT_CURRENCY: &str = "ETH";
pub const DEFAULT_TOKEN_STANDARD: &str = "ERC-721";
pub const DEFAULT_BLOCKCHAIN: &str = "Base";
pub const DEFAULT_ROYALTY_PERCENTAGE: f64 = 10.0;
pub const MAX_ROYALTY_PERCENTAGE: f64 = 25.0;

fn royalty_percentage() -> FieldDescriptor {
    FieldDescriptor::number("royaltyPercentage")
        .range(Some(0.0), Some(MAX_ROYALTY_PERCENTAGE))
        .default_value(DEFAULT_ROYALTY_PERCENTAGE)
}

fn foreign_key(name: &'static str) -> FieldDescriptor {
    FieldDescriptor::integer(name).positive()
}

pub fn user_descriptor() -> &'static EntityDescriptor {
    static DESCRIPTOR: OnceLock<EntityDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        EntityDescriptor::new(
            "user",
            vec![
                FieldDescriptor::string("username").length(Some(3), Some(30)),
                FieldDescriptor::string("email").optional().email(),
                FieldDescriptor::string("bio").optional().length(None, Some(500)),
                FieldDescriptor::string("avatar").optional().url(),
                FieldDescriptor::string("walletAddress").optional(),
                FieldDescriptor::string("password").optional().length(Some(8), Some(100)),
                FieldDescriptor::boolean("isVerified").default_value(false),
                FieldDescriptor::string("bannerImage").optional().url(),
            ],
        )
    })
}

pub fn collection_descriptor() -> &'static EntityDescriptor {
    static DESCRIPTOR: OnceLock<EntityDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        EntityDescriptor::new(
            "collection",
            vec![
                FieldDescriptor::string("name").length(Some(1), Some(100)),
                FieldDescriptor::string("description").optional().length(None, Some(1000)),
                FieldDescriptor::string("image").url(),
                FieldDescriptor::string("bannerImage").optional().url(),
                foreign_key("creatorId"),
                FieldDescriptor::string("category").optional(),
                FieldDescriptor::string("floorPrice").optional(),
                FieldDescriptor::string("totalVolume").optional(),
                royalty_percentage(),
                FieldDescriptor::boolean("verified").default_value(false),
            ],
        )
    })
}

pub fn nft_descriptor() -> &'static EntityDescriptor {
    static DESCRIPTOR: OnceLock<EntityDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        EntityDescriptor::new(
            "nft",
            vec![
                FieldDescriptor::string("name").length(Some(1), Some(100)),
                FieldDescriptor::string("description").optional().length(None, Some(2000)),
                FieldDescriptor::string("image").url(),
                foreign_key("creatorId"),
                foreign_key("ownerId"),
                foreign_key("collectionId").optional(),
                FieldDescriptor::string("price").optional(),
                FieldDescriptor::string("currency").default_value(DEFAULT_CURRENCY),
                royalty_percentage(),
                FieldDescriptor::boolean("isAuction").default_value(false),
                FieldDescriptor::string("auctionEndTime").optional().datetime(),
                FieldDescriptor::string("tokenId").optional(),
                FieldDescriptor::string("tokenStandard").default_value(DEFAULT_TOKEN_STANDARD),
                FieldDescriptor::string("blockchain").default_value(DEFAULT_BLOCKCHAIN),
            ],
        )
    })
}

pub fn bid_descriptor() -> &'static EntityDescriptor {
    static DESCRIPTOR: OnceLock<EntityDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        EntityDescriptor::new(
            "bid",
            vec![
                foreign_key("nftId"),
                foreign_key("bidderId"),
                FieldDescriptor::string("amount"),
                FieldDescriptor::string("currency").default_value(DEFAULT_CURRENCY),
                FieldDescriptor::string("expiresAt").optional().datetime(),
            ],
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::validate_payload;

    const IMAGE: &str = "https://images.example.com/art.png";

    #[test]
    fn user_schema_bounds() {
        let err = validate_payload(
            user_descriptor(),
            json!({"username": "jo", "password": "short", "email": "nope", "bio": "x".repeat(501)}),
        )
        .expect_err("user should fail");
        assert_eq!(err.fields(), vec!["username", "email", "bio", "password"]);

        let ok = validate_payload(user_descriptor(), json!({"username": "alice"})).expect("minimal user");
        assert_eq!(ok.get("isVerified"), Some(&json!(false)));
    }

    #[test]
    fn collection_royalty_is_bounded_not_clamped() {
        let err = validate_payload(
            collection_descriptor(),
            json!({"name": "Drops", "image": IMAGE, "creatorId": 1, "royaltyPercentage": 30}),
        )
        .expect_err("royalty above 25 must fail");
        assert!(err.has_issue("royaltyPercentage", "validation.range"));

        let ok = validate_payload(collection_descriptor(), json!({"name": "Drops", "image": IMAGE, "creatorId": 1}))
            .expect("collection with defaults");
        assert_eq!(ok.get("royaltyPercentage"), Some(&json!(10.0)));
        assert_eq!(ok.get("verified"), Some(&json!(false)));
    }

    #[test]
    fn nft_defaults() {
        let ok = validate_payload(
            nft_descriptor(),
            json!({"name": "Piece", "image": IMAGE, "creatorId": 1, "ownerId": 2}),
        )
        .expect("minimal nft");
        assert_eq!(ok.get("currency"), Some(&json!("ETH")));
        assert_eq!(ok.get("tokenStandard"), Some(&json!("ERC-721")));
        assert_eq!(ok.get("blockchain"), Some(&json!("Base")));
        assert_eq!(ok.get("isAuction"), Some(&json!(false)));
    }

    #[test]
    fn nft_rejects_bad_auction_end_and_collection() {
        let err = validate_payload(
            nft_descriptor(),
            json!({
                "name": "Piece",
                "image": IMAGE,
                "creatorId": 1,
                "ownerId": 1,
                "collectionId": -4,
                "auctionEndTime": "next friday"
            }),
        )
        .expect_err("nft should fail");
        assert!(err.has_issue("collectionId", "validation.range"));
        assert!(err.has_issue("auctionEndTime", "validation.datetime"));
    }

    #[test]
    fn bid_requires_amount() {
        let err = validate_payload(bid_descriptor(), json!({"nftId": 1, "bidderId": 2})).expect_err("amount missing");
        assert!(err.has_issue("amount", "validation.required"));
    }
}
