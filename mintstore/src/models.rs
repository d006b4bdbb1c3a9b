//! Marketplace records, their insert inputs and their update patches.
//!
//! Records serialize with camelCase wire names (`creatorId`, `floorPrice`, ...).
//! Absent optionals are omitted rather than written as `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user as exposed on read paths that must never leak credentials.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            wallet_address: user.wallet_address.clone(),
            is_verified: user.is_verified,
            banner_image: user.banner_image.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    pub creator_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<String>,
    pub royalty_percentage: f64,
    pub verified: bool,
    /// Set to zero on creation and never recomputed as NFTs are added.
    pub items_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    pub creator_id: u64,
    pub owner_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub currency: String,
    pub royalty_percentage: f64,
    pub is_auction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    pub token_standard: String,
    pub blockchain: String,
    pub likes: u64,
    pub views: u64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: u64,
    pub nft_id: u64,
    pub bidder_id: u64,
    /// Decimal amount kept verbatim; never parsed or range-checked.
    pub amount: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A bid joined with its bidder, as returned by bid listings for an NFT.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidWithBidder {
    #[serde(flatten)]
    pub bid: Bid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder: Option<PublicUser>,
}

// ─── Insert inputs ────────────────────────────────────────────────────────────
//
// Integer references are signed and numbers are unconstrained so that every
// bound is reported by schema validation instead of being unrepresentable.

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    pub creator_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    pub creator_id: i64,
    pub owner_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_auction: Option<bool>,
    /// ISO 8601 UTC timestamp, checked by schema validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBid {
    pub nft_id: i64,
    pub bidder_id: i64,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

// ─── Update patches ───────────────────────────────────────────────────────────
//
// Shallow overlays: a `Some` replaces the stored value, a `None` leaves it
// untouched. Derived counters (itemsCount, likes, views, featured) are not
// patchable.

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NftPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_auction: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
}

/// Assigns each `Some` field of a patch onto the record.
macro_rules! overlay {
    ($record:expr, $patch:expr; optional: $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $record.$field = Some(value);
            }
        )+
    };
    ($record:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $record.$field = value;
            }
        )+
    };
}

impl User {
    pub fn apply_patch(&mut self, patch: UserPatch) {
        overlay!(self, patch; username, is_verified);
        overlay!(self, patch; optional: email, bio, avatar, wallet_address, password, banner_image);
    }
}

impl Collection {
    pub fn apply_patch(&mut self, patch: CollectionPatch) {
        overlay!(self, patch; name, image, creator_id, royalty_percentage, verified);
        overlay!(self, patch; optional: description, banner_image, category, floor_price, total_volume);
    }
}

impl Nft {
    pub fn apply_patch(&mut self, patch: NftPatch) {
        overlay!(
            self,
            patch;
            name,
            image,
            creator_id,
            owner_id,
            currency,
            royalty_percentage,
            is_auction,
            token_standard,
            blockchain,
        );
        overlay!(self, patch; optional: description, collection_id, price, auction_end_time, token_id);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "johndoe".to_string(),
            email: Some("john@example.com".to_string()),
            bio: None,
            avatar: None,
            wallet_address: Some("0x1234...5678".to_string()),
            password: Some("password123".to_string()),
            is_verified: true,
            banner_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn records_use_camel_case_and_omit_absent_fields() {
        let value = serde_json::to_value(sample_user()).expect("serialize user");
        assert_eq!(value["walletAddress"], json!("0x1234...5678"));
        assert_eq!(value["isVerified"], json!(true));
        assert!(value.get("bio").is_none());
    }

    #[test]
    fn public_user_has_no_password_key() {
        let public = PublicUser::from(&sample_user());
        let value = serde_json::to_value(&public).expect("serialize public user");
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], json!("johndoe"));
    }

    #[test]
    fn patch_overlays_only_present_fields() {
        let mut user = sample_user();
        user.apply_patch(UserPatch {
            bio: Some("Digital artist".to_string()),
            is_verified: Some(false),
            ..Default::default()
        });
        assert_eq!(user.bio.as_deref(), Some("Digital artist"));
        assert!(!user.is_verified);
        assert_eq!(user.email.as_deref(), Some("john@example.com"));
        assert_eq!(user.username, "johndoe");
    }

    #[test]
    fn patches_reject_derived_counters() {
        let err = serde_json::from_value::<NftPatch>(json!({"likes": 10})).expect_err("likes is not patchable");
        assert!(err.to_string().contains("likes"));
    }

    #[test]
    fn bid_with_bidder_flattens_bid_fields() {
        let now = Utc::now();
        let enriched = BidWithBidder {
            bid: Bid {
                id: 1,
                nft_id: 2,
                bidder_id: 7,
                amount: "2.1".to_string(),
                currency: "ETH".to_string(),
                expires_at: None,
                created_at: now,
            },
            bidder: None,
        };
        let value = serde_json::to_value(&enriched).expect("serialize bid");
        assert_eq!(value["nftId"], json!(2));
        assert!(value.get("bidder").is_none());
    }
}
