//! The marketplace store: four record collections and the read/write surface over them.

use serde::{Deserialize, Serialize};

use crate::{
    errors::StoreError,
    filters::{NftFilter, Pagination, limit_or, sort_by_floor_price_desc},
    models::{Bid, BidWithBidder, Collection, CollectionPatch, Nft, NftPatch, PublicUser, User, UserPatch},
    repository::{MutationPayloadBuilder, Repo},
    seed::SeedData,
};

pub const DEFAULT_TRENDING_LIMIT: usize = 4;
pub const DEFAULT_FEATURED_LIMIT: usize = 8;

/// Limits applied when a listing call supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingDefaults {
    pub trending_limit: usize,
    pub featured_limit: usize,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self {
            trending_limit: DEFAULT_TRENDING_LIMIT,
            featured_limit: DEFAULT_FEATURED_LIMIT,
        }
    }
}

/// In-memory marketplace data layer.
///
/// Each collection is guarded independently; a create or update holds its
/// collection's write lock for the whole read-modify-append, so ids stay
/// sequential and updates are never lost under concurrent callers.
///
/// Known limitations: `itemsCount` is not incremented when NFTs are created,
/// `likes`/`views`/`featured` have no mutating operation, and bids are
/// accepted without checking that the NFT or bidder exists or that an auction
/// is still open.
pub struct MarketStore {
    users: Repo<User>,
    collections: Repo<Collection>,
    nfts: Repo<Nft>,
    bids: Repo<Bid>,
    listings: ListingDefaults,
}

impl Default for MarketStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl MarketStore {
    /// A store with no records.
    pub fn empty() -> Self {
        Self {
            users: Repo::new(),
            collections: Repo::new(),
            nfts: Repo::new(),
            bids: Repo::new(),
            listings: ListingDefaults::default(),
        }
    }

    /// A store holding the demo marketplace. The demo records are numbered `1..=n`,
    /// so no id check can fail here.
    pub fn demo() -> Self {
        let SeedData {
            users,
            collections,
            nfts,
            bids,
        } = SeedData::demo();
        Self {
            users: Repo::from_sequential(users),
            collections: Repo::from_sequential(collections),
            nfts: Repo::from_sequential(nfts),
            bids: Repo::from_sequential(bids),
            listings: ListingDefaults::default(),
        }
    }

    pub fn from_seed(seed: SeedData) -> Result<Self, StoreError> {
        let SeedData {
            users,
            collections,
            nfts,
            bids,
        } = seed;
        log::info!(
            "seeding store with {} users, {} collections, {} nfts, {} bids",
            users.len(),
            collections.len(),
            nfts.len(),
            bids.len()
        );
        Ok(Self {
            users: Repo::from_records(users)?,
            collections: Repo::from_records(collections)?,
            nfts: Repo::from_records(nfts)?,
            bids: Repo::from_records(bids)?,
            listings: ListingDefaults::default(),
        })
    }

    pub fn with_listing_defaults(mut self, listings: ListingDefaults) -> Self {
        self.listings = listings;
        self
    }

    pub fn listing_defaults(&self) -> ListingDefaults {
        self.listings
    }

    /// Copies every record out into a seed document.
    pub async fn snapshot(&self) -> SeedData {
        SeedData {
            users: self.users.all().await,
            collections: self.collections.all().await,
            nfts: self.nfts.all().await,
            bids: self.bids.all().await,
        }
    }

    // ─── Users ────────────────────────────────────────────────────────────────

    pub async fn get_user(&self, id: u64) -> Option<User> {
        self.users.get(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.find(|user| user.username == username).await
    }

    pub async fn get_user_by_wallet_address(&self, address: &str) -> Option<User> {
        self.users
            .find(|user| user.wallet_address.as_deref() == Some(address))
            .await
    }

    pub async fn create_user<B>(&self, input: B) -> Result<User, StoreError>
    where
        B: MutationPayloadBuilder<Entity = User>,
    {
        self.users.create(input).await
    }

    pub async fn update_user(&self, id: u64, patch: UserPatch) -> Option<User> {
        self.users.update(id, patch).await
    }

    // ─── Collections ──────────────────────────────────────────────────────────

    /// Collections in insertion order, windowed by `page`.
    pub async fn get_all_collections(&self, page: Pagination) -> Vec<Collection> {
        page.apply(self.collections.all().await)
    }

    /// Collections by floor price, highest first. Missing or unparseable floor prices rank as zero.
    pub async fn get_trending_collections(&self, limit: Option<usize>) -> Vec<Collection> {
        let mut collections = self.collections.all().await;
        sort_by_floor_price_desc(&mut collections);
        collections.truncate(limit_or(limit, self.listings.trending_limit));
        collections
    }

    pub async fn get_collection(&self, id: u64) -> Option<Collection> {
        self.collections.get(id).await
    }

    pub async fn get_collections_by_creator(&self, creator_id: u64) -> Vec<Collection> {
        self.collections
            .filter(|collection| collection.creator_id == creator_id)
            .await
    }

    pub async fn create_collection<B>(&self, input: B) -> Result<Collection, StoreError>
    where
        B: MutationPayloadBuilder<Entity = Collection>,
    {
        self.collections.create(input).await
    }

    pub async fn update_collection(&self, id: u64, patch: CollectionPatch) -> Option<Collection> {
        self.collections.update(id, patch).await
    }

    // ─── NFTs ─────────────────────────────────────────────────────────────────

    /// NFTs matching `filter`, then windowed by `page`.
    pub async fn get_all_nfts(&self, page: Pagination, filter: NftFilter) -> Vec<Nft> {
        let nfts = if filter.is_empty() {
            self.nfts.all().await
        } else {
            self.nfts.filter(|nft| filter.matches(nft)).await
        };
        page.apply(nfts)
    }

    /// Featured NFTs in insertion order.
    pub async fn get_featured_nfts(&self, limit: Option<usize>) -> Vec<Nft> {
        let mut featured = self.nfts.filter(|nft| nft.featured).await;
        featured.truncate(limit_or(limit, self.listings.featured_limit));
        featured
    }

    pub async fn get_nft(&self, id: u64) -> Option<Nft> {
        self.nfts.get(id).await
    }

    pub async fn get_nfts_by_collection(&self, collection_id: u64) -> Vec<Nft> {
        self.nfts.filter(|nft| nft.collection_id == Some(collection_id)).await
    }

    pub async fn get_nfts_by_creator(&self, creator_id: u64) -> Vec<Nft> {
        self.nfts.filter(|nft| nft.creator_id == creator_id).await
    }

    pub async fn get_nfts_by_owner(&self, owner_id: u64) -> Vec<Nft> {
        self.nfts.filter(|nft| nft.owner_id == owner_id).await
    }

    pub async fn create_nft<B>(&self, input: B) -> Result<Nft, StoreError>
    where
        B: MutationPayloadBuilder<Entity = Nft>,
    {
        self.nfts.create(input).await
    }

    pub async fn update_nft(&self, id: u64, patch: NftPatch) -> Option<Nft> {
        self.nfts.update(id, patch).await
    }

    // ─── Bids ─────────────────────────────────────────────────────────────────

    /// Bids on `nft_id`, each joined with its bidder minus the password.
    /// A bid whose bidder no longer resolves is returned without one.
    pub async fn get_bids_by_nft(&self, nft_id: u64) -> Vec<BidWithBidder> {
        let bids = self.bids.filter(|bid| bid.nft_id == nft_id).await;
        let mut enriched = Vec::with_capacity(bids.len());
        for bid in bids {
            let bidder = self.users.get(bid.bidder_id).await.as_ref().map(PublicUser::from);
            enriched.push(BidWithBidder { bid, bidder });
        }
        enriched
    }

    pub async fn get_bids_by_bidder(&self, bidder_id: u64) -> Vec<Bid> {
        self.bids.filter(|bid| bid.bidder_id == bidder_id).await
    }

    /// Appends a bid. The NFT and bidder are not checked for existence.
    pub async fn create_bid<B>(&self, input: B) -> Result<Bid, StoreError>
    where
        B: MutationPayloadBuilder<Entity = Bid>,
    {
        self.bids.create(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewBid;

    #[tokio::test]
    async fn empty_store_misses_are_none() {
        let store = MarketStore::empty();
        assert!(store.get_user(1).await.is_none());
        assert!(store.get_user_by_username("johndoe").await.is_none());
        assert!(store.get_collection(1).await.is_none());
        assert!(store.get_nft(1).await.is_none());
        assert!(store.get_trending_collections(None).await.is_empty());
        assert!(store.get_bids_by_nft(1).await.is_empty());
    }

    #[tokio::test]
    async fn bid_on_unknown_bidder_has_no_bidder() {
        let store = MarketStore::empty();
        store
            .create_bid(NewBid {
                nft_id: 9,
                bidder_id: 42,
                amount: "0.1".to_string(),
                ..Default::default()
            })
            .await
            .expect("bid without referential checks");
        let bids = store.get_bids_by_nft(9).await;
        assert_eq!(bids.len(), 1);
        assert!(bids[0].bidder.is_none());
        assert_eq!(bids[0].bid.currency, "ETH");
    }

    #[tokio::test]
    async fn listing_defaults_bound_unlimited_calls() {
        let store = MarketStore::demo().with_listing_defaults(ListingDefaults {
            trending_limit: 1,
            featured_limit: 8,
        });
        let trending = store.get_trending_collections(None).await;
        assert_eq!(trending.len(), 1);
        assert_eq!(trending[0].name, "Neon Future");
        assert_eq!(store.get_trending_collections(Some(10)).await.len(), 2);
    }

    #[tokio::test]
    async fn demo_store_holds_every_demo_record() {
        let snapshot = MarketStore::demo().snapshot().await;
        assert_eq!(snapshot.users.len(), 2);
        assert_eq!(snapshot.collections.len(), 2);
        assert_eq!(snapshot.nfts.len(), 2);
        assert_eq!(snapshot.bids.len(), 1);
        assert_eq!(snapshot.users[0].username, "johndoe");
    }

    #[tokio::test]
    async fn snapshot_round_trips_into_a_new_store() {
        let store = MarketStore::demo();
        let copy = MarketStore::from_seed(store.snapshot().await).expect("snapshot is a valid seed");
        assert_eq!(copy.get_user(2).await, store.get_user(2).await);
    }
}
