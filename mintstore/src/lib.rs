//! mintstore core library.
//!
//! An in-memory data layer for an NFT marketplace: users, collections, NFTs
//! and bids, with declarative insert schemas and a typed read/write surface.
//!
//! ```no_run
//! # async fn demo() -> Result<(), mintstore::StoreError> {
//! use mintstore::{MarketStore, NewUser};
//!
//! let store = MarketStore::demo();
//! let user = store
//!     .create_user(NewUser {
//!         username: "collector".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! assert_eq!(user.id, 3);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod filters;
pub mod models;
pub mod repository;
pub mod schema;
pub mod seed;
pub mod store;
pub mod types;
pub mod validation;
pub mod validators;

pub use errors::*;
pub use filters::{NftFilter, Pagination};
pub use models::*;
pub use repository::{MarketModel, MutationPayloadBuilder, Patchable, RawPayload, Repo};
pub use seed::SeedData;
pub use store::{DEFAULT_FEATURED_LIMIT, DEFAULT_TRENDING_LIMIT, ListingDefaults, MarketStore};
