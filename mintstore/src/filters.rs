//! Listing filters and pagination.
//!
//! A zero limit, offset, collection id or price bound counts as "not supplied",
//! the same as leaving it out.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    models::{Collection, Nft},
    validators::parse_leading_float,
};

/// Offset-then-limit window over an insertion-ordered listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Pagination {
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self { limit, offset }
    }

    pub fn limit(limit: usize) -> Self {
        Self::new(Some(limit), None)
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0);
        let skipped = items.into_iter().skip(offset);
        match self.limit.filter(|limit| *limit > 0) {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

/// Picks the caller's limit, or `default` when none (or zero) was given.
pub fn limit_or(limit: Option<usize>, default: usize) -> usize {
    limit.filter(|limit| *limit > 0).unwrap_or(default)
}

/// Optional AND-combined predicates for NFT listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftFilter {
    /// Exact `collectionId` match.
    pub collection: Option<u64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

fn active_bound(bound: Option<f64>) -> Option<f64> {
    bound.filter(|value| *value != 0.0 && !value.is_nan())
}

/// Numeric price of a listing: a missing price reads as `"0"`, an unparseable one is `None`.
pub fn listed_price(nft: &Nft) -> Option<f64> {
    parse_leading_float(nft.price.as_deref().unwrap_or("0"))
}

impl NftFilter {
    pub fn is_empty(&self) -> bool {
        self.collection.filter(|id| *id > 0).is_none()
            && active_bound(self.min_price).is_none()
            && active_bound(self.max_price).is_none()
    }

    pub fn matches(&self, nft: &Nft) -> bool {
        if let Some(collection) = self.collection.filter(|id| *id > 0)
            && nft.collection_id != Some(collection)
        {
            return false;
        }
        if let Some(min) = active_bound(self.min_price)
            && !listed_price(nft).is_some_and(|price| price >= min)
        {
            return false;
        }
        if let Some(max) = active_bound(self.max_price)
            && !listed_price(nft).is_some_and(|price| price <= max)
        {
            return false;
        }
        true
    }
}

/// Floor price used for trending order; missing or unparseable prices rank as zero.
pub fn floor_price_rank(collection: &Collection) -> f64 {
    collection
        .floor_price
        .as_deref()
        .and_then(parse_leading_float)
        .filter(|price| !price.is_nan())
        .unwrap_or(0.0)
}

/// Stable sort by floor price, highest first.
pub fn sort_by_floor_price_desc(collections: &mut [Collection]) {
    collections.sort_by(|a, b| {
        floor_price_rank(b)
            .partial_cmp(&floor_price_rank(a))
            .unwrap_or(Ordering::Equal)
    });
}
