use std::marker::PhantomData;

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{
    errors::{StoreError, ValidationError, ValidationResult},
    models::{Bid, Collection, CollectionPatch, NewBid, NewCollection, NewNft, NewUser, Nft, NftPatch, User, UserPatch},
    schema::{bid_descriptor, collection_descriptor, nft_descriptor, user_descriptor},
    types::EntityDescriptor,
    validation::validate_payload,
};

/// A record type held in a [`Repo`].
pub trait MarketModel: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Collection name used in logs and seed diagnostics.
    const COLLECTION: &'static str;

    /// Insert schema applied to create payloads.
    fn descriptor() -> &'static EntityDescriptor;

    fn get_id(&self) -> u64;

    /// Adds the store-managed fields (id, timestamps, counters) to a validated payload.
    fn stamp(fields: &mut Map<String, Value>, id: u64, now: DateTime<Utc>) {
        fields.insert("id".to_string(), Value::from(id));
        let now = Value::String(now.to_rfc3339());
        fields.insert("createdAt".to_string(), now.clone());
        fields.insert("updatedAt".to_string(), now);
    }
}

/// A record type that supports shallow patch updates.
pub trait Patchable: MarketModel {
    type Patch: Send;

    fn apply_patch(&mut self, patch: Self::Patch);

    fn updated_at(&self) -> DateTime<Utc>;

    fn set_updated_at(&mut self, at: DateTime<Utc>);
}

/// Source of a create payload for entity `Entity`.
pub trait MutationPayloadBuilder {
    type Entity: MarketModel;

    fn into_payload(self) -> ValidationResult<Value>;
}

/// An untyped JSON object submitted as a create payload for `E`.
#[derive(Debug, Clone)]
pub struct RawPayload<E> {
    value: Value,
    _marker: PhantomData<E>,
}

impl<E> RawPayload<E> {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }
}

impl<E: MarketModel> MutationPayloadBuilder for RawPayload<E> {
    type Entity = E;

    fn into_payload(self) -> ValidationResult<Value> {
        Ok(self.value)
    }
}

fn typed_payload<T: Serialize>(input: &T) -> ValidationResult<Value> {
    serde_json::to_value(input).map_err(|err| {
        ValidationError::single("__entity", "validation.invalid_type", format!("payload is not serializable: {err}"))
    })
}

macro_rules! typed_builder {
    ($input:ty => $entity:ty) => {
        impl MutationPayloadBuilder for $input {
            type Entity = $entity;

            fn into_payload(self) -> ValidationResult<Value> {
                typed_payload(&self)
            }
        }
    };
}

typed_builder!(NewUser => User);
typed_builder!(NewCollection => Collection);
typed_builder!(NewNft => Nft);
typed_builder!(NewBid => Bid);

/// Next `updatedAt` for a record last touched at `previous`; always strictly later.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// One in-memory record collection. Ids are `1..=len` in insertion order.
pub struct Repo<T>
where
    T: MarketModel,
{
    records: RwLock<Vec<T>>,
}

impl<T> Default for Repo<T>
where
    T: MarketModel,
{
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

fn first_out_of_sequence<T: MarketModel>(records: &[T]) -> Option<(usize, &T)> {
    records
        .iter()
        .enumerate()
        .find(|(index, record)| record.get_id() != *index as u64 + 1)
}

impl<T> Repo<T>
where
    T: MarketModel,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repo from existing records, which must carry ids `1..=n` in order.
    pub fn from_records(records: Vec<T>) -> Result<Self, StoreError> {
        if let Some((index, record)) = first_out_of_sequence(&records) {
            return Err(StoreError::InvalidSeed {
                message: format!(
                    "{} record at position {} has id {}, expected {}",
                    T::COLLECTION,
                    index,
                    record.get_id(),
                    index + 1
                ),
            });
        }
        Ok(Self::from_sequential(records))
    }

    /// Builds a repo from records whose ids are known to be `1..=n`.
    pub(crate) fn from_sequential(records: Vec<T>) -> Self {
        debug_assert!(
            first_out_of_sequence(&records).is_none(),
            "{} records must carry ids 1..=n",
            T::COLLECTION
        );
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn get(&self, id: u64) -> Option<T> {
        self.find(|record| record.get_id() == id).await
    }

    /// First record matching `predicate`, in insertion order.
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.records.read().await.iter().find(|&record| predicate(record)).cloned()
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|&record| predicate(record))
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    /// Validates the payload, then assigns the next id and timestamps and appends.
    ///
    /// Nothing is inserted when validation fails.
    pub async fn create<B>(&self, builder: B) -> Result<T, StoreError>
    where
        B: MutationPayloadBuilder<Entity = T>,
    {
        let payload = builder.into_payload()?;
        let mut fields = match validate_payload(T::descriptor(), payload) {
            Ok(fields) => fields,
            Err(err) => {
                log::warn!("rejected {} payload: invalid fields {:?}", T::COLLECTION, err.fields());
                return Err(err.into());
            }
        };

        let mut records = self.records.write().await;
        let id = records.len() as u64 + 1;
        T::stamp(&mut fields, id, Utc::now());
        let record: T = serde_json::from_value(Value::Object(fields)).map_err(|err| StoreError::Other {
            message: format!("failed to build {} record: {err}", T::COLLECTION).into(),
        })?;
        records.push(record.clone());
        log::debug!("created {} {}", T::COLLECTION, id);
        Ok(record)
    }
}

impl<T> Repo<T>
where
    T: Patchable,
{
    /// Overlays `patch` on the record with `id` and refreshes `updatedAt`.
    ///
    /// Returns `None`, leaving every record untouched, when `id` is unknown.
    pub async fn update(&self, id: u64, patch: T::Patch) -> Option<T> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|record| record.get_id() == id) else {
            log::debug!("update of missing {} {}", T::COLLECTION, id);
            return None;
        };
        record.apply_patch(patch);
        let touched = next_timestamp(record.updated_at());
        record.set_updated_at(touched);
        log::debug!("updated {} {}", T::COLLECTION, id);
        Some(record.clone())
    }
}

impl MarketModel for User {
    const COLLECTION: &'static str = "users";

    fn descriptor() -> &'static EntityDescriptor {
        user_descriptor()
    }

    fn get_id(&self) -> u64 {
        self.id
    }
}

impl Patchable for User {
    type Patch = UserPatch;

    fn apply_patch(&mut self, patch: UserPatch) {
        User::apply_patch(self, patch);
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl MarketModel for Collection {
    const COLLECTION: &'static str = "collections";

    fn descriptor() -> &'static EntityDescriptor {
        collection_descriptor()
    }

    fn get_id(&self) -> u64 {
        self.id
    }

    fn stamp(fields: &mut Map<String, Value>, id: u64, now: DateTime<Utc>) {
        let now = Value::String(now.to_rfc3339());
        fields.insert("id".to_string(), Value::from(id));
        fields.insert("createdAt".to_string(), now.clone());
        fields.insert("updatedAt".to_string(), now);
        fields.insert("itemsCount".to_string(), Value::from(0u64));
    }
}

impl Patchable for Collection {
    type Patch = CollectionPatch;

    fn apply_patch(&mut self, patch: CollectionPatch) {
        Collection::apply_patch(self, patch);
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl MarketModel for Nft {
    const COLLECTION: &'static str = "nfts";

    fn descriptor() -> &'static EntityDescriptor {
        nft_descriptor()
    }

    fn get_id(&self) -> u64 {
        self.id
    }

    fn stamp(fields: &mut Map<String, Value>, id: u64, now: DateTime<Utc>) {
        let now = Value::String(now.to_rfc3339());
        fields.insert("id".to_string(), Value::from(id));
        fields.insert("createdAt".to_string(), now.clone());
        fields.insert("updatedAt".to_string(), now);
        fields.insert("likes".to_string(), Value::from(0u64));
        fields.insert("views".to_string(), Value::from(0u64));
        fields.insert("featured".to_string(), Value::Bool(false));
    }
}

impl Patchable for Nft {
    type Patch = NftPatch;

    fn apply_patch(&mut self, patch: NftPatch) {
        Nft::apply_patch(self, patch);
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl MarketModel for Bid {
    const COLLECTION: &'static str = "bids";

    fn descriptor() -> &'static EntityDescriptor {
        bid_descriptor()
    }

    fn get_id(&self) -> u64 {
        self.id
    }

    fn stamp(fields: &mut Map<String, Value>, id: u64, now: DateTime<Utc>) {
        fields.insert("id".to_string(), Value::from(id));
        fields.insert("createdAt".to_string(), Value::String(now.to_rfc3339()));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn ids_follow_insertion_order() {
        let repo: Repo<User> = Repo::new();
        let first = repo
            .create(NewUser {
                username: "alice".to_string(),
                ..Default::default()
            })
            .await
            .expect("first user");
        let second = repo
            .create(RawPayload::<User>::new(json!({"username": "bobby", "isVerified": true})))
            .await
            .expect("second user");
        assert_eq!((first.id, second.id), (1, 2));
        assert!(second.is_verified);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn rejected_payload_inserts_nothing() {
        let repo: Repo<Bid> = Repo::new();
        let err = repo
            .create(RawPayload::<Bid>::new(json!({"nftId": 0, "bidderId": 1})))
            .await
            .expect_err("invalid bid");
        let issues = err.validation_issues().expect("validation error");
        assert_eq!(issues.len(), 2);
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn managed_fields_cannot_be_supplied() {
        let repo: Repo<Nft> = Repo::new();
        let nft = repo
            .create(RawPayload::<Nft>::new(json!({
                "name": "Sneaky",
                "image": "https://images.example.com/sneaky.png",
                "creatorId": 1,
                "ownerId": 1,
                "id": 40,
                "likes": 999,
                "featured": true
            })))
            .await
            .expect("nft");
        assert_eq!(nft.id, 1);
        assert_eq!((nft.likes, nft.views, nft.featured), (0, 0, false));
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none() {
        let repo: Repo<User> = Repo::new();
        assert!(repo.update(5, UserPatch::default()).await.is_none());
    }

    #[test]
    fn non_sequential_records_are_rejected() {
        let now = Utc::now();
        let bid = Bid {
            id: 3,
            nft_id: 1,
            bidder_id: 1,
            amount: "1".to_string(),
            currency: "ETH".to_string(),
            expires_at: None,
            created_at: now,
        };
        let err = Repo::from_records(vec![bid]).err().expect("id 3 at position 0");
        assert!(matches!(err, StoreError::InvalidSeed { .. }));
    }

    #[test]
    fn next_timestamp_is_strictly_later() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_timestamp(future) > future);
    }
}
