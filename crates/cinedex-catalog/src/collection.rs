use std::marker::PhantomData;
use std::sync::Arc;

use cinedex_store::RecordStore;
use cinedex_types::{fields, merge_patch, strip_reserved, Payload, Record, RecordId, Timestamp};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{CatalogError, CatalogResult};

/// CRUD over one named collection.
///
/// Every operation loads the whole collection, works on it with a linear
/// scan and, for mutations, saves the whole collection back. Mutations made
/// through the same `Collection` are serialized by an internal write gate
/// held across load, mutate and save, so they cannot lose each other's
/// changes. Writers outside this instance (another process, another
/// `Collection` over the same store) still race: last save wins.
pub struct Collection<R, S> {
    store: Arc<S>,
    write_gate: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, S: RecordStore> Collection<R, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// Name of the backing collection.
    pub fn name(&self) -> &'static str {
        R::COLLECTION
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create a record from a client payload.
    ///
    /// Reserved fields in the payload are discarded; the id and both
    /// timestamps are generated. Duplicate content is fine, only ids are
    /// unique.
    pub async fn create(&self, payload: Payload) -> CatalogResult<R> {
        self.create_with(payload, Payload::new()).await
    }

    /// Like [`Collection::create`], with extra server-assigned fields that
    /// override anything the client sent (e.g. a parent reference).
    pub async fn create_with(&self, mut payload: Payload, assigned: Payload) -> CatalogResult<R> {
        strip_reserved(&mut payload, R::RESERVED_FIELDS);
        payload.extend(assigned);

        let _gate = self.write_gate.lock().await;
        let mut records: Vec<R> = self.store.load(R::COLLECTION).await?;

        let mut id = RecordId::generate();
        while records.iter().any(|r| r.id() == &id) {
            id = RecordId::generate();
        }
        let now = Timestamp::now();
        payload.insert(R::ID_FIELD.to_owned(), Value::String(id.to_string()));
        payload.insert(fields::CREATED_AT.to_owned(), Value::String(now.to_rfc3339()));
        payload.insert(fields::UPDATED_AT.to_owned(), Value::String(now.to_rfc3339()));

        let record = R::from_payload(payload)?;
        records.push(record.clone());
        self.store.save(R::COLLECTION, &records).await?;

        info!(collection = R::COLLECTION, id = %record.id(), "created record");
        Ok(record)
    }

    /// The whole collection in storage (insertion) order.
    pub async fn list_all(&self) -> CatalogResult<Vec<R>> {
        Ok(self.store.load(R::COLLECTION).await?)
    }

    pub async fn get(&self, id: &str) -> CatalogResult<R> {
        let records: Vec<R> = self.store.load(R::COLLECTION).await?;
        records
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| CatalogError::not_found(R::COLLECTION, id))
    }

    /// Shallow-merge `patch` over the record and refresh `updatedAt`.
    ///
    /// Top-level patch fields replace existing ones; fields absent from the
    /// patch are kept. Reserved fields in the patch are ignored.
    pub async fn update(&self, id: &str, patch: Payload) -> CatalogResult<R> {
        let _gate = self.write_gate.lock().await;
        let mut records: Vec<R> = self.store.load(R::COLLECTION).await?;
        let index = Self::position(&records, id)?;

        let current = &records[index];
        let previous = current.updated_at().clone();
        let mut merged = current.to_payload()?;
        merge_patch(&mut merged, patch, R::RESERVED_FIELDS);

        let mut updated = R::from_payload(merged)?;
        updated.touch(Timestamp::after(&previous));
        records[index] = updated.clone();
        self.store.save(R::COLLECTION, &records).await?;

        info!(collection = R::COLLECTION, id, "updated record");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        let _gate = self.write_gate.lock().await;
        let records: Vec<R> = self.store.load(R::COLLECTION).await?;
        let before = records.len();
        let remaining: Vec<R> = records.into_iter().filter(|r| r.id() != id).collect();
        if remaining.len() == before {
            return Err(CatalogError::not_found(R::COLLECTION, id));
        }
        self.store.save(R::COLLECTION, &remaining).await?;

        info!(collection = R::COLLECTION, id, "deleted record");
        Ok(())
    }

    /// Apply `change` to the matching record, refresh `updatedAt` and save.
    ///
    /// Returns `Ok(None)` without writing anything when no record matches.
    pub async fn modify<F>(&self, id: &str, change: F) -> CatalogResult<Option<R>>
    where
        F: FnOnce(&mut R) + Send,
    {
        let _gate = self.write_gate.lock().await;
        let mut records: Vec<R> = self.store.load(R::COLLECTION).await?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };

        let previous = record.updated_at().clone();
        change(record);
        record.touch(Timestamp::after(&previous));
        let changed = record.clone();
        self.store.save(R::COLLECTION, &records).await?;
        Ok(Some(changed))
    }

    fn position(records: &[R], id: &str) -> CatalogResult<usize> {
        records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| CatalogError::not_found(R::COLLECTION, id))
    }
}

impl<R, S> std::fmt::Debug for Collection<R, S>
where
    R: Record,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &R::COLLECTION)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinedex_store::{InMemoryRecordStore, JsonFileStore};
    use cinedex_types::{MediaRecord, ReviewRecord};
    use proptest::prelude::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn media_collection() -> Collection<MediaRecord, InMemoryRecordStore> {
        let store = InMemoryRecordStore::with_collections(&["media", "reviews"]);
        Collection::new(Arc::new(store))
    }

    fn dune() -> Payload {
        payload(json!({"type": "movie", "title": "Dune", "year": 2021}))
    }

    // -----------------------------------------------------------------------
    // Create / read
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_then_get_returns_payload_fields() {
        let media = media_collection();
        let created = media.create(dune()).await.unwrap();

        let fetched = media.get(created.id.as_str()).await.unwrap();
        assert_eq!(fetched.kind, "movie");
        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.year, 2021);
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_keeps_extra_fields() {
        let media = media_collection();
        let mut p = dune();
        p.insert("director".into(), json!("Villeneuve"));
        let created = media.create(p).await.unwrap();
        assert_eq!(created.extra["director"], "Villeneuve");
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_reserved_fields() {
        let media = media_collection();
        let mut p = dune();
        p.insert("imdbID".into(), json!("chosen-by-client"));
        p.insert("createdAt".into(), json!("1999-01-01T00:00:00.000Z"));
        p.insert("poster".into(), json!("http://example.com/p.jpg"));
        let created = media.create(p).await.unwrap();
        assert_ne!(created.id, "chosen-by-client");
        assert!(created.poster.is_none());
        assert!(created.created_at > Timestamp::parse("2000-01-01T00:00:00Z").unwrap());
    }

    #[tokio::test]
    async fn create_with_missing_field_fails_without_writing() {
        let store = Arc::new(InMemoryRecordStore::with_collections(&["media"]));
        let media: Collection<MediaRecord, _> = Collection::new(store.clone());
        let err = media
            .create(payload(json!({"type": "movie", "year": 2021})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_payloads_get_distinct_ids() {
        let media = media_collection();
        let a = media.create(dune()).await.unwrap();
        let b = media.create(dune()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(media.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_all_is_insertion_order() {
        let media = media_collection();
        let mut ids = Vec::new();
        for title in ["Alien", "Brazil", "Cube"] {
            let mut p = dune();
            p.insert("title".into(), json!(title));
            ids.push(media.create(p).await.unwrap().id);
        }
        let listed: Vec<RecordId> = media.list_all().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let media = media_collection();
        let err = media.get("nope").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { collection: "media", .. }));
    }

    #[tokio::test]
    async fn missing_collection_is_storage_unavailable() {
        let media: Collection<MediaRecord, _> = Collection::new(Arc::new(InMemoryRecordStore::new()));
        let err = media.list_all().await.unwrap_err();
        assert_eq!(err.kind(), "storage_unavailable");
    }

    #[tokio::test]
    async fn corrupt_collection_is_reported() {
        let store = InMemoryRecordStore::new();
        store.put_raw("media", "[{]");
        let media: Collection<MediaRecord, _> = Collection::new(Arc::new(store));
        let err = media.get("x").await.unwrap_err();
        assert_eq!(err.kind(), "corrupt_data");
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn update_merges_and_refreshes_updated_at() {
        let media = media_collection();
        let mut p = dune();
        p.insert("director".into(), json!("Villeneuve"));
        let created = media.create(p).await.unwrap();

        let updated = media
            .update(created.id.as_str(), payload(json!({"title": "Dune: Part One"})))
            .await
            .unwrap();
        let fetched = media.get(created.id.as_str()).await.unwrap();

        assert_eq!(fetched, updated);
        assert_eq!(fetched.title, "Dune: Part One");
        assert_eq!(fetched.year, 2021);
        assert_eq!(fetched.extra["director"], "Villeneuve");
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_replaces_nested_objects() {
        let media = media_collection();
        let mut p = dune();
        p.insert("ratings".into(), json!({"imdb": 8.0, "rt": 83}));
        let created = media.create(p).await.unwrap();

        let updated = media
            .update(created.id.as_str(), payload(json!({"ratings": {"imdb": 8.1}})))
            .await
            .unwrap();
        assert_eq!(updated.extra["ratings"], json!({"imdb": 8.1}));
    }

    #[tokio::test]
    async fn update_cannot_change_id_or_created_at() {
        let media = media_collection();
        let created = media.create(dune()).await.unwrap();
        let updated = media
            .update(
                created.id.as_str(),
                payload(json!({"imdbID": "other", "createdAt": "1999-01-01T00:00:00.000Z"})),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = Arc::new(InMemoryRecordStore::with_collections(&["media"]));
        let media: Collection<MediaRecord, _> = Collection::new(store.clone());
        let err = media.update("ghost", dune()).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn update_with_wrong_type_is_validation_failure() {
        let media = media_collection();
        let created = media.create(dune()).await.unwrap();
        let err = media
            .update(created.id.as_str(), payload(json!({"title": 42})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
        assert_eq!(media.get(created.id.as_str()).await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn successive_updates_keep_increasing_updated_at() {
        let media = media_collection();
        let created = media.create(dune()).await.unwrap();
        let mut last = created.updated_at.clone();
        for year in 2022..2027 {
            let updated = media
                .update(created.id.as_str(), payload(json!({"year": year})))
                .await
                .unwrap();
            assert!(updated.updated_at > last);
            last = updated.updated_at;
        }
    }

    // -----------------------------------------------------------------------
    // Delete / modify
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let media = media_collection();
        let created = media.create(dune()).await.unwrap();
        media.delete(created.id.as_str()).await.unwrap();

        assert_eq!(media.get(created.id.as_str()).await.unwrap_err().kind(), "not_found");
        assert_eq!(media.delete(created.id.as_str()).await.unwrap_err().kind(), "not_found");
    }

    #[tokio::test]
    async fn modify_unmatched_does_not_write() {
        let store = Arc::new(InMemoryRecordStore::with_collections(&["media"]));
        let media: Collection<MediaRecord, _> = Collection::new(store.clone());
        media.create(dune()).await.unwrap();
        let before = store.raw("media").unwrap();

        let result = media.modify("ghost", |m| m.title = "x".into()).await.unwrap();
        assert!(result.is_none());
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.raw("media").unwrap(), before);
    }

    #[tokio::test]
    async fn saving_the_collection_leaves_untouched_records_as_written() {
        let dark = json!({
            "imdbID": "m2",
            "type": "series",
            "title": "Dark",
            "year": "2017",
            "createdAt": "2021-10-22T08:16:00Z",
            "updatedAt": "2021-10-22T08:16:00+00:00",
        });
        let store = Arc::new(InMemoryRecordStore::new());
        store.put_raw("media", serde_json::to_vec(&json!([dark.clone()])).unwrap());
        let media: Collection<MediaRecord, _> = Collection::new(store.clone());

        let created = media.create(dune()).await.unwrap();
        media
            .update(created.id.as_str(), payload(json!({"title": "Dune: Part One"})))
            .await
            .unwrap();

        let saved: Vec<Value> = serde_json::from_slice(&store.raw("media").unwrap()).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0], dark);
    }

    // -----------------------------------------------------------------------
    // Write gate
    // -----------------------------------------------------------------------

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.ensure_collection("reviews").await.unwrap();
        let reviews: Arc<Collection<ReviewRecord, _>> = Arc::new(Collection::new(Arc::new(store)));

        let mut handles = Vec::new();
        for n in 0..16 {
            let reviews = reviews.clone();
            handles.push(tokio::spawn(async move {
                let mut assigned = Payload::new();
                assigned.insert("imdbID".into(), json!("m1"));
                reviews
                    .create_with(payload(json!({"rate": n})), assigned)
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(reviews.list_all().await.unwrap().len(), 16);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn creates_never_reuse_ids(titles in proptest::collection::vec("[a-zA-Z ]{1,12}", 1..12)) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let media = media_collection();
                let mut seen = std::collections::HashSet::new();
                for title in titles {
                    let mut p = dune();
                    p.insert("title".into(), json!(title));
                    let created = media.create(p).await.unwrap();
                    assert!(seen.insert(created.id));
                }
            });
        }

        #[test]
        fn list_count_is_creates_minus_deletes(creates in 1usize..12, delete_mask in any::<u16>()) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let listed = rt.block_on(async {
                let media = media_collection();
                let mut ids = Vec::new();
                for _ in 0..creates {
                    ids.push(media.create(dune()).await.unwrap().id);
                }
                let mut deleted = 0;
                for (i, id) in ids.iter().enumerate() {
                    if delete_mask & (1 << i) != 0 {
                        media.delete(id.as_str()).await.unwrap();
                        deleted += 1;
                    }
                }
                (media.list_all().await.unwrap().len(), creates - deleted)
            });
            prop_assert_eq!(listed.0, listed.1);
        }
    }
}
