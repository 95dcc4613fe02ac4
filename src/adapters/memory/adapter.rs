//! In-memory document store
//!
//! A collection held in process memory. Used for tests, dry runs and local
//! development; it implements the same [`DocumentStore`] contract as the
//! MongoDB adapter.

use super::filter::{apply_update, matches, project, seed_from_filter, values_equal};
use crate::adapters::store::traits::DocumentStore;
use crate::domain::{
    DeleteOutcome, Document, InsertManyOutcome, InsertOneOutcome, Result, StoreError,
    UpdateOutcome, WriteOptions, ID_FIELD,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory implementation of [`DocumentStore`]
///
/// Documents are kept in insertion order. Clones share the same collection.
#[derive(Clone)]
pub struct MemoryStore {
    collection: String,
    documents: Arc<RwLock<Vec<Document>>>,
    write_calls: Arc<AtomicU64>,
}

impl MemoryStore {
    /// Create an empty collection
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: Arc::new(RwLock::new(Vec::new())),
            write_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a collection pre-populated with documents
    pub fn with_documents(collection: impl Into<String>, documents: Vec<Document>) -> Self {
        let store = Self::new(collection);
        if let Ok(mut guard) = store.documents.write() {
            *guard = documents;
        }
        store
    }

    /// Copy of every stored document, in insertion order
    pub fn snapshot(&self) -> Result<Vec<Document>> {
        let guard = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(guard.clone())
    }

    /// Number of write operations the store has received
    pub fn write_calls(&self) -> u64 {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn record_write(&self, operation: &'static str) {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(collection = %self.collection, operation, "Memory store write");
    }
}

fn generate_id() -> Value {
    Value::String(ObjectId::new().to_hex())
}

fn ensure_id(doc: &mut Document) -> Value {
    match doc.get(ID_FIELD) {
        Some(id) if !id.is_null() => id.clone(),
        _ => {
            let id = generate_id();
            doc.insert(ID_FIELD.to_string(), id.clone());
            id
        }
    }
}

fn contains_id(documents: &[Document], id: &Value) -> bool {
    documents
        .iter()
        .any(|d| d.get(ID_FIELD).is_some_and(|existing| values_equal(existing, id)))
}

fn duplicate_key(collection: &str, id: &Value) -> StoreError {
    StoreError::DuplicateKey(format!(
        "E11000 duplicate key error collection: {collection} index: _id_ dup key: {{ _id: {id} }}"
    ))
}

fn first_match(documents: &[Document], filter: &Document) -> Result<Option<usize>> {
    for (index, doc) in documents.iter().enumerate() {
        if matches(doc, filter)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }

    async fn insert_one(
        &self,
        mut document: Document,
        _options: &WriteOptions,
    ) -> Result<InsertOneOutcome> {
        self.record_write("insert_one");
        let mut guard = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert_one"))?;

        let id = ensure_id(&mut document);
        if contains_id(&guard, &id) {
            return Err(duplicate_key(&self.collection, &id).into());
        }
        guard.push(document.clone());

        Ok(InsertOneOutcome {
            inserted_id: id,
            n: 1,
            ops: vec![document],
        })
    }

    async fn insert_many(
        &self,
        mut documents: Vec<Document>,
        _options: &WriteOptions,
    ) -> Result<InsertManyOutcome> {
        self.record_write("insert_many");
        let mut guard = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert_many"))?;

        let mut inserted_ids = Vec::with_capacity(documents.len());
        for (index, document) in documents.iter_mut().enumerate() {
            let id = ensure_id(document);
            if contains_id(&guard, &id) || inserted_ids.iter().any(|seen| values_equal(seen, &id))
            {
                tracing::debug!(
                    collection = %self.collection,
                    index,
                    "Batch rejected on duplicate _id"
                );
                return Err(duplicate_key(&self.collection, &id).into());
            }
            inserted_ids.push(id);
        }
        guard.extend(documents.iter().cloned());

        Ok(InsertManyOutcome {
            inserted_count: documents.len() as u64,
            inserted_ids,
            ops: documents,
        })
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: &WriteOptions,
    ) -> Result<UpdateOutcome> {
        self.record_write("update_one");
        let mut guard = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("update_one"))?;

        if let Some(index) = first_match(&guard, &filter)? {
            let mut updated = guard[index].clone();
            let changed = apply_update(&mut updated, &update)?;
            guard[index] = updated;
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(changed),
                upserted_id: None,
                ops: vec![update],
            });
        }

        if options.upsert.unwrap_or(false) {
            let mut created = seed_from_filter(&filter);
            apply_update(&mut created, &update)?;
            let id = ensure_id(&mut created);
            if contains_id(&guard, &id) {
                return Err(duplicate_key(&self.collection, &id).into());
            }
            guard.push(created);
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(id),
                ops: vec![update],
            });
        }

        Ok(UpdateOutcome {
            matched_count: 0,
            modified_count: 0,
            upserted_id: None,
            ops: vec![update],
        })
    }

    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
        options: &WriteOptions,
    ) -> Result<UpdateOutcome> {
        self.record_write("replace_one");
        if replacement.keys().any(|k| k.starts_with('$')) {
            return Err(StoreError::UpdateFailed(
                "replacement document must not contain update operators".to_string(),
            )
            .into());
        }
        let mut guard = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("replace_one"))?;

        if let Some(index) = first_match(&guard, &filter)? {
            let existing_id = guard[index].get(ID_FIELD).cloned().unwrap_or(Value::Null);
            let mut next = replacement.clone();
            match next.get(ID_FIELD) {
                Some(id) if !values_equal(id, &existing_id) => {
                    return Err(StoreError::UpdateFailed(
                        "the _id field cannot be changed".to_string(),
                    )
                    .into())
                }
                Some(_) => {}
                None => {
                    next.insert(ID_FIELD.to_string(), existing_id);
                }
            }
            let changed = !values_equal(
                &Value::Object(next.clone()),
                &Value::Object(guard[index].clone()),
            );
            guard[index] = next;
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(changed),
                upserted_id: None,
                ops: vec![replacement],
            });
        }

        if options.upsert.unwrap_or(false) {
            let mut created = replacement.clone();
            if !created.contains_key(ID_FIELD) {
                if let Some(id) = seed_from_filter(&filter).remove(ID_FIELD) {
                    created.insert(ID_FIELD.to_string(), id);
                }
            }
            let id = ensure_id(&mut created);
            if contains_id(&guard, &id) {
                return Err(duplicate_key(&self.collection, &id).into());
            }
            guard.push(created);
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(id),
                ops: vec![replacement],
            });
        }

        Ok(UpdateOutcome {
            matched_count: 0,
            modified_count: 0,
            upserted_id: None,
            ops: vec![replacement],
        })
    }

    async fn delete_one(&self, filter: Document, _options: &WriteOptions) -> Result<DeleteOutcome> {
        self.record_write("delete_one");
        let mut guard = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete_one"))?;

        let deleted_count = match first_match(&guard, &filter)? {
            Some(index) => {
                guard.remove(index);
                1
            }
            None => 0,
        };
        Ok(DeleteOutcome { deleted_count })
    }

    async fn delete_many(
        &self,
        filter: Document,
        _options: &WriteOptions,
    ) -> Result<DeleteOutcome> {
        self.record_write("delete_many");
        let mut guard = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete_many"))?;

        // Evaluate every filter before mutating so a bad filter deletes nothing
        let mut keep = Vec::with_capacity(guard.len());
        for doc in guard.iter() {
            keep.push(!matches(doc, &filter)?);
        }
        let before = guard.len();
        let mut flags = keep.into_iter();
        guard.retain(|_| flags.next().unwrap_or(true));

        Ok(DeleteOutcome {
            deleted_count: (before - guard.len()) as u64,
        })
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>> {
        let guard = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned("find"))?;
        let mut found = Vec::new();
        for doc in guard.iter() {
            if matches(doc, &filter)? {
                found.push(doc.clone());
            }
        }
        Ok(found)
    }

    async fn find_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>> {
        let guard = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_one"))?;
        let Some(index) = first_match(&guard, &filter)? else {
            return Ok(None);
        };
        let doc = &guard[index];
        let result = match projection {
            Some(projection) if !projection.is_empty() => project(doc, &projection)?,
            _ => doc.clone(),
        };
        Ok(Some(result))
    }

    async fn count(&self, filter: Document) -> Result<u64> {
        Ok(self.find(filter).await?.len() as u64)
    }

    async fn distinct(&self, field: &str, filter: Document) -> Result<Vec<Value>> {
        let mut values: Vec<Value> = Vec::new();
        for doc in self.find(filter).await? {
            let Some(value) = crate::domain::path::resolve_in(&doc, field) else {
                continue;
            };
            let candidates = match value {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            for candidate in candidates {
                if !values.iter().any(|v| values_equal(v, &candidate)) {
                    values.push(candidate);
                }
            }
        }
        Ok(values)
    }
}
