//! Integration tests for model persistence through the validation gate
//!
//! All tests run against the in-memory store.

use docmodel::adapters::memory::MemoryStore;
use docmodel::adapters::validation::JsonSchemaValidator;
use docmodel::core::Model;
use docmodel::domain::{Document, ModelError, Record, WriteOptions};
use serde_json::{json, Value};
use std::sync::Arc;
use test_case::test_case;

fn person_schema(rids: &[&str]) -> Value {
    json!({
        "type": "object",
        "metaSchema": {"rids": rids},
        "properties": {
            "person": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "integer"},
                    "dateOfBirth": {"type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$"}
                },
                "required": ["name"]
            }
        }
    })
}

fn user_model(rids: &[&str], store: &MemoryStore) -> Model {
    Model::builder("User")
        .schema(person_schema(rids))
        .validator(Arc::new(JsonSchemaValidator::new()))
        .store(Arc::new(store.clone()))
        .build()
        .unwrap()
}

fn record(value: Value) -> Record {
    Record::from_value(value).unwrap()
}

fn filter(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("filter must be an object, got {other}"),
    }
}

#[tokio::test]
async fn test_save_derives_identifier_from_rids() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name", "person.age"], &store);

    let mut fred = users
        .instance(json!({"person": {"name": "Fred", "age": 50}}))
        .unwrap();
    let outcome = fred.save(None).await.unwrap();

    assert_eq!(outcome.inserted_id, json!("Fred::50"));
    assert_eq!(outcome.n, 1);
    assert_eq!(fred.id(), Some(&json!("Fred::50")));

    let stored = store.snapshot().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].get("_id"), Some(&json!("Fred::50")));
}

#[tokio::test]
async fn test_insert_many_returns_derived_ids_in_order() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name", "person.dateOfBirth"], &store);

    let outcome = users
        .insert_many(
            vec![
                record(json!({"person": {"name": "sam", "dateOfBirth": "1994-12-25"}})),
                record(json!({"person": {"name": "jess", "dateOfBirth": "1990-01-02"}})),
            ],
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.inserted_count, 2);
    assert_eq!(
        outcome.inserted_ids,
        vec![json!("sam::1994-12-25"), json!("jess::1990-01-02")]
    );
    assert_eq!(store.write_calls(), 1);
}

#[tokio::test]
async fn test_unresolved_rids_reject_before_store() {
    let store = MemoryStore::new("user");
    let users = user_model(&["name", "age"], &store);

    let mut fred = users
        .instance(json!({"person": {"name": "Fred", "age": 50}}))
        .unwrap();
    let err = fred.save(None).await.unwrap_err();

    match &err {
        ModelError::IdentifierUnresolved { paths, .. } => {
            assert_eq!(paths, &vec!["name".to_string(), "age".to_string()]);
        }
        other => panic!("expected IdentifierUnresolved, got {other:?}"),
    }
    let detail_paths: Vec<String> = err.details().into_iter().map(|d| d.path).collect();
    assert_eq!(detail_paths, vec!["name", "age"]);
    assert_eq!(store.write_calls(), 0);
    assert!(fred.id().is_none());
}

#[test_case(
    json!({"person": {"name": "Fred", "age": null}}), "INVALID_TYPE", "person.age" ;
    "null age"
)]
#[test_case(
    json!({"person": {"name": "Fred", "age": "fifty"}}), "INVALID_TYPE", "person.age" ;
    "string age"
)]
#[test_case(
    json!({"person": {"age": 50}}), "OBJECT_MISSING_REQUIRED_PROPERTY", "person.name" ;
    "missing name"
)]
#[tokio::test]
async fn test_schema_violations_reject_before_store(attributes: Value, code: &str, path: &str) {
    let store = MemoryStore::new("user");
    let users = user_model(&[], &store);

    let mut user = users.instance(attributes).unwrap();
    let err = user.save(None).await.unwrap_err();

    assert!(matches!(err, ModelError::ValidationFailed { .. }));
    let details = err.details();
    assert!(
        details.iter().any(|d| d.code == code && d.path == path),
        "expected {code} at {path}, got {details:?}"
    );
    assert_eq!(store.write_calls(), 0);
}

#[tokio::test]
async fn test_insert_many_is_all_or_nothing() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name"], &store);

    let err = users
        .insert_many(
            vec![
                record(json!({"person": {"name": "Ann", "age": 30}})),
                record(json!({"person": {"name": "Bob", "age": "old"}})),
                record(json!({"person": {"name": "Cat", "age": 40}})),
            ],
            None,
        )
        .await
        .unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(store.write_calls(), 0);
    assert!(store.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn test_first_failing_record_decides_batch_error() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name"], &store);
    let unnamed = || record(json!({"person": {"age": 30}}));
    let mistyped = || record(json!({"person": {"name": "Bob", "age": "old"}}));

    let err = users
        .insert_many(vec![unnamed(), mistyped()], None)
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::IdentifierUnresolved { .. }));
    assert_eq!(store.write_calls(), 0);

    let err = users
        .insert_many(vec![mistyped(), unnamed()], None)
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::ValidationFailed { .. }));
    assert_eq!(store.write_calls(), 0);
}

#[tokio::test]
async fn test_caller_id_kept_without_rids() {
    let store = MemoryStore::new("user");
    let users = user_model(&[], &store);

    let mut user = users
        .instance(json!({"_id": "custom-1", "person": {"name": "Ann"}}))
        .unwrap();
    let outcome = user.save(None).await.unwrap();
    assert_eq!(outcome.inserted_id, json!("custom-1"));
}

#[tokio::test]
async fn test_derived_id_overwrites_caller_id() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name"], &store);

    let mut user = users
        .instance(json!({"_id": "custom-1", "person": {"name": "Ann"}}))
        .unwrap();
    user.save(None).await.unwrap();
    assert_eq!(user.id(), Some(&json!("Ann")));
}

#[test]
fn test_prepare_is_idempotent() {
    let users = user_model(&["person.name", "person.age"], &MemoryStore::new("user"));

    let mut fred = record(json!({"person": {"name": "Fred", "age": 50}}));
    users.prepare(&mut fred).unwrap();
    let first = fred.clone();
    users.prepare(&mut fred).unwrap();
    assert_eq!(fred, first);
}

#[tokio::test]
async fn test_duplicate_derived_id_is_store_error() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name"], &store);

    users
        .instance(json!({"person": {"name": "Fred"}}))
        .unwrap()
        .save(None)
        .await
        .unwrap();
    let err = users
        .instance(json!({"person": {"name": "Fred", "age": 51}}))
        .unwrap()
        .save(None)
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::Store(_)));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn test_find_one_with_projection() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name", "person.age"], &store);

    let mut fred = users
        .instance(json!({"person": {"name": "Fred", "age": 50}}))
        .unwrap();
    fred.save(None).await.unwrap();

    let full = fred.find_one(None).await.unwrap().unwrap();
    assert_eq!(full.get("person.name"), Some(&json!("Fred")));

    let projected = fred
        .find_one(Some(filter(json!({"person.name": 0}))))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(projected.id(), Some(&json!("Fred::50")));
    assert_eq!(projected.get("person.name"), None);
    assert_eq!(projected.get("person.age"), Some(&json!(50)));
}

#[tokio::test]
async fn test_update_one_with_upsert_creates_document() {
    let store = MemoryStore::new("user");
    let users = user_model(&[], &store);

    let ghost = users
        .instance(json!({"_id": "ghost", "person": {"name": "Casper"}}))
        .unwrap();

    let miss = ghost.update_one(None).await.unwrap();
    assert_eq!(miss.matched_count, 0);
    assert!(miss.is_noop());
    assert!(store.snapshot().unwrap().is_empty());

    let upserted = ghost
        .update_one(Some(WriteOptions::new().with_upsert(true)))
        .await
        .unwrap();
    assert_eq!(upserted.upserted_id, Some(json!("ghost")));

    let found = ghost.find_one(None).await.unwrap().unwrap();
    assert_eq!(found.get("person.name"), Some(&json!("Casper")));
}

#[tokio::test]
async fn test_replace_one_on_missing_document_matches_nothing() {
    let store = MemoryStore::new("user");
    let users = user_model(&[], &store);

    let missing = users
        .instance(json!({"_id": "nobody", "person": {"name": "Nobody"}}))
        .unwrap();
    let outcome = missing
        .replace_one(Some(WriteOptions::new().with_bypass_document_validation(true)))
        .await
        .unwrap();

    assert_eq!(outcome.matched_count, 0);
    assert_eq!(outcome.modified_count, 0);
    assert!(store.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn test_replace_one_swaps_whole_document() {
    let store = MemoryStore::new("user");
    let users = user_model(&[], &store);

    let mut original = users
        .instance(json!({"_id": "u1", "person": {"name": "Ann", "age": 30}}))
        .unwrap();
    original.save(None).await.unwrap();

    let replacement = users
        .instance(json!({"_id": "u1", "nickname": "annie"}))
        .unwrap();
    let outcome = replacement.replace_one(None).await.unwrap();
    assert_eq!(outcome.matched_count, 1);

    let stored = replacement.find_one(None).await.unwrap().unwrap();
    assert_eq!(stored.get("nickname"), Some(&json!("annie")));
    assert_eq!(stored.get("person"), None);
}

#[tokio::test]
async fn test_collection_queries() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name"], &store);

    users
        .insert_many(
            vec![
                record(json!({"person": {"name": "Ann", "age": 30}})),
                record(json!({"person": {"name": "Bob", "age": 30}})),
                record(json!({"person": {"name": "Cat", "age": 41}})),
            ],
            None,
        )
        .await
        .unwrap();

    assert_eq!(users.count(None).await.unwrap(), 3);
    assert_eq!(
        users
            .count(Some(filter(json!({"person.age": 30}))))
            .await
            .unwrap(),
        2
    );

    let mut ages = users.distinct("person.age", None).await.unwrap();
    ages.sort_by_key(|v| v.as_i64());
    assert_eq!(ages, vec![json!(30), json!(41)]);

    let older = users
        .find(Some(filter(json!({"person.age": {"$gt": 35}}))))
        .await
        .unwrap();
    assert_eq!(older.len(), 1);
    assert_eq!(older[0].id(), Some(&json!("Cat")));
}

#[tokio::test]
async fn test_delete_one_and_delete_many() {
    let store = MemoryStore::new("user");
    let users = user_model(&["person.name"], &store);

    let mut ann = users.instance(json!({"person": {"name": "Ann", "age": 30}})).unwrap();
    ann.save(None).await.unwrap();
    users
        .insert_many(
            vec![
                record(json!({"person": {"name": "Bob", "age": 30}})),
                record(json!({"person": {"name": "Cat", "age": 30}})),
            ],
            None,
        )
        .await
        .unwrap();

    assert_eq!(ann.delete_one(None).await.unwrap().deleted_count, 1);
    assert_eq!(ann.delete_one(None).await.unwrap().deleted_count, 0);

    let removed = users
        .delete_many(filter(json!({"person.age": 30})), None)
        .await
        .unwrap();
    assert_eq!(removed.deleted_count, 2);
    assert_eq!(users.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_non_write_operations_work_without_validator() {
    let store = MemoryStore::with_documents(
        "user",
        vec![filter(json!({"_id": "Fred", "person": {"name": "Fred"}}))],
    );
    let users = Model::builder("User")
        .schema(person_schema(&["person.name"]))
        .store(Arc::new(store.clone()))
        .build()
        .unwrap();

    assert_eq!(users.count(None).await.unwrap(), 1);
    let fred = users.instance(json!({"_id": "Fred"})).unwrap();
    assert!(fred.find_one(None).await.unwrap().is_some());

    // Writes that need the gate cannot run without a validator
    let mut ann = users.instance(json!({"person": {"name": "Ann"}})).unwrap();
    assert!(matches!(
        ann.save(None).await,
        Err(ModelError::Configuration(_))
    ));
    assert_eq!(store.write_calls(), 0);
}

#[test]
fn test_validator_before_schema_is_rejected() {
    let err = Model::builder("User")
        .validator(Arc::new(JsonSchemaValidator::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::Configuration(_)));
}
