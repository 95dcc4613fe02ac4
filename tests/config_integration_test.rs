//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX to avoid
//! interference between tests.

use docmodel::adapters::store::StoreProvider;
use docmodel::config::{load_config, StoreTarget};
use docmodel::core::ModelRegistry;
use docmodel::domain::{ModelError, WriteAck};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("DOCMODEL_STORE_TARGET");
    std::env::remove_var("DOCMODEL_APPLICATION_LOG_LEVEL");
    std::env::remove_var("DOCMODEL_APPLICATION_DRY_RUN");
    std::env::remove_var("DOCMODEL_MONGODB_DATABASE_NAME");
    std::env::remove_var("DOCMODEL_WRITE_W");
    std::env::remove_var("TEST_DOCMODEL_URI");
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_temp(
        r#"
store_target = "mongodb"

[application]
log_level = "debug"
dry_run = true

[mongodb]
uri = "mongodb://localhost:27017"
database_name = "wadofgum_db"
app_name = "tests"
connect_timeout_seconds = 3

[write]
w = "majority"
wtimeout_ms = 2500

[[models]]
name = "User"
schema_path = "schemas/user.json"

[[models]]
name = "Account"
collection = "accounts_v2"
schema_path = "schemas/account.json"

[logging]
local_enabled = true
local_path = "/tmp/docmodel-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.store_target, StoreTarget::MongoDb);
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);

    let mongo = config.mongodb.as_ref().unwrap();
    assert_eq!(mongo.database_name, "wadofgum_db");
    assert_eq!(mongo.connect_timeout_seconds, 3);
    assert_eq!(mongo.uri.expose_secret(), "mongodb://localhost:27017");

    assert_eq!(config.write.w, Some(WriteAck::Named("majority".to_string())));
    assert_eq!(config.write.wtimeout_ms, Some(2500));

    assert_eq!(config.models.len(), 2);
    assert_eq!(config.model("User").unwrap().collection_name(), "user");
    assert_eq!(config.model("Account").unwrap().collection_name(), "accounts_v2");

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_substitution_and_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_DOCMODEL_URI", "mongodb://secret-host:27017");
    std::env::set_var("DOCMODEL_MONGODB_DATABASE_NAME", "override_db");
    std::env::set_var("DOCMODEL_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("DOCMODEL_WRITE_W", "2");

    let file = write_temp(
        r#"
[mongodb]
uri = "${TEST_DOCMODEL_URI}"
database_name = "wadofgum_db"
"#,
    );

    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    let mongo = config.mongodb.unwrap();
    assert_eq!(mongo.uri.expose_secret(), "mongodb://secret-host:27017");
    assert_eq!(mongo.database_name, "override_db");
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.write.w, Some(WriteAck::Nodes(2)));
}

#[test]
fn test_memory_target_needs_no_mongodb_section() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_temp("store_target = \"memory\"\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.store_target, StoreTarget::Memory);
    assert!(config.mongodb.is_none());
    assert!(config.models.is_empty());
}

#[test]
fn test_invalid_configs_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let missing_mongo = write_temp("store_target = \"mongodb\"\n");
    assert!(load_config(missing_mongo.path()).is_err());

    let bad_level = write_temp(
        "store_target = \"memory\"\n[application]\nlog_level = \"loud\"\n",
    );
    assert!(load_config(bad_level.path()).is_err());

    let duplicate_models = write_temp(
        r#"
store_target = "memory"

[[models]]
name = "User"
schema_path = "a.json"

[[models]]
name = "User"
schema_path = "b.json"
"#,
    );
    let err = load_config(duplicate_models.path()).unwrap_err();
    assert!(err.to_string().contains("Duplicate model name"));

    assert!(load_config("does-not-exist.toml").is_err());
}

#[tokio::test]
async fn test_registry_builds_models_from_schema_files() {
    let schema = write_temp(
        r#"{
            "type": "object",
            "metaSchema": {"rids": ["person.name", "person.age"]},
            "properties": {"person": {"type": "object"}}
        }"#,
    );
    let toml = format!(
        "store_target = \"memory\"\n\n[[models]]\nname = \"User\"\nschema_path = \"{}\"\n",
        schema.path().display()
    );

    let config = {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        cleanup_env_vars();
        let file = write_temp(&toml);
        load_config(file.path()).unwrap()
    };

    let registry = ModelRegistry::with_provider(&config, StoreProvider::memory()).unwrap();
    let user = registry.get("User").unwrap();
    assert_eq!(user.config().rids(), ["person.name", "person.age"]);

    let mut fred = user
        .instance(serde_json::json!({"person": {"name": "Fred", "age": 50}}))
        .unwrap();
    fred.save(None).await.unwrap();
    assert_eq!(user.count(None).await.unwrap(), 1);

    assert!(matches!(
        registry.get("Nobody"),
        Err(ModelError::Configuration(_))
    ));
}
