//! End-to-end tests for persisted state across engine instances.

use std::sync::Arc;

use integration_tests::fixtures::{day, metered_rule};
use metering_core::Entitlements;
use paywall_engine::PaywallEngine;
use rule_store::{FileStore, StoreConfig, UserRuleStore};

fn file_config(dir: &tempfile::TempDir) -> StoreConfig {
    StoreConfig {
        directory: dir.path().to_string_lossy().into_owned(),
        cache_key: "user-rules".to_string(),
    }
}

fn engine_over(store: Arc<dyn UserRuleStore>) -> PaywallEngine {
    let mut engine = PaywallEngine::new(store);
    engine
        .set_active_rules(vec![metered_rule(1, 2)])
        .expect("fixture rules should validate");
    engine.set_entitlements(Some(Entitlements::default()));
    engine
}

/// Counters survive an engine restart over the same file store.
#[test]
fn test_state_survives_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let as_of = day(2025, 1, 1);

    {
        let store = Arc::new(FileStore::new(&file_config(&dir)).unwrap());
        let engine = engine_over(store);
        engine.evaluate_at("A", None, true, as_of).unwrap();
        engine.evaluate_at("B", None, true, as_of).unwrap();
    }

    // A fresh engine and store over the same blob continue the window.
    let store = Arc::new(FileStore::new(&file_config(&dir)).unwrap());
    let engine = engine_over(store.clone());

    engine.evaluate_at("C", None, true, as_of).unwrap_err();
    // Re-views of persisted content stay permitted and uncounted.
    engine.evaluate_at("A", None, true, as_of).unwrap();

    let persisted = store.load().unwrap();
    assert_eq!(persisted.get(1).unwrap().counter, 2);
}

/// Clearing the cache through the engine removes the blob and restarts
/// counting.
#[test]
fn test_clear_cache_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let as_of = day(2025, 1, 1);

    let store = Arc::new(FileStore::new(&file_config(&dir)).unwrap());
    let engine = engine_over(store.clone());

    engine.evaluate_at("A", None, true, as_of).unwrap();
    engine.clear_paywall_cache().unwrap();
    assert!(store.load().unwrap().is_empty());

    let engine = engine_over(Arc::new(FileStore::new(&file_config(&dir)).unwrap()));
    engine.evaluate_at("A", None, true, as_of).unwrap();

    let persisted = store.load().unwrap();
    assert_eq!(persisted.get(1).unwrap().counter, 1);
}

/// Two engines sharing one store see each other's counts sequentially.
#[test]
fn test_sequential_engines_share_budget() {
    let dir = tempfile::tempdir().unwrap();
    let as_of = day(2025, 1, 1);
    let store = Arc::new(FileStore::new(&file_config(&dir)).unwrap());

    let first = engine_over(store.clone());
    first.evaluate_at("A", None, true, as_of).unwrap();

    let second = engine_over(store.clone());
    second.evaluate_at("B", None, true, as_of).unwrap();
    second.evaluate_at("C", None, true, as_of).unwrap_err();
}
