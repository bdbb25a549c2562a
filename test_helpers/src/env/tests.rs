//! Unit tests for environment guards and scopes.

use std::sync::{Arc, Barrier};
use std::thread;

use super::*;

fn read(key: &str) -> Option<String> {
    env::var(key).ok()
}

#[test]
fn set_var_restores_previous_value() {
    let _outer = set_var("STRATA_HELPERS_SET", "original");
    {
        let _inner = set_var("STRATA_HELPERS_SET", "temporary");
        assert_eq!(read("STRATA_HELPERS_SET").as_deref(), Some("temporary"));
    }
    assert_eq!(read("STRATA_HELPERS_SET").as_deref(), Some("original"));
}

#[test]
fn set_var_removes_previously_absent_key() {
    let absent = remove_var("STRATA_HELPERS_FRESH");
    {
        let _guard = set_var("STRATA_HELPERS_FRESH", "value");
        assert!(read("STRATA_HELPERS_FRESH").is_some());
    }
    assert!(read("STRATA_HELPERS_FRESH").is_none());
    drop(absent);
}

#[test]
fn remove_var_restores_previous_value() {
    let _outer = set_var("STRATA_HELPERS_REMOVE", "kept");
    {
        let guard = remove_var("STRATA_HELPERS_REMOVE");
        assert_eq!(guard.key(), "STRATA_HELPERS_REMOVE");
        assert!(read("STRATA_HELPERS_REMOVE").is_none());
    }
    assert_eq!(read("STRATA_HELPERS_REMOVE").as_deref(), Some("kept"));
}

#[test]
fn scope_clears_prefix_and_restores_on_drop() {
    let _a = set_var("STRATA_HELPERS_SCOPE_A", "1");
    let _b = set_var("STRATA_HELPERS_SCOPE_B", "2");
    let _other = set_var("STRATA_HELPERS_SCOPEX", "3");
    {
        let mut scope = EnvScope::new();
        scope
            .clear_prefix("STRATA_HELPERS_SCOPE")
            .set("STRATA_HELPERS_SCOPE_C", "4");
        assert_eq!(scope.len(), 3);
        assert!(read("STRATA_HELPERS_SCOPE_A").is_none());
        assert!(read("STRATA_HELPERS_SCOPE_B").is_none());
        assert_eq!(read("STRATA_HELPERS_SCOPEX").as_deref(), Some("3"));
        assert_eq!(read("STRATA_HELPERS_SCOPE_C").as_deref(), Some("4"));
    }
    assert_eq!(read("STRATA_HELPERS_SCOPE_A").as_deref(), Some("1"));
    assert_eq!(read("STRATA_HELPERS_SCOPE_B").as_deref(), Some("2"));
    assert!(read("STRATA_HELPERS_SCOPE_C").is_none());
}

#[test]
fn lock_is_reentrant() {
    let value = with_lock(|| {
        let _guard = set_var("STRATA_HELPERS_REENTRANT", "inner");
        read("STRATA_HELPERS_REENTRANT")
    });
    assert_eq!(value.as_deref(), Some("inner"));
}

#[test]
fn concurrent_guards_on_distinct_keys_restore() {
    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let wait = Arc::clone(&barrier);
            thread::spawn(move || {
                let key = format!("STRATA_HELPERS_THREAD_{worker}");
                wait.wait();
                for iteration in 0..20 {
                    let value = format!("{worker}-{iteration}");
                    let guard = set_var(key.as_str(), &value);
                    assert_eq!(read(&key), Some(value));
                    drop(guard);
                    assert!(read(&key).is_none());
                }
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().is_ok(), "worker thread panicked");
    }
}
