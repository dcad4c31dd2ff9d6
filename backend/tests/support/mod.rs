#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crm_statistics::db::{LocalRepository, RepositoryFactory};
use crm_statistics::models::Row;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn account(name: &str, date_entered: &str, account_type: Value) -> Row {
    json!({
        "name": name,
        "date_entered": date_entered,
        "account_type": account_type,
    })
    .as_object()
    .cloned()
    .unwrap()
}

/// Accounts yielding Customer = 3 in February and 1 in November, Partner = 5
/// in February, plus an account without a type.
pub fn example_accounts() -> Vec<Row> {
    let mut rows = Vec::new();
    for i in 0..3 {
        rows.push(account(&format!("Customer {}", i), "2024-02-10 09:00:00", json!("Customer")));
    }
    for i in 0..5 {
        rows.push(account(&format!("Partner {}", i), "2024-02-20", json!("Partner")));
    }
    rows.push(account("Late Customer", "2024-11-03T12:00:00Z", json!("Customer")));
    rows.push(account("Untyped", "2024-05-05", Value::Null));
    rows
}

/// Local repository with the default record types and [`example_accounts`].
pub fn seeded_repository() -> Arc<LocalRepository> {
    let repo = RepositoryFactory::create_local();
    repo.insert_records("accounts", example_accounts());
    repo
}
