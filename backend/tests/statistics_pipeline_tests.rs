//! End-to-end tests of the statistics pipeline over the local repository.

mod support;

use std::sync::Arc;

use serde_json::{json, Value};

use crm_statistics::api::{StatValue, StatisticResponse};
use crm_statistics::config::AppConfig;
use crm_statistics::db::{LocalRepository, RecordRepository, RepositoryError};
use crm_statistics::models::{AxisDefinition, GenericQuery};
use crm_statistics::services::{
    build_registry, empty_series_response, LocalRuntime, ProviderRegistry, ServiceError,
    StaticModuleNameMapper, ACCOUNTS_NEW_BY_MONTH,
};
use support::{account, seeded_repository};

fn registry(repo: Arc<LocalRepository>) -> ProviderRegistry {
    let config = AppConfig::default();
    build_registry(
        &config,
        repo,
        Arc::new(StaticModuleNameMapper::new(config.modules.clone())),
    )
}

fn query(value: Value) -> GenericQuery {
    GenericQuery::try_from(value).unwrap()
}

fn ints(response: &StatisticResponse, series: usize) -> Vec<i64> {
    response.series[series]
        .values()
        .into_iter()
        .map(|v| match v {
            StatValue::Int(i) => i,
            other => panic!("expected int, got {:?}", other),
        })
        .collect()
}

#[tokio::test]
async fn test_accounts_new_by_month_example() {
    let runtime = LocalRuntime::new();
    let response = registry(seeded_repository())
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("accounts", ""),
            &runtime,
        )
        .await
        .unwrap();

    assert_eq!(response.key.as_str(), "accounts-new-by-month");
    assert_eq!(response.series_names(), vec!["Customer", "Partner"]);
    assert_eq!(ints(&response, 0), vec![0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0]);
    assert_eq!(ints(&response, 1), vec![0, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(response.options.x_axis_ticks, AxisDefinition::months());
    assert!(response.options.y_axis_tick_formatting);
    assert_eq!(runtime.active_sessions(), 0);
}

#[tokio::test]
async fn test_response_json_shape() {
    let response = registry(seeded_repository())
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("accounts", ""),
            &LocalRuntime::new(),
        )
        .await
        .unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["dataType"], json!("int"));
    assert_eq!(value["series"][1]["name"], json!("Partner"));
    assert_eq!(value["series"][1]["points"][1], json!([2, 5]));
    assert_eq!(value["options"]["xAxisTicks"], json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]));
    assert_eq!(value["options"]["yAxisTickFormatting"], json!(true));
}

#[tokio::test]
async fn test_every_series_covers_the_axis() {
    let response = registry(seeded_repository())
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("accounts", ""),
            &LocalRuntime::new(),
        )
        .await
        .unwrap();

    for series in &response.series {
        assert_eq!(series.axis_keys(), (1..=12).collect::<Vec<i64>>());
    }
}

#[tokio::test]
async fn test_unsupported_module_returns_empty_response() {
    let runtime = LocalRuntime::new();
    let response = registry(seeded_repository())
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("leads", ""),
            &runtime,
        )
        .await
        .unwrap();

    assert_eq!(response, empty_series_response(ACCOUNTS_NEW_BY_MONTH));
    assert_eq!(
        serde_json::to_value(&response).unwrap()["series"],
        json!([])
    );
    assert_eq!(runtime.total_sessions(), 0);
}

#[tokio::test]
async fn test_padded_module_name_does_not_match() {
    let runtime = LocalRuntime::new();
    let response = registry(seeded_repository())
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &query(json!({"module": " accounts "})),
            &runtime,
        )
        .await
        .unwrap();

    assert_eq!(response, empty_series_response(ACCOUNTS_NEW_BY_MONTH));
    assert_eq!(runtime.total_sessions(), 0);
}

#[tokio::test]
async fn test_soft_failures_are_idempotent() {
    let registry = registry(seeded_repository());
    let runtime = LocalRuntime::new();

    for bad in [
        json!({}),
        json!({"module": ""}),
        json!({"module": null, "id": "1"}),
        json!({"module": "contacts"}),
    ] {
        let first = registry
            .get_data(ACCOUNTS_NEW_BY_MONTH, &query(bad.clone()), &runtime)
            .await
            .unwrap();
        let second = registry
            .get_data(ACCOUNTS_NEW_BY_MONTH, &query(bad), &runtime)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first, empty_series_response(ACCOUNTS_NEW_BY_MONTH));
    }
}

#[tokio::test]
async fn test_criteria_filters_are_preserved() {
    let response = registry(seeded_repository())
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &query(json!({
                "module": "accounts",
                "criteria": {"filters": {"account_type": {"operator": "=", "values": ["Partner"]}}}
            })),
            &LocalRuntime::new(),
        )
        .await
        .unwrap();

    assert_eq!(response.series_names(), vec!["Partner"]);
    assert_eq!(ints(&response, 0)[1], 5);
}

#[tokio::test]
async fn test_unknown_record_type_is_soft_failure() {
    let repo = Arc::new(LocalRepository::new());
    let runtime = LocalRuntime::new();

    let response = registry(repo)
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("accounts", ""),
            &runtime,
        )
        .await
        .unwrap();

    assert!(response.is_empty());
    assert_eq!(runtime.total_sessions(), 1);
    assert_eq!(runtime.active_sessions(), 0);
}

#[tokio::test]
async fn test_executor_failure_is_hard_and_releases_session() {
    let repo = seeded_repository();
    repo.set_healthy(false);
    let runtime = LocalRuntime::new();

    let err = registry(repo)
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("accounts", ""),
            &runtime,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Repository(RepositoryError::ConnectionError { .. })
    ));
    assert_eq!(runtime.total_sessions(), 1);
    assert_eq!(runtime.active_sessions(), 0);
}

#[tokio::test]
async fn test_session_failure_is_hard() {
    let err = registry(seeded_repository())
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("accounts", ""),
            &LocalRuntime::unavailable(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Session(_)));
}

#[tokio::test]
async fn test_unknown_statistic_key() {
    let err = registry(seeded_repository())
        .get_data(
            "accounts-by-weekday",
            &GenericQuery::for_module("accounts", ""),
            &LocalRuntime::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UnknownStatistic(_)));
}

#[tokio::test]
async fn test_rows_with_unparsable_dates_are_dropped() {
    let repo = seeded_repository();
    repo.insert_record("accounts", account("Odd", "not a date", json!("Customer")));

    let response = registry(repo)
        .get_data(
            ACCOUNTS_NEW_BY_MONTH,
            &GenericQuery::for_module("accounts", ""),
            &LocalRuntime::new(),
        )
        .await
        .unwrap();

    assert_eq!(ints(&response, 0).iter().sum::<i64>(), 4);
}

#[tokio::test]
async fn test_configured_monthly_statistic() {
    let repo = seeded_repository();
    repo.insert_records(
        "contacts",
        vec![
            json!({"id": "1", "date_entered": "2024-01-02", "lead_source": "Web"}),
            json!({"id": "2", "date_entered": "2024-01-09", "lead_source": "Web"}),
            json!({"id": "3", "date_entered": "2024-06-01", "lead_source": "Cold Call"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap()),
    );

    let config = AppConfig::from_toml_str(
        r#"
[[statistics.monthly]]
key = "contacts-new-by-month"
module = "contacts"
count_field = "id"
group_field = "lead_source"
"#,
    )
    .unwrap();

    let registry = build_registry(
        &config,
        repo.clone() as Arc<dyn RecordRepository>,
        Arc::new(StaticModuleNameMapper::new(config.modules.clone())),
    );

    let response = registry
        .get_data(
            "contacts-new-by-month",
            &GenericQuery::for_module("contacts", ""),
            &LocalRuntime::new(),
        )
        .await
        .unwrap();

    assert_eq!(response.series_names(), vec!["Web", "Cold Call"]);
    assert_eq!(ints(&response, 0)[0], 2);
    assert_eq!(ints(&response, 1)[5], 1);
}
