//! Pool construction against missing servers.

use std::time::Duration;
use taskboard::report::{
    adapters::{StoreConfig, open_store, postgres::PostgresReportStore},
    ports::ReportRepositoryError,
};

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_reports_storage_unavailable() {
    let result = PostgresReportStore::connect(
        "postgres://taskboard@127.0.0.1:1/taskboard",
        Duration::from_secs(1),
    )
    .await;

    assert!(matches!(
        result,
        Err(ReportRepositoryError::StorageUnavailable { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn open_store_propagates_unavailable_postgres() {
    let config = StoreConfig::Postgres {
        url: "postgres://taskboard@127.0.0.1:1/taskboard".to_owned(),
        connect_timeout: Duration::from_secs(1),
    };

    let result = open_store(&config).await;

    assert!(matches!(
        result,
        Err(ReportRepositoryError::StorageUnavailable { .. })
    ));
}
