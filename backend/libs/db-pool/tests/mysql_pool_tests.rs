//! Pool tests against a live MySQL/MariaDB server
//!
//! Run with `DB_HOST`, `DB_USER`, `DB_PASSWORD` and `DB_NAME` pointing at a
//! scratch database:
//!
//! ```text
//! cargo test -p db-pool -- --ignored
//! ```

use db_pool::{acquire_with_metrics, create_pool, DbConfig};
use std::time::Duration;

fn test_config(max_connections: u32) -> DbConfig {
    let mut config = DbConfig::from_env("pool-test").expect("DB_* env vars must be set");
    config.max_connections = max_connections;
    config.min_connections = 1;
    config.acquire_timeout_secs = 2;
    config
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_pool_verifies_connection() {
    let pool = create_pool(test_config(3)).await.expect("pool");

    let value: (i64,) = sqlx::query_as("SELECT 1")
        .fetch_one(&pool)
        .await
        .expect("select");
    assert_eq!(value.0, 1);
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_acquire_released_on_drop() {
    let pool = create_pool(test_config(2)).await.expect("pool");

    let first = acquire_with_metrics(&pool, "pool-test").await.expect("first");
    let second = acquire_with_metrics(&pool, "pool-test").await.expect("second");
    assert_eq!(pool.num_idle(), 0);

    drop(first);
    drop(second);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(pool.num_idle() > 0);
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_acquire_times_out_when_exhausted() {
    let pool = create_pool(test_config(1)).await.expect("pool");

    let _held = acquire_with_metrics(&pool, "pool-test").await.expect("held");
    let result = acquire_with_metrics(&pool, "pool-test").await;

    assert!(matches!(result, Err(sqlx::Error::PoolTimedOut)));
}
