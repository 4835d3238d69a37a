//! Prometheus metrics for database connection pool
//!
//! Pool occupancy and utilization gauges, acquire latency and acquire errors

use prometheus::{
    register_gauge_vec, register_histogram_vec, register_int_counter_vec, register_int_gauge_vec,
    GaugeVec, HistogramVec, IntCounterVec, IntGaugeVec,
};
use sqlx::{pool::PoolConnection, MySql, MySqlPool};
use std::time::Instant;

lazy_static::lazy_static! {
    /// Database connection pool size by state (idle/active/min/max)
    static ref DB_POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connection count by state",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");

    /// Share of `max_connections` currently checked out
    static ref DB_POOL_UTILIZATION: GaugeVec = register_gauge_vec!(
        "db_pool_utilization_ratio",
        "Checked-out connections divided by the pool ceiling",
        &["service"]
    ).expect("Prometheus metrics registration should succeed at startup");

    /// Time to acquire a connection from the pool
    static ref DB_POOL_ACQUIRE_DURATION: HistogramVec = register_histogram_vec!(
        "db_pool_acquire_duration_seconds",
        "Time to acquire connection from pool",
        &["service"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    ).expect("Prometheus metrics registration should succeed at startup");

    /// Connection acquisition errors by type
    static ref DB_POOL_CONNECTION_ERRORS: IntCounterVec = register_int_counter_vec!(
        "db_pool_connection_errors_total",
        "Connection acquisition errors",
        &["service", "error_type"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Point-in-time view of the pool used for the gauges
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PoolSnapshot {
    pub idle: i64,
    pub active: i64,
    pub min: i64,
    pub max: i64,
    pub closed: bool,
}

impl PoolSnapshot {
    pub fn of(pool: &MySqlPool) -> Self {
        let options = pool.options();
        Self::new(
            pool.size(),
            pool.num_idle(),
            options.get_min_connections(),
            options.get_max_connections(),
            pool.is_closed(),
        )
    }

    fn new(size: u32, idle: usize, min: u32, max: u32, closed: bool) -> Self {
        let idle = (idle as i64).min(size as i64);
        Self {
            idle,
            active: size as i64 - idle,
            min: min as i64,
            max: max as i64,
            closed,
        }
    }

    /// At 1.0 every connection is checked out and further `acquire` calls queue
    pub fn utilization(&self) -> f64 {
        if self.closed || self.max == 0 {
            return 0.0;
        }
        self.active as f64 / self.max as f64
    }
}

/// Refresh the pool gauges (called periodically)
pub(crate) fn update_pool_metrics(pool: &MySqlPool, service: &str) {
    let snapshot = PoolSnapshot::of(pool);

    for (state, value) in [
        ("idle", snapshot.idle),
        ("active", snapshot.active),
        ("min", snapshot.min),
        ("max", snapshot.max),
    ] {
        DB_POOL_CONNECTIONS
            .with_label_values(&[service, state])
            .set(value);
    }

    DB_POOL_UTILIZATION
        .with_label_values(&[service])
        .set(snapshot.utilization());
}

/// Acquire a connection from the pool and record metrics
///
/// Drop-in replacement for `pool.acquire().await` that tracks acquisition
/// latency and error rates. The connection goes back to the pool when the
/// returned guard is dropped.
pub async fn acquire_with_metrics(
    pool: &MySqlPool,
    service: &str,
) -> Result<PoolConnection<MySql>, sqlx::Error> {
    let start = Instant::now();
    let result = pool.acquire().await;

    DB_POOL_ACQUIRE_DURATION
        .with_label_values(&[service])
        .observe(start.elapsed().as_secs_f64());

    if let Err(e) = &result {
        let error_type = match e {
            sqlx::Error::PoolTimedOut => "timeout",
            sqlx::Error::PoolClosed => "closed",
            _ => "other",
        };

        DB_POOL_CONNECTION_ERRORS
            .with_label_values(&[service, error_type])
            .inc();
    }

    result
}
