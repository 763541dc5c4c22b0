//! `tracing`-based SQL statement logging.
//!
//! [`TracedClient`] wraps any [`GenericClient`] and emits one debug event per
//! statement under the `jobly.sql` target, plus a warning when a statement
//! runs longer than the configured slow-query threshold.
//!
//! ```ignore
//! let client = pool.get().await?;
//! let traced = TracedClient::new(&client).slow_query_threshold(Duration::from_millis(200));
//! let job = Job::get(&traced, 7).await?;
//! ```

use crate::client::GenericClient;
use crate::error::DbResult;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Default truncation for logged SQL, in bytes.
pub const DEFAULT_MAX_SQL_LENGTH: usize = 200;

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str) -> String {
    if sql.len() > DEFAULT_MAX_SQL_LENGTH {
        format!("{}...", truncate_sql_bytes(sql, DEFAULT_MAX_SQL_LENGTH))
    } else {
        sql.to_string()
    }
}

/// A client wrapper that logs every statement through `tracing`.
pub struct TracedClient<C> {
    client: C,
    slow_query_threshold: Option<Duration>,
}

impl<C: GenericClient> TracedClient<C> {
    /// Wrap `client` with no slow-query threshold.
    pub fn new(client: C) -> Self {
        Self {
            client,
            slow_query_threshold: None,
        }
    }

    /// Warn about statements taking longer than `threshold`.
    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    fn report(&self, tag: &str, sql: &str, params: usize, elapsed: Duration, outcome: &str) {
        let sql = display_sql(sql);
        tracing::debug!(
            target: "jobly.sql",
            tag,
            sql = %sql,
            params,
            elapsed_ms = elapsed.as_millis() as u64,
            outcome,
            "statement executed"
        );

        if let Some(threshold) = self.slow_query_threshold
            && elapsed > threshold
        {
            tracing::warn!(
                target: "jobly.sql",
                tag,
                sql = %sql,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = threshold.as_millis() as u64,
                "slow statement"
            );
        }
    }

    async fn query_inner(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Vec<Row>> {
        let start = Instant::now();
        let result = self.client.query_tagged(tag, sql, params).await;
        let outcome = match &result {
            Ok(rows) => format!("rows={}", rows.len()),
            Err(e) => format!("error: {e}"),
        };
        self.report(tag, sql, params.len(), start.elapsed(), &outcome);
        result
    }
}

impl<C: GenericClient> GenericClient for TracedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        self.query_inner("-", sql, params).await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Vec<Row>> {
        self.query_inner(tag, sql, params).await
    }
}
