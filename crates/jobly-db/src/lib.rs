//! # jobly-db
//!
//! PostgreSQL data access for the Jobly jobs service.
//!
//! - **Partial updates**: [`update::sql_for_partial_update`] turns a sparse,
//!   ordered field map into a parameterized `SET` list plus bind values
//! - **Filtered lists**: [`JobFilter`] builds its predicate incrementally with
//!   [`WhereBuilder`], numbering placeholders in declaration order
//! - **Record access**: [`Job`] issues one statement per operation through
//!   [`GenericClient`] and reports missing rows as [`DbError::NotFound`]
//!
//! ```ignore
//! use jobly_db::{Job, JobFilter, JobPatch};
//!
//! let pool = jobly_db::create_pool("postgres://localhost/jobly")?;
//! let client = pool.get().await?;
//!
//! let jobs = Job::find_all(&client, &JobFilter {
//!     min_salary: Some(100_000),
//!     has_equity: Some(true),
//!     ..Default::default()
//! }).await?;
//!
//! let patch = JobPatch { title: Some("Staff Engineer".into()), ..Default::default() };
//! let job = Job::update(&client, jobs[0].id, &patch).await?;
//! ```

pub mod client;
pub mod error;
pub mod filter;
pub mod job;
pub mod monitor;
pub mod row;
pub mod update;

pub use client::GenericClient;
pub use error::{DbError, DbResult};
pub use filter::WhereBuilder;
pub use job::{JOBS, Job, JobFilter, JobPatch, NewJob, TableDef};
pub use monitor::TracedClient;
pub use row::{FromRow, RowExt};
pub use update::{ColumnMap, FieldMap, UpdateClause, sql_for_partial_update};

// Re-exported so callers can name bind and decimal types without extra deps.
pub use rust_decimal::Decimal;
pub use tokio_postgres;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "pool")]
pub use deadpool_postgres::{Client as PoolClient, Pool};
