//! Job postings: the record type and its data-access functions.
//!
//! Every function issues exactly one statement through a [`GenericClient`]
//! and relies on the store's per-statement atomicity.

use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::filter::WhereBuilder;
use crate::row::{FromRow, RowExt, map_rows};
use crate::update::{ColumnMap, FieldMap, sql_for_partial_update};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Static description of the `jobs` table.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub table: &'static str,
    /// Select list shared by every statement that returns a job.
    pub columns: &'static str,
    /// Field-name to column-name translation for partial updates.
    pub rename: ColumnMap,
}

pub const JOBS: TableDef = TableDef {
    table: "jobs",
    columns: "id, title, salary, equity, company_handle",
    rename: ColumnMap::new(&[("companyHandle", "company_handle")]),
};

/// A job posting row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// Fraction in `[0, 1]`, serialized as a decimal string.
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Values for a new job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// A sparse set of changes to an existing job.
///
/// The outer `Option` says whether a field is being changed; for nullable
/// columns the inner `Option` carries the new value (`Some(None)` sets NULL).
/// The owning company cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub salary: Option<Option<i32>>,
    pub equity: Option<Option<Decimal>>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.salary.is_none() && self.equity.is_none()
    }

    /// Present fields, in declaration order.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields
            .set_opt("title", self.title.clone())
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity);
        fields
    }
}

/// Optional, independently combinable list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Case-insensitive substring of the title. Pass the raw substring; the
    /// wildcards are added when the predicate is built.
    pub title: Option<String>,
    /// Inclusive lower bound on salary.
    pub min_salary: Option<i32>,
    /// `Some(true)` keeps only jobs with `equity > 0`.
    ///
    /// `Some(false)` behaves exactly like `None`: it does NOT select jobs
    /// without equity, it simply adds no predicate.
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.build_where().is_empty()
    }

    /// Build the predicate for this filter.
    ///
    /// Conditions are AND-ed in the order title, min_salary, has_equity.
    /// Only the first two bind parameters; the equity test is a literal.
    pub fn build_where(&self) -> WhereBuilder {
        let mut w = WhereBuilder::new();
        if let Some(title) = &self.title {
            w.and_ilike("title", title);
        }
        if let Some(min_salary) = self.min_salary {
            w.and_gte("salary", min_salary);
        }
        if self.has_equity == Some(true) {
            w.and_raw("equity > 0");
        }
        w
    }
}

impl Job {
    /// Insert a job and return it with its generated id.
    ///
    /// A missing company surfaces as [`DbError::ForeignKeyViolation`].
    pub async fn create(conn: &impl GenericClient, new: &NewJob) -> DbResult<Job> {
        let sql = format!(
            "INSERT INTO {} (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            JOBS.table, JOBS.columns
        );
        let row = conn
            .query_one_tagged(
                "job.create",
                &sql,
                &[&new.title, &new.salary, &new.equity, &new.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// All jobs matching `filter`, ordered by id.
    pub async fn find_all(conn: &impl GenericClient, filter: &JobFilter) -> DbResult<Vec<Job>> {
        let w = filter.build_where();
        let mut sql = format!("SELECT {} FROM {}", JOBS.columns, JOBS.table);
        if !w.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&w.build_clause());
        }
        sql.push_str(" ORDER BY id");

        let rows = conn
            .query_tagged("job.find_all", &sql, &w.params_ref())
            .await?;
        map_rows(&rows)
    }

    /// The job with `id`, or [`DbError::NotFound`].
    pub async fn get(conn: &impl GenericClient, id: i32) -> DbResult<Job> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", JOBS.columns, JOBS.table);
        match conn.query_opt_tagged("job.get", &sql, &[&id]).await? {
            Some(row) => Job::from_row(&row),
            None => Err(not_found(id)),
        }
    }

    /// Apply `patch` to the job with `id` and return the updated row.
    ///
    /// Fails with [`DbError::InvalidInput`] if the patch is empty and with
    /// [`DbError::NotFound`] if no job has that id.
    pub async fn update(conn: &impl GenericClient, id: i32, patch: &JobPatch) -> DbResult<Job> {
        let clause = sql_for_partial_update(patch.to_fields(), &JOBS.rename)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            JOBS.table,
            clause.set_cols,
            clause.next_placeholder(),
            JOBS.columns
        );

        let mut params = clause.params_ref();
        params.push(&id);

        match conn.query_opt_tagged("job.update", &sql, &params).await? {
            Some(row) => Job::from_row(&row),
            None => Err(not_found(id)),
        }
    }

    /// Permanently delete the job with `id`.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING id", JOBS.table);
        match conn.query_opt_tagged("job.remove", &sql, &[&id]).await? {
            Some(_) => Ok(()),
            None => Err(not_found(id)),
        }
    }
}

fn not_found(id: i32) -> DbError {
    DbError::not_found(format!("No job with id: {id}"))
}
