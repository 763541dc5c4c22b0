//! Incremental WHERE clause builder used by list queries.

use std::fmt;
use tokio_postgres::types::ToSql;

/// Accumulates AND-ed predicates and their bind values.
///
/// Placeholders are numbered `$1, $2, ...` in the order bound conditions are
/// added; [`WhereBuilder::and_raw`] conditions take no placeholder.
#[derive(Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Number of bound values, which is also the highest placeholder used.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// The predicate text, without the `WHERE` keyword.
    pub fn build_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// Bind values aligned with the placeholders in [`build_clause`](Self::build_clause).
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|v| &**v as &(dyn ToSql + Sync))
            .collect()
    }

    fn push_bound<T>(&mut self, col: &str, op: &str, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.params.push(Box::new(value));
        self.conditions.push(format!("{col} {op} ${}", self.params.len()));
        self
    }

    /// `col ILIKE '%needle%'`, binding the wrapped needle.
    pub fn and_ilike(&mut self, col: &str, needle: &str) -> &mut Self {
        self.push_bound(col, "ILIKE", format!("%{needle}%"))
    }

    /// `col >= value`.
    pub fn and_gte<T>(&mut self, col: &str, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.push_bound(col, ">=", value)
    }

    /// A literal predicate. Only pass static SQL.
    pub fn and_raw(&mut self, sql: &str) -> &mut Self {
        self.conditions.push(sql.to_string());
        self
    }
}

impl fmt::Debug for WhereBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhereBuilder")
            .field("clause", &self.build_clause())
            .field("params", &self.params)
            .finish()
    }
}
