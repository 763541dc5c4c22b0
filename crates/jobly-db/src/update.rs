//! Partial-update `SET` clause builder.
//!
//! Translates a sparse, ordered map of field names to new values into a
//! parameterized assignment list plus the matching bind values:
//!
//! ```ignore
//! use jobly_db::update::{ColumnMap, FieldMap, sql_for_partial_update};
//!
//! const USER_COLUMNS: ColumnMap = ColumnMap::new(&[("firstName", "first_name")]);
//!
//! let mut fields = FieldMap::new();
//! fields.set("firstName", "Aliya").set("age", 32_i32);
//!
//! let clause = sql_for_partial_update(fields, &USER_COLUMNS)?;
//! assert_eq!(clause.set_cols, r#""first_name"=$1, "age"=$2"#);
//! ```
//!
//! Column names are wrapped in double quotes but never escaped. Only pass
//! statically known field names and rename targets.

use crate::error::{DbError, DbResult};
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A bind value owned by a builder.
pub type Param = Arc<dyn ToSql + Sync + Send>;

/// Static field-name to column-name translation table for one entity.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pairs: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    /// Create a table from `(field, column)` pairs.
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    /// A table that maps every field to itself.
    pub const fn identity() -> Self {
        Self { pairs: &[] }
    }

    /// Column for `field`: the mapped name if present, else `field` verbatim.
    pub fn resolve<'a>(&self, field: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(from, _)| *from == field)
            .map(|(_, to)| *to)
            .unwrap_or(field)
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::identity()
    }
}

/// Insertion-ordered map of field names to new values.
#[derive(Default)]
pub struct FieldMap {
    fields: Vec<(String, Param)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Setting a name twice replaces the value and keeps the
    /// original position.
    pub fn set<T>(&mut self, name: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        let name = name.into();
        let value: Param = Arc::new(value);
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Set an optional field (None => skip).
    pub fn set_opt<T>(&mut self, name: impl Into<String>, value: Option<T>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(v) = value {
            self.set(name, v);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

impl fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(n, v)| (n, v)))
            .finish()
    }
}

/// Output of [`sql_for_partial_update`].
pub struct UpdateClause {
    /// `"col"=$1, "col2"=$2, ...` (no `SET` keyword)
    pub set_cols: String,
    /// Bind values, positionally aligned with `set_cols`.
    pub values: Vec<Param>,
}

impl UpdateClause {
    /// Index of the first placeholder free for the caller's own parameters.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

impl fmt::Debug for UpdateClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateClause")
            .field("set_cols", &self.set_cols)
            .field("values", &self.values)
            .finish()
    }
}

/// Build the assignment list of an `UPDATE ... SET` statement.
///
/// Fails with [`DbError::InvalidInput`] when `fields` is empty.
pub fn sql_for_partial_update(fields: FieldMap, rename: &ColumnMap) -> DbResult<UpdateClause> {
    if fields.is_empty() {
        return Err(DbError::invalid_input("No data"));
    }

    let mut cols = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());
    for (idx, (name, value)) in fields.fields.into_iter().enumerate() {
        cols.push(format!("\"{}\"=${}", rename.resolve(&name), idx + 1));
        values.push(value);
    }

    Ok(UpdateClause {
        set_cols: cols.join(", "),
        values,
    })
}
