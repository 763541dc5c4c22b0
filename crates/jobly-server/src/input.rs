//! Request payload shapes and their validation.
//!
//! Bodies are first decoded as untyped JSON so that shape errors (unknown
//! fields, wrong types) and rule errors (negative salary) both surface as
//! `400 Bad Request` with a message list.

use crate::error::ApiError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use jobly_db::{Decimal, JobFilter, JobPatch, NewJob};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Len,
    Range,
    Type,
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Len => "len",
            Self::Range => "range",
            Self::Type => "type",
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Human readable messages, one per error, in collection order.
    pub fn messages(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest(errors.messages())
    }
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NewJobInput {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Body of `PATCH /jobs/{id}`. `companyHandle` and `id` are rejected as
/// unknown fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobPatchInput {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equity: Option<Option<Decimal>>,
}

// Distinguishes an explicit `null` (Some(None)) from an absent key (None).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Matches `companies.handle VARCHAR(25)`.
const MAX_HANDLE_LEN: usize = 25;

fn check_title(title: &str, errors: &mut ValidationErrors) {
    if title.is_empty() {
        errors.push(ValidationError::new(
            "title",
            ValidationCode::Len,
            "must not be empty",
        ));
    }
}

fn check_salary(salary: Option<i32>, errors: &mut ValidationErrors) {
    if let Some(salary) = salary
        && salary < 0
    {
        errors.push(ValidationError::new(
            "salary",
            ValidationCode::Range,
            "must be greater than or equal to 0",
        ));
    }
}

fn check_equity(equity: Option<Decimal>, errors: &mut ValidationErrors) {
    if let Some(equity) = equity
        && (equity < Decimal::ZERO || equity > Decimal::ONE)
    {
        errors.push(ValidationError::new(
            "equity",
            ValidationCode::Range,
            "must be between 0 and 1",
        ));
    }
}

impl NewJobInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_title(&self.title, &mut errors);
        check_salary(self.salary, &mut errors);
        check_equity(self.equity, &mut errors);
        let handle_len = self.company_handle.chars().count();
        if handle_len == 0 || handle_len > MAX_HANDLE_LEN {
            errors.push(ValidationError::new(
                "companyHandle",
                ValidationCode::Len,
                format!("must be 1 to {MAX_HANDLE_LEN} characters"),
            ));
        }
        errors.into_result()
    }

    pub fn into_new_job(self) -> NewJob {
        NewJob {
            title: self.title,
            salary: self.salary,
            equity: self.equity,
            company_handle: self.company_handle,
        }
    }
}

impl JobPatchInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        match &self.title {
            Some(Some(title)) => check_title(title, &mut errors),
            Some(None) => errors.push(ValidationError::new(
                "title",
                ValidationCode::Required,
                "must not be null",
            )),
            None => {}
        }
        check_salary(self.salary.flatten(), &mut errors);
        check_equity(self.equity.flatten(), &mut errors);
        errors.into_result()
    }

    pub fn into_patch(self) -> JobPatch {
        JobPatch {
            title: self.title.flatten(),
            salary: self.salary,
            equity: self.equity,
        }
    }
}

/// Query string of `GET /jobs`, kept as raw strings so coercion errors can
/// be reported in the same shape as body errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsQuery {
    pub title: Option<String>,
    pub min_salary: Option<String>,
    pub has_equity: Option<String>,
}

impl JobsQuery {
    /// Coerce into a [`JobFilter`].
    ///
    /// An empty `title` is treated as absent. `hasEquity` is true only for a
    /// case-insensitive `"true"`; anything else adds no predicate.
    pub fn into_filter(self) -> Result<JobFilter, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let min_salary = match self.min_salary.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i32>() {
                Ok(v) => Some(v),
                Err(_) => {
                    errors.push(ValidationError::new(
                        "minSalary",
                        ValidationCode::Type,
                        "must be an integer",
                    ));
                    None
                }
            },
        };

        let has_equity = self
            .has_equity
            .as_deref()
            .map(|raw| raw.trim().eq_ignore_ascii_case("true"));

        errors.into_result()?;
        Ok(JobFilter {
            title: self.title.filter(|t| !t.is_empty()),
            min_salary,
            has_equity,
        })
    }
}

/// Decode a JSON body into `T`, mapping every failure to `400`.
pub fn parse_body<T: DeserializeOwned>(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    serde_json::from_value(value).map_err(|e| ApiError::bad_request(e.to_string()))
}

pub fn parse_query<T>(
    query: Result<axum::extract::Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    query
        .map(|axum::extract::Query(q)| q)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
