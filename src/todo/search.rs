//! Search predicate construction.
//!
//! A [`TodoSearchInput`] is turned into an ordered list of typed clauses. The
//! store applies them conjunctively; each present filter contributes exactly
//! one clause and an empty input produces none.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::todo::model::{TodoRecord, TodoSearchInput};

/// String-valued columns a clause can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    ContentCode,
    ContentName,
    Status,
}

impl TextField {
    pub fn column(&self) -> &'static str {
        match self {
            TextField::ContentCode => "content_code",
            TextField::ContentName => "content_name",
            TextField::Status => "status",
        }
    }

    fn value<'a>(&self, record: &'a TodoRecord) -> &'a str {
        match self {
            TextField::ContentCode => &record.content_code,
            TextField::ContentName => &record.content_name,
            TextField::Status => &record.status,
        }
    }
}

/// Timestamp columns a clause can bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    CreatedAt,
}

impl TimeField {
    pub fn column(&self) -> &'static str {
        match self {
            TimeField::CreatedAt => "created_at",
        }
    }

    fn value(&self, record: &TodoRecord) -> DateTime<Utc> {
        match self {
            TimeField::CreatedAt => record.created_at,
        }
    }
}

/// One search predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-insensitive substring match.
    Contains { field: TextField, needle: String },
    /// Inclusive lower bound.
    AtOrAfter { field: TimeField, bound: DateTime<Utc> },
    /// Inclusive upper bound.
    AtOrBefore { field: TimeField, bound: DateTime<Utc> },
    /// Exact match.
    Equals { field: TextField, value: String },
}

impl Clause {
    /// Relational template of this clause, with `?` for the bound value.
    pub fn template(&self) -> String {
        match self {
            Clause::Contains { field, .. } => format!("{} ILIKE ?", field.column()),
            Clause::AtOrAfter { field, .. } => format!("{} >= ?", field.column()),
            Clause::AtOrBefore { field, .. } => format!("{} <= ?", field.column()),
            Clause::Equals { field, .. } => format!("{} = ?", field.column()),
        }
    }

    /// Evaluate the clause against a record.
    pub fn matches(&self, record: &TodoRecord) -> bool {
        match self {
            Clause::Contains { field, needle } => field
                .value(record)
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Clause::AtOrAfter { field, bound } => field.value(record) >= *bound,
            Clause::AtOrBefore { field, bound } => field.value(record) <= *bound,
            Clause::Equals { field, value } => field.value(record) == value,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Contains { needle, .. } => write!(f, "{} [%{}%]", self.template(), needle),
            Clause::AtOrAfter { bound, .. } | Clause::AtOrBefore { bound, .. } => {
                write!(f, "{} [{}]", self.template(), bound.to_rfc3339())
            }
            Clause::Equals { value, .. } => write!(f, "{} [{}]", self.template(), value),
        }
    }
}

/// Build the clause list for a search, in a fixed field order.
pub fn build_clauses(input: &TodoSearchInput) -> Vec<Clause> {
    let mut clauses = Vec::new();

    if let Some(code) = &input.content_code {
        clauses.push(Clause::Contains {
            field: TextField::ContentCode,
            needle: code.clone(),
        });
    }
    if let Some(name) = &input.content_name {
        clauses.push(Clause::Contains {
            field: TextField::ContentName,
            needle: name.clone(),
        });
    }
    if let Some(start) = input.start_date {
        clauses.push(Clause::AtOrAfter {
            field: TimeField::CreatedAt,
            bound: start,
        });
    }
    if let Some(end) = input.end_date {
        clauses.push(Clause::AtOrBefore {
            field: TimeField::CreatedAt,
            bound: end,
        });
    }
    if let Some(status) = input.status {
        clauses.push(Clause::Equals {
            field: TextField::Status,
            value: status.as_str().to_string(),
        });
    }

    clauses
}

/// True when every clause holds for `record`.
pub fn matches_all(clauses: &[Clause], record: &TodoRecord) -> bool {
    clauses.iter().all(|c| c.matches(record))
}
