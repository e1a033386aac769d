//! Equality filter builder for inventory queries

use std::fmt;

use mongodb::bson::{Bson, Document};

use crate::types::{INACTIVE_STATUS, STATUS_FIELD};

/// Equality filter over device fields
///
/// Clauses are ANDed in insertion order. A repeated field replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusFilter {
    clauses: Vec<(String, Bson)>,
}

impl StatusFilter {
    /// Create an empty filter (matches every document)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for devices whose status is `inactive`
    #[must_use]
    pub fn inactive() -> Self {
        Self::new().where_eq(STATUS_FIELD, INACTIVE_STATUS)
    }

    /// Add an equality clause
    #[must_use]
    pub fn where_eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        let value = value.into();
        if let Some(existing) = self.clauses.iter_mut().find(|(f, _)| f == field) {
            existing.1 = value;
        } else {
            self.clauses.push((field.to_string(), value));
        }
        self
    }

    /// Build the query document
    #[must_use]
    pub fn to_document(&self) -> Document {
        self.clauses
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// Check a document against the filter without a round trip
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_document())
    }
}
