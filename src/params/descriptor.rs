//! Typed references into time-indexed parameter storage.

use crate::error::{ResolveError, Result};
use crate::store::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `schema.table.column` location of a time-indexed parameter column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRef {
    pub schema: String,
    pub table: String,
    pub column: String,
}

impl FromStr for ColumnRef {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [schema, table, column] if parts.iter().all(|p| !p.trim().is_empty()) => Ok(Self {
                schema: schema.to_string(),
                table: table.to_string(),
                column: column.to_string(),
            }),
            _ => Err(ResolveError::InvalidColumnRef(s.to_string())),
        }
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = ResolveError;
    fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<ColumnRef> for String {
    fn from(c: ColumnRef) -> Self { c.to_string() }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.schema, self.table, self.column)
    }
}

/// Name of an interpolated dimension, optionally negated (`-pitch`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldDescriptor {
    pub name: String,
    pub negate: bool,
}

impl FieldDescriptor {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), negate: false }
    }

    pub fn negated(name: &str) -> Self {
        Self { name: name.to_string(), negate: true }
    }

    /// Looks the field up in an interpolated record, applying the sign flag.
    pub fn resolve(&self, record: &Record) -> Result<f64> {
        let value = record.get(&self.name)
            .copied()
            .ok_or_else(|| ResolveError::MissingField { field: self.name.clone() })?;
        Ok(if self.negate { -value } else { value })
    }
}

impl FromStr for FieldDescriptor {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        let (negate, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if name.is_empty() || name.starts_with('-') {
            return Err(ResolveError::InvalidFieldDescriptor(s.to_string()));
        }
        Ok(Self { name: name.to_string(), negate })
    }
}

impl TryFrom<String> for FieldDescriptor {
    type Error = ResolveError;
    fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<FieldDescriptor> for String {
    fn from(d: FieldDescriptor) -> Self { d.to_string() }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate { write!(f, "-{}", self.name) } else { write!(f, "{}", self.name) }
    }
}

/// Shape of one dynamic parameter: a single field or an ordered group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Scalar(FieldDescriptor),
    List(Vec<FieldDescriptor>),
}
