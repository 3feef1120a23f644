//! Table schema descriptors.
//!
//! A schema lists the caller-defined columns of a table and the SQL
//! constraint keywords attached to each, in declaration order. The identity
//! column is implicit and never part of the descriptor.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::record::Predicate;

/// One column clause: `name CONSTRAINT CONSTRAINT ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    /// Constraint tokens such as `TEXT`, `NOT NULL`, `UNIQUE`, appended verbatim.
    pub constraints: Vec<String>,
}

/// Ordered set of column definitions.
///
/// Serialized as a JSON/TOML object: `{ "email": ["TEXT", "UNIQUE"] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column definition.
    pub fn column<I, S>(mut self, name: impl Into<String>, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(ColumnDef {
            name: name.into(),
            constraints: constraints.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Append a column definition. Duplicates are kept and rejected later
    /// when the statement is built.
    pub fn push(&mut self, column: ColumnDef) {
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for TableSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.name, &column.constraints)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TableSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = TableSchema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to constraint lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut schema = TableSchema::new();
                while let Some((name, constraints)) = access.next_entry::<String, Vec<String>>()? {
                    schema.push(ColumnDef { name, constraints });
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

/// Row selection for a delete.
///
/// Deleting every row must be requested explicitly with [`DeleteFilter::AllRows`];
/// a `Matching` filter with an empty predicate is refused rather than
/// silently widened to the whole table.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteFilter {
    Matching(Predicate),
    AllRows,
}

impl From<Predicate> for DeleteFilter {
    fn from(predicate: Predicate) -> Self {
        DeleteFilter::Matching(predicate)
    }
}
