//! SQL statement construction.
//!
//! Each constructor validates its inputs, then produces the SQL text and the
//! ordered list of values to bind. Identifiers are interpolated, values are
//! always bound as `?` parameters.

use recordstore_types::IDENTITY_COLUMN;
use recordstore_types::error::ContractViolation;
use recordstore_types::record::{Predicate, Record};
use recordstore_types::schema::{DeleteFilter, TableSchema};
use recordstore_types::value::Value;

use crate::ident::{validate_constraint, validate_data_column, validate_identifier};
use crate::scan::has_trailing_statement;

/// A single SQL statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// Caller-written query text, run as-is with no parameters.
    ///
    /// Only one statement per call: text with anything after the first `;`
    /// is rejected rather than partially run.
    pub fn query(sql: &str) -> Result<Self, ContractViolation> {
        if has_trailing_statement(sql) {
            return Err(ContractViolation::MultipleStatements);
        }
        Ok(Self {
            sql: sql.to_string(),
            params: Vec::new(),
        })
    }

    /// `CREATE TABLE IF NOT EXISTS` with the identity column prepended.
    pub fn create_table(table: &str, schema: &TableSchema) -> Result<Self, ContractViolation> {
        validate_identifier(table)?;
        ensure_unique(schema.columns().iter().map(|c| c.name.as_str()))?;

        let mut clauses = vec![format!("{IDENTITY_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT")];
        for column in schema.columns() {
            validate_data_column(&column.name)?;
            let mut clause = column.name.clone();
            for token in &column.constraints {
                validate_constraint(&column.name, token)?;
                clause.push(' ');
                clause.push_str(token.trim());
            }
            clauses.push(clause);
        }

        Ok(Self {
            sql: format!("CREATE TABLE IF NOT EXISTS {table} ({})", clauses.join(", ")),
            params: Vec::new(),
        })
    }

    /// `INSERT` with a NULL identity placeholder so the engine assigns it.
    pub fn insert(table: &str, record: &Record) -> Result<Self, ContractViolation> {
        validate_identifier(table)?;
        validate_columns(record)?;

        let columns: Vec<&str> = std::iter::once(IDENTITY_COLUMN)
            .chain(record.columns())
            .collect();
        let placeholders = vec!["?"; columns.len()].join(", ");

        let mut params = Vec::with_capacity(columns.len());
        params.push(Value::Null);
        params.extend(record.values().cloned());

        Ok(Self {
            sql: format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders})",
                columns.join(", ")
            ),
            params,
        })
    }

    /// `UPDATE ... SET ... WHERE ...`, binding set values before predicate values.
    pub fn update(table: &str, set: &Record, predicate: &Predicate) -> Result<Self, ContractViolation> {
        validate_identifier(table)?;
        if set.is_empty() {
            return Err(ContractViolation::EmptySetClause);
        }
        if predicate.is_empty() {
            return Err(ContractViolation::EmptyPredicate);
        }
        validate_columns(set)?;
        let where_clause = where_clause(predicate)?;

        let set_clause = set
            .columns()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");

        let params = set.values().chain(predicate.values()).cloned().collect();

        Ok(Self {
            sql: format!("UPDATE {table} SET {set_clause} WHERE {where_clause}"),
            params,
        })
    }

    /// `DELETE FROM`, either filtered or explicitly unconditional.
    pub fn delete(table: &str, filter: &DeleteFilter) -> Result<Self, ContractViolation> {
        validate_identifier(table)?;

        match filter {
            DeleteFilter::AllRows => Ok(Self {
                sql: format!("DELETE FROM {table}"),
                params: Vec::new(),
            }),
            DeleteFilter::Matching(predicate) if predicate.is_empty() => {
                Err(ContractViolation::UnconfirmedDeleteAll(table.to_string()))
            }
            DeleteFilter::Matching(predicate) => Ok(Self {
                sql: format!("DELETE FROM {table} WHERE {}", where_clause(predicate)?),
                params: predicate.values().cloned().collect(),
            }),
        }
    }
}

/// Predicate columns may name the identity column; record columns may not.
fn where_clause(predicate: &Predicate) -> Result<String, ContractViolation> {
    ensure_unique(predicate.columns())?;
    let mut terms = Vec::with_capacity(predicate.len());
    for (column, value) in predicate.iter() {
        validate_identifier(column)?;
        ensure_finite(column, value)?;
        terms.push(format!("{column} = ?"));
    }
    Ok(terms.join(" AND "))
}

fn validate_columns(record: &Record) -> Result<(), ContractViolation> {
    ensure_unique(record.columns())?;
    for (column, value) in record.iter() {
        validate_data_column(column)?;
        ensure_finite(column, value)?;
    }
    Ok(())
}

/// SQLite stores NaN as NULL, so non-finite reals never round-trip.
fn ensure_finite(column: &str, value: &Value) -> Result<(), ContractViolation> {
    match value {
        Value::Real(r) if !r.is_finite() => {
            Err(ContractViolation::NonFiniteReal(column.to_string()))
        }
        _ => Ok(()),
    }
}

/// SQLite column names are case-insensitive, so `Name` and `name` collide.
fn ensure_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), ContractViolation> {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            return Err(ContractViolation::DuplicateColumn(name.to_string()));
        }
        seen.push(name);
    }
    Ok(())
}
