//! Identifier and constraint token validation.
//!
//! Table and column names cannot be bound as parameters, so they are
//! interpolated into SQL text. Only names matching `[A-Za-z_][A-Za-z0-9_]*`
//! are accepted.

use recordstore_types::IDENTITY_COLUMN;
use recordstore_types::error::ContractViolation;

use crate::scan::CodeChars;

/// Check that `name` is a plain SQL identifier.
pub fn validate_identifier(name: &str) -> Result<(), ContractViolation> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ContractViolation::InvalidIdentifier(name.to_string()))
    }
}

/// Check a caller-supplied column: valid identifier and not the identity column.
pub fn validate_data_column(name: &str) -> Result<(), ContractViolation> {
    validate_identifier(name)?;
    if name.eq_ignore_ascii_case(IDENTITY_COLUMN) {
        return Err(ContractViolation::ReservedColumn(name.to_string()));
    }
    Ok(())
}

/// Check a constraint token appended verbatim to a column clause.
///
/// Tokens are free-form (`DEFAULT 0`, `REFERENCES users(idx)`), but must not
/// be empty, terminate the statement or open a comment. Each token also stays
/// inside its own column clause: parentheses balance and no comma appears
/// outside them.
pub fn validate_constraint(column: &str, token: &str) -> Result<(), ContractViolation> {
    let bad = token.trim().is_empty()
        || token.contains(';')
        || token.contains("--")
        || token.contains("/*")
        || !stays_in_clause(token);

    if bad {
        Err(ContractViolation::InvalidConstraint {
            column: column.to_string(),
            constraint: token.to_string(),
        })
    } else {
        Ok(())
    }
}

fn stays_in_clause(token: &str) -> bool {
    let mut depth = 0usize;
    for (_, c) in CodeChars::new(token) {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return false,
            ')' => depth -= 1,
            ',' if depth == 0 => return false,
            _ => {}
        }
    }
    depth == 0 && !has_open_literal(token)
}

/// An unterminated literal would swallow the rest of the column list.
fn has_open_literal(token: &str) -> bool {
    let mut open: Option<char> = None;
    for c in token.chars() {
        match open {
            Some(close) if c == close => open = None,
            Some(_) => {}
            None => {
                open = match c {
                    '\'' | '"' | '`' => Some(c),
                    '[' => Some(']'),
                    _ => None,
                }
            }
        }
    }
    open.is_some()
}
