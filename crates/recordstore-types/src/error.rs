use thiserror::Error;

/// Errors surfaced by every gateway operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The database file could not be opened.
    #[error("database connection error: {0}")]
    Connection(String),

    /// The engine rejected the statement.
    #[error("statement error ({kind}): {message}")]
    Statement {
        kind: StatementErrorKind,
        message: String,
    },

    /// The caller broke the gateway contract. Raised before any connection is opened.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

impl GatewayError {
    pub fn statement(kind: StatementErrorKind, message: impl Into<String>) -> Self {
        GatewayError::Statement {
            kind,
            message: message.into(),
        }
    }

    /// The statement kind, if this is a statement error.
    pub fn statement_kind(&self) -> Option<StatementErrorKind> {
        match self {
            GatewayError::Statement { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.statement_kind() == Some(StatementErrorKind::UniqueViolation)
    }
}

/// Classification of engine-side statement failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementErrorKind {
    UniqueViolation,
    NotNullViolation,
    ForeignKeyViolation,
    CheckViolation,
    /// SQLITE_BUSY / SQLITE_LOCKED under contention.
    Busy,
    Other,
}

impl std::fmt::Display for StatementErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatementErrorKind::UniqueViolation => "unique violation",
            StatementErrorKind::NotNullViolation => "not-null violation",
            StatementErrorKind::ForeignKeyViolation => "foreign key violation",
            StatementErrorKind::CheckViolation => "check violation",
            StatementErrorKind::Busy => "database busy",
            StatementErrorKind::Other => "failed",
        };
        write!(f, "{s}")
    }
}

/// Caller-contract errors, detected while building the statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("invalid identifier '{0}': expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier(String),

    #[error("column '{0}' is reserved for the auto-assigned identity")]
    ReservedColumn(String),

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("invalid constraint '{constraint}' on column '{column}'")]
    InvalidConstraint { column: String, constraint: String },

    #[error("column '{0}' holds a non-finite real (NaN or infinity)")]
    NonFiniteReal(String),

    #[error("query text holds more than one statement")]
    MultipleStatements,

    #[error("update requires at least one column to set")]
    EmptySetClause,

    #[error("update requires at least one predicate column")]
    EmptyPredicate,

    #[error("refusing to delete every row of '{0}' without an explicit all-rows filter")]
    UnconfirmedDeleteAll(String),
}
