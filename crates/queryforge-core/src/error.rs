//! Error types for query compilation.
//!
//! The compiler validates descriptor shape as it walks the tree and fails
//! closed: an error is returned before any SQL text is handed to the caller,
//! never a partially emitted statement. There is no non-fatal issue channel;
//! a descriptor either compiles completely or not at all.

use thiserror::Error;

/// Errors that can occur while compiling a query descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The predicate list (or another part of the descriptor) has an invalid
    /// shape: unbalanced parentheses, a dangling conjunction, a comparison
    /// with neither a value nor a subquery nor a comparison column, an empty
    /// IN list, a BETWEEN without bounds, or a join without ON predicates.
    #[error("malformed query descriptor: {0}")]
    Structure(String),

    /// An operator, function, or type mapping the active dialect cannot
    /// render. Unrecognized kinds are never silently dropped.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// The column-metadata cache has no parameter prototype for this
    /// entity/column pair.
    #[error("unknown column `{column}` for entity `{entity}`")]
    UnknownColumn {
        /// Entity identifier used as the cache key.
        entity: String,
        /// Column name that missed the cache.
        column: String,
    },
}

impl CompileError {
    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperator(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = CompileError::UnknownColumn {
            entity: "Employees".into(),
            column: "Salery".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown column `Salery` for entity `Employees`"
        );
    }

    #[test]
    fn error_trait_object() {
        let err = CompileError::structure("unbalanced closing parenthesis");
        let _: &dyn std::error::Error = &err;
    }
}
