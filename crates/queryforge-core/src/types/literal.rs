//! Literal values carried by the descriptor model.
//!
//! Literals appear as comparison values, IN-list elements, math operands,
//! and CASE branch results. The closed tagged union keeps the inlining
//! logic exhaustive: every variant has a defined rendering, and anything
//! the compiler cannot inline is a structure error rather than a silent
//! `to_string` of an arbitrary value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A typed literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Quoted with the dialect's string delimiters when inlined.
    String(String),
    /// Rendered verbatim.
    Int(i64),
    /// Rendered verbatim.
    Float(f64),
    /// Rendered with the dialect's boolean literal syntax.
    Bool(bool),
    /// Rendered as a dialect-formatted date literal.
    Date(NaiveDate),
    /// One level of nesting for IN lists; flattened during inlining.
    Collection(Vec<Literal>),
}

impl Literal {
    /// The broad type category, used by the string-concatenation special
    /// case in math expressions. Collections have no scalar category.
    pub fn column_type(&self) -> Option<super::ColumnType> {
        use super::ColumnType;
        match self {
            Literal::String(_) => Some(ColumnType::String),
            Literal::Int(_) | Literal::Float(_) => Some(ColumnType::Number),
            Literal::Bool(_) => Some(ColumnType::Boolean),
            Literal::Date(_) => Some(ColumnType::Date),
            Literal::Collection(_) => None,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(i64::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<NaiveDate> for Literal {
    fn from(value: NaiveDate) -> Self {
        Literal::Date(value)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(values: Vec<T>) -> Self {
        Literal::Collection(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    #[test]
    fn conversions() {
        assert_eq!(Literal::from("a"), Literal::String("a".into()));
        assert_eq!(Literal::from(7), Literal::Int(7));
        assert_eq!(
            Literal::from(vec![1, 2]),
            Literal::Collection(vec![Literal::Int(1), Literal::Int(2)])
        );
    }

    #[test]
    fn column_type_categories() {
        assert_eq!(Literal::from("a").column_type(), Some(ColumnType::String));
        assert_eq!(Literal::from(1.5).column_type(), Some(ColumnType::Number));
        assert_eq!(Literal::from(vec![1]).column_type(), None);
    }
}
