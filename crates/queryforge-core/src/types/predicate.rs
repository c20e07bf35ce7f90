//! The flat infix predicate model for WHERE/HAVING/ON clauses.
//!
//! A clause is a `Vec<PredicateItem>`: parentheses, conjunctions, raw
//! fragments, and comparisons in source order. The compiler renders the
//! list in a single left-to-right pass; shape validation happens during
//! that same pass.

use serde::{Deserialize, Serialize};

use super::{
    ColumnReference, Literal, MathExpression, QueryDescriptor, ScalarFunctionCall,
};

/// Boolean connective between predicate terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Conjunction {
    And,
    Or,
    AndNot,
    OrNot,
}

impl Conjunction {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
            Conjunction::AndNot => " AND NOT ",
            Conjunction::OrNot => " OR NOT ",
        }
    }
}

/// Comparison operator of a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Like,
    NotLike,
    Contains,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Between,
    Exists,
    NotExists,
}

/// One comparison in a predicate list.
///
/// The subject is the `column` (wrapped by `functions`), or `math` when the
/// left-hand side is a computed expression. The target is, in order of
/// precedence, `comparison_column`, `subquery`, or a freshly bound parameter
/// carrying `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    pub column: Option<ColumnReference>,
    pub math: Option<MathExpression>,
    /// Scalar-function chain applied to the subject, outermost first.
    pub functions: Vec<ScalarFunctionCall>,
    pub operator: ComparisonOperator,
    pub value: Option<Literal>,
    /// Inlined IN/NOT IN elements.
    pub values: Vec<Literal>,
    pub subquery: Option<Box<QueryDescriptor>>,
    pub comparison_column: Option<ColumnReference>,
    /// High side of a column-bounded BETWEEN.
    pub comparison_column2: Option<ColumnReference>,
    pub between_low: Option<Literal>,
    pub between_high: Option<Literal>,
    /// When true the subject is emitted before the target.
    pub operand_first: bool,
    pub like_escape: Option<char>,
}

impl Predicate {
    fn new(column: Option<ColumnReference>, operator: ComparisonOperator) -> Self {
        Self {
            column,
            math: None,
            functions: Vec::new(),
            operator,
            value: None,
            values: Vec::new(),
            subquery: None,
            comparison_column: None,
            comparison_column2: None,
            between_low: None,
            between_high: None,
            operand_first: true,
            like_escape: None,
        }
    }

    /// Applies a scalar function to the subject, outermost first.
    pub fn apply(mut self, function: ScalarFunctionCall) -> Self {
        self.functions.push(function);
        self
    }

    /// Emits the target before the subject.
    pub fn target_first(mut self) -> Self {
        self.operand_first = false;
        self
    }

    /// Replaces the subject with a computed math expression.
    pub fn over_math(mut self, math: MathExpression) -> Self {
        self.math = Some(math);
        self
    }
}

/// A predicate with a subquery target, e.g. `"id" = ANY (SELECT ...)`.
pub fn compare_query(
    column: ColumnReference,
    operator: ComparisonOperator,
    query: QueryDescriptor,
) -> Predicate {
    let mut predicate = Predicate::new(Some(column), operator);
    predicate.subquery = Some(Box::new(query));
    predicate
}

/// `EXISTS (SELECT ...)`.
pub fn exists(query: QueryDescriptor) -> Predicate {
    let mut predicate = Predicate::new(None, ComparisonOperator::Exists);
    predicate.subquery = Some(Box::new(query));
    predicate
}

/// `NOT EXISTS (SELECT ...)`.
pub fn not_exists(query: QueryDescriptor) -> Predicate {
    let mut predicate = Predicate::new(None, ComparisonOperator::NotExists);
    predicate.subquery = Some(Box::new(query));
    predicate
}

macro_rules! value_comparison {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $name(self, value: impl Into<Literal>) -> Predicate {
            let mut predicate = Predicate::new(Some(self), ComparisonOperator::$op);
            predicate.value = Some(value.into());
            predicate
        }
    };
}

macro_rules! column_comparison {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $name(self, other: ColumnReference) -> Predicate {
            let mut predicate = Predicate::new(Some(self), ComparisonOperator::$op);
            predicate.comparison_column = Some(other);
            predicate
        }
    };
}

impl ColumnReference {
    value_comparison!(equal, Equal);
    value_comparison!(not_equal, NotEqual);
    value_comparison!(greater_than, GreaterThan);
    value_comparison!(greater_or_equal, GreaterOrEqual);
    value_comparison!(less_than, LessThan);
    value_comparison!(less_or_equal, LessOrEqual);

    column_comparison!(
        /// Column-to-column equality; binds no parameter.
        equal_column,
        Equal
    );
    column_comparison!(not_equal_column, NotEqual);
    column_comparison!(greater_than_column, GreaterThan);
    column_comparison!(less_than_column, LessThan);

    pub fn like(self, pattern: impl Into<Literal>) -> Predicate {
        let mut predicate = Predicate::new(Some(self), ComparisonOperator::Like);
        predicate.value = Some(pattern.into());
        predicate
    }

    pub fn like_escaped(self, pattern: impl Into<Literal>, escape: char) -> Predicate {
        let mut predicate = self.like(pattern);
        predicate.like_escape = Some(escape);
        predicate
    }

    pub fn not_like(self, pattern: impl Into<Literal>) -> Predicate {
        let mut predicate = Predicate::new(Some(self), ComparisonOperator::NotLike);
        predicate.value = Some(pattern.into());
        predicate
    }

    pub fn not_like_escaped(self, pattern: impl Into<Literal>, escape: char) -> Predicate {
        let mut predicate = self.not_like(pattern);
        predicate.like_escape = Some(escape);
        predicate
    }

    /// Full-text `CONTAINS(column, term)`.
    pub fn contains(self, term: impl Into<Literal>) -> Predicate {
        let mut predicate = Predicate::new(Some(self), ComparisonOperator::Contains);
        predicate.value = Some(term.into());
        predicate
    }

    pub fn is_null(self) -> Predicate {
        Predicate::new(Some(self), ComparisonOperator::IsNull)
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate::new(Some(self), ComparisonOperator::IsNotNull)
    }

    /// `IN (...)` over inlined literals; binds no parameter.
    pub fn in_values<I, L>(self, values: I) -> Predicate
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        let mut predicate = Predicate::new(Some(self), ComparisonOperator::In);
        predicate.values = values.into_iter().map(Into::into).collect();
        predicate
    }

    pub fn not_in_values<I, L>(self, values: I) -> Predicate
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        let mut predicate = Predicate::new(Some(self), ComparisonOperator::NotIn);
        predicate.values = values.into_iter().map(Into::into).collect();
        predicate
    }

    /// `IN (SELECT ...)`; binds no parameter.
    pub fn in_query(self, query: QueryDescriptor) -> Predicate {
        compare_query(self, ComparisonOperator::In, query)
    }

    pub fn not_in_query(self, query: QueryDescriptor) -> Predicate {
        compare_query(self, ComparisonOperator::NotIn, query)
    }

    /// `BETWEEN low AND high` with both bounds bound as parameters.
    pub fn between(self, low: impl Into<Literal>, high: impl Into<Literal>) -> Predicate {
        let mut predicate = Predicate::new(Some(self), ComparisonOperator::Between);
        predicate.between_low = Some(low.into());
        predicate.between_high = Some(high.into());
        predicate
    }

    /// `BETWEEN low AND "column"` with only the low bound parameterized.
    pub fn between_column(self, low: impl Into<Literal>, high: ColumnReference) -> Predicate {
        let mut predicate = Predicate::new(Some(self), ComparisonOperator::Between);
        predicate.between_low = Some(low.into());
        predicate.comparison_column2 = Some(high);
        predicate
    }
}

/// A token in a flat infix predicate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PredicateItem {
    OpenParen,
    CloseParen,
    Conjunction(Conjunction),
    /// Verbatim SQL fragment, emitted as-is.
    Raw(String),
    Predicate(Predicate),
}

impl PredicateItem {
    pub fn open() -> Self {
        PredicateItem::OpenParen
    }

    pub fn close() -> Self {
        PredicateItem::CloseParen
    }

    pub fn and() -> Self {
        PredicateItem::Conjunction(Conjunction::And)
    }

    pub fn or() -> Self {
        PredicateItem::Conjunction(Conjunction::Or)
    }

    pub fn and_not() -> Self {
        PredicateItem::Conjunction(Conjunction::AndNot)
    }

    pub fn or_not() -> Self {
        PredicateItem::Conjunction(Conjunction::OrNot)
    }

    pub fn raw(text: impl Into<String>) -> Self {
        PredicateItem::Raw(text.into())
    }
}

impl From<Predicate> for PredicateItem {
    fn from(predicate: Predicate) -> Self {
        PredicateItem::Predicate(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let predicate = ColumnReference::bare("Age").greater_than(21);
        assert_eq!(predicate.operator, ComparisonOperator::GreaterThan);
        assert_eq!(predicate.value, Some(Literal::Int(21)));
        assert!(predicate.operand_first);
        assert!(predicate.functions.is_empty());
    }

    #[test]
    fn between_holds_both_bounds() {
        let predicate = ColumnReference::bare("Age").between(1, 10);
        assert_eq!(predicate.between_low, Some(Literal::Int(1)));
        assert_eq!(predicate.between_high, Some(Literal::Int(10)));
        assert!(predicate.comparison_column2.is_none());
    }
}
