//! The query-descriptor model: the abstract, dialect-independent input of
//! the compiler. Built and owned by the caller; read-only during compilation.

mod expr;
mod literal;
mod predicate;
mod query;

pub use expr::{
    CaseClause, CaseExpression, CaseInput, CaseValue, CastType, ColumnOwner, ColumnReference,
    ColumnType, Expression, MathExpression, MathOperand, MathOperator, ScalarFunctionCall,
};
pub use literal::Literal;
pub use predicate::{
    compare_query, exists, not_exists, ComparisonOperator, Conjunction, Predicate, PredicateItem,
};
pub use query::{
    GroupByItem, JoinItem, JoinKind, OrderByItem, OrderDirection, Pagination, QueryDescriptor,
    QueryId, SetOperationItem, SetOperationKind, SubqueryQuantifier, TableName,
};
