//! The query descriptor: one SELECT statement node, composable via
//! subqueries, joins, and set operations.
//!
//! Descriptors are built entirely by the caller and are read-only during
//! compilation. Scope state (which descriptor is currently being rendered
//! as a subquery) lives in the compiler's recursion, never on the node.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::{ColumnOwner, ColumnReference, Expression, PredicateItem};

/// Process-unique identity of a descriptor, matched against the compile
/// scope when qualifying column references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryId(u64);

impl QueryId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        QueryId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Schema-qualified source table name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableName {
    pub schema: Option<String>,
    pub name: String,
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

/// One joined source with its own ON-clause predicate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinItem {
    pub kind: JoinKind,
    pub query: QueryDescriptor,
    pub on_items: Vec<PredicateItem>,
}

/// Sort direction of an ORDER BY item. `Unspecified` renders as `DESC`
/// except for raw literals, which are trusted to carry their own direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Ascending,
    Descending,
    #[default]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderByItem {
    pub expr: Expression,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupByItem {
    pub expr: Expression,
}

/// Set-operation flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetOperationKind {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOperationKind {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SetOperationKind::Union => "UNION",
            SetOperationKind::UnionAll => "UNION ALL",
            SetOperationKind::Intersect => "INTERSECT",
            SetOperationKind::Except => "EXCEPT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOperationItem {
    pub kind: SetOperationKind,
    pub query: QueryDescriptor,
}

/// Quantifier applied when the descriptor is used as a predicate target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubqueryQuantifier {
    All,
    Any,
    Some,
}

impl SubqueryQuantifier {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SubqueryQuantifier::All => "ALL",
            SubqueryQuantifier::Any => "ANY",
            SubqueryQuantifier::Some => "SOME",
        }
    }
}

/// Pagination request. Exactly one mode applies at compile time, chosen by
/// priority: page/size, then top, then skip/take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
}

/// One SELECT statement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    id: QueryId,
    /// Metadata-cache key; defaults to the base table name.
    pub entity: Option<String>,
    /// Base source table. Ignored when `from_subquery` is set.
    pub table: Option<TableName>,
    pub from_subquery: Option<Box<QueryDescriptor>>,
    /// Explicit select list; empty means select-all unless `count_all` is set.
    pub select: Vec<Expression>,
    pub distinct: bool,
    pub count_all: bool,
    pub count_all_alias: Option<String>,
    pub joins: Vec<JoinItem>,
    pub where_items: Vec<PredicateItem>,
    pub group_by: Vec<GroupByItem>,
    pub with_rollup: bool,
    pub having_items: Vec<PredicateItem>,
    pub order_by: Vec<OrderByItem>,
    pub set_ops: Vec<SetOperationItem>,
    pub pagination: Pagination,
    pub join_alias: Option<String>,
    pub subquery_alias: Option<String>,
    pub quantifier: Option<SubqueryQuantifier>,
}

impl QueryDescriptor {
    /// A descriptor over a base table; the entity key defaults to the
    /// table name.
    pub fn new(table: impl Into<String>) -> Self {
        let name = table.into();
        Self {
            id: QueryId::fresh(),
            entity: Some(name.clone()),
            table: Some(TableName { schema: None, name }),
            from_subquery: None,
            select: Vec::new(),
            distinct: false,
            count_all: false,
            count_all_alias: None,
            joins: Vec::new(),
            where_items: Vec::new(),
            group_by: Vec::new(),
            with_rollup: false,
            having_items: Vec::new(),
            order_by: Vec::new(),
            set_ops: Vec::new(),
            pagination: Pagination::default(),
            join_alias: None,
            subquery_alias: None,
            quantifier: None,
        }
    }

    /// A descriptor whose source is another statement.
    pub fn from_query(inner: QueryDescriptor) -> Self {
        let mut descriptor = Self::new("");
        descriptor.entity = None;
        descriptor.table = None;
        descriptor.from_subquery = Some(Box::new(inner));
        descriptor
    }

    pub fn id(&self) -> QueryId {
        self.id
    }

    /// The alias context stamped onto columns created from this descriptor.
    ///
    /// Aliases are captured by value, so set `with_alias`/`as_subquery`
    /// before creating columns.
    pub fn owner(&self) -> ColumnOwner {
        ColumnOwner {
            query: self.id,
            entity: self.entity.clone(),
            join_alias: self.join_alias.clone(),
            subquery_alias: self.subquery_alias.clone(),
        }
    }

    /// A column reference owned by this descriptor.
    pub fn col(&self, name: impl Into<String>) -> ColumnReference {
        ColumnReference {
            owner: Some(self.owner()),
            name: name.into(),
            alias: None,
            distinct: false,
            data_type: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        if let Some(table) = &mut self.table {
            table.schema = Some(schema.into());
        }
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Sets the join alias used to qualify this query's columns.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.join_alias = Some(alias.into());
        self
    }

    /// Sets the alias this query carries when rendered as a subquery.
    pub fn as_subquery(mut self, alias: impl Into<String>) -> Self {
        self.subquery_alias = Some(alias.into());
        self
    }

    pub fn with_quantifier(mut self, quantifier: SubqueryQuantifier) -> Self {
        self.quantifier = Some(quantifier);
        self
    }

    pub fn select(mut self, exprs: impl IntoIterator<Item = Expression>) -> Self {
        self.select.extend(exprs);
        self
    }

    pub fn select_column(mut self, column: ColumnReference) -> Self {
        self.select.push(column.expr());
        self
    }

    pub fn with_distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn count_all(mut self) -> Self {
        self.count_all = true;
        self
    }

    pub fn count_all_as(mut self, alias: impl Into<String>) -> Self {
        self.count_all = true;
        self.count_all_alias = Some(alias.into());
        self
    }

    pub fn join(
        mut self,
        kind: JoinKind,
        query: QueryDescriptor,
        on_items: impl IntoIterator<Item = PredicateItem>,
    ) -> Self {
        self.joins.push(JoinItem {
            kind,
            query,
            on_items: on_items.into_iter().collect(),
        });
        self
    }

    pub fn inner_join(
        self,
        query: QueryDescriptor,
        on_items: impl IntoIterator<Item = PredicateItem>,
    ) -> Self {
        self.join(JoinKind::Inner, query, on_items)
    }

    pub fn left_join(
        self,
        query: QueryDescriptor,
        on_items: impl IntoIterator<Item = PredicateItem>,
    ) -> Self {
        self.join(JoinKind::Left, query, on_items)
    }

    pub fn with_where(mut self, items: impl IntoIterator<Item = PredicateItem>) -> Self {
        self.where_items.extend(items);
        self
    }

    pub fn with_having(mut self, items: impl IntoIterator<Item = PredicateItem>) -> Self {
        self.having_items.extend(items);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expression>) -> Self {
        self.group_by.push(GroupByItem { expr: expr.into() });
        self
    }

    pub fn rollup(mut self) -> Self {
        self.with_rollup = true;
        self
    }

    pub fn order_by(mut self, expr: impl Into<Expression>, direction: OrderDirection) -> Self {
        self.order_by.push(OrderByItem {
            expr: expr.into(),
            direction,
        });
        self
    }

    pub fn set_op(mut self, kind: SetOperationKind, query: QueryDescriptor) -> Self {
        self.set_ops.push(SetOperationItem { kind, query });
        self
    }

    pub fn union(self, query: QueryDescriptor) -> Self {
        self.set_op(SetOperationKind::Union, query)
    }

    pub fn union_all(self, query: QueryDescriptor) -> Self {
        self.set_op(SetOperationKind::UnionAll, query)
    }

    pub fn page(mut self, page_number: u64, page_size: u64) -> Self {
        self.pagination.page_number = Some(page_number);
        self.pagination.page_size = Some(page_size);
        self
    }

    pub fn top(mut self, top: u64) -> Self {
        self.pagination.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.pagination.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.pagination.take = Some(take);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = QueryDescriptor::new("A");
        let b = QueryDescriptor::new("B");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn columns_capture_alias_context() {
        let query = QueryDescriptor::new("Employees").with_alias("e");
        let column = query.col("Name");
        let owner = column.owner.expect("owner");
        assert_eq!(owner.query, query.id());
        assert_eq!(owner.join_alias.as_deref(), Some("e"));
        assert_eq!(owner.entity.as_deref(), Some("Employees"));
    }

    #[test]
    fn descriptor_serde_round_trip() {
        let query = QueryDescriptor::new("Employees")
            .with_alias("e")
            .select_column(QueryDescriptor::new("Employees").col("Name"))
            .page(2, 10);
        let json = serde_json::to_string(&query).expect("serialize");
        let back: QueryDescriptor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(query, back);
    }
}
