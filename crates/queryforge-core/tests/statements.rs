//! Whole-statement golden tests: clause ordering, joins, subqueries, set
//! operations, and pagination.

mod common;

use common::compile;
use queryforge_core::types::{Expression, OrderDirection, SetOperationKind};
use queryforge_core::QueryDescriptor;

#[test]
fn join_with_filter() {
    let employees = QueryDescriptor::new("Employees").with_alias("e");
    let orders = QueryDescriptor::new("Orders").with_alias("o");
    let employee_id = orders.col("EmployeeId");
    let id = employees.col("Id");
    let name = employees.col("Name");
    let total = orders.col("Total");

    let query = employees
        .select_column(name)
        .select_column(total.clone())
        .inner_join(orders, [employee_id.equal_column(id).into()])
        .with_where([total.greater_than(100).into()]);

    let compiled = compile(&query);
    assert_eq!(
        compiled.sql,
        "SELECT e.\"Name\", o.\"Total\" FROM \"Employees\" e \
         INNER JOIN \"Orders\" o ON o.\"EmployeeId\" = e.\"Id\" \
         WHERE o.\"Total\" > @Total1"
    );
    assert_eq!(compiled.parameters.len(), 1);
    assert_eq!(compiled.parameters[0].name, "@Total1");
}

#[test]
fn left_join_keyword() {
    let employees = QueryDescriptor::new("Employees").with_alias("e");
    let orders = QueryDescriptor::new("Orders").with_alias("o");
    let on = orders.col("EmployeeId").equal_column(employees.col("Id"));

    let query = employees.left_join(orders, [on.into()]);
    assert!(compile(&query).sql.contains(" LEFT JOIN \"Orders\" o ON "));
}

#[test]
fn from_subquery_with_alias() {
    let inner = QueryDescriptor::new("Employees").as_subquery("src");
    let name = inner.col("Name");
    let inner = inner.select_column(name);
    let outer = QueryDescriptor::from_query(inner)
        .select_column(queryforge_core::ColumnReference::bare("Name"));

    assert_eq!(
        compile(&outer).sql,
        "SELECT \"Name\" FROM (SELECT \"Name\" FROM \"Employees\") AS \"src\""
    );
}

#[test]
fn scalar_subquery_column_qualifies_against_the_outer_query() {
    let employees = QueryDescriptor::new("Employees").with_alias("e");
    let orders = QueryDescriptor::new("Orders")
        .with_alias("o")
        .as_subquery("OrderCount");
    let on = orders.col("EmployeeId").equal_column(employees.col("Id"));
    let orders = orders.count_all().with_where([on.into()]);
    let name = employees.col("Name");

    let query = employees
        .select_column(name)
        .select([Expression::Subquery(Box::new(orders))]);

    assert_eq!(
        compile(&query).sql,
        "SELECT e.\"Name\", (SELECT COUNT(*) FROM \"Orders\" o \
         WHERE o.\"EmployeeId\" = e.\"Id\") AS \"OrderCount\" \
         FROM \"Employees\" e"
    );
}

#[test]
fn union_clears_order_by_qualification() {
    let current = QueryDescriptor::new("Employees").with_alias("e");
    let name = current.col("Name");
    let archived = QueryDescriptor::new("Archive");
    let archived_name = archived.col("Name");
    let archived = archived.select_column(archived_name);

    let query = current
        .select_column(name.clone())
        .set_op(SetOperationKind::Union, archived)
        .order_by(name, OrderDirection::Ascending);

    assert_eq!(
        compile(&query).sql,
        "SELECT e.\"Name\" FROM \"Employees\" e \
         UNION SELECT \"Name\" FROM \"Archive\" \
         ORDER BY \"Name\" ASC"
    );
}

#[test]
fn order_by_defaults_to_descending() {
    let employees = QueryDescriptor::new("Employees");
    let query = employees
        .clone()
        .order_by(employees.col("Age"), OrderDirection::Unspecified);
    assert!(compile(&query).sql.ends_with(" ORDER BY \"Age\" DESC"));
}

#[test]
fn raw_order_item_carries_its_own_direction() {
    let query = QueryDescriptor::new("Employees").order_by(
        Expression::raw("<\"Age\" ASC NULLS LAST>"),
        OrderDirection::Unspecified,
    );
    assert!(compile(&query)
        .sql
        .ends_with(" ORDER BY \"Age\" ASC NULLS LAST"));
}

#[test]
fn raw_select_column_passes_through_unquoted() {
    let query = QueryDescriptor::new("T").select([Expression::raw("<foo.bar>")]);
    let compiled = compile(&query);
    assert_eq!(compiled.sql, "SELECT foo.bar FROM \"T\"");
    assert!(compiled.parameters.is_empty());
}

#[test]
fn distinct_select_list() {
    let employees = QueryDescriptor::new("Employees");
    let query = employees
        .clone()
        .with_distinct()
        .select_column(employees.col("Name"));
    assert_eq!(
        compile(&query).sql,
        "SELECT DISTINCT \"Name\" FROM \"Employees\""
    );
}

#[test]
fn having_follows_group_by() {
    let orders = QueryDescriptor::new("Orders");
    let employee_id = orders.col("EmployeeId");
    let total = orders.col("Total");
    let query = orders
        .select_column(employee_id.clone())
        .group_by(employee_id)
        .with_having([total
            .clone()
            .greater_than(1000)
            .apply(queryforge_core::types::ScalarFunctionCall::Sum)
            .into()]);

    assert_eq!(
        compile(&query).sql,
        "SELECT \"EmployeeId\" FROM \"Orders\" \
         GROUP BY \"EmployeeId\" HAVING SUM(\"Total\") > @Total1"
    );
}

#[test]
fn page_and_size_compute_the_offset() {
    let query = QueryDescriptor::new("Employees").page(3, 20);
    assert!(compile(&query).sql.ends_with(" LIMIT 20 OFFSET 40"));
}

#[test]
fn quantified_comparison_against_a_subquery() {
    use queryforge_core::types::{compare_query, ComparisonOperator, SubqueryQuantifier};

    let employees = QueryDescriptor::new("Employees");
    let salary = employees.col("Salary");
    let sub = QueryDescriptor::new("Orders").with_quantifier(SubqueryQuantifier::All);
    let sub_total = sub.col("Total");
    let sub = sub.select_column(sub_total);

    let query = employees.with_where([compare_query(
        salary,
        ComparisonOperator::GreaterOrEqual,
        sub,
    )
    .into()]);

    assert_eq!(
        compile(&query).sql,
        "SELECT * FROM \"Employees\" \
         WHERE \"Salary\" >= ALL (SELECT \"Total\" FROM \"Orders\")"
    );
}
