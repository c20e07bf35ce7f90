//! Predicate rendering through whole statements: operator tokens,
//! parameter naming, and shape validation.

mod common;

use common::{compile, try_compile};
use queryforge_core::types::ScalarFunctionCall;
use queryforge_core::{ColumnReference, CompileError, Predicate, PredicateItem, QueryDescriptor};
use rstest::rstest;

fn where_sql(predicate: Predicate) -> String {
    let query = QueryDescriptor::new("Employees").with_where([predicate.into()]);
    let compiled = compile(&query);
    compiled
        .sql
        .split(" WHERE ")
        .nth(1)
        .expect("statement has a WHERE clause")
        .to_owned()
}

#[rstest]
#[case(ColumnReference::bare("age").equal(30), "\"age\" = @Expr1")]
#[case(ColumnReference::bare("age").not_equal(30), "\"age\" <> @Expr1")]
#[case(ColumnReference::bare("age").greater_than(30), "\"age\" > @Expr1")]
#[case(ColumnReference::bare("age").greater_or_equal(30), "\"age\" >= @Expr1")]
#[case(ColumnReference::bare("age").less_than(30), "\"age\" < @Expr1")]
#[case(ColumnReference::bare("age").less_or_equal(30), "\"age\" <= @Expr1")]
#[case(ColumnReference::bare("name").like("A%"), "\"name\" LIKE @Expr1")]
#[case(ColumnReference::bare("name").not_like("A%"), "\"name\" NOT LIKE @Expr1")]
#[case(ColumnReference::bare("name").is_null(), "\"name\" IS NULL")]
#[case(ColumnReference::bare("name").is_not_null(), "\"name\" IS NOT NULL")]
fn operator_tokens(#[case] predicate: Predicate, #[case] expected: &str) {
    assert_eq!(where_sql(predicate), expected);
}

#[test]
fn between_binds_two_generic_parameters() {
    let query = QueryDescriptor::new("Employees")
        .with_where([ColumnReference::bare("age").between(1, 10).into()]);
    let compiled = compile(&query);

    assert!(compiled.sql.ends_with("WHERE \"age\" BETWEEN @p1 AND @p2"));
    let values: Vec<_> = compiled
        .parameters
        .iter()
        .map(|parameter| parameter.value.clone())
        .collect();
    assert_eq!(
        values,
        vec![
            queryforge_core::Literal::Int(1),
            queryforge_core::Literal::Int(10)
        ]
    );
}

#[test]
fn in_lists_render_inline() {
    assert_eq!(
        where_sql(ColumnReference::bare("id").in_values([1, 2, 3])),
        "\"id\" IN (1,2,3)"
    );
    assert_eq!(
        where_sql(ColumnReference::bare("name").in_values(["a", "b"])),
        "\"name\" IN ('a','b')"
    );
    assert_eq!(
        where_sql(ColumnReference::bare("id").not_in_values([1])),
        "\"id\" NOT IN (1)"
    );
}

#[test]
fn in_subquery_target() {
    let sub = QueryDescriptor::new("Orders");
    let employee_id = sub.col("EmployeeId");
    let sub = sub.select_column(employee_id);

    let employees = QueryDescriptor::new("Employees");
    let id = employees.col("Id");
    let query = employees.with_where([id.in_query(sub).into()]);

    assert_eq!(
        compile(&query).sql,
        "SELECT * FROM \"Employees\" \
         WHERE \"Id\" IN (SELECT \"EmployeeId\" FROM \"Orders\")"
    );
}

#[test]
fn function_chain_on_the_subject() {
    let predicate = ColumnReference::bare("x")
        .equal("Y")
        .apply(ScalarFunctionCall::ToUpper)
        .apply(ScalarFunctionCall::Trim);
    assert_eq!(where_sql(predicate), "UPPER(LTRIM(RTRIM(\"x\"))) = @Expr1");
}

#[test]
fn raw_where_fragment_passes_through_verbatim() {
    let query = QueryDescriptor::new("Employees")
        .with_where([PredicateItem::raw("\"a\" = \"b\"")]);
    assert!(compile(&query).sql.ends_with("WHERE \"a\" = \"b\""));
}

#[test]
fn metadata_backed_names_use_the_prototype_stem() {
    let employees = QueryDescriptor::new("Employees");
    let age = employees.col("Age");
    let name = employees.col("Name");
    let query = employees.with_where([
        age.greater_than(21).into(),
        PredicateItem::and(),
        name.like("A%").into(),
    ]);

    let compiled = compile(&query);
    assert!(compiled
        .sql
        .ends_with("WHERE \"Age\" > @Age1 AND \"Name\" LIKE @Name2"));
    assert_eq!(compiled.parameters[0].name, "@Age1");
    assert_eq!(compiled.parameters[1].name, "@Name2");
    assert!(compiled.parameters[1].force_string);
}

#[test]
fn unknown_column_fails_the_compile() {
    let employees = QueryDescriptor::new("Employees");
    let typo = employees.col("Salery");
    let query = employees.with_where([typo.equal(1).into()]);

    assert_eq!(
        try_compile(&query).unwrap_err(),
        CompileError::UnknownColumn {
            entity: "Employees".into(),
            column: "Salery".into(),
        }
    );
}

#[rstest]
#[case::dangling_conjunction(vec![
    PredicateItem::from(ColumnReference::bare("a").equal(1)),
    PredicateItem::and(),
])]
#[case::unclosed_paren(vec![
    PredicateItem::open(),
    ColumnReference::bare("a").equal(1).into(),
])]
#[case::stray_close(vec![
    ColumnReference::bare("a").equal(1).into(),
    PredicateItem::close(),
])]
#[case::empty_group(vec![PredicateItem::open(), PredicateItem::close()])]
#[case::leading_conjunction(vec![
    PredicateItem::or(),
    ColumnReference::bare("a").equal(1).into(),
])]
fn malformed_clauses_fail_closed(#[case] items: Vec<PredicateItem>) {
    let query = QueryDescriptor::new("Employees").with_where(items);
    assert!(matches!(
        try_compile(&query),
        Err(CompileError::Structure(_))
    ));
}
