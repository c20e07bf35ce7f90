//! CASE expression rendering.

use super::{Scope, SqlCompiler};
use crate::context::CompileContext;
use crate::error::CompileError;
use crate::types::{CaseExpression, CaseInput, CaseValue};

impl SqlCompiler<'_> {
    pub(crate) fn compile_case(
        &self,
        case: &CaseExpression,
        scope: &Scope,
        ctx: &mut CompileContext,
        top_level: bool,
    ) -> Result<String, CompileError> {
        if case.whens.is_empty() {
            return Err(CompileError::structure("CASE expression has no WHEN clauses"));
        }

        let mut sql = String::from("CASE");
        for clause in &case.whens {
            sql.push_str(" WHEN ");
            match &clause.when {
                CaseInput::Predicates(items) => {
                    if items.is_empty() {
                        return Err(CompileError::structure("WHEN clause has no predicates"));
                    }
                    sql.push_str(&self.compile_predicates(items, "", scope, ctx)?);
                }
                CaseInput::Value(value) => sql.push_str(&self.case_value(value, scope, ctx)?),
            }
            sql.push_str(" THEN ");
            sql.push_str(&self.case_value(&clause.then, scope, ctx)?);
        }

        if let Some(value) = &case.else_value {
            sql.push_str(" ELSE ");
            sql.push_str(&self.case_value(value, scope, ctx)?);
        }
        sql.push_str(" END");

        if top_level {
            if let Some(alias) = &case.alias {
                sql.push_str(" AS ");
                sql.push_str(&self.dialect.quote_identifier(alias));
            }
        }
        Ok(sql)
    }

    fn case_value(
        &self,
        value: &CaseValue,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        match value {
            CaseValue::Expression(expr) => self.compile_expression(expr, scope, ctx, false),
            CaseValue::Literal(literal) => self.inline_literal(literal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;
    use crate::metadata::MemoryMetadataCache;
    use crate::types::{ColumnReference, Literal, PredicateItem};

    fn compile(case: &CaseExpression) -> (String, usize) {
        let cache = MemoryMetadataCache::new();
        let compiler = SqlCompiler::new(&PostgresDialect, &cache);
        let mut ctx = CompileContext::new();
        let sql = compiler
            .compile_case(case, &Scope::default(), &mut ctx, true)
            .expect("case");
        (sql, ctx.parameters().len())
    }

    #[test]
    fn value_match_with_else_and_alias() {
        let case = CaseExpression::new()
            .when(
                CaseInput::Value(CaseValue::Expression(Box::new(
                    ColumnReference::bare("Status").expr(),
                ))),
                CaseValue::Literal(Literal::from("open")),
            )
            .otherwise(CaseValue::Literal(Literal::from("closed")))
            .with_alias("State");

        let (sql, params) = compile(&case);
        assert_eq!(
            sql,
            "CASE WHEN \"Status\" THEN 'open' ELSE 'closed' END AS \"State\""
        );
        assert_eq!(params, 0);
    }

    #[test]
    fn predicate_when_binds_parameters() {
        let case = CaseExpression::new().when(
            CaseInput::Predicates(vec![PredicateItem::from(
                ColumnReference::bare("Age").greater_than(30),
            )]),
            CaseValue::Literal(Literal::from("senior")),
        );

        let (sql, params) = compile(&case);
        assert_eq!(sql, "CASE WHEN \"Age\" > @Expr1 THEN 'senior' END");
        assert_eq!(params, 1);
    }

    #[test]
    fn empty_case_is_rejected() {
        let cache = MemoryMetadataCache::new();
        let compiler = SqlCompiler::new(&PostgresDialect, &cache);
        let mut ctx = CompileContext::new();
        let err = compiler
            .compile_case(&CaseExpression::new(), &Scope::default(), &mut ctx, false)
            .unwrap_err();
        assert!(matches!(err, CompileError::Structure(_)));
    }
}
