//! Expression dispatch and the identifier/alias resolver.

use super::{Scope, SqlCompiler};
use crate::context::CompileContext;
use crate::error::CompileError;
use crate::types::{ColumnReference, Expression, Literal};

impl SqlCompiler<'_> {
    /// Renders one expression node. `top_level` is true only for direct
    /// select-list usage, where `AS` aliases apply; nested operands never
    /// carry aliases.
    pub(crate) fn compile_expression(
        &self,
        expr: &Expression,
        scope: &Scope,
        ctx: &mut CompileContext,
        top_level: bool,
    ) -> Result<String, CompileError> {
        match expr {
            Expression::Raw(text) => Ok(text.clone()),
            Expression::Case(case) => self.compile_case(case, scope, ctx, top_level),
            Expression::Math(math) => {
                let mut sql = self.compile_math(math, scope, ctx)?;
                if top_level {
                    if let Some(alias) = &math.alias {
                        sql.push_str(" AS ");
                        sql.push_str(&self.dialect.quote_identifier(alias));
                    }
                }
                Ok(sql)
            }
            Expression::Subquery(sub) => {
                let inner = scope.entered(sub.id());
                let sql = self.compile_statement(sub, &inner, ctx)?;
                Ok(format!("({sql})"))
            }
            Expression::Column { column, functions } => {
                let mut sql = self.column_identifier(column, scope);
                if !functions.is_empty() {
                    // DISTINCT lands immediately inside the innermost
                    // function of the chain.
                    let base = if column.distinct {
                        format!("DISTINCT {sql}")
                    } else {
                        sql
                    };
                    sql = self.apply_function_chain(&base, functions)?;
                }
                if top_level {
                    if let Some(alias) = &column.alias {
                        sql.push_str(" AS ");
                        sql.push_str(&self.dialect.quote_identifier(alias));
                    }
                }
                Ok(sql)
            }
        }
    }

    /// Quoted, correctly qualified column reference.
    ///
    /// No owner or no join alias: bare. Owner currently rendered as a
    /// subquery: its own join alias. Otherwise the subquery alias wins
    /// over the join alias.
    pub(crate) fn column_identifier(&self, column: &ColumnReference, scope: &Scope) -> String {
        let quoted = self.dialect.quote_identifier(&column.name);
        let Some(owner) = &column.owner else {
            return quoted;
        };
        if scope.is_unqualified(owner.query) {
            return quoted;
        }
        let Some(join_alias) = &owner.join_alias else {
            return quoted;
        };
        let qualifier = if scope.is_rendering(owner.query) {
            join_alias
        } else {
            owner.subquery_alias.as_ref().unwrap_or(join_alias)
        };
        format!("{qualifier}.{quoted}")
    }

    /// Inlines a scalar literal: strings and dates through the dialect,
    /// numbers and booleans verbatim. Collections are only valid inside
    /// IN lists.
    pub(crate) fn inline_literal(&self, literal: &Literal) -> Result<String, CompileError> {
        Ok(match literal {
            Literal::String(value) => self.dialect.quote_string(value),
            Literal::Int(value) => value.to_string(),
            Literal::Float(value) => value.to_string(),
            Literal::Bool(value) => self.dialect.boolean_literal(*value).to_owned(),
            Literal::Date(value) => self.dialect.date_literal(value),
            Literal::Collection(_) => {
                return Err(CompileError::structure(
                    "collection literal outside an IN list",
                ))
            }
        })
    }
}
