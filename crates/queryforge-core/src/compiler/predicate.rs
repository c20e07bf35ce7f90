//! Predicate-list rendering and parameter binding.
//!
//! Clauses arrive as flat infix token lists. The renderer walks the list
//! once, validating shape as it goes: parentheses must balance, terms must
//! be joined by conjunctions, and a clause cannot end on a dangling
//! conjunction. Any violation aborts the compile before SQL is produced.

use super::{Scope, SqlCompiler};
use crate::context::{BoundParameter, CompileContext};
use crate::error::CompileError;
use crate::metadata::ProviderType;
use crate::types::{
    ColumnReference, ComparisonOperator, Literal, Predicate, PredicateItem, QueryDescriptor,
};

/// Last token class seen by the shape validator.
#[derive(Clone, Copy, PartialEq)]
enum Prev {
    Start,
    Open,
    Close,
    Conjunction,
    Term,
}

impl SqlCompiler<'_> {
    /// Renders a predicate list prefixed by `prefix` (e.g. `" WHERE "`),
    /// or an empty string when the list is empty.
    pub(crate) fn compile_predicates(
        &self,
        items: &[PredicateItem],
        prefix: &str,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        if items.is_empty() {
            return Ok(String::new());
        }

        let mut sql = String::from(prefix);
        let mut depth: u32 = 0;
        let mut prev = Prev::Start;

        for item in items {
            match item {
                PredicateItem::OpenParen => {
                    if matches!(prev, Prev::Close | Prev::Term) {
                        return Err(CompileError::structure(
                            "opening parenthesis directly after a term",
                        ));
                    }
                    depth += 1;
                    sql.push('(');
                    prev = Prev::Open;
                }
                PredicateItem::CloseParen => {
                    if depth == 0 {
                        return Err(CompileError::structure("unbalanced closing parenthesis"));
                    }
                    if !matches!(prev, Prev::Close | Prev::Term) {
                        return Err(CompileError::structure("empty parenthesized group"));
                    }
                    depth -= 1;
                    sql.push(')');
                    prev = Prev::Close;
                }
                PredicateItem::Conjunction(conjunction) => {
                    if !matches!(prev, Prev::Close | Prev::Term) {
                        return Err(CompileError::structure(
                            "conjunction without a preceding term",
                        ));
                    }
                    sql.push_str(conjunction.sql());
                    prev = Prev::Conjunction;
                }
                PredicateItem::Raw(text) => {
                    if matches!(prev, Prev::Close | Prev::Term) {
                        return Err(CompileError::structure("terms must be joined by a conjunction"));
                    }
                    sql.push_str(text);
                    prev = Prev::Term;
                }
                PredicateItem::Predicate(predicate) => {
                    if matches!(prev, Prev::Close | Prev::Term) {
                        return Err(CompileError::structure("terms must be joined by a conjunction"));
                    }
                    sql.push_str(&self.compile_predicate(predicate, scope, ctx)?);
                    prev = Prev::Term;
                }
            }
        }

        if depth != 0 {
            return Err(CompileError::structure("unclosed parenthesis"));
        }
        if !matches!(prev, Prev::Close | Prev::Term) {
            return Err(CompileError::structure("clause ends on a dangling token"));
        }
        Ok(sql)
    }

    fn compile_predicate(
        &self,
        predicate: &Predicate,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        match predicate.operator {
            ComparisonOperator::Exists | ComparisonOperator::NotExists => {
                let sub = predicate.subquery.as_deref().ok_or_else(|| {
                    CompileError::structure("EXISTS predicate without a subquery")
                })?;
                let not = if predicate.operator == ComparisonOperator::NotExists {
                    "NOT "
                } else {
                    ""
                };
                Ok(format!("{not}EXISTS {}", self.subquery_target(sub, scope, ctx)?))
            }
            ComparisonOperator::IsNull => {
                Ok(format!("{} IS NULL", self.predicate_subject(predicate, scope, ctx)?))
            }
            ComparisonOperator::IsNotNull => Ok(format!(
                "{} IS NOT NULL",
                self.predicate_subject(predicate, scope, ctx)?
            )),
            ComparisonOperator::In | ComparisonOperator::NotIn => {
                let subject = self.predicate_subject(predicate, scope, ctx)?;
                let not = if predicate.operator == ComparisonOperator::NotIn {
                    "NOT "
                } else {
                    ""
                };
                let target = if let Some(sub) = predicate.subquery.as_deref() {
                    self.subquery_target(sub, scope, ctx)?
                } else if !predicate.values.is_empty() {
                    self.inline_values(&predicate.values)?
                } else {
                    return Err(CompileError::structure(
                        "IN predicate has neither values nor a subquery",
                    ));
                };
                Ok(format!("{subject} {not}IN {target}"))
            }
            ComparisonOperator::Between => {
                let subject = self.predicate_subject(predicate, scope, ctx)?;
                let low = predicate.between_low.clone().ok_or_else(|| {
                    CompileError::structure("BETWEEN predicate without a low bound")
                })?;
                let low = self.bind_generic(low, ctx);
                let high = if let Some(column) = &predicate.comparison_column2 {
                    self.dialect.quote_identifier(&column.name)
                } else if let Some(high) = predicate.between_high.clone() {
                    self.bind_generic(high, ctx)
                } else {
                    return Err(CompileError::structure(
                        "BETWEEN predicate without a high bound",
                    ));
                };
                Ok(format!("{subject} BETWEEN {low} AND {high}"))
            }
            ComparisonOperator::Contains => {
                let subject = self.predicate_subject(predicate, scope, ctx)?;
                let value = predicate.value.clone().ok_or_else(|| {
                    CompileError::structure("CONTAINS predicate without a search term")
                })?;
                let parameter =
                    self.bind_parameter(predicate.column.as_ref(), value, true, ctx)?;
                Ok(format!("CONTAINS({subject}, {parameter})"))
            }
            ComparisonOperator::Like | ComparisonOperator::NotLike => {
                let subject = self.predicate_subject(predicate, scope, ctx)?;
                let not = if predicate.operator == ComparisonOperator::NotLike {
                    "NOT "
                } else {
                    ""
                };
                let target = if let Some(column) = &predicate.comparison_column {
                    self.column_identifier(column, scope)
                } else {
                    let value = predicate.value.clone().ok_or_else(|| {
                        CompileError::structure("LIKE predicate without a pattern")
                    })?;
                    self.bind_parameter(predicate.column.as_ref(), value, true, ctx)?
                };
                let mut sql = format!("{subject} {not}LIKE {target}");
                if let Some(escape) = predicate.like_escape {
                    sql.push_str(&format!(" ESCAPE '{escape}'"));
                }
                Ok(sql)
            }
            ComparisonOperator::Equal
            | ComparisonOperator::NotEqual
            | ComparisonOperator::GreaterThan
            | ComparisonOperator::GreaterOrEqual
            | ComparisonOperator::LessThan
            | ComparisonOperator::LessOrEqual => {
                let subject = self.predicate_subject(predicate, scope, ctx)?;
                let target = self.comparison_target(predicate, scope, ctx)?;
                let operator = match predicate.operator {
                    ComparisonOperator::Equal => " = ",
                    ComparisonOperator::NotEqual => " <> ",
                    ComparisonOperator::GreaterThan => " > ",
                    ComparisonOperator::GreaterOrEqual => " >= ",
                    ComparisonOperator::LessThan => " < ",
                    _ => " <= ",
                };
                Ok(if predicate.operand_first {
                    format!("{subject}{operator}{target}")
                } else {
                    format!("{target}{operator}{subject}")
                })
            }
        }
    }

    /// Left-hand side of a comparison: the math expression or the column
    /// identifier, wrapped by the predicate's function chain.
    fn predicate_subject(
        &self,
        predicate: &Predicate,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let base = if let Some(math) = &predicate.math {
            self.compile_math(math, scope, ctx)?
        } else if let Some(column) = &predicate.column {
            self.column_identifier(column, scope)
        } else {
            return Err(CompileError::structure(
                "comparison has no subject column or expression",
            ));
        };
        if predicate.functions.is_empty() {
            Ok(base)
        } else {
            self.apply_function_chain(&base, &predicate.functions)
        }
    }

    /// Right-hand side of a plain comparison, by precedence: comparison
    /// column, subquery, then a freshly bound parameter.
    fn comparison_target(
        &self,
        predicate: &Predicate,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        if let Some(column) = &predicate.comparison_column {
            return Ok(self.column_identifier(column, scope));
        }
        if let Some(sub) = predicate.subquery.as_deref() {
            return self.subquery_target(sub, scope, ctx);
        }
        if let Some(value) = predicate.value.clone() {
            return self.bind_parameter(predicate.column.as_ref(), value, false, ctx);
        }
        Err(CompileError::structure(
            "comparison has neither a value, a subquery, nor a comparison column",
        ))
    }

    fn subquery_target(
        &self,
        sub: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let inner = scope.entered(sub.id());
        let sql = self.compile_statement(sub, &inner, ctx)?;
        Ok(match sub.quantifier {
            Some(quantifier) => format!("{} ({sql})", quantifier.keyword()),
            None => format!("({sql})"),
        })
    }

    /// Inlined IN-list elements. Collections flatten one level; anything
    /// nested deeper is malformed.
    fn inline_values(&self, values: &[Literal]) -> Result<String, CompileError> {
        let mut parts = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Literal::Collection(inner) => {
                    for element in inner {
                        if matches!(element, Literal::Collection(_)) {
                            return Err(CompileError::structure(
                                "nested collection inside an IN list",
                            ));
                        }
                        parts.push(self.inline_literal(element)?);
                    }
                }
                other => parts.push(self.inline_literal(other)?),
            }
        }
        Ok(format!("({})", parts.join(",")))
    }

    /// Binds one parameter for a comparison target. Column-backed subjects
    /// take their name stem and provider type from the metadata prototype;
    /// computed subjects fall back to the `Expr` stem with an unspecified
    /// type.
    fn bind_parameter(
        &self,
        column: Option<&ColumnReference>,
        value: Literal,
        force_string: bool,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let index = ctx.next_parameter_index();
        let marker = self.dialect.parameter_marker();

        let backing = column.and_then(|column| {
            let entity = column.owner.as_ref()?.entity.as_deref()?;
            Some((entity, column.name.as_str()))
        });
        let (name, provider_type) = match backing {
            Some((entity, column)) => {
                let prototype = self
                    .metadata
                    .parameter_prototype(entity, column)
                    .ok_or_else(|| CompileError::UnknownColumn {
                        entity: entity.to_owned(),
                        column: column.to_owned(),
                    })?;
                (
                    format!("{marker}{}{index}", prototype.name),
                    prototype.provider_type,
                )
            }
            None => (format!("{marker}Expr{index}"), ProviderType::Unspecified),
        };

        ctx.push(BoundParameter {
            name: name.clone(),
            value,
            provider_type,
            force_string,
        });
        Ok(name)
    }

    /// Binds a generically named parameter, as BETWEEN bounds require.
    fn bind_generic(&self, value: Literal, ctx: &mut CompileContext) -> String {
        let index = ctx.next_parameter_index();
        let name = format!("{}p{index}", self.dialect.parameter_marker());
        ctx.push(BoundParameter {
            name: name.clone(),
            value,
            provider_type: ProviderType::Unspecified,
            force_string: false,
        });
        name
    }
}
