//! Statement assembly: the root compiler stage.
//!
//! Builds one full SELECT in the original provider's clause order —
//! select, from, joins, where, set operations, group by, having, order by,
//! pagination — recursing into nested descriptors for subqueries and set
//! operations.

use super::{Scope, SqlCompiler};
use crate::context::CompileContext;
use crate::error::CompileError;
use crate::types::{
    Expression, OrderDirection, Pagination, QueryDescriptor, TableName,
};

impl SqlCompiler<'_> {
    pub(crate) fn compile_statement(
        &self,
        query: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let select = self.select_clause(query, scope, ctx)?;
        let from = self.from_clause(query, scope, ctx)?;
        let joins = self.join_clause(query, scope, ctx)?;
        let where_sql = self.compile_predicates(&query.where_items, " WHERE ", scope, ctx)?;
        let set_ops = self.set_operation_clause(query, scope, ctx)?;
        let group_by = self.group_by_clause(query, scope, ctx)?;
        let having = self.compile_predicates(&query.having_items, " HAVING ", scope, ctx)?;
        let order_by = self.order_by_clause(query, scope, ctx)?;
        let pagination = self.pagination_clause(&query.pagination);

        Ok(format!(
            "SELECT {select} FROM {from}{joins}{where_sql}{set_ops}{group_by}{having}{order_by}{pagination}"
        ))
    }

    fn select_clause(
        &self,
        query: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let mut parts: Vec<String> = Vec::with_capacity(query.select.len() + 1);

        for expr in &query.select {
            match expr {
                Expression::Subquery(sub) => parts.push(self.scalar_subquery_column(sub, scope, ctx)?),
                Expression::Raw(text) => parts.push(text.clone()),
                other => parts.push(self.compile_expression(other, scope, ctx, true)?),
            }
        }

        if query.count_all {
            let mut count = String::from("COUNT(*)");
            if let Some(alias) = &query.count_all_alias {
                count.push_str(" AS ");
                count.push_str(&self.dialect.quote_identifier(alias));
            }
            parts.push(count);
        }

        let list = if parts.is_empty() {
            "*".to_owned()
        } else {
            parts.join(", ")
        };

        Ok(if query.distinct {
            format!("DISTINCT {list}")
        } else {
            list
        })
    }

    /// A nested statement used as a select column: `(SELECT ...) AS "a"`,
    /// or `alias.*` when the nested descriptor carries no subquery alias.
    fn scalar_subquery_column(
        &self,
        sub: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        match &sub.subquery_alias {
            None => Ok(match &sub.join_alias {
                Some(alias) => format!("{alias}.*"),
                None => "*".to_owned(),
            }),
            Some(alias) => {
                let inner = scope.entered(sub.id());
                let sql = self.compile_statement(sub, &inner, ctx)?;
                Ok(format!(
                    "({sql}) AS {}",
                    self.dialect.quote_identifier(alias)
                ))
            }
        }
    }

    fn from_clause(
        &self,
        query: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        if let Some(sub) = &query.from_subquery {
            let inner = scope.entered(sub.id());
            let mut sql = format!("({})", self.compile_statement(sub, &inner, ctx)?);
            if let Some(alias) = &sub.subquery_alias {
                sql.push_str(" AS ");
                sql.push_str(&self.dialect.quote_identifier(alias));
            }
            return Ok(sql);
        }

        let table = query.table.as_ref().ok_or_else(|| {
            CompileError::structure("descriptor has neither a base table nor a subquery source")
        })?;
        let mut sql = self.full_table_name(table);
        if let Some(alias) = &query.join_alias {
            sql.push(' ');
            sql.push_str(alias);
        }
        Ok(sql)
    }

    fn full_table_name(&self, table: &TableName) -> String {
        match &table.schema {
            Some(schema) => format!(
                "{}.{}",
                self.dialect.quote_identifier(schema),
                self.dialect.quote_identifier(&table.name)
            ),
            None => self.dialect.quote_identifier(&table.name),
        }
    }

    fn join_clause(
        &self,
        query: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let mut sql = String::new();

        for join in &query.joins {
            if join.on_items.is_empty() {
                return Err(CompileError::structure("join has no ON predicates"));
            }
            let table = join.query.table.as_ref().ok_or_else(|| {
                CompileError::structure("joined descriptor has no base table")
            })?;

            sql.push(' ');
            sql.push_str(join.kind.keyword());
            sql.push(' ');
            sql.push_str(&self.full_table_name(table));
            if let Some(alias) = &join.query.join_alias {
                sql.push(' ');
                sql.push_str(alias);
            }
            sql.push_str(" ON ");
            sql.push_str(&self.compile_predicates(&join.on_items, "", scope, ctx)?);
        }

        Ok(sql)
    }

    fn set_operation_clause(
        &self,
        query: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let mut sql = String::new();
        for op in &query.set_ops {
            sql.push(' ');
            sql.push_str(op.kind.keyword());
            sql.push(' ');
            sql.push_str(&self.compile_statement(&op.query, scope, ctx)?);
        }
        Ok(sql)
    }

    fn group_by_clause(
        &self,
        query: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        if query.group_by.is_empty() {
            return Ok(String::new());
        }

        let mut parts = Vec::with_capacity(query.group_by.len());
        for item in &query.group_by {
            parts.push(self.compile_expression(&item.expr, scope, ctx, false)?);
        }

        let mut sql = format!(" GROUP BY {}", parts.join(", "));
        if query.with_rollup {
            sql.push_str(self.dialect.rollup_suffix());
        }
        Ok(sql)
    }

    fn order_by_clause(
        &self,
        query: &QueryDescriptor,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        if query.order_by.is_empty() {
            return Ok(String::new());
        }

        // Under a set operation the combined result has no alias scope, so
        // this statement's columns sort by bare name.
        let order_scope;
        let scope = if query.set_ops.is_empty() {
            scope
        } else {
            order_scope = scope.without_qualification(query.id());
            &order_scope
        };

        let mut parts = Vec::with_capacity(query.order_by.len());
        for item in &query.order_by {
            let rendered = self.compile_expression(&item.expr, scope, ctx, false)?;
            let direction = match (&item.expr, item.direction) {
                // A raw fragment with no direction carries its own.
                (Expression::Raw(_), OrderDirection::Unspecified) => "",
                (_, OrderDirection::Ascending) => " ASC",
                (_, OrderDirection::Descending) | (_, OrderDirection::Unspecified) => " DESC",
            };
            parts.push(format!("{rendered}{direction}"));
        }

        Ok(format!(" ORDER BY {}", parts.join(", ")))
    }

    /// Exactly one pagination mode applies: page/size first, then top,
    /// then skip/take.
    fn pagination_clause(&self, pagination: &Pagination) -> String {
        if let (Some(page), Some(size)) = (pagination.page_number, pagination.page_size) {
            let offset = page.saturating_sub(1) * size;
            return self.dialect.limit_offset(Some(size), Some(offset));
        }
        if let Some(top) = pagination.top {
            return self.dialect.limit_offset(Some(top), None);
        }
        if pagination.skip.is_some() || pagination.take.is_some() {
            return self.dialect.limit_offset(pagination.take, pagination.skip);
        }
        String::new()
    }
}
