//! The SQL compiler: recursive descent over a query descriptor.
//!
//! Stages live in the submodules and cooperate through `&self` methods on
//! [`SqlCompiler`]: statement assembly, predicate rendering, expression
//! dispatch, scalar-function chains, math, and CASE. All stages share one
//! [`CompileContext`] threaded by `&mut` and an immutable [`Scope`] value
//! extended per recursion step.

mod case;
mod expression;
mod functions;
mod math;
mod predicate;
mod statement;

use crate::command::{CommandSink, CompiledQuery};
use crate::context::CompileContext;
use crate::dialect::SqlDialect;
use crate::error::CompileError;
use crate::metadata::ColumnMetadataCache;
use crate::types::{QueryDescriptor, QueryId};

/// Rendering scope of the current recursion step.
///
/// Tracks which descriptors are currently being rendered as subqueries
/// (the original implementation toggled a mutable flag on the node for
/// this, which made shared descriptor subgraphs unsafe to reuse) and
/// whether qualification is suppressed for a descriptor, as ORDER BY under
/// a set operation requires.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    in_subquery: Vec<QueryId>,
    unqualified: Option<QueryId>,
}

impl Scope {
    /// The scope seen while `id` is rendered as a subquery.
    pub(crate) fn entered(&self, id: QueryId) -> Scope {
        let mut scope = self.clone();
        scope.in_subquery.push(id);
        scope
    }

    /// The scope seen while `id`'s columns must render unqualified.
    pub(crate) fn without_qualification(&self, id: QueryId) -> Scope {
        let mut scope = self.clone();
        scope.unqualified = Some(id);
        scope
    }

    pub(crate) fn is_rendering(&self, id: QueryId) -> bool {
        self.in_subquery.contains(&id)
    }

    pub(crate) fn is_unqualified(&self, id: QueryId) -> bool {
        self.unqualified == Some(id)
    }
}

/// Compiles query descriptors into dialect-specific parameterized SQL.
pub struct SqlCompiler<'a> {
    pub(crate) dialect: &'a dyn SqlDialect,
    pub(crate) metadata: &'a dyn ColumnMetadataCache,
}

impl<'a> SqlCompiler<'a> {
    pub fn new(dialect: &'a dyn SqlDialect, metadata: &'a dyn ColumnMetadataCache) -> Self {
        Self { dialect, metadata }
    }

    /// Compiles one top-level statement. The descriptor is read-only;
    /// compiling the same descriptor twice yields identical output.
    pub fn compile(&self, query: &QueryDescriptor) -> Result<CompiledQuery, CompileError> {
        #[cfg(feature = "tracing")]
        tracing::trace!(dialect = self.dialect.name(), "compiling query descriptor");

        let mut ctx = CompileContext::new();
        let scope = Scope::default();
        let sql = self.compile_statement(query, &scope, &mut ctx)?;
        Ok(CompiledQuery {
            sql,
            parameters: ctx.into_parameters(),
        })
    }

    /// Compiles and hands the result to a command sink. The sink is only
    /// called on success.
    pub fn compile_into(
        &self,
        query: &QueryDescriptor,
        sink: &mut dyn CommandSink,
    ) -> Result<(), CompileError> {
        let compiled = self.compile(query)?;
        sink.set_command(&compiled.sql, &compiled.parameters);
        Ok(())
    }
}
