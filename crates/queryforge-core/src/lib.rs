//! Dialect-aware SQL SELECT compiler.
//!
//! Callers build a [`QueryDescriptor`] tree (select list, joins, predicate
//! lists, subqueries, set operations, pagination) and hand it to a
//! [`SqlCompiler`], which renders parameterized SQL text plus the ordered
//! [`BoundParameter`] list for the active [`SqlDialect`]. The descriptor is
//! read-only during compilation: compiling the same tree twice, or from two
//! threads, yields identical output.
//!
//! ```
//! use queryforge_core::{
//!     MemoryMetadataCache, ParameterPrototype, PostgresDialect, ProviderType, QueryDescriptor,
//!     SqlCompiler,
//! };
//!
//! let mut cache = MemoryMetadataCache::new();
//! cache.insert(
//!     "Employees",
//!     "Name",
//!     ParameterPrototype::new("Name", ProviderType::Varchar),
//! );
//! let compiler = SqlCompiler::new(&PostgresDialect, &cache);
//!
//! let employees = QueryDescriptor::new("Employees").with_alias("e");
//! let name = employees.col("Name");
//! let query = employees
//!     .select_column(name.clone())
//!     .with_where([name.like("A%").into()]);
//!
//! let compiled = compiler.compile(&query).unwrap();
//! assert_eq!(
//!     compiled.sql,
//!     "SELECT e.\"Name\" FROM \"Employees\" e WHERE e.\"Name\" LIKE @Name1"
//! );
//! assert_eq!(compiled.parameters.len(), 1);
//! ```

mod command;
mod compiler;
mod context;
mod dialect;
mod error;
mod metadata;
pub mod types;

pub use command::{CommandSink, CompiledQuery};
pub use compiler::SqlCompiler;
pub use context::{BoundParameter, CompileContext};
pub use dialect::{FunctionName, PostgresDialect, SqlDialect};
pub use error::CompileError;
pub use metadata::{ColumnMetadataCache, MemoryMetadataCache, ParameterPrototype, ProviderType};
pub use types::{
    ColumnReference, Expression, Literal, Predicate, PredicateItem, QueryDescriptor,
};
