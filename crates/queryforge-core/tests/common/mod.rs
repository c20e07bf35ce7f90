#![allow(dead_code)]

use queryforge_core::{
    CompileError, CompiledQuery, MemoryMetadataCache, ParameterPrototype, PostgresDialect,
    ProviderType, QueryDescriptor, SqlCompiler,
};

/// Metadata fixture shared by the integration tests: two entities with
/// typed parameter prototypes.
pub fn metadata() -> MemoryMetadataCache {
    let mut cache = MemoryMetadataCache::new();
    cache
        .insert(
            "Employees",
            "Id",
            ParameterPrototype::new("Id", ProviderType::Integer),
        )
        .insert(
            "Employees",
            "Age",
            ParameterPrototype::new("Age", ProviderType::Integer),
        )
        .insert(
            "Employees",
            "Name",
            ParameterPrototype::new("Name", ProviderType::Varchar),
        )
        .insert(
            "Employees",
            "Salary",
            ParameterPrototype::new("Salary", ProviderType::Numeric),
        )
        .insert(
            "Orders",
            "Id",
            ParameterPrototype::new("Id", ProviderType::Integer),
        )
        .insert(
            "Orders",
            "EmployeeId",
            ParameterPrototype::new("EmployeeId", ProviderType::Integer),
        )
        .insert(
            "Orders",
            "Total",
            ParameterPrototype::new("Total", ProviderType::Numeric),
        );
    cache
}

pub fn compile(query: &QueryDescriptor) -> CompiledQuery {
    try_compile(query).expect("query should compile")
}

pub fn try_compile(query: &QueryDescriptor) -> Result<CompiledQuery, CompileError> {
    let cache = metadata();
    SqlCompiler::new(&PostgresDialect, &cache).compile(query)
}
