//! The dialect contract: everything backend-specific the compiler needs.
//!
//! The trait carries ANSI-flavored defaults so a backend overrides only
//! what differs. Swapping the dialect retargets the compiler without
//! touching the descriptor model or the compilation algorithms.

use chrono::NaiveDate;

use crate::error::CompileError;
use crate::types::CastType;

/// Scalar and aggregate functions whose rendering is a single name plus
/// parentheses; the chain compiler supplies the bracket structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    Lower,
    Upper,
    LTrim,
    RTrim,
    Substring,
    Coalesce,
    Round,
    Avg,
    Count,
    Max,
    Min,
    StdDev,
    Sum,
    Variance,
}

/// Backend-specific syntax rules.
pub trait SqlDialect {
    /// Backend name, for diagnostics.
    fn name(&self) -> &'static str;

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Prefix of parameter placeholders.
    fn parameter_marker(&self) -> &'static str {
        "@"
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    fn date_literal(&self, date: &NaiveDate) -> String {
        format!("'{}'", date.format("%Y-%m-%d"))
    }

    /// Operator substituted for `+` when a side is string- or date-typed.
    fn concat_operator(&self) -> &'static str {
        "||"
    }

    /// Pagination clause with a leading space, empty when neither part is
    /// present.
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        sql
    }

    /// Suffix appended to a GROUP BY clause when rollup is requested.
    fn rollup_suffix(&self) -> &'static str {
        " WITH ROLLUP"
    }

    fn function_name(&self, function: FunctionName) -> &'static str {
        match function {
            FunctionName::Lower => "LOWER",
            FunctionName::Upper => "UPPER",
            FunctionName::LTrim => "LTRIM",
            FunctionName::RTrim => "RTRIM",
            FunctionName::Substring => "SUBSTRING",
            FunctionName::Coalesce => "COALESCE",
            FunctionName::Round => "ROUND",
            FunctionName::Avg => "AVG",
            FunctionName::Count => "COUNT",
            FunctionName::Max => "MAX",
            FunctionName::Min => "MIN",
            FunctionName::StdDev => "STDDEV",
            FunctionName::Sum => "SUM",
            FunctionName::Variance => "VARIANCE",
        }
    }

    /// Function wrapping the base expression for character length.
    fn length_function(&self) -> &'static str {
        "CHAR_LENGTH"
    }

    /// Opening text of a day-precision date truncation; the chain compiler
    /// closes it with a single parenthesis.
    fn date_truncate_opener(&self) -> &'static str {
        "DATE_TRUNC('day',"
    }

    /// Backend type name for a CAST target. The default fails closed so a
    /// dialect that never mapped its type table cannot silently emit
    /// invalid casts.
    fn cast_type_name(&self, cast_type: CastType) -> Result<&'static str, CompileError> {
        Err(CompileError::unsupported(format!(
            "CAST to {cast_type:?} is not mapped for dialect {}",
            self.name()
        )))
    }
}

/// PostgreSQL dialect, matching the Npgsql provider this compiler grew
/// out of.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn cast_type_name(&self, cast_type: CastType) -> Result<&'static str, CompileError> {
        Ok(match cast_type {
            CastType::Boolean => "bool",
            CastType::Byte => "tinyint",
            CastType::Char => "char",
            CastType::DateTime => "timestamp",
            CastType::Double => "float8",
            CastType::Decimal => "numeric",
            CastType::Guid => "uuid",
            CastType::Int16 => "int2",
            CastType::Int32 => "int4",
            CastType::Int64 => "int8",
            CastType::Single => "float4",
            CastType::String => "varchar",
        })
    }
}
