//! Output side of the compiler: the compiled query and the command sink.

use serde::{Deserialize, Serialize};

use crate::context::BoundParameter;

/// A fully compiled statement: parameterized SQL text plus the ordered
/// bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub sql: String,
    pub parameters: Vec<BoundParameter>,
}

/// Receiver of the final SQL text and parameters, typically a database
/// command object. The compiler only calls this after the whole statement
/// compiled successfully; a sink never observes partial output.
pub trait CommandSink {
    fn set_command(&mut self, sql: &str, parameters: &[BoundParameter]);
}
