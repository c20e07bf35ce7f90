//! Shared mutable state of one compilation pass.
//!
//! A [`CompileContext`] is created once per top-level compile and threaded
//! by `&mut` through every recursive call, so parameter names stay unique
//! across the whole statement including nested subqueries. It is never a
//! hidden global; a second compile starts from a fresh context.

use serde::{Deserialize, Serialize};

use crate::metadata::ProviderType;
use crate::types::Literal;

/// A named, typed placeholder paired with its runtime value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundParameter {
    /// Full placeholder name as it appears in the SQL text, marker included.
    pub name: String,
    pub value: Literal,
    /// Cloned from the metadata prototype, or `Unspecified` when the
    /// comparison has no backing column.
    pub provider_type: ProviderType,
    /// LIKE/CONTAINS force the executing layer to treat the value as a
    /// string regardless of the provider type.
    pub force_string: bool,
}

/// Parameter sequence counter plus the ordered parameter sink.
#[derive(Debug, Default)]
pub struct CompileContext {
    next_index: u32,
    parameters: Vec<BoundParameter>,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next statement-wide sequence number; the first call returns 1.
    pub(crate) fn next_parameter_index(&mut self) -> u32 {
        self.next_index += 1;
        self.next_index
    }

    pub(crate) fn push(&mut self, parameter: BoundParameter) {
        #[cfg(feature = "tracing")]
        tracing::trace!(name = %parameter.name, "bound parameter");
        self.parameters.push(parameter);
    }

    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    pub fn into_parameters(self) -> Vec<BoundParameter> {
        self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic_and_starts_at_one() {
        let mut ctx = CompileContext::new();
        assert_eq!(ctx.next_parameter_index(), 1);
        assert_eq!(ctx.next_parameter_index(), 2);
        assert_eq!(ctx.next_parameter_index(), 3);
    }
}
