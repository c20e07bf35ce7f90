//! Binary arithmetic, including the string-concatenation special case.

use super::{Scope, SqlCompiler};
use crate::context::CompileContext;
use crate::error::CompileError;
use crate::types::{
    ColumnType, Expression, Literal, MathExpression, MathOperand, MathOperator,
};

impl SqlCompiler<'_> {
    pub(crate) fn compile_math(
        &self,
        math: &MathExpression,
        scope: &Scope,
        ctx: &mut CompileContext,
    ) -> Result<String, CompileError> {
        let operator = match math.operator {
            MathOperator::Add if renders_concat(math) => self.dialect.concat_operator(),
            MathOperator::Add => "+",
            MathOperator::Subtract => "-",
            MathOperator::Multiply => "*",
            MathOperator::Divide => "/",
            MathOperator::Modulo => "%",
        };

        let left = self.compile_expression(&math.left, scope, ctx, false)?;
        let right = match &math.right {
            MathOperand::Expression(expr) => self.compile_expression(expr, scope, ctx, false)?,
            MathOperand::Literal(Literal::Collection(_)) => {
                return Err(CompileError::structure(
                    "collection literal as an arithmetic operand",
                ))
            }
            MathOperand::Literal(literal) => self.inline_literal(literal)?,
        };

        let (first, second) = if math.operand_first {
            (left, right)
        } else {
            (right, left)
        };
        Ok(format!("({first}{operator}{second})"))
    }
}

/// True when `+` must render as the dialect's concatenation operator: any
/// operand the model can see is string- or date-typed.
fn renders_concat(math: &MathExpression) -> bool {
    if math.literal_type().is_some_and(ColumnType::concatenates) {
        return true;
    }
    if expression_concatenates(&math.left) {
        return true;
    }
    match &math.right {
        MathOperand::Expression(expr) => expression_concatenates(expr),
        MathOperand::Literal(_) => false,
    }
}

fn expression_concatenates(expr: &Expression) -> bool {
    match expr {
        Expression::Column { column, .. } => column
            .data_type
            .is_some_and(ColumnType::concatenates),
        Expression::Math(inner) => {
            inner.literal_type().is_some_and(ColumnType::concatenates)
                || expression_concatenates(&inner.left)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;
    use crate::metadata::MemoryMetadataCache;
    use crate::types::ColumnReference;

    fn compile(math: &MathExpression) -> String {
        let cache = MemoryMetadataCache::new();
        let compiler = SqlCompiler::new(&PostgresDialect, &cache);
        let mut ctx = CompileContext::new();
        compiler
            .compile_math(math, &Scope::default(), &mut ctx)
            .expect("math")
    }

    #[test]
    fn numeric_addition_uses_plus() {
        let math = MathExpression::new(
            ColumnReference::bare("salary").expr(),
            MathOperator::Add,
            MathOperand::Literal(Literal::Int(100)),
        );
        assert_eq!(compile(&math), "(\"salary\"+100)");
    }

    #[test]
    fn string_literal_turns_add_into_concat() {
        let math = MathExpression::new(
            ColumnReference::bare("first").expr(),
            MathOperator::Add,
            MathOperand::Literal(Literal::String(" ".into())),
        );
        assert_eq!(compile(&math), "(\"first\"||' ')");
    }

    #[test]
    fn string_typed_column_turns_add_into_concat() {
        let math = MathExpression::new(
            ColumnReference::bare("first").with_type(ColumnType::String).expr(),
            MathOperator::Add,
            MathOperand::Expression(Box::new(ColumnReference::bare("last").expr())),
        );
        assert_eq!(compile(&math), "(\"first\"||\"last\")");
    }

    #[test]
    fn concat_propagates_through_nested_math() {
        let inner = MathExpression::new(
            ColumnReference::bare("first").with_type(ColumnType::String).expr(),
            MathOperator::Add,
            MathOperand::Literal(Literal::String(" ".into())),
        );
        let outer = MathExpression::new(
            Expression::Math(inner),
            MathOperator::Add,
            MathOperand::Expression(Box::new(ColumnReference::bare("last").expr())),
        );
        assert_eq!(compile(&outer), "((\"first\"||' ')||\"last\")");
    }

    #[test]
    fn subtraction_never_concatenates() {
        let math = MathExpression::new(
            ColumnReference::bare("a").with_type(ColumnType::String).expr(),
            MathOperator::Subtract,
            MathOperand::Literal(Literal::Int(1)),
        );
        assert_eq!(compile(&math), "(\"a\"-1)");
    }

    #[test]
    fn right_first_swaps_operand_order() {
        let math = MathExpression::new(
            ColumnReference::bare("total").expr(),
            MathOperator::Divide,
            MathOperand::Literal(Literal::Int(12)),
        )
        .right_first();
        assert_eq!(compile(&math), "(12/\"total\")");
    }
}
