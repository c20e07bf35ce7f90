//! Scalar-function chain rendering.
//!
//! Chains are declared outermost first. Rendering walks the reversed list
//! (innermost first), emitting each function's opening syntax while pushing
//! its closer and any trailing inline arguments onto a stack; the base
//! expression is appended once, then the stack unwinds in LIFO order. This
//! nests chains of arbitrary length without building an expression tree.

use super::SqlCompiler;
use crate::dialect::FunctionName;
use crate::error::CompileError;
use crate::types::ScalarFunctionCall;

impl SqlCompiler<'_> {
    pub(crate) fn apply_function_chain(
        &self,
        base: &str,
        functions: &[ScalarFunctionCall],
    ) -> Result<String, CompileError> {
        let mut sql = String::new();
        let mut closers: Vec<String> = Vec::new();

        let open_simple = |sql: &mut String, closers: &mut Vec<String>, name: FunctionName| {
            sql.push_str(self.dialect.function_name(name));
            sql.push('(');
            closers.push(")".to_owned());
        };

        for function in functions.iter().rev() {
            match function {
                ScalarFunctionCall::ToLower => open_simple(&mut sql, &mut closers, FunctionName::Lower),
                ScalarFunctionCall::ToUpper => open_simple(&mut sql, &mut closers, FunctionName::Upper),
                ScalarFunctionCall::LTrim => open_simple(&mut sql, &mut closers, FunctionName::LTrim),
                ScalarFunctionCall::RTrim => open_simple(&mut sql, &mut closers, FunctionName::RTrim),
                ScalarFunctionCall::Trim => {
                    sql.push_str(self.dialect.function_name(FunctionName::LTrim));
                    sql.push('(');
                    sql.push_str(self.dialect.function_name(FunctionName::RTrim));
                    sql.push('(');
                    closers.push("))".to_owned());
                }
                ScalarFunctionCall::Substring { start, length } => {
                    sql.push_str(self.dialect.function_name(FunctionName::Substring));
                    sql.push('(');
                    closers.push(")".to_owned());
                    closers.push(length.to_string());
                    closers.push(",".to_owned());
                    closers.push(start.unwrap_or(1).to_string());
                    closers.push(",".to_owned());
                }
                ScalarFunctionCall::Coalesce { expressions } => {
                    sql.push_str(self.dialect.function_name(FunctionName::Coalesce));
                    sql.push('(');
                    closers.push(")".to_owned());
                    closers.push(expressions.clone());
                    closers.push(",".to_owned());
                }
                ScalarFunctionCall::DateTruncate => {
                    sql.push_str(self.dialect.date_truncate_opener());
                    closers.push(")".to_owned());
                }
                ScalarFunctionCall::Length => {
                    sql.push_str(self.dialect.length_function());
                    sql.push('(');
                    closers.push(")".to_owned());
                }
                ScalarFunctionCall::Round { significant_digits } => {
                    sql.push_str(self.dialect.function_name(FunctionName::Round));
                    sql.push('(');
                    closers.push(")".to_owned());
                    closers.push(significant_digits.to_string());
                    closers.push(",".to_owned());
                }
                ScalarFunctionCall::Extract { date_part } => {
                    sql.push_str("EXTRACT(");
                    sql.push_str(date_part);
                    sql.push_str(" FROM ");
                    closers.push(")".to_owned());
                }
                ScalarFunctionCall::Avg => open_simple(&mut sql, &mut closers, FunctionName::Avg),
                ScalarFunctionCall::Count => open_simple(&mut sql, &mut closers, FunctionName::Count),
                ScalarFunctionCall::Max => open_simple(&mut sql, &mut closers, FunctionName::Max),
                ScalarFunctionCall::Min => open_simple(&mut sql, &mut closers, FunctionName::Min),
                ScalarFunctionCall::StdDev => open_simple(&mut sql, &mut closers, FunctionName::StdDev),
                ScalarFunctionCall::Sum => open_simple(&mut sql, &mut closers, FunctionName::Sum),
                ScalarFunctionCall::Variance => {
                    open_simple(&mut sql, &mut closers, FunctionName::Variance)
                }
                ScalarFunctionCall::Cast {
                    cast_type,
                    length,
                    precision,
                } => {
                    sql.push_str("CAST(");
                    closers.push(")".to_owned());
                    if length.is_some() || precision.is_some() {
                        closers.push(")".to_owned());
                        if let Some(length) = length {
                            closers.push(length.to_string());
                        } else if let Some((precision, scale)) = precision {
                            closers.push(scale.to_string());
                            closers.push(",".to_owned());
                            closers.push(precision.to_string());
                        }
                        closers.push("(".to_owned());
                    }
                    closers.push(self.dialect.cast_type_name(*cast_type)?.to_owned());
                    closers.push(" AS ".to_owned());
                }
            }
        }

        sql.push_str(base);
        while let Some(closer) = closers.pop() {
            sql.push_str(&closer);
        }
        Ok(sql)
    }
}
