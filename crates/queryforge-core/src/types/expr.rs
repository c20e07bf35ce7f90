//! Column references, scalar-function chains, math and CASE expressions.

use serde::{Deserialize, Serialize};

use super::{Literal, PredicateItem, QueryDescriptor, QueryId};

/// Broad type category declared on a column reference.
///
/// Only consulted by the math compiler to decide whether `+` means numeric
/// addition or string concatenation; it is not a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
}

impl ColumnType {
    /// True for the types that force `+` to render as concatenation.
    pub(crate) fn concatenates(self) -> bool {
        matches!(self, ColumnType::String | ColumnType::Date)
    }
}

/// Alias context of the query a column belongs to, stamped onto the column
/// when it is created from a descriptor.
///
/// Carrying the owning query's aliases by value (instead of a live reference
/// back into the tree) keeps the model an ordinary owned value: serializable,
/// cloneable, and safe to compile from several threads at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOwner {
    /// Identity of the owning query, matched against the compile scope.
    pub query: QueryId,
    /// Metadata-cache key of the owning query, if it maps to an entity.
    pub entity: Option<String>,
    /// The owning query's join alias.
    pub join_alias: Option<String>,
    /// The owning query's subquery alias.
    pub subquery_alias: Option<String>,
}

/// A reference to a column of some query in the descriptor tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnReference {
    /// Alias context of the owning query; `None` renders a bare identifier.
    pub owner: Option<ColumnOwner>,
    /// Column name, quoted with the dialect's identifier delimiters.
    pub name: String,
    /// `AS` alias applied at top-level select positions.
    pub alias: Option<String>,
    /// Injects `DISTINCT` inside the innermost function of a chain.
    pub distinct: bool,
    /// Declared type, consulted by the concatenation special case.
    pub data_type: Option<ColumnType>,
}

impl ColumnReference {
    /// A free-standing column with no owning query.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            owner: None,
            name: name.into(),
            alias: None,
            distinct: false,
            data_type: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn with_type(mut self, data_type: ColumnType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Wraps the column in an expression carrying a scalar-function chain,
    /// outermost function first.
    pub fn apply(self, functions: Vec<ScalarFunctionCall>) -> Expression {
        Expression::Column {
            column: self,
            functions,
        }
    }

    /// The column as a plain select expression.
    pub fn expr(self) -> Expression {
        Expression::Column {
            column: self,
            functions: Vec::new(),
        }
    }
}

/// Target type of a CAST function application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CastType {
    Boolean,
    Byte,
    Char,
    DateTime,
    Double,
    Decimal,
    Guid,
    Int16,
    Int32,
    Int64,
    Single,
    String,
}

/// One application in a scalar-function chain.
///
/// Chains are declared outermost first: `[ToUpper, Trim]` over column `x`
/// renders as `UPPER(LTRIM(RTRIM("x")))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarFunctionCall {
    ToLower,
    ToUpper,
    LTrim,
    RTrim,
    Trim,
    Substring {
        /// 1-based start position; defaults to 1 when absent.
        start: Option<i64>,
        length: i64,
    },
    Coalesce {
        /// Verbatim fallback expression list, e.g. `0` or `"other",''`.
        expressions: String,
    },
    /// Truncates a timestamp to day precision.
    DateTruncate,
    /// Character length of the base expression.
    Length,
    Round {
        significant_digits: i64,
    },
    Extract {
        /// Date part keyword, e.g. `year`.
        date_part: String,
    },
    Avg,
    Count,
    Max,
    Min,
    StdDev,
    Sum,
    Variance,
    Cast {
        cast_type: CastType,
        /// Length modifier, e.g. `varchar(24)`.
        length: Option<u32>,
        /// Precision/scale modifier, e.g. `numeric(10,2)`. Ignored when
        /// `length` is set, matching the original provider.
        precision: Option<(u32, u32)>,
    },
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

/// Right-hand operand of a math expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MathOperand {
    Expression(Box<Expression>),
    Literal(Literal),
}

/// A binary arithmetic or concatenation expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathExpression {
    pub operator: MathOperator,
    pub left: Box<Expression>,
    pub right: MathOperand,
    /// When true the left operand is emitted first; when false the right
    /// operand leads.
    pub operand_first: bool,
    /// `AS` alias applied at top-level select positions.
    pub alias: Option<String>,
}

impl MathExpression {
    pub fn new(left: Expression, operator: MathOperator, right: MathOperand) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right,
            operand_first: true,
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn right_first(mut self) -> Self {
        self.operand_first = false;
        self
    }

    /// Type category of the literal operand, if the right side is a literal.
    pub(crate) fn literal_type(&self) -> Option<ColumnType> {
        match &self.right {
            MathOperand::Literal(literal) => literal.column_type(),
            MathOperand::Expression(_) => None,
        }
    }
}

/// The WHEN side of a CASE clause: either a full predicate list or a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseInput {
    Predicates(Vec<PredicateItem>),
    Value(CaseValue),
}

/// A THEN/ELSE result: an expression or a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseValue {
    Expression(Box<Expression>),
    Literal(Literal),
}

/// One WHEN/THEN pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseClause {
    pub when: CaseInput,
    pub then: CaseValue,
}

/// A CASE expression with optional ELSE and result alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExpression {
    pub whens: Vec<CaseClause>,
    pub else_value: Option<CaseValue>,
    pub alias: Option<String>,
}

impl CaseExpression {
    pub fn new() -> Self {
        Self {
            whens: Vec::new(),
            else_value: None,
            alias: None,
        }
    }

    pub fn when(mut self, when: CaseInput, then: CaseValue) -> Self {
        self.whens.push(CaseClause { when, then });
        self
    }

    pub fn otherwise(mut self, value: CaseValue) -> Self {
        self.else_value = Some(value);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl Default for CaseExpression {
    fn default() -> Self {
        Self::new()
    }
}

/// A select/group/order expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expression {
    /// A column reference with an optional scalar-function chain,
    /// outermost function first.
    Column {
        column: ColumnReference,
        functions: Vec<ScalarFunctionCall>,
    },
    Math(MathExpression),
    Case(Box<CaseExpression>),
    /// Verbatim SQL text. Never quoted, aliased, or parameterized.
    Raw(String),
    /// A nested statement used as a scalar column.
    Subquery(Box<QueryDescriptor>),
}

impl Expression {
    /// A raw passthrough fragment. Accepts the `<fragment>` angle-bracket
    /// convention of the original model and strips it.
    pub fn raw(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .map(str::to_owned)
            .unwrap_or(text);
        Expression::Raw(trimmed)
    }
}

impl From<ColumnReference> for Expression {
    fn from(column: ColumnReference) -> Self {
        column.expr()
    }
}

impl From<MathExpression> for Expression {
    fn from(math: MathExpression) -> Self {
        Expression::Math(math)
    }
}

impl From<CaseExpression> for Expression {
    fn from(case: CaseExpression) -> Self {
        Expression::Case(Box::new(case))
    }
}
