use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceSpan {
    pub fn new(line: usize, column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub body: Vec<Statement>,
}

impl Module {
    pub fn new(body: Vec<Statement>) -> Self {
        Self { body }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub span: SourceSpan,
    #[serde(flatten)]
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(span: SourceSpan, kind: StatementKind) -> Self {
        Self { span, kind }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementKind {
    Import(ImportStatement),
    ImportFrom(ImportFromStatement),
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Assign(AssignStatement),
    AnnAssign(AnnAssignStatement),
    AugAssign(AugAssignStatement),
    Return(ReturnStatement),
    If(IfStatement),
    While(WhileStatement),
    For(ForStatement),
    Try(TryStatement),
    With(WithStatement),
    Raise(RaiseStatement),
    Assert(AssertStatement),
    Delete(DeleteStatement),
    Global(NameListStatement),
    Nonlocal(NameListStatement),
    Expression(ExpressionStatement),
    Pass,
    Break,
    Continue,
    Unsupported(UnsupportedNode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStatement {
    pub names: Vec<ImportAlias>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFromStatement {
    pub module: String,
    pub module_span: SourceSpan,
    pub names: Vec<ImportAlias>,
    #[serde(default)]
    pub level: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportAlias {
    pub name: String,
    #[serde(default)]
    pub asname: Option<String>,
    pub span: SourceSpan,
}

impl ImportAlias {
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub name_span: SourceSpan,
    /// Span of the `def ...:` header; diagnostics about the function as a whole anchor here.
    pub signature_span: SourceSpan,
    #[serde(default)]
    pub decorators: Vec<Expression>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub returns: Option<TypeAnnotation>,
    #[serde(default)]
    pub body: Vec<Statement>,
    #[serde(default)]
    pub is_async: bool,
}

impl FunctionDef {
    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|decorator| match &decorator.kind {
            ExpressionKind::Name(name_expr) => name_expr.id == name,
            ExpressionKind::Attribute(attribute) => attribute.attr == name,
            _ => false,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    #[default]
    Regular,
    KeywordOnly,
    VarPositional,
    VarKeyword,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub span: SourceSpan,
    #[serde(default)]
    pub annotation: Option<TypeAnnotation>,
    #[serde(default)]
    pub default: Option<Expression>,
    #[serde(default)]
    pub kind: ParameterKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub name_span: SourceSpan,
    #[serde(default)]
    pub bases: Vec<Expression>,
    #[serde(default)]
    pub decorators: Vec<Expression>,
    #[serde(default)]
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignStatement {
    pub targets: Vec<Expression>,
    pub value: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnAssignStatement {
    pub target: Expression,
    pub annotation: TypeAnnotation,
    #[serde(default)]
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugAssignStatement {
    pub target: Expression,
    pub operator: BinaryOperator,
    pub value: Expression,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnStatement {
    #[serde(default)]
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    #[serde(default)]
    pub orelse: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    #[serde(default)]
    pub orelse: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForStatement {
    pub target: Expression,
    pub iter: Expression,
    pub body: Vec<Statement>,
    #[serde(default)]
    pub orelse: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TryStatement {
    pub body: Vec<Statement>,
    #[serde(default)]
    pub handlers: Vec<ExceptHandler>,
    #[serde(default)]
    pub orelse: Vec<Statement>,
    #[serde(default)]
    pub finalbody: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptHandler {
    pub span: SourceSpan,
    #[serde(default)]
    pub exception: Option<Expression>,
    #[serde(default)]
    pub name: Option<Identifier>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithStatement {
    pub items: Vec<WithItem>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithItem {
    pub context: Expression,
    #[serde(default)]
    pub target: Option<Expression>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaiseStatement {
    #[serde(default)]
    pub exception: Option<Expression>,
    #[serde(default)]
    pub cause: Option<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertStatement {
    pub test: Expression,
    #[serde(default)]
    pub message: Option<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub targets: Vec<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameListStatement {
    pub names: Vec<Identifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

/// A node the front end produced but could not classify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsupportedNode {
    pub node: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAnnotation {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<TypeAnnotation>,
    pub span: SourceSpan,
}

impl TypeAnnotation {
    /// The annotation name with forward-reference quotes removed.
    pub fn unquoted_name(&self) -> &str {
        self.name.trim_matches(|c| c == '"' || c == '\'')
    }

    /// First segment of a dotted name, e.g. `typing` for `typing.List`.
    pub fn root_name(&self) -> &str {
        let name = self.unquoted_name();
        name.split('.').next().unwrap_or(name)
    }

    /// Last segment of a dotted name, e.g. `List` for `typing.List`.
    pub fn leaf_name(&self) -> &str {
        let name = self.unquoted_name();
        name.rsplit('.').next().unwrap_or(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(IntLiteral),
    Float(f64),
    Str(String),
    Bytes(String),
    Bool(bool),
    None,
    Ellipsis,
}

/// An integer literal. Python integers are unbounded, so values that do not
/// fit `i64` are kept as the front end wrote them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntLiteral {
    Small(i64),
    Digits(String),
    /// A JSON number too wide for `i64`, read back as a float.
    Wide(f64),
}

impl IntLiteral {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IntLiteral::Small(value) => Some(*value),
            IntLiteral::Digits(digits) => digits.parse().ok(),
            IntLiteral::Wide(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            IntLiteral::Small(value) => *value == 0,
            IntLiteral::Digits(digits) => digits
                .trim_start_matches(&['-', '+'][..])
                .chars()
                .all(|digit| digit == '0' || digit == '_'),
            IntLiteral::Wide(value) => *value == 0.0,
        }
    }
}

impl From<i64> for IntLiteral {
    fn from(value: i64) -> Self {
        IntLiteral::Small(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Positive,
    Negative,
    Not,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Power,
    MatMul,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    In,
    NotIn,
    Is,
    IsNot,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::FloorDivide => "//",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "**",
            BinaryOperator::MatMul => "@",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::In => "in",
            BinaryOperator::NotIn => "not in",
            BinaryOperator::Is => "is",
            BinaryOperator::IsNot => "is not",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub span: SourceSpan,
    #[serde(flatten)]
    pub kind: ExpressionKind,
}

impl Expression {
    pub fn new(span: SourceSpan, kind: ExpressionKind) -> Self {
        Self { span, kind }
    }

    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Name(name) => Some(name.id.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpressionKind {
    Name(NameExpression),
    Literal(LiteralExpression),
    FString(FStringExpression),
    List(SequenceExpression),
    Tuple(SequenceExpression),
    Set(SequenceExpression),
    Dict(DictExpression),
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Call(CallExpression),
    Attribute(AttributeExpression),
    Subscript(SubscriptExpression),
    Lambda(LambdaExpression),
    Conditional(ConditionalExpression),
    ListComp(ComprehensionExpression),
    SetComp(ComprehensionExpression),
    DictComp(ComprehensionExpression),
    Generator(ComprehensionExpression),
    Slice(SliceExpression),
    Starred(OperandExpression),
    Await(OperandExpression),
    Yield(YieldExpression),
    YieldFrom(OperandExpression),
    Unsupported(UnsupportedNode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameExpression {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub value: Literal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FStringExpression {
    #[serde(default)]
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceExpression {
    #[serde(default)]
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictExpression {
    #[serde(default)]
    pub entries: Vec<DictEntry>,
}

/// A `key: value` pair, or a `**mapping` spread when `key` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictEntry {
    #[serde(default)]
    pub key: Option<Expression>,
    pub value: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    #[serde(default)]
    pub arguments: Vec<CallArgument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentUnpack {
    #[default]
    None,
    Positional,
    Keyword,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallArgument {
    #[serde(default)]
    pub name: Option<String>,
    pub value: Expression,
    #[serde(default)]
    pub unpack: ArgumentUnpack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeExpression {
    pub value: Box<Expression>,
    pub attr: String,
    pub attr_span: SourceSpan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptExpression {
    pub value: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaExpression {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub body: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalExpression {
    pub condition: Box<Expression>,
    pub body: Box<Expression>,
    pub orelse: Box<Expression>,
}

/// `[element for target in iter if cond ...]` and its set, dict and generator forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensionExpression {
    /// The key for a dict comprehension.
    pub element: Box<Expression>,
    #[serde(default)]
    pub value: Option<Box<Expression>>,
    pub generators: Vec<Comprehension>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comprehension {
    pub target: Expression,
    pub iter: Expression,
    #[serde(default)]
    pub ifs: Vec<Expression>,
    #[serde(default)]
    pub is_async: bool,
}

/// `lower:upper:step`, only ever found as a subscript index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceExpression {
    #[serde(default)]
    pub lower: Option<Box<Expression>>,
    #[serde(default)]
    pub upper: Option<Box<Expression>>,
    #[serde(default)]
    pub step: Option<Box<Expression>>,
}

impl SliceExpression {
    pub fn bounds(&self) -> impl Iterator<Item = &Expression> {
        [&self.lower, &self.upper, &self.step]
            .into_iter()
            .filter_map(|bound| bound.as_deref())
    }
}

/// A single wrapped operand: `*value`, `await value` or `yield from value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperandExpression {
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldExpression {
    #[serde(default)]
    pub value: Option<Box<Expression>>,
}
