//! Typed input tree
//!
//! The tree handed over by the type checker. Every node carries an
//! [`Annotation`] holding its resolved static type and source location. The
//! lowering reads it once and never mutates it.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Resolved static type of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Type {
    Number,
    Bool,
    None,
    Class { name: String },
    List { elem: Box<Type> },
}

impl Type {
    /// Create a class type
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class { name: name.into() }
    }

    /// Create a list type
    pub fn list(elem: Type) -> Self {
        Type::List {
            elem: Box::new(elem),
        }
    }

    /// Class name if this is a class type
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class { name } => Some(name),
            _ => None,
        }
    }

    /// Check if this is a list type
    pub fn is_list(&self) -> bool {
        matches!(self, Type::List { .. })
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Number => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::None => write!(f, "<None>"),
            Type::Class { name } => write!(f, "{}", name),
            Type::List { elem } => write!(f, "[{}]", elem),
        }
    }
}

/// Position of a node in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    #[serde(default)]
    pub length: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32, length: u32) -> Self {
        Self {
            line,
            column,
            length,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Type and location attached to every node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub ty: Type,
    #[serde(default)]
    pub loc: SourceLocation,
}

impl Annotation {
    pub fn new(ty: Type, loc: SourceLocation) -> Self {
        Self { ty, loc }
    }
}

/// Literal constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Literal {
    Num {
        #[serde(with = "bigint_text")]
        value: BigInt,
    },
    Bool {
        value: bool,
    },
    None,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniOp {
    Neg,
    Not,
}

impl std::fmt::Display for UniOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniOp::Neg => write!(f, "-"),
            UniOp::Not => write!(f, "not "),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    Plus,
    Minus,
    Mul,
    IDiv,
    Mod,
    Eq,
    Neq,
    Lte,
    Gte,
    Lt,
    Gt,
    Is,
    And,
    Or,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Mul => "*",
            BinOp::IDiv => "//",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lte => "<=",
            BinOp::Gte => ">=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Is => "is",
            BinOp::And => "and",
            BinOp::Or => "or",
        };
        write!(f, "{}", s)
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Expr {
    UniOp {
        a: Annotation,
        op: UniOp,
        expr: Box<Expr>,
    },
    BinOp {
        a: Annotation,
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Builtin1 {
        a: Annotation,
        name: String,
        arg: Box<Expr>,
    },
    Builtin2 {
        a: Annotation,
        name: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        a: Annotation,
        name: String,
        arguments: Vec<Expr>,
    },
    MethodCall {
        a: Annotation,
        obj: Box<Expr>,
        method: String,
        arguments: Vec<Expr>,
    },
    Lookup {
        a: Annotation,
        obj: Box<Expr>,
        field: String,
    },
    Index {
        a: Annotation,
        obj: Box<Expr>,
        index: Box<Expr>,
    },
    Construct {
        a: Annotation,
        name: String,
    },
    ListLiteral {
        a: Annotation,
        elements: Vec<Expr>,
    },
    Id {
        a: Annotation,
        name: String,
    },
    Literal {
        a: Annotation,
        value: Literal,
    },
}

impl Expr {
    /// Type and location of this node
    pub fn annotation(&self) -> &Annotation {
        match self {
            Expr::UniOp { a, .. }
            | Expr::BinOp { a, .. }
            | Expr::Builtin1 { a, .. }
            | Expr::Builtin2 { a, .. }
            | Expr::Call { a, .. }
            | Expr::MethodCall { a, .. }
            | Expr::Lookup { a, .. }
            | Expr::Index { a, .. }
            | Expr::Construct { a, .. }
            | Expr::ListLiteral { a, .. }
            | Expr::Id { a, .. }
            | Expr::Literal { a, .. } => a,
        }
    }

    /// Static type of this node
    pub fn ty(&self) -> &Type {
        &self.annotation().ty
    }

    /// Source location of this node
    pub fn loc(&self) -> SourceLocation {
        self.annotation().loc
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Stmt {
    Assign {
        a: Annotation,
        name: String,
        value: Expr,
    },
    Return {
        a: Annotation,
        value: Expr,
    },
    Expr {
        a: Annotation,
        expr: Expr,
    },
    Pass {
        a: Annotation,
    },
    FieldAssign {
        a: Annotation,
        obj: Expr,
        field: String,
        value: Expr,
    },
    IndexAssign {
        a: Annotation,
        obj: Expr,
        index: Expr,
        value: Expr,
    },
    If {
        a: Annotation,
        cond: Expr,
        thn: Vec<Stmt>,
        els: Vec<Stmt>,
    },
    While {
        a: Annotation,
        cond: Expr,
        body: Vec<Stmt>,
    },
}

/// Variable declaration with a literal initializer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarInit {
    pub name: String,
    pub ty: Type,
    pub value: Literal,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

/// Function or method definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunDef {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub ret: Type,
    #[serde(default)]
    pub inits: Vec<VarInit>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// Class definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<VarInit>,
    #[serde(default)]
    pub methods: Vec<FunDef>,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// Whole program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub funs: Vec<FunDef>,
    #[serde(default)]
    pub inits: Vec<VarInit>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

/// Big integers as decimal text, accepting plain JSON integers on input
pub(crate) mod bigint_text {
    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        UInt(u64),
        // Integers past u64 reach here already rounded
        Float(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Int(v) => Ok(BigInt::from(v)),
            Repr::UInt(v) => Ok(BigInt::from(v)),
            Repr::Float(v) => Err(de::Error::custom(format!(
                "number {} is not a 64-bit integer; pass it as a decimal string",
                v
            ))),
            Repr::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
