//! Immutable syntax tree for the supported JavaScript/TypeScript subset.
//!
//! Nodes own their children and derive `Clone`; rewrites build new trees
//! instead of editing shared ones.

use crate::lexer::Comment;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub items: Vec<Item>,
}

/// A statement plus the trivia that preceded it in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub comments: Vec<Comment>,
    pub blank_line_before: bool,
    pub stmt: Stmt,
}

impl Item {
    pub fn new(stmt: Stmt) -> Self {
        Self {
            comments: Vec::new(),
            blank_line_before: false,
            stmt,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(VarDecl),
    Function(Function),
    Return(Option<Expr>),
    Expr(Expr),
    Import(ImportDecl),
    /// `export <declaration>`
    Export(Box<Stmt>),
    ExportDefault(ExportDefault),
    Interface(InterfaceDecl),
    TypeAlias(TypeAlias),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub pat: Pat,
    pub type_ann: Option<TsType>,
    pub init: Option<Expr>,
}

impl Declarator {
    /// The bound name when the pattern is a plain identifier.
    pub fn ident(&self) -> Option<&str> {
        match &self.pat {
            Pat::Ident(name) => Some(name),
            Pat::Object(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pat {
    Ident(String),
    Object(Vec<PatProp>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatProp {
    /// `{ key: pattern }`
    KeyValue(PropKey, Pat),
    /// `{ name }`
    Shorthand(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pat: Pat,
    pub optional: bool,
    pub type_ann: Option<TsType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub is_async: bool,
    pub params: Vec<Param>,
    pub return_type: Option<TsType>,
    pub body: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFn {
    pub is_async: bool,
    pub params: Vec<Param>,
    pub body: ArrowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Block(Vec<Item>),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportDefault {
    Function(Function),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub type_only: bool,
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<ImportSpecifier>,
    pub source: String,
}

impl ImportDecl {
    /// Names this import binds in module scope.
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.default
            .iter()
            .chain(self.namespace.iter())
            .map(String::as_str)
            .chain(self.named.iter().map(|s| s.local.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub extends: Vec<TsType>,
    pub body: Vec<TsMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    pub ty: TsType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    /// Numeric literal in source spelling.
    Num(String),
    Bool(bool),
    Null,
    Array(Vec<Expr>),
    Object(Vec<Prop>),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call(CallExpr),
    New(CallExpr),
    Arrow(ArrowFn),
    Function(Box<Function>),
    Await(Box<Expr>),
    Unary {
        op: String,
        arg: Box<Expr>,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Cond {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Assign {
        op: String,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Spread(Box<Expr>),
    Paren(Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn object(props: Vec<Prop>) -> Self {
        Expr::Object(props)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

impl CallExpr {
    /// The method name when the callee is a member access (`a.define(...)`).
    pub fn method_name(&self) -> Option<&str> {
        match self.callee.as_ref() {
            Expr::Member { property, .. } => Some(property),
            _ => None,
        }
    }

    /// The callee name when it is a plain identifier (`providerWrapper(...)`).
    pub fn callee_name(&self) -> Option<&str> {
        match self.callee.as_ref() {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue(PropKey, Expr),
    Shorthand(String),
    Spread(Expr),
}

impl Prop {
    /// A `key: value` property, quoting the key when it is not an
    /// identifier name.
    pub fn new(key: &str, value: Expr) -> Self {
        Prop::KeyValue(PropKey::from_name(key), value)
    }

    pub fn key_name(&self) -> Option<&str> {
        match self {
            Prop::KeyValue(key, _) => key.name(),
            Prop::Shorthand(name) => Some(name),
            Prop::Spread(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(String),
    Str(String),
    Num(String),
    Computed(Box<Expr>),
}

impl PropKey {
    pub fn from_name(name: &str) -> Self {
        if automate_naming::is_identifier_name(name) {
            PropKey::Ident(name.to_string())
        } else {
            PropKey::Str(name.to_string())
        }
    }

    /// Static key text; `None` for computed keys.
    pub fn name(&self) -> Option<&str> {
        match self {
            PropKey::Ident(name) | PropKey::Str(name) | PropKey::Num(name) => Some(name),
            PropKey::Computed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// `any`, `number`, `string`, `boolean`, `object`, `void`, ...
    Keyword(String),
    /// `Name`, `ns.Name`, `Name<Args>`
    Ref { name: String, args: Vec<TsType> },
    /// `typeof Name`
    TypeOf(String),
    Literal(Vec<TsMember>),
    Str(String),
    Array(Box<TsType>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    Paren(Box<TsType>),
}

impl TsType {
    pub fn keyword(name: &str) -> Self {
        TsType::Keyword(name.to_string())
    }

    pub fn reference(name: &str) -> Self {
        TsType::Ref {
            name: name.to_string(),
            args: Vec::new(),
        }
    }
}

pub const TYPE_KEYWORDS: &[&str] = &[
    "any", "unknown", "number", "string", "boolean", "bigint", "symbol", "object", "void",
    "undefined", "null", "never",
];

#[derive(Debug, Clone, PartialEq)]
pub enum TsMember {
    Property {
        readonly: bool,
        key: PropKey,
        optional: bool,
        type_ann: Option<TsType>,
    },
    Method {
        key: PropKey,
        optional: bool,
        params: Vec<Param>,
        return_type: Option<TsType>,
    },
    Call {
        params: Vec<Param>,
        return_type: Option<TsType>,
    },
    Construct {
        params: Vec<Param>,
        return_type: Option<TsType>,
    },
    Index {
        param: String,
        key_type: TsType,
        type_ann: TsType,
    },
}

impl TsMember {
    pub fn property(key: &str, optional: bool, ty: TsType) -> Self {
        TsMember::Property {
            readonly: false,
            key: PropKey::from_name(key),
            optional,
            type_ann: Some(ty),
        }
    }
}
