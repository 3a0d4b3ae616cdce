//! AST node types for JavaScript.
//!
//! Design principle: Everything is an Expression, Binding, or Statement.
//! This matches the approach used by esbuild and Bun for simplicity.
//!
//! Every node carries a span into the original source so that rewrites can
//! splice edits back into the text without regenerating untouched code.

use crate::span::Span;

/// The root AST for a parsed module/script.
#[derive(Debug, Clone)]
pub struct Ast {
    /// All statements in the program.
    pub stmts: Vec<Stmt>,
    /// Source code (for error messages and rewriting).
    pub source: String,
}

impl Ast {
    /// Create a new AST.
    pub fn new(stmts: Vec<Stmt>, source: String) -> Self {
        Self { stmts, source }
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // === Literals ===
    /// Null literal
    Null,
    /// Boolean literal
    Bool(bool),
    /// Number literal
    Number(f64),
    /// String literal
    String(String),
    /// Regular expression
    Regex { pattern: String, flags: String },
    /// Template literal (no substitutions)
    TemplateNoSub(String),
    /// Template literal with substitutions
    Template {
        quasis: Vec<String>,
        exprs: Vec<Box<Expr>>,
    },

    // === Identifiers ===
    /// Identifier reference
    Ident(String),
    /// `this` keyword
    This,
    /// `super` keyword
    Super,

    // === Compound Expressions ===
    /// Array literal: `[a, b, c]`
    Array(Vec<Option<Box<Expr>>>),
    /// Object literal: `{a: 1, b: 2}`
    Object(Vec<Property>),
    /// Function expression: `function() {}`
    Function(Box<Function>),
    /// Arrow function: `() => {}`
    Arrow(Box<ArrowFunction>),
    /// Class expression: `class {}`
    Class(Box<Class>),

    // === Operations ===
    /// Unary operation: `!x`, `-x`, `typeof x`
    Unary { op: UnaryOp, arg: Box<Expr> },
    /// Binary operation: `a + b`, `a && b`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Assignment: `a = b`, `a += b`
    Assign {
        op: AssignOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Update expression: `++a`, `a++`
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Expr>,
    },
    /// Conditional: `a ? b : c`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// Sequence: `a, b, c`
    Sequence(Vec<Expr>),

    // === Member Access ===
    /// Member expression: `a.b`, `a[b]`
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },

    // === Calls ===
    /// Function call: `f(a, b)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// New expression: `new Foo(a, b)`
    New { callee: Box<Expr>, args: Vec<Expr> },
    /// Tagged template: `` tag`template` ``
    TaggedTemplate { tag: Box<Expr>, quasi: Box<Expr> },

    // === Special ===
    /// Spread element: `...arr`
    Spread(Box<Expr>),
}

impl Expr {
    /// If this is a simple identifier reference, return its name.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// If this is a string literal, return its cooked value.
    pub fn as_string(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::String(value) => Some(value),
            _ => None,
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    // === Declarations ===
    /// Variable declaration: `let x = 1`
    Var {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    /// Function declaration: `function foo() {}`
    Function(Box<Function>),
    /// Class declaration: `class Foo {}`
    Class(Box<Class>),

    // === Control Flow ===
    /// Block statement: `{ ... }`
    Block(Vec<Stmt>),
    /// If statement: `if (x) { } else { }`
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    /// Switch statement
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    /// For statement: `for (;;) {}`
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    /// For-in statement: `for (x in obj) {}`
    ForIn {
        left: ForInit,
        right: Expr,
        body: Box<Stmt>,
    },
    /// For-of statement: `for (x of arr) {}`
    ForOf {
        left: ForInit,
        right: Expr,
        body: Box<Stmt>,
    },
    /// While statement
    While { test: Expr, body: Box<Stmt> },
    /// Do-while statement
    DoWhile { body: Box<Stmt>, test: Expr },
    /// Break statement
    Break { label: Option<String> },
    /// Continue statement
    Continue { label: Option<String> },
    /// Return statement
    Return { arg: Option<Expr> },
    /// Throw statement
    Throw { arg: Expr },
    /// Try statement
    Try {
        block: Vec<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
    },
    /// Labeled statement
    Labeled { label: String, body: Box<Stmt> },

    // === Expressions ===
    /// Expression statement
    Expr(Expr),
    /// Empty statement: `;`
    Empty,
    /// Debugger statement
    Debugger,
    /// With statement (deprecated)
    With { object: Expr, body: Box<Stmt> },

    // === Modules ===
    /// Import declaration
    Import(Box<ImportDecl>),
    /// Export declaration
    Export(Box<ExportDecl>),
}

// =============================================================================
// Bindings (Patterns)
// =============================================================================

/// A binding pattern (used in variable declarations, parameters, etc.)
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub kind: BindingKind,
    pub span: Span,
}

impl Binding {
    pub fn new(kind: BindingKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// If this is a simple identifier binding, return its name.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            BindingKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// Collect every identifier bound by this pattern into `out`.
    pub fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            BindingKind::Ident { name } => out.push(name),
            BindingKind::Array { elements } => {
                for element in elements.iter().flatten() {
                    element.binding.collect_names(out);
                }
            }
            BindingKind::Object { properties } => {
                for property in properties {
                    property.value.collect_names(out);
                }
            }
        }
    }
}

/// Binding pattern kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingKind {
    /// Simple identifier: `x`
    Ident { name: String },
    /// Array pattern: `[a, b, ...rest]`
    Array {
        elements: Vec<Option<ArrayPatternElement>>,
    },
    /// Object pattern: `{a, b: c, ...rest}`
    Object {
        properties: Vec<ObjectPatternProperty>,
    },
}

/// Element in an array pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPatternElement {
    pub binding: Binding,
    pub default: Option<Expr>,
    pub rest: bool,
}

/// Property in an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Binding,
    pub default: Option<Expr>,
    pub shorthand: bool,
    pub rest: bool,
}

// =============================================================================
// Supporting Types
// =============================================================================

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,  // -
    Plus,   // +
    Not,    // !
    BitNot, // ~
    Typeof, // typeof
    Void,   // void
    Delete, // delete
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %

    // Comparison
    Eq,          // ==
    NotEq,       // !=
    StrictEq,    // ===
    StrictNotEq, // !==
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=

    // Bitwise
    BitOr,  // |
    BitXor, // ^
    BitAnd, // &
    Shl,    // <<
    Shr,    // >>
    UShr,   // >>>

    // Logical
    And, // &&
    Or,  // ||

    // Other
    In,         // in
    Instanceof, // instanceof
}

impl BinaryOp {
    /// Whether this is a short-circuiting logical operator.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,       // =
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    UShrAssign,   // >>>=
    BitOrAssign,  // |=
    BitXorAssign, // ^=
    BitAndAssign, // &=
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment, // ++
    Decrement, // --
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    /// Keyword text for this declaration kind.
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

/// Variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub binding: Binding,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expr,
    pub kind: PropertyKind,
    pub shorthand: bool,
    pub computed: bool,
    pub span: Span,
}

/// Property key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Ident(String),
    String(String),
    Number(f64),
    Computed(Box<Expr>),
}

/// Property kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
    Method,
}

/// Switch case.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Expr>, // None for default
    pub consequent: Vec<Stmt>,
    pub span: Span,
}

/// Catch clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Binding>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// For loop initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    Expr(Expr),
}

// =============================================================================
// Functions and Classes
// =============================================================================

/// Function node (used for declarations, expressions, methods).
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    /// Span of the body block, braces included.
    pub body_span: Span,
    pub span: Span,
}

/// Arrow function node.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Vec<Param>,
    pub body: ArrowBody,
    pub span: Span,
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block {
        stmts: Vec<Stmt>,
        /// Span of the body block, braces included.
        span: Span,
    },
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub binding: Binding,
    pub default: Option<Expr>,
    pub rest: bool,
    pub span: Span,
}

/// Class node.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<String>,
    pub super_class: Option<Box<Expr>>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

/// Class member.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub kind: ClassMemberKind,
    pub span: Span,
}

/// Class member kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMemberKind {
    /// Method: `foo() {}`
    Method {
        key: PropertyKey,
        value: Function,
        kind: MethodKind,
        computed: bool,
        is_static: bool,
    },
    /// Empty (semicolon)
    Empty,
}

/// Method kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

// =============================================================================
// Modules
// =============================================================================

/// Import declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
    pub span: Span,
}

/// Import specifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// Default import: `import foo from "mod"`
    Default { local: String, span: Span },
    /// Namespace import: `import * as foo from "mod"`
    Namespace { local: String, span: Span },
    /// Named import: `import { foo, bar as baz } from "mod"`
    Named {
        imported: String,
        local: String,
        span: Span,
    },
}

/// Export declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecl {
    /// Named export: `export { foo, bar }`
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
        span: Span,
    },
    /// Default export: `export default expr`
    Default { expr: Expr, span: Span },
    /// Declaration export: `export function foo() {}`
    Decl { decl: Stmt, span: Span },
    /// All export: `export * from "mod"`
    All {
        exported: Option<String>,
        source: String,
        span: Span,
    },
}

/// Export specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
    pub span: Span,
}
