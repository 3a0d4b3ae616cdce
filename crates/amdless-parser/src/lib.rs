//! amdless-parser: Span-preserving JavaScript parser and source editor.
//!
//! Architecture based on esbuild (Go) and Bun (Zig) parsers.
//!
//! # Design Principles
//!
//! 1. **Everything is an Expression, Binding, or Statement**
//!    - Expressions: `foo(1)`, `a + b`, `x.y`
//!    - Bindings: `a`, `[a, b]`, `{x: y}`
//!    - Statements: `let a = 1;`, `if (x) {}`, `return x;`
//!
//! 2. **Lexing on-demand**
//!    - Lexer is called during parsing, not upfront
//!    - Enables context-sensitive tokenization (regex vs division)
//!
//! 3. **Spans everywhere**
//!    - Every node points back into the original text
//!    - Rewrites go through [`SourceEditor`], which splices replacement
//!      text into spans and leaves the rest of the file untouched
//!
//! # Example
//!
//! ```
//! use amdless_parser::parse;
//!
//! let ast = parse("var x = 1 + 2;").unwrap();
//! assert_eq!(ast.stmts.len(), 1);
//! ```

mod ast;
mod editor;
mod lexer;
mod parser;
mod span;
mod token;

// Re-exports
pub use ast::*;
pub use editor::SourceEditor;
pub use lexer::Lexer;
pub use parser::{ParseError, Parser};
pub use span::{LineIndex, Span};
pub use token::{Token, TokenKind};

/// Parse JavaScript source code into an AST.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    Parser::new(source).parse()
}
