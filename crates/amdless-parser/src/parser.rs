//! JavaScript parser.
//!
//! Uses a recursive descent parser with Pratt parsing for expressions.
//! Based on esbuild and Bun parser architecture.
//!
//! Statement and expression spans end at the last consumed token, so a span
//! can be deleted or replaced in the source text without swallowing trailing
//! whitespace or comments.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parse error.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

/// Saved parser position for backtracking (arrow function detection).
struct Snapshot<'a> {
    lexer: Lexer<'a>,
    current: Token,
    prev_end: u32,
}

/// The parser.
pub struct Parser<'a> {
    /// The lexer.
    lexer: Lexer<'a>,
    /// Current token.
    current: Token,
    /// Source code (for creating AST).
    source: &'a str,
    /// End of the last consumed token.
    prev_end: u32,
    /// When false, `in` is not parsed as a binary operator (for-in init).
    allow_in: bool,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
            prev_end: 0,
            allow_in: true,
        }
    }

    /// Parse the entire source into an AST.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let stmts = self.parse_program()?;
        Ok(Ast::new(stmts, self.source.to_string()))
    }

    // =========================================================================
    // Token Handling
    // =========================================================================

    /// Get the current token kind.
    fn peek(&self) -> &TokenKind {
        &self.current.kind
    }

    /// Advance to the next token and return the previous.
    fn advance(&mut self) -> Token {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token());
        self.prev_end = prev.span.end;
        prev
    }

    /// Check if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    /// Check if the current token is the given contextual keyword.
    fn check_contextual(&self, word: &str) -> bool {
        matches!(self.peek(), TokenKind::Identifier(name) if name == word)
    }

    /// Check if at end of file.
    fn is_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    /// Consume a token if it matches, otherwise return an error.
    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                format!("Expected {:?}, got {:?}", kind, self.peek()),
                self.current.span,
            ))
        }
    }

    /// Consume a token if it matches, returning true if consumed.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a contextual keyword if it matches.
    fn eat_contextual(&mut self, word: &str) -> bool {
        if self.check_contextual(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a semicolon (with ASI support).
    fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        // Automatic Semicolon Insertion (ASI) rules:
        // 1. Explicit semicolon
        if self.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        // 2. Before closing brace
        if self.check(&TokenKind::RBrace) {
            return Ok(());
        }
        // 3. At end of file
        if self.is_eof() {
            return Ok(());
        }
        // 4. After newline - the current token was preceded by a line terminator
        if self.current.had_newline_before {
            return Ok(());
        }
        Err(ParseError::new("Expected semicolon", self.current.span))
    }

    fn save(&self) -> Snapshot<'a> {
        Snapshot {
            lexer: self.lexer.clone(),
            current: self.current.clone(),
            prev_end: self.prev_end,
        }
    }

    fn restore(&mut self, snapshot: Snapshot<'a>) {
        self.lexer = snapshot.lexer;
        self.current = snapshot.current;
        self.prev_end = snapshot.prev_end;
    }

    // =========================================================================
    // Program Parsing
    // =========================================================================

    /// Parse a program (list of statements).
    fn parse_program(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.is_eof() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    // =========================================================================
    // Statement Parsing
    // =========================================================================

    /// Parse a statement.
    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;

        match self.peek() {
            // Declarations
            TokenKind::Var | TokenKind::Let | TokenKind::Const => self.parse_var_decl(),
            TokenKind::Function => self.parse_function_decl(),
            TokenKind::Class => self.parse_class_decl(),

            // Control flow
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Throw => self.parse_throw_stmt(),
            TokenKind::Try => self.parse_try_stmt(),
            TokenKind::With => self.parse_with_stmt(),
            TokenKind::Debugger => self.parse_debugger_stmt(),

            // Block
            TokenKind::LBrace => self.parse_block_stmt(),

            // Empty statement
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::new(StmtKind::Empty, Span::new(start, self.prev_end)))
            }

            // Module declarations
            TokenKind::Import => self.parse_import_decl(),
            TokenKind::Export => self.parse_export_decl(),

            // Labeled statement or expression statement
            TokenKind::Identifier(_) => {
                if matches!(self.lexer.peek().kind, TokenKind::Colon) {
                    let label = match self.advance().kind {
                        TokenKind::Identifier(name) => name,
                        _ => unreachable!(),
                    };
                    self.advance(); // consume ':'
                    let body = self.parse_stmt()?;
                    return Ok(Stmt::new(
                        StmtKind::Labeled {
                            label,
                            body: Box::new(body),
                        },
                        Span::new(start, self.prev_end),
                    ));
                }
                self.parse_expr_stmt()
            }

            // Expression statement
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse a block statement.
    fn parse_block_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            stmts.push(self.parse_stmt()?);
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Stmt::new(
            StmtKind::Block(stmts),
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse variable declaration.
    fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;

        let kind = match self.peek() {
            TokenKind::Var => VarKind::Var,
            TokenKind::Let => VarKind::Let,
            TokenKind::Const => VarKind::Const,
            _ => unreachable!(),
        };
        self.advance();

        let mut decls = Vec::new();
        loop {
            decls.push(self.parse_var_declarator()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Var { kind, decls },
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse a variable declarator.
    fn parse_var_declarator(&mut self) -> Result<VarDeclarator, ParseError> {
        let start = self.current.span.start;
        let binding = self.parse_binding()?;

        let init = if self.eat(&TokenKind::Eq) {
            Some(self.parse_assign_expr()?)
        } else {
            None
        };

        Ok(VarDeclarator {
            binding,
            init,
            span: Span::new(start, self.prev_end),
        })
    }

    /// Parse a binding pattern.
    fn parse_binding(&mut self) -> Result<Binding, ParseError> {
        let start = self.current.span.start;

        match self.peek() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(Binding::new(
                    BindingKind::Ident { name },
                    Span::new(start, self.prev_end),
                ))
            }
            TokenKind::LBracket => self.parse_array_binding(),
            TokenKind::LBrace => self.parse_object_binding(),
            _ => Err(ParseError::new(
                format!("Expected identifier, '[', or '{{', got {:?}", self.peek()),
                self.current.span,
            )),
        }
    }

    /// Parse array binding pattern: `[a, b, ...rest]`
    fn parse_array_binding(&mut self) -> Result<Binding, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                // Elision
                elements.push(None);
            } else {
                let rest = self.eat(&TokenKind::Spread);
                let binding = self.parse_binding()?;
                let default = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_assign_expr()?)
                } else {
                    None
                };
                elements.push(Some(ArrayPatternElement {
                    binding,
                    default,
                    rest,
                }));
            }

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBracket)?;
        Ok(Binding::new(
            BindingKind::Array { elements },
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse object binding pattern: `{a, b: c, ...rest}`
    fn parse_object_binding(&mut self) -> Result<Binding, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBrace)?;

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let rest = self.eat(&TokenKind::Spread);

            if rest {
                let binding = self.parse_binding()?;
                properties.push(ObjectPatternProperty {
                    key: PropertyKey::Ident(String::new()),
                    value: binding,
                    default: None,
                    shorthand: false,
                    rest: true,
                });
            } else {
                let key = self.parse_property_key()?;

                if self.eat(&TokenKind::Colon) {
                    // `key: value`
                    let value = self.parse_binding()?;
                    let default = if self.eat(&TokenKind::Eq) {
                        Some(self.parse_assign_expr()?)
                    } else {
                        None
                    };
                    properties.push(ObjectPatternProperty {
                        key,
                        value,
                        default,
                        shorthand: false,
                        rest: false,
                    });
                } else {
                    // Shorthand: `key` or `key = default`
                    let name = match &key {
                        PropertyKey::Ident(n) => n.clone(),
                        _ => {
                            return Err(ParseError::new(
                                "Expected identifier in shorthand property",
                                self.current.span,
                            ))
                        }
                    };
                    let default = if self.eat(&TokenKind::Eq) {
                        Some(self.parse_assign_expr()?)
                    } else {
                        None
                    };
                    properties.push(ObjectPatternProperty {
                        key,
                        value: Binding::new(BindingKind::Ident { name }, self.current.span),
                        default,
                        shorthand: true,
                        rest: false,
                    });
                }
            }

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Binding::new(
            BindingKind::Object { properties },
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse a property key.
    fn parse_property_key(&mut self) -> Result<PropertyKey, ParseError> {
        match self.peek() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(PropertyKey::Ident(name))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(PropertyKey::String(s))
            }
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(PropertyKey::Number(n))
            }
            TokenKind::LBracket => {
                self.advance();
                let expr = self.parse_assign_expr()?;
                self.expect(&TokenKind::RBracket)?;
                Ok(PropertyKey::Computed(Box::new(expr)))
            }
            // Keywords can be used as property names
            _ => {
                if let Some(name) = keyword_to_str(self.peek()) {
                    self.advance();
                    Ok(PropertyKey::Ident(name.to_string()))
                } else {
                    Err(ParseError::new(
                        format!("Expected property key, got {:?}", self.peek()),
                        self.current.span,
                    ))
                }
            }
        }
    }

    /// Parse function declaration.
    fn parse_function_decl(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        let func = self.parse_function()?;
        Ok(Stmt::new(
            StmtKind::Function(Box::new(func)),
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse a function (after any `function` keyword prefix decisions).
    fn parse_function(&mut self) -> Result<Function, ParseError> {
        let start = self.current.span.start;

        self.expect(&TokenKind::Function)?;

        // Function name (optional for expressions)
        let name = match self.peek() {
            TokenKind::Identifier(n) => {
                let n = n.clone();
                self.advance();
                Some(n)
            }
            _ => None,
        };

        let params = self.parse_params()?;
        let (body, body_span) = self.parse_function_body()?;

        Ok(Function {
            name,
            params,
            body,
            body_span,
            span: Span::new(start, self.prev_end),
        })
    }

    /// Parse a brace-delimited function body. Returns the statements and the
    /// span of the block, braces included.
    fn parse_function_body(&mut self) -> Result<(Vec<Stmt>, Span), ParseError> {
        let body_start = self.current.span.start;
        self.expect(&TokenKind::LBrace)?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            body.push(self.parse_stmt()?);
        }

        self.expect(&TokenKind::RBrace)?;
        Ok((body, Span::new(body_start, self.prev_end)))
    }

    /// Parse a parenthesized parameter list.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_params_inner()?;
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// Parse parameters up to (but not including) the closing paren.
    fn parse_params_inner(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_eof() {
            let start = self.current.span.start;
            let rest = self.eat(&TokenKind::Spread);
            let binding = self.parse_binding()?;
            let default = if self.eat(&TokenKind::Eq) {
                Some(self.parse_assign_expr()?)
            } else {
                None
            };
            params.push(Param {
                binding,
                default,
                rest,
                span: Span::new(start, self.prev_end),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse class declaration.
    fn parse_class_decl(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        let class = self.parse_class()?;
        Ok(Stmt::new(
            StmtKind::Class(Box::new(class)),
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse a class.
    fn parse_class(&mut self) -> Result<Class, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Class)?;

        let name = match self.peek() {
            TokenKind::Identifier(n) => {
                let n = n.clone();
                self.advance();
                Some(n)
            }
            _ => None,
        };

        let super_class = if self.eat(&TokenKind::Extends) {
            Some(Box::new(self.parse_left_hand_side_expr()?))
        } else {
            None
        };

        self.expect(&TokenKind::LBrace)?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Semicolon) {
                let span = self.current.span;
                self.advance();
                body.push(ClassMember {
                    kind: ClassMemberKind::Empty,
                    span,
                });
                continue;
            }
            body.push(self.parse_class_member()?);
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Class {
            name,
            super_class,
            body,
            span: Span::new(start, self.prev_end),
        })
    }

    /// Parse a class member (method, getter, setter).
    fn parse_class_member(&mut self) -> Result<ClassMember, ParseError> {
        let start = self.current.span.start;

        // `static` is contextual: only a modifier when not followed by `(` or `=`
        let is_static = self.check_contextual("static")
            && !matches!(self.lexer.peek().kind, TokenKind::LParen | TokenKind::Eq);
        if is_static {
            self.advance();
        }

        // Getter/setter — only when followed by a property key
        let mut kind = MethodKind::Method;
        if self.check_contextual("get")
            && !matches!(
                self.lexer.peek().kind,
                TokenKind::LParen | TokenKind::Eq | TokenKind::Semicolon | TokenKind::RBrace
            )
        {
            self.advance();
            kind = MethodKind::Get;
        } else if self.check_contextual("set")
            && !matches!(
                self.lexer.peek().kind,
                TokenKind::LParen | TokenKind::Eq | TokenKind::Semicolon | TokenKind::RBrace
            )
        {
            self.advance();
            kind = MethodKind::Set;
        }

        let computed = self.check(&TokenKind::LBracket);
        let key = self.parse_property_key()?;

        if !self.check(&TokenKind::LParen) {
            return Err(ParseError::new(
                "Expected method body in class",
                self.current.span,
            ));
        }

        if kind == MethodKind::Method && !is_static && !computed {
            if let PropertyKey::Ident(name) = &key {
                if name == "constructor" {
                    kind = MethodKind::Constructor;
                }
            }
        }

        let fn_start = self.current.span.start;
        let params = self.parse_params()?;
        let (body, body_span) = self.parse_function_body()?;

        let value = Function {
            name: None,
            params,
            body,
            body_span,
            span: Span::new(fn_start, self.prev_end),
        };

        Ok(ClassMember {
            kind: ClassMemberKind::Method {
                key,
                value,
                kind,
                computed,
                is_static,
            },
            span: Span::new(start, self.prev_end),
        })
    }

    // =========================================================================
    // Control Flow Statements
    // =========================================================================

    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let consequent = Box::new(self.parse_stmt()?);
        let alternate = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                test,
                consequent,
                alternate,
            },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_switch_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Switch)?;
        self.expect(&TokenKind::LParen)?;
        let discriminant = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::LBrace)?;

        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let case_start = self.current.span.start;
            let test = if self.eat(&TokenKind::Case) {
                let test = self.parse_expr()?;
                Some(test)
            } else {
                self.expect(&TokenKind::Default)?;
                None
            };
            self.expect(&TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !self.check(&TokenKind::Case)
                && !self.check(&TokenKind::Default)
                && !self.check(&TokenKind::RBrace)
                && !self.is_eof()
            {
                consequent.push(self.parse_stmt()?);
            }

            cases.push(SwitchCase {
                test,
                consequent,
                span: Span::new(case_start, self.prev_end),
            });
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Stmt::new(
            StmtKind::Switch {
                discriminant,
                cases,
            },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_for_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        // Initializer (parsed with `in` disabled so `for (x in y)` works)
        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if matches!(
            self.peek(),
            TokenKind::Var | TokenKind::Let | TokenKind::Const
        ) {
            let kind = match self.peek() {
                TokenKind::Var => VarKind::Var,
                TokenKind::Let => VarKind::Let,
                TokenKind::Const => VarKind::Const,
                _ => unreachable!(),
            };
            self.advance();

            let prev_allow_in = self.allow_in;
            self.allow_in = false;
            let first = self.parse_var_declarator();
            self.allow_in = prev_allow_in;
            let first = first?;

            if self.check(&TokenKind::In) || self.check_contextual("of") {
                let is_of = self.check_contextual("of");
                self.advance();
                let right = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                let left = ForInit::Var {
                    kind,
                    decls: vec![first],
                };
                let kind = if is_of {
                    StmtKind::ForOf { left, right, body }
                } else {
                    StmtKind::ForIn { left, right, body }
                };
                return Ok(Stmt::new(kind, Span::new(start, self.prev_end)));
            }

            let mut decls = vec![first];
            while self.eat(&TokenKind::Comma) {
                decls.push(self.parse_var_declarator()?);
            }
            Some(ForInit::Var { kind, decls })
        } else {
            let prev_allow_in = self.allow_in;
            self.allow_in = false;
            let expr = self.parse_expr();
            self.allow_in = prev_allow_in;
            let expr = expr?;

            if self.check(&TokenKind::In) || self.check_contextual("of") {
                let is_of = self.check_contextual("of");
                self.advance();
                let right = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                let left = ForInit::Expr(expr);
                let kind = if is_of {
                    StmtKind::ForOf { left, right, body }
                } else {
                    StmtKind::ForIn { left, right, body }
                };
                return Ok(Stmt::new(kind, Span::new(start, self.prev_end)));
            }

            Some(ForInit::Expr(expr))
        };

        self.expect(&TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);

        Ok(Stmt::new(
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::new(
            StmtKind::While { test, body },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_do_while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Do)?;
        let body = Box::new(self.parse_stmt()?);
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.eat(&TokenKind::Semicolon);
        Ok(Stmt::new(
            StmtKind::DoWhile { body, test },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_break_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Break)?;
        let label = self.parse_optional_label();
        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Break { label },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_continue_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Continue)?;
        let label = self.parse_optional_label();
        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Continue { label },
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse a label after break/continue (none if a newline intervenes).
    fn parse_optional_label(&mut self) -> Option<String> {
        if self.current.had_newline_before {
            return None;
        }
        if let TokenKind::Identifier(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            None
        }
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Return)?;

        // ASI: `return\n expr` returns undefined
        let arg = if self.current.had_newline_before
            || self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_eof()
        {
            None
        } else {
            Some(self.parse_expr()?)
        };

        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Return { arg },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_throw_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Throw)?;
        let arg = self.parse_expr()?;
        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Throw { arg },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_try_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Try)?;

        let block = match self.parse_block_stmt()?.kind {
            StmtKind::Block(stmts) => stmts,
            _ => unreachable!(),
        };

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.current.span.start;
            self.advance();
            let param = if self.eat(&TokenKind::LParen) {
                let param = self.parse_binding()?;
                self.expect(&TokenKind::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = match self.parse_block_stmt()?.kind {
                StmtKind::Block(stmts) => stmts,
                _ => unreachable!(),
            };
            Some(CatchClause {
                param,
                body,
                span: Span::new(catch_start, self.prev_end),
            })
        } else {
            None
        };

        let finalizer = if self.eat(&TokenKind::Finally) {
            match self.parse_block_stmt()?.kind {
                StmtKind::Block(stmts) => Some(stmts),
                _ => unreachable!(),
            }
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::new(
                "Expected catch or finally after try",
                self.current.span,
            ));
        }

        Ok(Stmt::new(
            StmtKind::Try {
                block,
                handler,
                finalizer,
            },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_with_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::With)?;
        self.expect(&TokenKind::LParen)?;
        let object = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::new(
            StmtKind::With { object, body },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_debugger_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Debugger)?;
        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Debugger,
            Span::new(start, self.prev_end),
        ))
    }

    // =========================================================================
    // Module Declarations
    // =========================================================================

    fn parse_import_decl(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Import)?;

        // Side-effect import: `import 'mod';`
        if let TokenKind::String(source) = self.peek() {
            let source = source.clone();
            self.advance();
            self.expect_semicolon()?;
            let span = Span::new(start, self.prev_end);
            return Ok(Stmt::new(
                StmtKind::Import(Box::new(ImportDecl {
                    specifiers: Vec::new(),
                    source,
                    span,
                })),
                span,
            ));
        }

        let mut specifiers = Vec::new();

        // Default import
        if let TokenKind::Identifier(local) = self.peek() {
            let local = local.clone();
            let spec_span = self.current.span;
            self.advance();
            specifiers.push(ImportSpecifier::Default {
                local,
                span: spec_span,
            });
            if !self.eat(&TokenKind::Comma) {
                return self.finish_import(start, specifiers);
            }
        }

        // Namespace import: `* as ns`
        if self.check(&TokenKind::Star) {
            let spec_start = self.current.span.start;
            self.advance();
            if !self.eat_contextual("as") {
                return Err(ParseError::new("Expected 'as'", self.current.span));
            }
            let local = self.expect_identifier()?;
            specifiers.push(ImportSpecifier::Namespace {
                local,
                span: Span::new(spec_start, self.prev_end),
            });
            return self.finish_import(start, specifiers);
        }

        // Named imports: `{ a, b as c }`
        self.expect(&TokenKind::LBrace)?;
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let spec_start = self.current.span.start;
            let imported = self.expect_identifier()?;
            let local = if self.eat_contextual("as") {
                self.expect_identifier()?
            } else {
                imported.clone()
            };
            specifiers.push(ImportSpecifier::Named {
                imported,
                local,
                span: Span::new(spec_start, self.prev_end),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;

        self.finish_import(start, specifiers)
    }

    fn finish_import(
        &mut self,
        start: u32,
        specifiers: Vec<ImportSpecifier>,
    ) -> Result<Stmt, ParseError> {
        if !self.eat_contextual("from") {
            return Err(ParseError::new("Expected 'from'", self.current.span));
        }
        let source = match self.peek() {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                s
            }
            _ => {
                return Err(ParseError::new(
                    "Expected module specifier string",
                    self.current.span,
                ))
            }
        };
        self.expect_semicolon()?;
        let span = Span::new(start, self.prev_end);
        Ok(Stmt::new(
            StmtKind::Import(Box::new(ImportDecl {
                specifiers,
                source,
                span,
            })),
            span,
        ))
    }

    fn parse_export_decl(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Export)?;

        // `export default expr;`
        if self.eat(&TokenKind::Default) {
            let expr = self.parse_assign_expr()?;
            self.expect_semicolon()?;
            let span = Span::new(start, self.prev_end);
            return Ok(Stmt::new(
                StmtKind::Export(Box::new(ExportDecl::Default { expr, span })),
                span,
            ));
        }

        // `export * [as ns] from 'mod';`
        if self.eat(&TokenKind::Star) {
            let exported = if self.eat_contextual("as") {
                Some(self.expect_identifier()?)
            } else {
                None
            };
            if !self.eat_contextual("from") {
                return Err(ParseError::new("Expected 'from'", self.current.span));
            }
            let source = match self.peek() {
                TokenKind::String(s) => {
                    let s = s.clone();
                    self.advance();
                    s
                }
                _ => {
                    return Err(ParseError::new(
                        "Expected module specifier string",
                        self.current.span,
                    ))
                }
            };
            self.expect_semicolon()?;
            let span = Span::new(start, self.prev_end);
            return Ok(Stmt::new(
                StmtKind::Export(Box::new(ExportDecl::All {
                    exported,
                    source,
                    span,
                })),
                span,
            ));
        }

        // `export { a, b as c } [from 'mod'];`
        if self.check(&TokenKind::LBrace) {
            self.advance();
            let mut specifiers = Vec::new();
            while !self.check(&TokenKind::RBrace) && !self.is_eof() {
                let spec_start = self.current.span.start;
                let local = self.expect_identifier()?;
                let exported = if self.eat_contextual("as") {
                    self.expect_identifier()?
                } else {
                    local.clone()
                };
                specifiers.push(ExportSpecifier {
                    local,
                    exported,
                    span: Span::new(spec_start, self.prev_end),
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBrace)?;

            let source = if self.eat_contextual("from") {
                match self.peek() {
                    TokenKind::String(s) => {
                        let s = s.clone();
                        self.advance();
                        Some(s)
                    }
                    _ => {
                        return Err(ParseError::new(
                            "Expected module specifier string",
                            self.current.span,
                        ))
                    }
                }
            } else {
                None
            };
            self.expect_semicolon()?;
            let span = Span::new(start, self.prev_end);
            return Ok(Stmt::new(
                StmtKind::Export(Box::new(ExportDecl::Named {
                    specifiers,
                    source,
                    span,
                })),
                span,
            ));
        }

        // `export <declaration>`
        let decl = match self.peek() {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => self.parse_var_decl()?,
            TokenKind::Function => self.parse_function_decl()?,
            TokenKind::Class => self.parse_class_decl()?,
            _ => {
                return Err(ParseError::new(
                    format!("Expected declaration after 'export', got {:?}", self.peek()),
                    self.current.span,
                ))
            }
        };
        let span = Span::new(start, self.prev_end);
        Ok(Stmt::new(
            StmtKind::Export(Box::new(ExportDecl::Decl { decl, span })),
            span,
        ))
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Default => {
                self.advance();
                Ok("default".to_string())
            }
            _ => Err(ParseError::new(
                format!("Expected identifier, got {:?}", self.peek()),
                self.current.span,
            )),
        }
    }

    /// Parse an expression statement.
    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        let expr = self.parse_expr()?;
        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Expr(expr),
            Span::new(start, self.prev_end),
        ))
    }

    // =========================================================================
    // Expression Parsing
    // =========================================================================

    /// Parse an expression (lowest precedence - comma/sequence).
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let first = self.parse_assign_expr()?;

        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_assign_expr()?);
        }

        Ok(Expr::new(
            ExprKind::Sequence(exprs),
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse an assignment expression.
    fn parse_assign_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;

        // Single-identifier arrow: `x => ...`
        if matches!(self.peek(), TokenKind::Identifier(_))
            && matches!(self.lexer.peek().kind, TokenKind::Arrow)
        {
            let param_span = self.current.span;
            let name = match self.advance().kind {
                TokenKind::Identifier(name) => name,
                _ => unreachable!(),
            };
            let params = vec![Param {
                binding: Binding::new(BindingKind::Ident { name }, param_span),
                default: None,
                rest: false,
                span: param_span,
            }];
            return self.parse_arrow_body(params, start);
        }

        let left = self.parse_conditional_expr()?;

        if self.peek().is_assignment() {
            let op = assign_op_from_token(self.peek());
            self.advance();
            let right = self.parse_assign_expr()?;
            return Ok(Expr::new(
                ExprKind::Assign {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                Span::new(start, self.prev_end),
            ));
        }

        Ok(left)
    }

    /// Parse a conditional (ternary) expression.
    fn parse_conditional_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let test = self.parse_binary_expr(1)?;

        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }

        // `in` is always allowed between `?` and `:`
        let prev_allow_in = self.allow_in;
        self.allow_in = true;
        let consequent = self.parse_assign_expr();
        self.allow_in = prev_allow_in;
        let consequent = consequent?;

        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assign_expr()?;

        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse binary expressions with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut left = self.parse_unary_expr()?;

        loop {
            let prec = match self.peek().binary_precedence() {
                Some(prec) if prec >= min_prec => prec,
                _ => break,
            };
            if matches!(self.peek(), TokenKind::In) && !self.allow_in {
                break;
            }

            let op = binary_op_from_token(self.peek());
            self.advance();
            let right = self.parse_binary_expr(prec + 1)?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                Span::new(start, self.prev_end),
            );
        }

        Ok(left)
    }

    /// Parse a unary expression.
    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;

        let op = match self.peek() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let arg = self.parse_unary_expr()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    arg: Box::new(arg),
                },
                Span::new(start, self.prev_end),
            ));
        }

        // Prefix update: `++x`, `--x`
        if matches!(self.peek(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let op = if matches!(self.peek(), TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.advance();
            let arg = self.parse_unary_expr()?;
            return Ok(Expr::new(
                ExprKind::Update {
                    op,
                    prefix: true,
                    arg: Box::new(arg),
                },
                Span::new(start, self.prev_end),
            ));
        }

        self.parse_postfix_expr()
    }

    /// Parse a postfix expression (`x++`, `x--`).
    fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let expr = self.parse_left_hand_side_expr()?;

        // No newline allowed before postfix operators
        if matches!(self.peek(), TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.current.had_newline_before
        {
            let op = if matches!(self.peek(), TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.advance();
            return Ok(Expr::new(
                ExprKind::Update {
                    op,
                    prefix: false,
                    arg: Box::new(expr),
                },
                Span::new(start, self.prev_end),
            ));
        }

        Ok(expr)
    }

    /// Parse a left-hand-side expression (member access and calls).
    fn parse_left_hand_side_expr(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::New) {
            return self.parse_new_expr();
        }

        let start = self.current.span.start;
        let mut expr = self.parse_primary_expr()?;

        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_member_property()?;
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: false,
                        },
                        Span::new(start, self.prev_end),
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let prev_allow_in = self.allow_in;
                    self.allow_in = true;
                    let property = self.parse_expr();
                    self.allow_in = prev_allow_in;
                    let property = property?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: true,
                        },
                        Span::new(start, self.prev_end),
                    );
                }
                TokenKind::LParen => {
                    let args = self.parse_arguments()?;
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        Span::new(start, self.prev_end),
                    );
                }
                TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                    let quasi = self.parse_template_literal()?;
                    expr = Expr::new(
                        ExprKind::TaggedTemplate {
                            tag: Box::new(expr),
                            quasi: Box::new(quasi),
                        },
                        Span::new(start, self.prev_end),
                    );
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parse a `new` expression.
    fn parse_new_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::New)?;

        // Nested `new new Foo()()`
        let mut callee = if self.check(&TokenKind::New) {
            self.parse_new_expr()?
        } else {
            self.parse_primary_expr()?
        };

        // Member access binds tighter than the `new` arguments
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_member_property()?;
                    callee = Expr::new(
                        ExprKind::Member {
                            object: Box::new(callee),
                            property: Box::new(property),
                            computed: false,
                        },
                        Span::new(start, self.prev_end),
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let property = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    callee = Expr::new(
                        ExprKind::Member {
                            object: Box::new(callee),
                            property: Box::new(property),
                            computed: true,
                        },
                        Span::new(start, self.prev_end),
                    );
                }
                _ => break,
            }
        }

        let args = if self.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::new(
            ExprKind::New {
                callee: Box::new(callee),
                args,
            },
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse a member property after `.` (identifier or keyword).
    fn parse_member_property(&mut self) -> Result<Expr, ParseError> {
        let span = self.current.span;
        match self.peek() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::new(ExprKind::Ident(name), span))
            }
            _ => {
                if let Some(name) = keyword_to_str(self.peek()) {
                    self.advance();
                    Ok(Expr::new(ExprKind::Ident(name.to_string()), span))
                } else {
                    Err(ParseError::new(
                        format!("Expected property name, got {:?}", self.peek()),
                        self.current.span,
                    ))
                }
            }
        }
    }

    /// Parse call arguments: `(a, b, ...c)`
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let prev_allow_in = self.allow_in;
        self.allow_in = true;

        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_eof() {
            let arg = if self.check(&TokenKind::Spread) {
                let start = self.current.span.start;
                self.advance();
                let inner = self.parse_assign_expr()?;
                Expr::new(
                    ExprKind::Spread(Box::new(inner)),
                    Span::new(start, self.prev_end),
                )
            } else {
                self.parse_assign_expr()?
            };
            args.push(arg);

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.allow_in = prev_allow_in;
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    /// Parse a primary expression.
    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let span = self.current.span;

        match self.peek() {
            TokenKind::Null => {
                self.advance();
                Ok(Expr::new(ExprKind::Null, span))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(true), span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(false), span))
            }
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::new(ExprKind::Number(n), span))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(Expr::new(ExprKind::String(s), span))
            }
            TokenKind::Regex { pattern, flags } => {
                let pattern = pattern.clone();
                let flags = flags.clone();
                self.advance();
                Ok(Expr::new(ExprKind::Regex { pattern, flags }, span))
            }
            TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                self.parse_template_literal()
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::new(ExprKind::Ident(name), span))
            }
            TokenKind::This => {
                self.advance();
                Ok(Expr::new(ExprKind::This, span))
            }
            TokenKind::Super => {
                self.advance();
                Ok(Expr::new(ExprKind::Super, span))
            }
            TokenKind::Function => {
                let func = self.parse_function()?;
                let fn_span = func.span;
                Ok(Expr::new(ExprKind::Function(Box::new(func)), fn_span))
            }
            TokenKind::Class => {
                let class = self.parse_class()?;
                let class_span = class.span;
                Ok(Expr::new(ExprKind::Class(Box::new(class)), class_span))
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::LParen => self.parse_paren_or_arrow(),
            _ => Err(ParseError::new(
                format!("Unexpected token {:?}", self.peek()),
                self.current.span,
            )),
        }
    }

    /// Parse an array literal: `[a, , b, ...c]`
    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                // Elision
                elements.push(None);
            } else if self.check(&TokenKind::Spread) {
                let spread_start = self.current.span.start;
                self.advance();
                let inner = self.parse_assign_expr()?;
                elements.push(Some(Box::new(Expr::new(
                    ExprKind::Spread(Box::new(inner)),
                    Span::new(spread_start, self.prev_end),
                ))));
            } else {
                elements.push(Some(Box::new(self.parse_assign_expr()?)));
            }

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(
            ExprKind::Array(elements),
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse an object literal.
    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBrace)?;

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let prop_start = self.current.span.start;

            // Spread property
            if self.eat(&TokenKind::Spread) {
                let arg = self.parse_assign_expr()?;
                let prop_span = Span::new(prop_start, self.prev_end);
                properties.push(Property {
                    key: PropertyKey::Ident(String::new()),
                    value: Expr::new(ExprKind::Spread(Box::new(arg)), prop_span),
                    kind: PropertyKind::Init,
                    shorthand: false,
                    computed: false,
                    span: prop_span,
                });
            } else {
                // Getter/setter — only when followed by a property key
                // `get name() {}` → getter; `get: val` or `get()` or `get,` → regular property
                let mut kind = PropertyKind::Init;
                if self.check_contextual("get")
                    && !matches!(
                        self.lexer.peek().kind,
                        TokenKind::LParen
                            | TokenKind::Colon
                            | TokenKind::Comma
                            | TokenKind::RBrace
                            | TokenKind::Eq
                    )
                {
                    self.advance();
                    kind = PropertyKind::Get;
                } else if self.check_contextual("set")
                    && !matches!(
                        self.lexer.peek().kind,
                        TokenKind::LParen
                            | TokenKind::Colon
                            | TokenKind::Comma
                            | TokenKind::RBrace
                            | TokenKind::Eq
                    )
                {
                    self.advance();
                    kind = PropertyKind::Set;
                }

                let computed = self.check(&TokenKind::LBracket);
                let key = self.parse_property_key()?;

                if self.check(&TokenKind::LParen) {
                    // Method shorthand: { foo() {} }
                    let fn_start = self.current.span.start;
                    let params = self.parse_params()?;
                    let (body, body_span) = self.parse_function_body()?;
                    let prop_span = Span::new(prop_start, self.prev_end);

                    let func = Function {
                        name: None,
                        params,
                        body,
                        body_span,
                        span: Span::new(fn_start, self.prev_end),
                    };

                    properties.push(Property {
                        key,
                        value: Expr::new(ExprKind::Function(Box::new(func)), prop_span),
                        kind: if kind == PropertyKind::Init {
                            PropertyKind::Method
                        } else {
                            kind
                        },
                        shorthand: false,
                        computed,
                        span: prop_span,
                    });
                } else if self.eat(&TokenKind::Colon) {
                    // Regular property: { key: value }
                    let value = self.parse_assign_expr()?;
                    properties.push(Property {
                        key,
                        value,
                        kind,
                        shorthand: false,
                        computed,
                        span: Span::new(prop_start, self.prev_end),
                    });
                } else {
                    // Shorthand property: { key }
                    let name = match &key {
                        PropertyKey::Ident(n) => n.clone(),
                        _ => {
                            return Err(ParseError::new(
                                "Expected identifier in shorthand property",
                                self.current.span,
                            ))
                        }
                    };
                    let prop_span = Span::new(prop_start, self.prev_end);
                    properties.push(Property {
                        key,
                        value: Expr::new(ExprKind::Ident(name), prop_span),
                        kind: PropertyKind::Init,
                        shorthand: true,
                        computed: false,
                        span: prop_span,
                    });
                }
            }

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(
            ExprKind::Object(properties),
            Span::new(start, self.prev_end),
        ))
    }

    /// Parse a parenthesized expression or an arrow function.
    ///
    /// The two are ambiguous until the closing paren: try parsing an arrow
    /// parameter list first, and backtrack to a grouped expression when no
    /// `=>` follows.
    fn parse_paren_or_arrow(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let snapshot = self.save();

        let arrow_params = (|| -> Result<Vec<Param>, ParseError> {
            self.expect(&TokenKind::LParen)?;
            let params = self.parse_params_inner()?;
            self.expect(&TokenKind::RParen)?;
            Ok(params)
        })();

        match arrow_params {
            Ok(params)
                if self.check(&TokenKind::Arrow) && !self.current.had_newline_before =>
            {
                self.parse_arrow_body(params, start)
            }
            _ => {
                self.restore(snapshot);
                self.expect(&TokenKind::LParen)?;
                let prev_allow_in = self.allow_in;
                self.allow_in = true;
                let expr = self.parse_expr();
                self.allow_in = prev_allow_in;
                let expr = expr?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
        }
    }

    /// Parse an arrow function body (current token is `=>`).
    fn parse_arrow_body(&mut self, params: Vec<Param>, start: u32) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Arrow)?;

        let body = if self.check(&TokenKind::LBrace) {
            let (stmts, span) = self.parse_function_body()?;
            ArrowBody::Block { stmts, span }
        } else {
            ArrowBody::Expr(Box::new(self.parse_assign_expr()?))
        };

        let span = Span::new(start, self.prev_end);
        Ok(Expr::new(
            ExprKind::Arrow(Box::new(ArrowFunction { params, body, span })),
            span,
        ))
    }

    /// Parse a template literal (current token is the head).
    fn parse_template_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;

        match self.peek() {
            TokenKind::TemplateNoSub(value) => {
                let value = value.clone();
                self.advance();
                Ok(Expr::new(
                    ExprKind::TemplateNoSub(value),
                    Span::new(start, self.prev_end),
                ))
            }
            TokenKind::TemplateHead(head) => {
                let mut quasis = vec![head.clone()];
                let mut exprs = Vec::new();
                self.advance();

                loop {
                    exprs.push(Box::new(self.parse_expr()?));

                    if !self.check(&TokenKind::RBrace) {
                        return Err(ParseError::new(
                            "Expected '}' in template literal",
                            self.current.span,
                        ));
                    }

                    // The text after '}' is template text, not regular tokens:
                    // rescan from the lexer position directly.
                    let cont = self.lexer.scan_template_continuation();
                    self.prev_end = cont.span.end;
                    match cont.kind {
                        TokenKind::TemplateMiddle(value) => {
                            quasis.push(value);
                            self.current = self.lexer.next_token();
                        }
                        TokenKind::TemplateTail(value) => {
                            quasis.push(value);
                            self.current = self.lexer.next_token();
                            break;
                        }
                        _ => {
                            return Err(ParseError::new(
                                "Unterminated template literal",
                                cont.span,
                            ))
                        }
                    }
                }

                Ok(Expr::new(
                    ExprKind::Template { quasis, exprs },
                    Span::new(start, self.prev_end),
                ))
            }
            _ => unreachable!(),
        }
    }
}

/// Map a keyword token back to its source text (for property names).
fn keyword_to_str(kind: &TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::Var => "var",
        TokenKind::Let => "let",
        TokenKind::Const => "const",
        TokenKind::Function => "function",
        TokenKind::Class => "class",
        TokenKind::Extends => "extends",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::Switch => "switch",
        TokenKind::Case => "case",
        TokenKind::Default => "default",
        TokenKind::For => "for",
        TokenKind::While => "while",
        TokenKind::Do => "do",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        TokenKind::Return => "return",
        TokenKind::Try => "try",
        TokenKind::Catch => "catch",
        TokenKind::Finally => "finally",
        TokenKind::Throw => "throw",
        TokenKind::New => "new",
        TokenKind::Delete => "delete",
        TokenKind::Typeof => "typeof",
        TokenKind::Void => "void",
        TokenKind::In => "in",
        TokenKind::Instanceof => "instanceof",
        TokenKind::This => "this",
        TokenKind::Super => "super",
        TokenKind::Null => "null",
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Import => "import",
        TokenKind::Export => "export",
        TokenKind::With => "with",
        TokenKind::Debugger => "debugger",
        _ => return None,
    })
}

fn binary_op_from_token(kind: &TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::BangEq => BinaryOp::NotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::BangEqEq => BinaryOp::StrictNotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::LtLt => BinaryOp::Shl,
        TokenKind::GtGt => BinaryOp::Shr,
        TokenKind::GtGtGt => BinaryOp::UShr,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::In => BinaryOp::In,
        TokenKind::Instanceof => BinaryOp::Instanceof,
        _ => unreachable!("not a binary operator: {:?}", kind),
    }
}

fn assign_op_from_token(kind: &TokenKind) -> AssignOp {
    match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::AddAssign,
        TokenKind::MinusEq => AssignOp::SubAssign,
        TokenKind::StarEq => AssignOp::MulAssign,
        TokenKind::SlashEq => AssignOp::DivAssign,
        TokenKind::PercentEq => AssignOp::ModAssign,
        TokenKind::LtLtEq => AssignOp::ShlAssign,
        TokenKind::GtGtEq => AssignOp::ShrAssign,
        TokenKind::GtGtGtEq => AssignOp::UShrAssign,
        TokenKind::PipeEq => AssignOp::BitOrAssign,
        TokenKind::CaretEq => AssignOp::BitXorAssign,
        TokenKind::AmpEq => AssignOp::BitAndAssign,
        _ => unreachable!("not an assignment operator: {:?}", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Ast {
        Parser::new(source).parse().expect("parse failed")
    }

    #[test]
    fn test_var_decl() {
        let ast = parse("var x = 1, y;");
        assert_eq!(ast.stmts.len(), 1);
        match &ast.stmts[0].kind {
            StmtKind::Var { kind, decls } => {
                assert_eq!(*kind, VarKind::Var);
                assert_eq!(decls.len(), 2);
                assert_eq!(decls[0].binding.as_ident(), Some("x"));
                assert!(decls[1].init.is_none());
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_stmt_span_ends_at_semicolon() {
        let source = "var x = 1;  // trailing";
        let ast = parse(source);
        let span = ast.stmts[0].span;
        assert_eq!(&source[span.start as usize..span.end as usize], "var x = 1;");
    }

    #[test]
    fn test_call_expression() {
        let ast = parse("define(['a', 'b'], function (a, b) { return a; });");
        match &ast.stmts[0].kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Call { callee, args } => {
                    assert_eq!(callee.as_ident(), Some("define"));
                    assert_eq!(args.len(), 2);
                    assert!(matches!(args[0].kind, ExprKind::Array(_)));
                    assert!(matches!(args[1].kind, ExprKind::Function(_)));
                }
                other => panic!("expected call, got {:?}", other),
            },
            other => panic!("expected expr stmt, got {:?}", other),
        }
    }

    #[test]
    fn test_function_body_span_includes_braces() {
        let source = "var f = function () { return 1; };";
        let ast = parse(source);
        match &ast.stmts[0].kind {
            StmtKind::Var { decls, .. } => match &decls[0].init.as_ref().unwrap().kind {
                ExprKind::Function(func) => {
                    let body = func.body_span;
                    assert_eq!(
                        &source[body.start as usize..body.end as usize],
                        "{ return 1; }"
                    );
                }
                other => panic!("expected function, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_asi() {
        let ast = parse("var x = 1\nvar y = 2\nx + y");
        assert_eq!(ast.stmts.len(), 3);
    }

    #[test]
    fn test_return_asi() {
        let ast = parse("function f() { return\n1 }");
        match &ast.stmts[0].kind {
            StmtKind::Function(func) => {
                assert!(matches!(func.body[0].kind, StmtKind::Return { arg: None }));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_arrow_functions() {
        let ast = parse("var f = x => x + 1; var g = (a, b) => { return a; };");
        assert_eq!(ast.stmts.len(), 2);
        match &ast.stmts[1].kind {
            StmtKind::Var { decls, .. } => {
                assert!(matches!(
                    decls[0].init.as_ref().unwrap().kind,
                    ExprKind::Arrow(_)
                ));
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_paren_expr_not_arrow() {
        let ast = parse("var x = (a + b) * c;");
        match &ast.stmts[0].kind {
            StmtKind::Var { decls, .. } => {
                assert!(matches!(
                    decls[0].init.as_ref().unwrap().kind,
                    ExprKind::Binary { op: BinaryOp::Mul, .. }
                ));
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_for_in_and_for_of() {
        let ast = parse("for (var k in obj) {} for (var v of arr) {}");
        assert!(matches!(ast.stmts[0].kind, StmtKind::ForIn { .. }));
        assert!(matches!(ast.stmts[1].kind, StmtKind::ForOf { .. }));
    }

    #[test]
    fn test_template_literal_with_substitution() {
        let ast = parse("var s = `a${x}b${y}c`;");
        match &ast.stmts[0].kind {
            StmtKind::Var { decls, .. } => match &decls[0].init.as_ref().unwrap().kind {
                ExprKind::Template { quasis, exprs } => {
                    assert_eq!(quasis, &["a", "b", "c"]);
                    assert_eq!(exprs.len(), 2);
                }
                other => panic!("expected template, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_object_literal_forms() {
        let ast = parse("var o = { a: 1, b, get c() { return 2; }, d() {} };");
        match &ast.stmts[0].kind {
            StmtKind::Var { decls, .. } => match &decls[0].init.as_ref().unwrap().kind {
                ExprKind::Object(props) => {
                    assert_eq!(props.len(), 4);
                    assert!(props[1].shorthand);
                    assert_eq!(props[2].kind, PropertyKind::Get);
                    assert_eq!(props[3].kind, PropertyKind::Method);
                }
                other => panic!("expected object, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_property_access() {
        let ast = parse("var x = promise.catch(handler).finally(done);");
        assert_eq!(ast.stmts.len(), 1);
    }

    #[test]
    fn test_class_with_members() {
        let ast = parse("class Foo extends Bar { constructor(a) { this.a = a; } get x() { return 1; } static make() { return new Foo(0); } }");
        match &ast.stmts[0].kind {
            StmtKind::Class(class) => {
                assert_eq!(class.name.as_deref(), Some("Foo"));
                assert_eq!(class.body.len(), 3);
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_import_export() {
        let ast = parse("import foo from 'mod';\nimport { a, b as c } from 'other';\nexport default foo;");
        assert_eq!(ast.stmts.len(), 3);
        assert!(matches!(ast.stmts[0].kind, StmtKind::Import(_)));
        assert!(matches!(ast.stmts[2].kind, StmtKind::Export(_)));
    }

    #[test]
    fn test_labeled_statement() {
        let ast = parse("outer: for (;;) { break outer; }");
        assert!(matches!(ast.stmts[0].kind, StmtKind::Labeled { .. }));
    }

    #[test]
    fn test_parse_error_on_garbage() {
        assert!(Parser::new("var = ;").parse().is_err());
    }
}
