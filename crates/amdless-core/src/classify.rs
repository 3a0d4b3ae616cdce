//! Node classification over the parsed tree.
//!
//! One traversal finds the module-definition call, every synchronous and
//! side-effect `require`, every variable declaration, and every bound name.
//! No text is edited here; the emitter consumes the classification after the
//! walk completes.

use amdless_parser::{
    ArrowBody, Ast, Expr, ExprKind, Span, Stmt, StmtKind, VarKind,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ConvertError;

/// The module-definition call identified for a file.
#[derive(Debug)]
pub struct Definition {
    /// Span of the `define(...)` / `require(...)` call itself.
    pub call_span: Span,
    /// Span of the enclosing statement (the rewrite target).
    pub stmt_span: Span,
    /// Paths from the dependency array, in order.
    pub dep_paths: Vec<String>,
    /// The factory function, when one exists.
    pub factory: Option<Factory>,
}

/// The factory function of the module definition.
#[derive(Debug)]
pub struct Factory {
    /// Span of the function expression (identifies it during the walk).
    pub fn_span: Span,
    /// Parameter names by position (`None` for destructuring patterns).
    pub params: Vec<Option<String>>,
    /// Span of the body block, braces included.
    pub body_span: Span,
    /// Span of the `return` keyword of the first top-level `return expr;`.
    pub return_kw_span: Option<Span>,
}

/// Where a synchronous require call sits relative to its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequireSlot {
    /// The entire initializer of a variable declarator.
    DeclaratorInit { stmt_span: Span, index: usize },
    /// The entire expression of an expression statement.
    BareStmt { stmt_span: Span },
    /// Nested somewhere inside a larger expression.
    Embedded,
}

/// A `require('path')` call found outside the main definition.
#[derive(Debug)]
pub struct SyncRequire {
    pub call_span: Span,
    pub path: String,
    /// Whether the call is unconditionally executed on module load.
    pub is_static: bool,
    pub slot: RequireSlot,
}

/// A `require(['a', 'b'])` call with no callback.
#[derive(Debug)]
pub struct SideEffectRequire {
    pub stmt_span: Span,
    pub paths: Vec<String>,
}

/// One declarator of a registered variable statement.
#[derive(Debug)]
pub struct DeclInfo {
    pub span: Span,
    /// Bound name when the binding is a simple identifier.
    pub name: Option<String>,
}

/// A variable statement, registered so the emitter can regenerate it after
/// declarators are extracted.
#[derive(Debug)]
pub struct VarStmtInfo {
    pub kind: VarKind,
    pub decls: Vec<DeclInfo>,
}

/// Everything the walk produces.
#[derive(Debug, Default)]
pub struct Classification {
    pub definition: Option<Definition>,
    pub sync_requires: Vec<SyncRequire>,
    pub side_effects: Vec<SideEffectRequire>,
    pub var_stmts: FxHashMap<Span, VarStmtInfo>,
    /// All variable-binding identifiers declared anywhere in the file.
    pub used_names: FxHashSet<String>,
}

/// Ancestor kinds tracked during the walk, for the "always invoked" check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ancestor {
    Program,
    Factory,
    Call,
    Binary,
    ExprStmt,
    VarDecl,
    VarDeclarator,
    Block,
    /// Anything else: conditionals, loops, other functions, returns...
    Opaque,
}

impl Ancestor {
    /// Transparent ancestors continue the "always invoked" walk upward.
    fn is_transparent(self) -> bool {
        matches!(
            self,
            Ancestor::Call
                | Ancestor::Binary
                | Ancestor::ExprStmt
                | Ancestor::VarDecl
                | Ancestor::VarDeclarator
                | Ancestor::Block
        )
    }
}

/// Classify an entire file.
pub fn classify(ast: &Ast) -> Result<Classification, ConvertError> {
    let mut walker = Walker {
        stack: vec![Ancestor::Program],
        current_stmt: Span::default(),
        bare_candidates: Vec::new(),
        out: Classification::default(),
    };

    for stmt in &ast.stmts {
        walker.visit_stmt(stmt)?;
    }

    // A bare `require([...]);` at top level is only the main definition when
    // nothing stronger claimed the file.
    if walker.out.definition.is_none() {
        if let Some(&index) = walker.bare_candidates.first() {
            let se = walker.out.side_effects.remove(index);
            walker.out.definition = Some(Definition {
                call_span: se.stmt_span,
                stmt_span: se.stmt_span,
                dep_paths: se.paths,
                factory: None,
            });
        }
    }

    Ok(walker.out)
}

struct Walker {
    stack: Vec<Ancestor>,
    current_stmt: Span,
    /// Indices into `out.side_effects` that are top-level bare require arrays.
    bare_candidates: Vec<usize>,
    out: Classification,
}

impl Walker {
    /// A require is static when the first non-transparent ancestor, walking
    /// from the call outward, is the factory or the program itself.
    fn is_always_invoked(&self) -> bool {
        for ancestor in self.stack.iter().rev() {
            if ancestor.is_transparent() {
                continue;
            }
            return matches!(ancestor, Ancestor::Factory | Ancestor::Program);
        }
        false
    }

    fn with<T>(
        &mut self,
        ancestor: Ancestor,
        f: impl FnOnce(&mut Self) -> Result<T, ConvertError>,
    ) -> Result<T, ConvertError> {
        self.stack.push(ancestor);
        let result = f(self);
        self.stack.pop();
        result
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), ConvertError> {
        let prev_stmt = self.current_stmt;
        self.current_stmt = stmt.span;
        let result = self.visit_stmt_inner(stmt);
        self.current_stmt = prev_stmt;
        result
    }

    fn visit_stmt_inner(&mut self, stmt: &Stmt) -> Result<(), ConvertError> {
        match &stmt.kind {
            StmtKind::Var { kind, decls } => {
                let stmt_span = stmt.span;
                let info = VarStmtInfo {
                    kind: *kind,
                    decls: decls
                        .iter()
                        .map(|d| DeclInfo {
                            span: d.span,
                            name: d.binding.as_ident().map(str::to_string),
                        })
                        .collect(),
                };
                self.out.var_stmts.insert(stmt_span, info);

                for decl in decls {
                    let mut names = Vec::new();
                    decl.binding.collect_names(&mut names);
                    for name in names {
                        self.out.used_names.insert(name.to_string());
                    }
                }

                self.with(Ancestor::VarDecl, |w| {
                    for (index, decl) in decls.iter().enumerate() {
                        w.with(Ancestor::VarDeclarator, |w| {
                            if let Some(init) = &decl.init {
                                w.visit_expr(
                                    init,
                                    RequireSlot::DeclaratorInit { stmt_span, index },
                                )?;
                            }
                            Ok(())
                        })?;
                    }
                    Ok(())
                })
            }
            StmtKind::Expr(expr) => {
                let stmt_span = stmt.span;
                self.with(Ancestor::ExprStmt, |w| {
                    w.visit_expr(expr, RequireSlot::BareStmt { stmt_span })
                })
            }
            StmtKind::Block(stmts) => self.with(Ancestor::Block, |w| {
                for s in stmts {
                    w.visit_stmt(s)?;
                }
                Ok(())
            }),
            StmtKind::Function(func) => self.with(Ancestor::Opaque, |w| {
                w.visit_function_parts(&func.params, &func.body)
            }),
            StmtKind::Class(class) => self.visit_class(class),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(test, RequireSlot::Embedded)?;
                w.visit_stmt(consequent)?;
                if let Some(alt) = alternate {
                    w.visit_stmt(alt)?;
                }
                Ok(())
            }),
            StmtKind::Switch {
                discriminant,
                cases,
            } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(discriminant, RequireSlot::Embedded)?;
                for case in cases {
                    if let Some(test) = &case.test {
                        w.visit_expr(test, RequireSlot::Embedded)?;
                    }
                    for s in &case.consequent {
                        w.visit_stmt(s)?;
                    }
                }
                Ok(())
            }),
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.with(Ancestor::Opaque, |w| {
                if let Some(init) = init {
                    w.visit_for_init(init)?;
                }
                if let Some(test) = test {
                    w.visit_expr(test, RequireSlot::Embedded)?;
                }
                if let Some(update) = update {
                    w.visit_expr(update, RequireSlot::Embedded)?;
                }
                w.visit_stmt(body)
            }),
            StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body } => {
                self.with(Ancestor::Opaque, |w| {
                    w.visit_for_init(left)?;
                    w.visit_expr(right, RequireSlot::Embedded)?;
                    w.visit_stmt(body)
                })
            }
            StmtKind::While { test, body } | StmtKind::DoWhile { body, test } => {
                self.with(Ancestor::Opaque, |w| {
                    w.visit_expr(test, RequireSlot::Embedded)?;
                    w.visit_stmt(body)
                })
            }
            StmtKind::Return { arg } => self.with(Ancestor::Opaque, |w| {
                if let Some(arg) = arg {
                    w.visit_expr(arg, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
            StmtKind::Throw { arg } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(arg, RequireSlot::Embedded)
            }),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => self.with(Ancestor::Opaque, |w| {
                for s in block {
                    w.visit_stmt(s)?;
                }
                if let Some(handler) = handler {
                    for s in &handler.body {
                        w.visit_stmt(s)?;
                    }
                }
                if let Some(finalizer) = finalizer {
                    for s in finalizer {
                        w.visit_stmt(s)?;
                    }
                }
                Ok(())
            }),
            StmtKind::Labeled { body, .. } => {
                self.with(Ancestor::Opaque, |w| w.visit_stmt(body))
            }
            StmtKind::With { object, body } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(object, RequireSlot::Embedded)?;
                w.visit_stmt(body)
            }),
            StmtKind::Export(export) => self.with(Ancestor::Opaque, |w| {
                match &**export {
                    amdless_parser::ExportDecl::Default { expr, .. } => {
                        w.visit_expr(expr, RequireSlot::Embedded)
                    }
                    amdless_parser::ExportDecl::Decl { decl, .. } => w.visit_stmt(decl),
                    _ => Ok(()),
                }
            }),
            StmtKind::Break { .. }
            | StmtKind::Continue { .. }
            | StmtKind::Empty
            | StmtKind::Debugger
            | StmtKind::Import(_) => Ok(()),
        }
    }

    fn visit_for_init(&mut self, init: &amdless_parser::ForInit) -> Result<(), ConvertError> {
        match init {
            amdless_parser::ForInit::Var { decls, .. } => {
                for decl in decls {
                    let mut names = Vec::new();
                    decl.binding.collect_names(&mut names);
                    for name in names {
                        self.out.used_names.insert(name.to_string());
                    }
                    if let Some(init) = &decl.init {
                        self.visit_expr(init, RequireSlot::Embedded)?;
                    }
                }
                Ok(())
            }
            amdless_parser::ForInit::Expr(expr) => self.visit_expr(expr, RequireSlot::Embedded),
        }
    }

    fn visit_class(&mut self, class: &amdless_parser::Class) -> Result<(), ConvertError> {
        self.with(Ancestor::Opaque, |w| {
            if let Some(super_class) = &class.super_class {
                w.visit_expr(super_class, RequireSlot::Embedded)?;
            }
            for member in &class.body {
                if let amdless_parser::ClassMemberKind::Method { value, .. } = &member.kind {
                    w.visit_function_parts(&value.params, &value.body)?;
                }
            }
            Ok(())
        })
    }

    /// Visit a function's parameter defaults and body (caller pushes the
    /// ancestor kind).
    fn visit_function_parts(
        &mut self,
        params: &[amdless_parser::Param],
        body: &[Stmt],
    ) -> Result<(), ConvertError> {
        for param in params {
            if let Some(default) = &param.default {
                self.visit_expr(default, RequireSlot::Embedded)?;
            }
        }
        for stmt in body {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn visit_expr(&mut self, expr: &Expr, slot: RequireSlot) -> Result<(), ConvertError> {
        match &expr.kind {
            ExprKind::Call { callee, args } => {
                match callee.as_ident() {
                    Some("define") => return self.visit_define(expr, args),
                    Some("require") => return self.visit_require(expr, args, slot),
                    _ => {}
                }
                self.with(Ancestor::Call, |w| {
                    w.visit_expr(callee, RequireSlot::Embedded)?;
                    for arg in args {
                        w.visit_expr(arg, RequireSlot::Embedded)?;
                    }
                    Ok(())
                })
            }
            ExprKind::Binary { op, left, right } => {
                let ancestor = if op.is_logical() {
                    Ancestor::Opaque
                } else {
                    Ancestor::Binary
                };
                self.with(ancestor, |w| {
                    w.visit_expr(left, RequireSlot::Embedded)?;
                    w.visit_expr(right, RequireSlot::Embedded)
                })
            }
            ExprKind::Function(func) => self.with(Ancestor::Opaque, |w| {
                w.visit_function_parts(&func.params, &func.body)
            }),
            ExprKind::Arrow(arrow) => self.with(Ancestor::Opaque, |w| {
                for param in &arrow.params {
                    if let Some(default) = &param.default {
                        w.visit_expr(default, RequireSlot::Embedded)?;
                    }
                }
                match &arrow.body {
                    ArrowBody::Expr(body) => w.visit_expr(body, RequireSlot::Embedded),
                    ArrowBody::Block { stmts, .. } => {
                        for stmt in stmts {
                            w.visit_stmt(stmt)?;
                        }
                        Ok(())
                    }
                }
            }),
            ExprKind::Class(class) => self.visit_class(class),
            ExprKind::Array(elements) => self.with(Ancestor::Opaque, |w| {
                for element in elements.iter().flatten() {
                    w.visit_expr(element, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
            ExprKind::Object(properties) => self.with(Ancestor::Opaque, |w| {
                for property in properties {
                    if let amdless_parser::PropertyKey::Computed(key) = &property.key {
                        w.visit_expr(key, RequireSlot::Embedded)?;
                    }
                    w.visit_expr(&property.value, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
            ExprKind::Unary { arg, .. }
            | ExprKind::Update { arg, .. }
            | ExprKind::Spread(arg) => {
                self.with(Ancestor::Opaque, |w| w.visit_expr(arg, RequireSlot::Embedded))
            }
            ExprKind::Assign { left, right, .. } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(left, RequireSlot::Embedded)?;
                w.visit_expr(right, RequireSlot::Embedded)
            }),
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(test, RequireSlot::Embedded)?;
                w.visit_expr(consequent, RequireSlot::Embedded)?;
                w.visit_expr(alternate, RequireSlot::Embedded)
            }),
            ExprKind::Sequence(exprs) => self.with(Ancestor::Opaque, |w| {
                for e in exprs {
                    w.visit_expr(e, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
            ExprKind::Member {
                object, property, ..
            } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(object, RequireSlot::Embedded)?;
                w.visit_expr(property, RequireSlot::Embedded)
            }),
            ExprKind::New { callee, args } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(callee, RequireSlot::Embedded)?;
                for arg in args {
                    w.visit_expr(arg, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
            ExprKind::TaggedTemplate { tag, quasi } => self.with(Ancestor::Opaque, |w| {
                w.visit_expr(tag, RequireSlot::Embedded)?;
                w.visit_expr(quasi, RequireSlot::Embedded)
            }),
            ExprKind::Template { exprs, .. } => self.with(Ancestor::Opaque, |w| {
                for e in exprs {
                    w.visit_expr(e, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Number(_)
            | ExprKind::String(_)
            | ExprKind::Regex { .. }
            | ExprKind::TemplateNoSub(_)
            | ExprKind::Ident(_)
            | ExprKind::This
            | ExprKind::Super => Ok(()),
        }
    }

    // =========================================================================
    // define() / require() recognition
    // =========================================================================

    fn visit_define(&mut self, call: &Expr, args: &[Expr]) -> Result<(), ConvertError> {
        // define('name', ...) registers into a named registry - out of scope.
        if !args.is_empty() && matches!(args[0].kind, ExprKind::String(_)) {
            return Err(ConvertError::NamedDefine);
        }

        match args {
            [factory] if as_factory(factory).is_some() => {
                self.record_definition(call, Vec::new(), Some(factory))
            }
            [arg] if matches!(arg.kind, ExprKind::Ident(_)) => {
                Err(ConvertError::IdentifierCallback)
            }
            [deps] if matches!(deps.kind, ExprKind::Array(_)) => {
                self.record_definition(call, array_paths(deps), None)
            }
            [deps, factory, ..]
                if matches!(deps.kind, ExprKind::Array(_)) && as_factory(factory).is_some() =>
            {
                self.record_definition(call, array_paths(deps), Some(factory))
            }
            _ => self.with(Ancestor::Call, |w| {
                for arg in args {
                    w.visit_expr(arg, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
        }
    }

    fn visit_require(
        &mut self,
        call: &Expr,
        args: &[Expr],
        slot: RequireSlot,
    ) -> Result<(), ConvertError> {
        match args {
            // require('path') - synchronous require
            [arg] => match &arg.kind {
                ExprKind::String(path) => {
                    self.out.sync_requires.push(SyncRequire {
                        call_span: call.span,
                        path: path.clone(),
                        is_static: self.is_always_invoked(),
                        slot,
                    });
                    Ok(())
                }
                // require(['a', 'b']) - side effects only, or the module
                // definition when nothing stronger exists
                ExprKind::Array(_) => {
                    let top_level = matches!(slot, RequireSlot::BareStmt { .. })
                        && self.stack == [Ancestor::Program, Ancestor::ExprStmt];
                    let index = self.out.side_effects.len();
                    self.out.side_effects.push(SideEffectRequire {
                        stmt_span: self.current_stmt,
                        paths: array_paths(arg),
                    });
                    if top_level {
                        self.bare_candidates.push(index);
                    }
                    Ok(())
                }
                _ if as_factory(arg).is_some() => {
                    self.record_definition(call, Vec::new(), Some(arg))
                }
                // A local identifier or non-string literal is tolerated.
                ExprKind::Ident(_)
                | ExprKind::Number(_)
                | ExprKind::Bool(_)
                | ExprKind::Null
                | ExprKind::Regex { .. }
                | ExprKind::TemplateNoSub(_) => Ok(()),
                _ => Err(ConvertError::DynamicRequire),
            },
            // require(['a'], function (a) {...}) - module definition
            [deps, factory, ..]
                if matches!(deps.kind, ExprKind::Array(_)) && as_factory(factory).is_some() =>
            {
                self.record_definition(call, array_paths(deps), Some(factory))
            }
            _ => self.with(Ancestor::Call, |w| {
                for arg in args {
                    w.visit_expr(arg, RequireSlot::Embedded)?;
                }
                Ok(())
            }),
        }
    }

    fn record_definition(
        &mut self,
        call: &Expr,
        dep_paths: Vec<String>,
        factory_expr: Option<&Expr>,
    ) -> Result<(), ConvertError> {
        if self.out.definition.is_some() {
            return Err(ConvertError::MultipleDefinitions);
        }

        let parts = factory_expr.and_then(as_factory);
        let factory = factory_expr.zip(parts.as_ref()).map(|(expr, parts)| Factory {
            fn_span: expr.span,
            params: parts.params.clone(),
            body_span: parts.body_span,
            return_kw_span: first_top_level_return(parts.body),
        });

        self.out.definition = Some(Definition {
            call_span: call.span,
            stmt_span: self.current_stmt,
            dep_paths,
            factory,
        });

        // Descend into the factory body with the factory boundary marked, so
        // requires directly inside it classify as static.
        if let Some(parts) = parts {
            self.with(Ancestor::Factory, |w| {
                for stmt in parts.body {
                    w.visit_stmt(stmt)?;
                }
                Ok(())
            })?;
        }

        Ok(())
    }
}

/// Factory-relevant pieces of a function or block-bodied arrow expression.
struct FactoryParts<'a> {
    params: Vec<Option<String>>,
    body: &'a [Stmt],
    body_span: Span,
}

fn as_factory(expr: &Expr) -> Option<FactoryParts<'_>> {
    match &expr.kind {
        ExprKind::Function(func) => Some(FactoryParts {
            params: param_names(&func.params),
            body: &func.body,
            body_span: func.body_span,
        }),
        ExprKind::Arrow(arrow) => match &arrow.body {
            ArrowBody::Block { stmts, span } => Some(FactoryParts {
                params: param_names(&arrow.params),
                body: stmts,
                body_span: *span,
            }),
            ArrowBody::Expr(_) => None,
        },
        _ => None,
    }
}

fn param_names(params: &[amdless_parser::Param]) -> Vec<Option<String>> {
    params
        .iter()
        .map(|p| p.binding.as_ident().map(str::to_string))
        .collect()
}

/// String elements of a dependency array, in order.
fn array_paths(expr: &Expr) -> Vec<String> {
    match &expr.kind {
        ExprKind::Array(elements) => elements
            .iter()
            .flatten()
            .filter_map(|e| e.as_string().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Span of the `return` keyword of the first `return expr;` directly in the
/// factory body.
fn first_top_level_return(body: &[Stmt]) -> Option<Span> {
    body.iter().find_map(|stmt| match &stmt.kind {
        StmtKind::Return { arg: Some(_) } => {
            Some(Span::new(stmt.span.start, stmt.span.start + 6))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_src(source: &str) -> Classification {
        classify(&amdless_parser::parse(source).unwrap()).unwrap()
    }

    fn classify_err(source: &str) -> ConvertError {
        classify(&amdless_parser::parse(source).unwrap()).unwrap_err()
    }

    #[test]
    fn test_define_with_deps_and_factory() {
        let c = classify_src("define(['a', './b'], function (a, b) { return a; });");
        let def = c.definition.unwrap();
        assert_eq!(def.dep_paths, vec!["a", "./b"]);
        let factory = def.factory.unwrap();
        assert_eq!(
            factory.params,
            vec![Some("a".to_string()), Some("b".to_string())]
        );
        assert!(factory.return_kw_span.is_some());
    }

    #[test]
    fn test_define_factory_only() {
        let c = classify_src("define(function () { var x = 1; });");
        let def = c.definition.unwrap();
        assert!(def.dep_paths.is_empty());
        assert!(def.factory.is_some());
        assert!(c.used_names.contains("x"));
    }

    #[test]
    fn test_no_definition() {
        let c = classify_src("var a = 1; function f() {}");
        assert!(c.definition.is_none());
    }

    #[test]
    fn test_named_define_rejected() {
        assert!(matches!(
            classify_err("define('mod', function () {});"),
            ConvertError::NamedDefine
        ));
    }

    #[test]
    fn test_identifier_callback_rejected() {
        assert!(matches!(
            classify_err("define(factory);"),
            ConvertError::IdentifierCallback
        ));
    }

    #[test]
    fn test_multiple_definitions_rejected() {
        assert!(matches!(
            classify_err("define(function () {}); define(function () {});"),
            ConvertError::MultipleDefinitions
        ));
    }

    #[test]
    fn test_dynamic_require_rejected() {
        assert!(matches!(
            classify_err("define(function (require) { var x = require(getName()); });"),
            ConvertError::DynamicRequire
        ));
    }

    #[test]
    fn test_require_identifier_tolerated() {
        let c = classify_src("define(function (require) { var x = require(name); });");
        assert!(c.sync_requires.is_empty());
        assert!(c.definition.is_some());
    }

    #[test]
    fn test_static_require_at_factory_top_level() {
        let c = classify_src("define(function (require) { var x = require('a'); });");
        assert_eq!(c.sync_requires.len(), 1);
        assert!(c.sync_requires[0].is_static);
        assert!(matches!(
            c.sync_requires[0].slot,
            RequireSlot::DeclaratorInit { index: 0, .. }
        ));
    }

    #[test]
    fn test_require_in_if_block_is_not_static() {
        let c = classify_src(
            "define(function (require) { if (cond) { var x = require('a'); } });",
        );
        assert_eq!(c.sync_requires.len(), 1);
        assert!(!c.sync_requires[0].is_static);
    }

    #[test]
    fn test_require_in_nested_function_is_not_static() {
        let c = classify_src(
            "define(function (require) { function load() { return require('a'); } });",
        );
        assert_eq!(c.sync_requires.len(), 1);
        assert!(!c.sync_requires[0].is_static);
    }

    #[test]
    fn test_require_behind_logical_operator_is_not_static() {
        let c = classify_src("define(function (require) { var x = cond && require('a'); });");
        assert_eq!(c.sync_requires.len(), 1);
        assert!(!c.sync_requires[0].is_static);
    }

    #[test]
    fn test_require_in_call_argument_is_static() {
        let c = classify_src("define(function (require) { register(require('a')); });");
        assert_eq!(c.sync_requires.len(), 1);
        assert!(c.sync_requires[0].is_static);
        assert_eq!(c.sync_requires[0].slot, RequireSlot::Embedded);
    }

    #[test]
    fn test_bare_require_array_is_definition_when_alone() {
        let c = classify_src("require(['a', 'b']);");
        let def = c.definition.unwrap();
        assert_eq!(def.dep_paths, vec!["a", "b"]);
        assert!(def.factory.is_none());
        assert!(c.side_effects.is_empty());
    }

    #[test]
    fn test_require_array_is_side_effect_next_to_definition() {
        let c = classify_src("define(function () { require(['a']); });");
        assert!(c.definition.is_some());
        assert_eq!(c.side_effects.len(), 1);
        assert_eq!(c.side_effects[0].paths, vec!["a"]);
    }

    #[test]
    fn test_used_names_include_all_declarators() {
        let c = classify_src("var a = 1; define(function () { let b, c = 2; });");
        assert!(c.used_names.contains("a"));
        assert!(c.used_names.contains("b"));
        assert!(c.used_names.contains("c"));
    }
}
