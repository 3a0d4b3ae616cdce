//! AMD to ES module conversion.
//!
//! The pipeline is parse, classify, edit: the classification pass finds the
//! module definition and every require, then this module records span edits
//! against the original text and renders them. Code outside the edited spans
//! survives byte-for-byte.

use std::sync::OnceLock;

use amdless_parser::{Span, SourceEditor};
use indexmap::map::Entry;
use indexmap::IndexMap;
use regex_lite::Regex;
use rustc_hash::FxHashMap;

use crate::beautify::beautify;
use crate::classify::{classify, RequireSlot};
use crate::error::ConvertError;
use crate::naming::NameAllocator;
use crate::options::ConvertOptions;

/// Convert one file of AMD source text to an ES module.
///
/// A file with no module definition comes back unchanged.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let ast = amdless_parser::parse(source)?;
    let analysis = classify(&ast)?;

    let Some(def) = &analysis.definition else {
        return Ok(source.to_string());
    };

    let mut editor = SourceEditor::new(source);

    // Seed the allocator with every name already bound in the file, plus the
    // factory params (they become import bindings).
    let mut used = analysis.used_names.clone();
    let params: &[Option<String>] = def.factory.as_ref().map_or(&[], |f| f.params.as_slice());
    for name in params.iter().flatten() {
        used.insert(name.clone());
    }
    let mut names = NameAllocator::new(used, options.logical_names);

    // Dependency map: module path -> import binding, in import order.
    // Array paths pair with factory params by position; a path left without a
    // param imports for side effects only.
    let mut deps: IndexMap<String, Option<String>> = IndexMap::new();
    let mut cjs = false;
    for (i, path) in def.dep_paths.iter().enumerate() {
        if path == "require" {
            // The pseudo-dependency switches on CommonJS-style handling and
            // never becomes an import itself.
            cjs = true;
            continue;
        }
        let binding = params.get(i).cloned().flatten();
        match deps.entry(path.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_none() {
                    *entry.get_mut() = binding;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(binding);
            }
        }
    }
    // An extra param named `require`, beyond the dependency array, does the
    // same as the pseudo-dependency.
    if params
        .iter()
        .enumerate()
        .any(|(i, p)| i >= def.dep_paths.len() && p.as_deref() == Some("require"))
    {
        cjs = true;
    }

    // Rewrite static synchronous requires. Conditional and otherwise
    // non-static calls stay exactly as written.
    let mut removed: FxHashMap<Span, Vec<bool>> = FxHashMap::default();
    for req in &analysis.sync_requires {
        if !req.is_static {
            continue;
        }
        match req.slot {
            RequireSlot::DeclaratorInit { stmt_span, index } if cjs => {
                let info = analysis.var_stmts.get(&stmt_span);
                let decl_name = info
                    .and_then(|i| i.decls.get(index))
                    .and_then(|d| d.name.clone());
                let claimable = !matches!(deps.get(&req.path), Some(Some(_)));
                match (decl_name, info) {
                    // The declared name becomes the import binding and the
                    // declarator disappears. A name already taken by another
                    // import falls through to an in-place rename instead, so
                    // two imports never share a binding.
                    (Some(name), Some(info)) if claimable && !binding_taken(&deps, &name) => {
                        deps.insert(req.path.clone(), Some(name));
                        removed
                            .entry(stmt_span)
                            .or_insert_with(|| vec![false; info.decls.len()])[index] = true;
                    }
                    _ => rename_call(&mut editor, &mut deps, &mut names, req.call_span, &req.path),
                }
            }
            // A require for nothing but its side effects.
            RequireSlot::BareStmt { stmt_span } if cjs => {
                deps.entry(req.path.clone()).or_insert(None);
                editor.replace(stmt_span, "");
            }
            _ => rename_call(&mut editor, &mut deps, &mut names, req.call_span, &req.path),
        }
    }

    // Array-style side-effect requires: import the paths, drop the statement.
    for se in &analysis.side_effects {
        for path in &se.paths {
            deps.entry(path.clone()).or_insert(None);
        }
        editor.replace(se.stmt_span, "");
    }

    // Regenerate declarations that lost declarators to import extraction.
    for (stmt_span, gone) in &removed {
        let info = &analysis.var_stmts[stmt_span];
        if gone.iter().all(|g| *g) {
            editor.replace(*stmt_span, "");
        } else {
            let kept: Vec<String> = info
                .decls
                .iter()
                .zip(gone)
                .filter(|(_, gone)| !**gone)
                .map(|(decl, _)| editor.slice(decl.span))
                .collect();
            editor.replace(
                *stmt_span,
                format!("{} {};", info.kind.as_str(), kept.join(", ")),
            );
        }
    }

    // Assemble the replacement for the definition statement: import lines,
    // then the factory body with its braces stripped.
    let mut module_code = String::new();
    for (path, binding) in &deps {
        match binding {
            Some(name) => module_code.push_str(&format!("import {name} from '{path}';\n")),
            None => module_code.push_str(&format!("import '{path}';\n")),
        }
    }
    if let Some(factory) = &def.factory {
        if let Some(kw) = factory.return_kw_span {
            editor.replace(kw, "export default");
        }
        let body = Span::new(factory.body_span.start + 1, factory.body_span.end - 1);
        module_code.push_str(&editor.slice(body));
    }
    if options.beautify {
        module_code = beautify(&module_code);
    }
    // The keyword swap inherits whatever spacing `return` had.
    module_code = export_default_re()
        .replace(&module_code, "export default ")
        .into_owned();

    editor.replace(def.stmt_span, module_code);
    Ok(editor.render())
}

/// Whether some dependency already imports under this binding name.
fn binding_taken(deps: &IndexMap<String, Option<String>>, name: &str) -> bool {
    deps.values().flatten().any(|binding| binding == name)
}

fn export_default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"export\s+default\s+").expect("static pattern"))
}

/// Replace a require call with its import binding, generating the binding on
/// first use of the path.
fn rename_call(
    editor: &mut SourceEditor<'_>,
    deps: &mut IndexMap<String, Option<String>>,
    names: &mut NameAllocator,
    call_span: Span,
    path: &str,
) {
    let name = match deps.get(path) {
        Some(Some(existing)) => existing.clone(),
        _ => {
            let name = names.name_for(path);
            deps.insert(path.to_string(), Some(name.clone()));
            name
        }
    };
    editor.replace(call_span, name);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_default(source: &str) -> String {
        convert(source, &ConvertOptions::new().with_beautify(true)).unwrap()
    }

    #[test]
    fn test_amd_array_form() {
        let out = convert_default(
            "define(['a', './b'], function (a, b) {\n    return a.x;\n});\n",
        );
        assert_eq!(
            out,
            "import a from 'a';\nimport b from './b';\n\nexport default a.x;\n\n"
        );
    }

    #[test]
    fn test_commonjs_wrapper_form() {
        let out = convert_default(
            "define(function (require) {\n    var x = require('a');\n    return x;\n});\n",
        );
        assert_eq!(out, "import x from 'a';\n\n\nexport default x;\n\n");
    }

    #[test]
    fn test_no_definition_passes_through() {
        let source = "var x = 1;\nfunction f() { return require; }\n";
        assert_eq!(convert_default(source), source);
    }

    #[test]
    fn test_bare_require_array() {
        assert_eq!(convert_default("require(['a', 'b']);\n"), "import 'a';\nimport 'b';\n\n");
    }

    #[test]
    fn test_conditional_require_left_in_place() {
        let out = convert_default(
            "define(function (require) {\n    if (flag) {\n        require('a').go();\n    }\n});\n",
        );
        assert!(out.contains("require('a').go();"));
        assert!(!out.contains("import"));
    }

    #[test]
    fn test_without_beautify_keeps_indentation() {
        let out = convert(
            "define(['a'], function (a) {\n    return a;\n});\n",
            &ConvertOptions::new(),
        )
        .unwrap();
        assert_eq!(out, "import a from 'a';\n\n    export default a;\n\n");
    }

    #[test]
    fn test_named_define_is_an_error() {
        let err = convert("define('mod', function () {});", &ConvertOptions::new()).unwrap_err();
        assert!(matches!(err, ConvertError::NamedDefine));
    }
}
