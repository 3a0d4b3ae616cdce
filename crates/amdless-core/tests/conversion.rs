//! End-to-end conversion tests over whole source files.

use amdless_core::{convert, ConvertError, ConvertOptions};

fn beautified(source: &str) -> String {
    convert(source, &ConvertOptions::new().with_beautify(true)).unwrap()
}

fn logical(source: &str) -> String {
    convert(
        source,
        &ConvertOptions::new().with_beautify(true).with_logical_names(true),
    )
    .unwrap()
}

#[test]
fn test_file_without_amd_structure_is_untouched() {
    let source = "const x = 1;\nif (x) {\n  console.log(x); // keep my formatting\n}\n";
    assert_eq!(beautified(source), source);
}

#[test]
fn test_array_deps_become_default_imports() {
    let out = beautified("define(['a', './b'], function (a, b) {\n    return a.x;\n});\n");
    assert_eq!(
        out,
        "import a from 'a';\nimport b from './b';\n\nexport default a.x;\n\n"
    );
}

#[test]
fn test_arrow_factory() {
    let out = beautified("define(['a'], (a) => {\n    return a;\n});\n");
    assert_eq!(out, "import a from 'a';\n\nexport default a;\n\n");
}

#[test]
fn test_commonjs_declarator_extraction() {
    let out = beautified(
        "define(function (require) {\n    var x = require('a');\n    return x;\n});\n",
    );
    assert!(out.starts_with("import x from 'a';\n"));
    assert!(out.contains("export default x;"));
    assert!(!out.contains("require("));
    assert!(!out.contains("var x"));
}

#[test]
fn test_require_pseudo_dependency_enables_extraction() {
    let out = beautified(
        "define(['require'], function (require) {\n    var x = require('a');\n    return x;\n});\n",
    );
    assert!(out.starts_with("import x from 'a';\n"));
    assert!(!out.contains("'require'"));
}

#[test]
fn test_partial_declaration_is_regenerated() {
    let out = beautified(
        "define(function (require) {\n    var a = require('a'), n = 1;\n    return n;\n});\n",
    );
    assert!(out.starts_with("import a from 'a';\n"));
    assert!(out.contains("var n = 1;"));
    assert!(!out.contains("require("));
}

#[test]
fn test_bare_require_statement_is_extracted() {
    let out = beautified(
        "define(function (require) {\n    require('side');\n    return 1;\n});\n",
    );
    assert!(out.starts_with("import 'side';\n"));
    assert!(out.contains("export default 1;"));
    assert!(!out.contains("require("));
}

#[test]
fn test_standalone_require_array_becomes_side_effect_imports() {
    assert_eq!(
        beautified("require(['a', 'b']);\n"),
        "import 'a';\nimport 'b';\n\n"
    );
}

#[test]
fn test_side_effect_require_inside_factory() {
    let out = beautified(
        "define(['jquery'], function ($) {\n    require(['analytics']);\n    return $;\n});\n",
    );
    assert!(out.starts_with("import $ from 'jquery';\nimport 'analytics';\n"));
    assert!(out.contains("export default $;"));
    assert!(!out.contains("require("));
}

#[test]
fn test_import_count_matches_unique_paths() {
    // The array dependency and the in-body require reference the same path;
    // only one import comes out and the require reuses its binding.
    let out = beautified(
        "define(['a'], function (a) {\n    var b = require('a');\n    return b;\n});\n",
    );
    assert_eq!(out.matches("import ").count(), 1);
    assert!(out.contains("var b = a;"));
}

#[test]
fn test_conditional_require_is_not_hoisted() {
    let out = beautified(
        "define(function (require) {\n    var log = require('logger');\n    if (debug) {\n        require('debugger-panel').show();\n    }\n});\n",
    );
    assert!(out.starts_with("import log from 'logger';\n"));
    assert!(out.contains("require('debugger-panel').show();"));
    assert!(!out.contains("debugger-panel';"));
}

#[test]
fn test_require_in_nested_function_is_not_hoisted() {
    let out = beautified(
        "define(function (require) {\n    return function () {\n        return require('late');\n    };\n});\n",
    );
    assert!(out.contains("require('late')"));
    assert!(!out.contains("import"));
}

#[test]
fn test_default_binding_name_sanitizes_path() {
    let out = beautified(
        "define(function (require) {\n    register(require('../utils/date-helper.js'));\n});\n",
    );
    assert!(out.contains("import $___utils_date_helper_js from '../utils/date-helper.js';"));
    assert!(out.contains("register($___utils_date_helper_js);"));
}

#[test]
fn test_logical_names_take_filename_stem() {
    let out = logical(
        "define(function (require) {\n    register(require('../utils/date-helper.js'));\n});\n",
    );
    assert!(out.contains("import date_helper from '../utils/date-helper.js';"));
    assert!(out.contains("register(date_helper);"));
}

#[test]
fn test_logical_name_collision_gets_suffix() {
    let out = logical(
        "define(function (require) {\n    register(require('./a/util.js'), require('./b/util.js'));\n});\n",
    );
    assert!(out.contains("import util from './a/util.js';"));
    assert!(out.contains("import util1 from './b/util.js';"));
    assert!(out.contains("register(util, util1);"));
}

#[test]
fn test_extraction_never_reuses_an_import_binding() {
    // The declarator's name is already taken by the array dependency's
    // binding, so the require is renamed in place under a fresh name.
    let out = beautified(
        "define(['a'], function (a, require) {\n    var a = require('b');\n    return a;\n});\n",
    );
    assert!(out.contains("import a from 'a';"));
    assert!(out.contains("import $__b from 'b';"));
    assert!(out.contains("var a = $__b;"));
    assert!(!out.contains("import a from 'b';"));
}

#[test]
fn test_named_define_fails() {
    let err = convert("define('named', function () {});", &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, ConvertError::NamedDefine));
}

#[test]
fn test_identifier_callback_fails() {
    let err = convert("define(factory);", &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, ConvertError::IdentifierCallback));
}

#[test]
fn test_two_definitions_fail() {
    let err = convert(
        "define(function () {});\ndefine(function () {});\n",
        &ConvertOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::MultipleDefinitions));
}

#[test]
fn test_dynamic_require_fails() {
    let err = convert(
        "define(function (require) { var x = require(getPath()); });",
        &ConvertOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::DynamicRequire));
}

#[test]
fn test_parse_error_is_reported() {
    let err = convert("define(['a'], function (a) {", &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, ConvertError::Parse(_)));
}

#[test]
fn test_comments_outside_definition_survive() {
    let out = beautified(
        "// header comment\ndefine(['a'], function (a) {\n    return a;\n});\n// footer\n",
    );
    assert!(out.starts_with("// header comment\n"));
    assert!(out.ends_with("// footer\n"));
}
