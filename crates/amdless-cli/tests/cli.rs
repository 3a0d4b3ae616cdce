//! Black-box tests driving the amdless binary.

use std::fs;
use std::process::Command;

fn amdless() -> Command {
    Command::new(env!("CARGO_BIN_EXE_amdless"))
}

#[test]
fn test_single_file_prints_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("widget.js");
    fs::write(
        &input,
        "define(['a'], function (a) {\n    return a;\n});\n",
    )
    .unwrap();

    let output = amdless().arg("-b").arg(&input).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("import a from 'a';\n"));
    assert!(stdout.contains("export default a;"));
}

#[test]
fn test_dir_mode_mirrors_layout() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("dist");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("top.js"), "define(function () { return 1; });\n").unwrap();
    fs::write(
        src.join("nested/inner.js"),
        "define(function () { return 2; });\n",
    )
    .unwrap();

    let status = amdless()
        .arg("--dir")
        .arg(&src)
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let top = fs::read_to_string(out.join("top.js")).unwrap();
    assert!(top.contains("export default 1;"));
    let inner = fs::read_to_string(out.join("nested/inner.js")).unwrap();
    assert!(inner.contains("export default 2;"));
}

#[test]
fn test_ignore_glob_skips_files() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("dist");
    fs::create_dir_all(src.join("vendor")).unwrap();
    fs::write(src.join("app.js"), "define(function () { return 1; });\n").unwrap();
    fs::write(
        src.join("vendor/lib.js"),
        "define(function () { return 2; });\n",
    )
    .unwrap();

    let status = amdless()
        .arg("--dir")
        .arg(&src)
        .arg("--out")
        .arg(&out)
        .arg("--ignore")
        .arg("vendor/**")
        .status()
        .unwrap();
    assert!(status.success());

    assert!(out.join("app.js").exists());
    assert!(!out.join("vendor/lib.js").exists());
}

#[test]
fn test_bad_file_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("dist");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("bad.js"), "define('named', function () {});\n").unwrap();
    fs::write(src.join("good.js"), "define(function () { return 1; });\n").unwrap();

    let output = amdless()
        .arg("--dir")
        .arg(&src)
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();

    // The batch fails overall but the good file still converts.
    assert!(!output.status.success());
    assert!(out.join("good.js").exists());
    assert!(!out.join("bad.js").exists());
}

#[test]
fn test_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("dist");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.js"), "define(function () { return 1; });\n").unwrap();
    fs::write(src.join("bad.js"), "define('named', function () {});\n").unwrap();

    let output = amdless()
        .arg("--dir")
        .arg(&src)
        .arg("--out")
        .arg(&out)
        .arg("--json")
        .output()
        .unwrap();

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(summary["converted"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["files"].as_array().unwrap().len(), 2);
}

#[test]
fn test_no_input_is_a_usage_error() {
    let output = amdless().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
