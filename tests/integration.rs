use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_refman")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn lua_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".lua").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

const EXPECTED_DUMP: &str = "\
Blocks
\tFiltering
\t\tFIRFilterBlock (BlockDoc)
\t\t\toptions (TableDoc)
\tMiscellaneous
\t\tDelayBlock (BlockDoc)
\tSources
\t\tSignalSource (BlockDoc)
Modules
\tradio (ModuleDoc)
\t\tversion (Field)
\t\tplatform (Field)
\t\tradio.load (FunctionDoc)
\t\tDebugLog (ClassDoc)
\t\t\tDebugLog:printf (FunctionDoc)
Datatypes
\tBit (DatatypeDoc)
\t\tBit.tonumber (FunctionDoc)
\t\tBit:value (PropertyDoc)
";

// -- stdin mode --

#[test]
fn stdin_mode_decodes_block() {
    let input = "---\n-- @block Foo\n-- Does a thing.\n-- @category Filtering\n-- @usage `radio.Foo()`\n";

    let assert = cmd().write_stdin(input).assert().success();
    let json = stdout_json(&assert);

    let block = &json["blocks"]["Filtering"][0];
    assert_eq!(block["kind"], "block");
    assert_eq!(block["name"], "Foo");
    assert_eq!(block["description"], "Does a thing.");
    assert_eq!(block["category"], "Filtering");
    assert_eq!(block["usage"], "`radio.Foo()`");
    assert_eq!(block["parameters"], Value::Array(vec![]));
    assert_eq!(block["signatures"], Value::Array(vec![]));
}

#[test]
fn stdin_mode_table_without_namespace_fails() {
    let input = "---\n-- @table options\n-- @tfield int bits Bits\n";

    cmd()
        .write_stdin(input)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "<stdin>:1: table \"options\" has no enclosing namespace",
        ));
}

// -- file mode --

#[test]
fn file_mode_dump_of_fixture_tree() {
    let assert = cmd()
        .args(["-f", "dump"])
        .arg(fixture_path("radio"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, EXPECTED_DUMP);
}

#[test]
fn file_mode_json_of_fixture_tree() {
    let assert = cmd().arg(fixture_path("radio")).assert().success();
    let json = stdout_json(&assert);

    let fir = &json["blocks"]["Filtering"][0];
    assert_eq!(fir["name"], "FIRFilterBlock");
    assert_eq!(fir["parameters"][1]["name"], "options");
    assert_eq!(fir["parameters"][1]["default"], "{}");
    assert_eq!(fir["signatures"].as_array().unwrap().len(), 2);
    assert_eq!(fir["children"][0]["kind"], "table");
    assert_eq!(fir["children"][0]["fields"][1]["name"], "block_size");

    let bit = &json["datatypes"]["Bit"];
    assert_eq!(bit["parameters"][0]["default"], "0");
    let tonumber = &bit["children"][0];
    assert_eq!(tonumber["static"], true);
    assert_eq!(tonumber["parameters"][3]["default"], "\"msb\"");
    assert_eq!(tonumber["returns"][0]["type"], "number");
    assert_eq!(tonumber["raises"][0], "Invalid bit order error.");
    let value = &bit["children"][1];
    assert_eq!(value["kind"], "property");
    assert_eq!(value["static"], false);

    let radio = &json["modules"]["radio"];
    assert_eq!(radio["fields"][0]["type"], "string");
    let debug_log = &radio["children"][1];
    assert_eq!(debug_log["kind"], "class");
    assert_eq!(debug_log["children"][0]["static"], false);
    assert_eq!(debug_log["children"][0]["parameters"][1]["name"], "...");
    assert_eq!(debug_log["children"][0]["parameters"][1]["type"], Value::Null);
}

#[test]
fn file_mode_excludes_thirdparty_by_default() {
    let assert = cmd().arg(fixture_path("radio")).assert().success();
    let json = stdout_json(&assert);
    let modules: Vec<_> = json["modules"].as_object().unwrap().keys().collect();
    assert_eq!(modules, vec!["radio"]);
}

#[test]
fn file_mode_exclude_override_includes_thirdparty() {
    cmd()
        .args(["--exclude", "none"])
        .arg(fixture_path("radio"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("thirdparty/json.lua"))
        .stderr(predicate::str::contains("unknown tag \"@author\""));
}

#[test]
fn file_mode_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("refman.json");

    cmd()
        .args(["-o", out.to_str().unwrap()])
        .arg(fixture_path("radio/init.lua"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json: Value = serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert!(json["modules"]["radio"].is_object());
}

#[test]
fn file_mode_output_directory() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-f", "dump"])
        .arg(fixture_path("radio/init.lua"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("refman.txt")).unwrap();
    assert!(output.starts_with("Blocks\nModules\n\tradio (ModuleDoc)\n"));
}

#[test]
fn file_mode_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("refman.json");
    let input = lua_file("---\n-- @block Foo\n-- @usage x\nlocal Foo = {}\n");

    cmd()
        .args(["-o", out.to_str().unwrap()])
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required tag @category"));

    assert!(!out.exists());
}

#[test]
fn file_mode_unknown_tag_names_file_and_line() {
    let input = lua_file("local x = 1\n\n---\n-- @class Foo\n-- @see Bar\nlocal Foo = {}\n");
    let path = input.path().to_str().unwrap().to_string();

    cmd()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("{}:3: unknown tag \"@see\"", path)));
}

#[test]
fn file_mode_namespace_resets_per_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("a.lua"),
        "---\n-- @module a\nlocal a = {}\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.lua"),
        "---\n-- @function helper\nlocal function helper() end\n",
    )
    .unwrap();

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("function \"helper\" has no enclosing namespace"));
}

#[test]
fn file_mode_no_matches_is_empty_reference() {
    let dir = TempDir::new().unwrap();

    let assert = cmd()
        .arg(format!("{}/*.lua", dir.path().display()))
        .assert()
        .success();
    let json = stdout_json(&assert);
    assert_eq!(json["blocks"], Value::Object(Default::default()));
}

// -- output formats --

#[test]
fn dump_flag_writes_stderr() {
    cmd()
        .arg("--dump")
        .arg(fixture_path("radio"))
        .assert()
        .success()
        .stderr(predicate::str::contains(EXPECTED_DUMP));
}

#[test]
fn invalid_format_fails() {
    cmd()
        .args(["-f", "xml"])
        .arg(fixture_path("radio"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}
