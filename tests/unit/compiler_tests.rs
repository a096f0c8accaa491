//! Compiler tests over the full lex/parse/compile pipeline

use std::path::PathBuf;

use rust_macal::ast::{BinaryOp, Value};
use rust_macal::compiler::{compile_program, Instruction};
use rust_macal::parser::parse_script;
use rust_macal::MacalError;

fn compile(source: &str) -> Vec<Instruction> {
    let program = parse_script(source, "test.mcl").unwrap();
    compile_program(&program, &[], Vec::new()).unwrap()
}

fn compile_err(source: &str) -> MacalError {
    let program = parse_script(source, "test.mcl").unwrap();
    compile_program(&program, &[], Vec::new()).unwrap_err()
}

fn listing(instructions: &[Instruction]) -> String {
    instructions.iter().map(|i| i.to_string()).collect()
}

#[test]
fn test_assignment_listing_shape() {
    let text = listing(&compile("x = 1 + 2;"));
    assert!(text.contains("new_var x"), "{text}");
    assert!(text.contains("store_var"), "{text}");
    assert!(text.contains("binary +"), "{text}");
    assert!(text.contains("load_const 1"), "{text}");
    assert!(text.ends_with("halt\n    value:\n        load_const 0\n"), "{text}");
}

#[test]
fn test_function_listing_shape() {
    let text = listing(&compile(
        "greet => (string who) string { return \"hi \" + who; } message = greet(\"world\");",
    ));
    assert!(text.contains("fndef greet (who)"), "{text}");
    assert!(text.contains("call greet argc=1"), "{text}");
    assert!(text.contains("load_const \"hi \""), "{text}");
}

#[test]
fn test_control_flow_listing_shape() {
    let text = listing(&compile(
        "n = 3; while n > 0 { if n == 1 { break; } n -= 1; }",
    ));
    assert!(text.contains("while"), "{text}");
    assert!(text.contains("binary >"), "{text}");
    assert!(text.contains("break"), "{text}");
}

#[test]
fn test_print_and_interpolation_pipeline() {
    let text = listing(&compile("n = 2; print($\"n is {n}\");"));
    assert!(text.contains("print argc=1"), "{text}");
    assert!(text.contains("load_const \"n is \""), "{text}");
    assert!(text.contains("load_var n"), "{text}");
}

#[test]
fn test_select_listing_shape() {
    let text = listing(&compile(
        "servers = []; select host as name from servers where port == 443 into matches;",
    ));
    assert!(text.contains("select"), "{text}");
    assert!(text.contains("host as name"), "{text}");
}

#[test]
fn test_switch_listing_shape() {
    let text = listing(&compile(
        "x = 1; switch x { case 1: { y = 1; } default: { y = 0; } }",
    ));
    assert!(text.contains("switch"), "{text}");
    assert!(text.contains("case 1:"), "{text}");
}

#[test]
fn test_array_and_record_constants() {
    let instructions = compile("hosts = [\"a\", \"b\"]; conf = {\"port\": 8080};");
    assert!(instructions.iter().any(|i| matches!(
        i,
        Instruction::StoreVariable { value, .. }
            if matches!(value.first(), Some(Instruction::LoadConstant(Value::Array(items))) if items.len() == 2)
    )));
    assert!(instructions.iter().any(|i| matches!(
        i,
        Instruction::StoreVariable { value, .. }
            if matches!(value.first(), Some(Instruction::LoadConstant(Value::Record(_))))
    )));
}

#[test]
fn test_error_carries_source_file() {
    let program = parse_script("x = y;", "scripts/report.mcl").unwrap();
    let err = compile_program(&program, &[], Vec::new()).unwrap_err();
    let MacalError::CompileError { file, message } = err else {
        panic!("expected compile error, got {err}");
    };
    assert_eq!(file, "scripts/report.mcl");
    assert!(message.contains("Unknown variable y"), "{message}");
}

#[test]
fn test_variable_visible_after_block_scope() {
    // if blocks do not introduce a scope frame
    compile("flag = true; if flag { x = 1; } y = x;");
}

#[test]
fn test_compound_operator_lowering_table() {
    for (source, op) in [
        ("x = 8; x -= 1;", BinaryOp::Sub),
        ("x = 8; x *= 2;", BinaryOp::Mul),
        ("x = 8; x /= 2;", BinaryOp::Div),
        ("x = 8; x %= 3;", BinaryOp::Mod),
        ("x = 8; x ^= 2;", BinaryOp::Pow),
    ] {
        let instructions = compile(source);
        let found = instructions.iter().any(|i| matches!(
            i,
            Instruction::StoreVariable { value, .. }
                if matches!(value.first(), Some(Instruction::Binary { op: actual, .. }) if *actual == op)
        ));
        assert!(found, "no binary {:?} store in {:?}", op, source);
    }
}

#[test]
fn test_function_not_callable_before_definition() {
    let err = compile_err("x = helper(); helper => () integer { return 1; }");
    assert!(err.to_string().contains("Unknown function helper"), "{err}");
}

#[test]
fn test_library_search_order() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    std::fs::write(first.path().join("util.mcl"), "a => () { return; }").unwrap();
    std::fs::write(second.path().join("util.mcl"), "b => () { return; }").unwrap();
    let program = parse_script("include util;", "test.mcl").unwrap();
    let paths: Vec<PathBuf> = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    let instructions = compile_program(&program, &[], paths).unwrap();
    assert!(instructions
        .iter()
        .any(|i| matches!(i, Instruction::FunctionDef { name, .. } if name == "a")));
    assert!(!instructions
        .iter()
        .any(|i| matches!(i, Instruction::FunctionDef { name, .. } if name == "b")));
}

#[test]
fn test_included_function_callable_after_include() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("strings.mcl"),
        "upper => (string s) string external \"strings\", \"upper\";",
    )
    .unwrap();
    let program =
        parse_script("include strings; x = upper(\"hi\");", "test.mcl").unwrap();
    let instructions =
        compile_program(&program, &[], vec![dir.path().to_path_buf()]).unwrap();
    assert!(instructions.iter().any(|i| matches!(
        i,
        Instruction::ExternFunctionDef { name, .. } if name == "upper"
    )));
}

#[test]
fn test_nested_include() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("inner.mcl"), "core => () { return; }").unwrap();
    std::fs::write(
        dir.path().join("outer.mcl"),
        "include inner; wrap => () { core(); }",
    )
    .unwrap();
    let program = parse_script("include outer; wrap();", "test.mcl").unwrap();
    let instructions =
        compile_program(&program, &[], vec![dir.path().to_path_buf()]).unwrap();
    assert!(instructions
        .iter()
        .any(|i| matches!(i, Instruction::FunctionDef { name, .. } if name == "core")));
    assert!(instructions
        .iter()
        .any(|i| matches!(i, Instruction::FunctionDef { name, .. } if name == "wrap")));
}

#[test]
fn test_library_parse_error_names_library_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.mcl"), "x = ;").unwrap();
    let program = parse_script("include broken;", "test.mcl").unwrap();
    let err = compile_program(&program, &[], vec![dir.path().to_path_buf()]).unwrap_err();
    let MacalError::ParseError { file, .. } = err else {
        panic!("expected parse error, got {err}");
    };
    assert!(file.ends_with("broken.mcl"), "{file}");
}
