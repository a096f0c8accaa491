//! Parser tests over the public parse API

use pretty_assertions::assert_eq;
use rust_macal::ast::{AssignOp, BinaryOp, Expr, Stmt, TypeName, UnaryOp, Value};
use rust_macal::parser::parse_script;
use rust_macal::MacalError;

fn parse(source: &str) -> Vec<Stmt> {
    parse_script(source, "test.mcl").unwrap().statements
}

fn parse_err(source: &str) -> MacalError {
    parse_script(source, "test.mcl").unwrap_err()
}

fn only_assignment_value(source: &str) -> Expr {
    match parse(source).into_iter().next() {
        Some(Stmt::Assignment { value, .. }) => value,
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let value = only_assignment_value("x = 1 + 2 * 3;");
    let Expr::Binary { op, left, right, .. } = value else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(*left, Expr::Literal { value: Value::Int(1), .. }));
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn test_comparison_binds_tighter_than_and() {
    let value = only_assignment_value("x = 1 < 2 and 3 > 2;");
    let Expr::Binary { op, left, right, .. } = value else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinaryOp::And);
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Lt, .. }));
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::Gt, .. }));
}

#[test]
fn test_parentheses_override_precedence() {
    let value = only_assignment_value("x = (1 + 2) * 3;");
    let Expr::Binary { op, left, .. } = value else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinaryOp::Mul);
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Add, .. }));
}

#[test]
fn test_unary_negation() {
    let value = only_assignment_value("x = -1;");
    assert!(matches!(
        value,
        Expr::Unary { op: UnaryOp::Neg, .. }
    ));
}

#[test]
fn test_left_associativity() {
    // 10 - 4 - 3 must parse as (10 - 4) - 3
    let value = only_assignment_value("x = 10 - 4 - 3;");
    let Expr::Binary { op, left, right, .. } = value else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinaryOp::Sub);
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
    assert!(matches!(*right, Expr::Literal { value: Value::Int(3), .. }));
}

#[test]
fn test_compound_assignment_operators() {
    let statements = parse("x += 1; x -= 1; x *= 2; x /= 2; x ^= 2; x %= 2;");
    let ops: Vec<AssignOp> = statements
        .iter()
        .map(|s| match s {
            Stmt::Assignment { op, .. } => *op,
            other => panic!("expected assignment, got {:?}", other),
        })
        .collect();
    assert_eq!(
        ops,
        vec![
            AssignOp::Add,
            AssignOp::Sub,
            AssignOp::Mul,
            AssignOp::Div,
            AssignOp::Pow,
            AssignOp::Mod,
        ]
    );
}

#[test]
fn test_append_assignment() {
    let statements = parse("x []= 42;");
    assert!(matches!(
        statements[0],
        Stmt::Assignment { append: true, op: AssignOp::Assign, .. }
    ));
}

#[test]
fn test_append_rejects_compound_operator() {
    let err = parse_err("x []+= 42;");
    assert!(err.to_string().contains("not supported for array append"), "{err}");
}

#[test]
fn test_const_assignment() {
    let statements = parse("const x = 1;");
    assert!(matches!(
        statements[0],
        Stmt::Assignment { constant: true, .. }
    ));
}

#[test]
fn test_const_rejects_function_definition() {
    let err = parse_err("const f => () { return; }");
    assert!(err.to_string().contains("const cannot mark a function definition"), "{err}");
}

#[test]
fn test_function_definition() {
    let statements = parse("add => (integer a, integer b) integer { return a + b; }");
    let Stmt::FunctionDef {
        name,
        params,
        return_type,
        body,
        external,
        ..
    } = &statements[0]
    else {
        panic!("expected function definition");
    };
    assert_eq!(name, "add");
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "a");
    assert_eq!(params[0].ty, TypeName::Integer);
    assert_eq!(*return_type, TypeName::Integer);
    assert!(body.is_some());
    assert!(external.is_none());
}

#[test]
fn test_external_function_definition() {
    let statements = parse("strlen => (string s) integer external \"strings\", \"length\";");
    let Stmt::FunctionDef { body, external, .. } = &statements[0] else {
        panic!("expected function definition");
    };
    assert!(body.is_none());
    let external = external.as_ref().expect("external binding");
    assert_eq!(external.module, "strings");
    assert_eq!(external.symbol, "length");
}

#[test]
fn test_untyped_parameter_defaults_to_any() {
    let statements = parse("f => (x) { return x; }");
    let Stmt::FunctionDef { params, .. } = &statements[0] else {
        panic!("expected function definition");
    };
    assert_eq!(params[0].ty, TypeName::Any);
}

#[test]
fn test_if_elif_else() {
    let statements = parse("if a > 1 { b = 1; } elif a > 0 { b = 2; } else { b = 3; }");
    let Stmt::If { elifs, else_block, .. } = &statements[0] else {
        panic!("expected if statement");
    };
    assert_eq!(elifs.len(), 1);
    assert!(else_block.is_some());
}

#[test]
fn test_switch_with_cases_and_default() {
    let statements = parse(
        "switch x { case 1: { a = 1; } case \"two\": { a = 2; } default: { a = 0; } }",
    );
    let Stmt::Switch { cases, default, .. } = &statements[0] else {
        panic!("expected switch statement");
    };
    assert_eq!(cases.len(), 2);
    assert!(matches!(
        cases[1].label,
        Expr::Literal { value: Value::Str(_), .. }
    ));
    assert!(default.is_some());
}

#[test]
fn test_switch_case_label_must_be_literal() {
    let err = parse_err("switch x { case y: { a = 1; } }");
    assert!(err.to_string().contains("Case label must be a literal"), "{err}");
}

#[test]
fn test_select_wildcard() {
    let statements = parse("select * from servers where up == true into alive;");
    let Stmt::Select {
        fields,
        distinct,
        where_clause,
        merge,
        ..
    } = &statements[0]
    else {
        panic!("expected select statement");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "*");
    assert!(!distinct);
    assert!(!merge);
    assert!(where_clause.is_some());
}

#[test]
fn test_select_fields_alias_distinct_merge() {
    let statements = parse("select distinct host as name, port from servers merge into out;");
    let Stmt::Select {
        fields,
        distinct,
        merge,
        ..
    } = &statements[0]
    else {
        panic!("expected select statement");
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].alias.as_deref(), Some("name"));
    assert!(fields[1].alias.is_none());
    assert!(distinct);
    assert!(merge);
}

#[test]
fn test_select_into_must_be_assignable() {
    let err = parse_err("select * from x into 1;");
    assert!(err.to_string().contains("Select into target"), "{err}");
}

#[test]
fn test_include_list() {
    let statements = parse("include strings, math;");
    let Stmt::Include { libraries, .. } = &statements[0] else {
        panic!("expected include statement");
    };
    let names: Vec<&str> = libraries.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["strings", "math"]);
}

#[test]
fn test_array_literal_folds_to_constant() {
    let value = only_assignment_value("x = [1, 2.5, \"three\"];");
    let Expr::Literal { value: Value::Array(items), .. } = value else {
        panic!("expected array literal");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(items[2], Value::Str("three".to_string()));
}

#[test]
fn test_array_literal_rejects_variables() {
    let err = parse_err("x = [a];");
    assert!(err.to_string().contains("must be literal values"), "{err}");
}

#[test]
fn test_record_literal() {
    let value = only_assignment_value("x = {\"host\": \"web1\", \"port\": 443};");
    let Expr::Literal { value: Value::Record(fields), .. } = value else {
        panic!("expected record literal");
    };
    assert_eq!(fields[0].0, "host");
    assert_eq!(fields[1].1, Value::Int(443));
}

#[test]
fn test_record_key_must_be_string() {
    let err = parse_err("x = {1: 2};");
    assert!(err.to_string().contains("Record key must be a string literal"), "{err}");
}

#[test]
fn test_interpolation_desugars_to_concatenation() {
    let value = only_assignment_value("x = $\"count: {n} done\";");
    // (("count: " + n) + " done")
    let Expr::Binary { op, left, right, .. } = value else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(
        *right,
        Expr::Literal { value: Value::Str(ref s), .. } if s == " done"
    ));
    let Expr::Binary { op, left, right, .. } = *left else {
        panic!("expected nested binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(
        *left,
        Expr::Literal { value: Value::Str(ref s), .. } if s == "count: "
    ));
    assert!(matches!(*right, Expr::Variable { ref name, .. } if name == "n"));
}

#[test]
fn test_interpolation_without_expressions_is_plain_literal() {
    let value = only_assignment_value("x = $\"plain\";");
    assert!(matches!(
        value,
        Expr::Literal { value: Value::Str(ref s), .. } if s == "plain"
    ));
}

#[test]
fn test_indexed_call_statement_keeps_index_chain() {
    let statements = parse("handlers[\"get\"](request);");
    let Stmt::IndexedCall { target, args, .. } = &statements[0] else {
        panic!("expected indexed call statement");
    };
    let Expr::Indexed { name, index, .. } = target else {
        panic!("expected indexed call target");
    };
    assert_eq!(name, "handlers");
    assert_eq!(index.len(), 1);
    assert_eq!(args.len(), 1);
}

#[test]
fn test_chained_index() {
    let statements = parse("x = grid[1][2];");
    let Stmt::Assignment { value, .. } = &statements[0] else {
        panic!("expected assignment");
    };
    let Expr::Indexed { index, .. } = value else {
        panic!("expected indexed variable");
    };
    assert_eq!(index.len(), 2);
}

#[test]
fn test_parse_error_carries_file_and_position() {
    let err = parse_script("x = 1\ny = 2;", "broken.mcl").unwrap_err();
    let MacalError::ParseError { file, line, .. } = err else {
        panic!("expected parse error, got {err}");
    };
    assert_eq!(file, "broken.mcl");
    assert_eq!(line, 2);
}

#[test]
fn test_type_check_and_type_query() {
    let value = only_assignment_value("x = IsInt(y);");
    assert!(matches!(value, Expr::TypeCheck { check: TypeName::Integer, .. }));
    let value = only_assignment_value("x = Type(y);");
    assert!(matches!(value, Expr::TypeQuery { .. }));
}
