//! AST to instruction-stream lowering
//!
//! Walks the parsed program and produces the flat instruction stream,
//! tracking declared names with a scope stack and splicing included
//! libraries into the same stream.

use std::path::PathBuf;

use crate::ast::{AssignOp, BinaryOp, Block, Expr, Program, Span, Stmt, Value};
use crate::error::MacalError;
use crate::lexer;
use crate::parser::Parser;
use crate::script::{find_library, read_script};

use super::instruction::{FieldSpec, Instruction};
use super::scope::{FrameKind, ScopeStack};

/// Compiler for a parsed program
pub struct Compiler {
    file: String,
    search_paths: Vec<PathBuf>,
    scopes: ScopeStack,
}

impl Compiler {
    /// `reserved` pre-declares variable names the host injects at runtime;
    /// `search_paths` is the library lookup order for `include`.
    pub fn new(reserved: &[String], search_paths: Vec<PathBuf>) -> Self {
        Self {
            file: String::new(),
            search_paths,
            scopes: ScopeStack::new(reserved),
        }
    }

    /// Compile a program into an instruction stream terminated by `halt 0`
    pub fn compile(mut self, program: &Program) -> Result<Vec<Instruction>, MacalError> {
        self.file = program.file.clone();
        let mut instructions = Vec::new();
        self.compile_statements(&program.statements, &mut instructions)?;
        instructions.push(Instruction::Halt(vec![Instruction::LoadConstant(Value::Int(0))]));
        Ok(instructions)
    }

    fn error<T>(&self, span: Span, message: impl Into<String>) -> Result<T, MacalError> {
        Err(MacalError::CompileError {
            file: self.file.clone(),
            message: format!("{} @ {}", message.into(), span),
        })
    }

    fn compile_statements(
        &mut self,
        statements: &[Stmt],
        out: &mut Vec<Instruction>,
    ) -> Result<(), MacalError> {
        for statement in statements {
            self.compile_statement(statement, out)?;
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &Block, out: &mut Vec<Instruction>) -> Result<(), MacalError> {
        self.compile_statements(&block.statements, out)
    }

    fn compile_statement(&mut self, statement: &Stmt, out: &mut Vec<Instruction>) -> Result<(), MacalError> {
        match statement {
            Stmt::Assignment {
                target,
                op,
                value,
                append,
                span,
                ..
            } => self.compile_assignment(target, *op, value, *append, *span, out),
            Stmt::FunctionDef {
                name,
                params,
                body,
                external,
                span,
                ..
            } => {
                self.scopes.declare_function(name);
                let param_names: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
                if let Some(external) = external {
                    out.push(Instruction::ExternFunctionDef {
                        name: name.clone(),
                        params: param_names,
                        module: external.module.clone(),
                        symbol: external.symbol.clone(),
                    });
                    return Ok(());
                }
                let body = match body {
                    Some(body) => body,
                    None => return self.error(*span, "Function definition without body"),
                };
                self.scopes.push(name.clone(), FrameKind::Function);
                for param in params {
                    self.scopes.declare_variable(&param.name);
                }
                let mut blk = Vec::new();
                let result = self.compile_block(body, &mut blk);
                self.scopes.pop();
                result?;
                out.push(Instruction::FunctionDef {
                    name: name.clone(),
                    params: param_names,
                    body: blk,
                });
                Ok(())
            }
            Stmt::Call { name, args, span } => {
                if !self.scopes.has_function(name) {
                    return self.error(*span, format!("Unknown function {}", name));
                }
                let mut compiled = Vec::new();
                for arg in args {
                    self.compile_expression(arg, &mut compiled, false)?;
                }
                out.push(Instruction::Call {
                    name: name.clone(),
                    argc: args.len(),
                    args: compiled,
                });
                Ok(())
            }
            Stmt::IndexedCall { target, args, .. } => {
                let mut target_instructions = Vec::new();
                self.compile_expression(target, &mut target_instructions, false)?;
                let mut compiled = Vec::new();
                for arg in args {
                    self.compile_expression(arg, &mut compiled, false)?;
                }
                out.push(Instruction::CallIndirect {
                    target: target_instructions,
                    argc: args.len(),
                    args: compiled,
                });
                Ok(())
            }
            Stmt::If {
                condition,
                block,
                elifs,
                else_block,
                ..
            } => {
                let mut cond = Vec::new();
                self.compile_expression(condition, &mut cond, false)?;
                let mut then_block = Vec::new();
                self.compile_block(block, &mut then_block)?;
                let mut elif_instructions = Vec::new();
                for elif in elifs {
                    let mut cond = Vec::new();
                    self.compile_expression(&elif.condition, &mut cond, false)?;
                    let mut blk = Vec::new();
                    self.compile_block(&elif.block, &mut blk)?;
                    elif_instructions.push(Instruction::Elif {
                        condition: cond,
                        block: blk,
                    });
                }
                let mut else_instructions = Vec::new();
                if let Some(else_block) = else_block {
                    self.compile_block(else_block, &mut else_instructions)?;
                }
                out.push(Instruction::If {
                    condition: cond,
                    then_block,
                    elifs: elif_instructions,
                    else_block: else_instructions,
                });
                Ok(())
            }
            Stmt::While { condition, block, .. } => {
                let mut cond = Vec::new();
                self.compile_expression(condition, &mut cond, false)?;
                let mut blk = Vec::new();
                self.compile_block(block, &mut blk)?;
                out.push(Instruction::While {
                    condition: cond,
                    block: blk,
                });
                Ok(())
            }
            Stmt::Foreach { iterable, block, .. } => {
                let mut iter = Vec::new();
                self.compile_expression(iterable, &mut iter, false)?;
                // the loop body sees the implicit iteration variable
                self.scopes.push("foreach", FrameKind::Foreach);
                self.scopes.declare_variable("it");
                let mut blk = Vec::new();
                let result = self.compile_block(block, &mut blk);
                self.scopes.pop();
                result?;
                out.push(Instruction::Foreach {
                    iterable: iter,
                    block: blk,
                });
                Ok(())
            }
            Stmt::Switch {
                subject,
                cases,
                default,
                ..
            } => {
                let mut subject_instructions = Vec::new();
                self.compile_expression(subject, &mut subject_instructions, false)?;
                let mut compiled_cases: Vec<(Value, Vec<Instruction>)> = Vec::new();
                for case in cases {
                    let value = match &case.label {
                        Expr::Literal { value, .. } => value.clone(),
                        other => {
                            return self.error(other.span(), "Case label must be a constant")
                        }
                    };
                    if compiled_cases
                        .iter()
                        .any(|(existing, _)| case_labels_collide(existing, &value))
                    {
                        return self.error(case.span, format!("Duplicate case {}", value));
                    }
                    let mut blk = Vec::new();
                    self.compile_block(&case.block, &mut blk)?;
                    compiled_cases.push((value, blk));
                }
                let mut default_instructions = Vec::new();
                if let Some(default) = default {
                    self.compile_block(default, &mut default_instructions)?;
                }
                out.push(Instruction::Switch {
                    subject: subject_instructions,
                    cases: compiled_cases,
                    default: default_instructions,
                });
                Ok(())
            }
            Stmt::Select {
                fields,
                distinct,
                from,
                where_clause,
                merge,
                into,
                ..
            } => {
                let mut from_instructions = Vec::new();
                self.compile_expression(from, &mut from_instructions, false)?;
                let mut where_instructions = Vec::new();
                if let Some(where_clause) = where_clause {
                    // field names referenced in the where clause are not
                    // declared variables; allow them
                    self.compile_expression(where_clause, &mut where_instructions, true)?;
                }
                let mut into_instructions = Vec::new();
                self.compile_expression(into, &mut into_instructions, true)?;
                out.push(Instruction::Select {
                    fields: fields
                        .iter()
                        .map(|field| FieldSpec {
                            name: field.name.clone(),
                            alias: field.alias.clone(),
                        })
                        .collect(),
                    from: from_instructions,
                    where_clause: where_instructions,
                    distinct: *distinct,
                    merge: *merge,
                    into: into_instructions,
                });
                Ok(())
            }
            Stmt::Include { libraries, .. } => {
                for library in libraries {
                    self.compile_include(&library.name, library.span, out)?;
                }
                Ok(())
            }
            Stmt::Break { .. } => {
                out.push(Instruction::Break);
                Ok(())
            }
            Stmt::Continue { .. } => {
                out.push(Instruction::Continue);
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let mut compiled = Vec::new();
                if let Some(value) = value {
                    self.compile_expression(value, &mut compiled, false)?;
                }
                out.push(Instruction::Return(compiled));
                Ok(())
            }
            Stmt::Print { args, .. } => {
                let mut compiled = Vec::new();
                for arg in args {
                    self.compile_expression(arg, &mut compiled, false)?;
                }
                out.push(Instruction::Print {
                    argc: args.len(),
                    args: compiled,
                });
                Ok(())
            }
            Stmt::Halt { value, .. } => {
                let mut compiled = Vec::new();
                if let Some(value) = value {
                    self.compile_expression(value, &mut compiled, false)?;
                }
                out.push(Instruction::Halt(compiled));
                Ok(())
            }
            Stmt::Block(block) => self.compile_block(block, out),
        }
    }

    fn compile_assignment(
        &mut self,
        target: &Expr,
        op: AssignOp,
        value: &Expr,
        append: bool,
        span: Span,
        out: &mut Vec<Instruction>,
    ) -> Result<(), MacalError> {
        let name = match target {
            Expr::Variable { name, .. } | Expr::Indexed { name, .. } => name,
            other => return self.error(other.span(), "Invalid assignment target"),
        };
        let mut new_var = false;
        if !self.scopes.has_variable(name) {
            out.push(Instruction::NewVariable(name.clone()));
            self.scopes.declare_variable(name);
            new_var = true;
        }
        let mut lhs = Vec::new();
        self.compile_expression(target, &mut lhs, false)?;
        let mut rhs = Vec::new();
        self.compile_expression(value, &mut rhs, false)?;
        if op == AssignOp::Assign {
            out.push(Instruction::StoreVariable {
                target: lhs,
                value: rhs,
                append,
            });
            return Ok(());
        }
        if append {
            return self.error(
                span,
                format!("Operator {} not supported for append to array", op.symbol()),
            );
        }
        if new_var {
            return self.error(
                span,
                format!("Operator {} not supported for a new variable", op.symbol()),
            );
        }
        let binary_op = match op {
            AssignOp::Add => BinaryOp::Add,
            AssignOp::Sub => BinaryOp::Sub,
            AssignOp::Mul => BinaryOp::Mul,
            AssignOp::Div => BinaryOp::Div,
            AssignOp::Mod => BinaryOp::Mod,
            AssignOp::Pow => BinaryOp::Pow,
            AssignOp::Assign => unreachable!("plain assignment handled above"),
        };
        out.push(Instruction::StoreVariable {
            target: lhs.clone(),
            value: vec![Instruction::Binary {
                op: binary_op,
                lhs,
                rhs,
            }],
            append: false,
        });
        Ok(())
    }

    fn compile_expression(
        &mut self,
        expression: &Expr,
        out: &mut Vec<Instruction>,
        allow_new: bool,
    ) -> Result<(), MacalError> {
        match expression {
            Expr::Literal { value, .. } => {
                out.push(Instruction::LoadConstant(value.clone()));
                Ok(())
            }
            Expr::Variable { name, span } => {
                if !self.scopes.has_variable(name) {
                    if !allow_new {
                        return self.error(*span, format!("Unknown variable {}", name));
                    }
                    self.scopes.declare_variable(name);
                }
                out.push(Instruction::LoadVariable {
                    name: name.clone(),
                    index: Vec::new(),
                });
                Ok(())
            }
            Expr::Indexed { name, index, span } => {
                if !self.scopes.has_variable(name) {
                    return self.error(*span, format!("Unknown variable {}", name));
                }
                let mut index_instructions = Vec::new();
                for expr in index {
                    self.compile_expression(expr, &mut index_instructions, false)?;
                }
                out.push(Instruction::LoadVariable {
                    name: name.clone(),
                    index: index_instructions,
                });
                Ok(())
            }
            Expr::Call { name, args, span } => {
                if !self.scopes.has_function(name) {
                    return self.error(*span, format!("Unknown function {}", name));
                }
                let mut compiled = Vec::new();
                for arg in args {
                    self.compile_expression(arg, &mut compiled, false)?;
                }
                out.push(Instruction::Call {
                    name: name.clone(),
                    argc: args.len(),
                    args: compiled,
                });
                Ok(())
            }
            Expr::IndexedCall { target, args, .. } => {
                let mut target_instructions = Vec::new();
                self.compile_expression(target, &mut target_instructions, false)?;
                let mut compiled = Vec::new();
                for arg in args {
                    self.compile_expression(arg, &mut compiled, false)?;
                }
                out.push(Instruction::CallIndirect {
                    target: target_instructions,
                    argc: args.len(),
                    args: compiled,
                });
                Ok(())
            }
            Expr::Binary { op, left, right, .. } => {
                let mut lhs = Vec::new();
                self.compile_expression(left, &mut lhs, allow_new)?;
                let mut rhs = Vec::new();
                self.compile_expression(right, &mut rhs, allow_new)?;
                out.push(Instruction::Binary { op: *op, lhs, rhs });
                Ok(())
            }
            Expr::Unary { op, operand, .. } => {
                let mut compiled = Vec::new();
                self.compile_expression(operand, &mut compiled, false)?;
                out.push(Instruction::Unary {
                    op: *op,
                    operand: compiled,
                });
                Ok(())
            }
            Expr::TypeCheck { check, expr, .. } => {
                let mut compiled = Vec::new();
                self.compile_expression(expr, &mut compiled, false)?;
                out.push(Instruction::IsType {
                    expr: compiled,
                    check: *check,
                });
                Ok(())
            }
            Expr::TypeQuery { expr, .. } => {
                let mut compiled = Vec::new();
                self.compile_expression(expr, &mut compiled, false)?;
                out.push(Instruction::TypeQuery { expr: compiled });
                Ok(())
            }
        }
    }

    /// Splice an included library into the instruction stream. Each library
    /// is compiled at most once per program.
    fn compile_include(
        &mut self,
        name: &str,
        span: Span,
        out: &mut Vec<Instruction>,
    ) -> Result<(), MacalError> {
        if !self.scopes.mark_included(name) {
            return Ok(());
        }
        let lib_path = match find_library(name, &self.search_paths) {
            Some(path) => path,
            None => {
                return Err(MacalError::LibraryNotFound {
                    name: name.to_string(),
                    line: span.line,
                    column: span.column,
                })
            }
        };
        let source = read_script(&lib_path)?;
        let tokens = lexer::tokenize(&source)?;
        let lib_file = lib_path.display().to_string();
        let program = Parser::new(tokens, lib_file.clone()).parse()?;
        let saved_file = std::mem::replace(&mut self.file, lib_file);
        self.scopes.push(name, FrameKind::Library);
        let result = self.compile_statements(&program.statements, out);
        self.scopes.pop();
        self.file = saved_file;
        result
    }
}

/// Case labels are matched the way the runtime compares values: an integer
/// and a float with the same numeric value select the same case, so they
/// collide as labels.
fn case_labels_collide(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => *i as f64 == *f,
        _ => a == b,
    }
}

/// Compile a parsed program in one call
pub fn compile_program(
    program: &Program,
    reserved: &[String],
    search_paths: Vec<PathBuf>,
) -> Result<Vec<Instruction>, MacalError> {
    Compiler::new(reserved, search_paths).compile(program)
}
