//! The compiled instruction set
//!
//! Instructions are tree-shaped terms: an operand position holds the
//! instruction sequence that produces its value. The `Display` impl renders
//! the indented listing written to `.mcb` files.

use std::fmt;

use crate::ast::{BinaryOp, TypeName, UnaryOp, Value};

/// One select field: output name and optional alias
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub alias: Option<String>,
}

/// A compiled instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    LoadConstant(Value),
    NewVariable(String),
    LoadVariable {
        name: String,
        /// Index chain for indexed variables; empty for plain loads
        index: Vec<Instruction>,
    },
    StoreVariable {
        target: Vec<Instruction>,
        value: Vec<Instruction>,
        append: bool,
    },
    Binary {
        op: BinaryOp,
        lhs: Vec<Instruction>,
        rhs: Vec<Instruction>,
    },
    Unary {
        op: UnaryOp,
        operand: Vec<Instruction>,
    },
    Call {
        name: String,
        argc: usize,
        args: Vec<Instruction>,
    },
    /// A call whose callee is a runtime value, e.g. `handlers[kind](x)`
    CallIndirect {
        target: Vec<Instruction>,
        argc: usize,
        args: Vec<Instruction>,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Instruction>,
    },
    ExternFunctionDef {
        name: String,
        params: Vec<String>,
        module: String,
        symbol: String,
    },
    If {
        condition: Vec<Instruction>,
        then_block: Vec<Instruction>,
        elifs: Vec<Instruction>,
        else_block: Vec<Instruction>,
    },
    Elif {
        condition: Vec<Instruction>,
        block: Vec<Instruction>,
    },
    While {
        condition: Vec<Instruction>,
        block: Vec<Instruction>,
    },
    Foreach {
        iterable: Vec<Instruction>,
        block: Vec<Instruction>,
    },
    Switch {
        subject: Vec<Instruction>,
        cases: Vec<(Value, Vec<Instruction>)>,
        default: Vec<Instruction>,
    },
    Select {
        fields: Vec<FieldSpec>,
        from: Vec<Instruction>,
        where_clause: Vec<Instruction>,
        distinct: bool,
        merge: bool,
        into: Vec<Instruction>,
    },
    Print {
        argc: usize,
        args: Vec<Instruction>,
    },
    Return(Vec<Instruction>),
    Halt(Vec<Instruction>),
    Break,
    Continue,
    IsType {
        expr: Vec<Instruction>,
        check: TypeName,
    },
    TypeQuery {
        expr: Vec<Instruction>,
    },
}

const INDENT: &str = "    ";

fn pad(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_block(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    block: &[Instruction],
    depth: usize,
) -> fmt::Result {
    pad(f, depth)?;
    writeln!(f, "{}:", label)?;
    for instruction in block {
        instruction.write_indented(f, depth + 1)?;
    }
    Ok(())
}

impl Instruction {
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Instruction::LoadConstant(value) => {
                pad(f, depth)?;
                writeln!(f, "load_const {}", value)
            }
            Instruction::NewVariable(name) => {
                pad(f, depth)?;
                writeln!(f, "new_var {}", name)
            }
            Instruction::LoadVariable { name, index } => {
                pad(f, depth)?;
                writeln!(f, "load_var {}", name)?;
                if !index.is_empty() {
                    write_block(f, "index", index, depth + 1)?;
                }
                Ok(())
            }
            Instruction::StoreVariable {
                target,
                value,
                append,
            } => {
                pad(f, depth)?;
                writeln!(f, "store_var{}", if *append { " append" } else { "" })?;
                write_block(f, "target", target, depth + 1)?;
                write_block(f, "value", value, depth + 1)
            }
            Instruction::Binary { op, lhs, rhs } => {
                pad(f, depth)?;
                writeln!(f, "binary {}", op)?;
                write_block(f, "lhs", lhs, depth + 1)?;
                write_block(f, "rhs", rhs, depth + 1)
            }
            Instruction::Unary { op, operand } => {
                pad(f, depth)?;
                writeln!(f, "unary {}", op)?;
                write_block(f, "operand", operand, depth + 1)
            }
            Instruction::Call { name, argc, args } => {
                pad(f, depth)?;
                writeln!(f, "call {} argc={}", name, argc)?;
                if !args.is_empty() {
                    write_block(f, "args", args, depth + 1)?;
                }
                Ok(())
            }
            Instruction::CallIndirect { target, argc, args } => {
                pad(f, depth)?;
                writeln!(f, "call_indirect argc={}", argc)?;
                write_block(f, "target", target, depth + 1)?;
                if !args.is_empty() {
                    write_block(f, "args", args, depth + 1)?;
                }
                Ok(())
            }
            Instruction::FunctionDef { name, params, body } => {
                pad(f, depth)?;
                writeln!(f, "fndef {} ({})", name, params.join(", "))?;
                write_block(f, "body", body, depth + 1)
            }
            Instruction::ExternFunctionDef {
                name,
                params,
                module,
                symbol,
            } => {
                pad(f, depth)?;
                writeln!(
                    f,
                    "extern_fndef {} ({}) -> {}::{}",
                    name,
                    params.join(", "),
                    module,
                    symbol
                )
            }
            Instruction::If {
                condition,
                then_block,
                elifs,
                else_block,
            } => {
                pad(f, depth)?;
                writeln!(f, "if")?;
                write_block(f, "cond", condition, depth + 1)?;
                write_block(f, "then", then_block, depth + 1)?;
                for elif in elifs {
                    elif.write_indented(f, depth + 1)?;
                }
                if !else_block.is_empty() {
                    write_block(f, "else", else_block, depth + 1)?;
                }
                Ok(())
            }
            Instruction::Elif { condition, block } => {
                pad(f, depth)?;
                writeln!(f, "elif")?;
                write_block(f, "cond", condition, depth + 1)?;
                write_block(f, "then", block, depth + 1)
            }
            Instruction::While { condition, block } => {
                pad(f, depth)?;
                writeln!(f, "while")?;
                write_block(f, "cond", condition, depth + 1)?;
                write_block(f, "body", block, depth + 1)
            }
            Instruction::Foreach { iterable, block } => {
                pad(f, depth)?;
                writeln!(f, "foreach")?;
                write_block(f, "iter", iterable, depth + 1)?;
                write_block(f, "body", block, depth + 1)
            }
            Instruction::Switch {
                subject,
                cases,
                default,
            } => {
                pad(f, depth)?;
                writeln!(f, "switch")?;
                write_block(f, "subject", subject, depth + 1)?;
                for (value, block) in cases {
                    pad(f, depth + 1)?;
                    writeln!(f, "case {}:", value)?;
                    for instruction in block {
                        instruction.write_indented(f, depth + 2)?;
                    }
                }
                if !default.is_empty() {
                    write_block(f, "default", default, depth + 1)?;
                }
                Ok(())
            }
            Instruction::Select {
                fields,
                from,
                where_clause,
                distinct,
                merge,
                into,
            } => {
                pad(f, depth)?;
                let names: Vec<String> = fields
                    .iter()
                    .map(|field| match &field.alias {
                        Some(alias) => format!("{} as {}", field.name, alias),
                        None => field.name.clone(),
                    })
                    .collect();
                writeln!(
                    f,
                    "select{}{} [{}]",
                    if *distinct { " distinct" } else { "" },
                    if *merge { " merge" } else { "" },
                    names.join(", ")
                )?;
                write_block(f, "from", from, depth + 1)?;
                if !where_clause.is_empty() {
                    write_block(f, "where", where_clause, depth + 1)?;
                }
                write_block(f, "into", into, depth + 1)
            }
            Instruction::Print { argc, args } => {
                pad(f, depth)?;
                writeln!(f, "print argc={}", argc)?;
                if !args.is_empty() {
                    write_block(f, "args", args, depth + 1)?;
                }
                Ok(())
            }
            Instruction::Return(value) => {
                pad(f, depth)?;
                writeln!(f, "ret")?;
                if !value.is_empty() {
                    write_block(f, "value", value, depth + 1)?;
                }
                Ok(())
            }
            Instruction::Halt(value) => {
                pad(f, depth)?;
                writeln!(f, "halt")?;
                if !value.is_empty() {
                    write_block(f, "value", value, depth + 1)?;
                }
                Ok(())
            }
            Instruction::Break => {
                pad(f, depth)?;
                writeln!(f, "break")
            }
            Instruction::Continue => {
                pad(f, depth)?;
                writeln!(f, "continue")
            }
            Instruction::IsType { expr, check } => {
                pad(f, depth)?;
                writeln!(f, "is_type {}", check)?;
                write_block(f, "expr", expr, depth + 1)
            }
            Instruction::TypeQuery { expr } => {
                pad(f, depth)?;
                writeln!(f, "type_query")?;
                write_block(f, "expr", expr, depth + 1)
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
