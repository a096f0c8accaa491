//! Recursive-descent parser for Macal scripts
//!
//! Consumes the token stream produced by the lexer with whitespace and
//! comment tokens stripped. Expression parsing is a conventional precedence
//! chain (or/xor, and, equality, comparison, additive, multiplicative,
//! power, unary, primary), all binary operators left-associative.
//!
//! Interpolated strings arrive from the lexer as a start token, alternating
//! string-part tokens and embedded expression tokens, and an end token; the
//! parser desugars the whole construct into a left-associative chain of `+`
//! concatenations.

use crate::ast::{
    AssignOp, BinaryOp, Block, CaseBranch, ElifBranch, Expr, ExternalRef, LibraryRef, Parameter,
    Program, SelectField, Span, Stmt, TypeName, UnaryOp, Value,
};
use crate::error::MacalError;
use crate::lexer::{Token, TokenKind};

use super::literal::{strip_quotes, token_value};

/// Parser over a trivia-stripped token stream
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: String,
}

impl Parser {
    /// Create a parser; whitespace and comment tokens are filtered here
    pub fn new(tokens: Vec<Token>, file: impl Into<String>) -> Self {
        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column, offset) = tokens
                .last()
                .map(|t| (t.line, t.column, t.offset))
                .unwrap_or((1, 1, 0));
            tokens.push(Token::new(TokenKind::Eof, "", line, column, offset));
        }
        Self {
            tokens,
            pos: 0,
            file: file.into(),
        }
    }

    /// Parse the whole token stream into a program
    pub fn parse(mut self) -> Result<Program, MacalError> {
        let mut statements = Vec::new();
        while self.kind() != TokenKind::Eof {
            statements.push(self.statement()?);
        }
        Ok(Program {
            statements,
            file: self.file,
        })
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    fn current(&self) -> &Token {
        // Construction guarantees a trailing EOF token
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn span(&self) -> Span {
        let token = self.current();
        Span::new(token.line, token.column)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, MacalError> {
        if self.kind() == kind {
            Ok(self.advance())
        } else {
            self.error(format!("Expected {} but got {}", kind, self.kind()))
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, MacalError> {
        self.error_at(self.span(), message)
    }

    fn error_at<T>(&self, span: Span, message: impl Into<String>) -> Result<T, MacalError> {
        Err(MacalError::ParseError {
            file: self.file.clone(),
            line: span.line,
            column: span.column,
            message: message.into(),
        })
    }

    /// Convert the current literal token into a `Value` and consume it
    fn literal_value(&mut self) -> Result<(Value, Span), MacalError> {
        let span = self.span();
        match token_value(self.current()) {
            Some(Ok(value)) => {
                self.advance();
                Ok((value, span))
            }
            Some(Err(message)) => self.error_at(span, message),
            None => self.error_at(span, format!("Expected a literal, got {}", self.kind())),
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statement(&mut self) -> Result<Stmt, MacalError> {
        match self.kind() {
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Foreach => self.foreach_statement(),
            TokenKind::Select => self.select_statement(),
            TokenKind::Switch => self.switch_statement(),
            TokenKind::Break => self.break_statement(),
            TokenKind::Continue => self.continue_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Print => self.print_statement(),
            TokenKind::Halt => self.halt_statement(),
            TokenKind::Include => self.include_statement(),
            TokenKind::Const => self.const_statement(),
            TokenKind::Identifier => self.assignment_statement(false),
            TokenKind::LeftBrace => Ok(Stmt::Block(self.block()?)),
            other => self.error(format!("Invalid statement {}", other)),
        }
    }

    fn block(&mut self) -> Result<Block, MacalError> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let span = Span::new(open.line, open.column);
        let mut statements = Vec::new();
        while self.kind() != TokenKind::RightBrace && self.kind() != TokenKind::Eof {
            statements.push(self.statement()?);
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(Block { statements, span })
    }

    fn if_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::If)?;
        let condition = self.parse_expression()?;
        let block = self.block()?;
        let mut elifs = Vec::new();
        while self.kind() == TokenKind::Elif {
            let span = self.span();
            self.advance();
            let condition = self.parse_expression()?;
            let block = self.block()?;
            elifs.push(ElifBranch {
                condition,
                block,
                span,
            });
        }
        let else_block = if self.kind() == TokenKind::Else {
            self.advance();
            Some(self.block()?)
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            block,
            elifs,
            else_block,
            span,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::While)?;
        let condition = self.parse_expression()?;
        let block = self.block()?;
        Ok(Stmt::While {
            condition,
            block,
            span,
        })
    }

    fn foreach_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Foreach)?;
        let iterable = self.parse_expression()?;
        let block = self.block()?;
        Ok(Stmt::Foreach {
            iterable,
            block,
            span,
        })
    }

    fn select_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Select)?;
        let distinct = self.kind() == TokenKind::Distinct;
        if distinct {
            self.advance();
        }
        let mut fields = Vec::new();
        while self.kind() == TokenKind::Identifier {
            let field_span = self.span();
            let name = self.advance().lexeme;
            let alias = if self.kind() == TokenKind::As {
                self.advance();
                Some(self.advance().lexeme)
            } else {
                None
            };
            fields.push(SelectField {
                name,
                alias,
                span: field_span,
            });
            if self.kind() == TokenKind::Comma {
                self.advance();
            }
        }
        if fields.is_empty() && self.kind() == TokenKind::Star {
            fields.push(SelectField {
                name: "*".to_string(),
                alias: None,
                span: self.span(),
            });
            self.advance();
        }
        self.expect(TokenKind::From)?;
        let from = self.parse_expression()?;
        let where_clause = if self.kind() == TokenKind::Where {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        let merge = self.kind() == TokenKind::Merge;
        if merge {
            self.advance();
        }
        self.expect(TokenKind::Into)?;
        let into = self.parse_expression()?;
        if !into.is_assignable() {
            return self.error_at(
                into.span(),
                "Select into target must be a variable or indexed variable",
            );
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Select {
            fields,
            distinct,
            from,
            where_clause,
            merge,
            into,
            span,
        })
    }

    fn switch_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Switch)?;
        let subject = self.parse_expression()?;
        if !matches!(
            subject,
            Expr::Variable { .. } | Expr::Indexed { .. } | Expr::Call { .. } | Expr::IndexedCall { .. }
        ) {
            return self.error_at(
                subject.span(),
                "Switch subject must be a variable, indexed variable, or function call",
            );
        }
        self.expect(TokenKind::LeftBrace)?;
        let mut cases = Vec::new();
        while self.kind() == TokenKind::Case {
            cases.push(self.case_branch()?);
        }
        let default = if self.kind() == TokenKind::Default {
            self.advance();
            self.expect(TokenKind::Colon)?;
            Some(self.block()?)
        } else {
            None
        };
        self.expect(TokenKind::RightBrace)?;
        Ok(Stmt::Switch {
            subject,
            cases,
            default,
            span,
        })
    }

    fn case_branch(&mut self) -> Result<CaseBranch, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Case)?;
        let label = self.parse_expression()?;
        if !matches!(label, Expr::Literal { .. }) {
            return self.error_at(label.span(), "Case label must be a literal");
        }
        self.expect(TokenKind::Colon)?;
        let block = self.block()?;
        Ok(CaseBranch { label, block, span })
    }

    fn break_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Break)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Break { span })
    }

    fn continue_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Continue)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Continue { span })
    }

    fn return_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Return)?;
        let value = if self.kind() != TokenKind::Semicolon {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return { value, span })
    }

    fn print_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Print)?;
        self.expect(TokenKind::LeftParen)?;
        let args = self.expression_list()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Print { args, span })
    }

    fn halt_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Halt)?;
        let value = if self.kind() != TokenKind::Semicolon {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Halt { value, span })
    }

    fn include_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Include)?;
        let mut libraries = Vec::new();
        loop {
            let lib_span = self.span();
            let name = self.expect(TokenKind::Identifier)?.lexeme;
            libraries.push(LibraryRef {
                name,
                span: lib_span,
            });
            if self.kind() == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Include { libraries, span })
    }

    fn const_statement(&mut self) -> Result<Stmt, MacalError> {
        let span = self.span();
        self.expect(TokenKind::Const)?;
        match self.assignment_statement(true)? {
            stmt @ Stmt::Assignment { .. } => Ok(stmt),
            _ => self.error_at(span, "const must be followed by an assignment"),
        }
    }

    /// An identifier-led statement: assignment, append, function definition,
    /// or a bare call.
    fn assignment_statement(&mut self, constant: bool) -> Result<Stmt, MacalError> {
        let target = self.parse_expression()?;
        let span = target.span();
        match target {
            Expr::Call { name, args, span } => {
                self.expect(TokenKind::Semicolon)?;
                return Ok(Stmt::Call { name, args, span });
            }
            Expr::IndexedCall { target, args, span } => {
                self.expect(TokenKind::Semicolon)?;
                return Ok(Stmt::IndexedCall {
                    target: *target,
                    args,
                    span,
                });
            }
            ref expr if !expr.is_assignable() => {
                return self.error_at(
                    span,
                    "Assignment target must be a variable or indexed variable",
                );
            }
            _ => {}
        }

        if self.kind() == TokenKind::NewArray {
            // target []= value; appends to an array
            self.advance();
            let op = self.assign_operator()?;
            let op = match op.kind {
                TokenKind::Assign => AssignOp::Assign,
                other => {
                    return self.error_at(
                        Span::new(op.line, op.column),
                        format!("Operator {} not supported for array append", other),
                    )
                }
            };
            let value = self.parse_expression()?;
            self.expect(TokenKind::Semicolon)?;
            return Ok(Stmt::Assignment {
                target,
                op,
                value,
                append: true,
                constant,
                span,
            });
        }

        let op_token = self.assign_operator()?;
        if op_token.kind == TokenKind::Arrow {
            return self.function_definition(target, constant);
        }
        let op = match op_token.kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusAssign => AssignOp::Add,
            TokenKind::MinusAssign => AssignOp::Sub,
            TokenKind::StarAssign => AssignOp::Mul,
            TokenKind::SlashAssign => AssignOp::Div,
            TokenKind::CaretAssign => AssignOp::Pow,
            TokenKind::PercentAssign => AssignOp::Mod,
            // assign_operator only returns the kinds above
            other => return self.error(format!("Invalid assignment operator {}", other)),
        };
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Assignment {
            target,
            op,
            value,
            append: false,
            constant,
            span,
        })
    }

    fn assign_operator(&mut self) -> Result<Token, MacalError> {
        if self.kind().is_assignment_operator() {
            Ok(self.advance())
        } else {
            self.error(format!(
                "Invalid assignment operator {} {:?}",
                self.kind(),
                self.current().lexeme
            ))
        }
    }

    /// `name => (params) [type] { body }` or
    /// `name => (params) [type] external "module", "symbol";`
    fn function_definition(&mut self, target: Expr, constant: bool) -> Result<Stmt, MacalError> {
        let span = target.span();
        if constant {
            return self.error_at(span, "const cannot mark a function definition");
        }
        let name = match target {
            Expr::Variable { name, .. } => name,
            other => {
                return self.error_at(other.span(), "Function name must be a plain identifier")
            }
        };
        let params = self.parameter_list()?;
        let return_type = if self.kind().is_type_keyword() {
            let ty = type_keyword(self.kind());
            self.advance();
            ty
        } else {
            TypeName::Nil
        };
        if self.kind() == TokenKind::External {
            self.advance();
            let module = strip_quotes(&self.expect(TokenKind::String)?.lexeme).to_string();
            self.expect(TokenKind::Comma)?;
            let symbol = strip_quotes(&self.expect(TokenKind::String)?.lexeme).to_string();
            self.expect(TokenKind::Semicolon)?;
            return Ok(Stmt::FunctionDef {
                name,
                params,
                return_type,
                body: None,
                external: Some(ExternalRef { module, symbol }),
                span,
            });
        }
        let body = self.block()?;
        Ok(Stmt::FunctionDef {
            name,
            params,
            return_type,
            body: Some(body),
            external: None,
            span,
        })
    }

    fn parameter_list(&mut self) -> Result<Vec<Parameter>, MacalError> {
        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        while self.kind() != TokenKind::RightParen {
            let ty = if self.kind().is_type_keyword() {
                let ty = type_keyword(self.kind());
                self.advance();
                ty
            } else {
                TypeName::Any
            };
            let span = self.span();
            let name = self.expect(TokenKind::Identifier)?.lexeme;
            params.push(Parameter { name, ty, span });
            if self.kind() == TokenKind::Comma {
                self.advance();
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(params)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub fn parse_expression(&mut self) -> Result<Expr, MacalError> {
        self.parse_logical_or()
    }

    fn binary_loop(
        &mut self,
        ops: &[TokenKind],
        next: fn(&mut Self) -> Result<Expr, MacalError>,
    ) -> Result<Expr, MacalError> {
        let mut node = next(self)?;
        while ops.contains(&self.kind()) {
            let span = self.span();
            let op = binary_operator(self.kind());
            self.advance();
            let right = next(self)?;
            node = Expr::Binary {
                op,
                left: Box::new(node),
                right: Box::new(right),
                span,
            };
        }
        Ok(node)
    }

    fn parse_logical_or(&mut self) -> Result<Expr, MacalError> {
        self.binary_loop(&[TokenKind::Or, TokenKind::Xor], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, MacalError> {
        self.binary_loop(&[TokenKind::And], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expr, MacalError> {
        self.binary_loop(
            &[TokenKind::Equal, TokenKind::NotEqual],
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> Result<Expr, MacalError> {
        self.binary_loop(
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Expr, MacalError> {
        self.binary_loop(
            &[TokenKind::Plus, TokenKind::Minus],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, MacalError> {
        self.binary_loop(
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
            Self::parse_power,
        )
    }

    fn parse_power(&mut self) -> Result<Expr, MacalError> {
        self.binary_loop(&[TokenKind::Caret], Self::parse_unary)
    }

    fn parse_unary(&mut self) -> Result<Expr, MacalError> {
        let op = match self.kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::BitNot => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            let span = self.span();
            self.advance();
            let operand = self.parse_primary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, MacalError> {
        let span = self.span();
        match self.kind() {
            TokenKind::LeftParen => {
                self.advance();
                let node = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(node)
            }
            TokenKind::Identifier => self.identifier_expression(),
            TokenKind::Integer
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil
            | TokenKind::InterpolationPart => {
                let (value, span) = self.literal_value()?;
                Ok(Expr::Literal { value, span })
            }
            TokenKind::InterpolationStart => self.interpolated_string(),
            TokenKind::NewArray | TokenKind::TypeArray => {
                self.advance();
                Ok(Expr::Literal {
                    value: Value::Array(Vec::new()),
                    span,
                })
            }
            TokenKind::NewRecord | TokenKind::TypeRecord => {
                self.advance();
                Ok(Expr::Literal {
                    value: Value::Record(Vec::new()),
                    span,
                })
            }
            TokenKind::LeftBracket => {
                self.advance();
                let items = self.array_elements()?;
                self.expect(TokenKind::RightBracket)?;
                Ok(Expr::Literal {
                    value: Value::Array(items),
                    span,
                })
            }
            TokenKind::LeftBrace => {
                self.advance();
                let fields = self.record_elements()?;
                self.expect(TokenKind::RightBrace)?;
                Ok(Expr::Literal {
                    value: Value::Record(fields),
                    span,
                })
            }
            kind if kind.is_type_check() => self.type_check_expression(),
            TokenKind::TypeQuery => {
                self.advance();
                self.expect(TokenKind::LeftParen)?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(Expr::TypeQuery {
                    expr: Box::new(expr),
                    span,
                })
            }
            other => self.error(format!(
                "Invalid primary expression {} {:?}",
                other,
                self.current().lexeme
            )),
        }
    }

    /// Identifier in expression position: variable, indexed variable, call,
    /// or call through an indexed variable.
    fn identifier_expression(&mut self) -> Result<Expr, MacalError> {
        let ident = self.expect(TokenKind::Identifier)?;
        let span = Span::new(ident.line, ident.column);
        if self.kind() == TokenKind::LeftBracket {
            let mut index = Vec::new();
            while self.kind() == TokenKind::LeftBracket {
                self.advance();
                index.push(self.parse_expression()?);
                self.expect(TokenKind::RightBracket)?;
            }
            let node = Expr::Indexed {
                name: ident.lexeme,
                index,
                span,
            };
            if self.kind() == TokenKind::LeftParen {
                self.advance();
                let args = self.expression_list()?;
                self.expect(TokenKind::RightParen)?;
                return Ok(Expr::IndexedCall {
                    target: Box::new(node),
                    args,
                    span,
                });
            }
            return Ok(node);
        }
        if self.kind() == TokenKind::LeftParen {
            self.advance();
            let args = self.expression_list()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(Expr::Call {
                name: ident.lexeme,
                args,
                span,
            });
        }
        Ok(Expr::Variable {
            name: ident.lexeme,
            span,
        })
    }

    fn type_check_expression(&mut self) -> Result<Expr, MacalError> {
        let span = self.span();
        let check = match self.kind() {
            TokenKind::IsString => TypeName::String,
            TokenKind::IsInt => TypeName::Integer,
            TokenKind::IsFloat => TypeName::Float,
            TokenKind::IsBool => TypeName::Bool,
            TokenKind::IsRecord => TypeName::Record,
            TokenKind::IsArray => TypeName::Array,
            TokenKind::IsFunction => TypeName::Function,
            TokenKind::IsNil => TypeName::Nil,
            other => return self.error(format!("Expected a type-check builtin, got {}", other)),
        };
        self.advance();
        self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::TypeCheck {
            check,
            expr: Box::new(expr),
            span,
        })
    }

    fn expression_list(&mut self) -> Result<Vec<Expr>, MacalError> {
        let mut nodes = Vec::new();
        if self.kind() == TokenKind::RightParen {
            return Ok(nodes);
        }
        nodes.push(self.parse_expression()?);
        while self.kind() == TokenKind::Comma {
            self.advance();
            nodes.push(self.parse_expression()?);
        }
        Ok(nodes)
    }

    /// Array literal elements; each must fold to a constant
    fn array_elements(&mut self) -> Result<Vec<Value>, MacalError> {
        if self.kind() == TokenKind::RightBracket {
            return self.error("Invalid array element, expected a literal, got ']'");
        }
        let mut items = vec![self.constant_element()?];
        while self.kind() == TokenKind::Comma {
            self.advance();
            items.push(self.constant_element()?);
        }
        Ok(items)
    }

    fn constant_element(&mut self) -> Result<Value, MacalError> {
        let node = self.parse_expression()?;
        match node {
            Expr::Literal { value, .. } => Ok(value),
            other => self.error_at(
                other.span(),
                "Array and record elements must be literal values",
            ),
        }
    }

    /// Record literal fields; string keys, constant values, insertion order
    fn record_elements(&mut self) -> Result<Vec<(String, Value)>, MacalError> {
        if self.kind() == TokenKind::RightBrace {
            return self.error("Invalid record element, expected a record key, got '}'");
        }
        let mut fields = Vec::new();
        loop {
            let key_expr = self.parse_expression()?;
            let key = match key_expr {
                Expr::Literal {
                    value: Value::Str(key),
                    ..
                } => key,
                other => {
                    return self.error_at(other.span(), "Record key must be a string literal")
                }
            };
            self.expect(TokenKind::Colon)?;
            let value = self.constant_element()?;
            fields.push((key, value));
            if self.kind() == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(fields)
    }

    /// Desugar `$"a {x} b"` into `(("a " + x) + " b")`
    fn interpolated_string(&mut self) -> Result<Expr, MacalError> {
        let start = self.expect(TokenKind::InterpolationStart)?;
        let span = Span::new(start.line, start.column);
        if self.kind() == TokenKind::InterpolationEnd {
            // No embedded expressions: collapses to a plain string literal
            let (value, span) = self.literal_value()?;
            return Ok(Expr::Literal { value, span });
        }
        if self.kind() != TokenKind::InterpolationPart {
            return self.error(format!(
                "Invalid interpolated string, expected a string part, got {}",
                self.kind()
            ));
        }
        let (value, part_span) = self.literal_value()?;
        let mut node = Expr::Literal {
            value,
            span: part_span,
        };
        while self.kind() != TokenKind::InterpolationEnd {
            if self.kind() == TokenKind::Eof {
                return self.error("Unterminated interpolated string");
            }
            let right = self.parse_expression()?;
            node = Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(node),
                right: Box::new(right),
                span,
            };
        }
        let (value, end_span) = self.literal_value()?;
        Ok(Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(node),
            right: Box::new(Expr::Literal {
                value,
                span: end_span,
            }),
            span,
        })
    }
}

/// Map a type keyword token to its `TypeName`
fn type_keyword(kind: TokenKind) -> TypeName {
    match kind {
        TokenKind::TypeInteger => TypeName::Integer,
        TokenKind::TypeFloat => TypeName::Float,
        TokenKind::TypeString => TypeName::String,
        TokenKind::TypeBool => TypeName::Bool,
        TokenKind::TypeArray => TypeName::Array,
        TokenKind::TypeRecord => TypeName::Record,
        TokenKind::TypeFunction => TypeName::Function,
        TokenKind::TypeParams => TypeName::Params,
        TokenKind::TypeVariable => TypeName::Variable,
        _ => TypeName::Any,
    }
}

/// Map a binary operator token to its `BinaryOp`; callers only pass operator
/// kinds accepted by the precedence chain.
fn binary_operator(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Caret => BinaryOp::Pow,
        TokenKind::Equal => BinaryOp::Eq,
        TokenKind::NotEqual => BinaryOp::Neq,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEqual => BinaryOp::Lte,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEqual => BinaryOp::Gte,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Xor => BinaryOp::Xor,
        // unreachable by construction of the precedence chain
        _ => BinaryOp::Add,
    }
}

/// Parse a script in one call
pub fn parse_script(source: &str, file: &str) -> Result<Program, MacalError> {
    let tokens = crate::lexer::tokenize(source)?;
    Parser::new(tokens, file).parse()
}
