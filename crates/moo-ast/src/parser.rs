//! Recursive descent parser for MOO source code.
//!
//! Statements are parsed by descent; expressions by precedence climbing
//! over the grammar's binary operator table. Braced constructs (`{...}`)
//! are parsed as a generalized element list and re-interpreted by the
//! token that follows the closing brace: `=>` makes a lambda, `=` makes a
//! scatter assignment, a trailing `for` inside makes a comprehension, and
//! anything else leaves a list literal.

use moo_grammar::{
    Grammar, Keyword, PREC_ASSIGN, PREC_BINARY_MIN, PREC_CONDITIONAL, PREC_UNARY,
};

use crate::ast::*;
use crate::lexer;
use crate::token::{Token, TokenKind};
use crate::{Location, ParseError};

/// Parse a source string into a [`Program`].
///
/// A source unit whose first token is the `object` keyword parses as an
/// object definition file; anything else parses as a statement list.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let grammar = Grammar::load()?;
    let tokens = lexer::tokenize(source, grammar)?;
    let mut parser = Parser::new(tokens, grammar);
    parser.parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    grammar: Grammar,
}

/// One element of a `{...}` construct before its interpretation is known.
struct BracedItem {
    kind: BracedItemKind,
    location: Location,
}

enum BracedItemKind {
    Expr(Expression),
    /// `@expr`
    Splat(Expression),
    /// `?name` or `?name = default`
    Optional {
        name: Identifier,
        default: Option<Expression>,
    },
}

impl Parser {
    fn new(tokens: Vec<Token>, grammar: Grammar) -> Self {
        Self {
            tokens,
            pos: 0,
            grammar,
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let body = if self.at_keyword(Keyword::Object) {
            ProgramBody::Object(self.parse_object_definition()?)
        } else {
            let mut statements = Vec::new();
            while self.current_kind() != TokenKind::Eof {
                statements.push(self.parse_statement()?);
            }
            ProgramBody::Statements(statements)
        };
        Ok(Program {
            body,
            location: Location::new(1, 1, 0),
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Let) => self.parse_let_statement(),
            TokenKind::Keyword(Keyword::Const) => self.parse_const_statement(),
            TokenKind::Keyword(Keyword::Global) => self.parse_global_statement(),
            TokenKind::Keyword(Keyword::Begin) => self.parse_block_statement(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::For) => self.parse_for_statement(),
            TokenKind::Keyword(Keyword::Fork) => self.parse_fork_statement(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try_statement(),
            TokenKind::Keyword(Keyword::Fn) if self.peek_kind(1) == TokenKind::Ident => {
                self.parse_function_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        let expression = self.parse_expression()?;
        self.eat_semicolon();
        Ok(Statement::Expression(ExpressionStatement {
            expression,
            location,
        }))
    }

    fn parse_let_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::Let))?;
        let target = self.parse_binding_target()?;
        self.consume(TokenKind::Assign)?;
        let expression = self.parse_expression()?;
        self.eat_semicolon();
        Ok(Statement::Let(LetStatement {
            target,
            expression,
            location: kw.location,
        }))
    }

    fn parse_const_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::Const))?;
        let target = self.parse_binding_target()?;
        self.consume(TokenKind::Assign)?;
        let expression = self.parse_expression()?;
        self.eat_semicolon();
        Ok(Statement::Const(ConstStatement {
            target,
            expression,
            location: kw.location,
        }))
    }

    fn parse_global_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::Global))?;
        let name = self.expect_ident()?;
        let expression = if self.at(TokenKind::Assign) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.eat_semicolon();
        Ok(Statement::Global(GlobalStatement {
            name: name.value,
            expression,
            location: kw.location,
        }))
    }

    fn parse_binding_target(&mut self) -> Result<BindingTarget, ParseError> {
        if self.at(TokenKind::LBrace) {
            Ok(BindingTarget::Pattern(self.parse_binding_pattern()?))
        } else {
            let token = self.expect_ident()?;
            Ok(BindingTarget::Name(Identifier {
                name: token.value,
                location: token.location,
            }))
        }
    }

    fn parse_block_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::Begin))?;
        let body = self.parse_body(&[Keyword::End])?;
        self.consume_keyword(Keyword::End)?;
        Ok(Statement::Block(BlockStatement {
            body,
            location: kw.location,
        }))
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::If))?;
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;

        let clause_ends = [Keyword::Elseif, Keyword::Else, Keyword::Endif];
        let then_body = self.parse_body(&clause_ends)?;

        let mut elseif_clauses = Vec::new();
        while self.at_keyword(Keyword::Elseif) {
            let elseif = self.consume_keyword(Keyword::Elseif)?;
            self.consume(TokenKind::LParen)?;
            let condition = self.parse_expression()?;
            self.consume(TokenKind::RParen)?;
            let body = self.parse_body(&clause_ends)?;
            elseif_clauses.push(ElseifClause {
                condition,
                body,
                location: elseif.location,
            });
        }

        let else_body = if self.at_keyword(Keyword::Else) {
            self.advance();
            Some(self.parse_body(&[Keyword::Endif])?)
        } else {
            None
        };

        self.consume_keyword(Keyword::Endif)?;
        Ok(Statement::If(IfStatement {
            condition,
            then_body,
            elseif_clauses,
            else_body,
            location: kw.location,
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::While))?;
        let label = self.eat_label();
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        let body = self.parse_body(&[Keyword::Endwhile])?;
        self.consume_keyword(Keyword::Endwhile)?;
        Ok(Statement::While(WhileStatement {
            label,
            condition,
            body,
            location: kw.location,
        }))
    }

    fn parse_for_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::For))?;
        let variable = self.expect_ident()?;
        self.consume_keyword(Keyword::In)?;
        let iterable = self.parse_iterable()?;
        let body = self.parse_body(&[Keyword::Endfor])?;
        self.consume_keyword(Keyword::Endfor)?;
        Ok(Statement::For(ForStatement {
            variable: variable.value,
            iterable,
            body,
            location: kw.location,
        }))
    }

    fn parse_fork_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::Fork))?;
        let label = self.eat_label();
        self.consume(TokenKind::LParen)?;
        let expression = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        let body = self.parse_body(&[Keyword::Endfork])?;
        self.consume_keyword(Keyword::Endfork)?;
        Ok(Statement::Fork(ForkStatement {
            label,
            expression,
            body,
            location: kw.location,
        }))
    }

    fn parse_try_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::Try))?;
        let section_ends = [Keyword::Except, Keyword::Finally, Keyword::Endtry];
        let body = self.parse_body(&section_ends)?;
        if body.is_empty() {
            return self.unexpected_token(Some("Expected statement in try body"));
        }

        let mut handlers = Vec::new();
        while self.at_keyword(Keyword::Except) {
            let except = self.consume_keyword(Keyword::Except)?;
            let variable = if self.at(TokenKind::Ident) {
                Some(self.expect_ident()?.value)
            } else {
                None
            };
            self.consume(TokenKind::LParen)?;
            let codes = self.parse_error_code_spec()?;
            self.consume(TokenKind::RParen)?;
            let body = self.parse_body(&section_ends)?;
            handlers.push(ExceptClause {
                variable,
                codes,
                body,
                location: except.location,
            });
        }

        let finally = if self.at_keyword(Keyword::Finally) {
            self.advance();
            Some(self.parse_body(&[Keyword::Endtry])?)
        } else {
            None
        };

        self.consume_keyword(Keyword::Endtry)?;
        Ok(Statement::Try(TryStatement {
            body,
            handlers,
            finally,
            location: kw.location,
        }))
    }

    fn parse_function_statement(&mut self) -> Result<Statement, ParseError> {
        let kw = self.consume(TokenKind::Keyword(Keyword::Fn))?;
        let name = self.expect_ident()?;
        self.consume(TokenKind::LParen)?;
        let parameters = self.parse_parameter_list()?;
        self.consume(TokenKind::RParen)?;
        let body = self.parse_body(&[Keyword::Endfn])?;
        self.consume_keyword(Keyword::Endfn)?;
        Ok(Statement::Function(FunctionStatement {
            name: name.value,
            parameters,
            body,
            location: kw.location,
        }))
    }

    /// Parse statements until one of `terminators` (or a malformed
    /// statement errors out). EOF before a terminator is an error.
    fn parse_body(&mut self, terminators: &[Keyword]) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        expected: describe_keywords(terminators),
                    });
                }
                TokenKind::Keyword(kw) if terminators.contains(&kw) => break,
                _ => statements.push(self.parse_statement()?),
            }
        }
        Ok(statements)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            match self.current_kind() {
                // Postfix access binds tightest and always applies.
                TokenKind::Dot => {
                    lhs = self.parse_property_access(lhs)?;
                    continue;
                }
                TokenKind::Colon => {
                    lhs = self.parse_method_call(lhs)?;
                    continue;
                }
                TokenKind::LBracket => {
                    lhs = self.parse_index_or_slice(lhs)?;
                    continue;
                }

                TokenKind::Assign if PREC_ASSIGN >= min_bp => {
                    let eq = self.consume(TokenKind::Assign)?;
                    let target = expression_to_binding_target(lhs, eq.location)?;
                    let value = self.parse_expr_bp(PREC_ASSIGN)?;
                    let location = match &target {
                        BindingTarget::Name(id) => id.location,
                        BindingTarget::Pattern(p) => p.location,
                    };
                    lhs = Expression::Assignment(Box::new(Assignment {
                        target,
                        value,
                        location,
                    }));
                    continue;
                }

                TokenKind::Question if PREC_CONDITIONAL >= min_bp => {
                    self.advance();
                    let consequence = self.parse_expr_bp(0)?;
                    self.consume(TokenKind::Pipe)?;
                    let alternative = self.parse_expr_bp(PREC_CONDITIONAL)?;
                    let location = lhs.location();
                    lhs = Expression::Conditional(Box::new(Conditional {
                        condition: lhs,
                        consequence,
                        alternative,
                        location,
                    }));
                    continue;
                }

                kind => {
                    let Some(spelling) = kind.operator_str() else {
                        break;
                    };
                    let Some(op) = self.grammar.binary_operator(spelling) else {
                        break;
                    };
                    if op.precedence < min_bp {
                        break;
                    }
                    self.advance();
                    let rhs_bp = match op.assoc {
                        moo_grammar::Assoc::Left => op.precedence + 1,
                        moo_grammar::Assoc::Right => op.precedence,
                    };
                    let right = self.parse_expr_bp(rhs_bp)?;
                    let location = lhs.location();
                    lhs = Expression::Binary(Box::new(BinaryOperation {
                        operator: op.token.to_string(),
                        left: lhs,
                        right,
                        location,
                    }));
                    continue;
                }
            }
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        let loc = self.current_location();
        match self.current_kind() {
            TokenKind::Ident => {
                let token = self.consume(TokenKind::Ident)?;
                let ident = Identifier {
                    name: token.value,
                    location: token.location,
                };
                if self.at(TokenKind::LParen) {
                    let arguments = self.parse_arguments()?;
                    return Ok(Expression::Call(Box::new(CallExpression {
                        function: Callee::Name(ident),
                        arguments,
                        location: loc,
                    })));
                }
                Ok(Expression::Identifier(ident))
            }

            TokenKind::Int => {
                let token = self.consume(TokenKind::Int)?;
                let value = token.value.parse::<i64>().map_err(|_| {
                    ParseError::IntegerOutOfRange {
                        text: token.value.clone(),
                        line: token.location.line,
                        column: token.location.column,
                    }
                })?;
                Ok(Expression::Integer(IntegerLiteral {
                    value,
                    location: loc,
                }))
            }

            TokenKind::Float => {
                let token = self.consume(TokenKind::Float)?;
                let value = token.value.parse::<f64>().map_err(|_| {
                    ParseError::UnexpectedToken {
                        message: format!("Invalid float literal '{}'", token.value),
                        line: token.location.line,
                        column: token.location.column,
                    }
                })?;
                Ok(Expression::Float(FloatLiteral {
                    value,
                    location: loc,
                }))
            }

            TokenKind::Str => {
                let token = self.consume(TokenKind::Str)?;
                Ok(Expression::Str(StringLiteral {
                    value: token.value,
                    location: loc,
                }))
            }

            TokenKind::ErrCode => {
                let token = self.consume(TokenKind::ErrCode)?;
                Ok(Expression::ErrorCode(ErrorCodeLiteral {
                    code: token.value,
                    location: loc,
                }))
            }

            TokenKind::ObjId => {
                let token = self.consume(TokenKind::ObjId)?;
                let first = token.value.as_bytes().first().copied();
                let id = if matches!(first, Some(b'-') | Some(b'0'..=b'9')) {
                    let number = token.value.parse::<i64>().map_err(|_| {
                        ParseError::IntegerOutOfRange {
                            text: token.value.clone(),
                            line: token.location.line,
                            column: token.location.column,
                        }
                    })?;
                    ObjRef::Number(number)
                } else {
                    ObjRef::Name(token.value)
                };
                Ok(Expression::ObjectId(ObjectIdLiteral { id, location: loc }))
            }

            TokenKind::Keyword(Keyword::True) | TokenKind::Keyword(Keyword::False) => {
                let value = self.at_keyword(Keyword::True);
                self.advance();
                Ok(Expression::Boolean(BooleanLiteral {
                    value,
                    location: loc,
                }))
            }

            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                let label = self.eat_label();
                Ok(Expression::Break(BreakExpression {
                    label,
                    location: loc,
                }))
            }

            TokenKind::Keyword(Keyword::Continue) => {
                self.advance();
                let label = self.eat_label();
                Ok(Expression::Continue(ContinueExpression {
                    label,
                    location: loc,
                }))
            }

            TokenKind::Keyword(Keyword::Return) => {
                self.advance();
                let value = if starts_expression(self.current_kind()) {
                    Some(self.parse_expr_bp(0)?)
                } else {
                    None
                };
                Ok(Expression::Return(Box::new(ReturnExpression {
                    value,
                    location: loc,
                })))
            }

            TokenKind::Keyword(Keyword::Fn) => {
                self.advance();
                self.consume(TokenKind::LParen)?;
                let parameters = self.parse_parameter_list()?;
                self.consume(TokenKind::RParen)?;
                let body = self.parse_body(&[Keyword::Endfn])?;
                self.consume_keyword(Keyword::Endfn)?;
                Ok(Expression::Function(Box::new(FunctionExpression {
                    parameters,
                    body,
                    location: loc,
                })))
            }

            TokenKind::Keyword(Keyword::Pass) => {
                self.advance();
                let arguments = self.parse_arguments()?;
                Ok(Expression::Pass(PassExpression {
                    arguments,
                    location: loc,
                }))
            }

            TokenKind::Quote => {
                self.advance();
                let name = self.expect_ident()?;
                Ok(Expression::Symbol(SymbolLiteral {
                    name: name.value,
                    location: loc,
                }))
            }

            TokenKind::Backtick => self.parse_try_expression(),

            TokenKind::Dollar => {
                self.advance();
                if self.at(TokenKind::Ident) {
                    let name = self.expect_ident()?;
                    Ok(Expression::SystemProperty(SystemProperty {
                        name: name.value,
                        location: loc,
                    }))
                } else {
                    Ok(Expression::RangeEnd(RangeEnd { location: loc }))
                }
            }

            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_expr_bp(PREC_UNARY)?;
                Ok(Expression::Unary(Box::new(UnaryOperation {
                    operator: UnaryOp::Not,
                    operand,
                    location: loc,
                })))
            }

            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expr_bp(PREC_UNARY)?;
                Ok(Expression::Unary(Box::new(UnaryOperation {
                    operator: UnaryOp::Neg,
                    operand,
                    location: loc,
                })))
            }

            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr_bp(0)?;
                self.consume(TokenKind::RParen)?;
                if self.at(TokenKind::LParen) {
                    let arguments = self.parse_arguments()?;
                    return Ok(Expression::Call(Box::new(CallExpression {
                        function: Callee::Expr(Box::new(inner)),
                        arguments,
                        location: loc,
                    })));
                }
                Ok(inner)
            }

            TokenKind::LBrace => self.parse_braced(),
            TokenKind::LBracket => self.parse_map_literal().map(Expression::Map),
            TokenKind::Lt => self.parse_flyweight(),

            _ => self.unexpected_token(None),
        }
    }

    fn parse_property_access(&mut self, object: Expression) -> Result<Expression, ParseError> {
        self.consume(TokenKind::Dot)?;
        let property = self.parse_access_name()?;
        let location = object.location();
        Ok(Expression::Property(Box::new(PropertyAccess {
            object,
            property,
            location,
        })))
    }

    fn parse_method_call(&mut self, object: Expression) -> Result<Expression, ParseError> {
        self.consume(TokenKind::Colon)?;
        let method = self.parse_access_name()?;
        let arguments = self.parse_arguments()?;
        let location = object.location();
        Ok(Expression::MethodCall(Box::new(MethodCall {
            object,
            method,
            arguments,
            location,
        })))
    }

    /// `.name`, `:name`, `.(expr)`, `:(expr)`
    fn parse_access_name(&mut self) -> Result<AccessName, ParseError> {
        match self.current_kind() {
            TokenKind::Ident => {
                let token = self.consume(TokenKind::Ident)?;
                Ok(AccessName::Ident(token.value))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr_bp(0)?;
                self.consume(TokenKind::RParen)?;
                Ok(AccessName::Expr(Box::new(inner)))
            }
            _ => self.unexpected_token(Some("Expected property or method name")),
        }
    }

    fn parse_index_or_slice(&mut self, object: Expression) -> Result<Expression, ParseError> {
        self.consume(TokenKind::LBracket)?;
        let first = self.parse_expr_bp(0)?;
        let location = object.location();
        if self.at(TokenKind::DotDot) {
            self.advance();
            let end = self.parse_expr_bp(0)?;
            self.consume(TokenKind::RBracket)?;
            return Ok(Expression::Slice(Box::new(SliceAccess {
                object,
                start: first,
                end,
                location,
            })));
        }
        self.consume(TokenKind::RBracket)?;
        Ok(Expression::Index(Box::new(IndexAccess {
            object,
            index: first,
            location,
        })))
    }

    fn parse_arguments(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                if self.at(TokenKind::At) {
                    self.advance();
                    arguments.push(Arg::Splat(self.parse_expr_bp(0)?));
                } else {
                    arguments.push(Arg::Expr(self.parse_expr_bp(0)?));
                }
                if self.at(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(arguments)
    }

    fn parse_try_expression(&mut self) -> Result<Expression, ParseError> {
        let open = self.consume(TokenKind::Backtick)?;
        let expression = self.parse_expr_bp(0)?;
        self.consume(TokenKind::Bang)?;
        let codes = self.parse_error_code_spec()?;
        let fallback = if self.at(TokenKind::FatArrow) {
            self.advance();
            Some(self.parse_expr_bp(0)?)
        } else {
            None
        };
        self.consume(TokenKind::Quote)?;
        Ok(Expression::TryExpr(Box::new(TryExpression {
            expression,
            codes,
            fallback,
            location: open.location,
        })))
    }

    /// `ANY` or a non-empty comma-separated list of error codes.
    fn parse_error_code_spec(&mut self) -> Result<ErrorCodeSpec, ParseError> {
        if self.at_keyword(Keyword::Any) {
            self.advance();
            return Ok(ErrorCodeSpec::Any);
        }
        let mut codes = vec![self.consume(TokenKind::ErrCode)?.value];
        while self.at(TokenKind::Comma) {
            self.advance();
            codes.push(self.consume(TokenKind::ErrCode)?.value);
        }
        Ok(ErrorCodeSpec::Codes(codes))
    }

    /// `{...}` — list, lambda, scatter-assignment target, or comprehension.
    fn parse_braced(&mut self) -> Result<Expression, ParseError> {
        let open = self.consume(TokenKind::LBrace)?;
        let loc = open.location;
        let mut items: Vec<BracedItem> = Vec::new();

        if !self.at(TokenKind::RBrace) {
            items.push(self.parse_braced_item()?);

            if self.at_keyword(Keyword::For) {
                let expression = match items.pop() {
                    Some(BracedItem {
                        kind: BracedItemKind::Expr(e),
                        ..
                    }) => e,
                    _ => return self.unexpected_token(Some("Unexpected 'for'")),
                };
                self.advance();
                let variable = self.expect_ident()?;
                self.consume_keyword(Keyword::In)?;
                let iterable = self.parse_iterable()?;
                self.consume(TokenKind::RBrace)?;
                return Ok(Expression::Comprehension(Box::new(RangeComprehension {
                    expression,
                    variable: variable.value,
                    iterable,
                    location: loc,
                })));
            }

            while self.at(TokenKind::Comma) {
                self.advance();
                items.push(self.parse_braced_item()?);
            }
        }
        self.consume(TokenKind::RBrace)?;

        if self.at(TokenKind::FatArrow) {
            self.advance();
            let parameters = items
                .into_iter()
                .map(braced_item_to_binding)
                .collect::<Result<Vec<_>, _>>()?;
            let body = self.parse_expr_bp(0)?;
            return Ok(Expression::Lambda(Box::new(LambdaExpression {
                parameters,
                body,
                location: loc,
            })));
        }

        if self.at(TokenKind::Assign) {
            self.advance();
            let elements = items
                .into_iter()
                .map(braced_item_to_binding)
                .collect::<Result<Vec<_>, _>>()?;
            let value = self.parse_expr_bp(PREC_ASSIGN)?;
            return Ok(Expression::Assignment(Box::new(Assignment {
                target: BindingTarget::Pattern(BindingPattern {
                    elements,
                    location: loc,
                }),
                value,
                location: loc,
            })));
        }

        let elements = items
            .into_iter()
            .map(|item| match item.kind {
                BracedItemKind::Expr(e) => Ok(ListElement::Expr(e)),
                BracedItemKind::Splat(e) => Ok(ListElement::Scatter(e)),
                BracedItemKind::Optional { .. } => Err(ParseError::InvalidPattern {
                    message: "optional binding outside pattern".to_string(),
                    line: item.location.line,
                    column: item.location.column,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expression::List(ListLiteral {
            elements,
            location: loc,
        }))
    }

    fn parse_braced_item(&mut self) -> Result<BracedItem, ParseError> {
        let location = self.current_location();
        match self.current_kind() {
            TokenKind::Question => {
                self.advance();
                let token = self.expect_ident()?;
                let name = Identifier {
                    name: token.value,
                    location: token.location,
                };
                let default = if self.at(TokenKind::Assign) {
                    self.advance();
                    Some(self.parse_expr_bp(0)?)
                } else {
                    None
                };
                Ok(BracedItem {
                    kind: BracedItemKind::Optional { name, default },
                    location,
                })
            }
            TokenKind::At => {
                self.advance();
                let expr = self.parse_expr_bp(0)?;
                Ok(BracedItem {
                    kind: BracedItemKind::Splat(expr),
                    location,
                })
            }
            _ => {
                let expr = self.parse_expr_bp(0)?;
                Ok(BracedItem {
                    kind: BracedItemKind::Expr(expr),
                    location,
                })
            }
        }
    }

    /// Strict `{...}` binding pattern for `let`/`const` targets.
    fn parse_binding_pattern(&mut self) -> Result<BindingPattern, ParseError> {
        let open = self.consume(TokenKind::LBrace)?;
        let mut elements = Vec::new();
        if !self.at(TokenKind::RBrace) {
            loop {
                elements.push(self.parse_binding_element()?);
                if self.at(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.consume(TokenKind::RBrace)?;
        Ok(BindingPattern {
            elements,
            location: open.location,
        })
    }

    fn parse_binding_element(&mut self) -> Result<BindingElement, ParseError> {
        match self.current_kind() {
            TokenKind::Question => {
                self.advance();
                let token = self.expect_ident()?;
                let name = Identifier {
                    name: token.value,
                    location: token.location,
                };
                let default = if self.at(TokenKind::Assign) {
                    self.advance();
                    Some(self.parse_expr_bp(0)?)
                } else {
                    None
                };
                Ok(BindingElement::Optional { name, default })
            }
            TokenKind::At => {
                self.advance();
                let token = self.expect_ident()?;
                Ok(BindingElement::Rest(Identifier {
                    name: token.value,
                    location: token.location,
                }))
            }
            TokenKind::Ident => {
                let token = self.consume(TokenKind::Ident)?;
                Ok(BindingElement::Name(Identifier {
                    name: token.value,
                    location: token.location,
                }))
            }
            _ => self.unexpected_token(Some("Expected binding element")),
        }
    }

    /// Parameter list of a `fn` or lambda (after `(` / inside `{}`).
    fn parse_parameter_list(&mut self) -> Result<Vec<BindingElement>, ParseError> {
        let mut parameters = Vec::new();
        if self.at(TokenKind::RParen) {
            return Ok(parameters);
        }
        loop {
            parameters.push(self.parse_binding_element()?);
            if self.at(TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        Ok(parameters)
    }

    /// A `for`-header or comprehension iterable: `[start..end]` range or a
    /// plain expression.
    fn parse_iterable(&mut self) -> Result<Iterable, ParseError> {
        if self.at(TokenKind::LBracket) {
            let saved = self.pos;
            match self.try_parse_range() {
                Ok(range) => return Ok(Iterable::Range(range)),
                Err(_) => self.pos = saved,
            }
        }
        Ok(Iterable::Expression(self.parse_expr_bp(0)?))
    }

    fn try_parse_range(&mut self) -> Result<Range, ParseError> {
        let open = self.consume(TokenKind::LBracket)?;
        let start = self.parse_expr_bp(0)?;
        self.consume(TokenKind::DotDot)?;
        let end = self.parse_expr_bp(0)?;
        self.consume(TokenKind::RBracket)?;
        Ok(Range {
            start: Box::new(start),
            end: Box::new(end),
            location: open.location,
        })
    }

    /// `[k -> v, ...]` map literal (prefix position only; postfix `[` is
    /// index/slice).
    fn parse_map_literal(&mut self) -> Result<MapLiteral, ParseError> {
        let open = self.consume(TokenKind::LBracket)?;
        let mut entries = Vec::new();
        if !self.at(TokenKind::RBracket) {
            loop {
                let entry_loc = self.current_location();
                let key = self.parse_expr_bp(0)?;
                self.consume(TokenKind::Arrow)?;
                let value = self.parse_expr_bp(0)?;
                entries.push(MapEntry {
                    key,
                    value,
                    location: entry_loc,
                });
                if self.at(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.consume(TokenKind::RBracket)?;
        Ok(MapLiteral {
            entries,
            location: open.location,
        })
    }

    /// `<parent [, [props]] [, {values}]>`
    fn parse_flyweight(&mut self) -> Result<Expression, ParseError> {
        let open = self.consume(TokenKind::Lt)?;
        // The parent binds above the comparison level so the closing `>`
        // terminates the literal instead of reading as less-than.
        let parent = self.parse_expr_bp(PREC_BINARY_MIN + 2)?;
        let mut properties = None;
        let mut values = None;

        if self.at(TokenKind::Comma) {
            self.advance();
            if self.at(TokenKind::LBracket) {
                properties = Some(self.parse_map_literal()?);
                if self.at(TokenKind::Comma) {
                    self.advance();
                    values = Some(self.expect_list_literal()?);
                }
            } else if self.at(TokenKind::LBrace) {
                values = Some(self.expect_list_literal()?);
            } else {
                return self.unexpected_token(Some("Expected flyweight properties or values"));
            }
        }

        self.consume(TokenKind::Gt)?;
        Ok(Expression::Flyweight(Box::new(FlyweightLiteral {
            parent,
            properties,
            values,
            location: open.location,
        })))
    }

    fn expect_list_literal(&mut self) -> Result<ListLiteral, ParseError> {
        let loc = self.current_location();
        match self.parse_braced()? {
            Expression::List(list) => Ok(list),
            _ => Err(ParseError::UnexpectedToken {
                message: "Expected list literal".to_string(),
                line: loc.line,
                column: loc.column,
            }),
        }
    }

    // ========================================================================
    // Object definitions
    // ========================================================================

    fn parse_object_definition(&mut self) -> Result<ObjectDefinition, ParseError> {
        let kw = self.consume_keyword(Keyword::Object)?;
        let name = self.expect_ident()?;
        let mut members = Vec::new();

        loop {
            match self.current_kind() {
                // the closing keyword is optional in objdef files
                TokenKind::Eof => break,
                TokenKind::Keyword(Keyword::Endobject) => {
                    self.advance();
                    break;
                }
                TokenKind::Keyword(Keyword::Property) => {
                    members.push(ObjectMember::Property(self.parse_property_definition()?));
                }
                TokenKind::Keyword(Keyword::Verb) => {
                    members.push(ObjectMember::Verb(self.parse_verb_definition()?));
                }
                TokenKind::Ident if self.peek_kind(1) == TokenKind::Colon => {
                    let token = self.consume(TokenKind::Ident)?;
                    self.consume(TokenKind::Colon)?;
                    let value = self.parse_expr_bp(0)?;
                    members.push(ObjectMember::Slot(ObjectSlot {
                        name: token.value,
                        value,
                        location: token.location,
                    }));
                }
                _ => return self.unexpected_token(Some("Expected object member")),
            }
        }

        Ok(ObjectDefinition {
            name: name.value,
            members,
            location: kw.location,
        })
    }

    fn parse_property_definition(&mut self) -> Result<PropertyDefinition, ParseError> {
        let kw = self.consume_keyword(Keyword::Property)?;
        let name = self.expect_ident()?;

        let mut attributes = Vec::new();
        if self.at(TokenKind::LParen) {
            self.advance();
            loop {
                attributes.push(self.parse_attribute()?);
                if self.at(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
            self.consume(TokenKind::RParen)?;
        }

        self.consume(TokenKind::Assign)?;
        let value = self.parse_expr_bp(0)?;
        self.eat_semicolon();
        Ok(PropertyDefinition {
            name: name.value,
            attributes,
            value,
            location: kw.location,
        })
    }

    fn parse_verb_definition(&mut self) -> Result<VerbDefinition, ParseError> {
        let kw = self.consume_keyword(Keyword::Verb)?;
        let name = match self.current_kind() {
            TokenKind::Ident => VerbName::Ident(self.consume(TokenKind::Ident)?.value),
            TokenKind::Str => VerbName::Str(self.consume(TokenKind::Str)?.value),
            _ => return self.unexpected_token(Some("Expected verb name")),
        };

        self.consume(TokenKind::LParen)?;
        let dobj = self.expect_verb_arg()?;
        let prep = self.expect_verb_arg()?;
        let iobj = self.expect_verb_arg()?;
        self.consume(TokenKind::RParen)?;

        // Leading `name: expr` pairs are verb attributes, not statements.
        let mut attributes = Vec::new();
        while self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::Colon {
            attributes.push(self.parse_attribute()?);
        }

        let body = self.parse_body(&[Keyword::Endverb])?;
        self.consume_keyword(Keyword::Endverb)?;
        Ok(VerbDefinition {
            name,
            dobj,
            prep,
            iobj,
            attributes,
            body,
            location: kw.location,
        })
    }

    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let name = self.expect_ident()?;
        self.consume(TokenKind::Colon)?;
        let value = self.parse_expr_bp(0)?;
        Ok(Attribute {
            name: name.value,
            value,
            location: name.location,
        })
    }

    /// Verb argument specs are identifier-shaped; `any` and `in` are also
    /// accepted since they collide with keywords.
    fn expect_verb_arg(&mut self) -> Result<String, ParseError> {
        match self.current_kind() {
            TokenKind::Ident
            | TokenKind::Keyword(Keyword::Any)
            | TokenKind::Keyword(Keyword::In) => {
                let token = self.current_token().cloned();
                self.advance();
                Ok(token.map(|t| t.value).unwrap_or_default())
            }
            _ => self.unexpected_token(Some("Expected verb argument spec")),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> TokenKind {
        self.current_token()
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn peek_kind(&self, ahead: usize) -> TokenKind {
        self.tokens
            .get(self.pos + ahead)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn current_location(&self) -> Location {
        self.current_token()
            .map(|t| t.location)
            .unwrap_or_default()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current_kind() == TokenKind::Keyword(keyword)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn eat_semicolon(&mut self) {
        if self.at(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// An identifier in label position (`while foo (...)`, `break foo`).
    fn eat_label(&mut self) -> Option<String> {
        if self.at(TokenKind::Ident) {
            let label = self.current_token().map(|t| t.value.clone());
            self.advance();
            label
        } else {
            None
        }
    }

    fn consume(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let token = self.current_token().cloned();
        match token {
            Some(t) if t.kind == expected => {
                self.advance();
                Ok(t)
            }
            Some(t) => Err(ParseError::UnexpectedToken {
                message: format!("Expected {:?}, got {:?}", expected, t.kind),
                line: t.location.line,
                column: t.location.column,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: format!("{:?}", expected),
            }),
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<Token, ParseError> {
        self.consume(TokenKind::Keyword(keyword))
    }

    fn expect_ident(&mut self) -> Result<Token, ParseError> {
        match self.current_kind() {
            TokenKind::Ident => self.consume(TokenKind::Ident),
            _ => self.unexpected_token(Some("Expected identifier")),
        }
    }

    fn unexpected_token<T>(&self, message: Option<&str>) -> Result<T, ParseError> {
        let loc = self.current_location();
        let msg = match (message, self.current_token()) {
            (Some(m), Some(t)) => format!("{}: {:?}", m, t.kind),
            (Some(m), None) => m.to_string(),
            (None, Some(t)) => format!("Unexpected token: {:?}", t.kind),
            (None, None) => "Unexpected end of input".to_string(),
        };
        Err(ParseError::UnexpectedToken {
            message: msg,
            line: loc.line,
            column: loc.column,
        })
    }
}

/// Assignment targets are identifiers or scatter patterns; anything else
/// (property access, index, literal) is rejected, matching the grammar.
fn expression_to_binding_target(
    expr: Expression,
    eq_location: Location,
) -> Result<BindingTarget, ParseError> {
    match expr {
        Expression::Identifier(id) => Ok(BindingTarget::Name(id)),
        other => Err(ParseError::InvalidPattern {
            message: format!("invalid assignment target starting at line {}", other.location().line),
            line: eq_location.line,
            column: eq_location.column,
        }),
    }
}

fn braced_item_to_binding(item: BracedItem) -> Result<BindingElement, ParseError> {
    let location = item.location;
    match item.kind {
        BracedItemKind::Expr(Expression::Identifier(id)) => Ok(BindingElement::Name(id)),
        BracedItemKind::Optional { name, default } => {
            Ok(BindingElement::Optional { name, default })
        }
        BracedItemKind::Splat(Expression::Identifier(id)) => Ok(BindingElement::Rest(id)),
        _ => Err(ParseError::InvalidPattern {
            message: "expected identifier, ?optional, or @rest binding".to_string(),
            line: location.line,
            column: location.column,
        }),
    }
}

fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Str
            | TokenKind::ErrCode
            | TokenKind::ObjId
            | TokenKind::Quote
            | TokenKind::Backtick
            | TokenKind::Dollar
            | TokenKind::Bang
            | TokenKind::Minus
            | TokenKind::LParen
            | TokenKind::LBrace
            | TokenKind::LBracket
            | TokenKind::Lt
            | TokenKind::Keyword(Keyword::True)
            | TokenKind::Keyword(Keyword::False)
            | TokenKind::Keyword(Keyword::Fn)
            | TokenKind::Keyword(Keyword::Pass)
            | TokenKind::Keyword(Keyword::Break)
            | TokenKind::Keyword(Keyword::Continue)
            | TokenKind::Keyword(Keyword::Return)
    )
}

fn describe_keywords(keywords: &[Keyword]) -> String {
    keywords
        .iter()
        .map(|kw| format!("'{}'", kw))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(source: &str) -> Vec<Statement> {
        match parse(source).unwrap().body {
            ProgramBody::Statements(stmts) => stmts,
            ProgramBody::Object(_) => panic!("expected statement program"),
        }
    }

    fn single_expression(source: &str) -> Expression {
        let mut stmts = statements(source);
        assert_eq!(stmts.len(), 1);
        match stmts.remove(0) {
            Statement::Expression(s) => s.expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn parse_if_elseif_else() {
        let stmts = statements("if (x) a; elseif (y) b; else c; endif");
        match &stmts[0] {
            Statement::If(s) => {
                assert_eq!(s.then_body.len(), 1);
                assert_eq!(s.elseif_clauses.len(), 1);
                assert!(s.else_body.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn parse_keywords_any_case() {
        let stmts = statements("IF (x) a; ENDIF");
        assert!(matches!(stmts[0], Statement::If(_)));
    }

    #[test]
    fn parse_while_with_label() {
        let stmts = statements("while outer (1) break outer; endwhile");
        match &stmts[0] {
            Statement::While(s) => {
                assert_eq!(s.label.as_deref(), Some("outer"));
                assert_eq!(s.body.len(), 1);
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn parse_for_over_range() {
        let stmts = statements("for i in [1..10] x = i; endfor");
        match &stmts[0] {
            Statement::For(s) => {
                assert_eq!(s.variable, "i");
                assert!(matches!(s.iterable, Iterable::Range(_)));
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn parse_for_over_expression() {
        let stmts = statements("for item in (things) item; endfor");
        match &stmts[0] {
            Statement::For(s) => assert!(matches!(s.iterable, Iterable::Expression(_))),
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn parse_try_except_finally() {
        let stmts = statements(
            "try x; except e (E_PERM, E_TYPE) y; except (ANY) z; finally w; endtry",
        );
        match &stmts[0] {
            Statement::Try(s) => {
                assert_eq!(s.handlers.len(), 2);
                assert_eq!(s.handlers[0].variable.as_deref(), Some("e"));
                assert_eq!(
                    s.handlers[0].codes,
                    ErrorCodeSpec::Codes(vec!["E_PERM".into(), "E_TYPE".into()])
                );
                assert_eq!(s.handlers[1].codes, ErrorCodeSpec::Any);
                assert!(s.finally.is_some());
            }
            other => panic!("expected try, got {:?}", other),
        }
    }

    #[test]
    fn parse_fork_statement() {
        let stmts = statements("fork (5) obj:poll(); endfork");
        assert!(matches!(stmts[0], Statement::Fork(_)));
    }

    #[test]
    fn parse_let_with_pattern() {
        let stmts = statements("let {a, ?b = 1, @rest} = args;");
        match &stmts[0] {
            Statement::Let(s) => match &s.target {
                BindingTarget::Pattern(p) => {
                    assert_eq!(p.elements.len(), 3);
                    assert!(matches!(p.elements[1], BindingElement::Optional { .. }));
                    assert!(matches!(p.elements[2], BindingElement::Rest(_)));
                }
                other => panic!("expected pattern, got {:?}", other),
            },
            other => panic!("expected let, got {:?}", other),
        }
    }

    #[test]
    fn parse_function_statement_vs_expression() {
        let stmts = statements("fn double(x) return x * 2; endfn");
        assert!(matches!(stmts[0], Statement::Function(_)));

        let expr = single_expression("fn (x) return x; endfn;");
        assert!(matches!(expr, Expression::Function(_)));
    }

    #[test]
    fn precedence_mul_over_add() {
        match single_expression("1 + 2 * 3;") {
            Expression::Binary(op) => {
                assert_eq!(op.operator, "+");
                match op.right {
                    Expression::Binary(inner) => assert_eq!(inner.operator, "*"),
                    other => panic!("expected nested binary, got {:?}", other),
                }
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn exponentiation_is_right_associative() {
        match single_expression("2 ^ 3 ^ 2;") {
            Expression::Binary(op) => {
                assert_eq!(op.operator, "^");
                assert!(matches!(op.left, Expression::Integer(_)));
                assert!(matches!(op.right, Expression::Binary(_)));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        match single_expression("a = b = 1;") {
            Expression::Assignment(outer) => match outer.value {
                Expression::Assignment(_) => {}
                other => panic!("expected nested assignment, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn in_is_a_binary_operator() {
        match single_expression("x in {1, 2};") {
            Expression::Binary(op) => assert_eq!(op.operator, "in"),
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn conditional_expression() {
        match single_expression("x ? 1 | 2;") {
            Expression::Conditional(c) => {
                assert!(matches!(c.consequence, Expression::Integer(_)));
                assert!(matches!(c.alternative, Expression::Integer(_)));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn lambda_vs_list_vs_scatter() {
        assert!(matches!(
            single_expression("{x, y} => x + y;"),
            Expression::Lambda(_)
        ));
        assert!(matches!(
            single_expression("{1, 2, @more};"),
            Expression::List(_)
        ));
        match single_expression("{a, @rest} = args;") {
            Expression::Assignment(assign) => {
                assert!(matches!(assign.target, BindingTarget::Pattern(_)));
            }
            other => panic!("expected scatter assignment, got {:?}", other),
        }
    }

    #[test]
    fn range_comprehension() {
        match single_expression("{x * 2 for x in [1..5]};") {
            Expression::Comprehension(c) => {
                assert_eq!(c.variable, "x");
                assert!(matches!(c.iterable, Iterable::Range(_)));
            }
            other => panic!("expected comprehension, got {:?}", other),
        }
    }

    #[test]
    fn optional_binding_outside_pattern_is_rejected() {
        let err = parse("{?x = 1, 2};").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPattern { .. }));
    }

    #[test]
    fn map_literal_and_empty_map() {
        match single_expression("[\"a\" -> 1, \"b\" -> 2];") {
            Expression::Map(m) => assert_eq!(m.entries.len(), 2),
            other => panic!("expected map, got {:?}", other),
        }
        match single_expression("[];") {
            Expression::Map(m) => assert!(m.entries.is_empty()),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn index_slice_and_range_end() {
        assert!(matches!(
            single_expression("items[1];"),
            Expression::Index(_)
        ));
        match single_expression("items[2..$];") {
            Expression::Slice(s) => assert!(matches!(s.end, Expression::RangeEnd(_))),
            other => panic!("expected slice, got {:?}", other),
        }
    }

    #[test]
    fn property_method_and_call_chain() {
        match single_expression("player.location:announce(\"hi\", @rest);") {
            Expression::MethodCall(call) => {
                assert!(matches!(call.object, Expression::Property(_)));
                assert_eq!(call.arguments.len(), 2);
                assert!(matches!(call.arguments[1], Arg::Splat(_)));
            }
            other => panic!("expected method call, got {:?}", other),
        }
    }

    #[test]
    fn computed_property_access() {
        match single_expression("obj.(name);") {
            Expression::Property(p) => assert!(matches!(p.property, AccessName::Expr(_))),
            other => panic!("expected property access, got {:?}", other),
        }
    }

    #[test]
    fn call_on_parenthesized_expression() {
        match single_expression("(handlers[1])(arg);") {
            Expression::Call(call) => assert!(matches!(call.function, Callee::Expr(_))),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn system_property_vs_range_end() {
        assert!(matches!(
            single_expression("$room;"),
            Expression::SystemProperty(_)
        ));
        match single_expression("x[$];") {
            Expression::Index(idx) => assert!(matches!(idx.index, Expression::RangeEnd(_))),
            other => panic!("expected index, got {:?}", other),
        }
    }

    #[test]
    fn flyweight_literal() {
        match single_expression("<$thing, [\"name\" -> \"rock\"], {1, 2}>;") {
            Expression::Flyweight(f) => {
                assert!(f.properties.is_some());
                assert!(f.values.is_some());
            }
            other => panic!("expected flyweight, got {:?}", other),
        }
        assert!(matches!(
            single_expression("a < b;"),
            Expression::Binary(_)
        ));
    }

    #[test]
    fn try_expression_with_fallback() {
        match single_expression("`x.name ! E_PROPNF => \"unknown\"';") {
            Expression::TryExpr(t) => {
                assert_eq!(t.codes, ErrorCodeSpec::Codes(vec!["E_PROPNF".into()]));
                assert!(t.fallback.is_some());
            }
            other => panic!("expected try expression, got {:?}", other),
        }
    }

    #[test]
    fn symbols_and_object_ids() {
        assert!(matches!(
            single_expression("'connected;"),
            Expression::Symbol(_)
        ));
        match single_expression("#-1;") {
            Expression::ObjectId(obj) => assert_eq!(obj.id, ObjRef::Number(-1)),
            other => panic!("expected object id, got {:?}", other),
        }
        match single_expression("#system;") {
            Expression::ObjectId(obj) => assert_eq!(obj.id, ObjRef::Name("system".into())),
            other => panic!("expected object id, got {:?}", other),
        }
    }

    #[test]
    fn pass_and_return() {
        assert!(matches!(
            single_expression("pass(@args);"),
            Expression::Pass(_)
        ));
        match single_expression("return;") {
            Expression::Return(r) => assert!(r.value.is_none()),
            other => panic!("expected return, got {:?}", other),
        }
    }

    #[test]
    fn integer_out_of_range() {
        let err = parse("99999999999999999999;").unwrap_err();
        assert!(matches!(err, ParseError::IntegerOutOfRange { .. }));
    }

    #[test]
    fn assignment_target_must_be_bindable() {
        let err = parse("x.y = 1;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPattern { .. }));
    }

    #[test]
    fn missing_endif_reports_eof() {
        let err = parse("if (x) a;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn parse_object_definition_members() {
        let program = parse(
            r#"object rock
  name: "a rock"
  property weight (owner: #1) = 10;
  verb "l*ook" (this none none)
    dobj: "this"
    return this.name;
  endverb
endobject"#,
        )
        .unwrap();
        match program.body {
            ProgramBody::Object(def) => {
                assert_eq!(def.name, "rock");
                assert_eq!(def.members.len(), 3);
                match &def.members[2] {
                    ObjectMember::Verb(verb) => {
                        assert_eq!(verb.name, VerbName::Str("l*ook".into()));
                        assert_eq!(verb.dobj, "this");
                        assert_eq!(verb.attributes.len(), 1);
                        assert_eq!(verb.body.len(), 1);
                    }
                    other => panic!("expected verb, got {:?}", other),
                }
            }
            ProgramBody::Statements(_) => panic!("expected object definition"),
        }
    }

    #[test]
    fn objdef_endobject_is_optional() {
        let program = parse("object empty_thing\n  name: \"empty\"").unwrap();
        assert!(matches!(program.body, ProgramBody::Object(_)));
    }

    #[test]
    fn statements_without_semicolons() {
        let stmts = statements("x = 1\ny = 2\n");
        assert_eq!(stmts.len(), 2);
    }
}
