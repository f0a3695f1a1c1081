pub mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

use crate::lexer::{Literal, Location, Span, SpanLength, Token, TokenKind};
use crate::stack::ensure_sufficient_stack;
pub use error::{ParserError, ParserErrorKind};
use expression::{
    BinaryOperator, Expression, Ident, LiteralValue, LogicalOperator, UnaryOperator,
};
use statement::Statement;

/// Statements that parsed, alongside every error recorded while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub statements: Vec<Statement>,
    pub errors: Vec<ParserError>,
}

/// Parses a finished token sequence into its top-level statements along with
/// every error encountered on the way.
pub fn parse(source: &str, tokens: &[Token]) -> (Vec<Statement>, Vec<ParserError>) {
    let ParseOutput { statements, errors } = Parser::new(source, tokens).parse();
    (statements, errors)
}

type ParseResult<T> = Result<T, ParserError>;

pub struct Parser<'src, 'tok> {
    source: &'src str,
    tokens: &'tok [Token],
    current: usize,
    /// Stands in for a missing trailing `Eof` so lookahead never runs dry.
    eof: Token,
    errors: Vec<ParserError>,
}

impl<'src, 'tok> Parser<'src, 'tok> {
    pub fn new(source: &'src str, tokens: &'tok [Token]) -> Self {
        let end = tokens
            .last()
            .map(|t| t.span.end())
            .unwrap_or_else(|| source.len().into());
        let (line, column) = tokens
            .last()
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1));
        let eof = Token {
            kind: TokenKind::Eof,
            span: Span {
                start: end,
                length: SpanLength::new(0),
            },
            line,
            column,
            literal: None,
        };
        Self {
            source,
            tokens,
            current: 0,
            eof,
            errors: Vec::new(),
        }
    }

    /// Errors recorded so far that did not abort a rule, such as invalid
    /// assignment targets.
    pub fn take_errors(&mut self) -> Vec<ParserError> {
        std::mem::take(&mut self.errors)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn eat_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes a token of the given kind. The offending token is left in
    /// place on failure.
    fn expect(&mut self, expected: TokenKind) -> ParseResult<Token> {
        let token = self.peek();
        if token.kind != expected {
            Err(ParserError {
                kind: ParserErrorKind::UnexpectedToken {
                    actual: token.kind,
                    expected,
                },
                location: token.location(),
            })
        } else {
            Ok(self.advance())
        }
    }

    fn make_ident(&self, token: &Token) -> Ident {
        Ident {
            name: token.lexeme(self.source).unwrap_or_default().into(),
            location: token.location(),
        }
    }

    fn error_at(location: Location, kind: ParserErrorKind) -> ParserError {
        ParserError { kind, location }
    }
}

// Parse program/statements
impl<'src, 'tok> Parser<'src, 'tok> {
    pub fn parse(mut self) -> ParseOutput {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(statement) = self.parse_declaration_with_recovery() {
                statements.push(statement);
            }
        }
        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        ParseOutput {
            statements,
            errors: self.errors,
        }
    }

    fn parse_declaration_with_recovery(&mut self) -> Option<Statement> {
        let before = self.current;
        match self.parse_declaration() {
            Ok(statement) => Some(statement),
            Err(error) => {
                self.errors.push(error);
                self.synchronize();
                // A stray closing brace at top level is never consumed by a rule.
                if self.current == before && !self.is_at_end() {
                    self.advance();
                }
                None
            }
        }
    }

    /// Skips to the next statement boundary: just past a `;`, or right before
    /// a `}`, a statement keyword or the end of input.
    fn synchronize(&mut self) {
        let from = self.current;
        loop {
            match self.peek().kind {
                TokenKind::Eof
                | TokenKind::RightBrace
                | TokenKind::KeywordVar
                | TokenKind::KeywordFor
                | TokenKind::KeywordIf
                | TokenKind::KeywordWhile
                | TokenKind::KeywordPrint => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        tracing::trace!(skipped = self.current - from, "synchronized after parse error");
    }

    fn parse_declaration(&mut self) -> ParseResult<Statement> {
        if self.eat_if(TokenKind::KeywordVar).is_some() {
            self.parse_variable_decl()
        } else {
            self.parse_statement()
        }
    }

    fn parse_variable_decl(&mut self) -> ParseResult<Statement> {
        let token = self.peek();
        if token.kind != TokenKind::Ident {
            return Err(Self::error_at(
                token.location(),
                ParserErrorKind::NonIdentifier(token.kind),
            ));
        }
        let token = self.advance();
        let name = self.make_ident(&token);

        let initial = match self.eat_if(TokenKind::Equal) {
            Some(_) => Some(self.parse_expression()?),
            None => None,
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::VariableDecl { name, initial })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        ensure_sufficient_stack(|| -> ParseResult<Statement> {
            match self.peek().kind {
                TokenKind::KeywordPrint => {
                    self.advance();
                    let expr = self.parse_expression()?;
                    self.expect(TokenKind::Semicolon)?;
                    Ok(Statement::Print(expr))
                }
                TokenKind::KeywordIf => {
                    self.advance();
                    self.parse_if_statement()
                }
                TokenKind::KeywordWhile => {
                    self.advance();
                    self.parse_while_statement()
                }
                TokenKind::KeywordFor => {
                    self.advance();
                    self.parse_for_statement()
                }
                TokenKind::LeftBrace => {
                    self.advance();
                    Ok(Statement::Block(self.parse_block()?))
                }
                _ => {
                    let expr = self.parse_expression()?;
                    self.expect(TokenKind::Semicolon)?;
                    Ok(Statement::Expression(expr))
                }
            }
        })
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(statement) = self.parse_declaration_with_recovery() {
                statements.push(statement);
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(statements)
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::LeftParenthesis)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParenthesis)?;
        let success = Box::new(self.parse_statement()?);
        let failure = match self.eat_if(TokenKind::KeywordElse) {
            Some(_) => Some(Box::new(self.parse_statement()?)),
            None => None,
        };
        Ok(Statement::If {
            condition,
            success,
            failure,
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::LeftParenthesis)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParenthesis)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While { condition, body })
    }

    /// Lowers `for (init; cond; incr) body` into
    /// `{ init; while (cond) { body; incr; } }`.
    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::LeftParenthesis)?;

        let initializer = match self.eat_if(TokenKind::Semicolon) {
            Some(_) => None,
            None => Some(self.parse_declaration()?),
        };

        let condition = if !self.check(TokenKind::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        let increment = if !self.check(TokenKind::RightParenthesis) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::RightParenthesis)?;

        let mut body = self.parse_statement()?;
        if let Some(increment) = increment {
            body = Statement::Block(vec![body, Statement::Expression(increment)]);
        }

        let condition = condition.unwrap_or(Expression::Literal(LiteralValue::Bool(true)));
        let mut statements = Vec::with_capacity(2);
        if let Some(initializer) = initializer {
            statements.push(initializer);
        }
        statements.push(Statement::While {
            condition,
            body: Box::new(body),
        });
        Ok(Statement::Block(statements))
    }
}

// Recursive descent for expressions, lowest precedence first.
impl<'src, 'tok> Parser<'src, 'tok> {
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let expr = self.parse_ternary()?;

        if let Some(equals) = self.eat_if(TokenKind::Equal) {
            let value = self.parse_expression()?;
            return match expr {
                Expression::Variable(name) => Ok(Expression::Assign {
                    name,
                    value: Box::new(value),
                }),
                expr => {
                    // Recorded but not fatal: the target stands as the result.
                    self.errors.push(Self::error_at(
                        equals.location(),
                        ParserErrorKind::InvalidAssignmentTarget,
                    ));
                    Ok(expr)
                }
            };
        }

        Ok(expr)
    }

    fn parse_ternary(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_or()?;

        while self.eat_if(TokenKind::QuestionMark).is_some() {
            let success = self.parse_expression()?;
            self.expect(TokenKind::Colon)?;
            let failure = self.parse_expression()?;
            expr = Expression::Ternary {
                condition: Box::new(expr),
                success: Box::new(success),
                failure: Box::new(failure),
            };
        }

        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_and()?;
        while let Some(token) = self.eat_if(TokenKind::KeywordOr) {
            let rhs = self.parse_and()?;
            lhs = Expression::Logical {
                operator: LogicalOperator::Or,
                location: token.location(),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_equality()?;
        while let Some(token) = self.eat_if(TokenKind::KeywordAnd) {
            let rhs = self.parse_equality()?;
            lhs = Expression::Logical {
                operator: LogicalOperator::And,
                location: token.location(),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> ParseResult<Expression> {
        self.parse_binary(
            Self::parse_comparison,
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
        )
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        self.parse_binary(
            Self::parse_term,
            &[
                TokenKind::GreaterThan,
                TokenKind::GreaterThanEqual,
                TokenKind::LessThan,
                TokenKind::LessThanEqual,
            ],
        )
    }

    fn parse_term(&mut self) -> ParseResult<Expression> {
        self.parse_binary(Self::parse_factor, &[TokenKind::Plus, TokenKind::Minus])
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        self.parse_binary(Self::parse_unary, &[TokenKind::Slash, TokenKind::Star])
    }

    /// One left-associative precedence level.
    fn parse_binary(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Expression>,
        operators: &[TokenKind],
    ) -> ParseResult<Expression> {
        let mut lhs = operand(self)?;

        loop {
            let kind = self.peek().kind;
            if !operators.contains(&kind) {
                break;
            }
            let Some(operator) = BinaryOperator::from_token(kind) else {
                break;
            };
            let token = self.advance();
            let rhs = operand(self)?;
            lhs = Expression::Binary {
                operator,
                location: token.location(),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        if let Some(operator) = UnaryOperator::from_token(self.peek().kind) {
            let token = self.advance();
            let rhs = ensure_sufficient_stack(|| self.parse_unary())?;
            return Ok(Expression::Unary {
                operator,
                location: token.location(),
                rhs: Box::new(rhs),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.peek().clone();
        let non_expression =
            || Self::error_at(token.location(), ParserErrorKind::NonExpression(token.kind));

        let expr = match token.kind {
            TokenKind::NumericLiteral => {
                let value = match token.literal {
                    Some(Literal::Number(v)) => v,
                    _ => token
                        .lexeme(self.source)
                        .and_then(|lexeme| lexeme.parse().ok())
                        .ok_or_else(non_expression)?,
                };
                Expression::Literal(LiteralValue::Number(value))
            }
            TokenKind::StringLiteral => {
                let value = match token.literal {
                    Some(Literal::String(ref v)) => v.clone(),
                    _ => token
                        .lexeme(self.source)
                        .and_then(|lexeme| lexeme.get(1..lexeme.len().saturating_sub(1)))
                        .ok_or_else(non_expression)?
                        .into(),
                };
                Expression::Literal(LiteralValue::String(value))
            }
            TokenKind::KeywordTrue => Expression::Literal(LiteralValue::Bool(true)),
            TokenKind::KeywordFalse => Expression::Literal(LiteralValue::Bool(false)),
            TokenKind::KeywordNil => Expression::Literal(LiteralValue::Nil),
            TokenKind::Ident => Expression::Variable(self.make_ident(&token)),
            TokenKind::LeftParenthesis => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParenthesis)?;
                return Ok(Expression::Grouping(Box::new(inner)));
            }
            _ => return Err(non_expression()),
        };
        self.advance();
        Ok(expr)
    }
}
