//! Recursive-descent parser with a precedence-climbing binary-expression
//! core (`spec.md` §4.2).

use crate::ast::*;
use nanoc_lex::{LexError, Lexer, Token, TokenKind};
use nanoc_util::{LineCol, Span, Symbol};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parser Error at {pos}: expected {expected}, found '{found}'")]
    UnexpectedToken { pos: LineCol, expected: String, found: String },
    #[error(transparent)]
    Lex(#[from] LexError),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Binding powers for the precedence-climbing binary-expression parser,
/// the literal table from `spec.md` §4.2.
mod prec {
    pub const ASSIGN: u8 = 1;
    pub const OR: u8 = 5;
    pub const AND: u8 = 10;
    pub const EQUALITY: u8 = 30;
    pub const RELATIONAL: u8 = 35;
    pub const ADDITIVE: u8 = 45;
    pub const MULTIPLICATIVE: u8 = 50;
}

/// Whether an operator associates leftward (`right_bp = left_bp + 1`) or
/// rightward (`right_bp = left_bp`), per `spec.md` §4.2.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

fn binop_info(kind: TokenKind) -> Option<(u8, Assoc, BinOrAssign)> {
    use TokenKind::*;
    Some(match kind {
        Equal => (prec::ASSIGN, Assoc::Right, BinOrAssign::Assign),
        PipePipe => (prec::OR, Assoc::Left, BinOrAssign::Bin(BinaryOp::Or)),
        AmpAmp => (prec::AND, Assoc::Left, BinOrAssign::Bin(BinaryOp::And)),
        EqualEqual => (prec::EQUALITY, Assoc::Left, BinOrAssign::Bin(BinaryOp::Eq)),
        BangEqual => (prec::EQUALITY, Assoc::Left, BinOrAssign::Bin(BinaryOp::Ne)),
        Less => (prec::RELATIONAL, Assoc::Left, BinOrAssign::Bin(BinaryOp::Lt)),
        LessEqual => (prec::RELATIONAL, Assoc::Left, BinOrAssign::Bin(BinaryOp::Le)),
        Greater => (prec::RELATIONAL, Assoc::Left, BinOrAssign::Bin(BinaryOp::Gt)),
        GreaterEqual => (prec::RELATIONAL, Assoc::Left, BinOrAssign::Bin(BinaryOp::Ge)),
        Plus => (prec::ADDITIVE, Assoc::Left, BinOrAssign::Bin(BinaryOp::Add)),
        Minus => (prec::ADDITIVE, Assoc::Left, BinOrAssign::Bin(BinaryOp::Sub)),
        Star => (prec::MULTIPLICATIVE, Assoc::Left, BinOrAssign::Bin(BinaryOp::Mul)),
        Slash => (prec::MULTIPLICATIVE, Assoc::Left, BinOrAssign::Bin(BinaryOp::Div)),
        Percent => (prec::MULTIPLICATIVE, Assoc::Left, BinOrAssign::Bin(BinaryOp::Rem)),
        _ => return None,
    })
}

enum BinOrAssign {
    Assign,
    Bin(BinaryOp),
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn advance(&mut self) -> ParseResult<Token<'a>> {
        let tok = self.current;
        self.current = self.lexer.next_token()?;
        Ok(tok)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token<'a>> {
        if self.current.kind == kind {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = if self.current.kind == TokenKind::Eof {
            "<eof>".to_string()
        } else {
            self.current.lexeme.to_string()
        };
        ParseError::UnexpectedToken {
            pos: LineCol::from(self.current.span),
            expected: expected.to_string(),
            found,
        }
    }

    fn expect_ident(&mut self) -> ParseResult<(Symbol, Span)> {
        match self.current.kind {
            TokenKind::Ident(sym) => {
                let span = self.current.span;
                self.advance()?;
                Ok((sym, span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    // ---- program ----

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let function = self.parse_function()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected("<eof>"));
        }
        Ok(Program { function })
    }

    fn parse_function(&mut self) -> ParseResult<Function> {
        let start = self.current.span;
        self.expect(TokenKind::KwInt, "'int'")?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LParen, "'('")?;
        self.expect(TokenKind::KwVoid, "'void'")?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        while self.current.kind != TokenKind::RBrace {
            body.push(self.parse_block_item()?);
        }
        let end = self.current.span;
        self.advance()?; // '}'
        Ok(Function { name, body, span: start.to(end) })
    }

    fn parse_block_item(&mut self) -> ParseResult<BlockItem> {
        if self.current.kind == TokenKind::KwInt {
            Ok(BlockItem::Decl(self.parse_declaration()?))
        } else {
            Ok(BlockItem::Stmt(self.parse_statement()?))
        }
    }

    fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        let start = self.current.span;
        self.expect(TokenKind::KwInt, "'int'")?;
        let (name, _) = self.expect_ident()?;
        let init = if self.current.kind == TokenKind::Equal {
            self.advance()?;
            Some(self.parse_expression()?)
        } else {
            None
        };
        let end = self.current.span;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Declaration { name, init, span: start.to(end) })
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current.kind {
            TokenKind::KwReturn => {
                self.advance()?;
                let e = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Statement::Return(e))
            }
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Statement::Null)
            }
            TokenKind::LBrace => {
                self.advance()?;
                let mut items = Vec::new();
                while self.current.kind != TokenKind::RBrace {
                    items.push(self.parse_block_item()?);
                }
                self.advance()?; // '}'
                Ok(Statement::Compound(items))
            }
            TokenKind::KwIf => {
                self.advance()?;
                self.expect(TokenKind::LParen, "'('")?;
                let cond = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                let then_branch = Box::new(self.parse_statement()?);
                let else_branch = if self.current.kind == TokenKind::KwElse {
                    self.advance()?;
                    Some(Box::new(self.parse_statement()?))
                } else {
                    None
                };
                Ok(Statement::If { cond, then_branch, else_branch })
            }
            TokenKind::KwWhile => {
                self.advance()?;
                self.expect(TokenKind::LParen, "'('")?;
                let cond = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                let body = Box::new(self.parse_statement()?);
                Ok(Statement::While { cond, body })
            }
            TokenKind::KwDo => {
                self.advance()?;
                let body = Box::new(self.parse_statement()?);
                self.expect(TokenKind::KwWhile, "'while'")?;
                self.expect(TokenKind::LParen, "'('")?;
                let cond = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Statement::DoWhile { body, cond })
            }
            TokenKind::KwFor => {
                self.advance()?;
                self.expect(TokenKind::LParen, "'('")?;
                let init = self.parse_for_init()?;
                let cond = if self.current.kind != TokenKind::Semicolon {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                self.expect(TokenKind::Semicolon, "';'")?;
                let post = if self.current.kind != TokenKind::RParen {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                self.expect(TokenKind::RParen, "')'")?;
                let body = Box::new(self.parse_statement()?);
                Ok(Statement::For { init, cond, post, body })
            }
            TokenKind::KwBreak => {
                let span = self.current.span;
                self.advance()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Statement::Break(span))
            }
            TokenKind::KwContinue => {
                let span = self.current.span;
                self.advance()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Statement::Continue(span))
            }
            _ => {
                let e = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Statement::Expr(e))
            }
        }
    }

    fn parse_for_init(&mut self) -> ParseResult<Option<ForInit>> {
        match self.current.kind {
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(None)
            }
            TokenKind::KwInt => Ok(Some(ForInit::Decl(self.parse_declaration()?))),
            _ => {
                let e = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Some(ForInit::Expr(e)))
            }
        }
    }

    // ---- expressions ----

    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> ParseResult<Expression> {
        let cond = self.parse_binary(prec::ASSIGN)?;
        if self.current.kind == TokenKind::Question {
            self.advance()?;
            let then_expr = self.parse_expression()?;
            self.expect(TokenKind::Colon, "':'")?;
            let else_expr = self.parse_expression()?;
            let span = cond.span.to(else_expr.span);
            Ok(Expression::new(
                ExprKind::Conditional(Box::new(cond), Box::new(then_expr), Box::new(else_expr)),
                span,
            ))
        } else {
            Ok(cond)
        }
    }

    /// Precedence climbing over the table in `spec.md` §4.2, including `=`
    /// as the lowest-precedence, right-associative operator.
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;

        while let Some((prec, assoc, op)) = binop_info(self.current.kind) {
            if prec < min_prec {
                break;
            }
            self.advance()?;
            let next_min = match assoc {
                Assoc::Left => prec + 1,
                Assoc::Right => prec,
            };
            let right = self.parse_binary(next_min)?;
            let span = left.span.to(right.span);
            left = match op {
                BinOrAssign::Assign => {
                    Expression::new(ExprKind::Assign(Box::new(left), Box::new(right)), span)
                }
                BinOrAssign::Bin(op) => {
                    Expression::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), span)
                }
            };
        }

        Ok(left)
    }

    /// Unary operators bind tighter than any binary operator; this is the
    /// "factor" level of `spec.md` §4.2.
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let start = self.current.span;
        let op = match self.current.kind {
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::Tilde => Some(UnaryOp::Complement),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance()?;
            let operand = self.parse_unary()?;
            let span = start.to(operand.span);
            return Ok(Expression::new(ExprKind::Unary(op, Box::new(operand)), span));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let span = self.current.span;
        match self.current.kind {
            TokenKind::IntConst(v) => {
                self.advance()?;
                Ok(Expression::new(ExprKind::Constant(v), span))
            }
            TokenKind::Ident(sym) => {
                self.advance()?;
                Ok(Expression::new(ExprKind::Variable(sym), span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}

pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source)?.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(src: &str) -> Expression {
        let wrapped = format!("int main(void) {{ return {src}; }}");
        let program = parse(&wrapped).unwrap();
        match program.function.body.into_iter().next().unwrap() {
            BlockItem::Stmt(Statement::Return(e)) => e,
            other => panic!("expected a return statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_minimal_function() {
        let program = parse("int main(void) { return 2; }").unwrap();
        assert_eq!(program.function.name, Symbol::intern("main"));
        assert_eq!(program.function.body.len(), 1);
    }

    #[test]
    fn additive_is_left_associative() {
        let e = parse_expr("1 - 2 - 3");
        match e.kind {
            ExprKind::Binary(BinaryOp::Sub, lhs, rhs) => {
                assert!(matches!(rhs.kind, ExprKind::Constant(3)));
                assert!(matches!(lhs.kind, ExprKind::Binary(BinaryOp::Sub, _, _)));
            }
            other => panic!("expected nested subtraction, got {other:?}"),
        }
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let e = parse_expr("1 + 2 * 3");
        match e.kind {
            ExprKind::Binary(BinaryOp::Add, lhs, rhs) => {
                assert!(matches!(lhs.kind, ExprKind::Constant(1)));
                assert!(matches!(rhs.kind, ExprKind::Binary(BinaryOp::Mul, _, _)));
            }
            other => panic!("expected addition at the top, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let e = parse_expr("a = b = 3");
        match e.kind {
            ExprKind::Assign(lhs, rhs) => {
                assert!(matches!(lhs.kind, ExprKind::Variable(_)));
                assert!(matches!(rhs.kind, ExprKind::Assign(_, _)));
            }
            other => panic!("expected nested assignment, got {other:?}"),
        }
    }

    #[test]
    fn logical_or_binds_looser_than_logical_and() {
        let e = parse_expr("1 || 2 && 3");
        match e.kind {
            ExprKind::Binary(BinaryOp::Or, lhs, rhs) => {
                assert!(matches!(lhs.kind, ExprKind::Constant(1)));
                assert!(matches!(rhs.kind, ExprKind::Binary(BinaryOp::And, _, _)));
            }
            other => panic!("expected logical-or at the top, got {other:?}"),
        }
    }

    #[test]
    fn conditional_branches_parse_full_expressions() {
        let e = parse_expr("a ? b = 1 : c = 2");
        assert!(matches!(e.kind, ExprKind::Conditional(_, _, _)));
    }

    #[test]
    fn unary_operators_nest_right_to_left() {
        let e = parse_expr("-~!1");
        match e.kind {
            ExprKind::Unary(UnaryOp::Negate, inner) => match inner.kind {
                ExprKind::Unary(UnaryOp::Complement, inner2) => {
                    assert!(matches!(inner2.kind, ExprKind::Unary(UnaryOp::Not, _)));
                }
                other => panic!("expected complement, got {other:?}"),
            },
            other => panic!("expected negation at the top, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_expression_overrides_precedence() {
        let e = parse_expr("(1 + 2) * 3");
        match e.kind {
            ExprKind::Binary(BinaryOp::Mul, lhs, _) => {
                assert!(matches!(lhs.kind, ExprKind::Binary(BinaryOp::Add, _, _)));
            }
            other => panic!("expected multiplication at the top, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_with_declaration_init_parses() {
        let src = "int main(void) { for (int i = 0; i < 10; i = i + 1) continue; }";
        let program = parse(src).unwrap();
        match &program.function.body[0] {
            BlockItem::Stmt(Statement::For { init: Some(ForInit::Decl(_)), .. }) => {}
            other => panic!("expected a for-loop with a declaration init, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_with_empty_clauses_parses() {
        let src = "int main(void) { for (;;) break; }";
        let program = parse(src).unwrap();
        match &program.function.body[0] {
            BlockItem::Stmt(Statement::For { init: None, cond: None, post: None, .. }) => {}
            other => panic!("expected a fully-empty for-loop, got {other:?}"),
        }
    }

    #[test]
    fn if_else_attaches_else_to_nearest_if() {
        let src = "int main(void) { if (1) if (0) return 1; else return 2; }";
        let program = parse(src).unwrap();
        match &program.function.body[0] {
            BlockItem::Stmt(Statement::If { then_branch, .. }) => {
                assert!(matches!(**then_branch, Statement::If { else_branch: Some(_), .. }));
            }
            other => panic!("expected an if statement, got {other:?}"),
        }
    }

    #[test]
    fn missing_semicolon_is_a_parse_error() {
        let err = parse("int main(void) { return 2 }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn missing_function_body_is_a_parse_error() {
        assert!(parse("int main(void)").is_err());
    }
}
