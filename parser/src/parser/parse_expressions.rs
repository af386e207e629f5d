use super::Parser;
use crate::ast::{CtorKind, Expr, ExprId, IdRef, Literal, ParserStateKind, Spanned};
use crate::parse_err::ParseErr;
use lexer::Token;
use operators::{OperatorKind, Type};

/// Binary operator token -> registry kind (spec §6 "Operators").
fn binary_kind(tok: Token) -> Option<OperatorKind> {
    Some(match tok {
        Token::Add => OperatorKind::Plus,
        Token::Neg => OperatorKind::Minus,
        Token::Mul => OperatorKind::Mult,
        Token::Div => OperatorKind::Div,
        Token::Mod => OperatorKind::Mod,
        Token::LogicalAnd => OperatorKind::LogicalAnd,
        Token::LogicalOr => OperatorKind::LogicalOr,
        Token::Equal => OperatorKind::Equal,
        Token::NotEqual => OperatorKind::NotEqual,
        Token::LessThan => OperatorKind::Lower,
        Token::LessThanOrEq => OperatorKind::LowerEqual,
        Token::GreaterThan => OperatorKind::Greater,
        Token::GreaterThanOrEq => OperatorKind::GreaterEqual,
        _ => return None,
    })
}

fn unescape(lexeme: &str) -> String {
    let mut out = String::with_capacity(lexeme.len());
    let mut chars = lexeme.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl<'a, 'c> Parser<'a, 'c> {
    /// Entry point for any expression context (spec §3 "Expression"). Every
    /// operator occurrence is emitted as `UnresolvedOperator`; the operator
    /// resolver (spec §4.5) replaces it once operand types are known.
    pub(crate) fn parse_expression(&mut self) -> Result<ExprId, ParseErr> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_prec: usize) -> Result<ExprId, ParseErr> {
        let mut lhs = self.parse_unary()?;

        loop {
            let tok = self.peek()?;
            let Some(kind) = binary_kind(tok.get_token()) else { break };
            let prec = tok.get_token().precedence();
            if prec < min_prec {
                break;
            }
            let span = crate::parser::to_span(&tok);
            self.advance()?;
            let rhs = self.parse_binary(prec + 1)?;
            let merged = self.module.expr(lhs).span.to(self.module.expr(rhs).span);
            lhs = self.module.alloc_expr(Spanned::new(
                merged.to(span),
                Expr::UnresolvedOperator { kind, operands: vec![lhs, rhs] },
            ));
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseErr> {
        let tok = self.peek()?;
        let kind = match tok.get_token() {
            Token::Neg => Some(OperatorKind::Negate),
            Token::LogicalNot => Some(OperatorKind::LogicalNot),
            _ => None,
        };
        if let Some(kind) = kind {
            let span = crate::parser::to_span(&tok);
            self.advance()?;
            let operand = self.parse_unary()?;
            let merged = span.to(self.module.expr(operand).span);
            return Ok(self
                .module
                .alloc_expr(Spanned::new(merged, Expr::UnresolvedOperator { kind, operands: vec![operand] })));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseErr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(Token::LeftParenthesis)? {
                let mut operands = vec![expr];
                if !self.check(Token::RightParenthesis)? {
                    operands.push(self.parse_expression()?);
                    while self.eat(Token::Comma)? {
                        operands.push(self.parse_expression()?);
                    }
                }
                let end = self.expect(Token::RightParenthesis, "')'")?;
                let span = self.module.expr(expr).span.to(crate::parser::to_span(&end));
                expr = self
                    .module
                    .alloc_expr(Spanned::new(span, Expr::UnresolvedOperator { kind: OperatorKind::Call, operands }));
            } else if self.eat(Token::LeftBracket)? {
                let index = self.parse_expression()?;
                let end = self.expect(Token::RightBracket, "']'")?;
                let span = self.module.expr(expr).span.to(crate::parser::to_span(&end));
                expr = self.module.alloc_expr(Spanned::new(
                    span,
                    Expr::UnresolvedOperator { kind: OperatorKind::Index, operands: vec![expr, index] },
                ));
            } else if self.eat(Token::Dot)? {
                let name_tok = self.expect(Token::Identifier, "a field name")?;
                let name = self.interner.intern(name_tok.get_lexeme());
                let name_span = crate::parser::to_span(&name_tok);
                let name_expr = self.module.alloc_expr(Spanned::new(name_span, Expr::Id(IdRef::Unresolved(vec![name]))));
                let span = self.module.expr(expr).span.to(name_span);
                expr = self.module.alloc_expr(Spanned::new(
                    span,
                    Expr::UnresolvedOperator { kind: OperatorKind::Attribute, operands: vec![expr, name_expr] },
                ));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseErr> {
        let tok = self.peek()?;
        let span = crate::parser::to_span(&tok);
        match tok.get_token() {
            Token::ConstantInt => {
                self.advance()?;
                let value: i64 = tok
                    .get_lexeme()
                    .parse()
                    .map_err(|_| ParseErr::expected("a valid integer literal", &tok, self.source_map))?;
                Ok(self.module.alloc_expr(Spanned::new(
                    crate::parser::to_span(&tok),
                    Expr::Constant(Literal::Integer(value, Type::Integer { width: 64, signed: true })),
                )))
            }
            Token::ConstantDouble => {
                self.advance()?;
                let value: f64 = tok
                    .get_lexeme()
                    .parse()
                    .map_err(|_| ParseErr::expected("a valid floating-point literal", &tok, self.source_map))?;
                Ok(self
                    .module
                    .alloc_expr(Spanned::new(crate::parser::to_span(&tok), Expr::Constant(Literal::Double(value)))))
            }
            Token::ConstantString => {
                self.advance()?;
                let raw = tok.get_lexeme();
                let inner = &raw[1..raw.len() - 1];
                let sym = self.interner.intern(&unescape(inner));
                Ok(self
                    .module
                    .alloc_expr(Spanned::new(crate::parser::to_span(&tok), Expr::Constant(Literal::Str(sym)))))
            }
            Token::ConstantBytes => {
                self.advance()?;
                let raw = tok.get_lexeme();
                let inner = &raw[2..raw.len() - 1];
                Ok(self.module.alloc_expr(Spanned::new(
                    crate::parser::to_span(&tok),
                    Expr::Constant(Literal::Bytes(unescape(inner).into_bytes())),
                )))
            }
            Token::ConstantRegExp => {
                self.advance()?;
                let raw = tok.get_lexeme();
                let inner = &raw[1..raw.len() - 1];
                let sym = self.interner.intern(inner);
                Ok(self.module.alloc_expr(Spanned::new(crate::parser::to_span(&tok), Expr::Ctor(CtorKind::RegExp(sym)))))
            }
            Token::SelfKw => {
                self.advance()?;
                Ok(self
                    .module
                    .alloc_expr(Spanned::new(crate::parser::to_span(&tok), Expr::ParserState(ParserStateKind::SelfUnit))))
            }
            Token::DollarDollar => {
                self.advance()?;
                Ok(self.module.alloc_expr(Spanned::new(
                    crate::parser::to_span(&tok),
                    Expr::ParserState(ParserStateKind::DollarDollar),
                )))
            }
            Token::LeftParenthesis => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(Token::RightParenthesis, "')'")?;
                Ok(inner)
            }
            Token::LeftBracket => {
                self.advance()?;
                let mut elements = Vec::new();
                if !self.check(Token::RightBracket)? {
                    elements.push(self.parse_expression()?);
                    while self.eat(Token::Comma)? {
                        elements.push(self.parse_expression()?);
                    }
                }
                let end = self.expect(Token::RightBracket, "']'")?;
                Ok(self
                    .module
                    .alloc_expr(Spanned::new(span.to(crate::parser::to_span(&end)), Expr::Ctor(CtorKind::List(elements)))))
            }
            Token::Identifier => {
                let path = self.parse_dotted_path()?;
                Ok(self.module.alloc_expr(Spanned::new(span, Expr::Id(IdRef::Unresolved(path)))))
            }
            _ => Err(ParseErr::expected("an expression", &tok, self.source_map)),
        }
    }
}
