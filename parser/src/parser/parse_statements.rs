use super::Parser;
use crate::ast::{CatchClause, Spanned, Stmt, StmtId};
use crate::parse_err::ParseErr;
use lexer::Token;

impl<'a, 'c> Parser<'a, 'c> {
    /// `stmt := block | if-else | for-each | return | print | try-catch |
    /// expr ';' | ';'` (spec §3 "Statement").
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseErr> {
        let span = self.span_here();

        if self.check(Token::LeftCurlyBracket)? {
            return self.parse_block();
        }
        if self.eat(Token::If)? {
            self.expect(Token::LeftParenthesis, "'('")?;
            let cond = self.parse_expression()?;
            self.expect(Token::RightParenthesis, "')'")?;
            let then_branch = self.parse_statement()?;
            let else_branch = if self.eat(Token::Else)? { Some(self.parse_statement()?) } else { None };
            return Ok(self
                .module
                .alloc_stmt(Spanned::new(span, Stmt::IfElse { cond, then_branch, else_branch })));
        }
        if self.eat(Token::For)? {
            self.expect(Token::LeftParenthesis, "'('")?;
            let loop_var = self.parse_identifier()?;
            self.expect(Token::Colon, "':'")?;
            let collection = self.parse_expression()?;
            self.expect(Token::RightParenthesis, "')'")?;
            let scope = self.module.scopes.alloc(Some(self.current_scope()));
            let body = self.with_scope(scope, |p| p.parse_statement())?;
            return Ok(self
                .module
                .alloc_stmt(Spanned::new(span, Stmt::ForEach { loop_var, collection, scope, body })));
        }
        if self.eat(Token::Return)? {
            let value = if self.check(Token::Semicolon)? { None } else { Some(self.parse_expression()?) };
            self.expect(Token::Semicolon, "';'")?;
            return Ok(self.module.alloc_stmt(Spanned::new(span, Stmt::Return(value))));
        }
        if self.eat(Token::Print)? {
            let mut args = vec![self.parse_expression()?];
            while self.eat(Token::Comma)? {
                args.push(self.parse_expression()?);
            }
            self.expect(Token::Semicolon, "';'")?;
            return Ok(self.module.alloc_stmt(Spanned::new(span, Stmt::Print(args))));
        }
        if self.eat(Token::Try)? {
            let body = self.parse_statement()?;
            let mut catches = Vec::new();
            while self.eat(Token::Catch)? {
                let (exception_type, id) = if self.eat(Token::LeftParenthesis)? {
                    let ty = self.parse_type()?;
                    let id = if self.check(Token::Identifier)? { Some(self.parse_identifier()?) } else { None };
                    self.expect(Token::RightParenthesis, "')'")?;
                    (Some(ty), id)
                } else {
                    (None, None)
                };
                let catch_body = self.parse_statement()?;
                catches.push(CatchClause { exception_type, id, body: catch_body });
            }
            return Ok(self.module.alloc_stmt(Spanned::new(span, Stmt::TryCatch { body, catches })));
        }
        if self.eat(Token::Semicolon)? {
            return Ok(self.module.alloc_stmt(Spanned::new(span, Stmt::NoOp)));
        }

        let expr = self.parse_expression()?;
        self.expect(Token::Semicolon, "';'")?;
        Ok(self.module.alloc_stmt(Spanned::new(span, Stmt::Expression(expr))))
    }

    pub(crate) fn parse_block(&mut self) -> Result<StmtId, ParseErr> {
        let span = self.span_here();
        self.expect(Token::LeftCurlyBracket, "'{'")?;
        let scope = self.module.scopes.alloc(Some(self.current_scope()));
        let stmts = self.with_scope(scope, |p| {
            let mut stmts = Vec::new();
            while !p.check(Token::RightCurlyBracket)? {
                stmts.push(p.parse_statement()?);
            }
            Ok(stmts)
        })?;
        self.expect(Token::RightCurlyBracket, "'}'")?;
        Ok(self.module.alloc_stmt(Spanned::new(span, Stmt::Block { scope, stmts })))
    }
}
