use super::Parser;
use crate::ast::{Declaration, DeclKind, FunctionDef, Hook, Module, Spanned, TypeExpr};
use crate::parse_err::ParseErr;
use lexer::Token;
use operators::Type;
use shared_context::Identifier;

impl<'a, 'c> Parser<'a, 'c> {
    /// `module := 'module' ID ';' top-level-decl*` (spec §6).
    pub(crate) fn parse_module(mut self) -> Result<Module, ParseErr> {
        self.expect(Token::Module, "'module'")?;
        let name_tok = self.expect(Token::Identifier, "a module name")?;
        self.module.name = self.interner.intern(name_tok.get_lexeme());
        self.expect(Token::Semicolon, "';'")?;

        while !self.at_eof() {
            self.parse_top_level_decl()?;
        }

        Ok(self.module)
    }

    fn parse_top_level_decl(&mut self) -> Result<(), ParseErr> {
        if self.eat(Token::Import)? {
            let path = self.parse_dotted_path()?;
            self.expect(Token::Semicolon, "';'")?;
            if let Some(&last) = path.last() {
                self.module.imports.push(last);
            }
            return Ok(());
        }

        let exported = self.eat(Token::Export)?;
        if exported && self.check(Token::Identifier)? {
            let sym = self.intern_ident()?;
            self.expect(Token::Semicolon, "';'")?;
            self.module.exports.push(sym);
            return Ok(());
        }

        if self.eat(Token::Type)? {
            return self.parse_type_decl(exported);
        }
        if self.eat(Token::Const)? {
            return self.parse_const_decl(exported);
        }
        if self.eat(Token::Global)? {
            return self.parse_global_decl(exported);
        }
        if self.eat(Token::Function)? {
            return self.parse_function_decl(exported);
        }
        if self.eat(Token::On)? {
            return self.parse_global_hook(exported);
        }

        let tok = self.peek()?;
        Err(ParseErr::expected("a top-level declaration", &tok, self.source_map))
    }

    /// `'type' ID '=' type ';'`. When the right-hand side is a unit, the
    /// unit's own id is bound here so later hooks can address it by name
    /// (spec §4.3.4.d assigns `owning_unit`, which needs a named unit).
    fn parse_type_decl(&mut self, exported: bool) -> Result<(), ParseErr> {
        let span = self.span_here();
        let id = self.parse_identifier()?;
        self.expect(Token::Assign, "'='")?;
        let ty = self.parse_type()?;
        self.expect(Token::Semicolon, "';'")?;

        let unit_id = match &self.module.ty(ty).node {
            TypeExpr::Unit(unit_id) => Some(*unit_id),
            _ => None,
        };
        if let Some(unit_id) = unit_id {
            self.module.unit_mut(unit_id).id = Some(id);
        }

        let decl = self
            .module
            .alloc_decl(Declaration { id, scoped_path: None, kind: DeclKind::Type { ty }, exported, span });
        self.module.decls.push(decl);
        Ok(())
    }

    /// `'const' ID (':' type)? '=' expr ';'`.
    fn parse_const_decl(&mut self, exported: bool) -> Result<(), ParseErr> {
        let span = self.span_here();
        let id = self.parse_identifier()?;
        let ty = if self.eat(Token::Colon)? {
            self.parse_type()?
        } else {
            self.module.alloc_type(Spanned::new(span, TypeExpr::UnknownElementType))
        };
        self.expect(Token::Assign, "'='")?;
        let value = self.parse_expression()?;
        self.expect(Token::Semicolon, "';'")?;

        let decl = self
            .module
            .alloc_decl(Declaration { id, scoped_path: None, kind: DeclKind::Constant { ty, value }, exported, span });
        self.module.decls.push(decl);
        Ok(())
    }

    /// `'global' ID ':' type ('=' expr)? ';'`.
    fn parse_global_decl(&mut self, exported: bool) -> Result<(), ParseErr> {
        let span = self.span_here();
        let id = self.parse_identifier()?;
        self.expect(Token::Colon, "':'")?;
        let ty = self.parse_type()?;
        let init = if self.eat(Token::Assign)? { Some(self.parse_expression()?) } else { None };
        self.expect(Token::Semicolon, "';'")?;

        let decl = self
            .module
            .alloc_decl(Declaration { id, scoped_path: None, kind: DeclKind::Variable { ty, init }, exported, span });
        self.module.decls.push(decl);
        Ok(())
    }

    /// `'function' ID '(' params ')' (':' type)? block`.
    fn parse_function_decl(&mut self, exported: bool) -> Result<(), ParseErr> {
        let span = self.span_here();
        let id = self.parse_identifier()?;
        self.expect(Token::LeftParenthesis, "'('")?;
        let scope = self.module.scopes.alloc(Some(self.current_scope()));
        let params = self.with_scope(scope, |p| p.parse_param_list())?;
        let result = if self.eat(Token::Colon)? {
            self.parse_type()?
        } else {
            self.module.alloc_type(Spanned::new(span, TypeExpr::Scalar(Type::Void)))
        };
        let body = self.with_scope(scope, |p| p.parse_block())?;

        let function = self.module.alloc_function(FunctionDef {
            id,
            params,
            result,
            body: Some(body),
            scope: Some(scope),
            span,
        });
        let decl = self
            .module
            .alloc_decl(Declaration { id, scoped_path: None, kind: DeclKind::Function { function }, exported, span });
        self.module.decls.push(decl);
        Ok(())
    }

    /// `'on' dotted-path 'foreach'? ('(' params ')')? block` (spec Glossary
    /// "Hook"). This is the one declaration whose declaring ID is a scoped
    /// path rather than a bare identifier (spec §4.2 step 2).
    fn parse_global_hook(&mut self, exported: bool) -> Result<(), ParseErr> {
        let span = self.span_here();
        let path = self.parse_dotted_path()?;
        let foreach = self.eat(Token::For)?;

        let scope = self.module.scopes.alloc(Some(self.current_scope()));
        let params = self.with_scope(scope, |p| {
            if p.eat(Token::LeftParenthesis)? { p.parse_param_list() } else { Ok(Vec::new()) }
        })?;
        let body = self.with_scope(scope, |p| p.parse_block())?;

        let hook = self.module.alloc_hook(Hook {
            path: Some(path.clone()),
            owning_unit: None,
            foreach,
            params,
            body,
            scope,
            span,
        });
        let decl = self.module.alloc_decl(Declaration {
            id: Identifier::default(),
            scoped_path: Some(path),
            kind: DeclKind::Hook { hook },
            exported,
            span,
        });
        self.module.decls.push(decl);
        Ok(())
    }
}
