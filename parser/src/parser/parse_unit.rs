use super::Parser;
use crate::ast::{
    Attribute, ContainerKind, Param, SwitchCase, UnitDef, UnitId, UnitItem, UnitItemKind,
};
use crate::parse_err::ParseErr;
use lexer::Token;

impl<'a, 'c> Parser<'a, 'c> {
    /// `unit-type := 'unit' params? '{' item* '}'` (spec Glossary "Unit").
    pub(crate) fn parse_unit_type(&mut self) -> Result<UnitId, ParseErr> {
        let span = self.span_here();
        self.expect(Token::Unit, "'unit'")?;

        let scope = self.module.scopes.alloc(Some(self.current_scope()));
        let (params, items) = self.with_scope(scope, |p| {
            let params = if p.eat(Token::LeftParenthesis)? { p.parse_param_list()? } else { Vec::new() };
            p.expect(Token::LeftCurlyBracket, "'{'")?;
            let mut items = Vec::new();
            while !p.check(Token::RightCurlyBracket)? {
                items.push(p.parse_unit_item()?);
            }
            Ok((params, items))
        })?;
        self.expect(Token::RightCurlyBracket, "'}'")?;

        Ok(self.module.alloc_unit(UnitDef { id: None, params, items, scope: Some(scope), span }))
    }

    pub(crate) fn parse_param_list(&mut self) -> Result<Vec<crate::ast::ParamId>, ParseErr> {
        let mut params = Vec::new();
        if !self.check(Token::RightParenthesis)? {
            params.push(self.parse_param()?);
            while self.eat(Token::Comma)? {
                params.push(self.parse_param()?);
            }
        }
        self.expect(Token::RightParenthesis, "')'")?;
        Ok(params)
    }

    pub(crate) fn parse_param(&mut self) -> Result<crate::ast::ParamId, ParseErr> {
        let span = self.span_here();
        let id = self.parse_identifier()?;
        self.expect(Token::Colon, "':'")?;
        let ty = self.parse_type()?;
        Ok(self.module.alloc_param(Param { id, ty, span }))
    }

    /// One item of a unit body: a field, a `switch`, a container, a global
    /// hook, or a `%property` line (spec Glossary "Unit item" / "Property").
    fn parse_unit_item(&mut self) -> Result<crate::ast::ItemId, ParseErr> {
        let span = self.span_here();

        if self.eat(Token::PropertyMark)? {
            let key = self.intern_ident()?;
            let value = if self.eat(Token::Assign)? { Some(self.parse_expression()?) } else { None };
            self.expect(Token::Semicolon, "';'")?;
            let scope = self.current_scope();
            return Ok(self.module.alloc_item(UnitItem {
                id: None,
                kind: UnitItemKind::Property { key, value },
                attributes: Vec::new(),
                hooks: Vec::new(),
                scope,
                span,
            }));
        }

        if self.eat(Token::Switch)? {
            self.expect(Token::LeftParenthesis, "'('")?;
            let expr = self.parse_expression()?;
            self.expect(Token::RightParenthesis, "')'")?;
            self.expect(Token::LeftCurlyBracket, "'{'")?;
            let mut cases = Vec::new();
            let mut default = None;
            while !self.check(Token::RightCurlyBracket)? {
                if self.eat(Token::Default)? {
                    self.expect(Token::Arrow, "'->'")?;
                    default = Some(self.parse_unit_item()?);
                } else {
                    self.expect(Token::Case, "'case'")?;
                    let mut values = vec![self.parse_expression()?];
                    while self.eat(Token::Comma)? {
                        values.push(self.parse_expression()?);
                    }
                    self.expect(Token::Arrow, "'->'")?;
                    let item = self.parse_unit_item()?;
                    cases.push(SwitchCase { values, item });
                }
            }
            self.expect(Token::RightCurlyBracket, "'}'")?;
            let scope = self.current_scope();
            return Ok(self.module.alloc_item(UnitItem {
                id: None,
                kind: UnitItemKind::Switch { expr, cases, default },
                attributes: Vec::new(),
                hooks: Vec::new(),
                scope,
                span,
            }));
        }

        // `name: container<elem> attrs? hooks?;` or `name: type attrs?
        // hooks?;`, or `: type attrs?;` for an anonymous field (spec
        // Glossary "Field" — matched but not bound to an ID).
        let id = if self.eat(Token::Colon)? {
            None
        } else {
            let ident = self.parse_identifier()?;
            self.expect(Token::Colon, "':'")?;
            Some(ident)
        };

        self.parse_unit_item_body(id, span, true)
    }

    /// Parses the shared tail of a unit item — container/ctor/scalar shape,
    /// attributes, and hooks — factored out so a container's element (which
    /// has no leading `name:`) can reuse it (spec §3 `Container`'s element
    /// is itself a full item, since it can carry its own attributes).
    fn parse_unit_item_body(
        &mut self,
        id: Option<shared_context::Identifier>,
        span: shared_context::Span,
        trailing_semicolon: bool,
    ) -> Result<crate::ast::ItemId, ParseErr> {
        let container_kind = if self.eat(Token::List)? {
            Some(ContainerKind::List)
        } else if self.eat(Token::Vector)? {
            Some(ContainerKind::Vector)
        } else if self.eat(Token::Set)? {
            Some(ContainerKind::Set)
        } else {
            None
        };

        let scope = self.module.scopes.alloc(Some(self.current_scope()));
        let kind = if let Some(container_kind) = container_kind {
            self.expect(Token::LessThan, "'<'")?;
            let element = self.with_scope(scope, |p| p.parse_unit_item_body(None, span, false))?;
            self.expect(Token::GreaterThan, "'>'")?;
            UnitItemKind::Container { kind: container_kind, element }
        } else if self.check(Token::ConstantRegExp)? || self.check(Token::ConstantBytes)? {
            let ctor = self.parse_expression()?;
            UnitItemKind::Ctor(ctor)
        } else {
            let ty = self.with_scope(scope, |p| p.parse_type())?;
            UnitItemKind::AtomicType(ty)
        };

        let attributes = self.parse_attributes()?;
        let hooks = self.with_scope(scope, |p| p.parse_field_hooks())?;
        if trailing_semicolon {
            self.expect(Token::Semicolon, "';'")?;
        }

        Ok(self.module.alloc_item(UnitItem { id, kind, attributes, hooks, scope, span }))
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>, ParseErr> {
        let mut attrs = Vec::new();
        while self.check(Token::Amp)? {
            let span = self.span_here();
            self.advance()?;
            let key = self.intern_ident()?;
            let value = if self.eat(Token::Assign)? { Some(self.parse_expression()?) } else { None };
            attrs.push(Attribute::new(key, value, span));
        }
        Ok(attrs)
    }

    /// `{ stmt* }` attached directly to a field, run once the field has been
    /// parsed (spec Glossary "Hook").
    fn parse_field_hooks(&mut self) -> Result<Vec<crate::ast::HookId>, ParseErr> {
        let mut hooks = Vec::new();
        if self.check(Token::LeftCurlyBracket)? {
            let span = self.span_here();
            let body = self.parse_block()?;
            let scope = self.current_scope();
            hooks.push(self.module.alloc_hook(crate::ast::Hook {
                path: None,
                owning_unit: None,
                foreach: false,
                params: Vec::new(),
                body,
                scope,
                span,
            }));
        }
        Ok(hooks)
    }
}
