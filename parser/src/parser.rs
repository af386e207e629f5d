use crate::ast::*;
use crate::parse_err::ParseErr;
use lexer::{Lexer, SpannedToken, Token};
use shared_context::interner::{Interner, Symbol};
use shared_context::source_map::SourceMap;
use shared_context::{Identifier, Span};
use std::path::PathBuf;

mod parse_declarations;
mod parse_expressions;
mod parse_statements;
mod parse_types;
mod parse_unit;

/// Recursive-descent parser. Builds the arena-backed `Module` directly as
/// it walks the token stream, mirroring the grounding teacher's
/// `Parser<'a, 'c>` (one lookahead token, `advance`/`peek`/`expect_token`).
pub struct Parser<'a, 'c> {
    lexer: Lexer<'a>,
    interner: &'c mut Interner<'a>,
    source_map: &'c SourceMap<'a>,
    current_token: SpannedToken<'a>,
    peeked_token: Option<SpannedToken<'a>>,
    pub(crate) module: Module,
    /// Lexical nesting of scopes as parsing descends into blocks, hooks,
    /// function bodies, and unit bodies. The scope builder pass later fills
    /// in the bindings; the parser is only responsible for the topology
    /// (spec §4.2: "scopes are already chained by the time the scope
    /// builder runs").
    scope_stack: Vec<ScopeId>,
}

/// Entry point (spec §4.1 "`parse(stream, name) -> Module | error`" — here
/// the stream is already lexed and the source text already registered
/// under `path` in the caller's `CompilerContext`).
pub fn parse<'a, 'c>(
    lexer: Lexer<'a>,
    interner: &'c mut Interner<'a>,
    source_map: &'c SourceMap<'a>,
    path: PathBuf,
) -> Result<Module, ParseErr> {
    let parser = Parser::new(lexer, interner, source_map, path)?;
    parser.parse_module()
}

impl<'a, 'c> Parser<'a, 'c> {
    pub fn new(
        lexer: Lexer<'a>,
        interner: &'c mut Interner<'a>,
        source_map: &'c SourceMap<'a>,
        path: PathBuf,
    ) -> Result<Self, ParseErr> {
        let placeholder = interner.intern("<module>");
        let module = Module::new(placeholder, path);
        let root_scope = module.root_scope;
        Ok(Self {
            lexer,
            interner,
            source_map,
            current_token: SpannedToken::default(),
            peeked_token: None,
            module,
            scope_stack: vec![root_scope],
        })
    }

    pub(crate) fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack is never empty")
    }

    pub(crate) fn with_scope<R>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> Result<R, ParseErr>) -> Result<R, ParseErr> {
        self.scope_stack.push(scope);
        let result = f(self);
        self.scope_stack.pop();
        result
    }

    pub(crate) fn advance(&mut self) -> Result<SpannedToken<'a>, ParseErr> {
        match self.peeked_token.take() {
            Some(token) => {
                self.current_token = token;
                Ok(token)
            }
            None => {
                let token = self.next_raw()?;
                self.current_token = token;
                Ok(token)
            }
        }
    }

    pub(crate) fn peek(&mut self) -> Result<SpannedToken<'a>, ParseErr> {
        if self.peeked_token.is_none() {
            self.peeked_token = Some(self.next_raw()?);
        }
        Ok(self.peeked_token.unwrap())
    }

    fn next_raw(&mut self) -> Result<SpannedToken<'a>, ParseErr> {
        match self.lexer.next() {
            Some(Ok(tok)) => Ok(tok),
            Some(Err(err)) => Err(ParseErr::new(err.to_string(), &self.current_token, self.source_map)),
            None => Err(ParseErr::at_eof("unexpected end of input".to_string())),
        }
    }

    pub(crate) fn at_eof(&mut self) -> bool {
        self.peek().is_err()
    }

    pub(crate) fn check(&mut self, tok: Token) -> Result<bool, ParseErr> {
        Ok(self.peek()?.get_token() == tok)
    }

    pub(crate) fn eat(&mut self, tok: Token) -> Result<bool, ParseErr> {
        if self.check(tok)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, tok: Token, what: &str) -> Result<SpannedToken<'a>, ParseErr> {
        let next = self.peek()?;
        if next.get_token() != tok {
            return Err(ParseErr::expected(what, &next, self.source_map));
        }
        self.advance()
    }

    pub(crate) fn span_here(&mut self) -> Span {
        match self.peek() {
            Ok(tok) => to_span(&tok),
            Err(_) => to_span(&self.current_token),
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> Result<Identifier, ParseErr> {
        let tok = self.expect(Token::Identifier, "identifier")?;
        let sym = self.interner.intern(tok.get_lexeme());
        Ok(Identifier::new(sym, 0))
    }

    /// BinPAC++ allows dotted scoped names (`a.b.c`) in expressions and
    /// type references (spec §4.4: "for scoped names `a.b.c`, the first
    /// component selects a named child").
    pub(crate) fn parse_dotted_path(&mut self) -> Result<Vec<Symbol>, ParseErr> {
        let mut path = vec![self.intern_ident()?];
        while self.check(Token::Dot)? {
            self.advance()?;
            path.push(self.intern_ident()?);
        }
        Ok(path)
    }

    pub(crate) fn intern_ident(&mut self) -> Result<Symbol, ParseErr> {
        let tok = self.expect(Token::Identifier, "identifier")?;
        Ok(self.interner.intern(tok.get_lexeme()))
    }

    pub(crate) fn intern(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }
}

pub(crate) fn to_span(tok: &SpannedToken) -> Span {
    let s = tok.get_span();
    Span::new(s.col_start, s.col_end, s.line_num)
}
