use logos::Logos;

/// Token kinds of the BinPAC++ source surface (spec §6): module-level
/// declarations, unit items and their attributes, containers, switch/case,
/// and the literal/operator/symbol set needed for expressions appearing in
/// `&length=...`, hook bodies, and `%property` values.
#[derive(Debug, PartialEq, Logos, Clone, Copy)]
pub enum Token {
    // Keywords — top-level declarations
    #[token("module")]
    Module,
    #[token("import")]
    Import,
    #[token("export")]
    Export,
    #[token("type")]
    Type,
    #[token("unit")]
    Unit,
    #[token("const")]
    Const,
    #[token("global")]
    Global,
    #[token("function")]
    Function,
    #[token("on")]
    On,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("print")]
    Print,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,

    // Container type keywords
    #[token("list")]
    List,
    #[token("vector")]
    Vector,
    #[token("set")]
    Set,
    #[token("map")]
    Map,

    // Parser-state keywords
    #[token("self")]
    SelfKw,
    #[token("$$")]
    DollarDollar,

    // Identifiers and literals
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 0)]
    Identifier,
    #[regex(r"\d+\.\d+")]
    ConstantDouble,
    #[regex(r"\d+")]
    ConstantInt,
    #[regex(r#""([^"\\]|\\.)*""#)]
    ConstantString,
    #[regex(r#"b"([^"\\]|\\.)*""#)]
    ConstantBytes,
    #[regex(r"/([^/\\\n]|\\.)*/")]
    ConstantRegExp,

    // Operators
    #[token("=")]
    Assign,
    #[token("+")]
    Add,
    #[token("-")]
    Neg,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("%")]
    Mod,
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,
    #[token("!")]
    LogicalNot,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessThanOrEq,
    #[token(">=")]
    GreaterThanOrEq,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("->")]
    Arrow,
    #[token("&")]
    Amp,
    #[token("%%")]
    PropertyMark,

    // Symbols
    #[token("(")]
    LeftParenthesis,
    #[token(")")]
    RightParenthesis,
    #[token("{")]
    LeftCurlyBracket,
    #[token("}")]
    RightCurlyBracket,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(";")]
    Semicolon,
    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,

    // Catch invalid tokens like "9main"
    #[regex(r"\d+[a-zA-Z_][a-zA-Z0-9_]*")]
    Invalid,

    // skipped patterns
    #[regex(r"[ \t\n\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip, priority = 10)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    Error,
}

impl Token {
    /// Whether this token can start a unary prefix expression.
    pub fn is_unary(&self) -> bool {
        matches!(self, Token::Neg | Token::LogicalNot)
    }

    /// Whether this token is a binary infix operator.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Token::Add
                | Token::Neg
                | Token::Mul
                | Token::Div
                | Token::Mod
                | Token::LogicalAnd
                | Token::LogicalOr
                | Token::Equal
                | Token::NotEqual
                | Token::LessThan
                | Token::GreaterThan
                | Token::LessThanOrEq
                | Token::GreaterThanOrEq
        )
    }

    /// Binding power used by the expression parser's precedence climbing.
    pub fn precedence(&self) -> usize {
        match self {
            Token::Mul | Token::Div | Token::Mod => 50,
            Token::Add | Token::Neg => 45,
            Token::LessThan | Token::LessThanOrEq | Token::GreaterThan | Token::GreaterThanOrEq => 35,
            Token::Equal | Token::NotEqual => 30,
            Token::LogicalAnd => 10,
            Token::LogicalOr => 5,
            _ => 0,
        }
    }
}

/// Byte/line/column region of one token, relative to the start of its line.
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub line_num: usize,
    pub col_start: usize,
    pub col_end: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SpannedToken<'source> {
    pub token_type: Token,
    pub lexeme: &'source str,
    pub span: Span,
}

impl<'source> Default for SpannedToken<'source> {
    fn default() -> Self {
        Self {
            token_type: Token::Invalid,
            lexeme: "",
            span: Span {
                line_num: 0,
                col_start: 0,
                col_end: 0,
            },
        }
    }
}

impl<'source> SpannedToken<'source> {
    pub fn get_token(&self) -> Token {
        self.token_type
    }

    pub fn get_lexeme(&self) -> &'source str {
        self.lexeme
    }

    pub fn get_span(&self) -> Span {
        self.span
    }
}

pub struct Lexer<'source> {
    iter: logos::Lexer<'source, Token>,
    input: &'source str,
    line: usize,
    column: usize,
    position: usize,
}

impl<'source> Lexer<'source> {
    pub fn new(input: &'source str) -> Self {
        Self {
            iter: Token::lexer(input),
            input,
            line: 1,
            column: 0,
            position: 0,
        }
    }

    pub fn next(&mut self) -> Option<Result<SpannedToken<'source>, LexError<'source>>> {
        let token_type = match self.iter.next()? {
            Ok(tok) => tok,
            Err(_) => return Some(Err(LexError::new(self.iter.slice(), self.line))),
        };

        if let Token::Invalid = token_type {
            return Some(Err(LexError::new(self.iter.slice(), self.line)));
        }

        let start = self.iter.span().start;
        self.count_lines(start);
        self.position = self.iter.span().end;

        let token_column_start = self.column;
        self.column += self.position - start;
        let token_column_end = self.column;

        Some(Ok(SpannedToken {
            token_type,
            lexeme: self.iter.slice(),
            span: Span {
                line_num: self.line,
                col_start: token_column_start,
                col_end: token_column_end,
            },
        }))
    }

    fn count_lines(&mut self, start: usize) {
        for ch in self.input[self.position..start].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn get_source_code(&self) -> &'source str {
        self.input
    }

    pub fn get_line_num(&self) -> usize {
        self.line
    }

    pub fn get_col_num(&self) -> usize {
        self.column
    }
}

#[derive(Debug, Clone)]
pub struct LexError<'source> {
    pub lexeme: &'source str,
    pub line: usize,
}

impl<'source> LexError<'source> {
    fn new(lexeme: &'source str, line: usize) -> Self {
        Self { lexeme, line }
    }
}

impl<'source> std::fmt::Display for LexError<'source> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: invalid token '{}'", self.line, self.lexeme)
    }
}

impl<'source> std::error::Error for LexError<'source> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        while let Some(tok) = lexer.next() {
            out.push(tok.expect("valid token").get_token());
        }
        out
    }

    #[test]
    fn lexes_a_module_header_and_unit_declaration() {
        let toks = tokens("module M; type T = unit { x: uint32; };");
        assert_eq!(
            toks,
            vec![
                Token::Module,
                Token::Identifier,
                Token::Semicolon,
                Token::Type,
                Token::Identifier,
                Token::Assign,
                Token::Unit,
                Token::LeftCurlyBracket,
                Token::Identifier,
                Token::Colon,
                Token::Identifier,
                Token::Semicolon,
                Token::RightCurlyBracket,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn lexes_an_attribute_and_a_container_type() {
        let toks = tokens("payload: bytes &length=field1 -> self.payload;");
        assert_eq!(
            toks,
            vec![
                Token::Identifier,
                Token::Colon,
                Token::Identifier,
                Token::Amp,
                Token::Identifier,
                Token::Assign,
                Token::Identifier,
                Token::Arrow,
                Token::SelfKw,
                Token::Dot,
                Token::Identifier,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn an_identifier_starting_with_a_digit_is_an_error() {
        let mut lexer = Lexer::new("9field");
        let err = lexer.next().unwrap();
        assert!(err.is_err());
    }
}
