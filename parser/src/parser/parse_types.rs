use super::Parser;
use crate::ast::{Spanned, TypeExpr, TypeId};
use crate::parse_err::ParseErr;
use lexer::Token;
use operators::Type;

/// Maps a bare identifier to one of the scalar types spec §3 lists under
/// "Type", when the name names a builtin rather than a user declaration.
fn scalar_type_from_name(name: &str) -> Option<Type> {
    Some(match name {
        "void" => Type::Void,
        "any" => Type::Any,
        "bool" => Type::Bool,
        "int8" => Type::Integer { width: 8, signed: true },
        "int16" => Type::Integer { width: 16, signed: true },
        "int32" => Type::Integer { width: 32, signed: true },
        "int64" => Type::Integer { width: 64, signed: true },
        "uint8" => Type::Integer { width: 8, signed: false },
        "uint16" => Type::Integer { width: 16, signed: false },
        "uint32" => Type::Integer { width: 32, signed: false },
        "uint64" => Type::Integer { width: 64, signed: false },
        "double" => Type::Double,
        "string" => Type::String,
        "bytes" => Type::Bytes,
        "addr" => Type::Address,
        "net" => Type::Network,
        "port" => Type::Port,
        "interval" => Type::Interval,
        "time" => Type::Time,
        "regexp" => Type::RegExp,
        "sink" => Type::Sink,
        "file" => Type::File,
        "caddr" => Type::CAddr,
        _ => return None,
    })
}

impl<'a, 'c> Parser<'a, 'c> {
    /// `type := 'list' '<' type '>' | 'vector' '<' type '>' | 'set' '<' type
    /// '>' | 'map' '<' type ',' type '>' | 'unit' unit-body | scalar-name |
    /// dotted-path` (spec §3 "Type", §6 container syntax).
    pub(crate) fn parse_type(&mut self) -> Result<TypeId, ParseErr> {
        let span = self.span_here();

        if self.eat(Token::List)? {
            let inner = self.parse_type_arguments_one()?;
            return Ok(self.module.alloc_type(Spanned::new(span, TypeExpr::List(inner))));
        }
        if self.eat(Token::Vector)? {
            let inner = self.parse_type_arguments_one()?;
            return Ok(self.module.alloc_type(Spanned::new(span, TypeExpr::Vector(inner))));
        }
        if self.eat(Token::Set)? {
            let inner = self.parse_type_arguments_one()?;
            return Ok(self.module.alloc_type(Spanned::new(span, TypeExpr::Set(inner))));
        }
        if self.eat(Token::Map)? {
            self.expect(Token::LessThan, "'<'")?;
            let key = self.parse_type()?;
            self.expect(Token::Comma, "','")?;
            let value = self.parse_type()?;
            self.expect(Token::GreaterThan, "'>'")?;
            return Ok(self.module.alloc_type(Spanned::new(span, TypeExpr::Map(key, value))));
        }
        if self.check(Token::Unit)? {
            let unit_id = self.parse_unit_type()?;
            return Ok(self.module.alloc_type(Spanned::new(span, TypeExpr::Unit(unit_id))));
        }

        let tok = self.expect(Token::Identifier, "a type name")?;
        if let Some(scalar) = scalar_type_from_name(tok.get_lexeme()) {
            return Ok(self.module.alloc_type(Spanned::new(span, TypeExpr::Scalar(scalar))));
        }

        let mut path = vec![self.intern(tok.get_lexeme())];
        while self.check(Token::Dot)? {
            self.advance()?;
            path.push(self.intern_ident()?);
        }
        Ok(self.module.alloc_type(Spanned::new(span, TypeExpr::TypeByName(path))))
    }

    fn parse_type_arguments_one(&mut self) -> Result<TypeId, ParseErr> {
        self.expect(Token::LessThan, "'<'")?;
        let inner = self.parse_type()?;
        self.expect(Token::GreaterThan, "'>'")?;
        Ok(inner)
    }
}
