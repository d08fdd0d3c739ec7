//! Recursive-descent parser for the Bring configuration language.
//!
//! Produces a [`Document`]: ordered top-level entries where schema
//! declarations live under the reserved `schema:<Name>` key. Inline
//! `@name=literal` attributes on data entries are consumed and dropped
//! from the tree (the line scanner in `attr_scan` is the discovery path
//! for those); attributes on schema rules are kept in the rule.
//!
//! Nesting is bounded by [`MAX_NESTING_DEPTH`]; deeper input fails with
//! `DocumentTooDeep` instead of recursing unbounded.
pub mod lex;

use indexmap::IndexMap;

use crate::doc::{Document, Entry, FieldRule, Scalar, SchemaDef, Value, SCHEMA_KEY_PREFIX};
use crate::error::EngineError;
use lex::{Tok, Token};

/// Hard ceiling on object/array nesting.
pub const MAX_NESTING_DEPTH: usize = 64;

pub fn parse_bring(src: &str) -> Result<Document, EngineError> {
    let tokens = lex::tokenize(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let mut doc = Document::new();

    p.skip_newlines();
    while !p.at(&Tok::Eof) {
        let line = p.line();
        let (key, entry) = if p.at_schema_decl() {
            let schema = p.parse_schema()?;
            (
                format!("{SCHEMA_KEY_PREFIX}{}", schema.name),
                Entry::Schema(schema),
            )
        } else {
            let (key, value) = p.parse_entry()?;
            (key, Entry::Value(value))
        };
        if doc.contains_key(&key) {
            return Err(EngineError::ParseFailure(format!(
                "Duplicate key '{key}' at line {line}"
            )));
        }
        doc.insert(key, entry);
        p.expect_entry_end()?;
    }
    Ok(doc)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.tokens[self.pos].tok
    }

    fn peek2(&self) -> &Tok {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].tok
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].line
    }

    fn bump(&mut self) -> Tok {
        let t = self.tokens[self.pos].tok.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn at(&self, t: &Tok) -> bool {
        self.peek() == t
    }

    fn at_schema_decl(&self) -> bool {
        matches!(self.peek(), Tok::Ident(w) if w == "schema")
            && matches!(self.peek2(), Tok::Ident(_))
    }

    fn skip_newlines(&mut self) {
        while self.at(&Tok::Newline) {
            self.bump();
        }
    }

    fn expect_eq(&mut self) -> Result<(), EngineError> {
        if self.at(&Tok::Eq) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected("'='"))
        }
    }

    /// Entries end at a newline, a comma, a closing brace, or end of input.
    fn expect_entry_end(&mut self) -> Result<(), EngineError> {
        match self.peek() {
            Tok::Newline | Tok::Comma => {
                self.bump();
                self.skip_newlines();
                Ok(())
            }
            Tok::RBrace | Tok::Eof => Ok(()),
            _ => Err(self.unexpected("newline or ',' after entry")),
        }
    }

    fn unexpected(&self, wanted: &str) -> EngineError {
        EngineError::ParseFailure(format!(
            "Expected {wanted}, found {} at line {}",
            describe(self.peek()),
            self.line()
        ))
    }

    fn ident(&mut self, what: &str) -> Result<String, EngineError> {
        match self.peek() {
            Tok::Ident(_) => {
                let Tok::Ident(w) = self.bump() else {
                    unreachable!()
                };
                Ok(w)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// `key [@attr=lit]* = value [@attr=lit]*`; both attribute positions
    /// occur in the wild. Data-entry attributes are parsed then dropped.
    fn parse_entry(&mut self) -> Result<(String, Value), EngineError> {
        let key = self.ident("key")?;
        while self.at(&Tok::At) {
            self.parse_attribute()?;
        }
        self.expect_eq()?;
        let value = self.parse_value(0)?;
        while self.at(&Tok::At) {
            self.parse_attribute()?;
        }
        Ok((key, value))
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, EngineError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(EngineError::DocumentTooDeep(MAX_NESTING_DEPTH));
        }
        match self.peek().clone() {
            Tok::Str(_) => {
                let Tok::Str(s) = self.bump() else {
                    unreachable!()
                };
                Ok(Scalar::Str(s).into())
            }
            Tok::Int(i) => {
                self.bump();
                Ok(Scalar::Int(i).into())
            }
            Tok::Float(f) => {
                self.bump();
                Ok(Scalar::Float(f).into())
            }
            Tok::Ident(w) => match w.as_str() {
                "true" => {
                    self.bump();
                    Ok(Scalar::Bool(true).into())
                }
                "false" => {
                    self.bump();
                    Ok(Scalar::Bool(false).into())
                }
                "null" => {
                    self.bump();
                    Ok(Scalar::Null.into())
                }
                _ => Err(self.unexpected("value")),
            },
            Tok::LBrace => self.parse_object(depth + 1),
            Tok::LBracket => self.parse_array(depth + 1),
            _ => Err(self.unexpected("value")),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, EngineError> {
        self.bump(); // '{'
        let mut map = IndexMap::new();
        self.skip_newlines();
        while !self.at(&Tok::RBrace) {
            if self.at(&Tok::Eof) {
                return Err(self.unexpected("'}'"));
            }
            let line = self.line();
            let key = self.ident("key")?;
            while self.at(&Tok::At) {
                self.parse_attribute()?;
            }
            self.expect_eq()?;
            let value = self.parse_value(depth)?;
            while self.at(&Tok::At) {
                self.parse_attribute()?;
            }
            if map.contains_key(&key) {
                return Err(EngineError::ParseFailure(format!(
                    "Duplicate key '{key}' at line {line}"
                )));
            }
            map.insert(key, value);
            match self.peek() {
                Tok::Newline | Tok::Comma => {
                    self.bump();
                    self.skip_newlines();
                }
                Tok::RBrace => {}
                _ => return Err(self.unexpected("newline, ',' or '}'")),
            }
        }
        self.bump(); // '}'
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, EngineError> {
        self.bump(); // '['
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.at(&Tok::RBracket) {
            if self.at(&Tok::Eof) {
                return Err(self.unexpected("']'"));
            }
            items.push(self.parse_value(depth)?);
            match self.peek() {
                Tok::Newline | Tok::Comma => {
                    self.bump();
                    self.skip_newlines();
                }
                Tok::RBracket => {}
                _ => return Err(self.unexpected("newline, ',' or ']'")),
            }
        }
        self.bump(); // ']'
        Ok(Value::Array(items))
    }

    /// `@name=literal` (or bare `@name`, which reads as `true`).
    fn parse_attribute(&mut self) -> Result<(String, Value), EngineError> {
        self.bump(); // '@'
        let name = self.ident("attribute name")?;
        if self.at(&Tok::Eq) {
            self.bump();
            let literal = self.parse_value(0)?;
            Ok((name, literal))
        } else {
            Ok((name, Scalar::Bool(true).into()))
        }
    }

    /// `schema Name { key = type [@attr=lit]* ... }`
    fn parse_schema(&mut self) -> Result<SchemaDef, EngineError> {
        self.bump(); // 'schema'
        let name = self.ident("schema name")?;
        if !self.at(&Tok::LBrace) {
            return Err(self.unexpected("'{'"));
        }
        self.bump();
        self.skip_newlines();

        let mut rules = Vec::new();
        while !self.at(&Tok::RBrace) {
            if self.at(&Tok::Eof) {
                return Err(self.unexpected("'}'"));
            }
            let key = self.ident("rule key")?;
            self.expect_eq()?;
            let declared_type = self.ident("type name")?;
            let mut attributes = IndexMap::new();
            while self.at(&Tok::At) {
                let (name, literal) = self.parse_attribute()?;
                attributes.insert(name, literal);
            }
            rules.push(FieldRule {
                key,
                declared_type,
                attributes,
            });
            match self.peek() {
                Tok::Newline | Tok::Comma => {
                    self.bump();
                    self.skip_newlines();
                }
                Tok::RBrace => {}
                _ => return Err(self.unexpected("newline, ',' or '}'")),
            }
        }
        self.bump(); // '}'
        Ok(SchemaDef { name, rules })
    }
}

fn describe(t: &Tok) -> String {
    match t {
        Tok::Ident(w) => format!("'{w}'"),
        Tok::Str(_) => "string literal".into(),
        Tok::Int(i) => format!("'{i}'"),
        Tok::Float(f) => format!("'{f}'"),
        Tok::LBrace => "'{'".into(),
        Tok::RBrace => "'}'".into(),
        Tok::LBracket => "'['".into(),
        Tok::RBracket => "']'".into(),
        Tok::Eq => "'='".into(),
        Tok::Comma => "','".into(),
        Tok::At => "'@'".into(),
        Tok::Newline => "end of line".into(),
        Tok::Eof => "end of input".into(),
    }
}

// ------------------------------- Tests ------------------------------------ //
