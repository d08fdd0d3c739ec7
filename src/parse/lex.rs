//! Line-aware tokenizer for Bring source text.
//!
//! Newlines are tokens: they terminate entries inside objects and at the
//! top level (commas work too, so inline `{ id = 1, name = "A" }` lexes the
//! same as the block form). `#` comments run to end of line and never
//! swallow the newline itself.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EngineError;

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").unwrap());
static FLOAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Eq,
    Comma,
    At,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tok: Tok,
    pub line: usize,
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, EngineError> {
    let mut out = Vec::new();
    let mut chars = src.chars().peekable();
    let mut line = 1usize;

    macro_rules! push {
        ($t:expr) => {
            out.push(Token { tok: $t, line })
        };
    }

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '\n' => {
                chars.next();
                push!(Tok::Newline);
                line += 1;
            }
            '#' => {
                // comment runs to end of line
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '{' => {
                chars.next();
                push!(Tok::LBrace);
            }
            '}' => {
                chars.next();
                push!(Tok::RBrace);
            }
            '[' => {
                chars.next();
                push!(Tok::LBracket);
            }
            ']' => {
                chars.next();
                push!(Tok::RBracket);
            }
            '=' => {
                chars.next();
                push!(Tok::Eq);
            }
            ',' => {
                chars.next();
                push!(Tok::Comma);
            }
            '@' => {
                chars.next();
                push!(Tok::At);
            }
            '"' => {
                chars.next();
                push!(Tok::Str(lex_string(&mut chars, line)?));
            }
            c if c == '-' || c.is_ascii_digit() => {
                let raw = take_while(&mut chars, |c| {
                    c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
                });
                push!(lex_number(&raw, line)?);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = take_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '_');
                push!(Tok::Ident(word));
            }
            other => {
                return Err(EngineError::ParseFailure(format!(
                    "Unexpected character '{other}' at line {line}"
                )));
            }
        }
    }
    out.push(Token { tok: Tok::Eof, line });
    Ok(out)
}

fn take_while(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    pred: impl Fn(char) -> bool,
) -> String {
    let mut s = String::new();
    while let Some(&c) = chars.peek() {
        if !pred(c) {
            break;
        }
        s.push(c);
        chars.next();
    }
    s
}

fn lex_number(raw: &str, line: usize) -> Result<Tok, EngineError> {
    if INT_RE.is_match(raw) {
        // overflow falls through to float below; abs(i64::MAX)+ digits
        if let Ok(i) = raw.parse::<i64>() {
            return Ok(Tok::Int(i));
        }
    }
    if INT_RE.is_match(raw) || FLOAT_RE.is_match(raw) {
        if let Ok(f) = raw.parse::<f64>() {
            return Ok(Tok::Float(f));
        }
    }
    Err(EngineError::ParseFailure(format!(
        "Invalid number '{raw}' at line {line}"
    )))
}

fn lex_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
) -> Result<String, EngineError> {
    let mut s = String::new();
    loop {
        match chars.next() {
            None | Some('\n') => {
                return Err(EngineError::ParseFailure(format!(
                    "Unterminated string at line {line}"
                )));
            }
            Some('"') => return Ok(s),
            Some('\\') => match chars.next() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some('r') => s.push('\r'),
                Some('"') => s.push('"'),
                Some('\\') => s.push('\\'),
                other => {
                    return Err(EngineError::ParseFailure(format!(
                        "Invalid escape '\\{}' at line {line}",
                        other.map(String::from).unwrap_or_default()
                    )));
                }
            },
            Some(c) => s.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Tok> {
        tokenize(src).unwrap().into_iter().map(|t| t.tok).collect()
    }

    #[test]
    fn lexes_basic_entry() {
        assert_eq!(
            toks(r#"name = "Alice""#),
            vec![
                Tok::Ident("name".into()),
                Tok::Eq,
                Tok::Str("Alice".into()),
                Tok::Eof
            ]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            toks("age = 25  # trailing\n"),
            vec![
                Tok::Ident("age".into()),
                Tok::Eq,
                Tok::Int(25),
                Tok::Newline,
                Tok::Eof
            ]
        );
    }

    #[test]
    fn numbers_classify_int_vs_float() {
        assert_eq!(toks("-3"), vec![Tok::Int(-3), Tok::Eof]);
        assert_eq!(toks("5.8"), vec![Tok::Float(5.8), Tok::Eof]);
        assert!(tokenize("x = 1.2.3").is_err());
    }

    #[test]
    fn tracks_line_numbers() {
        let tokens = tokenize("a = 1\nb = 2\n").unwrap();
        let b = tokens
            .iter()
            .find(|t| t.tok == Tok::Ident("b".into()))
            .unwrap();
        assert_eq!(b.line, 2);
    }

    #[test]
    fn rejects_garbage() {
        assert!(tokenize("x = $").is_err());
        // '#' opens a comment, so the '$' here never reaches the lexer;
        // the parser is what rejects the dangling '@'
        assert_eq!(
            toks("invalid = @#$"),
            vec![Tok::Ident("invalid".into()), Tok::Eq, Tok::At, Tok::Eof]
        );
    }
}
