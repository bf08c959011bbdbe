//! Tokenizer for spec source
//!
//! The language has no division operator, so a `/` that does not open a
//! comment always starts a regex literal.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::error::{Position, Result, SpecError};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Regex { pattern: String, flags: String },
    Ident(String),
    Let,
    True,
    False,
    Null,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semi,
    Dot,
    Arrow,
    Eq,
    Minus,
    Eof,
}

impl TokenKind {
    /// How the token reads in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Str(s) => format!("string {:?}", s),
            TokenKind::Regex { pattern, .. } => format!("regex /{}/", pattern),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Let => "'let'".to_string(),
            TokenKind::True => "'true'".to_string(),
            TokenKind::False => "'false'".to_string(),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Arrow => "'=>'".to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input; the last token is always `Eof`
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn here(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Skip whitespace and both comment styles
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.current_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let start = self.here();
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('*') if self.current_char() == Some('/') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(SpecError::syntax("Unterminated block comment", start))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let position = self.here();

        let Some(ch) = self.current_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position,
            });
        };

        let kind = match ch {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semi),
            '.' => self.single(TokenKind::Dot),
            '-' => self.single(TokenKind::Minus),
            '=' => {
                self.advance();
                if self.current_char() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Eq
                }
            }
            '"' | '\'' => self.string(ch, position)?,
            '/' => self.regex(position)?,
            c if c.is_ascii_digit() => self.number(position)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            other => {
                return Err(SpecError::syntax(
                    format!("Unexpected character '{}'", other),
                    position,
                ))
            }
        };

        Ok(Token { kind, position })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn identifier(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        match name.as_str() {
            "let" => TokenKind::Let,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(name),
        }
    }

    fn digits(&mut self, out: &mut String) -> usize {
        let mut count = 0;
        while let Some(ch) = self.current_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            out.push(ch);
            self.advance();
            count += 1;
        }
        count
    }

    fn number(&mut self, start: Position) -> Result<TokenKind> {
        let mut text = String::new();
        self.digits(&mut text);

        if self.current_char() == Some('.')
            && self.peek_second().is_some_and(|c| c.is_ascii_digit())
        {
            text.push('.');
            self.advance();
            self.digits(&mut text);
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            text.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                text.push(sign);
                self.advance();
            }
            if self.digits(&mut text) == 0 {
                return Err(SpecError::syntax("Exponent requires digits", self.here()));
            }
        }

        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| SpecError::syntax(format!("Invalid number '{}'", text), start))
    }

    fn string(&mut self, quote: char, start: Position) -> Result<TokenKind> {
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => return Err(SpecError::syntax("Unterminated string", start)),
                Some(ch) if ch == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => {
                    let escape_at = self.here();
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('/') => '/',
                        Some('u') => self.unicode_escape(escape_at)?,
                        Some(other) => {
                            return Err(SpecError::syntax(
                                format!("Unknown escape '\\{}'", other),
                                escape_at,
                            ))
                        }
                        None => return Err(SpecError::syntax("Unterminated string", start)),
                    };
                    value.push(escaped);
                }
                Some(ch) => value.push(ch),
            }
        }
    }

    fn unicode_escape(&mut self, at: Position) -> Result<char> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.advance() {
                Some(ch) if ch.is_ascii_hexdigit() => hex.push(ch),
                _ => return Err(SpecError::syntax("Expected four hex digits after \\u", at)),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| SpecError::syntax(format!("Invalid code point \\u{}", hex), at))
    }

    fn regex(&mut self, start: Position) -> Result<TokenKind> {
        self.advance();
        let mut pattern = String::new();
        let mut in_class = false;
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(SpecError::syntax("Unterminated regex literal", start))
                }
                Some('\\') => match self.advance() {
                    Some('/') => pattern.push('/'),
                    Some(ch) => {
                        pattern.push('\\');
                        pattern.push(ch);
                    }
                    None => return Err(SpecError::syntax("Unterminated regex literal", start)),
                },
                Some('[') => {
                    in_class = true;
                    pattern.push('[');
                }
                Some(']') => {
                    in_class = false;
                    pattern.push(']');
                }
                Some('/') if !in_class => break,
                Some(ch) => pattern.push(ch),
            }
        }

        let mut flags = String::new();
        while let Some(ch) = self.current_char() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            if !matches!(ch, 'i' | 'm' | 's' | 'x') {
                return Err(SpecError::syntax(
                    format!("Unsupported regex flag '{}'", ch),
                    self.here(),
                ));
            }
            flags.push(ch);
            self.advance();
        }

        Ok(TokenKind::Regex { pattern, flags })
    }
}
