// ABOUTME: Single-pass, table-free scanner turning source text into a token stream

use crate::error::ErrorReporter;
use crate::token::{keyword_kind, Literal, Token, TokenKind};

pub struct Scanner<'a> {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    reporter: &'a mut ErrorReporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &str, reporter: &'a mut ErrorReporter) -> Self {
        Scanner {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            reporter,
        }
    }

    /// Scans the whole source, returning every token found plus a trailing EOF.
    /// Lex errors are reported through the `ErrorReporter`; scanning continues past
    /// them so multiple errors can surface in one pass.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            self.start = self.current;
            if let Some(token) = self.scan_token() {
                tokens.push(token);
            }
        }
        tokens.push(Token::eof(self.line));
        tokens
    }

    fn scan_token(&mut self) -> Option<Token> {
        let c = self.advance();
        use TokenKind::*;
        match c {
            '(' => Some(self.make_token(LeftParen)),
            ')' => Some(self.make_token(RightParen)),
            '{' => Some(self.make_token(LeftBrace)),
            '}' => Some(self.make_token(RightBrace)),
            ',' => Some(self.make_token(Comma)),
            '.' => Some(self.make_token(Dot)),
            '-' => Some(self.make_token(Minus)),
            '+' => Some(self.make_token(Plus)),
            ';' => Some(self.make_token(Semicolon)),
            '*' => Some(self.make_token(Star)),
            '!' => {
                let kind = if self.match_char('=') { BangEqual } else { Bang };
                Some(self.make_token(kind))
            }
            '=' => {
                let kind = if self.match_char('=') { EqualEqual } else { Equal };
                Some(self.make_token(kind))
            }
            '<' => {
                let kind = if self.match_char('=') { LessEqual } else { Less };
                Some(self.make_token(kind))
            }
            '>' => {
                let kind = if self.match_char('=') { GreaterEqual } else { Greater };
                Some(self.make_token(kind))
            }
            '/' => {
                if self.match_char('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                    None
                } else {
                    Some(self.make_token(Slash))
                }
            }
            ' ' | '\r' | '\t' => None,
            '\n' => {
                self.line += 1;
                None
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => Some(self.number()),
            c if is_identifier_start(c) => Some(self.identifier()),
            _ => {
                self.reporter.error_at_line(self.line, "Unexpected character.");
                None
            }
        }
    }

    fn string(&mut self) -> Option<Token> {
        let start_line = self.line;
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.reporter
                .error_at_line(self.line, "Unterminated string.");
            return None;
        }

        // consume the closing quote
        self.advance();

        let value: String = self.source[self.start + 1..self.current - 1]
            .iter()
            .collect();
        Some(Token::new(
            TokenKind::String,
            self.lexeme(),
            Some(Literal::String(value)),
            start_line,
        ))
    }

    fn number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume the '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        let text = self.lexeme();
        let value: f64 = text.parse().expect("scanner only admits valid digits");
        Token::new(TokenKind::Number, text, Some(Literal::Number(value)), self.line)
    }

    fn identifier(&mut self) -> Token {
        while is_identifier_continue(self.peek()) {
            self.advance();
        }
        let text = self.lexeme();
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, None, self.line)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), None, self.line)
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
