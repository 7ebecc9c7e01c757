/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Hand-written character scanner for ZX16 assembly source. One character of
//! lookahead plus a single extra peek; label detection uses a save/restore of
//! the cursor rather than re-lexing.

use crate::ast::{Token, TokenKind, is_register_name};
use crate::errors::Diagnostic;

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> char {
        *self.chars.get(self.pos).unwrap_or(&'\0')
    }

    fn peek(&self, offset: usize) -> char {
        *self.chars.get(self.pos + offset).unwrap_or(&'\0')
    }

    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            if self.chars[self.pos] == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), ' ' | '\t' | '\r') {
            self.advance();
        }
    }

    fn read_string(&mut self) -> String {
        let mut result = String::new();
        self.advance(); // opening quote
        while self.current() != '\0' && self.current() != '"' {
            if self.current() == '\\' {
                self.advance();
                let escape = self.current();
                result.push(match escape {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    other => other,
                });
            } else {
                result.push(self.current());
            }
            self.advance();
        }
        if self.current() == '"' {
            self.advance(); // closing quote
        }
        result
    }

    fn read_number(&mut self) -> i64 {
        let start = self.pos;
        if self.current() == '0' && self.peek(1) != '\0' {
            self.advance();
            match self.current().to_ascii_lowercase() {
                'x' => {
                    self.advance();
                    while self.current().to_ascii_lowercase().is_ascii_hexdigit() {
                        self.advance();
                    }
                    let text: String = self.chars[start + 2..self.pos].iter().collect();
                    return i64::from_str_radix(&text, 16).unwrap_or(0);
                }
                'b' => {
                    self.advance();
                    while matches!(self.current(), '0' | '1') {
                        self.advance();
                    }
                    let text: String = self.chars[start + 2..self.pos].iter().collect();
                    return i64::from_str_radix(&text, 2).unwrap_or(0);
                }
                'o' => {
                    self.advance();
                    while matches!(self.current(), '0'..='7') {
                        self.advance();
                    }
                    let text: String = self.chars[start + 2..self.pos].iter().collect();
                    return i64::from_str_radix(&text, 8).unwrap_or(0);
                }
                _ => {
                    self.pos = start;
                }
            }
        }
        while self.current().is_ascii_digit() {
            self.advance();
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().unwrap_or(0)
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while self.current().is_alphanumeric() || self.current() == '_' {
            self.advance();
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Tokenizes the whole source, returning the token stream plus any
    /// warnings raised for characters the scanner could not classify.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        let mut warnings = Vec::new();

        while self.pos < self.chars.len() {
            self.skip_whitespace();
            if self.current() == '\0' {
                break;
            }
            let (line, column) = (self.line, self.column);

            if self.current() == '\n' {
                tokens.push(Token::new(TokenKind::Newline, "\n", line, column));
                self.advance();
                continue;
            }

            if self.current() == '#' {
                let start = self.pos;
                while self.current() != '\0' && self.current() != '\n' {
                    self.advance();
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                tokens.push(Token::new(TokenKind::Comment, text, line, column));
                continue;
            }

            if self.current() == '/' && self.peek(1) == '*' {
                let start = self.pos;
                self.advance();
                self.advance();
                while self.pos < self.chars.len().saturating_sub(1) {
                    if self.current() == '*' && self.peek(1) == '/' {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                tokens.push(Token::new(TokenKind::Comment, text, line, column));
                continue;
            }

            let single = match self.current() {
                ',' => Some(TokenKind::Comma),
                ':' => Some(TokenKind::Colon),
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                _ => None,
            };
            if let Some(kind) = single {
                let ch = self.current();
                tokens.push(Token::new(kind, ch.to_string(), line, column));
                self.advance();
                continue;
            }

            if self.current() == '"' {
                let value = self.read_string();
                tokens.push(Token::new(TokenKind::String, value, line, column));
                continue;
            }

            if self.current() == '\'' {
                self.advance(); // opening quote
                let value: i64 = if self.current() == '\\' {
                    self.advance();
                    let escape = self.current();
                    let v = match escape {
                        'n' => '\n' as i64,
                        't' => '\t' as i64,
                        'r' => '\r' as i64,
                        '\\' => '\\' as i64,
                        '\'' => '\'' as i64,
                        other => other as i64,
                    };
                    self.advance();
                    v
                } else {
                    let v = self.current() as i64;
                    self.advance();
                    v
                };
                if self.current() == '\'' {
                    self.advance(); // closing quote
                }
                tokens.push(Token::new(TokenKind::Character, value.to_string(), line, column));
                continue;
            }

            if self.current() == '-' && self.peek(1).is_ascii_digit() {
                self.advance(); // '-'
                let value = -self.read_number();
                tokens.push(Token::new(TokenKind::Immediate, value.to_string(), line, column));
                continue;
            }

            if self.current().is_ascii_digit() {
                let value = self.read_number();
                tokens.push(Token::new(TokenKind::Immediate, value.to_string(), line, column));
                continue;
            }

            if self.current() == '.' {
                let start = self.pos;
                self.advance(); // '.'
                self.read_identifier();
                let text: String = self.chars[start..self.pos].iter().collect();
                tokens.push(Token::new(TokenKind::Directive, text, line, column));
                continue;
            }

            if self.current().is_alphabetic() || self.current() == '_' {
                let identifier = self.read_identifier();

                let saved_pos = self.pos;
                let saved_line = self.line;
                let saved_column = self.column;
                self.skip_whitespace();
                if self.current() == ':' {
                    self.advance(); // consume the colon
                    tokens.push(Token::new(TokenKind::Label, identifier, line, column));
                    continue;
                }
                self.pos = saved_pos;
                self.line = saved_line;
                self.column = saved_column;

                if is_register_name(&identifier) {
                    tokens.push(Token::new(TokenKind::Register, identifier, line, column));
                } else {
                    tokens.push(Token::new(TokenKind::Instruction, identifier, line, column));
                }
                continue;
            }

            warnings.push(Diagnostic::warning(
                format!("unrecognized character '{}'", self.current()),
                line,
                column,
            ));
            self.advance();
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
        (tokens, warnings)
    }
}
