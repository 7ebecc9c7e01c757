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

//! Token and register types shared by the lexer and the two assembly passes.

/// Lexical category of a [`Token`]. An identifier that is neither a register
/// name nor immediately followed by `:` is tagged `Instruction` regardless of
/// whether it turns out to name a real mnemonic or a symbol reference used as
/// an operand — the distinction is made later, by the statement walker that
/// already knows which position it's looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Instruction,
    Register,
    Immediate,
    Label,
    Directive,
    String,
    Character,
    Comment,
    Newline,
    Comma,
    Colon,
    LParen,
    RParen,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

/// Maps a register name (canonical `x0`..`x7` or ABI alias) to its 3-bit
/// index, case-insensitively. Returns `None` for anything else.
pub fn register_index(name: &str) -> Option<u8> {
    match name.to_ascii_lowercase().as_str() {
        "x0" | "t0" => Some(0),
        "x1" | "ra" => Some(1),
        "x2" | "sp" => Some(2),
        "x3" | "s0" => Some(3),
        "x4" | "s1" => Some(4),
        "x5" | "t1" => Some(5),
        "x6" | "a0" => Some(6),
        "x7" | "a1" => Some(7),
        _ => None,
    }
}

pub fn is_register_name(name: &str) -> bool {
    register_index(name).is_some()
}
