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

pub mod encoder;
pub mod pseudo;
pub mod sections;
pub mod symbol_table;

use crate::ast::{Token, TokenKind, register_index};
use crate::errors::{AssemblyError, Diagnostic};
use crate::lexer::Lexer;
use sections::{SectionName, Sections};
use symbol_table::SymbolTable;

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }
}

fn parse_imm(token: &Token) -> i64 {
    token.text.parse().unwrap_or(0)
}

fn at_line_end(cursor: &Cursor) -> bool {
    matches!(cursor.current().kind, TokenKind::Newline | TokenKind::Eof)
}

fn at_statement_end(cursor: &Cursor) -> bool {
    matches!(
        cursor.current().kind,
        TokenKind::Newline | TokenKind::Eof | TokenKind::Comment
    )
}

/// Directive-syntax diagnostics (missing/malformed argument) go through
/// `AssemblyError::StructuralError` rather than a bare string, matching the
/// teacher's `errors.rs` shape.
fn structural_error(line: usize, column: usize, reason: impl Into<String>) -> Diagnostic {
    AssemblyError::StructuralError { line, reason: reason.into() }.into_diagnostic_at(column)
}

/// Symbol-table diagnostics (redefinition, undefined reference) go through
/// `AssemblyError::SemanticError`.
fn semantic_error(line: usize, column: usize, reason: impl Into<String>) -> Diagnostic {
    AssemblyError::SemanticError { line, reason: reason.into() }.into_diagnostic_at(column)
}

/// Walks the token list once, sizing instructions and populating the symbol
/// table; `sections` is mutated only for address/section bookkeeping here —
/// no bytes are written. Both passes share `sections` so that whichever
/// section the source code was in when the token stream ran out carries
/// forward, matching the single-assembler-object model described in the
/// design notes.
pub fn pass1(tokens: &[Token], symbols: &mut SymbolTable, sections: &mut Sections, diagnostics: &mut Vec<Diagnostic>) {
    let mut cursor = Cursor::new(tokens);

    while cursor.current().kind != TokenKind::Eof {
        if matches!(cursor.current().kind, TokenKind::Comment | TokenKind::Newline) {
            cursor.advance();
            continue;
        }

        let line = cursor.current().line;
        let column = cursor.current().column;

        if cursor.current().kind == TokenKind::Label {
            let name = cursor.current().text.clone();
            if let Err(msg) = symbols.define(&name, sections.current_address, line, false) {
                diagnostics.push(semantic_error(line, column, msg));
            }
            cursor.advance();
            continue;
        }

        if cursor.current().kind == TokenKind::Directive {
            let directive = cursor.current().text.to_ascii_lowercase();
            cursor.advance();

            match directive.as_str() {
                ".org" => {
                    if cursor.current().kind == TokenKind::Immediate {
                        sections.current_address = parse_imm(cursor.current()) as u16;
                        cursor.advance();
                    } else {
                        diagnostics.push(structural_error(line, column, "expected address after .org"));
                    }
                }
                ".text" => sections.switch(SectionName::Text),
                ".data" => sections.switch(SectionName::Data),
                ".bss" => sections.switch(SectionName::Bss),
                ".equ" | ".set" => {
                    size_equ(&mut cursor, symbols, &directive, line, column, diagnostics);
                }
                ".global" => {
                    if cursor.current().kind == TokenKind::Instruction {
                        let name = cursor.current().text.clone();
                        symbols.mark_global(&name);
                        cursor.advance();
                    } else {
                        diagnostics.push(structural_error(line, column, "expected symbol name after .global"));
                    }
                }
                ".byte" => {
                    while matches!(cursor.current().kind, TokenKind::Immediate | TokenKind::Character) {
                        sections.current_address = sections.current_address.wrapping_add(1);
                        cursor.advance();
                        if cursor.current().kind == TokenKind::Comma {
                            cursor.advance();
                        } else {
                            break;
                        }
                    }
                }
                ".word" => {
                    while cursor.current().kind == TokenKind::Immediate {
                        sections.current_address = sections.current_address.wrapping_add(2);
                        cursor.advance();
                        if cursor.current().kind == TokenKind::Comma {
                            cursor.advance();
                        } else {
                            break;
                        }
                    }
                }
                ".string" | ".ascii" => {
                    if cursor.current().kind == TokenKind::String {
                        let mut len = cursor.current().text.len() as u16;
                        if directive == ".string" {
                            len += 1;
                        }
                        sections.current_address = sections.current_address.wrapping_add(len);
                        cursor.advance();
                    } else {
                        diagnostics.push(structural_error(line, column, format!("expected string after {directive}")));
                    }
                }
                ".space" => {
                    if cursor.current().kind == TokenKind::Immediate {
                        let count = parse_imm(cursor.current());
                        sections.current_address = sections.current_address.wrapping_add(count as u16);
                        cursor.advance();
                    } else {
                        diagnostics.push(structural_error(line, column, "expected size after .space"));
                    }
                }
                _ => {}
            }

            while !at_line_end(&cursor) {
                cursor.advance();
            }
            continue;
        }

        if cursor.current().kind == TokenKind::Instruction {
            let mnemonic = cursor.current().text.to_ascii_lowercase();
            cursor.advance();

            let mut li_immediate = None;
            let mut li_symbolic = false;
            if mnemonic == "li" {
                let saved = cursor.pos;
                while !at_statement_end(&cursor) {
                    match cursor.current().kind {
                        TokenKind::Immediate | TokenKind::Character => {
                            li_immediate = Some(parse_imm(cursor.current()));
                        }
                        // A symbol operand's value isn't known until the whole
                        // file has been walked (it may be a forward
                        // reference), so its 7-bit fit can't be decided here.
                        // Size it as the 4-byte li16 expansion unconditionally
                        // and force pass 2 to match, keeping size(pass1) ==
                        // bytes_emitted(pass2) exact instead of depending on
                        // where in the file the symbol happens to be defined.
                        TokenKind::Instruction => li_symbolic = true,
                        _ => {}
                    }
                    cursor.advance();
                }
                cursor.pos = saved;
            }

            while !at_statement_end(&cursor) {
                cursor.advance();
            }

            let size = if li_symbolic {
                4
            } else {
                encoder::instruction_size(&mnemonic, li_immediate)
            };
            sections.current_address = sections.current_address.wrapping_add(size as u16);
            continue;
        }

        cursor.advance();
    }
}

fn size_equ(
    cursor: &mut Cursor,
    symbols: &mut SymbolTable,
    directive: &str,
    line: usize,
    column: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if cursor.current().kind != TokenKind::Instruction {
        diagnostics.push(structural_error(line, column, format!("expected symbol name after {directive}")));
        return;
    }
    let name = cursor.current().text.clone();
    cursor.advance();
    if cursor.current().kind == TokenKind::Comma {
        cursor.advance();
    }
    if cursor.current().kind == TokenKind::Immediate {
        let value = parse_imm(cursor.current()) as u16;
        cursor.advance();
        if let Err(msg) = symbols.define(&name, value, line, false) {
            diagnostics.push(semantic_error(line, column, msg));
        }
    } else if cursor.current().kind == TokenKind::Instruction {
        let reference = cursor.current().text.clone();
        cursor.advance();
        match symbols.get(&reference) {
            Some(existing) if existing.defined => {
                let value = existing.value;
                if let Err(msg) = symbols.define(&name, value, line, false) {
                    diagnostics.push(semantic_error(line, column, msg));
                }
            }
            _ => diagnostics.push(semantic_error(line, column, format!("undefined symbol '{reference}' in {directive}"))),
        }
    } else {
        diagnostics.push(structural_error(line, column, "expected value after symbol name"));
    }
}

fn operand_count_error(mnemonic: &str, line: usize, needed: usize, got: usize) -> AssemblyError {
    AssemblyError::OperandCountError {
        line,
        reason: format!("{mnemonic} requires {needed} operand(s), got {got}"),
    }
}

/// Encodes one source statement to its constituent 16-bit words. Returns the
/// words to emit (empty on error), the number of bytes pass 1 already
/// budgeted for this statement, and the error if any — on error, the caller
/// advances `current_address` by that byte count without writing anything,
/// keeping pass 1's sizing and pass 2's addressing in lockstep even when
/// encoding fails. `li_symbolic` mirrors pass 1's choice to always budget 4
/// bytes for `li` with a symbol operand (its value may be a forward
/// reference pass 1 can't peek), so pass 2 must take the li16 expansion here
/// too regardless of whether the resolved value would actually fit in 7 bits.
fn encode_statement(mnemonic: &str, operands: &[i64], pc: u16, line: usize, li_symbolic: bool) -> (Vec<u16>, u32, Option<AssemblyError>) {
    if mnemonic == "li" {
        if operands.len() < 2 {
            return (Vec::new(), 2, Some(operand_count_error("li", line, 2, operands.len())));
        }
        let (rd, imm) = (operands[0], operands[1]);
        if !li_symbolic && (-64..=63).contains(&imm) {
            match encoder::encode_instruction("li", operands, pc, line) {
                Ok(word) => (vec![word], 2, None),
                Err(err) => (Vec::new(), 2, Some(err)),
            }
        } else {
            match pseudo::expand("li16", &[rd, imm], pc, line) {
                Ok(steps) => encode_steps(&steps, pc, line, 4),
                Err(err) => (Vec::new(), 4, Some(err)),
            }
        }
    } else if encoder::constants::is_pseudo(mnemonic) {
        let size = encoder::instruction_size(mnemonic, None);
        match pseudo::expand(mnemonic, operands, pc, line) {
            Ok(steps) => encode_steps(&steps, pc, line, size),
            Err(err) => (Vec::new(), size, Some(err)),
        }
    } else {
        match encoder::encode_instruction(mnemonic, operands, pc, line) {
            Ok(word) => (vec![word], 2, None),
            Err(err) => (Vec::new(), 2, Some(err)),
        }
    }
}

fn encode_steps(steps: &[(String, Vec<i64>)], pc: u16, line: usize, size: u32) -> (Vec<u16>, u32, Option<AssemblyError>) {
    let mut words = Vec::with_capacity(steps.len());
    for (mnemonic, operands) in steps {
        match encoder::encode_instruction(mnemonic, operands, pc, line) {
            Ok(word) => words.push(word),
            Err(err) => return (Vec::new(), size, Some(err)),
        }
    }
    (words, size, None)
}

/// Re-walks the token list, this time resolving symbols and writing bytes.
/// Pass 1 leaves `sections`'s cursor wherever the last statement left it, so
/// this re-bases it to the implicit starting section before walking —
/// otherwise a program with no leading `.text`/`.data`/`.bss` directive would
/// encode every statement against pass 1's end-of-program address instead of
/// the real one.
pub fn pass2(tokens: &[Token], symbols: &mut SymbolTable, sections: &mut Sections, errors: &mut Vec<Diagnostic>) {
    sections.switch(SectionName::Text);
    let mut cursor = Cursor::new(tokens);

    while cursor.current().kind != TokenKind::Eof {
        if matches!(cursor.current().kind, TokenKind::Comment | TokenKind::Newline) {
            cursor.advance();
            continue;
        }

        let line = cursor.current().line;
        let column = cursor.current().column;

        if cursor.current().kind == TokenKind::Label {
            cursor.advance();
            continue;
        }

        if cursor.current().kind == TokenKind::Directive {
            let directive = cursor.current().text.to_ascii_lowercase();
            cursor.advance();

            match directive.as_str() {
                ".org" => {
                    if cursor.current().kind == TokenKind::Immediate {
                        sections.current_address = parse_imm(cursor.current()) as u16;
                        cursor.advance();
                    }
                }
                ".text" => sections.switch(SectionName::Text),
                ".data" => sections.switch(SectionName::Data),
                ".bss" => sections.switch(SectionName::Bss),
                ".byte" => {
                    while matches!(cursor.current().kind, TokenKind::Immediate | TokenKind::Character) {
                        let value = (parse_imm(cursor.current()) & 0xFF) as u8;
                        sections.push_byte(value);
                        cursor.advance();
                        if cursor.current().kind == TokenKind::Comma {
                            cursor.advance();
                        } else {
                            break;
                        }
                    }
                }
                ".word" => {
                    while cursor.current().kind == TokenKind::Immediate {
                        let value = (parse_imm(cursor.current()) & 0xFFFF) as u16;
                        sections.push_word_le(value);
                        cursor.advance();
                        if cursor.current().kind == TokenKind::Comma {
                            cursor.advance();
                        } else {
                            break;
                        }
                    }
                }
                ".string" | ".ascii" => {
                    if cursor.current().kind == TokenKind::String {
                        let text = cursor.current().text.clone();
                        for byte in text.as_bytes() {
                            sections.push_byte(*byte);
                        }
                        if directive == ".string" {
                            sections.push_byte(0);
                        }
                        cursor.advance();
                    }
                }
                ".space" => {
                    if cursor.current().kind == TokenKind::Immediate {
                        let count = parse_imm(cursor.current()).max(0) as usize;
                        sections.extend_zeros(count);
                        cursor.advance();
                    }
                }
                _ => {}
            }

            while !at_line_end(&cursor) {
                cursor.advance();
            }
            continue;
        }

        if cursor.current().kind == TokenKind::Instruction {
            let mnemonic = cursor.current().text.to_ascii_lowercase();
            cursor.advance();

            let mut operands = Vec::new();
            let mut li_symbolic = false;
            while !at_statement_end(&cursor) {
                match cursor.current().kind {
                    TokenKind::Comma => {
                        cursor.advance();
                    }
                    TokenKind::Register => {
                        let index = register_index(&cursor.current().text).unwrap_or(0);
                        operands.push(index as i64);
                        cursor.advance();
                    }
                    TokenKind::Immediate | TokenKind::Character => {
                        operands.push(parse_imm(cursor.current()));
                        cursor.advance();
                    }
                    TokenKind::Instruction => {
                        let name = cursor.current().text.clone();
                        if mnemonic == "li" {
                            li_symbolic = true;
                        }
                        match symbols.resolve(&name) {
                            Ok(value) => operands.push(value as i64),
                            Err(msg) => {
                                errors.push(semantic_error(line, column, msg));
                                operands.push(0);
                            }
                        }
                        cursor.advance();
                    }
                    TokenKind::LParen => {
                        cursor.advance();
                        if cursor.current().kind == TokenKind::Register {
                            let index = register_index(&cursor.current().text).unwrap_or(0);
                            operands.push(index as i64);
                            cursor.advance();
                        }
                        if cursor.current().kind == TokenKind::RParen {
                            cursor.advance();
                        }
                    }
                    _ => cursor.advance(),
                }
            }

            let (words, size, err) = encode_statement(&mnemonic, &operands, sections.current_address, line, li_symbolic);
            match err {
                None => {
                    for word in &words {
                        sections.push_word_le(*word);
                    }
                }
                Some(assembly_error) => {
                    errors.push(assembly_error.into_diagnostic());
                    sections.current_address = sections.current_address.wrapping_add(size as u16);
                }
            }
            continue;
        }

        cursor.advance();
    }
}

/// Aggregates all mutable state for one assemble invocation: the symbol
/// table, the three sections, and the error/warning lists. A fresh instance
/// starts with a pristine, builtin-seeded symbol table and empty sections.
pub struct Assembler {
    pub symbols: SymbolTable,
    pub sections: Sections,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            symbols: SymbolTable::new(),
            sections: Sections::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Assembles `source`, returning `true` iff no Error-severity diagnostic
    /// was recorded. Unlike the reference implementation this was distilled
    /// from, pass 2 always runs regardless of whether pass 1 reported
    /// errors — the `size(pass1) == bytes_emitted(pass2)` invariant is only
    /// meaningful if pass 2 executes.
    pub fn assemble(&mut self, source: &str, _filename: &str) -> bool {
        let (tokens, lex_warnings) = Lexer::new(source).tokenize();
        self.warnings.extend(lex_warnings);

        pass1(&tokens, &mut self.symbols, &mut self.sections, &mut self.errors);
        pass2(&tokens, &mut self.symbols, &mut self.sections, &mut self.errors);

        !self.errors.iter().any(|d| d.severity == crate::errors::Severity::Error)
    }

    pub fn get_binary_output(&self) -> Vec<u8> {
        crate::output::to_binary_image(self)
    }

    pub fn get_intel_hex_output(&self) -> String {
        crate::output::to_intel_hex(self)
    }

    pub fn get_hdl_output(&self, module_name: &str) -> String {
        crate::output::to_hdl_output(self, module_name)
    }

    pub fn get_memory_file_output(&self, sparse: bool) -> String {
        crate::output::to_memory_file(self, sparse)
    }

    pub fn get_listing(&self, source_lines: &[&str]) -> String {
        crate::output::get_listing(self, source_lines)
    }
}
