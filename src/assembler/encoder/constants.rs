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

//! Format tags and per-mnemonic opcode tables. The `(funct4, func3)` pairs for
//! `slt`/`sltu` don't follow the usual "func3 fixed per family" pattern seen
//! elsewhere in the table — that's the real ZX16 ABI, not a typo, and must be
//! preserved verbatim.

pub const FORMAT_R: u16 = 0b000;
pub const FORMAT_I: u16 = 0b001;
pub const FORMAT_B: u16 = 0b010;
pub const FORMAT_S: u16 = 0b011;
pub const FORMAT_L: u16 = 0b100;
pub const FORMAT_J: u16 = 0b101;
pub const FORMAT_U: u16 = 0b110;
pub const FORMAT_SYS: u16 = 0b111;

/// Returns `(funct4, func3)` for an R-type mnemonic.
pub fn r_type(mnemonic: &str) -> Option<(u16, u16)> {
    Some(match mnemonic {
        "add" => (0x0, 0x0),
        "sub" => (0x1, 0x0),
        "slt" => (0x2, 0x1),
        "sltu" => (0x3, 0x2),
        "sll" => (0x4, 0x3),
        "srl" => (0x5, 0x3),
        "sra" => (0x6, 0x3),
        "or" => (0x7, 0x4),
        "and" => (0x8, 0x5),
        "xor" => (0x9, 0x6),
        "mv" => (0xA, 0x7),
        "jr" => (0xB, 0x0),
        "jalr" => (0xC, 0x0),
        _ => return None,
    })
}

/// Returns `func3` for a plain I-type mnemonic (includes `li`, the one
/// pseudo-looking mnemonic that is actually real).
pub fn i_type(mnemonic: &str) -> Option<u16> {
    Some(match mnemonic {
        "addi" => 0x0,
        "slti" => 0x1,
        "sltui" => 0x2,
        "ori" => 0x4,
        "andi" => 0x5,
        "xori" => 0x6,
        "li" => 0x7,
        _ => return None,
    })
}

/// Returns the 3-bit `shift_type` field for a shift mnemonic (func3 is
/// always 0x3 for these).
pub fn shift_type(mnemonic: &str) -> Option<u16> {
    Some(match mnemonic {
        "slli" => 0x1,
        "srli" => 0x2,
        "srai" => 0x4,
        _ => return None,
    })
}

pub fn b_type(mnemonic: &str) -> Option<u16> {
    Some(match mnemonic {
        "beq" => 0x0,
        "bne" => 0x1,
        "bz" => 0x2,
        "bnz" => 0x3,
        "blt" => 0x4,
        "bge" => 0x5,
        "bltu" => 0x6,
        "bgeu" => 0x7,
        _ => return None,
    })
}

pub fn s_type(mnemonic: &str) -> Option<u16> {
    Some(match mnemonic {
        "sb" => 0x0,
        "sw" => 0x1,
        _ => return None,
    })
}

pub fn l_type(mnemonic: &str) -> Option<u16> {
    Some(match mnemonic {
        "lb" => 0x0,
        "lw" => 0x1,
        "lbu" => 0x4,
        _ => return None,
    })
}

pub const PSEUDO_MNEMONICS: &[&str] = &[
    "li16", "la", "push", "pop", "call", "ret", "inc", "dec", "neg", "not", "clr", "nop",
];

pub fn is_pseudo(mnemonic: &str) -> bool {
    PSEUDO_MNEMONICS.contains(&mnemonic)
}
