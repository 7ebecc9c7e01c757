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

//! Renders an assembled image into the four output formats: a flat binary
//! memory image, Intel HEX, a synthesizable Verilog lookup ROM, and a plain
//! memory-initialization file — plus a human-readable listing.

use crate::assembler::Assembler;
use crate::assembler::sections::SectionName;

const MEMORY_SIZE: usize = 0x10000;

/// Lays `.text` and `.data` into a 64 KiB flat image at their section base
/// addresses. `.bss` is never written — it occupies address space but
/// contributes no bytes to the image, the same as on the target.
pub fn to_binary_image(assembler: &Assembler) -> Vec<u8> {
    let mut image = vec![0u8; MEMORY_SIZE];
    place(&mut image, SectionName::Text.base_address(), &assembler.sections.text.bytes);
    place(&mut image, SectionName::Data.base_address(), &assembler.sections.data.bytes);
    image
}

fn place(image: &mut [u8], base: u16, bytes: &[u8]) {
    let base = base as usize;
    for (offset, byte) in bytes.iter().enumerate() {
        if let Some(slot) = image.get_mut(base + offset) {
            *slot = *byte;
        }
    }
}

fn hex_record(address: u16, record_type: u8, data: &[u8]) -> String {
    let len = data.len() as u8;
    let mut sum: u32 = len as u32 + ((address >> 8) as u32) + ((address & 0xFF) as u32) + record_type as u32;
    for byte in data {
        sum += *byte as u32;
    }
    let checksum = (!(sum as u8)).wrapping_add(1);

    let mut line = format!(":{len:02X}{address:04X}{record_type:02X}");
    for byte in data {
        line.push_str(&format!("{byte:02X}"));
    }
    line.push_str(&format!("{checksum:02X}"));
    line
}

/// Emits one Intel HEX data record (type `00`) per 16-byte chunk of each
/// non-empty section, followed by the end-of-file record.
pub fn to_intel_hex(assembler: &Assembler) -> String {
    let mut lines = Vec::new();
    for (base, bytes) in [
        (SectionName::Text.base_address(), &assembler.sections.text.bytes),
        (SectionName::Data.base_address(), &assembler.sections.data.bytes),
    ] {
        for (chunk_index, chunk) in bytes.chunks(16).enumerate() {
            let address = base.wrapping_add((chunk_index * 16) as u16);
            lines.push(hex_record(address, 0x00, chunk));
        }
    }
    lines.push(":00000001FF".to_string());
    lines.join("\n") + "\n"
}

/// Emits a synthesizable Verilog module exposing `.text` then `.data` as a
/// combinational `case` over the 16-bit address, one arm per 2-byte
/// little-endian word; any address outside the assembled image reads as
/// zero.
pub fn to_hdl_output(assembler: &Assembler, module_name: &str) -> String {
    let mut words: Vec<(u16, u16)> = Vec::new();
    let mut address = SectionName::Text.base_address();
    for chunk in assembler.sections.text.bytes.chunks(2) {
        words.push((address, word_le(chunk)));
        address = address.wrapping_add(2);
    }
    address = SectionName::Data.base_address();
    for chunk in assembler.sections.data.bytes.chunks(2) {
        words.push((address, word_le(chunk)));
        address = address.wrapping_add(2);
    }

    let mut out = String::new();
    out.push_str(&format!("module {module_name} (\n"));
    out.push_str("    input  wire [15:0] addr,\n");
    out.push_str("    output reg  [15:0] data\n");
    out.push_str(");\n\n");
    out.push_str("    always @(*) begin\n");
    out.push_str("        case (addr)\n");
    for (addr, word) in &words {
        out.push_str(&format!("            16'h{addr:04X}: data = 16'h{word:04X};\n"));
    }
    out.push_str("            default: data = 16'h0000;\n");
    out.push_str("        endcase\n");
    out.push_str("    end\n\n");
    out.push_str("endmodule\n");
    out
}

fn word_le(chunk: &[u8]) -> u16 {
    let lo = chunk[0] as u16;
    let hi = *chunk.get(1).unwrap_or(&0) as u16;
    lo | (hi << 8)
}

/// Emits a memory-initialization file. Dense mode writes every one of the
/// 32768 16-bit words of the flat image in order, one 4-hex-digit line each;
/// sparse mode walks only `.text` then `.data` (matching the original's two
/// memory-file modes) and emits one `@addr word` line per word, addressed by
/// byte offset — not by word index — since that's what the original emits.
pub fn to_memory_file(assembler: &Assembler, sparse: bool) -> String {
    if sparse {
        let mut out = String::new();
        for (base, bytes) in [
            (SectionName::Text.base_address(), &assembler.sections.text.bytes),
            (SectionName::Data.base_address(), &assembler.sections.data.bytes),
        ] {
            let mut address = base;
            for chunk in bytes.chunks(2) {
                if chunk.len() == 2 {
                    out.push_str(&format!("@{address:04X} {:04X}\n", word_le(chunk)));
                }
                address = address.wrapping_add(2);
            }
        }
        return out;
    }

    let image = to_binary_image(assembler);
    let mut out = String::new();
    for word_index in 0..(MEMORY_SIZE / 2) {
        let lo = image[word_index * 2];
        let hi = image[word_index * 2 + 1];
        out.push_str(&format!("{:04X}\n", (lo as u16) | ((hi as u16) << 8)));
    }
    out
}

/// Produces a listing: the source annotated with 4-digit line numbers,
/// followed by the symbol table (built-ins excluded) and a statistics block.
pub fn get_listing(assembler: &Assembler, source_lines: &[&str]) -> String {
    let mut out = String::new();
    out.push_str("; ZX16 assembly listing\n");
    out.push_str(";\n");
    for (index, line) in source_lines.iter().enumerate() {
        out.push_str(&format!("{:04}  {}\n", index + 1, line));
    }

    out.push_str("\n; Symbol table\n");
    let mut symbols: Vec<_> = assembler.symbols.iter().filter(|symbol| !symbol.name.starts_with("__")).collect();
    symbols.sort_by(|a, b| a.name.cmp(&b.name));
    for symbol in symbols {
        let scope = if symbol.global { "global" } else { "local" };
        out.push_str(&format!("; {} = 0x{:04X} ({})\n", symbol.name, symbol.value, scope));
    }

    let code_size = assembler.sections.text.bytes.len();
    let data_size = assembler.sections.data.bytes.len();
    let symbol_count = assembler.symbols.iter().filter(|symbol| !symbol.name.starts_with("__")).count();
    out.push_str("\n; Statistics\n");
    out.push_str(&format!("; code size:   {code_size} bytes\n"));
    out.push_str(&format!("; data size:   {data_size} bytes\n"));
    out.push_str(&format!("; total size:  {} bytes\n", code_size + data_size));
    out.push_str(&format!("; symbols:     {symbol_count}\n"));
    out.push_str(&format!("; lines:       {}\n", source_lines.len()));
    out
}
