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

use zx16asm::Assembler;

fn assemble_ok(source: &str) -> Assembler {
    let mut assembler = Assembler::new();
    let ok = assembler.assemble(source, "<test>");
    assert!(
        ok,
        "expected successful assembly, got errors: {:?}",
        assembler.errors
    );
    assembler
}

#[test]
fn nop_emits_single_zero_word() {
    let assembler = assemble_ok("nop\n");
    assert_eq!(assembler.sections.text.bytes, vec![0x00, 0x00]);
}

#[test]
fn addi_t0_5_emits_expected_word() {
    let assembler = assemble_ok("addi t0, 5\n");
    assert_eq!(assembler.sections.text.bytes, vec![0x01, 0x0A]);
}

#[test]
fn li_a0_100_expands_to_lui_ori_pair() {
    let assembler = assemble_ok("li a0, 100\n");
    // lui a0,0 -> 0x0186; ori a0,100 -> 0xC9A1 (per the U/I-type bit layout in §4.4)
    assert_eq!(assembler.sections.text.bytes, vec![0x86, 0x01, 0xA1, 0xC9]);
}

#[test]
fn li_small_immediate_stays_one_word() {
    let assembler = assemble_ok("li a0, 63\n");
    assert_eq!(assembler.sections.text.bytes.len(), 2);
}

#[test]
fn li_boundary_immediate_expands_to_two_words() {
    let assembler = assemble_ok("li a0, 64\n");
    assert_eq!(assembler.sections.text.bytes.len(), 4);
}

#[test]
fn self_referencing_branch_label() {
    let assembler = assemble_ok("L1: beq t0, t1, L1\n");
    assert_eq!(assembler.sections.text.bytes, vec![0x02, 0xFA]);
}

#[test]
fn data_section_words_are_little_endian() {
    let assembler = assemble_ok(".data\n.word 0x1234, 0xABCD\n");
    assert_eq!(assembler.sections.data.bytes, vec![0x34, 0x12, 0xCD, 0xAB]);
}

#[test]
fn bss_space_reserves_zero_bytes_without_emitting_in_text() {
    let assembler = assemble_ok(".bss\n.space 28\n");
    assert_eq!(assembler.sections.bss.bytes.len(), 28);
    assert!(assembler.sections.bss.bytes.iter().all(|&b| b == 0));

    let image = assembler.get_binary_output();
    assert!(image[0x9000..0x901C].iter().all(|&b| b == 0));
}

#[test]
fn forward_reference_resolves_after_pass_one() {
    let assembler = assemble_ok("j L1\nnop\nL1: nop\n");
    assert!(assembler.errors.is_empty());
    assert_eq!(assembler.sections.text.bytes.len(), 6);
}

#[test]
fn undefined_symbol_is_reported_but_pass_two_still_runs() {
    let mut assembler = Assembler::new();
    let ok = assembler.assemble("la a0, missing\naddi t0, 1\n", "<test>");
    assert!(!ok);
    assert!(!assembler.errors.is_empty());
    // pass 2 still ran and emitted bytes for the statement after the bad one.
    assert!(assembler.sections.text.bytes.len() >= 2);
}

#[test]
fn pseudo_push_pop_round_trip() {
    let assembler = assemble_ok("push a0\npop a0\n");
    // push -> addi sp,-2 ; sw a0,0(sp)   pop -> lw a0,0(sp) ; addi sp,2
    assert_eq!(assembler.sections.text.bytes.len(), 8);
}

#[test]
fn li_with_symbol_operand_always_sizes_as_four_bytes() {
    // LIMIT's value (5) would fit in li's 7-bit direct form, but a symbol
    // operand might be a forward reference pass 1 can't peek, so li with any
    // symbol operand always takes the li16 (4-byte) expansion in both
    // passes, keeping size(pass1) == bytes_emitted(pass2) regardless of
    // where LIMIT is defined relative to this statement.
    let assembler = assemble_ok(".equ LIMIT, 5\nli t0, LIMIT\n");
    assert_eq!(assembler.sections.text.bytes.len(), 4);
}

#[test]
fn li_with_forward_referenced_symbol_stays_in_sync() {
    let assembler = assemble_ok("li t0, LATER\nnop\n.equ LATER, 3\n");
    assert!(assembler.errors.is_empty());
    // li expands to 4 bytes (lui+ori) even though LATER's value would fit
    // the direct 7-bit form; nop follows as 2 more bytes.
    assert_eq!(assembler.sections.text.bytes.len(), 6);
}

#[test]
fn equ_defines_usable_constant() {
    let assembler = assemble_ok(".equ LIMIT, 10\naddi t0, LIMIT\n");
    // I-type: (10<<9)|(0<<6)|(0<<3)|FORMAT_I(1) = 0x1401
    assert_eq!(assembler.sections.text.bytes, vec![0x01, 0x14]);
}

#[test]
fn builtin_symbols_are_preseeded() {
    let assembler = Assembler::new();
    assert_eq!(assembler.symbols.resolve("__ZX16__"), Ok(1));
    assert_eq!(assembler.symbols.resolve("CODE_START"), Ok(0x0020));
    assert_eq!(assembler.symbols.resolve("A1"), Ok(7));
}

#[test]
fn intel_hex_output_ends_with_eof_record() {
    let assembler = assemble_ok("nop\n");
    let hex = assembler.get_intel_hex_output();
    assert!(hex.trim_end().ends_with(":00000001FF"));
}
