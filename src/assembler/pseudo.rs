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

//! Rewrites convenience mnemonics into sequences of real `(mnemonic,
//! operands)` pairs. Pure: by the time this runs, pass 2 has already resolved
//! every symbol-name operand to an integer, so expansion only ever sees
//! register indices and already-resolved values.

use crate::ast::register_index;
use crate::assembler::encoder::utility_functions::sign_extend;
use crate::errors::AssemblyError;

fn sp() -> i64 {
    register_index("sp").unwrap() as i64
}

fn ra() -> i64 {
    register_index("ra").unwrap() as i64
}

fn count_error(mnemonic: &str, line: usize, needed: usize, got: usize) -> AssemblyError {
    AssemblyError::OperandCountError {
        line,
        reason: format!("{mnemonic} requires {needed} operand(s), got {got}"),
    }
}

pub fn expand(
    mnemonic: &str,
    operands: &[i64],
    current_pc: u16,
    line: usize,
) -> Result<Vec<(String, Vec<i64>)>, AssemblyError> {
    let mut out = Vec::new();

    match mnemonic {
        "li16" => {
            if operands.len() != 2 {
                return Err(count_error(mnemonic, line, 2, operands.len()));
            }
            let (rd, imm16) = (operands[0], operands[1]);
            let upper = (imm16 >> 7) & 0x1FF;
            let lower = imm16 & 0x7F;
            out.push(("lui".to_string(), vec![rd, upper]));
            out.push(("ori".to_string(), vec![rd, lower]));
        }
        "la" => {
            if operands.len() != 2 {
                return Err(count_error(mnemonic, line, 2, operands.len()));
            }
            let (rd, target) = (operands[0], operands[1]);
            let offset = target - current_pc as i64;
            // Corrected decomposition (see §9 of the design notes): the
            // lower half is the sign-extended low 7 bits of the offset, and
            // the upper half absorbs whatever that sign-extension borrowed.
            let lower = sign_extend(offset, 7);
            let upper = (offset - lower) >> 7;
            out.push(("auipc".to_string(), vec![rd, upper & 0x1FF]));
            out.push(("addi".to_string(), vec![rd, lower]));
        }
        "push" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            let rs = operands[0];
            out.push(("addi".to_string(), vec![sp(), -2]));
            out.push(("sw".to_string(), vec![rs, 0, sp()]));
        }
        "pop" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            let rd = operands[0];
            out.push(("lw".to_string(), vec![rd, 0, sp()]));
            out.push(("addi".to_string(), vec![sp(), 2]));
        }
        "call" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            out.push(("jal".to_string(), vec![ra(), operands[0]]));
        }
        "ret" => {
            if !operands.is_empty() {
                return Err(count_error(mnemonic, line, 0, operands.len()));
            }
            out.push(("jr".to_string(), vec![ra(), 0]));
        }
        "inc" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            out.push(("addi".to_string(), vec![operands[0], 1]));
        }
        "dec" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            out.push(("addi".to_string(), vec![operands[0], -1]));
        }
        "neg" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            let rd = operands[0];
            out.push(("xori".to_string(), vec![rd, -1]));
            out.push(("addi".to_string(), vec![rd, 1]));
        }
        "not" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            out.push(("xori".to_string(), vec![operands[0], -1]));
        }
        "clr" => {
            if operands.len() != 1 {
                return Err(count_error(mnemonic, line, 1, operands.len()));
            }
            let rd = operands[0];
            out.push(("xor".to_string(), vec![rd, rd]));
        }
        "nop" => {
            if !operands.is_empty() {
                return Err(count_error(mnemonic, line, 0, operands.len()));
            }
            out.push(("add".to_string(), vec![0, 0]));
        }
        _ => {
            return Err(AssemblyError::UnknownMnemonic {
                line,
                name: mnemonic.to_string(),
            });
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn la_matches_corrected_decomposition_for_negative_offset() {
        // label at 0x0000, PC at 0x0020 -> offset = -0x20 = -32
        let expanded = expand("la", &[6, 0x0000], 0x0020, 1).unwrap();
        assert_eq!(expanded[0].0, "auipc");
        assert_eq!(expanded[1].0, "addi");
        let upper = expanded[0].1[1];
        let lower = expanded[1].1[1];
        assert_eq!(upper * 128 + lower, -32);
    }

    #[test]
    fn push_then_pop_round_trip_register() {
        let push = expand("push", &[6], 0x0020, 1).unwrap();
        assert_eq!(push[0], ("addi".to_string(), vec![sp(), -2]));
        assert_eq!(push[1], ("sw".to_string(), vec![6, 0, sp()]));

        let pop = expand("pop", &[6], 0x0020, 1).unwrap();
        assert_eq!(pop[0], ("lw".to_string(), vec![6, 0, sp()]));
        assert_eq!(pop[1], ("addi".to_string(), vec![sp(), 2]));
    }

    #[test]
    fn nop_expands_to_add_x0_x0() {
        assert_eq!(expand("nop", &[], 0, 1).unwrap(), vec![("add".to_string(), vec![0, 0])]);
    }
}
