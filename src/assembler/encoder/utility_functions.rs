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

use super::constants::*;

/// Sign-extends `value`'s low `bits` bits to a full-width signed integer.
pub fn sign_extend(value: i64, bits: u32) -> i64 {
    let sign_bit = 1i64 << (bits - 1);
    let mask = (1i64 << bits) - 1;
    let truncated = value & mask;
    if truncated & sign_bit != 0 {
        truncated | !mask
    } else {
        truncated
    }
}

pub fn pack_r_type(funct4: u16, rs2: u16, rd: u16, func3: u16) -> u16 {
    (funct4 << 12) | (rs2 << 9) | (rd << 6) | (func3 << 3) | FORMAT_R
}

pub fn pack_i_type(imm7: u16, rd: u16, func3: u16) -> u16 {
    ((imm7 & 0x7F) << 9) | (rd << 6) | (func3 << 3) | FORMAT_I
}

pub fn pack_b_type(imm_hi: u16, rs2: u16, rs1: u16, func3: u16) -> u16 {
    (imm_hi << 12) | (rs2 << 9) | (rs1 << 6) | (func3 << 3) | FORMAT_B
}

pub fn pack_s_type(imm4: u16, rs2: u16, rs1: u16, func3: u16) -> u16 {
    (imm4 << 12) | (rs2 << 9) | (rs1 << 6) | (func3 << 3) | FORMAT_S
}

pub fn pack_l_type(imm4: u16, rs2: u16, rd: u16, func3: u16) -> u16 {
    (imm4 << 12) | (rs2 << 9) | (rd << 6) | (func3 << 3) | FORMAT_L
}

pub fn pack_j_type(link: u16, imm_hi: u16, rd: u16, imm_lo: u16) -> u16 {
    (link << 15) | (imm_hi << 9) | (rd << 6) | (imm_lo << 3) | FORMAT_J
}

pub fn pack_u_type(flag: u16, imm_hi: u16, rd: u16, imm_lo: u16) -> u16 {
    (flag << 15) | (imm_hi << 9) | (rd << 6) | (imm_lo << 3) | FORMAT_U
}

pub fn pack_sys_type(svc: u16) -> u16 {
    (svc << 6) | FORMAT_SYS
}
