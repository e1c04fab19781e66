// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! WDC 65C02 instruction table in SAN (operand-first) mnemonic form.
//!
//! SAN names carry the addressing mode as a suffix: `lda.#` immediate,
//! `lda.z` zero page, `lda.zx` zero page X, `lda.zxi` (zp,X), `lda.ziy`
//! (zp),Y, `lda.zi` (zp), `lda.x`/`lda.y` absolute indexed, `jmp.i` (abs),
//! `jmp.xi` (abs,X), `asl.a` accumulator. Plain names are absolute, implied
//! or relative depending on the instruction.

/// Addressing modes of the 65C02.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    ZeroPageIndirect,
    ZeroPageXIndirect,
    ZeroPageIndirectY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    AbsoluteIndirect,
    AbsoluteXIndirect,
    ZeroPageRelative,
}

impl AddressMode {
    /// Operand bytes following the opcode.
    pub const fn operand_size(self) -> u8 {
        match self {
            AddressMode::Implied | AddressMode::Accumulator => 0,
            AddressMode::Immediate
            | AddressMode::ZeroPage
            | AddressMode::ZeroPageX
            | AddressMode::ZeroPageY
            | AddressMode::ZeroPageIndirect
            | AddressMode::ZeroPageXIndirect
            | AddressMode::ZeroPageIndirectY
            | AddressMode::Relative => 1,
            AddressMode::Absolute
            | AddressMode::AbsoluteX
            | AddressMode::AbsoluteY
            | AddressMode::AbsoluteIndirect
            | AddressMode::AbsoluteXIndirect
            | AddressMode::ZeroPageRelative => 2,
        }
    }

    /// Suffix appended to the base mnemonic in SAN notation.
    pub const fn san_suffix(self) -> &'static str {
        match self {
            AddressMode::Implied
            | AddressMode::Relative
            | AddressMode::Absolute
            | AddressMode::ZeroPageRelative => "",
            AddressMode::Accumulator => ".a",
            AddressMode::Immediate => ".#",
            AddressMode::ZeroPage => ".z",
            AddressMode::ZeroPageX => ".zx",
            AddressMode::ZeroPageY => ".zy",
            AddressMode::ZeroPageIndirect => ".zi",
            AddressMode::ZeroPageXIndirect => ".zxi",
            AddressMode::ZeroPageIndirectY => ".ziy",
            AddressMode::AbsoluteX => ".x",
            AddressMode::AbsoluteY => ".y",
            AddressMode::AbsoluteIndirect => ".i",
            AddressMode::AbsoluteXIndirect => ".xi",
        }
    }
}

pub struct FamilyInstructionEntry {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddressMode,
}

impl FamilyInstructionEntry {
    pub const fn length(&self) -> u8 {
        1 + self.mode.operand_size()
    }
}

const fn op(opcode: u8, mnemonic: &'static str, mode: AddressMode) -> FamilyInstructionEntry {
    FamilyInstructionEntry {
        opcode,
        mnemonic,
        mode,
    }
}

use AddressMode::*;

/// Every documented 65C02 opcode, ordered by opcode value.
pub static FAMILY_INSTRUCTION_TABLE: &[FamilyInstructionEntry] = &[
    op(0x00, "brk", Implied),
    op(0x01, "ora.zxi", ZeroPageXIndirect),
    op(0x04, "tsb.z", ZeroPage),
    op(0x05, "ora.z", ZeroPage),
    op(0x06, "asl.z", ZeroPage),
    op(0x07, "rmb0", ZeroPage),
    op(0x08, "php", Implied),
    op(0x09, "ora.#", Immediate),
    op(0x0A, "asl.a", Accumulator),
    op(0x0C, "tsb", Absolute),
    op(0x0D, "ora", Absolute),
    op(0x0E, "asl", Absolute),
    op(0x0F, "bbr0", ZeroPageRelative),
    op(0x10, "bpl", Relative),
    op(0x11, "ora.ziy", ZeroPageIndirectY),
    op(0x12, "ora.zi", ZeroPageIndirect),
    op(0x14, "trb.z", ZeroPage),
    op(0x15, "ora.zx", ZeroPageX),
    op(0x16, "asl.zx", ZeroPageX),
    op(0x17, "rmb1", ZeroPage),
    op(0x18, "clc", Implied),
    op(0x19, "ora.y", AbsoluteY),
    op(0x1A, "inc.a", Accumulator),
    op(0x1C, "trb", Absolute),
    op(0x1D, "ora.x", AbsoluteX),
    op(0x1E, "asl.x", AbsoluteX),
    op(0x1F, "bbr1", ZeroPageRelative),
    op(0x20, "jsr", Absolute),
    op(0x21, "and.zxi", ZeroPageXIndirect),
    op(0x24, "bit.z", ZeroPage),
    op(0x25, "and.z", ZeroPage),
    op(0x26, "rol.z", ZeroPage),
    op(0x27, "rmb2", ZeroPage),
    op(0x28, "plp", Implied),
    op(0x29, "and.#", Immediate),
    op(0x2A, "rol.a", Accumulator),
    op(0x2C, "bit", Absolute),
    op(0x2D, "and", Absolute),
    op(0x2E, "rol", Absolute),
    op(0x2F, "bbr2", ZeroPageRelative),
    op(0x30, "bmi", Relative),
    op(0x31, "and.ziy", ZeroPageIndirectY),
    op(0x32, "and.zi", ZeroPageIndirect),
    op(0x34, "bit.zx", ZeroPageX),
    op(0x35, "and.zx", ZeroPageX),
    op(0x36, "rol.zx", ZeroPageX),
    op(0x37, "rmb3", ZeroPage),
    op(0x38, "sec", Implied),
    op(0x39, "and.y", AbsoluteY),
    op(0x3A, "dec.a", Accumulator),
    op(0x3C, "bit.x", AbsoluteX),
    op(0x3D, "and.x", AbsoluteX),
    op(0x3E, "rol.x", AbsoluteX),
    op(0x3F, "bbr3", ZeroPageRelative),
    op(0x40, "rti", Implied),
    op(0x41, "eor.zxi", ZeroPageXIndirect),
    op(0x45, "eor.z", ZeroPage),
    op(0x46, "lsr.z", ZeroPage),
    op(0x47, "rmb4", ZeroPage),
    op(0x48, "pha", Implied),
    op(0x49, "eor.#", Immediate),
    op(0x4A, "lsr.a", Accumulator),
    op(0x4C, "jmp", Absolute),
    op(0x4D, "eor", Absolute),
    op(0x4E, "lsr", Absolute),
    op(0x4F, "bbr4", ZeroPageRelative),
    op(0x50, "bvc", Relative),
    op(0x51, "eor.ziy", ZeroPageIndirectY),
    op(0x52, "eor.zi", ZeroPageIndirect),
    op(0x55, "eor.zx", ZeroPageX),
    op(0x56, "lsr.zx", ZeroPageX),
    op(0x57, "rmb5", ZeroPage),
    op(0x58, "cli", Implied),
    op(0x59, "eor.y", AbsoluteY),
    op(0x5A, "phy", Implied),
    op(0x5D, "eor.x", AbsoluteX),
    op(0x5E, "lsr.x", AbsoluteX),
    op(0x5F, "bbr5", ZeroPageRelative),
    op(0x60, "rts", Implied),
    op(0x61, "adc.zxi", ZeroPageXIndirect),
    op(0x64, "stz.z", ZeroPage),
    op(0x65, "adc.z", ZeroPage),
    op(0x66, "ror.z", ZeroPage),
    op(0x67, "rmb6", ZeroPage),
    op(0x68, "pla", Implied),
    op(0x69, "adc.#", Immediate),
    op(0x6A, "ror.a", Accumulator),
    op(0x6C, "jmp.i", AbsoluteIndirect),
    op(0x6D, "adc", Absolute),
    op(0x6E, "ror", Absolute),
    op(0x6F, "bbr6", ZeroPageRelative),
    op(0x70, "bvs", Relative),
    op(0x71, "adc.ziy", ZeroPageIndirectY),
    op(0x72, "adc.zi", ZeroPageIndirect),
    op(0x74, "stz.zx", ZeroPageX),
    op(0x75, "adc.zx", ZeroPageX),
    op(0x76, "ror.zx", ZeroPageX),
    op(0x77, "rmb7", ZeroPage),
    op(0x78, "sei", Implied),
    op(0x79, "adc.y", AbsoluteY),
    op(0x7A, "ply", Implied),
    op(0x7C, "jmp.xi", AbsoluteXIndirect),
    op(0x7D, "adc.x", AbsoluteX),
    op(0x7E, "ror.x", AbsoluteX),
    op(0x7F, "bbr7", ZeroPageRelative),
    op(0x80, "bra", Relative),
    op(0x81, "sta.zxi", ZeroPageXIndirect),
    op(0x84, "sty.z", ZeroPage),
    op(0x85, "sta.z", ZeroPage),
    op(0x86, "stx.z", ZeroPage),
    op(0x87, "smb0", ZeroPage),
    op(0x88, "dey", Implied),
    op(0x89, "bit.#", Immediate),
    op(0x8A, "txa", Implied),
    op(0x8C, "sty", Absolute),
    op(0x8D, "sta", Absolute),
    op(0x8E, "stx", Absolute),
    op(0x8F, "bbs0", ZeroPageRelative),
    op(0x90, "bcc", Relative),
    op(0x91, "sta.ziy", ZeroPageIndirectY),
    op(0x92, "sta.zi", ZeroPageIndirect),
    op(0x94, "sty.zx", ZeroPageX),
    op(0x95, "sta.zx", ZeroPageX),
    op(0x96, "stx.zy", ZeroPageY),
    op(0x97, "smb1", ZeroPage),
    op(0x98, "tya", Implied),
    op(0x99, "sta.y", AbsoluteY),
    op(0x9A, "txs", Implied),
    op(0x9C, "stz", Absolute),
    op(0x9D, "sta.x", AbsoluteX),
    op(0x9E, "stz.x", AbsoluteX),
    op(0x9F, "bbs1", ZeroPageRelative),
    op(0xA0, "ldy.#", Immediate),
    op(0xA1, "lda.zxi", ZeroPageXIndirect),
    op(0xA2, "ldx.#", Immediate),
    op(0xA4, "ldy.z", ZeroPage),
    op(0xA5, "lda.z", ZeroPage),
    op(0xA6, "ldx.z", ZeroPage),
    op(0xA7, "smb2", ZeroPage),
    op(0xA8, "tay", Implied),
    op(0xA9, "lda.#", Immediate),
    op(0xAA, "tax", Implied),
    op(0xAC, "ldy", Absolute),
    op(0xAD, "lda", Absolute),
    op(0xAE, "ldx", Absolute),
    op(0xAF, "bbs2", ZeroPageRelative),
    op(0xB0, "bcs", Relative),
    op(0xB1, "lda.ziy", ZeroPageIndirectY),
    op(0xB2, "lda.zi", ZeroPageIndirect),
    op(0xB4, "ldy.zx", ZeroPageX),
    op(0xB5, "lda.zx", ZeroPageX),
    op(0xB6, "ldx.zy", ZeroPageY),
    op(0xB7, "smb3", ZeroPage),
    op(0xB8, "clv", Implied),
    op(0xB9, "lda.y", AbsoluteY),
    op(0xBA, "tsx", Implied),
    op(0xBC, "ldy.x", AbsoluteX),
    op(0xBD, "lda.x", AbsoluteX),
    op(0xBE, "ldx.y", AbsoluteY),
    op(0xBF, "bbs3", ZeroPageRelative),
    op(0xC0, "cpy.#", Immediate),
    op(0xC1, "cmp.zxi", ZeroPageXIndirect),
    op(0xC4, "cpy.z", ZeroPage),
    op(0xC5, "cmp.z", ZeroPage),
    op(0xC6, "dec.z", ZeroPage),
    op(0xC7, "smb4", ZeroPage),
    op(0xC8, "iny", Implied),
    op(0xC9, "cmp.#", Immediate),
    op(0xCA, "dex", Implied),
    op(0xCB, "wai", Implied),
    op(0xCC, "cpy", Absolute),
    op(0xCD, "cmp", Absolute),
    op(0xCE, "dec", Absolute),
    op(0xCF, "bbs4", ZeroPageRelative),
    op(0xD0, "bne", Relative),
    op(0xD1, "cmp.ziy", ZeroPageIndirectY),
    op(0xD2, "cmp.zi", ZeroPageIndirect),
    op(0xD5, "cmp.zx", ZeroPageX),
    op(0xD6, "dec.zx", ZeroPageX),
    op(0xD7, "smb5", ZeroPage),
    op(0xD8, "cld", Implied),
    op(0xD9, "cmp.y", AbsoluteY),
    op(0xDA, "phx", Implied),
    op(0xDB, "stp", Implied),
    op(0xDD, "cmp.x", AbsoluteX),
    op(0xDE, "dec.x", AbsoluteX),
    op(0xDF, "bbs5", ZeroPageRelative),
    op(0xE0, "cpx.#", Immediate),
    op(0xE1, "sbc.zxi", ZeroPageXIndirect),
    op(0xE4, "cpx.z", ZeroPage),
    op(0xE5, "sbc.z", ZeroPage),
    op(0xE6, "inc.z", ZeroPage),
    op(0xE7, "smb6", ZeroPage),
    op(0xE8, "inx", Implied),
    op(0xE9, "sbc.#", Immediate),
    op(0xEA, "nop", Implied),
    op(0xEC, "cpx", Absolute),
    op(0xED, "sbc", Absolute),
    op(0xEE, "inc", Absolute),
    op(0xEF, "bbs6", ZeroPageRelative),
    op(0xF0, "beq", Relative),
    op(0xF1, "sbc.ziy", ZeroPageIndirectY),
    op(0xF2, "sbc.zi", ZeroPageIndirect),
    op(0xF5, "sbc.zx", ZeroPageX),
    op(0xF6, "inc.zx", ZeroPageX),
    op(0xF7, "smb7", ZeroPage),
    op(0xF8, "sed", Implied),
    op(0xF9, "sbc.y", AbsoluteY),
    op(0xFA, "plx", Implied),
    op(0xFD, "sbc.x", AbsoluteX),
    op(0xFE, "inc.x", AbsoluteX),
    op(0xFF, "bbs7", ZeroPageRelative),
];

/// Look up a SAN mnemonic, case-insensitively.
pub fn lookup_mnemonic(mnemonic: &str) -> Option<&'static FamilyInstructionEntry> {
    FAMILY_INSTRUCTION_TABLE
        .iter()
        .find(|entry| entry.mnemonic.eq_ignore_ascii_case(mnemonic))
}

pub fn lookup_opcode(opcode: u8) -> Option<&'static FamilyInstructionEntry> {
    FAMILY_INSTRUCTION_TABLE
        .binary_search_by_key(&opcode, |entry| entry.opcode)
        .ok()
        .map(|ix| &FAMILY_INSTRUCTION_TABLE[ix])
}

pub fn has_mnemonic(mnemonic: &str) -> bool {
    lookup_mnemonic(mnemonic).is_some()
}

/// Instruction length taken from the table, with the 65C02's reserved
/// opcodes executing as NOPs of fixed length.
pub fn reference_length(opcode: u8) -> u8 {
    match lookup_opcode(opcode) {
        Some(entry) => entry.length(),
        None => reserved_nop_length(opcode),
    }
}

fn reserved_nop_length(opcode: u8) -> u8 {
    match opcode {
        0x02 | 0x22 | 0x42 | 0x62 | 0x82 | 0xC2 | 0xE2 => 2,
        0x44 | 0x54 | 0xD4 | 0xF4 => 2,
        0x5C | 0xDC | 0xFC => 3,
        _ => 1,
    }
}
