// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Per-opcode metadata and the opcode entry-point table.
//!
//! Each of the 256 opcodes owns one fixed-size entry point. An entry is a
//! 3-byte call into the common encoder, so the low byte of the return address
//! it pushes identifies the opcode. Because 3 and 256 are coprime the mapping
//! slot -> opcode is a bijection, and the inverse uses 171 = 3^-1 mod 256.

use crate::core::error::EncodeError;
use crate::core::operand::OperandSource;
use crate::core::sink::OutputSink;

use super::encoder::{Encoder, JumpCompiler};
use super::length::instruction_length;

/// Opcode of the absolute `jmp`, the one instruction with its own compile path.
pub const ABSOLUTE_JUMP: u8 = 0x4C;

/// Size in bytes of one entry point.
pub const ENTRY_SIZE: u16 = 3;

/// Multiplicative inverse of [`ENTRY_SIZE`] modulo 256.
pub const ENTRY_SIZE_INVERSE: u32 = 171;

/// Offset of the pushed return address from the entry start.
const RETURN_OFFSET: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub length: u8,
    pub is_jump: bool,
}

/// Metadata for all 256 opcodes, built at compile time.
pub static OPCODE_INFO: [OpcodeInfo; 256] = build_opcode_info();

const fn build_opcode_info() -> [OpcodeInfo; 256] {
    let mut table = [OpcodeInfo {
        length: 1,
        is_jump: false,
    }; 256];
    let mut ix = 0;
    while ix < 256 {
        let opcode = ix as u8;
        table[ix] = OpcodeInfo {
            length: instruction_length(opcode),
            is_jump: opcode == ABSOLUTE_JUMP,
        };
        ix += 1;
    }
    table
}

pub fn opcode_info(opcode: u8) -> OpcodeInfo {
    OPCODE_INFO[opcode as usize]
}

/// The 256 opcode entry points laid out from `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTable {
    base: u16,
}

impl DispatchTable {
    pub const fn new(base: u16) -> Self {
        Self { base }
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn entry_address(&self, slot: u8) -> u16 {
        self.base.wrapping_add(slot as u16 * ENTRY_SIZE)
    }

    /// Return address pushed when entry `slot` calls the encoder.
    pub fn return_address(&self, slot: u8) -> u16 {
        self.entry_address(slot).wrapping_add(RETURN_OFFSET)
    }

    /// Opcode recovered from the low byte of the entry's return address.
    pub fn opcode_for_slot(&self, slot: u8) -> u8 {
        self.return_address(slot) as u8
    }

    /// Entry slot whose invocation encodes `opcode`.
    pub fn slot_for_opcode(&self, opcode: u8) -> u8 {
        // Biased by 512 so the subtraction stays non-negative.
        let biased = 512 + opcode as u32 - RETURN_OFFSET as u32 - (self.base & 0xff) as u32;
        ((ENTRY_SIZE_INVERSE * biased) % 256) as u8
    }

    /// Entry address of the word that encodes `opcode`.
    pub fn entry_for_opcode(&self, opcode: u8) -> u16 {
        self.entry_address(self.slot_for_opcode(opcode))
    }

    /// Call entry point `slot`: recover its opcode and run the encoder.
    pub fn invoke<J: JumpCompiler>(
        &self,
        slot: u8,
        encoder: &mut Encoder<J>,
        operands: &mut dyn OperandSource,
        sink: &mut dyn OutputSink,
    ) -> Result<usize, EncodeError> {
        encoder.encode(self.opcode_for_slot(slot), operands, sink)
    }
}
