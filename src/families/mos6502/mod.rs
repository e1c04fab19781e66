// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! MOS 6502 family (WDC 65C02 instruction set) encoder.

pub mod directives;
pub mod dispatch;
pub mod encoder;
pub mod length;
pub mod names;
mod table;

pub use dispatch::{opcode_info, DispatchTable, OpcodeInfo, ABSOLUTE_JUMP, OPCODE_INFO};
pub use encoder::{
    emit_absolute_jump, EncodeMode, Encoder, JumpCompiler, JumpLog, JumpSite, JumpTagger,
    PlainJump,
};
pub use length::instruction_length;
pub use names::{resolve_word, MnemonicIndex, MnemonicWord, MnemonicWords, WordList};
pub use table::{
    has_mnemonic, lookup_mnemonic, lookup_opcode, reference_length, AddressMode,
    FamilyInstructionEntry, FAMILY_INSTRUCTION_TABLE,
};
