// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Closed-form instruction length classifier.
//!
//! Lengths are derived from the opcode's low nibble. Columns `x0` and `x9`
//! mix lengths and are split by further bit tests on the full opcode.

/// Length by low nibble; zero marks a column resolved by bit tests.
const NIBBLE_LENGTHS: [u8; 16] = [0, 2, 2, 1, 2, 2, 2, 2, 1, 0, 1, 1, 3, 3, 3, 3];

/// Total length in bytes (1..=3) of the instruction starting with `opcode`.
pub const fn instruction_length(opcode: u8) -> u8 {
    match opcode & 0x0f {
        0x0 => column_zero_length(opcode),
        // abs,Y in odd rows, immediate in even rows
        0x9 => {
            if opcode & 0x10 != 0 {
                3
            } else {
                2
            }
        }
        low => NIBBLE_LENGTHS[low as usize],
    }
}

/// BRK/JSR/RTI/RTS share `opcode & 0x9F == 0`; bit 6 clear with bit 5 set is JSR.
/// Everything else in the column is a branch or an immediate.
const fn column_zero_length(opcode: u8) -> u8 {
    if opcode & 0x9f != 0 {
        return 2;
    }
    if opcode & 0x20 != 0 && opcode & 0x40 == 0 {
        3
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::mos6502::table::{reference_length, FAMILY_INSTRUCTION_TABLE};

    #[test]
    fn matches_reference_table_for_every_opcode() {
        for opcode in 0..=u8::MAX {
            assert_eq!(
                instruction_length(opcode),
                reference_length(opcode),
                "length mismatch for ${opcode:02X}"
            );
        }
    }

    #[test]
    fn lengths_are_in_range() {
        for opcode in 0..=u8::MAX {
            assert!((1..=3).contains(&instruction_length(opcode)));
        }
    }

    #[test]
    fn column_zero_special_cases() {
        assert_eq!(instruction_length(0x00), 1); // brk
        assert_eq!(instruction_length(0x20), 3); // jsr
        assert_eq!(instruction_length(0x40), 1); // rti
        assert_eq!(instruction_length(0x60), 1); // rts
        assert_eq!(instruction_length(0x80), 2); // bra
        assert_eq!(instruction_length(0xA0), 2); // ldy.#
        assert_eq!(instruction_length(0xF0), 2); // beq
    }

    #[test]
    fn column_nine_splits_on_bit_four() {
        assert_eq!(instruction_length(0xA9), 2);
        assert_eq!(instruction_length(0xB9), 3);
        assert_eq!(instruction_length(0x89), 2);
        assert_eq!(instruction_length(0x99), 3);
    }

    #[test]
    fn documented_opcodes_agree_with_their_mode() {
        for entry in FAMILY_INSTRUCTION_TABLE {
            assert_eq!(instruction_length(entry.opcode), entry.length(), "{}", entry.mnemonic);
        }
    }
}
