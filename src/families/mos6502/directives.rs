// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Pseudo-ops and branch helpers that sit beside the instruction words.

use log::debug;

use crate::core::error::{EncodeError, EncodeErrorKind};
use crate::core::operand::{OperandSource, OperandStack};
use crate::core::sink::OutputSink;

use super::encoder::EncodeMode;

/// Run-time push of the accumulator onto the X-indexed zero-page data stack:
/// `dex dex sta.zx 0 stz.zx 1`.
pub const PUSH_ACCUMULATOR_CODE: [u8; 6] = [0xCA, 0xCA, 0x95, 0x00, 0x74, 0x01];

/// Bytes occupied by a relative branch instruction.
const BRANCH_SIZE: u16 = 2;

/// Compile code that pushes A onto the data stack at run time.
pub fn push_accumulator(sink: &mut dyn OutputSink) -> Result<usize, EncodeError> {
    sink.emit_bytes(&PUSH_ACCUMULATOR_CODE)?;
    Ok(PUSH_ACCUMULATOR_CODE.len())
}

/// Record the current compile position for a later `<b` or `<j`.
pub fn mark(stack: &mut OperandStack, sink: &dyn OutputSink) -> u16 {
    let here = sink.here();
    stack.push(here);
    here
}

/// Back jump marker.
///
/// Absolute jumps take the recorded address as-is, so there is nothing to
/// compute; the word only documents intent in source.
pub fn back_jump() {}

/// Displacement of a branch placed at `position` that lands on `target`.
///
/// Addresses wrap at 64K, so the distance is taken modulo 64K and read back
/// as a signed 16-bit value.
pub fn branch_displacement(target: u16, position: u16) -> i32 {
    target.wrapping_sub(position).wrapping_sub(BRANCH_SIZE) as i16 as i32
}

/// Replace the recorded address on top of the stack with the displacement
/// the next branch instruction needs, relative to the current position.
pub fn back_branch(
    stack: &mut OperandStack,
    sink: &dyn OutputSink,
    mode: EncodeMode,
) -> Result<i32, EncodeError> {
    let Some(target) = stack.pop() else {
        return Err(EncodeError::underflow(1, 0));
    };
    let displacement = branch_displacement(target, sink.here());
    if mode == EncodeMode::Checked && !(-128..=127).contains(&displacement) {
        return Err(EncodeError::new(
            EncodeErrorKind::BranchRange,
            format!(
                "Branch from ${:04X} to ${target:04X} is out of range ({displacement})",
                sink.here()
            ),
        ));
    }
    debug!(
        "back branch to ${target:04X} from ${:04X}: {displacement}",
        sink.here()
    );
    stack.push(displacement as u16);
    Ok(displacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sink::CodeBuffer;
    use crate::families::mos6502::encoder::Encoder;

    #[test]
    fn push_accumulator_copies_fixed_sequence() {
        let mut buffer = CodeBuffer::new(0x0400);
        buffer.emit_byte(0xA9).unwrap();
        assert_eq!(push_accumulator(&mut buffer), Ok(6));
        assert_eq!(&buffer.bytes()[1..], &PUSH_ACCUMULATOR_CODE);
    }

    #[test]
    fn back_branch_computes_displacement() {
        let buffer = CodeBuffer::new(0x1010);
        let mut stack: OperandStack = [0x1000].into_iter().collect();
        assert_eq!(back_branch(&mut stack, &buffer, EncodeMode::Checked), Ok(-0x12));
        assert_eq!(stack.cells(), &[0xFFEE]);
    }

    #[test]
    fn back_branch_feeds_the_branch_opcode() {
        let mut buffer = CodeBuffer::new(0x1000);
        let mut stack = OperandStack::new();
        mark(&mut stack, &buffer);
        buffer.emit_bytes(&[0xEA; 0x10]).unwrap();
        back_branch(&mut stack, &buffer, EncodeMode::Checked).unwrap();
        let mut encoder = Encoder::new(EncodeMode::Checked);
        encoder.encode(0xD0, &mut stack, &mut buffer).unwrap();
        assert_eq!(&buffer.bytes()[0x10..], &[0xD0, 0xEE]);
        assert!(stack.is_empty());
    }

    #[test]
    fn back_branch_across_address_wrap() {
        let mut buffer = CodeBuffer::new(0xFFF8);
        let mut stack = OperandStack::new();
        mark(&mut stack, &buffer);
        buffer.emit_bytes(&[0xEA; 0x10]).unwrap();
        assert_eq!(buffer.here(), 0x0008);
        assert_eq!(back_branch(&mut stack, &buffer, EncodeMode::Checked), Ok(-0x12));
        assert_eq!(stack.cells(), &[0xFFEE]);
        assert_eq!(branch_displacement(0x0002, 0xFFFE), 2);
    }

    #[test]
    fn branch_to_self_is_minus_two() {
        assert_eq!(branch_displacement(0x2000, 0x2000), -2);
    }

    #[test]
    fn back_branch_underflows_without_mark() {
        let buffer = CodeBuffer::new(0);
        let mut stack = OperandStack::new();
        let err = back_branch(&mut stack, &buffer, EncodeMode::Checked).unwrap_err();
        assert!(err.is_underflow());
    }

    #[test]
    fn checked_mode_rejects_far_branch() {
        let buffer = CodeBuffer::new(0x1100);
        let mut stack: OperandStack = [0x1000].into_iter().collect();
        let err = back_branch(&mut stack, &buffer, EncodeMode::Checked).unwrap_err();
        assert_eq!(err.kind(), EncodeErrorKind::BranchRange);

        let mut stack: OperandStack = [0x1000].into_iter().collect();
        assert_eq!(
            back_branch(&mut stack, &buffer, EncodeMode::Unchecked),
            Ok(-0x102)
        );
        assert_eq!(stack.cells(), &[(-0x102i32) as u16]);
    }

    #[test]
    fn back_jump_is_a_no_op() {
        back_jump();
    }
}
