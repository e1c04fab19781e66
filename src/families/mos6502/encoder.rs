// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Common instruction encoder.
//!
//! Emits the opcode byte, then the operand's low byte for 2-byte
//! instructions and low/high bytes for 3-byte instructions. The operand cell
//! is popped exactly once, after its bytes are emitted. Absolute `jmp` is
//! routed to a [`JumpCompiler`] instead of the generic path.

use log::trace;

use crate::core::error::{EncodeError, EncodeErrorKind};
use crate::core::operand::OperandSource;
use crate::core::sink::OutputSink;

use super::dispatch::{opcode_info, ABSOLUTE_JUMP};

/// Validation policy for encoder inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeMode {
    /// Reject opcode values above 255, byte operands that do not fit a byte,
    /// and out-of-range branch displacements.
    #[default]
    Checked,
    /// Trust the caller; values are truncated.
    Unchecked,
}

/// An emitted absolute jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpSite {
    pub address: u16,
    pub target: u16,
}

/// Compile path for the absolute `jmp` opcode.
pub trait JumpCompiler {
    /// Consume the target operand and emit the jump. Returns bytes emitted.
    fn compile_jump(
        &mut self,
        operands: &mut dyn OperandSource,
        sink: &mut dyn OutputSink,
    ) -> Result<usize, EncodeError>;
}

/// Emit `jmp target` from the top operand cell.
///
/// Nothing is emitted when the operand is missing.
pub fn emit_absolute_jump(
    operands: &mut dyn OperandSource,
    sink: &mut dyn OutputSink,
) -> Result<JumpSite, EncodeError> {
    let Some(target) = operands.peek() else {
        return Err(EncodeError::underflow(1, 0));
    };
    let address = sink.here();
    let [low, high] = target.to_le_bytes();
    sink.emit_bytes(&[ABSOLUTE_JUMP, low, high])?;
    operands.pop();
    Ok(JumpSite { address, target })
}

/// Plain absolute jump with no bookkeeping.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainJump;

impl JumpCompiler for PlainJump {
    fn compile_jump(
        &mut self,
        operands: &mut dyn OperandSource,
        sink: &mut dyn OutputSink,
    ) -> Result<usize, EncodeError> {
        emit_absolute_jump(operands, sink).map(|_| 3)
    }
}

/// Records every absolute jump it compiles.
#[derive(Debug, Default, Clone)]
pub struct JumpLog {
    sites: Vec<JumpSite>,
}

impl JumpLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sites(&self) -> &[JumpSite] {
        &self.sites
    }

    pub fn clear(&mut self) {
        self.sites.clear();
    }
}

impl JumpCompiler for JumpLog {
    fn compile_jump(
        &mut self,
        operands: &mut dyn OperandSource,
        sink: &mut dyn OutputSink,
    ) -> Result<usize, EncodeError> {
        let site = emit_absolute_jump(operands, sink)?;
        self.sites.push(site);
        Ok(3)
    }
}

/// Hands every compiled jump to a callback.
pub struct JumpTagger<F: FnMut(JumpSite)> {
    tag: F,
}

impl<F: FnMut(JumpSite)> JumpTagger<F> {
    pub fn new(tag: F) -> Self {
        Self { tag }
    }
}

impl<F: FnMut(JumpSite)> JumpCompiler for JumpTagger<F> {
    fn compile_jump(
        &mut self,
        operands: &mut dyn OperandSource,
        sink: &mut dyn OutputSink,
    ) -> Result<usize, EncodeError> {
        let site = emit_absolute_jump(operands, sink)?;
        (self.tag)(site);
        Ok(3)
    }
}

/// True when `value` is a byte, either unsigned or sign-extended.
fn fits_byte_operand(value: u16) -> bool {
    value <= 0x00ff || value >= 0xff80
}

/// Table-driven instruction encoder.
pub struct Encoder<J = PlainJump> {
    mode: EncodeMode,
    jumps: J,
}

impl Encoder<PlainJump> {
    pub fn new(mode: EncodeMode) -> Self {
        Self {
            mode,
            jumps: PlainJump,
        }
    }
}

impl Default for Encoder<PlainJump> {
    fn default() -> Self {
        Self::new(EncodeMode::default())
    }
}

impl<J: JumpCompiler> Encoder<J> {
    pub fn with_jump_compiler(mode: EncodeMode, jumps: J) -> Self {
        Self { mode, jumps }
    }

    pub fn mode(&self) -> EncodeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EncodeMode) {
        self.mode = mode;
    }

    pub fn jumps(&self) -> &J {
        &self.jumps
    }

    /// Encode one instruction. Returns the number of bytes emitted.
    ///
    /// On underflow the opcode byte has already been emitted and stays. A
    /// checked-mode range failure emits nothing.
    pub fn encode(
        &mut self,
        opcode: u8,
        operands: &mut dyn OperandSource,
        sink: &mut dyn OutputSink,
    ) -> Result<usize, EncodeError> {
        let info = opcode_info(opcode);
        if info.is_jump {
            trace!("encode ${opcode:02X} via jump compiler at ${:04X}", sink.here());
            return self.jumps.compile_jump(operands, sink);
        }

        trace!(
            "encode ${opcode:02X} length {} at ${:04X}",
            info.length,
            sink.here()
        );
        if self.mode == EncodeMode::Checked && info.length == 2 {
            if let Some(value) = operands.peek().filter(|value| !fits_byte_operand(*value)) {
                return Err(EncodeError::new(
                    EncodeErrorKind::OperandRange,
                    format!("Operand ${value:04X} does not fit in a byte for opcode ${opcode:02X}"),
                ));
            }
        }

        sink.emit_byte(opcode)?;
        if info.length == 1 {
            return Ok(1);
        }

        let Some(value) = operands.peek() else {
            return Err(EncodeError::underflow(1, 0));
        };

        let [low, high] = value.to_le_bytes();
        sink.emit_byte(low)?;
        if info.length == 3 {
            sink.emit_byte(high)?;
        }
        operands.pop();
        Ok(info.length as usize)
    }

    /// Encode from an opcode value of unknown provenance.
    ///
    /// Checked mode rejects values outside `0..=255` before anything is
    /// emitted; unchecked mode keeps the low byte.
    pub fn encode_value(
        &mut self,
        value: i64,
        operands: &mut dyn OperandSource,
        sink: &mut dyn OutputSink,
    ) -> Result<usize, EncodeError> {
        let opcode = match self.mode {
            EncodeMode::Checked => u8::try_from(value).map_err(|_| {
                EncodeError::new(
                    EncodeErrorKind::InvalidOpcode,
                    format!("Opcode value {value} is outside 0..=255"),
                )
            })?,
            EncodeMode::Unchecked => value as u8,
        };
        self.encode(opcode, operands, sink)
    }
}
