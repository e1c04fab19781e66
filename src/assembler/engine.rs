// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! SAN assembly session.
//!
//! A session owns one operand stack, one code buffer and the encoder. Words
//! run in source order; operands are pushed before the word that consumes
//! them. The first error stops the session and already-emitted bytes stay in
//! the buffer.

use std::collections::HashMap;

use log::{debug, trace};

use crate::core::error::{
    AsmError, AsmErrorKind, Diagnostic, EncodeError, EncodeErrorKind, Severity,
};
use crate::core::expr::{parse_number, value_to_cell};
use crate::core::operand::{OperandSource, OperandStack};
use crate::core::sink::{CodeBuffer, OutputSink};
use crate::families::mos6502::directives::{back_branch, back_jump, mark, push_accumulator};
use crate::families::mos6502::{
    DispatchTable, EncodeMode, Encoder, JumpLog, JumpSite, MnemonicIndex, MnemonicWord,
    MnemonicWords,
};

use super::tokenizer::{tokenize, Token};

pub const DEFAULT_ORIGIN: u16 = 0x0800;
pub const DEFAULT_ENTRY_BASE: u16 = 0xA000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address of the first emitted byte.
    pub origin: u16,
    /// Base address of the opcode entry-point table.
    pub entry_base: u16,
    pub mode: EncodeMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            entry_base: DEFAULT_ENTRY_BASE,
            mode: EncodeMode::Checked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    PushA,
    BackJump,
    BackBranch,
    Here,
    Org,
    CompileByte,
    CompileWord,
    Opcode,
    Drop,
    Dup,
    Swap,
}

fn directive_for(word: &str) -> Option<Directive> {
    let directive = match word.to_ascii_lowercase().as_str() {
        "push-a" => Directive::PushA,
        "<j" => Directive::BackJump,
        "<b" => Directive::BackBranch,
        "here" | "->" => Directive::Here,
        "org" => Directive::Org,
        "c," => Directive::CompileByte,
        "," => Directive::CompileWord,
        "op," => Directive::Opcode,
        "drop" => Directive::Drop,
        "dup" => Directive::Dup,
        "swap" => Directive::Swap,
        _ => return None,
    };
    Some(directive)
}

/// Name and value of an opcode for messages, e.g. `lda.# ($A9)`.
pub fn describe_opcode(opcode: u8) -> String {
    match MnemonicIndex::shared().name_for(opcode) {
        Some(name) => format!("{name} (${opcode:02X})"),
        None => format!("${opcode:02X}"),
    }
}

pub struct Session {
    config: SessionConfig,
    stack: OperandStack,
    buffer: CodeBuffer,
    encoder: Encoder<JumpLog>,
    dispatch: DispatchTable,
    words: MnemonicWords,
    entries: HashMap<&'static str, u8>,
    last_line: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let dispatch = DispatchTable::new(config.entry_base);
        let words = MnemonicWords::new(&dispatch);
        let entries = MnemonicIndex::shared()
            .iter()
            .map(|(opcode, name)| (name, dispatch.slot_for_opcode(opcode)))
            .collect();
        Self {
            config,
            stack: OperandStack::new(),
            buffer: CodeBuffer::new(config.origin),
            encoder: Encoder::with_jump_compiler(config.mode, JumpLog::new()),
            dispatch,
            words,
            entries,
            last_line: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    pub fn here(&self) -> u16 {
        self.buffer.here()
    }

    pub fn jump_sites(&self) -> &[JumpSite] {
        self.encoder.jumps().sites()
    }

    /// Entry-point slot of a mnemonic word.
    pub fn entry_slot(&self, name: &str) -> Option<u8> {
        if let Some(slot) = self.entries.get(name) {
            return Some(*slot);
        }
        self.entries.get(name.to_ascii_lowercase().as_str()).copied()
    }

    /// The mnemonic word whose entry point encodes `opcode`.
    pub fn entry_word(&self, opcode: u8) -> Option<&MnemonicWord> {
        self.words.resolve(opcode)
    }

    pub fn into_buffer(self) -> CodeBuffer {
        self.buffer
    }

    /// Run every word of `source`, stopping at the first error.
    pub fn run_source(&mut self, source: &str) -> Result<(), Diagnostic> {
        let tokens = tokenize(source).map_err(|err| {
            Diagnostic::new(
                err.line,
                Severity::Error,
                AsmError::new(AsmErrorKind::Parser, &err.message, None),
            )
            .with_column(Some(err.column))
        })?;
        for token in &tokens {
            self.run_token(token)?;
        }
        Ok(())
    }

    fn run_token(&mut self, token: &Token<'_>) -> Result<(), Diagnostic> {
        trace!("{}:{} {}", token.line, token.column, token.text);
        self.last_line = token.line;
        self.execute_word(token.text).map_err(|err| {
            Diagnostic::new(token.line, Severity::Error, err)
                .with_column(Some(token.column))
                .with_col_end(Some(token.col_end()))
        })
    }

    /// Execute one word: a directive, a mnemonic, or a number to push.
    pub fn execute_word(&mut self, word: &str) -> Result<(), AsmError> {
        if let Some(directive) = directive_for(word) {
            return self.execute_directive(directive);
        }
        if let Some(slot) = self.entry_slot(word) {
            return self.invoke_entry(slot);
        }
        if let Some(value) = parse_number(word) {
            return self.push_value(value);
        }
        Err(AsmError::new(AsmErrorKind::Parser, "Unknown word", Some(word)))
    }

    pub fn push_value(&mut self, value: i64) -> Result<(), AsmError> {
        let cell = value_to_cell(value).ok_or_else(|| {
            AsmError::new(
                AsmErrorKind::Parser,
                "Value does not fit in 16 bits",
                Some(&value.to_string()),
            )
        })?;
        self.stack.push(cell);
        Ok(())
    }

    fn invoke_entry(&mut self, slot: u8) -> Result<(), AsmError> {
        let opcode = self.dispatch.opcode_for_slot(slot);
        self.dispatch
            .invoke(slot, &mut self.encoder, &mut self.stack, &mut self.buffer)
            .map(|_| ())
            .map_err(|err| instruction_error(opcode, err))
    }

    fn execute_directive(&mut self, directive: Directive) -> Result<(), AsmError> {
        match directive {
            Directive::PushA => {
                push_accumulator(&mut self.buffer)?;
            }
            Directive::BackJump => back_jump(),
            Directive::BackBranch => {
                back_branch(&mut self.stack, &self.buffer, self.config.mode)?;
            }
            Directive::Here => {
                mark(&mut self.stack, &self.buffer);
            }
            Directive::Org => {
                let origin = self.pop_cell()?;
                if !self.buffer.is_empty() {
                    return Err(AsmError::new(
                        AsmErrorKind::Directive,
                        "org must precede any emitted code",
                        None,
                    ));
                }
                debug!("origin set to ${origin:04X}");
                self.buffer.set_origin(origin);
            }
            Directive::CompileByte => {
                let value = self.pop_cell()?;
                if self.config.mode == EncodeMode::Checked && value > 0x00ff && value < 0xff80 {
                    return Err(AsmError::new(
                        AsmErrorKind::Directive,
                        "Value does not fit in a byte",
                        Some(&format!("${value:04X}")),
                    ));
                }
                self.buffer.emit_byte(value as u8)?;
            }
            Directive::CompileWord => {
                let value = self.pop_cell()?;
                self.buffer.emit_bytes(&value.to_le_bytes())?;
            }
            Directive::Opcode => {
                let opcode = self.pop_cell()?;
                self.encoder
                    .encode_value(opcode as i64, &mut self.stack, &mut self.buffer)
                    .map_err(|err| raw_opcode_error(opcode, err))?;
            }
            Directive::Drop => {
                self.pop_cell()?;
            }
            Directive::Dup => {
                let value = self.peek_cell()?;
                self.stack.push(value);
            }
            Directive::Swap => {
                self.stack.require(2)?;
                let top = self.pop_cell()?;
                let below = self.pop_cell()?;
                self.stack.push(top);
                self.stack.push(below);
            }
        }
        Ok(())
    }

    fn pop_cell(&mut self) -> Result<u16, AsmError> {
        self.stack
            .pop()
            .ok_or_else(|| EncodeError::underflow(1, 0).into())
    }

    fn peek_cell(&self) -> Result<u16, AsmError> {
        self.stack
            .peek()
            .ok_or_else(|| EncodeError::underflow(1, 0).into())
    }

    /// End-of-input checks. Returns warnings for anything left pending.
    pub fn finish(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if !self.stack.is_empty() {
            let cells: Vec<String> = self
                .stack
                .cells()
                .iter()
                .map(|cell| format!("${cell:04X}"))
                .collect();
            diagnostics.push(
                Diagnostic::new(
                    self.last_line.max(1),
                    Severity::Warning,
                    AsmError::new(
                        AsmErrorKind::Stack,
                        "Operand stack not empty at end of input",
                        Some(&cells.join(" ")),
                    ),
                )
                .with_note("operands must precede the word that consumes them"),
            );
        }
        diagnostics
    }
}

fn instruction_error(opcode: u8, err: EncodeError) -> AsmError {
    let err: AsmError = err.into();
    AsmError::new(err.kind(), err.message(), Some(&describe_opcode(opcode)))
}

/// Errors from `op,` name the cell as popped when it is not a byte.
fn raw_opcode_error(value: u16, err: EncodeError) -> AsmError {
    if err.kind() != EncodeErrorKind::InvalidOpcode {
        return instruction_error(value as u8, err);
    }
    let err: AsmError = err.into();
    AsmError::new(err.kind(), err.message(), Some(&format!("${value:04X}")))
}
