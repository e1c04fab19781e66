// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand sources consumed by the encoder.
//!
//! Operands are 16-bit cells. An instruction that needs an operand reads the
//! top cell and removes it exactly once; instructions without an operand never
//! touch the source.

use crate::core::error::EncodeError;

/// Source of operand cells for instruction encoding.
pub trait OperandSource {
    /// Number of cells currently available.
    fn depth(&self) -> usize;

    /// Return the top cell without removing it.
    fn peek(&self) -> Option<u16>;

    /// Remove and return the top cell.
    fn pop(&mut self) -> Option<u16>;

    /// Fail with underflow unless at least `count` cells are available.
    fn require(&self, count: usize) -> Result<(), EncodeError> {
        let depth = self.depth();
        if depth < count {
            return Err(EncodeError::underflow(count, depth));
        }
        Ok(())
    }
}

/// LIFO operand stack shared by a single assembly session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperandStack {
    cells: Vec<u16>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: u16) {
        self.cells.push(value);
    }

    /// Cells from bottom to top.
    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl FromIterator<u16> for OperandStack {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl OperandSource for OperandStack {
    fn depth(&self) -> usize {
        self.cells.len()
    }

    fn peek(&self) -> Option<u16> {
        self.cells.last().copied()
    }

    fn pop(&mut self) -> Option<u16> {
        self.cells.pop()
    }
}

/// Zero or one operand handed directly to the encoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SuppliedOperand(Option<u16>);

impl SuppliedOperand {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn new(value: u16) -> Self {
        Self(Some(value))
    }

    /// True once the encoder has taken the operand (or none was supplied).
    pub fn is_consumed(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<u16>> for SuppliedOperand {
    fn from(value: Option<u16>) -> Self {
        Self(value)
    }
}

impl OperandSource for SuppliedOperand {
    fn depth(&self) -> usize {
        usize::from(self.0.is_some())
    }

    fn peek(&self) -> Option<u16> {
        self.0
    }

    fn pop(&mut self) -> Option<u16> {
        self.0.take()
    }
}
