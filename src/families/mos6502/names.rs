// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Opcode <-> mnemonic resolution.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::dispatch::DispatchTable;
use super::table::FAMILY_INSTRUCTION_TABLE;

/// Precomputed opcode -> SAN name and name -> opcode maps.
pub struct MnemonicIndex {
    names: [Option<&'static str>; 256],
    opcodes: HashMap<&'static str, u8>,
}

impl MnemonicIndex {
    pub fn new() -> Self {
        let mut names = [None; 256];
        let mut opcodes = HashMap::with_capacity(FAMILY_INSTRUCTION_TABLE.len());
        for entry in FAMILY_INSTRUCTION_TABLE {
            let slot = &mut names[entry.opcode as usize];
            if slot.is_none() {
                *slot = Some(entry.mnemonic);
            }
            opcodes.entry(entry.mnemonic).or_insert(entry.opcode);
        }
        Self { names, opcodes }
    }

    /// Process-wide index, built on first use.
    pub fn shared() -> &'static MnemonicIndex {
        static INDEX: OnceLock<MnemonicIndex> = OnceLock::new();
        INDEX.get_or_init(MnemonicIndex::new)
    }

    pub fn name_for(&self, opcode: u8) -> Option<&'static str> {
        self.names[opcode as usize]
    }

    /// Case-insensitive mnemonic lookup.
    pub fn opcode_for(&self, name: &str) -> Option<u8> {
        if let Some(opcode) = self.opcodes.get(name) {
            return Some(*opcode);
        }
        self.opcodes.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    /// `(opcode, name)` pairs in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &'static str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(opcode, name)| name.map(|name| (opcode as u8, name)))
    }
}

impl Default for MnemonicIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// A singly linked list of callable words, walked from `last` toward `first`.
pub trait WordList {
    type Handle: Copy + PartialEq;

    fn first(&self) -> Self::Handle;
    fn last(&self) -> Self::Handle;
    /// The word linked after `handle`, one step closer to `first`.
    fn next_word(&self, handle: Self::Handle) -> Self::Handle;
    fn entry_address(&self, handle: Self::Handle) -> u16;
}

/// Find the word whose entry address encodes `opcode`.
///
/// Mnemonic words sit at an address whose low byte is `opcode - 2`. The walk
/// stops at the first match; `first` is checked before giving up.
pub fn resolve_word<L: WordList>(list: &L, opcode: u8) -> Option<L::Handle> {
    let wanted = opcode.wrapping_sub(2);
    let mut handle = list.last();
    loop {
        if list.entry_address(handle) as u8 == wanted {
            return Some(handle);
        }
        if handle == list.first() {
            return None;
        }
        handle = list.next_word(handle);
    }
}

/// A mnemonic word: SAN name plus its entry address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MnemonicWord {
    pub name: &'static str,
    pub entry: u16,
}

/// Mnemonic words laid out on a dispatch table, in definition order.
#[derive(Debug, Clone)]
pub struct MnemonicWords {
    words: Vec<MnemonicWord>,
}

impl MnemonicWords {
    pub fn new(table: &DispatchTable) -> Self {
        let words = FAMILY_INSTRUCTION_TABLE
            .iter()
            .map(|entry| MnemonicWord {
                name: entry.mnemonic,
                entry: table.entry_for_opcode(entry.opcode),
            })
            .collect();
        Self { words }
    }

    pub fn word(&self, handle: usize) -> &MnemonicWord {
        &self.words[handle]
    }

    pub fn words(&self) -> &[MnemonicWord] {
        &self.words
    }

    /// Resolve `opcode` to its word by walking the list.
    pub fn resolve(&self, opcode: u8) -> Option<&MnemonicWord> {
        if self.words.is_empty() {
            return None;
        }
        resolve_word(self, opcode).map(|handle| &self.words[handle])
    }
}

impl WordList for MnemonicWords {
    type Handle = usize;

    fn first(&self) -> usize {
        0
    }

    fn last(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    fn next_word(&self, handle: usize) -> usize {
        handle.saturating_sub(1)
    }

    fn entry_address(&self, handle: usize) -> u16 {
        self.words[handle].entry
    }
}
