// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Image store with hex/bin output helpers.

use std::collections::BTreeMap;
use std::io::{self, Write};

const LINE_LIMIT: usize = 32;

/// Address-indexed image of compiled bytes.
///
/// Later stores to the same address win. Emits Intel HEX or raw binary.
#[derive(Debug, Default, Clone)]
pub struct ImageStore {
    entries: BTreeMap<u16, u8>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a single byte at the given address.
    pub fn store(&mut self, addr: u16, val: u8) {
        self.entries.insert(addr, val);
    }

    /// Store a contiguous slice of bytes starting at `addr`.
    pub fn store_slice(&mut self, addr: u16, values: &[u8]) {
        for (ix, val) in values.iter().enumerate() {
            self.store(addr.wrapping_add(ix as u16), *val);
        }
    }

    /// Return the (min, max) address range of stored bytes, or `None` if empty.
    pub fn output_range(&self) -> Option<(u16, u16)> {
        let first = self.entries.keys().next()?;
        let last = self.entries.keys().next_back()?;
        Some((*first, *last))
    }

    /// Write an Intel HEX file; `go_addr` adds a start-address record.
    pub fn write_hex_file<W: Write>(&self, mut out: W, go_addr: Option<u16>) -> io::Result<()> {
        let mut record: Vec<u8> = Vec::with_capacity(LINE_LIMIT);
        let mut record_addr: u16 = 0;

        let mut iter = self.entries.iter().peekable();
        while let Some((&addr, &value)) = iter.next() {
            if record.is_empty() {
                record_addr = addr;
            }
            record.push(value);
            let contiguous = matches!(
                iter.peek(),
                Some((&next, _)) if Some(next) == addr.checked_add(1)
            );
            if record.len() >= LINE_LIMIT || !contiguous {
                write_record(&mut out, 0x00, record_addr, &record)?;
                record.clear();
            }
        }

        if let Some(addr) = go_addr {
            let [hi, lo] = addr.to_be_bytes();
            write_record(&mut out, 0x03, 0x0000, &[0x00, 0x00, hi, lo])?;
        }

        write_record(&mut out, 0x01, 0x0000, &[])
    }

    /// Write a raw binary file covering `start..=end`, filling gaps with `fill`.
    pub fn write_bin_file<W: Write>(
        &self,
        mut out: W,
        start_addr: u16,
        end_addr: u16,
        fill: u8,
    ) -> io::Result<()> {
        if end_addr < start_addr {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Binary range end precedes start",
            ));
        }
        let size = (end_addr - start_addr) as usize + 1;
        let mut mem = vec![fill; size];
        for (&addr, &value) in self.entries.range(start_addr..=end_addr) {
            mem[(addr - start_addr) as usize] = value;
        }
        out.write_all(&mem)
    }
}

fn write_record<W: Write>(out: &mut W, kind: u8, addr: u16, data: &[u8]) -> io::Result<()> {
    let [addr_hi, addr_lo] = addr.to_be_bytes();
    let mut checksum = (data.len() as u8)
        .wrapping_add(addr_hi)
        .wrapping_add(addr_lo)
        .wrapping_add(kind);
    let mut hex_data = String::with_capacity(data.len() * 2);
    for byte in data {
        checksum = checksum.wrapping_add(*byte);
        hex_data.push_str(&format!("{byte:02X}"));
    }
    let checksum = (!checksum).wrapping_add(1);
    writeln!(
        out,
        ":{:02X}{:04X}{:02X}{}{:02X}",
        data.len(),
        addr,
        kind,
        hex_data,
        checksum
    )
}
