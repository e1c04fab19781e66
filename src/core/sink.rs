// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Append-only output sinks for compiled code.

use std::io::Write;

use crate::core::error::{EncodeError, EncodeErrorKind};

/// Append-only destination for encoded bytes.
///
/// Bytes land in call order; sinks never rewind.
pub trait OutputSink {
    /// Append one byte and advance the compile position.
    fn emit_byte(&mut self, byte: u8) -> Result<(), EncodeError>;

    /// Current compile position.
    fn here(&self) -> u16;

    fn emit_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        for &byte in bytes {
            self.emit_byte(byte)?;
        }
        Ok(())
    }
}

/// In-memory code buffer starting at `origin`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    origin: u16,
    bytes: Vec<u8>,
}

impl CodeBuffer {
    pub fn new(origin: u16) -> Self {
        Self {
            origin,
            bytes: Vec::new(),
        }
    }

    pub fn origin(&self) -> u16 {
        self.origin
    }

    /// Move the origin. Only meaningful before any byte has been emitted.
    pub fn set_origin(&mut self, origin: u16) {
        self.origin = origin;
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl OutputSink for CodeBuffer {
    fn emit_byte(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.bytes.push(byte);
        Ok(())
    }

    fn here(&self) -> u16 {
        self.origin.wrapping_add(self.bytes.len() as u16)
    }
}

/// Streaming sink that writes each byte straight to `W`.
pub struct StreamSink<W: Write> {
    writer: W,
    position: u16,
    written: usize,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W, origin: u16) -> Self {
        Self {
            writer,
            position: origin,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for StreamSink<W> {
    fn emit_byte(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.writer.write_all(&[byte]).map_err(|err| {
            EncodeError::new(
                EncodeErrorKind::Sink,
                format!("Output write failed at ${:04X}: {err}", self.position),
            )
        })?;
        self.position = self.position.wrapping_add(1);
        self.written += 1;
        Ok(())
    }

    fn here(&self) -> u16 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn buffer_tracks_here_from_origin() {
        let mut buffer = CodeBuffer::new(0x1000);
        assert_eq!(buffer.here(), 0x1000);
        buffer.emit_bytes(&[0xEA, 0xEA]).unwrap();
        assert_eq!(buffer.here(), 0x1002);
        assert_eq!(buffer.bytes(), &[0xEA, 0xEA]);
    }

    #[test]
    fn buffer_addresses_wrap() {
        let mut buffer = CodeBuffer::new(0xFFFF);
        buffer.emit_bytes(&[1, 2]).unwrap();
        assert_eq!(buffer.here(), 0x0001);
        assert_eq!(buffer.bytes(), &[1, 2]);
    }

    #[test]
    fn stream_sink_writes_in_order() {
        let mut sink = StreamSink::new(Vec::new(), 0x0800);
        sink.emit_bytes(&[0xA9, 0x42]).unwrap();
        assert_eq!(sink.here(), 0x0802);
        assert_eq!(sink.written(), 2);
        assert_eq!(sink.into_inner(), vec![0xA9, 0x42]);
    }

    #[test]
    fn stream_sink_reports_write_failure() {
        let mut sink = StreamSink::new(FailingWriter, 0x0200);
        let err = sink.emit_byte(0xEA).unwrap_err();
        assert_eq!(err.kind(), EncodeErrorKind::Sink);
        assert!(err.message().contains("$0200"));
        assert_eq!(sink.here(), 0x0200);
    }
}
