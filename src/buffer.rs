//! Little-endian cursor over an in-memory byte buffer with the A2S wire primitives.

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::A2SError;

const STRING_TERMINATOR: u8 = 0x00;

/// A growable, seekable byte buffer with typed read/write methods for the A2S wire
/// primitives: byte, short, long, long-long, float, and NUL-terminated string.
#[derive(Debug, Default, Clone)]
pub struct ByteBuffer {
    inner: Cursor<Vec<u8>>,
}

impl ByteBuffer {
    pub fn new() -> Self {
        ByteBuffer {
            inner: Cursor::new(Vec::new()),
        }
    }

    /// Wrap existing bytes for reading, cursor at position 0.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ByteBuffer {
            inner: Cursor::new(bytes),
        }
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn seek(&mut self, pos: u64) {
        self.inner.set_position(pos);
    }

    pub fn remaining(&self) -> usize {
        let len = self.inner.get_ref().len() as u64;
        len.saturating_sub(self.inner.position()) as usize
    }

    pub fn get_all(&self) -> &[u8] {
        self.inner.get_ref()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.inner.into_inner()
    }

    fn eof_to_a2s(err: io::Error) -> A2SError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            A2SError::UnexpectedEof
        } else {
            A2SError::Io(err)
        }
    }

    // Byte

    pub fn read_byte(&mut self) -> Result<u8, A2SError> {
        self.inner.read_u8().map_err(Self::eof_to_a2s)
    }

    pub fn write_byte(&mut self, value: u8) {
        self.inner.write_u8(value).expect("writes to a Vec never fail");
    }

    // Short (i16 LE)

    pub fn read_short(&mut self) -> Result<i16, A2SError> {
        self.inner.read_i16::<LittleEndian>().map_err(Self::eof_to_a2s)
    }

    pub fn write_short(&mut self, value: i16) {
        self.inner
            .write_i16::<LittleEndian>(value)
            .expect("writes to a Vec never fail");
    }

    // Long (i32 LE)

    pub fn read_long(&mut self) -> Result<i32, A2SError> {
        self.inner.read_i32::<LittleEndian>().map_err(Self::eof_to_a2s)
    }

    pub fn write_long(&mut self, value: i32) {
        self.inner
            .write_i32::<LittleEndian>(value)
            .expect("writes to a Vec never fail");
    }

    // Long Long (u64 LE)

    pub fn read_long_long(&mut self) -> Result<u64, A2SError> {
        self.inner.read_u64::<LittleEndian>().map_err(Self::eof_to_a2s)
    }

    pub fn write_long_long(&mut self, value: u64) {
        self.inner
            .write_u64::<LittleEndian>(value)
            .expect("writes to a Vec never fail");
    }

    // Float (f32 LE)

    pub fn read_float(&mut self) -> Result<f32, A2SError> {
        self.inner.read_f32::<LittleEndian>().map_err(Self::eof_to_a2s)
    }

    pub fn write_float(&mut self, value: f32) {
        self.inner
            .write_f32::<LittleEndian>(value)
            .expect("writes to a Vec never fail");
    }

    // String (NUL-terminated, lossy UTF-8)

    /// Reads up to (and past) the next NUL byte. If no terminator remains, returns
    /// everything from the cursor to the end of the buffer and advances to the end —
    /// this tolerates responses truncated mid-string.
    pub fn read_string(&mut self) -> String {
        let start = self.inner.position() as usize;
        let data = self.inner.get_ref();

        let (text_end, next_pos) = match data[start..].iter().position(|&b| b == STRING_TERMINATOR) {
            Some(offset) => (start + offset, start + offset + 1),
            None => (data.len(), data.len()),
        };

        let value = String::from_utf8_lossy(&data[start..text_end]).into_owned();
        self.inner.set_position(next_pos as u64);

        value
    }

    pub fn write_string(&mut self, value: &str) {
        self.inner.write_all(value.as_bytes()).expect("writes to a Vec never fail");
        self.inner.write_all(&[STRING_TERMINATOR]).expect("writes to a Vec never fail");
    }

    /// Reads all remaining bytes without advancing past them conceptually (cursor ends at EOF).
    pub fn read_to_end(&mut self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.inner.read_to_end(&mut buf).expect("reading from a Vec never fails");
        buf
    }
}
