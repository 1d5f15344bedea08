//! Bounds-checked little-endian primitive reads over an in-memory save
//! buffer.
//!
//! All multi-byte values in the format are little-endian.  Strings are
//! stored as an i32 length counting a trailing NUL, followed by that many
//! bytes; a zero length means the empty string with no payload.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::err::{Error, Result};

/// Substituted for a string whose embedded content length disagrees with its
/// declared length.  The mismatch is reported but not fatal, so the rest of
/// the buffer stays inspectable.
pub const ERROR_STRING: &str = "<error>";

pub struct SaveReader<'a> {
    cur: Cursor<&'a [u8]>,
}

impl<'a> SaveReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cur: Cursor::new(data),
        }
    }

    /// Current read position, as an absolute offset into the buffer.
    pub fn offset(&self) -> usize {
        self.cur.position() as usize
    }

    pub fn len(&self) -> usize {
        self.cur.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.offset())
    }

    fn overrun(&self, offset: usize, wanted: usize) -> Error {
        Error::BufferOverrun {
            offset,
            wanted,
            available: self.len().saturating_sub(offset),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let offset = self.offset();
        self.cur.read_u8().map_err(|_| self.overrun(offset, 1))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let offset = self.offset();
        self.cur
            .read_u32::<LittleEndian>()
            .map_err(|_| self.overrun(offset, 4))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let offset = self.offset();
        self.cur
            .read_i32::<LittleEndian>()
            .map_err(|_| self.overrun(offset, 4))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let offset = self.offset();
        self.cur
            .read_f32::<LittleEndian>()
            .map_err(|_| self.overrun(offset, 4))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u32()? != 0)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let offset = self.offset();
        if n > self.remaining() {
            return Err(self.overrun(offset, n));
        }
        let mut buf = vec![0u8; n];
        self.cur
            .read_exact(&mut buf)
            .map_err(|_| self.overrun(offset, n))?;
        Ok(buf)
    }

    /// Read a length-prefixed, NUL-terminated string.
    ///
    /// The declared length counts the terminator, so a well-formed payload
    /// holds exactly `len - 1` content bytes then a NUL.  A payload whose
    /// first NUL is anywhere else is reported and replaced with
    /// [`ERROR_STRING`]; the cursor still advances by the declared length so
    /// later offsets remain diagnosable.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.offset();
        let len = self.read_u32()? as usize;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(len)?;
        match bytes.iter().position(|&b| b == 0) {
            Some(n) if n == len - 1 => Ok(String::from_utf8_lossy(&bytes[..n]).into_owned()),
            actual => {
                log::warn!(
                    "string at offset {start:#x} declares length {len} but content length is {:?}",
                    actual
                );
                Ok(ERROR_STRING.to_owned())
            }
        }
    }
}
