//! Little-endian byte cursor over one record slot.
//!
//! Every record decoder reads its fields through this type, so each field's
//! width and offset is spelled out at the call site instead of depending on
//! the in-memory layout of a Rust struct.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::util::{delphi_short_str, utf16_to_string};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("short read at offset {offset}: needed {needed} bytes, {available} available")]
pub struct ShortRead {
    /// Absolute offset of the failed read.
    pub offset:    usize,
    pub needed:    usize,
    pub available: usize,
}

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos:  usize,
    base: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// A cursor whose reported offsets are shifted by `base`, for slices cut
    /// out of a larger buffer.
    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Bytes consumed so far, relative to the start of the slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute offset of the next byte.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], ShortRead> {
        if n > self.remaining() {
            return Err(ShortRead {
                offset:    self.offset(),
                needed:    n,
                available: self.remaining(),
            });
        }
        let s = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), ShortRead> {
        self.take(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, ShortRead> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ShortRead> {
        Ok(self.read_u8()? as i8)
    }

    /// One byte, non-zero is `true`.
    pub fn read_bool(&mut self) -> Result<bool, ShortRead> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i16(&mut self) -> Result<i16, ShortRead> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, ShortRead> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ShortRead> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, ShortRead> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, ShortRead> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    pub fn read_i8_array<const N: usize>(&mut self) -> Result<[i8; N], ShortRead> {
        let bytes = self.take(N)?;
        let mut out = [0i8; N];
        for (dst, &b) in out.iter_mut().zip(bytes) {
            *dst = b as i8;
        }
        Ok(out)
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> Result<[i32; N], ShortRead> {
        let mut out = [0i32; N];
        LittleEndian::read_i32_into(self.take(N * 4)?, &mut out);
        Ok(out)
    }

    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N], ShortRead> {
        let mut out = [0f32; N];
        LittleEndian::read_f32_into(self.take(N * 4)?, &mut out);
        Ok(out)
    }

    pub fn read_f64_array<const N: usize>(&mut self) -> Result<[f64; N], ShortRead> {
        let mut out = [0f64; N];
        LittleEndian::read_f64_into(self.take(N * 8)?, &mut out);
        Ok(out)
    }

    /// A Delphi `ShortString` occupying exactly `capacity` bytes, length byte included.
    pub fn read_short_string(&mut self, capacity: usize) -> Result<String, ShortRead> {
        Ok(delphi_short_str(self.take(capacity)?))
    }

    /// A NUL-terminated UTF-16 buffer of exactly `units` code units.
    pub fn read_utf16_string(&mut self, units: usize) -> Result<String, ShortRead> {
        let bytes = self.take(units * 2)?;
        let mut buf = vec![0u16; units];
        LittleEndian::read_u16_into(bytes, &mut buf);
        Ok(utf16_to_string(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields_in_order() {
        let mut data = Vec::new();
        data.push(0xFFu8);
        data.extend_from_slice(&(-2i16).to_le_bytes());
        data.extend_from_slice(&123_456i32.to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-0.25f64).to_le_bytes());

        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_i8().unwrap(), -1);
        assert_eq!(c.read_i16().unwrap(), -2);
        assert_eq!(c.read_i32().unwrap(), 123_456);
        assert_eq!(c.read_f32().unwrap(), 1.5);
        assert_eq!(c.read_f64().unwrap(), -0.25);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn arrays() {
        let mut data = vec![1u8, 0xFE, 3];
        data.extend_from_slice(&7i32.to_le_bytes());
        data.extend_from_slice(&(-9i32).to_le_bytes());
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_i8_array::<3>().unwrap(), [1, -2, 3]);
        assert_eq!(c.read_i32_array::<2>().unwrap(), [7, -9]);
    }

    #[test]
    fn short_read_reports_absolute_offset() {
        let data = [0u8; 6];
        let mut c = ByteCursor::with_base(&data, 5120);
        c.skip(4).unwrap();
        let err = c.read_i32().unwrap_err();
        assert_eq!(err, ShortRead { offset: 5124, needed: 4, available: 2 });
        // a failed read consumes nothing
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn fixed_strings() {
        let mut data = vec![2u8, b'h', b'i', b'x'];
        for u in "ok".encode_utf16().chain([0, 0]) {
            data.extend_from_slice(&u.to_le_bytes());
        }
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_short_string(4).unwrap(), "hi");
        assert_eq!(c.read_utf16_string(4).unwrap(), "ok");
    }
}
