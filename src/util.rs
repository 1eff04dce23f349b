use std::io::{self, Read, Seek, SeekFrom};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use crc32fast::Hasher;
use encoding_rs::WINDOWS_1252;

const CRC_BUF_SIZE: usize = 32 * 1024;

/// CRC-32 (IEEE) over `len` bytes starting at absolute offset `start`.
///
/// The reader's position is restored before returning, so callers can
/// checksum a range without losing their place in the stream.
pub fn stream_crc32<R: Read + Seek>(reader: &mut R, start: u64, len: u64) -> io::Result<u32> {
    let saved = reader.stream_position()?;
    reader.seek(SeekFrom::Start(start))?;

    let mut hasher = Hasher::new();
    let mut buf = [0u8; CRC_BUF_SIZE];
    let mut remaining = len;
    while remaining > 0 {
        let want = remaining.min(CRC_BUF_SIZE as u64) as usize;
        reader.read_exact(&mut buf[..want])?;
        hasher.update(&buf[..want]);
        remaining -= want as u64;
    }

    reader.seek(SeekFrom::Start(saved))?;
    Ok(hasher.finalize())
}

/// Read exactly `len` bytes, growing the buffer only as data arrives so a
/// bogus length field cannot force a huge allocation up front.
pub fn read_bounded<R: Read>(reader: &mut R, len: u64) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(CRC_BUF_SIZE as u64) as usize);
    reader.take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("needed {len} bytes, stream ended after {}", buf.len()),
        ));
    }
    Ok(buf)
}

/// CRC-32 (IEEE) of an in-memory buffer.
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Decode a Delphi `ShortString`: one length byte followed by ANSI text.
///
/// A length byte larger than the buffer is clamped to what is actually there.
pub fn delphi_short_str(data: &[u8]) -> String {
    let Some((&len, rest)) = data.split_first() else {
        return String::new();
    };
    let len = (len as usize).min(rest.len());
    let (text, _, _) = WINDOWS_1252.decode(&rest[..len]);
    text.into_owned()
}

/// Convert a Delphi `TDateTime` (days since 1899-12-30) to a calendar time.
///
/// Returns `None` when the value falls outside chrono's representable range.
pub fn delphi_datetime(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let days = value.trunc() as i64;
    let seconds = ((value - value.trunc()) * 86_400.0) as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

/// `delphi_datetime` rendered as `YYYY-MM-DD HH:MM:SS`, empty when unrepresentable.
pub fn delphi_datetime_string(value: f64) -> String {
    delphi_datetime(value)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Decode a fixed UTF-16 buffer up to its first NUL code unit.
pub fn utf16_to_string(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}
