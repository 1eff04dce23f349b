//! Archive trailer and file registry.
//!
//! The trailer is the last [`TRAILER_SIZE`] bytes of the file. The registry
//! it points at is a flat array of [`ENTRY_SIZE`]-byte entries, usually
//! zlib-compressed as a whole.

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{self, Read};
use thiserror::Error;

use crate::cursor::{ByteCursor, ShortRead};

pub const TRAILER_SIZE: usize = 36;
/// name(256) + path(256) + 4 × i32 + crc(4) + 2 flags + 2 reserved.
pub const ENTRY_SIZE: usize = 532;
const NAME_CAPACITY: usize = 256;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Negative file count in archive trailer: {0}")]
    NegativeCount(i32),
    #[error("File registry truncated at entry {entry}: {source}")]
    Truncated { entry: usize, source: ShortRead },
}

#[derive(Debug, Clone)]
pub struct ArchiveTrailer {
    pub crc:              u32,
    pub file_count:       i32,
    pub version:          i32,
    pub index_size:       i32,
    pub archive_size:     i32,
    pub index_compressed: i32,
}

impl ArchiveTrailer {
    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        let trailer = Self {
            crc:              reader.read_u32::<LittleEndian>()?,
            file_count:       reader.read_i32::<LittleEndian>()?,
            version:          reader.read_i32::<LittleEndian>()?,
            index_size:       reader.read_i32::<LittleEndian>()?,
            archive_size:     reader.read_i32::<LittleEndian>()?,
            index_compressed: reader.read_i32::<LittleEndian>()?,
        };
        let mut reserved = [0u8; 12];
        reader.read_exact(&mut reserved)?;
        Ok(trailer)
    }
}

/// One entry of the file registry.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub name:              String,
    pub path:              String,
    pub original_size:     i32,
    pub compressed_size:   i32,
    /// Offset relative to the archive origin.
    pub start:             i32,
    pub crc:               u32,
    /// Zero means the entry is a zlib stream.
    pub compressed:        u8,
    pub compression_level: u8,
}

impl FileRecord {
    fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        let record = Self {
            name:              c.read_short_string(NAME_CAPACITY)?,
            path:              c.read_short_string(NAME_CAPACITY)?,
            original_size:     c.read_i32()?,
            compressed_size:   c.read_i32()?,
            start:             c.read_i32()?,
            crc:               c.read_u32()?,
            compressed:        c.read_u8()?,
            compression_level: c.read_u8()?,
        };
        c.skip(2)?;
        Ok(record)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    pub records: Vec<FileRecord>,
}

impl FileIndex {
    /// Parse `count` entries from a decompressed registry.
    pub fn from_bytes(bytes: &[u8], count: i32) -> Result<Self, IndexError> {
        if count < 0 {
            return Err(IndexError::NegativeCount(count));
        }
        let mut c = ByteCursor::new(bytes);
        let records = (0..count as usize)
            .map(|entry| {
                FileRecord::decode(&mut c).map_err(|source| IndexError::Truncated { entry, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn find(&self, name: &str) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}
