//! Reader for the zlib archive embedded after the container header.
//!
//! ```no_run
//! use std::fs::File;
//! use xgfile::archive::ZlibArchive;
//!
//! let mut ar = ZlibArchive::open(File::open("match.xg")?)?;
//! let records = ar.extract_by_name("temp.xg")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Layout
//! ```text
//! | ... | archive origin | file data ... | registry | trailer (36 B) |
//! ```
//! The trailer CRC covers everything from the archive origin up to the
//! trailer. Each registry entry carries its own CRC over the decoded bytes.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;

use crate::codec::{get_codec, CodecError, CodecId};
use crate::index::{ArchiveTrailer, FileIndex, FileRecord, IndexError, TRAILER_SIZE};
use crate::util::{crc32, read_bounded, stream_crc32};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why an archived file was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    Checksum { expected: u32, actual: u32 },
    Stream(String),
    /// Entry bytes would lie outside the archive data.
    Range { start: i32, size: i32 },
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corruption::Checksum { expected, actual } => {
                write!(f, "CRC mismatch (stored {expected:08x}, computed {actual:08x})")
            }
            Corruption::Stream(msg) => write!(f, "undecodable stream ({msg})"),
            Corruption::Range { start, size } => {
                write!(f, "entry range outside the archive (start {start}, size {size})")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Stream too small for an archive trailer ({0} bytes)")]
    TooSmall(u64),
    #[error("Archive trailer describes an impossible layout (index {index_size} B, archive {archive_size} B, stream end {end})")]
    BadTrailer { index_size: i32, archive_size: i32, end: u64 },
    #[error("Archive CRC check failed (stored {expected:08x}, computed {actual:08x}) - file corrupt")]
    CorruptArchive { expected: u32, actual: u32 },
    #[error("File CRC check failed for '{name}': {reason} - file corrupt")]
    CorruptFile { name: String, reason: Corruption },
    #[error("Error extracting archive index: {0}")]
    Index(#[from] IndexError),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Archive entry not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── ZlibArchive ───────────────────────────────────────────────────────────────

pub struct ZlibArchive<R: Read + Seek> {
    reader:             R,
    pub trailer:        ArchiveTrailer,
    pub index:          FileIndex,
    /// Absolute offset every entry's `start` is relative to.
    pub archive_origin: u64,
    /// Absolute offset of the trailer.
    pub archive_end:    u64,
}

impl<R: Read + Seek> ZlibArchive<R> {
    /// Locate the trailer, verify the archive CRC and load the file registry.
    pub fn open(mut reader: R) -> Result<Self, ArchiveError> {
        let len = reader.seek(SeekFrom::End(0))?;
        if len < TRAILER_SIZE as u64 {
            return Err(ArchiveError::TooSmall(len));
        }
        let archive_end = len - TRAILER_SIZE as u64;
        reader.seek(SeekFrom::Start(archive_end))?;
        let trailer = ArchiveTrailer::read(&mut reader)?;

        let bad_trailer = || ArchiveError::BadTrailer {
            index_size:   trailer.index_size,
            archive_size: trailer.archive_size,
            end:          archive_end,
        };
        let index_size = u64::try_from(trailer.index_size).map_err(|_| bad_trailer())?;
        let archive_size = u64::try_from(trailer.archive_size).map_err(|_| bad_trailer())?;
        let index_start = archive_end.checked_sub(index_size).ok_or_else(bad_trailer)?;
        let archive_origin = index_start.checked_sub(archive_size).ok_or_else(bad_trailer)?;

        let actual = stream_crc32(&mut reader, archive_origin, archive_end - archive_origin)?;
        if actual != trailer.crc {
            return Err(ArchiveError::CorruptArchive { expected: trailer.crc, actual });
        }

        reader.seek(SeekFrom::Start(index_start))?;
        let packed = read_bounded(&mut reader, index_size)?;
        let raw = get_codec(CodecId::from_index_flag(trailer.index_compressed)).decode(&packed)?;
        let index = FileIndex::from_bytes(&raw, trailer.file_count)?;

        tracing::debug!(
            files = index.records.len(),
            origin = archive_origin,
            index_size,
            crc = trailer.crc,
            "archive index loaded"
        );

        Ok(Self { reader, trailer, index, archive_origin, archive_end })
    }

    pub fn entries(&self) -> &[FileRecord] {
        &self.index.records
    }

    pub fn entry(&self, name: &str) -> Option<&FileRecord> {
        self.index.find(name)
    }

    /// Read, decode and CRC-check one archived file.
    pub fn extract(&mut self, record: &FileRecord) -> Result<Vec<u8>, ArchiveError> {
        let corrupt = |reason| ArchiveError::CorruptFile { name: record.name.clone(), reason };

        let range = || corrupt(Corruption::Range { start: record.start, size: record.compressed_size });
        let rel_start = u64::try_from(record.start).map_err(|_| range())?;
        let size = u64::try_from(record.compressed_size).map_err(|_| range())?;
        let start = self.archive_origin + rel_start;
        if start.checked_add(size).map_or(true, |end| end > self.archive_end) {
            return Err(range());
        }
        self.reader.seek(SeekFrom::Start(start))?;
        let payload = read_bounded(&mut self.reader, size)?;

        let codec = CodecId::from_entry_flag(record.compressed);
        let data = get_codec(codec).decode(&payload).map_err(|e| match e {
            CodecError::Decompression(msg) => corrupt(Corruption::Stream(msg)),
            other => ArchiveError::Codec(other),
        })?;

        let actual = crc32(&data);
        if actual != record.crc {
            return Err(corrupt(Corruption::Checksum { expected: record.crc, actual }));
        }
        tracing::debug!(name = %record.name, codec = codec.name(), bytes = data.len(), "extracted");
        Ok(data)
    }

    pub fn extract_by_name(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let record = self
            .entry(name)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(name.to_owned()))?;
        self.extract(&record)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
