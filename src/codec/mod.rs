//! Segment codecs used inside the match-file archive.
//!
//! The archive only ever uses two encodings: bytes stored verbatim and a
//! zlib stream. Which one applies is decided by a per-entry flag whose
//! meaning is inverted: a `compressed` byte of **zero** means the entry is
//! a zlib stream. [`CodecId::from_entry_flag`] is the single place that
//! interprets it.

use std::io::{self, Read};
use flate2::read::ZlibDecoder;
use thiserror::Error;

// ── CodecId ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecId {
    Stored,
    Zlib,
}

impl CodecId {
    /// Interpret a file-registry entry's compression byte.
    #[inline]
    pub fn from_entry_flag(compressed: u8) -> Self {
        if compressed == 0 { CodecId::Zlib } else { CodecId::Stored }
    }

    /// Interpret the trailer's index flag; non-zero means zlib.
    #[inline]
    pub fn from_index_flag(flag: i32) -> Self {
        if flag != 0 { CodecId::Zlib } else { CodecId::Stored }
    }

    /// Display name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            CodecId::Stored => "stored",
            CodecId::Zlib   => "zlib",
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Decompression error: {0}")]
    Decompression(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Codec trait ──────────────────────────────────────────────────────────────

pub trait Codec: Send + Sync {
    fn codec_id(&self) -> CodecId;
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

pub struct StoredCodec;
impl Codec for StoredCodec {
    fn codec_id(&self) -> CodecId { CodecId::Stored }
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> { Ok(data.to_vec()) }
}

pub struct ZlibCodec;
impl Codec for ZlibCodec {
    fn codec_id(&self) -> CodecId { CodecId::Zlib }
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(data.len() * 4);
        ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| CodecError::Decompression(e.to_string()))?;
        Ok(out)
    }
}

pub fn get_codec(id: CodecId) -> Box<dyn Codec> {
    match id {
        CodecId::Stored => Box::new(StoredCodec),
        CodecId::Zlib   => Box::new(ZlibCodec),
    }
}
