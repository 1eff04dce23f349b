//! Split a match file into its named segments.
//!
//! A match file is a [`ContainerHeader`], an optional thumbnail image, and a
//! [`ZlibArchive`] holding the game segments. [`import`] returns all of them
//! as owned byte blobs; only [`SegmentKind::GameFile`] is decoded further.

use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;

use crate::archive::{ArchiveError, ZlibArchive};
use crate::header::{ContainerHeader, HeaderError};
use crate::index::FileRecord;
use crate::util::read_bounded;

/// Tag found at [`GAME_FILE_TAG_OFFSET`] of a genuine records segment.
pub const GAME_FILE_TAG: &[u8; 4] = b"DMLI";
pub const GAME_FILE_TAG_OFFSET: usize = 556;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Not a game data format file: {0}")]
    Header(#[from] HeaderError),
    #[error("{0}")]
    Archive(#[from] ArchiveError),
    #[error("Not a valid game file segment (tag {found:?})")]
    NotAGameFile { found: [u8; 4] },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    ContainerHeader,
    Thumbnail,
    GameHeader,
    GameFile,
    Rollouts,
    Comments,
    Unknown,
}

impl SegmentKind {
    /// Map an archive entry name to the segment it holds.
    pub fn from_entry_name(name: &str) -> Self {
        match name {
            "temp.xgi" => SegmentKind::GameHeader,
            "temp.xgr" => SegmentKind::Rollouts,
            "temp.xgc" => SegmentKind::Comments,
            "temp.xg"  => SegmentKind::GameFile,
            _          => SegmentKind::Unknown,
        }
    }

    /// Suffix conventionally used when a segment is dumped to disk.
    pub fn extension(self) -> &'static str {
        match self {
            SegmentKind::ContainerHeader => "_gdh.bin",
            SegmentKind::Thumbnail       => ".jpg",
            SegmentKind::GameHeader      => "_gamehdr.bin",
            SegmentKind::GameFile        => "_gamefile.bin",
            SegmentKind::Rollouts        => "_rollouts.bin",
            SegmentKind::Comments        => "_comments.bin",
            SegmentKind::Unknown         => "",
        }
    }

    fn is_auxiliary(self) -> bool {
        matches!(self, SegmentKind::Rollouts | SegmentKind::Comments | SegmentKind::Unknown)
    }
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Archive entry name; `None` for the header and thumbnail.
    pub name: Option<String>,
    pub data: Vec<u8>,
}

/// Configuration for [`import`].
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Read the embedded thumbnail into a [`SegmentKind::Thumbnail`] segment.
    pub load_thumbnail:       bool,
    /// Keep rollout, comment and unrecognised segments. They are extracted
    /// and CRC-checked either way.
    pub keep_auxiliary:       bool,
    pub verify_game_file_tag: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            load_thumbnail:       true,
            keep_auxiliary:       true,
            verify_game_file_tag: true,
        }
    }
}

/// Everything [`import`] pulled out of one file.
#[derive(Debug, Clone)]
pub struct Import {
    pub header:   ContainerHeader,
    pub entries:  Vec<FileRecord>,
    pub segments: Vec<Segment>,
}

impl Import {
    pub fn segment(&self, kind: SegmentKind) -> Option<&Segment> {
        self.segments.iter().find(|s| s.kind == kind)
    }
}

pub fn import<R: Read + Seek>(mut reader: R, opts: &ImportOptions) -> Result<Import, SegmentError> {
    reader.seek(SeekFrom::Start(0))?;
    let header = ContainerHeader::read(&mut reader)?;

    let mut segments = Vec::new();

    reader.seek(SeekFrom::Start(0))?;
    let header_bytes = read_bounded(&mut reader, header.header_size.max(0) as u64)?;
    segments.push(Segment { kind: SegmentKind::ContainerHeader, name: None, data: header_bytes });

    if opts.load_thumbnail && header.has_thumbnail() {
        reader.seek(SeekFrom::Start(header.thumbnail_start()))?;
        let image = read_bounded(&mut reader, header.thumbnail_size as u64)?;
        segments.push(Segment { kind: SegmentKind::Thumbnail, name: None, data: image });
    }

    let mut archive = ZlibArchive::open(reader)?;
    let entries = archive.entries().to_vec();
    for record in &entries {
        let data = archive.extract(record)?;
        let kind = SegmentKind::from_entry_name(&record.name);

        if kind == SegmentKind::GameFile && opts.verify_game_file_tag {
            check_game_file_tag(&data)?;
        }
        if kind.is_auxiliary() && !opts.keep_auxiliary {
            tracing::debug!(name = %record.name, "dropping auxiliary segment");
            continue;
        }
        segments.push(Segment { kind, name: Some(record.name.clone()), data });
    }

    tracing::debug!(segments = segments.len(), product = %header.game_name, "file imported");
    Ok(Import { header, entries, segments })
}

/// Short segments are let through; the record decoder reports them.
pub fn check_game_file_tag(data: &[u8]) -> Result<(), SegmentError> {
    let end = GAME_FILE_TAG_OFFSET + GAME_FILE_TAG.len();
    if data.len() <= end {
        return Ok(());
    }
    let mut found = [0u8; 4];
    found.copy_from_slice(&data[GAME_FILE_TAG_OFFSET..end]);
    if &found != GAME_FILE_TAG {
        return Err(SegmentError::NotAGameFile { found });
    }
    Ok(())
}
