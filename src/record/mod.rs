//! Fixed-slot record stream of the `temp.xg` segment.
//!
//! The segment is a sequence of [`SLOT_SIZE`]-byte slots. Byte
//! [`KIND_OFFSET`] of each slot selects the record layout; the rest of the
//! slot is decoded by the matching submodule. Layouts grew over time, so the
//! format version carried by the most recent [`MatchHeader`] is threaded
//! through every later decode.

pub mod analysis;
pub mod checker;
pub mod cube;
pub mod footer;
pub mod game_header;
pub mod match_header;

use thiserror::Error;

use crate::cursor::{ByteCursor, ShortRead};

pub use analysis::{BestMoveAnalysis, DoubleAnalysis, EvalLevel, TimeSetting};
pub use checker::MoveEntry;
pub use cube::{CubeEntry, CUBE_INITIAL_POSITION};
pub use footer::{GameFooter, MatchFooter};
pub use game_header::GameHeader;
pub use match_header::MatchHeader;

pub const SLOT_SIZE: usize = 2560;
pub const KIND_OFFSET: usize = 8;
/// Common prefix of every slot: 8 bytes of bookkeeping and the kind byte.
pub(crate) const RECORD_HEADER_SIZE: usize = KIND_OFFSET + 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record stream truncated at offset {offset}: only {remaining} bytes left for a record slot")]
    Truncated { offset: usize, remaining: usize },
    #[error("Malformed {kind:?} record at offset {offset}: {source}")]
    Malformed { offset: usize, kind: RecordKind, source: ShortRead },
    #[error("Checker play at offset {offset}: move slot {index} holds {value}, not a point, bar, off or end marker")]
    InvalidMove { offset: usize, index: usize, value: i32 },
}

impl RecordError {
    /// Offset of the slot the error was found in.
    pub fn offset(&self) -> usize {
        match self {
            RecordError::Truncated { offset, .. }
            | RecordError::Malformed { offset, .. }
            | RecordError::InvalidMove { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    MatchHeader,
    GameHeader,
    Cube,
    Move,
    GameFooter,
    MatchFooter,
}

impl RecordKind {
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0 => Some(RecordKind::MatchHeader),
            1 => Some(RecordKind::GameHeader),
            2 => Some(RecordKind::Cube),
            3 => Some(RecordKind::Move),
            4 => Some(RecordKind::GameFooter),
            5 => Some(RecordKind::MatchFooter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    MatchHeader(MatchHeader),
    GameHeader(GameHeader),
    Cube(CubeEntry),
    Move(Box<MoveEntry>),
    GameFooter(GameFooter),
    MatchFooter(MatchFooter),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::MatchHeader(_) => RecordKind::MatchHeader,
            Record::GameHeader(_)  => RecordKind::GameHeader,
            Record::Cube(_)        => RecordKind::Cube,
            Record::Move(_)        => RecordKind::Move,
            Record::GameFooter(_)  => RecordKind::GameFooter,
            Record::MatchFooter(_) => RecordKind::MatchFooter,
        }
    }
}

// ── RecordStream ──────────────────────────────────────────────────────────────

/// Iterator over the records of a `temp.xg` segment.
///
/// Slots with an unknown kind byte are skipped. The stream always advances a
/// whole slot, whatever the decoder consumed. After an error the iterator is
/// exhausted.
pub struct RecordStream<'a> {
    data:    &'a [u8],
    offset:  usize,
    last:    Option<usize>,
    version: i32,
    failed:  bool,
}

impl<'a> RecordStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0, last: None, version: -1, failed: false }
    }

    /// Format version in effect for the next slot; `-1` before any match header.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Byte offset of the next slot.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Slot offset of the item most recently returned by `next`. Skipped
    /// slots never show up here.
    pub fn last_offset(&self) -> Option<usize> {
        self.last
    }

    fn decode_slot(&mut self, kind: RecordKind, slot: &[u8], offset: usize) -> Result<Record, RecordError> {
        let mut c = ByteCursor::with_base(slot, offset);
        let version = self.version;
        let record = match kind {
            RecordKind::MatchHeader => MatchHeader::decode(&mut c).map(Record::MatchHeader),
            RecordKind::GameHeader  => GameHeader::decode(&mut c, version).map(Record::GameHeader),
            RecordKind::Cube        => CubeEntry::decode(&mut c, version).map(Record::Cube),
            RecordKind::Move        => MoveEntry::decode(&mut c, version).map(|m| Record::Move(Box::new(m))),
            RecordKind::GameFooter  => GameFooter::decode(&mut c).map(Record::GameFooter),
            RecordKind::MatchFooter => MatchFooter::decode(&mut c).map(Record::MatchFooter),
        }
        .map_err(|source| RecordError::Malformed { offset, kind, source })?;

        match &record {
            Record::MatchHeader(h) => {
                tracing::debug!(version = h.version, offset, "match header");
                self.version = h.version;
            }
            Record::Move(m) => {
                if let Some((index, value)) = m.invalid_move() {
                    return Err(RecordError::InvalidMove { offset, index, value });
                }
            }
            _ => {}
        }
        Ok(record)
    }
}

impl<'a> Iterator for RecordStream<'a> {
    type Item = Result<Record, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed || self.offset >= self.data.len() {
                return None;
            }
            let offset = self.offset;
            let remaining = self.data.len() - offset;
            if remaining < SLOT_SIZE {
                self.last = Some(offset);
                self.failed = true;
                return Some(Err(RecordError::Truncated { offset, remaining }));
            }
            let slot = &self.data[offset..offset + SLOT_SIZE];
            self.offset += SLOT_SIZE;

            let Some(kind) = RecordKind::from_u8(slot[KIND_OFFSET]) else {
                tracing::debug!(offset, kind = slot[KIND_OFFSET], "skipping unknown record kind");
                continue;
            };
            self.last = Some(offset);
            let result = self.decode_slot(kind, slot, offset);
            if result.is_err() {
                self.failed = true;
            }
            return Some(result);
        }
    }
}

/// Decode a whole `temp.xg` segment, returning the records and the offset
/// where traversal stopped.
pub fn decode_stream(data: &[u8]) -> Result<(Vec<Record>, usize), RecordError> {
    let mut stream = RecordStream::new(data);
    let records = stream.by_ref().collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(records = records.len(), end = stream.offset(), "record stream decoded");
    Ok((records, stream.offset()))
}

pub fn parse_game_file(data: &[u8]) -> Result<Vec<Record>, RecordError> {
    decode_stream(data).map(|(records, _)| records)
}

// ── Test fixtures ─────────────────────────────────────────────────────────────
