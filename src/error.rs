use std::io;
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::header::HeaderError;
use crate::record::RecordError;
use crate::segment::SegmentError;

/// Any failure while turning a match file into a [`crate::Match`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Header(#[from] HeaderError),
    #[error("{0}")]
    Archive(#[from] ArchiveError),
    #[error("{0}")]
    Segment(#[from] SegmentError),
    #[error("{0}")]
    Record(#[from] RecordError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Byte offset inside the records segment, for record-level failures.
    pub fn record_offset(&self) -> Option<usize> {
        match self {
            Error::Record(e) => Some(e.offset()),
            _ => None,
        }
    }
}
