//! Decoder for eXtreme Gammon match files.
//!
//! ```no_run
//! let m = xgfile::parse_file("match.xg")?;
//! for game in &m.games {
//!     println!("game {}: {} moves", game.game_number, game.moves.len());
//! }
//! # Ok::<(), xgfile::Error>(())
//! ```

pub mod util;
pub mod cursor;
pub mod header;
pub mod codec;
pub mod index;
pub mod archive;
pub mod segment;
pub mod record;
pub mod model;
pub mod assemble;
pub mod batch;
pub mod error;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

pub use archive::{ArchiveError, ZlibArchive};
pub use error::Error;
pub use header::ContainerHeader;
pub use model::{CheckerAnalysis, CheckerMove, CubeAnalysis, CubeMove, Game, Match, MatchMetadata, Move, MoveType, Position};
pub use record::{decode_stream, parse_game_file, Record, RecordError, RecordKind, RecordStream};
pub use segment::{import, Import, ImportOptions, Segment, SegmentKind};

/// Decode a match from any seekable byte source.
pub fn parse_reader<R: Read + Seek>(reader: R) -> Result<Match, Error> {
    let opts = ImportOptions { load_thumbnail: false, keep_auxiliary: false, ..Default::default() };
    let imported = import(reader, &opts)?;
    parse_segments(&imported.segments)
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Match, Error> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "parsing");
    parse_reader(BufReader::new(File::open(path)?))
}

/// Decode a match from segments that were already extracted, wherever they
/// came from. A missing records segment yields an empty match.
pub fn parse_segments(segments: &[Segment]) -> Result<Match, Error> {
    let product_version = segments
        .iter()
        .find(|s| s.kind == SegmentKind::ContainerHeader)
        .and_then(|s| match ContainerHeader::read(s.data.as_slice()) {
            Ok(h) => Some(h.game_name),
            Err(e) => {
                tracing::debug!(error = %e, "container header segment unreadable");
                None
            }
        })
        .unwrap_or_default();

    let mut asm = assemble::Assembler::new(product_version);
    match segments.iter().find(|s| s.kind == SegmentKind::GameFile) {
        Some(game_file) => {
            for record in RecordStream::new(&game_file.data) {
                asm.push(record?);
            }
        }
        None => tracing::warn!("no records segment present"),
    }
    Ok(asm.finish())
}
