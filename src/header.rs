use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{self, Read};
use thiserror::Error;
use uuid::Uuid;

use crate::util::utf16_to_string;

/// Container tag once the four stored bytes are reversed.
pub const MAGIC: &[u8; 4] = b"HMGR";
pub const VERSION: i32 = 1;
/// UTF-16 code units per text field.
pub const TEXT_FIELD_UNITS: usize = 1024;
/// Fixed prefix + GUID + four text fields.
pub const HEADER_RECORD_SIZE: usize = 40 + 4 * TEXT_FIELD_UNITS * 2;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Invalid magic number: {found:?}")]
    InvalidMagic { found: [u8; 4] },
    #[error("Unsupported header version: {0}")]
    UnsupportedVersion(i32),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The fixed header at the start of every match file.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerHeader {
    pub magic:            [u8; 4],
    pub version:          i32,
    /// Where the header region ends; the thumbnail offset is relative to it.
    pub header_size:      i32,
    pub thumbnail_offset: i64,
    pub thumbnail_size:   u32,
    pub game_guid:        Uuid,
    /// Producing application, e.g. "eXtreme Gammon 2.19".
    pub game_name:        String,
    pub save_name:        String,
    pub level_name:       String,
    pub comments:         String,
}

impl ContainerHeader {
    pub fn read<R: Read>(mut reader: R) -> Result<Self, HeaderError> {
        let mut stored = [0u8; 4];
        reader.read_exact(&mut stored)?;
        let magic = [stored[3], stored[2], stored[1], stored[0]];
        if &magic != MAGIC {
            return Err(HeaderError::InvalidMagic { found: magic });
        }
        let version = reader.read_i32::<LittleEndian>()?;
        if version != VERSION {
            return Err(HeaderError::UnsupportedVersion(version));
        }
        let header_size = reader.read_i32::<LittleEndian>()?;
        let thumbnail_offset = reader.read_i64::<LittleEndian>()?;
        let thumbnail_size = reader.read_u32::<LittleEndian>()?;

        // Delphi TGUID: the first three fields are little-endian.
        let mut guid_bytes = [0u8; 16];
        reader.read_exact(&mut guid_bytes)?;
        let game_guid = Uuid::from_bytes_le(guid_bytes);

        Ok(Self {
            magic,
            version,
            header_size,
            thumbnail_offset,
            thumbnail_size,
            game_guid,
            game_name:  read_text_field(&mut reader)?,
            save_name:  read_text_field(&mut reader)?,
            level_name: read_text_field(&mut reader)?,
            comments:   read_text_field(&mut reader)?,
        })
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail_size > 0
    }

    /// Absolute file offset of the embedded thumbnail.
    pub fn thumbnail_start(&self) -> u64 {
        (self.header_size as i64).saturating_add(self.thumbnail_offset).max(0) as u64
    }
}

fn read_text_field<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut units = vec![0u16; TEXT_FIELD_UNITS];
    reader.read_u16_into::<LittleEndian>(&mut units)?;
    Ok(utf16_to_string(&units))
}
