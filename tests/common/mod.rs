#![allow(dead_code)]

use crc32fast::Hasher;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

pub const SLOT: usize = 2560;
pub const HEADER_SIZE: usize = 8232;

// ── Record slots ──────────────────────────────────────────────────────────────

pub struct Slot(pub Vec<u8>);

impl Slot {
    pub fn new(kind: u8) -> Self {
        let mut buf = vec![0u8; SLOT];
        buf[8] = kind;
        Slot(buf)
    }

    pub fn u8(mut self, at: usize, v: u8) -> Self {
        self.0[at] = v;
        self
    }

    pub fn i8s(mut self, at: usize, v: &[i8]) -> Self {
        for (i, &b) in v.iter().enumerate() {
            self.0[at + i] = b as u8;
        }
        self
    }

    pub fn i16(mut self, at: usize, v: i16) -> Self {
        self.0[at..at + 2].copy_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(mut self, at: usize, v: i32) -> Self {
        self.0[at..at + 4].copy_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32(mut self, at: usize, v: f32) -> Self {
        self.0[at..at + 4].copy_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f64(mut self, at: usize, v: f64) -> Self {
        self.0[at..at + 8].copy_from_slice(&v.to_le_bytes());
        self
    }

    pub fn short_str(mut self, at: usize, s: &str) -> Self {
        self.0[at] = s.len() as u8;
        self.0[at + 1..at + 1 + s.len()].copy_from_slice(s.as_bytes());
        self
    }

    pub fn utf16(mut self, at: usize, s: &str) -> Self {
        for (i, u) in s.encode_utf16().enumerate() {
            self.0[at + 2 * i..at + 2 * i + 2].copy_from_slice(&u.to_le_bytes());
        }
        self
    }
}

pub fn match_header(version: i32, player1: &str, player2: &str) -> Slot {
    let mut s = Slot::new(0)
        .short_str(9, player1)
        .short_str(50, player2)
        .i32(92, 7)
        .f64(128, 45000.5)
        .short_str(136, "Club night")
        .i32(552, version);
    s.0[556..560].copy_from_slice(b"DMLI");
    if version >= 24 {
        s = s.utf16(622 + 258, player1).utf16(622 + 2 * 258, player2);
    }
    s
}

pub fn game_header(game_number: i32, score: [i32; 2]) -> Slot {
    Slot::new(1).i32(12, score[0]).i32(16, score[1]).i32(48, game_number)
}

pub fn cube_decision(active: i32, double: i32) -> Slot {
    Slot::new(2).i32(12, active).i32(16, double).i32(32, 1)
}

pub fn game_footer(winner: i32, points: i32) -> Slot {
    Slot::new(4).i32(24, winner).i32(28, points)
}

pub fn match_footer() -> Slot {
    Slot::new(5)
}

pub fn records(slots: Vec<Slot>) -> Vec<u8> {
    slots.into_iter().flat_map(|s| s.0).collect()
}

// ── Container ─────────────────────────────────────────────────────────────────

pub fn crc(data: &[u8]) -> u32 {
    let mut h = Hasher::new();
    h.update(data);
    h.finalize()
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn text_field(out: &mut Vec<u8>, s: &str) {
    let mut field = vec![0u8; 2048];
    for (i, u) in s.encode_utf16().enumerate() {
        field[2 * i..2 * i + 2].copy_from_slice(&u.to_le_bytes());
    }
    out.extend_from_slice(&field);
}

fn short_field(out: &mut Vec<u8>, s: &str) {
    let mut field = vec![0u8; 256];
    field[0] = s.len() as u8;
    field[1..=s.len()].copy_from_slice(s.as_bytes());
    out.extend_from_slice(&field);
}

pub struct Entry {
    pub name:       String,
    pub data:       Vec<u8>,
    pub compressed: bool,
}

/// Byte to XOR with 0xFF inside one entry's stored payload, applied before
/// the archive CRC is computed so only the entry check can notice it.
#[derive(Clone, Copy)]
pub struct Tamper {
    pub entry:  usize,
    pub offset: usize,
}

pub struct FileBuilder {
    pub game_name:      String,
    pub thumbnail:      Vec<u8>,
    pub entries:        Vec<Entry>,
    pub tamper:         Option<Tamper>,
    /// Write the registry uncompressed, with a zero trailer flag.
    pub stored_index:   bool,
    /// Replace one entry's registered start offset.
    pub start_override: Option<(usize, i32)>,
}

impl FileBuilder {
    pub fn new() -> Self {
        Self {
            game_name:      "eXtreme Gammon 2.19".into(),
            thumbnail:      Vec::new(),
            entries:        Vec::new(),
            tamper:         None,
            stored_index:   false,
            start_override: None,
        }
    }

    pub fn entry(mut self, name: &str, data: Vec<u8>, compressed: bool) -> Self {
        self.entries.push(Entry { name: name.into(), data, compressed });
        self
    }

    pub fn game(records: Vec<u8>) -> Self {
        let mut info = vec![0u8; 64];
        info[0] = 1;
        Self::new()
            .entry("temp.xgi", info, true)
            .entry("temp.xgr", vec![7u8; 300], true)
            .entry("temp.xg", records, true)
            .entry("temp.xgc", b"comments".to_vec(), false)
    }

    pub fn payload(&self, entry: usize) -> Vec<u8> {
        let e = &self.entries[entry];
        if e.compressed { zlib(&e.data) } else { e.data.clone() }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"RGMH");
        out.extend_from_slice(&1i32.to_le_bytes());
        out.extend_from_slice(&(HEADER_SIZE as i32).to_le_bytes());
        out.extend_from_slice(&0i64.to_le_bytes());
        out.extend_from_slice(&(self.thumbnail.len() as u32).to_le_bytes());
        out.extend_from_slice(&[0x11u8; 16]);
        text_field(&mut out, &self.game_name);
        text_field(&mut out, "saved");
        text_field(&mut out, "");
        text_field(&mut out, "");
        assert_eq!(out.len(), HEADER_SIZE);
        out.extend_from_slice(&self.thumbnail);

        let origin = out.len();
        let mut index = Vec::new();
        for (i, e) in self.entries.iter().enumerate() {
            let mut payload = self.payload(i);
            if let Some(t) = self.tamper.filter(|t| t.entry == i) {
                payload[t.offset] ^= 0xFF;
            }
            let mut start = (out.len() - origin) as i32;
            out.extend_from_slice(&payload);
            if let Some((_, s)) = self.start_override.filter(|&(entry, _)| entry == i) {
                start = s;
            }

            short_field(&mut index, &e.name);
            short_field(&mut index, "");
            index.extend_from_slice(&(e.data.len() as i32).to_le_bytes());
            index.extend_from_slice(&(payload.len() as i32).to_le_bytes());
            index.extend_from_slice(&start.to_le_bytes());
            index.extend_from_slice(&crc(&e.data).to_le_bytes());
            index.push(if e.compressed { 0 } else { 1 });
            index.push(6);
            index.extend_from_slice(&[0, 0]);
        }
        let archive_size = out.len() - origin;
        let packed_index = if self.stored_index { index } else { zlib(&index) };
        out.extend_from_slice(&packed_index);

        let archive_crc = crc(&out[origin..]);
        for v in [
            archive_crc as i32,
            self.entries.len() as i32,
            1,
            packed_index.len() as i32,
            archive_size as i32,
            if self.stored_index { 0 } else { 1 },
        ] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&[0u8; 12]);
        out
    }
}
