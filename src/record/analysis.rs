//! Fixed-layout sub-records embedded in cube and checker-play records.

use crate::cursor::{ByteCursor, ShortRead};

/// Alternatives stored per checker-play analysis.
pub const MAX_ALTERNATIVES: usize = 32;

/// Clock configuration attached to match headers from format version 25.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSetting {
    pub clock_type:    i32,
    pub per_game:      bool,
    pub time1:         i32,
    pub time2:         i32,
    pub penalty:       i32,
    pub time_left1:    i32,
    pub time_left2:    i32,
    pub penalty_money: i32,
}

impl TimeSetting {
    pub const SIZE: usize = 32;

    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        let clock_type = c.read_i32()?;
        let per_game = c.read_bool()?;
        c.skip(3)?;
        Ok(Self {
            clock_type,
            per_game,
            time1:         c.read_i32()?,
            time2:         c.read_i32()?,
            penalty:       c.read_i32()?,
            time_left1:    c.read_i32()?,
            time_left2:    c.read_i32()?,
            penalty_money: c.read_i32()?,
        })
    }
}

/// Search depth of one evaluation; level 0 is a book/database lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalLevel {
    pub level:     i16,
    pub is_double: bool,
}

impl EvalLevel {
    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        let level = c.read_i16()?;
        let is_double = c.read_bool()?;
        c.skip(1)?;
        Ok(Self { level, is_double })
    }
}

/// Engine output for a cube decision.
///
/// `eval` is the cubeless evaluation of the position as it stands, always
/// from the side on roll: `[opp bg, opp gammon, opp win, _, own gammon,
/// own bg, cubeless equity]`. `eval_double` is the same vector for the
/// doubled position.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleAnalysis {
    pub pos:            [i8; 26],
    pub level:          i32,
    pub score:          [i32; 2],
    pub cube:           i32,
    pub cube_pos:       i32,
    pub jacoby:         i32,
    pub crawford:       i16,
    pub met:            i16,
    pub flag_double:    i16,
    pub is_beaver:      i16,
    pub eval:           [f32; 7],
    /// Cubeful equity of not doubling.
    pub equ_no_double:  f32,
    /// Cubeful equity of double/take.
    pub equ_double:     f32,
    /// Cubeful equity of double/pass.
    pub equ_drop:       f32,
    pub level_request:  i16,
    pub double_choice3: i16,
    pub eval_double:    [f32; 7],
}

impl DoubleAnalysis {
    pub const SIZE: usize = 132;

    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        let pos = c.read_i8_array()?;
        c.skip(2)?;
        Ok(Self {
            pos,
            level:          c.read_i32()?,
            score:          c.read_i32_array()?,
            cube:           c.read_i32()?,
            cube_pos:       c.read_i32()?,
            jacoby:         c.read_i32()?,
            crawford:       c.read_i16()?,
            met:            c.read_i16()?,
            flag_double:    c.read_i16()?,
            is_beaver:      c.read_i16()?,
            eval:           c.read_f32_array()?,
            equ_no_double:  c.read_f32()?,
            equ_double:     c.read_f32()?,
            equ_drop:       c.read_f32()?,
            level_request:  c.read_i16()?,
            double_choice3: c.read_i16()?,
            eval_double:    c.read_f32_array()?,
        })
    }
}

/// Engine output for a checker play: up to 32 ranked candidate moves.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMoveAnalysis {
    pub pos:        [i8; 26],
    /// Stored as two full i32 values, not bytes.
    pub dice:       [i32; 2],
    pub level:      i32,
    pub score:      [i32; 2],
    pub cube:       i32,
    pub cube_pos:   i32,
    /// Same stored value as `cube_pos`, kept under the older field name
    /// that downstream consumers still read.
    pub cubepos:    i32,
    pub crawford:   i32,
    pub jacoby:     i32,
    pub n_moves:    i32,
    pub pos_played: [[i8; 26]; MAX_ALTERNATIVES],
    pub moves:      [[i8; 8]; MAX_ALTERNATIVES],
    pub eval_level: [EvalLevel; MAX_ALTERNATIVES],
    pub eval:       [[f32; 7]; MAX_ALTERNATIVES],
    pub unused:     i8,
    pub met:        i8,
    pub choice0:    i8,
    pub choice3:    i8,
}

impl BestMoveAnalysis {
    pub const SIZE: usize = 2184;

    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        let pos = c.read_i8_array()?;
        c.skip(2)?;
        let dice = c.read_i32_array()?;
        let level = c.read_i32()?;
        let score = c.read_i32_array()?;
        let cube = c.read_i32()?;
        let cube_pos = c.read_i32()?;
        let crawford = c.read_i32()?;
        let jacoby = c.read_i32()?;
        let n_moves = c.read_i32()?;

        let mut pos_played = [[0i8; 26]; MAX_ALTERNATIVES];
        for p in pos_played.iter_mut() {
            *p = c.read_i8_array()?;
        }
        let mut moves = [[0i8; 8]; MAX_ALTERNATIVES];
        for m in moves.iter_mut() {
            *m = c.read_i8_array()?;
        }
        let mut eval_level = [EvalLevel::default(); MAX_ALTERNATIVES];
        for l in eval_level.iter_mut() {
            *l = EvalLevel::decode(c)?;
        }
        let mut eval = [[0f32; 7]; MAX_ALTERNATIVES];
        for e in eval.iter_mut() {
            *e = c.read_f32_array()?;
        }

        Ok(Self {
            pos,
            dice,
            level,
            score,
            cube,
            cube_pos,
            cubepos: cube_pos,
            crawford,
            jacoby,
            n_moves,
            pos_played,
            moves,
            eval_level,
            eval,
            unused:  c.read_i8()?,
            met:     c.read_i8()?,
            choice0: c.read_i8()?,
            choice3: c.read_i8()?,
        })
    }

    /// Number of usable alternatives: `n_moves` clamped to `0..=32`.
    pub fn alternatives(&self) -> usize {
        self.n_moves.clamp(0, MAX_ALTERNATIVES as i32) as usize
    }
}
