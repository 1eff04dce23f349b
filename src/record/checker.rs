use crate::cursor::{ByteCursor, ShortRead};

use super::analysis::BestMoveAnalysis;
use super::RECORD_HEADER_SIZE;

/// A checker play, with the engine's ranked alternatives.
///
/// `moves` holds up to four `(from, to)` pairs in 0-based point numbers,
/// where 24 is the bar, -2 is borne off and -1 terminates the list.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveEntry {
    pub position_i:                 [i8; 26],
    pub position_end:               [i8; 26],
    pub active_p:                   i32,
    pub moves:                      [i32; 8],
    pub dice:                       [i32; 2],
    pub cube_a:                     i32,
    pub error_m:                    f64,
    pub n_move_eval:                i32,
    pub data_moves:                 BestMoveAnalysis,
    pub played:                     bool,
    pub err_move:                   f64,
    pub err_luck:                   f64,
    pub comp_choice:                i32,
    pub init_eq:                    f64,
    pub rollout_index_m:            [i32; 32],
    pub analyze_m:                  i32,
    pub analyze_l:                  i32,
    pub invalid_m:                  i32,
    pub position_tutor:             [i8; 26],
    pub tutor:                      i8,
    pub err_tutor_move:             f64,
    pub flagged:                    bool,
    pub comment_move:               i32,
    // version >= 24
    pub edited_move:                bool,
    // version >= 26
    pub time_delay_move:            u32,
    pub time_delay_move_done:       u32,
    // version >= 27
    pub number_of_auto_double_move: i32,
}

impl MoveEntry {
    /// First entry of `moves` that is not a point, the bar, off or the end
    /// marker, with its index.
    pub fn invalid_move(&self) -> Option<(usize, i32)> {
        self.moves
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, v)| !(-2..=24).contains(&v))
    }

    pub fn decode(c: &mut ByteCursor<'_>, version: i32) -> Result<Self, ShortRead> {
        c.skip(RECORD_HEADER_SIZE)?;
        let position_i = c.read_i8_array()?;
        let position_end = c.read_i8_array()?;
        c.skip(3)?;
        let active_p = c.read_i32()?;
        let moves = c.read_i32_array()?;
        let dice = c.read_i32_array()?;
        let cube_a = c.read_i32()?;
        let error_m = c.read_f64()?;
        let n_move_eval = c.read_i32()?;
        let data_moves = BestMoveAnalysis::decode(c)?;
        let played = c.read_bool()?;
        c.skip(3)?;
        let err_move = c.read_f64()?;
        let err_luck = c.read_f64()?;
        let comp_choice = c.read_i32()?;
        c.skip(4)?;
        let init_eq = c.read_f64()?;
        let rollout_index_m = c.read_i32_array()?;
        let analyze_m = c.read_i32()?;
        let analyze_l = c.read_i32()?;
        let invalid_m = c.read_i32()?;
        let position_tutor = c.read_i8_array()?;
        let tutor = c.read_i8()?;
        c.skip(1)?;
        let err_tutor_move = c.read_f64()?;
        let flagged = c.read_bool()?;
        c.skip(3)?;
        let comment_move = c.read_i32()?;

        let mut entry = Self {
            position_i,
            position_end,
            active_p,
            moves,
            dice,
            cube_a,
            error_m,
            n_move_eval,
            data_moves,
            played,
            err_move,
            err_luck,
            comp_choice,
            init_eq,
            rollout_index_m,
            analyze_m,
            analyze_l,
            invalid_m,
            position_tutor,
            tutor,
            err_tutor_move,
            flagged,
            comment_move,
            edited_move:                false,
            time_delay_move:            0,
            time_delay_move_done:       0,
            number_of_auto_double_move: 0,
        };

        if version >= 24 {
            entry.edited_move = c.read_bool()?;
        }
        if version >= 26 {
            c.skip(3)?;
            entry.time_delay_move = c.read_u32()?;
            entry.time_delay_move_done = c.read_u32()?;
        }
        if version >= 27 {
            entry.number_of_auto_double_move = c.read_i32()?;
        }
        Ok(entry)
    }
}
