use crate::cursor::{ByteCursor, ShortRead};

use super::analysis::DoubleAnalysis;

/// `double` value marking a placeholder entry that only records the
/// initial position. Such entries carry no decision.
pub const CUBE_INITIAL_POSITION: i32 = -2;

/// A cube decision: double (or not) and the opponent's response.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeEntry {
    /// `1` or `-1`; `-1` means the stored position is from player 2's side.
    pub active_p:                   i32,
    pub double:                     i32,
    pub take:                       i32,
    pub beaver_r:                   i32,
    pub raccoon_r:                  i32,
    pub cube_b:                     i32,
    pub position:                   [i8; 26],
    pub doubled:                    DoubleAnalysis,
    pub err_cube:                   f64,
    pub dice_rolled:                String,
    pub err_take:                   f64,
    pub rollout_index_d:            i32,
    pub comp_choice_d:              i32,
    pub analyze_c:                  i32,
    pub err_beaver:                 f64,
    pub err_raccoon:                f64,
    pub analyze_cr:                 i32,
    pub is_valid:                   i32,
    pub tutor_cube:                 i8,
    pub tutor_take:                 i8,
    pub err_tutor_cube:             f64,
    pub err_tutor_take:             f64,
    pub flagged_double:             bool,
    pub comment_cube:               i32,
    // version >= 24
    pub edited_cube:                bool,
    // version >= 26
    pub time_delay_cube:            bool,
    pub time_delay_cube_done:       bool,
    // version >= 27
    pub number_of_auto_double_cube: i32,
    // version >= 28
    pub time_bot:                   i32,
    pub time_top:                   i32,
}

impl CubeEntry {
    pub fn decode(c: &mut ByteCursor<'_>, version: i32) -> Result<Self, ShortRead> {
        c.skip(12)?;
        let active_p = c.read_i32()?;
        let double = c.read_i32()?;
        let take = c.read_i32()?;
        let beaver_r = c.read_i32()?;
        let raccoon_r = c.read_i32()?;
        let cube_b = c.read_i32()?;
        let position = c.read_i8_array()?;
        c.skip(2)?;
        let doubled = DoubleAnalysis::decode(c)?;
        c.skip(4)?;
        let err_cube = c.read_f64()?;
        let dice_rolled = c.read_short_string(3)?;
        c.skip(5)?;
        let err_take = c.read_f64()?;
        let rollout_index_d = c.read_i32()?;
        let comp_choice_d = c.read_i32()?;
        let analyze_c = c.read_i32()?;
        c.skip(4)?;
        let err_beaver = c.read_f64()?;
        let err_raccoon = c.read_f64()?;
        let analyze_cr = c.read_i32()?;
        let is_valid = c.read_i32()?;
        let tutor_cube = c.read_i8()?;
        let tutor_take = c.read_i8()?;
        c.skip(6)?;
        let err_tutor_cube = c.read_f64()?;
        let err_tutor_take = c.read_f64()?;
        let flagged_double = c.read_bool()?;
        c.skip(3)?;
        let comment_cube = c.read_i32()?;

        let mut entry = Self {
            active_p,
            double,
            take,
            beaver_r,
            raccoon_r,
            cube_b,
            position,
            doubled,
            err_cube,
            dice_rolled,
            err_take,
            rollout_index_d,
            comp_choice_d,
            analyze_c,
            err_beaver,
            err_raccoon,
            analyze_cr,
            is_valid,
            tutor_cube,
            tutor_take,
            err_tutor_cube,
            err_tutor_take,
            flagged_double,
            comment_cube,
            edited_cube:                false,
            time_delay_cube:            false,
            time_delay_cube_done:       false,
            number_of_auto_double_cube: 0,
            time_bot:                   0,
            time_top:                   0,
        };

        if version >= 24 {
            entry.edited_cube = c.read_bool()?;
        }
        if version >= 26 {
            entry.time_delay_cube = c.read_bool()?;
            entry.time_delay_cube_done = c.read_bool()?;
        }
        if version >= 27 {
            c.skip(1)?;
            entry.number_of_auto_double_cube = c.read_i32()?;
        }
        if version >= 28 {
            entry.time_bot = c.read_i32()?;
            entry.time_top = c.read_i32()?;
        }
        Ok(entry)
    }

    pub fn is_initial_position(&self) -> bool {
        self.double == CUBE_INITIAL_POSITION
    }
}
