use crate::cursor::{ByteCursor, ShortRead};
use crate::util::delphi_datetime_string;

use super::analysis::TimeSetting;
use super::RECORD_HEADER_SIZE;

/// Offset of the format-version field within the slot.
pub const VERSION_OFFSET: usize = 552;

const PLAYER_NAME_CAPACITY: usize = 41;
const TEXT_CAPACITY: usize = 129;
const UNICODE_UNITS: usize = 129;

/// First record of every stream. Its `version` governs how every later
/// record in the same stream is decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchHeader {
    pub s_player1:              String,
    pub s_player2:              String,
    pub match_length:           i32,
    pub variation:              i32,
    pub crawford:               bool,
    pub jacoby:                 bool,
    pub beaver:                 bool,
    pub auto_double:            bool,
    pub elo1:                   f64,
    pub elo2:                   f64,
    pub exp1:                   i32,
    pub exp2:                   i32,
    /// Delphi `TDateTime`; see [`MatchHeader::date_string`].
    pub date:                   f64,
    pub s_event:                String,
    pub game_id:                i32,
    pub comp_level1:            i32,
    pub comp_level2:            i32,
    pub count_for_elo:          bool,
    pub add_to_profile1:        bool,
    pub add_to_profile2:        bool,
    pub s_location:             String,
    pub game_mode:              i32,
    pub imported:               bool,
    pub s_round:                String,
    pub invert:                 i32,
    pub version:                i32,
    pub magic:                  u32,
    pub money_init_g:           i32,
    pub money_init_score:       [i32; 2],
    pub entered:                bool,
    pub counted:                bool,
    pub unrated_imp:            bool,
    pub comment_header_match:   i32,
    pub comment_footer_match:   i32,
    pub is_money_match:         bool,
    pub win_money:              f32,
    pub lose_money:             f32,
    pub currency:               i32,
    pub fee_money:              f32,
    pub table_stake:            i32,
    pub site_id:                i32,
    // version >= 8
    pub cube_limit:             i32,
    pub auto_double_max:        i32,
    // version >= 24
    pub transcribed:            bool,
    pub event:                  String,
    pub player1:                String,
    pub player2:                String,
    pub location:               String,
    pub round:                  String,
    // version >= 25
    pub time_setting:           Option<TimeSetting>,
    // version >= 26
    pub tot_time_delay_move:      i32,
    pub tot_time_delay_cube:      i32,
    pub tot_time_delay_move_done: i32,
    pub tot_time_delay_cube_done: i32,
    // version >= 30
    pub transcriber:            String,
}

impl MatchHeader {
    /// Decode from the start of a slot. Version-gated fields are governed by
    /// the record's own version field, which precedes all of them.
    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        c.skip(RECORD_HEADER_SIZE)?;
        let mut h = MatchHeader {
            s_player1: c.read_short_string(PLAYER_NAME_CAPACITY)?,
            s_player2: c.read_short_string(PLAYER_NAME_CAPACITY)?,
            ..Default::default()
        };
        c.skip(1)?;
        h.match_length = c.read_i32()?;
        h.variation = c.read_i32()?;
        h.crawford = c.read_bool()?;
        h.jacoby = c.read_bool()?;
        h.beaver = c.read_bool()?;
        h.auto_double = c.read_bool()?;
        h.elo1 = c.read_f64()?;
        h.elo2 = c.read_f64()?;
        h.exp1 = c.read_i32()?;
        h.exp2 = c.read_i32()?;
        h.date = c.read_f64()?;
        h.s_event = c.read_short_string(TEXT_CAPACITY)?;
        c.skip(3)?;
        h.game_id = c.read_i32()?;
        h.comp_level1 = c.read_i32()?;
        h.comp_level2 = c.read_i32()?;
        h.count_for_elo = c.read_bool()?;
        h.add_to_profile1 = c.read_bool()?;
        h.add_to_profile2 = c.read_bool()?;
        h.s_location = c.read_short_string(TEXT_CAPACITY)?;
        h.game_mode = c.read_i32()?;
        h.imported = c.read_bool()?;
        h.s_round = c.read_short_string(TEXT_CAPACITY)?;
        c.skip(2)?;
        h.invert = c.read_i32()?;
        h.version = c.read_i32()?;
        h.magic = c.read_u32()?;
        h.money_init_g = c.read_i32()?;
        h.money_init_score = c.read_i32_array()?;
        h.entered = c.read_bool()?;
        h.counted = c.read_bool()?;
        h.unrated_imp = c.read_bool()?;
        c.skip(1)?;
        h.comment_header_match = c.read_i32()?;
        h.comment_footer_match = c.read_i32()?;
        h.is_money_match = c.read_bool()?;
        c.skip(3)?;
        h.win_money = c.read_f32()?;
        h.lose_money = c.read_f32()?;
        h.currency = c.read_i32()?;
        h.fee_money = c.read_f32()?;
        h.table_stake = c.read_i32()?;
        h.site_id = c.read_i32()?;

        if h.version >= 8 {
            h.cube_limit = c.read_i32()?;
            h.auto_double_max = c.read_i32()?;
        }
        if h.version >= 24 {
            h.transcribed = c.read_bool()?;
            c.skip(1)?;
            h.event = c.read_utf16_string(UNICODE_UNITS)?;
            h.player1 = c.read_utf16_string(UNICODE_UNITS)?;
            h.player2 = c.read_utf16_string(UNICODE_UNITS)?;
            h.location = c.read_utf16_string(UNICODE_UNITS)?;
            h.round = c.read_utf16_string(UNICODE_UNITS)?;
        }
        if h.version >= 25 {
            h.time_setting = Some(TimeSetting::decode(c)?);
        }
        if h.version >= 26 {
            h.tot_time_delay_move = c.read_i32()?;
            h.tot_time_delay_cube = c.read_i32()?;
            h.tot_time_delay_move_done = c.read_i32()?;
            h.tot_time_delay_cube_done = c.read_i32()?;
        }
        if h.version >= 30 {
            h.transcriber = c.read_utf16_string(UNICODE_UNITS)?;
        }
        Ok(h)
    }

    pub fn date_string(&self) -> String {
        delphi_datetime_string(self.date)
    }

    pub fn player1_name(&self) -> &str {
        preferred(&self.player1, &self.s_player1)
    }

    pub fn player2_name(&self) -> &str {
        preferred(&self.player2, &self.s_player2)
    }

    pub fn event_name(&self) -> &str {
        preferred(&self.event, &self.s_event)
    }

    pub fn location_name(&self) -> &str {
        preferred(&self.location, &self.s_location)
    }

    pub fn round_name(&self) -> &str {
        preferred(&self.round, &self.s_round)
    }
}

/// Unicode fields supersede the legacy ANSI ones when non-empty.
fn preferred<'a>(unicode: &'a str, legacy: &'a str) -> &'a str {
    if unicode.is_empty() { legacy } else { unicode }
}
