use crate::cursor::{ByteCursor, ShortRead};

/// Opens a game. Scores are the match score before the first roll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameHeader {
    pub score1:                 i32,
    pub score2:                 i32,
    pub crawford_apply:         bool,
    pub pos_init:               [i8; 26],
    pub game_number:            i32,
    pub in_progress:            bool,
    pub comment_header_game:    i32,
    pub comment_footer_game:    i32,
    /// Present from format version 26.
    pub number_of_auto_doubles: i32,
}

impl GameHeader {
    pub fn decode(c: &mut ByteCursor<'_>, version: i32) -> Result<Self, ShortRead> {
        c.skip(12)?;
        let score1 = c.read_i32()?;
        let score2 = c.read_i32()?;
        let crawford_apply = c.read_bool()?;
        let pos_init = c.read_i8_array()?;
        c.skip(1)?;
        let game_number = c.read_i32()?;
        let in_progress = c.read_bool()?;
        c.skip(3)?;
        let comment_header_game = c.read_i32()?;
        let comment_footer_game = c.read_i32()?;
        let number_of_auto_doubles = if version >= 26 { c.read_i32()? } else { 0 };

        Ok(Self {
            score1,
            score2,
            crawford_apply,
            pos_init,
            game_number,
            in_progress,
            comment_header_game,
            comment_footer_game,
            number_of_auto_doubles,
        })
    }
}
