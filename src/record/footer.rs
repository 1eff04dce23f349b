use crate::cursor::{ByteCursor, ShortRead};
use crate::util::delphi_datetime_string;

/// Closes a game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameFooter {
    pub score1:          i32,
    pub score2:          i32,
    pub crawford_apply:  bool,
    /// `-1` player 1, `1` player 2.
    pub winner:          i32,
    pub points_won:      i32,
    /// 0 drop, 1 single, 2 gammon, 3 backgammon; +100 when resigned,
    /// +1000 when settled.
    pub termination:     i32,
    pub err_resign:      f64,
    pub err_take_resign: f64,
    pub eval:            [f64; 7],
    pub eval_level:      i32,
}

impl GameFooter {
    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        c.skip(12)?;
        let score1 = c.read_i32()?;
        let score2 = c.read_i32()?;
        let crawford_apply = c.read_bool()?;
        c.skip(3)?;
        let winner = c.read_i32()?;
        let points_won = c.read_i32()?;
        let termination = c.read_i32()?;
        c.skip(4)?;
        Ok(Self {
            score1,
            score2,
            crawford_apply,
            winner,
            points_won,
            termination,
            err_resign:      c.read_f64()?,
            err_take_resign: c.read_f64()?,
            eval:            c.read_f64_array()?,
            eval_level:      c.read_i32()?,
        })
    }
}

/// Last record of a completed match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFooter {
    pub score1: i32,
    pub score2: i32,
    pub winner: i32,
    pub elo1:   f64,
    pub elo2:   f64,
    pub exp1:   i32,
    pub exp2:   i32,
    pub date:   f64,
}

impl MatchFooter {
    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, ShortRead> {
        c.skip(12)?;
        Ok(Self {
            score1: c.read_i32()?,
            score2: c.read_i32()?,
            winner: c.read_i32()?,
            elo1:   c.read_f64()?,
            elo2:   c.read_f64()?,
            exp1:   c.read_i32()?,
            exp2:   c.read_i32()?,
            date:   c.read_f64()?,
        })
    }

    pub fn date_string(&self) -> String {
        delphi_datetime_string(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::testutil::SlotWriter;

    #[test]
    fn game_footer_fields() {
        let mut w = SlotWriter::new(4);
        w.i32(12, 2).i32(16, 4).u8(20, 1);
        w.i32(24, -1).i32(28, 2).i32(32, 102);
        w.f64(40, 0.1).f64(48, 0.2).f64(56, 0.75).f64(104, -0.5).i32(112, 3);
        let f = GameFooter::decode(&mut ByteCursor::new(&w.finish())).unwrap();
        assert_eq!((f.score1, f.score2), (2, 4));
        assert!(f.crawford_apply);
        assert_eq!(f.winner, -1);
        assert_eq!(f.points_won, 2);
        assert_eq!(f.termination, 102);
        assert_eq!(f.err_resign, 0.1);
        assert_eq!(f.err_take_resign, 0.2);
        assert_eq!(f.eval[0], 0.75);
        assert_eq!(f.eval[6], -0.5);
        assert_eq!(f.eval_level, 3);
    }

    #[test]
    fn match_footer_fields() {
        let mut w = SlotWriter::new(5);
        w.i32(12, 7).i32(16, 3).i32(20, 1);
        w.f64(24, 1512.25).f64(32, 1488.0).i32(40, 120).i32(44, 95).f64(48, 36526.0);
        let f = MatchFooter::decode(&mut ByteCursor::new(&w.finish())).unwrap();
        assert_eq!((f.score1, f.score2, f.winner), (7, 3, 1));
        assert_eq!(f.elo1, 1512.25);
        assert_eq!((f.exp1, f.exp2), (120, 95));
        assert_eq!(f.date_string(), "2000-01-01 00:00:00");
    }
}
