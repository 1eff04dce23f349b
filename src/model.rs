//! Decoded match, as handed to consumers.
//!
//! Every position here is relative to the player on roll: slot 0 is the
//! opponent's bar, slots 1..=24 are the roller's points counted from their
//! own 1-point, slot 25 is the roller's bar. In the analysis types
//! "player 1" is the player on roll, not the first-named player.

use serde::{Deserialize, Serialize};

/// Output move encoding: 1..=24 points, this value for the bar.
pub const BAR: i8 = 25;
pub const BORNE_OFF: i8 = -2;
pub const UNUSED: i8 = -1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub player1_name:    String,
    pub player2_name:    String,
    pub location:        String,
    pub event:           String,
    pub round:           String,
    pub date_time:       String,
    pub match_length:    i32,
    /// Record format version, e.g. 30.
    pub engine_version:  i32,
    /// Name of the program that wrote the file, from the container header.
    pub product_version: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub checkers: [i8; 26],
    pub cube:     i32,
    /// 0 centred, 1 owned by the player on roll, -1 by the opponent.
    pub cube_pos: i32,
    pub score:    [i32; 2],
}

impl Position {
    /// Total checkers on the board and bars, both sides.
    pub fn checker_count(&self) -> u32 {
        self.checkers.iter().map(|c| c.unsigned_abs() as u32).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerAnalysis {
    /// Position after this candidate move.
    pub position:            Position,
    pub r#move:              [i8; 8],
    pub player1_win_rate:    f32,
    pub player1_gammon_rate: f32,
    pub player1_bg_rate:     f32,
    pub player2_gammon_rate: f32,
    pub player2_bg_rate:     f32,
    pub equity:              f32,
    /// Plies searched; 0 is a book lookup.
    pub analysis_depth:      i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeAnalysis {
    pub player1_win_rate:        f32,
    pub player1_gammon_rate:     f32,
    pub player1_bg_rate:         f32,
    pub player2_gammon_rate:     f32,
    pub player2_bg_rate:         f32,
    pub cubeless_no_double:      f32,
    pub cubeless_double:         f32,
    pub cubeful_no_double:       f32,
    pub cubeful_double_take:     f32,
    pub cubeful_double_pass:     f32,
    /// Share of wrong responses that would make doubling correct, in
    /// percent; -1 when no double is not the best action.
    pub wrong_pass_take_percent: f32,
    pub analysis_depth:          i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerMove {
    /// Position before the move.
    pub position:      Position,
    pub active_player: i32,
    pub dice:          [i32; 2],
    pub played_move:   [i32; 8],
    pub analysis:      Vec<CheckerAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeMove {
    pub position:      Position,
    pub active_player: i32,
    /// Stored decision code: 0 no double, 1 double.
    pub cube_action:   i32,
    pub analysis:      Option<CubeAnalysis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    Checker,
    Cube,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub move_type:    MoveType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checker_move: Option<CheckerMove>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube_move:    Option<CubeMove>,
}

impl Move {
    pub fn checker(m: CheckerMove) -> Self {
        Self { move_type: MoveType::Checker, checker_move: Some(m), cube_move: None }
    }

    pub fn cube(m: CubeMove) -> Self {
        Self { move_type: MoveType::Cube, checker_move: None, cube_move: Some(m) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_number:   i32,
    pub initial_score: [i32; 2],
    pub moves:         Vec<Move>,
    /// -1 player 1, 1 player 2, 0 not completed.
    pub winner:        i32,
    pub points_won:    i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub metadata: MatchMetadata,
    pub games:    Vec<Game>,
}

impl Match {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn move_count(&self) -> usize {
        self.games.iter().map(|g| g.moves.len()).sum()
    }
}
