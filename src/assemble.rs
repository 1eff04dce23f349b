//! Turn the record stream into a [`Match`].
//!
//! Records store positions from a fixed side; the output is always relative
//! to the player on roll, so entries whose active player is `-1` are flipped
//! with [`swap_position`].

use crate::model::{
    CheckerAnalysis, CheckerMove, CubeAnalysis, CubeMove, Game, Match, MatchMetadata, Move, Position,
    BAR, BORNE_OFF, UNUSED,
};
use crate::record::{CubeEntry, MatchHeader, MoveEntry, Record};

// ── Perspective ───────────────────────────────────────────────────────────────

/// Mirror a board to the other player's side: bars trade places, points are
/// reflected, and every count changes sign.
pub fn swap_checkers(pos: &[i8; 26]) -> [i8; 26] {
    let mut out = [0i8; 26];
    out[0] = pos[25].wrapping_neg();
    for i in 1..=24 {
        out[i] = pos[25 - i].wrapping_neg();
    }
    out[25] = pos[0].wrapping_neg();
    out
}

/// [`swap_checkers`] plus cube owner and score. Applying it twice is the identity.
pub fn swap_position(p: &Position) -> Position {
    Position {
        checkers: swap_checkers(&p.checkers),
        cube:     p.cube,
        cube_pos: p.cube_pos.wrapping_neg(),
        score:    [p.score[1], p.score[0]],
    }
}

fn from_roller(p: Position, active_player: i32) -> Position {
    if active_player == -1 { swap_position(&p) } else { p }
}

// ── Move encoding ─────────────────────────────────────────────────────────────

/// 0-based point / 24 bar / -2 off / -1 unused, to 1-based point / 25 bar.
fn remap_point(v: i32) -> i32 {
    match v {
        -1 => UNUSED as i32,
        -2 => BORNE_OFF as i32,
        24 => BAR as i32,
        p @ 0..=23 => p + 1,
        other => other,
    }
}

fn remap_played(moves: &[i32; 8]) -> [i32; 8] {
    moves.map(remap_point)
}

/// Everything after the first terminator is unused, whatever is stored there.
fn remap_alternative(moves: &[i8; 8]) -> [i8; 8] {
    let mut out = [UNUSED; 8];
    for (dst, &v) in out.iter_mut().zip(moves) {
        if v == UNUSED {
            break;
        }
        *dst = remap_point(v as i32) as i8;
    }
    out
}

// ── Cube decisions ────────────────────────────────────────────────────────────

/// How often the opponent must get the response wrong for doubling to beat
/// holding, in percent. `-1` unless no-double is the best cubeful action.
pub fn wrong_pass_take_percent(no_double: f32, take: f32, pass: f32) -> f32 {
    if !(no_double >= take && no_double >= pass) {
        return -1.0;
    }
    let (right, wrong) = if take < pass { (take, pass) } else { (pass, take) };
    let denominator = wrong - right;
    if denominator == 0.0 {
        0.0
    } else {
        (no_double - right) / denominator * 100.0
    }
}

pub fn convert_cube(e: &CubeEntry) -> CubeMove {
    let a = &e.doubled;
    let position = Position {
        checkers: e.position,
        cube:     a.cube,
        cube_pos: a.cube_pos,
        score:    a.score,
    };
    let analysis = CubeAnalysis {
        player1_win_rate:        1.0 - a.eval[2],
        player1_gammon_rate:     a.eval[4],
        player1_bg_rate:         a.eval[5],
        player2_gammon_rate:     a.eval[1],
        player2_bg_rate:         a.eval[0],
        cubeless_no_double:      a.eval[6],
        // not stored; the format only keeps the no-double figure
        cubeless_double:         a.eval[6] * 2.0,
        cubeful_no_double:       a.equ_no_double,
        cubeful_double_take:     a.equ_double,
        cubeful_double_pass:     a.equ_drop,
        wrong_pass_take_percent: wrong_pass_take_percent(a.equ_no_double, a.equ_double, a.equ_drop),
        analysis_depth:          a.level,
    };
    CubeMove {
        position:      from_roller(position, e.active_p),
        active_player: e.active_p,
        cube_action:   e.double,
        analysis:      Some(analysis),
    }
}

// ── Checker plays ─────────────────────────────────────────────────────────────

pub fn convert_move(e: &MoveEntry) -> CheckerMove {
    let a = &e.data_moves;
    let position = Position {
        checkers: e.position_i,
        cube:     a.cube,
        cube_pos: a.cubepos,
        score:    a.score,
    };

    let analysis = (0..a.alternatives())
        .map(|i| {
            let eval = &a.eval[i];
            CheckerAnalysis {
                position: Position {
                    checkers: a.pos_played[i],
                    cube:     a.cube,
                    cube_pos: a.cubepos,
                    score:    a.score,
                },
                r#move:              remap_alternative(&a.moves[i]),
                player1_win_rate:    1.0 - eval[2],
                player1_gammon_rate: eval[4],
                player1_bg_rate:     eval[5],
                player2_gammon_rate: eval[1],
                player2_bg_rate:     eval[0],
                equity:              eval[6],
                analysis_depth:      a.eval_level[i].level,
            }
        })
        .collect();

    CheckerMove {
        position:      from_roller(position, e.active_p),
        active_player: e.active_p,
        dice:          e.dice,
        played_move:   remap_played(&e.moves),
        analysis,
    }
}

// ── Assembler ─────────────────────────────────────────────────────────────────

fn metadata(h: &MatchHeader, product_version: &str) -> MatchMetadata {
    MatchMetadata {
        player1_name:    h.player1_name().to_owned(),
        player2_name:    h.player2_name().to_owned(),
        location:        h.location_name().to_owned(),
        event:           h.event_name().to_owned(),
        round:           h.round_name().to_owned(),
        date_time:       h.date_string(),
        match_length:    h.match_length,
        engine_version:  h.version,
        product_version: product_version.to_owned(),
    }
}

/// Folds records, in stream order, into a [`Match`].
#[derive(Debug, Default)]
pub struct Assembler {
    product_version: String,
    result:          Match,
    current:         Option<Game>,
}

impl Assembler {
    pub fn new(product_version: impl Into<String>) -> Self {
        let product_version = product_version.into();
        let mut result = Match::default();
        result.metadata.product_version = product_version.clone();
        Self { product_version, result, current: None }
    }

    pub fn push(&mut self, record: Record) {
        match record {
            Record::MatchHeader(h) => {
                self.result.metadata = metadata(&h, &self.product_version);
            }
            Record::GameHeader(h) => {
                if let Some(open) = self.current.take() {
                    tracing::warn!(game = open.game_number, "game header before footer; closing open game");
                    self.result.games.push(open);
                }
                self.current = Some(Game {
                    game_number:   h.game_number,
                    initial_score: [h.score1, h.score2],
                    ..Default::default()
                });
            }
            Record::Cube(e) => {
                if e.is_initial_position() {
                    return;
                }
                self.add_move(|| Move::cube(convert_cube(&e)));
            }
            Record::Move(e) => {
                self.add_move(|| Move::checker(convert_move(&e)));
            }
            Record::GameFooter(f) => match self.current.take() {
                Some(mut game) => {
                    game.winner = f.winner;
                    game.points_won = f.points_won;
                    self.result.games.push(game);
                }
                None => tracing::warn!("game footer without an open game"),
            },
            Record::MatchFooter(_) => {}
        }
    }

    fn add_move(&mut self, build: impl FnOnce() -> Move) {
        match self.current.as_mut() {
            Some(game) => game.moves.push(build()),
            None => tracing::warn!("move recorded outside a game; ignored"),
        }
    }

    /// Emits a game left open by a truncated match with winner 0.
    pub fn finish(mut self) -> Match {
        if let Some(open) = self.current.take() {
            self.result.games.push(open);
        }
        self.result
    }
}

/// Assemble an already decoded record list.
pub fn assemble<I>(records: I, product_version: &str) -> Match
where
    I: IntoIterator<Item = Record>,
{
    let mut asm = Assembler::new(product_version);
    for record in records {
        asm.push(record);
    }
    asm.finish()
}
