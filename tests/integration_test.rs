mod common;

use common::*;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;
use xgfile::{batch, parse_reader, parse_segments, Error, MoveType, RecordError, Segment, SegmentKind};

const BEST_MOVE: usize = 124;
const DOUBLE: usize = 64;

/// Opening position from the roller's side.
fn opening() -> [i8; 26] {
    let mut p = [0i8; 26];
    p[24] = 2;
    p[13] = 5;
    p[8] = 3;
    p[6] = 5;
    p[1] = -2;
    p[12] = -5;
    p[17] = -3;
    p[19] = -5;
    p
}

fn checker_play(active: i32) -> Slot {
    let mut s = Slot::new(3)
        .i8s(9, &opening())
        .i32(64, active)
        .i32(100, 4)
        .i32(104, 3)
        .i32(108, 1)
        .i32(BEST_MOVE + 28, 4)
        .i32(BEST_MOVE + 32, 3)
        .i32(BEST_MOVE + 36, 3)
        .i32(BEST_MOVE + 40, 2)
        .i32(BEST_MOVE + 44, 1)
        .i32(BEST_MOVE + 48, 1)
        .i32(BEST_MOVE + 64, 5);
    for (i, m) in [23, 19, 12, 9, -1, -1, -1, -1].into_iter().enumerate() {
        s = s.i32(68 + 4 * i, m);
    }
    for alt in 0..5 {
        s = s
            .i8s(BEST_MOVE + 68 + 26 * alt, &opening())
            .i8s(BEST_MOVE + 900 + 8 * alt, &[23, 19, 12, 9 - alt as i8, -1, 0, 0, 0])
            .i16(BEST_MOVE + 1156 + 4 * alt, if alt == 0 { 3 } else { 1 })
            .f32(BEST_MOVE + 1284 + 28 * alt + 8, 0.48 + alt as f32 / 100.0)
            .f32(BEST_MOVE + 1284 + 28 * alt + 24, 0.05 - alt as f32 / 100.0);
    }
    s
}

fn double(active: i32) -> Slot {
    let mut s = cube_decision(active, 1)
        .i8s(36, &opening())
        .i32(DOUBLE + 28, 4)
        .i32(DOUBLE + 32, 2)
        .i32(DOUBLE + 36, 1)
        .i32(DOUBLE + 40, 1)
        .i32(DOUBLE + 44, 0);
    for (i, v) in [0.01f32, 0.12, 0.3, 0.0, 0.25, 0.02, 0.31].into_iter().enumerate() {
        s = s.f32(DOUBLE + 60 + 4 * i, v);
    }
    s.f32(DOUBLE + 88, 0.4).f32(DOUBLE + 92, 0.55).f32(DOUBLE + 96, 1.0)
}

fn one_game(active: i32) -> Vec<u8> {
    records(vec![
        match_header(30, "Alice", "Bob"),
        game_header(1, [2, 1]),
        cube_decision(1, -2),
        checker_play(active),
        double(active),
        game_footer(-1, 2),
        match_footer(),
    ])
}

#[test]
fn decodes_one_game_end_to_end() {
    let bytes = FileBuilder::game(one_game(1)).build();
    let m = parse_reader(Cursor::new(bytes)).unwrap();

    assert_eq!(m.metadata.player1_name, "Alice");
    assert_eq!(m.metadata.player2_name, "Bob");
    assert_eq!(m.metadata.event, "Club night");
    assert_eq!(m.metadata.match_length, 7);
    assert_eq!(m.metadata.engine_version, 30);
    assert_eq!(m.metadata.product_version, "eXtreme Gammon 2.19");
    assert!(!m.metadata.date_time.is_empty());

    assert_eq!(m.games.len(), 1);
    let g = &m.games[0];
    assert_eq!(g.game_number, 1);
    assert_eq!(g.initial_score, [2, 1]);
    assert_eq!((g.winner, g.points_won), (-1, 2));
    assert_eq!(g.moves.len(), 2);

    assert_eq!(g.moves[0].move_type, MoveType::Checker);
    let play = g.moves[0].checker_move.as_ref().unwrap();
    assert_eq!(play.dice, [4, 3]);
    assert_eq!(play.played_move, [24, 20, 13, 10, -1, -1, -1, -1]);
    assert_eq!(play.position.checkers, opening());
    assert_eq!(play.position.score, [2, 1]);
    assert_eq!(play.analysis.len(), 5);
    assert_eq!(play.analysis[0].analysis_depth, 3);
    assert_eq!(play.analysis[1].analysis_depth, 1);
    assert_eq!(play.analysis[0].r#move, [24, 20, 13, 10, -1, -1, -1, -1]);
    assert_eq!(play.analysis[4].r#move, [24, 20, 13, 6, -1, -1, -1, -1]);
    assert!((play.analysis[0].player1_win_rate - 0.52).abs() < 1e-6);
    assert!((play.analysis[0].equity - 0.05).abs() < 1e-6);

    assert_eq!(g.moves[1].move_type, MoveType::Cube);
    let cube = g.moves[1].cube_move.as_ref().unwrap();
    assert_eq!(cube.cube_action, 1);
    let a = cube.analysis.as_ref().unwrap();
    assert_eq!(a.cubeful_no_double, 0.4);
    assert_eq!(a.cubeful_double_take, 0.55);
    assert_eq!(a.cubeful_double_pass, 1.0);
    assert_eq!(a.wrong_pass_take_percent, -1.0);
    assert_eq!(a.analysis_depth, 4);
    assert_eq!(a.cubeless_double, 0.62);
}

#[test]
fn every_position_holds_at_most_thirty_checkers() {
    for active in [1, -1] {
        let bytes = FileBuilder::game(one_game(active)).build();
        let m = parse_reader(Cursor::new(bytes)).unwrap();
        for mv in &m.games[0].moves {
            if let Some(c) = &mv.checker_move {
                assert!(c.position.checker_count() <= 30);
                for a in &c.analysis {
                    assert!(a.position.checker_count() <= 30);
                }
            }
            if let Some(c) = &mv.cube_move {
                assert!(c.position.checker_count() <= 30);
            }
        }
    }
}

#[test]
fn second_player_positions_are_mirrored() {
    let bytes = FileBuilder::game(one_game(-1)).build();
    let m = parse_reader(Cursor::new(bytes)).unwrap();
    let g = &m.games[0];

    let play = g.moves[0].checker_move.as_ref().unwrap();
    assert_eq!(play.active_player, -1);
    assert_eq!(play.position.checkers[1], -2);
    assert_eq!(play.position.checkers[24], 2);
    assert_eq!(play.position.checkers[6], 5);
    assert_eq!(play.position.score, [1, 2]);
    // alternatives are already stored from the mover's side
    assert_eq!(play.analysis[0].position.checkers, opening());

    let cube = g.moves[1].cube_move.as_ref().unwrap();
    assert_eq!(cube.position.score, [1, 2]);
    assert_eq!(cube.position.cube_pos, 0);
}

#[test]
fn legacy_version_uses_ansi_names() {
    let data = records(vec![match_header(23, "Carol", "Dave"), game_header(1, [0, 0]), game_footer(1, 1)]);
    let m = parse_reader(Cursor::new(FileBuilder::game(data).build())).unwrap();
    assert_eq!(m.metadata.player1_name, "Carol");
    assert_eq!(m.metadata.engine_version, 23);
    assert_eq!(m.games[0].winner, 1);
}

#[test]
fn unfinished_game_is_kept() {
    let data = records(vec![match_header(30, "A", "B"), game_header(3, [4, 4]), checker_play(1)]);
    let m = parse_reader(Cursor::new(FileBuilder::game(data).build())).unwrap();
    assert_eq!(m.games.len(), 1);
    assert_eq!(m.games[0].winner, 0);
    assert_eq!(m.games[0].moves.len(), 1);
}

#[test]
fn truncated_record_stream_is_an_error() {
    let mut data = one_game(1);
    data.extend_from_slice(&[0u8; 100]);
    let len = data.len();
    let err = parse_reader(Cursor::new(FileBuilder::game(data).build())).unwrap_err();
    match &err {
        Error::Record(RecordError::Truncated { offset, remaining }) => {
            assert_eq!(*offset, len - 100);
            assert_eq!(*remaining, 100);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(err.record_offset(), Some(len - 100));
}

#[test]
fn out_of_range_played_move_is_an_error() {
    let data = records(vec![
        match_header(30, "A", "B"),
        game_header(1, [0, 0]),
        checker_play(1).i32(68, i32::MAX),
    ]);
    let err = parse_reader(Cursor::new(FileBuilder::game(data).build())).unwrap_err();
    assert!(
        matches!(err, Error::Record(RecordError::InvalidMove { index: 0, value: i32::MAX, .. })),
        "{err}"
    );
    assert_eq!(err.record_offset(), Some(2 * 2560));
}

#[test]
fn unknown_record_kinds_are_skipped() {
    let data = records(vec![
        match_header(30, "A", "B"),
        game_header(1, [0, 0]),
        Slot::new(42),
        checker_play(1),
        game_footer(-1, 1),
    ]);
    let m = parse_reader(Cursor::new(FileBuilder::game(data).build())).unwrap();
    assert_eq!(m.games[0].moves.len(), 1);
}

#[test]
fn parse_file_from_disk() {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&FileBuilder::game(one_game(1)).build()).unwrap();
    tmp.flush().unwrap();

    let m = xgfile::parse_file(tmp.path()).unwrap();
    assert_eq!(m.move_count(), 2);

    let json = m.to_json().unwrap();
    assert!(json.contains("\"move_type\": \"checker\""));
    assert!(json.contains("\"cubeful_double_take\""));
}

#[test]
fn segments_from_memory() {
    let segments = vec![Segment { kind: SegmentKind::GameFile, name: Some("temp.xg".into()), data: one_game(1) }];
    let m = parse_segments(&segments).unwrap();
    assert_eq!(m.games.len(), 1);
    assert_eq!(m.metadata.product_version, "");

    assert!(parse_segments(&[]).unwrap().games.is_empty());
}

#[test]
fn batch_keeps_input_order() {
    let mut good = NamedTempFile::new().unwrap();
    good.write_all(&FileBuilder::game(one_game(1)).build()).unwrap();
    good.flush().unwrap();
    let mut bad = NamedTempFile::new().unwrap();
    bad.write_all(b"not a match file at all, just text").unwrap();
    bad.flush().unwrap();

    let paths = vec![good.path().to_path_buf(), bad.path().to_path_buf(), good.path().to_path_buf()];
    let results = batch::parse_files(&paths);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, paths[0]);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(Error::Segment(_))));
    assert!(results[2].1.is_ok());
}
