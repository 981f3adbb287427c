//! Match detection and legal-move search

use tile_cascade::core::detector::{detect, find_legal_move, has_match, legal_moves};
use tile_cascade::core::Grid;
use tile_cascade::types::{Orientation, Pos};

fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(rows).expect("valid layout")
}

#[test]
fn test_horizontal_run_of_three() {
    let matches = detect(&grid(&["0001", "1212"]));

    assert_eq!(matches.groups.len(), 1);
    let group = &matches.groups[0];
    assert_eq!(group.run_length, 3);
    assert_eq!(group.kind, 0);
    assert_eq!(group.orientation, Orientation::Horizontal);
    assert_eq!(group.center, Pos::new(1, 0));
    assert_eq!(
        matches.cells.iter().copied().collect::<Vec<_>>(),
        vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]
    );
}

#[test]
fn test_specials_and_gaps_break_runs() {
    assert!(!has_match(&grid(&["00L00"])));
    assert!(!has_match(&grid(&["0", "0", ".", "0"])));
    assert!(detect(&grid(&["00C00", "12121"])).is_empty());
}

#[test]
fn test_crossing_runs_share_a_cell() {
    let matches = detect(&grid(&["2032", "0000", "1031"]));

    assert_eq!(matches.groups.len(), 2);
    assert_eq!(matches.groups[0].orientation, Orientation::Horizontal);
    assert_eq!(matches.groups[0].run_length, 4);
    assert_eq!(matches.groups[1].orientation, Orientation::Vertical);
    // 4 horizontal + 3 vertical, sharing (1,1)
    assert_eq!(matches.cells.len(), 6);
}

#[test]
fn test_detection_is_idempotent() {
    let board = grid(&["00012", "12011", "22210", "10121"]);
    let before = board.clone();

    let first = detect(&board);
    let second = detect(&board);

    assert_eq!(first, second);
    assert_eq!(board, before);
}

#[test]
fn test_find_legal_move_scans_row_major() {
    let board = grid(&["0010", "1201"]);
    assert!(!has_match(&board));
    assert_eq!(find_legal_move(&board), Some((Pos::new(2, 0), Pos::new(3, 0))));

    let all = legal_moves(&board);
    assert_eq!(all[0], (Pos::new(2, 0), Pos::new(3, 0)));
    assert!(all.contains(&(Pos::new(2, 0), Pos::new(2, 1))));
}

#[test]
fn test_no_legal_move_on_dead_board() {
    let board = grid(&["012", "345"]);
    assert_eq!(find_legal_move(&board), None);
    assert!(legal_moves(&board).is_empty());
}
