//! Match detection - finds runs of three or more same-kind ordinary tiles
//!
//! Rows are scanned top to bottom, then columns left to right, each in a
//! single pass. A run extends while consecutive cells hold the same ordinary
//! kind. Empty cells and special tiles always terminate a run.
//!
//! Horizontal and vertical runs may share cells; the flat cell set holds each
//! position once while the group list keeps both runs.

use std::collections::BTreeSet;

use crate::grid::Grid;
use crate::types::{MatchGroup, Orientation, Pos, MIN_RUN};

/// Output of one detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    /// Every matched position, deduplicated, row-major
    pub cells: BTreeSet<Pos>,
    /// Horizontal groups by row, then vertical groups by column
    pub groups: Vec<MatchGroup>,
}

impl Matches {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Scan the whole grid for runs
pub fn detect(grid: &Grid) -> Matches {
    let mut out = Matches::default();
    let (w, h) = (grid.width() as i8, grid.height() as i8);

    for y in 0..h {
        scan_line(grid, (0..w).map(|x| Pos::new(x, y)), Orientation::Horizontal, &mut out);
    }
    for x in 0..w {
        scan_line(grid, (0..h).map(|y| Pos::new(x, y)), Orientation::Vertical, &mut out);
    }

    out
}

fn scan_line(
    grid: &Grid,
    line: impl Iterator<Item = Pos>,
    orientation: Orientation,
    out: &mut Matches,
) {
    let mut run: Vec<Pos> = Vec::new();
    let mut run_kind: Option<u8> = None;

    for pos in line {
        let kind = grid.ordinary_at(pos);
        match (kind, run_kind) {
            (Some(k), Some(current)) if k == current => run.push(pos),
            _ => {
                close_run(&run, run_kind, orientation, out);
                run.clear();
                run_kind = kind;
                if kind.is_some() {
                    run.push(pos);
                }
            }
        }
    }

    // Runs touching the far edge
    close_run(&run, run_kind, orientation, out);
}

fn close_run(run: &[Pos], kind: Option<u8>, orientation: Orientation, out: &mut Matches) {
    let Some(kind) = kind else {
        return;
    };
    if run.len() < MIN_RUN {
        return;
    }

    out.cells.extend(run.iter().copied());
    out.groups.push(MatchGroup {
        cells: run.to_vec(),
        run_length: run.len(),
        kind,
        orientation,
        // start + len / 2 along the axis; favours the later cell on even runs
        center: run[run.len() / 2],
    });
}

/// True if any run of three exists
///
/// Cheaper than [`detect`]: stops at the first run and allocates nothing.
pub fn has_match(grid: &Grid) -> bool {
    any_run(grid, |pos| grid.ordinary_at(pos))
}

/// True if swapping `a` and `b` would leave at least one run on the board
///
/// The grid is not touched; the swap is applied through the lookup.
pub fn swap_creates_match(grid: &Grid, a: Pos, b: Pos) -> bool {
    any_run(grid, |pos| {
        let source = if pos == a {
            b
        } else if pos == b {
            a
        } else {
            pos
        };
        grid.ordinary_at(source)
    })
}

/// First adjacent swap that produces a match
///
/// Scans row-major, trying the right neighbour before the one below.
pub fn find_legal_move(grid: &Grid) -> Option<(Pos, Pos)> {
    grid.positions().find_map(|pos| {
        [pos.offset(1, 0), pos.offset(0, 1)]
            .into_iter()
            .filter(|&other| grid.in_bounds(other))
            .find(|&other| swap_creates_match(grid, pos, other))
            .map(|other| (pos, other))
    })
}

/// Every adjacent swap that produces a match, in [`find_legal_move`] order
pub fn legal_moves(grid: &Grid) -> Vec<(Pos, Pos)> {
    let mut moves = Vec::new();
    for pos in grid.positions() {
        for other in [pos.offset(1, 0), pos.offset(0, 1)] {
            if grid.in_bounds(other) && swap_creates_match(grid, pos, other) {
                moves.push((pos, other));
            }
        }
    }
    moves
}

fn any_run(grid: &Grid, kind_at: impl Fn(Pos) -> Option<u8>) -> bool {
    let span = MIN_RUN as i8;
    grid.positions().any(|pos| {
        let Some(kind) = kind_at(pos) else {
            return false;
        };
        let same = |dx: i8, dy: i8| {
            (1..span).all(|i| {
                let next = pos.offset(dx * i, dy * i);
                grid.in_bounds(next) && kind_at(next) == Some(kind)
            })
        };
        same(1, 0) || same(0, 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows).expect("valid layout")
    }

    #[test]
    fn test_no_runs_on_checkerboard() {
        let g = grid(&["0101", "1010", "0101"]);
        assert!(detect(&g).is_empty());
        assert!(!has_match(&g));
    }

    #[test]
    fn test_horizontal_run_at_row_end() {
        let g = grid(&["01222", "34010"]);
        let m = detect(&g);
        assert_eq!(m.groups.len(), 1);

        let group = &m.groups[0];
        assert_eq!(group.orientation, Orientation::Horizontal);
        assert_eq!(group.kind, 2);
        assert_eq!(group.run_length, 3);
        assert_eq!(group.center, Pos::new(3, 0));
        assert_eq!(
            m.cells.iter().copied().collect::<Vec<_>>(),
            vec![Pos::new(2, 0), Pos::new(3, 0), Pos::new(4, 0)]
        );
    }

    #[test]
    fn test_special_tile_breaks_run() {
        let g = grid(&["00L00", "12121"]);
        assert!(detect(&g).is_empty());

        let g = grid(&["00.00", "12121"]);
        assert!(detect(&g).is_empty());
    }

    #[test]
    fn test_vertical_run_center_for_even_length() {
        let g = grid(&["30", "31", "30", "31", "02"]);
        let m = detect(&g);
        assert_eq!(m.groups.len(), 1);
        assert_eq!(m.groups[0].orientation, Orientation::Vertical);
        assert_eq!(m.groups[0].run_length, 4);
        assert_eq!(m.groups[0].center, Pos::new(0, 2));
    }

    #[test]
    fn test_crossing_runs_share_cell_once() {
        let g = grid(&[
            "010", //
            "111", //
            "010",
        ]);
        let m = detect(&g);
        assert_eq!(m.groups.len(), 2);
        assert_eq!(m.groups[0].orientation, Orientation::Horizontal);
        assert_eq!(m.groups[1].orientation, Orientation::Vertical);
        assert_eq!(m.cells.len(), 5);
    }

    #[test]
    fn test_swap_creates_match_does_not_mutate() {
        let g = grid(&["0010", "1201", "2120"]);
        let before = g.clone();

        assert!(swap_creates_match(&g, Pos::new(2, 0), Pos::new(3, 0)));
        assert!(!swap_creates_match(&g, Pos::new(0, 1), Pos::new(0, 2)));
        assert_eq!(g, before);
    }

    #[test]
    fn test_find_legal_move_scan_order() {
        let g = grid(&["0010", "1201", "2120"]);
        assert_eq!(find_legal_move(&g), Some((Pos::new(2, 0), Pos::new(3, 0))));
        assert!(legal_moves(&g).contains(&(Pos::new(2, 0), Pos::new(3, 0))));
    }

    #[test]
    fn test_deadlocked_board_has_no_moves() {
        let g = grid(&["012", "120", "201"]);
        assert_eq!(find_legal_move(&g), None);
        assert!(legal_moves(&g).is_empty());
    }
}
