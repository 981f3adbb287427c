//! Special tile activation - which cells an activated special clears
//!
//! Every function here returns in-bounds positions only, sorted row-major
//! with no duplicates. Activation never chains: a special caught in another
//! special's area is simply one more cell to clear.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{Pos, SpecialKind, TileKind};

/// Cells cleared when the special `kind` at `pos` fires
///
/// `target` is the ordinary kind a color bomb clears; it is ignored by the
/// other kinds. A color bomb with no target clears only itself.
pub fn affected_cells(grid: &Grid, pos: Pos, kind: SpecialKind, target: Option<u8>) -> Vec<Pos> {
    if !grid.in_bounds(pos) {
        return Vec::new();
    }
    match kind {
        SpecialKind::Line => line_cells(grid, pos),
        SpecialKind::ColorBomb => match target {
            Some(target) => color_cells(grid, pos, target),
            None => vec![pos],
        },
        SpecialKind::AreaBomb => area_cells(grid, pos).into_iter().collect(),
    }
}

/// Whole row and whole column through `pos`; the origin appears once
pub fn line_cells(grid: &Grid, pos: Pos) -> Vec<Pos> {
    let mut cells: Vec<Pos> = (0..grid.width() as i8)
        .map(|x| Pos::new(x, pos.y))
        .chain((0..grid.height() as i8).filter(|&y| y != pos.y).map(|y| Pos::new(pos.x, y)))
        .collect();
    cells.sort();
    cells
}

/// Every tile of ordinary kind `target`, plus the bomb's own cell
pub fn color_cells(grid: &Grid, pos: Pos, target: u8) -> Vec<Pos> {
    grid.positions()
        .filter(|&p| p == pos || grid.ordinary_at(p) == Some(target))
        .collect()
}

/// The 3x3 block centred on `pos`, clipped to the board
pub fn area_cells(grid: &Grid, pos: Pos) -> ArrayVec<Pos, 9> {
    let mut cells = ArrayVec::new();
    for dy in -1..=1 {
        for dx in -1..=1 {
            let p = pos.offset(dx, dy);
            if grid.in_bounds(p) {
                cells.push(p);
            }
        }
    }
    cells
}

/// Ordinary kind a color bomb should clear
///
/// The swap partner's kind when it is ordinary. Otherwise (direct tap, or a
/// special partner) the most common ordinary kind on the board, lowest index
/// on ties. `None` only when the board holds no ordinary tiles.
pub fn color_target(grid: &Grid, partner: Option<TileKind>) -> Option<u8> {
    if let Some(kind) = partner.and_then(TileKind::ordinary) {
        return Some(kind);
    }

    let mut counts: Vec<u32> = Vec::new();
    for kind in grid.tiles().filter_map(|t| t.kind.ordinary()) {
        let idx = kind as usize;
        if counts.len() <= idx {
            counts.resize(idx + 1, 0);
        }
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        // max_by_key returns the last maximum; reverse so the lowest index wins
        .rev()
        .max_by_key(|&(_, &n)| n)
        .map(|(kind, _)| kind as u8)
}
