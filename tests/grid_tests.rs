//! Grid tests - storage, bounds and gravity

use tile_cascade::core::Grid;
use tile_cascade::types::{ActionError, Pos, SpecialKind, Tile, TileKind};

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new(8, 6);
    assert_eq!(grid.width(), 8);
    assert_eq!(grid.height(), 6);
    assert_eq!(grid.occupied_count(), 0);

    for pos in grid.positions() {
        assert!(grid.in_bounds(pos), "{:?} should be in bounds", pos);
        assert_eq!(grid.get(pos), Ok(None));
    }
    assert_eq!(grid.empty_positions().len(), 48);
}

#[test]
fn test_grid_get_out_of_bounds() {
    let grid = Grid::new(4, 4);

    assert_eq!(grid.get(Pos::new(-1, 0)), Err(ActionError::OutOfBounds { x: -1, y: 0 }));
    assert_eq!(grid.get(Pos::new(0, -1)), Err(ActionError::OutOfBounds { x: 0, y: -1 }));
    assert_eq!(grid.get(Pos::new(4, 0)), Err(ActionError::OutOfBounds { x: 4, y: 0 }));
    assert_eq!(grid.get(Pos::new(0, 4)), Err(ActionError::OutOfBounds { x: 0, y: 4 }));
    assert_eq!(grid.kind_at(Pos::new(9, 9)), None);
}

#[test]
fn test_set_rewrites_tile_position() {
    let mut grid = Grid::new(3, 3);
    let placed = Tile::ordinary(2, Pos::new(0, 0));

    assert_eq!(grid.set(Pos::new(1, 2), Some(placed)), Ok(None));
    let stored = grid.get(Pos::new(1, 2)).unwrap().unwrap();
    assert_eq!(stored.position, Pos::new(1, 2));
    assert_eq!(stored.kind, TileKind::Ordinary(2));

    assert_eq!(grid.take(Pos::new(1, 2)), Ok(Some(stored)));
    assert_eq!(grid.get(Pos::new(1, 2)), Ok(None));
    assert!(grid.set(Pos::new(3, 0), None).is_err());
}

#[test]
fn test_swap_exchanges_and_keeps_positions_consistent() {
    let mut grid = Grid::from_rows(&["0L", "12"]).unwrap();
    grid.swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();

    assert_eq!(grid.to_rows(), vec!["L0".to_string(), "12".to_string()]);
    for tile in grid.tiles() {
        assert_eq!(grid.get(tile.position), Ok(Some(*tile)));
    }
    assert_eq!(
        grid.swap(Pos::new(0, 0), Pos::new(0, 2)),
        Err(ActionError::OutOfBounds { x: 0, y: 2 })
    );
    assert_eq!(grid.to_rows(), vec!["L0".to_string(), "12".to_string()]);
}

#[test]
fn test_compact_moves_tiles_down_in_order() {
    let mut grid = Grid::from_rows(&[
        "12", //
        ".3", //
        "0.",
    ])
    .unwrap();

    let moves = grid.compact();

    assert_eq!(
        moves,
        vec![
            (Pos::new(0, 0), Pos::new(0, 1)),
            (Pos::new(1, 1), Pos::new(1, 2)),
            (Pos::new(1, 0), Pos::new(1, 1)),
        ]
    );
    assert_eq!(grid.to_rows(), vec!["..", "12", "03"]);
    assert_eq!(grid.empty_positions(), vec![Pos::new(0, 0), Pos::new(1, 0)]);
}

#[test]
fn test_compact_carries_specials() {
    let mut grid = Grid::from_rows(&["C0", "..", "1."]).unwrap();
    grid.compact();

    assert_eq!(grid.to_rows(), vec!["..", "C.", "10"]);
    assert_eq!(
        grid.get(Pos::new(0, 1)).unwrap().map(|t| t.kind),
        Some(TileKind::Special(SpecialKind::ColorBomb))
    );
}

#[test]
fn test_compact_on_full_grid_is_noop() {
    let mut grid = Grid::from_rows(&["01", "23"]).unwrap();
    assert!(grid.compact().is_empty());
    assert!(grid.is_full());
}

#[test]
fn test_from_rows_rejects_ragged_and_unknown_symbols() {
    assert!(Grid::from_rows(&["012", "01"]).is_none());
    assert!(Grid::from_rows(&["0#1"]).is_none());
    assert!(Grid::from_rows(&[]).is_none());
}
