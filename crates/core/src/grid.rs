//! Grid module - owns every tile on the board
//!
//! The grid is a `width x height` arena of cells, allocated once and never
//! resized. Cells are stored in a flat row-major slice (`y * width + x`).
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom,
//! so gravity pulls tiles toward larger y.

use std::fmt;

use crate::types::{ActionError, Cell, Pos, SpecialKind, Tile, TileKind};

/// The game grid - flat row-major cell storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Box<[Cell]>,
}

impl Grid {
    /// Create an empty grid of the given size
    pub fn new(width: u8, height: u8) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![None; size].into_boxed_slice(),
        }
    }

    /// Build a grid from text rows, one character per cell
    ///
    /// `0`-`9` and `a`-`z` are ordinary kinds 0..36, `L`/`C`/`A` are the line,
    /// color and area specials, `.` is an empty cell. Returns `None` for
    /// ragged rows, unknown symbols, or an empty layout.
    ///
    /// ```
    /// use tile_cascade_core::Grid;
    /// use tile_cascade_types::{Pos, SpecialKind, TileKind};
    ///
    /// let grid = Grid::from_rows(&["01L", "1.2"]).unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.kind_at(Pos::new(1, 0)), Some(TileKind::Ordinary(1)));
    /// assert_eq!(grid.kind_at(Pos::new(2, 0)), Some(TileKind::Special(SpecialKind::Line)));
    /// assert_eq!(grid.get(Pos::new(1, 1)), Ok(None));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.chars().count();
        if width == 0 || width > i8::MAX as usize || height > i8::MAX as usize {
            return None;
        }

        let mut grid = Grid::new(width as u8, height as u8);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = Pos::new(x as i8, y as i8);
                let kind = match ch {
                    '.' => None,
                    'L' => Some(TileKind::Special(SpecialKind::Line)),
                    'C' => Some(TileKind::Special(SpecialKind::ColorBomb)),
                    'A' => Some(TileKind::Special(SpecialKind::AreaBomb)),
                    '0'..='9' | 'a'..='z' => Some(TileKind::Ordinary(ch.to_digit(36)? as u8)),
                    _ => return None,
                };
                let idx = grid.index(pos)?;
                grid.cells[idx] = kind.map(|k| Tile::new(k, pos));
            }
        }
        Some(grid)
    }

    /// Render the grid back into the text form accepted by [`Grid::from_rows`]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as i8)
            .map(|y| {
                (0..self.width as i8)
                    .map(|x| symbol(self.kind_at(Pos::new(x, y))))
                    .collect()
            })
            .collect()
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    #[inline]
    fn checked_index(&self, pos: Pos) -> Result<usize, ActionError> {
        self.index(pos).ok_or(ActionError::OutOfBounds { x: pos.x, y: pos.y })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u8) < self.width && (pos.y as u8) < self.height
    }

    /// Get the cell at `pos`
    pub fn get(&self, pos: Pos) -> Result<Cell, ActionError> {
        self.checked_index(pos).map(|idx| self.cells[idx])
    }

    /// Store `cell` at `pos` and return what was there before
    ///
    /// A stored tile has its `position` rewritten to `pos`.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<Cell, ActionError> {
        let idx = self.checked_index(pos)?;
        let placed = cell.map(|tile| Tile { position: pos, ..tile });
        Ok(std::mem::replace(&mut self.cells[idx], placed))
    }

    /// Empty the cell at `pos` and return its previous content
    pub fn take(&mut self, pos: Pos) -> Result<Cell, ActionError> {
        self.set(pos, None)
    }

    /// Exchange the contents of two cells, occupied or not
    ///
    /// Adjacency is the caller's business.
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), ActionError> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.position = a;
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.position = b;
        }
        Ok(())
    }

    /// Tile kind at `pos`; `None` for empty or out-of-bounds cells
    #[inline]
    pub fn kind_at(&self, pos: Pos) -> Option<TileKind> {
        self.index(pos)
            .and_then(|idx| self.cells[idx])
            .map(|tile| tile.kind)
    }

    /// Ordinary kind at `pos`; `None` for empty, special, or out-of-bounds cells
    #[inline]
    pub fn ordinary_at(&self, pos: Pos) -> Option<u8> {
        self.kind_at(pos).and_then(TileKind::ordinary)
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width as i8, self.height as i8);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    /// Occupied cells in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(Option::as_ref)
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Empty positions in row-major order
    pub fn empty_positions(&self) -> Vec<Pos> {
        self.positions()
            .filter(|&pos| matches!(self.get(pos), Ok(None)))
            .collect()
    }

    /// Apply gravity: slide every tile to the lowest empty cell of its column
    ///
    /// Relative order within a column is preserved and nothing moves
    /// sideways. Returns the moves as `(from, to)`, columns left to right and
    /// bottom-most tile first within a column. Uses a two-pointer pass per
    /// column with no intermediate buffer.
    pub fn compact(&mut self) -> Vec<(Pos, Pos)> {
        let mut moves = Vec::new();
        let width = self.width as usize;

        for x in 0..width {
            let mut write_y = self.height as usize;

            // Scan from bottom to top
            for read_y in (0..self.height as usize).rev() {
                let read_idx = read_y * width + x;
                if self.cells[read_idx].is_none() {
                    continue;
                }
                write_y -= 1;
                if write_y != read_y {
                    let write_idx = write_y * width + x;
                    let to = Pos::new(x as i8, write_y as i8);
                    let mut tile = self.cells[read_idx].take();
                    if let Some(t) = tile.as_mut() {
                        t.position = to;
                    }
                    self.cells[write_idx] = tile;
                    moves.push((Pos::new(x as i8, read_y as i8), to));
                }
            }
        }

        moves
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

fn symbol(kind: Option<TileKind>) -> char {
    match kind {
        None => '.',
        Some(TileKind::Special(SpecialKind::Line)) => 'L',
        Some(TileKind::Special(SpecialKind::ColorBomb)) => 'C',
        Some(TileKind::Special(SpecialKind::AreaBomb)) => 'A',
        Some(TileKind::Ordinary(k)) => std::char::from_digit(k as u32, 36).unwrap_or('?'),
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
