//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data: the grid, detector, resolver and any
//! presentation layer can share these without pulling in game logic.
//!
//! # Coordinates
//!
//! Cells are addressed by [`Pos`] `(x, y)` where `x` grows to the right and
//! `y` grows downward. Row `0` is the top of the board, so gravity moves
//! tiles toward larger `y` and refills happen at small `y`.
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MATCH_POINTS` | 10 | Points per tile removed by a match |
//! | `SPECIAL_POINTS` | 20 | Points per tile removed by a special activation |
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//! | `LINE_RUN` | 4 | Run length that spawns a line-clear tile |
//! | `COLOR_RUN` | 5 | Run length (and above) that spawns a color-clear tile |
//!
//! Points for one cascade step are `removed * base * multiplier`, where the
//! multiplier starts at 1 for every player action and grows by one per step.
//!
//! # Examples
//!
//! ```
//! use tile_cascade_types::{Pos, SpecialKind, TileKind};
//!
//! let a = Pos::new(2, 3);
//! assert!(a.is_adjacent(Pos::new(2, 4)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//!
//! assert_eq!(TileKind::Ordinary(2).ordinary(), Some(2));
//! assert!(TileKind::Special(SpecialKind::Line).is_special());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default board width in cells (8 columns)
pub const DEFAULT_WIDTH: u8 = 8;

/// Default board height in cells (8 rows)
pub const DEFAULT_HEIGHT: u8 = 8;

/// Default number of ordinary tile kinds
pub const DEFAULT_KIND_COUNT: u8 = 7;

/// Shortest run that counts as a match
pub const MIN_RUN: usize = 3;

/// Run length that spawns a line-clear tile
pub const LINE_RUN: usize = 4;

/// Run length from which a color-clear tile is spawned
pub const COLOR_RUN: usize = 5;

/// Base points per tile removed by a match
pub const MATCH_POINTS: u32 = 10;

/// Base points per tile removed by a special activation
pub const SPECIAL_POINTS: u32 = 20;

/// Candidate permutations tried before a deadlocked board is declared unshuffleable
pub const MAX_SHUFFLE_ATTEMPTS: u32 = 100;

/// Smallest supported board edge
pub const MIN_BOARD_EDGE: u8 = 3;

/// Largest supported board edge
pub const MAX_BOARD_EDGE: u8 = 64;

/// Smallest supported number of ordinary kinds
pub const MIN_KIND_COUNT: u8 = 3;

/// Largest supported number of ordinary kinds
pub const MAX_KIND_COUNT: u8 = 32;


/// A cell coordinate on the board
///
/// Derived ordering is row-major (`y` first, then `x`), which is also the
/// order the grid iterates its cells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pos {
    pub y: i8,
    pub x: i8,
}

impl Pos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { y, x }
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: Pos) -> u32 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx + dy
    }

    /// True when the two positions share an edge
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }

    /// Offset by `(dx, dy)`; may leave the board, callers bounds-check.
    pub fn offset(self, dx: i8, dy: i8) -> Pos {
        Pos::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }
}

impl From<(i8, i8)> for Pos {
    fn from((x, y): (i8, i8)) -> Self {
        Pos::new(x, y)
    }
}

/// Special tile kinds
///
/// - **Line**: clears its whole row and column
/// - **ColorBomb**: clears every tile of one ordinary kind
/// - **AreaBomb**: clears the 3x3 block around it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpecialKind {
    Line,
    ColorBomb,
    AreaBomb,
}

impl SpecialKind {
    /// Parse special kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_cascade_types::SpecialKind;
    ///
    /// assert_eq!(SpecialKind::from_str("line"), Some(SpecialKind::Line));
    /// assert_eq!(SpecialKind::from_str("ColorBomb"), Some(SpecialKind::ColorBomb));
    /// assert_eq!(SpecialKind::from_str("rocket"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "line" => Some(SpecialKind::Line),
            "colorbomb" | "color_bomb" => Some(SpecialKind::ColorBomb),
            "areabomb" | "area_bomb" => Some(SpecialKind::AreaBomb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::Line => "line",
            SpecialKind::ColorBomb => "color_bomb",
            SpecialKind::AreaBomb => "area_bomb",
        }
    }
}

/// What a tile is: an ordinary matchable kind or a special tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TileKind {
    /// Ordinary kind index in `0..ordinary_kind_count`
    Ordinary(u8),
    Special(SpecialKind),
}

impl TileKind {
    /// The ordinary kind index, or `None` for special tiles
    pub fn ordinary(self) -> Option<u8> {
        match self {
            TileKind::Ordinary(k) => Some(k),
            TileKind::Special(_) => None,
        }
    }

    pub fn special(self) -> Option<SpecialKind> {
        match self {
            TileKind::Ordinary(_) => None,
            TileKind::Special(s) => Some(s),
        }
    }

    pub fn is_special(self) -> bool {
        matches!(self, TileKind::Special(_))
    }
}

/// A tile on the board
///
/// `position` is authoritative: the grid rewrites it every time the tile is
/// stored or moved, so a tile read out of a cell always knows where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tile {
    pub kind: TileKind,
    pub position: Pos,
}

impl Tile {
    pub fn new(kind: TileKind, position: Pos) -> Self {
        Self { kind, position }
    }

    pub fn ordinary(kind: u8, position: Pos) -> Self {
        Self::new(TileKind::Ordinary(kind), position)
    }

    pub fn special(kind: SpecialKind, position: Pos) -> Self {
        Self::new(TileKind::Special(kind), position)
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }
}

/// A cell on the board
///
/// - `None`: Empty cell
/// - `Some(Tile)`: Cell holding the given tile
pub type Cell = Option<Tile>;

/// Axis along which a run was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One run of same-kind ordinary tiles found by a detection pass
///
/// Produced and consumed within a single cascade step; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchGroup {
    /// Cells of the run in axis order
    pub cells: Vec<Pos>,
    pub run_length: usize,
    pub kind: u8,
    pub orientation: Orientation,
    /// `start + run_length / 2` along the run axis
    pub center: Pos,
}

/// Why a batch of tiles left the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RemovalCause {
    Match,
    Special(SpecialKind),
}

/// A single board delta, in the order presentation should replay it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum ResolutionEvent {
    TilesRemoved {
        cells: Vec<Pos>,
        cause: RemovalCause,
        points: u32,
    },
    /// Placed after the step's refill, replacing the tile on `pos`.
    SpecialSpawned {
        pos: Pos,
        kind: SpecialKind,
    },
    /// Gravity moves as `(from, to)`, bottom-most tile of each column first.
    TilesFell {
        moves: Vec<(Pos, Pos)>,
    },
    TilesSpawned {
        tiles: Vec<Tile>,
    },
    ComboAdvanced {
        multiplier: u32,
    },
    /// Deadlock reshuffle rewrote the kinds of these tiles.
    BoardShuffled {
        tiles: Vec<Tile>,
    },
}

/// Ordered event sequence produced by one player action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resolution {
    pub events: Vec<ResolutionEvent>,
}

impl Resolution {
    pub fn push(&mut self, event: ResolutionEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total points awarded across all removal events
    pub fn points(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                ResolutionEvent::TilesRemoved { points, .. } => *points,
                _ => 0,
            })
            .fold(0u32, |acc, p| acc.saturating_add(p))
    }

    /// Number of removal steps (special activation plus cascade iterations)
    pub fn cascade_steps(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ResolutionEvent::TilesRemoved { .. }))
            .count()
    }

    pub fn tiles_removed(&self) -> usize {
        self.events
            .iter()
            .map(|e| match e {
                ResolutionEvent::TilesRemoved { cells, .. } => cells.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolutionEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a Resolution {
    type Item = &'a ResolutionEvent;
    type IntoIter = std::slice::Iter<'a, ResolutionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Per-level parameters, read once when a board is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelConfig {
    pub width: u8,
    pub height: u8,
    pub ordinary_kind_count: u8,
    pub target_score: u32,
    pub move_budget: u32,
}

impl LevelConfig {
    /// Built-in parameters for a numbered level (1-based)
    ///
    /// Target grows by 1000 per level from 3000; the move budget shrinks by
    /// one per level from 24 down to a floor of 15.
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            ordinary_kind_count: DEFAULT_KIND_COUNT,
            target_score: 3000 + (level - 1) * 1000,
            move_budget: 25u32.saturating_sub(level).max(15),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let edge_ok = |e: u8| (MIN_BOARD_EDGE..=MAX_BOARD_EDGE).contains(&e);
        if !edge_ok(self.width) || !edge_ok(self.height) {
            return Err(ConfigError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(MIN_KIND_COUNT..=MAX_KIND_COUNT).contains(&self.ordinary_kind_count) {
            return Err(ConfigError::BadKindCount(self.ordinary_kind_count));
        }
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::for_level(1)
    }
}

/// Rejected level parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board must be between 3 and 64 cells per edge, got {width}x{height}")]
    BadDimensions { width: u8, height: u8 },
    #[error("ordinary kind count must be between 3 and 32, got {0}")]
    BadKindCount(u8),
}

/// Why a player action was rejected
///
/// Every variant is recoverable: the board is left exactly as it was before
/// the rejected call (`UnshuffleableBoard` leaves the stable post-cascade board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("position ({x}, {y}) is outside the board")]
    OutOfBounds { x: i8, y: i8 },
    #[error("tiles are not adjacent")]
    NotAdjacent,
    #[error("swap does not produce a match")]
    NoMatchProduced,
    #[error("tile at ({x}, {y}) is not a special tile")]
    NotSpecial { x: i8, y: i8 },
    #[error("no playable arrangement found after {attempts} shuffle attempts")]
    UnshuffleableBoard { attempts: u32 },
}

impl ActionError {
    /// Stable snake_case code for UI feedback
    pub fn code(self) -> &'static str {
        match self {
            ActionError::OutOfBounds { .. } => "out_of_bounds",
            ActionError::NotAdjacent
            | ActionError::NoMatchProduced
            | ActionError::NotSpecial { .. } => "invalid_move",
            ActionError::UnshuffleableBoard { .. } => "unshuffleable_board",
        }
    }

    /// Expected user-input outcomes that the UI shows as "invalid move"
    pub fn is_invalid_move(self) -> bool {
        self.code() == "invalid_move"
    }
}
