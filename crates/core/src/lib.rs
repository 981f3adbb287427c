//! Core match-resolution logic - pure, deterministic, and testable
//!
//! This crate contains every board rule of the puzzle: the grid, match
//! detection, special tiles, gravity, refill and deadlock shuffling.
//! It has **no dependencies** on rendering, audio, input or storage, making it:
//!
//! - **Deterministic**: Same seed (or scripted source) produces identical boards
//! - **Testable**: Layouts can be written as text rows and resolved directly
//! - **Portable**: Runs headless, in a terminal, or behind any presentation layer
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size arena of cells with bounds-checked access and gravity
//! - [`detector`]: horizontal/vertical run detection and legal-move search
//! - [`spawn`]: which special tile a run earns and where it lands
//! - [`activation`]: cells cleared by each special kind
//! - [`scoring`]: combo multiplier bookkeeping
//! - [`resolver`]: the action state machine tying it all together
//! - [`rng`]: injectable random sources
//!
//! # Game Rules
//!
//! - **Runs**: 3+ same-kind ordinary tiles in a row or column; specials and
//!   empty cells break runs
//! - **Specials**: a 4-run leaves a line-clear tile at its center, a 5+-run a
//!   color-clear tile; the area-clear tile has no run rule
//! - **Cascade**: remove, compact, refill and re-detect until nothing matches,
//!   with the multiplier growing by one per step
//! - **Deadlock**: a board with no match-producing swap is reshuffled
//!
//! # Example
//!
//! ```
//! use tile_cascade_core::BoardResolver;
//! use tile_cascade_types::LevelConfig;
//!
//! let mut board = BoardResolver::with_seed(&LevelConfig::default(), 12345).unwrap();
//!
//! // A fresh board always has a move.
//! let (a, b) = board.find_legal_move().unwrap();
//! let resolution = board.validate_and_resolve(a, b).unwrap();
//!
//! assert!(resolution.points() > 0);
//! assert!(board.grid().is_full());
//! assert!(board.has_legal_move());
//! ```

pub mod activation;
pub mod detector;
pub mod grid;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod spawn;

pub use tile_cascade_types as types;

// Re-export commonly used types for convenience
pub use activation::affected_cells;
pub use detector::{detect, find_legal_move, has_match, Matches};
pub use grid::Grid;
pub use resolver::{BoardError, BoardResolver, ResolverState};
pub use rng::{CycleRng, RandomSource, SimpleRng};
pub use scoring::ScoreAccumulator;
pub use spawn::spawns_for;
