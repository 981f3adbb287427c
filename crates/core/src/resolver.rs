//! Board resolver - turns one player action into a stable board
//!
//! The resolver owns the grid for the whole session and runs each action to
//! completion before returning:
//!
//! ```text
//! Idle -> ValidatingSwap -> Cascading -> Stable
//! ```
//!
//! - **ValidatingSwap**: bounds, adjacency, then either special activation or
//!   a tentative swap that must produce a match (reverted otherwise).
//! - **Cascading**: detect, reserve spawn cells, remove, score, compact,
//!   refill, place specials on their reserved cells, until no run is left.
//! - **Stable**: multiplier back to 1; a deadlocked board is reshuffled.
//!
//! The returned [`Resolution`] is the complete, ordered record of what
//! happened. Rejected actions leave the grid exactly as it was. The one
//! failure that comes after the board has changed, an unshuffleable
//! deadlock, parks its events for [`BoardResolver::take_partial_resolution`].

use log::{debug, info, warn};

use crate::activation;
use crate::detector;
use crate::grid::Grid;
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::ScoreAccumulator;
use crate::spawn;
use crate::types::{
    ActionError, ConfigError, LevelConfig, Pos, RemovalCause, Resolution, ResolutionEvent,
    SpecialKind, Tile, TileKind, MATCH_POINTS, MAX_SHUFFLE_ATTEMPTS, SPECIAL_POINTS,
};

/// Where the resolver is in its action cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// Fresh board, no action taken yet
    Idle,
    ValidatingSwap,
    Cascading,
    /// Last action finished; board has no runs and at least one legal move
    Stable,
}

/// Failure while building a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Owns the grid and resolves every action against it
#[derive(Debug, Clone)]
pub struct BoardResolver<R = SimpleRng> {
    grid: Grid,
    kind_count: u8,
    rng: R,
    score: ScoreAccumulator,
    state: ResolverState,
    partial: Option<Resolution>,
}

impl BoardResolver<SimpleRng> {
    /// Build a board for `config` driven by the built-in LCG
    pub fn with_seed(config: &LevelConfig, seed: u32) -> Result<Self, BoardError> {
        Self::new(config, SimpleRng::new(seed))
    }
}

impl<R: RandomSource> BoardResolver<R> {
    /// Build a randomized board with no runs and at least one legal move
    pub fn new(config: &LevelConfig, rng: R) -> Result<Self, BoardError> {
        config.validate()?;

        let mut resolver = Self {
            grid: Grid::new(config.width, config.height),
            kind_count: config.ordinary_kind_count,
            rng,
            score: ScoreAccumulator::new(),
            state: ResolverState::Idle,
            partial: None,
        };
        resolver.fill_initial()?;
        Ok(resolver)
    }

    /// Wrap an existing grid as-is
    ///
    /// No validation or reshuffle happens; callers use this for scripted
    /// layouts. Refills draw kinds in `0..kind_count`.
    pub fn from_grid(grid: Grid, kind_count: u8, rng: R) -> Self {
        Self {
            grid,
            kind_count: kind_count.max(1),
            rng,
            score: ScoreAccumulator::new(),
            state: ResolverState::Idle,
            partial: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Owned copy of the grid for readers outside the resolver
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Total points scored on this board
    pub fn score(&self) -> u32 {
        self.score.total()
    }

    /// Multiplier the next removal step would use
    pub fn multiplier(&self) -> u32 {
        self.score.multiplier()
    }

    pub fn kind_count(&self) -> u8 {
        self.kind_count
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Events of the last action that changed the board and then failed
    ///
    /// Only an [`ActionError::UnshuffleableBoard`] after a cascade leaves
    /// something here. Cleared by the next action.
    pub fn take_partial_resolution(&mut self) -> Option<Resolution> {
        self.partial.take()
    }

    pub fn has_legal_move(&self) -> bool {
        self.find_legal_move().is_some()
    }

    /// First match-producing swap in row-major order; suitable as a hint
    pub fn find_legal_move(&self) -> Option<(Pos, Pos)> {
        detector::find_legal_move(&self.grid)
    }

    /// Swap two tiles and resolve everything that follows
    ///
    /// If either tile is special it fires in place (the first position is
    /// checked first) with the other tile as its partner, and no match is
    /// required. Otherwise the swap must create a run or it is undone.
    pub fn validate_and_resolve(&mut self, p1: Pos, p2: Pos) -> Result<Resolution, ActionError> {
        let first = self.grid.get(p1)?.map(|t| t.kind);
        let second = self.grid.get(p2)?.map(|t| t.kind);
        if !p1.is_adjacent(p2) {
            debug!("[Resolver] Swap {:?} <-> {:?} rejected: not adjacent", p1, p2);
            return Err(ActionError::NotAdjacent);
        }

        self.partial = None;
        let previous = self.state;
        self.state = ResolverState::ValidatingSwap;
        let mut out = Resolution::default();

        match (first, second) {
            (Some(TileKind::Special(special)), partner) => {
                self.state = ResolverState::Cascading;
                self.activation_step(p1, special, partner, &mut out)?;
            }
            (partner, Some(TileKind::Special(special))) => {
                self.state = ResolverState::Cascading;
                self.activation_step(p2, special, partner, &mut out)?;
            }
            _ => {
                self.grid.swap(p1, p2)?;
                if !detector::has_match(&self.grid) {
                    self.grid.swap(p1, p2)?;
                    self.state = previous;
                    debug!("[Resolver] Swap {:?} <-> {:?} rejected: no match", p1, p2);
                    return Err(ActionError::NoMatchProduced);
                }
                self.state = ResolverState::Cascading;
            }
        }

        self.finish(out)
    }

    /// Fire the special tile at `pos` without a swap partner
    pub fn activate_special(&mut self, pos: Pos) -> Result<Resolution, ActionError> {
        let special = self
            .grid
            .get(pos)?
            .and_then(|t| t.kind.special())
            .ok_or(ActionError::NotSpecial { x: pos.x, y: pos.y })?;

        self.partial = None;
        self.state = ResolverState::Cascading;
        let mut out = Resolution::default();
        self.activation_step(pos, special, None, &mut out)?;
        self.finish(out)
    }

    /// Permute ordinary kinds until the board has no run and a legal move
    ///
    /// On failure the grid is unchanged.
    pub fn reshuffle(&mut self) -> Result<Resolution, ActionError> {
        self.partial = None;
        let mut out = Resolution::default();
        self.shuffle_until_playable(&mut out)?;
        self.state = ResolverState::Stable;
        Ok(out)
    }

    /// Cascade to a stable board, keeping the events if stabilizing fails
    fn finish(&mut self, mut out: Resolution) -> Result<Resolution, ActionError> {
        self.cascade(&mut out)?;
        if let Err(err) = self.stabilize(&mut out) {
            self.partial = Some(out);
            return Err(err);
        }
        Ok(out)
    }

    fn activation_step(
        &mut self,
        pos: Pos,
        special: SpecialKind,
        partner: Option<TileKind>,
        out: &mut Resolution,
    ) -> Result<(), ActionError> {
        let target = match special {
            SpecialKind::ColorBomb => activation::color_target(&self.grid, partner),
            SpecialKind::Line | SpecialKind::AreaBomb => None,
        };

        let mut removed = Vec::new();
        for cell in activation::affected_cells(&self.grid, pos, special, target) {
            if self.grid.take(cell)?.is_some() {
                removed.push(cell);
            }
        }

        let points = self.score.award(removed.len(), SPECIAL_POINTS);
        debug!(
            "[Resolver] {} at {:?} cleared {} tiles for {} points",
            special.as_str(),
            pos,
            removed.len(),
            points
        );
        out.push(ResolutionEvent::TilesRemoved {
            cells: removed,
            cause: RemovalCause::Special(special),
            points,
        });
        let multiplier = self.score.advance();
        out.push(ResolutionEvent::ComboAdvanced { multiplier });

        self.settle(out)
    }

    fn cascade(&mut self, out: &mut Resolution) -> Result<(), ActionError> {
        loop {
            let matches = detector::detect(&self.grid);
            if matches.is_empty() {
                return Ok(());
            }

            // Spawn cells are reserved before anything is removed.
            let spawns = spawn::spawns_for(&matches.groups);
            let removed: Vec<Pos> = matches
                .cells
                .iter()
                .copied()
                .filter(|cell| !spawns.iter().any(|(reserved, _)| reserved == cell))
                .collect();
            for &cell in &removed {
                self.grid.take(cell)?;
            }

            let points = self.score.award(removed.len(), MATCH_POINTS);
            debug!(
                "[Resolver] Cascade x{}: {} groups, {} removed, {} specials, {} points",
                self.score.multiplier(),
                matches.groups.len(),
                removed.len(),
                spawns.len(),
                points
            );
            out.push(ResolutionEvent::TilesRemoved {
                cells: removed,
                cause: RemovalCause::Match,
                points,
            });

            let multiplier = self.score.advance();
            out.push(ResolutionEvent::ComboAdvanced { multiplier });

            self.settle(out)?;

            // Specials go in after gravity so each sits on its run's center,
            // replacing whatever settled there.
            for (pos, kind) in spawns {
                self.grid.set(pos, Some(Tile::special(kind, pos)))?;
                out.push(ResolutionEvent::SpecialSpawned { pos, kind });
            }
        }
    }

    /// Gravity then refill; leaves every cell occupied
    fn settle(&mut self, out: &mut Resolution) -> Result<(), ActionError> {
        let moves = self.grid.compact();
        if !moves.is_empty() {
            out.push(ResolutionEvent::TilesFell { moves });
        }

        let mut tiles = Vec::new();
        for pos in self.grid.empty_positions() {
            let kind = self.rng.next_range(self.kind_count as u32) as u8;
            let tile = Tile::ordinary(kind, pos);
            self.grid.set(pos, Some(tile))?;
            tiles.push(tile);
        }
        if !tiles.is_empty() {
            out.push(ResolutionEvent::TilesSpawned { tiles });
        }
        Ok(())
    }

    fn stabilize(&mut self, out: &mut Resolution) -> Result<(), ActionError> {
        self.score.reset();
        self.state = ResolverState::Stable;

        if self.has_legal_move() {
            return Ok(());
        }
        info!("[Resolver] Deadlock detected, reshuffling");
        self.shuffle_until_playable(out)
    }

    fn shuffle_until_playable(&mut self, out: &mut Resolution) -> Result<(), ActionError> {
        let slots: Vec<Pos> = self
            .grid
            .tiles()
            .filter(|t| !t.is_special())
            .map(|t| t.position)
            .collect();
        let mut kinds: Vec<u8> = self.grid.tiles().filter_map(|t| t.kind.ordinary()).collect();

        for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
            self.rng.shuffle(&mut kinds);

            let mut candidate = self.grid.clone();
            for (&pos, &kind) in slots.iter().zip(&kinds) {
                candidate.set(pos, Some(Tile::ordinary(kind, pos)))?;
            }
            if detector::has_match(&candidate) || detector::find_legal_move(&candidate).is_none() {
                continue;
            }

            info!("[Resolver] Board reshuffled after {} attempt(s)", attempt);
            self.grid = candidate;
            let tiles: Vec<Tile> = slots
                .iter()
                .filter_map(|&pos| self.grid.get(pos).ok().flatten())
                .collect();
            out.push(ResolutionEvent::BoardShuffled { tiles });
            return Ok(());
        }

        warn!(
            "[Resolver] No playable arrangement after {} shuffles",
            MAX_SHUFFLE_ATTEMPTS
        );
        Err(ActionError::UnshuffleableBoard {
            attempts: MAX_SHUFFLE_ATTEMPTS,
        })
    }

    fn fill_initial(&mut self) -> Result<(), ActionError> {
        let positions: Vec<Pos> = self.grid.positions().collect();
        for pos in positions {
            let kind = self.safe_kind(pos);
            self.grid.set(pos, Some(Tile::ordinary(kind, pos)))?;
        }

        if !self.has_legal_move() {
            let mut discarded = Resolution::default();
            self.shuffle_until_playable(&mut discarded)?;
        }
        Ok(())
    }

    /// Random kind that does not complete a run with the two cells to the
    /// left or the two cells above (the only cells filled so far)
    fn safe_kind(&mut self, pos: Pos) -> u8 {
        let mut forbidden: [Option<u8>; 2] = [None, None];
        for (slot, (dx, dy)) in forbidden.iter_mut().zip([(-1, 0), (0, -1)]) {
            let near = self.grid.ordinary_at(pos.offset(dx, dy));
            let far = self.grid.ordinary_at(pos.offset(dx * 2, dy * 2));
            if near.is_some() && near == far {
                *slot = near;
            }
        }

        let available: Vec<u8> = (0..self.kind_count)
            .filter(|k| !forbidden.contains(&Some(*k)))
            .collect();
        if available.is_empty() {
            return self.rng.next_range(self.kind_count as u32) as u8;
        }
        available[self.rng.next_range(available.len() as u32) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::CycleRng;

    fn resolver(rows: &[&str], refill: &[u32]) -> BoardResolver<CycleRng> {
        let grid = Grid::from_rows(rows).expect("valid layout");
        BoardResolver::from_grid(grid, 5, CycleRng::new(refill.to_vec()))
    }

    #[test]
    fn test_new_board_is_full_match_free_and_playable() {
        for seed in 1..20 {
            let board = BoardResolver::with_seed(&LevelConfig::default(), seed).unwrap();
            assert!(board.grid().is_full());
            assert!(!detector::has_match(board.grid()), "seed {seed}");
            assert!(board.has_legal_move(), "seed {seed}");
            assert_eq!(board.state(), ResolverState::Idle);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LevelConfig {
            ordinary_kind_count: 1,
            ..LevelConfig::default()
        };
        assert!(matches!(
            BoardResolver::with_seed(&config, 1),
            Err(BoardError::Config(ConfigError::BadKindCount(1)))
        ));
    }

    #[test]
    fn test_not_adjacent_leaves_grid_untouched() {
        let mut board = BoardResolver::with_seed(&LevelConfig::default(), 3).unwrap();
        let before = board.snapshot();

        assert_eq!(
            board.validate_and_resolve(Pos::new(0, 0), Pos::new(2, 2)),
            Err(ActionError::NotAdjacent)
        );
        assert_eq!(board.grid(), &before);
        assert_eq!(board.state(), ResolverState::Idle);
    }

    #[test]
    fn test_out_of_bounds_reported_before_adjacency() {
        let mut board = BoardResolver::with_seed(&LevelConfig::default(), 3).unwrap();
        assert_eq!(
            board.validate_and_resolve(Pos::new(7, 0), Pos::new(8, 0)),
            Err(ActionError::OutOfBounds { x: 8, y: 0 })
        );
    }

    #[test]
    fn test_swap_without_match_is_reverted() {
        let mut board = resolver(&["0123", "1230", "2301"], &[4]);
        let before = board.snapshot();

        assert_eq!(
            board.validate_and_resolve(Pos::new(0, 0), Pos::new(1, 0)),
            Err(ActionError::NoMatchProduced)
        );
        assert_eq!(board.grid(), &before);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_line_tile_spawns_at_run_center() {
        // Swapping (4,1) up into row 0 completes 1111 at columns 2..=5.
        let mut board = resolver(
            &[
                "021131", //
                "340210", //
                "403342",
            ],
            &[3, 4, 0, 2, 3, 4, 0, 1, 3, 0],
        );

        let resolution = board
            .validate_and_resolve(Pos::new(4, 0), Pos::new(4, 1))
            .unwrap();

        match &resolution.events[0] {
            ResolutionEvent::TilesRemoved { cells, cause, points } => {
                assert_eq!(*cause, RemovalCause::Match);
                assert_eq!(cells, &vec![Pos::new(2, 0), Pos::new(3, 0), Pos::new(5, 0)]);
                assert_eq!(*points, 30);
            }
            other => panic!("expected removal, got {:?}", other),
        }
        assert_eq!(
            resolution.events.last(),
            Some(&ResolutionEvent::SpecialSpawned {
                pos: Pos::new(4, 0),
                kind: SpecialKind::Line
            })
        );
        assert_eq!(
            board.grid().kind_at(Pos::new(4, 0)),
            Some(TileKind::Special(SpecialKind::Line))
        );
    }

    #[test]
    fn test_activate_special_requires_special_tile() {
        let mut board = resolver(&["012", "120", "201"], &[0]);
        assert_eq!(
            board.activate_special(Pos::new(1, 1)),
            Err(ActionError::NotSpecial { x: 1, y: 1 })
        );
        assert_eq!(
            board.activate_special(Pos::new(3, 1)),
            Err(ActionError::OutOfBounds { x: 3, y: 1 })
        );
    }

    #[test]
    fn test_multiplier_resets_after_action() {
        let mut board = BoardResolver::with_seed(&LevelConfig::default(), 11).unwrap();
        let (a, b) = board.find_legal_move().unwrap();
        let resolution = board.validate_and_resolve(a, b).unwrap();

        assert!(resolution.points() > 0);
        assert_eq!(board.multiplier(), 1);
        assert_eq!(board.score(), resolution.points());
        assert_eq!(board.state(), ResolverState::Stable);
    }
}
