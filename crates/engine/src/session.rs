use log::{debug, info};

use tile_cascade_core::{BoardError, BoardResolver, Grid, RandomSource, SimpleRng};
use tile_cascade_types::{ActionError, LevelConfig, Pos, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Playing,
    Won,
    OutOfMoves,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Playing => "playing",
            SessionStatus::Won => "won",
            SessionStatus::OutOfMoves => "out_of_moves",
        }
    }

    pub fn is_finished(self) -> bool {
        self != SessionStatus::Playing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("could not build board: {0}")]
    Board(#[from] BoardError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("session already finished")]
    Finished,
}

impl SessionError {
    pub fn code(self) -> &'static str {
        match self {
            SessionError::Board(BoardError::Config(_)) => "bad_config",
            SessionError::Board(BoardError::Action(err)) | SessionError::Action(err) => err.code(),
            SessionError::Finished => "finished",
        }
    }
}

/// One level in play: a board plus its move budget and target
#[derive(Debug, Clone)]
pub struct GameSession<R = SimpleRng> {
    level: u32,
    config: LevelConfig,
    resolver: BoardResolver<R>,
    moves_left: u32,
    status: SessionStatus,
}

impl GameSession<SimpleRng> {
    /// Start the built-in level `level` seeded with `seed`
    pub fn for_level(level: u32, seed: u32) -> Result<Self, SessionError> {
        Self::new(level, LevelConfig::for_level(level), SimpleRng::new(seed))
    }
}

impl<R: RandomSource> GameSession<R> {
    pub fn new(level: u32, config: LevelConfig, rng: R) -> Result<Self, SessionError> {
        let resolver = BoardResolver::new(&config, rng)?;
        Ok(Self::from_resolver(level, config, resolver))
    }

    /// Play `config`'s budget and target on a prepared board
    pub fn from_resolver(level: u32, config: LevelConfig, resolver: BoardResolver<R>) -> Self {
        let mut session = Self {
            level,
            moves_left: config.move_budget,
            config,
            resolver,
            status: SessionStatus::Playing,
        };
        session.update_status();
        session
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn score(&self) -> u32 {
        self.resolver.score()
    }

    pub fn grid(&self) -> &Grid {
        self.resolver.grid()
    }

    pub fn resolver(&self) -> &BoardResolver<R> {
        &self.resolver
    }

    /// Events of an action that scored and then hit an unshuffleable deadlock
    ///
    /// The action returned [`SessionError::Action`]; these are the removals,
    /// falls and refills it still made, for replay.
    pub fn take_partial_resolution(&mut self) -> Option<Resolution> {
        self.resolver.take_partial_resolution()
    }

    /// First legal swap, or `None` once the session is over
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        if self.status.is_finished() {
            return None;
        }
        self.resolver.find_legal_move()
    }

    pub fn swap(&mut self, p1: Pos, p2: Pos) -> Result<Resolution, SessionError> {
        self.ensure_playing()?;
        let result = self.resolver.validate_and_resolve(p1, p2);
        self.finish_action(result)
    }

    /// Fire a special tile directly
    pub fn tap(&mut self, pos: Pos) -> Result<Resolution, SessionError> {
        self.ensure_playing()?;
        let result = self.resolver.activate_special(pos);
        self.finish_action(result)
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        if self.status.is_finished() {
            return Err(SessionError::Finished);
        }
        Ok(())
    }

    fn finish_action(
        &mut self,
        result: Result<Resolution, ActionError>,
    ) -> Result<Resolution, SessionError> {
        match result {
            Ok(resolution) => {
                self.moves_left = self.moves_left.saturating_sub(1);
                debug!(
                    "[Session] Level {}: +{} points, {} moves left",
                    self.level,
                    resolution.points(),
                    self.moves_left
                );
                self.update_status();
                Ok(resolution)
            }
            // The board changed before the deadlock was found; the move counts
            // and play cannot continue on this board.
            Err(err @ ActionError::UnshuffleableBoard { .. }) => {
                self.moves_left = 0;
                self.update_status();
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_status(&mut self) {
        let next = if self.score() >= self.config.target_score {
            SessionStatus::Won
        } else if self.moves_left == 0 {
            SessionStatus::OutOfMoves
        } else {
            SessionStatus::Playing
        };

        if next != self.status && next.is_finished() {
            info!(
                "[Session] Level {} ended: {} with {} points ({} moves left)",
                self.level,
                next.as_str(),
                self.score(),
                self.moves_left
            );
        }
        self.status = next;
    }
}
