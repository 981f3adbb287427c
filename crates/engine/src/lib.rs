//! Level play on top of the core resolver.
//!
//! A [`GameSession`] owns one board for one level and counts moves against the
//! level's budget and target score.

pub mod session;

pub use session::{GameSession, SessionError, SessionStatus};
