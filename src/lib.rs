//! Tile Cascade (workspace facade crate).
//!
//! This package exposes `tile_cascade::{core,engine,types}` while the implementation lives in
//! dedicated crates under `crates/`, plus the headless autoplay runner used by the binary.

pub mod autoplay;

pub use tile_cascade_core as core;
pub use tile_cascade_engine as engine;
pub use tile_cascade_types as types;
