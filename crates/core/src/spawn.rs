//! Special tile creation rules
//!
//! Maps the groups of one detection pass to special tile spawns:
//!
//! | Run length | Spawn |
//! |------------|-------|
//! | 3 | nothing |
//! | 4 | [`SpecialKind::Line`] |
//! | 5+ | [`SpecialKind::ColorBomb`] |
//!
//! [`SpecialKind::AreaBomb`] has no run rule and is never produced here.
//! Each spawn lands on its group's center cell, which the resolver keeps out
//! of the removal set.

use crate::types::{MatchGroup, Pos, SpecialKind, COLOR_RUN, LINE_RUN};

/// Special kind earned by a run of the given length
pub fn special_for_run(run_length: usize) -> Option<SpecialKind> {
    match run_length {
        n if n >= COLOR_RUN => Some(SpecialKind::ColorBomb),
        LINE_RUN => Some(SpecialKind::Line),
        _ => None,
    }
}

/// Spawns for a detection pass, one per distinct center cell
///
/// Groups are processed in detection order (horizontal by row, then vertical
/// by column). When two groups share a center the later group's kind wins
/// while the entry keeps the position of its first appearance.
pub fn spawns_for(groups: &[MatchGroup]) -> Vec<(Pos, SpecialKind)> {
    let mut spawns: Vec<(Pos, SpecialKind)> = Vec::new();

    for group in groups {
        let Some(kind) = special_for_run(group.run_length) else {
            continue;
        };
        match spawns.iter_mut().find(|(pos, _)| *pos == group.center) {
            Some(existing) => existing.1 = kind,
            None => spawns.push((group.center, kind)),
        }
    }

    spawns
}
