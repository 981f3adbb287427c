use std::io::Write;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::engine::{GameSession, SessionStatus};
use crate::types::{Pos, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayConfig {
    pub seed: u32,
    pub level: u32,
    /// Stop after this many actions even if the session is still playing
    pub max_moves: Option<u32>,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            level: 1,
            max_moves: None,
        }
    }
}

/// One JSON line per played action
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub swap: [Pos; 2],
    pub resolution: Resolution,
    pub score: u32,
    pub moves_left: u32,
    pub status: &'static str,
}

/// Final JSON line
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub level: u32,
    pub seed: u32,
    pub turns: u32,
    pub score: u32,
    pub target_score: u32,
    pub status: &'static str,
}

pub fn parse_autoplay_args(args: &[String]) -> Result<AutoplayConfig> {
    let mut config = AutoplayConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--seed" | "--level" | "--moves" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("autoplay: missing value for {}", flag))?;
                let n = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("autoplay: invalid {} value: {}", flag, v))?;
                match flag {
                    "--seed" => config.seed = n,
                    "--level" => config.level = n.max(1),
                    _ => config.max_moves = Some(n),
                }
            }
            other => {
                return Err(anyhow!("autoplay: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(config)
}

/// Play hint moves until the session ends, writing a JSON line per turn
pub fn run_autoplay<W: Write>(config: &AutoplayConfig, out: &mut W) -> Result<Summary> {
    let mut session = GameSession::for_level(config.level, config.seed)
        .with_context(|| format!("autoplay: level {} seed {}", config.level, config.seed))?;

    let mut turns = 0u32;
    while session.status() == SessionStatus::Playing {
        if config.max_moves.is_some_and(|max| turns >= max) {
            break;
        }
        let Some((a, b)) = session.hint() else {
            break;
        };

        let resolution = session
            .swap(a, b)
            .with_context(|| format!("autoplay: turn {} swap {:?} <-> {:?}", turns + 1, a, b))?;
        turns += 1;

        let record = TurnRecord {
            turn: turns,
            swap: [a, b],
            resolution,
            score: session.score(),
            moves_left: session.moves_left(),
            status: session.status().as_str(),
        };
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
    }

    let summary = Summary {
        level: session.level(),
        seed: config.seed,
        turns,
        score: session.score(),
        target_score: session.config().target_score,
        status: session.status().as_str(),
    };
    serde_json::to_writer(&mut *out, &summary)?;
    out.write_all(b"\n")?;
    out.flush()?;

    log::info!(
        "[Autoplay] Level {} finished after {} turns: {} ({} points)",
        summary.level,
        summary.turns,
        summary.status,
        summary.score
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_defaults() {
        assert_eq!(parse_autoplay_args(&[]).unwrap(), AutoplayConfig::default());
    }

    #[test]
    fn parse_all_flags() {
        let config = parse_autoplay_args(&args(&["--seed", "99", "--level", "3", "--moves", "5"]))
            .unwrap();
        assert_eq!(
            config,
            AutoplayConfig {
                seed: 99,
                level: 3,
                max_moves: Some(5)
            }
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_autoplay_args(&args(&["--seed"])).is_err());
        assert!(parse_autoplay_args(&args(&["--level", "x"])).is_err());
        assert!(parse_autoplay_args(&args(&["--fast"])).is_err());
    }

    #[test]
    fn run_writes_one_line_per_turn_plus_summary() {
        let config = AutoplayConfig {
            seed: 7,
            level: 1,
            max_moves: Some(3),
        };
        let mut buf = Vec::new();
        let summary = run_autoplay(&config, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(summary.turns, 3);
        assert_eq!(lines.len(), 4);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["turn"], 1);
        assert_eq!(first["resolution"]["events"][0]["event"], "tiles_removed");

        let last: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
        assert_eq!(last["turns"], 3);
        assert_eq!(last["score"], summary.score);
    }
}
