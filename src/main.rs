//! Headless autoplay runner (default binary).
//!
//! Plays the hinted move each turn and prints every resolution as a JSON line.
//!
//! Usage: `tile-cascade [--seed N] [--level N] [--moves N]`

use std::io::{self, BufWriter};

use anyhow::Result;

use tile_cascade::autoplay::{parse_autoplay_args, run_autoplay};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_autoplay_args(&args)?;
    log::debug!("[Autoplay] Starting with {:?}", config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run_autoplay(&config, &mut out)?;
    Ok(())
}
