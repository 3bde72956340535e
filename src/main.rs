//! Lava Run headless runner
//!
//! Parses a level pack and steps every level with an idle player, logging how
//! each one ends. Useful for checking that a pack loads and that its hazards
//! behave; interactive play needs a renderer and input layer on top.
//!
//! Usage: `lava-run [levels.json] [settings.json]`

use std::path::Path;

use lava_run::sim::{LevelParser, Plan, Status, parse_level_pack, standard_symbols, tick};
use lava_run::{Settings, SimError};

fn demo_pack() -> Vec<Plan> {
    let plan = |rows: &[&str]| rows.iter().map(|r| r.to_string()).collect::<Plan>();
    vec![
        plan(&["         ", "         ", "    =    ", "         ", "     o   ", "  @    xx", "xxx!!!xxx"]),
        plan(&["  v      ", "         ", "  @   o  ", "xxxxxxxxx"]),
    ]
}

fn main() -> Result<(), SimError> {
    env_logger::init();
    log::info!("Lava Run (headless) starting...");

    let mut args = std::env::args().skip(1);
    let plans = match args.next() {
        Some(path) => parse_level_pack(&std::fs::read_to_string(path)?)?,
        None => demo_pack(),
    };
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let symbols = standard_symbols();
    let mut parser = match settings.seed {
        Some(seed) => LevelParser::with_seed(&symbols, seed),
        None => LevelParser::new(&symbols),
    };

    for (index, plan) in plans.iter().enumerate() {
        let mut level = parser.parse(plan.as_slice()).with_finish_delay(settings.finish_delay);
        let mut ticks = 0;
        while !level.is_finished() && ticks < settings.max_ticks {
            tick(&mut level, settings.time_step);
            ticks += 1;
        }

        let outcome = match level.status() {
            Status::Won => "won",
            Status::Lost => "lost",
            Status::None => "undecided",
        };
        log::info!(
            "Level {}: {} after {} ticks ({} actors left)",
            index + 1,
            outcome,
            ticks,
            level.entities().len()
        );
    }

    Ok(())
}
