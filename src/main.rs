//! Peg Drop entry point
//!
//! Native builds run the board headless: drop a batch of balls, tick until
//! every ball has landed, and print landing statistics as JSON.
//! The browser build is driven through `peg_drop::platform::PegDrop`.
//!
//! Usage: `peg-drop [drops] [seed] [preset | settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::num::ParseIntError;

    use serde::Serialize;
    use thiserror::Error;

    use peg_drop::platform::Session;
    use peg_drop::sim::run_until_settled;
    use peg_drop::{BoardPreset, LandingStats, Settings, SettingsError};

    const DEFAULT_DROPS: u32 = 100;
    const DEFAULT_SEED: u64 = 42;
    /// Cap on ticks after the last drop
    const SETTLE_TICKS: u64 = 100_000;

    #[derive(Debug, Error)]
    pub enum RunError {
        #[error("bad {name} {value:?}: {source}")]
        BadArgument {
            name: &'static str,
            value: String,
            #[source]
            source: ParseIntError,
        },
        #[error("{path}: {source}")]
        Io {
            path: String,
            #[source]
            source: std::io::Error,
        },
        #[error("{path}: {source}")]
        Settings {
            path: String,
            #[source]
            source: SettingsError,
        },
        #[error("failed to encode report: {0}")]
        Report(#[from] serde_json::Error),
    }

    /// Parsed command line
    #[derive(Debug)]
    pub struct RunArgs {
        pub drops: u32,
        pub seed: u64,
        pub settings: Settings,
    }

    #[derive(Debug, Serialize)]
    struct SlotReport {
        slot: usize,
        multiplier: f32,
        landed: u64,
        percent: f32,
    }

    #[derive(Debug, Serialize)]
    struct RunReport {
        seed: u64,
        admitted: u32,
        refused: u32,
        ticks: u64,
        in_flight: u64,
        starting_score: u64,
        final_score: u64,
        mean_payout: f32,
        most_common_slot: Option<usize>,
        slots: Vec<SlotReport>,
    }

    fn parse_number<T>(name: &'static str, value: &str) -> Result<T, RunError>
    where
        T: std::str::FromStr<Err = ParseIntError>,
    {
        value.parse().map_err(|source| RunError::BadArgument {
            name,
            value: value.to_string(),
            source,
        })
    }

    fn load_settings(arg: Option<&str>) -> Result<Settings, RunError> {
        let Some(arg) = arg else {
            return Ok(Settings::default());
        };
        if let Some(preset) = BoardPreset::from_str(arg) {
            return Ok(Settings::from_preset(preset));
        }
        let json = std::fs::read_to_string(arg).map_err(|source| RunError::Io {
            path: arg.to_string(),
            source,
        })?;
        Settings::from_json(&json).map_err(|source| RunError::Settings {
            path: arg.to_string(),
            source,
        })
    }

    pub fn parse_args(args: &[String]) -> Result<RunArgs, RunError> {
        let drops = match args.first() {
            Some(s) => parse_number("drop count", s)?,
            None => DEFAULT_DROPS,
        };
        let seed = match args.get(1) {
            Some(s) => parse_number("seed", s)?,
            None => DEFAULT_SEED,
        };
        let settings = load_settings(args.get(2).map(String::as_str))?;
        Ok(RunArgs { drops, seed, settings })
    }

    fn slot_reports(session: &Session, stats: &LandingStats) -> Vec<SlotReport> {
        session
            .state
            .slots()
            .iter()
            .enumerate()
            .map(|(i, slot)| SlotReport {
                slot: i,
                multiplier: slot.multiplier,
                landed: stats.count(i),
                percent: stats.percentage(i),
            })
            .collect()
    }

    fn simulate(args: RunArgs) -> RunReport {
        let RunArgs { drops, seed, settings } = args;
        let starting_score = settings.starting_score;

        log::info!("Dropping {} balls with seed {}", drops, seed);
        let mut session = Session::new(settings, seed);
        let mut admitted = 0;
        let mut refused = 0;
        let mut ticks = 0;

        // One drop per frame, like a player clicking
        for _ in 0..drops {
            if !session.request_drop() {
                refused += 1;
            }
            let report = session.frame();
            admitted += report.admitted;
            refused += report.refused;
            ticks += 1;
        }
        ticks += run_until_settled(&mut session.state, SETTLE_TICKS);

        let stats = session.state.stats().clone();
        RunReport {
            seed,
            admitted,
            refused,
            ticks,
            in_flight: stats.in_flight(),
            starting_score,
            final_score: session.score(),
            mean_payout: stats.mean_payout(),
            most_common_slot: stats.most_common_slot(),
            slots: slot_reports(&session, &stats),
        }
    }

    pub fn run() -> Result<(), RunError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let report = simulate(parse_args(&args)?);
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Peg Drop (headless) starting...");

    if let Err(err) = headless::run() {
        log::error!("{}", err);
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm_main, this is just to satisfy the compiler
}
