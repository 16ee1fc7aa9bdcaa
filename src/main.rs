//! Sucheng Quest entry point
//!
//! The browser build is driven from JavaScript through `sucheng_quest::web`.
//! The native binary runs a headless autopilot game on the session driver
//! and records the result on the local leaderboard.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::{Parser, ValueEnum};
    use sucheng_quest::driver::SessionDriver;
    use sucheng_quest::persistence::FileStore;
    use sucheng_quest::{GameMode, HighScores, QualityPreset, Session, SessionSnapshot, Settings};

    /// Ticks between autopilot key presses
    const KEY_EVERY_TICKS: u32 = 12;
    /// Every Nth press is deliberately wrong
    const MISTAKE_EVERY: u32 = 9;
    /// Give up after this many snapshots
    const MAX_TICKS: u32 = 20_000;

    /// Which table the targets come from
    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub(crate) enum Mode {
        /// Single-letter roots
        Roots,
        /// Words with one- or two-letter codes
        Words,
    }

    impl From<Mode> for GameMode {
        fn from(mode: Mode) -> Self {
            match mode {
                Mode::Roots => GameMode::RootDrill,
                Mode::Words => GameMode::WordChallenge,
            }
        }
    }

    fn parse_quality(s: &str) -> Result<QualityPreset, String> {
        QualityPreset::from_str(s).ok_or_else(|| format!("expected low, medium or high, got {s:?}"))
    }

    /// Headless autopilot run of Sucheng Quest
    #[derive(Debug, Parser)]
    #[command(version, about)]
    pub(crate) struct Args {
        /// Game mode
        #[arg(value_enum, default_value_t = Mode::Roots)]
        pub(crate) mode: Mode,
        /// Run seed
        #[arg(long, default_value_t = 0x5eed)]
        pub(crate) seed: u64,
        /// Leaderboard name (defaults to the last one used)
        #[arg(long)]
        pub(crate) name: Option<String>,
        /// Where the leaderboard and settings are kept
        #[arg(long)]
        pub(crate) data_dir: Option<PathBuf>,
        /// Effects quality for this and later runs (low, medium, high)
        #[arg(long, value_parser = parse_quality)]
        pub(crate) quality: Option<QualityPreset>,
    }

    /// Pick the next letter to press: the locked target first, else the
    /// lowest one on screen.
    fn choose_key(snap: &SessionSnapshot, presses: u32) -> Option<char> {
        let target = snap
            .locked
            .and_then(|id| snap.target(id))
            .or_else(|| snap.targets.iter().max_by(|a, b| a.y.total_cmp(&b.y)))?;
        let typed = usize::from(target.total_segments - target.remaining_segments);
        let next = target.code.chars().nth(typed)?;
        if presses % MISTAKE_EVERY == MISTAKE_EVERY - 1 {
            // Any other letter
            let wrong = if next == 'Z' { 'A' } else { (next as u8 + 1) as char };
            return Some(wrong);
        }
        Some(next)
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::init();
        let args = Args::parse();
        let mode = GameMode::from(args.mode);

        let dir = args
            .data_dir
            .or_else(FileStore::default_dir)
            .ok_or("no per-user data directory, pass --data-dir")?;
        let mut store = FileStore::new(dir);
        let mut settings = Settings::load(&store);
        if let Some(quality) = args.quality {
            settings.quality = quality;
            settings.save(&mut store)?;
        }
        let name = args
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| settings.player_name.clone());
        log::info!(
            "Sucheng Quest (native) starting: mode={}, seed={}, quality={}",
            mode.as_str(),
            args.seed,
            settings.quality.as_str()
        );

        let mut driver = SessionDriver::spawn(Session::with_settings(args.seed, settings), mode)?;
        let mut ticks = 0u32;
        let mut presses = 0u32;
        let mut last = None;
        let wait = Duration::from_secs(1);

        while let Ok(snap) = driver.snapshots().recv_timeout(wait) {
            ticks += 1;
            if ticks % KEY_EVERY_TICKS == 0 {
                if let Some(key) = choose_key(&snap, presses) {
                    presses += 1;
                    driver.send_key(key);
                }
            }
            if ticks % 100 == 0 {
                log::info!(
                    "score={} lives={} level={} targets={}",
                    snap.score,
                    snap.lives,
                    snap.level,
                    snap.targets.len()
                );
            }
            last = Some(snap);
            if ticks >= MAX_TICKS {
                log::info!("Tick limit reached, leaving the run");
                driver.exit();
            }
        }

        let session = driver.stop().ok_or("session worker panicked")?;
        let Some(score) = session.final_score() else {
            let score = last.map_or(0, |s| s.score);
            println!("Run abandoned at {score} points");
            return Ok(());
        };

        println!("Game over: {score} points after {presses} key presses");
        if name.trim().is_empty() {
            println!("No --name given, score not recorded");
        } else {
            match HighScores::submit(&mut store, &name, score, chrono::Utc::now())? {
                Some(rank) => println!("New leaderboard entry at #{rank}"),
                None => println!("Did not place on the leaderboard"),
            }
            let mut settings = session.settings().clone();
            settings.player_name = name;
            settings.save(&mut store)?;
        }

        for (i, entry) in HighScores::load(&store).entries.iter().take(10).enumerate() {
            println!(
                "{:>2}. {:<8} {:>7}  {}",
                i + 1,
                entry.name,
                entry.score,
                entry.date.format("%Y-%m-%d")
            );
        }
        Ok(())
    }
}


#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry points live in sucheng_quest::web
}
