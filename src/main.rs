//! Blastfall headless runner
//!
//! Plays the built-in levels (or level files given on the command line) with
//! a scripted input pattern and logs what happened. Useful for smoke-testing
//! level files and tuning without a graphics host.
//!
//! Usage: `blastfall [--tuning tuning.json] [--frames N] [level.txt ...]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::BTreeMap;
    use std::error::Error;
    use std::time::Duration;

    use blastfall::Tuning;
    use blastfall::assets::HandleTable;
    use blastfall::audio::SilentAudio;
    use blastfall::input::{Button, InputSnapshot};
    use blastfall::renderer::DrawLog;
    use blastfall::session::Session;
    use blastfall::sim::LevelEvent;

    const BUILTIN_LEVELS: [&str; 3] = [
        include_str!("../levels/0.txt"),
        include_str!("../levels/1.txt"),
        include_str!("../levels/2.txt"),
    ];

    /// 60 Hz
    const FRAME: Duration = Duration::from_nanos(16_666_667);
    const DEFAULT_FRAMES: u64 = 60 * 150;

    struct Options {
        tuning: Option<String>,
        frames: u64,
        levels: Vec<String>,
    }

    fn parse_args() -> Result<Options, Box<dyn Error>> {
        let mut options = Options {
            tuning: None,
            frames: DEFAULT_FRAMES,
            levels: Vec::new(),
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tuning" => options.tuning = Some(args.next().ok_or("--tuning needs a path")?),
                "--frames" => options.frames = args.next().ok_or("--frames needs a count")?.parse()?,
                _ => options.levels.push(arg),
            }
        }
        Ok(options)
    }

    /// Run right, hop every second, hold fire, and press continue every half
    /// second so deaths and time-outs move on
    fn scripted_input(frame: u64) -> InputSnapshot {
        let mut input = InputSnapshot::default().with(Button::Right).with(Button::Fire);
        if frame % 60 < 12 {
            input = input.with(Button::Jump);
        }
        if frame % 30 == 0 {
            input = input.with(Button::Continue);
        }
        input
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let options = parse_args()?;

        let tuning = match &options.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };
        let sources = if options.levels.is_empty() {
            BUILTIN_LEVELS.iter().map(|s| s.to_string()).collect()
        } else {
            options
                .levels
                .iter()
                .map(std::fs::read_to_string)
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut assets = HandleTable::new();
        let mut audio = SilentAudio;
        let mut draws = DrawLog::new();
        let mut session = Session::new(sources, tuning, &mut assets)?;

        let mut counts: BTreeMap<&'static str, u64> = BTreeMap::new();
        let mut best_score = 0;
        for frame in 0..options.frames {
            let input = scripted_input(frame);
            for event in session.update(FRAME, &input, &mut audio, &mut assets)? {
                let name = match event {
                    LevelEvent::OrbCollected { .. } => "orbs collected",
                    LevelEvent::EnemyKilled { .. } => "enemies killed",
                    LevelEvent::PlayerKilled { .. } => "deaths",
                    LevelEvent::BlastFired { .. } => "blasts fired",
                    LevelEvent::ExitReached => "exits reached",
                    LevelEvent::TimeExpired => "time-outs",
                };
                *counts.entry(name).or_default() += 1;
            }
            best_score = best_score.max(session.level().score());

            draws.clear();
            session.draw(&mut draws);
        }

        log::info!(
            "Ran {} frames, ended on level {} of {}",
            options.frames,
            session.level_index() + 1,
            session.level_count()
        );
        for (name, count) in &counts {
            println!("{name}: {count}");
        }
        println!("best score: {best_score}");
        println!("draw calls last frame: {}", draws.commands.len());
        println!("assets referenced: {}", assets.len());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Blastfall (headless) starting...");
    if let Err(e) = headless::run() {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on wasm; hosts embed the library directly
}
