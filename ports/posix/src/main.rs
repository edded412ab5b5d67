//! Host simulator for the ESP32 blinky demo
//!
//! Runs either variant against a simulated DevKitC board. The switch is
//! flipped by a simulated finger; console output goes to stdout, diagnostics
//! to stderr through `env_logger` (`RUST_LOG=debug` for lifecycle traces).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use blinky::{blink_context_while, spawn_switch_context, BoardConfig, Cycles, StdoutConsole};
use blinky_posix::{BoardLine, SimBoard, StdDelay, SwitchPresser, ThreadSpawner};
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Blink loop only
    Blink,
    /// Blink loop plus the switch-mirror context
    Switch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Line {
    Led0,
    Led1,
    Sw0,
}

impl From<Line> for BoardLine {
    fn from(line: Line) -> Self {
        match line {
            Line::Led0 => BoardLine::Led0,
            Line::Led1 => BoardLine::Led1,
            Line::Sw0 => BoardLine::Sw0,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulated ESP32 blinky demo")]
struct Opts {
    #[arg(long, value_enum, default_value_t = Variant::Switch)]
    variant: Variant,

    /// Stop the blink loop after this many toggles
    #[arg(long, value_name = "N")]
    cycles: Option<u32>,

    /// Flip the simulated switch this often
    #[arg(long = "press-every-ms", default_value_t = 2500, value_name = "MS")]
    press_every_ms: u64,

    /// Make this line's controller fail its readiness check
    #[arg(long, value_enum, value_name = "LINE")]
    unready: Option<Line>,
}

static BOARD: BoardConfig = BoardConfig::DEVKITC;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts = Opts::parse();

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("failed to install Ctrl-C handler")?;

    let sim = SimBoard::new(&BOARD);
    if let Some(line) = opts.unready {
        sim.probe(line.into()).set_ready(false);
    }

    let _presser = if opts.variant == Variant::Switch {
        let presser = SwitchPresser::start(
            sim.probe(BoardLine::Sw0),
            Duration::from_millis(opts.press_every_ms),
        )
        .context("failed to start simulated switch")?;
        spawn_switch_context(
            &mut ThreadSpawner::new(),
            &BOARD,
            sim.led1,
            sim.sw0,
            StdoutConsole,
            StdDelay,
            Cycles::Forever,
        )
        .context("failed to start switch context")?;
        Some(presser)
    } else {
        None
    };

    let cycles = opts.cycles.map_or(Cycles::Forever, Cycles::Limit);
    // Entry context: the blink loop, also stopped by Ctrl-C between toggles.
    let state = blink_context_while(
        &BOARD,
        sim.led0,
        &mut StdoutConsole,
        &mut StdDelay,
        cycles,
        || !stop.load(Ordering::Relaxed),
    );
    log::info!("entry context ended in {:?}", state);

    // On the target the worker outlives a failed entry context.
    if state.is_terminated() && opts.variant == Variant::Switch {
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(100));
        }
    }
    Ok(())
}
