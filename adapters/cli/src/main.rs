#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays LS20 from a scripted sequence of key presses.

mod board;
mod config;
mod cues;
mod script;
mod session;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use ls20_core::Event;
use ls20_world::query;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    cues::{cue_for, Cue},
    script::{parse_script, Input},
    session::Session,
};

/// Plays the LS20 grid puzzle from a script of inputs.
#[derive(Debug, Parser)]
#[command(name = "ls20", version)]
struct Args {
    /// TOML file overriding rules, settle delays and levels.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level to start on instead of the first.
    #[arg(long)]
    level: Option<usize>,
    /// Simulated milliseconds that pass per input token.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,
    /// Print the board after every frame that produced events.
    #[arg(long, default_value_t = false)]
    board: bool,
    /// Emit events as JSON lines.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Raise log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Inputs: U/^ D/v L/< R/> move, `.` idles a frame, Q escapes.
    #[arg(default_value = "")]
    script: String,
}

#[derive(Serialize)]
struct EventLine<'a> {
    frame: u32,
    event: &'a Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    cue: Option<Cue>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let inputs = parse_script(&args.script).context("invalid input script")?;
    let config = config::load(args.config.as_deref())?;
    let mut session = Session::new(config, Duration::from_millis(args.frame_ms))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "{}", query::welcome_banner(session.world()))?;

    if let Some(index) = args.level {
        let events = session.start(index)?;
        report(&mut out, &args, 0, &events, &session)?;
    }

    let mut frame = 0_u32;
    for input in inputs {
        frame += 1;
        let events = session.frame(input);
        report(&mut out, &args, frame, &events, &session)?;
        if input == Input::Escape {
            info!(frame, "escape received, stopping");
            break;
        }
    }

    let limit = session.drain_limit();
    let mut drained = 0;
    while session.is_settling() && drained < limit {
        frame += 1;
        drained += 1;
        let events = session.frame(Input::Idle);
        report(&mut out, &args, frame, &events, &session)?;
    }
    if session.is_settling() {
        warn!(frames = drained, "settle timer still pending after draining");
    }

    summary(&mut out, &args, &session)?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn report(
    out: &mut impl Write,
    args: &Args,
    frame: u32,
    events: &[Event],
    session: &Session,
) -> Result<()> {
    for event in events {
        let cue = cue_for(event);
        if args.json {
            let line = EventLine { frame, event, cue };
            serde_json::to_writer(&mut *out, &line).context("failed to encode event")?;
            writeln!(out)?;
        } else {
            match cue {
                Some(cue) => writeln!(
                    out,
                    "[{frame:>4}] {event:?} ({} Hz, {} ms)",
                    cue.frequency_hz, cue.duration_ms
                )?,
                None => writeln!(out, "[{frame:>4}] {event:?}")?,
            }
        }
    }

    if args.board && !events.is_empty() {
        if let Some(level) = query::current_level(session.world()) {
            let snapshot = query::snapshot(session.world());
            write!(out, "{}", board::render(level, &snapshot))?;
        }
    }
    debug!(frame, events = events.len(), "frame reported");
    Ok(())
}

fn summary(out: &mut impl Write, args: &Args, session: &Session) -> Result<()> {
    let world = session.world();
    let snapshot = query::snapshot(world);
    if args.json {
        serde_json::to_writer(&mut *out, &snapshot).context("failed to encode snapshot")?;
        writeln!(out)?;
        return Ok(());
    }

    match query::current_level(world) {
        Some(level) => {
            writeln!(out, "{}", board::status_line(level, &snapshot))?;
            match query::moves_to_nearest_goal(world) {
                Some(distance) => writeln!(out, "nearest goal: {distance} steps away")?,
                None => writeln!(out, "nearest goal: out of reach this life")?,
            }
        }
        None => writeln!(
            out,
            "session complete: {} levels cleared",
            snapshot.level_count
        )?,
    }
    Ok(())
}
