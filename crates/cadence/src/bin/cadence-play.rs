//! cadence-play - drive a demo score in real time
//!
//! Builds a small interactive score (a light fade, a strobe loop, a mapping
//! from light to sound, and a nested pan scenario), ticks it on a tokio
//! interval, and prints every non-empty state as one JSON line.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cadence::{
    Automation, Curve, CurveType, Expr, Loop, Mapping, MemoryDevice, PlaybackEngine, Scenario,
    TickClock, TimeInterval, TimeValue, Transfer, TriggerMode,
};
use cadence_conf::{CadenceConfig, TriggerModeSetting};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadence-play")]
#[command(about = "Play a demo interactive score against an in-memory device")]
#[command(version)]
struct Cli {
    /// Config file replacing ./cadence.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds to run (0 = until the score ends)
    #[arg(short, long)]
    duration: Option<f64>,

    /// Milliseconds between ticks
    #[arg(short, long)]
    tick_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, sources) = CadenceConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(duration) = cli.duration {
        config.engine.run_for_secs = duration;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.engine.tick_interval_ms = tick_ms;
    }

    let filter = EnvFilter::try_new(&config.telemetry.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("cadence-play {} starting", env!("CARGO_PKG_VERSION"));
    info!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    let mode = match config.engine.default_trigger_mode {
        TriggerModeSetting::Observed => TriggerMode::Observed,
        TriggerModeSetting::Manual => TriggerMode::Manual,
    };
    let scenario = demo_score(mode).context("Failed to build demo score")?;
    let mut engine = PlaybackEngine::new(scenario, MemoryDevice::new());

    let tick_interval = Duration::from_millis(config.engine.tick_interval_ms.max(1));
    let run_for = TimeValue::from_secs(config.engine.run_for_secs);
    let mut ticker = tokio::time::interval(tick_interval);
    let mut clock = TickClock::new();

    engine.play();
    clock.start();

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupted");
                break;
            }
        }

        let state = engine.tick(clock.tick());
        if !state.is_empty() {
            println!("{}", serde_json::to_string(&state)?);
        }

        if engine.is_finished() {
            info!(elapsed = %engine.elapsed(), "score finished");
            break;
        }
        if !run_for.is_zero() && engine.elapsed() >= run_for {
            info!(elapsed = %engine.elapsed(), "run time reached");
            break;
        }
    }

    engine.stop();
    info!(ticks = engine.ticks(), "cadence-play shutdown complete");
    Ok(())
}

/// start --fade--> cue --strobe + mapping--> end, with a nested pan scenario
/// running from start to end alongside.
fn demo_score(mode: TriggerMode) -> cadence::Result<Scenario> {
    let mut score = Scenario::new();
    score.set_default_trigger_mode(mode);
    let start = score.start_sync();
    let end = score.end_sync();
    let cue = score.add_sync();

    let fade = TimeInterval::fixed(TimeValue::from_secs(1.0))
        .with_process(Automation::new("/light/dimmer", Curve::linear(0.0, 1.0)))?;
    score.connect(start, cue, fade)?;

    let strobe_pattern = TimeInterval::fixed(TimeValue::from_secs(0.5)).with_process(
        Automation::new(
            "/light/strobe",
            Curve::new(0.0).with_point(1.0, 1.0, CurveType::Hold),
        ),
    )?;
    let body = TimeInterval::new(TimeValue::from_secs(1.0), TimeValue::from_secs(3.0))?
        .with_process(Loop::new(strobe_pattern).with_bound(3))?
        .with_process(Mapping::new(
            "/light/dimmer",
            "/sound/volume",
            Transfer::Curve {
                input_min: 0.0,
                input_max: 1.0,
                curve: Curve::new(0.0).with_point(1.0, 0.8, CurveType::SCurve),
            },
        ))?;
    score.connect(cue, end, body)?;

    if let Some(event) = score.end_event() {
        score.set_guard(event, Expr::above("/sound/volume", 0.5))?;
    }

    let mut pan = Scenario::new();
    let sweep = TimeInterval::fixed(TimeValue::from_secs(2.0))
        .with_process(Automation::new("/sound/pan", Curve::linear(-1.0, 1.0)))?;
    pan.connect(pan.start_sync(), pan.end_sync(), sweep)?;

    let side = TimeInterval::new(TimeValue::ZERO, TimeValue::INFINITE)?.with_process(pan)?;
    score.connect(start, end, side)?;

    Ok(score)
}
