use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use brickmotion::camera::Camera;
use brickmotion::config::{Config, ControlType, InputType};
use brickmotion::engine::input::{Axis, Button, InputEvent, InputState};
use brickmotion::events::GameEvent;
use brickmotion::scene::test_scene::load_test_scene;
use clap::Parser;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "brickmotion", about = "Headless locomotion demo on a brick course")]
struct Args {
    /// Control scheme for the player; overrides the config file
    #[arg(long, value_enum)]
    control: Option<ControlType>,

    /// Input mapping for the player; overrides the config file
    #[arg(long, value_enum)]
    input: Option<InputType>,

    /// JSON tuning file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed steps to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Write one JSON line per agent per step to stdout
    #[arg(long)]
    trace: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Input the demo feeds in on a given step: drive, jump, turn, climb, stop.
fn scripted_events(step: u64) -> Vec<InputEvent> {
    match step {
        0 => vec![InputEvent::Axis(Axis::Vertical, 1.0)],
        60 => vec![InputEvent::ButtonDown(Button::Jump)],
        61 => vec![InputEvent::ButtonUp(Button::Jump)],
        120 => vec![InputEvent::Axis(Axis::Horizontal, 1.0)],
        200 => vec![
            InputEvent::Axis(Axis::Horizontal, 0.0),
            InputEvent::ButtonDown(Button::Fire1),
        ],
        260 => vec![InputEvent::ButtonUp(Button::Fire1)],
        300 => vec![InputEvent::Axis(Axis::Vertical, 0.0)],
        _ => Vec::new(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(control) = args.control {
        config.control.control_type = control;
    }
    if let Some(input) = args.input {
        config.control.input_type = input;
    }
    config.validate().context("invalid settings")?;

    let mut course =
        load_test_scene(&config, config.control.clone()).context("failed to build the course")?;
    info!(
        control = ?config.control.control_type,
        input = ?config.control.input_type,
        ticks = args.ticks,
        "starting"
    );

    let mut input = InputState::new();
    let mut camera = Camera::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for step in 0..args.ticks {
        input.apply(&scripted_events(step));
        course.sim.advance(config.fixed_dt, &mut input, &camera);

        if let Some(player) = course.sim.player_position() {
            camera.follow(player, 10.0, 6.0);
        }

        if args.trace {
            for snapshot in course.sim.snapshot() {
                let line = serde_json::to_string(&snapshot).context("failed to encode trace")?;
                writeln!(out, "{line}").context("failed to write trace")?;
            }
        }

        let events = course.sim.drain_events();
        for event in &events {
            if args.trace {
                let line = serde_json::to_string(event).context("failed to encode event")?;
                writeln!(out, "{line}").context("failed to write trace")?;
            }
        }
        if let Some(GameEvent::GameOver { win }) = events.first() {
            info!(step, win, "game over");
            return Ok(());
        }
    }

    if let Some(agent) = course.sim.agent(course.player) {
        info!(position = ?agent.body.pose.position, "finished");
    }
    Ok(())
}
