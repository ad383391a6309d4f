/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;

use bumper_bot::config::{PolicyKind, SimulationConfig};
use bumper_bot::explorer::{BumperBot, RandomWalker};
use bumper_bot::grid_world::{simulate, GridWorld, Outcome};
use bumper_bot::render::{AsciiCanvas, Renderer};
use bumper_bot::report::DiscoveryReport;
use bumper_bot::{obstacles, Agent, Direction, HashSet, Location, ObstacleMapper};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Run a bumper bot in a grid world and report how many obstacles it found.
#[derive(Debug, Parser)]
#[command(name = "bumper-bot-run")]
struct Cli {
    /// Text map. '.' and space are free cells, anything else is an obstacle.
    #[arg(value_name = "OBSTACLE_MAP", required_unless_present = "preset")]
    obstacle_map: Option<PathBuf>,

    /// Built-in obstacle set instead of a map file.
    #[arg(long, value_enum, conflicts_with = "obstacle_map")]
    preset: Option<Preset>,

    /// Number of simulation steps to execute.
    #[arg(short, long, default_value_t = 100)]
    num_steps: usize,

    /// Show robot visualization.
    #[arg(short, long)]
    display: bool,

    /// Visualization speed (in hz).
    #[arg(short, long, default_value_t = 33)]
    speed: u32,

    /// Seed for the random escape.
    #[arg(long)]
    seed: Option<u64>,

    /// Exploration policy: bumper or random.
    #[arg(long, default_value_t = PolicyKind::Bumper)]
    policy: PolicyKind,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            num_steps: self.num_steps,
            display: self.display,
            speed_hz: self.speed,
            seed: self.seed,
            policy: self.policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// The four cells around the start.
    Boxed,

    /// A 41 x 41 walled room.
    Room,
}

#[derive(Debug, Serialize)]
struct Summary {
    policy: PolicyKind,
    seed: u64,
    steps: usize,
    coverage: usize,
    moves: usize,
    bumps: usize,
    report: DiscoveryReport,
}

/// Draws an [`AsciiCanvas`] full screen after every step. Press `q` or Esc to stop the run.
///
/// The terminal is put back the way it was when the renderer is dropped.
struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    canvas: AsciiCanvas,
    frame_delay: Duration,
    frames: usize,
}

impl TerminalRenderer {
    fn new(canvas: AsciiCanvas, frame_delay: Duration) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            canvas,
            frame_delay,
            frames: 0,
        })
    }

    fn draw(&mut self) -> io::Result<()> {
        let field = self.canvas.to_string();
        let hud = format!("Step: {} | q: quit", self.frames);
        self.terminal.draw(|f| {
            let chunks =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(f.area());
            let hud = Paragraph::new(Span::styled(
                hud.as_str(),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
            f.render_widget(hud, chunks[0]);
            f.render_widget(Paragraph::new(field.as_str()), chunks[1]);
        })?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// `q`, Esc, or Ctrl-C. Raw mode swallows the interrupt signal, so Ctrl-C arrives as a key.
fn quit_requested(event: &Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

impl Renderer for TerminalRenderer {
    fn draw_background(&mut self, obstacles: &HashSet<Location>) {
        self.canvas.draw_background(obstacles);
    }

    fn draw_move(&mut self, from: Location, to: Location) {
        self.canvas.draw_move(from, to);
    }

    fn draw_bump(&mut self, at: Location) {
        self.canvas.draw_bump(at);
    }

    // Waiting for input doubles as the frame pacing.
    fn poll_events(&mut self) -> ControlFlow<()> {
        self.frames += 1;
        if self.draw().is_err() {
            return ControlFlow::Break(());
        }
        match event::poll(self.frame_delay) {
            Ok(true) => match event::read() {
                Ok(event) if !quit_requested(&event) => ControlFlow::Continue(()),
                _ => ControlFlow::Break(()),
            },
            Ok(false) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = "bumper_bot=info".parse() {
        filter = filter.add_directive(d);
    }
    if let Ok(d) = "bumper_bot_run=info".parse() {
        filter = filter.add_directive(d);
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_obstacles(cli: &Cli) -> Result<HashSet<Location>, Box<dyn std::error::Error>> {
    match (&cli.obstacle_map, cli.preset) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)?;
            Ok(obstacles::parse_obstacle_map(&text)?)
        }
        (None, Some(Preset::Boxed)) => Ok(obstacles::boxed()),
        (None, Some(Preset::Room)) => Ok(obstacles::room(20)),
        (None, None) => Err("either OBSTACLE_MAP or --preset is required".into()),
    }
}

fn run<_Agent>(
    agent: _Agent,
    obstacles: HashSet<Location>,
    config: &SimulationConfig,
) -> io::Result<Outcome<_Agent>>
where
    _Agent: Agent<Action = Direction, Percept = Location> + ObstacleMapper,
{
    let mut world = GridWorld::new(obstacles);
    if config.display {
        let renderer = TerminalRenderer::new(AsciiCanvas::default(), config.frame_delay())?;
        world = world.with_renderer(Box::new(renderer));
    }
    Ok(simulate(agent, world, config.num_steps))
}

fn summarize<_Agent>(outcome: Outcome<_Agent>, policy: PolicyKind, seed: u64) -> Summary {
    let Outcome {
        world,
        steps,
        coverage,
        report,
        ..
    } = outcome;
    let summary = Summary {
        policy,
        seed,
        steps,
        coverage,
        moves: world.moves(),
        bumps: world.bumps(),
        report,
    };
    // Releases the terminal before anything is printed.
    drop(world);
    summary
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();
    let config = cli.config();
    let obstacles = load_obstacles(&cli)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        policy = %config.policy,
        seed,
        steps = config.num_steps,
        obstacles = obstacles.len(),
        "starting"
    );

    let summary = match config.policy {
        PolicyKind::Bumper => {
            let outcome = run(BumperBot::seeded(seed), obstacles, &config)?;
            let escapes = outcome.agent.escapes();
            let summary = summarize(outcome, config.policy, seed);
            info!(escapes, "random escapes");
            summary
        }
        PolicyKind::Random => {
            let outcome = run(RandomWalker::seeded(seed), obstacles, &config)?;
            summarize(outcome, config.policy, seed)
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.report);
        println!(
            "Cells covered: {} in {} steps ({} moves, {} bumps)",
            summary.coverage, summary.steps, summary.moves, summary.bumps
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use crossterm::event::KeyEvent;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["bumper-bot-run", "map.txt"]).expect("valid args");
        assert_eq!(cli.obstacle_map, Some(PathBuf::from("map.txt")));
        assert_eq!(cli.config(), SimulationConfig::default());
        assert!(!cli.json);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "bumper-bot-run",
            "--preset",
            "boxed",
            "-n",
            "20",
            "-d",
            "-s",
            "10",
            "--seed",
            "7",
            "--policy",
            "random",
            "--json",
        ])
        .expect("valid args");
        assert_eq!(cli.preset, Some(Preset::Boxed));
        let config = cli.config();
        assert_eq!(config.num_steps, 20);
        assert!(config.display);
        assert_eq!(config.speed_hz, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.policy, PolicyKind::Random);
        assert!(cli.json);
    }

    #[test]
    fn test_map_or_preset_is_required() {
        assert!(Cli::try_parse_from(["bumper-bot-run"]).is_err());
        assert!(Cli::try_parse_from(["bumper-bot-run", "map.txt", "--preset", "room"]).is_err());
        assert!(Cli::try_parse_from(["bumper-bot-run", "--preset", "box"]).is_err());
    }

    #[test]
    fn test_boxed_preset_run_is_fully_discovered() {
        let cli = Cli::try_parse_from(["bumper-bot-run", "--preset", "boxed", "-n", "20"])
            .expect("valid args");
        let obstacles = load_obstacles(&cli).expect("preset");
        let outcome = run(BumperBot::seeded(1), obstacles, &cli.config()).expect("headless run");
        let summary = summarize(outcome, PolicyKind::Bumper, 1);
        assert_eq!(summary.report.discovered, 4);
        assert_eq!(summary.report.percent, Some(100.0));
        assert_eq!(summary.bumps, 20);
    }

    #[test]
    fn test_missing_obstacle_source_is_an_error() {
        let cli = Cli {
            obstacle_map: None,
            preset: None,
            num_steps: 10,
            display: false,
            speed: 33,
            seed: None,
            policy: PolicyKind::Bumper,
            json: false,
        };
        assert!(load_obstacles(&cli).is_err());
    }

    #[test]
    fn test_quit_keys() {
        let key = |code, modifiers| Event::Key(KeyEvent::new(code, modifiers));
        assert!(quit_requested(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(quit_requested(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(quit_requested(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!quit_requested(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!quit_requested(&key(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(!quit_requested(&Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ))));
        assert!(!quit_requested(&Event::FocusLost));
    }
}
