use anyhow::{Context, Result};
use chess_session::render::move_log_lines;
use chess_session::{layout, Controller, InputEvent, Mode, RecordingSurface, RunOptions, ScriptedInput, SessionConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-session")]
#[command(about = "Runs a chess session headless and prints the result")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value_os_t = SessionConfig::config_path())]
    config: PathBuf,
    /// Mode picked from the menu
    #[arg(short, long, value_enum, default_value_t = Mode::BotVsBot)]
    mode: Mode,
    /// Stop after this many ticks
    #[arg(long, default_value = "3000")]
    max_ticks: u64,
    /// Seed for the random fallback
    #[arg(long)]
    seed: Option<u64>,
    /// Tick as fast as possible instead of at the configured rates
    #[arg(long)]
    no_pacing: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if cli.seed.is_some() {
        config.ai.seed = cli.seed;
    }
    info!(mode = %cli.mode, config = %cli.config.display(), "starting");

    let mut controller = Controller::from_config(config);
    let mut input = ScriptedInput::new();
    let (x, y) = layout::menu_region(cli.mode).center();
    input.push_batch(vec![InputEvent::PointerPress { x, y }]);
    let mut surface = RecordingSurface::new();

    let summary = controller.run(
        &mut input,
        &mut surface,
        RunOptions {
            max_ticks: Some(cli.max_ticks),
            stop_when_over: true,
            paced: !cli.no_pacing,
        },
    )?;

    println!("Stopped after {} ticks ({:?})", summary.ticks, summary.reason);
    if let Some(session) = controller.session() {
        println!("{}", session.position());
        for line in move_log_lines(session.game().move_log()) {
            println!("{}", line.trim_end());
        }
        match session.outcome_text() {
            Some(text) => println!("{text}"),
            None => println!("Game in progress"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["chess-session"]).unwrap();
        assert_eq!(cli.config, SessionConfig::config_path());
        assert_eq!(cli.mode, Mode::BotVsBot);
        assert_eq!(cli.max_ticks, 3000);
        assert_eq!(cli.seed, None);
        assert!(!cli.no_pacing);
    }

    #[test]
    fn test_cli_parses_mode_and_seed() {
        let cli = Cli::try_parse_from([
            "chess-session",
            "--mode",
            "multiplayer",
            "--seed",
            "42",
            "--no-pacing",
            "-c",
            "other.toml",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Multiplayer);
        assert_eq!(cli.seed, Some(42));
        assert!(cli.no_pacing);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }
}
