use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use schafkopf_rs::agents::AiAgent;
use schafkopf_rs::controller::Controller;
use schafkopf_rs::seat::PlayerPosition;
use schafkopf_rs::settings::GameSettings;
use schafkopf_rs::table::Table;
use schafkopf_rs::telemetry;
use schafkopf_rs::tui::{app::AppState, controller};
use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const LOG_FILE: &str = "schafkopf.log";

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "schafkopf")]
#[command(about = "Schafkopf at the terminal, or bot-only autoplay")]
struct Args {
    /// Play this many bot-only games instead of starting the TUI
    #[arg(long)]
    autoplay: Option<usize>,

    /// Directory for one JSON replay per finished game (autoplay only)
    #[arg(long, requires = "autoplay")]
    replays: Option<PathBuf>,
}

/// Four bots on their own tasks until `games` games have been played.
fn autoplay(settings: &GameSettings, games: usize, replays: Option<PathBuf>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async {
        let seed = settings.table_seed();
        let controller = Arc::new(Controller::new(settings.rules.clone(), seed));
        let mut table = Table::new(Arc::clone(&controller));
        for pos in PlayerPosition::ALL {
            let handle = controller.subscribe_player(Some(pos)).map_err(io::Error::other)?;
            let profile = settings.bot_profile(pos).with_delay_ms(0, 0);
            table.seat_agent(handle, Box::new(AiAgent::standard(profile)));
        }
        info!(seed, games, "autoplay started");
        while controller.games_played() < games {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let reports = table.shutdown().await;

        let wins = controller.wins();
        println!("table seed {seed}, {games} games");
        for report in &reports {
            println!(
                "{:>6}: {} wins, {} actions, {} rejected",
                report.position.label(),
                wins[report.position.index()],
                report.submitted,
                report.rejected
            );
        }
        if let Some(dir) = replays {
            std::fs::create_dir_all(&dir)?;
            for log in controller.completed_games() {
                let path = dir.join(format!("game-{:04}.json", log.game_no));
                log.save(&path).map_err(io::Error::other)?;
            }
            println!("replays written to {}", dir.display());
        }
        Ok::<(), io::Error>(())
    })
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let settings = GameSettings::from_env().map_err(io::Error::other)?;
    if let Err(err) = telemetry::init_tracing(LOG_FILE) {
        eprintln!("logging disabled: {err}");
    }

    if let Some(games) = args.autoplay {
        return autoplay(&settings, games, args.replays);
    }

    if !io::stdout().is_terminal() {
        println!(
            "schafkopf TUI requires a real terminal (TTY).\nRun in a terminal and press q to quit, or use --autoplay N. Version: {}",
            schafkopf_rs::VERSION
        );
        return Ok(());
    }
    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(200);
    let mut app = AppState::new(settings);

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res
}
