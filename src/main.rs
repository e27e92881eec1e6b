mod app;
mod config;
mod error;
mod event;
mod game;
mod logging;
mod scores;
mod ui;

use std::io;

use anyhow::Context;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info, warn};

use app::App;
use config::Config;
use event::{Event, EventHandler};
use game::assets::Sprites;
use game::{GameSettings, Shooter};
use scores::HighScores;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> anyhow::Result<()> {
    let config_path = Config::default_path();
    let (config, config_error) = match Config::load_from(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let log_path = logging::default_path();
    // The terminal is still ours until the UI starts
    if !logging::init(&log_path, &config.log_level) {
        eprintln!("starstrike: cannot write {}, logging is off", log_path.display());
    }
    if let Some(e) = config_error {
        warn!(error = %e, "using default settings");
    }
    info!(?config, "starting");

    let sprites = Sprites::load().context("built-in sprite data is invalid")?;
    let game = Shooter::new(sprites, GameSettings::from(&config));
    let mut app = App::new(game, HighScores::load());

    let mut terminal = setup_terminal().context("failed to set up the terminal")?;
    let result = run(&mut terminal, &mut app, config.tick_rate_ms);
    // Restore the terminal even when the loop failed
    if let Err(e) = restore_terminal(&mut terminal) {
        error!(error = %e, "failed to restore the terminal");
    }
    result.context("terminal I/O failed")?;

    info!("bye");
    Ok(())
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn run(terminal: &mut Tui, app: &mut App, tick_rate_ms: u64) -> io::Result<()> {
    let event_handler = EventHandler::new(tick_rate_ms);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
