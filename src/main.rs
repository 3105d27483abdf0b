//! Stocklens - a terminal stock lookup client.

mod api;
mod app;
mod cli;
mod config;
mod debounce;
mod error;
mod models;
mod tables;
mod truncate;
mod ui;

use anyhow::{Context, Result};
use api::{StockApiClient, StockSource};
use app::{App, SearchOutcome};
use cli::Args;
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use models::Tab;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing_subscriber::EnvFilter;
use ui::UiColors;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    let config = if let Some(ref path) = args.config {
        Config::load(path)?
    } else {
        Config::load_or_default()
    };

    init_logging(&args)?;

    if args.batch {
        let mut app = App::new(&args, &config, args.width)?;
        let ok = run_batch(&mut app).await;
        if !ok {
            std::process::exit(1);
        }
        Ok(())
    } else {
        let cols = crossterm::terminal::size().map(|(cols, _)| cols).unwrap_or(80);
        let mut app = App::new(&args, &config, ui::table_width(cols))?;
        let colors = UiColors::from_config(&config.colors);
        run_interactive(&mut app, &colors).await
    }
}

/// Install the tracing subscriber.
///
/// Batch mode logs to stderr. The interactive UI owns the terminal, so it
/// only logs when a log file is given.
fn init_logging(args: &Args) -> Result<()> {
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    } else if args.batch {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .try_init();
    }

    Ok(())
}

/// Run in batch mode: one search, print, done. Returns `false` when the
/// search ended with an error or never started.
async fn run_batch<S: StockSource>(app: &mut App<S>) -> bool {
    app.search().await;
    ui::render_batch(app);
    app.search.error_message.is_none() && !app.validity.reported
}

/// Run in interactive mode with TUI.
async fn run_interactive(app: &mut App, colors: &UiColors) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app, colors).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    colors: &UiColors,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let (tx, mut rx): (UnboundedSender<SearchOutcome>, UnboundedReceiver<SearchOutcome>) =
        mpsc::unbounded_channel();

    loop {
        terminal.draw(|f| ui::render(f, app, colors))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, key, &tx);
                }
                Event::Resize(cols, _) => app.on_resize(ui::table_width(cols), Instant::now()),
                _ => {}
            }
        }

        // Outcomes apply in arrival order; a slow earlier request can
        // overwrite a faster later one.
        while let Ok(outcome) = rx.try_recv() {
            app.complete_search(outcome);
        }

        app.tick(Instant::now());

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Start a search on a background task.
fn spawn_search(app: &mut App, tx: &UnboundedSender<SearchOutcome>) {
    let Some(symbol) = app.begin_search() else {
        return;
    };
    let client: StockApiClient = app.source().clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch_stock(&symbol).await;
        let _ = tx.send(SearchOutcome { symbol, result });
    });
}

/// Handle keyboard input.
fn handle_key_event(app: &mut App, key: KeyEvent, tx: &UnboundedSender<SearchOutcome>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Quit
        KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if ctrl => app.quit(),

        // Search / clear
        KeyCode::Enter => spawn_search(app, tx),
        KeyCode::Char('l') if ctrl => app.clear(),

        // Tabs
        KeyCode::Tab | KeyCode::Right => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left => app.previous_tab(),
        KeyCode::F(1) if app.ui.results_visible => app.select_tab(Tab::Company),
        KeyCode::F(2) if app.ui.results_visible => app.select_tab(Tab::Summary),

        // Input editing
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) if !ctrl => app.push_char(c),

        _ => {}
    }
}
