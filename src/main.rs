mod app;
mod braille;
mod cli;
mod commands;
mod map;
mod ui;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use app::{App, Scenario};
use blast_zones::{Catalog, GuidanceTable};
use clap::Parser;
use cli::{Cli, Commands, ScenarioArgs};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui {
        scenario: ScenarioArgs {
            bomb: None,
            detonation: cli::DEFAULT_DETONATION.parse()?,
            observer: cli::DEFAULT_OBSERVER.parse()?,
        },
    });
    let interactive = matches!(command, Commands::Tui { .. });
    init_tracing(cli.log_file.as_deref(), interactive)?;

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::reference(),
    };
    let guidance = GuidanceTable::reference();
    // A catalog with ring names the guidance table lacks is a data error
    if let Err(err) = guidance.verify_covers(&catalog) {
        tracing::warn!(%err, "catalog has zones without guidance");
    }

    let output = match command {
        Commands::Tui { scenario } => return run_tui(catalog, guidance, scenario),
        Commands::List => commands::list(&catalog),
        Commands::Info { bomb } => commands::info(&catalog, &guidance, &bomb)?,
        Commands::Classify { scenario, json } => commands::classify_report(&catalog, &guidance, &scenario, json)?,
        Commands::Batch { file, bomb, detonation } => commands::batch(&catalog, &file, bomb.as_deref(), detonation)?,
        Commands::Export { scenario, segments } => commands::export(&catalog, &scenario, segments)?,
        Commands::Respond { file } => commands::respond(&catalog, &guidance, file.as_deref())?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

/// Log to `log_file` when given. Otherwise the TUI stays silent (it owns the
/// terminal) and other commands log to stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn run_tui(catalog: Catalog, guidance: GuidanceTable, args: ScenarioArgs) -> Result<()> {
    let scenario = Scenario {
        bomb: args.bomb,
        detonation: args.detonation,
        observer: args.observer,
    };

    // Build state before touching the terminal so bad input reports cleanly
    let (width, height) = crossterm::terminal::size().context("querying terminal size")?;
    let mut app = App::new(catalog, guidance, scenario, width as usize, height as usize)?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &mut app);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Mouse: wheel zooms at the cursor, left-drag pans, right-click moves ground zero
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for the cursor marker and d/o placement
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel zooms towards the mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll pans (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        // Right click moves ground zero
        MouseEventKind::Down(MouseButton::Right) => {
            app.place_detonation_at(mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -8),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 8),

                    // Zoom
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    // Cycle through the catalog
                    KeyCode::Tab | KeyCode::Char('n') => app.next_bomb(),
                    KeyCode::BackTab | KeyCode::Char('p') => app.prev_bomb(),

                    // Place ground zero / observer under the mouse cursor
                    KeyCode::Char('d') => app.place_detonation_at_cursor(),
                    KeyCode::Char('o') => app.place_observer_at_cursor(),
                    // Reset view
                    KeyCode::Char('f') | KeyCode::Char('0') => app.fit_view(),
                    KeyCode::Char('g') => app.toggle_guidance(),
                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
