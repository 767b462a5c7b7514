mod app;
mod assets;
mod domain;
mod input;
mod logging;
mod notifications;
mod persistence;
mod ticker;
mod ui;

use anyhow::{bail, Result};
use app::AppState;
use assets::AssetResolver;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use persistence::{ensure_data_dir, get_data_dir, init_local_data_dir, EncryptedStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "pomodo")]
#[command(about = "A terminal Pomodoro timer with an encrypted task list and backlog", long_about = None)]
struct Cli {
    /// Use this data directory instead of a local .pomodo or ~/.pomodo
    #[arg(long, global = true, env = "POMODO_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .pomodo directory in the current directory
    Init,
    /// Delete all stored tasks, settings and key material
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Resolve an app://bundle URL to a file and MIME type
    Asset {
        /// Bundle root directory
        #[arg(long)]
        root: PathBuf,
        /// File served for ?payload=<hash> requests
        #[arg(long)]
        payload: Option<PathBuf>,
        url: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_data_dir()?;
            println!("Initialized pomodo directory: {}", data_dir.display());
            println!();
            println!("Run 'pomodo' here to use it for tasks and settings.");
            Ok(())
        }
        Some(Commands::Reset { yes }) => reset(cli.data_dir, yes),
        Some(Commands::Asset { root, payload, url }) => {
            let mut resolver = AssetResolver::new(root);
            if let Some(payload) = payload {
                resolver = resolver.with_payload_path(payload);
            }
            let asset = resolver.resolve(&url)?;
            let bytes = asset.read()?;
            println!("{}", asset.path.display());
            println!("{}", asset.mime);
            println!("{} bytes", bytes.len());
            Ok(())
        }
        None => run_tui(cli.data_dir),
    }
}

fn reset(data_dir: Option<PathBuf>, yes: bool) -> Result<()> {
    let data_dir = get_data_dir(data_dir.as_deref())?;
    if !data_dir.exists() {
        println!("Nothing to reset in {}", data_dir.display());
        return Ok(());
    }

    if !yes {
        print!(
            "This permanently deletes all tasks and settings in {}. Continue? [y/N] ",
            data_dir.display()
        );
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            bail!("Reset cancelled");
        }
    }

    let mut store = EncryptedStore::open(&data_dir)?;
    store.wipe()?;
    println!("Storage reset: {}", data_dir.display());
    Ok(())
}

fn run_tui(data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = ensure_data_dir(data_dir.as_deref())?;
    let _log_guard = logging::init_logging(&data_dir)?;
    tracing::info!(dir = %data_dir.display(), "starting pomodo");

    let store = EncryptedStore::open(&data_dir)?;
    let mut app = AppState::new(store);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        SetTitle("")
    )?;
    terminal.show_cursor()?;

    if let Err(e) = app.shutdown() {
        tracing::error!(error = %e, "failed to save on exit");
        eprintln!("Error saving state: {}", e);
    }

    if let Err(err) = result {
        tracing::error!(error = %err, "exited with error");
        eprintln!("Error: {}", err);
    }

    tracing::info!("pomodo stopped");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();
    let mut last_title = String::new();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let title = domain::window_title(&app.timer);
        if title != last_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            last_title = title;
        }

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if input::handle_key(app, key)? {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                _ => {}
            }
        }

        app.tick(Instant::now());

        // Autosave if needed
        if app.needs_save {
            if let Err(e) = app.save() {
                tracing::error!(error = %e, "autosave failed");
                app.status_message = Some(format!("Save failed: {}", e));
            }
        }
    }
}
