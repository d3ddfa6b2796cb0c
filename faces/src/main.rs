//! FacesOfAI persona studio TUI.
//!
//! A vim-style terminal interface for forging AI vessels, encoding permanent
//! truths into their neural matrices, and generating embed snippets.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a text-based interface suitable for automated
//! testing:
//!
//! ```bash
//! cargo run -p faces -- --headless
//! ```

mod app;
mod creator;
mod events;
mod headless;
mod login;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use faces_core::{ProfileStore, User, VesselMind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use app::App;
use events::{handle_event, EventResult};
use login::Login;
use ui::render::render;

const DEFAULT_DATA_DIR: &str = ".faces_of_ai";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    env_logger::init();

    // Check for API key
    if std::env::var("GEMINI_API_KEY").is_err() {
        eprintln!("Error: GEMINI_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export GEMINI_API_KEY=your_key_here");
        std::process::exit(1);
    }

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let data_dir = data_dir_from_args(&args);

    // Check for --headless mode
    if args.iter().any(|a| a == "--headless") {
        return headless::run_headless(data_dir).await;
    }

    // Check for --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mind = match VesselMind::from_env() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to initialize vessel mind: {e}");
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Signing out drops back to the login screen, hence the outer loop.
    let result: Result<(), Box<dyn std::error::Error>> = loop {
        let store = ProfileStore::new(data_dir.clone());

        let (user, fresh_login) = match store.load_user().await {
            Ok(Some(user)) => (user, false),
            Ok(None) => match run_login(&mut terminal) {
                Ok(Some(user)) => {
                    if let Err(e) = store.save_user(&user).await {
                        break Err(e.into());
                    }
                    (user, true)
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e.into()),
            },
            Err(e) => break Err(e.into()),
        };

        let personas = match store.load_personas().await {
            Ok(p) => p,
            Err(e) => break Err(e.into()),
        };

        let mut app = App::new(store, mind.clone(), user, personas);
        if fresh_login {
            app.show_welcome();
        }

        match run_app(&mut terminal, app).await {
            Ok(app) if app.should_logout => {
                if let Err(e) = app.store.clear_user().await {
                    break Err(e.into());
                }
            }
            Ok(_) => break Ok(()),
            Err(e) => break Err(e.into()),
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Run the sign-in form until the architect submits or cancels.
fn run_login<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
) -> io::Result<Option<User>> {
    let mut login = Login::new();

    loop {
        terminal.draw(|f| {
            let area = f.area();
            login.render(f, area);
        })?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            login.handle_event(ev);
        } else {
            login.tick();
        }

        if login.cancelled {
            return Ok(None);
        }

        if login.finished {
            return Ok(Some(login.build_user()));
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<App> {
    loop {
        // Render
        terminal.draw(|f| render(f, &mut app))?;

        // Drain queued probes, snippet generation, and roster saves. The
        // frame above already shows the "Synchronizing..." status, so the
        // await happens behind a fresh draw.
        app.process_pending_work().await;

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;

            if let EventResult::Quit = handle_event(&mut app, ev) {
                break;
            }
        } else {
            // Tick animations
            app.tick();
        }

        if app.should_quit || app.should_logout {
            break;
        }
    }

    // Fold any open session back into the roster and flush it to disk.
    app.close_session();
    app.process_pending_work().await;

    Ok(app)
}

/// Resolve the profile directory from `--data-dir`, then the environment,
/// then the default.
fn data_dir_from_args(args: &[String]) -> PathBuf {
    if let Some(pos) = args.iter().position(|a| a == "--data-dir") {
        if let Some(dir) = args.get(pos + 1) {
            return PathBuf::from(dir);
        }
    }
    std::env::var("FACES_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

fn print_help() {
    println!("FacesOfAI - forge AI vessels and teach them permanent truths");
    println!();
    println!("USAGE:");
    println!("  faces [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help           Show this help message");
    println!("  --headless           Run in headless mode (text-only, no TUI)");
    println!("  --data-dir <DIR>     Profile directory (default: {DEFAULT_DATA_DIR})");
    println!();
    println!("ENVIRONMENT:");
    println!("  GEMINI_API_KEY       Required. Gemini API key for vessel minds.");
    println!("  FACES_DATA_DIR       Overrides the default profile directory.");
    println!();
    println!("KEYS (TUI mode):");
    println!("  j/k        Move the roster cursor");
    println!("  Enter      Open a training session");
    println!("  n          Forge a new vessel");
    println!("  i          Insert mode (type a message)");
    println!("  t          Toggle TEACH / PROBE");
    println!("  Tab        Toggle Training / Deploy");
    println!("  :q         Quit");
    println!();
    println!("EXAMPLES:");
    println!("  faces                                  # Interactive TUI mode");
    println!("  faces --headless                       # Line-oriented protocol");
    println!("  faces --data-dir /tmp/faces-demo       # Scratch profile");
}
