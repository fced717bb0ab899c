use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridfield::app::{App, DemoOptions, Focus, Popup};
use gridfield::config::AppConfig;
use gridfield::data;
use gridfield::theme::ThemeMode;
use gridfield::ui;
use gridfield::ui::components::{Size, Variant};

#[derive(Parser, Debug)]
#[command(name = "gridfield")]
#[command(version)]
#[command(about = "Filterable, sortable, selectable table demo for the terminal")]
struct Args {
    /// JSON file holding an array of objects to show
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Color theme (overrides config)
    #[arg(short, long, value_enum)]
    theme: Option<ThemeMode>,

    /// Input field variant (overrides config)
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Input field size (overrides config)
    #[arg(long, value_enum)]
    size: Option<Size>,

    /// Treat the filter as a password field with a show/hide toggle
    #[arg(long)]
    password: bool,

    /// Start with both widgets in their loading state
    #[arg(long)]
    loading: bool,

    /// Disable row selection
    #[arg(long)]
    no_select: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    // Log to stderr so the TUI on stdout stays intact
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    if let Some(size) = args.size {
        config.size = size;
    }

    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let records = match &args.data {
        Some(path) => data::load_records(path)
            .with_context(|| format!("Failed to load records from {}", path.display()))?,
        None => data::sample_records(),
    };

    let options = DemoOptions {
        password: args.password,
        loading: args.loading,
        selectable: !args.no_select,
    };
    let mut app = App::new(&config, records, options);

    run_tui(&mut app)
}

fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.pump_events();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None && app.focus == Focus::Table => {
                            return Ok(())
                        }
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => app.handle_key(key),
                    }
                }
            }
        }

        // Periodic refresh
        app.tick();
    }
}
