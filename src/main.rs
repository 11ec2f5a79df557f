mod app;
mod config;
mod data;
mod draft;
mod export;
mod filter;
mod input;
mod report;
mod table;
mod ui;
mod views;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs, io, sync::Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use config::Config;
use export::Format;
use report::Breakdown;
use table::SortSpec;
use views::View;

#[derive(Parser, Debug)]
#[command(name = "crm")]
#[command(about = "Terminal CRM console with sortable, actionable tables")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.config/crm-console/config.toml")]
    config: String,

    /// View to open on startup (overrides the config)
    #[arg(long, value_enum)]
    view: Option<View>,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one view to stdout and exit
    Print {
        #[arg(value_enum)]
        view: View,

        /// Sort column, as key[:asc|desc]
        #[arg(long)]
        sort: Option<SortSpec>,

        /// Fuzzy filter applied before sorting
        #[arg(long)]
        filter: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print a pipeline or order-status breakdown of the sample data
    Report {
        #[arg(value_enum, default_value_t = Breakdown::Pipeline)]
        kind: Breakdown,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "crm=info".into())
}

/// Log to stderr; used when there is no full-screen UI to corrupt
fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Log to a file so output does not draw over the console
fn init_file_logging(config: &Config) -> Result<()> {
    let path = config.logging.resolved_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Print {
            view,
            sort,
            filter,
            format,
        }) => {
            init_stderr_logging();
            let config = Config::load(&cli.config)?;
            let sort = sort.or_else(|| config.sort.for_view(view));
            let table = export::render_view(view, sort.as_ref(), filter.as_deref())?;
            print!("{}", export::export(&table, format)?);
            return Ok(());
        }
        Some(Command::Report { kind, format }) => {
            init_stderr_logging();
            let table = report::breakdown(kind, &data::sample_leads(), &data::sample_orders());
            print!("{}", export::export(&table, format)?);
            return Ok(());
        }
        None => {}
    }

    // Load config
    let mut config = Config::load(&cli.config)?;
    if let Some(view) = cli.view {
        config.behavior.default_view = view;
    }
    if cli.no_mouse {
        config.behavior.mouse = false;
    }
    init_file_logging(&config)?;
    tracing::info!("Starting on {}", config.behavior.default_view);

    let mouse = config.behavior.mouse;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config);

    // Run main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key)
                }
                Event::Mouse(mouse) if app.config().behavior.mouse => {
                    input::handle_mouse(app, mouse)
                }
                _ => {}
            }
        }
    }
    tracing::info!("Exiting");
    Ok(())
}
