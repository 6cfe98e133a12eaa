use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use linewatch::data::duration::parse_duration;
use linewatch::ui::{self, Theme};
use linewatch::{
    events, logging, App, ConfigError, DisplayState, FileSource, HttpSource, LineId,
    LineSelector, ParamsSource, Poller, Selection, Settings, SharedState, StalePolicy,
};

#[derive(Parser, Debug)]
#[command(name = "linewatch")]
#[command(about = "Terminal dashboard for polling production line parameters")]
struct Args {
    /// Settings file (TOML). Environment variables LINEWATCH_* override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parameter endpoint, queried as <endpoint>?id=<line>
    #[arg(short, long, conflicts_with = "fixtures")]
    endpoint: Option<String>,

    /// Read <dir>/<line>.json instead of polling over HTTP
    #[arg(short, long)]
    fixtures: Option<PathBuf>,

    /// Delay between polls (e.g., "500ms", "2s")
    #[arg(long)]
    poll_delay: Option<String>,

    /// Line selected at startup
    #[arg(short, long)]
    line: Option<LineId>,

    /// Drop responses that arrive after the selection moved to another line
    #[arg(long)]
    discard_stale: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    apply_overrides(&mut settings, &args)?;

    logging::init(&settings.log_file, &settings.log_level, settings.log_rotation)?;

    let source: Arc<dyn ParamsSource> = match args.fixtures {
        Some(ref dir) => Arc::new(FileSource::new(dir)),
        None => Arc::new(
            HttpSource::with_timeout(&settings.endpoint, settings.request_timeout)
                .context("creating HTTP client")?,
        ),
    };
    tracing::info!(source = source.description(), "starting linewatch");

    let registry = Arc::new(settings.lines.clone());
    let selector = LineSelector::new(registry, settings.initial_line)?;
    let state = SharedState::new(DisplayState::new(
        selector.current(),
        selector.current_name(),
    ));
    let selection = Selection::new(selector);

    // Detect before raw mode takes over the terminal
    let theme = Theme::auto_detect();
    let mut app = App::new(
        selection.clone(),
        state.clone(),
        source.description(),
        theme,
    )
    .with_swipe_threshold(settings.swipe_threshold);

    // The poll loop runs on the runtime while the TUI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let handle = {
        let _guard = rt.enter();
        Poller::new(source, selection, state)
            .with_delay(settings.poll_delay)
            .with_stale_policy(settings.stale_policy)
            .spawn()
    };

    let result = run_tui(&mut app);

    rt.block_on(handle.shutdown());
    tracing::info!("linewatch exited");

    result
}

/// Layer command-line flags over the loaded settings.
fn apply_overrides(settings: &mut Settings, args: &Args) -> Result<()> {
    if let Some(ref endpoint) = args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(ref delay) = args.poll_delay {
        let delay =
            parse_duration(delay).with_context(|| format!("invalid --poll-delay {}", delay))?;
        if delay.is_zero() {
            return Err(ConfigError::ZeroDelay.into());
        }
        settings.poll_delay = delay;
    }
    if let Some(line) = args.line {
        settings.initial_line = line;
    }
    if args.discard_stale {
        settings.stale_policy = StalePolicy::Discard;
    }
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.refresh();
        terminal.draw(|frame| ui::render(frame, app))?;

        // Short timeout so new readings show up without input
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            events::handle_event(app, event);
        }
    }

    Ok(())
}
