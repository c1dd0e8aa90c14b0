//! Interactive demo for the stackui toolkit.
//!
//! Opens a menu on the modal stack; each entry exercises a widget.  Input is
//! gathered between ticks and every tick runs one update and one draw.
//! Run with `--write-config` to save the effective configuration and exit.

mod app;
mod config;

use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};

use stackui::ui::{term_color, BufferSink, Theme};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    layout::AppLayout,
    state::AppState,
};
use crate::config::AppConfig;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Modal stack and popup queue demo")]
struct Cli {
    /// Frame period in milliseconds (overrides the config file).
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Draw every stacked control, dimming all but the top one.
    #[arg(long)]
    draw_all: bool,

    /// Run every queued notification at once instead of one at a time.
    #[arg(long)]
    run_all_popups: bool,

    /// Write tracing output to this file (filter with `RUST_LOG`).
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Save the effective configuration and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(ms) = self.tick_ms {
            config.tick_ms = ms.max(1);
        }
        config.draw_all |= self.draw_all;
        config.run_all_popups |= self.run_all_popups;
    }
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal owns stderr, so logs only go to a file when asked for.
    if let Some(path) = &cli.log {
        init_tracing(path)?;
    }

    let mut config = AppConfig::load();
    cli.apply(&mut config);

    if cli.write_config {
        let path = config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let outcome = run(&mut terminal, config).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    config: AppConfig,
) -> Result<()> {
    let area = terminal.size()?;
    let layout = AppLayout::from_area(ratatui::layout::Rect::new(0, 0, area.width, area.height));
    let tick = Duration::from_millis(config.tick_ms);
    let mut state = AppState::new(config, layout);
    handler::open_main_menu(&mut state)?;
    tracing::info!(tick_ms = tick.as_millis() as u64, "demo started");

    let mut events = spawn_event_reader(tick);

    while let Some(event) = events.recv().await {
        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Resize(w, h) => handler::handle_resize(&mut state, w, h),
            AppEvent::Tick => {
                handler::run_frame(&mut state)?;
                draw(terminal, &mut state)?;
            }
        }
        if state.should_quit {
            break;
        }
    }

    tracing::info!(frames = state.frame, "demo finished");
    Ok(())
}

fn draw(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let hint = handler::status_hint(state);
    let status_area = state.layout.status_area;
    terminal.draw(|frame| {
        {
            let mut sink = BufferSink::new(frame.buffer_mut());
            state.manager.draw(&mut sink);
        }
        let status = Paragraph::new(hint).style(
            ratatui::style::Style::default()
                .bg(term_color(Theme::BORDER))
                .fg(term_color(Theme::BACKGROUND)),
        );
        frame.render_widget(status, status_area);
    })?;
    Ok(())
}
