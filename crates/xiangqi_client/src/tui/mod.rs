//! Terminal UI for the xiangqi client.
//!
//! Backend requests run on spawned tasks and report back through an mpsc
//! channel, so the event loop never waits on the network. Redraws are
//! driven by key presses, completions and the board store's watch channel.

mod app;
mod input;
mod ui;

pub use app::{Action, App};
pub use input::move_cursor;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::backend::GameBackend;
use crate::config::ClientConfig;
use crate::controller::{Completion, InteractionController, Ticket};
use crate::http_client::HttpBackend;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the TUI client
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so output doesn't corrupt the screen
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_filter())),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(server_url = %config.server_url(), "Starting Xiangqi TUI");

    let backend: Arc<dyn GameBackend> = Arc::new(HttpBackend::new(config.server_url()));
    let mut app = App::new(InteractionController::new(backend));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

#[instrument(skip_all)]
async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut board_rx = app.controller().store().subscribe();

    dispatch(app.controller().backend(), app.refresh(), &tx);

    let mut dirty = true;
    loop {
        while let Ok(completion) = rx.try_recv() {
            let resolution = app.complete(completion);
            debug!(?resolution, "Completion handled");
            dirty = true;
        }

        if board_rx.has_changed().unwrap_or(false) {
            board_rx.borrow_and_update();
            dirty = true;
        }

        if dirty {
            terminal.draw(|f| ui::draw(f, app))?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                dirty = true;
                match app.handle_key(key.code) {
                    Action::Quit => return Ok(()),
                    Action::Dispatch(ticket) => dispatch(app.controller().backend(), ticket, &tx),
                    Action::None => {}
                }
            }
            Event::Resize(..) => dirty = true,
            _ => {}
        }
    }
}

/// Executes `ticket` on a background task and sends the completion to `tx`.
fn dispatch(backend: Arc<dyn GameBackend>, ticket: Ticket, tx: &mpsc::UnboundedSender<Completion>) {
    debug!(request = ?ticket.request(), generation = %ticket.generation(), "Dispatching request");
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = ticket.execute(backend.as_ref()).await;
        if tx.send(completion).is_err() {
            debug!("Event loop gone, dropping completion");
        }
    });
}
