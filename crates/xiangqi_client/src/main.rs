//! Xiangqi Client - Unified CLI
//!
//! Interactive board by default, plus one-shot commands for scripting.

#![warn(missing_docs)]

use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use xiangqi_client::{
    Cli, ClientConfig, Command, GameBackend, HttpBackend, InteractionController, Resolution,
    Ticket, tui,
};
use xiangqi_core::{BOARD_COLUMNS, BOARD_ROWS, BoardState, Position};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ClientConfig::load(&cli.config)?;
    if let Some(server_url) = cli.server_url {
        config = config.with_server_url(server_url);
    }

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => tui::run_tui(config).await,
        Command::Show => run_show(&config).await,
        Command::Reset => run_reset(&config).await,
        Command::Undo => run_undo(&config).await,
        Command::Moves { x, y } => run_moves(&config, Position::new(x, y)).await,
    }
}

/// Print the current board
async fn run_show(config: &ClientConfig) -> Result<()> {
    let mut controller = connect(config);
    let ticket = controller.refresh();
    perform(&mut controller, ticket, "fetch board").await?;
    print_board(&controller.store().current());
    Ok(())
}

/// Reset the game and print the new board
async fn run_reset(config: &ClientConfig) -> Result<()> {
    let mut controller = connect(config);
    let ticket = controller.reset();
    perform(&mut controller, ticket, "reset").await?;
    print_board(&controller.store().current());
    Ok(())
}

/// Undo one move and print the new board
async fn run_undo(config: &ClientConfig) -> Result<()> {
    let mut controller = connect(config);
    let ticket = controller.undo();
    perform(&mut controller, ticket, "undo").await?;
    print_board(&controller.store().current());
    Ok(())
}

/// List legal destinations for the piece on `position`
#[instrument(skip(config))]
async fn run_moves(config: &ClientConfig, position: Position) -> Result<()> {
    if !position.is_on_board() {
        bail!("{} is off the board", position);
    }

    let mut controller = connect(config);
    let ticket = controller.refresh();
    perform(&mut controller, ticket, "fetch board").await?;

    let piece = controller
        .store()
        .with_current(|board| board.piece_at(position).cloned())
        .ok_or_else(|| anyhow!("No piece at {}", position))?;
    let ticket = controller
        .select_piece(&piece)
        .ok_or_else(|| anyhow!("{} {} cannot move now", piece.glyph(), position))?;
    perform(&mut controller, ticket, "legal moves").await?;

    let targets: Vec<String> = controller
        .candidates()
        .iter()
        .map(|p| p.to_string())
        .collect();
    if targets.is_empty() {
        println!("{} {}: no legal moves", piece.glyph(), position);
    } else {
        println!("{} {}: {}", piece.glyph(), position, targets.join(" "));
    }
    Ok(())
}

/// Builds a controller against the configured server, logging to stderr.
fn connect(config: &ClientConfig) -> InteractionController {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(server_url = %config.server_url(), "Connecting to game server");
    let backend: Arc<dyn GameBackend> = Arc::new(HttpBackend::new(config.server_url()));
    InteractionController::new(backend)
}

/// Executes `ticket` and turns anything but an applied reply into an error.
async fn perform(controller: &mut InteractionController, ticket: Ticket, what: &str) -> Result<()> {
    let backend = controller.backend();
    let completion = ticket.execute(backend.as_ref()).await;
    let failure = completion.outcome().as_ref().err().cloned();

    match controller.complete(completion) {
        Resolution::Applied => Ok(()),
        Resolution::Failed => match (failure, controller.take_notice()) {
            (_, Some(notice)) => bail!("{}", notice),
            (Some(e), None) => Err(anyhow!(e).context(format!("{} failed", what))),
            (None, None) => bail!("{} failed: backend sent an unusable reply", what),
        },
        Resolution::Stale => bail!("{} was superseded", what),
    }
}

fn print_board(board: &BoardState) {
    for y in 0..BOARD_ROWS {
        if y == BOARD_ROWS / 2 {
            println!("   ~~~~~~ 楚 河   漢 界 ~~~~~~");
        }
        let row: Vec<String> = (0..BOARD_COLUMNS)
            .map(|x| match board.piece_at(Position::new(x, y)) {
                Some(piece) => piece.glyph().to_string(),
                None => "·".to_string(),
            })
            .collect();
        println!("{:>2} {}", y, row.join(" "));
    }

    println!();
    println!("{}", board.turn_banner());
    let status = board.status().to_string();
    if !status.is_empty() {
        println!("{}", status);
    }
}
