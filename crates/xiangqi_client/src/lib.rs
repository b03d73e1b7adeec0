//! Xiangqi Client - terminal front end for a server-authoritative game.
//!
//! The rules backend owns the game. This crate fetches snapshots, asks the
//! backend which moves are legal, submits moves and renders the result.
//!
//! # Architecture
//!
//! - **Backend**: the [`GameBackend`] seam and its HTTP implementation
//! - **Store**: the one current [`xiangqi_core::BoardState`]
//! - **Controller**: the select/drop state machine, free of I/O
//! - **TUI**: ratatui rendering and keyboard handling

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backend;
mod candidates;
mod cli;
mod config;
mod controller;
mod http_client;
mod store;
pub mod tui;

pub use backend::{BackendError, GameBackend};
pub use candidates::CandidateMoveSet;
pub use cli::{Cli, Command};
pub use config::{ClientConfig, ConfigError, DEFAULT_CONFIG_FILE, SERVER_URL_ENV};
pub use controller::{
    Completion, Generation, InteractionController, InteractionState, Notice, Reply, Request,
    Resolution, Ticket,
};
pub use http_client::HttpBackend;
pub use store::GameStateStore;
