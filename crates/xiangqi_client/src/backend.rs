//! The seam between the client and the rules backend.

use derive_more::Display;
use xiangqi_core::{MoveToken, WireBoardState, WirePosition};

/// Failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BackendError {
    /// The request never produced a response.
    #[display("Connection failed: {}", _0)]
    Transport(String),
    /// The backend answered with a non-success status.
    #[display("Backend returned {}: {}", status, body)]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },
    /// The response body could not be decoded.
    #[display("Malformed response: {}", _0)]
    Decode(String),
}

impl std::error::Error for BackendError {}

/// Operations offered by the authoritative rules backend.
///
/// Everything here speaks wire coordinates; callers convert with
/// [`xiangqi_core::to_wire`] and [`xiangqi_core::from_wire`].
#[async_trait::async_trait]
pub trait GameBackend: Send + Sync {
    /// Fetches the current board.
    async fn fetch_board(&self) -> Result<WireBoardState, BackendError>;

    /// Lists the legal destinations for the piece at `from`.
    async fn legal_moves(&self, from: WirePosition) -> Result<Vec<WirePosition>, BackendError>;

    /// Submits a move and returns the resulting board.
    async fn submit_move(&self, token: &MoveToken) -> Result<WireBoardState, BackendError>;

    /// Restores the starting position.
    async fn reset(&self) -> Result<WireBoardState, BackendError>;

    /// Rolls back one ply.
    async fn undo(&self) -> Result<WireBoardState, BackendError>;
}
