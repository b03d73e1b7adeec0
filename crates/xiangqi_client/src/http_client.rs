//! REST client for the rules backend.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use xiangqi_core::{MoveRequest, MoveToken, WireBoardState, WirePosition};

use crate::backend::{BackendError, GameBackend};

/// HTTP implementation of [`GameBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a client rooted at `base_url` (e.g. `http://localhost:8080/api/game`).
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        debug!("Creating HTTP backend client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Reads a response, turning non-success statuses into rejections.
    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        debug!(status = %status, body = %body, "Backend response");

        if !status.is_success() {
            warn!(status = %status, "Backend rejected request");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn post_snapshot(&self, path: &str) -> Result<WireBoardState, BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::read(response).await
    }
}

#[async_trait::async_trait]
impl GameBackend for HttpBackend {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_board(&self) -> Result<WireBoardState, BackendError> {
        debug!("Fetching board");
        let response = self
            .client
            .get(self.url("board"))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::read(response).await
    }

    #[instrument(skip_all, fields(base_url = %self.base_url, from = %from))]
    async fn legal_moves(&self, from: WirePosition) -> Result<Vec<WirePosition>, BackendError> {
        debug!("Querying legal moves");
        let path = format!("legal_moves/{}/{}", from.row, from.col);
        let response = self
            .client
            .get(self.url(&path))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::read(response).await
    }

    #[instrument(skip_all, fields(base_url = %self.base_url, token = %token))]
    async fn submit_move(&self, token: &MoveToken) -> Result<WireBoardState, BackendError> {
        debug!("Submitting move");
        let response = self
            .client
            .post(self.url("move"))
            .json(&MoveRequest::new(token.clone()))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::read(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn reset(&self) -> Result<WireBoardState, BackendError> {
        debug!("Resetting game");
        self.post_snapshot("reset").await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn undo(&self) -> Result<WireBoardState, BackendError> {
        debug!("Undoing move");
        self.post_snapshot("undo").await
    }
}
