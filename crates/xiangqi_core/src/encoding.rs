//! Move tokens sent to the move-submission endpoint.

use derive_more::Display;
use serde::Serialize;
use tracing::instrument;

use crate::WirePosition;

/// Encoded move in the backend's compact form.
///
/// Four ASCII digits: source row, source col, target row, target col, all in
/// wire coordinates. The server never sends tokens back, so there is no
/// decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(transparent)]
pub struct MoveToken(String);

impl MoveToken {
    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error produced when a move cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum EncodeError {
    /// A coordinate component does not fit in a single decimal digit.
    #[display("Coordinate component {} of {} is not a single digit", _0, _1)]
    ComponentOutOfRange(u8, WirePosition),
}

impl std::error::Error for EncodeError {}

/// Encodes a move between two wire positions.
///
/// Each component must be 0-9; anything larger would make the token
/// ambiguous and is rejected.
#[instrument]
pub fn encode(source: WirePosition, target: WirePosition) -> Result<MoveToken, EncodeError> {
    let mut token = String::with_capacity(4);
    for position in [source, target] {
        for component in [position.row, position.col] {
            let digit = char::from_digit(u32::from(component), 10)
                .ok_or(EncodeError::ComponentOutOfRange(component, position))?;
            token.push(digit);
        }
    }
    Ok(MoveToken(token))
}
