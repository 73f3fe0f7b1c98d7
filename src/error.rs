//! Error types for the tictactoe-rl crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is out of range (must be 1-9)")]
    InvalidPosition { position: usize },

    #[error("invalid move: position {position} is already occupied")]
    OccupiedCell { position: usize },

    #[error("invalid move: player id {id} is not a valid player (expected 1 or 2)")]
    InvalidPlayerId { id: u8 },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("board string has wrong length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("agent kind '{kind}' is not supported")]
    UnsupportedAgent { kind: String },

    #[error("unknown agent kind '{input}' (expected {expected})")]
    ParseAgentKind { input: String, expected: String },

    #[error("unknown averaging policy '{input}' (expected {expected})")]
    ParseAveraging { input: String, expected: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("msgpack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    #[error("msgpack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

impl Error {
    /// True for the three ways a move can be rejected by the board.
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            Error::InvalidPosition { .. } | Error::OccupiedCell { .. } | Error::InvalidPlayerId { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_move_grouping() {
        assert!(Error::InvalidPosition { position: 0 }.is_invalid_move());
        assert!(Error::OccupiedCell { position: 5 }.is_invalid_move());
        assert!(Error::InvalidPlayerId { id: 3 }.is_invalid_move());
        assert!(!Error::NoValidMoves.is_invalid_move());
    }

    #[test]
    fn messages_name_the_position() {
        let err = Error::OccupiedCell { position: 7 };
        assert!(err.to_string().contains("7"));
        assert!(err.to_string().contains("occupied"));
    }
}
