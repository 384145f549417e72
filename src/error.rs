use std::io;

/// Everything that can go wrong while keeping score.
///
/// Ties and rounds below the winning score are not errors; they are
/// reported as [`crate::contention::Verdict`] values.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Game name cannot be empty")]
    EmptyGameName,

    #[error("A game named '{0}' already exists")]
    DuplicateGame(String),

    #[error("Winning score must be a positive number, got {0}")]
    InvalidWinningScore(i64),

    #[error("No game named '{0}'")]
    UnknownGame(String),

    #[error("Please enter at least one player name")]
    NoPlayers,

    #[error("Player '{0}' was entered more than once")]
    DuplicatePlayer(String),

    #[error("No player named '{0}' in this session")]
    UnknownPlayer(String),

    #[error("'{0}' is not a valid number of points")]
    InvalidPoints(String),

    #[error("Adding {delta} to {player}'s score of {score} is out of range")]
    ScoreOutOfRange {
        player: String,
        score: i64,
        delta: i64,
    },

    #[error("Cannot evaluate a round without any scores")]
    NoScores,

    #[error("This session is already over")]
    SessionFinished,

    #[error("I/O error : {0}")]
    Io(#[from] io::Error),

    #[error("Malformed JSON : {0}")]
    Json(#[from] serde_json::Error),

    #[error("History database error : {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error : {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
