// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod contention;
pub mod error;
pub mod game;
pub mod history;
pub mod logging;
pub mod round;
pub mod runtime;
pub mod session;
pub mod ui;

pub use contention::{process_round_end, ContentionState, RoundOutcome, Verdict, ROUNDS_TO_WIN};
pub use error::{Error, Result};
pub use round::{evaluate, RoundEvaluation};
