/// Core error type for the move bot.
///
/// Adapter crates (SQLite store, PokeAPI lookup, Telegram) map their specific
/// errors into this type so the command engine can turn every failure into a
/// user-facing reply instead of tearing down the process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("move lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("external error: {0}")]
    External(String),
}

/// Why the external move-data source could not resolve a move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown move '{0}'")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
