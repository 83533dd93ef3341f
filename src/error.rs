use thiserror::Error;

/// type alias for all weblog operations that could fail with a [`WeblogError`]
pub type Result<T> = std::result::Result<T, WeblogError>;

/// The error variants used throughout the weblog crate.
///
/// Variants come in two severities. `Storage`, `Codec` and `Config` are fatal: the
/// article file or the startup configuration can no longer be trusted and the server
/// process terminates. Everything else is scoped to a single connection or command
/// invocation and the server keeps serving.
#[derive(Error, Debug)]
pub enum WeblogError {
    /// a file could not be created, read or written
    #[error("storage error: {0}")]
    Storage(std::io::Error),

    /// the article file could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(serde_json::Error),

    /// the startup configuration is missing or malformed
    #[error("config error: {0}")]
    Config(String),

    /// a command line argument or address failed validation
    #[error("{0}")]
    Parsing(String),

    /// a socket could not be bound, connected or written
    #[error("connection error: {0}")]
    Connection(std::io::Error),

    /// malformed or unexpected data arrived on the wire
    #[error("protocol error: {0}")]
    Protocol(String),

    /// catch-all for failures that are only described by a message
    #[error("{0}")]
    Other(String),
}

impl WeblogError {
    /// returns true for the variants the server cannot keep serving after: a storage,
    /// codec or configuration failure has no recovery path
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WeblogError::Storage(_) | WeblogError::Codec(_) | WeblogError::Config(_)
        )
    }
}
