//! Dispatch error types.

/// Failures while handling an event. Ignored events are not errors; see
/// [`crate::Outcome::Ignored`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("platform error: {0}")]
    Platform(#[from] turnpost_twitter::Error),

    #[error("codec error: {0}")]
    Codec(#[from] turnpost_codec::CodecError),

    #[error("game error: {0}")]
    Games(#[from] turnpost_games::GamesError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
