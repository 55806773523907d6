use aria_playback::PlaybackError;
use aria_storage::StorageError;
use thiserror::Error;

/// Result type alias using `SessionError`
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by player session actions
///
/// None of these are fatal: the session stays usable after each one.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// None of the offered files were audio
    #[error("No audio files among {0} selected file(s)")]
    NoAudioFiles(usize),
}
