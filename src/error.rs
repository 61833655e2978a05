#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("Failed to initialize presence client: {0}")]
    Init(String),

    #[error("Presence service is not connected")]
    NotConnected,

    #[error("Presence service rejected the request: {0}")]
    Rejected(String),

    #[error("Request was superseded by a newer update")]
    Superseded,

    #[error("Presence backend channel closed")]
    ChannelClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PresenceError> for String {
    fn from(e: PresenceError) -> Self {
        e.to_string()
    }
}
