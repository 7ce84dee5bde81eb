pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "leader style `none` cannot be combined with the crossing-based objective of `{algorithm}`"
    )]
    UnsupportedLeaderStyle { algorithm: &'static str },

    #[error("malformed geophylogeny instance: {message}")]
    MalformedInstance { message: String },

    #[error("Newick parse error at byte {position}: {message}")]
    NewickParse { position: usize, message: String },

    #[error("Nexus parse error: {message}")]
    NexusParse { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
