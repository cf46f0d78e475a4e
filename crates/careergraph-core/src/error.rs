pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid career entries JSON: {0}")]
    EntriesJson(#[from] serde_json::Error),

    #[error("Expected a JSON array of entries or an object with an `entries` array")]
    UnexpectedEntriesShape,

    #[error("Invalid config ({key}): {message}")]
    InvalidConfig { key: String, message: String },
}
