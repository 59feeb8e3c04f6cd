use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

#[derive(Debug, Error)]
pub enum Error {
    #[error("User with this email already exists")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please enter a valid number between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },
    #[error("The round is already won, start a new one")]
    RoundFinished,
    #[error("malformed data under `{key}`: {source}")]
    MalformedPersistedData {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
