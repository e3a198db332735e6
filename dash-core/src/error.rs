use std::path::PathBuf;

use thiserror::Error;

/// Failure of a weather lookup. The `Display` text is meant to be shown to
/// the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Please enter a city name")]
    EmptyQuery,

    #[error("City \"{city}\" not found")]
    CityNotFound { city: String },

    #[error("The weather provider rejected the API key. Hint: run `weather-dash configure`.")]
    Unauthorized,

    #[error("Weather provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Could not reach the weather provider: {0}")]
    Transport(String),

    #[error("Unexpected response from the weather provider: {0}")]
    Decode(String),
}

/// Failure of the key-value persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn corrupt(key: &str, source: serde_json::Error) -> Self {
        Self::Corrupt {
            key: key.to_string(),
            source,
        }
    }

    pub(crate) fn encode(key: &str, source: serde_json::Error) -> Self {
        Self::Encode {
            key: key.to_string(),
            source,
        }
    }
}
