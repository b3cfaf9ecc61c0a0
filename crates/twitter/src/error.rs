use turnpost_oauth::OAuthError;
use turnpost_transfer::TransferError;

use crate::types::ApiError;

/// Errors from the Twitter client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {}", describe(.errors))]
    Api { status: u16, errors: Vec<ApiError> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signing failed: {0}")]
    OAuth(#[from] OAuthError),

    #[error("upload session: {0}")]
    Transfer(#[from] TransferError),

    #[error("media upload failed: {0}")]
    Upload(String),
}

impl Error {
    /// Whether the platform reported error `code`.
    pub fn has_code(&self, code: i64) -> bool {
        match self {
            Error::Api { errors, .. } => errors.iter().any(|e| e.code == code),
            _ => false,
        }
    }

    /// Builds an [`Error::Api`] from a non-2xx response body.
    ///
    /// Bodies that are not the usual `{"errors":[...]}` document produce an
    /// empty error list.
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct Body {
            #[serde(default)]
            errors: Vec<ApiError>,
        }

        let errors = serde_json::from_slice::<Body>(body)
            .map(|b| b.errors)
            .unwrap_or_default();
        Error::Api { status, errors }
    }
}

fn describe(errors: &[ApiError]) -> String {
    if errors.is_empty() {
        return "no details".into();
    }
    errors
        .iter()
        .map(|e| format!("[{}] {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
