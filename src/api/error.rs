use serde::de::IgnoredAny;
use serde::Deserialize;

/// Failure of a backend call, as seen by the rest of the client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (DNS, connection refused, CORS, ...).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// Identity validation failed for the stored credential.
    #[error("session expired")]
    SessionInvalid,
    /// An authenticated call was attempted without a bearer token.
    #[error("not signed in")]
    NotAuthenticated,
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Message shown to the user, with `fallback` standing in for anything
    /// that carries no server-provided text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Http { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::NotAuthenticated => "Please sign in first.".to_string(),
            Self::SessionInvalid => "Your session has expired.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Text(String),
    Items(Vec<ErrorItem>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    msg: Option<String>,
}

/// Extract the FastAPI `detail` message from an error body.
pub fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        ErrorDetail::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        ErrorDetail::Items(items) => {
            let joined = items
                .into_iter()
                .filter_map(|item| item.msg)
                .filter(|msg| !msg.trim().is_empty())
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        ErrorDetail::Other(_) => None,
    }
}

/// Build an `Http` error from a status and raw body.
pub fn http_error(status: u16, body: &str, fallback: &str) -> ApiError {
    ApiError::Http {
        status,
        message: detail_message(body).unwrap_or_else(|| fallback.to_string()),
    }
}
