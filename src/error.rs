// Client error types
use serde_json::Value;

/// Failure of a call against the catalog API or of local client state
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // No response at all (connect refused, DNS, TLS, body read)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    // 401: missing, expired or rejected token
    #[error("Unauthorized: {}", detail_or_body(.body))]
    Unauthorized { body: String },

    // Any other non-2xx response
    #[error("Remote error {status}: {}", detail_or_body(.body))]
    Remote { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // Rejected locally before any request was sent
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if status == 401 {
            ClientError::Unauthorized { body }
        } else {
            ClientError::Remote { status, body }
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status of the response, if there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "TRANSPORT",
            ClientError::Unauthorized { .. } => "UNAUTHORIZED",
            ClientError::Remote { status: 404, .. } => "NOT_FOUND",
            ClientError::Remote { .. } => "REMOTE",
            ClientError::Decode(_) => "DECODE",
            ClientError::Url(_) => "INVALID_URL",
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::Storage(_) => "STORAGE",
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Remote { status: 404, .. })
    }

    /// Server-provided message from the `detail` field of an error body
    pub fn detail(&self) -> Option<String> {
        match self {
            ClientError::Unauthorized { body } | ClientError::Remote { body, .. } => {
                parse_detail(body)
            }
            _ => None,
        }
    }

    /// Message to show the user: the server's detail, a local validation
    /// message, or the given fallback
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation { message, .. } => message.clone(),
            _ => self.detail().unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Extract `detail` from an error body. The API sends either a plain string
/// or a list of `{ loc, msg }` entries for request validation failures.
pub fn parse_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|loc| loc.as_array())
                        .and_then(|loc| loc.last())
                        .and_then(|f| f.as_str());
                    Some(match field {
                        Some(f) => format!("{}: {}", f, msg),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn detail_or_body(body: &str) -> String {
    parse_detail(body).unwrap_or_else(|| body.to_string())
}

pub type ClientResult<T> = Result<T, ClientError>;
