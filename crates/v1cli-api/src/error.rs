//! API errors with structured context.
//!
//! Carries a category, an actionable suggestion and a retryability flag so
//! the binary can map failures to UNIX sysexits.h-compliant exit codes.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    NotFound,
    Auth,
    External,
    Internal,
    Timeout,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Auth => "auth",
            ErrorCategory::External => "external",
            ErrorCategory::Internal => "internal",
            ErrorCategory::Timeout => "timeout",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication failed. Check your V1_TOKEN.")]
    AuthenticationFailed,

    #[error("Resource not found.")]
    NotFound,

    #[error("API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("Could not find current user")]
    NoCurrentUser,

    #[error("Client configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Transport(e) if e.is_timeout() => ErrorCategory::Timeout,
            ApiError::Transport(_) => ErrorCategory::External,
            ApiError::AuthenticationFailed => ErrorCategory::Auth,
            ApiError::NotFound | ApiError::NoCurrentUser => ErrorCategory::NotFound,
            ApiError::Remote { status, .. } if *status >= 500 => ErrorCategory::External,
            ApiError::Remote { .. } => ErrorCategory::InvalidInput,
            ApiError::InvalidResponse(_) => ErrorCategory::External,
            ApiError::Configuration(_) => ErrorCategory::InvalidInput,
        }
    }

    /// A helpful suggestion for resolving the error.
    pub fn suggestion(&self) -> String {
        match self {
            ApiError::Transport(e) if e.is_timeout() => {
                "The server did not respond in time. Check V1_URL and your network.".to_string()
            }
            ApiError::Transport(_) => {
                "Could not reach the VersionOne instance. Check V1_URL and your network."
                    .to_string()
            }
            ApiError::AuthenticationFailed => {
                "Generate a fresh access token in your VersionOne profile settings and export V1_TOKEN."
                    .to_string()
            }
            ApiError::NotFound => {
                "Check the identifier. Numbers look like S-1234 / E-100 / TK-90.".to_string()
            }
            ApiError::NoCurrentUser => {
                "The token authenticated but resolved to no member. Check the token's owner."
                    .to_string()
            }
            ApiError::Remote { status, .. } if *status >= 500 => {
                "The VersionOne instance reported a server error. Retry in a moment.".to_string()
            }
            ApiError::Remote { .. } => {
                "The query was rejected. Run 'v1 projects configure --auto-detect' if your instance schema differs."
                    .to_string()
            }
            ApiError::InvalidResponse(_) => {
                "The server sent an unexpected payload. Check that V1_URL points at a VersionOne instance."
                    .to_string()
            }
            ApiError::Configuration(_) => {
                "Check the V1_URL and V1_TOKEN environment variables.".to_string()
            }
        }
    }

    /// Whether this error is potentially transient and may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Converts to UNIX sysexits.h-compliant exit code.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::InvalidInput => 64, // EX_USAGE
            ErrorCategory::NotFound => 69,     // EX_UNAVAILABLE
            ErrorCategory::Auth => 77,         // EX_NOPERM
            ErrorCategory::External => 74,     // EX_IOERR
            ErrorCategory::Internal => 74,     // EX_IOERR
            ErrorCategory::Timeout => 75,      // EX_TEMPFAIL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_category_splits_on_status() {
        let client_side = ApiError::Remote {
            status: 400,
            message: "bad filter".into(),
        };
        assert_eq!(client_side.category(), ErrorCategory::InvalidInput);
        assert!(!client_side.is_retryable());

        let server_side = ApiError::Remote {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(server_side.category(), ErrorCategory::External);
        assert!(server_side.is_retryable());
    }

    #[test]
    fn test_auth_exit_code() {
        assert_eq!(ApiError::AuthenticationFailed.exit_code(), 77);
    }

    #[test]
    fn test_not_found_exit_code() {
        assert_eq!(ApiError::NotFound.exit_code(), 69);
        assert_eq!(ApiError::NoCurrentUser.exit_code(), 69);
    }

    #[test]
    fn test_suggestions_are_actionable() {
        assert!(ApiError::AuthenticationFailed.suggestion().contains("V1_TOKEN"));
        assert!(ApiError::NotFound.suggestion().contains("S-1234"));
    }
}
