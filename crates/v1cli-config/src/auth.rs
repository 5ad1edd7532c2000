//! Credentials from the environment.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(
        "V1_URL environment variable not set.\n\
         Set it to your VersionOne instance URL, e.g.:\n  \
         export V1_URL='https://www7.v1host.com/MyInstance'"
    )]
    MissingUrl,

    #[error(
        "V1_TOKEN environment variable not set.\n\
         Generate an access token in VersionOne (profile settings > access tokens), then:\n  \
         export V1_TOKEN='your-token-here'"
    )]
    MissingToken,
}

/// Connection settings for a VersionOne instance.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub base_url: String,
    pub token: String,
    pub verify_ssl: bool,
}

impl Credentials {
    /// Reads `V1_URL`, `V1_TOKEN` and `V1_VERIFY_SSL`.
    ///
    /// `V1_VERIFY_SSL=false` (or 0/no/off) disables certificate checks for
    /// instances behind corporate CAs or self-signed certs.
    pub fn from_env() -> Result<Self, AuthError> {
        let base_url = std::env::var("V1_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::MissingUrl)?;
        let token = std::env::var("V1_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            verify_ssl: verify_ssl_from_env(),
        })
    }
}

fn verify_ssl_from_env() -> bool {
    match std::env::var("V1_VERIFY_SSL") {
        Ok(value) => !matches!(
            value.to_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        ),
        Err(_) => true,
    }
}
