use thiserror::Error;

/// Operator guidance carried by [`ConfigError::MissingCredentials`].
pub const MISSING_CREDENTIALS_GUIDANCE: &str = "\
Your Google service account key and project environment variables are required.
Create a key within your GCP project: https://console.cloud.google.com/apis/credentials
Then export it so the app can use it, like this:
> export GOOGLE_APPLICATION_CREDENTIALS=[json file]";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("credential reference {var} is not set\n{guidance}")]
    MissingCredentials {
        var: &'static str,
        guidance: &'static str,
    },
}

impl ConfigError {
    pub fn missing_credentials(var: &'static str) -> Self {
        Self::MissingCredentials {
            var,
            guidance: MISSING_CREDENTIALS_GUIDANCE,
        }
    }
}

/// Failures surfaced by a speech client. The recognizer hands these back to
/// its caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("speech request failed: {0}")]
    Transport(String),

    #[error("speech service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("speech service authentication failed: {0}")]
    Auth(String),

    #[error("failed to decode speech response: {0}")]
    Decode(String),

    #[error("speech backend not found: {0}")]
    BackendNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_message_names_variable_and_guidance() {
        let err = ConfigError::missing_credentials("GOOGLE_APPLICATION_CREDENTIALS");
        let msg = err.to_string();
        assert!(msg.contains("GOOGLE_APPLICATION_CREDENTIALS is not set"));
        assert!(msg.contains("console.cloud.google.com/apis/credentials"));
        assert!(msg.lines().count() > 1);
    }

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            status: 403,
            body: "PERMISSION_DENIED".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "speech service returned status 403: PERMISSION_DENIED"
        );
    }
}
