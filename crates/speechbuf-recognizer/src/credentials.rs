use speechbuf_core::ConfigError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Path to the service-account key named by [`CREDENTIALS_ENV_VAR`].
///
/// Only presence is checked here; the file is opened by the transport that
/// needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRef {
    path: PathBuf,
}

impl CredentialRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Resolve the reference through `lookup` instead of the process environment.
    /// An empty value counts as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&str) -> Option<OsString>,
    {
        match lookup(CREDENTIALS_ENV_VAR) {
            Some(value) if !value.is_empty() => Ok(Self::new(value)),
            _ => Err(ConfigError::missing_credentials(CREDENTIALS_ENV_VAR)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
