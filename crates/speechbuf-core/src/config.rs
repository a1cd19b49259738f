use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_SAMPLE_RATE_HERTZ: u32 = 16000;
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";
pub const DEFAULT_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub recognition: RecognizerConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Audio encodings understood by the recognition service.
///
/// Names are matched case-insensitively, in TOML and on the command line alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    #[default]
    Linear16,
    Flac,
    Mulaw,
    Amr,
    AmrWb,
    OggOpus,
    SpeexWithHeaderByte,
    Mp3,
    WebmOpus,
}

impl AudioEncoding {
    pub const ALL: [AudioEncoding; 9] = [
        AudioEncoding::Linear16,
        AudioEncoding::Flac,
        AudioEncoding::Mulaw,
        AudioEncoding::Amr,
        AudioEncoding::AmrWb,
        AudioEncoding::OggOpus,
        AudioEncoding::SpeexWithHeaderByte,
        AudioEncoding::Mp3,
        AudioEncoding::WebmOpus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Flac => "FLAC",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Amr => "AMR",
            AudioEncoding::AmrWb => "AMR_WB",
            AudioEncoding::OggOpus => "OGG_OPUS",
            AudioEncoding::SpeexWithHeaderByte => "SPEEX_WITH_HEADER_BYTE",
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::WebmOpus => "WEBM_OPUS",
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Invalid(format!("unknown audio encoding: {s}")))
    }
}

impl<'de> Deserialize<'de> for AudioEncoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Recognition settings sent with every request.
///
/// Missing fields fall back to their defaults one by one, so a partial table
/// only overrides what it names. The camelCase names of the service API are accepted
/// as aliases; any other key is rejected.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RecognizerConfig {
    #[serde(default = "default_sample_rate_hertz", alias = "sampleRateHertz")]
    pub sample_rate_hertz: u32,

    #[serde(default)]
    pub encoding: AudioEncoding,

    #[serde(default = "default_language_code", alias = "languageCode")]
    pub language_code: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hertz: default_sample_rate_hertz(),
            encoding: AudioEncoding::default(),
            language_code: default_language_code(),
        }
    }
}

impl RecognizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hertz == 0 {
            return Err(ConfigError::Invalid(
                "sample_rate_hertz must be positive".to_string(),
            ));
        }
        if self.language_code.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "language_code must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout. Unset means the call may wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Bearer token used as-is instead of the service-account exchange.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Reply of the `static` backend.
    #[serde(default)]
    pub transcript: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            endpoint: default_endpoint(),
            timeout_secs: None,
            access_token: None,
            transcript: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sample_rate_hertz() -> u32 {
    DEFAULT_SAMPLE_RATE_HERTZ
}

fn default_language_code() -> String {
    DEFAULT_LANGUAGE_CODE.to_string()
}

fn default_backend() -> String {
    "google".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
/// Full-line `#` comments are left untouched.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ConfigError::Invalid(format!("interpolation pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            continue;
        }
        let mut replaced = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(val) => {
                    replaced = replaced.replace(&cap[0], &val);
                }
                Err(_) => return Err(ConfigError::EnvVarNotFound(var_name.to_string())),
            }
        }
        result.push_str(&replaced);
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        config.recognition.validate()?;
        Ok(config)
    }
}
