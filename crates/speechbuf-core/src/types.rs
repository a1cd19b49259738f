use crate::config::{AudioEncoding, RecognizerConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Body of a `speech:recognize` call. Built per call and dropped afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeRequest {
    pub config: RecognitionConfig,
    pub audio: RecognitionAudio,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecognitionAudio {
    /// Base64 (standard alphabet, padded) audio bytes.
    pub content: String,
}

impl RecognizeRequest {
    pub fn new(config: &RecognizerConfig, audio: &[u8]) -> Self {
        Self {
            config: RecognitionConfig::from(config),
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        }
    }
}

impl From<&RecognizerConfig> for RecognitionConfig {
    fn from(config: &RecognizerConfig) -> Self {
        Self {
            encoding: config.encoding,
            sample_rate_hertz: config.sample_rate_hertz,
            language_code: config.language_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default)]
    pub results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<SpeechRecognitionAlternative>,

    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpeechRecognitionAlternative {
    #[serde(default)]
    pub transcript: String,

    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RecognizeResponse {
    /// Transcript of the first alternative of the first result, if both exist.
    pub fn top_transcript(&self) -> Option<&str> {
        self.results
            .first()
            .and_then(|r| r.alternatives.first())
            .map(|a| a.transcript.as_str())
    }

    /// Response carrying a single result with a single alternative.
    pub fn with_transcript(transcript: impl Into<String>) -> Self {
        Self {
            results: vec![SpeechRecognitionResult {
                alternatives: vec![SpeechRecognitionAlternative {
                    transcript: transcript.into(),
                    confidence: None,
                }],
                language_code: None,
            }],
        }
    }
}
