pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, AudioEncoding, ClientConfig, GeneralConfig, RecognizerConfig};
pub use error::{ClientError, ConfigError};
pub use types::{
    RecognitionAudio, RecognitionConfig, RecognizeRequest, RecognizeResponse,
    SpeechRecognitionAlternative, SpeechRecognitionResult,
};
