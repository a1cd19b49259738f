use crate::client_trait::SpeechClient;
use crate::credentials::CredentialRef;
use speechbuf_core::{ClientError, ConfigError, RecognizeRequest, RecognizerConfig};
use std::fmt;
use std::sync::Arc;

/// Sends raw audio buffers to a speech client and returns the top transcript.
///
/// Cloning is cheap: the configuration and client are shared, and concurrent
/// calls on the same recognizer are independent of each other.
#[derive(Clone)]
pub struct Recognizer {
    config: Arc<RecognizerConfig>,
    credentials: CredentialRef,
    client: Arc<dyn SpeechClient>,
}

impl Recognizer {
    /// Build a recognizer, requiring `GOOGLE_APPLICATION_CREDENTIALS` in the
    /// process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingCredentials`] when the variable is absent, whose
    /// message carries setup instructions for the operator, or
    /// [`ConfigError::Invalid`] when `config` fails validation.
    pub fn new(config: RecognizerConfig, client: Arc<dyn SpeechClient>) -> Result<Self, ConfigError> {
        let credentials = CredentialRef::from_env()?;
        Self::with_credentials(config, credentials, client)
    }

    /// Build a recognizer from an already resolved credential reference.
    pub fn with_credentials(
        config: RecognizerConfig,
        credentials: CredentialRef,
        client: Arc<dyn SpeechClient>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            client = %client.name(),
            sample_rate_hertz = config.sample_rate_hertz,
            encoding = %config.encoding,
            language_code = %config.language_code,
            "recognizer ready"
        );
        Ok(Self {
            config: Arc::new(config),
            credentials,
            client,
        })
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialRef {
        &self.credentials
    }

    /// Transcript of the first alternative of the first result, or an empty
    /// string when the service returned no results.
    ///
    /// Client errors are returned exactly as the client produced them.
    pub async fn recognize(&self, buffer: &[u8]) -> Result<String, ClientError> {
        Ok(self.recognize_transcript(buffer).await?.unwrap_or_default())
    }

    /// Like [`recognize`](Self::recognize), but `None` when the response held
    /// no result or alternative, so silence can be told apart from a
    /// transcript whose text is empty.
    pub async fn recognize_transcript(&self, buffer: &[u8]) -> Result<Option<String>, ClientError> {
        let request = RecognizeRequest::new(&self.config, buffer);
        tracing::debug!(
            client = %self.client.name(),
            bytes = buffer.len(),
            "sending audio for recognition"
        );

        let response = self.client.recognize(&request).await?;
        let transcript = response.top_transcript().map(str::to_owned);

        match &transcript {
            Some(text) => tracing::debug!(chars = text.len(), "transcript received"),
            None => tracing::debug!("no recognition results"),
        }
        Ok(transcript)
    }
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("client", &self.client.name())
            .finish()
    }
}
