use crate::auth::{ServiceAccountKey, TokenSource};
use crate::client_trait::SpeechClient;
use crate::credentials::CredentialRef;
use async_trait::async_trait;
use speechbuf_core::{ClientConfig, ClientError, RecognizeRequest, RecognizeResponse};
use std::time::Duration;

/// Google Cloud Speech-to-Text v1 `speech:recognize` over HTTPS.
///
/// One `reqwest::Client` (and its connection pool) is kept for the lifetime of
/// the value and shared by every concurrent call.
pub struct GoogleSpeechClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: TokenSource,
}

impl GoogleSpeechClient {
    pub fn new(
        endpoint: impl Into<String>,
        tokens: TokenSource,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            tokens,
        })
    }

    /// Uses `config.access_token` when set, otherwise the service-account key
    /// at the credential path.
    pub fn from_config(
        config: &ClientConfig,
        credentials: &CredentialRef,
    ) -> Result<Self, ClientError> {
        let tokens = match &config.access_token {
            Some(token) => TokenSource::fixed(token.clone()),
            None => TokenSource::service_account(ServiceAccountKey::from_file(credentials.path())?),
        };
        Self::new(
            config.endpoint.clone(),
            tokens,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpeechClient for GoogleSpeechClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn recognize(&self, request: &RecognizeRequest) -> Result<RecognizeResponse, ClientError> {
        let token = self.tokens.access_token(&self.http).await?;

        tracing::trace!(endpoint = %self.endpoint, "POST speech:recognize");
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "speech service rejected request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
