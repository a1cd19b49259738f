use crate::client_trait::SpeechClient;
use async_trait::async_trait;
use speechbuf_core::{ClientError, RecognizeRequest, RecognizeResponse};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Offline client that answers every request with the same response.
pub struct StaticClient {
    response: RecognizeResponse,
    call_count: AtomicUsize,
}

impl StaticClient {
    /// `None` answers with an empty result list.
    pub fn new(transcript: Option<String>) -> Self {
        Self {
            response: transcript
                .map(RecognizeResponse::with_transcript)
                .unwrap_or_default(),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for StaticClient {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SpeechClient for StaticClient {
    fn name(&self) -> &str {
        "static"
    }

    async fn recognize(&self, request: &RecognizeRequest) -> Result<RecognizeResponse, ClientError> {
        let count = self.call_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(
            "StaticClient call #{count}, {} base64 chars",
            request.audio.content.len()
        );
        Ok(self.response.clone())
    }
}
