use async_trait::async_trait;
use speechbuf_core::{ClientError, RecognizeRequest, RecognizeResponse};

/// Transport to a speech-recognition service.
///
/// Implementations are shared across concurrent calls, so `recognize` takes
/// `&self` and must not rely on per-call mutable state.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    fn name(&self) -> &str;
    async fn recognize(&self, request: &RecognizeRequest) -> Result<RecognizeResponse, ClientError>;
}
