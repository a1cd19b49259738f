use crate::client_trait::SpeechClient;
use crate::credentials::CredentialRef;
use crate::google_client::GoogleSpeechClient;
use crate::static_client::StaticClient;
use speechbuf_core::{ClientConfig, ClientError};
use std::collections::HashMap;
use std::sync::Arc;

pub type ClientFactory =
    fn(&ClientConfig, &CredentialRef) -> Result<Arc<dyn SpeechClient>, ClientError>;

/// Backend name to client factory, selected by `client.backend`.
pub struct ClientRegistry {
    factories: HashMap<String, ClientFactory>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("google", |config, credentials| {
            Ok(Arc::new(GoogleSpeechClient::from_config(config, credentials)?))
        });
        registry.register("static", |config, _| {
            Ok(Arc::new(StaticClient::new(config.transcript.clone())))
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: ClientFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(
        &self,
        config: &ClientConfig,
        credentials: &CredentialRef,
    ) -> Result<Arc<dyn SpeechClient>, ClientError> {
        let factory = self
            .factories
            .get(&config.backend)
            .ok_or_else(|| ClientError::BackendNotFound(config.backend.clone()))?;
        factory(config, credentials)
    }

    pub fn list_backends(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> CredentialRef {
        CredentialRef::new("/nonexistent/sa.json")
    }

    fn config(backend: &str) -> ClientConfig {
        ClientConfig {
            backend: backend.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_registry_lists_builtin_backends() {
        let registry = ClientRegistry::new();
        let backends = registry.list_backends();
        assert!(backends.contains(&"google"));
        assert!(backends.contains(&"static"));
    }

    #[test]
    fn test_registry_create_static() {
        let registry = ClientRegistry::new();
        let client = registry.create(&config("static"), &creds()).unwrap();
        assert_eq!(client.name(), "static");
    }

    #[test]
    fn test_registry_create_google_with_token() {
        let registry = ClientRegistry::new();
        let mut cfg = config("google");
        cfg.access_token = Some("ya29.token".to_string());
        let client = registry.create(&cfg, &creds()).unwrap();
        assert_eq!(client.name(), "google");
    }

    #[test]
    fn test_registry_create_google_propagates_key_error() {
        let registry = ClientRegistry::new();
        let result = registry.create(&config("google"), &creds());
        assert!(matches!(result, Err(ClientError::Auth(_))));
    }

    #[test]
    fn test_registry_create_unknown_returns_error() {
        let registry = ClientRegistry::new();
        match registry.create(&config("nope"), &creds()) {
            Err(ClientError::BackendNotFound(name)) => assert_eq!(name, "nope"),
            _ => panic!("expected BackendNotFound error"),
        }
    }

    struct CannedClient;

    #[async_trait::async_trait]
    impl SpeechClient for CannedClient {
        fn name(&self) -> &str {
            "canned"
        }

        async fn recognize(
            &self,
            _request: &speechbuf_core::RecognizeRequest,
        ) -> Result<speechbuf_core::RecognizeResponse, ClientError> {
            Ok(speechbuf_core::RecognizeResponse::with_transcript("canned"))
        }
    }

    #[test]
    fn test_registry_register_custom_backend() {
        let mut registry = ClientRegistry::new();
        registry.register("canned", |_, _| Ok(Arc::new(CannedClient)));
        assert!(registry.list_backends().contains(&"canned"));
        let client = registry.create(&config("canned"), &creds()).unwrap();
        assert_eq!(client.name(), "canned");
    }
}
