pub mod auth;
pub mod client_trait;
pub mod credentials;
pub mod google_client;
pub mod recognizer;
pub mod registry;
pub mod static_client;

pub use auth::{ServiceAccountKey, TokenSource};
pub use client_trait::SpeechClient;
pub use credentials::{CredentialRef, CREDENTIALS_ENV_VAR};
pub use google_client::GoogleSpeechClient;
pub use recognizer::Recognizer;
pub use registry::ClientRegistry;
pub use static_client::StaticClient;
