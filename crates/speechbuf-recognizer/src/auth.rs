use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use speechbuf_core::ClientError;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
const EXPIRY_SKEW_SECS: u64 = 60;

#[derive(Deserialize)]
struct ServiceAccountFile {
    #[serde(rename = "type")]
    credential_type: String,
    client_email: String,
    private_key: String,
    #[serde(default)]
    token_uri: Option<String>,
}

/// Service-account key used to mint OAuth access tokens.
pub struct ServiceAccountKey {
    client_email: String,
    token_uri: String,
    signing_key: RsaPrivateKey,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let file: ServiceAccountFile = serde_json::from_str(json)
            .map_err(|e| ClientError::Auth(format!("invalid service account JSON: {e}")))?;
        if file.credential_type != "service_account" {
            return Err(ClientError::Auth(format!(
                "credential type '{}' is not 'service_account'",
                file.credential_type
            )));
        }
        let signing_key = RsaPrivateKey::from_pkcs8_pem(&file.private_key)
            .map_err(|e| ClientError::Auth(format!("invalid private key: {e}")))?;
        Ok(Self {
            client_email: file.client_email,
            token_uri: file
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            signing_key,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Auth(format!(
                "cannot read service account key {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// RS256-signed JWT bearer assertion issued at `issued_at` (unix seconds).
    pub fn signed_assertion(&self, issued_at: u64) -> Result<String, ClientError> {
        let header = serde_json::json!({ "alg": "RS256", "typ": "JWT" });
        let claims = serde_json::json!({
            "iss": self.client_email,
            "scope": SCOPE,
            "aud": self.token_uri,
            "iat": issued_at,
            "exp": issued_at + ASSERTION_LIFETIME_SECS,
        });
        let header = serde_json::to_vec(&header)
            .map_err(|e| ClientError::Auth(format!("jwt header: {e}")))?;
        let claims = serde_json::to_vec(&claims)
            .map_err(|e| ClientError::Auth(format!("jwt claims: {e}")))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        );
        let digest = Sha256::digest(signing_input.as_bytes());
        let signature = self
            .signing_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| ClientError::Auth(format!("failed to sign jwt: {e}")))?;

        Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Where the Google client gets its bearer token from.
pub struct TokenSource {
    kind: TokenKind,
}

enum TokenKind {
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        cache: Mutex<Option<CachedToken>>,
    },
}

impl TokenSource {
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Static(token.into()),
        }
    }

    pub fn service_account(key: ServiceAccountKey) -> Self {
        Self {
            kind: TokenKind::ServiceAccount {
                key,
                cache: Mutex::new(None),
            },
        }
    }

    pub fn is_service_account(&self) -> bool {
        matches!(self.kind, TokenKind::ServiceAccount { .. })
    }

    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, ClientError> {
        match &self.kind {
            TokenKind::Static(token) => Ok(token.clone()),
            TokenKind::ServiceAccount { key, cache } => {
                // Held across the exchange so concurrent callers wait for one token.
                let mut cached = cache.lock().await;
                let now = now_secs();
                if let Some(token) = cached.as_ref() {
                    if token.expires_at.saturating_sub(now) > EXPIRY_SKEW_SECS {
                        return Ok(token.access_token.clone());
                    }
                }

                let token = exchange_assertion(http, key, now).await?;
                let access_token = token.access_token.clone();
                *cached = Some(token);
                Ok(access_token)
            }
        }
    }
}

async fn exchange_assertion(
    http: &reqwest::Client,
    key: &ServiceAccountKey,
    now: u64,
) -> Result<CachedToken, ClientError> {
    let assertion = key.signed_assertion(now)?;
    tracing::debug!(
        client_email = %key.client_email(),
        token_uri = %key.token_uri(),
        "exchanging service account assertion for access token"
    );

    let resp = http
        .post(key.token_uri())
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(ClientError::Auth(format!(
            "token exchange returned {status}: {body}"
        )));
    }

    let token: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| ClientError::Auth(format!("invalid token response: {e}")))?;
    Ok(CachedToken {
        access_token: token.access_token,
        expires_at: now + token.expires_in,
    })
}
