use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::Notifier;

/// Posts booking events to the owner's webhook endpoint. The body is
/// signed so the receiver can verify origin: `X-Atendente-Signature`
/// carries base64(HMAC-SHA1(secret, body)).
pub struct WebhookNotifier {
    url: String,
    secret: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, secret: String) -> Self {
        Self {
            url,
            secret,
            client: reqwest::Client::new(),
        }
    }
}

pub fn sign_payload(secret: &str, body: &str) -> Option<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body.as_bytes());
    let result = mac.finalize().into_bytes();
    Some(base64::engine::general_purpose::STANDARD.encode(result))
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &str, payload: &serde_json::Value) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "event": event,
            "payload": payload,
        });
        let body_str = serde_json::to_string(&body)?;

        let signature = sign_payload(&self.secret, &body_str)
            .ok_or_else(|| anyhow::anyhow!("invalid webhook secret"))?;

        self.client
            .post(&self.url)
            .header("content-type", "application/json")
            .header("x-atendente-signature", signature)
            .body(body_str)
            .send()
            .await
            .context("failed to call owner webhook")?
            .error_for_status()
            .context("owner webhook returned error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        let a = sign_payload("secret", r#"{"event":"x"}"#).unwrap();
        let b = sign_payload("secret", r#"{"event":"x"}"#).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_signature_depends_on_secret_and_body() {
        let base = sign_payload("secret", "body").unwrap();
        assert_ne!(base, sign_payload("other", "body").unwrap());
        assert_ne!(base, sign_payload("secret", "different").unwrap());
    }
}
