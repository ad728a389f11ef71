//! # scoop-sms
//!
//! Outbound SMS delivery through the Twilio REST API, and validation of
//! inbound Twilio webhook signatures.

pub mod signature;

use async_trait::async_trait;
use thiserror::Error;

/// SMS delivery errors
#[derive(Debug, Error)]
pub enum SmsError {
    #[error("request to SMS provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("SMS provider rejected the message: {0}")]
    Api(String),
}

/// Sends SMS messages
#[async_trait]
pub trait Messager: Send + Sync {
    /// Send `body` to `number`; returns the provider message id
    async fn send(&self, number: &str, body: &str) -> Result<String, SmsError>;
}

/// Twilio-backed [`Messager`]
#[derive(Debug, Clone)]
pub struct TwilioMessager {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioMessager {
    pub fn new(
        client: reqwest::Client,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client,
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from: from.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl Messager for TwilioMessager {
    async fn send(&self, number: &str, body: &str) -> Result<String, SmsError> {
        let form = [("To", number), ("From", self.from.as_str()), ("Body", body)];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SmsError::Api(format!("{}: {}", status, detail)));
        }

        let payload: serde_json::Value = response.json().await?;
        let sid = payload
            .get("sid")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        tracing::debug!(%sid, "sms dispatched");
        Ok(sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let messager = TwilioMessager::new(
            reqwest::Client::new(),
            "AC00000000000000000000000000000000",
            "token",
            "+14045550000",
        );
        assert_eq!(
            messager.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC00000000000000000000000000000000/Messages.json"
        );
    }
}
