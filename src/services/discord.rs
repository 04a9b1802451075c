use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use crate::error::NotifyError;

/// Delivers a private message to a chat user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: u64, message: &str) -> Result<(), NotifyError>;
}

#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    token: String,
}

impl DiscordClient {
    pub fn new(api_base: String, token: String) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token.trim())
    }

    async fn check(res: Response) -> Result<Response, NotifyError> {
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        Ok(res)
    }

    /// Opens (or reuses) the DM channel with `user_id`.
    pub async fn open_dm(&self, user_id: u64) -> Result<Channel, NotifyError> {
        if !self.has_token() {
            return Err(NotifyError::MissingToken);
        }

        let url = format!("{}/users/@me/channels", self.api_base);
        let res = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&json!({ "recipient_id": user_id.to_string() }))
            .send()
            .await?;

        let res = Self::check(res).await?;
        Ok(res.json::<Channel>().await?)
    }

    pub async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), NotifyError> {
        if !self.has_token() {
            return Err(NotifyError::MissingToken);
        }

        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let res = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&json!({ "content": content }))
            .send()
            .await?;

        Self::check(res).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordClient {
    async fn notify(&self, user_id: u64, message: &str) -> Result<(), NotifyError> {
        let channel = self.open_dm(user_id).await?;
        self.send_message(&channel.id, message).await
    }
}

#[derive(Debug, Deserialize)]
pub struct Channel {
    pub id: String,
}
