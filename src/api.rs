use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::media::{Activity, MediaPayload, MediaRecord};
use crate::session::User;

/// Client for the tracker backend. One instance lives for the whole app;
/// the cookie store carries the backend session cookie set by /login.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
}

#[derive(Deserialize)]
struct MediaListResponse {
    media: Vec<MediaRecord>,
}

#[derive(Deserialize)]
struct ActivitiesResponse {
    activities: Vec<Activity>,
}

#[derive(Deserialize)]
struct VerifyResponse {
    is_match: bool,
}

/// Pull the `error` field out of a failure body, falling back to the status line.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => format!("Request failed: {}", status),
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("mita/0.1")
            .cookie_store(true)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api(error_message(status, &body)))
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/register", self.base_url))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        self.check(response).await?;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let response = self
            .client
            .post(format!("{}/login", self.base_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        let response = self.check(response).await?;
        let body: LoginResponse = response.json().await?;
        Ok(body.user)
    }

    /// Full media collection for a user. Views re-fetch on every navigation.
    pub async fn media(&self, username: &str) -> Result<Vec<MediaRecord>> {
        let url = format!("{}/media/{}", self.base_url, urlencoding::encode(username));
        let response = self.client.get(&url).send().await?;
        let response = self.check(response).await?;
        let body: MediaListResponse = response.json().await?;
        debug!(count = body.media.len(), "Fetched media list");
        Ok(body.media)
    }

    pub async fn activities(&self, username: &str, limit: u32) -> Result<Vec<Activity>> {
        let url = format!(
            "{}/activities/{}?limit={}",
            self.base_url,
            urlencoding::encode(username),
            limit
        );
        let response = self.client.get(&url).send().await?;
        let response = self.check(response).await?;
        let body: ActivitiesResponse = response.json().await?;
        Ok(body.activities)
    }

    pub async fn add_media(&self, payload: &MediaPayload) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/media", self.base_url))
            .json(payload)
            .send()
            .await?;

        self.check(response).await?;
        Ok(())
    }

    pub async fn update_media(&self, id: &str, payload: &MediaPayload) -> Result<()> {
        let url = format!("{}/media/{}", self.base_url, urlencoding::encode(id));
        let response = self.client.put(&url).json(payload).send().await?;
        self.check(response).await?;
        Ok(())
    }

    pub async fn delete_media(&self, id: &str) -> Result<()> {
        let url = format!("{}/media/{}", self.base_url, urlencoding::encode(id));
        let response = self.client.delete(&url).send().await?;
        self.check(response).await?;
        Ok(())
    }

    /// Ask the verification endpoint whether `image_url` matches `title`.
    /// Transport failures and rejections both come back as `false`; a
    /// non-match is a normal branch, not an error.
    pub async fn verify_image(&self, title: &str, image_url: &str) -> bool {
        let result = self
            .client
            .post(format!("{}/verify-image", self.base_url))
            .json(&serde_json::json!({
                "title": title,
                "image_url": image_url,
            }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<VerifyResponse>().await {
                    Ok(body) => body.is_match,
                    Err(e) => {
                        warn!("Unreadable verification response: {}", e);
                        false
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "Image verification rejected");
                false
            }
            Err(e) => {
                warn!("Image verification call failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_backend_text() {
        let status = reqwest::StatusCode::UNAUTHORIZED;
        assert_eq!(
            error_message(status, r#"{"error": "Invalid username or password"}"#),
            "Invalid username or password"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let status = reqwest::StatusCode::BAD_GATEWAY;
        assert_eq!(
            error_message(status, "<html>upstream down</html>"),
            "Request failed: 502 Bad Gateway"
        );
    }
}
