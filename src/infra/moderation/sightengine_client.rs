// =============================================================================
// SIGHTENGINE CLIENT - Image moderation API integration
// =============================================================================
//
// Implements the `ModerationApi` port against Sightengine's check endpoint
// (https://sightengine.com/docs/ai-generated-image-detection).
//
// **Request shapes:**
// - URL check: `GET check.json?models=..&api_user=..&api_secret=..&url=..`
// - Upload: `POST check.json` with a multipart form carrying the same
//   fields plus a binary `media` part named `image.jpg`.
//
// The upstream status code is not interpreted. Sightengine reports its own
// failures inside the JSON body, which is handed back to the caller as-is.

use crate::core::moderation::{ApiCredentials, ModerationApi, ModerationError, ModerationVerdict};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

/// Default public endpoint.
pub const DEFAULT_API_URL: &str = "https://api.sightengine.com/1.0/check.json";

/// Default model list: AI-generated image detection only.
pub const DEFAULT_MODELS: &str = "genai";

const MEDIA_FILE_NAME: &str = "image.jpg";
const MEDIA_MIME: &str = "image/jpeg";

pub struct SightengineClient {
    client: Client,
    api_url: String,
    models: String,
}

impl SightengineClient {
    pub fn new(api_url: impl Into<String>, models: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            models: models.into(),
        }
    }

    /// Multipart body for an upload. Boundary and per-part headers come
    /// from reqwest.
    fn media_form(
        &self,
        credentials: &ApiCredentials,
        media: Vec<u8>,
    ) -> Result<Form, ModerationError> {
        let part = Part::bytes(media)
            .file_name(MEDIA_FILE_NAME)
            .mime_str(MEDIA_MIME)
            .map_err(|e| ModerationError::Upstream(format!("Invalid MIME type: {e}")))?;

        Ok(Form::new()
            .text("models", self.models.clone())
            .text("api_user", credentials.user.clone())
            .text("api_secret", credentials.secret.clone())
            .part("media", part))
    }

    async fn read_verdict(response: Response) -> Result<ModerationVerdict, ModerationError> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Sightengine returned a non-success status");
        }

        response.json::<ModerationVerdict>().await.map_err(|e| {
            ModerationError::Upstream(format!("Invalid JSON from Sightengine: {}", e.without_url()))
        })
    }
}

#[async_trait]
impl ModerationApi for SightengineClient {
    async fn check_url(
        &self,
        credentials: &ApiCredentials,
        image_url: &str,
    ) -> Result<ModerationVerdict, ModerationError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("models", self.models.as_str()),
                ("api_user", credentials.user.as_str()),
                ("api_secret", credentials.secret.as_str()),
                ("url", image_url),
            ])
            .send()
            .await
            .map_err(|e| ModerationError::Upstream(e.without_url().to_string()))?;

        Self::read_verdict(response).await
    }

    async fn check_media(
        &self,
        credentials: &ApiCredentials,
        media: Vec<u8>,
    ) -> Result<ModerationVerdict, ModerationError> {
        let form = self.media_form(credentials, media)?;

        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ModerationError::Upstream(e.without_url().to_string()))?;

        Self::read_verdict(response).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
