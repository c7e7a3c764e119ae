// Moderation service - core logic for one proxy invocation.
//
// This service handles:
// - Credential checks (fail before touching the request)
// - Body parsing and validation into an `InboundPayload`
// - Dispatch to the moderation API port (URL lookup or upload)
//
// NO HTTP framework dependencies here - the http layer maps errors to statuses.

use super::moderation_models::{ApiCredentials, ImageSubmission, InboundPayload, ModerationVerdict};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("API credentials are not configured")]
    MissingCredentials,

    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("No image URL or data provided")]
    MissingImage,

    #[error("Image data is not valid base64: {0}")]
    InvalidImageData(String),

    #[error("Moderation API call failed: {0}")]
    Upstream(String),
}

impl ModerationError {
    /// Whether the caller sent something unusable (as opposed to a server fault).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ModerationError::MalformedBody(_)
                | ModerationError::MissingImage
                | ModerationError::InvalidImageData(_)
        )
    }
}

// ============================================================================
// MODERATION API TRAIT (PORT)
// ============================================================================

/// Trait for the third-party moderation API.
///
/// Each call issues exactly one outbound request and returns the upstream
/// JSON body as-is.
#[async_trait]
pub trait ModerationApi: Send + Sync {
    /// Ask upstream to fetch and check an image by URL.
    async fn check_url(
        &self,
        credentials: &ApiCredentials,
        image_url: &str,
    ) -> Result<ModerationVerdict, ModerationError>;

    /// Upload raw image bytes for checking.
    async fn check_media(
        &self,
        credentials: &ApiCredentials,
        media: Vec<u8>,
    ) -> Result<ModerationVerdict, ModerationError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Proxy service: validates an invocation and forwards it to the API.
pub struct ModerationService<A: ModerationApi> {
    api: A,
    credentials: Option<ApiCredentials>,
}

impl<A: ModerationApi> ModerationService<A> {
    /// Create a new service. `credentials` is `None` when the deployment is
    /// missing either value; every invocation then fails with a config error.
    pub fn new(api: A, credentials: Option<ApiCredentials>) -> Self {
        Self { api, credentials }
    }

    /// Handle one raw request body end to end.
    ///
    /// Order matters: credentials are checked before the body is even parsed,
    /// so a misconfigured server answers the same way for any input.
    pub async fn analyze(&self, body: &[u8]) -> Result<ModerationVerdict, ModerationError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            tracing::error!("Moderation API credentials are not configured");
            ModerationError::MissingCredentials
        })?;

        let submission: ImageSubmission = serde_json::from_slice(body)
            .map_err(|e| ModerationError::MalformedBody(e.to_string()))?;

        let payload = submission.into_payload()?;
        self.dispatch(credentials, payload).await
    }

    /// Send exactly one request to the API for the given payload.
    async fn dispatch(
        &self,
        credentials: &ApiCredentials,
        payload: InboundPayload,
    ) -> Result<ModerationVerdict, ModerationError> {
        let result = match payload {
            InboundPayload::Url(url) => {
                tracing::debug!(image_url = %url, "Checking image by URL");
                self.api.check_url(credentials, &url).await
            }
            InboundPayload::Data(media) => {
                tracing::debug!(bytes = media.len(), "Checking uploaded image");
                self.api.check_media(credentials, media).await
            }
        };

        if let Err(e) = &result {
            tracing::error!("Error calling moderation API: {}", e);
        }

        result
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Url(String),
        Media(Vec<u8>),
    }

    /// Records every call and answers with a canned result.
    struct MockModerationApi {
        calls: Mutex<Vec<Call>>,
        fail: bool,
    }

    impl MockModerationApi {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self) -> Result<ModerationVerdict, ModerationError> {
            if self.fail {
                Err(ModerationError::Upstream("connection refused".to_string()))
            } else {
                Ok(json!({"status": "success", "type": {"ai_generated": 0.87}}))
            }
        }
    }

    #[async_trait]
    impl ModerationApi for MockModerationApi {
        async fn check_url(
            &self,
            _credentials: &ApiCredentials,
            image_url: &str,
        ) -> Result<ModerationVerdict, ModerationError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Url(image_url.to_string()));
            self.answer()
        }

        async fn check_media(
            &self,
            _credentials: &ApiCredentials,
            media: Vec<u8>,
        ) -> Result<ModerationVerdict, ModerationError> {
            self.calls.lock().unwrap().push(Call::Media(media));
            self.answer()
        }
    }

    fn creds() -> Option<ApiCredentials> {
        Some(ApiCredentials {
            user: "user".to_string(),
            secret: "secret".to_string(),
        })
    }

    #[tokio::test]
    async fn test_url_request_dispatches_url_check() {
        let service = ModerationService::new(MockModerationApi::new(), creds());

        let verdict = service
            .analyze(br#"{"imageUrl":"https://example.com/dog.jpg"}"#)
            .await
            .unwrap();

        assert_eq!(verdict["type"]["ai_generated"], json!(0.87));
        assert_eq!(
            service.api.calls(),
            vec![Call::Url("https://example.com/dog.jpg".to_string())]
        );
    }

    #[tokio::test]
    async fn test_data_request_dispatches_decoded_bytes() {
        let service = ModerationService::new(MockModerationApi::new(), creds());

        service
            .analyze(br#"{"imageData":"data:image/jpeg;base64,aGVsbG8="}"#)
            .await
            .unwrap();

        assert_eq!(service.api.calls(), vec![Call::Media(b"hello".to_vec())]);
    }

    #[tokio::test]
    async fn test_missing_input_makes_no_call() {
        let service = ModerationService::new(MockModerationApi::new(), creds());

        let err = service.analyze(b"{}").await.unwrap_err();

        assert!(matches!(err, ModerationError::MissingImage));
        assert!(err.is_caller_error());
        assert!(service.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuits_any_input() {
        let service = ModerationService::new(MockModerationApi::new(), None);

        for body in [
            &br#"{"imageUrl":"https://example.com/a.png"}"#[..],
            &br#"{"imageData":"data:x;base64,AAAA"}"#[..],
            &b"{}"[..],
            &b"not json"[..],
        ] {
            let err = service.analyze(body).await.unwrap_err();
            assert!(matches!(err, ModerationError::MissingCredentials));
            assert!(!err.is_caller_error());
        }

        assert!(service.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_caller_error() {
        let service = ModerationService::new(MockModerationApi::new(), creds());

        let err = service.analyze(b"{imageUrl:").await.unwrap_err();

        assert!(matches!(err, ModerationError::MalformedBody(_)));
        assert!(err.is_caller_error());
        assert!(service.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_base64_makes_no_call() {
        let service = ModerationService::new(MockModerationApi::new(), creds());

        let err = service
            .analyze(br#"{"imageData":"data:image/png;base64,@@@"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, ModerationError::InvalidImageData(_)));
        assert!(service.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_server_error() {
        let service = ModerationService::new(MockModerationApi::failing(), creds());

        let err = service
            .analyze(br#"{"imageUrl":"https://example.com/a.png"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, ModerationError::Upstream(_)));
        assert!(!err.is_caller_error());
        assert_eq!(service.api.calls().len(), 1);
    }
}
