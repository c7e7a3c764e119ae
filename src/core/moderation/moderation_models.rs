// Moderation domain models - data structures for one proxy invocation.
//
// These are pure domain types with no HTTP dependencies.
// The http layer deserializes into them, the infra layer consumes them.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::Deserialize;
use std::fmt;

use super::moderation_service::ModerationError;

/// Standard alphabet, padding optional. Browsers pad, other clients may not.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// JSON body sent by the website.
///
/// Both fields are optional on the wire; `into_payload` decides which one
/// is meaningful.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSubmission {
    /// Publicly reachable image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Data-URI style upload, e.g. `data:image/jpeg;base64,...`
    #[serde(default)]
    pub image_data: Option<String>,
}

/// A validated submission. Downstream dispatch matches on this exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Upstream fetches the image itself (GET)
    Url(String),
    /// Decoded image bytes to upload (POST multipart)
    Data(Vec<u8>),
}

impl ImageSubmission {
    /// Validate the submission and pick the outbound shape.
    ///
    /// Empty strings count as absent. When both fields are set the URL wins.
    pub fn into_payload(self) -> Result<InboundPayload, ModerationError> {
        if let Some(url) = self.image_url.filter(|u| !u.is_empty()) {
            return Ok(InboundPayload::Url(url));
        }

        if let Some(data) = self.image_data.filter(|d| !d.is_empty()) {
            let bytes = decode_data_uri(&data)?;
            return Ok(InboundPayload::Data(bytes));
        }

        Err(ModerationError::MissingImage)
    }
}

/// Strip the `data:<mime>;base64,` prefix and decode the rest.
///
/// A string without a comma is decoded whole. ASCII whitespace (line-wrapped
/// payloads) is ignored.
pub fn decode_data_uri(data: &str) -> Result<Vec<u8>, ModerationError> {
    let encoded = match data.split_once(',') {
        Some((_prefix, payload)) => payload,
        None => data,
    };

    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    LENIENT_BASE64
        .decode(compact)
        .map_err(|e| ModerationError::InvalidImageData(e.to_string()))
}

/// Credentials for the moderation API. Only ever leaves the process inside
/// an outbound request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub user: String,
    pub secret: String,
}

impl ApiCredentials {
    /// Build credentials only if both values are present and non-empty.
    pub fn from_parts(user: Option<String>, secret: Option<String>) -> Option<Self> {
        match (user, secret) {
            (Some(user), Some(secret)) if !user.is_empty() && !secret.is_empty() => {
                Some(Self { user, secret })
            }
            _ => None,
        }
    }
}

// Keep the secret out of logs even when someone debug-prints the config.
impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("user", &self.user)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Verdict returned by the moderation API, passed through untouched.
pub type ModerationVerdict = serde_json::Value;
