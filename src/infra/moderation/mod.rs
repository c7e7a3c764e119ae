// Moderation infra layer.
// - `sightengine_client.rs` talks to the Sightengine HTTP API.

#[path = "sightengine_client.rs"]
pub mod sightengine_client;

pub use sightengine_client::{SightengineClient, DEFAULT_API_URL, DEFAULT_MODELS};
