// Core moderation module - contains the proxy's business logic.
// Models are plain data; the service drives one invocation through the API port.

pub mod moderation_models;
pub mod moderation_service;

pub use moderation_models::*;
pub use moderation_service::*;
