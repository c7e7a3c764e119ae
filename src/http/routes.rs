use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    routing::post,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use crate::core::moderation::{ModerationApi, ModerationService, ModerationVerdict};

/// Path the website posts to (Netlify function layout).
pub const FUNCTION_PATH: &str = "/.netlify/functions/analyze";

/// Build the router with the service injected as shared state.
///
/// `body_limit` caps request bodies in bytes; base64 uploads are about a
/// third larger than the image itself.
pub fn router<A>(service: Arc<ModerationService<A>>, body_limit: usize) -> Router
where
    A: ModerationApi + 'static,
{
    Router::new()
        .route(FUNCTION_PATH, post(analyze::<A>))
        .route("/analyze", post(analyze::<A>))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Forward one image to the moderation API.
///
/// The body is taken raw so that malformed JSON and oversized bodies become
/// our own JSON errors instead of the framework's plain-text rejections.
async fn analyze<A>(
    State(service): State<Arc<ModerationService<A>>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ModerationVerdict>, ApiError>
where
    A: ModerationApi + 'static,
{
    let body = body?;
    let verdict = service.analyze(&body).await?;
    tracing::info!("Moderation verdict relayed");
    Ok(Json(verdict))
}
