// HTTP layer - axum routes and error responses.
// This is the only place that knows about status codes.

#[path = "error.rs"]
pub mod error;

#[path = "routes.rs"]
pub mod routes;

pub use routes::router;
