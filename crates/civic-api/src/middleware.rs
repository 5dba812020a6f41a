//! HTTP middleware configuration.

use tower_http::cors::CorsLayer;

/// Permissive CORS so browser-based reporting clients can call the API
/// directly during pilots.
pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}
