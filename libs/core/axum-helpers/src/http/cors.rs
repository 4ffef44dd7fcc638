use tower_http::cors::CorsLayer;

/// Any origin, any method, any header.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
