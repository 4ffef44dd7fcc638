//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events API",
        version = "0.1.0",
        description = "Create, list, update, delete and filter event records"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    )
)]
struct ApiInfo;

/// Combined OpenAPI documentation; event paths are served at the root
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ApiInfo::openapi().merge_from(domain_events::ApiDoc::openapi())
    }
}
