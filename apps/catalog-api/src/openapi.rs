use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Catalog management API: products, categories and users"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/categories", api = domain_categories::handlers::ApiDoc),
        (path = "/products", api = domain_products::handlers::ApiDoc),
        (path = "/users", api = domain_users::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
