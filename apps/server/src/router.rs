use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};
use waitlist::kernel::server::ApiState;
use waitlist::registration::Registrations;
use waitlist::server::router::{registration_router, system_router};

#[derive(OpenApi)]
#[openapi(
    info(title = "Waitlist API", description = "Waitlist registration, export and reference data"),
    tags(
        (name = "System", description = "Service health"),
        (name = "Registration", description = "Submitting and listing registrations"),
        (name = "Export", description = "Spreadsheet downloads"),
        (name = "Reference", description = "Form reference data"),
    )
)]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Result<Router> {
    let registrations = state
        .try_get_slice::<Registrations>()
        .context("Registration slice is not registered")?
        .clone();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .merge(registration_router(registrations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/docs", api_doc);

    Ok(Router::new().merge(openapi_routes).merge(scalar_routes))
}
