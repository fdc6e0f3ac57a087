use super::health;
use axum::extract::FromRef;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use waitlist_database::Database;

pub fn system_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
    Database: FromRef<S>,
{
    OpenApiRouter::<S>::new().routes(routes!(health::health_handler))
}
