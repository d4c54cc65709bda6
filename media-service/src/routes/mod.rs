use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::options,
    Router,
};
use log::{error, info, warn};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};

use crate::config::MediaConfig;
use crate::error::AppError;
use crate::handlers::{
    media_handlers::{delete_media, list_media, method_not_allowed, preflight, sign_upload},
    MediaState,
};
use crate::provider::{CloudinaryClient, MediaProvider};

/// Creates a router backed by the Cloudinary client
pub fn create_router(config: MediaConfig) -> Router {
    info!("Creating router with Cloudinary client at {}", config.api_base);

    let provider = Arc::new(CloudinaryClient::new(config.api_base.clone()));

    let prefix = config.prefix();
    info!("Using API route prefix: {}", prefix);

    create_router_with_provider(provider, config, prefix)
}

/// Creates a router with a given provider implementation
pub fn create_router_with_provider<P>(provider: Arc<P>, config: MediaConfig, prefix: &str) -> Router
where
    P: MediaProvider + ?Sized + 'static,
{
    let route = config.route.clone();
    info!("Setting up media route '{}' with prefix: '{}'", route, prefix);

    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let state = Arc::new(MediaState { config, provider });

    // One endpoint, multiplexed by method
    let media_routes = Router::new()
        .route(
            &route,
            options(preflight)
                .post(sign_upload::<P>)
                .delete(delete_media::<P>)
                .get(list_media::<P>)
                .fallback(method_not_allowed),
        )
        .with_state(state);

    let routes = if prefix.is_empty() {
        media_routes
    } else {
        Router::new().nest(prefix, media_routes)
    };

    routes
        .fallback(|req: Request| async move {
            warn!("No route matched for: {} {}", req.method(), req.uri());
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({
                    "error": "NotFound",
                    "message": "The requested resource was not found",
                })),
            )
        })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer)
        .layer(middleware::from_fn(logging_middleware))
}

/// Turns a handler panic into the same `{error, message}` body as any other failure.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };
    error!("Handler panicked: {}", detail);
    AppError::internal_server_error(detail).into_response()
}
