pub mod handlers;

use crate::core::registry::Registry;
use crate::core::ConfigProvider;
use crate::utils::error::{ClinicError, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use handlers::*;
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// `*` anywhere in the list allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ClinicError::InvalidConfigValueError {
                field: "server.cors_origins".to_string(),
                value: origin.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Create the HTTP router with all registry routes
pub fn create_router(registry: Arc<Registry>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/add", post(add_doctor))
        .route("/remove", delete(remove_doctor))
        .route("/edit", put(edit_doctor))
        .route("/specialty/:specialty", get(doctors_by_specialty))
        .route("/patient/:surname", get(doctors_by_patient))
        .route("/office/:room", get(doctors_by_office))
        .route("/offices/:specialty", get(offices_by_specialty))
        .route("/top-specialties", get(top_specialties))
        .route("/top-doctors", get(top_doctors))
        .route("/least-busy", get(least_busy))
        .route("/db", get(get_db).post(set_db))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(registry)
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_server<C: ConfigProvider>(registry: Arc<Registry>, config: &C) -> anyhow::Result<()> {
    let cors = cors_layer(config.cors_origins())?;
    let app = create_router(registry, cors);

    let addr: SocketAddr = format!("{}:{}", config.host(), config.port())
        .parse()
        .map_err(|e| ClinicError::InvalidConfigValueError {
            field: "server.host".to_string(),
            value: config.host().to_string(),
            reason: format!("{}", e),
        })?;

    tracing::info!("🚀 Clinic registry listening on http://{}", addr);
    tracing::info!("📁 Catalog file: {}", config.storage_path());

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
