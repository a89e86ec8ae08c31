mod auth;
mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use axum::{Router, routing::get};
use config::Config;
use database::db::{create_connection, migrate};
use doc::ApiDoc;
use log::{error, info};
use routes::{health, root};
use state::AppState;
use std::process;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utils::shutdown::shutdown_signal;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {err}");
            process::exit(1);
        }
    };
    error::expose_details(config.expose_error_details);

    let db = create_connection(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    if config.run_migrations {
        migrate(&db).await.expect("Failed to apply migrations");
    }

    let mut oauth2 = <OAuth2ResourceServer>::builder().issuer_url(config.oidc_issuer_url.as_str());
    if let Some(audience) = &config.oidc_audience {
        oauth2 = oauth2.audiences(&[audience.as_str()]);
    }
    let oauth2_resource_server = oauth2
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let state = AppState::new(db);

    let api = routes::api_router()
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let app = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
