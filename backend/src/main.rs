use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use lunchbox_backend::rest::{api_router, AppState};
use lunchbox_backend::storage::sqlite::DbConnection;
use lunchbox_backend::Backend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Setting up database");
    let db = DbConnection::init().await?;
    let backend = Backend::new(db);

    let state = AppState {
        cart_service: backend.cart_service,
        custom_meal_service: backend.custom_meal_service,
        checkout_service: backend.checkout_service,
        reorder_service: backend.reorder_service,
        saved_meal_service: backend.saved_meal_service,
    };

    // CORS setup so the web frontend can make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api_router())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
