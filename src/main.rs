mod event;
mod room;
mod session;
mod shared;
mod store;
mod websockets;

use axum::{
    routing::{get, post},
    Router,
};
use shared::AppState;
use std::sync::Arc;
use store::InMemoryGameStore;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchparty=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting drawing-party coordination server");

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let game_store = Arc::new(InMemoryGameStore::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let game_store = Arc::new(store::PostgresGameStore::new(pool));

    let app_state = AppState::new(game_store);

    // build our application
    let app = Router::new()
        .route("/", get(|| async { "sketchparty" }))
        .route("/game", post(room::create_game))
        .route("/game/:room_id/join", post(room::join_game))
        .route("/game/:room_id/ready", post(room::ready_up))
        .route("/ws/:room_id", get(websockets::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
