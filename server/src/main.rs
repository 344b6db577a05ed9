use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use clubhouse_server::auth::JwtKeys;
use clubhouse_server::config::Config;
use clubhouse_server::routes::create_routes;
use clubhouse_server::state::AppState;
use clubhouse_server::store::PgStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let store = PgStore::connect(&config.database_url, config.database_max_connections)
        .await
        .expect("Failed to initialise database");

    let state = AppState::new(Arc::new(store), JwtKeys::new(&config.jwt_secret));
    let app = create_routes(state, &config);

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
