use axum::http::{
    HeaderValue, Method,
    header::{ACCEPT, CONTENT_TYPE, COOKIE},
};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::filter::LevelFilter;

use health_tracker_backend::{AppState, config::Config, db::DBClient, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let connect_options = match SqliteConnectOptions::from_str(&config.database_url) {
        Ok(options) => options.create_if_missing(true),
        Err(err) => {
            tracing::error!("Invalid DATABASE_URL: {:?}", err);
            std::process::exit(1);
        }
    };

    let pool = match SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(connect_options)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    if let Err(err) = db_client.init_schema().await {
        tracing::error!("Failed to initialize the database schema: {:?}", err);
        std::process::exit(1);
    }

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_url.parse::<HeaderValue>().unwrap())
        .allow_headers([ACCEPT, CONTENT_TYPE, COOKIE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST]);

    let app_state = AppState {
        env: Arc::new(config.clone()),
        db_client,
    };

    let app = routes::create_router(app_state).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
