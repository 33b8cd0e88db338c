use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calc_progress::{config, db, handlers};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calc_progress=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_path = config::load_database_path();
    let pool = db::init_db(&db_path).expect("Failed to initialize database");

    {
        let conn = pool.lock().expect("Database lock failed during startup");
        db::seed_default_subjects(&conn).expect("Failed to seed subjects");
    }

    let app = handlers::router(pool).layer(TraceLayer::new_for_http());

    let bind_addr = config::server_bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

    tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
