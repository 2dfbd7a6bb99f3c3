mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Rehydrate the board from the store file before accepting writes.
    let persist_config = services::persistence::PersistConfig::from_env();
    let elements = services::persistence::load_elements(&persist_config.path)
        .await
        .expect("store file load failed");

    let state = state::AppState::new(elements);

    // Spawn background persistence task.
    let _persistence = services::persistence::spawn_persistence_task(state.clone(), persist_config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "whiteboard store listening");
    axum::serve(listener, app).await.expect("server failed");
}
