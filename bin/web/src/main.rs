#[cfg(feature = "server")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use reservoir_watch_web::config::ServerConfig;
    use tower_http::services::{ServeDir, ServeFile};
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!(
        site_addr = %config.site_addr,
        site_root = %config.site_root.display(),
        "Loaded configuration"
    );

    // Routing happens in the browser, so unknown paths get the application shell.
    let index = ServeFile::new(config.site_root.join("index.html"));
    let app = Router::new()
        .fallback_service(ServeDir::new(&config.site_root).fallback(index))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.site_addr)
        .await
        .expect("failed to bind to address");
    tracing::info!("listening on http://{}", config.site_addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

#[cfg(feature = "server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[cfg(not(feature = "server"))]
fn main() {
    #[cfg(feature = "csr")]
    reservoir_watch_web::mount();
}
