/// Resolves on Ctrl+C or SIGTERM so the server can drain in-flight requests.
///
/// # Panics
///
/// Panics if either signal handler cannot be installed.
pub async fn shutdown_signal(service_name: &str) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };

    tracing::info!(%signal, "{service_name} draining connections before shutdown");
}
