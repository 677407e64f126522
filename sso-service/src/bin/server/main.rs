use std::net::SocketAddr;
use std::sync::Arc;

use sso_service::config::Config;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::hashing::Argon2Hasher;
use sso_service::outbound::repositories::SqliteStorage;
use sso_service::outbound::tokens::JwtTokenIssuer;
use sso_service::proto::auth_server::AuthServer;
use sso_service::telemetry;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    telemetry::init(config.env);

    tracing::info!(
        service = "sso-service",
        version = env!("CARGO_PKG_VERSION"),
        env = ?config.env,
        storage_url = %config.storage.url,
        grpc_port = config.grpc.port,
        grpc_timeout_secs = config.grpc.timeout_secs,
        token_ttl_minutes = config.token.ttl_minutes,
        "Configuration loaded"
    );

    let storage = Arc::new(SqliteStorage::connect(&config.storage.url).await?);

    storage.migrate().await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let hasher = Arc::new(Argon2Hasher::from_config(&config.hashing)?);
    let token_issuer = Arc::new(JwtTokenIssuer::new());

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&storage),
        Arc::clone(&storage),
        Arc::clone(&storage),
        hasher,
        token_issuer,
        config.token.ttl(),
    ));

    let grpc_address: SocketAddr = format!("0.0.0.0:{}", config.grpc.port).parse()?;
    let grpc_service = AuthGrpcService::new(auth_service);
    tracing::info!(
        address = %grpc_address,
        port = config.grpc.port,
        protocol = "grpc",
        "gRpc server listening"
    );

    Server::builder()
        .timeout(config.grpc.timeout())
        .add_service(AuthServer::new(grpc_service))
        .serve_with_shutdown(grpc_address, shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::signal;
        use tokio::signal::unix::SignalKind;

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    tracing::info!(signal, "Stopping server");
}
