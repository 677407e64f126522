#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use sso_service::config::Config;
use sso_service::domain::auth::models::App;
use sso_service::domain::auth::models::AppId;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::hashing::Argon2Hasher;
use sso_service::outbound::repositories::InMemoryStorage;
use sso_service::outbound::repositories::SqliteStorage;
use sso_service::outbound::tokens::JwtTokenIssuer;
use sso_service::proto::auth_client::AuthClient;
use sso_service::proto::auth_server::AuthServer;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Channel;
use tonic::transport::Server;

pub const TEST_APP_ID: i32 = 1;
pub const TEST_APP_SECRET: &str = "test-secret";

pub type InMemoryAuthService =
    AuthService<InMemoryStorage, InMemoryStorage, InMemoryStorage, Argon2Hasher, JwtTokenIssuer>;

pub type SqliteAuthService =
    AuthService<SqliteStorage, SqliteStorage, SqliteStorage, Argon2Hasher, JwtTokenIssuer>;

/// Configuration shipped for tests (cheap hashing, in-memory SQLite)
pub fn test_config() -> Config {
    Config::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/local_tests.toml"))
        .expect("Failed to load test config")
}

pub fn test_app() -> App {
    App {
        id: AppId(TEST_APP_ID),
        name: "test".to_string(),
        secret: TEST_APP_SECRET.to_string(),
    }
}

fn hasher(config: &Config) -> Arc<Argon2Hasher> {
    Arc::new(Argon2Hasher::from_config(&config.hashing).expect("Failed to build hasher"))
}

/// Auth service over an in-memory store seeded with the test application
pub async fn in_memory_service() -> (Arc<InMemoryStorage>, Arc<InMemoryAuthService>) {
    let config = test_config();
    let storage = Arc::new(InMemoryStorage::new());
    storage.insert_app(test_app()).await;

    let service = Arc::new(AuthService::new(
        Arc::clone(&storage),
        Arc::clone(&storage),
        Arc::clone(&storage),
        hasher(&config),
        Arc::new(JwtTokenIssuer::new()),
        config.token.ttl(),
    ));

    (storage, service)
}

/// Migrated in-memory SQLite storage seeded with the test application
pub async fn sqlite_storage() -> Arc<SqliteStorage> {
    let storage = SqliteStorage::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    storage.migrate().await.expect("Failed to run migrations");
    storage
        .insert_app(&test_app())
        .await
        .expect("Failed to insert test app");

    Arc::new(storage)
}

/// Auth service over a migrated in-memory SQLite database
pub async fn sqlite_service() -> (Arc<SqliteStorage>, Arc<SqliteAuthService>) {
    let config = test_config();
    let storage = sqlite_storage().await;

    let service = Arc::new(AuthService::new(
        Arc::clone(&storage),
        Arc::clone(&storage),
        Arc::clone(&storage),
        hasher(&config),
        Arc::new(JwtTokenIssuer::new()),
        config.token.ttl(),
    ));

    (storage, service)
}

/// Test server that runs the gRPC adapter on an ephemeral port
pub struct TestServer {
    pub address: SocketAddr,
    pub storage: Arc<InMemoryStorage>,
    pub client: AuthClient<Channel>,
}

impl TestServer {
    /// Spawn the server in a background task and connect a client to it
    pub async fn spawn() -> Self {
        let (storage, service) = in_memory_service().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = listener.local_addr().expect("Failed to read local address");

        let grpc_service = AuthGrpcService::new(service);
        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthServer::new(grpc_service))
                .serve_with_incoming(TcpListenerStream::new(listener))
                .await
                .expect("Server error");
        });

        let client = AuthClient::connect(format!("http://{}", address))
            .await
            .expect("Failed to connect gRPC client");

        Self {
            address,
            storage,
            client,
        }
    }
}
