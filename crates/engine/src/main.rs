//! Mudlink Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mudlink_domain::{registry_key, ServerAddr};
use mudlink_engine::api;
use mudlink_engine::api::directory::PersonDirectory;
use mudlink_engine::app::App;
use mudlink_engine::federation::{naming, Federation, HttpNaming, Naming, PeerClient};
use mudlink_engine::world::server::MudServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mudlink_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mudlink Engine");

    // Load configuration
    let mud_name = std::env::var("MUD_NAME").unwrap_or_else(|_| "Nutshell".into());
    let mud_password = std::env::var("MUD_PASSWORD").unwrap_or_else(|_| "password".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "4000".into())
        .parse()
        .unwrap_or(4000);
    // The address peers and clients use to reach us; what our handles carry.
    let public_addr = ServerAddr::new(
        std::env::var("PUBLIC_ADDR").unwrap_or_else(|_| format!("127.0.0.1:{server_port}")),
    );
    let registry_host = std::env::var("REGISTRY_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let registry_port: u16 = std::env::var("REGISTRY_PORT")
        .unwrap_or_else(|_| naming::DEFAULT_REGISTRY_PORT.to_string())
        .parse()
        .unwrap_or(naming::DEFAULT_REGISTRY_PORT);
    let entrance_name = std::env::var("ENTRANCE_NAME").unwrap_or_else(|_| "Entrance".into());
    let entrance_description = std::env::var("ENTRANCE_DESCRIPTION")
        .unwrap_or_else(|_| "You are standing at the entrance of the MUD.".into());
    let snapshot_file = std::env::var("SNAPSHOT_FILE").ok();
    let rpc_timeout = Duration::from_secs(
        std::env::var("RPC_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .unwrap_or(10),
    );

    // Federation clients: naming registry + peer RPC, one shared timeout.
    let naming_client: Arc<dyn Naming> = Arc::new(HttpNaming::new(registry_port, rpc_timeout)?);
    let peer = Arc::new(PeerClient::new(rpc_timeout)?);
    let federation = Arc::new(Federation::new(Arc::clone(&naming_client), peer));

    // Build the world: restore from a snapshot when one is configured
    // and present, else bootstrap a fresh entrance.
    let server = match snapshot_file.as_deref() {
        Some(path) if tokio::fs::try_exists(path).await.unwrap_or(false) => {
            tracing::info!(path = %path, "restoring world from snapshot");
            let bytes = tokio::fs::read(path).await?;
            let snapshot = serde_json::from_slice(&bytes)?;
            MudServer::restore(snapshot, mud_password, public_addr.clone(), federation)
                .map_err(|f| anyhow::anyhow!("snapshot restore failed: {f}"))?
        }
        _ => MudServer::bootstrap(
            mud_name,
            mud_password,
            public_addr.clone(),
            federation,
            &entrance_name,
            &entrance_description,
        )
        .map_err(|f| anyhow::anyhow!("bootstrap failed: {f}"))?,
    };

    // Publish ourselves on this host's registry. Failure is not fatal:
    // the world still runs, it just cannot be resolved by name until the
    // registry comes back.
    let key = registry_key(server.mud_name());
    if let Err(e) = naming_client.publish(&registry_host, &key, &public_addr).await {
        tracing::warn!(key = %key, error = %e, "naming publish failed, continuing unregistered");
    }

    // Create application
    let directory = Arc::new(PersonDirectory::new(public_addr.clone()));
    let app = Arc::new(App::new(server, directory));

    let router = api::router(app).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!(public_addr = %public_addr, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
