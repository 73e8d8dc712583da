//! Quill worker supervisor
//!
//! Spawns one API server process per worker slot and restarts any worker
//! that exits, keeping the worker count constant. Each slot gets its own
//! port (base port + slot index) so workers can bind side by side behind a
//! load balancer.

use std::env;
use std::path::PathBuf;

use tokio::process::Command;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_api::supervisor::{Supervisor, SupervisorConfig};

/// Locate the API server binary
///
/// `QUILL_API_BIN` wins when set; otherwise look for a `quill-api` sibling
/// of this executable.
fn api_binary() -> anyhow::Result<PathBuf> {
    if let Ok(path) = env::var("QUILL_API_BIN") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(env::current_exe()?.with_file_name("quill-api"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = SupervisorConfig::from_env()?;
    let binary = api_binary()?;
    let base_port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    tracing::info!(
        workers = config.worker_count,
        binary = %binary.display(),
        base_port,
        "starting supervisor"
    );

    let supervisor = Supervisor::new(config, move |slot| {
        let mut command = Command::new(&binary);
        command.env("PORT", (base_port + slot as u16).to_string());
        command
    });

    supervisor.run().await
}
