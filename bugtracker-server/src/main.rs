use bugtracker_server::export::export_json_lines;
use bugtracker_server::{ServerState, setup_environment};

/// Opens the configured store and streams every ticket, fully loaded, as
/// JSON lines on stdout. Logs go to stderr.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, config, logging)
    let config = setup_environment()?;

    tracing::info!(database = %config.database_path, "Bug tracker store starting...");

    // 2. Open the database and apply migrations
    let state = ServerState::initialize(&config).await?;

    // 3. Stream tickets without materializing them
    let count = export_json_lines(state.pool(), || std::io::stdout().lock()).await?;

    tracing::info!(count, "Tickets exported");
    state.db.pool.close().await;
    Ok(())
}
