use log::info;

use tezgate::config::Settings;
use tezgate::node::client::TezosClient;
use tezgate::server::{self, AppState};
use tezgate::shutdown::shutdown_signal;
use tezgate::types::GatewayError;

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
  // 1. Initialize logging
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  info!("Gateway starting...");

  // 2. Load configuration
  let settings = Settings::new().map_err(|e| GatewayError::Config(e.to_string()))?;
  info!("Configuration loaded. Node API: {}", settings.node.api);

  // 3. Create node client
  let client = TezosClient::new(settings.node.api.clone());

  // 4. Build the query router
  let state = AppState {
    client,
    max_blocks: settings.query.max_blocks,
    fetch_concurrency: settings.query.fetch_concurrency,
  };
  let app = server::router(state);

  // 5. Serve until shutdown
  let listener = tokio::net::TcpListener::bind(&settings.server.listen).await?;
  info!("Listening on {}", settings.server.listen);
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  info!("Gateway exited cleanly.");
  Ok(())
}
