mod app;
mod command;
mod config;
mod telemetry;

use std::sync::Arc;

use rag_api_client::RagApiClient;
use tracing::info;

use crate::{app::App, config::AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine for a client; a malformed one is not.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    telemetry::init()?;

    let cfg = AppConfig::from_env()?;
    chat_view::set_color(!cfg.no_color);
    info!(base_url = %cfg.api.base_url, timeout_secs = ?cfg.api.timeout_secs, "starting");

    let api = RagApiClient::new(cfg.api)?;
    App::new(Arc::new(api)).run().await
}
