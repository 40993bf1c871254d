use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fertilog::api::{build_router, server, ApiContext};
use fertilog::config::{default_log_filter, AppConfig};
use fertilog::db::sqlite::open_database;
use fertilog::services::extraction::HttpExtractor;
use fertilog::services::identity::HttpTokenVerifier;
use fertilog::services::mailer::HttpMailer;
use fertilog::services::reasoning::HttpReasoner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .init();

    let config = AppConfig::from_env()?;

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Open once at startup so migrations run before the first request.
    open_database(&config.db_path)?;
    tracing::info!(db = %config.db_path.display(), "database ready");

    let timeout = config.service_timeout_secs;
    let ctx = ApiContext::new(
        config.db_path.clone(),
        Arc::new(HttpExtractor::new(
            &config.extraction_url,
            &config.extraction_api_key,
            timeout,
        )),
        Arc::new(HttpReasoner::new(
            &config.reasoning_url,
            &config.reasoning_api_key,
            timeout,
        )),
        Arc::new(HttpTokenVerifier::new(&config.identity_url, timeout)),
        Arc::new(HttpMailer::new(
            &config.mail_url,
            &config.mail_api_key,
            &config.mail_from,
            timeout,
        )),
    );

    let router = build_router(ctx);
    server::serve(router, config.bind_addr).await?;
    Ok(())
}
