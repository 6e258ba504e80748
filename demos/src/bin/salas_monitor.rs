//! Watch theater counts per state.
//!
//! Builds a controller that is not bound to a URL, so it refreshes itself
//! in the background, and prints every snapshot it publishes.
//!
//! # Running
//!
//! ```bash
//! export ANCINE_API_BASE_URL="http://localhost:8000/api/v1"
//! cargo run -p ancine-query-demos --bin salas_monitor
//! ```

use std::sync::Arc;
use std::time::Duration;

use ancine_query::prelude::*;
use futures::StreamExt;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = RestClient::builder()
        .base_url(
            std::env::var("ANCINE_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.ancine.gov.br/api/v1".to_string()),
        )?
        .retry_config(RetryConfig::new().with_max_retries(2))
        .build()?;

    let query = PaginatedQuery::<Value>::builder()
        .endpoint(endpoints::SALAS_POR_UF)
        .client(Arc::new(client))
        .options(
            QueryOptions::builder()
                .page_size(27)
                .sync_with_url(false)
                .refetch_interval(Duration::from_secs(30))
                .build(),
        )
        .build()?;

    let mut changes = std::pin::pin!(query.changes().take(20));
    while let Some(snapshot) = changes.next().await {
        if snapshot.is_loading {
            println!("carregando...");
            continue;
        }
        if let Some(err) = &snapshot.error {
            println!("erro: {} (mantendo {} linhas)", err, snapshot.data.len());
            continue;
        }
        if snapshot.is_refetching {
            continue;
        }

        println!("{} UFs", snapshot.pagination.total_items.max(snapshot.data.len() as u64));
        for row in snapshot.data.iter().take(5) {
            println!("  {}", row);
        }
    }

    query.shutdown();
    Ok(())
}
