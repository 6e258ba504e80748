//! Browse audiovisual works page by page.
//!
//! Filters `/producao/obras` to documentaries of a given year, then walks
//! the result pages, printing each one.
//!
//! # Running
//!
//! ```bash
//! # Point at a deployment (defaults to the public API)
//! export ANCINE_API_BASE_URL="http://localhost:8000/api/v1"
//!
//! # Optional: request logs
//! export RUST_LOG="ancine_query=debug"
//!
//! cargo run -p ancine-query-demos --bin obras_browser -- 2022
//! ```

use std::env;
use std::sync::Arc;
use std::time::Duration;

use ancine_query::prelude::*;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Obra {
    titulo: String,
    #[serde(default)]
    ano_producao: Option<i64>,
    #[serde(default)]
    pais: Option<String>,
}

/// Waits until the controller has no request in flight.
async fn settled(query: &PaginatedQuery<Obra>) -> QuerySnapshot<Obra> {
    let mut changes = query.subscribe();
    loop {
        changes.borrow_and_update();
        let snapshot = query.snapshot();
        if !snapshot.is_loading && !snapshot.is_refetching {
            return snapshot;
        }
        if changes.changed().await.is_err() {
            return query.snapshot();
        }
    }
}

fn print_page(snapshot: &QuerySnapshot<Obra>) {
    let info = snapshot.pagination;
    println!(
        "\n-- página {}/{} ({} obras) --",
        info.current_page, info.total_pages, info.total_items
    );
    for obra in snapshot.data.iter() {
        println!(
            "  {} ({}, {})",
            obra.titulo,
            obra.ano_producao.map(|a| a.to_string()).unwrap_or_else(|| "?".into()),
            obra.pais.as_deref().unwrap_or("?"),
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let year: i64 = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2022);

    let client = RestClient::from_env()?;
    println!("API: {}", client.base_url());

    let query = PaginatedQuery::<Obra>::builder()
        .endpoint(endpoints::PRODUCAO_OBRAS)
        .client(Arc::new(client))
        .options(
            QueryOptions::builder()
                .page_size(15)
                .initial_sort_column("titulo")
                .build(),
        )
        .build()?;

    query.set_filters(
        Filters::new()
            .with("tipo_obra", "Documentário")
            .with("ano_producao", year),
    );

    // Let the filter debounce fire before waiting on the request.
    tokio::time::sleep(query.options().filter_debounce + Duration::from_millis(50)).await;

    loop {
        let snapshot = settled(&query).await;
        if let Some(err) = &snapshot.error {
            eprintln!("Erro: {}", err);
            break;
        }

        print_page(&snapshot);

        if !snapshot.pagination.has_next_page() || snapshot.current_page >= 3 {
            break;
        }
        query.set_page(snapshot.current_page + 1);
    }

    query.shutdown();
    Ok(())
}
