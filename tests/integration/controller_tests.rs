//! Controller integration tests.
//!
//! Each test drives a `PaginatedQuery` through a `RestClient` against a
//! wiremock server and checks what was requested and what was published.

use std::sync::Arc;
use std::time::Duration;

use ancine_query::{
    endpoints, ErrorKind, Filters, HttpClient, LocationStore, MemoryCache, MemoryLocation,
    PaginatedQuery, PaginationInfo, QueryOptions, RequestCache, RetryConfig, SortDirection,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{Obra, TestApi, fast, form_a, form_b, obras, wait_for, wait_idle};

#[tokio::test]
async fn test_documentaries_of_2022() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::PRODUCAO_OBRAS))
        .and(query_param_is_missing("work_type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 15, 300, obras("Obra", 15))))
        .expect(1)
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::PRODUCAO_OBRAS))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "15"))
        .and(query_param("work_type", "Documentário"))
        .and(query_param("year", "2022"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(form_a(1, 15, 12, obras("Documentário", 12))),
        )
        .expect(1)
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Obra> = api.query(
        endpoints::PRODUCAO_OBRAS,
        fast(QueryOptions::builder().page_size(15).build()),
    );
    wait_for(&query, |s| s.pagination.total_items == 300).await;

    query.set_filters(
        Filters::new()
            .with("work_type", "Documentário")
            .with("year", 2022),
    );
    let snapshot = wait_for(&query, |s| s.pagination.total_items == 12).await;

    assert_eq!(snapshot.data.len(), 12);
    assert_eq!(snapshot.data[0].titulo, "Documentário 1");
    assert_eq!(
        snapshot.pagination,
        PaginationInfo {
            current_page: 1,
            total_pages: 1,
            total_items: 12,
            page_size: 15
        }
    );
    assert!(!snapshot.is_error());
}

#[tokio::test]
async fn test_direct_pagination_shape() {
    let api = TestApi::start().await;

    let rows: Vec<Value> = ["AC", "AL", "AM"]
        .iter()
        .map(|uf| json!({ "uf": uf, "salas": 10 }))
        .collect();
    Mock::given(method("GET"))
        .and(path(endpoints::SALAS_POR_UF))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_b(1, 10, 27, rows)))
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Value> = api.query(
        endpoints::SALAS_POR_UF,
        fast(QueryOptions::builder().page_size(10).build()),
    );
    let snapshot = wait_for(&query, |s| !s.data.is_empty()).await;

    assert_eq!(snapshot.data[1]["uf"], "AL");
    assert_eq!(
        snapshot.pagination,
        PaginationInfo {
            current_page: 1,
            total_pages: 3,
            total_items: 27,
            page_size: 10
        }
    );
}

#[tokio::test]
async fn test_missing_pagination_falls_back() {
    let api = TestApi::start().await;
    let endpoint = endpoints::data_table("distribuidoras");

    Mock::given(method("GET"))
        .and(path(endpoint.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "nome": "Vitrine" }, { "nome": "Imovision" }, { "nome": "Pandora" }]
        })))
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Value> = api.query(&endpoint, QueryOptions::default());
    let snapshot = wait_for(&query, |s| !s.data.is_empty()).await;

    assert_eq!(snapshot.data.len(), 3);
    assert_eq!(snapshot.pagination, PaginationInfo::fallback(1, 20));
    assert!(!snapshot.is_error());
}

#[tokio::test]
async fn test_server_error_keeps_previous_page() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::LANCAMENTOS))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 60, obras("Lançamento", 20))))
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::LANCAMENTOS))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&api.server)
        .await;

    let client: Arc<dyn HttpClient> = Arc::new(api.rest_client_with(RetryConfig::disabled()));
    let query = PaginatedQuery::<Obra>::builder()
        .endpoint(endpoints::LANCAMENTOS)
        .client(client)
        .build()
        .expect("controller should build");
    let before = wait_for(&query, |s| !s.data.is_empty()).await;

    query.set_page(2);
    let snapshot = wait_for(&query, |s| s.is_error()).await;

    let err = snapshot.error.expect("error should be set");
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(
        err.message(),
        "Erro interno do servidor. Tente novamente em alguns minutos."
    );
    assert_eq!(snapshot.current_page, 2);
    assert_eq!(snapshot.data, before.data);
    assert_eq!(snapshot.pagination, before.pagination);
    assert!(!snapshot.is_loading && !snapshot.is_refetching);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::COMPLEXOS))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::COMPLEXOS))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 1, obras("Complexo", 1))))
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Value> = api.query(endpoints::COMPLEXOS, QueryOptions::default());
    let snapshot = wait_for(&query, |s| !s.data.is_empty()).await;

    assert!(!snapshot.is_error());
    let requests = api.server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_unknown_endpoint_reports_not_found() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Value> = api.query("/estatisticas/inexistente", QueryOptions::default());
    let snapshot = wait_for(&query, |s| s.is_error()).await;

    let err = snapshot.error.expect("error should be set");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().starts_with("Recurso não encontrado"));
    assert!(snapshot.data.is_empty());
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_state_follows_location() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::RANKING_DISTRIBUIDORAS))
        .and(query_param("page", "2"))
        .and(query_param("uf", "SP"))
        .and(query_param("sort_by", "publico"))
        .and(query_param("sort_direction", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(2, 20, 45, obras("Desc", 20))))
        .expect(1)
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::RANKING_DISTRIBUIDORAS))
        .and(query_param("sort_direction", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 45, obras("Asc", 20))))
        .expect(1)
        .mount(&api.server)
        .await;

    let location = Arc::new(MemoryLocation::new(
        "?page=2&uf=SP&sortBy=publico&sortDirection=desc",
    ));
    let client: Arc<dyn HttpClient> = Arc::new(api.rest_client());
    let query = PaginatedQuery::<Obra>::builder()
        .endpoint(endpoints::RANKING_DISTRIBUIDORAS)
        .client(client)
        .location(location.clone())
        .build()
        .expect("controller should build");

    let snapshot = wait_for(&query, |s| !s.data.is_empty()).await;
    assert_eq!(snapshot.data[0].titulo, "Desc 1");
    assert_eq!(snapshot.pagination.current_page, 2);

    query.set_sort("publico", SortDirection::Asc);
    assert_eq!(
        location.query_string(),
        "uf=SP&sortBy=publico&sortDirection=asc"
    );

    let snapshot = wait_for(&query, |s| s.data.first().is_some_and(|o| o.titulo == "Asc 1")).await;
    assert_eq!(snapshot.current_page, 1);
    assert_eq!(location.history_len(), 1);
}

#[tokio::test]
async fn test_typing_issues_one_request() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::OBRAS))
        .and(query_param_is_missing("titulo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 0, Vec::new())))
        .expect(1)
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::OBRAS))
        .and(query_param("titulo", "bac"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 0, Vec::new())))
        .expect(0)
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::OBRAS))
        .and(query_param("titulo", "bacurau"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 1, obras("Bacurau", 1))))
        .expect(1)
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Obra> = api.query(endpoints::OBRAS, fast(QueryOptions::default()));
    wait_idle(&query).await;

    for typed in ["b", "ba", "bac", "bacu", "bacurau"] {
        query.set_filters_debounced(Filters::new().with("titulo", typed));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let snapshot = wait_for(&query, |s| s.data.first().is_some_and(|o| o.titulo == "Bacurau 1")).await;
    assert_eq!(snapshot.pagination.total_items, 1);
}

#[tokio::test]
async fn test_slow_superseded_response_is_ignored() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::LANCAMENTOS_PESQUISA))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 60, obras("Primeira", 20))))
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::LANCAMENTOS_PESQUISA))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(form_a(2, 20, 60, obras("Lenta", 20)))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::LANCAMENTOS_PESQUISA))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(3, 20, 60, obras("Rápida", 20))))
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Obra> = api.query(endpoints::LANCAMENTOS_PESQUISA, QueryOptions::default());
    wait_idle(&query).await;

    query.set_page(2);
    query.set_page(3);
    wait_for(&query, |s| s.data.first().is_some_and(|o| o.titulo == "Rápida 1")).await;

    tokio::time::sleep(Duration::from_millis(600)).await;

    let snapshot = query.snapshot();
    assert_eq!(snapshot.data[0].titulo, "Rápida 1");
    assert_eq!(snapshot.pagination.current_page, 3);
    assert!(!snapshot.is_refetching);
}

#[tokio::test]
async fn test_refetch_goes_to_network() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::DISTRIBUIDORAS))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 2, obras("Distribuidora", 2))))
        .expect(2)
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Obra> = api.query(endpoints::DISTRIBUIDORAS, QueryOptions::default());
    wait_idle(&query).await;

    query.refetch().await.expect("refetch should succeed");
    assert_eq!(query.data().len(), 2);
}

#[tokio::test]
async fn test_shared_cache_avoids_duplicate_requests() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::MARKET_SHARE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "ano": 2023, "participacao": 11.2 }]
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    let client: Arc<dyn HttpClient> = Arc::new(api.rest_client());
    let cache: Arc<dyn RequestCache> = Arc::new(MemoryCache::default());
    let build = || {
        PaginatedQuery::<Value>::builder()
            .endpoint(endpoints::MARKET_SHARE)
            .client(Arc::clone(&client))
            .cache(Arc::clone(&cache))
            .build()
            .expect("controller should build")
    };

    let first = build();
    wait_for(&first, |s| !s.data.is_empty()).await;

    let second = build();
    assert_eq!(second.data(), first.data());
    assert!(!second.is_loading());
}

#[tokio::test]
async fn test_reset_restores_initial_filters() {
    let api = TestApi::start().await;

    for uf in ["RJ", "SP"] {
        Mock::given(method("GET"))
            .and(path(endpoints::PESQUISA_SALAS))
            .and(query_param("uf", uf))
            .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 1, obras(uf, 1))))
            .expect(1)
            .mount(&api.server)
            .await;
    }

    let options = fast(
        QueryOptions::builder()
            .initial_filters(Filters::new().with("uf", "RJ"))
            .build(),
    );
    let query: PaginatedQuery<Obra> = api.query(endpoints::PESQUISA_SALAS, options);
    wait_for(&query, |s| s.data.first().is_some_and(|o| o.titulo == "RJ 1")).await;

    query.set_filters(Filters::new().with("uf", "SP"));
    wait_for(&query, |s| s.data.first().is_some_and(|o| o.titulo == "SP 1")).await;

    query.reset_filters();
    let snapshot = query.snapshot();
    assert_eq!(snapshot.data[0].titulo, "RJ 1");
    assert_eq!(snapshot.filters, Filters::new().with("uf", "RJ"));
    assert!(!snapshot.is_refetching);
}

#[tokio::test]
async fn test_disabled_controller_stays_quiet() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(0)
        .mount(&api.server)
        .await;

    let query: PaginatedQuery<Value> = api.query(
        endpoints::BILHETERIA_ANUAL,
        fast(QueryOptions::builder().enabled(false).build()),
    );
    query.set_filters(Filters::new().with("ano", 2023));
    query.set_page(2);
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!query.is_loading());
    assert!(query.data().is_empty());
}
