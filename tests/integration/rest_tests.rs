//! REST client integration tests.

use std::sync::Arc;
use std::time::Duration;

use ancine_query::{endpoints, HttpClient, PaginatedQuery, QueryParams, RestClient, RetryConfig};
use serde_json::{Value, json};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{TestApi, form_a, obras, wait_for};

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/producao/obras"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&api.server)
        .await;

    let client = RestClient::builder()
        .base_url(format!("{}/api/v1/", api.server.uri()))
        .expect("base URL should parse")
        .build()
        .expect("client should build");

    let params: QueryParams = [("page", "1")].into_iter().collect();
    let body = client
        .get(endpoints::PRODUCAO_OBRAS, &params)
        .await
        .expect("request should succeed");
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_identifies_itself() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&api.server)
        .await;

    let client = api.rest_client();
    client
        .get(endpoints::OBRAS, &QueryParams::default())
        .await
        .expect("request should succeed");

    let requests = api.server.received_requests().await.unwrap_or_default();
    let user_agent = requests[0]
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(user_agent.starts_with("ancine-query/"));
    assert_eq!(
        requests[0].headers.get("accept").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_retry_after_is_honored() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [1] })))
        .mount(&api.server)
        .await;

    // A long backoff would blow the test timeout if Retry-After were ignored.
    let client = api.rest_client_with(
        RetryConfig::new()
            .with_max_retries(1)
            .with_initial_delay(Duration::from_secs(30))
            .with_max_delay(Duration::from_secs(30))
            .with_jitter(0.0),
    );

    let body = tokio::time::timeout(
        Duration::from_secs(5),
        client.get(endpoints::BILHETERIA_ANUAL, &QueryParams::default()),
    )
    .await
    .expect("retry should not wait for the backoff")
    .expect("second attempt should succeed");
    assert_eq!(body["data"][0], 1);
}

#[tokio::test]
async fn test_body_message_and_code_are_reported() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Ano fora do intervalo disponível.",
            "code": "INVALID_YEAR"
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    let err = api
        .rest_client()
        .get(endpoints::LANCAMENTOS_ESTATISTICAS, &QueryParams::default())
        .await
        .expect_err("422 should fail");

    assert_eq!(err.status_code(), 422);
    assert_eq!(err.message(), "Ano fora do intervalo disponível.");
    assert_eq!(err.code(), Some("INVALID_YEAR"));
    assert!(!err.is_retriable());
}

#[tokio::test]
async fn test_one_client_serves_many_controllers() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(endpoints::LANCAMENTOS_RECENTES))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_a(1, 20, 3, obras("Recente", 3))))
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoints::DESEMPENHO_GENERO_BR))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "genero": "Comédia" }, { "genero": "Drama" }]
        })))
        .mount(&api.server)
        .await;

    let client: Arc<dyn HttpClient> = Arc::new(api.rest_client());
    let recentes = PaginatedQuery::<Value>::builder()
        .endpoint(endpoints::LANCAMENTOS_RECENTES)
        .client(Arc::clone(&client))
        .build()
        .expect("controller should build");
    let generos = PaginatedQuery::<Value>::builder()
        .endpoint(endpoints::DESEMPENHO_GENERO_BR)
        .client(client)
        .build()
        .expect("controller should build");

    let recentes = wait_for(&recentes, |s| !s.data.is_empty()).await;
    let generos = wait_for(&generos, |s| !s.data.is_empty()).await;

    assert_eq!(recentes.pagination.total_items, 3);
    assert_eq!(generos.data.len(), 2);
}
