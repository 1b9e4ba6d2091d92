//! Integration tests for fetching, aggregation and search over HTTP.
//!
//! Product sources are `wiremock` servers; every request goes through the
//! real `reqwest` transport.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cyberduck_integration_tests::{catalog, test_config};
use cyberduck_storefront::error::AppError;
use cyberduck_storefront::fetch::FetchError;
use cyberduck_storefront::search::SearchState;
use cyberduck_storefront::state::AppState;

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(hits)
        .mount(server)
        .await;
}

fn state(server: &MockServer, routes: &[&str], dir: &TempDir) -> AppState {
    let sources: Vec<String> = routes
        .iter()
        .map(|route| format!("{}{route}", server.uri()))
        .collect();
    let config = test_config(&sources, &dir.path().join("storage.json")).unwrap();
    AppState::new(config).unwrap()
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn test_search_across_two_sources() {
    let server = MockServer::start().await;
    mount(&server, "/a", ok(catalog(&[json!({ "name": "Camiseta Roja" })])), 1).await;
    mount(&server, "/b", ok(catalog(&[json!({ "name": "Falda Azul" })])), 1).await;
    let dir = TempDir::new().unwrap();

    let products = state(&server, &["/a", "/b"], &dir)
        .search_now("roja")
        .await
        .unwrap();

    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Camiseta Roja"]);
}

#[tokio::test]
async fn test_repeated_searches_hit_each_source_once() {
    let server = MockServer::start().await;
    mount(&server, "/a", ok(catalog(&[json!({ "name": "Camiseta Roja" })])), 1).await;
    mount(&server, "/b", ok(catalog(&[json!({ "name": "Falda Azul" })])), 1).await;
    let dir = TempDir::new().unwrap();
    let state = state(&server, &["/a", "/b"], &dir);

    state.search_now("roja").await.unwrap();
    state.search_now("azul").await.unwrap();
    let body = state.cached_fetch(&format!("{}/a", server.uri())).await.unwrap();

    assert_eq!(body["data"][0]["name"], "Camiseta Roja");
}

#[tokio::test]
async fn test_failing_source_does_not_hide_the_other() {
    let server = MockServer::start().await;
    mount(&server, "/a", ResponseTemplate::new(500), 1).await;
    mount(&server, "/b", ok(catalog(&[json!({ "name": "Falda Azul" })])), 1).await;
    let dir = TempDir::new().unwrap();

    let products = state(&server, &["/a", "/b"], &dir)
        .search_now("falda")
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Falda Azul");
}

#[tokio::test]
async fn test_failed_fetch_is_retried() {
    let server = MockServer::start().await;
    mount(&server, "/a", ResponseTemplate::new(503), 2).await;
    let dir = TempDir::new().unwrap();
    let state = state(&server, &["/a"], &dir);
    let url = format!("{}/a", server.uri());

    for _ in 0..2 {
        assert!(matches!(
            state.cached_fetch(&url).await,
            Err(FetchError::Status { status: 503, .. })
        ));
    }
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/a",
        ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
        1,
    )
    .await;
    let dir = TempDir::new().unwrap();
    let state = state(&server, &["/a"], &dir);

    assert!(matches!(
        state.cached_fetch(&format!("{}/a", server.uri())).await,
        Err(FetchError::Parse { .. })
    ));
}

#[tokio::test]
async fn test_every_source_down_is_reported() {
    let server = MockServer::start().await;
    mount(&server, "/a", ResponseTemplate::new(500), 1).await;
    mount(&server, "/b", ok(json!({ "items": [] })), 1).await;
    let dir = TempDir::new().unwrap();

    let result = state(&server, &["/a", "/b"], &dir).search_now("roja").await;

    assert!(matches!(result, Err(AppError::SourcesUnavailable(2))));
}

#[tokio::test]
async fn test_debounced_search_issues_one_burst() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/a",
        ok(catalog(&[
            json!({ "title": "Camiseta Roja", "price": 12500 }),
            json!({ "title": "Camisa Blanca", "price": "39.900" }),
        ])),
        1,
    )
    .await;
    let dir = TempDir::new().unwrap();
    let state = state(&server, &["/a"], &dir);
    let controller = state.search();
    let mut updates = controller.subscribe();

    controller.input("cam");
    controller.input("cami");
    controller.input("camis");

    let published = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            updates.changed().await.unwrap();
            let current = updates.borrow_and_update().clone();
            if current != SearchState::Idle {
                return current;
            }
        }
    })
    .await
    .unwrap();

    let SearchState::Ready {
        sequence,
        query,
        products,
    } = published
    else {
        panic!("expected search results");
    };
    assert_eq!(sequence, 1);
    assert_eq!(query, "camis");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price_display(), "12.500");
    assert_eq!(products[1].price_display(), "39.900");
}
