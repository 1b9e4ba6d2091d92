//! Integration tests for the persisted cart over file storage.
//!
//! Every test reopens the storage file through a fresh `AppState`, the way a
//! second CLI invocation would.

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cyberduck_core::{CartLineItem, ValidationError};
use cyberduck_integration_tests::{catalog, test_config};
use cyberduck_storefront::cart::CartUpdated;
use cyberduck_storefront::error::AppError;
use cyberduck_storefront::state::AppState;
use cyberduck_storefront::storage::keys;

const UNUSED_SOURCE: &str = "http://127.0.0.1:9/products";

fn storage_path(dir: &TempDir) -> PathBuf {
    dir.path().join("state/storage.json")
}

fn open(dir: &TempDir) -> AppState {
    let config = test_config(&[UNUSED_SOURCE.to_string()], &storage_path(dir)).unwrap();
    AppState::new(config).unwrap()
}

fn stored_cart(path: &Path) -> Value {
    let file: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    serde_json::from_str(file[keys::CART].as_str().unwrap()).unwrap()
}

#[test]
fn test_cart_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let first = open(&dir);
    first
        .cart()
        .add(CartLineItem::new("Camiseta Roja", "12.500", "url('roja.jpg')", "Algodón"))
        .unwrap();
    first
        .cart()
        .add(CartLineItem::new("Falda Azul", "45.900", "azul.jpg", ""))
        .unwrap();
    drop(first);

    let view = open(&dir).render_cart();
    assert_eq!(view.item_count, 2);
    assert_eq!(view.total, "58.400");
    assert_eq!(view.items[0].image_url, "roja.jpg");
}

#[test]
fn test_cart_blob_format() {
    let dir = TempDir::new().unwrap();
    open(&dir)
        .cart()
        .add(CartLineItem::new("Gorra", "30.000", "gorra.jpg", "Negra"))
        .unwrap();

    assert_eq!(
        stored_cart(&storage_path(&dir)),
        json!([{ "name": "Gorra", "price": "30.000", "image": "gorra.jpg", "desc": "Negra" }])
    );
}

#[test]
fn test_remove_and_clear_persist() {
    let dir = TempDir::new().unwrap();
    let state = open(&dir);
    for name in ["a", "b", "c"] {
        state.cart().add(CartLineItem::new(name, "1.000", "", "")).unwrap();
    }

    assert_eq!(open(&dir).cart().remove_at(1).unwrap().name, "b");
    let names: Vec<_> = state.cart().read().into_iter().map(|i| i.name).collect();
    assert_eq!(names, ["a", "c"]);

    open(&dir).cart().clear().unwrap();
    assert!(state.cart().is_empty());
    assert_eq!(stored_cart(&storage_path(&dir)), json!([]));
}

#[test]
fn test_corrupt_storage_reads_as_empty_cart() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "cyberduck:cart": "[{\"name\": " }"#).unwrap();

    let state = open(&dir);
    assert!(state.render_cart().is_empty());

    state.cart().add(CartLineItem::new("Media", "5.000", "", "")).unwrap();
    assert_eq!(state.cart().len(), 1);
}

#[test]
fn test_unparseable_storage_file_is_replaced_on_write() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();

    let state = open(&dir);
    assert!(state.cart().is_empty());

    state.cart().clear().unwrap();
    assert_eq!(stored_cart(&path), json!([]));

    std::fs::write(&path, "not json").unwrap();
    assert_eq!(
        state.cart().add(CartLineItem::new("Media", "5.000", "", "")).unwrap(),
        1
    );
    assert_eq!(open(&dir).cart().len(), 1);
}

#[test]
fn test_gift_card_flow() {
    let dir = TempDir::new().unwrap();
    let state = open(&dir);
    let mut events = state.cart().subscribe();

    assert_eq!(state.add_gift_card("$ 50.000").unwrap(), 1);
    assert_eq!(events.try_recv().unwrap(), CartUpdated { item_count: 1 });

    let cart = stored_cart(&storage_path(&dir));
    assert_eq!(cart[0]["name"], "Tarjeta de regalo");
    assert_eq!(cart[0]["price"], "50.000");
}

#[test]
fn test_gift_card_below_minimum_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let state = open(&dir);
    state.cart().add(CartLineItem::new("Gorra", "30.000", "", "")).unwrap();
    let before = std::fs::read_to_string(storage_path(&dir)).unwrap();
    let mut events = state.cart().subscribe();

    assert!(matches!(
        state.add_gift_card("5.000"),
        Err(AppError::Validation(ValidationError::BelowMinimum { .. }))
    ));

    assert!(events.try_recv().is_err());
    assert_eq!(std::fs::read_to_string(storage_path(&dir)).unwrap(), before);
}

#[tokio::test]
async fn test_selected_product_added_in_a_later_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog(&[
            json!({ "NAME": "Camiseta Roja", "PRICE": "12.500", "IMAGE": "roja.jpg" }),
            json!({ "NAME": "Camiseta Negra", "PRICE": 13900, "DESCRIPTION": "Talla M" }),
        ])))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let sources = [format!("{}/products", server.uri())];

    let first = AppState::new(test_config(&sources, &storage_path(&dir)).unwrap()).unwrap();
    let selected = first.select_product("camiseta", 1).await.unwrap();
    assert_eq!(selected.name, "Camiseta Negra");
    drop(first);

    let second = open(&dir);
    assert_eq!(second.selected().load(), Some(selected));
    assert_eq!(second.add_selected_to_cart().unwrap(), 1);

    let view = second.render_cart();
    assert_eq!(view.items[0].name, "Camiseta Negra");
    assert_eq!(view.items[0].price, "13.900");
    assert_eq!(view.items[0].desc, "Talla M");
}
