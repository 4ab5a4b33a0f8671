//! Best-effort cart sync over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use ff_core::{AddToCart, CurrencyCode, ProductId};
use ff_integration_tests::{FakeApi, unreachable_api};
use ff_storefront::{ApiConfig, CartSession, HttpGateway, MemoryStorage, SessionOptions};
use secrecy::SecretString;
use serde_json::json;

fn session(api: &ApiConfig, sync_cart: bool) -> CartSession<MemoryStorage, HttpGateway> {
    CartSession::new(
        MemoryStorage::new(),
        HttpGateway::new(api).unwrap(),
        SessionOptions {
            currency: CurrencyCode::PHP,
            sync_cart,
        },
    )
}

fn anta() -> AddToCart {
    AddToCart::from_listing(
        "anta-whirlwind",
        "Anta Whirlwind",
        "₱4,000.00",
        "https://cdn.example.com/anta.png",
    )
}

#[tokio::test]
async fn test_sync_posts_serialized_cart() {
    let api = FakeApi::start().await.unwrap();
    let session = session(&api.api_config(), true);

    session.add_to_cart(anta()).await.unwrap();

    let carts = api.carts();
    assert_eq!(carts.len(), 1);
    assert_eq!(
        carts[0].body,
        json!({
            "items": [{
                "id": "anta-whirlwind",
                "name": "Anta Whirlwind",
                "priceValue": 4000,
                "priceDisplay": "₱4,000.00",
                "image": "https://cdn.example.com/anta.png",
                "qty": 1
            }]
        })
    );
}

#[tokio::test]
async fn test_fake_api_keeps_serving_across_requests() {
    let api = FakeApi::start().await.unwrap();
    let session = session(&api.api_config(), true);

    for _ in 0..3 {
        session.add_to_cart(anta()).await.unwrap();
    }

    assert!(api.is_serving());
    assert_eq!(api.carts().len(), 3);
}

#[tokio::test]
async fn test_sync_follows_every_change() {
    let api = FakeApi::start().await.unwrap();
    let session = session(&api.api_config(), true);
    let id = ProductId::from("anta-whirlwind");

    session.add_to_cart(anta()).await.unwrap();
    session.add_to_cart(anta()).await.unwrap();
    session.decrement(&id).await.unwrap();
    session.remove(&id).await.unwrap();

    let quantities: Vec<_> = api
        .carts()
        .iter()
        .map(|request| request.body["items"][0]["qty"].clone())
        .collect();
    assert_eq!(quantities, vec![json!(1), json!(2), json!(1), json!(null)]);
    assert_eq!(api.carts()[3].body, json!({ "items": [] }));
}

#[tokio::test]
async fn test_sync_never_sends_credentials() {
    let api = FakeApi::start().await.unwrap();
    let session = session(&api.api_config(), true);
    session
        .credentials()
        .set_token(&SecretString::from("tok-123"))
        .unwrap();

    session.add_to_cart(anta()).await.unwrap();

    assert_eq!(api.carts()[0].authorization, None);
}

#[tokio::test]
async fn test_sync_rejection_keeps_local_cart() {
    let api = FakeApi::start().await.unwrap();
    api.respond_to_cart_with(500);
    let session = session(&api.api_config(), true);

    let view = session.add_to_cart(anta()).await.unwrap();

    assert_eq!(api.carts().len(), 1);
    assert_eq!(view.item_count, 1);
    assert_eq!(view.total_display, "₱4,000.00");
    assert_eq!(session.cart().items.len(), 1);
}

#[tokio::test]
async fn test_unreachable_backend_keeps_local_cart() {
    let session = session(&unreachable_api().unwrap(), true);

    let view = session.add_to_cart(anta()).await.unwrap();

    assert_eq!(view.item_count, 1);
    assert_eq!(session.cart().items.len(), 1);
}

#[tokio::test]
async fn test_sync_disabled_makes_no_requests() {
    let api = FakeApi::start().await.unwrap();
    let session = session(&api.api_config(), false);

    session.add_to_cart(anta()).await.unwrap();
    session.clear().await.unwrap();

    assert!(api.carts().is_empty());
}
