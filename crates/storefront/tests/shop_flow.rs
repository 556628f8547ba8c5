//! End-to-end store orchestration tests against a mocked backend.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use tidemark_core::{PaymentMethod, ToastKind};
use tidemark_storefront::api::types::{Product, Variant};
use tidemark_storefront::api::Services;
use tidemark_storefront::config::{ApiConfig, FallbackMode, StorefrontConfig};
use tidemark_storefront::session::MemoryTokenStore;
use tidemark_storefront::shop::{CheckoutError, PaymentError, ShopStore, TOAST_TTL};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_store(base_url: &str, fallback: FallbackMode) -> ShopStore {
    let config = StorefrontConfig {
        api: ApiConfig {
            base_url: Url::parse(base_url).expect("mock server URI is a valid URL"),
            ..ApiConfig::default()
        },
        fallback,
        ..StorefrontConfig::default()
    };
    let services = Services::new(&config, Arc::new(MemoryTokenStore::new()))
        .expect("client construction should not fail");
    ShopStore::new(services)
}

/// Mount a two-product catalog and one address.
async fn mount_catalog(server: &MockServer) {
    let products = json!([
        {
            "id": "p-a", "name": "Nimbus Runner", "description": "Running sneaker.",
            "category": "Shoes", "image": "https://img/a.jpg", "price": 10,
            "variants": [
                {"id": "v-x", "label": "Black / 40", "stock": 9},
                {"id": "v-zero", "label": "Black / 41", "stock": 0}
            ]
        },
        {
            "id": "p-b", "name": "Terra Bottle", "description": "Insulated bottle.",
            "category": "Accessories", "image": "https://img/b.jpg", "price": 5,
            "variants": [{"id": "v-y", "label": "500ml", "stock": 4}]
        }
    ]);
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&products))
        .mount(server)
        .await;

    let addresses = json!([
        {"id": "addr-1", "label": "Home", "recipient": "Alex Morgan",
         "line1": "112 Cedar St", "city": "Portland", "state": "OR", "zip": "97201"}
    ]);
    Mock::given(method("GET"))
        .and(path("/addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&addresses))
        .mount(server)
        .await;
}

/// Mount success responses for checkout, payment, and order creation.
async fn mount_happy_transaction(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checkoutId": "chk_1"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/payments/initiate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paymentId": "pay_1", "status": "success", "providerRef": "ref_777"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "ord_42",
                "status": "Processing",
                "createdAt": "2026-08-07T10:00:00Z",
                "tracking": ["Order confirmed"],
                "total": "23.20"
            }
        })))
        .mount(server)
        .await;
}

fn first_variant(product: &Product) -> &Variant {
    product
        .variants
        .first()
        .expect("products always have a variant")
}

#[tokio::test]
async fn bootstrap_seeds_products_and_selects_the_first_address() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;

    assert_eq!(store.products().len(), 2);
    assert!(!store.products_loading());
    assert_eq!(store.addresses().len(), 1);
    assert_eq!(
        store.selected_address().expect("default selected").label,
        "Home"
    );
    assert_eq!(store.categories(), vec!["All", "Shoes", "Accessories"]);
}

#[tokio::test]
async fn bootstrap_failure_toasts_and_leaves_state_untouched() {
    let server = MockServer::start().await;
    // No catalog mock: products fail in strict mode

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;

    assert!(store.products().is_empty());
    assert!(store.addresses().is_empty());
    assert!(store.selected_address().is_none());

    let toasts = store.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
}

#[tokio::test]
async fn full_checkout_and_payment_flow() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_happy_transaction(&server).await;

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;

    let products = store.products();
    store.add_to_cart(&products[0], Some(first_variant(&products[0])), 2);
    store.add_to_cart(&products[1], Some(first_variant(&products[1])), 1);

    // {10 x 2} + {5 x 1}: subtotal 25, tax 2.00, shipping 7, total 34.00
    assert_eq!(store.cart_subtotal(), Decimal::new(25, 0));
    assert_eq!(store.cart_tax(), Decimal::new(200, 2));
    assert_eq!(store.cart_total(), Decimal::new(3400, 2));

    let snapshot = store
        .prepare_checkout()
        .await
        .expect("checkout should be accepted");
    assert_eq!(snapshot.address_label, "112 Cedar St, Portland, OR 97201");
    assert_eq!(snapshot.total, Decimal::new(3400, 2));
    assert!(store.checkout_snapshot().is_some());

    let order_id = store
        .start_payment(PaymentMethod::Card)
        .await
        .expect("payment should succeed");
    assert_eq!(order_id.as_str(), "ord_42");

    // Success clears the cart, records the order, and keeps the provider ref
    assert!(store.cart().is_empty());
    assert_eq!(
        store.latest_order().expect("latest order set").id.as_str(),
        "ord_42"
    );
    let payment = store.payment_status();
    assert!(!payment.loading);
    assert_eq!(payment.error, "");
    assert_eq!(payment.provider_ref, "ref_777");

    assert!(
        store
            .toasts()
            .iter()
            .any(|toast| toast.kind == ToastKind::Success
                && toast.message == "Payment successful. Order placed.")
    );
}

#[tokio::test]
async fn add_to_cart_rejects_missing_and_out_of_stock_variants() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;
    let products = store.products();

    store.add_to_cart(&products[0], None, 1);
    assert!(store.cart().is_empty());

    let out_of_stock = products[0]
        .variants
        .iter()
        .find(|v| v.stock == 0)
        .expect("catalog has an out-of-stock variant");
    store.add_to_cart(&products[0], Some(out_of_stock), 1);
    assert!(store.cart().is_empty());

    let toasts = store.toasts();
    assert_eq!(toasts.len(), 2);
    assert!(toasts.iter().all(|t| t.kind == ToastKind::Error));
    assert_eq!(toasts[0].message, "Select a product variant first.");
    assert_eq!(toasts[1].message, "This variant is currently out of stock.");
}

#[tokio::test]
async fn repeated_adds_merge_into_one_line_clamped_to_stock() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;
    let products = store.products();

    // Terra Bottle variant has stock 4; 3 + 3 clamps to 4
    let bottle = &products[1];
    store.add_to_cart(bottle, Some(first_variant(bottle)), 3);
    store.add_to_cart(bottle, Some(first_variant(bottle)), 3);

    let cart = store.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].quantity, 4);
}

#[tokio::test]
async fn prepare_checkout_rejects_an_empty_cart() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;

    let err = store
        .prepare_checkout()
        .await
        .expect_err("empty cart must be rejected");
    assert_eq!(
        err,
        CheckoutError::InvalidCart("Your cart is empty.".to_owned())
    );
    assert!(store.checkout_snapshot().is_none());
}

#[tokio::test]
async fn prepare_checkout_rejects_a_missing_address() {
    let server = MockServer::start().await;

    // Catalog only; address endpoints fail and the profile has no address
    let products = json!([
        {
            "id": "p-a", "name": "Nimbus Runner", "description": "Running sneaker.",
            "category": "Shoes", "image": "", "price": 10,
            "variants": [{"id": "v-x", "label": "Black / 40", "stock": 9}]
        }
    ]);
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&products))
        .mount(&server)
        .await;

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;
    assert!(store.addresses().is_empty());

    let product = store.products().remove(0);
    store.add_to_cart(&product, Some(first_variant(&product)), 1);

    let err = store
        .prepare_checkout()
        .await
        .expect_err("missing address must be rejected");
    assert_eq!(err, CheckoutError::MissingAddress);
    assert_eq!(err.to_string(), "Address is required.");
    assert!(store.checkout_snapshot().is_none());
}

#[tokio::test]
async fn start_payment_requires_a_frozen_checkout() {
    let server = MockServer::start().await;
    let store = test_store(&server.uri(), FallbackMode::Strict);

    let err = store
        .start_payment(PaymentMethod::Card)
        .await
        .expect_err("payment without checkout must fail");
    assert_eq!(err, PaymentError::MissingCheckout);
}

#[tokio::test]
async fn failed_payment_preserves_cart_and_snapshot_for_retry() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checkoutId": "chk_1"})))
        .mount(&server)
        .await;

    // First attempt is declined, the retry succeeds
    Mock::given(method("POST"))
        .and(path("/payments/initiate"))
        .respond_with(
            ResponseTemplate::new(402)
                .set_body_json(json!({"message": "Payment authorization failed. Please retry."})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/payments/initiate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paymentId": "pay_2", "status": "success", "providerRef": "ref_2"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "ord_2", "status": "Processing", "createdAt": "2026-08-07T10:00:00Z"}
        })))
        .mount(&server)
        .await;

    let store = test_store(&server.uri(), FallbackMode::Strict);
    store.bootstrap().await;
    let product = store.products().remove(0);
    store.add_to_cart(&product, Some(first_variant(&product)), 2);
    store
        .prepare_checkout()
        .await
        .expect("checkout should be accepted");

    let err = store
        .start_payment(PaymentMethod::Card)
        .await
        .expect_err("first payment attempt is declined");
    assert_eq!(
        err,
        PaymentError::Failed("Payment authorization failed. Please retry.".to_owned())
    );

    // No order was created; cart and snapshot survive for a retry
    assert!(store.latest_order().is_none());
    assert!(!store.cart().is_empty());
    assert!(store.checkout_snapshot().is_some());
    let payment = store.payment_status();
    assert!(!payment.loading);
    assert_eq!(payment.error, "Payment authorization failed. Please retry.");

    // Retry without redoing checkout
    let order_id = store
        .start_payment(PaymentMethod::Card)
        .await
        .expect("retry should succeed");
    assert_eq!(order_id.as_str(), "ord_2");
    assert!(store.cart().is_empty());
    assert_eq!(store.payment_status().error, "");
}

#[tokio::test(start_paused = true)]
async fn toasts_expire_after_their_ttl() {
    // No backend traffic in this test; the store just needs a base URL
    let store = test_store("http://127.0.0.1:9", FallbackMode::Strict);

    // A guard rejection pushes an error toast without any network traffic
    let product = demo_product();
    store.add_to_cart(&product, None, 1);
    assert_eq!(store.toasts().len(), 1);

    tokio::time::sleep(TOAST_TTL + std::time::Duration::from_millis(100)).await;
    tokio::task::yield_now().await;

    assert!(store.toasts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dismissing_a_toast_cancels_its_expiry_timer() {
    let store = test_store("http://127.0.0.1:9", FallbackMode::Strict);

    let product = demo_product();
    store.add_to_cart(&product, None, 1);
    let toast_id = store.toasts().remove(0).id;

    store.dismiss_toast(&toast_id);
    assert!(store.toasts().is_empty());

    // Advancing past the TTL after dismissal must not panic or double-remove
    tokio::time::sleep(TOAST_TTL + std::time::Duration::from_millis(100)).await;
    tokio::task::yield_now().await;
    assert!(store.toasts().is_empty());
}

fn demo_product() -> Product {
    Product {
        id: tidemark_core::ProductId::new("p-local"),
        name: "Local Widget".to_owned(),
        description: String::new(),
        category: "General".to_owned(),
        image: String::new(),
        price: Decimal::new(5, 0),
        variants: vec![Variant {
            id: tidemark_core::VariantId::new("v-local"),
            label: "Default".to_owned(),
            stock: 3,
        }],
    }
}
