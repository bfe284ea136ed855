use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{json, Value};
use storefront_client::ClientOptions;
use storefront_core::Environment;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::cart::cart_id_from_headers;
use super::*;

fn test_config() -> AppConfig {
    AppConfig {
        store_domain: "shop.example.com".to_string(),
        api_token: "test-token".to_string(),
        api_version: "2024-10".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        request_timeout_secs: 5,
        user_agent: "storefront-test/0.1".to_string(),
        max_retries: 0,
        retry_backoff_base_ms: 0,
        page_size: 12,
        cart_endpoint: "http://127.0.0.1:3000/cart".to_string(),
        state_dir: PathBuf::from("./.storefront"),
        home_collection: "frontpage".to_string(),
        home_module_type: "home_module".to_string(),
    }
}

fn test_app(server: &MockServer) -> Router {
    let options = ClientOptions {
        timeout_secs: 5,
        user_agent: "storefront-test/0.1".to_owned(),
        max_retries: 0,
        backoff_base_ms: 0,
    };
    let client = StorefrontClient::with_endpoint(
        &format!("{}/api/2024-10/graphql.json", server.uri()),
        "test-token",
        &options,
    )
    .expect("client");
    build_app(AppState {
        client: Arc::new(client),
        config: Arc::new(test_config()),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, headers, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_form(body: String, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/cart")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).expect("request")
}

fn form_body(action: &str, inputs: &str) -> String {
    let inputs: String = inputs
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect();
    format!("action={action}&inputs={inputs}")
}

fn money(amount: &str) -> Value {
    json!({ "amount": amount, "currencyCode": "USD" })
}

fn product_card(id: u32, handle: &str, min: &str, max: &str, children: Option<&str>) -> Value {
    let metafields = match children {
        Some(list) => json!([
            { "namespace": "custom", "key": "grouped_product", "value": "true", "type": "boolean" },
            { "namespace": "custom", "key": "grouped_products", "value": list, "type": "list.product_reference" }
        ]),
        None => json!([null, null]),
    };
    json!({
        "id": format!("gid://shopify/Product/{id}"),
        "title": handle,
        "handle": handle,
        "priceRange": { "minVariantPrice": money(min), "maxVariantPrice": money(max) },
        "featuredImage": null,
        "metafields": metafields
    })
}

fn collection_body(handle: &str, products: Value, has_next_page: bool) -> Value {
    let end_cursor = if has_next_page {
        json!("cursor-2")
    } else {
        Value::Null
    };
    json!({
        "data": { "collection": {
            "id": "gid://shopify/Collection/1",
            "handle": handle,
            "title": "Balms",
            "description": "All balms",
            "image": null,
            "products": {
                "nodes": products,
                "pageInfo": {
                    "hasNextPage": has_next_page,
                    "endCursor": end_cursor
                }
            }
        }}
    })
}

fn variant(id: &str, color: &str, size: &str) -> Value {
    json!({
        "id": id,
        "title": format!("{color} / {size}"),
        "availableForSale": true,
        "selectedOptions": [
            { "name": "Color", "value": color },
            { "name": "Size", "value": size }
        ],
        "price": money("6.00")
    })
}

fn cart_body(field: &str, cart_id: &str, quantity: u32) -> Value {
    let cart = json!({
        "id": cart_id,
        "checkoutUrl": "https://shop.example.com/checkout",
        "totalQuantity": quantity,
        "cost": { "subtotalAmount": money("12.00") },
        "lines": { "nodes": [{
            "id": "gid://shopify/CartLine/1",
            "quantity": quantity,
            "merchandise": { "id": "gid://shopify/ProductVariant/11" },
            "cost": { "totalAmount": money("12.00") }
        }]}
    });
    let mut data = serde_json::Map::new();
    data.insert(field.to_owned(), json!({ "cart": cart, "userErrors": [] }));
    json!({ "data": data })
}

#[tokio::test]
async fn health_returns_ok_with_request_id() {
    let server = MockServer::start().await;
    let (status, headers, json) = send(test_app(&server), get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(
        headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        json["meta"]["request_id"].as_str()
    );
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("bad_request", StatusCode::BAD_REQUEST),
        ("validation_error", StatusCode::BAD_REQUEST),
        ("upstream_error", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), expected, "code {code}");
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    }
}

#[test]
fn cart_cookie_is_read_among_other_cookies() {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; cart=gid://shopify/Cart/c1; currency=USD"),
    );
    assert_eq!(
        cart_id_from_headers(&headers).as_deref(),
        Some("gid://shopify/Cart/c1")
    );

    headers.insert(header::COOKIE, HeaderValue::from_static("carts=x; cart="));
    assert_eq!(cart_id_from_headers(&headers), None);
}

#[tokio::test]
async fn collection_is_priced_and_paginated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Collection"))
        .and(body_partial_json(json!({
            "variables": {
                "handle": "balms",
                "first": 12,
                "sortKey": "PRICE",
                "reverse": false,
                "filters": [{ "variantOption": { "name": "Color", "value": "Red" } }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection_body(
            "balms",
            json!([
                product_card(1, "kit", "0.00", "0.00", Some("[\"gid://shopify/Product/2\",\"gid://shopify/Product/3\"]")),
                product_card(4, "cherry", "4.00", "6.00", None)
            ]),
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("query ProductPrices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "nodes": [
                { "id": "gid://shopify/Product/2",
                  "priceRange": { "minVariantPrice": money("5.00"), "maxVariantPrice": money("5.00") } },
                { "id": "gid://shopify/Product/3",
                  "priceRange": { "minVariantPrice": money("12.00"), "maxVariantPrice": money("12.00") } }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, headers, json) = send(
        test_app(&server),
        get("/api/v1/collections/balms?filter.Color=Red&sort=price-low-high&utm=x"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("public")));

    let data = &json["data"];
    assert_eq!(data["handle"], "balms");
    assert_eq!(data["sort"], "price-low-high");

    let kit = &data["products"][0];
    assert_eq!(kit["handle"], "kit");
    assert_eq!(kit["price"]["kind"], "range");
    assert_eq!(kit["price"]["min"]["amount"], "5.00");
    assert_eq!(kit["price"]["max"]["amount"], "12.00");

    let cherry = &data["products"][1];
    assert_eq!(cherry["price"]["kind"], "single");
    assert_eq!(cherry["price"]["price"]["amount"], "4.00");

    assert_eq!(
        data["next_page"],
        json!([["filter.Color", "Red"], ["sort", "price-low-high"], ["after", "cursor-2"]])
    );
}

#[tokio::test]
async fn missing_collection_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "collection": null } })))
        .mount(&server)
        .await;

    let (status, _, json) = send(test_app(&server), get("/api/v1/collections/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, _, json) = send(test_app(&server), get("/api/v1/pages/about")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "upstream_error");
}

#[tokio::test]
async fn product_page_filters_variants_and_degrades_recommendations() {
    let server = MockServer::start().await;
    let mut product = product_card(7, "lip-tint", "6.00", "6.00", None);
    product["descriptionHtml"] = json!("<p>Tint</p>");
    product["variants"] = json!({ "nodes": [
        variant("v1", "Blue", "S"),
        variant("v2", "Red", "S"),
        variant("v3", "Red", "L")
    ]});
    Mock::given(method("POST"))
        .and(body_string_contains("query Product("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": product } })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Recommendations"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, json) = send(
        test_app(&server),
        get("/api/v1/products/lip-tint?option.Color=Red&variant=v1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["product"]["handle"], "lip-tint");
    assert_eq!(data["product"]["price"]["kind"], "single");
    assert_eq!(data["summary"]["id"], "gid://shopify/Product/7");
    assert_eq!(data["visible_variant_ids"], json!(["v2", "v3"]));
    assert_eq!(data["selected_variant"]["id"], "v2");
    assert_eq!(data["options"][0]["name"], "Color");
    assert_eq!(data["options"][0]["values"], json!(["Blue", "Red"]));
    assert_eq!(data["recommendations"], json!([]));
    assert_eq!(data["available"], true);
}

#[tokio::test]
async fn sold_out_product_is_marked_unavailable() {
    let server = MockServer::start().await;
    let mut sold_out = variant("v1", "Red", "S");
    sold_out["availableForSale"] = json!(false);
    let mut product = product_card(9, "lip-mask", "6.00", "6.00", None);
    product["variants"] = json!({ "nodes": [sold_out] });
    Mock::given(method("POST"))
        .and(body_string_contains("query Product("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": product } })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productRecommendations": [] }
        })))
        .mount(&server)
        .await;

    let (status, _, json) = send(test_app(&server), get("/api/v1/products/lip-mask")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["available"], false);
    assert_eq!(json["data"]["visible_variant_ids"], json!(["v1"]));
}

#[tokio::test]
async fn product_page_includes_recommendations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Product("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "product": product_card(7, "lip-tint", "6.00", "6.00", None) }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Recommendations"))
        .and(body_partial_json(json!({ "variables": { "productId": "gid://shopify/Product/7" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productRecommendations": [product_card(8, "lip-oil", "9.00", "9.00", None)] }
        })))
        .mount(&server)
        .await;

    let (status, _, json) = send(test_app(&server), get("/api/v1/products/lip-tint")).await;

    assert_eq!(status, StatusCode::OK);
    let recommendations = json["data"]["recommendations"].as_array().expect("array");
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0]["handle"], "lip-oil");
    assert!(json["data"]["selected_variant"].is_null());
}

#[tokio::test]
async fn homepage_survives_failed_modules() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Collection"))
        .and(body_partial_json(json!({ "variables": { "handle": "frontpage" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection_body(
            "frontpage",
            json!([product_card(4, "cherry", "4.00", "4.00", None)]),
            false,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Metaobjects"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, _, json) = send(test_app(&server), get("/api/v1/home")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["featured"]["handle"], "frontpage");
    assert!(json["data"]["featured"]["next_page"].is_null());
    assert_eq!(json["data"]["modules"], json!([]));
}

#[tokio::test]
async fn homepage_includes_modules() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Collection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection_body(
            "frontpage",
            json!([]),
            false,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("query Metaobjects"))
        .and(body_partial_json(json!({ "variables": { "type": "home_module" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "metaobjects": { "nodes": [{
                "id": "gid://shopify/Metaobject/1",
                "handle": "hero",
                "type": "home_module",
                "fields": [
                    { "key": "heading", "value": "Summer balms" },
                    { "key": "link", "value": null }
                ]
            }]}}
        })))
        .mount(&server)
        .await;

    let (status, _, json) = send(test_app(&server), get("/api/v1/home")).await;

    assert_eq!(status, StatusCode::OK);
    let module = &json["data"]["modules"][0];
    assert_eq!(module["handle"], "hero");
    assert_eq!(module["fields"]["heading"], "Summer balms");
}

#[tokio::test]
async fn missing_page_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "page": null } })))
        .mount(&server)
        .await;

    let (status, _, _) = send(test_app(&server), get("/api/v1/pages/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn first_add_creates_cart_and_sets_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("mutation CartCreate"))
        .and(body_partial_json(json!({
            "variables": { "input": { "lines": [
                { "merchandiseId": "gid://shopify/ProductVariant/11", "quantity": 2 }
            ]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(
            "cartCreate",
            "gid://shopify/Cart/new",
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let body = form_body(
        "LinesAdd",
        r#"{"lines":[{"merchandiseId":"gid://shopify/ProductVariant/11","quantity":2}]}"#,
    );
    let (status, headers, json) = send(test_app(&server), post_form(body, None)).await;

    assert_eq!(status, StatusCode::OK);
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(cookie.starts_with("cart=gid://shopify/Cart/new;"));
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    assert_eq!(json["data"]["id"], "gid://shopify/Cart/new");
    assert_eq!(json["data"]["total_quantity"], 2);
    assert_eq!(json["data"]["lines"][0]["variant_id"], "gid://shopify/ProductVariant/11");
}

#[tokio::test]
async fn update_uses_cart_from_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("mutation CartLinesUpdate"))
        .and(body_partial_json(json!({
            "variables": {
                "cartId": "gid://shopify/Cart/c1",
                "lines": [{ "id": "gid://shopify/CartLine/1", "quantity": 3 }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(
            "cartLinesUpdate",
            "gid://shopify/Cart/c1",
            3,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let body = form_body(
        "LinesUpdate",
        r#"{"lines":[{"id":"gid://shopify/CartLine/1","quantity":3}]}"#,
    );
    let (status, _, json) = send(
        test_app(&server),
        post_form(body, Some("cart=gid://shopify/Cart/c1")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total_quantity"], 3);
}

#[tokio::test]
async fn update_without_cart_is_bad_request() {
    let server = MockServer::start().await;
    let body = form_body(
        "LinesUpdate",
        r#"{"lines":[{"id":"gid://shopify/CartLine/1","quantity":3}]}"#,
    );
    let (status, _, json) = send(test_app(&server), post_form(body, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn invalid_cart_forms_are_rejected_locally() {
    let server = MockServer::start().await;
    let bodies = [
        form_body("LinesAdd", r#"{"lines":[{"merchandiseId":"v1","quantity":0}]}"#),
        form_body("LinesRemove", r#"{"lines":[]}"#),
        form_body("LinesAdd", "not json"),
        form_body("LinesAdd", r#"{"lines":[]}"#),
    ];
    for body in bodies {
        let (status, _, _) = send(test_app(&server), post_form(body.clone(), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
    }
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn platform_user_errors_are_validation_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartLinesAdd": {
                "cart": null,
                "userErrors": [{ "field": ["lines", "0", "quantity"], "message": "Only 2 left" }]
            }}
        })))
        .mount(&server)
        .await;

    let body = form_body("LinesAdd", r#"{"lines":[{"merchandiseId":"v1","quantity":5}]}"#);
    let (status, _, json) = send(test_app(&server), post_form(body, Some("cart=c1"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["message"], "lines.0.quantity: Only 2 left");
}

#[tokio::test]
async fn get_cart_requires_known_cart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "cartId": "expired" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "cart": null } })))
        .mount(&server)
        .await;

    let (status, _, _) = send(test_app(&server), get("/cart")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::builder()
        .uri("/cart")
        .header(header::COOKIE, "cart=expired")
        .body(Body::empty())
        .expect("request");
    let (status, _, _) = send(test_app(&server), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_cart_returns_snapshot() {
    let server = MockServer::start().await;
    let mut body = cart_body("cart", "c1", 1);
    body["data"]["cart"] = body["data"]["cart"]["cart"].clone();
    Mock::given(method("POST"))
        .and(body_string_contains("query Cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let request = Request::builder()
        .uri("/cart")
        .header(header::COOKIE, "cart=c1")
        .body(Body::empty())
        .expect("request");
    let (status, headers, json) = send(test_app(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], "c1");
    assert!(headers.get(header::SET_COOKIE).is_some());
}
