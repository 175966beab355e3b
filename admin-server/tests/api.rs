//! HTTP API tests driven through the router with `oneshot`

use std::sync::Arc;

use admin_server::api::build_app;
use admin_server::{Config, MemoryOrderSource, MenuCatalog, ServerState};
use axum::body::{Body, to_bytes};
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_state() -> ServerState {
    let config = Config::with_overrides(0, chrono_tz::UTC);
    ServerState::new(
        config,
        Arc::new(MemoryOrderSource::default()),
        Arc::new(MenuCatalog::new()),
    )
}

async fn call(state: &ServerState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let app = build_app().with_state(state.clone());
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn order_row(id: &str, items: Value) -> Value {
    json!({
        "id": id,
        "table_number": 4,
        "status": "pending",
        "total": 0.0,
        "order_items": items,
    })
}

fn item(quantity: i32, name: &str, price: f64, category: &str) -> Value {
    json!({
        "quantity": quantity,
        "dish": {
            "id": format!("d-{}", name.to_lowercase()),
            "name": name,
            "price": price,
            "category": category,
        }
    })
}

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let (status, body) = call(&state, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ordersRevision"], 0);
}

#[tokio::test]
async fn test_empty_report() {
    let state = test_state();
    let (status, body) = call(&state, Method::GET, "/api/reports", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);

    let view = &body["data"];
    assert_eq!(view["period"], "daily");
    assert_eq!(view["title"], "Journalier");
    assert_eq!(view["report"]["totalOrders"], 0);
    assert_eq!(view["report"]["totalRevenue"], 0.0);
    assert_eq!(view["report"]["ordersByCategory"], json!({}));
    assert_eq!(view["report"]["popularDishes"], json!([]));
    assert!(view["startDate"].is_string());
    assert!(view["endDate"].is_string());
    assert!(view["topDish"].is_null());
}

#[tokio::test]
async fn test_invalid_period() {
    let state = test_state();
    let (status, body) = call(&state, Method::GET, "/api/reports?period=monthly", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7301);
}

#[tokio::test]
async fn test_ingested_orders_show_up_in_reports() {
    let state = test_state();

    let (status, _) = call(
        &state,
        Method::POST,
        "/api/orders",
        Some(order_row(
            "o-1",
            json!([
                item(2, "Steak", 25.0, "Main Course"),
                item(1, "Soda", 3.5, "Beverage"),
            ]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(
        &state,
        Method::POST,
        "/api/orders",
        Some(order_row("o-2", json!([item(1, "Steak", 25.0, "Main Course")]))),
    )
    .await;
    assert_eq!(body["data"]["items"][0]["dish"]["name"], "Steak");

    let (status, body) = call(&state, Method::GET, "/api/reports?period=weekly", None).await;
    assert_eq!(status, StatusCode::OK);
    let view = &body["data"];
    assert_eq!(view["title"], "Hebdomadaire");
    assert_eq!(view["revision"], 2);
    assert_eq!(view["report"]["totalOrders"], 2);
    assert_eq!(view["report"]["totalRevenue"], 78.5);
    assert_eq!(view["report"]["ordersByCategory"]["Plat Principal"], 3);
    assert_eq!(view["report"]["ordersByCategory"]["Boisson"], 1);
    assert_eq!(view["report"]["popularDishes"][0]["name"], "Steak");
    assert_eq!(view["report"]["popularDishes"][0]["quantity"], 3);
    assert_eq!(view["report"]["popularDishes"][0]["revenue"], 75.0);
    assert_eq!(view["topDish"], "Steak");

    let (_, body) = call(&state, Method::GET, "/health", None).await;
    assert_eq!(body["reportRevision"], 2);
}

#[tokio::test]
async fn test_report_reflects_order_posted_after_first_read() {
    let state = test_state();

    let (_, body) = call(&state, Method::GET, "/api/reports", None).await;
    assert_eq!(body["data"]["revision"], 0);
    assert_eq!(body["data"]["report"]["totalOrders"], 0);

    let (status, _) = call(
        &state,
        Method::POST,
        "/api/orders",
        Some(order_row("o-1", json!([item(1, "Mafé", 3200.0, "Main Course")]))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&state, Method::GET, "/api/reports", None).await;
    assert_eq!(body["data"]["revision"], 1);
    assert_eq!(body["data"]["report"]["totalOrders"], 1);
    assert_eq!(body["data"]["report"]["totalRevenue"], 3200.0);
}

#[tokio::test]
async fn test_removed_order_leaves_reports() {
    let state = test_state();
    call(
        &state,
        Method::POST,
        "/api/orders",
        Some(order_row("o-1", json!([item(1, "Yassa", 3000.0, "Main Course")]))),
    )
    .await;

    let (status, _) = call(&state, Method::DELETE, "/api/orders/o-1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&state, Method::GET, "/api/reports?period=daily", None).await;
    assert_eq!(body["data"]["report"]["totalOrders"], 0);

    let (status, body) = call(&state, Method::DELETE, "/api/orders/o-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_invalid_item_is_reported() {
    let state = test_state();
    call(
        &state,
        Method::POST,
        "/api/orders",
        Some(order_row("o-bad", json!([item(-1, "Steak", 25.0, "Main Course")]))),
    )
    .await;

    let (status, body) = call(&state, Method::GET, "/api/reports", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4008);
}

#[tokio::test]
async fn test_order_with_bad_timestamp_rejected() {
    let state = test_state();
    let mut row = order_row("o-1", json!([]));
    row["created_at"] = json!("yesterday");

    let (status, body) = call(&state, Method::POST, "/api/orders", Some(row)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4009);

    let (_, body) = call(&state, Method::GET, "/api/orders", None).await;
    assert_eq!(body["data"]["revision"], 0);
    assert_eq!(body["data"]["orders"], json!([]));
}

#[tokio::test]
async fn test_dish_crud() {
    let state = test_state();

    let (status, body) = call(
        &state,
        Method::POST,
        "/api/dishes",
        Some(json!({"name": "Thiéboudienne", "price": 3500.0, "category": "Main Course"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    call(
        &state,
        Method::POST,
        "/api/dishes",
        Some(json!({"name": "Bissap", "price": 500.0, "category": "Beverage"})),
    )
    .await;

    let (_, body) = call(&state, Method::GET, "/api/dishes", None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bissap", "Thiéboudienne"]);

    let (status, body) = call(
        &state,
        Method::PUT,
        &format!("/api/dishes/{}", id),
        Some(json!({"price": 3800.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 3800.0);

    let (status, _) = call(&state, Method::DELETE, &format!("/api/dishes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&state, Method::GET, &format!("/api/dishes/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_dish_validation() {
    let state = test_state();
    let (status, body) = call(
        &state,
        Method::POST,
        "/api/dishes",
        Some(json!({"name": "Soupe", "price": 900.0, "category": "Soup"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["details"]["fields"].as_array().unwrap().contains(&json!("category")));
}
