use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "secret".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::router(engine, db)
}

fn basic(user: &str, password: &str) -> String {
    let token =
        base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {token}")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic(user, "secret"));
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_wallet(app: &Router, user: &str, name: &str, balance: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/wallets",
        user,
        Some(json!({ "name": name, "balance": balance })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn wallet_balance(app: &Router, user: &str, id: &str) -> String {
    let (status, body) = send(app, "GET", &format!("/wallets/{id}"), user, None).await;
    assert_eq!(status, StatusCode::OK);
    body["balance"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn rejects_bad_credentials() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/wallets")
                .header(header::AUTHORIZATION, basic("alice", "wrong"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(Request::builder().uri("/wallets").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wallet_defaults_to_cash() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/wallets",
        "alice",
        Some(json!({ "name": "Pocket", "balance": "120.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "CASH");
    assert_eq!(body["payment_network"], Value::Null);
    let id = body["id"].as_str().unwrap();
    assert_eq!(wallet_balance(&app, "alice", id).await, "120.5");

    let (status, body) = send(&app, "GET", "/wallets", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wallets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn transfer_moves_money_and_delete_restores() {
    let app = app().await;
    let a = create_wallet(&app, "alice", "A", "500").await;
    let b = create_wallet(&app, "alice", "B", "100").await;

    let (status, tx) = send(
        &app,
        "POST",
        "/transactions",
        "alice",
        Some(json!({
            "wallet_id": a,
            "kind": "TRANSFER",
            "name": "Top up B",
            "amount": "200",
            "internal_wallet_id": b,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["kind"], "TRANSFER");
    assert_eq!(wallet_balance(&app, "alice", &a).await, "300");
    assert_eq!(wallet_balance(&app, "alice", &b).await, "300");

    let id = tx["id"].as_str().unwrap();
    let (status, row) = send(&app, "GET", &format!("/transactions/{id}"), "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["wallet_name"], "A");
    assert_eq!(row["internal_wallet_name"], "B");

    let (status, _) = send(&app, "DELETE", &format!("/transactions/{id}"), "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallet_balance(&app, "alice", &a).await, "500");
    assert_eq!(wallet_balance(&app, "alice", &b).await, "100");
}

#[tokio::test]
async fn overdraft_is_unprocessable() {
    let app = app().await;
    let a = create_wallet(&app, "alice", "A", "10").await;

    let (status, body) = send(
        &app,
        "POST",
        "/transactions",
        "alice",
        Some(json!({
            "wallet_id": a,
            "kind": "EXPENSE",
            "name": "Dinner",
            "amount": "10.01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Not enough balance");
    assert_eq!(wallet_balance(&app, "alice", &a).await, "10");
}

#[tokio::test]
async fn edit_replaces_effect() {
    let app = app().await;
    let a = create_wallet(&app, "alice", "A", "100").await;

    let (_, tx) = send(
        &app,
        "POST",
        "/transactions",
        "alice",
        Some(json!({
            "wallet_id": a,
            "kind": "EXPENSE",
            "name": "Groceries",
            "amount": "40",
            "occurred_at": "2026-03-01T08:30:00+02:00",
        })),
    )
    .await;
    let id = tx["id"].as_str().unwrap();

    let (status, edited) = send(
        &app,
        "PATCH",
        &format!("/transactions/{id}"),
        "alice",
        Some(json!({
            "wallet_id": a,
            "kind": "INCOME",
            "name": "  Refund  ",
            "amount": "25",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["kind"], "INCOME");
    assert_eq!(edited["name"], "Refund");
    assert_eq!(edited["occurred_at"], tx["occurred_at"]);
    assert_eq!(wallet_balance(&app, "alice", &a).await, "125");
}

#[tokio::test]
async fn foreign_resources_are_not_found() {
    let app = app().await;
    let a = create_wallet(&app, "alice", "A", "100").await;

    let (status, _) = send(&app, "GET", &format!("/wallets/{a}"), "bob", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        "bob",
        Some(json!({ "wallet_id": a, "kind": "INCOME", "name": "Gift", "amount": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(wallet_balance(&app, "alice", &a).await, "100");
}

#[tokio::test]
async fn list_pages_and_stats() {
    let app = app().await;
    let a = create_wallet(&app, "alice", "A", "1000").await;

    let (status, recipient) = send(
        &app,
        "POST",
        "/recipients",
        "alice",
        Some(json!({ "name": "Power Co", "kind": "BILLER" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let recipient_id = recipient["id"].as_str().unwrap().to_string();

    for (day, kind, amount) in [(1, "INCOME", "300"), (2, "EXPENSE", "50"), (3, "EXPENSE", "25")] {
        let (status, _) = send(
            &app,
            "POST",
            "/transactions",
            "alice",
            Some(json!({
                "wallet_id": a,
                "kind": kind,
                "name": format!("{kind} {day}"),
                "amount": amount,
                "occurred_at": format!("2026-01-0{day}T10:00:00+00:00"),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        "alice",
        Some(json!({
            "wallet_id": a,
            "kind": "TRANSFER",
            "name": "Electricity",
            "amount": "100",
            "recipient_id": recipient_id,
            "occurred_at": "2026-01-04T10:00:00+00:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, first) = send(
        &app,
        "POST",
        "/transactions/list",
        "alice",
        Some(json!({ "limit": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = first["transactions"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["recipient_name"], "Power Co");
    assert_eq!(items[0]["name"], "Electricity");
    let cursor = first["next_cursor"].as_str().unwrap();

    let (status, second) = send(
        &app,
        "POST",
        "/transactions/list",
        "alice",
        Some(json!({ "limit": 3, "cursor": cursor })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(second["next_cursor"], Value::Null);

    let (status, _) = send(
        &app,
        "POST",
        "/transactions/list",
        "alice",
        Some(json!({ "cursor": "not-a-cursor" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, stats) = send(&app, "GET", "/stats", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_balance"], "1125");
    assert_eq!(stats["wallet_count"], 1);
    assert_eq!(stats["total_income"], "300");
    assert_eq!(stats["total_expenses"], "175");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/recipients/{recipient_id}"),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
