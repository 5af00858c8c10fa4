//! HTTP-level tests driving the router directly.
//!
//! Tests that only exercise routing, authentication rejection and request
//! validation run against a lazily connected pool and never touch a
//! database. Tests that need storage read `TEST_DATABASE_URL` and are
//! skipped without it.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use freight_back_office::{
    app::build_router,
    db::{self, DbPool},
    services::media::MediaStore,
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

const BOUNDARY: &str = "freight-test-boundary";

fn offline_app(media_root: &std::path::Path) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/never_connected")
        .unwrap();
    let media = MediaStore::new(media_root, "http://localhost:3000/media/").unwrap();
    build_router(AppState::new(pool, media), 1024 * 1024)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())
        .unwrap()
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (file_name, content) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let media = tempfile::tempdir().unwrap();
    let app = offline_app(media.path());

    let (status, body) = send(
        &app,
        json_request("POST", "/api/v1/companies", None, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "invalid_token");

    let request = Request::builder()
        .uri("/api/v1/orders")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_registration_is_rejected_before_storage() {
    let media = tempfile::tempdir().unwrap();
    let app = offline_app(media.path());

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users",
            None,
            json!({
                "first_name": "Nino",
                "last_name": "Beridze",
                "email": "not-an-email",
                "phone_number": "+995555123456",
                "password": "secret"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");
    assert_eq!(body["error"]["message"], "email: enter a valid email address");
}

#[tokio::test]
async fn malformed_json_uses_the_error_format() {
    let media = tempfile::tempdir().unwrap();
    let app = offline_app(media.path());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({"email": "nino@cargo.ge", "password": ""}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "password: this field may not be blank");
}

#[tokio::test]
async fn media_files_are_served() {
    let media_dir = tempfile::tempdir().unwrap();
    let store = MediaStore::new(media_dir.path(), "http://localhost:3000/media/").unwrap();
    let relative = store.save_order_file("cmr.txt", b"CMR 001").await.unwrap();
    let app = offline_app(media_dir.path());

    let request = Request::builder()
        .uri(format!("/media/{relative}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"CMR 001");

    let request = Request::builder()
        .uri("/media/order_files/missing.pdf")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Router backed by `TEST_DATABASE_URL`, or `None` when it is not set.
async fn database_app(max_upload_bytes: usize) -> Option<(Router, DbPool, TempDir)> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL missing; skipping database test");
        return None;
    };

    let pool = db::create_pool(&database_url, 5).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let media_dir = tempfile::tempdir().unwrap();
    let media = MediaStore::new(media_dir.path(), "http://localhost:3000/media/").unwrap();
    let app = build_router(AppState::new(pool.clone(), media), max_upload_bytes);
    Some((app, pool, media_dir))
}

fn registration(tag: &str) -> Request<Body> {
    json_request(
        "POST",
        "/api/v1/users",
        None,
        json!({
            "first_name": "Test",
            "last_name": tag,
            "email": format!("{tag}@freight.test"),
            "phone_number": &tag[..15],
            "password": "secret-password"
        }),
    )
}

/// Register a user and return its token.
async fn register(app: &Router, tag: &str) -> String {
    let (status, body) = send(app, registration(tag)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

fn company_body(party_type: &str, name: &str, vat: &str, ibans: Value) -> Value {
    json!({
        "name": name,
        "party_type": party_type,
        "address": "Tbilisi",
        "vat_number": vat,
        "contact_email": "ops@freight.test",
        "ibans": ibans
    })
}

fn bog_iban(account_number: &str) -> Value {
    json!([{ "bank_name": "BOG", "currency": "GEL", "account_number": account_number }])
}

async fn create_company(app: &Router, token: &str, party_type: &str, vat: &str, iban: Option<&str>) {
    let ibans = iban.map(bog_iban).unwrap_or(Value::Null);
    let body = company_body(party_type, &format!("{party_type} {vat}"), vat, ibans);
    let (status, body) = send(
        app,
        json_request("POST", "/api/v1/companies", Some(token), body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

fn order_fields<'a>(shipper_vat: &'a str, carrier_vat: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("shipper_company_vat", shipper_vat),
        ("carrier_company_vat", carrier_vat),
        ("start_location", "Poti"),
        ("end_location", "Yerevan"),
        ("transportation_type", "REEFER"),
        ("container_type", "MINUS_EIGHTEEN_DEGREES"),
        ("cargo_type", "FISH"),
        ("cargo_category", "NEEDS_A_REFRIGERATED_CONTAINER"),
        ("cargo_name", "Frozen trout"),
        ("weight", "18000"),
        ("price", "2450.50"),
        ("currency", "USD"),
        ("dimension", "13.6x2.45x2.6"),
        ("insurance", "true"),
    ]
}

fn order_request(token: &str, fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/orders")
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, files)))
        .unwrap()
}

#[tokio::test]
async fn full_back_office_flow() {
    let Some((app, _pool, _media_dir)) = database_app(1024 * 1024).await else {
        return;
    };

    let run = Uuid::new_v4().simple().to_string();
    let forwarder_vat = format!("F{}", &run[..12]);
    let shipper_vat = format!("S{}", &run[..12]);
    let carrier_vat = format!("C{}", &run[..12]);

    // Users
    let forwarder = register(&app, &format!("f{run}")).await;
    let shipper = register(&app, &format!("s{run}")).await;
    let carrier = register(&app, &format!("c{run}")).await;

    let (status, body) = send(&app, registration(&format!("f{run}"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "user_creation_failed");

    // Nothing company-scoped works before a company is attached
    let (status, body) = send(&app, get("/api/v1/orders", &forwarder)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "company_not_attached");

    let (status, body) = send(&app, get("/api/v1/companies/mine", &forwarder)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "company_not_found");

    // Forwarders must bring an IBAN
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/companies",
            Some(&forwarder),
            company_body("FORWARDER", &format!("No IBAN {run}"), &forwarder_vat, Value::Null),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Some way of reaching the company is required
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/companies",
            Some(&forwarder),
            json!({
                "name": format!("No contact {run}"),
                "party_type": "SHIPPER",
                "address": "Tbilisi",
                "vat_number": forwarder_vat
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "company_contact_not_provided");

    create_company(&app, &forwarder, "FORWARDER", &forwarder_vat, Some("GE54BG0000000101465330")).await;
    create_company(&app, &shipper, "SHIPPER", &shipper_vat, None).await;
    create_company(&app, &carrier, "CARRIER", &carrier_vat, Some("GE54BG0000000101465330")).await;

    let (status, body) = send(&app, get("/api/v1/companies/mine", &forwarder)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vat_number"], forwarder_vat);

    let (status, banks) = send(&app, get("/api/v1/banks", &forwarder)).await;
    assert_eq!(status, StatusCode::OK);
    let bank_names: Vec<&str> = banks
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|bank| bank["bank_name"].as_str())
        .collect();
    assert!(bank_names.contains(&"BOG"));
    assert!(bank_names.contains(&"TBC"));

    // Duplicate VAT
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/companies",
            Some(&shipper),
            json!({
                "name": format!("Another {run}"),
                "party_type": "SHIPPER",
                "address": "Batumi",
                "vat_number": forwarder_vat,
                "contact_name": "Someone"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "company_already_exists");

    // Lookup of own and foreign company
    let (status, body) = send(
        &app,
        get(&format!("/api/v1/companies/lookup?vat_number={forwarder_vat}"), &forwarder),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ibans"][0]["bank_name"], "BOG");
    assert_eq!(body["ibans"][0]["recipient"], format!("FORWARDER {forwarder_vat}"));

    let (status, body) = send(
        &app,
        get(&format!("/api/v1/companies/lookup?vat_number={forwarder_vat}"), &shipper),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "access_not_permitted");

    let (status, body) = send(&app, get("/api/v1/companies/lookup", &shipper)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "company_identifiers_not_provided");

    // IBAN rules
    let iban_uri = format!("/api/v1/companies/{forwarder_vat}/ibans");
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &iban_uri,
            Some(&forwarder),
            json!({"bank_name": "NOPE", "currency": "USD", "account_number": "GE54BG0000000101465330"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bank_not_found");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &iban_uri,
            Some(&forwarder),
            json!({"bank_name": "TBC", "currency": "USD", "account_number": "GE54BG0000000101465330"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_iban");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &iban_uri,
            Some(&forwarder),
            json!({"bank_name": "BOG", "currency": "USD", "account_number": "GE54 BG00 0000 0101 4653 30"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "iban_already_exists");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &iban_uri,
            Some(&forwarder),
            json!({"bank_name": "TBC", "currency": "USD", "account_number": "GE54TB1100000000000000"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = send(
        &app,
        get("/api/v1/ibans?bank_name=TBC&account_number=GE54TB1100000000000000", &shipper),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company_name"], format!("FORWARDER {forwarder_vat}"));

    // Updates: a name taken by another company is refused
    let company_uri = format!("/api/v1/companies/{forwarder_vat}");
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &company_uri,
            Some(&forwarder),
            company_body(
                "FORWARDER",
                &format!("SHIPPER {shipper_vat}"),
                &forwarder_vat,
                bog_iban("GE54BG0000000101465330"),
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "company_already_exists");

    // Updates: a given IBAN list replaces the stored one
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &company_uri,
            Some(&forwarder),
            company_body(
                "FORWARDER",
                &format!("FORWARDER {forwarder_vat}"),
                &forwarder_vat,
                json!([{ "bank_name": "TBC", "currency": "EUR", "account_number": "GE54TB1100000000000000" }]),
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let ibans = body["ibans"].as_array().unwrap();
    assert_eq!(ibans.len(), 1);
    assert_eq!(ibans[0]["bank_name"], "TBC");
    assert_eq!(ibans[0]["currency"], "EUR");

    // Search
    let (status, body) = send(
        &app,
        get(&format!("/api/v1/companies?search_keyword={}&company_type=CARRIER", &run[..12]), &forwarder),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["companies"].as_array().unwrap().len(), 1);

    // Orders: both parties must exist
    let unknown_vat = format!("U{}", &run[..12]);
    let (status, body) = send(
        &app,
        order_request(&forwarder, &order_fields(&unknown_vat, &carrier_vat), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "company_not_found");
    assert_eq!(body["error"]["message"], "Shipper company not found.");

    let (status, body) = send(
        &app,
        order_request(&forwarder, &order_fields(&shipper_vat, &unknown_vat), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Carrier company not found.");

    // Orders: files keep their upload order
    let files: [(&str, &[u8]); 3] = [
        ("cmr.pdf", b"%PDF-1.4"),
        ("invoice.pdf", b"%PDF-1.5"),
        ("packing-list.txt", b"12 pallets"),
    ];
    let (status, order) = send(
        &app,
        order_request(&forwarder, &order_fields(&shipper_vat, &carrier_vat), &files),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "IN_PROGRESS");
    assert_eq!(order["price"], "2450.50");
    assert_eq!(order["shipper_company_vat"], shipper_vat);
    let file_url = order["files"][0].as_str().unwrap();
    assert!(file_url.starts_with("http://localhost:3000/media/order_files/"));

    let (status, orders) = send(&app, get("/api/v1/orders", &forwarder)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let order_uri = format!("/api/v1/orders/{}", order["order_id"].as_str().unwrap());
    let (status, fetched) = send(&app, get(&order_uri, &forwarder)).await;
    assert_eq!(status, StatusCode::OK);
    let urls: Vec<&str> = fetched["files"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(urls.len(), 3);
    assert!(urls[0].ends_with("_cmr.pdf"));
    assert!(urls[1].ends_with("_invoice.pdf"));
    assert!(urls[2].ends_with("_packing-list.txt"));

    let (status, body) = send(&app, get(&order_uri, &shipper)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "order_not_found");

    let (status, body) = send(&app, get("/api/v1/orders/not-a-uuid", &forwarder)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");

    // Payments
    let (status, payment) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/payments",
            Some(&forwarder),
            json!({
                "payment_type": "INTERNATIONAL_SEA_SHIPPING",
                "receiver_company_vat": carrier_vat,
                "payment_date": "2025-06-30",
                "quantity": 2,
                "price": "1450.00",
                "vat": "522.00",
                "currency": "USD"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{payment}");
    assert_eq!(payment["total"], "3422.00");
    assert!(payment["agreement"].as_str().unwrap().starts_with("AGR-20250630-"));

    let (status, payments) = send(&app, get("/api/v1/payments", &carrier)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments.as_array().unwrap().len(), 1);

    // Profile, login and cleanup
    let (status, me) = send(&app, get("/api/v1/users/me", &forwarder)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["attached_company"]["name"], format!("FORWARDER {forwarder_vat}"));
    assert_eq!(me["token"], forwarder);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({"email": format!("f{run}@freight.test"), "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "user_doesnt_exist");

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/companies/{forwarder_vat}"))
        .header(header::AUTHORIZATION, format!("Token {forwarder}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, me) = send(&app, get("/api/v1/users/me", &forwarder)).await;
    assert!(me["attached_company"].is_null());
}

#[tokio::test]
async fn concurrent_creates_cannot_share_a_vat_number() {
    let Some((app, pool, _media_dir)) = database_app(1024 * 1024).await else {
        return;
    };

    let run = Uuid::new_v4().simple().to_string();
    let vat = format!("R{}", &run[..12]);
    let first = register(&app, &format!("a{run}")).await;
    let second = register(&app, &format!("b{run}")).await;

    let create = |token: &str, name: String| {
        json_request(
            "POST",
            "/api/v1/companies",
            Some(token),
            company_body("SHIPPER", &name, &vat, Value::Null),
        )
    };
    let ((first_status, _), (second_status, second_body)) = tokio::join!(
        send(&app, create(&first, format!("Race A {run}"))),
        send(&app, create(&second, format!("Race B {run}"))),
    );

    let mut statuses = [first_status.as_u16(), second_status.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 403]);
    if second_status == StatusCode::FORBIDDEN {
        assert_eq!(second_body["error"]["code"], "company_already_exists");
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE vat_number = $1")
        .bind(&vat)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn default_recipient_follows_company_renames() {
    let Some((app, _pool, _media_dir)) = database_app(1024 * 1024).await else {
        return;
    };

    let run = Uuid::new_v4().simple().to_string();
    let vat = format!("N{}", &run[..12]);
    let token = register(&app, &format!("n{run}")).await;
    create_company(&app, &token, "SHIPPER", &vat, None).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/v1/companies/{vat}/ibans"),
            Some(&token),
            json!({"bank_name": "BOG", "currency": "GEL", "account_number": "GE54BG0000000101465330"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["recipient"], format!("SHIPPER {vat}"));

    let renamed = format!("Renamed {vat}");
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/companies/{vat}"),
            Some(&token),
            company_body("SHIPPER", &renamed, &vat, Value::Null),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ibans"].as_array().unwrap().len(), 1);
    assert_eq!(body["ibans"][0]["recipient"], renamed);
}

#[tokio::test]
async fn oversized_order_upload_is_rejected() {
    let Some((app, _pool, _media_dir)) = database_app(1024).await else {
        return;
    };

    let run = Uuid::new_v4().simple().to_string();
    let vat = format!("L{}", &run[..12]);
    let token = register(&app, &format!("l{run}")).await;
    create_company(&app, &token, "FORWARDER", &vat, Some("GE54BG0000000101465330")).await;

    let scan = vec![b'x'; 16 * 1024];
    let (status, body) = send(
        &app,
        order_request(&token, &order_fields(&vat, &vat), &[("scan.pdf", &scan)]),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "payload_too_large");
}
