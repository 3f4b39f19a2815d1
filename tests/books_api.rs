use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookshelf_kernel::settings::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let settings = Settings::default();
    let registry = bookshelf_app::registry(&settings).unwrap();
    bookshelf_http::build_router(&registry, &settings)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn book(title: &str, year: i32, genres: &[&str]) -> Value {
    json!({
        "title": title,
        "author": "Valid Author",
        "publishedYear": year,
        "stock": 5,
        "genres": genres
    })
}

#[tokio::test]
async fn test_create_returns_stored_book() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/books",
        Some(book("Valid Title", 2025, &["Action", "Comedy"])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Valid Title");
    assert_eq!(body["publishedYear"], 2025);
    assert_eq!(body["genres"], json!(["Action", "Comedy"]));
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_duplicate_title_is_conflict() {
    let app = app();
    send(&app, Method::POST, "/v1/books", Some(book("Taken Title", 2000, &["Drama"]))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/books",
        Some(book("Taken Title", 2001, &["Drama"])),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["statusCode"], 409);
    assert_eq!(body["message"], "Book with this title already exists");
}

#[tokio::test]
async fn test_invalid_body_lists_every_failure() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/books",
        Some(json!({
            "title": "AB",
            "author": "Valid Author",
            "publishedYear": 1800,
            "stock": 5,
            "genres": []
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(
        body["message"],
        json!([
            "title must be longer than or equal to 3 characters",
            "publishedYear must not be less than 1900",
            "genres should not be empty"
        ])
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_paginates_and_filters() {
    let app = app();
    for index in 0..12 {
        let genres: &[&str] = if index % 3 == 0 { &["Horror"] } else { &["Drama"] };
        send(
            &app,
            Method::POST,
            "/v1/books",
            Some(book(&format!("Book Number {index}"), 2000 + index, genres)),
        )
        .await;
    }

    let (status, page) = send(&app, Method::GET, "/v1/books?page=2&limit=5&sortBy=id&order=asc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 12);
    assert_eq!(page["last_page"], 3);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 5);
    assert_eq!(page["data"][0]["id"], 6);

    let (_, everything) = send(&app, Method::GET, "/v1/books?limit=0", None).await;
    assert_eq!(everything["data"].as_array().map(Vec::len), Some(12));
    assert_eq!(everything["last_page"], 1);

    let (_, horror) = send(&app, Method::GET, "/v1/books?genre=Horror&limit=0", None).await;
    assert_eq!(horror["total"], 4);

    let (_, by_year) = send(&app, Method::GET, "/v1/books?search=2007", None).await;
    assert_eq!(by_year["total"], 1);
    assert_eq!(by_year["data"][0]["title"], "Book Number 7");
}

#[tokio::test]
async fn test_invalid_list_query_is_rejected() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/v1/books?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!(["page must not be less than 1"]));

    let (status, _) = send(&app, Method::GET, "/v1/books?order=sideways", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/v1/books?sortBy=publisher", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_update_delete_by_id() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/v1/books", Some(book("Mutable", 2010, &["Western"]))).await;
    let uri = format!("/v1/books/{}", created["id"]);

    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(&app, Method::PATCH, &uri, Some(json!({"stock": 0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["stock"], 0);
    assert_eq!(updated["title"], "Mutable");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"author": "Al"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({"message": "Book deleted successfully"}));

    let (status, missing) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["message"], "Book is not found");
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let app = app();

    let (status, _) = send(&app, Method::DELETE, "/v1/books/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/v1/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed (numeric string is expected)");
}

#[tokio::test]
async fn test_root_redirects_and_health() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/api");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/v1/books/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_document_covers_books() {
    let app = app();
    let (status, spec) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/v1/books"]["post"].is_object());
    assert!(spec["paths"]["/v1/books/{id}"]["patch"].is_object());
    assert!(spec["components"]["schemas"]["Book"].is_object());
}
