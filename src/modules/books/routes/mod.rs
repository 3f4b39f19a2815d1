//! HTTP handlers for `/{version}/books`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use bookshelf_db::StoreError;
use bookshelf_http::validation::{validate, Mode, Schema};
use bookshelf_http::AppError;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::models::{Book, BookFilter, BookPatch, NewBook, Paginated};
use super::schema::{BOOK_BODY, LIST_QUERY};
use super::service::{BookError, BookService};

type Service = State<Arc<BookService>>;

pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/{id}", get(get_book).patch(update_book).delete(delete_book))
        .with_state(service)
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound { .. } | BookError::Store(StoreError::RecordNotFound { .. }) => {
                AppError::not_found("Book is not found")
            }
            BookError::DuplicateTitle => {
                AppError::conflict("Book with this title already exists")
            }
            BookError::Store(StoreError::InvalidQuery(message)) => AppError::bad_request(message),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(service): Service,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Paginated<Book>>, AppError> {
    let raw: Map<String, Value> = params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    let filter: BookFilter = parse(&LIST_QUERY, Value::Object(raw), Mode::Partial)?;

    let page = service.list(&filter.normalized()).await?;
    Ok(Json(page))
}

async fn create_book(
    State(service): Service,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(raw) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let input: NewBook = parse(&BOOK_BODY, raw, Mode::Full)?;

    let book = service.create(input.normalized()).await?;
    Ok(Json(book))
}

async fn get_book(State(service): Service, Path(id): Path<String>) -> Result<Json<Book>, AppError> {
    let book = service.get_by_id(parse_id(&id)?).await?;
    Ok(Json(book))
}

async fn update_book(
    State(service): Service,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&id)?;
    let Json(raw) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let patch: BookPatch = parse(&BOOK_BODY, raw, Mode::Partial)?;

    let book = service.update(id, patch.normalized()).await?;
    Ok(Json(book))
}

async fn delete_book(
    State(service): Service,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    service.remove(parse_id(&id)?).await?;
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}

/// Validate against `schema`, then decode the checked object.
fn parse<T: DeserializeOwned>(schema: &Schema, raw: Value, mode: Mode) -> Result<T, AppError> {
    let checked = validate(schema, raw, mode).map_err(AppError::validation)?;
    serde_json::from_value(checked).map_err(|err| AppError::bad_request(err.to_string()))
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request("Validation failed (numeric string is expected)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_book_errors_map_to_statuses() {
        let cases = [
            (BookError::NotFound { id: 1 }, StatusCode::NOT_FOUND),
            (BookError::DuplicateTitle, StatusCode::CONFLICT),
            (
                BookError::Store(StoreError::InvalidQuery("unknown field".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                BookError::Store(StoreError::RecordNotFound { table: "book", id: 1 }),
                StatusCode::NOT_FOUND,
            ),
            (
                BookError::Store(StoreError::Backend(anyhow::anyhow!("disk full"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        assert_eq!(parse_id("42").unwrap(), 42);
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
