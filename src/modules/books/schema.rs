//! Request schemas for the books endpoints.

use bookshelf_http::validation::{Coerce, FieldSpec, Rule, Schema};

use super::models::Genre;

const SORT_ORDERS: &[&str] = &["asc", "desc"];

/// Body of `POST /books`; `PATCH /books/{id}` checks the same rules on the
/// fields it receives.
pub const BOOK_BODY: Schema = Schema {
    fields: &[
        FieldSpec::new("title", Rule::Text { min_len: 3 }),
        FieldSpec::new("author", Rule::Text { min_len: 3 }),
        FieldSpec::new(
            "publishedYear",
            Rule::Integer {
                min: Some(1900),
                max: Some(2200),
            },
        ),
        FieldSpec::new(
            "stock",
            Rule::Integer {
                min: Some(0),
                max: None,
            },
        ),
        FieldSpec::new(
            "genres",
            Rule::List {
                allowed: Genre::NAMES,
                non_empty: true,
            },
        )
        .coerce(Coerce::CsvList),
    ],
};

/// Query string of `GET /books`.
pub const LIST_QUERY: Schema = Schema {
    fields: &[
        FieldSpec::new("search", Rule::Text { min_len: 0 }),
        FieldSpec::new(
            "page",
            Rule::Integer {
                min: Some(1),
                max: Some(u32::MAX as i64),
            },
        )
        .coerce(Coerce::Integer),
        FieldSpec::new(
            "limit",
            Rule::Integer {
                min: Some(0),
                max: Some(u32::MAX as i64),
            },
        )
        .coerce(Coerce::Integer),
        FieldSpec::new("sortBy", Rule::Text { min_len: 1 }),
        FieldSpec::new(
            "order",
            Rule::OneOf {
                allowed: SORT_ORDERS,
            },
        ),
        FieldSpec::new(
            "genre",
            Rule::OneOf {
                allowed: Genre::NAMES,
            },
        ),
    ],
};
