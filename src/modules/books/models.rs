use std::fmt;
use std::str::FromStr;

use bookshelf_db::{Direction, Row, Value};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Closed set of genres a book can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Mystery,
    Romance,
    Thriller,
    Western,
}

impl Genre {
    pub const ALL: [Genre; 10] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Mystery,
        Genre::Romance,
        Genre::Thriller,
        Genre::Western,
    ];

    /// Wire names, in declaration order.
    pub const NAMES: &'static [&'static str] = &[
        "Action",
        "Adventure",
        "Comedy",
        "Drama",
        "Fantasy",
        "Horror",
        "Mystery",
        "Romance",
        "Thriller",
        "Western",
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES[*self as usize]
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| format!("unknown genre '{}'", s))
    }
}

/// A stored book record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    /// Unique title
    pub title: String,
    pub author: String,
    pub published_year: i32,
    /// Copies on hand
    pub stock: i64,
    pub genres: Vec<Genre>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Row for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, path: &[&str]) -> Option<Value> {
        let value = match path {
            ["id"] => Value::Int(self.id),
            ["title"] => Value::Text(self.title.clone()),
            ["author"] => Value::Text(self.author.clone()),
            ["publishedYear"] => Value::Int(i64::from(self.published_year)),
            ["stock"] => Value::Int(self.stock),
            ["genres"] => Value::List(
                self.genres
                    .iter()
                    .map(|genre| Value::Text(genre.as_str().to_string()))
                    .collect(),
            ),
            ["createdAt"] => Value::Time(self.created_at),
            ["updatedAt"] => Value::Time(self.updated_at),
            _ => return None,
        };
        Some(value)
    }

    fn has_field(path: &[&str]) -> bool {
        matches!(
            path,
            ["id"]
                | ["title"]
                | ["author"]
                | ["publishedYear"]
                | ["stock"]
                | ["genres"]
                | ["createdAt"]
                | ["updatedAt"]
        )
    }
}

/// Fields accepted when creating a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub stock: i64,
    pub genres: Vec<Genre>,
}

impl NewBook {
    /// Drop repeated genres, keeping first occurrences.
    pub fn normalized(mut self) -> Self {
        self.genres = dedup_genres(self.genres);
        self
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
}

impl BookPatch {
    pub fn normalized(mut self) -> Self {
        self.genres = self.genres.map(dedup_genres);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == BookPatch::default()
    }

    /// Merge the present fields into `book`.
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(published_year) = self.published_year {
            book.published_year = published_year;
        }
        if let Some(stock) = self.stock {
            book.stock = stock;
        }
        if let Some(genres) = self.genres {
            book.genres = genres;
        }
    }
}

fn dedup_genres(genres: Vec<Genre>) -> Vec<Genre> {
    let mut seen = Vec::with_capacity(genres.len());
    for genre in genres {
        if !seen.contains(&genre) {
            seen.push(genre);
        }
    }
    seen
}

/// List request: search, genre filter, ordering, and page window.
///
/// Serialized field-for-field into the list cache key, so every field,
/// defaults included, takes part in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookFilter {
    pub search: Option<String>,
    /// 1-indexed
    pub page: u32,
    /// 0 returns every match
    pub limit: u32,
    /// Field to order by; dots address nested fields
    pub sort_by: String,
    pub order: Direction,
    pub genre: Option<Genre>,
}

impl Default for BookFilter {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            limit: 10,
            sort_by: "createdAt".to_string(),
            order: Direction::Desc,
            genre: None,
        }
    }
}

impl BookFilter {
    /// Treat an empty search as no search so both share a cache key.
    pub fn normalized(mut self) -> Self {
        if self.search.as_deref() == Some("") {
            self.search = None;
        }
        self
    }
}

/// One page of results plus the totals needed to navigate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub limit: u32,
    /// Matches for the filter, ignoring the page window
    pub total: u64,
    pub page: u32,
    pub last_page: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            data,
            limit,
            total,
            page,
            last_page: last_page(total, limit),
        }
    }
}

/// `ceil(total / limit)`, or 1 when `limit` is 0.
pub fn last_page(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        1
    } else {
        total.div_ceil(u64::from(limit))
    }
}
