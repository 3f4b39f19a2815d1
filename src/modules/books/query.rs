//! Translates a [`BookFilter`] into a store-agnostic read.

use bookshelf_db::{Expr, OrderBy};

use super::models::{BookFilter, Genre};

/// Predicate, ordering, and window for one list request.
#[derive(Debug, Clone, PartialEq)]
pub struct BookQuery {
    pub predicate: Expr,
    pub order: OrderBy,
    pub offset: u64,
    /// `None` reads every match.
    pub limit: Option<u64>,
}

pub fn build(filter: &BookFilter) -> BookQuery {
    let predicate = Expr::and(vec![
        search_clause(filter.search.as_deref()),
        genre_clause(filter.genre),
    ]);

    // Pages start at 1; page 0 only reaches here from code and reads as page 1.
    let page = u64::from(filter.page.max(1));
    let limit = u64::from(filter.limit);

    BookQuery {
        predicate,
        order: OrderBy::from_path(&filter.sort_by, filter.order),
        offset: (page - 1) * limit,
        limit: (limit > 0).then_some(limit),
    }
}

/// Title or author substring, or the exact year when the term is numeric.
fn search_clause(search: Option<&str>) -> Expr {
    let Some(term) = search.filter(|term| !term.is_empty()) else {
        return Expr::All;
    };

    let mut any_of = vec![
        Expr::contains_insensitive("title", term),
        Expr::contains_insensitive("author", term),
    ];
    if let Some(year) = whole_number(term) {
        any_of.push(Expr::equals("publishedYear", year));
    }
    Expr::or(any_of)
}

/// Reads `term` as a number the way a loose numeric conversion would:
/// decimals, exponents, and `0x`/`0o`/`0b` integers. Only whole values count.
fn whole_number(term: &str) -> Option<i64> {
    let term = term.trim();
    let radix = match term.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &term[2..];
        if digits.starts_with(['+', '-']) {
            return None;
        }
        return i64::from_str_radix(digits, radix).ok();
    }

    let number = term.parse::<f64>().ok().filter(|number| number.is_finite())?;
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then_some(number as i64)
}

fn genre_clause(genre: Option<Genre>) -> Expr {
    match genre {
        Some(genre) => Expr::has("genres", genre.as_str()),
        None => Expr::All,
    }
}
