//! Generated demo catalogue for local runs.

use bookshelf_db::StoreError;

use super::models::{Genre, NewBook};
use super::store::BookStore;

const ADJECTIVES: &[&str] = &[
    "Silent", "Crimson", "Hidden", "Broken", "Golden", "Distant", "Frozen", "Wandering",
    "Burning", "Forgotten", "Restless", "Hollow",
];

const NOUNS: &[&str] = &[
    "Harbor", "Empire", "Orchard", "Signal", "Kingdom", "Lantern", "Frontier", "Archive",
    "Garden", "Voyage", "Citadel",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Clara", "Dmitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
];

const LAST_NAMES: &[&str] = &[
    "Okafor", "Lindqvist", "Moreau", "Tanaka", "Alvarez", "Novak", "Brennan", "Sato",
];

/// The `index`-th generated book; titles are unique for every index.
pub fn sample_book(index: usize) -> NewBook {
    let adjective = ADJECTIVES[index % ADJECTIVES.len()];
    let noun = NOUNS[(index / ADJECTIVES.len()) % NOUNS.len()];
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[(index * 3) % LAST_NAMES.len()];

    let genre_count = 1 + index % 3;
    let genres = (0..genre_count)
        .map(|offset| Genre::ALL[(index * 7 + offset * 3) % Genre::ALL.len()])
        .collect();

    NewBook {
        title: format!("The {} {} #{}", adjective, noun, index + 1),
        author: format!("{} {}", first, last),
        published_year: 1990 + ((index * 7) % 36) as i32,
        stock: 1 + ((index * 37) % 100) as i64,
        genres,
    }
}

/// Insert `count` generated books, returning how many were written.
pub async fn seed(store: &dyn BookStore, count: u32) -> Result<usize, StoreError> {
    let mut written = 0;
    for index in 0..count as usize {
        store.create(sample_book(index).normalized()).await?;
        written += 1;
    }
    tracing::info!(count = written, "seeded demo books");
    Ok(written)
}
