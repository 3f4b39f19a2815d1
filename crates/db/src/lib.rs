//! Storage primitives shared by store adapters.
//!
//! Callers describe *what* to read with [`Expr`] and [`OrderBy`]; an adapter
//! such as [`MemoryTable`] decides *how*.

pub mod error;
pub mod memory;
pub mod query;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryTable, Row};
pub use query::{Direction, Expr, OrderBy, Value};
