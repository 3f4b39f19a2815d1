//! In-process table adapter that interprets the query model.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::query::{Expr, OrderBy, Value};

/// A record that can live in a [`MemoryTable`].
pub trait Row: Clone + Send + Sync + 'static {
    /// Store-assigned primary key.
    fn id(&self) -> i64;

    /// Value at `path`, or `None` when the row has no such field.
    fn field(&self, path: &[&str]) -> Option<Value>;

    /// Whether every row of this type exposes `path`.
    fn has_field(path: &[&str]) -> bool;
}

struct TableState<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

/// Rows keyed by integer id with optional unique columns.
pub struct MemoryTable<T: Row> {
    name: &'static str,
    unique: Vec<&'static str>,
    state: RwLock<TableState<T>>,
}

impl<T: Row> MemoryTable<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            unique: Vec::new(),
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Declare a single-column unique index.
    pub fn with_unique(mut self, column: &'static str) -> Self {
        self.unique.push(column);
        self
    }

    /// Insert a row built from the next id in the sequence.
    ///
    /// The id is only consumed when the insert succeeds.
    pub async fn insert<F>(&self, build: F) -> StoreResult<T>
    where
        F: FnOnce(i64) -> T,
    {
        let mut state = self.state.write().await;
        let id = state.next_id;
        let row = build(id);
        self.check_unique(&state.rows, &row)?;

        state.next_id += 1;
        state.rows.insert(id, row.clone());
        tracing::debug!(table = self.name, id, "row inserted");
        Ok(row)
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<T>> {
        let state = self.state.read().await;
        Ok(state.rows.get(&id).cloned())
    }

    pub async fn count(&self, filter: &Expr) -> StoreResult<u64> {
        let state = self.state.read().await;
        let matched = state
            .rows
            .values()
            .filter(|row| evaluate(filter, *row))
            .count();
        Ok(matched as u64)
    }

    /// Filter, order, then window the rows.
    ///
    /// Rows that compare equal under `order` keep ascending id order.
    pub async fn select(
        &self,
        filter: &Expr,
        order: &OrderBy,
        offset: u64,
        limit: Option<u64>,
    ) -> StoreResult<Vec<T>> {
        let (path, direction) = order.path();
        if !T::has_field(&path) {
            return Err(StoreError::InvalidQuery(format!(
                "cannot order {} by unknown field '{}'",
                self.name,
                path.join(".")
            )));
        }

        let state = self.state.read().await;
        // BTreeMap iteration yields ascending ids, and sort_by is stable.
        let mut matched: Vec<&T> = state
            .rows
            .values()
            .filter(|row| evaluate(filter, *row))
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match (a.field(&path), b.field(&path)) {
                (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            direction.apply(ordering)
        });

        let window = matched.into_iter().skip(offset as usize);
        let rows = match limit {
            Some(limit) => window.take(limit as usize).cloned().collect(),
            None => window.cloned().collect(),
        };
        Ok(rows)
    }

    /// Apply `change` to a copy of the row and commit it if constraints hold.
    pub async fn update<F>(&self, id: i64, change: F) -> StoreResult<T>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.state.write().await;
        let mut row = state
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::RecordNotFound {
                table: self.name,
                id,
            })?;
        change(&mut row);
        self.check_unique(&state.rows, &row)?;

        state.rows.insert(id, row.clone());
        tracing::debug!(table = self.name, id, "row updated");
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> StoreResult<T> {
        let mut state = self.state.write().await;
        let removed = state.rows.remove(&id).ok_or(StoreError::RecordNotFound {
            table: self.name,
            id,
        })?;
        tracing::debug!(table = self.name, id, "row deleted");
        Ok(removed)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_unique(&self, rows: &BTreeMap<i64, T>, candidate: &T) -> StoreResult<()> {
        for column in self.unique.iter().copied() {
            let Some(value) = candidate.field(&[column]) else {
                continue;
            };
            let clash = rows
                .values()
                .filter(|row| row.id() != candidate.id())
                .any(|row| row.field(&[column]).as_ref() == Some(&value));
            if clash {
                return Err(StoreError::ConstraintViolation {
                    table: self.name,
                    fields: vec![column.to_string()],
                });
            }
        }
        Ok(())
    }
}

/// Evaluate `expr` against a single row.
pub fn evaluate<T: Row>(expr: &Expr, row: &T) -> bool {
    match expr {
        Expr::All => true,
        Expr::And(operands) => operands.iter().all(|operand| evaluate(operand, row)),
        Expr::Or(operands) => operands.iter().any(|operand| evaluate(operand, row)),
        Expr::Contains {
            field,
            needle,
            case_insensitive,
        } => match row.field(&[field.as_str()]) {
            Some(Value::Text(haystack)) if *case_insensitive => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Some(Value::Text(haystack)) => haystack.contains(needle.as_str()),
            _ => false,
        },
        Expr::Equals { field, value } => row.field(&[field.as_str()]).as_ref() == Some(value),
        Expr::Has { field, value } => match row.field(&[field.as_str()]) {
            Some(Value::List(items)) => items.contains(value),
            _ => false,
        },
    }
}
