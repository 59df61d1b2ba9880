use crate::db::{DbConnection, DbPool};
use crate::domain::price::{NewPrice, Price, PriceTotals};

pub mod errors;
pub mod price;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for stored prices.
pub trait PriceReader {
    /// List every stored price ordered by identifier.
    fn list_prices(&self) -> RepositoryResult<Vec<Price>>;
    /// Compute row count, distinct category count and price sum over the whole table.
    fn price_totals(&self) -> RepositoryResult<PriceTotals>;
}

/// Write operations for stored prices.
pub trait PriceWriter {
    /// Insert a batch atomically and return aggregates over the resulting table.
    ///
    /// `total_items` in the result is the batch size; the category count and
    /// price sum cover every row, not only the inserted ones. Nothing from the
    /// batch is kept when any step fails.
    fn ingest_prices(&self, prices: &[NewPrice]) -> RepositoryResult<PriceTotals>;
}
