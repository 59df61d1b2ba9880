use diesel::dsl::{count_distinct, count_star, sum};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::price::{NewPrice, Price, PriceTotals};
use crate::models::price::{NewPrice as DbNewPrice, Price as DbPrice};
use crate::repository::{
    DieselRepository, PriceReader, PriceWriter, RepositoryError, RepositoryResult,
};

/// Failure inside an ingestion transaction.
///
/// Errors raised by our own statements are already classified; anything
/// Diesel reports for BEGIN/COMMIT/ROLLBACK arrives through `From` and is a
/// transaction boundary failure.
enum IngestError {
    Step(RepositoryError),
    Boundary(diesel::result::Error),
}

impl From<diesel::result::Error> for IngestError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Boundary(err)
    }
}

impl From<IngestError> for RepositoryError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Step(err) => err,
            IngestError::Boundary(err) => RepositoryError::Commit(err.to_string()),
        }
    }
}

/// Row count, distinct category count and price sum over the whole table.
fn table_aggregates(conn: &mut SqliteConnection) -> QueryResult<(i64, i64, Option<f64>)> {
    use crate::schema::prices;

    prices::table
        .select((
            count_star(),
            count_distinct(prices::category),
            sum(prices::price),
        ))
        .get_result(conn)
}

fn insert_price(conn: &mut SqliteConnection, price: &NewPrice) -> RepositoryResult<()> {
    use crate::schema::prices;

    let row = DbNewPrice::from(price);
    match diesel::insert_into(prices::table).values(&row).execute(conn) {
        Ok(_) => Ok(()),
        Err(err) => match (RepositoryError::from(err), price.id) {
            (RepositoryError::DuplicateKey(_), Some(id)) => Err(RepositoryError::DuplicateKey(
                format!("price id {id} already exists"),
            )),
            (err, _) => Err(err),
        },
    }
}

impl PriceReader for DieselRepository {
    fn list_prices(&self) -> RepositoryResult<Vec<Price>> {
        use crate::schema::prices;

        let mut conn = self.conn()?;

        let items = prices::table
            .order(prices::id.asc())
            .select(DbPrice::as_select())
            .load::<DbPrice>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Price>, _>>()?;

        Ok(items)
    }

    fn price_totals(&self) -> RepositoryResult<PriceTotals> {
        let mut conn = self.conn()?;

        let (rows, categories, total) = table_aggregates(&mut conn)?;

        Ok(PriceTotals {
            total_items: rows as usize,
            total_categories: categories as usize,
            total_price: total.unwrap_or(0.0),
        })
    }
}

impl PriceWriter for DieselRepository {
    fn ingest_prices(&self, batch: &[NewPrice]) -> RepositoryResult<PriceTotals> {
        let mut conn = self.conn()?;

        // Write lock is held from BEGIN; other writers wait on busy_timeout.
        let totals = conn.immediate_transaction::<_, IngestError, _>(|conn| {
            for price in batch {
                insert_price(conn, price).map_err(IngestError::Step)?;
            }

            let (_, categories, total) =
                table_aggregates(conn).map_err(|err| IngestError::Step(err.into()))?;

            Ok(PriceTotals {
                total_items: batch.len(),
                total_categories: categories as usize,
                total_price: total.unwrap_or(0.0),
            })
        })?;

        Ok(totals)
    }
}
