use crate::archive::{self, ArchiveFormat};
use crate::domain::price::{NewPrice, Price, PriceTotals, RecordSchema};
use crate::forms::import_export::parse_price_rows;
use crate::repository::{PriceReader, PriceWriter};

use super::errors::{ServiceError, ServiceResult};

/// Name of the delimited file inside every exported archive.
pub const EXPORT_ENTRY_NAME: &str = "data.csv";

/// Rendered archive ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Core business logic for uploading a price archive.
///
/// Decompresses the archive, parses every contained file with `schema` and
/// stores the whole batch in one transaction. Any parse failure aborts before
/// the store is touched; any storage failure rolls the batch back.
pub fn import_prices<R>(
    repo: &R,
    data: &[u8],
    format: &str,
    schema: RecordSchema,
) -> ServiceResult<PriceTotals>
where
    R: PriceWriter,
{
    let format = ArchiveFormat::try_from(format)?;
    let entries = archive::extract(data, format)?;

    let mut batch: Vec<NewPrice> = Vec::new();
    for entry in &entries {
        let prices = parse_price_rows(&entry.text, schema).map_err(|source| {
            ServiceError::InvalidRecord {
                entry: entry.name.clone(),
                source,
            }
        })?;
        batch.extend(prices);
    }

    let totals = repo.ingest_prices(&batch)?;
    log::info!(
        "Ingested {} prices from {} file(s) in {} archive",
        totals.total_items,
        entries.len(),
        format.as_str()
    );

    Ok(totals)
}

/// Core business logic for downloading every stored price as an archive.
///
/// The format is validated before any query runs.
pub fn export_prices<R>(
    repo: &R,
    format: &str,
    schema: RecordSchema,
) -> ServiceResult<DownloadFile>
where
    R: PriceReader,
{
    let format = ArchiveFormat::try_from(format)?;

    let prices = repo
        .list_prices()
        .map_err(|e| ServiceError::Query(e.to_string()))?;

    let csv = render_prices_csv(&prices, schema)?;
    let bytes = archive::pack(EXPORT_ENTRY_NAME, &csv, format)?;

    Ok(DownloadFile {
        file_name: format!("data.{}", format.as_str()),
        content_type: format.content_type(),
        bytes,
    })
}

/// Aggregates over the whole table without ingesting anything.
pub fn show_price_totals<R>(repo: &R) -> ServiceResult<PriceTotals>
where
    R: PriceReader,
{
    repo.price_totals()
        .map_err(|e| ServiceError::Query(e.to_string()))
}

fn render_prices_csv(prices: &[Price], schema: RecordSchema) -> ServiceResult<Vec<u8>> {
    let render_err = |e: csv::Error| ServiceError::Render(e.to_string());

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(schema.columns()).map_err(render_err)?;
    for price in prices {
        let amount = format!("{:.2}", price.price.get());
        let written = match schema {
            RecordSchema::Full => writer.write_record([
                price.id.to_string().as_str(),
                price.name.as_str(),
                price.category.as_str(),
                amount.as_str(),
                price.create_date.format("%Y-%m-%d").to_string().as_str(),
            ]),
            RecordSchema::Compact => {
                writer.write_record([price.category.as_str(), amount.as_str()])
            }
        };
        written.map_err(render_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| ServiceError::Render(e.to_string()))
}
