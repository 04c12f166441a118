//! Loads bids from the monthly sales CSV export into a table

use std::{io, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};

use crate::{
    ChainedHashTable,
    bid::Bid,
    error::{Error, Result},
};

/// Column positions of the fields a bid is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Item title
    pub title: usize,
    /// Bid identifier
    pub bid_id: usize,
    /// Winning amount, prefixed with a currency symbol
    pub amount: usize,
    /// Fund label
    pub fund: usize,
    /// Symbol stripped from the amount before parsing
    pub currency_symbol: char,
}

impl Default for ColumnLayout {
    /// Layout of the eBid monthly sales export
    fn default() -> Self {
        Self { title: 0, bid_id: 1, amount: 4, fund: 8, currency_symbol: '$' }
    }
}

/// Summary of one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Column names from the first line of the file
    pub header: Vec<String>,
    /// Rows inserted into the table
    pub loaded: usize,
    /// Rows skipped because a field could not be read
    pub skipped: usize,
}

/// Parses a monetary amount such as `"$1,234.50"`
///
/// The currency symbol and thousands separators are removed before parsing.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] if what remains is not a finite number.
pub fn parse_amount(field: &str, currency_symbol: char) -> Result<f64> {
    let cleaned: String = field.chars().filter(|&c| c != currency_symbol && c != ',').collect();

    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::InvalidAmount { value: field.to_string() })
}

/// Builds a bid from one data row
fn parse_row(record: &StringRecord, row: usize, layout: &ColumnLayout) -> Result<Bid> {
    let field = |column: usize| record.get(column).ok_or(Error::MissingField { row, column });

    let amount = parse_amount(field(layout.amount)?, layout.currency_symbol)?;
    Ok(Bid::new(field(layout.bid_id)?, field(layout.title)?, field(layout.fund)?, amount))
}

/// Loads bids from the CSV file at `path` into `table`
///
/// The first line is treated as a header. Rows with a missing column, a
/// non-numeric identifier or an unreadable amount are skipped with a warning and
/// counted in [`LoadReport::skipped`].
///
/// # Errors
///
/// Fails if the file cannot be opened or read. Rows inserted before the failure
/// stay in the table.
pub fn load_bids<P: AsRef<Path>>(
    path: P,
    table: &mut ChainedHashTable<Bid>,
    layout: &ColumnLayout,
) -> Result<LoadReport> {
    let path = path.as_ref();
    info!("loading CSV file {}", path.display());

    let file = std::fs::File::open(path)?;
    load_bids_from_reader(file, table, layout)
}

/// Loads bids from any CSV source into `table`
///
/// See [`load_bids`] for the row policy.
///
/// # Errors
///
/// Fails on I/O errors and on rows the CSV reader itself cannot decode.
pub fn load_bids_from_reader<R: io::Read>(
    source: R,
    table: &mut ChainedHashTable<Bid>,
    layout: &ColumnLayout,
) -> Result<LoadReport> {
    let mut reader =
        ReaderBuilder::new().has_headers(true).flexible(true).trim(Trim::All).from_reader(source);

    let mut report = LoadReport {
        header: reader.headers()?.iter().map(str::to_string).collect(),
        ..LoadReport::default()
    };

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index.saturating_add(1);

        match parse_row(&record, row, layout).and_then(|bid| table.insert(bid)) {
            Ok(_) => report.loaded = report.loaded.saturating_add(1),
            Err(err) => {
                warn!("skipping row {row}: {err}");
                report.skipped = report.skipped.saturating_add(1);
            }
        }
    }

    info!("loaded {} bids, skipped {} rows", report.loaded, report.skipped);
    Ok(report)
}
