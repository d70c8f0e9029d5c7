// src/services/export.rs
use anyhow::Result;
use csv::WriterBuilder;

use crate::models::{HistoricalSeries, Period, TickerSymbol};

pub const CSV_HEADER: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub body: String,
}

/// `AAPL_data_1mo.csv`
pub fn export_filename(ticker: &TickerSymbol, period: Period, ext: &str) -> String {
    format!("{}_data_{}.{}", ticker, period, ext)
}

pub fn series_to_csv(series: &HistoricalSeries) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for bar in series.bars() {
        writer.serialize(bar)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn export_csv(
    ticker: &TickerSymbol,
    period: Period,
    series: &HistoricalSeries,
) -> Result<CsvExport> {
    Ok(CsvExport {
        file_name: export_filename(ticker, period, "csv"),
        body: series_to_csv(series)?,
    })
}
