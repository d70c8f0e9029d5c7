// src/services/provider.rs
use async_trait::async_trait;

use crate::models::{HistoricalSeries, Period, QuoteSnapshot, TickerSymbol};
use crate::BoxError;

/// Anything that can answer a quote snapshot and a price history for a ticker.
///
/// A symbol the provider does not know should come back as an empty snapshot,
/// not an error; errors are reserved for calls that could not be completed.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn quote(&self, ticker: &TickerSymbol) -> Result<QuoteSnapshot, BoxError>;

    async fn history(
        &self,
        ticker: &TickerSymbol,
        period: Period,
    ) -> Result<HistoricalSeries, BoxError>;
}
