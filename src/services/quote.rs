// src/services/quote.rs
use log::{error, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{HistoricalSeries, Period, QuoteSnapshot, TickerSymbol};
use crate::services::provider::MarketDataProvider;
use crate::BoxError;

pub const NOT_FOUND_HINT: &str = "Check if the ticker is spelled correctly. For international stocks, \
use the correct exchange suffix (e.g., SHOP.TO for Toronto).";
pub const PROVIDER_FAILURE_HINT: &str = "Please try a different ticker or check the ticker spelling.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The provider answered but has no current price for the symbol.
    #[error("Unable to fetch data for ticker: {ticker}")]
    NotFound { ticker: String },
    /// The call itself failed; holds the underlying message as-is.
    #[error("An error occurred: {0}")]
    ProviderFailure(String),
}

impl LookupError {
    pub fn hint(&self) -> &'static str {
        match self {
            LookupError::NotFound { .. } => NOT_FOUND_HINT,
            LookupError::ProviderFailure(_) => PROVIDER_FAILURE_HINT,
        }
    }
}

pub struct QuoteRetriever {
    provider: Arc<dyn MarketDataProvider>,
    timeout: Option<Duration>,
}

impl QuoteRetriever {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            timeout: None,
        }
    }

    /// Bound every provider call; expiry is reported as a provider failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// One fresh round-trip for the snapshot and, if the symbol is usable,
    /// the price history. No retries, no caching.
    pub async fn fetch(
        &self,
        ticker: &TickerSymbol,
        period: Period,
    ) -> Result<(QuoteSnapshot, HistoricalSeries), LookupError> {
        info!("Fetching data for {} ({})", ticker, period);

        let snapshot = self.call(self.provider.quote(ticker)).await?;
        if snapshot.current_price.is_none() {
            warn!("No current price for {}, treating as not found", ticker);
            return Err(LookupError::NotFound {
                ticker: ticker.to_string(),
            });
        }

        let history = self.call(self.provider.history(ticker, period)).await?;
        info!(
            "Fetched {} with {} {} bars",
            ticker,
            history.len(),
            period
        );

        Ok((snapshot, history))
    }

    async fn call<T, F>(&self, request: F) -> Result<T, LookupError>
    where
        F: Future<Output = Result<T, BoxError>>,
    {
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("Provider call timed out after {:?}", limit);
                    return Err(LookupError::ProviderFailure(format!(
                        "provider call timed out after {:?}",
                        limit
                    )));
                }
            },
            None => request.await,
        };

        outcome.map_err(|e| {
            error!("Provider call failed: {}", e);
            LookupError::ProviderFailure(e.to_string())
        })
    }
}
