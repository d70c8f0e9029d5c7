// src/services/ledger.rs
use crate::models::TickerSymbol;

pub const RECENT_TICKERS_CAPACITY: usize = 10;

/// Tickers from successful lookups, most recent first, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct RecentTickers {
    entries: Vec<TickerSymbol>,
}

impl RecentTickers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a new ticker at the front. A ticker that is already listed keeps its
    /// position; overflow past the capacity is dropped from the tail.
    pub fn record(&mut self, ticker: TickerSymbol) -> bool {
        if self.entries.contains(&ticker) {
            return false;
        }
        self.entries.insert(0, ticker);
        self.entries.truncate(RECENT_TICKERS_CAPACITY);
        true
    }

    pub fn as_slice(&self) -> &[TickerSymbol] {
        &self.entries
    }

    pub fn contains(&self, ticker: &TickerSymbol) -> bool {
        self.entries.contains(ticker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
