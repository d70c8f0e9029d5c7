// src/services/dashboard.rs
use log::{debug, error, info};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::models::{HistoricalSeries, Period, QuoteSnapshot, TickerSymbol};
use crate::services::export::{export_csv, CsvExport};
use crate::services::formatter::{self, DisplayFields};
use crate::services::ledger::RecentTickers;
use crate::services::quote::{LookupError, QuoteRetriever};

/// The result currently on screen.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub ticker: TickerSymbol,
    pub period: Period,
    pub snapshot: QuoteSnapshot,
    pub history: HistoricalSeries,
}

/// Everything one user session remembers between interactions.
#[derive(Debug, Default)]
pub struct Session {
    pub recent: RecentTickers,
    pub current: Option<Lookup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupView {
    pub ticker: TickerSymbol,
    pub period: Period,
    pub title: String,
    pub display: DisplayFields,
    pub history: HistoricalSeries,
}

impl From<&Lookup> for LookupView {
    fn from(lookup: &Lookup) -> Self {
        LookupView {
            ticker: lookup.ticker.clone(),
            period: lookup.period,
            title: formatter::title(&lookup.ticker, &lookup.snapshot),
            display: formatter::format(&lookup.snapshot),
            history: lookup.history.clone(),
        }
    }
}

/// Interaction handler: runs lookups against the retriever and keeps the
/// session. The session lock is held for the whole lookup, so interactions
/// run one at a time.
pub struct Dashboard {
    retriever: QuoteRetriever,
    session: Mutex<Session>,
}

impl Dashboard {
    pub fn new(retriever: QuoteRetriever) -> Self {
        Self {
            retriever,
            session: Mutex::new(Session::default()),
        }
    }

    pub async fn lookup(
        &self,
        ticker: TickerSymbol,
        period: Period,
    ) -> Result<LookupView, LookupError> {
        let mut session = self.session.lock().await;

        let (snapshot, history) = match self.retriever.fetch(&ticker, period).await {
            Ok(result) => result,
            Err(e) => {
                error!("Lookup for {} failed: {}", ticker, e);
                return Err(e);
            }
        };

        if session.recent.record(ticker.clone()) {
            debug!("Added {} to recent tickers", ticker);
        }

        let lookup = Lookup {
            ticker,
            period,
            snapshot,
            history,
        };
        let view = LookupView::from(&lookup);
        info!("Lookup complete: {}", view.title);
        session.current = Some(lookup);

        Ok(view)
    }

    pub async fn recent(&self) -> Vec<TickerSymbol> {
        self.session.lock().await.recent.as_slice().to_vec()
    }

    pub async fn current(&self) -> Option<LookupView> {
        self.session.lock().await.current.as_ref().map(LookupView::from)
    }

    /// CSV of the series currently on screen, if any lookup has succeeded.
    pub async fn export_current(&self) -> anyhow::Result<Option<CsvExport>> {
        let session = self.session.lock().await;
        match session.current.as_ref() {
            Some(lookup) => Ok(Some(export_csv(&lookup.ticker, lookup.period, &lookup.history)?)),
            None => Ok(None),
        }
    }
}
