// src/services/yahoo.rs
use async_trait::async_trait;
use chrono::DateTime;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::models::{HistoricalSeries, Period, PriceBar, QuoteSnapshot, TickerSymbol};
use crate::services::provider::MarketDataProvider;
use crate::BoxError;

pub const DEFAULT_QUERY_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const SUMMARY_MODULES: &str = "price,summaryDetail,assetProfile,financialData";
const CHART_INTERVAL: &str = "1d";

/// Yahoo Finance over its unofficial JSON endpoints.
///
/// quoteSummary needs a crumb tied to the session cookie, so the client keeps
/// a cookie jar and the crumb is fetched once and reused until Yahoo rejects it.
pub struct YahooProvider {
    client: Client,
    query_url: String,
    cookie_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(query_url: impl Into<String>, cookie_url: impl Into<String>) -> Result<Self, BoxError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            query_url: query_url.into().trim_end_matches('/').to_string(),
            cookie_url: cookie_url.into(),
            crumb: Mutex::new(None),
        })
    }

    async fn crumb(&self) -> Result<String, BoxError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404 but still sets the session cookie
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            warn!("Failed to prime Yahoo session cookie: {}", e);
        }

        let url = format!("{}/v1/test/getcrumb", self.query_url);
        info!("Fetching Yahoo crumb from URL: {}", url);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(format!("Yahoo crumb request returned status {}", resp.status()).into());
        }

        let crumb = resp.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') || crumb.contains(' ') {
            return Err("Yahoo returned an invalid crumb".into());
        }

        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn quote(&self, ticker: &TickerSymbol) -> Result<QuoteSnapshot, BoxError> {
        let crumb = self.crumb().await?;
        let url = format!(
            "{}/v10/finance/quoteSummary/{}",
            self.query_url,
            urlencoding::encode(ticker.as_str())
        );
        info!("Fetching quote summary for {} from URL: {}", ticker, url);

        let resp = self
            .client
            .get(&url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                debug!("Yahoo has no quote summary for {}", ticker);
                Ok(QuoteSnapshot::default())
            }
            StatusCode::UNAUTHORIZED => {
                self.invalidate_crumb().await;
                Err("Yahoo rejected the session crumb (401 Unauthorized)".into())
            }
            status if !status.is_success() => {
                Err(format!("Yahoo quoteSummary returned status {}", status).into())
            }
            _ => parse_quote_summary(&resp.text().await?),
        }
    }

    async fn history(
        &self,
        ticker: &TickerSymbol,
        period: Period,
    ) -> Result<HistoricalSeries, BoxError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.query_url,
            urlencoding::encode(ticker.as_str())
        );
        info!("Fetching {} chart for {} from URL: {}", period, ticker, url);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", CHART_INTERVAL)])
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                debug!("Yahoo has no {} chart for {}", period, ticker);
                Ok(HistoricalSeries::default())
            }
            status if !status.is_success() => {
                Err(format!("Yahoo chart returned status {}", status).into())
            }
            _ => parse_chart(&resp.text().await?),
        }
    }
}

/// Parse a quoteSummary body. A null result means Yahoo does not know the symbol.
pub fn parse_quote_summary(body: &str) -> Result<QuoteSnapshot, BoxError> {
    let response: QuoteSummaryResponse = serde_json::from_str(body)?;
    let summary = response.quote_summary;

    let Some(result) = summary.result.and_then(|r| r.into_iter().next()) else {
        if let Some(error) = summary.error {
            debug!("Yahoo quoteSummary error {}: {}", error.code, error.description);
        }
        return Ok(QuoteSnapshot::default());
    };

    let detail = result.summary_detail.unwrap_or_default();
    let profile = result.asset_profile.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();
    let price = result.price.unwrap_or_default();

    Ok(QuoteSnapshot {
        current_price: raw(&financial.current_price),
        previous_close: raw(&detail.previous_close),
        volume: raw(&detail.volume).filter(|v| *v >= 0.0).map(|v| v as u64),
        market_cap: raw(&detail.market_cap).or_else(|| raw(&price.market_cap)),
        trailing_pe: raw(&detail.trailing_pe),
        open: raw(&detail.open),
        day_high: raw(&detail.day_high),
        day_low: raw(&detail.day_low),
        fifty_two_week_high: raw(&detail.fifty_two_week_high),
        fifty_two_week_low: raw(&detail.fifty_two_week_low),
        sector: profile.sector,
        industry: profile.industry,
        country: profile.country,
        website: profile.website,
        long_name: price.long_name,
    })
}

/// Parse a v8 chart body into an ascending series. Rows with any missing OHLC
/// value are dropped; a missing volume counts as zero.
pub fn parse_chart(body: &str) -> Result<HistoricalSeries, BoxError> {
    let response: ChartResponse = serde_json::from_str(body)?;
    let chart = response.chart;

    let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
        if let Some(error) = chart.error {
            debug!("Yahoo chart error {}: {}", error.code, error.description);
        }
        return Ok(HistoricalSeries::default());
    };

    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(HistoricalSeries::default());
    };

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let timestamp = DateTime::from_timestamp(ts, 0)?;
            Some(PriceBar {
                timestamp,
                open: quote.open.get(i).copied().flatten()?,
                high: quote.high.get(i).copied().flatten()?,
                low: quote.low.get(i).copied().flatten()?,
                close: quote.close.get(i).copied().flatten()?,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect();

    Ok(HistoricalSeries::from_unsorted(bars))
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

/// Numbers arrive wrapped as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when missing.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(default)]
    asset_profile: Option<AssetProfileModule>,
    #[serde(default)]
    financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    #[serde(default)]
    previous_close: Option<RawValue>,
    #[serde(default)]
    open: Option<RawValue>,
    #[serde(default)]
    day_high: Option<RawValue>,
    #[serde(default)]
    day_low: Option<RawValue>,
    #[serde(default)]
    volume: Option<RawValue>,
    #[serde(default)]
    market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_high: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfileModule {
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialDataModule {
    #[serde(default)]
    current_price: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}
