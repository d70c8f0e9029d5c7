//! Exercises `YahooProvider` end to end against an in-process warp server that
//! mimics the Yahoo Finance endpoints it calls.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

use stock_dashboard::models::{Period, TickerSymbol};
use stock_dashboard::services::provider::MarketDataProvider;
use stock_dashboard::services::quote::{LookupError, QuoteRetriever};
use stock_dashboard::services::yahoo::YahooProvider;

const CRUMB: &str = "Xq7Lp0a.crumb";

const AAPL_SUMMARY: &str = r#"{"quoteSummary":{"result":[{
    "price": {"longName": "Apple Inc."},
    "summaryDetail": {
        "previousClose": {"raw": 185.64, "fmt": "185.64"},
        "volume": {"raw": 58414500},
        "marketCap": {"raw": 2870000000000},
        "trailingPE": {"raw": 28.9}
    },
    "assetProfile": {"sector": "Technology", "country": "United States"},
    "financialData": {"currentPrice": {"raw": 184.25}}
}],"error":null}}"#;

const NOT_FOUND_SUMMARY: &str = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: NOPE"}}}"#;

const AAPL_CHART: &str = r#"{"chart":{"result":[{
    "meta": {"symbol": "AAPL", "range": "1mo"},
    "timestamp": [1704378600, 1704205800, 1704292200],
    "indicators": {"quote": [{
        "open":   [182.15, 187.15, 184.22],
        "high":   [183.09, 188.44, 185.88],
        "low":    [180.88, 183.89, 183.43],
        "close":  [181.91, 185.64, 184.25],
        "volume": [71983600, 82488700, 58414500]
    }]}
}],"error":null}}"#;

struct MockYahoo {
    addr: SocketAddr,
    crumb_requests: Arc<AtomicUsize>,
}

/// Serves the crumb, quoteSummary and chart endpoints. Summary requests must
/// carry the crumb; `EXPIRED` always answers 401.
fn spawn_mock_yahoo() -> MockYahoo {
    let crumb_requests = Arc::new(AtomicUsize::new(0));
    let counter = crumb_requests.clone();

    let cookie = warp::path("cookie").map(|| {
        warp::reply::with_header(
            warp::reply::with_status("", StatusCode::NOT_FOUND),
            "set-cookie",
            "A3=d=mock; Path=/",
        )
    });

    let crumb = warp::path!("v1" / "test" / "getcrumb").map(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        CRUMB
    });

    let summary = warp::path!("v10" / "finance" / "quoteSummary" / String)
        .and(warp::query::<HashMap<String, String>>())
        .map(|symbol: String, params: HashMap<String, String>| {
            if params.get("crumb").map(String::as_str) != Some(CRUMB) || symbol == "EXPIRED" {
                return warp::reply::with_status(
                    r#"{"finance":{"result":null,"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#
                        .to_string(),
                    StatusCode::UNAUTHORIZED,
                );
            }
            match symbol.as_str() {
                "AAPL" => warp::reply::with_status(AAPL_SUMMARY.to_string(), StatusCode::OK),
                "BROKEN" => warp::reply::with_status("<html>oops</html>".to_string(), StatusCode::OK),
                _ => warp::reply::with_status(NOT_FOUND_SUMMARY.to_string(), StatusCode::NOT_FOUND),
            }
        });

    let chart = warp::path!("v8" / "finance" / "chart" / String)
        .and(warp::query::<HashMap<String, String>>())
        .map(|symbol: String, params: HashMap<String, String>| {
            let valid = params.get("range").map(String::as_str) == Some("1mo")
                && params.get("interval").map(String::as_str) == Some("1d");
            if symbol == "AAPL" && valid {
                warp::reply::with_status(AAPL_CHART.to_string(), StatusCode::OK)
            } else {
                warp::reply::with_status(
                    r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#
                        .to_string(),
                    StatusCode::NOT_FOUND,
                )
            }
        });

    let routes = warp::get().and(cookie.or(crumb).or(summary).or(chart));
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    MockYahoo {
        addr,
        crumb_requests,
    }
}

fn provider_for(mock: &MockYahoo) -> YahooProvider {
    let base = format!("http://{}", mock.addr);
    YahooProvider::new(base.clone(), format!("{}/cookie", base)).expect("client should build")
}

fn t(s: &str) -> TickerSymbol {
    TickerSymbol::parse(s).unwrap()
}

#[tokio::test]
async fn quote_maps_summary_modules() {
    let mock = spawn_mock_yahoo();
    let provider = provider_for(&mock);

    let snapshot = provider.quote(&t("AAPL")).await.expect("quote should succeed");

    assert_eq!(snapshot.current_price, Some(184.25));
    assert_eq!(snapshot.previous_close, Some(185.64));
    assert_eq!(snapshot.volume, Some(58_414_500));
    assert_eq!(snapshot.market_cap, Some(2_870_000_000_000.0));
    assert_eq!(snapshot.sector.as_deref(), Some("Technology"));
    assert_eq!(snapshot.industry, None);
    assert_eq!(snapshot.long_name.as_deref(), Some("Apple Inc."));
}

#[tokio::test]
async fn crumb_is_fetched_once_and_reused() {
    let mock = spawn_mock_yahoo();
    let provider = provider_for(&mock);

    provider.quote(&t("AAPL")).await.unwrap();
    provider.quote(&t("AAPL")).await.unwrap();
    provider.quote(&t("NOPE")).await.unwrap();

    assert_eq!(mock.crumb_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_crumb_is_refreshed_on_next_call() {
    let mock = spawn_mock_yahoo();
    let provider = provider_for(&mock);

    assert!(provider.quote(&t("EXPIRED")).await.is_err());
    provider.quote(&t("AAPL")).await.unwrap();

    assert_eq!(mock.crumb_requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn history_is_ascending_for_one_month() {
    let mock = spawn_mock_yahoo();
    let provider = provider_for(&mock);

    let series = provider.history(&t("AAPL"), Period::OneMonth).await.unwrap();

    assert_eq!(series.len(), 3);
    assert!(series
        .bars()
        .windows(2)
        .all(|pair| pair[0].timestamp < pair[1].timestamp));
    assert_eq!(series.bars()[0].close, 185.64);
}

#[tokio::test]
async fn missing_chart_is_empty_series() {
    let mock = spawn_mock_yahoo();
    let provider = provider_for(&mock);

    let series = provider.history(&t("AAPL"), Period::FiveYears).await.unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn retriever_distinguishes_not_found_from_failure() {
    let mock = spawn_mock_yahoo();
    let retriever = QuoteRetriever::new(Arc::new(provider_for(&mock)));

    let (snapshot, history) = retriever.fetch(&t("aapl"), Period::OneMonth).await.unwrap();
    assert_eq!(snapshot.current_price, Some(184.25));
    assert_eq!(history.len(), 3);

    let missing = retriever.fetch(&t("NOPE"), Period::OneMonth).await.unwrap_err();
    assert_eq!(missing, LookupError::NotFound { ticker: "NOPE".to_string() });

    let broken = retriever.fetch(&t("BROKEN"), Period::OneMonth).await.unwrap_err();
    assert!(matches!(broken, LookupError::ProviderFailure(_)));
}

#[tokio::test]
async fn unreachable_provider_is_a_failure() {
    // Nothing listens on port 9 (discard) on loopback
    let provider = YahooProvider::new("http://127.0.0.1:9", "http://127.0.0.1:9/cookie").unwrap();
    let retriever = QuoteRetriever::new(Arc::new(provider));

    let err = retriever.fetch(&t("AAPL"), Period::OneMonth).await.unwrap_err();
    assert!(matches!(err, LookupError::ProviderFailure(_)));
}
