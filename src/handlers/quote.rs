// src/handlers/quote.rs
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{Period, TickerSymbol, ValidationError};
use crate::services::dashboard::Dashboard;

#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub period: Option<String>,
}

#[derive(Serialize)]
struct PeriodsResponse {
    periods: Vec<Period>,
    default: Period,
}

pub async fn get_quote(
    raw_ticker: String,
    query: LookupQuery,
    dashboard: Arc<Dashboard>,
) -> Result<Json, Rejection> {
    info!("Handling lookup request for '{}'", raw_ticker);

    let decoded = urlencoding::decode(&raw_ticker).map_err(|_| {
        warp::reject::custom(ApiError::from(ValidationError::MalformedTicker(raw_ticker.clone())))
    })?;
    let ticker = TickerSymbol::parse(&decoded).map_err(|e| warp::reject::custom(ApiError::from(e)))?;
    let period = match query.period.as_deref() {
        Some(raw) => raw
            .parse::<Period>()
            .map_err(|e| warp::reject::custom(ApiError::from(e)))?,
        None => Period::default(),
    };

    match dashboard.lookup(ticker, period).await {
        Ok(view) => Ok(warp::reply::json(&view)),
        Err(e) => {
            error!("Lookup failed: {}", e);
            Err(warp::reject::custom(ApiError::from(e)))
        }
    }
}

pub async fn get_periods() -> Result<Json, Infallible> {
    Ok(warp::reply::json(&PeriodsResponse {
        periods: Period::ALL.to_vec(),
        default: Period::default(),
    }))
}
