// src/handlers/recent.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reply::Json;

use crate::services::dashboard::Dashboard;

pub async fn get_recent(dashboard: Arc<Dashboard>) -> Result<Json, Infallible> {
    let recent = dashboard.recent().await;
    info!("Returning {} recent tickers", recent.len());
    Ok(warp::reply::json(&recent))
}
