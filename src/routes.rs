// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;
use log::{debug, info};
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::{
    export::get_export,
    health::health,
    quote::{get_periods, get_quote, LookupQuery},
    recent::get_recent,
};
use crate::services::dashboard::Dashboard;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;
    let mut hint = None;

    if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
        hint = api_error.hint.clone();
    } else if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(invalid) = err.find::<warp::reject::InvalidQuery>() {
        code = StatusCode::BAD_REQUEST;
        message = invalid.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        debug!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
            "hint": hint,
        })),
        code,
    ))
}

pub fn routes(dashboard: Arc<Dashboard>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let dashboard_filter = warp::any().map(move || dashboard.clone());

    let quote_route = warp::path!("api" / "v1" / "quote" / String)
        .and(warp::get())
        .and(warp::query::<LookupQuery>())
        .and(dashboard_filter.clone())
        .and_then(get_quote);

    let export_route = warp::path!("api" / "v1" / "export")
        .and(warp::get())
        .and(dashboard_filter.clone())
        .and_then(get_export);

    let recent_route = warp::path!("api" / "v1" / "recent")
        .and(warp::get())
        .and(dashboard_filter.clone())
        .and_then(get_recent);

    let periods_route = warp::path!("api" / "v1" / "periods")
        .and(warp::get())
        .and_then(get_periods);

    let health_route = warp::path!("health")
        .and(warp::get())
        .and_then(health);

    info!("All routes configured successfully.");

    quote_route
        .or(export_route)
        .or(recent_route)
        .or(periods_route)
        .or(health_route)
        .recover(handle_rejection)
}
