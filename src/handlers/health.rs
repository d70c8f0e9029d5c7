// src/handlers/health.rs
use std::convert::Infallible;
use warp::http::StatusCode;

pub async fn health() -> Result<impl warp::Reply, Infallible> {
    Ok(StatusCode::OK)
}
