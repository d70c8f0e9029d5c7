// src/handlers/export.rs
use log::{error, info};
use std::sync::Arc;
use warp::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::http::Response;
use warp::Rejection;

use super::error::ApiError;
use crate::services::dashboard::Dashboard;

pub async fn get_export(dashboard: Arc<Dashboard>) -> Result<Response<String>, Rejection> {
    let export = dashboard
        .export_current()
        .await
        .map_err(|e| {
            error!("Failed to build CSV export: {}", e);
            warp::reject::custom(ApiError::internal(e.to_string()))
        })?
        .ok_or_else(|| {
            warp::reject::custom(ApiError::not_found(
                "Nothing to export yet, look up a ticker first",
            ))
        })?;

    info!("Exporting {}", export.file_name);
    Response::builder()
        .header(CONTENT_TYPE, "text/csv")
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
        )
        .body(export.body)
        .map_err(|e| warp::reject::custom(ApiError::internal(e.to_string())))
}
