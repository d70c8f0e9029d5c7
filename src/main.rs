use anyhow::anyhow;
use env_logger;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use stock_dashboard::config::Config;
use stock_dashboard::routes;
use stock_dashboard::services::dashboard::Dashboard;
use stock_dashboard::services::quote::QuoteRetriever;
use stock_dashboard::services::yahoo::YahooProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = Config::from_env()?;

    let provider = YahooProvider::new(&config.yahoo_query_url, &config.yahoo_cookie_url)
        .map_err(|e| anyhow!("failed to build Yahoo client: {}", e))?;
    let retriever = QuoteRetriever::new(Arc::new(provider)).with_timeout(config.provider_timeout);
    let dashboard = Arc::new(Dashboard::new(retriever));

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(dashboard).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;

    Ok(())
}
