// src/bin/lookup.rs
use anyhow::{anyhow, bail};
use env_logger;
use log::{error, info};
use std::sync::Arc;

use stock_dashboard::config::Config;
use stock_dashboard::models::{Period, TickerSymbol};
use stock_dashboard::services::dashboard::Dashboard;
use stock_dashboard::services::quote::QuoteRetriever;
use stock_dashboard::services::yahoo::YahooProvider;

const USAGE: &str = "usage: lookup <TICKER> [PERIOD] [--csv]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let write_csv = match args.iter().position(|a| a == "--csv") {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };

    let Some(raw_ticker) = args.first() else {
        bail!(USAGE);
    };
    let ticker = TickerSymbol::parse(raw_ticker)?;
    let period = match args.get(1) {
        Some(raw) => raw.parse::<Period>()?,
        None => Period::default(),
    };

    let config = Config::from_env()?;
    let provider = YahooProvider::new(&config.yahoo_query_url, &config.yahoo_cookie_url)
        .map_err(|e| anyhow!("failed to build Yahoo client: {}", e))?;
    let dashboard = Dashboard::new(
        QuoteRetriever::new(Arc::new(provider)).with_timeout(config.provider_timeout),
    );

    info!("Looking up {} over {}...", ticker, period);

    let view = match dashboard.lookup(ticker, period).await {
        Ok(view) => view,
        Err(e) => {
            error!("{}", e);
            error!("{}", e.hint());
            return Err(e.into());
        }
    };

    let d = &view.display;
    println!("{}", view.title);
    match &d.delta {
        Some(delta) => println!("  Price:        {} {}", d.price, delta),
        None => println!("  Price:        {}", d.price),
    }
    println!("  Volume:       {}", d.volume);
    println!("  Market Cap:   {}", d.market_cap);
    println!("  P/E Ratio:    {}", d.pe_ratio);
    println!("  Open:         {}", d.open);
    println!("  Day High:     {}", d.day_high);
    println!("  Day Low:      {}", d.day_low);
    println!("  52 Week High: {}", d.fifty_two_week_high);
    println!("  52 Week Low:  {}", d.fifty_two_week_low);
    println!("  Sector:       {}", d.sector);
    println!("  Industry:     {}", d.industry);
    println!("  Country:      {}", d.country);
    println!("  Website:      {}", d.website);
    println!("  History:      {} bars", view.history.len());

    if write_csv {
        if let Some(export) = dashboard.export_current().await? {
            std::fs::write(&export.file_name, &export.body)?;
            info!("Wrote {}", export.file_name);
        }
    }

    Ok(())
}
