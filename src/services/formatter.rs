// src/services/formatter.rs
use serde::Serialize;

use crate::models::{QuoteSnapshot, TickerSymbol};

pub const PLACEHOLDER: &str = "N/A";

/// Display strings derived from a [`QuoteSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFields {
    pub price: String,
    pub delta: Option<String>,
    pub volume: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub open: String,
    pub day_high: String,
    pub day_low: String,
    pub fifty_two_week_high: String,
    pub fifty_two_week_low: String,
    pub sector: String,
    pub industry: String,
    pub country: String,
    pub website: String,
    pub website_link: Option<String>,
}

/// Never fails: absent, zero and NaN values all collapse to [`PLACEHOLDER`].
pub fn format(snapshot: &QuoteSnapshot) -> DisplayFields {
    let website_link = text(&snapshot.website).map(str::to_string);

    DisplayFields {
        price: format_price(snapshot.current_price),
        delta: format_delta(snapshot.current_price, snapshot.previous_close),
        volume: format_volume(snapshot.volume),
        market_cap: format_market_cap(snapshot.market_cap),
        pe_ratio: truthy(snapshot.trailing_pe)
            .map(|pe| format!("{:.2}", pe))
            .unwrap_or_else(placeholder),
        open: format_price(snapshot.open),
        day_high: format_price(snapshot.day_high),
        day_low: format_price(snapshot.day_low),
        fifty_two_week_high: format_price(snapshot.fifty_two_week_high),
        fifty_two_week_low: format_price(snapshot.fifty_two_week_low),
        sector: text_or_placeholder(&snapshot.sector),
        industry: text_or_placeholder(&snapshot.industry),
        country: text_or_placeholder(&snapshot.country),
        website: website_link.clone().unwrap_or_else(placeholder),
        website_link,
    }
}

/// Page heading, e.g. `Apple Inc. (AAPL)`.
pub fn title(ticker: &TickerSymbol, snapshot: &QuoteSnapshot) -> String {
    let name = text(&snapshot.long_name).unwrap_or(ticker.as_str());
    format!("{} ({})", name, ticker)
}

pub fn format_price(value: Option<f64>) -> String {
    truthy(value).map(format_currency).unwrap_or_else(placeholder)
}

/// `+1.25 (+0.66%)`, or `None` when there is no previous close to compare
/// against or the price did not move.
pub fn format_delta(current_price: Option<f64>, previous_close: Option<f64>) -> Option<String> {
    let current = truthy(current_price)?;
    let previous = truthy(previous_close)?;
    let change = current - previous;
    if change == 0.0 {
        return None;
    }
    let change_percent = change / previous * 100.0;
    Some(format!("{:+.2} ({:+.2}%)", change, change_percent))
}

pub fn format_volume(volume: Option<u64>) -> String {
    volume
        .filter(|v| *v != 0)
        .map(|v| group_thousands(&v.to_string()))
        .unwrap_or_else(placeholder)
}

pub fn format_market_cap(market_cap: Option<f64>) -> String {
    let Some(cap) = truthy(market_cap) else {
        return placeholder();
    };

    if cap >= 1e12 {
        format!("${:.2}T", cap / 1e12)
    } else if cap >= 1e9 {
        format!("${:.2}B", cap / 1e9)
    } else if cap >= 1e6 {
        format!("${:.2}M", cap / 1e6)
    } else {
        format!("${}", group_thousands(&format!("{:.0}", cap)))
    }
}

/// `$1,234.50`
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    match fixed.split_once('.') {
        Some((whole, frac)) => format!("${}.{}", group_thousands(whole), frac),
        None => format!("${}", group_thousands(&fixed)),
    }
}

/// Insert `,` every three digits of an integer string, keeping a leading `-`.
fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let len = digits.len();
    let mut grouped = String::with_capacity(sign.len() + len + len / 3);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn text_or_placeholder(value: &Option<String>) -> String {
    text(value).map(str::to_string).unwrap_or_else(placeholder)
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_cap_uses_magnitude_suffix() {
        assert_eq!(format_market_cap(Some(2_500_000_000_000.0)), "$2.50T");
        assert_eq!(format_market_cap(Some(850_000_000.0)), "$850.00M");
        assert_eq!(format_market_cap(Some(12_340_000_000.0)), "$12.34B");
        assert_eq!(format_market_cap(Some(1_000_000.0)), "$1.00M");
        assert_eq!(format_market_cap(Some(999_999.0)), "$999,999");
        assert_eq!(format_market_cap(Some(0.0)), "N/A");
        assert_eq!(format_market_cap(None), "N/A");
    }

    #[test]
    fn zero_price_is_placeholder_regardless_of_other_fields() {
        let snapshot = QuoteSnapshot {
            current_price: Some(0.0),
            previous_close: Some(100.0),
            volume: Some(10),
            ..Default::default()
        };
        let fields = format(&snapshot);
        assert_eq!(fields.price, "N/A");
        assert_eq!(fields.volume, "10");
    }

    #[test]
    fn delta_shows_signed_change_and_percent() {
        assert_eq!(format_delta(Some(150.0), Some(100.0)).as_deref(), Some("+50.00 (+50.00%)"));
        assert_eq!(format_delta(Some(95.5), Some(100.0)).as_deref(), Some("-4.50 (-4.50%)"));
    }

    #[test]
    fn delta_is_omitted_without_previous_close() {
        assert_eq!(format_delta(Some(150.0), Some(0.0)), None);
        assert_eq!(format_delta(Some(150.0), None), None);
        assert_eq!(format_delta(Some(100.0), Some(100.0)), None);
    }

    #[test]
    fn currency_and_volume_are_grouped() {
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_volume(Some(51_234_567)), "51,234,567");
        assert_eq!(format_volume(Some(0)), "N/A");
        assert_eq!(format_volume(None), "N/A");
    }

    #[test]
    fn group_thousands_keeps_sign() {
        assert_eq!(group_thousands("-1234567"), "-1,234,567");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1000"), "1,000");
    }

    #[test]
    fn text_fields_fall_back_to_placeholder() {
        let snapshot = QuoteSnapshot {
            sector: Some("Technology".to_string()),
            website: Some("https://www.apple.com".to_string()),
            country: Some(String::new()),
            trailing_pe: Some(29.4123),
            ..Default::default()
        };
        let fields = format(&snapshot);
        assert_eq!(fields.sector, "Technology");
        assert_eq!(fields.industry, "N/A");
        assert_eq!(fields.country, "N/A");
        assert_eq!(fields.website, "https://www.apple.com");
        assert_eq!(fields.website_link.as_deref(), Some("https://www.apple.com"));
        assert_eq!(fields.pe_ratio, "29.41");
        assert_eq!(fields.open, "N/A");
    }

    #[test]
    fn title_falls_back_to_ticker() {
        let ticker = TickerSymbol::parse("aapl").unwrap();
        let mut snapshot = QuoteSnapshot::default();
        assert_eq!(title(&ticker, &snapshot), "AAPL (AAPL)");
        snapshot.long_name = Some("Apple Inc.".to_string());
        assert_eq!(title(&ticker, &snapshot), "Apple Inc. (AAPL)");
    }
}
