//! Yahoo Finance chart API types
//!
//! The v8 chart endpoint returns column arrays (one entry per timestamp);
//! any column may hold `null` for days without a print.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

use crate::Bar;

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub currency: Option<String>,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
    #[serde(default)]
    pub exchange_timezone_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

impl ChartResult {
    /// Exchange time zone, when Yahoo names one we recognise
    fn exchange_tz(&self) -> Option<Tz> {
        self.meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
    }

    /// Exchange-local calendar date of a bar timestamp.
    ///
    /// `gmtoffset` is the offset at fetch time only, so it is used only when
    /// the zone name is missing or unknown.
    fn local_date(&self, tz: Option<Tz>, ts: i64) -> Option<NaiveDate> {
        match tz {
            Some(tz) => tz.timestamp_opt(ts, 0).single().map(|dt| dt.date_naive()),
            None => {
                DateTime::from_timestamp(ts + self.meta.gmtoffset, 0).map(|dt| dt.date_naive())
            }
        }
    }

    /// Convert the column arrays into validated daily bars.
    ///
    /// Rows with a missing price are dropped. When two timestamps map to the
    /// same date (a live bar appended after the daily one) the later wins.
    pub fn to_bars(&self) -> Vec<Bar> {
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };

        let tz = self.exchange_tz();
        let mut bars: Vec<Bar> = Vec::with_capacity(self.timestamp.len());
        let mut skipped = 0;

        for (i, &ts) in self.timestamp.iter().enumerate() {
            let row = (
                self.local_date(tz, ts),
                column(&quote.open, i),
                column(&quote.high, i),
                column(&quote.low, i),
                column(&quote.close, i),
            );
            let (Some(date), Some(open), Some(high), Some(low), Some(close)) = row else {
                skipped += 1;
                continue;
            };

            let bar = match Bar::new(date, open, high, low, close) {
                Ok(bar) => bar,
                Err(e) => {
                    warn!("{}: skipping invalid bar on {}: {}", self.meta.symbol, date, e);
                    skipped += 1;
                    continue;
                }
            };
            let bar = match column(&quote.volume, i) {
                Some(v) => bar.with_volume(v),
                None => bar,
            };

            match bars.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => bars.push(bar),
            }
        }

        if skipped > 0 {
            warn!(
                "{}: skipped {} incomplete rows out of {}",
                self.meta.symbol,
                skipped,
                self.timestamp.len()
            );
        }

        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "SI=F", "currency": "USD", "gmtoffset": -14400,
                          "exchangeTimezoneName": "America/New_York" },
                "timestamp": [1704171600, 1704258000, 1704344400, 1704430800, 1704445000],
                "indicators": { "quote": [{
                    "open":   [23.9, 23.5, null, 23.2, 23.3],
                    "high":   [24.1, 23.7, 23.4, 23.6, 23.5],
                    "low":    [23.4, 23.1, 23.0, 23.0, 23.1],
                    "close":  [23.7, 23.2, 23.1, 23.4, 23.45],
                    "volume": [1200, 980, 0, null, 15]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_response() {
        let response: ChartResponse = serde_json::from_str(SAMPLE).unwrap();
        let result = &response.chart.result.unwrap()[0];
        assert_eq!(result.meta.symbol, "SI=F");
        assert_eq!(
            result.meta.exchange_timezone_name.as_deref(),
            Some("America/New_York")
        );

        let bars = result.to_bars();
        // null open dropped, last two timestamps share a local date
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].volume, Some(1200.0));
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(bars[2].close, 23.45);
    }

    fn chart(timezone: Option<&str>, gmtoffset: i64, timestamps: &[i64]) -> ChartResult {
        let n = timestamps.len();
        ChartResult {
            meta: ChartMeta {
                symbol: "SI=F".to_string(),
                currency: Some("USD".to_string()),
                gmtoffset,
                exchange_timezone_name: timezone.map(str::to_string),
            },
            timestamp: timestamps.to_vec(),
            indicators: Indicators {
                quote: vec![Quote {
                    open: vec![Some(23.0); n],
                    high: vec![Some(24.0); n],
                    low: vec![Some(22.5); n],
                    close: vec![Some(23.5); n],
                    volume: vec![None; n],
                }],
            },
        }
    }

    #[test]
    fn test_summer_bar_dated_in_exchange_zone_when_fetched_in_winter() {
        // midnight New York on 2024-01-02 (EST) and 2024-07-01 (EDT)
        let result = chart(Some("America/New_York"), -18000, &[1704171600, 1719806400]);
        let bars = result.to_bars();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_gmtoffset_used_without_zone_name() {
        let result = chart(None, -18000, &[1704171600]);
        let bars = result.to_bars();
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let unknown = chart(Some("Mars/Olympus_Mons"), -18000, &[1704171600]);
        assert_eq!(unknown.to_bars()[0].date, bars[0].date);
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        assert!(response.chart.result.is_none());
        assert_eq!(response.chart.error.unwrap().code, "Not Found");
    }
}
