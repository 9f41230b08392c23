//! Integration tests for the breakout analysis pipeline
//!
//! These tests drive detection, aggregation, the sweep and the CSV provider
//! together on synthetic daily series.

use chrono::{Days, NaiveDate};

use breakout_analysis::analysis::analyze;
use breakout_analysis::data::{csv_path, fetch_with_fallback, write_csv, CsvProvider};
use breakout_analysis::detector::{detect_breakouts, scan};
use breakout_analysis::stats::summarize;
use breakout_analysis::sweep::{run_sweep, run_sweep_sequential, DEFAULT_THRESHOLDS};
use breakout_analysis::{Bar, BreakoutParams, BreakoutStatus, DataError, PriceSeries, Symbol};

// =============================================================================
// Test Utilities
// =============================================================================

fn date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Days::new(i as u64)
}

/// Deterministic random walk with an occasional large up day
fn generate_mock_bars(count: usize, seed: u64) -> Vec<Bar> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f64) / ((1u64 << 31) as f64)
    };

    let mut bars = Vec::with_capacity(count);
    let mut prev = 25.0;
    for i in 0..count {
        let u = next();
        let change = if u > 0.93 {
            0.04 + next() * 0.08
        } else {
            (u - 0.5) * 0.05
        };
        let close: f64 = prev * (1.0 + change);
        let open = prev;
        let low = open.min(close) * (1.0 - next() * 0.03);
        let high = open.max(close) * (1.0 + next() * 0.01);

        bars.push(Bar::new(date(i), open, high, low, close).unwrap());
        prev = close;
    }
    bars
}

fn mock_series(count: usize, seed: u64) -> PriceSeries {
    PriceSeries::new(generate_mock_bars(count, seed)).unwrap()
}

fn flat_series(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new_unchecked(date(i), c, c, c * 0.99, c))
        .collect();
    PriceSeries::new(bars).unwrap()
}

// =============================================================================
// Detection Properties
// =============================================================================

#[test]
fn test_reference_scenario_end_to_end() {
    let bars = vec![
        Bar::new_unchecked(date(0), 100.0, 100.0, 99.0, 100.0),
        Bar::new_unchecked(date(1), 101.0, 106.0, 105.0, 106.0),
        Bar::new_unchecked(date(2), 106.0, 107.5, 106.0, 107.0),
        Bar::new_unchecked(date(3), 107.0, 108.5, 107.0, 108.0),
        Bar::new_unchecked(date(4), 60.0, 60.0, 49.0, 50.0),
    ];
    let series = PriceSeries::new(bars).unwrap();
    let analysis = analyze(&series, &BreakoutParams::new(5.0, 2, 1)).unwrap();

    assert_eq!(analysis.scan.candidates, 1);
    assert_eq!(analysis.summary.total, 1);
    assert_eq!(analysis.summary.wins, 1);
    assert_eq!(analysis.summary.win_rate, 100.0);

    let event = &analysis.events()[0];
    assert_eq!(event.breakout_date, date(1));
    assert_eq!(event.breakout_price, 105.0);
    assert_eq!(event.future_price(), Some(107.0));
    assert_eq!(event.status(), BreakoutStatus::Completed);
}

#[test]
fn test_events_respect_threshold_and_hold() {
    let series = mock_series(1500, 7);
    let params = BreakoutParams::new(5.0, 2, 20);
    let events = detect_breakouts(&series, &params);

    assert!(!events.is_empty());
    for e in &events {
        assert!(e.breakout_return >= params.threshold_pct);

        let index = series.position(e.breakout_date).unwrap();
        assert_eq!(e.breakout_price, series.get(index).unwrap().low);
        for k in 1..=params.hold_days {
            assert!(series.get(index + k).unwrap().close >= e.breakout_price);
        }
        assert_eq!(e.hold_period.len(), params.hold_days + 1);
    }
}

#[test]
fn test_completed_iff_future_bar_exists() {
    let series = mock_series(800, 11);
    let params = BreakoutParams::new(4.0, 1, 60);

    for e in detect_breakouts(&series, &params) {
        let index = series.position(e.breakout_date).unwrap();
        let has_future = index + params.future_days < series.len();
        assert_eq!(e.is_completed(), has_future);

        if let (Some(price), Some(winner)) = (e.future_price(), e.is_winner()) {
            assert_eq!(price, series.get(index + params.future_days).unwrap().close);
            assert_eq!(winner, price > e.breakout_price);
        }
    }
}

#[test]
fn test_detection_is_idempotent() {
    let series = mock_series(1000, 3);
    let params = BreakoutParams::default();
    assert_eq!(scan(&series, &params), scan(&series, &params));
}

#[test]
fn test_breakout_on_last_bar_is_rejected() {
    let series = flat_series(&[100.0, 100.5, 101.0, 112.0]);
    let report = scan(&series, &BreakoutParams::new(5.0, 2, 5));

    assert_eq!(report.candidates, 1);
    assert_eq!(report.rejected_insufficient_history, 1);
    assert!(report.events.is_empty());
}

#[test]
fn test_no_breakouts_gives_zero_stats() {
    let series = flat_series(&[100.0, 101.0, 100.5, 101.5, 102.0]);
    let analysis = analyze(&series, &BreakoutParams::default()).unwrap();

    assert_eq!(analysis.summary.total, 0);
    assert_eq!(analysis.summary.win_rate, 0.0);
    assert!(analysis.yearly.is_empty());
}

#[test]
fn test_non_finite_threshold_is_rejected() {
    let series = mock_series(50, 1);
    assert!(analyze(&series, &BreakoutParams::default().with_threshold(f64::NAN)).is_err());
}

// =============================================================================
// Sweep
// =============================================================================

#[test]
fn test_sweep_matches_single_runs() {
    let series = mock_series(1200, 42);
    let base = BreakoutParams::new(5.0, 2, 30);
    let rows = run_sweep(&series, &base, DEFAULT_THRESHOLDS);

    assert_eq!(rows.len(), DEFAULT_THRESHOLDS.len());
    for (row, &t) in rows.iter().zip(DEFAULT_THRESHOLDS) {
        let stats = summarize(&detect_breakouts(&series, &base.with_threshold(t)));
        assert_eq!(row.threshold_pct, t);
        assert_eq!(row.total_breakouts, stats.total);
        assert_eq!(row.completed, stats.completed);
        assert_eq!(row.wins, stats.wins);
        assert_eq!(row.win_rate, stats.win_rate);
        assert_eq!(row.avg_return, stats.avg_return);
    }

    assert_eq!(rows, run_sweep_sequential(&series, &base, DEFAULT_THRESHOLDS));
}

#[test]
fn test_higher_threshold_never_adds_candidates() {
    let series = mock_series(1200, 5);
    let rows = run_sweep(&series, &BreakoutParams::default(), &[3.0, 5.0, 7.0, 9.0]);

    for pair in rows.windows(2) {
        assert!(pair[1].candidates <= pair[0].candidates);
    }
}

// =============================================================================
// CSV Provider
// =============================================================================

#[test]
fn test_csv_provider_falls_back_to_alternate() {
    let dir = tempfile::tempdir().unwrap();
    let slv = Symbol::new("SLV");
    let bars = generate_mock_bars(300, 9);
    write_csv(csv_path(dir.path(), &slv), &bars).unwrap();

    let provider = CsvProvider::new(dir.path());
    let (symbol, series) = fetch_with_fallback(
        &provider,
        &Symbol::new("SI=F"),
        &[Symbol::new("XAGUSD=X"), slv.clone()],
        date(0),
        None,
    )
    .unwrap();

    assert_eq!(symbol, slv);
    assert_eq!(series.len(), bars.len());
    assert_eq!(series.first_date(), Some(date(0)));
}

#[test]
fn test_csv_provider_honours_date_range() {
    let dir = tempfile::tempdir().unwrap();
    let symbol = Symbol::new("SI=F");
    write_csv(csv_path(dir.path(), &symbol), &generate_mock_bars(100, 2)).unwrap();

    let provider = CsvProvider::new(dir.path());
    let (_, series) =
        fetch_with_fallback(&provider, &symbol, &[], date(10), Some(date(19))).unwrap();

    assert_eq!(series.len(), 10);
    assert_eq!(series.first_date(), Some(date(10)));
    assert_eq!(series.last_date(), Some(date(19)));
}

#[test]
fn test_all_symbols_missing() {
    let dir = tempfile::tempdir().unwrap();
    let provider = CsvProvider::new(dir.path());

    let err = fetch_with_fallback(
        &provider,
        &Symbol::new("SI=F"),
        &[Symbol::new("SLV")],
        date(0),
        None,
    )
    .unwrap_err();

    match err {
        DataError::AllSymbolsFailed { tried } => assert_eq!(tried, vec!["SI=F", "SLV"]),
        other => panic!("unexpected error: {}", other),
    }
}
