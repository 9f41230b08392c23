//! Plain-text report rendering
//!
//! Every renderer returns a `String`; printing is left to the caller.

use crate::detector::ScanReport;
use crate::stats::{SummaryStats, YearlyStat};
use crate::sweep::SweepRow;
use crate::{BreakoutEvent, BreakoutParams, Outcome, Symbol};

const WIDTH: usize = 80;

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

/// Headline results of one detection run
pub fn render_summary(
    symbol: &Symbol,
    params: &BreakoutParams,
    scan: &ScanReport,
    stats: &SummaryStats,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", rule('=')));
    out.push_str(&format!("BREAKOUT ANALYSIS: {}\n", symbol));
    out.push_str(&format!("{}\n", rule('=')));
    out.push_str(&format!(
        ">= {:.1}% daily gain, hold above low for {} days, outcome after {} days\n",
        params.threshold_pct, params.hold_days, params.future_days
    ));
    out.push_str(&format!(
        "Candidates: {} ({} failed hold, {} too recent to confirm)\n",
        scan.candidates, scan.rejected_failed_hold, scan.rejected_insufficient_history
    ));

    if stats.total == 0 {
        out.push_str("No valid breakouts found with the given criteria\n");
        out.push_str(&format!("{}\n", rule('=')));
        return out;
    }

    out.push_str(&format!("Total valid breakouts:  {}\n", stats.total));
    out.push_str(&format!("Completed breakouts:    {}\n", stats.completed));
    out.push_str(&format!(
        "Pending breakouts:      {} (awaiting results)\n",
        stats.pending
    ));

    if stats.completed > 0 {
        out.push_str(&format!(
            "Win rate (completed):   {:.1}% ({}/{})\n",
            stats.win_rate, stats.wins, stats.completed
        ));
        out.push_str(&format!("Average future return:  {:.1}%\n", stats.avg_return));
        out.push_str(&format!("Median future return:   {:.1}%\n", stats.median_return));
        out.push_str(&format!("Min:                    {:.1}%\n", stats.min_return));
        out.push_str(&format!("Max:                    {:.1}%\n", stats.max_return));
        out.push_str(&format!("Std Dev:                {:.1}%\n", stats.std_return));
    }
    out.push_str(&format!(
        "Average breakout return: {:.1}%\n",
        stats.avg_breakout_return
    ));
    out.push_str(&format!("{}\n", rule('=')));

    out
}

/// The last `n` events, one line each
pub fn render_recent(events: &[BreakoutEvent], n: usize, future_days: usize) -> String {
    if events.is_empty() || n == 0 {
        return String::new();
    }

    let mut out = format!("\nRecent Breakouts (last {}):\n", n.min(events.len()));
    for e in &events[events.len().saturating_sub(n)..] {
        let line = match e.outcome {
            Outcome::Pending => format!(
                "{}: {:.1}% -> PENDING (awaiting {} trading days)",
                e.breakout_date, e.breakout_return, future_days
            ),
            Outcome::Completed {
                future_return,
                is_winner,
                ..
            } => format!(
                "{}: {:.1}% -> {:.1}% ({})",
                e.breakout_date,
                e.breakout_return,
                future_return,
                if is_winner { "WIN" } else { "LOSS" }
            ),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Win rate by year table
pub fn render_yearly(years: &[YearlyStat]) -> String {
    if years.is_empty() {
        return "No year has enough completed breakouts to report.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("\n{}\n", rule('=')));
    out.push_str("WIN RATE BY YEAR\n");
    out.push_str(&format!("{}\n", rule('=')));
    out.push_str(&format!(
        "{:>6} │ {:>10} │ {:>6} │ {:>10} │ {:>12}\n",
        "Year", "Breakouts", "Wins", "Win Rate", "Avg Return"
    ));
    out.push_str(&format!("{}\n", rule('-')));

    for y in years {
        out.push_str(&format!(
            "{:>6} │ {:>10} │ {:>6} │ {:>9.1}% │ {:>11.1}%\n",
            y.year, y.total, y.wins, y.win_rate, y.avg_return
        ));
    }
    out.push_str(&format!("{}\n", rule('=')));
    out
}

/// Parameter sweep table
pub fn render_sweep(rows: &[SweepRow]) -> String {
    let mut out = String::new();
    out.push_str("\nParameter Sweep Results:\n");
    out.push_str(&format!("{}\n", rule('=')));
    out.push_str(&format!(
        "{:>10} | {:>10} | {:>8} | {:>10} | {:>12} | {:>8} | {:>8} | {:>8}\n",
        "Threshold", "Breakouts", "Pending", "Win Rate", "Avg Return", "Median", "Min", "Max"
    ));
    out.push_str(&format!("{}\n", rule('-')));

    for r in rows {
        out.push_str(&format!(
            "{:>10.1} | {:>10} | {:>8} | {:>9.1}% | {:>11.1}% | {:>7.1}% | {:>7.1}% | {:>7.1}%\n",
            r.threshold_pct,
            r.total_breakouts,
            r.pending,
            r.win_rate,
            r.avg_return,
            r.median_return,
            r.min_return,
            r.max_return
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(day: u32, outcome: Outcome) -> BreakoutEvent {
        BreakoutEvent {
            breakout_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            breakout_price: 30.0,
            breakout_return: 5.3,
            hold_period: Vec::new(),
            outcome,
        }
    }

    #[test]
    fn test_recent_lists_last_n() {
        let events = vec![
            event(1, Outcome::Pending),
            event(
                2,
                Outcome::Completed {
                    future_price: 33.0,
                    future_return: 10.0,
                    is_winner: true,
                },
            ),
            event(3, Outcome::Pending),
        ];

        let text = render_recent(&events, 2, 126);
        let lines: Vec<&str> = text.trim().lines().collect();
        assert_eq!(lines[0], "Recent Breakouts (last 2):");
        assert_eq!(lines[1], "2024-05-02: 5.3% -> 10.0% (WIN)");
        assert_eq!(
            lines[2],
            "2024-05-03: 5.3% -> PENDING (awaiting 126 trading days)"
        );
    }

    #[test]
    fn test_summary_for_empty_run() {
        let text = render_summary(
            &Symbol::new("SI=F"),
            &BreakoutParams::default(),
            &ScanReport::default(),
            &SummaryStats::default(),
        );
        assert!(text.contains("No valid breakouts found"));
    }

    #[test]
    fn test_sweep_table_has_row_per_threshold() {
        let rows = vec![
            SweepRow {
                threshold_pct: 3.0,
                ..SweepRow::default()
            },
            SweepRow {
                threshold_pct: 4.0,
                ..SweepRow::default()
            },
        ];
        let text = render_sweep(&rows);
        assert_eq!(text.lines().filter(|l| l.contains(" | ")).count(), 3);
    }
}
