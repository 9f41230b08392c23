//! CSV and JSON exports of breakout events and sweep rows

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::sweep::SweepRow;
use crate::{BreakoutEvent, BreakoutStatus};

/// Flat CSV row for one event; the hold period is omitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub breakout_date: NaiveDate,
    pub breakout_price: f64,
    pub breakout_return: f64,
    pub future_price: Option<f64>,
    pub future_return: Option<f64>,
    pub is_winner: Option<bool>,
    pub status: BreakoutStatus,
}

impl From<&BreakoutEvent> for EventRecord {
    fn from(e: &BreakoutEvent) -> Self {
        EventRecord {
            breakout_date: e.breakout_date,
            breakout_price: e.breakout_price,
            breakout_return: e.breakout_return,
            future_price: e.future_price(),
            future_return: e.future_return(),
            is_winner: e.is_winner(),
            status: e.status(),
        }
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

fn write_records<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create {}", path.display()))?;

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write events as CSV; pending events leave the outcome columns empty
pub fn export_events_csv(path: impl AsRef<Path>, events: &[BreakoutEvent]) -> Result<()> {
    let path = path.as_ref();
    let count = write_records(path, events.iter().map(EventRecord::from))?;
    info!("Results exported to {} ({} events)", path.display(), count);
    Ok(())
}

/// Write events, including hold periods, as pretty JSON
pub fn export_events_json(path: impl AsRef<Path>, events: &[BreakoutEvent]) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), events)
        .context("Failed to serialize events")?;
    info!("Events exported to {}", path.display());
    Ok(())
}

/// Write the sweep table as CSV
pub fn export_sweep_csv(path: impl AsRef<Path>, rows: &[SweepRow]) -> Result<()> {
    let path = path.as_ref();
    write_records(path, rows)?;
    info!("Parameter sweep table saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Outcome;

    fn events() -> Vec<BreakoutEvent> {
        let date = |d| NaiveDate::from_ymd_opt(2021, 2, d).unwrap();
        vec![
            BreakoutEvent {
                breakout_date: date(1),
                breakout_price: 26.0,
                breakout_return: 9.5,
                hold_period: Vec::new(),
                outcome: Outcome::Completed {
                    future_price: 24.0,
                    future_return: -7.5,
                    is_winner: false,
                },
            },
            BreakoutEvent {
                breakout_date: date(2),
                breakout_price: 27.0,
                breakout_return: 5.5,
                hold_period: Vec::new(),
                outcome: Outcome::Pending,
            },
        ]
    }

    #[test]
    fn test_events_csv_leaves_pending_fields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/events.csv");
        export_events_csv(&path, &events()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "breakout_date,breakout_price,breakout_return,future_price,future_return,is_winner,status"
        );
        assert_eq!(lines[1], "2021-02-01,26.0,9.5,24.0,-7.5,false,completed");
        assert_eq!(lines[2], "2021-02-02,27.0,5.5,,,,pending");
    }

    #[test]
    fn test_events_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        export_events_json(&path, &events()).unwrap();

        let loaded: Vec<BreakoutEvent> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, events());
    }

    #[test]
    fn test_sweep_csv_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");
        let rows = vec![SweepRow {
            threshold_pct: 5.0,
            ..SweepRow::default()
        }];
        export_sweep_csv(&path, &rows).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("threshold_pct,candidates,total_breakouts,"));
    }
}
