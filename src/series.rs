//! Ordered daily price series
//!
//! Bars are kept in a date-sorted `Vec` with a date -> position index so the
//! detector can work purely with positions.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::DataError;
use crate::Bar;

#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<Bar>,
    index: HashMap<NaiveDate, usize>,
}

impl PriceSeries {
    /// Build a series from bars in any order. Duplicate dates are rejected.
    pub fn new(mut bars: Vec<Bar>) -> Result<Self, DataError> {
        bars.sort_by_key(|b| b.date);

        let mut index = HashMap::with_capacity(bars.len());
        for (pos, bar) in bars.iter().enumerate() {
            if index.insert(bar.date, pos).is_some() {
                return Err(DataError::DuplicateDate(bar.date));
            }
        }

        Ok(Self { bars, index })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn get(&self, pos: usize) -> Option<&Bar> {
        self.bars.get(pos)
    }

    /// Position of the bar dated `date`
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.index.get(&date).copied()
    }

    pub fn by_date(&self, date: NaiveDate) -> Option<&Bar> {
        self.position(date).map(|pos| &self.bars[pos])
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}
