//! Daily stats data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of mastery activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    /// Local calendar date, persisted as `yyyy-mm-dd`
    pub date: NaiveDate,
    /// Net number of words mastered on that day, never negative
    pub mastered_count: u32,
}

impl DailyStat {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            mastered_count: 0,
        }
    }
}
