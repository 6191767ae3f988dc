//! Game clock - year/month tracking, one month per turn

use serde::{Deserialize, Serialize};

use crate::core::config::CalendarConfig;

/// Clock tracks game time with month granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    year: i32,
    month: u32,
    months_per_year: u32,
}

impl Clock {
    /// `months_per_year` of zero is treated as one.
    pub fn new(year: i32, month: u32, months_per_year: u32) -> Self {
        let months_per_year = months_per_year.max(1);
        Self {
            year,
            month: month.clamp(1, months_per_year),
            months_per_year,
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(config.start_year, config.start_month, config.months_per_year)
    }

    /// Advance by one turn, rolling the month over into the next year
    pub fn advance_turn(&mut self) {
        self.month += 1;
        if self.month > self.months_per_year {
            self.month = 1;
            self.year += 1;
        }
    }

    pub fn current_year(&self) -> i32 {
        self.year
    }

    pub fn current_month(&self) -> u32 {
        self.month
    }

    pub fn months_per_year(&self) -> u32 {
        self.months_per_year
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::from_config(&CalendarConfig::default())
    }
}
