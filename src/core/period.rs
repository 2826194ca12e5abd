use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{ViewportError, ViewportResult};

/// Calendar zoom level of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Year,
    #[default]
    Month,
    Day,
}

impl Granularity {
    /// Year columns hold no per-column vertical list worth following.
    #[must_use]
    pub const fn has_item_rows(self) -> bool {
        matches!(self, Self::Month | Self::Day)
    }
}

/// Identifier of one timeline column: `2021`, `2021-06` or `2021-06-15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PeriodKey {
    #[must_use]
    pub const fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    pub fn month(year: i32, month: u32) -> ViewportResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self {
                year,
                month: Some(month),
                day: None,
            })
            .ok_or_else(|| ViewportError::InvalidData(format!("invalid month {year}-{month}")))
    }

    pub fn day(year: i32, month: u32, day: u32) -> ViewportResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from)
            .ok_or_else(|| {
                ViewportError::InvalidData(format!("invalid day {year}-{month}-{day}"))
            })
    }

    /// Column key containing `date` at the given granularity.
    #[must_use]
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Year => Self::year(date.year()),
            Granularity::Month => Self {
                year: date.year(),
                month: Some(date.month()),
                day: None,
            },
            Granularity::Day => Self::from(date),
        }
    }

    #[must_use]
    pub fn granularity(self) -> Granularity {
        match (self.month, self.day) {
            (None, _) => Granularity::Year,
            (Some(_), None) => Granularity::Month,
            (Some(_), Some(_)) => Granularity::Day,
        }
    }

    /// First calendar day covered by the period.
    #[must_use]
    pub fn first_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::for_date(date, self.granularity()) == self
    }

    /// Moves `steps` periods forward (negative: backward) at this key's granularity.
    #[must_use]
    pub fn step(self, steps: i32) -> Option<Self> {
        let start = self.first_date()?;
        let granularity = self.granularity();
        let moved = match granularity {
            Granularity::Year => NaiveDate::from_ymd_opt(start.year().checked_add(steps)?, 1, 1),
            Granularity::Month => {
                let months = Months::new(steps.unsigned_abs());
                if steps >= 0 {
                    start.checked_add_months(months)
                } else {
                    start.checked_sub_months(months)
                }
            }
            Granularity::Day => start.checked_add_signed(TimeDelta::days(i64::from(steps))),
        }?;
        Some(Self::for_date(moved, granularity))
    }
}

impl From<NaiveDate> for PeriodKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (None, _) => write!(f, "{:04}", self.year),
            (Some(month), None) => write!(f, "{:04}-{month:02}", self.year),
            (Some(month), Some(day)) => write!(f, "{:04}-{month:02}-{day:02}", self.year),
        }
    }
}

impl FromStr for PeriodKey {
    type Err = ViewportError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ViewportError::InvalidData(format!("invalid period key `{input}`"));
        let mut parts = input.trim().split('-');
        let year = parts
            .next()
            .filter(|part| !part.is_empty())
            .and_then(|part| part.parse::<i32>().ok())
            .ok_or_else(invalid)?;
        let month = parts
            .next()
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .transpose()?;
        let day = parts
            .next()
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .transpose()?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        match (month, day) {
            (None, _) => Ok(Self::year(year)),
            (Some(month), None) => Self::month(year, month),
            (Some(month), Some(day)) => Self::day(year, month, day),
        }
    }
}

/// What the resolver should look for: a document, a period column, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub selection_id: Option<String>,
    pub period_key: Option<PeriodKey>,
}

impl TargetDescriptor {
    #[must_use]
    pub fn selection(id: impl Into<String>) -> Self {
        Self {
            selection_id: Some(id.into()),
            period_key: None,
        }
    }

    #[must_use]
    pub fn period(key: PeriodKey) -> Self {
        Self {
            selection_id: None,
            period_key: Some(key),
        }
    }

    #[must_use]
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        Self::period(PeriodKey::for_date(date, granularity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selection_id.is_none() && self.period_key.is_none()
    }
}
