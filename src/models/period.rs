use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Month of a closing period.
///
/// Persisted rows store the month by its lowercase Spanish name, so that is
/// the canonical text form (`as_str`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Enero => "enero",
            Month::Febrero => "febrero",
            Month::Marzo => "marzo",
            Month::Abril => "abril",
            Month::Mayo => "mayo",
            Month::Junio => "junio",
            Month::Julio => "julio",
            Month::Agosto => "agosto",
            Month::Septiembre => "septiembre",
            Month::Octubre => "octubre",
            Month::Noviembre => "noviembre",
            Month::Diciembre => "diciembre",
        }
    }

    pub fn from_number(n: u32) -> Option<Self> {
        Month::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    /// Accepts the Spanish name (any case) or the month number.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if let Ok(n) = s.parse::<u32>() {
            return Month::from_number(n);
        }
        Month::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(month, year)` scope of every remote read, write and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub month: Month,
    pub year: i32,
}

impl Period {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// The period containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        // chrono months are always 1..=12
        let month = Month::from_number(today.month()).unwrap_or(Month::Enero);
        Self::new(month, today.year())
    }

    /// Parse `abril-2025`, `abril 2025`, `2025-04` or `2025-abril`.
    pub fn parse(s: &str) -> AppResult<Self> {
        let invalid = || AppError::InvalidPeriod(s.to_string());

        let parts: Vec<&str> = s
            .split(|c: char| c == '-' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() != 2 {
            return Err(invalid());
        }

        // YYYY-MM or MM-YYYY, decided by which side looks like a year
        let (month_part, year_part) = if parts[0].len() == 4 && parts[0].parse::<i32>().is_ok() {
            (parts[1], parts[0])
        } else {
            (parts[0], parts[1])
        };

        let month = Month::parse(month_part).ok_or_else(invalid)?;
        let year = year_part.parse::<i32>().map_err(|_| invalid())?;

        Ok(Self::new(month, year))
    }

    /// Identity of the remote row for `location_id` in this period.
    pub fn composite_id(&self, location_id: &str) -> String {
        format!("{}-{}-{}", self.month.as_str(), self.year, location_id)
    }

    /// True when a remote row or event with this month/year text belongs here.
    pub fn matches(&self, month: &str, year: i32) -> bool {
        self.month.as_str() == month && self.year == year
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}
