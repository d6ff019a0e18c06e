//! Month naming used to derive ledger sheet names.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const SPANISH_MONTHS: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
/// Language of the month names that appear in sheet titles.
pub enum MonthLocale {
    #[default]
    Es,
    En,
}

impl MonthLocale {
    fn table(self) -> &'static [&'static str; 12] {
        match self {
            MonthLocale::Es => &SPANISH_MONTHS,
            MonthLocale::En => &ENGLISH_MONTHS,
        }
    }

    /// Uppercase month name of `date`.
    pub fn month_name(self, date: NaiveDate) -> &'static str {
        self.table()[date.month0() as usize]
    }

    /// First three letters of the month name, e.g. `OCT`.
    pub fn month_abbreviation(self, date: NaiveDate) -> String {
        self.month_name(date).chars().take(3).collect()
    }

    /// `{MONTH} {YYYY}`, e.g. `OCTUBRE 2026`.
    pub fn month_year(self, date: NaiveDate) -> String {
        format!("{} {}", self.month_name(date), date.year())
    }

    /// `{MON} {YY}`, e.g. `OCT 26`.
    pub fn short_month_year(self, date: NaiveDate) -> String {
        format!(
            "{} {:02}",
            self.month_abbreviation(date),
            date.year().rem_euclid(100)
        )
    }
}

impl fmt::Display for MonthLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MonthLocale::Es => "es",
            MonthLocale::En => "en",
        };
        f.write_str(label)
    }
}

impl FromStr for MonthLocale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        let language = lowered.split(['-', '_']).next().unwrap_or_default();
        match language {
            "es" => Ok(MonthLocale::Es),
            "en" => Ok(MonthLocale::En),
            _ => Err(format!("unsupported locale `{}`", value)),
        }
    }
}
