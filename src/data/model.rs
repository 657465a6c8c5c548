use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Gender – the fixed two-valued domain used by the gender filter and chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Display order used by the gender select and the grouped bars.
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Position inside [`Gender::ALL`].
    pub fn index(self) -> usize {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Temporal buckets
// ---------------------------------------------------------------------------

/// A calendar month. Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Axis label such as `Jan 2022`.
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(d) => d.format("%b %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A calendar quarter, displayed as `YYYY QN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearQuarter {
    pub year: i32,
    pub quarter: u32,
}

impl YearQuarter {
    pub fn of(date: NaiveDate) -> Self {
        YearQuarter {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        }
    }
}

impl fmt::Display for YearQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single, fully coerced sale. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    /// Derived from `date`.
    pub year: i32,
    /// Sale price in dollars.
    pub price: f64,
    pub annual_income: f64,
    pub company: String,
    pub dealer_region: String,
    pub body_style: String,
    /// Kept as text: the source may contain values outside [`Gender::ALL`].
    pub gender: String,
}

impl SalesRecord {
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    pub fn quarter(&self) -> YearQuarter {
        YearQuarter::of(self.date)
    }

    pub fn is_gender(&self, gender: Gender) -> bool {
        self.gender == gender.as_str()
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded records plus the distinct values the filter controls are built from.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All records in file order.
    pub records: Vec<SalesRecord>,
    pub years: BTreeSet<i32>,
    pub body_styles: BTreeSet<String>,
    pub companies: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

impl SalesDataset {
    /// Build the distinct-value indices from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut years = BTreeSet::new();
        let mut body_styles = BTreeSet::new();
        let mut companies = BTreeSet::new();
        let mut regions = BTreeSet::new();

        for rec in &records {
            years.insert(rec.year);
            body_styles.insert(rec.body_style.clone());
            companies.insert(rec.company.clone());
            regions.insert(rec.dealer_region.clone());
        }

        SalesDataset {
            records,
            years,
            body_styles,
            companies,
            regions,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
