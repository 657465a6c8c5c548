use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::model::{SalesDataset, SalesRecord};

/// How many rejected rows are logged individually before summarising.
const MAX_LOGGED_REJECTIONS: usize = 20;

// ---------------------------------------------------------------------------
// Row-level coercion errors
// ---------------------------------------------------------------------------

/// Why a single source row was rejected. Rows are 1-based, excluding the header.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },
    #[error("row {row}: missing value for '{field}'")]
    MissingField { row: usize, field: &'static str },
    #[error("row {row}: '{value}' is not a valid date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: '{value}' is not a valid number for '{field}'")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// A successfully loaded dataset and the rows that were skipped on the way.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: SalesDataset,
    pub rejected: Vec<RowError>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with at least `Date`, `Price ($)`, `Annual Income`,
///   `Company`, `Dealer_Region`, `Body Style`, `Gender`
/// * `.json` – `[{ "Date": "1/2/2022", "Price ($)": 26000, ... }, ...]`
///
/// Rows that cannot be read or coerced are skipped and reported in
/// [`LoadOutcome::rejected`]. A file without a single valid row is an error.
pub fn load_file(path: &Path) -> Result<LoadOutcome> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let outcome = build_dataset(rows);
    if outcome.dataset.is_empty() {
        match outcome.rejected.first() {
            Some(first) => bail!(
                "{} contains no valid sales records ({} rejected, first: {first})",
                path.display(),
                outcome.rejected.len()
            ),
            None => bail!("{} contains no sales records", path.display()),
        }
    }

    log::info!(
        "Loaded {} records from {} ({} rejected)",
        outcome.dataset.len(),
        path.display(),
        outcome.rejected.len()
    );
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Required columns and their accepted header spellings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    Price,
    AnnualIncome,
    Company,
    DealerRegion,
    BodyStyle,
    Gender,
}

impl Column {
    const ALL: [Column; 7] = [
        Column::Date,
        Column::Price,
        Column::AnnualIncome,
        Column::Company,
        Column::DealerRegion,
        Column::BodyStyle,
        Column::Gender,
    ];

    /// Accepted header spellings; the first one is canonical.
    fn spellings(self) -> &'static [&'static str] {
        match self {
            Column::Date => &["Date"],
            Column::Price => &["Price ($)", "Price"],
            Column::AnnualIncome => &["Annual Income"],
            Column::Company => &["Company"],
            Column::DealerRegion => &["Dealer_Region", "Dealer Region"],
            Column::BodyStyle => &["Body Style", "Body_Style"],
            Column::Gender => &["Gender"],
        }
    }

    fn name(self) -> &'static str {
        self.spellings()[0]
    }
}

/// Position of each required column among `headers`, in [`Column::ALL`] order.
fn column_positions(headers: &[&str], source: &str) -> Result<[usize; 7]> {
    let mut positions = [0; 7];
    for (slot, column) in positions.iter_mut().zip(Column::ALL) {
        *slot = headers
            .iter()
            .position(|h| column.spellings().contains(&h.trim()))
            .with_context(|| format!("{source} missing '{}' column", column.name()))?;
    }
    Ok(positions)
}

// ---------------------------------------------------------------------------
// Raw rows: string-typed fields as they come out of the source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct RawRow {
    date: Option<String>,
    price: Option<String>,
    annual_income: Option<String>,
    company: Option<String>,
    dealer_region: Option<String>,
    body_style: Option<String>,
    gender: Option<String>,
}

impl RawRow {
    fn from_lookup(mut field: impl FnMut(Column) -> Option<String>) -> Self {
        RawRow {
            date: field(Column::Date),
            price: field(Column::Price),
            annual_income: field(Column::AnnualIncome),
            company: field(Column::Company),
            dealer_region: field(Column::DealerRegion),
            body_style: field(Column::BodyStyle),
            gender: field(Column::Gender),
        }
    }
}

/// One entry per source row: the raw fields, or why the row could not be read.
type RowResults = Vec<Result<RawRow, RowError>>;

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RowResults> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let positions = column_positions(&headers.iter().collect::<Vec<_>>(), "CSV")?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(record) => rows.push(Ok(RawRow::from_lookup(|column| {
                record.get(positions[column as usize]).map(str::to_string)
            }))),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(e).context("reading CSV");
            }
            Err(e) => rows.push(Err(RowError::Malformed {
                row: i + 1,
                reason: e.to_string(),
            })),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON: a top-level array of flat objects. Numeric fields
/// may be JSON numbers or strings.
fn read_json(path: &Path) -> Result<RowResults> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    if let Some(first) = records.iter().find_map(|r| r.as_object()) {
        let keys: Vec<&str> = first.keys().map(String::as_str).collect();
        column_positions(&keys, "JSON")?;
    }

    Ok(records
        .iter()
        .enumerate()
        .map(|(i, rec)| match rec.as_object() {
            Some(obj) => Ok(RawRow::from_lookup(|column| {
                json_field(obj, column.spellings())
            })),
            None => Err(RowError::Malformed {
                row: i + 1,
                reason: format!("expected a JSON object, found `{rec}`"),
            }),
        })
        .collect())
}

fn json_field(obj: &JsonMap<String, JsonValue>, keys: &[&str]) -> Option<String> {
    let val = keys.iter().find_map(|k| obj.get(*k))?;
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Coercion: RawRow → SalesRecord
// ---------------------------------------------------------------------------

fn build_dataset(rows: RowResults) -> LoadOutcome {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (i, row) in rows.into_iter().enumerate() {
        match row.and_then(|raw| coerce_row(raw, i + 1)) {
            Ok(rec) => records.push(rec),
            Err(e) => {
                if rejected.len() < MAX_LOGGED_REJECTIONS {
                    log::warn!("Skipping {e}");
                }
                rejected.push(e);
            }
        }
    }
    if rejected.len() > MAX_LOGGED_REJECTIONS {
        log::warn!(
            "{} more rows skipped",
            rejected.len() - MAX_LOGGED_REJECTIONS
        );
    }

    LoadOutcome {
        dataset: SalesDataset::from_records(records),
        rejected,
    }
}

fn coerce_row(raw: RawRow, row: usize) -> Result<SalesRecord, RowError> {
    let date_text = required(raw.date, row, Column::Date.name())?;
    let date = parse_date(&date_text).ok_or_else(|| RowError::InvalidDate {
        row,
        value: date_text.clone(),
    })?;

    Ok(SalesRecord {
        date,
        year: date.year(),
        price: parse_amount(raw.price, row, Column::Price.name())?,
        annual_income: parse_amount(raw.annual_income, row, Column::AnnualIncome.name())?,
        company: required(raw.company, row, Column::Company.name())?,
        dealer_region: required(raw.dealer_region, row, Column::DealerRegion.name())?,
        body_style: required(raw.body_style, row, Column::BodyStyle.name())?,
        gender: required(raw.gender, row, Column::Gender.name())?,
    })
}

fn required(value: Option<String>, row: usize, field: &'static str) -> Result<String, RowError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(RowError::MissingField { row, field }),
    }
}

fn parse_amount(value: Option<String>, row: usize, field: &'static str) -> Result<f64, RowError> {
    let text = required(value, row, field)?;
    parse_number(&text).ok_or(RowError::InvalidNumber {
        row,
        field,
        value: text,
    })
}

/// Parse a currency-ish number: `$26,000.50` → `26000.5`.
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a calendar date; any time-of-day part is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        write_temp_bytes(suffix, contents.as_bytes())
    }

    fn write_temp_bytes(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    const HEADER: &str = "Car_id,Date,Customer Name,Gender,Annual Income,Company,Price ($),Body Style,Dealer_Region\n";

    #[test]
    fn parses_dates_in_accepted_formats() {
        let expected = NaiveDate::from_ymd_opt(2022, 1, 2).unwrap();
        assert_eq!(parse_date("1/2/2022"), Some(expected));
        assert_eq!(parse_date("01/02/2022"), Some(expected));
        assert_eq!(parse_date("2022-01-02"), Some(expected));
        assert_eq!(parse_date("2022/01/02"), Some(expected));
        assert_eq!(parse_date("1/2/2022 13:45"), Some(expected));
        assert_eq!(parse_date("2022-01-02T08:00:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("13/45/2022"), None);
    }

    #[test]
    fn parses_formatted_numbers() {
        assert_eq!(parse_number("$26,000"), Some(26_000.0));
        assert_eq!(parse_number(" 1,250.50 "), Some(1_250.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn loads_csv_and_derives_year() {
        let file = write_temp(
            ".csv",
            &format!(
                "{HEADER}\
                 C_1,1/2/2022,Geraldine,Male,\"13,500\",Ford,26000,SUV,Middletown\n\
                 C_2,12/31/2023,Gia,Female,1480000,Dodge,$19000,Sedan,Aurora\n"
            ),
        );
        let outcome = load_file(file.path()).unwrap();
        assert!(outcome.rejected.is_empty());
        let ds = outcome.dataset;
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].year, 2022);
        assert_eq!(ds.records[0].annual_income, 13_500.0);
        assert_eq!(ds.records[1].price, 19_000.0);
        assert_eq!(ds.records[1].dealer_region, "Aurora");
        assert_eq!(ds.years.len(), 2);
    }

    #[test]
    fn bad_rows_are_skipped_not_poisoned() {
        let file = write_temp(
            ".csv",
            &format!(
                "{HEADER}\
                 C_1,1/2/2022,A,Male,50000,Ford,26000,SUV,Austin\n\
                 C_2,not a date,B,Male,50000,Ford,26000,SUV,Austin\n\
                 C_3,1/3/2022,C,Female,50000,Ford,n/a,SUV,Austin\n\
                 C_4,1/4/2022,D,Female,50000,,21000,SUV,Austin\n"
            ),
        );
        let outcome = load_file(file.path()).unwrap();
        assert_eq!(outcome.dataset.len(), 1);
        assert_eq!(
            outcome.rejected,
            vec![
                RowError::InvalidDate {
                    row: 2,
                    value: "not a date".to_string()
                },
                RowError::InvalidNumber {
                    row: 3,
                    field: "Price ($)",
                    value: "n/a".to_string()
                },
                RowError::MissingField {
                    row: 4,
                    field: "Company"
                },
            ]
        );
        assert!(outcome.dataset.records.iter().all(|r| r.price.is_finite()));
    }

    #[test]
    fn unreadable_csv_rows_are_skipped_not_fatal() {
        let mut contents = format!(
            "{HEADER}\
             C_1,1/2/2022,A,Male,50000,Ford,26000,SUV,Austin\n\
             C_2,1/3/2022,B,Male\n"
        )
        .into_bytes();
        contents.extend_from_slice(b"C_3,1/4/2022,C,Female,50000,F\xffrd,21000,Sedan,Aurora\n");
        contents.extend_from_slice(b"C_4,1/5/2022,D,Female,50000,Dodge,22000,Sedan,Aurora\n");
        let file = write_temp_bytes(".csv", &contents);

        let outcome = load_file(file.path()).unwrap();
        let prices: Vec<f64> = outcome.dataset.records.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![26_000.0, 22_000.0]);
        assert!(
            matches!(
                outcome.rejected.as_slice(),
                [
                    RowError::Malformed { row: 2, .. },
                    RowError::Malformed { row: 3, .. }
                ]
            ),
            "{:?}",
            outcome.rejected
        );
    }

    #[test]
    fn json_entries_that_are_not_objects_are_skipped() {
        let file = write_temp(
            ".json",
            r#"[
                42,
                {"Date": "2022-05-06", "Price ($)": 24000, "Annual Income": 70000,
                 "Company": "Kia", "Dealer_Region": "Austin", "Body Style": "SUV", "Gender": "Male"},
                "C_3"
            ]"#,
        );
        let outcome = load_file(file.path()).unwrap();
        assert_eq!(outcome.dataset.len(), 1);
        assert_eq!(outcome.dataset.records[0].company, "Kia");
        assert!(
            matches!(
                outcome.rejected.as_slice(),
                [
                    RowError::Malformed { row: 1, .. },
                    RowError::Malformed { row: 3, .. }
                ]
            ),
            "{:?}",
            outcome.rejected
        );
    }

    #[test]
    fn every_column_spelling_is_recognised() {
        for column in Column::ALL {
            for spelling in column.spellings() {
                let headers: Vec<&str> = Column::ALL
                    .iter()
                    .map(|c| if *c == column { *spelling } else { c.name() })
                    .collect();
                let positions = column_positions(&headers, "CSV").unwrap();
                assert_eq!(positions[column as usize], column as usize);
            }
        }
    }

    #[test]
    fn all_rows_invalid_is_fatal() {
        let file = write_temp(
            ".csv",
            &format!("{HEADER}C_1,garbage,A,Male,1,Ford,1,SUV,Austin\n"),
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("no valid sales records"));
    }

    #[test]
    fn missing_column_is_fatal() {
        let file = write_temp(".csv", "Date,Price,Company\n1/2/2022,1,Ford\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("missing 'Annual Income' column"));
    }

    #[test]
    fn header_aliases_are_accepted() {
        let file = write_temp(
            ".csv",
            "Date,Price,Annual Income,Company,Dealer Region,Body_Style,Gender\n\
             2022-03-01,\"$30,000\",90000,Audi,Pasco,Hatchback,Female\n",
        );
        let ds = load_file(file.path()).unwrap().dataset;
        assert_eq!(ds.records[0].price, 30_000.0);
        assert_eq!(ds.records[0].body_style, "Hatchback");
        assert_eq!(ds.records[0].dealer_region, "Pasco");
    }

    #[test]
    fn loads_json_records() {
        let file = write_temp(
            ".json",
            r#"[
                {"Date": "2022-05-06", "Price ($)": 24000, "Annual Income": "$75,000",
                 "Company": "Kia", "Dealer_Region": "Austin", "Body Style": "Passenger", "Gender": "Male"},
                {"Date": "2022-05-07", "Price ($)": null, "Annual Income": 1,
                 "Company": "Kia", "Dealer_Region": "Austin", "Body Style": "SUV", "Gender": "Male"}
            ]"#,
        );
        let outcome = load_file(file.path()).unwrap();
        assert_eq!(outcome.dataset.len(), 1);
        assert_eq!(outcome.dataset.records[0].annual_income, 75_000.0);
        assert_eq!(
            outcome.rejected,
            vec![RowError::MissingField {
                row: 2,
                field: "Price ($)"
            }]
        );
    }

    #[test]
    fn missing_file_and_bad_extension_fail() {
        assert!(load_file(Path::new("/definitely/not/here.csv")).is_err());
        let file = write_temp(".xlsx", "whatever");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
