//! Small hand-built datasets shared by the unit tests.

use chrono::{Datelike, NaiveDate};

use super::model::{SalesDataset, SalesRecord};

pub fn record(
    ymd: (i32, u32, u32),
    body_style: &str,
    gender: &str,
    price: f64,
    company: &str,
    region: &str,
) -> SalesRecord {
    let date = NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap();
    SalesRecord {
        date,
        year: date.year(),
        price,
        annual_income: price * 3.0,
        company: company.to_string(),
        dealer_region: region.to_string(),
        body_style: body_style.to_string(),
        gender: gender.to_string(),
    }
}

/// (2021, SUV, Male, $20000), (2021, Sedan, Female, $25000), (2022, SUV, Male, $22000)
pub fn scenario_dataset() -> SalesDataset {
    SalesDataset::from_records(vec![
        record((2021, 3, 14), "SUV", "Male", 20_000.0, "Ford", "Austin"),
        record((2021, 7, 2), "Sedan", "Female", 25_000.0, "Toyota", "Janesville"),
        record((2022, 1, 20), "SUV", "Male", 22_000.0, "Ford", "Austin"),
    ])
}

/// A dozen records spread over several months, quarters, regions and styles.
pub fn mixed_dataset() -> SalesDataset {
    SalesDataset::from_records(vec![
        record((2022, 1, 3), "SUV", "Male", 30_000.0, "Ford", "Austin"),
        record((2022, 1, 17), "Sedan", "Female", 21_000.0, "Honda", "Aurora"),
        record((2022, 1, 28), "SUV", "Female", 34_000.0, "Ford", "Austin"),
        record((2022, 2, 9), "Hatchback", "Male", 15_000.0, "Honda", "Greenville"),
        record((2022, 2, 11), "Sedan", "Male", 23_000.0, "Toyota", "Aurora"),
        record((2022, 4, 5), "SUV", "Male", 31_000.0, "Toyota", "Greenville"),
        record((2022, 5, 30), "Passenger", "Female", 18_000.0, "Ford", "Austin"),
        record((2022, 9, 1), "Sedan", "Female", 22_000.0, "Honda", "Aurora"),
        record((2022, 12, 24), "Hardtop", "Male", 40_000.0, "Toyota", "Pasco"),
        record((2023, 1, 2), "SUV", "Female", 36_000.0, "Ford", "Pasco"),
        record((2023, 1, 9), "Sedan", "Male", 24_000.0, "Honda", "Austin"),
        record((2023, 2, 14), "Sedan", "Female", 20_000.0, "Toyota", "Greenville"),
    ])
}
