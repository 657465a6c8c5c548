use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

const ROWS: usize = 2_400;
const OUTPUT_PATH: &str = "car_sales.csv";

const COMPANIES: [&str; 8] = [
    "Chevrolet", "Dodge", "Ford", "Honda", "Mercedes-B", "Nissan", "Toyota", "Volkswagen",
];
const REGIONS: [&str; 7] = [
    "Aurora", "Austin", "Greenville", "Janesville", "Middletown", "Pasco", "Scottsdale",
];
/// Body style with relative weight and base price.
const BODY_STYLES: [(&str, f64, f64); 5] = [
    ("Hardtop", 0.12, 31_000.0),
    ("Hatchback", 0.25, 24_000.0),
    ("Passenger", 0.17, 26_500.0),
    ("SUV", 0.26, 29_000.0),
    ("Sedan", 0.20, 27_500.0),
];

#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Car_id")]
    car_id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Gender")]
    gender: &'static str,
    #[serde(rename = "Annual Income")]
    annual_income: u64,
    #[serde(rename = "Company")]
    company: &'static str,
    #[serde(rename = "Price ($)")]
    price: u64,
    #[serde(rename = "Body Style")]
    body_style: &'static str,
    #[serde(rename = "Dealer_Region")]
    dealer_region: &'static str,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Weighted body style pick; SUVs gain share over the two years.
fn pick_body_style(rng: &mut SimpleRng, progress: f64) -> (&'static str, f64) {
    let weights: Vec<f64> = BODY_STYLES
        .iter()
        .map(|&(name, w, _)| match name {
            "SUV" => w * (0.8 + 0.5 * progress),
            "Sedan" => w * (1.2 - 0.4 * progress),
            _ => w,
        })
        .collect();
    let total: f64 = weights.iter().sum();
    let mut target = rng.next_f64() * total;
    for (&(name, _, base), w) in BODY_STYLES.iter().zip(&weights) {
        if target < *w {
            return (name, base);
        }
        target -= w;
    }
    let (name, _, base) = BODY_STYLES[BODY_STYLES.len() - 1];
    (name, base)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).context("invalid start date")?;
    let span_days: u64 = 730;

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;

    for i in 0..ROWS {
        let offset = (rng.next_u64() % span_days) as i64;
        let date = start + Duration::days(offset);
        let progress = offset as f64 / span_days as f64;
        let (body_style, base_price) = pick_body_style(&mut rng, progress);

        let row = Row {
            car_id: format!("C_CND_{i:06}"),
            date: date.format("%-m/%-d/%Y").to_string(),
            gender: if rng.next_f64() < 0.78 { "Male" } else { "Female" },
            annual_income: rng.gauss(830_000.0, 350_000.0).max(10_080.0) as u64,
            company: rng.pick(&COMPANIES),
            price: rng.gauss(base_price, 9_000.0).max(1_200.0) as u64,
            body_style,
            dealer_region: rng.pick(&REGIONS),
        };
        writer.serialize(&row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {ROWS} sales records to {OUTPUT_PATH}");
    Ok(())
}
