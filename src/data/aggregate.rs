use std::collections::{BTreeMap, BTreeSet};

use super::kpi::mean;
use super::model::{Gender, SalesRecord, YearMonth, YearQuarter};

pub const SUV: &str = "SUV";
pub const SEDAN: &str = "Sedan";

// ---------------------------------------------------------------------------
// Keyed counts shared by the stacked and grouped bar series
// ---------------------------------------------------------------------------

/// One bucket (month or quarter) with a count for every series key.
/// Keys absent from the bucket are present with a count of 0.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketCounts<B> {
    pub bucket: B,
    pub counts: BTreeMap<String, usize>,
}

impl<B> BucketCounts<B> {
    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

/// Count records per (bucket, key), then densify so every bucket carries every key.
fn count_by<'a, B, I>(
    records: I,
    bucket_of: impl Fn(&SalesRecord) -> B,
    key_of: impl Fn(&SalesRecord) -> &str,
) -> (Vec<String>, Vec<BucketCounts<B>>)
where
    B: Ord + Copy,
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut grouped: BTreeMap<B, BTreeMap<String, usize>> = BTreeMap::new();
    let mut keys: BTreeSet<String> = BTreeSet::new();

    for rec in records {
        let key = key_of(rec);
        if !keys.contains(key) {
            keys.insert(key.to_string());
        }
        *grouped
            .entry(bucket_of(rec))
            .or_default()
            .entry(key.to_string())
            .or_insert(0) += 1;
    }

    let rows = grouped
        .into_iter()
        .map(|(bucket, found)| BucketCounts {
            bucket,
            counts: keys
                .iter()
                .map(|k| (k.clone(), found.get(k).copied().unwrap_or(0)))
                .collect(),
        })
        .collect();

    (keys.into_iter().collect(), rows)
}

// ---------------------------------------------------------------------------
// Sales trend: (month, body style) counts for the stacked bars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesTrend {
    /// Stack keys, sorted.
    pub body_styles: Vec<String>,
    /// One entry per month present in the input, chronological.
    pub months: Vec<BucketCounts<YearMonth>>,
}

impl SalesTrend {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

pub fn sales_trend<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> SalesTrend {
    let (body_styles, months) = count_by(records, |r| r.month(), |r| r.body_style.as_str());
    SalesTrend {
        body_styles,
        months,
    }
}

// ---------------------------------------------------------------------------
// SUV vs Sedan: two aligned monthly series, smoothed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuvSedanTrend {
    /// Sorted distinct months containing at least one SUV or Sedan sale.
    pub months: Vec<YearMonth>,
    pub suv: Vec<usize>,
    pub sedan: Vec<usize>,
    pub suv_smoothed: Vec<f64>,
    pub sedan_smoothed: Vec<f64>,
}

impl SuvSedanTrend {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Meant to be fed the full dataset rather than the filtered view.
pub fn suv_sedan_trend<'a>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    window: usize,
) -> SuvSedanTrend {
    let mut grouped: BTreeMap<YearMonth, (usize, usize)> = BTreeMap::new();
    for rec in records {
        let slot = match rec.body_style.as_str() {
            SUV => 0,
            SEDAN => 1,
            _ => continue,
        };
        let entry = grouped.entry(rec.month()).or_default();
        if slot == 0 {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let months: Vec<YearMonth> = grouped.keys().copied().collect();
    let suv: Vec<usize> = grouped.values().map(|c| c.0).collect();
    let sedan: Vec<usize> = grouped.values().map(|c| c.1).collect();
    let as_f64 = |v: &[usize]| v.iter().map(|&n| n as f64).collect::<Vec<_>>();

    SuvSedanTrend {
        suv_smoothed: moving_average(&as_f64(&suv), window),
        sedan_smoothed: moving_average(&as_f64(&sedan), window),
        months,
        suv,
        sedan,
    }
}

/// Trailing moving average. Each point is the mean of itself and up to
/// `window - 1` preceding points; the window shrinks at the start.
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &series[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Region breakdown: (quarter, dealer region) counts for grouped bars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionBreakdown {
    /// Regions present in the input, sorted.
    pub regions: Vec<String>,
    pub quarters: Vec<BucketCounts<YearQuarter>>,
}

impl RegionBreakdown {
    pub fn is_empty(&self) -> bool {
        self.quarters.is_empty()
    }
}

pub fn region_breakdown<'a>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
) -> RegionBreakdown {
    let (regions, quarters) = count_by(records, |r| r.quarter(), |r| r.dealer_region.as_str());
    RegionBreakdown { regions, quarters }
}

// ---------------------------------------------------------------------------
// Gender × body style: mean price per group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BodyStylePrices {
    pub body_style: String,
    /// Indexed by [`Gender::index`]; 0 when the combination has no records.
    pub mean_price: [f64; 2],
}

impl BodyStylePrices {
    pub fn price_for(&self, gender: Gender) -> f64 {
        self.mean_price[gender.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenderBodyPrices {
    /// One row per body style present in the input, sorted.
    pub rows: Vec<BodyStylePrices>,
}

impl GenderBodyPrices {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn gender_body_prices<'a>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
) -> GenderBodyPrices {
    // (sum, count) per gender slot
    let mut grouped: BTreeMap<&'a str, [(f64, usize); 2]> = BTreeMap::new();
    for rec in records {
        let slots = grouped.entry(rec.body_style.as_str()).or_default();
        if let Some(g) = Gender::ALL.iter().find(|g| rec.is_gender(**g)) {
            let slot = &mut slots[g.index()];
            slot.0 += rec.price;
            slot.1 += 1;
        }
    }

    GenderBodyPrices {
        rows: grouped
            .into_iter()
            .map(|(body_style, slots)| BodyStylePrices {
                body_style: body_style.to_string(),
                mean_price: slots.map(|(sum, n)| mean(sum, n)),
            })
            .collect(),
    }
}
