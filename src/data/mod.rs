/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  car_sales.csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce rows → SalesDataset (bad rows rejected)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<SalesRecord>, distinct value indices
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → FilteredView (borrowed, ordered)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌───────────┐
///   │   kpi     │   │ aggregate  │  four chart series
///   └──────────┘   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod kpi;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod fixtures;
