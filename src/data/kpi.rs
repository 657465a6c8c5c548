use super::filter::FilteredView;

/// Header summary statistics for the current view.
///
/// Means over an empty view are defined as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kpis {
    pub count: usize,
    pub mean_price: f64,
    pub total_price: f64,
    pub mean_income: f64,
}

impl Kpis {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        if view.is_empty() {
            return Kpis::default();
        }
        let count = view.len();
        let total_price: f64 = view.iter().map(|r| r.price).sum();
        let total_income: f64 = view.iter().map(|r| r.annual_income).sum();
        Kpis {
            count,
            mean_price: mean(total_price, count),
            total_price,
            mean_income: mean(total_income, count),
        }
    }
}

pub(crate) fn mean(sum: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterCriteria, Selection};
    use crate::data::fixtures::scenario_dataset;

    #[test]
    fn year_scenario_kpis() {
        let ds = scenario_dataset();
        let mut criteria = FilterCriteria::all_selected(&ds);
        criteria.year = Selection::Only(2021);
        let kpis = Kpis::compute(&apply(&ds, &criteria));
        assert_eq!(kpis.count, 2);
        assert_eq!(kpis.total_price, 45_000.0);
        assert_eq!(kpis.mean_price, 22_500.0);
        assert_eq!(kpis.mean_income, 67_500.0);
    }

    #[test]
    fn empty_view_is_all_zero() {
        let ds = scenario_dataset();
        let mut criteria = FilterCriteria::all_selected(&ds);
        criteria.companies.clear();
        let kpis = Kpis::compute(&apply(&ds, &criteria));
        assert_eq!(kpis, Kpis::default());
        assert!(!kpis.mean_price.is_nan());
    }
}
