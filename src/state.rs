use std::path::{Path, PathBuf};

use crate::color::ChartColors;
use crate::data::aggregate::{
    gender_body_prices, region_breakdown, sales_trend, suv_sedan_trend, GenderBodyPrices,
    RegionBreakdown, SalesTrend, SuvSedanTrend,
};
use crate::data::filter::{apply, Category, FilterCriteria, Selection};
use crate::data::kpi::Kpis;
use crate::data::loader::{load_file, LoadOutcome};
use crate::data::model::{Gender, SalesDataset};

// ---------------------------------------------------------------------------
// Derived outputs of one recomputation
// ---------------------------------------------------------------------------

/// Everything the KPI strip and the four charts draw from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub kpis: Kpis,
    pub sales_trend: SalesTrend,
    /// Computed from the whole dataset; unaffected by the filters.
    pub suv_sedan: SuvSedanTrend,
    pub regions: RegionBreakdown,
    pub gender_body: GenderBodyPrices,
}

impl DashboardSnapshot {
    pub fn compute(dataset: &SalesDataset, criteria: &FilterCriteria, window: usize) -> Self {
        let view = apply(dataset, criteria);
        log::debug!(
            "Refiltered: {}/{} records (year={}, gender={})",
            view.len(),
            dataset.len(),
            criteria.year,
            criteria.gender
        );
        DashboardSnapshot {
            kpis: Kpis::compute(&view),
            sales_trend: sales_trend(view.iter()),
            suv_sedan: suv_sedan_trend(&dataset.records, window),
            regions: region_breakdown(view.iter()),
            gender_body: gender_body_prices(view.iter()),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<SalesDataset>,

    /// Where the current dataset came from.
    pub data_path: Option<PathBuf>,

    /// Current filter selection.
    pub criteria: FilterCriteria,

    /// KPIs and chart series for the current criteria.
    pub snapshot: DashboardSnapshot,

    /// Series colours for the loaded dataset.
    pub colors: ChartColors,

    /// Trailing window for the SUV/Sedan smoothing.
    pub smoothing_window: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the last load attempt failed.
    pub load_failed: bool,

    pub sidebar_open: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            data_path: None,
            criteria: FilterCriteria::default(),
            snapshot: DashboardSnapshot::default(),
            colors: ChartColors::default(),
            smoothing_window: 3,
            status_message: None,
            load_failed: false,
            sidebar_open: true,
        }
    }
}

impl AppState {
    /// Load a file and make it the active dataset. On failure the previous
    /// dataset (if any) stays active and the error becomes the status message.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(outcome) => self.set_loaded(path, outcome),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
                self.load_failed = true;
            }
        }
    }

    fn set_loaded(&mut self, path: &Path, outcome: LoadOutcome) {
        let rejected = outcome.rejected.len();
        self.set_dataset(outcome.dataset);
        self.data_path = Some(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
        if rejected > 0 {
            self.status_message = Some(format!("{rejected} malformed rows skipped"));
        }
    }

    /// Ingest a newly loaded dataset: select everything, then recompute.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.criteria = FilterCriteria::all_selected(&dataset);
        self.colors = ChartColors::for_dataset(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.load_failed = false;
        self.refilter();
    }

    /// Recompute KPIs and all chart series from the current criteria.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.snapshot = DashboardSnapshot::compute(ds, &self.criteria, self.smoothing_window);
        }
    }

    pub fn set_year(&mut self, year: Selection<i32>) {
        self.criteria.year = year;
        self.refilter();
    }

    pub fn set_gender(&mut self, gender: Selection<Gender>) {
        self.criteria.gender = gender;
        self.refilter();
    }

    /// Toggle a single value in a category's selection.
    pub fn toggle(&mut self, category: Category, value: &str) {
        let selected = self.criteria.selected_mut(category);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values in a category.
    pub fn select_all(&mut self, category: Category) {
        if let Some(ds) = &self.dataset {
            *self.criteria.selected_mut(category) = category.domain(ds).clone();
            self.refilter();
        }
    }

    /// Deselect all values in a category.
    pub fn select_none(&mut self, category: Category) {
        self.criteria.selected_mut(category).clear();
        self.refilter();
    }

    /// Every toggle on, both selects on "all", one recomputation.
    pub fn reset(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::all_selected(ds);
            self.refilter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{mixed_dataset, scenario_dataset};

    fn loaded(ds: SalesDataset) -> AppState {
        let mut state = AppState::default();
        state.set_dataset(ds);
        state
    }

    #[test]
    fn new_dataset_starts_fully_selected() {
        let state = loaded(mixed_dataset());
        assert_eq!(state.snapshot.kpis.count, 12);
        assert_eq!(state.criteria.year, Selection::All);
        assert_eq!(state.criteria.regions.len(), 4);
    }

    #[test]
    fn year_change_recomputes_everything() {
        let mut state = loaded(scenario_dataset());
        state.set_year(Selection::Only(2021));
        let kpis = state.snapshot.kpis;
        assert_eq!(kpis.count, 2);
        assert_eq!(kpis.total_price, 45_000.0);
        assert_eq!(kpis.mean_price, 22_500.0);
        assert_eq!(state.snapshot.sales_trend.months.len(), 2);
    }

    #[test]
    fn suv_sedan_ignores_filters() {
        let mut state = loaded(mixed_dataset());
        let before = state.snapshot.suv_sedan.clone();
        state.select_none(Category::BodyStyle);
        assert_eq!(state.snapshot.kpis.count, 0);
        assert!(state.snapshot.sales_trend.is_empty());
        assert_eq!(state.snapshot.suv_sedan, before);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = loaded(scenario_dataset());
        state.toggle(Category::BodyStyle, "SUV");
        assert_eq!(state.snapshot.kpis.count, 1);
        let rows = &state.snapshot.gender_body.rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price_for(Gender::Female), 25_000.0);
        assert_eq!(rows[0].price_for(Gender::Male), 0.0);
        state.toggle(Category::BodyStyle, "SUV");
        assert_eq!(state.snapshot.kpis.count, 3);
    }

    #[test]
    fn reset_restores_full_selection() {
        let ds = mixed_dataset();
        let full = FilterCriteria::all_selected(&ds);
        let mut state = loaded(ds);
        state.set_gender(Selection::Only(Gender::Female));
        state.set_year(Selection::Only(2023));
        state.select_none(Category::Company);
        state.toggle(Category::Region, "Pasco");
        assert_eq!(state.snapshot.kpis.count, 0);

        state.reset();
        assert_eq!(state.criteria, full);
        assert_eq!(state.snapshot.kpis.count, 12);
    }

    #[test]
    fn select_all_after_none() {
        let mut state = loaded(mixed_dataset());
        state.select_none(Category::Region);
        assert_eq!(state.snapshot.kpis, Kpis::default());
        state.select_all(Category::Region);
        assert_eq!(state.snapshot.kpis.count, 12);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded(scenario_dataset());
        state.load_path(Path::new("/no/such/file.csv"));
        assert!(state.load_failed);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.dataset.as_ref().map(|d| d.len()), Some(3));
    }
}
