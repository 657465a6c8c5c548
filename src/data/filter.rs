use std::collections::BTreeSet;
use std::fmt;

use super::model::{Gender, SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// Single-select choice: a concrete value or the "all" sentinel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this selection.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Multi-toggle categories
// ---------------------------------------------------------------------------

/// The three categorical fields exposed as toggle groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    BodyStyle,
    Company,
    Region,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::BodyStyle, Category::Company, Category::Region];

    pub fn label(self) -> &'static str {
        match self {
            Category::BodyStyle => "Body Style",
            Category::Company => "Company",
            Category::Region => "Dealer Region",
        }
    }

    /// The record field this category filters on.
    pub fn value_of(self, record: &SalesRecord) -> &str {
        match self {
            Category::BodyStyle => &record.body_style,
            Category::Company => &record.company,
            Category::Region => &record.dealer_region,
        }
    }

    /// Every distinct value of this category present in the dataset.
    pub fn domain(self, dataset: &SalesDataset) -> &BTreeSet<String> {
        match self {
            Category::BodyStyle => &dataset.body_styles,
            Category::Company => &dataset.companies,
            Category::Region => &dataset.regions,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria – the explicit filter value object
// ---------------------------------------------------------------------------

/// The user's current selection.
///
/// An empty toggle set admits nothing: membership in an empty set always fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub year: Selection<i32>,
    pub gender: Selection<Gender>,
    pub body_styles: BTreeSet<String>,
    pub companies: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

impl FilterCriteria {
    /// Everything selected: both single-selects on "all", every toggle on.
    pub fn all_selected(dataset: &SalesDataset) -> Self {
        FilterCriteria {
            year: Selection::All,
            gender: Selection::All,
            body_styles: dataset.body_styles.clone(),
            companies: dataset.companies.clone(),
            regions: dataset.regions.clone(),
        }
    }

    pub fn selected(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::BodyStyle => &self.body_styles,
            Category::Company => &self.companies,
            Category::Region => &self.regions,
        }
    }

    pub fn selected_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::BodyStyle => &mut self.body_styles,
            Category::Company => &mut self.companies,
            Category::Region => &mut self.regions,
        }
    }

    /// Whether a single record passes all five criteria.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.year.admits(&record.year)
            && match self.gender {
                Selection::All => true,
                Selection::Only(g) => record.is_gender(g),
            }
            && Category::ALL
                .iter()
                .all(|&cat| self.selected(cat).contains(cat.value_of(record)))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – ephemeral, ordered subsequence of the dataset
// ---------------------------------------------------------------------------

/// Records passing the current criteria, borrowed from the dataset in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a SalesRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.records.iter().copied()
    }
}

/// Return the records that pass all criteria, preserving dataset order.
pub fn apply<'a>(dataset: &'a SalesDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    FilteredView {
        records: dataset
            .records
            .iter()
            .filter(|rec| criteria.matches(rec))
            .collect(),
    }
}
