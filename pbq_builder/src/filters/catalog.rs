//! Quick filters and the session toolbox

use crate::types::{Filter, FilterCategory};

/// Filters a label can be resolved against.
///
/// Lookup tries the quick filters first, then the toolbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCatalog {
    quick_filters: Vec<Filter>,
    toolbox: Vec<Filter>,
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::new(Self::builtin_quick_filters(), Vec::new())
    }
}

impl FilterCatalog {
    pub fn new(quick_filters: Vec<Filter>, toolbox: Vec<Filter>) -> Self {
        Self {
            quick_filters,
            toolbox,
        }
    }

    /// Built-in quick filters with the given toolbox
    pub fn with_toolbox(toolbox: Vec<Filter>) -> Self {
        Self::new(Self::builtin_quick_filters(), toolbox)
    }

    pub fn builtin_quick_filters() -> Vec<Filter> {
        vec![
            Filter::new("Humans Only", "AND \"humans\"[Mesh]", FilterCategory::Species),
            Filter::new("English Only", "AND english[la]", FilterCategory::Language),
            Filter::new("Last 5 Years", "AND \"last 5 years\"[dp]", FilterCategory::Date),
            Filter::new("Last 10 Years", "AND \"last 10 years\"[dp]", FilterCategory::Date),
            Filter::new(
                "RCTs Only",
                "AND \"randomized controlled trial\"[pt]",
                FilterCategory::StudyDesign,
            ),
            Filter::new(
                "Systematic Reviews",
                "AND systematic[sb]",
                FilterCategory::StudyDesign,
            ),
            Filter::new("Adults", "AND \"adult\"[Mesh]", FilterCategory::Age),
        ]
    }

    pub fn find(&self, label: &str) -> Option<&Filter> {
        self.quick_filters
            .iter()
            .chain(self.toolbox.iter())
            .find(|f| f.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.find(label).is_some()
    }

    pub fn quick_filters(&self) -> &[Filter] {
        &self.quick_filters
    }

    pub fn toolbox(&self) -> &[Filter] {
        &self.toolbox
    }

    pub fn len(&self) -> usize {
        self.quick_filters.len() + self.toolbox.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
