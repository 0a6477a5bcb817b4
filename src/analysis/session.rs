//! Report session: loaded data plus the current filters.

use crate::analysis::filters::{FilterField, FilterOptions, ReportFilters};
use crate::analysis::reports::ReportSet;
use crate::data::DataContext;
use tracing::debug;

/// Holds the collections and filters, and keeps the views in step with them.
///
/// Every change recomputes all views from scratch; nothing is cached
/// between changes.
#[derive(Debug, Clone)]
pub struct ReportSession {
    data: DataContext,
    filters: ReportFilters,
    views: ReportSet,
    options: FilterOptions,
}

impl ReportSession {
    pub fn new(data: DataContext, filters: ReportFilters) -> Self {
        let filters = filters.normalized();
        let views = ReportSet::compute(&data, &filters);
        let options = FilterOptions::from_data(&data);
        Self {
            data,
            filters,
            views,
            options,
        }
    }

    pub fn data(&self) -> &DataContext {
        &self.data
    }

    pub fn filters(&self) -> &ReportFilters {
        &self.filters
    }

    pub fn views(&self) -> &ReportSet {
        &self.views
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    fn recompute(&mut self) {
        self.views = ReportSet::compute(&self.data, &self.filters);
    }
}

// Interactive front ends change filters one at a time; the CLI sets them once.
#[allow(dead_code)]
impl ReportSession {
    /// Set one filter and recompute every view.
    pub fn update_filter(&mut self, field: FilterField, value: &str) {
        if self.filters.set(field, value) {
            debug!("Filter {} set to {:?}", field, self.filters.get(field));
        }
        self.recompute();
    }

    /// Clear one filter and recompute every view.
    pub fn clear_filter(&mut self, field: FilterField) {
        if self.filters.clear(field) {
            debug!("Filter {} cleared", field);
        }
        self.recompute();
    }

    /// Swap in freshly loaded collections.
    pub fn replace_data(&mut self, data: DataContext) {
        self.data = data;
        self.options = FilterOptions::from_data(&self.data);
        self.recompute();
    }
}
