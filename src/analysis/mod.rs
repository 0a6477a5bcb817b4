//! Report computation over the loaded collections.
//!
//! Views are pure functions of a [`DataContext`](crate::data::DataContext)
//! and a [`ReportFilters`]; [`ReportSession`] recomputes them whenever
//! either changes.

pub mod dashboard;
pub mod filters;
pub mod index;
pub mod reports;
pub mod session;

pub use dashboard::{DashboardSettings, DashboardSummary};
pub use filters::{FilterOptions, ReportFilters};
pub use index::LookupIndex;
pub use reports::ReportSet;
pub use session::ReportSession;
