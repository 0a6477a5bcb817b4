//! Loaded entity collections.
//!
//! [`DataContext`] is the explicit input of every report view: the five
//! collections plus whether each one has been fetched successfully. A
//! collection that has not loaded behaves as an empty collection.

pub mod loader;

pub use loader::{load_all, CollectionSource};

use crate::models::{
    Allocation, CollectionKind, Payment, Program, Record, SourceStatus, Sponsor, Student,
};

/// One fetched collection and its load state.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    loaded: bool,
    error: Option<String>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            error: None,
        }
    }
}

impl<T: Record> Collection<T> {
    /// A successfully fetched collection.
    pub fn loaded(items: Vec<T>) -> Self {
        Self {
            items,
            loaded: true,
            error: None,
        }
    }

    /// A collection whose fetch failed; it stays empty.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            error: Some(error.into()),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load outcome for reporting.
    pub fn status(&self) -> SourceStatus {
        SourceStatus {
            collection: T::KIND,
            loaded: self.loaded,
            records: self.items.len(),
            error: self.error.clone(),
        }
    }
}

/// The five collections the report views are computed from.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    pub students: Collection<Student>,
    pub sponsors: Collection<Sponsor>,
    pub programs: Collection<Program>,
    pub allocations: Collection<Allocation>,
    pub payments: Collection<Payment>,
}

impl DataContext {
    /// Build a context where every collection is loaded.
    #[cfg(test)]
    pub fn from_parts(
        students: Vec<Student>,
        sponsors: Vec<Sponsor>,
        programs: Vec<Program>,
        allocations: Vec<Allocation>,
        payments: Vec<Payment>,
    ) -> Self {
        Self {
            students: Collection::loaded(students),
            sponsors: Collection::loaded(sponsors),
            programs: Collection::loaded(programs),
            allocations: Collection::loaded(allocations),
            payments: Collection::loaded(payments),
        }
    }

    pub fn students(&self) -> &[Student] {
        self.students.items()
    }

    pub fn sponsors(&self) -> &[Sponsor] {
        self.sponsors.items()
    }

    pub fn programs(&self) -> &[Program] {
        self.programs.items()
    }

    pub fn allocations(&self) -> &[Allocation] {
        self.allocations.items()
    }

    pub fn payments(&self) -> &[Payment] {
        self.payments.items()
    }

    /// True once all five collections have been fetched.
    pub fn is_ready(&self) -> bool {
        self.students.is_loaded()
            && self.sponsors.is_loaded()
            && self.programs.is_loaded()
            && self.allocations.is_loaded()
            && self.payments.is_loaded()
    }

    /// Load outcome of each collection, in [`CollectionKind::ALL`] order.
    pub fn sources(&self) -> Vec<SourceStatus> {
        CollectionKind::ALL
            .iter()
            .map(|kind| match kind {
                CollectionKind::Students => self.students.status(),
                CollectionKind::Sponsors => self.sponsors.status(),
                CollectionKind::Programs => self.programs.status(),
                CollectionKind::Allocations => self.allocations.status(),
                CollectionKind::Payments => self.payments.status(),
            })
            .collect()
    }
}
