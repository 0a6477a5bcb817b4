//! Lookup indices over the loaded collections.

use crate::data::DataContext;
use crate::models::{Allocation, Program, Record, Sponsor, Student};
use std::collections::HashMap;

static EMPTY_STUDENT: Student = Student::EMPTY;
static EMPTY_SPONSOR: Sponsor = Sponsor::EMPTY;
static EMPTY_PROGRAM: Program = Program::EMPTY;
static EMPTY_ALLOCATION: Allocation = Allocation::EMPTY;

/// O(1) resolution of foreign keys against a [`DataContext`].
///
/// `student`, `sponsor`, `program` and `allocation` never fail: a missing or
/// unknown id resolves to a blank record so joins degrade to blank cells.
/// The `find_*` variants return `None` instead, for callers that must drop
/// unresolved rows.
pub struct LookupIndex<'a> {
    data: &'a DataContext,
    students: HashMap<&'a str, &'a Student>,
    sponsors: HashMap<&'a str, &'a Sponsor>,
    programs: HashMap<&'a str, &'a Program>,
    allocations: HashMap<&'a str, &'a Allocation>,
}

impl<'a> LookupIndex<'a> {
    /// Index every collection of `data` by normalized id.
    pub fn build(data: &'a DataContext) -> Self {
        Self {
            data,
            students: index_by_id(data.students()),
            sponsors: index_by_id(data.sponsors()),
            programs: index_by_id(data.programs()),
            allocations: index_by_id(data.allocations()),
        }
    }

    /// The collections this index was built from.
    pub fn data(&self) -> &'a DataContext {
        self.data
    }

    pub fn find_student(&self, id: Option<&str>) -> Option<&'a Student> {
        id.and_then(|id| self.students.get(id.trim()).copied())
    }

    pub fn find_sponsor(&self, id: Option<&str>) -> Option<&'a Sponsor> {
        id.and_then(|id| self.sponsors.get(id.trim()).copied())
    }

    pub fn find_program(&self, id: Option<&str>) -> Option<&'a Program> {
        id.and_then(|id| self.programs.get(id.trim()).copied())
    }

    pub fn find_allocation(&self, id: Option<&str>) -> Option<&'a Allocation> {
        id.and_then(|id| self.allocations.get(id.trim()).copied())
    }

    pub fn student(&self, id: Option<&str>) -> &'a Student {
        self.find_student(id).unwrap_or(&EMPTY_STUDENT)
    }

    pub fn sponsor(&self, id: Option<&str>) -> &'a Sponsor {
        self.find_sponsor(id).unwrap_or(&EMPTY_SPONSOR)
    }

    pub fn program(&self, id: Option<&str>) -> &'a Program {
        self.find_program(id).unwrap_or(&EMPTY_PROGRAM)
    }

    pub fn allocation(&self, id: Option<&str>) -> &'a Allocation {
        self.find_allocation(id).unwrap_or(&EMPTY_ALLOCATION)
    }
}

/// Map id to record; records without an id are skipped, the last duplicate wins.
fn index_by_id<T: Record>(items: &[T]) -> HashMap<&str, &T> {
    items
        .iter()
        .filter_map(|item| item.id().map(|id| (id, item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_data() -> DataContext {
        let students: Vec<Student> = serde_json::from_value(json!([
            {"student_id": 1, "name": "Amina"},
            {"student_id": "2", "name": "Brian"},
            {"name": "No Id"}
        ]))
        .unwrap();
        let programs: Vec<Program> = serde_json::from_value(json!([
            {"program_id": 10, "program_name": "STEM Bursary"},
            {"program_id": 10, "program_name": "STEM Bursary (renamed)"}
        ]))
        .unwrap();
        DataContext::from_parts(students, vec![], programs, vec![], vec![])
    }

    #[test]
    fn test_resolves_known_ids() {
        let data = sample_data();
        let index = LookupIndex::build(&data);

        assert_eq!(index.student(Some("1")).name.as_deref(), Some("Amina"));
        assert_eq!(index.student(Some("2")).name.as_deref(), Some("Brian"));
        assert!(index.find_student(Some(" 2 ")).is_some());
    }

    #[test]
    fn test_unknown_ids_resolve_to_blank_records() {
        let data = sample_data();
        let index = LookupIndex::build(&data);

        assert_eq!(index.student(Some("99")), &Student::default());
        assert_eq!(index.student(None), &Student::default());
        assert_eq!(index.sponsor(Some("1")), &Sponsor::default());
        assert!(index.find_allocation(Some("1")).is_none());
    }

    #[test]
    fn test_last_duplicate_wins() {
        let data = sample_data();
        let index = LookupIndex::build(&data);

        assert_eq!(
            index.program(Some("10")).program_name.as_deref(),
            Some("STEM Bursary (renamed)")
        );
    }
}
