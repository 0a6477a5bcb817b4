//! Report filter state and the option values that populate filter controls.

use crate::data::DataContext;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A recognized filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    University,
    Year,
    SponsorId,
    Status,
    Semester,
    DateFrom,
    DateTo,
    StudentId,
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        FilterField::University,
        FilterField::Year,
        FilterField::SponsorId,
        FilterField::Status,
        FilterField::Semester,
        FilterField::DateFrom,
        FilterField::DateTo,
        FilterField::StudentId,
    ];
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilterField::University => "University",
            FilterField::Year => "Year of Study",
            FilterField::SponsorId => "Sponsor",
            FilterField::Status => "Status",
            FilterField::Semester => "Semester",
            FilterField::DateFrom => "From",
            FilterField::DateTo => "To",
            FilterField::StudentId => "Student",
        };
        write!(f, "{}", label)
    }
}

/// Filters shared by all report views. Each view reads only its own subset.
///
/// Values are stored trimmed; an empty value means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl ReportFilters {
    fn slot(&mut self, field: FilterField) -> &mut Option<String> {
        match field {
            FilterField::University => &mut self.university,
            FilterField::Year => &mut self.year,
            FilterField::SponsorId => &mut self.sponsor_id,
            FilterField::Status => &mut self.status,
            FilterField::Semester => &mut self.semester,
            FilterField::DateFrom => &mut self.date_from,
            FilterField::DateTo => &mut self.date_to,
            FilterField::StudentId => &mut self.student_id,
        }
    }

    /// Current value of a field.
    pub fn get(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::University => &self.university,
            FilterField::Year => &self.year,
            FilterField::SponsorId => &self.sponsor_id,
            FilterField::Status => &self.status,
            FilterField::Semester => &self.semester,
            FilterField::DateFrom => &self.date_from,
            FilterField::DateTo => &self.date_to,
            FilterField::StudentId => &self.student_id,
        };
        value.as_deref()
    }

    /// Set a field. Returns whether the stored value changed.
    pub fn set(&mut self, field: FilterField, value: &str) -> bool {
        let normalized = normalize(Some(value));
        let slot = self.slot(field);
        if *slot == normalized {
            return false;
        }
        *slot = normalized;
        true
    }

    /// Clear a field. Returns whether it was set.
    pub fn clear(&mut self, field: FilterField) -> bool {
        self.slot(field).take().is_some()
    }

    /// Copy with every value trimmed and blank values dropped.
    pub fn normalized(mut self) -> Self {
        for field in FilterField::ALL {
            let slot = self.slot(field);
            *slot = normalize(slot.as_deref());
        }
        self
    }

    /// Fields currently set, in declaration order.
    pub fn active(&self) -> Vec<(FilterField, &str)> {
        FilterField::ALL
            .iter()
            .filter_map(|field| self.get(*field).map(|value| (*field, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }

    /// Inclusive date-range check on ISO dates, compared as strings.
    ///
    /// A missing date fails any active bound.
    pub fn date_in_range(&self, date: Option<&str>) -> bool {
        if let Some(from) = self.date_from.as_deref() {
            match date {
                Some(d) if d >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = self.date_to.as_deref() {
            match date {
                Some(d) if d <= to => {}
                _ => return false,
            }
        }
        true
    }
}

/// Exact-match predicate: an unset filter matches everything.
pub fn matches_filter(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(expected) => value == Some(expected),
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// A selectable filter value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChoice {
    pub value: String,
    pub label: String,
}

/// Distinct values available to each filter control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct non-empty universities, first-seen order.
    pub universities: Vec<String>,
    pub students: Vec<FilterChoice>,
    pub sponsors: Vec<FilterChoice>,
    /// Distinct allocation statuses present, first-seen order.
    pub statuses: Vec<String>,
    pub years: Vec<String>,
    pub semesters: Vec<String>,
}

impl FilterOptions {
    pub fn from_data(data: &DataContext) -> Self {
        let students = data
            .students()
            .iter()
            .filter_map(|s| {
                let id = s.student_id.as_deref()?;
                Some(FilterChoice {
                    value: id.to_string(),
                    label: format!("{} ({})", s.name.as_deref().unwrap_or(""), id),
                })
            })
            .collect();

        let sponsors = data
            .sponsors()
            .iter()
            .filter_map(|s| {
                let id = s.sponsor_id.as_deref()?;
                Some(FilterChoice {
                    value: id.to_string(),
                    label: s.organization_name.clone().unwrap_or_else(|| id.to_string()),
                })
            })
            .collect();

        Self {
            universities: distinct(data.students().iter().map(|s| s.university.as_deref())),
            students,
            sponsors,
            statuses: distinct(data.allocations().iter().map(|a| a.status.as_deref())),
            years: ["1", "2", "3", "4"].iter().map(|y| y.to_string()).collect(),
            semesters: ["1", "2"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| seen.insert(*v))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, Sponsor, Student};
    use serde_json::json;

    #[test]
    fn test_set_normalizes_and_reports_changes() {
        let mut filters = ReportFilters::default();

        assert!(filters.set(FilterField::University, "  Makerere "));
        assert_eq!(filters.university.as_deref(), Some("Makerere"));
        assert!(!filters.set(FilterField::University, "Makerere"));

        assert!(filters.set(FilterField::University, "   "));
        assert!(filters.university.is_none());
        assert!(filters.is_empty());
    }

    #[test]
    fn test_clear_and_active() {
        let mut filters = ReportFilters::default();
        filters.set(FilterField::Semester, "1");
        filters.set(FilterField::StudentId, "7");

        let active = filters.active();
        assert_eq!(
            active,
            vec![(FilterField::Semester, "1"), (FilterField::StudentId, "7")]
        );

        assert!(filters.clear(FilterField::Semester));
        assert!(!filters.clear(FilterField::Semester));
        assert_eq!(filters.get(FilterField::StudentId), Some("7"));
    }

    #[test]
    fn test_normalized_drops_blank_values() {
        let filters = ReportFilters {
            university: Some(" ".to_string()),
            year: Some(" 2".to_string()),
            ..Default::default()
        }
        .normalized();

        assert!(filters.university.is_none());
        assert_eq!(filters.year.as_deref(), Some("2"));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filters = ReportFilters {
            date_from: Some("2024-01-10".to_string()),
            date_to: Some("2024-02-10".to_string()),
            ..Default::default()
        };

        assert!(filters.date_in_range(Some("2024-01-10")));
        assert!(filters.date_in_range(Some("2024-02-10")));
        assert!(filters.date_in_range(Some("2024-01-31")));
        assert!(!filters.date_in_range(Some("2024-01-09")));
        assert!(!filters.date_in_range(Some("2024-02-11")));
        assert!(!filters.date_in_range(None));
        assert!(ReportFilters::default().date_in_range(None));
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter(None, None));
        assert!(matches_filter(None, Some("Active")));
        assert!(matches_filter(Some("Active"), Some("Active")));
        assert!(!matches_filter(Some("Active"), Some("active")));
        assert!(!matches_filter(Some("Active"), None));
    }

    #[test]
    fn test_filter_options_from_data() {
        let students: Vec<Student> = serde_json::from_value(json!([
            {"student_id": 1, "name": "Amina", "university": "Makerere"},
            {"student_id": 2, "name": "Brian", "university": "Kyambogo"},
            {"student_id": 3, "name": "Grace", "university": "Makerere"},
            {"student_id": 4, "name": "Peter"}
        ]))
        .unwrap();
        let sponsors: Vec<Sponsor> = serde_json::from_value(json!([
            {"sponsor_id": 5, "organization_name": "ABC Foundation"},
            {"sponsor_id": 6}
        ]))
        .unwrap();
        let allocations: Vec<Allocation> = serde_json::from_value(json!([
            {"allocation_id": 1, "status": "Active"},
            {"allocation_id": 2, "status": "Completed"},
            {"allocation_id": 3, "status": "Active"}
        ]))
        .unwrap();
        let data = DataContext::from_parts(students, sponsors, vec![], allocations, vec![]);

        let options = FilterOptions::from_data(&data);

        assert_eq!(options.universities, vec!["Makerere", "Kyambogo"]);
        assert_eq!(options.students.len(), 4);
        assert_eq!(options.students[0].label, "Amina (1)");
        assert_eq!(options.sponsors[1].label, "6");
        assert_eq!(options.statuses, vec!["Active", "Completed"]);
        assert_eq!(options.semesters, vec!["1", "2"]);
    }
}
