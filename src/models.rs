//! Data models for the sponsorship report aggregator.
//!
//! Entity records mirror the JSON served by the record-keeping API. Every
//! field is optional, and identifiers are normalized to strings while
//! deserializing so that a record served with `"student_id": 7` joins
//! against one served with `"student_id": "7"`.

use crate::analysis::{DashboardSummary, FilterOptions, ReportFilters, ReportSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Normalize a scalar JSON value to its string form.
///
/// Strings are trimmed; an empty string counts as absent. Arrays, objects
/// and null have no scalar form.
pub fn normalize_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(number_to_string(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral floats render without a fraction so `7.0` joins with `7`.
fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Coerce a JSON value to a finite number.
///
/// Numbers pass through and numeric strings are parsed; everything else
/// (including `NaN`/`inf` spellings) is `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Amount used in sums: absent or malformed values count as zero.
pub fn amount_or_zero(amount: Option<f64>) -> f64 {
    amount.unwrap_or(0.0)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(normalize_scalar))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

/// The five collections served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Students,
    Sponsors,
    Programs,
    Allocations,
    Payments,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::Students,
        CollectionKind::Sponsors,
        CollectionKind::Programs,
        CollectionKind::Allocations,
        CollectionKind::Payments,
    ];

    /// Name of the array field wrapping this collection in a list response.
    pub fn envelope_field(&self) -> &'static str {
        match self {
            CollectionKind::Students => "students",
            CollectionKind::Sponsors => "sponsors",
            CollectionKind::Programs => "scholarship_programs",
            CollectionKind::Allocations => "sponsorship_allocations",
            CollectionKind::Payments => "payments",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Students => write!(f, "Students"),
            CollectionKind::Sponsors => write!(f, "Sponsors"),
            CollectionKind::Programs => write!(f, "Programs"),
            CollectionKind::Allocations => write!(f, "Allocations"),
            CollectionKind::Payments => write!(f, "Payments"),
        }
    }
}

/// A record that belongs to one of the API collections.
pub trait Record {
    /// Collection this record type is fetched from.
    const KIND: CollectionKind;

    /// Normalized identifier, if the record carries one.
    fn id(&self) -> Option<&str>;
}

/// A sponsored student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub university: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year_of_study: Option<String>,
}

impl Student {
    /// Record with every field blank; stands in for unresolved references.
    pub const EMPTY: Student = Student {
        student_id: None,
        name: None,
        gender: None,
        date_of_birth: None,
        contact: None,
        email: None,
        university: None,
        course: None,
        year_of_study: None,
    };
}

impl Record for Student {
    const KIND: CollectionKind = CollectionKind::Students;

    fn id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }
}

/// A sponsoring organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sponsor {
    #[serde(default, deserialize_with = "lenient_string")]
    pub sponsor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub organization_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact_person: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
}

impl Sponsor {
    pub const EMPTY: Sponsor = Sponsor {
        sponsor_id: None,
        organization_name: None,
        contact_person: None,
        contact: None,
        email: None,
        address: None,
    };
}

impl Record for Sponsor {
    const KIND: CollectionKind = CollectionKind::Sponsors;

    fn id(&self) -> Option<&str> {
        self.sponsor_id.as_deref()
    }
}

/// A scholarship program funded by one sponsor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default, deserialize_with = "lenient_string")]
    pub program_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sponsor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub program_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount_per_student: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub qualifications: Option<String>,
}

impl Program {
    pub const EMPTY: Program = Program {
        program_id: None,
        sponsor_id: None,
        program_name: None,
        amount_per_student: None,
        duration: None,
        qualifications: None,
    };
}

impl Record for Program {
    const KIND: CollectionKind = CollectionKind::Programs;

    fn id(&self) -> Option<&str> {
        self.program_id.as_deref()
    }
}

/// One student awarded funding from one program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub allocation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub program_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

impl Allocation {
    pub const EMPTY: Allocation = Allocation {
        allocation_id: None,
        student_id: None,
        program_id: None,
        start_date: None,
        end_date: None,
        status: None,
    };
}

impl Record for Allocation {
    const KIND: CollectionKind = CollectionKind::Allocations;

    fn id(&self) -> Option<&str> {
        self.allocation_id.as_deref()
    }
}

/// A disbursement made against an allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub allocation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub semester: Option<String>,
}

impl Record for Payment {
    const KIND: CollectionKind = CollectionKind::Payments;

    fn id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }
}

/// Row of the student sponsorship report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSponsorshipRow {
    pub allocation_id: Option<String>,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub university: Option<String>,
    pub program_id: Option<String>,
    pub program: Option<String>,
    pub sponsor_id: Option<String>,
    pub sponsor: Option<String>,
    pub status: Option<String>,
}

/// Row of the payment summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummaryRow {
    pub payment_id: Option<String>,
    pub allocation_id: Option<String>,
    pub student_id: Option<String>,
    pub student: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub semester: Option<String>,
}

/// Aggregated contribution of one sponsor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorContributionRow {
    pub sponsor_id: Option<String>,
    /// Organization name, or the raw sponsor id when the sponsor is unknown.
    pub sponsor: Option<String>,
    pub total_amount: f64,
    pub num_students: usize,
}

/// Row of the scholarship program summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSummaryRow {
    pub program_id: Option<String>,
    pub sponsor_id: Option<String>,
    pub sponsor: Option<String>,
    pub program_name: Option<String>,
    pub amount_per_student: Option<f64>,
    pub duration: Option<String>,
}

/// Row of the active vs completed sponsorships report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorshipStatusRow {
    pub allocation_id: Option<String>,
    pub student: Option<String>,
    pub program: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

/// Student count for one university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityCountRow {
    pub university: Option<String>,
    pub count: usize,
}

/// Allocation line of the single student detail report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAllocationRow {
    pub allocation_id: Option<String>,
    pub program: Option<String>,
    pub sponsor: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

/// Payment line of the single student detail report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPaymentRow {
    pub payment_id: Option<String>,
    pub amount: Option<f64>,
    pub payment_date: Option<String>,
    pub semester: Option<String>,
}

/// Everything known about one selected student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetail {
    /// Id that was selected.
    pub student_id: String,
    /// The student's record; `None` when the id does not resolve.
    pub student: Option<Student>,
    pub allocations: Vec<StudentAllocationRow>,
    pub payments: Vec<StudentPaymentRow>,
}

/// A block of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportSection {
    StudentSponsorship,
    PaymentSummary,
    SponsorContribution,
    ProgramSummary,
    SponsorshipStatus,
    StudentsPerUniversity,
    StudentDetail,
    Dashboard,
}

impl ReportSection {
    pub const ALL: [ReportSection; 8] = [
        ReportSection::StudentSponsorship,
        ReportSection::PaymentSummary,
        ReportSection::SponsorContribution,
        ReportSection::ProgramSummary,
        ReportSection::SponsorshipStatus,
        ReportSection::StudentsPerUniversity,
        ReportSection::StudentDetail,
        ReportSection::Dashboard,
    ];

    /// Heading used for the section in rendered reports.
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::StudentSponsorship => "Student Sponsorship Report",
            ReportSection::PaymentSummary => "Payment Summary Report",
            ReportSection::SponsorContribution => "Sponsor Contribution Report",
            ReportSection::ProgramSummary => "Scholarship Program Summary",
            ReportSection::SponsorshipStatus => "Active vs Completed Sponsorships",
            ReportSection::StudentsPerUniversity => "Students per University Report",
            ReportSection::StudentDetail => "Student Detail Report",
            ReportSection::Dashboard => "Dashboard",
        }
    }

    /// Markdown anchor for the section heading.
    pub fn anchor(&self) -> String {
        self.title().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Load outcome of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub collection: CollectionKind,
    pub loaded: bool,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Base URL of the API the collections came from.
    pub api_url: String,
    pub generated_at: DateTime<Utc>,
    /// Filters in effect when the views were computed.
    pub filters: ReportFilters,
    pub sources: Vec<SourceStatus>,
}

/// The complete rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Sections to render, in order.
    pub sections: Vec<ReportSection>,
    pub filter_options: FilterOptions,
    pub views: ReportSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardSummary>,
}

impl Report {
    /// True when every selected table section has no rows.
    ///
    /// The dashboard does not count as a table section.
    pub fn selected_views_empty(&self) -> bool {
        self.sections
            .iter()
            .filter_map(|section| self.views.row_count(*section))
            .all(|count| count == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_normalize_equally() {
        let a: Allocation = serde_json::from_value(json!({
            "allocation_id": 3,
            "student_id": 7,
            "program_id": "12"
        }))
        .unwrap();
        let b: Allocation = serde_json::from_value(json!({
            "allocation_id": "3",
            "student_id": " 7 ",
            "program_id": 12
        }))
        .unwrap();

        assert_eq!(a.allocation_id, b.allocation_id);
        assert_eq!(a.student_id.as_deref(), Some("7"));
        assert_eq!(b.student_id.as_deref(), Some("7"));
        assert_eq!(a.program_id, b.program_id);
    }

    #[test]
    fn test_integral_float_ids_join_with_integers() {
        assert_eq!(normalize_scalar(&json!(7.0)).as_deref(), Some("7"));
        assert_eq!(normalize_scalar(&json!(-3.0)).as_deref(), Some("-3"));
        assert_eq!(normalize_scalar(&json!(7.5)).as_deref(), Some("7.5"));

        let a: Student = serde_json::from_value(json!({"student_id": 7.0})).unwrap();
        let b: Student = serde_json::from_value(json!({"student_id": "7"})).unwrap();
        assert_eq!(a.student_id, b.student_id);
    }

    #[test]
    fn test_missing_and_null_fields_are_none() {
        let student: Student = serde_json::from_value(json!({
            "student_id": 1,
            "name": "Amina",
            "university": null
        }))
        .unwrap();

        assert_eq!(student.name.as_deref(), Some("Amina"));
        assert!(student.university.is_none());
        assert!(student.year_of_study.is_none());
    }

    #[test]
    fn test_amount_coercion() {
        let payment: Payment = serde_json::from_value(json!({
            "payment_id": 1,
            "amount": "250.50"
        }))
        .unwrap();
        assert_eq!(payment.amount, Some(250.5));

        let malformed: Payment = serde_json::from_value(json!({
            "payment_id": 2,
            "amount": "a lot"
        }))
        .unwrap();
        assert_eq!(malformed.amount, None);
        assert_eq!(amount_or_zero(malformed.amount), 0.0);

        assert_eq!(coerce_number(&json!({"nested": 1})), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
    }

    #[test]
    fn test_year_and_semester_accept_numbers() {
        let student: Student =
            serde_json::from_value(json!({"student_id": 1, "year_of_study": 2})).unwrap();
        assert_eq!(student.year_of_study.as_deref(), Some("2"));

        let payment: Payment =
            serde_json::from_value(json!({"payment_id": 1, "semester": 1})).unwrap();
        assert_eq!(payment.semester.as_deref(), Some("1"));
    }

    #[test]
    fn test_empty_string_is_absent() {
        assert_eq!(normalize_scalar(&json!("   ")), None);
        assert_eq!(normalize_scalar(&json!(null)), None);
        assert_eq!(normalize_scalar(&json!([1])), None);
    }

    #[test]
    fn test_envelope_fields() {
        assert_eq!(CollectionKind::Programs.envelope_field(), "scholarship_programs");
        assert_eq!(
            CollectionKind::Allocations.envelope_field(),
            "sponsorship_allocations"
        );
        assert_eq!(CollectionKind::Students.to_string(), "Students");
    }

    #[test]
    fn test_section_anchor() {
        assert_eq!(
            ReportSection::StudentsPerUniversity.anchor(),
            "students-per-university-report"
        );
        assert_eq!(ReportSection::ALL.len(), 8);
    }
}
