//! The seven report views.
//!
//! Each view joins over a [`LookupIndex`] first and applies its filters to
//! the joined rows afterwards; filtering never changes how rows are joined.
//! Raw foreign keys travel with every row so that sponsor filters compare
//! ids rather than organization names.

use crate::analysis::filters::{matches_filter, ReportFilters};
use crate::analysis::index::LookupIndex;
use crate::data::DataContext;
use crate::models::{
    amount_or_zero, PaymentSummaryRow, ProgramSummaryRow, ReportSection,
    SponsorContributionRow, SponsorshipStatusRow, StudentAllocationRow, StudentDetail,
    StudentPaymentRow, StudentSponsorshipRow, UniversityCountRow,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Student sponsorship: one row per allocation.
///
/// Filters: `university`, `year` (the student's year of study) and
/// `sponsor_id` (the sponsor of the allocation's program).
pub fn student_sponsorship(
    index: &LookupIndex<'_>,
    filters: &ReportFilters,
) -> Vec<StudentSponsorshipRow> {
    index
        .data()
        .allocations()
        .iter()
        .map(|a| {
            let student = index.student(a.student_id.as_deref());
            let program = index.program(a.program_id.as_deref());
            let sponsor = index.sponsor(program.sponsor_id.as_deref());
            StudentSponsorshipRow {
                allocation_id: a.allocation_id.clone(),
                student_id: a.student_id.clone(),
                student_name: student.name.clone(),
                university: student.university.clone(),
                program_id: a.program_id.clone(),
                program: program.program_name.clone(),
                sponsor_id: program.sponsor_id.clone(),
                sponsor: sponsor.organization_name.clone(),
                status: a.status.clone(),
            }
        })
        .filter(|row| matches_filter(filters.university.as_deref(), row.university.as_deref()))
        .filter(|row| {
            let year = index.student(row.student_id.as_deref()).year_of_study.as_deref();
            matches_filter(filters.year.as_deref(), year)
        })
        .filter(|row| matches_filter(filters.sponsor_id.as_deref(), row.sponsor_id.as_deref()))
        .collect()
}

/// Payment summary: one row per payment.
///
/// Filters: `semester` and the inclusive `date_from`/`date_to` range.
pub fn payment_summary(index: &LookupIndex<'_>, filters: &ReportFilters) -> Vec<PaymentSummaryRow> {
    index
        .data()
        .payments()
        .iter()
        .map(|p| {
            let allocation = index.allocation(p.allocation_id.as_deref());
            let student = index.student(allocation.student_id.as_deref());
            PaymentSummaryRow {
                payment_id: p.payment_id.clone(),
                allocation_id: p.allocation_id.clone(),
                student_id: allocation.student_id.clone(),
                student: student.name.clone(),
                amount: p.amount,
                date: p.payment_date.clone(),
                semester: p.semester.clone(),
            }
        })
        .filter(|row| matches_filter(filters.semester.as_deref(), row.semester.as_deref()))
        .filter(|row| filters.date_in_range(row.date.as_deref()))
        .collect()
}

struct ContributionAccumulator<'a> {
    sponsor_id: Option<&'a str>,
    sponsor: Option<String>,
    total: f64,
    students: HashSet<&'a str>,
}

/// Sponsor contribution: payments summed per sponsor.
///
/// Payments whose allocation or program does not resolve are left out.
/// Rows are grouped by sponsor id and appear in order of first
/// contribution. Filter: `sponsor_id`.
pub fn sponsor_contribution(
    index: &LookupIndex<'_>,
    filters: &ReportFilters,
) -> Vec<SponsorContributionRow> {
    let mut groups: Vec<ContributionAccumulator<'_>> = Vec::new();
    let mut positions: HashMap<Option<&str>, usize> = HashMap::new();

    for payment in index.data().payments() {
        let Some(allocation) = index.find_allocation(payment.allocation_id.as_deref()) else {
            continue;
        };
        let Some(program) = index.find_program(allocation.program_id.as_deref()) else {
            continue;
        };

        let sponsor_id = program.sponsor_id.as_deref();
        let position = *positions.entry(sponsor_id).or_insert_with(|| {
            let sponsor = index
                .find_sponsor(sponsor_id)
                .and_then(|s| s.organization_name.clone())
                .or_else(|| sponsor_id.map(String::from));
            groups.push(ContributionAccumulator {
                sponsor_id,
                sponsor,
                total: 0.0,
                students: HashSet::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[position];
        group.total += amount_or_zero(payment.amount);
        if let Some(student_id) = allocation.student_id.as_deref() {
            group.students.insert(student_id);
        }
    }

    groups
        .into_iter()
        .map(|g| SponsorContributionRow {
            sponsor_id: g.sponsor_id.map(String::from),
            sponsor: g.sponsor,
            total_amount: g.total,
            num_students: g.students.len(),
        })
        .filter(|row| matches_filter(filters.sponsor_id.as_deref(), row.sponsor_id.as_deref()))
        .collect()
}

/// Scholarship program summary: one row per program. Filter: `sponsor_id`.
pub fn program_summary(index: &LookupIndex<'_>, filters: &ReportFilters) -> Vec<ProgramSummaryRow> {
    index
        .data()
        .programs()
        .iter()
        .map(|p| ProgramSummaryRow {
            program_id: p.program_id.clone(),
            sponsor_id: p.sponsor_id.clone(),
            sponsor: index
                .sponsor(p.sponsor_id.as_deref())
                .organization_name
                .clone(),
            program_name: p.program_name.clone(),
            amount_per_student: p.amount_per_student,
            duration: p.duration.clone(),
        })
        .filter(|row| matches_filter(filters.sponsor_id.as_deref(), row.sponsor_id.as_deref()))
        .collect()
}

/// Active vs completed sponsorships: one row per allocation. Filter: `status`.
pub fn sponsorship_status(
    index: &LookupIndex<'_>,
    filters: &ReportFilters,
) -> Vec<SponsorshipStatusRow> {
    index
        .data()
        .allocations()
        .iter()
        .map(|a| SponsorshipStatusRow {
            allocation_id: a.allocation_id.clone(),
            student: index.student(a.student_id.as_deref()).name.clone(),
            program: index.program(a.program_id.as_deref()).program_name.clone(),
            start_date: a.start_date.clone(),
            end_date: a.end_date.clone(),
            status: a.status.clone(),
        })
        .filter(|row| matches_filter(filters.status.as_deref(), row.status.as_deref()))
        .collect()
}

/// Students per university, after applying the `university` filter.
///
/// Students without a university form their own group. Rows appear in
/// first-seen order.
pub fn students_per_university(
    data: &DataContext,
    filters: &ReportFilters,
) -> Vec<UniversityCountRow> {
    let mut rows: Vec<UniversityCountRow> = Vec::new();
    let mut positions: HashMap<Option<&str>, usize> = HashMap::new();

    let students = data
        .students()
        .iter()
        .filter(|s| matches_filter(filters.university.as_deref(), s.university.as_deref()));

    for student in students {
        let university = student.university.as_deref();
        let position = *positions.entry(university).or_insert_with(|| {
            rows.push(UniversityCountRow {
                university: university.map(String::from),
                count: 0,
            });
            rows.len() - 1
        });
        rows[position].count += 1;
    }

    rows
}

/// Detail of the student selected by `student_id`; `None` when no student
/// is selected.
pub fn student_detail(index: &LookupIndex<'_>, filters: &ReportFilters) -> Option<StudentDetail> {
    let student_id = filters.student_id.as_deref()?;
    let data = index.data();

    let owned: Vec<_> = data
        .allocations()
        .iter()
        .filter(|a| a.student_id.as_deref() == Some(student_id))
        .collect();

    let allocation_ids: HashSet<&str> = owned
        .iter()
        .filter_map(|a| a.allocation_id.as_deref())
        .collect();

    let allocations = owned
        .iter()
        .map(|a| {
            let program = index.program(a.program_id.as_deref());
            let sponsor = index.sponsor(program.sponsor_id.as_deref());
            StudentAllocationRow {
                allocation_id: a.allocation_id.clone(),
                program: program.program_name.clone(),
                sponsor: sponsor.organization_name.clone(),
                start_date: a.start_date.clone(),
                end_date: a.end_date.clone(),
                status: a.status.clone(),
            }
        })
        .collect();

    let payments = data
        .payments()
        .iter()
        .filter(|p| {
            p.allocation_id
                .as_deref()
                .is_some_and(|id| allocation_ids.contains(id))
        })
        .map(|p| StudentPaymentRow {
            payment_id: p.payment_id.clone(),
            amount: p.amount,
            payment_date: p.payment_date.clone(),
            semester: p.semester.clone(),
        })
        .collect();

    Some(StudentDetail {
        student_id: student_id.to_string(),
        student: index.find_student(Some(student_id)).cloned(),
        allocations,
        payments,
    })
}

/// All seven views computed from one snapshot of data and filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSet {
    pub student_sponsorship: Vec<StudentSponsorshipRow>,
    pub payment_summary: Vec<PaymentSummaryRow>,
    pub sponsor_contribution: Vec<SponsorContributionRow>,
    pub program_summary: Vec<ProgramSummaryRow>,
    pub sponsorship_status: Vec<SponsorshipStatusRow>,
    pub students_per_university: Vec<UniversityCountRow>,
    pub student_detail: Option<StudentDetail>,
}

impl ReportSet {
    /// Compute every view from scratch.
    pub fn compute(data: &DataContext, filters: &ReportFilters) -> Self {
        let index = LookupIndex::build(data);

        Self {
            student_sponsorship: student_sponsorship(&index, filters),
            payment_summary: payment_summary(&index, filters),
            sponsor_contribution: sponsor_contribution(&index, filters),
            program_summary: program_summary(&index, filters),
            sponsorship_status: sponsorship_status(&index, filters),
            students_per_university: students_per_university(data, filters),
            student_detail: student_detail(&index, filters),
        }
    }

    /// Number of table rows a section renders; `None` for the dashboard.
    ///
    /// The student detail counts as one row when a student is selected.
    pub fn row_count(&self, section: ReportSection) -> Option<usize> {
        let count = match section {
            ReportSection::StudentSponsorship => self.student_sponsorship.len(),
            ReportSection::PaymentSummary => self.payment_summary.len(),
            ReportSection::SponsorContribution => self.sponsor_contribution.len(),
            ReportSection::ProgramSummary => self.program_summary.len(),
            ReportSection::SponsorshipStatus => self.sponsorship_status.len(),
            ReportSection::StudentsPerUniversity => self.students_per_university.len(),
            ReportSection::StudentDetail => usize::from(self.student_detail.is_some()),
            ReportSection::Dashboard => return None,
        };
        Some(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, Payment, Program, Sponsor, Student};
    use serde_json::json;

    /// S1 (Makerere) -> A1 -> P1 (SP1) with payment PM1; S2 (Kyambogo) -> A2 -> P1.
    fn scenario() -> DataContext {
        let students: Vec<Student> = serde_json::from_value(json!([
            {"student_id": 1, "name": "Amina Nakato", "university": "Makerere", "year_of_study": 2},
            {"student_id": 2, "name": "Brian Okello", "university": "Kyambogo", "year_of_study": "3"}
        ]))
        .unwrap();
        let sponsors: Vec<Sponsor> = serde_json::from_value(json!([
            {"sponsor_id": 1, "organization_name": "ABC Foundation"},
            {"sponsor_id": 2, "organization_name": "XYZ Trust"}
        ]))
        .unwrap();
        let programs: Vec<Program> = serde_json::from_value(json!([
            {"program_id": 1, "sponsor_id": 1, "program_name": "STEM Bursary",
             "amount_per_student": "1500000", "duration": 4},
            {"program_id": 2, "sponsor_id": "2", "program_name": "Teachers Grant",
             "amount_per_student": 800000, "duration": "3 years"}
        ]))
        .unwrap();
        let allocations: Vec<Allocation> = serde_json::from_value(json!([
            {"allocation_id": 1, "student_id": 1, "program_id": 1,
             "start_date": "2024-01-01", "end_date": "2027-12-31", "status": "Active"},
            {"allocation_id": "2", "student_id": "2", "program_id": "1",
             "start_date": "2023-09-01", "end_date": "2024-06-30", "status": "Completed"}
        ]))
        .unwrap();
        let payments: Vec<Payment> = serde_json::from_value(json!([
            {"payment_id": 1, "allocation_id": 1, "amount": 100,
             "payment_date": "2024-01-10", "semester": 1}
        ]))
        .unwrap();

        DataContext::from_parts(students, sponsors, programs, allocations, payments)
    }

    fn with_filters(f: impl FnOnce(&mut ReportFilters)) -> ReportFilters {
        let mut filters = ReportFilters::default();
        f(&mut filters);
        filters
    }

    #[test]
    fn test_student_sponsorship_resolves_all_names() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        let rows = student_sponsorship(&index, &ReportFilters::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].student_name.as_deref(), Some("Amina Nakato"));
        assert_eq!(rows[0].university.as_deref(), Some("Makerere"));
        assert_eq!(rows[0].program.as_deref(), Some("STEM Bursary"));
        assert_eq!(rows[0].sponsor.as_deref(), Some("ABC Foundation"));
        assert_eq!(rows[0].sponsor_id.as_deref(), Some("1"));
        assert_eq!(rows[0].status.as_deref(), Some("Active"));
    }

    #[test]
    fn test_student_sponsorship_keeps_dangling_student() {
        let mut data = scenario();
        let mut allocations = data.allocations().to_vec();
        allocations[0].student_id = Some("404".to_string());
        data.allocations = crate::data::Collection::loaded(allocations);
        let index = LookupIndex::build(&data);

        let rows = student_sponsorship(&index, &ReportFilters::default());

        assert_eq!(rows.len(), 2);
        assert!(rows[0].student_name.is_none());
        assert!(rows[0].university.is_none());
        assert_eq!(rows[0].program.as_deref(), Some("STEM Bursary"));
    }

    #[test]
    fn test_student_sponsorship_filters() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        let by_university = student_sponsorship(
            &index,
            &with_filters(|f| f.university = Some("Kyambogo".to_string())),
        );
        assert_eq!(by_university.len(), 1);
        assert_eq!(by_university[0].student_name.as_deref(), Some("Brian Okello"));

        let by_year =
            student_sponsorship(&index, &with_filters(|f| f.year = Some("2".to_string())));
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year[0].student_id.as_deref(), Some("1"));

        let by_sponsor =
            student_sponsorship(&index, &with_filters(|f| f.sponsor_id = Some("2".to_string())));
        assert!(by_sponsor.is_empty());
    }

    #[test]
    fn test_sponsor_filter_uses_ids_not_names() {
        let mut data = scenario();
        let mut sponsors = data.sponsors().to_vec();
        sponsors[1].organization_name = Some("ABC Foundation".to_string());
        data.sponsors = crate::data::Collection::loaded(sponsors);
        let index = LookupIndex::build(&data);

        let rows =
            student_sponsorship(&index, &with_filters(|f| f.sponsor_id = Some("2".to_string())));
        assert!(rows.is_empty());

        let programs =
            program_summary(&index, &with_filters(|f| f.sponsor_id = Some("1".to_string())));
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].program_name.as_deref(), Some("STEM Bursary"));
    }

    #[test]
    fn test_payment_summary_rows_and_filters() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        let rows = payment_summary(&index, &ReportFilters::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student.as_deref(), Some("Amina Nakato"));
        assert_eq!(rows[0].amount, Some(100.0));
        assert_eq!(rows[0].semester.as_deref(), Some("1"));

        let inclusive = payment_summary(
            &index,
            &with_filters(|f| {
                f.date_from = Some("2024-01-10".to_string());
                f.date_to = Some("2024-01-10".to_string());
            }),
        );
        assert_eq!(inclusive.len(), 1);

        let other_semester =
            payment_summary(&index, &with_filters(|f| f.semester = Some("2".to_string())));
        assert!(other_semester.is_empty());
    }

    #[test]
    fn test_payment_with_dangling_allocation_keeps_row() {
        let mut data = scenario();
        let mut payments = data.payments().to_vec();
        payments[0].allocation_id = Some("999".to_string());
        data.payments = crate::data::Collection::loaded(payments);
        let index = LookupIndex::build(&data);

        let rows = payment_summary(&index, &ReportFilters::default());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].student.is_none());
        assert!(rows[0].student_id.is_none());
    }

    #[test]
    fn test_sponsor_contribution_scenario() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        let rows = sponsor_contribution(&index, &ReportFilters::default());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sponsor.as_deref(), Some("ABC Foundation"));
        assert_eq!(rows[0].total_amount, 100.0);
        assert_eq!(rows[0].num_students, 1);
    }

    #[test]
    fn test_sponsor_contribution_totals_are_isolated() {
        let mut data = scenario();
        let mut allocations = data.allocations().to_vec();
        allocations.push(Allocation {
            allocation_id: Some("3".to_string()),
            student_id: Some("2".to_string()),
            program_id: Some("2".to_string()),
            ..Default::default()
        });
        data.allocations = crate::data::Collection::loaded(allocations);

        let mut payments = data.payments().to_vec();
        payments.push(Payment {
            payment_id: Some("2".to_string()),
            allocation_id: Some("3".to_string()),
            amount: Some(40.0),
            ..Default::default()
        });
        data.payments = crate::data::Collection::loaded(payments.clone());

        let before = {
            let index = LookupIndex::build(&data);
            sponsor_contribution(&index, &ReportFilters::default())
        };

        payments[0].amount = Some(250.0);
        data.payments = crate::data::Collection::loaded(payments);
        let after = {
            let index = LookupIndex::build(&data);
            sponsor_contribution(&index, &ReportFilters::default())
        };

        assert_eq!(before[0].total_amount, 100.0);
        assert_eq!(after[0].total_amount, 250.0);
        assert_eq!(before[1].sponsor.as_deref(), Some("XYZ Trust"));
        assert_eq!(before[1].total_amount, after[1].total_amount);
    }

    #[test]
    fn test_sponsor_contribution_counts_distinct_students() {
        let mut data = scenario();
        let mut payments = data.payments().to_vec();
        payments.push(Payment {
            payment_id: Some("2".to_string()),
            allocation_id: Some("1".to_string()),
            amount: None,
            ..Default::default()
        });
        payments.push(Payment {
            payment_id: Some("3".to_string()),
            allocation_id: Some("2".to_string()),
            amount: Some(50.0),
            ..Default::default()
        });
        data.payments = crate::data::Collection::loaded(payments);
        let index = LookupIndex::build(&data);

        let rows = sponsor_contribution(&index, &ReportFilters::default());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_amount, 150.0);
        assert_eq!(rows[0].num_students, 2);
    }

    #[test]
    fn test_sponsor_contribution_skips_unresolved_payments() {
        let mut data = scenario();
        let mut payments = data.payments().to_vec();
        payments.push(Payment {
            payment_id: Some("2".to_string()),
            allocation_id: Some("999".to_string()),
            amount: Some(500.0),
            ..Default::default()
        });
        data.payments = crate::data::Collection::loaded(payments);
        let index = LookupIndex::build(&data);

        let rows = sponsor_contribution(&index, &ReportFilters::default());
        let total: f64 = rows.iter().map(|r| r.total_amount).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_sponsor_contribution_falls_back_to_sponsor_id() {
        let mut data = scenario();
        data.sponsors = crate::data::Collection::loaded(vec![]);
        let index = LookupIndex::build(&data);

        let rows = sponsor_contribution(&index, &ReportFilters::default());
        assert_eq!(rows[0].sponsor.as_deref(), Some("1"));

        let filtered =
            sponsor_contribution(&index, &with_filters(|f| f.sponsor_id = Some("2".to_string())));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_program_summary() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        let rows = program_summary(&index, &ReportFilters::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sponsor.as_deref(), Some("ABC Foundation"));
        assert_eq!(rows[0].amount_per_student, Some(1_500_000.0));
        assert_eq!(rows[0].duration.as_deref(), Some("4"));
        assert_eq!(rows[1].sponsor.as_deref(), Some("XYZ Trust"));
    }

    #[test]
    fn test_sponsorship_status_filter() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        let all = sponsorship_status(&index, &ReportFilters::default());
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].student.as_deref(), Some("Brian Okello"));
        assert_eq!(all[1].program.as_deref(), Some("STEM Bursary"));

        let completed =
            sponsorship_status(&index, &with_filters(|f| f.status = Some("Completed".to_string())));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].end_date.as_deref(), Some("2024-06-30"));
    }

    #[test]
    fn test_students_per_university() {
        let data = scenario();

        let filtered = students_per_university(
            &data,
            &with_filters(|f| f.university = Some("Makerere".to_string())),
        );
        assert_eq!(
            filtered,
            vec![UniversityCountRow {
                university: Some("Makerere".to_string()),
                count: 1
            }]
        );

        let all = students_per_university(&data, &ReportFilters::default());
        let total: usize = all.iter().map(|r| r.count).sum();
        assert_eq!(total, data.students().len());
        let distinct: HashSet<_> = all.iter().map(|r| r.university.clone()).collect();
        assert_eq!(distinct.len(), all.len());
    }

    #[test]
    fn test_students_without_university_form_one_group() {
        let students: Vec<Student> = serde_json::from_value(json!([
            {"student_id": 1, "university": "Gulu"},
            {"student_id": 2},
            {"student_id": 3, "university": "Gulu"},
            {"student_id": 4, "university": ""}
        ]))
        .unwrap();
        let data = DataContext::from_parts(students, vec![], vec![], vec![], vec![]);

        let rows = students_per_university(&data, &ReportFilters::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].university, None);
        assert_eq!(rows[1].count, 2);
    }

    #[test]
    fn test_student_detail() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        assert!(student_detail(&index, &ReportFilters::default()).is_none());

        let detail =
            student_detail(&index, &with_filters(|f| f.student_id = Some("1".to_string())))
                .unwrap();
        assert_eq!(
            detail.student.as_ref().and_then(|s| s.name.as_deref()),
            Some("Amina Nakato")
        );
        assert_eq!(detail.allocations.len(), 1);
        assert_eq!(detail.allocations[0].sponsor.as_deref(), Some("ABC Foundation"));
        assert_eq!(detail.payments.len(), 1);
        assert_eq!(detail.payments[0].amount, Some(100.0));
    }

    #[test]
    fn test_student_detail_without_allocations() {
        let mut data = scenario();
        data.allocations = crate::data::Collection::loaded(vec![]);
        let index = LookupIndex::build(&data);

        let detail =
            student_detail(&index, &with_filters(|f| f.student_id = Some("2".to_string())))
                .unwrap();

        assert!(detail.student.is_some());
        assert!(detail.allocations.is_empty());
        assert!(detail.payments.is_empty());
    }

    #[test]
    fn test_student_detail_unknown_student() {
        let data = scenario();
        let index = LookupIndex::build(&data);

        let detail =
            student_detail(&index, &with_filters(|f| f.student_id = Some("77".to_string())))
                .unwrap();
        assert!(detail.student.is_none());
        assert!(detail.allocations.is_empty());
    }

    #[test]
    fn test_unloaded_data_yields_empty_views() {
        let views = ReportSet::compute(&DataContext::default(), &ReportFilters::default());

        assert_eq!(views, ReportSet::default());
        for section in ReportSection::ALL {
            assert!(matches!(views.row_count(section), Some(0) | None));
        }
    }

    #[test]
    fn test_report_set_compute() {
        let data = scenario();
        let filters = with_filters(|f| f.student_id = Some("1".to_string()));

        let views = ReportSet::compute(&data, &filters);

        assert_eq!(views.row_count(ReportSection::StudentSponsorship), Some(2));
        assert_eq!(views.row_count(ReportSection::PaymentSummary), Some(1));
        assert_eq!(views.row_count(ReportSection::StudentDetail), Some(1));
        assert_eq!(views.row_count(ReportSection::Dashboard), None);
    }
}
