//! Dashboard summary computed from the loaded collections.
//!
//! The dashboard ignores report filters: every figure covers the complete
//! data set.

use crate::analysis::filters::ReportFilters;
use crate::analysis::index::LookupIndex;
use crate::analysis::reports::{sponsor_contribution, students_per_university};
use crate::config::ReportConfig;
use crate::models::{amount_or_zero, SponsorContributionRow, UniversityCountRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Limits and the reference date used by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub upcoming_limit: usize,
    pub top_programs_limit: usize,
    pub recent_allocations_limit: usize,
    /// End dates on or after this day count as upcoming.
    pub reference_date: NaiveDate,
}

impl DashboardSettings {
    pub fn new(config: &ReportConfig, reference_date: NaiveDate) -> Self {
        Self {
            upcoming_limit: config.upcoming_limit,
            top_programs_limit: config.top_programs_limit,
            recent_allocations_limit: config.recent_allocations_limit,
            reference_date,
        }
    }
}

/// Headline counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub students: usize,
    pub sponsors: usize,
    pub programs: usize,
    /// Allocations whose status is exactly `Active`.
    pub active_allocations: usize,
    pub total_payments: f64,
}

/// Number of records sharing one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: Option<String>,
    pub count: usize,
}

/// Summed amount for one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountBucket {
    pub label: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingEndDate {
    pub allocation_id: Option<String>,
    pub student: Option<String>,
    pub program: Option<String>,
    pub end_date: NaiveDate,
}

/// Mean `amount_per_student` over one sponsor's programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorAverage {
    pub sponsor_id: Option<String>,
    pub sponsor: Option<String>,
    pub average_amount: f64,
    /// Programs that contributed to the mean.
    pub programs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramFunding {
    pub program_id: Option<String>,
    pub program_name: Option<String>,
    pub sponsor: Option<String>,
    pub amount_per_student: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentAllocation {
    pub allocation_id: Option<String>,
    pub student: Option<String>,
    pub program: Option<String>,
    pub start_date: Option<String>,
}

/// Allocations started in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM`.
    pub month: String,
    pub allocations: usize,
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub totals: DashboardTotals,
    pub students_by_university: Vec<UniversityCountRow>,
    pub status_distribution: Vec<CountBucket>,
    pub payments_per_semester: Vec<AmountBucket>,
    pub top_sponsors: Vec<SponsorContributionRow>,
    pub students_by_year: Vec<CountBucket>,
    pub gender_distribution: Vec<CountBucket>,
    pub upcoming_end_dates: Vec<UpcomingEndDate>,
    pub average_per_sponsor: Vec<SponsorAverage>,
    pub top_programs: Vec<ProgramFunding>,
    pub recent_allocations: Vec<RecentAllocation>,
    pub trends: Vec<TrendPoint>,
}

impl DashboardSummary {
    pub fn compute(index: &LookupIndex<'_>, settings: &DashboardSettings) -> Self {
        let data = index.data();
        let unfiltered = ReportFilters::default();

        let totals = DashboardTotals {
            students: data.students().len(),
            sponsors: data.sponsors().len(),
            programs: data.programs().len(),
            active_allocations: data
                .allocations()
                .iter()
                .filter(|a| a.status.as_deref() == Some("Active"))
                .count(),
            total_payments: data
                .payments()
                .iter()
                .map(|p| amount_or_zero(p.amount))
                .sum(),
        };

        let mut top_sponsors = sponsor_contribution(index, &unfiltered);
        top_sponsors.sort_by(|a, b| descending(a.total_amount, b.total_amount));

        let mut per_semester: BTreeMap<Option<&str>, f64> = BTreeMap::new();
        for payment in data.payments() {
            *per_semester.entry(payment.semester.as_deref()).or_default() +=
                amount_or_zero(payment.amount);
        }

        let mut students_by_year =
            count_first_seen(data.students().iter().map(|s| s.year_of_study.as_deref()));
        students_by_year.sort_by(|a, b| compare_years(a.label.as_deref(), b.label.as_deref()));

        Self {
            totals,
            students_by_university: students_per_university(data, &unfiltered),
            status_distribution: count_first_seen(
                data.allocations().iter().map(|a| a.status.as_deref()),
            ),
            payments_per_semester: per_semester
                .into_iter()
                .map(|(label, amount)| AmountBucket {
                    label: label.map(String::from),
                    amount,
                })
                .collect(),
            top_sponsors,
            students_by_year,
            gender_distribution: count_first_seen(
                data.students().iter().map(|s| s.gender.as_deref()),
            ),
            upcoming_end_dates: upcoming_end_dates(index, settings),
            average_per_sponsor: average_per_sponsor(index),
            top_programs: top_programs(index, settings.top_programs_limit),
            recent_allocations: recent_allocations(index, settings.recent_allocations_limit),
            trends: trends(index),
        }
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Order year labels: absent first, then numeric years by value, then the
/// remaining labels as strings.
fn compare_years(a: Option<&str>, b: Option<&str>) -> Ordering {
    let key = |label: Option<&str>| match label {
        None => (0, 0),
        Some(l) => l.parse::<u64>().map_or((2, 0), |year| (1, year)),
    };
    key(a).cmp(&key(b)).then_with(|| a.cmp(&b))
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
}

/// Count values in first-seen order; absent values form one bucket.
fn count_first_seen<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<CountBucket> {
    let mut buckets: Vec<CountBucket> = Vec::new();
    let mut positions: HashMap<Option<&str>, usize> = HashMap::new();

    for value in values {
        let position = *positions.entry(value).or_insert_with(|| {
            buckets.push(CountBucket {
                label: value.map(String::from),
                count: 0,
            });
            buckets.len() - 1
        });
        buckets[position].count += 1;
    }

    buckets
}

fn upcoming_end_dates(index: &LookupIndex<'_>, settings: &DashboardSettings) -> Vec<UpcomingEndDate> {
    let mut upcoming: Vec<UpcomingEndDate> = index
        .data()
        .allocations()
        .iter()
        .filter_map(|a| {
            let end_date = parse_date(a.end_date.as_deref())?;
            (end_date >= settings.reference_date).then(|| UpcomingEndDate {
                allocation_id: a.allocation_id.clone(),
                student: index.student(a.student_id.as_deref()).name.clone(),
                program: index.program(a.program_id.as_deref()).program_name.clone(),
                end_date,
            })
        })
        .collect();

    upcoming.sort_by_key(|u| u.end_date);
    upcoming.truncate(settings.upcoming_limit);
    upcoming
}

fn average_per_sponsor(index: &LookupIndex<'_>) -> Vec<SponsorAverage> {
    let mut groups: Vec<(Option<&str>, f64, usize)> = Vec::new();
    let mut positions: HashMap<Option<&str>, usize> = HashMap::new();

    for program in index.data().programs() {
        let Some(amount) = program.amount_per_student else {
            continue;
        };
        let sponsor_id = program.sponsor_id.as_deref();
        let position = *positions.entry(sponsor_id).or_insert_with(|| {
            groups.push((sponsor_id, 0.0, 0));
            groups.len() - 1
        });
        groups[position].1 += amount;
        groups[position].2 += 1;
    }

    groups
        .into_iter()
        .map(|(sponsor_id, sum, programs)| SponsorAverage {
            sponsor_id: sponsor_id.map(String::from),
            sponsor: index
                .find_sponsor(sponsor_id)
                .and_then(|s| s.organization_name.clone())
                .or_else(|| sponsor_id.map(String::from)),
            average_amount: sum / programs as f64,
            programs,
        })
        .collect()
}

fn top_programs(index: &LookupIndex<'_>, limit: usize) -> Vec<ProgramFunding> {
    let mut funded: Vec<ProgramFunding> = index
        .data()
        .programs()
        .iter()
        .filter_map(|p| {
            Some(ProgramFunding {
                program_id: p.program_id.clone(),
                program_name: p.program_name.clone(),
                sponsor: index
                    .sponsor(p.sponsor_id.as_deref())
                    .organization_name
                    .clone(),
                amount_per_student: p.amount_per_student?,
            })
        })
        .collect();

    funded.sort_by(|a, b| descending(a.amount_per_student, b.amount_per_student));
    funded.truncate(limit);
    funded
}

/// Latest allocations by start date; both the student and the program must resolve.
fn recent_allocations(index: &LookupIndex<'_>, limit: usize) -> Vec<RecentAllocation> {
    let mut recent: Vec<RecentAllocation> = index
        .data()
        .allocations()
        .iter()
        .filter_map(|a| {
            let student = index.find_student(a.student_id.as_deref())?;
            let program = index.find_program(a.program_id.as_deref())?;
            Some(RecentAllocation {
                allocation_id: a.allocation_id.clone(),
                student: student.name.clone(),
                program: program.program_name.clone(),
                start_date: a.start_date.clone(),
            })
        })
        .collect();

    recent.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    recent.truncate(limit);
    recent
}

fn trends(index: &LookupIndex<'_>) -> Vec<TrendPoint> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for allocation in index.data().allocations() {
        if let Some(start) = parse_date(allocation.start_date.as_deref()) {
            *months.entry(start.format("%Y-%m").to_string()).or_default() += 1;
        }
    }

    months
        .into_iter()
        .map(|(month, allocations)| TrendPoint { month, allocations })
        .collect()
}
