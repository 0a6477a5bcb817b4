//! Markdown and JSON report generation.
//!
//! This module renders a computed [`Report`] into a Markdown document with
//! one table per selected section, or into pretty-printed JSON.

use crate::analysis::dashboard::{CountBucket, DashboardSummary};
use crate::analysis::filters::{FilterChoice, FilterField, FilterOptions};
use crate::models::{Report, ReportMetadata, ReportSection, SourceStatus, StudentDetail};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Scholarship Sponsorship Report\n\n");

    output.push_str(&generate_metadata_section(
        &report.metadata,
        &report.filter_options,
    ));
    output.push_str(&generate_sources_section(&report.metadata.sources));
    output.push_str(&generate_table_of_contents(&report.sections));

    for section in &report.sections {
        output.push_str(&generate_section(report, *section));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, options: &FilterOptions) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **API:** {}\n", metadata.api_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if metadata.filters.is_empty() {
        section.push_str("- **Filters:** none\n");
    } else {
        section.push_str("- **Filters:**\n");
        for (field, value) in metadata.filters.active() {
            section.push_str(&format!(
                "  - {}: {}\n",
                field,
                describe_filter(field, value, options)
            ));
        }
    }
    section.push('\n');

    section
}

/// Filter value with the sponsor or student name attached when known.
fn describe_filter(field: FilterField, value: &str, options: &FilterOptions) -> String {
    let find = |choices: &[FilterChoice]| {
        choices
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.clone())
    };

    let described = match field {
        FilterField::SponsorId => {
            find(options.sponsors.as_slice()).map(|name| format!("{} (id {})", name, value))
        }
        FilterField::StudentId => find(options.students.as_slice()),
        _ => None,
    };
    described.unwrap_or_else(|| value.to_string())
}

/// Generate the data sources section.
fn generate_sources_section(sources: &[SourceStatus]) -> String {
    let mut section = String::new();

    section.push_str("## Data Sources\n\n");

    let rows = sources
        .iter()
        .map(|source| {
            let status = match (&source.error, source.loaded) {
                (_, true) => "✅ Loaded".to_string(),
                (Some(error), false) => format!("❌ Failed: {}", escape(error)),
                (None, false) => "⚠️ Not loaded".to_string(),
            };
            vec![
                source.collection.to_string(),
                status,
                source.records.to_string(),
            ]
        })
        .collect();
    section.push_str(&table(&["Collection", "Status", "Records"], rows));

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(sections: &[ReportSection]) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Data Sources](#data-sources)\n");

    for section in sections {
        toc.push_str(&format!("- [{}](#{})\n", section.title(), section.anchor()));
    }

    toc.push('\n');

    toc
}

fn generate_section(report: &Report, section: ReportSection) -> String {
    let views = &report.views;
    let mut output = format!("## {}\n\n", section.title());

    let body = match section {
        ReportSection::StudentSponsorship => table(
            &["Student", "University", "Program", "Sponsor", "Status"],
            views
                .student_sponsorship
                .iter()
                .map(|r| {
                    vec![
                        cell(&r.student_name),
                        cell(&r.university),
                        cell(&r.program),
                        cell(&r.sponsor),
                        cell(&r.status),
                    ]
                })
                .collect(),
        ),
        ReportSection::PaymentSummary => table(
            &["Payment", "Student", "Amount", "Date", "Semester"],
            views
                .payment_summary
                .iter()
                .map(|r| {
                    vec![
                        cell(&r.payment_id),
                        cell(&r.student),
                        amount(r.amount),
                        cell(&r.date),
                        cell(&r.semester),
                    ]
                })
                .collect(),
        ),
        ReportSection::SponsorContribution => table(
            &["Sponsor", "Total Amount", "Students"],
            views
                .sponsor_contribution
                .iter()
                .map(|r| {
                    vec![
                        cell(&r.sponsor),
                        format!("{:.2}", r.total_amount),
                        r.num_students.to_string(),
                    ]
                })
                .collect(),
        ),
        ReportSection::ProgramSummary => table(
            &["Program", "Sponsor", "Amount per Student", "Duration"],
            views
                .program_summary
                .iter()
                .map(|r| {
                    vec![
                        cell(&r.program_name),
                        cell(&r.sponsor),
                        amount(r.amount_per_student),
                        cell(&r.duration),
                    ]
                })
                .collect(),
        ),
        ReportSection::SponsorshipStatus => table(
            &["Student", "Program", "Start Date", "End Date", "Status"],
            views
                .sponsorship_status
                .iter()
                .map(|r| {
                    vec![
                        cell(&r.student),
                        cell(&r.program),
                        cell(&r.start_date),
                        cell(&r.end_date),
                        cell(&r.status),
                    ]
                })
                .collect(),
        ),
        ReportSection::StudentsPerUniversity => table(
            &["University", "Students"],
            views
                .students_per_university
                .iter()
                .map(|r| vec![cell(&r.university), r.count.to_string()])
                .collect(),
        ),
        ReportSection::StudentDetail => match &views.student_detail {
            Some(detail) => generate_student_detail(detail),
            None => "_No student selected. Use `--student-id` to show one student's \
                     allocations and payments._\n\n"
                .to_string(),
        },
        ReportSection::Dashboard => match &report.dashboard {
            Some(dashboard) => generate_dashboard(dashboard),
            None => "_Dashboard not computed._\n\n".to_string(),
        },
    };

    output.push_str(&body);
    output
}

fn generate_student_detail(detail: &StudentDetail) -> String {
    let mut section = String::new();

    match &detail.student {
        Some(student) => {
            let fields = [
                ("Student ID", &student.student_id),
                ("Name", &student.name),
                ("Gender", &student.gender),
                ("Date of Birth", &student.date_of_birth),
                ("Contact", &student.contact),
                ("Email", &student.email),
                ("University", &student.university),
                ("Course", &student.course),
                ("Year of Study", &student.year_of_study),
            ];
            section.push_str(&table(
                &["Field", "Value"],
                fields
                    .iter()
                    .map(|(label, value)| vec![label.to_string(), cell(value)])
                    .collect(),
            ));
        }
        None => section.push_str(&format!(
            "_No student found with id `{}`._\n\n",
            escape(&detail.student_id)
        )),
    }

    section.push_str("### Allocations\n\n");
    section.push_str(&table(
        &["Program", "Sponsor", "Start Date", "End Date", "Status"],
        detail
            .allocations
            .iter()
            .map(|a| {
                vec![
                    cell(&a.program),
                    cell(&a.sponsor),
                    cell(&a.start_date),
                    cell(&a.end_date),
                    cell(&a.status),
                ]
            })
            .collect(),
    ));

    section.push_str("### Payments\n\n");
    section.push_str(&table(
        &["Payment", "Amount", "Date", "Semester"],
        detail
            .payments
            .iter()
            .map(|p| {
                vec![
                    cell(&p.payment_id),
                    amount(p.amount),
                    cell(&p.payment_date),
                    cell(&p.semester),
                ]
            })
            .collect(),
    ));

    section
}

fn generate_dashboard(dashboard: &DashboardSummary) -> String {
    let mut section = String::new();
    let totals = &dashboard.totals;

    section.push_str("### Totals\n\n");
    section.push_str("| 🎓 Students | 🏢 Sponsors | 📚 Programs | ✅ Active Allocations | 💰 Total Payments |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {:.2} |\n\n",
        totals.students,
        totals.sponsors,
        totals.programs,
        totals.active_allocations,
        totals.total_payments
    ));

    section.push_str("### Students by University\n\n");
    section.push_str(&table(
        &["University", "Students"],
        dashboard
            .students_by_university
            .iter()
            .map(|r| vec![cell(&r.university), r.count.to_string()])
            .collect(),
    ));

    section.push_str("### Sponsorship Status\n\n");
    section.push_str(&count_table("Status", &dashboard.status_distribution));

    section.push_str("### Payments per Semester\n\n");
    section.push_str(&table(
        &["Semester", "Amount"],
        dashboard
            .payments_per_semester
            .iter()
            .map(|b| vec![cell(&b.label), format!("{:.2}", b.amount)])
            .collect(),
    ));

    section.push_str("### Top Sponsor Contributions\n\n");
    section.push_str(&table(
        &["Sponsor", "Total Amount", "Students"],
        dashboard
            .top_sponsors
            .iter()
            .map(|r| {
                vec![
                    cell(&r.sponsor),
                    format!("{:.2}", r.total_amount),
                    r.num_students.to_string(),
                ]
            })
            .collect(),
    ));

    section.push_str("### Students by Year of Study\n\n");
    section.push_str(&count_table("Year", &dashboard.students_by_year));

    section.push_str("### Gender Distribution\n\n");
    section.push_str(&count_table("Gender", &dashboard.gender_distribution));

    section.push_str("### Upcoming End Dates\n\n");
    section.push_str(&table(
        &["Student", "Program", "End Date"],
        dashboard
            .upcoming_end_dates
            .iter()
            .map(|u| vec![cell(&u.student), cell(&u.program), u.end_date.to_string()])
            .collect(),
    ));

    section.push_str("### Average Scholarship per Sponsor\n\n");
    section.push_str(&table(
        &["Sponsor", "Average Amount", "Programs"],
        dashboard
            .average_per_sponsor
            .iter()
            .map(|a| {
                vec![
                    cell(&a.sponsor),
                    format!("{:.2}", a.average_amount),
                    a.programs.to_string(),
                ]
            })
            .collect(),
    ));

    section.push_str("### Top Programs by Funding\n\n");
    section.push_str(&table(
        &["Program", "Sponsor", "Amount per Student"],
        dashboard
            .top_programs
            .iter()
            .map(|p| {
                vec![
                    cell(&p.program_name),
                    cell(&p.sponsor),
                    format!("{:.2}", p.amount_per_student),
                ]
            })
            .collect(),
    ));

    section.push_str("### Recent Allocations\n\n");
    section.push_str(&table(
        &["Student", "Program", "Start Date"],
        dashboard
            .recent_allocations
            .iter()
            .map(|r| vec![cell(&r.student), cell(&r.program), cell(&r.start_date)])
            .collect(),
    ));

    section.push_str("### Sponsorship Trends\n\n");
    section.push_str(&table(
        &["Month", "Allocations"],
        dashboard
            .trends
            .iter()
            .map(|t| vec![t.month.clone(), t.allocations.to_string()])
            .collect(),
    ));

    section
}

fn count_table(label: &str, buckets: &[CountBucket]) -> String {
    table(
        &[label, "Count"],
        buckets
            .iter()
            .map(|b| vec![cell(&b.label), b.count.to_string()])
            .collect(),
    )
}

/// Render a Markdown table; an empty table gets a single "No data" row.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut output = String::new();

    output.push_str(&format!("| {} |\n", headers.join(" | ")));
    output.push_str(&format!("|{}\n", ":---|".repeat(headers.len())));

    if rows.is_empty() {
        let mut empty = vec![String::new(); headers.len()];
        empty[0] = "_No data_".to_string();
        output.push_str(&format!("| {} |\n", empty.join(" | ")));
    }

    for row in rows {
        output.push_str(&format!("| {} |\n", row.join(" | ")));
    }

    output.push('\n');
    output
}

/// Table cell for an optional value; blank when absent.
fn cell(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

fn amount(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn escape(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Generated by ssms-reports v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
