//! Markdown report renderer
//!
//! Renders the snapshot as Markdown tables that display well in GitHub,
//! GitLab, and VS Code. The `detailed` layout carries per-sex breakdowns and
//! percentages; the `simple` layout collapses to totals.

use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::core::aggregate::{CohortBucket, RateMetric, SexCount};
use crate::core::report::{ReportFormat, ReportGenerator, ReportSnapshot};

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render_header(snapshot: &ReportSnapshot, out: &mut String) {
        let _ = writeln!(out, "# Nutritional Status Report\n");
        let _ = writeln!(out, "- **School:** {}", snapshot.school_name);
        let _ = writeln!(out, "- **School Year:** {}", snapshot.school_year);
        let _ = writeln!(
            out,
            "- **Generated:** {}",
            snapshot.generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(out, "- **Format:** {}\n", snapshot.format);
    }

    fn sex_cell(count: SexCount) -> String {
        format!("{} / {} / {}", count.m, count.f, count.total)
    }

    fn rate_cell(metric: &RateMetric) -> String {
        format!(
            "{} / {} / {} ({:.1}%)",
            metric.count.m, metric.count.f, metric.count.total, metric.percent
        )
    }

    fn render_bmi_table(cohorts: &[CohortBucket], out: &mut String) {
        let _ = writeln!(out, "## Body Mass Index\n");
        let _ = writeln!(
            out,
            "| Cohort | Enrollment | Weighed | Severely Wasted | Wasted | Underweight | Normal | Overweight | Obese |"
        );
        let _ = writeln!(out, "|---|---|---|---|---|---|---|---|---|");
        for bucket in cohorts {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                bucket.label,
                Self::sex_cell(bucket.enrollment),
                Self::sex_cell(bucket.bmi.pupils_weighed),
                Self::rate_cell(&bucket.bmi.severely_wasted),
                Self::rate_cell(&bucket.bmi.wasted),
                Self::rate_cell(&bucket.bmi.underweight),
                Self::rate_cell(&bucket.bmi.normal),
                Self::rate_cell(&bucket.bmi.overweight),
                Self::rate_cell(&bucket.bmi.obese),
            );
        }
        let _ = writeln!(out);
    }

    fn render_hfa_table(cohorts: &[CohortBucket], out: &mut String) {
        let _ = writeln!(out, "## Height for Age\n");
        let _ = writeln!(
            out,
            "| Cohort | Measured | Severely Stunted | Stunted | Sev. Stunted excl. Wasted | Stunted excl. Wasted | Normal | Tall |"
        );
        let _ = writeln!(out, "|---|---|---|---|---|---|---|---|");
        for bucket in cohorts {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                bucket.label,
                Self::sex_cell(bucket.hfa.pupils_taken_height),
                Self::rate_cell(&bucket.hfa.severely_stunted),
                Self::rate_cell(&bucket.hfa.stunted),
                Self::rate_cell(&bucket.hfa.severely_stunted_excluding_wasted),
                Self::rate_cell(&bucket.hfa.stunted_excluding_wasted),
                Self::rate_cell(&bucket.hfa.normal),
                Self::rate_cell(&bucket.hfa.tall),
            );
        }
        let _ = writeln!(out);
    }

    fn render_beneficiary_table(cohorts: &[CohortBucket], out: &mut String) {
        let _ = writeln!(out, "## Feeding Program Beneficiaries\n");
        let _ = writeln!(out, "| Cohort | Primary | Secondary | Total |");
        let _ = writeln!(out, "|---|---|---|---|");
        for bucket in cohorts {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                bucket.label,
                Self::sex_cell(bucket.primary_beneficiaries),
                Self::sex_cell(bucket.secondary_beneficiaries),
                Self::sex_cell(bucket.total_beneficiaries),
            );
        }
        let _ = writeln!(out);
    }

    /// Condensed totals-only tables for the `simple` layout
    fn render_simple(snapshot: &ReportSnapshot, out: &mut String) {
        let _ = writeln!(
            out,
            "| Cohort | Enrolled | Weighed | Wasted* | Normal | Overweight* | Stunted* | Beneficiaries |"
        );
        let _ = writeln!(out, "|---|---|---|---|---|---|---|---|");
        for bucket in &snapshot.cohorts {
            let wasted = bucket.bmi.severely_wasted.count.total + bucket.bmi.wasted.count.total;
            let overweight = bucket.bmi.overweight.count.total + bucket.bmi.obese.count.total;
            let stunted = bucket.hfa.severely_stunted.count.total + bucket.hfa.stunted.count.total;
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                bucket.label,
                bucket.enrollment.total,
                bucket.bmi.pupils_weighed.total,
                wasted,
                bucket.bmi.normal.count.total,
                overweight,
                stunted,
                bucket.total_beneficiaries.total,
            );
        }
        let _ = writeln!(
            out,
            "\n\\* Wasted includes Severely Wasted; Overweight includes Obese; Stunted includes Severely Stunted.\n"
        );
    }

    fn render_unrecognized_sex_note(cohorts: &[CohortBucket], out: &mut String) {
        let flagged: u32 = cohorts
            .last()
            .map_or(0, |grand_total| grand_total.unrecognized_sex);
        if flagged > 0 {
            let _ = writeln!(
                out,
                "> **Note:** {flagged} record(s) had an unrecognized sex value and were counted as F.\n"
            );
        }
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(
        &self,
        snapshot: &ReportSnapshot,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let content = self.render(snapshot)?;
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render(&self, snapshot: &ReportSnapshot) -> Result<String, Box<dyn Error>> {
        let mut out = String::new();
        Self::render_header(snapshot, &mut out);

        match snapshot.format {
            ReportFormat::Detailed => {
                Self::render_bmi_table(&snapshot.cohorts, &mut out);
                Self::render_hfa_table(&snapshot.cohorts, &mut out);
                Self::render_beneficiary_table(&snapshot.cohorts, &mut out);
            }
            ReportFormat::Simple => Self::render_simple(snapshot, &mut out),
        }

        Self::render_unrecognized_sex_note(&snapshot.cohorts, &mut out);
        Ok(out)
    }
}
