//! Statistics and recommendations for a finished scrape
//!
//! The report is built from the in-memory results and errors, then printed
//! to stdout.

use crate::record::{CompanyRecord, ErrorEntry, ErrorKind, RECORD_FIELDS};

/// Blocked-request count above which rotating proxies are recommended
pub const MANY_BLOCKED_THRESHOLD: usize = 50;

/// Fill count of one record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFill {
    pub field: &'static str,
    pub filled: usize,
}

/// Qualitative advice printed at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    ManyBlocked,
    ExcellentSuccess,
    GoodSuccess,
    LowSuccess,
    NoResults,
}

impl Recommendation {
    pub fn lines(&self) -> &'static [&'static str] {
        match self {
            Recommendation::ManyBlocked => &[
                "Many blocked (403) requests detected",
                "  - Consider a rotating proxy",
                "  - Increase the delays between requests",
                "  - Run the scrape at different times of day",
            ],
            Recommendation::ExcellentSuccess => &["Excellent success rate"],
            Recommendation::GoodSuccess => &["Good success rate"],
            Recommendation::LowSuccess => &["Low success rate - extraction needs tuning"],
            Recommendation::NoResults => &["No results obtained - the scraper needs debugging"],
        }
    }
}

/// Aggregate figures for one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Unique detail links processed
    pub links: usize,

    /// Records produced, one per link
    pub records: usize,

    pub total_errors: usize,
    pub blocked: usize,
    pub network: usize,
    pub no_data: usize,

    /// Fill counts for every field except the source link
    pub field_fill: Vec<FieldFill>,

    /// Records with at least one extracted field
    pub with_data: usize,
}

impl ScrapeReport {
    pub fn build(links: usize, records: &[CompanyRecord], errors: &[ErrorEntry]) -> Self {
        let count_kind = |kind: ErrorKind| errors.iter().filter(|e| e.kind == kind).count();

        let field_fill = RECORD_FIELDS
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .map(|(i, field)| FieldFill {
                field: *field,
                filled: records.iter().filter(|r| !r.fields()[i].is_empty()).count(),
            })
            .collect();

        Self {
            links,
            records: records.len(),
            total_errors: errors.len(),
            blocked: count_kind(ErrorKind::Blocked),
            network: count_kind(ErrorKind::Network),
            no_data: count_kind(ErrorKind::NoData),
            field_fill,
            with_data: records.iter().filter(|r| !r.has_no_data()).count(),
        }
    }

    /// Share of records with extracted data, in percent
    pub fn success_rate(&self) -> Option<f64> {
        if self.records == 0 {
            return None;
        }
        Some(self.with_data as f64 / self.records as f64 * 100.0)
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if self.blocked > MANY_BLOCKED_THRESHOLD {
            recommendations.push(Recommendation::ManyBlocked);
        }

        recommendations.push(match self.success_rate() {
            None => Recommendation::NoResults,
            Some(rate) if rate > 80.0 => Recommendation::ExcellentSuccess,
            Some(rate) if rate > 60.0 => Recommendation::GoodSuccess,
            Some(_) => Recommendation::LowSuccess,
        });

        recommendations
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Prints the report to stdout
pub fn print_report(report: &ScrapeReport) {
    let rule = "=".repeat(50);

    println!("\n{}", rule);
    println!("SCRAPE SUMMARY");
    println!("{}", rule);
    println!("Links processed: {}", report.links);
    println!("Records: {}", report.records);
    println!("Errors: {}", report.total_errors);
    println!("  - Blocked (403): {}", report.blocked);
    println!("  - Network: {}", report.network);
    println!("  - No data extracted: {}", report.no_data);
    println!();

    println!("Field fill rate:");
    for fill in &report.field_fill {
        println!(
            "  {}: {}/{} ({:.1}%)",
            fill.field,
            fill.filled,
            report.records,
            percentage(fill.filled, report.records)
        );
    }

    if let Some(rate) = report.success_rate() {
        println!("\nOverall success rate: {:.1}%", rate);
    }

    println!("\n{}", rule);
    println!("RECOMMENDATIONS");
    println!("{}", rule);
    for recommendation in report.recommendations() {
        for line in recommendation.lines() {
            println!("{}", line);
        }
    }
}
