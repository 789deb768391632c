//! Plain-text rendering of search results.

use anyhow::Result;
use log::debug;

use super::board::SearchJobs;
use super::query::SearchQuery;
use super::types::{JobListing, SearchResponse};

/// Descriptions longer than this many characters are cut and marked "...".
pub const MAX_DESCRIPTION_CHARS: usize = 500;

const NOT_AVAILABLE: &str = "N/A";
const RULE_WIDTH: usize = 80;

/// Renders a salary range in whole dollars.
pub fn format_salary(min: Option<f64>, max: Option<f64>) -> String {
    // Zero is how the upstream says "unknown"
    let min = min.filter(|v| *v > 0.0);
    let max = max.filter(|v| *v > 0.0);

    match (min, max) {
        (Some(lo), Some(hi)) => format!("${} - ${}", group_thousands(lo), group_thousands(hi)),
        (Some(lo), None) => format!("From ${}", group_thousands(lo)),
        (None, Some(hi)) => format!("Up to ${}", group_thousands(hi)),
        (None, None) => "Not specified".to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let digits = (value.round() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_string();
    }
    let cut: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    format!("{}...", cut)
}

/// Renders one listing as a tagged block.
pub fn format_listing(job: &JobListing) -> String {
    let description = job
        .description
        .as_deref()
        .unwrap_or("No description available");

    format!(
        "<job>\n    <title>{}</title>\n    <company>{}</company>\n    <location>{}</location>\n    <salary>{}</salary>\n    <posted_date>{}</posted_date>\n    <description>\n        {}\n    </description>\n    <apply_url>{}</apply_url>\n</job>",
        job.title.as_deref().unwrap_or(NOT_AVAILABLE),
        job.company.display_name.as_deref().unwrap_or(NOT_AVAILABLE),
        job.location.display_name.as_deref().unwrap_or(NOT_AVAILABLE),
        format_salary(job.salary_min, job.salary_max),
        job.created.as_deref().unwrap_or(NOT_AVAILABLE),
        truncate_description(description),
        job.redirect_url.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

/// Renders a full report, or suggestions when nothing matched.
pub fn render_report(query: &SearchQuery, response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return format!(
            "No job listings found for '{}' in {}.\n\nSuggestions:\n- Try a broader search term\n- Try a different location\n- Try searching for related roles\n",
            query.role, query.location
        );
    }

    let total = response.results.len();
    let rule = "=".repeat(RULE_WIDTH);
    let listings: Vec<String> = response
        .results
        .iter()
        .enumerate()
        .map(|(i, job)| format!("[Job {}/{}]\n{}", i + 1, total, format_listing(job)))
        .collect();

    format!(
        "Found {} job listings (out of {} total matches)\n\nSearch Parameters:\n- Role: {}\n- Location: {}\n\nJob Listings:\n{}\n\n{}\n",
        total,
        response.total_matches(),
        query.role,
        query.location,
        rule,
        listings.join(&format!("\n\n{}\n\n", rule)),
    )
}

/// Runs `query` against `jobs` and renders the report.
#[tracing::instrument(skip(jobs))]
pub async fn generate_report<J: SearchJobs + ?Sized>(
    jobs: &J,
    query: &SearchQuery,
) -> Result<String> {
    let response = jobs.search(query).await?;
    debug!("Rendering report for {} listings", response.results.len());
    Ok(render_report(query, &response))
}
