//! Job search on top of the resilient fetcher.

mod board;
mod format;
mod query;
mod types;

#[cfg(test)]
pub use board::MockSearchJobs;
pub use board::{JobBoard, SearchJobs};
pub use format::{
    MAX_DESCRIPTION_CHARS, format_listing, format_salary, generate_report, render_report,
};
pub use query::{DEFAULT_NUM_RESULTS, MAX_RESULTS, SearchQuery};
pub use types::{Company, JobListing, Location, SearchResponse};
