use anyhow::{Result, bail};

/// Largest page size the search endpoint accepts.
pub const MAX_RESULTS: u32 = 50;

pub const DEFAULT_NUM_RESULTS: u32 = 5;

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub role: String,
    pub location: String,
    pub num_results: u32,
}

impl SearchQuery {
    pub fn new(role: impl Into<String>, location: impl Into<String>, num_results: u32) -> Self {
        Self {
            role: role.into(),
            location: location.into(),
            num_results,
        }
    }

    /// Rejects blank role or location and out-of-range result counts.
    pub fn validate(&self) -> Result<()> {
        if self.role.trim().is_empty() {
            bail!("role must be a non-empty string");
        }
        if self.location.trim().is_empty() {
            bail!("location must be a non-empty string");
        }
        if self.num_results < 1 || self.num_results > MAX_RESULTS {
            bail!("num_results must be between 1 and {}", MAX_RESULTS);
        }
        Ok(())
    }
}
