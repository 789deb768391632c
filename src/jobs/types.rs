use serde::{Deserialize, Serialize};

/// Organization that posted a listing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Company {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Location {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One job listing as returned by the search endpoint.
///
/// The upstream omits fields freely, so everything is optional.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct JobListing {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Body of a search response.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SearchResponse {
    pub results: Vec<JobListing>,
    /// Total matches upstream, which may exceed `results.len()`
    #[serde(default)]
    pub count: Option<u64>,
}

impl SearchResponse {
    pub fn total_matches(&self) -> u64 {
        self.count.unwrap_or(self.results.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_listing() {
        let json = r#"{
            "count": 120,
            "results": [{
                "title": "Senior Data Scientist",
                "company": {"display_name": "Tech Corp"},
                "location": {"display_name": "San Francisco, CA"},
                "description": "Great opportunity",
                "salary_min": 120000,
                "salary_max": 180000.5,
                "redirect_url": "https://example.com/job/123",
                "created": "2025-10-15T00:00:00Z",
                "__CLASS__": "Adzuna::API::Response::Job"
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_matches(), 120);
        let job = &response.results[0];
        assert_eq!(job.title.as_deref(), Some("Senior Data Scientist"));
        assert_eq!(job.company.display_name.as_deref(), Some("Tech Corp"));
        assert_eq!(job.salary_min, Some(120000.0));
    }

    #[test]
    fn test_deserialize_sparse_listing() {
        let json = r#"{"results": [{}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results[0], JobListing::default());
        assert_eq!(response.total_matches(), 1);
    }

    #[test]
    fn test_missing_results_is_an_error() {
        assert!(serde_json::from_str::<SearchResponse>(r#"{"count": 0}"#).is_err());
    }
}
