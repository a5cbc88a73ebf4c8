use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::backends::{JobSearch, SearchQuery};
use crate::error::AppError;
use crate::models::posting::ScrapedJob;

/// Client for a JobSpy-compatible search service.
pub struct JobSpyBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs: Vec<ScrapedJob>,
}

impl JobSpyBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("visajobs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JobSearch for JobSpyBackend {
    fn name(&self) -> &str {
        "jobspy"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ScrapedJob>, AppError> {
        let body = json!({
            "site_name": query.sites,
            "search_term": query.role,
            "location": query.country,
            "distance": query.params.distance,
            "is_remote": query.params.is_remote,
            "job_type": query.params.job_type,
            "results_wanted": query.params.results_per_site,
            "hours_old": query.params.hours_old,
            "country_indeed": query.country,
            // plain text is not supported by the service
            "description_format": "markdown",
        });

        let resp = self
            .client
            .post(format!("{}/api/v1/search_jobs", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AppError::Backend(format!(
                "search service returned {}",
                resp.status()
            )));
        }

        let data: SearchResponse = resp.json().await?;
        Ok(data.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_response_rows() {
        let raw = r#"{
            "count": 2,
            "jobs": [
                {
                    "site": "indeed",
                    "title": "DevOps Engineer",
                    "company": "Acme GmbH",
                    "location": "Berlin, Germany",
                    "description": "We offer visa sponsorship",
                    "job_url": "https://indeed.example/jobs/1",
                    "date_posted": "2025-08-01",
                    "job_type": "fulltime"
                },
                {
                    "site": "glassdoor",
                    "title": "SRE",
                    "job_url": "https://glassdoor.example/jobs/2",
                    "description": null
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.jobs.len(), 2);

        let first = &parsed.jobs[0];
        assert_eq!(first.site, "indeed");
        assert_eq!(first.company, "Acme GmbH");
        assert_eq!(first.date_posted.as_deref(), Some("2025-08-01"));

        // sparse rows still deserialize
        let second = &parsed.jobs[1];
        assert_eq!(second.company, "");
        assert!(second.description.is_none());
        assert!(second.job_type.is_none());
    }

    #[test]
    fn parses_empty_response() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"jobs": []}"#).unwrap();
        assert!(parsed.jobs.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = JobSpyBackend::new("http://localhost:8000/", 30).unwrap();
        assert_eq!(backend.base_url, "http://localhost:8000");
    }
}
