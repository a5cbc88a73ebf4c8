use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One posting as returned by the search backend.
/// Extra response fields are ignored; absent optional columns deserialize
/// to None so a sparse backend row never fails the whole call.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedJob {
    pub site: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub job_url: String,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
}

/// A posting annotated with the search that produced it.
/// `visa_sponsorship_mentioned` is only ever set by the inclusion filter;
/// `note` is only ever set on fallback/secondary artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub site: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_url: String,
    pub date_posted: Option<String>,
    pub job_type: Option<String>,
    pub search_country: String,
    pub search_role: String,
    pub scraped_at: DateTime<Utc>,
    pub visa_sponsorship_mentioned: Option<bool>,
    pub note: Option<String>,
}

impl JobPosting {
    pub fn from_scraped(
        job: ScrapedJob,
        country: &str,
        role: &str,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        Self {
            site: job.site,
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            job_url: job.job_url,
            date_posted: job.date_posted,
            job_type: job.job_type,
            search_country: country.to_string(),
            search_role: role.to_string(),
            scraped_at,
            visa_sponsorship_mentioned: None,
            note: None,
        }
    }
}
