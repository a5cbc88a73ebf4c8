use std::collections::HashSet;

use chrono::Utc;

use crate::backends::{JobSearch, SearchQuery};
use crate::models::posting::JobPosting;
use crate::models::stats::RunStats;
use crate::settings::Settings;

/// What a scrape run produces: the deduplicated postings plus the counters
/// accumulated while scraping.
pub struct ScrapeOutcome {
    pub postings: Vec<JobPosting>,
    pub stats: RunStats,
}

/// Runs one search per (country, role) pair, strictly in series, and folds
/// the results into a single deduplicated collection. A failed pair is logged
/// and contributes zero rows; the run continues.
pub struct Aggregator<'a> {
    settings: &'a Settings,
    backend: &'a dyn JobSearch,
}

impl<'a> Aggregator<'a> {
    pub fn new(settings: &'a Settings, backend: &'a dyn JobSearch) -> Self {
        Self { settings, backend }
    }

    pub async fn run(&self) -> ScrapeOutcome {
        let mut stats = RunStats::default();
        let mut postings: Vec<JobPosting> = Vec::new();

        let sites = self.settings.enabled_sites();
        if sites.is_empty() {
            tracing::warn!("No job sites enabled");
            return ScrapeOutcome { postings, stats };
        }

        let total = self.settings.countries.len() * self.settings.job_roles.len();
        tracing::info!(
            "Starting job search via '{}': {} roles x {} countries = {total} searches",
            self.backend.name(),
            self.settings.job_roles.len(),
            self.settings.countries.len(),
        );

        let mut current = 0;
        for country in &self.settings.countries {
            for role in &self.settings.job_roles {
                current += 1;
                tracing::info!(
                    "[{current}/{total}] Searching {country} for '{role}' on {}",
                    sites.join(", ")
                );

                let query = SearchQuery {
                    sites: sites.clone(),
                    role: role.clone(),
                    country: country.clone(),
                    params: self.settings.search_params.clone(),
                };

                match self.backend.search(&query).await {
                    Ok(jobs) => {
                        tracing::info!("Scraped {} jobs for {country}/'{role}'", jobs.len());
                        stats.record_batch(country, &jobs);
                        let scraped_at = Utc::now();
                        postings.extend(jobs.into_iter().map(|job| {
                            JobPosting::from_scraped(job, country, role, scraped_at)
                        }));
                    }
                    Err(e) => {
                        tracing::warn!("Search failed for {country}/'{role}': {e}");
                    }
                }
            }
        }

        let before = postings.len();
        dedup_by_url(&mut postings);
        let removed = before - postings.len();
        if removed > 0 {
            tracing::info!("Removed {removed} duplicate job listings");
        }
        tracing::info!("Total unique jobs scraped: {}", postings.len());

        ScrapeOutcome { postings, stats }
    }
}

/// Keep the first posting seen for each job_url, preserving insertion order.
fn dedup_by_url(postings: &mut Vec<JobPosting>) {
    let mut seen = HashSet::new();
    postings.retain(|posting| seen.insert(posting.job_url.clone()));
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::models::posting::ScrapedJob;

    /// Returns one canned response per call, in order.
    struct ScriptedSearch {
        responses: Mutex<VecDeque<Result<Vec<ScrapedJob>, AppError>>>,
    }

    impl ScriptedSearch {
        fn new(responses: Vec<Result<Vec<ScrapedJob>, AppError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl JobSearch for ScriptedSearch {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<ScrapedJob>, AppError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn job(site: &str, url: &str) -> ScrapedJob {
        ScrapedJob {
            site: site.to_string(),
            title: "DevOps Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            description: Some("visa sponsorship".to_string()),
            job_url: url.to_string(),
            date_posted: None,
            job_type: None,
        }
    }

    fn two_country_settings() -> Settings {
        let mut settings = Settings::default();
        settings.countries = vec!["germany".to_string(), "sweden".to_string()];
        settings.job_roles = vec!["DevOps Engineer".to_string()];
        settings
    }

    #[tokio::test]
    async fn dedup_keeps_first_occurrence_across_pairs() {
        // 5 rows per call, one URL overlapping between the two calls
        let first: Vec<ScrapedJob> = (0..5).map(|i| job("indeed", &format!("u{i}"))).collect();
        let second: Vec<ScrapedJob> = (4..9).map(|i| job("glassdoor", &format!("u{i}"))).collect();
        let backend = ScriptedSearch::new(vec![Ok(first), Ok(second)]);

        let settings = two_country_settings();
        let outcome = Aggregator::new(&settings, &backend).run().await;

        assert_eq!(outcome.stats.total_scraped, 10);
        assert_eq!(outcome.postings.len(), 9);

        // the overlapping URL keeps the row from the first call
        let kept = outcome
            .postings
            .iter()
            .find(|p| p.job_url == "u4")
            .unwrap();
        assert_eq!(kept.site, "indeed");
        assert_eq!(kept.search_country, "germany");

        let mut urls = HashSet::new();
        assert!(outcome.postings.iter().all(|p| urls.insert(&p.job_url)));
    }

    #[tokio::test]
    async fn failed_pair_contributes_zero_rows_and_run_continues() {
        let backend = ScriptedSearch::new(vec![
            Err(AppError::Backend("boom".to_string())),
            Ok(vec![job("indeed", "u1"), job("indeed", "u2")]),
        ]);

        let settings = two_country_settings();
        let outcome = Aggregator::new(&settings, &backend).run().await;

        assert_eq!(outcome.postings.len(), 2);
        assert_eq!(outcome.stats.total_scraped, 2);
        assert!(outcome.stats.by_country.get("germany").is_none());
        assert_eq!(outcome.stats.by_country["sweden"], 2);
    }

    #[tokio::test]
    async fn rows_are_stamped_with_search_metadata() {
        let backend = ScriptedSearch::new(vec![Ok(vec![job("indeed", "u1")])]);

        let mut settings = Settings::default();
        settings.countries = vec!["spain".to_string()];
        settings.job_roles = vec!["Site Reliability Engineer".to_string()];

        let outcome = Aggregator::new(&settings, &backend).run().await;
        let posting = &outcome.postings[0];
        assert_eq!(posting.search_country, "spain");
        assert_eq!(posting.search_role, "Site Reliability Engineer");
        assert!(posting.visa_sponsorship_mentioned.is_none());
        assert!(posting.note.is_none());
    }

    #[tokio::test]
    async fn no_enabled_sites_short_circuits() {
        let backend = ScriptedSearch::new(vec![Ok(vec![job("indeed", "u1")])]);

        let mut settings = two_country_settings();
        settings.job_sites.disabled = settings
            .job_sites
            .priority
            .iter()
            .chain(settings.job_sites.secondary.iter())
            .cloned()
            .collect();

        let outcome = Aggregator::new(&settings, &backend).run().await;
        assert!(outcome.postings.is_empty());
        assert_eq!(outcome.stats.total_scraped, 0);
    }

    #[tokio::test]
    async fn country_major_iteration_order() {
        // 2 countries x 2 roles: the order of calls must be
        // (germany, r1), (germany, r2), (sweden, r1), (sweden, r2)
        let responses = vec![
            Ok(vec![job("indeed", "a")]),
            Ok(vec![job("indeed", "b")]),
            Ok(vec![job("indeed", "c")]),
            Ok(vec![job("indeed", "d")]),
        ];
        let backend = ScriptedSearch::new(responses);

        let mut settings = two_country_settings();
        settings.job_roles = vec!["r1".to_string(), "r2".to_string()];

        let outcome = Aggregator::new(&settings, &backend).run().await;
        let stamps: Vec<(&str, &str)> = outcome
            .postings
            .iter()
            .map(|p| (p.search_country.as_str(), p.search_role.as_str()))
            .collect();
        assert_eq!(
            stamps,
            vec![
                ("germany", "r1"),
                ("germany", "r2"),
                ("sweden", "r1"),
                ("sweden", "r2"),
            ]
        );
    }
}
