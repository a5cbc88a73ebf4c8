use crate::matcher::KeywordMatcher;
use crate::models::posting::JobPosting;
use crate::settings::Settings;

/// The two keyword passes over posting descriptions. Each pass is
/// independently toggleable and is the identity when disabled.
///
/// The top-level flow runs the visa pass first and the exclusion pass on its
/// output; the exclusion pass's removed count is therefore relative to the
/// visa-filtered set, and callers must keep that order.
pub struct FilterPipeline {
    visa_enabled: bool,
    exclusion_enabled: bool,
    visa: Option<KeywordMatcher>,
    exclusion: Option<KeywordMatcher>,
}

impl FilterPipeline {
    pub fn from_settings(settings: &Settings) -> Self {
        let case_sensitive = settings.filters.case_sensitive;
        Self {
            visa_enabled: settings.filters.visa_sponsorship_filter,
            exclusion_enabled: settings.filters.exclusion_filter,
            visa: KeywordMatcher::compile(&settings.visa_keywords, case_sensitive),
            exclusion: KeywordMatcher::compile(&settings.exclusion_keywords, case_sensitive),
        }
    }

    /// Keep postings whose description mentions a visa keyword, and flag the
    /// survivors. With no keywords configured every posting passes and is
    /// flagged, matching the empty alternation that would otherwise be built.
    pub fn by_visa_sponsorship(&self, postings: Vec<JobPosting>) -> Vec<JobPosting> {
        if !self.visa_enabled {
            tracing::info!("Visa sponsorship filter is disabled");
            return postings;
        }

        let before = postings.len();
        let mut kept: Vec<JobPosting> = postings
            .into_iter()
            .filter(|posting| match &self.visa {
                Some(matcher) => matcher.is_match(posting.description.as_deref()),
                None => true,
            })
            .collect();
        for posting in &mut kept {
            posting.visa_sponsorship_mentioned = Some(true);
        }

        tracing::info!(
            "Found {} jobs with visa sponsorship ({} filtered out)",
            kept.len(),
            before - kept.len()
        );
        kept
    }

    /// Drop postings whose description matches an exclusion keyword
    /// (citizenship-restriction language). A no-op when disabled or when no
    /// exclusion keywords are configured.
    pub fn by_exclusion(&self, postings: Vec<JobPosting>) -> Vec<JobPosting> {
        if !self.exclusion_enabled {
            tracing::info!("Exclusion filter is disabled");
            return postings;
        }
        let Some(matcher) = &self.exclusion else {
            return postings;
        };

        let before = postings.len();
        let kept: Vec<JobPosting> = postings
            .into_iter()
            .filter(|posting| !matcher.is_match(posting.description.as_deref()))
            .collect();

        tracing::info!(
            "Excluded {} jobs with citizenship requirements ({} remaining)",
            before - kept.len(),
            kept.len()
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::posting::ScrapedJob;

    fn posting(url: &str, description: Option<&str>) -> JobPosting {
        JobPosting::from_scraped(
            ScrapedJob {
                site: "indeed".to_string(),
                title: "DevOps Engineer".to_string(),
                company: "Acme".to_string(),
                location: None,
                description: description.map(String::from),
                job_url: url.to_string(),
                date_posted: None,
                job_type: None,
            },
            "germany",
            "DevOps Engineer",
            Utc::now(),
        )
    }

    #[test]
    fn visa_pass_keeps_and_flags_matching_rows() {
        let pipeline = FilterPipeline::from_settings(&Settings::default());
        let input = vec![
            posting("u1", Some("We offer visa sponsorship")),
            posting("u2", Some("on-site role, local candidates")),
            posting("u3", Some("relocation package included")),
        ];

        let kept = pipeline.by_visa_sponsorship(input);
        assert_eq!(kept.len(), 2);
        assert!(kept
            .iter()
            .all(|p| p.visa_sponsorship_mentioned == Some(true)));
    }

    #[test]
    fn missing_description_fails_the_visa_pass() {
        let pipeline = FilterPipeline::from_settings(&Settings::default());
        let kept = pipeline.by_visa_sponsorship(vec![posting("u1", None)]);
        assert!(kept.is_empty());
    }

    #[test]
    fn missing_description_passes_the_exclusion_pass() {
        let pipeline = FilterPipeline::from_settings(&Settings::default());
        let kept = pipeline.by_exclusion(vec![posting("u1", None)]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn exclusion_pass_drops_citizenship_restricted_rows() {
        let pipeline = FilterPipeline::from_settings(&Settings::default());
        let input = vec![
            posting("u1", Some("visa sponsorship, EU/EEA nationals only")),
            posting("u2", Some("visa sponsorship for anyone")),
        ];

        let kept = pipeline.by_exclusion(input);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].job_url, "u2");
    }

    #[test]
    fn disabling_both_filters_is_the_identity() {
        let mut settings = Settings::default();
        settings.filters.visa_sponsorship_filter = false;
        settings.filters.exclusion_filter = false;
        let pipeline = FilterPipeline::from_settings(&settings);

        let input = vec![posting("u1", Some("nothing relevant")), posting("u2", None)];
        let out = pipeline.by_exclusion(pipeline.by_visa_sponsorship(input.clone()));

        assert_eq!(out.len(), input.len());
        assert!(out.iter().all(|p| p.visa_sponsorship_mentioned.is_none()));
        assert_eq!(
            out.iter().map(|p| p.job_url.as_str()).collect::<Vec<_>>(),
            vec!["u1", "u2"]
        );
    }

    #[test]
    fn empty_visa_keyword_list_passes_and_flags_everything() {
        let mut settings = Settings::default();
        settings.visa_keywords.clear();
        let pipeline = FilterPipeline::from_settings(&settings);

        let kept = pipeline.by_visa_sponsorship(vec![posting("u1", Some("anything")), posting("u2", None)]);
        assert_eq!(kept.len(), 2);
        assert!(kept
            .iter()
            .all(|p| p.visa_sponsorship_mentioned == Some(true)));
    }

    #[test]
    fn empty_exclusion_keyword_list_is_a_noop() {
        let mut settings = Settings::default();
        settings.exclusion_keywords.clear();
        let pipeline = FilterPipeline::from_settings(&settings);

        let kept = pipeline.by_exclusion(vec![posting("u1", Some("EU citizen required"))]);
        assert_eq!(kept.len(), 1);
    }
}
