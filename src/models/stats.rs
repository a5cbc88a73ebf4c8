use std::collections::BTreeMap;

use crate::models::posting::ScrapedJob;

/// Counters accumulated over a scrape run. Per-site and per-country counts
/// are recorded before deduplication, so they reflect what each search call
/// actually returned.
#[derive(Debug, Default)]
pub struct RunStats {
    pub total_scraped: usize,
    pub after_filter: usize,
    pub by_site: BTreeMap<String, usize>,
    pub by_country: BTreeMap<String, usize>,
}

impl RunStats {
    /// Record one search call's results under the country that was searched.
    pub fn record_batch(&mut self, country: &str, jobs: &[ScrapedJob]) {
        self.total_scraped += jobs.len();
        *self.by_country.entry(country.to_string()).or_default() += jobs.len();
        for job in jobs {
            *self.by_site.entry(job.site.clone()).or_default() += 1;
        }
    }

    /// Terminal summary, highest counts first.
    pub fn print_report(&self) {
        println!("\n{}", "=".repeat(60));
        println!("STATISTICS");
        println!("{}", "=".repeat(60));
        println!("Total jobs scraped: {}", self.total_scraped);
        println!("After filtering: {}", self.after_filter);

        if !self.by_site.is_empty() {
            println!("\nBy site:");
            for (site, count) in sorted_desc(&self.by_site) {
                println!("   {site}: {count}");
            }
        }

        if !self.by_country.is_empty() {
            println!("\nBy country:");
            for (country, count) in sorted_desc(&self.by_country) {
                println!("   {country}: {count}");
            }
        }

        println!("{}", "=".repeat(60));
    }
}

fn sorted_desc(counts: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = counts
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}
