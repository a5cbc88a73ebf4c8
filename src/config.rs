use std::path::PathBuf;

use clap::Parser;

use crate::settings::Settings;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "visajobs",
    about = "Search job boards for postings that mention visa sponsorship"
)]
pub struct Config {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prompt for search settings instead of reading flags
    #[arg(short, long)]
    pub interactive: bool,

    /// Job roles to search for
    #[arg(short, long, num_args = 1..)]
    pub roles: Option<Vec<String>>,

    /// Countries to search in
    #[arg(long, num_args = 1..)]
    pub countries: Option<Vec<String>>,

    /// Job sites to exclude
    #[arg(long, num_args = 1..)]
    pub exclude_sites: Option<Vec<String>>,

    /// Results per site
    #[arg(long)]
    pub results: Option<u32>,

    /// Max job age in days
    #[arg(long)]
    pub days: Option<u32>,

    /// Disable the visa sponsorship filter
    #[arg(long)]
    pub no_visa_filter: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_parser = ["csv", "json", "excel"])]
    pub format: Option<String>,

    /// Base URL of the job search service
    #[arg(long, env = "JOBSPY_URL")]
    pub backend_url: Option<String>,
}

impl Config {
    /// Layer the flag values over the loaded settings. Countries and site
    /// names are lowercased; --days is converted to hours.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(roles) = &self.roles {
            settings.job_roles = roles.clone();
        }
        if let Some(countries) = &self.countries {
            settings.countries = countries.iter().map(|c| c.to_lowercase()).collect();
        }
        if let Some(sites) = &self.exclude_sites {
            settings.job_sites.disabled = sites.iter().map(|s| s.to_lowercase()).collect();
        }
        if let Some(results) = self.results {
            settings.search_params.results_per_site = results;
        }
        if let Some(days) = self.days {
            settings.search_params.hours_old = days * 24;
        }
        if self.no_visa_filter {
            settings.filters.visa_sponsorship_filter = false;
        }
        if let Some(format) = &self.format {
            settings.output.format = format.clone();
        }
        if let Some(url) = &self.backend_url {
            settings.backend.url = url.clone();
        }
    }
}
