use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Employment types understood by the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Fulltime,
    Parttime,
    Contract,
    Internship,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobType::Fulltime => "fulltime",
            JobType::Parttime => "parttime",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        };
        f.write_str(name)
    }
}

/// Application settings: built-in defaults, optionally overridden by a user
/// configuration file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub job_roles: Vec<String>,
    pub countries: Vec<String>,
    pub job_sites: JobSites,
    pub visa_keywords: Vec<String>,
    pub exclusion_keywords: Vec<String>,
    pub search_params: SearchParams,
    pub output: OutputSettings,
    pub filters: FilterSettings,
    pub backend: BackendSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobSites {
    pub priority: Vec<String>,
    pub secondary: Vec<String>,
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParams {
    pub results_per_site: u32,
    pub job_type: JobType,
    pub is_remote: bool,
    pub hours_old: u32,
    pub distance: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub format: String,
    pub directory: PathBuf,
    pub filename_pattern: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSettings {
    pub visa_sponsorship_filter: bool,
    pub exclusion_filter: bool,
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            job_roles: strings(&["DevOps Engineer", "Site Reliability Engineer"]),
            countries: strings(&[
                "germany",
                "netherlands",
                "sweden",
                "spain",
                "belgium",
                "austria",
            ]),
            job_sites: JobSites {
                priority: strings(&["indeed", "glassdoor"]),
                secondary: strings(&["linkedin", "google", "zip_recruiter"]),
                disabled: Vec::new(),
            },
            visa_keywords: strings(&[
                "visa sponsorship",
                "visa",
                "visa support",
                "relocation package",
                "relocation assistance",
                "work permit",
                "sponsorship available",
                "relocation",
            ]),
            exclusion_keywords: strings(&[
                "national of an EU member state",
                "EU member state national",
                "EU citizen",
                "European Union citizen",
                "EU citizenship required",
                "must be an EU national",
                "EU passport required",
                "citizenship of an EU country",
                "only EU nationals",
                "restricted to EU citizens",
                "EU/EEA nationals only",
                "EEA nationals only",
                "Swiss nationals only",
            ]),
            search_params: SearchParams {
                results_per_site: 50,
                job_type: JobType::Fulltime,
                is_remote: false,
                // 7 days
                hours_old: 168,
                distance: 50,
            },
            output: OutputSettings {
                format: "csv".to_string(),
                directory: PathBuf::from("results"),
                filename_pattern: "jobs_{timestamp}.csv".to_string(),
            },
            filters: FilterSettings {
                visa_sponsorship_filter: true,
                exclusion_filter: true,
                case_sensitive: false,
            },
            backend: BackendSettings {
                url: "http://localhost:8000".to_string(),
                timeout_secs: 90,
            },
        }
    }
}

impl Settings {
    /// Defaults, with the given configuration file merged on top when one is
    /// provided. An unreadable or malformed file logs a warning and leaves
    /// the defaults untouched.
    pub fn load(path: Option<&Path>) -> Self {
        let mut settings = Settings::default();
        if let Some(path) = path {
            match read_overlay(path) {
                Ok(overlay) => {
                    settings.merge(overlay);
                    tracing::info!("Loaded configuration from {}", path.display());
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not load config file {}: {e}; using default configuration",
                        path.display()
                    );
                }
            }
        }
        settings
    }

    /// Apply a file overlay. Sections merge field-by-field; list and scalar
    /// values replace the default wholesale.
    pub fn merge(&mut self, overlay: SettingsOverlay) {
        if let Some(roles) = overlay.job_roles {
            self.job_roles = roles;
        }
        if let Some(countries) = overlay.countries {
            self.countries = countries;
        }
        if let Some(priority) = overlay.job_sites.priority {
            self.job_sites.priority = priority;
        }
        if let Some(secondary) = overlay.job_sites.secondary {
            self.job_sites.secondary = secondary;
        }
        if let Some(disabled) = overlay.job_sites.disabled {
            self.job_sites.disabled = disabled;
        }
        if let Some(keywords) = overlay.visa_keywords {
            self.visa_keywords = keywords;
        }
        if let Some(keywords) = overlay.exclusion_keywords {
            self.exclusion_keywords = keywords;
        }
        if let Some(results) = overlay.search_params.results_per_site {
            self.search_params.results_per_site = results;
        }
        if let Some(job_type) = overlay.search_params.job_type {
            self.search_params.job_type = job_type;
        }
        if let Some(is_remote) = overlay.search_params.is_remote {
            self.search_params.is_remote = is_remote;
        }
        if let Some(hours_old) = overlay.search_params.hours_old {
            self.search_params.hours_old = hours_old;
        }
        if let Some(distance) = overlay.search_params.distance {
            self.search_params.distance = distance;
        }
        if let Some(format) = overlay.output.format {
            self.output.format = format;
        }
        if let Some(directory) = overlay.output.directory {
            self.output.directory = directory;
        }
        if let Some(pattern) = overlay.output.filename_pattern {
            self.output.filename_pattern = pattern;
        }
        if let Some(enabled) = overlay.filters.visa_sponsorship_filter {
            self.filters.visa_sponsorship_filter = enabled;
        }
        if let Some(enabled) = overlay.filters.exclusion_filter {
            self.filters.exclusion_filter = enabled;
        }
        if let Some(case_sensitive) = overlay.filters.case_sensitive {
            self.filters.case_sensitive = case_sensitive;
        }
        if let Some(url) = overlay.backend.url {
            self.backend.url = url;
        }
        if let Some(timeout) = overlay.backend.timeout_secs {
            self.backend.timeout_secs = timeout;
        }
    }

    /// Priority sites followed by secondary sites, minus anything disabled.
    /// Order-preserving, no duplicates.
    pub fn enabled_sites(&self) -> Vec<String> {
        let disabled: HashSet<&str> = self
            .job_sites
            .disabled
            .iter()
            .map(String::as_str)
            .collect();

        let mut seen = HashSet::new();
        let mut enabled = Vec::new();
        for site in self
            .job_sites
            .priority
            .iter()
            .chain(self.job_sites.secondary.iter())
        {
            if disabled.contains(site.as_str()) {
                continue;
            }
            if seen.insert(site.as_str()) {
                enabled.push(site.clone());
            }
        }
        enabled
    }
}

/// Optional overrides read from a user configuration file. Every field is
/// optional so a partial file only touches what it names; the nesting matches
/// the settings schema, keeping the merge bounded to that depth.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsOverlay {
    pub job_roles: Option<Vec<String>>,
    pub countries: Option<Vec<String>>,
    pub job_sites: JobSitesOverlay,
    pub visa_keywords: Option<Vec<String>>,
    pub exclusion_keywords: Option<Vec<String>>,
    pub search_params: SearchParamsOverlay,
    pub output: OutputOverlay,
    pub filters: FiltersOverlay,
    pub backend: BackendOverlay,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobSitesOverlay {
    pub priority: Option<Vec<String>>,
    pub secondary: Option<Vec<String>>,
    pub disabled: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParamsOverlay {
    pub results_per_site: Option<u32>,
    pub job_type: Option<JobType>,
    pub is_remote: Option<bool>,
    pub hours_old: Option<u32>,
    pub distance: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputOverlay {
    pub format: Option<String>,
    pub directory: Option<PathBuf>,
    pub filename_pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FiltersOverlay {
    pub visa_sponsorship_filter: Option<bool>,
    pub exclusion_filter: Option<bool>,
    pub case_sensitive: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BackendOverlay {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

fn read_overlay(path: &Path) -> Result<SettingsOverlay, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .build()?
        .try_deserialize()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
