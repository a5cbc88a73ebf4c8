use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use csv::QuoteStyle;
use rust_xlsxwriter::Workbook;
use serde::Serialize;

use crate::error::AppError;
use crate::models::posting::JobPosting;
use crate::settings::OutputSettings;

/// Serialization formats for result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Excel,
}

impl OutputFormat {
    /// Unknown format names fall back to CSV with a warning, never an error.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "csv" => Self::Csv,
            "json" => Self::Json,
            "excel" | "xlsx" => Self::Excel,
            other => {
                tracing::warn!("Unknown output format '{other}', saving as CSV");
                Self::Csv
            }
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "xlsx",
        }
    }
}

/// Header row shared by all formats. Identification fields first, search
/// metadata and flags after. The description column is never serialized.
const COLUMNS: [&str; 12] = [
    "site",
    "title",
    "company",
    "location",
    "date_posted",
    "job_type",
    "job_url",
    "search_country",
    "search_role",
    "visa_sponsorship_mentioned",
    "note",
    "scraped_at",
];

/// One serialized row. Field order must match COLUMNS.
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    site: &'a str,
    title: &'a str,
    company: &'a str,
    location: Option<&'a str>,
    date_posted: Option<&'a str>,
    job_type: Option<&'a str>,
    job_url: &'a str,
    search_country: &'a str,
    search_role: &'a str,
    visa_sponsorship_mentioned: Option<bool>,
    note: Option<&'a str>,
    scraped_at: String,
}

impl<'a> From<&'a JobPosting> for OutputRow<'a> {
    fn from(posting: &'a JobPosting) -> Self {
        Self {
            site: &posting.site,
            title: &posting.title,
            company: &posting.company,
            location: posting.location.as_deref(),
            date_posted: posting.date_posted.as_deref(),
            job_type: posting.job_type.as_deref(),
            job_url: &posting.job_url,
            search_country: &posting.search_country,
            search_role: &posting.search_role,
            visa_sponsorship_mentioned: posting.visa_sponsorship_mentioned,
            note: posting.note.as_deref(),
            scraped_at: posting.scraped_at.to_rfc3339(),
        }
    }
}

pub struct OutputWriter {
    format: OutputFormat,
    directory: PathBuf,
    filename_pattern: String,
}

impl OutputWriter {
    pub fn from_settings(output: &OutputSettings) -> Self {
        Self {
            format: OutputFormat::parse(&output.format),
            directory: output.directory.clone(),
            filename_pattern: output.filename_pattern.clone(),
        }
    }

    /// Write one artifact, plus one extra file per source site when the rows
    /// span several. Returns every path written; nothing is written for an
    /// empty table.
    pub fn save(
        &self,
        postings: &[JobPosting],
        explicit_path: Option<&Path>,
        suffix: &str,
    ) -> Result<Vec<PathBuf>, AppError> {
        if postings.is_empty() {
            tracing::warn!("No jobs to save");
            return Ok(Vec::new());
        }

        let path = self.resolve_path(explicit_path, suffix);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let rows: Vec<&JobPosting> = postings.iter().collect();
        self.write_table(&rows, &path)?;
        tracing::info!("Results saved to {}", path.display());
        let mut written = vec![path.clone()];

        let sites = distinct_sites(postings);
        if sites.len() > 1 {
            tracing::info!("Saving separate files by site");
            for site in sites {
                let site_rows: Vec<&JobPosting> =
                    postings.iter().filter(|p| p.site == site).collect();
                let site_path = with_suffix(&path, &format!("_{site}"));
                self.write_table(&site_rows, &site_path)?;
                tracing::info!(
                    "{site}: {} jobs -> {}",
                    site_rows.len(),
                    site_path.display()
                );
                written.push(site_path);
            }
        }

        Ok(written)
    }

    fn resolve_path(&self, explicit_path: Option<&Path>, suffix: &str) -> PathBuf {
        let mut path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => {
                let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
                let filename = self.filename_pattern.replace("{timestamp}", &timestamp);
                self.directory.join(filename)
            }
        };
        if !suffix.is_empty() {
            path = with_suffix(&path, suffix);
        }
        path.set_extension(self.format.extension());
        path
    }

    fn write_table(&self, rows: &[&JobPosting], path: &Path) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Csv => self.write_csv(rows, path),
            OutputFormat::Json => self.write_json(rows, path),
            OutputFormat::Excel => self.write_excel(rows, path),
        }
    }

    fn write_csv(&self, rows: &[&JobPosting], path: &Path) -> Result<(), AppError> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_path(path)?;
        for posting in rows {
            writer.serialize(OutputRow::from(*posting))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_json(&self, rows: &[&JobPosting], path: &Path) -> Result<(), AppError> {
        let records: Vec<OutputRow<'_>> = rows.iter().map(|p| OutputRow::from(*p)).collect();
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &records)?;
        Ok(())
    }

    fn write_excel(&self, rows: &[&JobPosting], path: &Path) -> Result<(), AppError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, header) in COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (i, posting) in rows.iter().enumerate() {
            let row = (i + 1) as u32;
            let record = OutputRow::from(*posting);
            worksheet.write_string(row, 0, record.site)?;
            worksheet.write_string(row, 1, record.title)?;
            worksheet.write_string(row, 2, record.company)?;
            worksheet.write_string(row, 3, record.location.unwrap_or(""))?;
            worksheet.write_string(row, 4, record.date_posted.unwrap_or(""))?;
            worksheet.write_string(row, 5, record.job_type.unwrap_or(""))?;
            worksheet.write_string(row, 6, record.job_url)?;
            worksheet.write_string(row, 7, record.search_country)?;
            worksheet.write_string(row, 8, record.search_role)?;
            if let Some(flag) = record.visa_sponsorship_mentioned {
                worksheet.write_boolean(row, 9, flag)?;
            }
            worksheet.write_string(row, 10, record.note.unwrap_or(""))?;
            worksheet.write_string(row, 11, &record.scraped_at)?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Distinct site names in order of first appearance.
fn distinct_sites(postings: &[JobPosting]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut sites = Vec::new();
    for posting in postings {
        if seen.insert(posting.site.as_str()) {
            sites.push(posting.site.clone());
        }
    }
    sites
}

/// Insert a suffix between the file stem and its extension.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("jobs");
    let file = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(file)
}
