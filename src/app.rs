use std::path::Path;

use crate::aggregator::Aggregator;
use crate::backends::JobSearch;
use crate::error::AppError;
use crate::filters::FilterPipeline;
use crate::models::posting::JobPosting;
use crate::output::OutputWriter;
use crate::settings::Settings;

/// Full pipeline: scrape, filter, write artifacts, report.
///
/// The visa pass runs before the exclusion pass. When filtering leaves
/// nothing, the raw table is saved instead with a note so the operator always
/// gets something to review; when filtering leaves a strict subset, the raw
/// table is saved alongside as an "_all_jobs" artifact.
pub async fn run(
    settings: &Settings,
    backend: &dyn JobSearch,
    output_path: Option<&Path>,
) -> Result<(), AppError> {
    let outcome = Aggregator::new(settings, backend).run().await;
    let mut stats = outcome.stats;
    let raw = outcome.postings;

    if raw.is_empty() {
        tracing::warn!("No jobs found");
        return Ok(());
    }

    let pipeline = FilterPipeline::from_settings(settings);
    let filtered = pipeline.by_visa_sponsorship(raw.clone());
    let filtered = pipeline.by_exclusion(filtered);
    stats.after_filter = filtered.len();

    let writer = OutputWriter::from_settings(&settings.output);

    if filtered.is_empty() {
        tracing::warn!(
            "No jobs matched the visa sponsorship keywords; saving unfiltered results for manual review"
        );
        let annotated = annotate(raw, "No visa keywords found - manual review needed");
        writer.save(&annotated, output_path, "_unfiltered")?;
    } else {
        writer.save(&filtered, output_path, "")?;
        if filtered.len() < raw.len() {
            tracing::info!("Also saving unfiltered results ({} total jobs)", raw.len());
            let annotated = annotate(raw, "Unfiltered - may not have visa keywords");
            writer.save(&annotated, output_path, "_all_jobs")?;
        }
    }

    stats.print_report();
    Ok(())
}

fn annotate(mut postings: Vec<JobPosting>, note: &str) -> Vec<JobPosting> {
    for posting in &mut postings {
        posting.note = Some(note.to_string());
    }
    postings
}
